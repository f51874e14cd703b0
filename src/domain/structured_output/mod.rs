//! 结构化输出解析器
//!
//! 把模型的自由文本回复转换为类型化记录：
//! 1. 严格路径：整段文本按 JSON 对象解析
//! 2. 回退路径：逐行提取 `Label: value`，永不失败
//!
//! 章节计划只走严格路径，失败由调用方决定如何处理。

mod fallback;
mod strict;

use serde::de::DeserializeOwned;
use std::collections::BTreeMap;

use crate::domain::novel::{Character, Plot, StyleGuide, WorldLore};

pub use fallback::{
    extract_characters, extract_plot, extract_style_guide, extract_world_lore, PLACEHOLDER,
};
pub use strict::{parse_strict, ParseError};

/// 可以从模型输出中解析出来、并带有回退提取器的记录
pub trait StructuredRecord: DeserializeOwned {
    /// 记录类型名（用于日志）
    const KIND: &'static str;

    /// 回退提取，永不失败
    fn extract_fallback(text: &str) -> Self;

    /// 严格解析成功后的整理
    fn normalize(self) -> Self {
        self
    }
}

impl StructuredRecord for StyleGuide {
    const KIND: &'static str = "style_guide";

    fn extract_fallback(text: &str) -> Self {
        extract_style_guide(text)
    }
}

impl StructuredRecord for WorldLore {
    const KIND: &'static str = "world_lore";

    fn extract_fallback(text: &str) -> Self {
        extract_world_lore(text)
    }
}

impl StructuredRecord for Plot {
    const KIND: &'static str = "plot";

    fn extract_fallback(text: &str) -> Self {
        extract_plot(text)
    }
}

impl StructuredRecord for BTreeMap<String, Character> {
    const KIND: &'static str = "characters";

    fn extract_fallback(text: &str) -> Self {
        extract_characters(text)
    }

    /// 角色对象缺少 name 时使用映射的键
    fn normalize(mut self) -> Self {
        for (key, character) in self.iter_mut() {
            if character.name.trim().is_empty() {
                character.name = key.clone();
            }
        }
        self
    }
}

/// 解析结果
#[derive(Debug, Clone, PartialEq)]
pub struct Parsed<T> {
    pub value: T,
    /// 是否走了回退路径
    pub degraded: bool,
}

/// 先严格解析，失败则回退提取
pub fn parse_or_fallback<T: StructuredRecord>(text: &str) -> Parsed<T> {
    match parse_strict::<T>(text) {
        Ok(value) => Parsed {
            value: value.normalize(),
            degraded: false,
        },
        Err(e) => {
            tracing::warn!(
                record = T::KIND,
                error = %e,
                "Structured parse failed, extracting labeled fields instead"
            );
            Parsed {
                value: T::extract_fallback(text),
                degraded: true,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::ChapterPlan;

    fn sample_style_guide() -> StyleGuide {
        StyleGuide {
            tone: "melancholic".to_string(),
            language: "lyrical".to_string(),
            narrative_style: "frame narrative".to_string(),
            pov: "first-person".to_string(),
            tense: "past".to_string(),
            themes: vec!["memory".to_string(), "guilt".to_string()],
        }
    }

    #[test]
    fn test_well_formed_style_guide_round_trips() {
        let guide = sample_style_guide();
        let text = serde_json::to_string_pretty(&guide).unwrap();

        let parsed: Parsed<StyleGuide> = parse_or_fallback(&text);
        assert!(!parsed.degraded);
        assert_eq!(parsed.value, guide);
    }

    #[test]
    fn test_well_formed_world_lore_round_trips() {
        let mut lore = WorldLore {
            setting: "An archipelago".to_string(),
            history: "A sunken empire".to_string(),
            culture: "Tide-worship".to_string(),
            rules: "Salt wards off spirits".to_string(),
            locations: BTreeMap::new(),
        };
        lore.locations
            .insert("Port Veil".to_string(), "A fog-bound harbor".to_string());
        let text = serde_json::to_string(&lore).unwrap();

        let parsed: Parsed<WorldLore> = parse_or_fallback(&text);
        assert!(!parsed.degraded);
        assert_eq!(parsed.value, lore);
    }

    #[test]
    fn test_well_formed_chapter_plan_round_trips() {
        let plan = ChapterPlan {
            title: "Landfall".to_string(),
            summary: "The crew reaches the island".to_string(),
            scenes: vec!["Storm".to_string(), "Beach".to_string()],
            pov_character: "Mara".to_string(),
            goals: vec!["Find water".to_string()],
            conflicts: vec!["Mutiny brews".to_string()],
            resolutions: vec![],
        };
        let text = serde_json::to_string_pretty(&plan).unwrap();
        assert_eq!(parse_strict::<ChapterPlan>(&text).unwrap(), plan);
    }

    #[test]
    fn test_characters_fill_missing_names_from_keys() {
        let text = r#"{
            "Mara": {"description": "Captain", "relationships": {"Tomas": "first mate"}},
            "Tomas": {"name": "Tomas Reyes", "arc": "Finds his voice"}
        }"#;

        let parsed: Parsed<BTreeMap<String, Character>> = parse_or_fallback(text);
        assert!(!parsed.degraded);
        assert_eq!(parsed.value["Mara"].name, "Mara");
        assert_eq!(parsed.value["Mara"].relationships["Tomas"], "first mate");
        assert_eq!(parsed.value["Tomas"].name, "Tomas Reyes");
    }

    #[test]
    fn test_prose_degrades_to_fallback() {
        let parsed: Parsed<Plot> = parse_or_fallback("Main Plot: A heist goes wrong");
        assert!(parsed.degraded);
        assert_eq!(parsed.value.main_plot, "A heist goes wrong");
        assert!(parsed.value.subplots.is_empty());
    }

    #[test]
    fn test_type_mismatch_degrades_to_fallback() {
        let parsed: Parsed<StyleGuide> = parse_or_fallback(r#"{"tone": 3}"#);
        assert!(parsed.degraded);
        assert_eq!(parsed.value.tone, PLACEHOLDER);
    }
}
