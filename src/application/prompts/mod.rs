//! Prompt Templates
//!
//! 每个阶段的提示词都是带命名槽位（`{slot}`）的固定文本。
//! 措辞变化会改变生成结果，因此模板按版本对待。

mod chapters;
mod idea;
mod planning;
mod review;

use regex::{Captures, Regex};
use serde::Serialize;
use std::sync::OnceLock;

use crate::domain::novel::Novel;

pub use chapters::{CHAPTER_PLAN, CHAPTER_REVIEW, CHAPTER_WRITING, REVISED_CONTENT_MARKER};
pub use idea::{ANSWER_QUESTION, FOLLOW_UP_QUESTIONS, IDEA_SYNTHESIS};
pub use planning::{CHARACTERS, PLOT, STYLE_GUIDE, WORLD_LORE};
pub use review::FINAL_REVIEW;

/// 记录尚未生成时的占位文本
pub const NOT_YET_DEFINED: &str = "(not yet defined)";

static SLOT: OnceLock<Regex> = OnceLock::new();

fn slot_pattern() -> &'static Regex {
    SLOT.get_or_init(|| Regex::new(r"\{([a-z_]+)\}").expect("slot pattern is valid"))
}

/// 提示词模板
#[derive(Debug, Clone, Copy)]
pub struct PromptTemplate {
    pub name: &'static str,
    pub text: &'static str,
    pub slots: &'static [&'static str],
}

impl PromptTemplate {
    /// 一次性替换所有已声明的槽位
    ///
    /// 替换值中出现的 `{…}` 不会被再次展开；未提供的槽位原样保留
    pub fn render(&self, values: &[(&str, &str)]) -> String {
        for slot in self.slots {
            if !values.iter().any(|(name, _)| name == slot) {
                tracing::warn!(template = self.name, slot = %slot, "Prompt slot left unfilled");
            }
        }

        slot_pattern()
            .replace_all(self.text, |caps: &Captures| {
                let name = &caps[1];
                match values.iter().find(|(slot, _)| *slot == name) {
                    Some((_, value)) if self.slots.contains(&name) => (*value).to_string(),
                    _ => caps[0].to_string(),
                }
            })
            .into_owned()
    }
}

/// 以结构化文本（格式化 JSON）呈现记录
pub fn render_record<T: Serialize>(record: Option<&T>) -> String {
    record
        .and_then(|r| serde_json::to_string_pretty(r).ok())
        .unwrap_or_else(|| NOT_YET_DEFINED.to_string())
}

/// 各阶段共用的小说上下文
#[derive(Debug, Clone)]
pub struct NovelContext {
    pub style_guide: String,
    pub world_lore: String,
    pub plot: String,
    pub characters: String,
}

impl NovelContext {
    pub fn from_novel(novel: &Novel) -> Self {
        let characters = if novel.characters().is_empty() {
            NOT_YET_DEFINED.to_string()
        } else {
            render_record(Some(novel.characters()))
        };
        Self {
            style_guide: render_record(novel.style_guide()),
            world_lore: render_record(novel.world_lore()),
            plot: render_record(novel.plot()),
            characters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::StyleGuide;

    const SAMPLE: PromptTemplate = PromptTemplate {
        name: "sample",
        text: "Idea: {idea}\nGuide: {style_guide}\nKeep {braces}",
        slots: &["idea", "style_guide"],
    };

    #[test]
    fn test_render_fills_declared_slots() {
        let rendered = SAMPLE.render(&[("idea", "a ghost story"), ("style_guide", "terse")]);
        assert_eq!(rendered, "Idea: a ghost story\nGuide: terse\nKeep {braces}");
    }

    #[test]
    fn test_render_does_not_expand_values() {
        let rendered = SAMPLE.render(&[("idea", "{style_guide}"), ("style_guide", "x")]);
        assert!(rendered.starts_with("Idea: {style_guide}\n"));
    }

    #[test]
    fn test_render_record() {
        assert_eq!(render_record::<StyleGuide>(None), NOT_YET_DEFINED);

        let guide = StyleGuide {
            tone: "wry".to_string(),
            ..Default::default()
        };
        assert!(render_record(Some(&guide)).contains("\"tone\": \"wry\""));
    }

    #[test]
    fn test_every_template_mentions_its_slots() {
        let templates = [
            FOLLOW_UP_QUESTIONS,
            ANSWER_QUESTION,
            IDEA_SYNTHESIS,
            STYLE_GUIDE,
            WORLD_LORE,
            PLOT,
            CHARACTERS,
            CHAPTER_PLAN,
            CHAPTER_WRITING,
            CHAPTER_REVIEW,
            FINAL_REVIEW,
        ];
        for template in templates {
            for slot in template.slots {
                assert!(
                    template.text.contains(&format!("{{{}}}", slot)),
                    "{} is missing {{{}}}",
                    template.name,
                    slot
                );
            }
        }
    }
}
