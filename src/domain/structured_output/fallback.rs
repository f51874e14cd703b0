//! 回退提取路径
//!
//! 严格解析失败时，逐行扫描 `Label: value` 形式的文本。
//! 找不到的文本字段填入占位符 [`PLACEHOLDER`]，集合字段为空。
//! 这里的函数永远不会失败。

use regex::Regex;
use std::collections::BTreeMap;
use std::sync::OnceLock;

use crate::domain::novel::{Character, Plot, StyleGuide, WorldLore};

/// 未找到字段时的占位值
pub const PLACEHOLDER: &str = "Undefined";

/// 行首的列表符号/编号、强调符号和引号都会被忽略
static LABEL_LINE: OnceLock<Regex> = OnceLock::new();

fn label_line() -> &'static Regex {
    LABEL_LINE.get_or_init(|| {
        Regex::new(r#"^\s*(?:[-*•>#]+\s*|\d+[.)]\s*)?[*_`"']*([A-Za-z][A-Za-z _-]*?)[*_`"']*\s*:\s*(.*)$"#)
            .expect("label line pattern is valid")
    })
}

/// 一行 `Label: value`，label 已归一化为小写、以单个空格分隔
#[derive(Debug, Clone, PartialEq, Eq)]
struct LabeledLine {
    label: String,
    value: String,
}

fn parse_line(line: &str) -> Option<LabeledLine> {
    let caps = label_line().captures(line)?;
    let label = normalize_label(caps.get(1)?.as_str());
    if label.is_empty() {
        return None;
    }
    let value = caps.get(2).map_or("", |m| m.as_str());
    Some(LabeledLine {
        label,
        value: clean_value(value).to_string(),
    })
}

fn normalize_label(raw: &str) -> String {
    raw.replace(['_', '-'], " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// 去掉强调符号、行尾逗号和包裹的引号
fn clean_value(raw: &str) -> &str {
    let value = raw.trim().trim_start_matches('*').trim();
    let value = value.strip_suffix(',').unwrap_or(value).trim_end();
    strip_quotes(value)
}

fn strip_quotes(value: &str) -> &str {
    let value = value.trim();
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return value[1..value.len() - 1].trim();
        }
    }
    value
}

/// 扫描结果：每个 label 取第一次出现的值
struct LabeledFields {
    lines: Vec<LabeledLine>,
}

impl LabeledFields {
    fn scan<'a>(lines: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            lines: lines.into_iter().filter_map(parse_line).collect(),
        }
    }

    fn find(&self, aliases: &[&str]) -> Option<&str> {
        self.lines
            .iter()
            .find(|line| aliases.contains(&line.label.as_str()))
            .map(|line| line.value.as_str())
    }

    fn text(&self, aliases: &[&str]) -> String {
        match self.find(aliases) {
            Some(value) if !value.is_empty() => value.to_string(),
            _ => PLACEHOLDER.to_string(),
        }
    }

    fn list(&self, aliases: &[&str]) -> Vec<String> {
        self.find(aliases).map(parse_list).unwrap_or_default()
    }

    fn map(&self, aliases: &[&str]) -> BTreeMap<String, String> {
        self.find(aliases).map(parse_map).unwrap_or_default()
    }
}

/// 取出 open..close 之间的内容；没有括号时取整行
fn enclosed(value: &str, open: char, close: char) -> &str {
    match value.find(open) {
        Some(start) => {
            let inner = &value[start + open.len_utf8()..];
            match inner.rfind(close) {
                Some(end) => &inner[..end],
                None => inner,
            }
        }
        None => value,
    }
}

/// `[a, b, c]` 或 `a, b, c`
fn parse_list(value: &str) -> Vec<String> {
    enclosed(value, '[', ']')
        .split(',')
        .map(strip_quotes)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

/// `{k: v, k2: v2}`，每对只按第一个冒号切分；切不开的对直接丢弃
fn parse_map(value: &str) -> BTreeMap<String, String> {
    enclosed(value, '{', '}')
        .split(',')
        .filter_map(|pair| pair.split_once(':'))
        .filter_map(|(key, desc)| {
            let key = strip_quotes(key);
            if key.is_empty() {
                None
            } else {
                Some((key.to_string(), strip_quotes(desc).to_string()))
            }
        })
        .collect()
}

pub fn extract_style_guide(text: &str) -> StyleGuide {
    let fields = LabeledFields::scan(text.lines());
    StyleGuide {
        tone: fields.text(&["tone"]),
        language: fields.text(&["language"]),
        narrative_style: fields.text(&["narrative style"]),
        pov: fields.text(&["pov", "point of view"]),
        tense: fields.text(&["tense"]),
        themes: fields.list(&["themes"]),
    }
}

pub fn extract_world_lore(text: &str) -> WorldLore {
    let fields = LabeledFields::scan(text.lines());
    WorldLore {
        setting: fields.text(&["setting"]),
        history: fields.text(&["history"]),
        culture: fields.text(&["culture"]),
        rules: fields.text(&["rules"]),
        locations: fields.map(&["locations"]),
    }
}

pub fn extract_plot(text: &str) -> Plot {
    let fields = LabeledFields::scan(text.lines());
    Plot {
        main_plot: fields.text(&["main plot"]),
        subplots: fields.list(&["subplots"]),
        arcs: fields.list(&["character arcs", "arcs"]),
    }
}

/// 按 `Character: <name>` 标题把文本切成块，每块一个角色
///
/// 第一个标题之前的内容被忽略；同名角色以后出现的为准
pub fn extract_characters(text: &str) -> BTreeMap<String, Character> {
    let mut blocks: Vec<(String, Vec<&str>)> = Vec::new();

    for line in text.lines() {
        match parse_line(line) {
            Some(header) if header.label == "character" => {
                blocks.push((header.value, Vec::new()));
            }
            _ => {
                if let Some((_, body)) = blocks.last_mut() {
                    body.push(line);
                }
            }
        }
    }

    blocks
        .into_iter()
        .filter(|(name, _)| !name.is_empty())
        .map(|(name, body)| {
            let fields = LabeledFields::scan(body);
            let character = Character {
                name: name.clone(),
                description: fields.text(&["description"]),
                background: fields.text(&["background"]),
                motivation: fields.text(&["motivation"]),
                arc: fields.text(&["arc", "character arc"]),
                relationships: fields.map(&["relationships"]),
            };
            (name, character)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unlabeled_text_yields_placeholders() {
        let text = "I'm sorry, I cannot help with that request.";

        let guide = extract_style_guide(text);
        assert_eq!(guide.tone, PLACEHOLDER);
        assert_eq!(guide.language, PLACEHOLDER);
        assert_eq!(guide.narrative_style, PLACEHOLDER);
        assert_eq!(guide.pov, PLACEHOLDER);
        assert_eq!(guide.tense, PLACEHOLDER);
        assert!(guide.themes.is_empty());

        let lore = extract_world_lore(text);
        assert_eq!(lore.setting, PLACEHOLDER);
        assert_eq!(lore.rules, PLACEHOLDER);
        assert!(lore.locations.is_empty());

        let plot = extract_plot(text);
        assert_eq!(plot.main_plot, PLACEHOLDER);
        assert!(plot.subplots.is_empty());
        assert!(plot.arcs.is_empty());

        assert!(extract_characters(text).is_empty());
    }

    #[test]
    fn test_empty_text_yields_placeholders() {
        let guide = extract_style_guide("");
        assert_eq!(guide.tone, PLACEHOLDER);
        assert!(guide.themes.is_empty());
    }

    #[test]
    fn test_style_guide_labels() {
        let text = "Here is the guide:\n\
                    - **Tone:** brooding\n\
                    - Language: sparse\n\
                    - Narrative Style: close third\n\
                    - POV: third-person limited\n\
                    - Tense: past\n\
                    - Themes: grief, memory, the sea";
        let guide = extract_style_guide(text);
        assert_eq!(guide.tone, "brooding");
        assert_eq!(guide.language, "sparse");
        assert_eq!(guide.narrative_style, "close third");
        assert_eq!(guide.pov, "third-person limited");
        assert_eq!(guide.tense, "past");
        assert_eq!(guide.themes, vec!["grief", "memory", "the sea"]);
    }

    #[test]
    fn test_broken_json_degrades_to_labels() {
        // 缺少闭合括号的 JSON 仍然能按行取出字段
        let text = "{\n  \"tone\": \"dark\",\n  \"narrative_style\": \"epistolary\",\n  \"themes\": [\"fate\", \"pride\"]";
        let guide = extract_style_guide(text);
        assert_eq!(guide.tone, "dark");
        assert_eq!(guide.narrative_style, "epistolary");
        assert_eq!(guide.themes, vec!["fate", "pride"]);
        assert_eq!(guide.tense, PLACEHOLDER);
    }

    #[test]
    fn test_world_lore_locations_split_on_first_colon() {
        let text = "Setting: A drowned city\n\
                    Locations: {Harbor: rotting piers, Clock Tower: stopped at 3:15, nonsense}";
        let lore = extract_world_lore(text);
        assert_eq!(lore.setting, "A drowned city");
        assert_eq!(lore.history, PLACEHOLDER);
        assert_eq!(lore.locations.len(), 2);
        assert_eq!(lore.locations["Harbor"], "rotting piers");
        assert_eq!(lore.locations["Clock Tower"], "stopped at 3:15");
    }

    #[test]
    fn test_plot_lists() {
        let text = "Main Plot: A smuggler seeks redemption\n\
                    Subplots: [A rival crew, A lost sister]\n\
                    Character Arcs: [Mara learns trust]";
        let plot = extract_plot(text);
        assert_eq!(plot.main_plot, "A smuggler seeks redemption");
        assert_eq!(plot.subplots, vec!["A rival crew", "A lost sister"]);
        assert_eq!(plot.arcs, vec!["Mara learns trust"]);
    }

    #[test]
    fn test_character_blocks() {
        let text = "The cast:\n\
                    Character: Mara\n\
                    Description: A weathered captain\n\
                    Motivation: Clear her debt\n\
                    Relationships: {Tomas: first mate, Ines: estranged sister}\n\
                    \n\
                    Character: Tomas\n\
                    Description: Loyal to a fault\n\
                    Arc: Learns to say no";
        let characters = extract_characters(text);
        assert_eq!(characters.len(), 2);

        let mara = &characters["Mara"];
        assert_eq!(mara.name, "Mara");
        assert_eq!(mara.description, "A weathered captain");
        assert_eq!(mara.background, PLACEHOLDER);
        assert_eq!(mara.motivation, "Clear her debt");
        assert_eq!(mara.arc, PLACEHOLDER);
        assert_eq!(mara.relationships["Ines"], "estranged sister");

        let tomas = &characters["Tomas"];
        assert_eq!(tomas.arc, "Learns to say no");
        assert!(tomas.relationships.is_empty());
    }

    #[test]
    fn test_label_normalization() {
        assert_eq!(normalize_label("Narrative_Style"), "narrative style");
        assert_eq!(normalize_label("  Main   Plot "), "main plot");
    }
}
