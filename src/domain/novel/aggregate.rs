//! Novel Context - Aggregate Root

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{Chapter, Character, NovelError, Plot, StyleGuide, WorldLore};

/// 流水线游标
///
/// idea → planning → writing → reviewing → completed，只能逐步前进
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NovelStatus {
    #[default]
    Idea,
    Planning,
    Writing,
    Reviewing,
    Completed,
}

impl NovelStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            NovelStatus::Idea => "idea",
            NovelStatus::Planning => "planning",
            NovelStatus::Writing => "writing",
            NovelStatus::Reviewing => "reviewing",
            NovelStatus::Completed => "completed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "idea" => Some(NovelStatus::Idea),
            "planning" => Some(NovelStatus::Planning),
            "writing" => Some(NovelStatus::Writing),
            "reviewing" => Some(NovelStatus::Reviewing),
            "completed" => Some(NovelStatus::Completed),
            _ => None,
        }
    }

    /// 下一个状态；completed 为终态
    pub fn next(&self) -> Option<Self> {
        match self {
            NovelStatus::Idea => Some(NovelStatus::Planning),
            NovelStatus::Planning => Some(NovelStatus::Writing),
            NovelStatus::Writing => Some(NovelStatus::Reviewing),
            NovelStatus::Reviewing => Some(NovelStatus::Completed),
            NovelStatus::Completed => None,
        }
    }
}

impl std::fmt::Display for NovelStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Novel 聚合根
///
/// 不变量:
/// - 独占所有子记录（无共享、无反向引用）
/// - status 只能前进一步
/// - chapters 按 number 严格递增（允许有空缺）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Novel {
    title: String,
    idea: String,
    style_guide: Option<StyleGuide>,
    world_lore: Option<WorldLore>,
    plot: Option<Plot>,
    characters: BTreeMap<String, Character>,
    chapters: Vec<Chapter>,
    status: NovelStatus,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl Novel {
    /// 创建新小说，状态为 idea
    pub fn new(title: impl Into<String>, idea: impl Into<String>) -> Result<Self, NovelError> {
        let title = title.into();
        if title.trim().is_empty() {
            return Err(NovelError::InvalidTitle("标题不能为空".to_string()));
        }
        if title.len() > 200 {
            return Err(NovelError::InvalidTitle("标题长度不能超过200字符".to_string()));
        }
        let now = Utc::now();
        Ok(Self {
            title,
            idea: idea.into(),
            style_guide: None,
            world_lore: None,
            plot: None,
            characters: BTreeMap::new(),
            chapters: Vec::new(),
            status: NovelStatus::Idea,
            created_at: now,
            updated_at: now,
        })
    }

    /// 前进到下一个状态
    ///
    /// 只接受 `status.next()`，其他目标（后退、跳跃、重复）都会被拒绝
    pub fn advance_to(&mut self, to: NovelStatus) -> Result<(), NovelError> {
        if self.status.next() != Some(to) {
            return Err(NovelError::InvalidTransition {
                from: self.status,
                to,
            });
        }
        self.status = to;
        self.touch();
        Ok(())
    }

    pub fn set_idea(&mut self, idea: impl Into<String>) {
        self.idea = idea.into();
        self.touch();
    }

    pub fn set_style_guide(&mut self, style_guide: StyleGuide) {
        self.style_guide = Some(style_guide);
        self.touch();
    }

    pub fn set_world_lore(&mut self, world_lore: WorldLore) {
        self.world_lore = Some(world_lore);
        self.touch();
    }

    pub fn set_plot(&mut self, plot: Plot) {
        self.plot = Some(plot);
        self.touch();
    }

    pub fn set_characters(&mut self, characters: BTreeMap<String, Character>) {
        self.characters = characters;
        self.touch();
    }

    /// 替换全部章节
    pub fn set_chapters(&mut self, chapters: Vec<Chapter>) -> Result<(), NovelError> {
        let ascending = chapters
            .windows(2)
            .all(|pair| pair[0].number() < pair[1].number());
        if !ascending {
            return Err(NovelError::InvalidChapter(
                "章节编号必须唯一且递增".to_string(),
            ));
        }
        self.chapters = chapters;
        self.touch();
        Ok(())
    }

    /// 可变访问章节（写作阶段原地修改）
    pub fn chapters_mut(&mut self) -> &mut [Chapter] {
        self.updated_at = Utc::now();
        &mut self.chapters
    }

    fn touch(&mut self) {
        self.updated_at = Utc::now();
    }

    // Getters
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn idea(&self) -> &str {
        &self.idea
    }

    pub fn style_guide(&self) -> Option<&StyleGuide> {
        self.style_guide.as_ref()
    }

    pub fn world_lore(&self) -> Option<&WorldLore> {
        self.world_lore.as_ref()
    }

    pub fn plot(&self) -> Option<&Plot> {
        self.plot.as_ref()
    }

    pub fn characters(&self) -> &BTreeMap<String, Character> {
        &self.characters
    }

    pub fn chapters(&self) -> &[Chapter] {
        &self.chapters
    }

    pub fn get_chapter(&self, number: u32) -> Option<&Chapter> {
        self.chapters.iter().find(|c| c.number() == number)
    }

    pub fn status(&self) -> NovelStatus {
        self.status
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// 文件名用的标题（空格替换为下划线）
    pub fn file_stem(&self) -> String {
        self.title.replace(' ', "_")
    }

    /// 整个聚合的 JSON 表示
    pub fn to_json(&self) -> Result<String, NovelError> {
        serde_json::to_string_pretty(self)
            .map_err(|e| NovelError::SerializationError(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::ChapterPlan;

    #[test]
    fn test_novel_creation() {
        let novel = Novel::new("The Long Night", "A lighthouse keeper").unwrap();

        assert_eq!(novel.title(), "The Long Night");
        assert_eq!(novel.status(), NovelStatus::Idea);
        assert!(novel.style_guide().is_none());
        assert!(novel.chapters().is_empty());
        assert_eq!(novel.file_stem(), "The_Long_Night");
    }

    #[test]
    fn test_empty_title_rejected() {
        assert!(Novel::new("   ", "idea").is_err());
    }

    #[test]
    fn test_status_advances_one_step_at_a_time() {
        let mut novel = Novel::new("T", "i").unwrap();

        assert!(novel.advance_to(NovelStatus::Writing).is_err());
        assert_eq!(novel.status(), NovelStatus::Idea);

        novel.advance_to(NovelStatus::Planning).unwrap();
        novel.advance_to(NovelStatus::Writing).unwrap();
        assert!(novel.advance_to(NovelStatus::Planning).is_err());
        assert_eq!(novel.status(), NovelStatus::Writing);
    }

    #[test]
    fn test_status_next_and_parse() {
        assert_eq!(NovelStatus::Completed.next(), None);
        assert_eq!(NovelStatus::Reviewing.next(), Some(NovelStatus::Completed));
        assert_eq!(NovelStatus::from_str("reviewing"), Some(NovelStatus::Reviewing));
        assert_eq!(NovelStatus::from_str("done"), None);
    }

    #[test]
    fn test_set_chapters_allows_gaps_but_not_duplicates() {
        let mut novel = Novel::new("T", "i").unwrap();
        let plan = ChapterPlan::default();

        let with_gap = vec![
            Chapter::planned(1, plan.clone()).unwrap(),
            Chapter::planned(3, plan.clone()).unwrap(),
        ];
        novel.set_chapters(with_gap).unwrap();
        assert_eq!(novel.chapters().len(), 2);
        assert!(novel.get_chapter(3).is_some());
        assert!(novel.get_chapter(2).is_none());

        let duplicated = vec![
            Chapter::planned(2, plan.clone()).unwrap(),
            Chapter::planned(2, plan).unwrap(),
        ];
        assert!(novel.set_chapters(duplicated).is_err());
        assert_eq!(novel.chapters().len(), 2);
    }

    #[test]
    fn test_to_json_contains_status() {
        let novel = Novel::new("T", "i").unwrap();
        let json = novel.to_json().unwrap();
        assert!(json.contains("\"status\": \"idea\""));
    }
}
