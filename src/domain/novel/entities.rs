//! Novel Context - Entities

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::NovelError;

/// 角色
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Character {
    pub name: String,
    pub description: String,
    pub background: String,
    pub motivation: String,
    /// 角色成长弧线
    pub arc: String,
    /// 其他角色名 -> 关系描述
    pub relationships: BTreeMap<String, String>,
}

/// 章节计划
///
/// `pov_character` 应当引用 Novel.characters 中的键，但不做校验
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChapterPlan {
    pub title: String,
    pub summary: String,
    pub scenes: Vec<String>,
    pub pov_character: String,
    pub goals: Vec<String>,
    pub conflicts: Vec<String>,
    pub resolutions: Vec<String>,
}

/// 章节状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChapterStatus {
    /// 已规划，尚未写作
    #[default]
    Planned,
    /// 初稿已生成，等待审校（仅在写作与审校之间中断时持久化）
    Writing,
    /// 审校完成
    Completed,
}

/// 章节
///
/// 不变量:
/// - number 从 1 开始，在 Novel 内唯一
/// - plan 仅在该章节规划失败/跳过时缺失
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    number: u32,
    title: String,
    plan: Option<ChapterPlan>,
    content: String,
    status: ChapterStatus,
}

impl Chapter {
    /// 创建没有计划的章节
    pub fn new(number: u32, title: impl Into<String>) -> Result<Self, NovelError> {
        if number == 0 {
            return Err(NovelError::InvalidChapter(
                "章节编号必须从 1 开始".to_string(),
            ));
        }
        Ok(Self {
            number,
            title: title.into(),
            plan: None,
            content: String::new(),
            status: ChapterStatus::Planned,
        })
    }

    /// 从章节计划创建章节，标题取自计划
    pub fn planned(number: u32, plan: ChapterPlan) -> Result<Self, NovelError> {
        let mut chapter = Self::new(number, plan.title.clone())?;
        chapter.plan = Some(plan);
        Ok(chapter)
    }

    /// 记录初稿，状态变为 writing
    pub fn record_draft(&mut self, content: impl Into<String>) {
        self.content = content.into();
        self.status = ChapterStatus::Writing;
    }

    /// 应用审校结果
    ///
    /// 有修订稿时替换正文（修订稿可以为空）；无论如何状态都变为 completed
    pub fn apply_review(&mut self, revised: Option<String>) {
        if let Some(content) = revised {
            self.content = content;
        }
        self.status = ChapterStatus::Completed;
    }

    pub fn number(&self) -> u32 {
        self.number
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn plan(&self) -> Option<&ChapterPlan> {
        self.plan.as_ref()
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn status(&self) -> ChapterStatus {
        self.status
    }

    pub fn is_completed(&self) -> bool {
        self.status == ChapterStatus::Completed
    }
}
