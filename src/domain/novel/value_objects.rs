//! Novel Context - Value Objects
//!
//! 规划阶段产出的结构化记录。所有字段都有默认值：
//! 全部为默认值的记录表示“尚未生成”或“完全无法解析”。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 风格指南
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StyleGuide {
    /// 基调（如 dark、humorous）
    pub tone: String,
    /// 语言风格
    pub language: String,
    /// 叙事方式
    pub narrative_style: String,
    /// 视角
    pub pov: String,
    /// 时态
    pub tense: String,
    /// 主题
    pub themes: Vec<String>,
}

/// 世界观设定
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct WorldLore {
    pub setting: String,
    pub history: String,
    pub culture: String,
    /// 世界运行规则（物理、魔法等）
    pub rules: String,
    /// 地点名 -> 描述
    pub locations: BTreeMap<String, String>,
}

/// 情节
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Plot {
    pub main_plot: String,
    pub subplots: Vec<String>,
    /// 主要角色弧线
    pub arcs: Vec<String>,
}

impl StyleGuide {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl WorldLore {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

impl Plot {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
