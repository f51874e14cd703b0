//! Novel Context - 小说限界上下文
//!
//! 职责:
//! - 小说聚合与流水线状态
//! - 规划产物（风格指南、世界观、情节、角色）
//! - 章节计划与章节

mod aggregate;
mod entities;
mod errors;
mod value_objects;

pub use aggregate::{Novel, NovelStatus};
pub use entities::{Chapter, ChapterPlan, ChapterStatus, Character};
pub use errors::NovelError;
pub use value_objects::{Plot, StyleGuide, WorldLore};
