//! Novel Context - Errors

use thiserror::Error;

use super::NovelStatus;

#[derive(Debug, Error)]
pub enum NovelError {
    #[error("无效的标题: {0}")]
    InvalidTitle(String),

    #[error("无效的章节: {0}")]
    InvalidChapter(String),

    #[error("无效的状态迁移: {from} -> {to}")]
    InvalidTransition { from: NovelStatus, to: NovelStatus },

    #[error("序列化错误: {0}")]
    SerializationError(String),
}
