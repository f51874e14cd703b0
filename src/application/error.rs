//! 应用层错误定义
//!
//! 统一的阶段/流水线错误类型。只有生成后端错误和存储错误会
//! 穿过阶段执行器边界；文本形状问题在解析器内部消化。

use thiserror::Error;

use crate::application::ports::{GeneratorError, RepositoryError};
use crate::domain::novel::NovelError;

/// 应用层错误
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// 生成后端不可用或返回非 2xx（致命）
    #[error("Generation failed: {0}")]
    Generation(#[from] GeneratorError),

    /// 请求的阶段与当前状态不符（不改变状态）
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// 领域不变量被破坏
    #[error("Domain error: {0}")]
    Domain(#[from] NovelError),

    /// 存档/导出错误
    #[error("Repository error: {0}")]
    RepositoryError(String),
}

impl ApplicationError {
    /// 创建状态无效错误
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState(message.into())
    }

    /// 是否为生成后端错误
    pub fn is_generation(&self) -> bool {
        matches!(self, Self::Generation(_))
    }
}

impl From<RepositoryError> for ApplicationError {
    fn from(err: RepositoryError) -> Self {
        Self::RepositoryError(err.to_string())
    }
}
