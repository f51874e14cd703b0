//! Repository Ports - 出站端口
//!
//! 定义小说存档与导出的抽象接口
//! 具体实现在 infrastructure 层（文件存储、Markdown 导出）

use async_trait::async_trait;
use chrono::NaiveDateTime;
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::domain::novel::Novel;

/// Repository 错误
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Save not found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),

    #[error("IO error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for RepositoryError {
    fn from(err: std::io::Error) -> Self {
        Self::IoError(err.to_string())
    }
}

/// 存档条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveEntry {
    /// 存档文件路径
    pub path: PathBuf,
    /// 不带扩展名的文件名，如 `My_Novel_20250101_120000`
    pub name: String,
}

impl SaveEntry {
    /// 文件名末尾 `_YYYYMMDD_HHMMSS` 表示的保存时间
    pub fn saved_at(&self) -> Option<NaiveDateTime> {
        let suffix = self.name.get(self.name.len().checked_sub(15)?..)?;
        NaiveDateTime::parse_from_str(suffix, "%Y%m%d_%H%M%S").ok()
    }
}

/// Novel Repository Port
///
/// 每次保存都是整个聚合的完整快照，写入一个新文件
#[async_trait]
pub trait NovelRepositoryPort: Send + Sync {
    /// 保存快照，返回存档路径
    async fn save(&self, novel: &Novel) -> Result<PathBuf, RepositoryError>;

    /// 从存档路径加载
    async fn load(&self, path: &Path) -> Result<Novel, RepositoryError>;

    /// 列出所有存档（按文件名排序）
    async fn list_saves(&self) -> Result<Vec<SaveEntry>, RepositoryError>;

    /// 最新的存档：按文件名中的保存时间比较，与标题无关
    ///
    /// 时间相同时取文件名较大者；没有时间后缀的存档排在最前
    async fn latest(&self) -> Result<Option<SaveEntry>, RepositoryError> {
        Ok(self.list_saves().await?.into_iter().max_by(|a, b| {
            a.saved_at()
                .cmp(&b.saved_at())
                .then_with(|| a.name.cmp(&b.name))
        }))
    }
}

/// Novel Exporter Port
#[async_trait]
pub trait NovelExporterPort: Send + Sync {
    /// 导出小说正文，返回输出路径
    ///
    /// `output` 为空时使用实现的默认路径
    async fn export(&self, novel: &Novel, output: Option<&Path>)
        -> Result<PathBuf, RepositoryError>;
}
