//! File Novel Store - 文件系统存档实现
//!
//! 实现 NovelRepositoryPort trait
//!
//! 每次保存写入一个新文件：`<标题(空格→下划线)>_<YYYYMMDD_HHMMSS>.bin`，
//! 内容为整个 Novel 聚合的 bincode 编码。

use async_trait::async_trait;
use chrono::{DateTime, Local};
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{NovelRepositoryPort, RepositoryError, SaveEntry};
use crate::domain::novel::Novel;

/// 存档文件扩展名
pub const SAVE_EXTENSION: &str = "bin";

/// 存档文件名
pub fn save_file_name(novel: &Novel, at: DateTime<Local>) -> String {
    format!(
        "{}_{}.{}",
        novel.file_stem(),
        at.format("%Y%m%d_%H%M%S"),
        SAVE_EXTENSION
    )
}

/// 文件系统存档
pub struct FileNovelStore {
    /// 存档目录
    save_dir: PathBuf,
}

impl FileNovelStore {
    /// 创建存档，确保目录存在
    pub async fn new(save_dir: impl AsRef<Path>) -> Result<Self, RepositoryError> {
        let save_dir = save_dir.as_ref().to_path_buf();
        fs::create_dir_all(&save_dir).await?;
        Ok(Self { save_dir })
    }

    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// 解析命令行给出的存档：已存在的路径、存档名（可省略扩展名）
    pub async fn resolve(&self, name_or_path: &str) -> Result<PathBuf, RepositoryError> {
        let direct = PathBuf::from(name_or_path);
        if fs::try_exists(&direct).await.unwrap_or(false) {
            return Ok(direct);
        }

        let mut candidate = self.save_dir.join(name_or_path);
        if candidate.extension().map_or(true, |ext| ext != SAVE_EXTENSION) {
            candidate = self
                .save_dir
                .join(format!("{}.{}", name_or_path, SAVE_EXTENSION));
        }
        if fs::try_exists(&candidate).await.unwrap_or(false) {
            return Ok(candidate);
        }

        Err(RepositoryError::NotFound(name_or_path.to_string()))
    }
}

#[async_trait]
impl NovelRepositoryPort for FileNovelStore {
    async fn save(&self, novel: &Novel) -> Result<PathBuf, RepositoryError> {
        let bytes = bincode::serialize(novel)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        let path = self.save_dir.join(save_file_name(novel, Local::now()));
        // 先写临时文件再改名，避免留下半个存档
        let tmp_path = path.with_extension("tmp");
        fs::write(&tmp_path, &bytes).await?;
        fs::rename(&tmp_path, &path).await?;

        tracing::info!(
            path = %path.display(),
            status = %novel.status(),
            size = bytes.len(),
            "Novel saved"
        );

        Ok(path)
    }

    async fn load(&self, path: &Path) -> Result<Novel, RepositoryError> {
        let bytes = match fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(RepositoryError::NotFound(path.display().to_string()));
            }
            Err(e) => return Err(e.into()),
        };

        let novel: Novel = bincode::deserialize(&bytes)
            .map_err(|e| RepositoryError::SerializationError(e.to_string()))?;

        tracing::info!(
            path = %path.display(),
            title = %novel.title(),
            status = %novel.status(),
            "Novel loaded"
        );

        Ok(novel)
    }

    async fn list_saves(&self) -> Result<Vec<SaveEntry>, RepositoryError> {
        let mut saves = Vec::new();
        let mut entries = fs::read_dir(&self.save_dir).await?;

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            if path.extension().map_or(false, |ext| ext == SAVE_EXTENSION) {
                let name = path
                    .file_stem()
                    .map(|stem| stem.to_string_lossy().to_string())
                    .unwrap_or_default();
                saves.push(SaveEntry { path, name });
            }
        }

        saves.sort_by(|a, b| a.path.file_name().cmp(&b.path.file_name()));
        Ok(saves)
    }
}
