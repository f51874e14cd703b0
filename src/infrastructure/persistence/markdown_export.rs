//! Markdown Exporter - 导出小说正文
//!
//! 实现 NovelExporterPort trait

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::application::ports::{NovelExporterPort, RepositoryError};
use crate::domain::novel::Novel;

/// 渲染 Markdown：`# 标题`，然后每章 `## Chapter N: 标题` + 正文
pub fn render_markdown(novel: &Novel) -> String {
    let mut markdown = format!("# {}\n\n", novel.title());
    for chapter in novel.chapters() {
        markdown.push_str(&format!(
            "## Chapter {}: {}\n\n{}\n\n",
            chapter.number(),
            chapter.title(),
            chapter.content()
        ));
    }
    markdown
}

/// Markdown 导出器
pub struct MarkdownExporter {
    /// 默认导出目录
    export_dir: PathBuf,
}

impl MarkdownExporter {
    pub fn new(export_dir: impl Into<PathBuf>) -> Self {
        Self {
            export_dir: export_dir.into(),
        }
    }

    /// 默认导出路径 `<export_dir>/<标题>.md`
    pub fn default_path(&self, novel: &Novel) -> PathBuf {
        self.export_dir.join(format!("{}.md", novel.file_stem()))
    }
}

#[async_trait]
impl NovelExporterPort for MarkdownExporter {
    async fn export(
        &self,
        novel: &Novel,
        output: Option<&Path>,
    ) -> Result<PathBuf, RepositoryError> {
        let path = output
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.default_path(novel));

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await?;
        }

        let markdown = render_markdown(novel);
        fs::write(&path, markdown.as_bytes()).await?;

        tracing::info!(
            path = %path.display(),
            chapters = novel.chapters().len(),
            "Novel exported"
        );

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::Chapter;

    fn novel() -> Novel {
        let mut novel = Novel::new("Salt Roads", "idea").unwrap();
        let mut first = Chapter::new(1, "Caravan").unwrap();
        first.record_draft("Camels at dawn.");
        first.apply_review(None);
        let mut third = Chapter::new(3, "Oasis").unwrap();
        third.record_draft("Water, finally.");
        third.apply_review(None);
        novel.set_chapters(vec![first, third]).unwrap();
        novel
    }

    #[test]
    fn test_render_markdown() {
        assert_eq!(
            render_markdown(&novel()),
            "# Salt Roads\n\n\
             ## Chapter 1: Caravan\n\nCamels at dawn.\n\n\
             ## Chapter 3: Oasis\n\nWater, finally.\n\n"
        );
    }

    #[tokio::test]
    async fn test_export_to_default_path() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownExporter::new(dir.path().join("out"));

        let path = exporter.export(&novel(), None).await.unwrap();

        assert_eq!(path, dir.path().join("out").join("Salt_Roads.md"));
        let written = fs::read_to_string(&path).await.unwrap();
        assert!(written.starts_with("# Salt Roads\n\n## Chapter 1: Caravan"));
    }

    #[tokio::test]
    async fn test_export_to_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let exporter = MarkdownExporter::new(dir.path());
        let target = dir.path().join("books").join("draft.md");

        let path = exporter.export(&novel(), Some(&target)).await.unwrap();

        assert_eq!(path, target);
        assert!(fs::try_exists(&target).await.unwrap());
    }
}
