//! Final Review - 终审
//!
//! 一次调用，返回评审文本；不修改 Novel。

use std::sync::Arc;

use super::Completion;
use crate::application::error::ApplicationError;
use crate::application::ports::TextGeneratorPort;
use crate::application::prompts::{NovelContext, FINAL_REVIEW};
use crate::domain::novel::Novel;

const STAGE: &str = "final_review";

pub struct FinalReviewStage {
    completion: Completion,
}

impl FinalReviewStage {
    pub fn new(generator: Arc<dyn TextGeneratorPort>, temperature: f32) -> Self {
        Self {
            completion: Completion::new(generator, temperature),
        }
    }

    pub async fn run(&self, novel: &Novel) -> Result<String, ApplicationError> {
        let context = NovelContext::from_novel(novel);
        let chapters = render_chapters(novel);

        let prompt = FINAL_REVIEW.render(&[
            ("novel_title", novel.title()),
            ("novel_idea", novel.idea()),
            ("style_guide", context.style_guide.as_str()),
            ("world_lore", context.world_lore.as_str()),
            ("plot", context.plot.as_str()),
            ("characters", context.characters.as_str()),
            ("chapters", chapters.as_str()),
        ]);

        tracing::info!(chapters = novel.chapters().len(), "Starting final review");
        let critique = self.completion.complete(STAGE, prompt).await?;
        tracing::info!(critique_len = critique.len(), "Final review completed");
        Ok(critique)
    }
}

/// 全部章节正文：每章 `Chapter N:` 标题，章节之间空一行
pub fn render_chapters(novel: &Novel) -> String {
    novel
        .chapters()
        .iter()
        .map(|c| format!("Chapter {}:\n{}", c.number(), c.content()))
        .collect::<Vec<_>>()
        .join("\n\n")
}
