//! Chapter Writing - 章节写作与审校
//!
//! 每个未完成的章节：写作 → 初稿（writing）→ 审校 → completed。
//! 已完成的章节被跳过，因此中断后重跑只会补写剩余章节。

use std::sync::Arc;

use super::Completion;
use crate::application::error::ApplicationError;
use crate::application::ports::{NovelRepositoryPort, TextGeneratorPort};
use crate::application::prompts::{
    render_record, NovelContext, CHAPTER_REVIEW, CHAPTER_WRITING, REVISED_CONTENT_MARKER,
};
use crate::domain::novel::{Chapter, Novel};

const STAGE: &str = "chapter_writing";

/// 章节写作结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterWritingReport {
    pub written: Vec<u32>,
    /// 审校给出修订稿的章节
    pub revised: Vec<u32>,
}

/// 章节写作执行器
pub struct ChapterWritingStage {
    completion: Completion,
}

impl ChapterWritingStage {
    pub fn new(generator: Arc<dyn TextGeneratorPort>, temperature: f32) -> Self {
        Self {
            completion: Completion::new(generator, temperature),
        }
    }

    /// 尚未完成的章节编号
    pub fn pending_chapters(novel: &Novel) -> Vec<u32> {
        novel
            .chapters()
            .iter()
            .filter(|c| !c.is_completed())
            .map(Chapter::number)
            .collect()
    }

    /// 依次写作并审校所有未完成章节
    ///
    /// 给出 `checkpoint` 时每完成一章保存一次快照
    pub async fn run(
        &self,
        novel: &mut Novel,
        checkpoint: Option<&dyn NovelRepositoryPort>,
    ) -> Result<ChapterWritingReport, ApplicationError> {
        let pending = Self::pending_chapters(novel);
        tracing::info!(
            pending = pending.len(),
            total = novel.chapters().len(),
            "Starting chapter writing"
        );

        let mut report = ChapterWritingReport::default();
        for number in pending {
            if self.write_chapter(novel, number).await? {
                report.revised.push(number);
            }
            report.written.push(number);
            if let Some(repository) = checkpoint {
                let path = repository.save(novel).await?;
                tracing::debug!(chapter = number, path = %path.display(), "Chapter checkpoint saved");
            }
        }
        Ok(report)
    }

    /// 写作单个章节并立即审校
    ///
    /// 返回审校是否替换了正文
    pub async fn write_chapter(
        &self,
        novel: &mut Novel,
        number: u32,
    ) -> Result<bool, ApplicationError> {
        let chapter = find_chapter(novel, number)?;
        let context = NovelContext::from_novel(novel);
        let chapter_number = number.to_string();
        let chapter_plan = render_record(chapter.plan());

        let prompt = CHAPTER_WRITING.render(&[
            ("novel_title", novel.title()),
            ("chapter_number", chapter_number.as_str()),
            ("chapter_title", chapter.title()),
            ("chapter_plan", chapter_plan.as_str()),
            ("style_guide", context.style_guide.as_str()),
            ("world_lore", context.world_lore.as_str()),
            ("plot", context.plot.as_str()),
            ("characters", context.characters.as_str()),
        ]);

        tracing::info!(chapter = number, title = %chapter.title(), "Writing chapter");
        let draft = self.completion.complete(STAGE, prompt).await?;
        find_chapter_mut(novel, number)?.record_draft(draft);

        self.review_chapter(novel, number).await
    }

    /// 审校单个章节
    ///
    /// 结果中出现修订标记时替换正文，否则正文保持不变；状态总是变为 completed
    pub async fn review_chapter(
        &self,
        novel: &mut Novel,
        number: u32,
    ) -> Result<bool, ApplicationError> {
        let chapter = find_chapter(novel, number)?;
        let context = NovelContext::from_novel(novel);
        let chapter_plan = render_record(chapter.plan());

        let prompt = CHAPTER_REVIEW.render(&[
            ("chapter_content", chapter.content()),
            ("chapter_plan", chapter_plan.as_str()),
            ("style_guide", context.style_guide.as_str()),
            ("world_lore", context.world_lore.as_str()),
            ("plot", context.plot.as_str()),
            ("characters", context.characters.as_str()),
        ]);

        let review = self.completion.complete(STAGE, prompt).await?;
        let revision = extract_revision(&review);
        let revised = revision.is_some();

        find_chapter_mut(novel, number)?.apply_review(revision);
        tracing::info!(chapter = number, revised = revised, "Chapter reviewed");
        Ok(revised)
    }
}

/// 取出修订标记（首次出现）之后的文本，去掉首尾空白
///
/// 标记不存在时返回 None；标记后为空时返回空字符串
pub fn extract_revision(review: &str) -> Option<String> {
    let (_, revised) = review.split_once(REVISED_CONTENT_MARKER)?;
    Some(revised.trim().to_string())
}

fn find_chapter(novel: &Novel, number: u32) -> Result<&Chapter, ApplicationError> {
    novel
        .get_chapter(number)
        .ok_or_else(|| ApplicationError::invalid_state(format!("chapter {} does not exist", number)))
}

fn find_chapter_mut(novel: &mut Novel, number: u32) -> Result<&mut Chapter, ApplicationError> {
    novel
        .chapters_mut()
        .iter_mut()
        .find(|c| c.number() == number)
        .ok_or_else(|| ApplicationError::invalid_state(format!("chapter {} does not exist", number)))
}
