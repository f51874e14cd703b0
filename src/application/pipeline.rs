//! Pipeline - 生成流水线状态机
//!
//! idea → planning → writing → reviewing → completed
//!
//! 每个状态对应一个处理函数：运行该状态的阶段执行器，然后前进一步。
//! 显式操作（develop_idea、plan_novel …）先检查前置状态，不满足时
//! 返回 InvalidState 且不改变任何状态。

use std::path::PathBuf;
use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{NovelRepositoryPort, TextGeneratorPort, DEFAULT_TEMPERATURE};
use crate::application::stages::{
    ChapterPlanningReport, ChapterPlanningStage, ChapterWritingReport, ChapterWritingStage,
    DevelopedIdea, FinalReviewStage, IdeaDevelopmentStage, PlanningReport, PlanningStage,
};
use crate::domain::novel::{Novel, NovelStatus};

/// 流水线配置
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// 章节规划的编号上限
    pub max_chapters: u32,
    pub temperature: f32,
    /// 每个阶段（以及每个章节）完成后保存快照
    pub autosave: bool,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            max_chapters: 10,
            temperature: DEFAULT_TEMPERATURE,
            autosave: true,
        }
    }
}

/// 各状态处理函数的产出
#[derive(Debug, Clone)]
pub enum StageOutput {
    IdeaDeveloped(DevelopedIdea),
    Planned(PlanningReport),
    ChaptersWritten {
        /// 本次自动执行的章节规划（已有章节时为 None）
        planning: Option<ChapterPlanningReport>,
        writing: ChapterWritingReport,
    },
    Reviewed {
        critique: String,
    },
}

/// 一次状态转移
#[derive(Debug, Clone)]
pub struct Transition {
    pub from: NovelStatus,
    pub to: NovelStatus,
    pub output: StageOutput,
    /// 自动保存的存档路径
    pub checkpoint: Option<PathBuf>,
}

/// 生成流水线
pub struct Pipeline {
    idea: IdeaDevelopmentStage,
    planning: PlanningStage,
    chapter_planning: ChapterPlanningStage,
    chapter_writing: ChapterWritingStage,
    final_review: FinalReviewStage,
    repository: Option<Arc<dyn NovelRepositoryPort>>,
    autosave: bool,
}

impl Pipeline {
    pub fn new(generator: Arc<dyn TextGeneratorPort>, config: PipelineConfig) -> Self {
        let temperature = config.temperature;
        Self {
            idea: IdeaDevelopmentStage::new(generator.clone(), temperature),
            planning: PlanningStage::new(generator.clone(), temperature),
            chapter_planning: ChapterPlanningStage::new(
                generator.clone(),
                temperature,
                config.max_chapters,
            ),
            chapter_writing: ChapterWritingStage::new(generator.clone(), temperature),
            final_review: FinalReviewStage::new(generator, temperature),
            repository: None,
            autosave: config.autosave,
        }
    }

    /// 设置存档仓库（自动保存需要）
    pub fn with_repository(mut self, repository: Arc<dyn NovelRepositoryPort>) -> Self {
        self.repository = Some(repository);
        self
    }

    /// 运行当前状态的处理函数
    pub async fn step(&self, novel: &mut Novel) -> Result<Transition, ApplicationError> {
        match novel.status() {
            NovelStatus::Idea => self.develop_idea(novel).await,
            NovelStatus::Planning => self.plan_novel(novel).await,
            NovelStatus::Writing => self.write_chapters(novel).await,
            NovelStatus::Reviewing => self.final_review(novel).await,
            NovelStatus::Completed => Err(ApplicationError::invalid_state(
                "novel is already completed",
            )),
        }
    }

    /// 反复 step 直到到达目标状态
    ///
    /// 当前状态已经达到或越过目标时不做任何事
    pub async fn run_until(
        &self,
        novel: &mut Novel,
        target: NovelStatus,
    ) -> Result<Vec<Transition>, ApplicationError> {
        let mut transitions = Vec::new();
        while novel.status() < target {
            transitions.push(self.step(novel).await?);
        }
        Ok(transitions)
    }

    /// idea → planning
    pub async fn develop_idea(&self, novel: &mut Novel) -> Result<Transition, ApplicationError> {
        require_status(novel, NovelStatus::Idea, "develop idea")?;
        let developed = self.idea.run(novel).await?;
        self.finish(novel, StageOutput::IdeaDeveloped(developed)).await
    }

    /// planning → writing
    pub async fn plan_novel(&self, novel: &mut Novel) -> Result<Transition, ApplicationError> {
        require_status(novel, NovelStatus::Planning, "plan novel")?;
        let report = self.planning.run(novel).await?;
        self.finish(novel, StageOutput::Planned(report)).await
    }

    /// 在 writing 状态下（重新）规划章节，不改变状态
    ///
    /// 会替换现有章节列表，包括已写好的章节
    pub async fn plan_chapters(
        &self,
        novel: &mut Novel,
    ) -> Result<ChapterPlanningReport, ApplicationError> {
        require_status(novel, NovelStatus::Writing, "plan chapters")?;
        let report = self.chapter_planning.run(novel).await?;
        self.checkpoint(novel).await?;
        Ok(report)
    }

    /// writing → reviewing
    ///
    /// 没有章节时先执行章节规划；每写完一章保存一次快照
    pub async fn write_chapters(&self, novel: &mut Novel) -> Result<Transition, ApplicationError> {
        require_status(novel, NovelStatus::Writing, "write chapters")?;

        let planning = if novel.chapters().is_empty() {
            Some(self.plan_chapters(novel).await?)
        } else {
            None
        };
        if novel.chapters().is_empty() {
            return Err(ApplicationError::invalid_state(
                "no chapter could be planned",
            ));
        }

        let writing = self
            .chapter_writing
            .run(novel, self.autosave_repository())
            .await?;

        self.finish(novel, StageOutput::ChaptersWritten { planning, writing })
            .await
    }

    /// reviewing → completed
    pub async fn final_review(&self, novel: &mut Novel) -> Result<Transition, ApplicationError> {
        require_status(novel, NovelStatus::Reviewing, "final review")?;
        let critique = self.final_review.run(novel).await?;
        self.finish(novel, StageOutput::Reviewed { critique }).await
    }

    async fn finish(
        &self,
        novel: &mut Novel,
        output: StageOutput,
    ) -> Result<Transition, ApplicationError> {
        let from = novel.status();
        let to = from
            .next()
            .ok_or_else(|| ApplicationError::invalid_state("novel is already completed"))?;
        novel.advance_to(to)?;
        tracing::info!(title = %novel.title(), from = %from, to = %to, "Pipeline transition");

        let checkpoint = self.checkpoint(novel).await?;
        Ok(Transition {
            from,
            to,
            output,
            checkpoint,
        })
    }

    fn autosave_repository(&self) -> Option<&dyn NovelRepositoryPort> {
        self.repository.as_deref().filter(|_| self.autosave)
    }

    async fn checkpoint(&self, novel: &Novel) -> Result<Option<PathBuf>, ApplicationError> {
        match self.autosave_repository() {
            Some(repository) => {
                let path = repository.save(novel).await?;
                tracing::debug!(path = %path.display(), "Checkpoint saved");
                Ok(Some(path))
            }
            None => Ok(None),
        }
    }
}

fn require_status(
    novel: &Novel,
    expected: NovelStatus,
    operation: &str,
) -> Result<(), ApplicationError> {
    if novel.status() != expected {
        tracing::warn!(
            operation = operation,
            status = %novel.status(),
            expected = %expected,
            "Operation not allowed in current status"
        );
        return Err(ApplicationError::invalid_state(format!(
            "cannot {} while novel is '{}' (requires '{}')",
            operation,
            novel.status(),
            expected
        )));
    }
    Ok(())
}
