//! Stage Executors - 阶段执行器
//!
//! 每个阶段：按当前 Novel 填充模板 → 调用生成后端 → 剥离推理前缀
//! → 解析/后处理 → 写回 Novel。只有生成后端错误会向上传播。

mod chapter_planning;
mod chapter_writing;
mod final_review;
mod idea_development;
mod planning;

pub use chapter_planning::{ChapterPlanningReport, ChapterPlanningStage};
pub use chapter_writing::{extract_revision, ChapterWritingReport, ChapterWritingStage};
pub use final_review::{render_chapters, FinalReviewStage};
pub use idea_development::{parse_questions, DevelopedIdea, IdeaDevelopmentStage};
pub use planning::{PlanningReport, PlanningStage};

use std::sync::Arc;

use crate::application::error::ApplicationError;
use crate::application::ports::{GenerateRequest, TextGeneratorPort};
use crate::domain::strip_reasoning;

/// 各阶段共用的生成调用
///
/// 统一剥离推理前缀，保证所有阶段对同一种模型输出的处理一致
#[derive(Clone)]
pub(crate) struct Completion {
    generator: Arc<dyn TextGeneratorPort>,
    temperature: f32,
}

impl Completion {
    pub(crate) fn new(generator: Arc<dyn TextGeneratorPort>, temperature: f32) -> Self {
        Self {
            generator,
            temperature,
        }
    }

    pub(crate) async fn complete(
        &self,
        stage: &'static str,
        prompt: String,
    ) -> Result<String, ApplicationError> {
        let request = GenerateRequest::new(prompt).with_temperature(self.temperature);
        let raw = self.generator.generate(request).await.map_err(|e| {
            tracing::error!(stage = stage, error = %e, "Generator call failed");
            ApplicationError::from(e)
        })?;
        let text = strip_reasoning(&raw);
        tracing::debug!(
            stage = stage,
            raw_len = raw.len(),
            text_len = text.len(),
            "Generator call completed"
        );
        Ok(text.to_string())
    }
}
