//! Chapter Planning - 章节规划
//!
//! 对 1..=max_chapters 的每个编号请求一份章节计划。
//! 只走严格解析；解析失败的编号直接跳过，不重试也不填充占位。

use std::sync::Arc;

use super::Completion;
use crate::application::error::ApplicationError;
use crate::application::ports::TextGeneratorPort;
use crate::application::prompts::{NovelContext, CHAPTER_PLAN};
use crate::domain::novel::{Chapter, ChapterPlan, Novel};
use crate::domain::structured_output::parse_strict;

const STAGE: &str = "chapter_planning";

/// 章节规划结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChapterPlanningReport {
    pub planned: Vec<u32>,
    pub skipped: Vec<u32>,
}

/// 章节规划执行器
pub struct ChapterPlanningStage {
    completion: Completion,
    max_chapters: u32,
}

impl ChapterPlanningStage {
    pub fn new(generator: Arc<dyn TextGeneratorPort>, temperature: f32, max_chapters: u32) -> Self {
        Self {
            completion: Completion::new(generator, temperature),
            max_chapters,
        }
    }

    /// 生成章节列表并替换 Novel.chapters
    ///
    /// 任一生成调用失败时 Novel 保持原样
    pub async fn run(&self, novel: &mut Novel) -> Result<ChapterPlanningReport, ApplicationError> {
        let context = NovelContext::from_novel(novel);
        let mut report = ChapterPlanningReport::default();
        let mut chapters = Vec::new();

        for number in 1..=self.max_chapters {
            let chapter_number = number.to_string();
            let prompt = CHAPTER_PLAN.render(&[
                ("novel_title", novel.title()),
                ("idea", novel.idea()),
                ("style_guide", context.style_guide.as_str()),
                ("world_lore", context.world_lore.as_str()),
                ("plot", context.plot.as_str()),
                ("characters", context.characters.as_str()),
                ("chapter_number", chapter_number.as_str()),
            ]);
            let text = self.completion.complete(STAGE, prompt).await?;

            match parse_strict::<ChapterPlan>(&text) {
                Ok(plan) => {
                    tracing::info!(chapter = number, title = %plan.title, "Chapter planned");
                    chapters.push(Chapter::planned(number, plan)?);
                    report.planned.push(number);
                }
                Err(e) => {
                    tracing::warn!(chapter = number, error = %e, "Chapter plan unparsable, skipping");
                    report.skipped.push(number);
                }
            }
        }

        novel.set_chapters(chapters)?;
        tracing::info!(
            planned = report.planned.len(),
            skipped = report.skipped.len(),
            "Chapter planning completed"
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::novel::ChapterStatus;
    use crate::infrastructure::adapters::ScriptedGenerator;

    fn plan_reply(request: &str) -> String {
        if request.contains("For chapter 3,") {
            return "Chapter three will be about the storm.".to_string();
        }
        let number = request
            .split("For chapter ")
            .nth(1)
            .and_then(|rest| rest.split(',').next())
            .unwrap_or("?");
        format!(
            r#"{{"title": "Part {number}", "summary": "s", "scenes": ["a"], "pov_character": "Ada", "goals": [], "conflicts": [], "resolutions": []}}"#
        )
    }

    #[tokio::test]
    async fn test_unparsable_index_leaves_gap() {
        let generator = Arc::new(ScriptedGenerator::new(plan_reply));
        let stage = ChapterPlanningStage::new(generator.clone(), 0.7, 10);
        let mut novel = Novel::new("Storm", "idea").unwrap();

        let report = stage.run(&mut novel).await.unwrap();

        assert_eq!(generator.call_count(), 10);
        assert_eq!(report.skipped, vec![3]);

        let numbers: Vec<u32> = novel.chapters().iter().map(|c| c.number()).collect();
        assert_eq!(numbers, vec![1, 2, 4, 5, 6, 7, 8, 9, 10]);
        for chapter in novel.chapters() {
            let plan = chapter.plan().unwrap();
            assert_eq!(plan.title, format!("Part {}", chapter.number()));
            assert_eq!(chapter.title(), plan.title);
            assert_eq!(chapter.status(), ChapterStatus::Planned);
        }
    }

    #[tokio::test]
    async fn test_replaces_existing_chapters() {
        let generator = Arc::new(ScriptedGenerator::new(plan_reply));
        let stage = ChapterPlanningStage::new(generator, 0.7, 2);
        let mut novel = Novel::new("Storm", "idea").unwrap();
        novel
            .set_chapters(vec![Chapter::new(7, "Old").unwrap()])
            .unwrap();

        stage.run(&mut novel).await.unwrap();

        assert_eq!(novel.chapters().len(), 2);
        assert!(novel.get_chapter(7).is_none());
    }

    #[tokio::test]
    async fn test_fenced_json_is_accepted() {
        let generator = Arc::new(ScriptedGenerator::replying(
            "<think>plan it</think>\n```json\n{\"title\": \"Opening\"}\n```",
        ));
        let stage = ChapterPlanningStage::new(generator, 0.7, 1);
        let mut novel = Novel::new("Storm", "idea").unwrap();

        let report = stage.run(&mut novel).await.unwrap();

        assert_eq!(report.planned, vec![1]);
        assert_eq!(novel.chapters()[0].title(), "Opening");
    }
}
