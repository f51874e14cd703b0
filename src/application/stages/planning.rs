//! Planning - 规划阶段
//!
//! 固定顺序的四个子阶段：风格指南 → 世界观 → 情节 → 角色。
//! 每个子阶段开始前，其依赖必须已经写入 Novel。

use std::collections::BTreeMap;
use std::sync::Arc;

use super::Completion;
use crate::application::error::ApplicationError;
use crate::application::ports::TextGeneratorPort;
use crate::application::prompts::{render_record, CHARACTERS, PLOT, STYLE_GUIDE, WORLD_LORE};
use crate::domain::novel::{Character, Novel, Plot, StyleGuide, WorldLore};
use crate::domain::structured_output::{parse_or_fallback, Parsed, StructuredRecord};

const STAGE: &str = "planning";

/// 规划阶段结果
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PlanningReport {
    /// 走了回退提取的记录类型
    pub degraded: Vec<&'static str>,
    pub character_count: usize,
}

/// 规划阶段执行器
pub struct PlanningStage {
    completion: Completion,
}

impl PlanningStage {
    pub fn new(generator: Arc<dyn TextGeneratorPort>, temperature: f32) -> Self {
        Self {
            completion: Completion::new(generator, temperature),
        }
    }

    /// 依次执行四个子阶段，每个结果立即写入 Novel
    pub async fn run(&self, novel: &mut Novel) -> Result<PlanningReport, ApplicationError> {
        let mut report = PlanningReport::default();

        let style_guide = self.develop_style_guide(novel).await?;
        note_degraded(&mut report, &style_guide);
        novel.set_style_guide(style_guide.value);
        tracing::info!("Style guide generated");

        let world_lore = self.develop_world_lore(novel).await?;
        note_degraded(&mut report, &world_lore);
        novel.set_world_lore(world_lore.value);
        tracing::info!("World lore generated");

        let plot = self.develop_plot(novel).await?;
        note_degraded(&mut report, &plot);
        novel.set_plot(plot.value);
        tracing::info!("Plot generated");

        let characters = self.develop_characters(novel).await?;
        note_degraded(&mut report, &characters);
        report.character_count = characters.value.len();
        novel.set_characters(characters.value);
        tracing::info!(count = report.character_count, "Characters generated");

        Ok(report)
    }

    pub async fn develop_style_guide(
        &self,
        novel: &Novel,
    ) -> Result<Parsed<StyleGuide>, ApplicationError> {
        let prompt = STYLE_GUIDE.render(&[("idea", novel.idea())]);
        self.generate_record(prompt).await
    }

    /// 依赖：风格指南
    pub async fn develop_world_lore(
        &self,
        novel: &Novel,
    ) -> Result<Parsed<WorldLore>, ApplicationError> {
        let style_guide = render_record(Some(require(novel.style_guide(), "style guide")?));
        let prompt = WORLD_LORE.render(&[
            ("idea", novel.idea()),
            ("style_guide", style_guide.as_str()),
        ]);
        self.generate_record(prompt).await
    }

    /// 依赖：世界观、风格指南
    pub async fn develop_plot(&self, novel: &Novel) -> Result<Parsed<Plot>, ApplicationError> {
        let world_lore = render_record(Some(require(novel.world_lore(), "world lore")?));
        let style_guide = render_record(Some(require(novel.style_guide(), "style guide")?));
        let prompt = PLOT.render(&[
            ("idea", novel.idea()),
            ("world_lore", world_lore.as_str()),
            ("style_guide", style_guide.as_str()),
        ]);
        self.generate_record(prompt).await
    }

    /// 依赖：情节、世界观、风格指南
    pub async fn develop_characters(
        &self,
        novel: &Novel,
    ) -> Result<Parsed<BTreeMap<String, Character>>, ApplicationError> {
        let plot = render_record(Some(require(novel.plot(), "plot")?));
        let world_lore = render_record(Some(require(novel.world_lore(), "world lore")?));
        let style_guide = render_record(Some(require(novel.style_guide(), "style guide")?));
        let prompt = CHARACTERS.render(&[
            ("idea", novel.idea()),
            ("plot", plot.as_str()),
            ("world_lore", world_lore.as_str()),
            ("style_guide", style_guide.as_str()),
        ]);
        self.generate_record(prompt).await
    }

    async fn generate_record<T: StructuredRecord>(
        &self,
        prompt: String,
    ) -> Result<Parsed<T>, ApplicationError> {
        let text = self.completion.complete(STAGE, prompt).await?;
        Ok(parse_or_fallback(&text))
    }
}

fn require<'a, T>(record: Option<&'a T>, what: &str) -> Result<&'a T, ApplicationError> {
    record.ok_or_else(|| ApplicationError::invalid_state(format!("{} has not been generated yet", what)))
}

fn note_degraded<T: StructuredRecord>(report: &mut PlanningReport, parsed: &Parsed<T>) {
    if parsed.degraded {
        report.degraded.push(T::KIND);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::structured_output::PLACEHOLDER;
    use crate::infrastructure::adapters::ScriptedGenerator;

    fn planned_responses() -> Vec<&'static str> {
        vec![
            r#"{"tone": "tense", "language": "plain", "narrative_style": "linear", "pov": "third", "tense": "past", "themes": ["trust"]}"#,
            r#"{"setting": "A space station", "locations": {"Hub": "the core ring"}}"#,
            "Main Plot: Sabotage aboard the station\nSubplots: [A smuggling ring]",
            r#"{"Ada": {"description": "Engineer", "relationships": {"Ben": "rival"}}, "Ben": {"name": "Ben", "arc": "Redemption"}}"#,
        ]
    }

    #[tokio::test]
    async fn test_run_populates_all_records() {
        let generator = Arc::new(ScriptedGenerator::from_queue(planned_responses()));
        let stage = PlanningStage::new(generator.clone(), 0.7);
        let mut novel = Novel::new("Station", "a mystery in orbit").unwrap();

        let report = stage.run(&mut novel).await.unwrap();

        assert_eq!(generator.call_count(), 4);
        assert_eq!(report.degraded, vec!["plot"]);
        assert_eq!(report.character_count, 2);

        assert_eq!(novel.style_guide().unwrap().tone, "tense");
        assert_eq!(novel.world_lore().unwrap().locations["Hub"], "the core ring");

        let plot = novel.plot().unwrap();
        assert_eq!(plot.main_plot, "Sabotage aboard the station");
        assert_eq!(plot.subplots, vec!["A smuggling ring"]);
        assert!(plot.arcs.is_empty());

        assert_eq!(novel.characters()["Ada"].name, "Ada");
        assert_eq!(novel.characters()["Ada"].relationships["Ben"], "rival");

        // 后续子阶段的提示词包含前面生成的记录
        let requests = generator.requests();
        assert!(requests[1].prompt.contains("\"tone\": \"tense\""));
        assert!(requests[3].prompt.contains("Sabotage aboard the station"));
    }

    #[tokio::test]
    async fn test_unparsable_output_degrades_without_error() {
        let generator = Arc::new(ScriptedGenerator::replying("I cannot comply."));
        let stage = PlanningStage::new(generator, 0.7);
        let mut novel = Novel::new("Station", "idea").unwrap();

        let report = stage.run(&mut novel).await.unwrap();

        assert_eq!(
            report.degraded,
            vec!["style_guide", "world_lore", "plot", "characters"]
        );
        assert_eq!(novel.style_guide().unwrap().tone, PLACEHOLDER);
        assert_eq!(novel.world_lore().unwrap().setting, PLACEHOLDER);
        assert_eq!(novel.plot().unwrap().main_plot, PLACEHOLDER);
        assert!(novel.characters().is_empty());
    }

    #[tokio::test]
    async fn test_missing_dependency_is_invalid_state() {
        let generator = Arc::new(ScriptedGenerator::replying("{}"));
        let stage = PlanningStage::new(generator.clone(), 0.7);
        let novel = Novel::new("Station", "idea").unwrap();

        let result = stage.develop_plot(&novel).await;

        assert!(matches!(result, Err(ApplicationError::InvalidState(_))));
        assert_eq!(generator.call_count(), 0);
    }
}
