//! 应用层 - 用例编排
//!
//! 包含：
//! - ports: 六边形架构端口定义（TextGenerator、NovelRepository、NovelExporter）
//! - prompts: 各阶段的提示词模板
//! - stages: 阶段执行器
//! - pipeline: 流水线状态机
//! - error: 应用层错误定义

pub mod error;
pub mod pipeline;
pub mod ports;
pub mod prompts;
pub mod stages;

pub use error::ApplicationError;

pub use pipeline::{Pipeline, PipelineConfig, StageOutput, Transition};

pub use ports::{
    // Generator
    GenerateRequest,
    GeneratorError,
    TextGeneratorPort,
    // Repositories
    NovelExporterPort,
    NovelRepositoryPort,
    RepositoryError,
    SaveEntry,
};

pub use stages::{
    ChapterPlanningReport, ChapterPlanningStage, ChapterWritingReport, ChapterWritingStage,
    DevelopedIdea, FinalReviewStage, IdeaDevelopmentStage, PlanningReport, PlanningStage,
};
