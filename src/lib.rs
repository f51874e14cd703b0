//! Novelist - LLM 驱动的长篇小说生成流水线
//!
//! 架构设计: DDD + Hexagonal Architecture
//!
//! 领域层 (domain/):
//! - Novel Context: 小说聚合及其产物（风格指南、世界观、情节、角色、章节）
//! - Structured Output: 模型输出 → 类型化记录（严格解析 + 标签回退）
//! - Reasoning: 推理前缀剥离
//!
//! 应用层 (application/):
//! - Ports: TextGenerator、NovelRepository、NovelExporter
//! - Prompts: 各阶段提示词模板
//! - Stages: 阶段执行器
//! - Pipeline: 状态机 idea → planning → writing → reviewing → completed
//!
//! 基础设施层 (infrastructure/):
//! - Adapters: Ollama 客户端、脚本化生成器
//! - Persistence: bincode 存档、Markdown 导出

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::{load_config, AppConfig};
