//! Domain Layer - 领域层
//!
//! - Novel Context: 小说聚合与创作产物
//! - structured_output: 模型输出 → 类型化记录
//! - reasoning: 推理前缀剥离

pub mod novel;
pub mod structured_output;

mod reasoning;

pub use reasoning::{strip_reasoning, REASONING_CLOSE_TAG};
