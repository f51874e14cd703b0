//! Application Ports - 出站端口定义
//!
//! 定义应用层与基础设施层的抽象接口

mod repositories;
mod text_generator;

pub use repositories::{NovelExporterPort, NovelRepositoryPort, RepositoryError, SaveEntry};
pub use text_generator::{GenerateRequest, GeneratorError, TextGeneratorPort, DEFAULT_TEMPERATURE};
