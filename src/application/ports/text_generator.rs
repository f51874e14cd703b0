//! Text Generator Port - 文本生成后端抽象
//!
//! 定义 `generate(prompt, system?, temperature) -> text` 的抽象接口，
//! 具体实现在 infrastructure/adapters 层

use async_trait::async_trait;
use thiserror::Error;

/// 生成后端错误
///
/// 这些错误不会被阶段执行器吞掉，而是一直传播到驱动层
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("Request timeout")]
    Timeout,

    #[error("Service error: {0}")]
    ServiceError(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// 默认采样温度
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// 生成请求
#[derive(Debug, Clone, PartialEq)]
pub struct GenerateRequest {
    /// 完整提示词
    pub prompt: String,
    /// 可选的系统指令
    pub system: Option<String>,
    /// 采样温度
    pub temperature: f32,
}

impl GenerateRequest {
    pub fn new(prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system: None,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    pub fn with_system(mut self, system: impl Into<String>) -> Self {
        self.system = Some(system.into());
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }
}

/// Text Generator Port
///
/// 外部文本生成服务的抽象接口
#[async_trait]
pub trait TextGeneratorPort: Send + Sync {
    /// 生成文本，返回模型的原始输出
    async fn generate(&self, request: GenerateRequest) -> Result<String, GeneratorError>;

    /// 检查后端是否可用
    async fn health_check(&self) -> bool {
        true // 默认实现
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerateRequest::new("Write a haiku")
            .with_system("You are a poet")
            .with_temperature(0.2);
        assert_eq!(request.prompt, "Write a haiku");
        assert_eq!(request.system.as_deref(), Some("You are a poet"));
        assert_eq!(request.temperature, 0.2);
    }

    #[test]
    fn test_request_defaults() {
        let request = GenerateRequest::new("p");
        assert!(request.system.is_none());
        assert_eq!(request.temperature, DEFAULT_TEMPERATURE);
    }
}
