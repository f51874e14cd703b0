//! Ollama Client - 调用本地 Ollama 生成服务
//!
//! 实现 TextGeneratorPort trait
//!
//! Ollama API:
//! POST http://localhost:11434/api/generate
//! Request: {"model": "...", "prompt": "...", "system": "...", "stream": false, "options": {"temperature": 0.7}}
//! Response: {"response": "...", ...}

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::application::ports::{GenerateRequest, GeneratorError, TextGeneratorPort};

/// 生成请求体 (JSON)
#[derive(Debug, Serialize)]
struct OllamaGenerateBody<'a> {
    model: &'a str,
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<&'a str>,
    /// 关闭流式输出，一次返回完整结果
    stream: bool,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// 生成响应体，只关心 response 字段
#[derive(Debug, Deserialize)]
struct OllamaGenerateResponse {
    response: String,
}

/// Ollama 客户端配置
#[derive(Debug, Clone)]
pub struct OllamaClientConfig {
    /// 服务基础 URL
    pub base_url: String,
    /// 模型名称
    pub model: String,
    /// 请求超时时间（秒），长章节生成可能需要数分钟
    pub timeout_secs: u64,
}

impl Default for OllamaClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:11434".to_string(),
            model: "mistral-nemo".to_string(),
            timeout_secs: 600,
        }
    }
}

impl OllamaClientConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            model: model.into(),
            ..Default::default()
        }
    }

    pub fn with_timeout(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }
}

/// Ollama 客户端
pub struct OllamaClient {
    client: Client,
    config: OllamaClientConfig,
}

impl OllamaClient {
    pub fn new(config: OllamaClientConfig) -> Result<Self, GeneratorError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| GeneratorError::NetworkError(e.to_string()))?;

        Ok(Self { client, config })
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }

    fn generate_url(&self) -> String {
        format!("{}/api/generate", self.config.base_url.trim_end_matches('/'))
    }

    fn tags_url(&self) -> String {
        format!("{}/api/tags", self.config.base_url.trim_end_matches('/'))
    }

    fn body<'a>(&'a self, request: &'a GenerateRequest) -> OllamaGenerateBody<'a> {
        OllamaGenerateBody {
            model: &self.config.model,
            prompt: &request.prompt,
            system: request.system.as_deref(),
            stream: false,
            options: OllamaOptions {
                temperature: request.temperature,
            },
        }
    }
}

#[async_trait]
impl TextGeneratorPort for OllamaClient {
    async fn generate(&self, request: GenerateRequest) -> Result<String, GeneratorError> {
        let body = self.body(&request);

        tracing::debug!(
            url = %self.generate_url(),
            model = %self.config.model,
            prompt_len = request.prompt.len(),
            temperature = request.temperature,
            "Sending generate request"
        );

        let response = self
            .client
            .post(self.generate_url())
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GeneratorError::Timeout
                } else if e.is_connect() {
                    GeneratorError::NetworkError(format!("Cannot connect to Ollama: {}", e))
                } else {
                    GeneratorError::NetworkError(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(GeneratorError::ServiceError(format!(
                "HTTP {}: {}",
                status, error_text
            )));
        }

        let parsed: OllamaGenerateResponse = response
            .json()
            .await
            .map_err(|e| GeneratorError::InvalidResponse(e.to_string()))?;

        tracing::info!(
            model = %self.config.model,
            response_len = parsed.response.len(),
            "Generation completed"
        );

        Ok(parsed.response)
    }

    async fn health_check(&self) -> bool {
        match self
            .client
            .get(self.tags_url())
            .timeout(Duration::from_secs(5))
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_default() {
        let config = OllamaClientConfig::default();
        assert_eq!(config.base_url, "http://localhost:11434");
        assert_eq!(config.model, "mistral-nemo");
        assert_eq!(config.timeout_secs, 600);
    }

    #[test]
    fn test_config_builder() {
        let config = OllamaClientConfig::new("http://gpu-box:11434/", "llama3").with_timeout(60);
        let client = OllamaClient::new(config).unwrap();
        assert_eq!(client.model(), "llama3");
        assert_eq!(client.generate_url(), "http://gpu-box:11434/api/generate");
        assert_eq!(client.tags_url(), "http://gpu-box:11434/api/tags");
    }

    #[test]
    fn test_request_body_shape() {
        let client = OllamaClient::new(OllamaClientConfig::default()).unwrap();
        let request = GenerateRequest::new("Tell a story").with_temperature(0.5);

        let body = serde_json::to_value(client.body(&request)).unwrap();
        assert_eq!(
            body,
            serde_json::json!({
                "model": "mistral-nemo",
                "prompt": "Tell a story",
                "stream": false,
                "options": {"temperature": 0.5}
            })
        );

        let request = request.with_system("Be brief");
        let body = serde_json::to_value(client.body(&request)).unwrap();
        assert_eq!(body["system"], "Be brief");
    }

    #[test]
    fn test_response_ignores_extra_fields() {
        let parsed: OllamaGenerateResponse =
            serde_json::from_str(r#"{"model": "m", "response": "Once upon", "done": true}"#)
                .unwrap();
        assert_eq!(parsed.response, "Once upon");
    }

    #[tokio::test]
    async fn test_unreachable_service_is_network_error() {
        let config = OllamaClientConfig::new("http://127.0.0.1:9", "m").with_timeout(5);
        let client = OllamaClient::new(config).unwrap();

        let result = client.generate(GenerateRequest::new("hi")).await;

        assert!(matches!(
            result,
            Err(GeneratorError::NetworkError(_)) | Err(GeneratorError::Timeout)
        ));
        assert!(!client.health_check().await);
    }
}
