//! Scripted Generator - 用于测试与离线演练的生成后端
//!
//! 不调用任何服务：按提示词计算回复，或依次弹出预设回复。
//! 所有请求都会被记录下来供断言使用。

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

use crate::application::ports::{GenerateRequest, GeneratorError, TextGeneratorPort};

type Responder = Box<dyn Fn(&str) -> Result<String, GeneratorError> + Send + Sync>;

/// Scripted Generator
pub struct ScriptedGenerator {
    responder: Responder,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedGenerator {
    /// 由提示词计算回复
    pub fn new<F>(reply: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        Self::with_responder(Box::new(move |prompt| Ok(reply(prompt))))
    }

    /// 每次都返回同一段文本
    pub fn replying(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| text.clone())
    }

    /// 依次返回预设回复，用完后返回 ServiceError
    pub fn from_queue<I, S>(responses: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let queue: Mutex<VecDeque<String>> =
            Mutex::new(responses.into_iter().map(Into::into).collect());
        Self::with_responder(Box::new(move |_| {
            let mut queue = queue
                .lock()
                .map_err(|_| GeneratorError::ServiceError("response queue poisoned".to_string()))?;
            queue
                .pop_front()
                .ok_or_else(|| GeneratorError::ServiceError("no scripted response left".to_string()))
        }))
    }

    fn with_responder(responder: Responder) -> Self {
        Self {
            responder,
            requests: Mutex::new(Vec::new()),
        }
    }

    /// 已收到的请求（按调用顺序）
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or_default()
    }
}

#[async_trait]
impl TextGeneratorPort for ScriptedGenerator {
    async fn generate(&self, request: GenerateRequest) -> Result<String, GeneratorError> {
        tracing::debug!(
            prompt_len = request.prompt.len(),
            "ScriptedGenerator: producing scripted reply"
        );

        let reply = (self.responder)(&request.prompt);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request);
        }
        reply
    }
}
