//! 严格解析路径
//!
//! 整段文本必须是一个 JSON 对象；记录类型通过 serde 的
//! `default` + `deny_unknown_fields` 完成校验式构造。

use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

/// 严格解析错误（只在解析器内部流转，不会传播给调用方之外）
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("Invalid JSON: {0}")]
    Syntax(String),

    #[error("Expected a JSON object, found {0}")]
    NotAnObject(&'static str),

    #[error("Shape mismatch: {0}")]
    Shape(String),
}

/// 把整段文本解析为目标记录
pub fn parse_strict<T: DeserializeOwned>(text: &str) -> Result<T, ParseError> {
    let body = unwrap_code_fence(text);
    let value: Value =
        serde_json::from_str(body).map_err(|e| ParseError::Syntax(e.to_string()))?;

    if !value.is_object() {
        return Err(ParseError::NotAnObject(value_kind(&value)));
    }

    serde_json::from_value(value).map_err(|e| ParseError::Shape(e.to_string()))
}

/// 去掉包裹整段回复的 Markdown 代码块（```json … ```）
fn unwrap_code_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // 跳过语言标记所在的首行
    let body = match rest.find('\n') {
        Some(pos) => &rest[pos + 1..],
        None => rest,
    };
    body.trim_end()
        .strip_suffix("```")
        .unwrap_or(body)
        .trim()
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
