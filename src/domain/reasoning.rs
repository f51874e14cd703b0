//! 推理过程剥离
//!
//! 部分模型会在最终输出前附带 `<think>…</think>` 形式的推理过程。
//! 这里只删除到第一个闭合标记为止的前缀，保留其后的全部内容。

/// 推理块的闭合标记
pub const REASONING_CLOSE_TAG: &str = "</think>";

/// 剥离推理前缀
///
/// - 没有闭合标记时原样返回
/// - 只匹配最左侧的第一个闭合标记（非贪婪），后续的标记原样保留
/// - 闭合标记之后紧跟的空白一并删除
pub fn strip_reasoning(text: &str) -> &str {
    match text.find(REASONING_CLOSE_TAG) {
        Some(pos) => text[pos + REASONING_CLOSE_TAG.len()..].trim_start(),
        None => text,
    }
}
