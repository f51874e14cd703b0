//! Generator Adapter - 文本生成后端实现

mod ollama_client;
mod scripted_generator;

pub use ollama_client::{OllamaClient, OllamaClientConfig};
pub use scripted_generator::ScriptedGenerator;
