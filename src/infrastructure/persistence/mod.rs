//! Persistence Layer - 数据持久化
//!
//! 文件存档（bincode）与 Markdown 导出

mod file_store;
mod markdown_export;

pub use file_store::{save_file_name, FileNovelStore, SAVE_EXTENSION};
pub use markdown_export::{render_markdown, MarkdownExporter};
