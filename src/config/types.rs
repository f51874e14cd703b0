//! Configuration Types
//!
//! 定义所有配置结构体

use serde::Deserialize;
use std::path::PathBuf;

use crate::application::PipelineConfig;
use crate::infrastructure::OllamaClientConfig;

/// 应用主配置
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// 生成后端配置
    #[serde(default)]
    pub generator: GeneratorConfig,

    /// 存储配置
    #[serde(default)]
    pub storage: StorageConfig,

    /// 流水线配置
    #[serde(default)]
    pub pipeline: PipelineSettings,

    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

impl AppConfig {
    /// 流水线构造参数
    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            max_chapters: self.pipeline.max_chapters,
            temperature: self.generator.temperature,
            autosave: self.pipeline.autosave,
        }
    }
}

/// 生成后端（Ollama）配置
#[derive(Debug, Clone, Deserialize)]
pub struct GeneratorConfig {
    /// 服务基础 URL
    #[serde(default = "default_generator_url")]
    pub url: String,

    /// 模型名称
    #[serde(default = "default_model")]
    pub model: String,

    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// 采样温度，0.0 ~ 2.0
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

fn default_generator_url() -> String {
    "http://localhost:11434".to_string()
}

fn default_model() -> String {
    "mistral-nemo".to_string()
}

fn default_timeout() -> u64 {
    600 // 章节生成可能很慢
}

fn default_temperature() -> f32 {
    0.7
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            url: default_generator_url(),
            model: default_model(),
            timeout_secs: default_timeout(),
            temperature: default_temperature(),
        }
    }
}

impl GeneratorConfig {
    pub fn client_config(&self) -> OllamaClientConfig {
        OllamaClientConfig::new(&self.url, &self.model).with_timeout(self.timeout_secs)
    }
}

/// 存储配置
#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// 存档目录
    #[serde(default = "default_save_dir")]
    pub save_dir: PathBuf,

    /// Markdown 导出目录
    #[serde(default = "default_export_dir")]
    pub export_dir: PathBuf,
}

fn default_save_dir() -> PathBuf {
    PathBuf::from("output/saves")
}

fn default_export_dir() -> PathBuf {
    PathBuf::from("output")
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            save_dir: default_save_dir(),
            export_dir: default_export_dir(),
        }
    }
}

/// 流水线配置
#[derive(Debug, Clone, Deserialize)]
pub struct PipelineSettings {
    /// 章节规划的编号上限
    #[serde(default = "default_max_chapters")]
    pub max_chapters: u32,

    /// 每个阶段完成后自动保存
    #[serde(default = "default_autosave")]
    pub autosave: bool,
}

fn default_max_chapters() -> u32 {
    10
}

fn default_autosave() -> bool {
    true
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            max_chapters: default_max_chapters(),
            autosave: default_autosave(),
        }
    }
}

/// 日志配置
#[derive(Debug, Clone, Deserialize)]
pub struct LogConfig {
    /// 日志级别
    #[serde(default = "default_log_level")]
    pub level: String,

    /// 是否启用 JSON 格式
    #[serde(default)]
    pub json: bool,

    /// 额外写入的日志文件（如 `output/logs/app.log`），为空时只输出到终端
    #[serde(default)]
    pub file: Option<PathBuf>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
            file: None,
        }
    }
}
