//! Configuration Loader
//!
//! 实现多源配置加载与合并逻辑
//!
//! 优先级（从高到低）：
//! 1. 环境变量
//! 2. 配置文件（novelist.toml）
//! 3. 默认值

use config::{Config, ConfigError as ConfigCrateError, Environment, File};
use std::path::Path;
use thiserror::Error;

use super::types::AppConfig;

/// 配置加载错误
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    LoadError(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

impl From<ConfigCrateError> for ConfigError {
    fn from(err: ConfigCrateError) -> Self {
        ConfigError::LoadError(err.to_string())
    }
}

/// 配置文件搜索路径
const CONFIG_FILE_NAMES: &[&str] = &["novelist", "novelist.local"];

/// 加载应用配置
///
/// # 环境变量示例
/// - `NOVELIST_GENERATOR__URL=http://gpu-box:11434`
/// - `NOVELIST_GENERATOR__MODEL=llama3`
/// - `NOVELIST_PIPELINE__MAX_CHAPTERS=25`
/// - `NOVELIST_LOG__LEVEL=debug`
/// - `NOVELIST_LOG__FILE=output/logs/app.log`
pub fn load_config() -> Result<AppConfig, ConfigError> {
    load_config_from_path(None)
}

/// 从指定路径加载配置
///
/// # 参数
/// - `config_path` - 可选的配置文件路径，如果为 None 则使用默认搜索路径
pub fn load_config_from_path(config_path: Option<&Path>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    // 1. 默认值（最低优先级）
    builder = builder
        .set_default("generator.url", "http://localhost:11434")?
        .set_default("generator.model", "mistral-nemo")?
        .set_default("generator.timeout_secs", 600)?
        .set_default("generator.temperature", 0.7)?
        .set_default("storage.save_dir", "output/saves")?
        .set_default("storage.export_dir", "output")?
        .set_default("pipeline.max_chapters", 10)?
        .set_default("pipeline.autosave", true)?
        .set_default("log.level", "info")?
        .set_default("log.json", false)?;

    // 2. 配置文件
    if let Some(path) = config_path {
        builder = builder.add_source(File::from(path).required(true));
    } else {
        for name in CONFIG_FILE_NAMES {
            builder = builder.add_source(File::with_name(name).required(false));
        }
    }

    // 3. 环境变量（最高优先级）
    // 例如: NOVELIST_GENERATOR__URL=http://gpu-box:11434
    builder = builder.add_source(
        Environment::with_prefix("NOVELIST")
            .prefix_separator("_")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;

    let app_config: AppConfig = config.try_deserialize().map_err(|e| {
        ConfigError::ParseError(format!("Failed to deserialize config: {}", e))
    })?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// 验证配置有效性
pub fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.generator.url.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Generator URL cannot be empty".to_string(),
        ));
    }

    if config.generator.model.trim().is_empty() {
        return Err(ConfigError::ValidationError(
            "Generator model cannot be empty".to_string(),
        ));
    }

    if !(0.0..=2.0).contains(&config.generator.temperature) {
        return Err(ConfigError::ValidationError(format!(
            "Temperature must be within [0, 2], got {}",
            config.generator.temperature
        )));
    }

    if config.pipeline.max_chapters == 0 {
        return Err(ConfigError::ValidationError(
            "max_chapters cannot be 0".to_string(),
        ));
    }

    Ok(())
}

/// 打印配置信息（用于启动时日志）
pub fn print_config(config: &AppConfig) {
    tracing::info!("=== Novelist Configuration ===");
    tracing::info!("Generator: {} ({})", config.generator.url, config.generator.model);
    tracing::info!("Generator Timeout: {}s", config.generator.timeout_secs);
    tracing::info!("Temperature: {}", config.generator.temperature);
    tracing::info!("Save Directory: {:?}", config.storage.save_dir);
    tracing::info!("Export Directory: {:?}", config.storage.export_dir);
    tracing::info!("Max Chapters: {}", config.pipeline.max_chapters);
    tracing::info!("Autosave: {}", config.pipeline.autosave);
    tracing::info!("Log Level: {}", config.log.level);
    if let Some(file) = &config.log.file {
        tracing::info!("Log File: {:?}", file);
    }
    tracing::info!("==============================");
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_validation_passes_for_valid_config() {
        let config = AppConfig::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validation_error_for_empty_url() {
        let mut config = AppConfig::default();
        config.generator.url = String::new();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_empty_model() {
        let mut config = AppConfig::default();
        config.generator.model = "  ".to_string();
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_zero_chapters() {
        let mut config = AppConfig::default();
        config.pipeline.max_chapters = 0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validation_error_for_temperature() {
        let mut config = AppConfig::default();
        config.generator.temperature = 2.5;
        assert!(validate_config(&config).is_err());
        config.generator.temperature = -0.1;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(
            file,
            "[generator]\nmodel = \"llama3\"\n\n[pipeline]\nmax_chapters = 3\nautosave = false"
        )
        .unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();

        assert_eq!(config.generator.model, "llama3");
        assert_eq!(config.generator.url, "http://localhost:11434");
        assert_eq!(config.pipeline.max_chapters, 3);
        assert!(!config.pipeline.autosave);
    }

    #[test]
    fn test_load_log_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[log]\nlevel = \"debug\"\nfile = \"output/logs/app.log\"").unwrap();

        let config = load_config_from_path(Some(file.path())).unwrap();

        assert_eq!(config.log.level, "debug");
        assert_eq!(
            config.log.file.as_deref(),
            Some(Path::new("output/logs/app.log"))
        );
        assert!(!config.log.json);
    }

    #[test]
    fn test_load_rejects_invalid_file() {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        writeln!(file, "[pipeline]\nmax_chapters = 0").unwrap();

        let result = load_config_from_path(Some(file.path()));
        assert!(matches!(result, Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_missing_explicit_file_is_error() {
        let result = load_config_from_path(Some(Path::new("/nonexistent/novelist.toml")));
        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
