//! Novelist - 命令行入口
//!
//! 创建小说、推进流水线、查看与导出存档

use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use novelist::application::{
    NovelExporterPort, NovelRepositoryPort, Pipeline, StageOutput, TextGeneratorPort,
};
use novelist::config::{load_config, load_config_from_path, print_config, AppConfig};
use novelist::domain::novel::{Novel, NovelStatus};
use novelist::infrastructure::{FileNovelStore, MarkdownExporter, OllamaClient};

#[derive(Debug, Parser)]
#[command(name = "novelist", version, about = "LLM-driven novel generation pipeline")]
struct Cli {
    /// 配置文件路径（默认搜索 novelist.toml / novelist.local.toml）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create a new novel from an idea and save it
    New {
        #[arg(long)]
        title: String,
        #[arg(long)]
        idea: String,
        /// Run the whole pipeline right away
        #[arg(long)]
        run: bool,
    },
    /// List saved novels
    List,
    /// Advance a saved novel through the pipeline
    Run {
        /// Save name or path (latest save if omitted)
        save: Option<String>,
        /// Stop once the novel reaches this status
        #[arg(long, value_parser = parse_status, default_value = "completed")]
        until: NovelStatus,
    },
    /// Re-plan the chapters of a novel in the writing stage
    PlanChapters { save: Option<String> },
    /// Export a completed novel as Markdown
    Export {
        save: Option<String>,
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Print a saved novel as JSON
    Show { save: Option<String> },
}

fn parse_status(s: &str) -> Result<NovelStatus, String> {
    NovelStatus::from_str(s).ok_or_else(|| {
        format!("unknown status '{s}' (expected idea, planning, writing, reviewing or completed)")
    })
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config_from_path(Some(path.as_path())),
        None => load_config(),
    }
    .map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))?;

    init_tracing(&config)?;
    print_config(&config);

    let store = Arc::new(FileNovelStore::new(&config.storage.save_dir).await?);

    match cli.command {
        Command::New { title, idea, run } => {
            let mut novel = Novel::new(title, idea)?;
            let path = store.save(&novel).await?;
            println!("Created {}", path.display());
            if run {
                advance(&config, store, &mut novel, NovelStatus::Completed).await?;
            }
        }
        Command::List => {
            let saves = store.list_saves().await?;
            if saves.is_empty() {
                println!("No saves in {}", store.save_dir().display());
            }
            for save in saves {
                println!("{}", save.name);
            }
        }
        Command::Run { save, until } => {
            let mut novel = load_novel(&store, save.as_deref()).await?;
            advance(&config, store, &mut novel, until).await?;
        }
        Command::PlanChapters { save } => {
            let mut novel = load_novel(&store, save.as_deref()).await?;
            let pipeline = build_pipeline(&config, store.clone()).await?;
            let report = pipeline.plan_chapters(&mut novel).await?;
            if !config.pipeline.autosave {
                store.save(&novel).await?;
            }
            println!(
                "Planned chapters {:?}, skipped {:?}",
                report.planned, report.skipped
            );
        }
        Command::Export { save, output } => {
            let novel = load_novel(&store, save.as_deref()).await?;
            if novel.status() != NovelStatus::Completed {
                bail!(
                    "'{}' is still in status '{}'; only completed novels can be exported",
                    novel.title(),
                    novel.status()
                );
            }
            let exporter = MarkdownExporter::new(&config.storage.export_dir);
            let path = exporter.export(&novel, output.as_deref()).await?;
            println!("Exported {}", path.display());
        }
        Command::Show { save } => {
            let novel = load_novel(&store, save.as_deref()).await?;
            println!("{}", novel.to_json()?);
        }
    }

    Ok(())
}

/// 终端输出之外，配置了 `log.file` 时同时追加写入该文件
fn init_tracing(config: &AppConfig) -> anyhow::Result<()> {
    let log_filter = format!("{},novelist={}", config.log.level, config.log.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_filter));

    let file_layer = match &config.log.file {
        Some(path) => {
            if let Some(dir) = path.parent() {
                std::fs::create_dir_all(dir)?;
            }
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;
            Some(fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
        }
        None => None,
    };

    let registry = tracing_subscriber::registry().with(filter).with(file_layer);
    if config.log.json {
        registry.with(fmt::layer().json()).init();
    } else {
        registry.with(fmt::layer()).init();
    }
    Ok(())
}

async fn load_novel(store: &FileNovelStore, save: Option<&str>) -> anyhow::Result<Novel> {
    let path = match save {
        Some(name) => store.resolve(name).await?,
        None => store
            .latest()
            .await?
            .map(|entry| entry.path)
            .with_context(|| format!("no saves in {}", store.save_dir().display()))?,
    };
    Ok(store.load(&path).await?)
}

async fn build_pipeline(config: &AppConfig, store: Arc<FileNovelStore>) -> anyhow::Result<Pipeline> {
    let client = OllamaClient::new(config.generator.client_config())?;
    if !client.health_check().await {
        tracing::warn!(
            url = %config.generator.url,
            "Generator health check failed, requests will likely fail"
        );
    }
    let generator: Arc<dyn TextGeneratorPort> = Arc::new(client);
    Ok(Pipeline::new(generator, config.pipeline_config()).with_repository(store))
}

/// 推进流水线直到目标状态，打印终审结果
async fn advance(
    config: &AppConfig,
    store: Arc<FileNovelStore>,
    novel: &mut Novel,
    until: NovelStatus,
) -> anyhow::Result<()> {
    let pipeline = build_pipeline(config, store.clone()).await?;

    let result = pipeline.run_until(novel, until).await;
    if !config.pipeline.autosave {
        store.save(novel).await?;
    }

    let transitions = result.map_err(|e| {
        tracing::error!(title = %novel.title(), status = %novel.status(), error = %e, "Pipeline aborted");
        e
    })?;

    for transition in &transitions {
        println!("{} -> {}", transition.from, transition.to);
        if let StageOutput::Reviewed { critique } = &transition.output {
            println!("\n{}", critique);
        }
    }
    println!("'{}' is now '{}'", novel.title(), novel.status());
    Ok(())
}
