mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use lumen_backend::{BackendMode, BackendRequest};
use lumen_config::{load_config, AppConfig};
use lumen_pipeline::{run_from_paths, PipelineConfig};
use lumen_rank::ClassLabels;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Lumen image classification")]
struct Cli {
    /// Execution backend: auto, onboard (ax) or discrete (axcl)
    #[arg(short = 'b', long, default_value = "auto")]
    backend: BackendMode,
    /// Device id; -1 selects the default on-board target
    #[arg(
        short = 'd',
        long = "device_id",
        visible_alias = "device-id",
        default_value_t = 0,
        allow_negative_numbers = true
    )]
    device_id: i32,
    /// Selects which configuration environment to load (maps to config/{env}.toml)
    #[arg(long, default_value = "default")]
    env: String,
    /// Overrides `model_path` from the configuration
    #[arg(long)]
    model: Option<PathBuf>,
    /// Overrides `image_path` from the configuration
    #[arg(long)]
    image: Option<PathBuf>,
    /// Overrides `labels_path` from the configuration
    #[arg(long)]
    labels: Option<PathBuf>,
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let request = BackendRequest::new(cli.backend, cli.device_id)
        .context("invalid backend arguments")?;
    let config = load_config(Some(&cli.env)).context("failed to load configuration")?;
    init_tracing(&config.log_level);

    info!(env = %cli.env, backend = %request.mode(), device_id = request.device_id(), "starting");
    run(&cli, request, config)
}

fn init_tracing(default_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn run(cli: &Cli, request: BackendRequest, config: AppConfig) -> Result<()> {
    let model_path = cli.model.clone().unwrap_or(config.model_path);
    let image_path = cli.image.clone().unwrap_or(config.image_path);
    let labels_path = cli.labels.clone().or(config.labels_path);

    let pipeline_config = PipelineConfig {
        target_size: config.preprocess.target_size,
        crop_size: config.preprocess.crop_size,
        filter: config.preprocess.resize_filter,
        top_k: config.inference.top_k,
        repetitions: config.inference.repetitions,
    };
    pipeline_config
        .validate()
        .context("invalid pipeline configuration")?;

    let labels = labels_path
        .map(|path| ClassLabels::load(&path))
        .transpose()
        .context("failed to load class labels")?;

    let report = run_from_paths(&request, &model_path, &image_path, pipeline_config, labels)
        .with_context(|| {
            format!(
                "classification of {} with {} failed",
                image_path.display(),
                model_path.display()
            )
        })?;

    match cli.format {
        OutputFormat::Text => print!("{}", render::text(&report)),
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&report).context("failed to encode report")?
        ),
    }
    Ok(())
}
