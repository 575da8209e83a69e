mod progress;
mod summary;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use pixmean_core::io::ImageCodec;
use pixmean_core::pipeline::config::AverageConfig;
use pixmean_core::pipeline::run_average;
use pixmean_core::raster::SampleDepth;
use tracing_subscriber::EnvFilter;

use progress::BarReporter;

#[derive(Parser)]
#[command(name = "pixmean", about = "Average a directory of same-sized images pixel by pixel")]
#[command(version)]
struct Cli {
    /// Directory from which to average images
    #[arg(long)]
    images_source: Option<PathBuf>,

    /// Where to save the averaged image
    #[arg(long)]
    target_image: Option<PathBuf>,

    /// Run config file (TOML); flags override its values
    #[arg(long)]
    config: Option<PathBuf>,

    /// Workers per stage (default: available parallelism)
    #[arg(long)]
    workers: Option<usize>,

    /// Sample depth for decoding and output: 8 or 16
    #[arg(long, value_parser = parse_depth)]
    depth: Option<SampleDepth>,

    /// Capacity of the file path queue
    #[arg(long)]
    path_queue: Option<usize>,

    /// Capacity of the decoded image queue
    #[arg(long)]
    image_queue: Option<usize>,

    /// Print the effective config as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn parse_depth(s: &str) -> std::result::Result<SampleDepth, String> {
    s.parse::<u8>()
        .ok()
        .and_then(SampleDepth::from_bits)
        .ok_or_else(|| format!("unsupported depth '{s}', expected 8 or 16"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = build_config(&cli)?;
    tracing::debug!(?config, "Effective config");

    if cli.print_config {
        print!("{}", toml::to_string_pretty(&config)?);
        return Ok(());
    }

    summary::print_run_header(&config);

    let reporter = BarReporter::new();
    let result = run_average(&config, &ImageCodec, &reporter);
    reporter.clear();
    let run = result.with_context(|| {
        format!("Failed to average images from {}", config.source.display())
    })?;

    summary::print_run_summary(&config, &run);
    Ok(())
}

fn build_config(cli: &Cli) -> Result<AverageConfig> {
    let mut config = if let Some(ref config_path) = cli.config {
        let contents = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config {}", config_path.display()))?;
        toml::from_str(&contents).context("Invalid run config")?
    } else {
        AverageConfig::default()
    };

    if let Some(ref source) = cli.images_source {
        config.source = source.clone();
    }
    if let Some(ref target) = cli.target_image {
        config.target = target.clone();
    }
    if let Some(workers) = cli.workers {
        config.pipeline.workers = Some(workers);
    }
    if let Some(depth) = cli.depth {
        config.pipeline.depth = depth;
    }
    if let Some(capacity) = cli.path_queue {
        config.pipeline.path_queue_capacity = capacity;
    }
    if let Some(capacity) = cli.image_queue {
        config.pipeline.image_queue_capacity = capacity;
    }

    config
        .validate()
        .context("Invalid run configuration")?;
    Ok(config)
}
