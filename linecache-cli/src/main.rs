//! LINECACHE CLI
//!
//! Command-line interface for composing and timing line pipelines.

mod config;
mod pipeline;
mod sample;

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use linecache_core::constants::DEFAULT_SAMPLE_LINES;
use linecache_core::{format_count, ConsoleSink, LineSource};
use linecache_source::FileLineSource;

use crate::config::CliConfig;
use crate::pipeline::{Layers, Pipeline};

/// LINECACHE - cached, logged line pipelines
#[derive(Parser)]
#[command(name = "linecache")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write a sample data file
    Generate {
        /// Output file (defaults to LINECACHE_DATA_PATH)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Number of lines to write
        #[arg(short, long, default_value_t = DEFAULT_SAMPLE_LINES)]
        lines: usize,
    },

    /// Read through a pipeline and time each call
    Read {
        /// Data file (defaults to LINECACHE_DATA_PATH)
        #[arg(short, long)]
        path: Option<PathBuf>,
        /// Cache time-to-live in seconds
        #[arg(long, env = "LINECACHE_TTL_SECS")]
        ttl_secs: Option<u64>,
        /// Add the caching layer
        #[arg(long)]
        cache: bool,
        /// Add the call logging layer
        #[arg(long)]
        log: bool,
        /// Consume at most this many lines per call
        #[arg(short, long)]
        take: Option<usize>,
        /// Number of calls
        #[arg(short, long, default_value = "1")]
        repeat: usize,
        /// Print cache metrics as JSON
        #[arg(long)]
        json: bool,
    },

    /// Run the three reference arrangements
    Demo {
        /// Data file (defaults to LINECACHE_DATA_PATH)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "linecache=debug,info"
    } else {
        "linecache=info,warn"
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = CliConfig::from_env();

    match cli.command {
        Commands::Generate { path, lines } => cmd_generate(config.with_overrides(path, None), lines),
        Commands::Read {
            path,
            ttl_secs,
            cache,
            log,
            take,
            repeat,
            json,
        } => {
            let config = config.with_overrides(path, ttl_secs);
            let layers = Layers {
                cache: cache.then_some(config.ttl),
                log,
            };
            cmd_read(&config, layers, take, repeat, json)
        }
        Commands::Demo { path } => cmd_demo(config.with_overrides(path, None)),
    }
}

/// Write the sample file
fn cmd_generate(config: CliConfig, lines: usize) -> Result<()> {
    println!(
        "{} {} lines to {}",
        "📝 Generating".cyan().bold(),
        format_count(lines),
        config.data_path.display()
    );

    let pb = ProgressBar::new(lines as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.cyan/blue}] {pos}/{len} ({eta})")?
            .progress_chars("#>-"),
    );

    let start = Instant::now();
    sample::generate(&config.data_path, lines, Some(&pb))?;

    println!("   ✓ Wrote {} lines in {:?}", format_count(lines), start.elapsed());
    Ok(())
}

/// Read through a configured pipeline
fn cmd_read(config: &CliConfig, layers: Layers, take: Option<usize>, repeat: usize, json: bool) -> Result<()> {
    let producer = Arc::new(FileLineSource::new(&config.data_path)?);
    let pipeline = Pipeline::traced(producer, layers, config.progress_interval)?;

    if !json {
        println!("{} {}", "📖 Reading through".cyan().bold(), pipeline.describe());
    }

    let mut reports = Vec::with_capacity(repeat);
    for call in 1..=repeat {
        let report = pipeline.call(take)?;
        info!(call, lines = report.lines, elapsed_ms = report.elapsed_ms as u64, "Pipeline call finished");
        if !json {
            println!(
                "   {} call {}: {} lines in {}ms",
                "✓".green(),
                call,
                format_count(report.lines),
                report.elapsed_ms
            );
        }
        reports.push(report);
    }

    if json {
        let out = serde_json::json!({
            "pipeline": pipeline.describe(),
            "calls": reports,
            "cache": pipeline.cache_report(),
        });
        println!("{}", serde_json::to_string_pretty(&out)?);
    }
    Ok(())
}

/// Run the reference arrangements against the sample file
fn cmd_demo(config: CliConfig) -> Result<()> {
    ensure_sample(&config.data_path)?;

    let sink = Arc::new(ConsoleSink::new());
    let producer: Arc<dyn LineSource> = Arc::new(
        FileLineSource::new(&config.data_path)?.with_sink(sink.clone()),
    );

    // 1. Producer alone
    println!("\n{}", "1. Producer only".cyan().bold());
    let plain = Pipeline::build(producer.clone(), Layers::default(), config.progress_interval, sink.clone())?;
    let report = plain.call(Some(100_000))?;
    println!("   ✓ Took {} lines in {}ms", format_count(report.lines), report.elapsed_ms);

    // 2. Producer -> cache, called twice
    println!("\n{}", "2. Producer -> cache (5 minute TTL)".cyan().bold());
    let cached = Pipeline::build(
        producer.clone(),
        Layers {
            cache: Some(Duration::from_secs(5 * 60)),
            log: false,
        },
        config.progress_interval,
        sink.clone(),
    )?;
    let first = cached.call(None)?;
    println!("   ✓ First call: {} lines in {}ms", format_count(first.lines), first.elapsed_ms);
    let second = cached.call(None)?;
    println!("   ✓ Second call: {} lines in {}ms", format_count(second.lines), second.elapsed_ms);
    println!("   {} {}", "Speedup:".green(), describe_speedup(first.elapsed_ms, second.elapsed_ms));

    // 3. Producer -> cache -> logger
    println!("\n{}", "3. Producer -> cache (10 minute TTL) -> logger".cyan().bold());
    let full = Pipeline::build(
        producer,
        Layers {
            cache: Some(Duration::from_secs(10 * 60)),
            log: true,
        },
        config.progress_interval,
        sink,
    )?;
    let report = full.call(Some(75_000))?;
    println!("   ✓ Took {} lines in {}ms", format_count(report.lines), report.elapsed_ms);

    println!("\n{}", "✅ Demo complete".green().bold());
    Ok(())
}

fn ensure_sample(path: &Path) -> Result<()> {
    if path.is_file() {
        return Ok(());
    }

    println!(
        "{} {}",
        "⚠️  Sample file missing, generating".yellow(),
        path.display()
    );
    let pb = ProgressBar::new(DEFAULT_SAMPLE_LINES as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("   [{bar:40.cyan/blue}] {pos}/{len}")?
            .progress_chars("#>-"),
    );
    sample::generate(path, DEFAULT_SAMPLE_LINES, Some(&pb))
        .with_context(|| format!("Failed to generate {}", path.display()))
}

fn describe_speedup(first_ms: u128, second_ms: u128) -> String {
    if second_ms == 0 {
        return format!("{}ms -> <1ms", first_ms);
    }
    format!("{:.1}x faster", first_ms as f64 / second_ms as f64)
}
