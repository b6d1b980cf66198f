//! Vitrine CLI
//!
//! Inspect and simulate the landing page animations without a browser:
//!
//! - `vitrine init`: write a default vitrine.toml
//! - `vitrine counter`: step a spring counter and print every frame
//! - `vitrine scroll`: sample the hero scroll channels
//! - `vitrine page`: mount a scripted page and print its frames

mod config;
mod simulate;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;
use vitrine_animation::SpringConfig;
use vitrine_landing::stats::StatFormat;

use crate::simulate::{CounterRun, PageRun};

#[derive(Parser, Debug)]
#[command(name = "vitrine")]
#[command(about = "Inspect and simulate landing page animations")]
#[command(version)]
struct Cli {
    /// Configuration file or directory containing vitrine.toml
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Pretty-print JSON output as one document
    #[arg(long, global = true)]
    pretty: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default vitrine.toml
    Init {
        /// Target file or directory
        #[arg(default_value = ".")]
        path: PathBuf,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Step a spring counter from one value to another
    Counter {
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        from: f64,

        #[arg(long, default_value = "100", allow_hyphen_values = true)]
        to: f64,

        /// Spring preset
        #[arg(long, value_enum, default_value = "brisk")]
        preset: Preset,

        /// Override the preset stiffness
        #[arg(long)]
        stiffness: Option<f64>,

        /// Override the preset damping ratio
        #[arg(long)]
        damping: Option<f64>,

        /// Override the preset mass
        #[arg(long)]
        mass: Option<f64>,

        /// Seconds per frame
        #[arg(long, default_value = "0.016")]
        dt: f64,

        /// Maximum number of frames
        #[arg(long, default_value = "300")]
        frames: u32,

        #[arg(long, value_enum, default_value = "grouped")]
        format: Format,
    },

    /// Sample the hero opacity and blur channels
    Scroll {
        /// Headline scroll progress values (default: 0.0 to 1.0 in tenths)
        #[arg(value_delimiter = ',', allow_hyphen_values = true)]
        progress: Vec<f64>,
    },

    /// Mount a scripted page and print its frames
    Page {
        #[arg(long, default_value = "900")]
        viewport_height: f64,

        #[arg(long, default_value = "600")]
        frames: u32,

        /// Seconds per frame
        #[arg(long, default_value = "0.016666666666666666")]
        dt: f64,

        /// Pixels scrolled per frame
        #[arg(long, default_value = "5")]
        scroll_step: f64,

        /// Print every n-th frame
        #[arg(long, default_value = "60")]
        every: u32,

        /// Starting block height reported by the scripted network
        #[arg(long, default_value = "1000000")]
        blocks: f64,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    Gentle,
    Brisk,
    Heavy,
}

impl Preset {
    fn spring(self) -> SpringConfig {
        match self {
            Preset::Gentle => SpringConfig::gentle(),
            Preset::Brisk => SpringConfig::brisk(),
            Preset::Heavy => SpringConfig::heavy(),
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Format {
    Grouped,
    Terabytes,
    Plain,
}

impl From<Format> for StatFormat {
    fn from(format: Format) -> Self {
        match format {
            Format::Grouped => StatFormat::Grouped,
            Format::Terabytes => StatFormat::Terabytes,
            Format::Plain => StatFormat::Plain,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Init { path, force } => {
            let written = config::write_default(&path, force)?;
            tracing::info!("Wrote {}", written.display());
        }

        Commands::Counter {
            from,
            to,
            preset,
            stiffness,
            damping,
            mass,
            dt,
            frames,
            format,
        } => {
            let base = preset.spring();
            let spring = SpringConfig::new(
                stiffness.unwrap_or(base.stiffness),
                damping.unwrap_or(base.damping),
                mass.unwrap_or(base.mass),
            )?;
            let rows = simulate::counter(&CounterRun {
                from,
                to,
                config: spring,
                format: format.into(),
                dt,
                frames,
            });
            if let Some(last) = rows.last() {
                tracing::info!(
                    frames = rows.len(),
                    value = last.value,
                    status = ?last.status,
                    "counter finished"
                );
            }
            simulate::print_rows(&rows, cli.pretty)?;
        }

        Commands::Scroll { progress } => {
            let config = config::load_or_default(cli.config.as_deref())?;
            let progress = if progress.is_empty() {
                (0..=10).map(|i| f64::from(i) / 10.0).collect()
            } else {
                progress
            };
            let rows = simulate::scroll(&config, &progress)?;
            simulate::print_rows(&rows, cli.pretty)?;
        }

        Commands::Page {
            viewport_height,
            frames,
            dt,
            scroll_step,
            every,
            blocks,
        } => {
            let config = config::load_or_default(cli.config.as_deref())?;
            let rows = simulate::page(
                &config,
                &PageRun {
                    viewport_height,
                    frames,
                    dt,
                    scroll_step,
                    every,
                    blocks,
                },
            )?;
            simulate::print_rows(&rows, cli.pretty)?;
        }
    }

    Ok(())
}
