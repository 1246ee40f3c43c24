mod analysis;
mod config;
mod display;
mod input;
mod plot;
mod stats;
mod table;

use crate::analysis::Analysis;
use crate::config::Config;
use crate::display::Target;
use crate::input::find_csv_arg;
use crate::plot::Mode;
use anyhow::{Context, Result, bail};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(version, about)]
struct CLI {
    /// Arguments scanned for the first CSV file
    args: Vec<String>,

    /// TOML configuration file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Reference mean of the intensity
    #[arg(long, allow_negative_numbers = true)]
    mean: Option<f64>,

    /// Reference standard deviation of the intensity
    #[arg(long, allow_negative_numbers = true)]
    std_dev: Option<f64>,

    /// Plot mode
    #[arg(long, value_enum, default_value_t = Mode::Flat)]
    mode: Mode,

    /// Write the plot to this file instead of opening a window
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    env_logger::Builder::new()
        .format_timestamp_millis()
        .filter_level(log::LevelFilter::Info)
        .parse_default_env()
        .init();

    if let Err(error) = run_cli() {
        log::error!("{error:#?}");
        std::process::exit(1);
    }
}

fn run_cli() -> Result<()> {
    let args = CLI::parse();
    log::info!("{args:#?}");

    let Some(csv_file) = find_csv_arg(&args.args) else {
        bail!("needs the CSV filename as argument");
    };

    let mut cfg = match &args.config {
        Some(file) => Config::from_file(file).context("failed to construct cfg")?,
        None => Config::default(),
    };
    cfg.override_reference(args.mean, args.std_dev)
        .context("failed to apply overrides")?;
    log::info!("{cfg:#?}");

    let target = match args.output {
        Some(file) => Target::File(file),
        None => Target::Window,
    };

    Analysis::new(cfg)
        .run(csv_file, args.mode, &target)
        .with_context(|| format!("failed to analyze {csv_file:?}"))?;

    Ok(())
}
