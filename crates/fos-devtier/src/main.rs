//! fos-devtier: device tier probe
//!
//! Installs the process-wide device classifier from command-line
//! switches and an optional JSON config, then prints whether this
//! device is treated as low-end.

use anyhow::{Context, Result};
use clap::Parser;
use fos_device::{
    ClassifierConfig, OsVersion, Overrides, DISABLE_LOW_END_DEVICE_MODE, ENABLE_LOW_END_DEVICE_MODE,
};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

// Use mimalloc as the global allocator, same as the browser
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Debug, Parser)]
#[command(name = "fos-devtier", version, about = "Classify this device as low-end or not")]
struct Cli {
    /// Force low-end device mode
    #[arg(long = ENABLE_LOW_END_DEVICE_MODE)]
    enable_low_end_device_mode: bool,

    /// Force normal (not low-end) device mode
    #[arg(long = DISABLE_LOW_END_DEVICE_MODE)]
    disable_low_end_device_mode: bool,

    /// Platform API level; API 18 and below is never low-end
    #[arg(long, value_name = "N")]
    os_version: Option<OsVersion>,

    /// Memory report to read instead of the platform default
    #[arg(long, value_name = "PATH")]
    meminfo: Option<PathBuf>,

    /// JSON classifier config, applied before the flags above
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the classification as JSON
    #[arg(long)]
    json: bool,

    /// Enable debug logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Low-end device switches present on the command line.
    fn switches(&self) -> impl Iterator<Item = &'static str> {
        [
            (self.enable_low_end_device_mode, ENABLE_LOW_END_DEVICE_MODE),
            (self.disable_low_end_device_mode, DISABLE_LOW_END_DEVICE_MODE),
        ]
        .into_iter()
        .filter_map(|(set, name)| set.then_some(name))
    }

    fn classifier_config(&self) -> Result<ClassifierConfig> {
        let mut config = match &self.config {
            Some(path) => ClassifierConfig::from_json_file(path)
                .with_context(|| format!("Failed to load {}", path.display()))?,
            None => ClassifierConfig::default(),
        };

        let switches = Overrides::from_switches(self.switches());
        config.overrides.force_low_end |= switches.force_low_end;
        config.overrides.force_not_low_end |= switches.force_not_low_end;
        if let Some(version) = self.os_version {
            config.os_version = Some(version);
        }
        if let Some(path) = &self.meminfo {
            config.meminfo_path = Some(path.clone());
        }

        Ok(config)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .compact()
        .init();

    let config = cli.classifier_config()?;
    info!(?config, "fos-devtier starting");

    fos_device::install(config).context("Device classifier already installed")?;
    let classification = fos_device::classification();

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(classification).context("Failed to encode classification")?
        );
    } else {
        println!(
            "low-end: {} ({}, total memory {})",
            classification.low_end,
            classification.reason,
            classification.memory_kb
        );
    }

    Ok(())
}
