pub mod explore;
pub mod lookup;
pub mod render;

use std::path::PathBuf;

use anyhow::{Context, Result};
use districtscope::AppConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Log to stderr; `RUST_LOG` overrides the `-v` level.
pub fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr).with_target(false))
        .init();
}

/// Config file (or defaults) with command-line overrides applied.
pub fn load_config(cli: &crate::cli::Cli) -> Result<AppConfig> {
    let mut config = match &cli.config {
        Some(path) => AppConfig::read(path).with_context(|| format!("loading config {}", path.display()))?,
        None => AppConfig::default(),
    };
    if let Some(data_dir) = &cli.data_dir {
        config.data_dir = data_dir.clone();
    }
    if let Some(api_key) = &cli.api_key {
        config.geocode.api_key = Some(api_key.clone());
    }
    Ok(config)
}

pub fn output_path(output: &Option<PathBuf>) -> PathBuf {
    output.clone().unwrap_or_else(|| "./view.svg".into())
}
