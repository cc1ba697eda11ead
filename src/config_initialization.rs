//! Configuration initialization and hierarchy management

use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::info;

use crate::adapters::TomlConfigAdapter;
use crate::cli::{Cli, Commands};
use crate::config::AppConfig;
use crate::domain::model::DispatchMode;

/// Where the effective configuration came from
#[derive(Debug, Default)]
pub struct ConfigSources {
    pub file: Option<PathBuf>,
    pub env_overrides: usize,
    pub cli_overrides: usize,
}

impl ConfigSources {
    /// Log the hierarchy once a subscriber is installed
    pub fn log(&self) {
        match &self.file {
            Some(path) => info!(path = %path.display(), "Configuration file applied"),
            None => info!("No configuration file found, using defaults"),
        }
        if self.env_overrides > 0 {
            info!("Applied {} environment variable overrides", self.env_overrides);
        }
        if self.cli_overrides > 0 {
            info!("Applied {} CLI configuration overrides", self.cli_overrides);
        }
    }
}

/// Build the configuration following precedence: CLI > Env > File > Defaults
pub fn initialize_configuration(cli: &Cli) -> Result<(AppConfig, ConfigSources)> {
    initialize_with_env(cli, std::env::vars())
}

/// Same as [`initialize_configuration`] over an explicit environment
pub fn initialize_with_env<I>(cli: &Cli, vars: I) -> Result<(AppConfig, ConfigSources)>
where
    I: IntoIterator<Item = (String, String)>,
{
    let mut sources = ConfigSources::default();

    // Step 1 and 2: defaults, then the file if one exists
    let adapter = match &cli.config {
        Some(path) => Some(TomlConfigAdapter::new(path)),
        None => TomlConfigAdapter::discover(),
    };
    let mut config = match adapter {
        Some(adapter) => {
            let config = adapter.load()?;
            sources.file = Some(adapter.path().to_path_buf());
            config
        }
        None => AppConfig::default(),
    };

    // Step 3: environment
    sources.env_overrides = config
        .apply_env(vars)
        .context("Invalid environment override")?;

    // Step 4: command line
    sources.cli_overrides = apply_cli_overrides(&mut config, cli)?;

    config.validate()?;
    Ok((config, sources))
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) -> Result<usize> {
    let mut overrides = 0;

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
        overrides += 1;
    }
    if cli.json_logs {
        config.log_json = true;
        overrides += 1;
    }
    if let Some(dir) = &cli.store_dir {
        config.store_dir = dir.clone();
        overrides += 1;
    }

    if let Commands::Analyze(args) = &cli.command {
        if let Some(mode) = &args.mode {
            config.dispatch_mode = DispatchMode::parse(mode)?;
            overrides += 1;
        }
        if let Some(chunk_duration) = args.chunk_duration {
            config.chunk_duration_secs = chunk_duration;
            overrides += 1;
        }
        if let Some(max_concurrency) = args.max_concurrency {
            config.max_concurrency = Some(max_concurrency);
            overrides += 1;
        }
        if args.merge_boundaries {
            config.merge_boundary_scenes = true;
            overrides += 1;
        }
    }

    Ok(overrides)
}
