//! CLI command implementations.

pub mod check;
pub mod emit;

use anyhow::{Context, Result};
use lazispace_types::LogConfig;

use crate::cli::Overrides;

/// Load the configuration file, if any, and apply command-line overrides.
pub fn resolve_config(overrides: &Overrides) -> Result<LogConfig> {
    let mut config = match &overrides.config {
        Some(path) => LogConfig::load(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => LogConfig::default(),
    };

    if let Some(level) = &overrides.level {
        config.level = level.clone();
    }
    if let Some(format) = &overrides.format {
        config.format = format.clone();
    }
    if let Some(path) = &overrides.log_file {
        config.file.enabled = true;
        config.file.path = path
            .parent()
            .map(|dir| dir.to_path_buf())
            .unwrap_or_default();
        config.file.filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        if config.file.max_size_mb == 0 {
            config.file.max_size_mb = DEFAULT_MAX_SIZE_MB;
        }
    }
    if overrides.no_console {
        config.console.enabled = false;
    }

    config
        .file
        .validate()
        .context("invalid file output")?;
    Ok(config)
}

const DEFAULT_MAX_SIZE_MB: u64 = 10;
