//! Validate a logger configuration file.

use anyhow::{Context, Result};
use colored::Colorize;
use lazispace_log::LoggerFactory;
use std::path::Path;

use crate::cli::Overrides;

pub fn execute(path: &Path) -> Result<()> {
    let overrides = Overrides {
        config: Some(path.to_path_buf()),
        ..Overrides::default()
    };
    let config = super::resolve_config(&overrides)?;

    // Built and dropped: nothing is installed or written.
    LoggerFactory::new()
        .build(&config)
        .with_context(|| format!("{} does not describe a usable logger", path.display()))?;

    let mut outputs = Vec::new();
    if config.console.enabled {
        outputs.push("console".to_string());
    }
    if let Some(file) = config.log_file_path() {
        outputs.push(file.display().to_string());
    }

    println!(
        "{} {} (level {}, format {}, outputs: {})",
        "OK".green().bold(),
        path.display(),
        config.level,
        config.format,
        outputs.join(", ")
    );
    Ok(())
}
