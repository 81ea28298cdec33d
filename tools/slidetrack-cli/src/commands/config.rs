//! Inspect or initialize the configuration file.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use slidetrack_common::config::{config_file_path, AppConfig};

pub fn show(config: &AppConfig) -> anyhow::Result<ExitCode> {
    super::print_json(config, true)?;
    Ok(ExitCode::SUCCESS)
}

/// Write the default configuration to `output`, or to the standard path.
pub fn init(output: Option<PathBuf>, force: bool) -> anyhow::Result<ExitCode> {
    let target = output.clone().unwrap_or_else(config_file_path);
    if target.exists() && !force {
        anyhow::bail!("{} already exists (pass --force to overwrite)", target.display());
    }

    let config = AppConfig::default();
    let written = match output {
        Some(path) => {
            config
                .save_to(&path)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            path
        }
        None => config.save().context("Failed to write the default config file")?,
    };

    tracing::info!(path = %written.display(), "Wrote default configuration");
    println!("{}", written.display());
    Ok(ExitCode::SUCCESS)
}
