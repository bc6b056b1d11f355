//! Config subcommands handler

use anyhow::Result;
use std::path::{Path, PathBuf};

use retrace::Config;

/// The configuration file in use: `--config` or the default location.
pub fn resolve_path(config_override: Option<&Path>) -> Result<PathBuf> {
    match config_override {
        Some(path) => Ok(path.to_path_buf()),
        None => Config::config_path(),
    }
}

/// Load the configuration file in use, or defaults if it doesn't exist.
pub fn load(config_override: Option<&Path>) -> Result<Config> {
    Config::load_from(&resolve_path(config_override)?)
}

/// Show the effective configuration as TOML.
pub fn handle_show(config: &Config) -> Result<()> {
    print!("{}", config.to_toml()?);
    Ok(())
}

/// Print the configuration file path.
pub fn handle_path(config_override: Option<&Path>) -> Result<()> {
    println!("{}", resolve_path(config_override)?.display());
    Ok(())
}
