//! CLI configuration -- thin wrapper around `airq_config`.
//!
//! Applies `GlobalOpts` flag overrides (--api-url, --timeout, etc.) on
//! top of the file + env layers.

use clap::ValueEnum;

use crate::cli::{ColorMode, GlobalOpts, OutputFormat};
use crate::error::CliError;

pub use airq_config::{Config, config_path, load_config, load_config_or_default, save_config};

/// Effective configuration: file and env, then flags.
pub fn resolve(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = load_config()?;
    apply_overrides(&mut cfg, global);
    cfg.api_url()?;
    Ok(cfg)
}

pub fn apply_overrides(cfg: &mut Config, global: &GlobalOpts) {
    if let Some(ref url) = global.api_url {
        cfg.api_url.clone_from(url);
    }
    if let Some(timeout) = global.timeout {
        cfg.timeout = timeout;
    }
    if global.insecure {
        cfg.insecure = true;
    }
    if let Some(ref dir) = global.session_dir {
        cfg.session_dir = Some(dir.clone());
    }
}

/// `--output` if given, else the config value, else table.
pub fn output_format(global: &GlobalOpts, cfg: &Config) -> OutputFormat {
    global
        .output
        .or_else(|| OutputFormat::from_str(&cfg.output, true).ok())
        .unwrap_or(OutputFormat::Table)
}

/// `--color` if given, else the config value, else auto.
pub fn color_mode(global: &GlobalOpts, cfg: &Config) -> ColorMode {
    global
        .color
        .or_else(|| ColorMode::from_str(&cfg.color, true).ok())
        .unwrap_or(ColorMode::Auto)
}
