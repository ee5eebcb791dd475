//! Shared configuration for airq clients.
//!
//! A flat TOML file layered under `AIRQ_*` environment variables, plus
//! resolution of the config and session directories. The CLI adds
//! flag-aware overrides on top.

use std::path::{Path, PathBuf};
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use airq_api::{TlsMode, TransportConfig};

/// Overrides the config file location.
pub const CONFIG_ENV: &str = "AIRQ_CONFIG";

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── Config ──────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// Backend base URL, including any API prefix (e.g. "https://aq.example.org/api").
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Accept invalid TLS certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Path to a custom CA certificate (PEM).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ca_cert: Option<PathBuf>,

    /// Where the session token and user record are kept.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session_dir: Option<PathBuf>,

    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            timeout: default_timeout(),
            insecure: false,
            ca_cert: None,
            session_dir: None,
            output: default_output(),
            color: default_color(),
        }
    }
}

fn default_api_url() -> String {
    "http://localhost:3000/api".into()
}
fn default_timeout() -> u64 {
    30
}
fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}

impl Config {
    /// The validated base URL.
    pub fn api_url(&self) -> Result<Url, ConfigError> {
        let url: Url = self.api_url.parse().map_err(|e| ConfigError::Validation {
            field: "api_url".into(),
            reason: format!("'{}': {e}", self.api_url),
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Validation {
                field: "api_url".into(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            });
        }
        Ok(url)
    }

    /// HTTP settings for both API clients.
    pub fn transport_config(&self) -> TransportConfig {
        let tls = if self.insecure {
            TlsMode::DangerAcceptInvalid
        } else if let Some(ref ca) = self.ca_cert {
            TlsMode::CustomCa(ca.clone())
        } else {
            TlsMode::System
        };
        TransportConfig {
            tls,
            ..TransportConfig::default()
        }
        .with_timeout(Duration::from_secs(self.timeout))
    }

    /// Configured session directory, or the platform data directory.
    pub fn session_dir(&self) -> PathBuf {
        self.session_dir.clone().unwrap_or_else(default_session_dir)
    }
}

// ── Paths ───────────────────────────────────────────────────────────

fn project_dirs() -> Option<ProjectDirs> {
    ProjectDirs::from("com", "airq", "airq")
}

fn dirs_fallback(kind: &str) -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(kind);
    p.push("airq");
    p
}

/// Resolve the config file path: `$AIRQ_CONFIG`, then platform conventions.
pub fn config_path() -> PathBuf {
    if let Some(path) = std::env::var_os(CONFIG_ENV) {
        return PathBuf::from(path);
    }
    project_dirs().map_or_else(
        || dirs_fallback(".config").join("config.toml"),
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

/// Platform data directory for persisted sessions.
pub fn default_session_dir() -> PathBuf {
    project_dirs().map_or_else(
        || dirs_fallback(".local/share").join("session"),
        |dirs| dirs.data_dir().join("session"),
    )
}

// ── Loading ─────────────────────────────────────────────────────────

/// Load from the canonical path, layered under `AIRQ_*` env vars.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file, layered under `AIRQ_*` env vars.
pub fn load_config_from(path: &Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("AIRQ_"))
        .extract()?;
    config.api_url()?;
    Ok(config)
}

/// Load config, returning a default if the file is missing or invalid.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Saving ──────────────────────────────────────────────────────────

/// Serialize to TOML at the canonical path. Returns the path written.
pub fn save_config(cfg: &Config) -> Result<PathBuf, ConfigError> {
    let path = config_path();
    save_config_to(cfg, &path)?;
    Ok(path)
}

pub fn save_config_to(cfg: &Config, path: &Path) -> Result<(), ConfigError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let toml_str = toml::to_string_pretty(cfg)?;
    std::fs::write(path, toml_str)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load_config_from(&dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg.timeout, 30);
        assert_eq!(cfg.output, "table");
        assert!(!cfg.insecure);
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");
        let cfg = Config {
            api_url: "https://aq.example.org/api".into(),
            timeout: 5,
            session_dir: Some(dir.path().join("s")),
            ..Config::default()
        };
        save_config_to(&cfg, &path).unwrap();

        let loaded = load_config_from(&path).unwrap();
        assert_eq!(loaded.api_url, "https://aq.example.org/api");
        assert_eq!(loaded.timeout, 5);
        assert_eq!(loaded.session_dir(), dir.path().join("s"));
    }

    #[test]
    fn rejects_bad_api_url() {
        let cfg = Config {
            api_url: "ftp://example.org".into(),
            ..Config::default()
        };
        assert!(matches!(
            cfg.api_url(),
            Err(ConfigError::Validation { ref field, .. }) if field == "api_url"
        ));

        let cfg = Config {
            api_url: "not a url".into(),
            ..Config::default()
        };
        assert!(cfg.api_url().is_err());
    }

    #[test]
    fn transport_follows_tls_flags() {
        let cfg = Config {
            insecure: true,
            ca_cert: Some("/tmp/ca.pem".into()),
            timeout: 7,
            ..Config::default()
        };
        let transport = cfg.transport_config();
        assert!(matches!(transport.tls, TlsMode::DangerAcceptInvalid));
        assert_eq!(transport.timeout, Duration::from_secs(7));

        let cfg = Config {
            ca_cert: Some("/tmp/ca.pem".into()),
            ..Config::default()
        };
        assert!(matches!(cfg.transport_config().tls, TlsMode::CustomCa(_)));
    }
}
