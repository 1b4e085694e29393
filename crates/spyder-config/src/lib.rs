//! Shared configuration for spyderwatch.
//!
//! One TOML file plus `SPYDER_`-prefixed environment overrides. The only
//! required field is the controller host — the same single field the
//! device's setup flow collects — with polling and output defaults
//! alongside it.

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("no host configured")]
    NoHost,

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

// ── TOML config struct ──────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    /// Controller host (hostname, IP, or `host:port`).
    pub host: Option<String>,

    /// Seconds between polls.
    #[serde(default = "default_poll_interval")]
    pub poll_interval_secs: u64,

    /// Per-request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Default output format for the CLI.
    #[serde(default = "default_output")]
    pub output: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: None,
            poll_interval_secs: default_poll_interval(),
            timeout_secs: default_timeout(),
            output: default_output(),
        }
    }
}

fn default_poll_interval() -> u64 {
    30
}
fn default_timeout() -> u64 {
    10
}
fn default_output() -> String {
    "table".into()
}

impl Config {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Set the host after validation. An invalid host leaves the config
    /// untouched, so a bad setup attempt never persists anything.
    pub fn set_host(&mut self, host: &str) -> Result<(), ConfigError> {
        validate_host(host)?;
        self.host = Some(host.trim().to_owned());
        Ok(())
    }
}

/// Reject empty or whitespace-only hosts before anything is persisted.
pub fn validate_host(host: &str) -> Result<(), ConfigError> {
    if host.trim().is_empty() {
        return Err(ConfigError::Validation {
            field: "host".into(),
            reason: "host must not be empty".into(),
        });
    }
    Ok(())
}

// ── Config file path ────────────────────────────────────────────────

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    ProjectDirs::from("io", "spyderwatch", "spyderwatch").map_or_else(
        || {
            let mut p = dirs_fallback();
            p.push("config.toml");
            p
        },
        |dirs| dirs.config_dir().join("config.toml"),
    )
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("spyderwatch");
    p
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
pub fn load_config() -> Result<Config, ConfigError> {
    let path = config_path();

    let figment = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(&path))
        .merge(Env::prefixed("SPYDER_"));

    let config: Config = figment.extract()?;
    Ok(config)
}

/// Load config, returning a default if the file doesn't exist.
pub fn load_config_or_default() -> Config {
    load_config().unwrap_or_default()
}

// ── Config saving ───────────────────────────────────────────────────

/// Serialize config to TOML and write to the canonical config path.
pub fn save_config(cfg: &Config) -> Result<(), ConfigError> {
    save_config_to(cfg, &config_path())
}

/// Serialize config to TOML at an explicit path.
pub fn save_config_to(cfg: &Config, path: &std::path::Path) -> Result<(), ConfigError> {
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
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults_match_device_cadence() {
        let cfg = Config::default();
        assert_eq!(cfg.poll_interval(), Duration::from_secs(30));
        assert_eq!(cfg.timeout(), Duration::from_secs(10));
        assert_eq!(cfg.output, "table");
        assert!(cfg.host.is_none());
    }

    #[test]
    fn empty_host_is_rejected_and_nothing_persists() {
        let mut cfg = Config::default();
        let err = cfg.set_host("   ").unwrap_err();

        assert!(matches!(err, ConfigError::Validation { .. }));
        assert!(cfg.host.is_none());
    }

    #[test]
    fn set_host_trims_whitespace() {
        let mut cfg = Config::default();
        cfg.set_host("  192.168.1.50  ").unwrap();
        assert_eq!(cfg.host.as_deref(), Some("192.168.1.50"));
    }

    #[test]
    fn toml_round_trip() {
        let mut cfg = Config::default();
        cfg.set_host("spyder.local").unwrap();
        cfg.poll_interval_secs = 60;

        let text = toml::to_string_pretty(&cfg).unwrap();
        let parsed: Config = toml::from_str(&text).unwrap();

        assert_eq!(parsed.host.as_deref(), Some("spyder.local"));
        assert_eq!(parsed.poll_interval_secs, 60);
        assert_eq!(parsed.timeout_secs, 10);
    }

    #[test]
    fn save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut cfg = Config::default();
        cfg.set_host("spyder.local").unwrap();
        save_config_to(&cfg, &path).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("spyder.local"));
    }
}
