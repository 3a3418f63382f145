//! Shared configuration for the Domus CLI.
//!
//! Application settings (TOML file + `DOMUS_` environment) and the
//! [`SecureConfigStore`] that persists the server endpoint and session
//! token. Settings never hold secrets; those live in the store.

pub mod store;

use std::path::PathBuf;
use std::time::Duration;

use directories::ProjectDirs;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use domus_api::TransportConfig;
use domus_api::transport::TlsMode;

pub use store::{BackendKind, KeyringBackend, PlainFileBackend, SecretBackend, SecureConfigStore};

// ── Error ───────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid {field}: {reason}")]
    Validation { field: String, reason: String },

    #[error("failed to serialize config: {0}")]
    Serialization(#[from] toml::ser::Error),

    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("config loading failed: {0}")]
    Figment(Box<figment::Error>),

    #[error("secure storage unavailable: {0}")]
    Keyring(#[from] keyring::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Figment(Box::new(err))
    }
}

// ── TOML config structs ─────────────────────────────────────────────

/// Top-level TOML configuration.
#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    /// Global defaults.
    #[serde(default)]
    pub defaults: Defaults,

    /// Where the endpoint and session token are kept.
    #[serde(default)]
    pub storage: Storage,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Defaults {
    #[serde(default = "default_output")]
    pub output: String,

    #[serde(default = "default_color")]
    pub color: String,

    /// Accept self-signed certificates.
    #[serde(default)]
    pub insecure: bool,

    /// Request timeout in seconds.
    #[serde(default = "default_timeout")]
    pub timeout: u64,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            output: default_output(),
            color: default_color(),
            insecure: false,
            timeout: default_timeout(),
        }
    }
}

fn default_output() -> String {
    "table".into()
}
fn default_color() -> String {
    "auto".into()
}
fn default_timeout() -> u64 {
    30
}

/// Which backend the store should try first.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendPreference {
    /// OS keyring, falling back to the preferences file.
    #[default]
    Auto,
    /// Preferences file only.
    Plaintext,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Storage {
    #[serde(default)]
    pub backend: BackendPreference,

    /// Service name entries are filed under in the OS keyring.
    #[serde(default = "default_keyring_service")]
    pub keyring_service: String,

    /// Override for the plaintext preferences file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prefs_file: Option<PathBuf>,
}

impl Default for Storage {
    fn default() -> Self {
        Self {
            backend: BackendPreference::Auto,
            keyring_service: default_keyring_service(),
            prefs_file: None,
        }
    }
}

fn default_keyring_service() -> String {
    "domus".into()
}

impl Config {
    /// Transport settings for the gateway.
    pub fn transport(&self) -> TransportConfig {
        let mut transport =
            TransportConfig::default().with_timeout(Duration::from_secs(self.defaults.timeout));
        if self.defaults.insecure {
            transport.tls = TlsMode::DangerAcceptInvalid;
        }
        transport
    }

    /// Plaintext preferences file used when the keyring is unavailable.
    pub fn prefs_path(&self) -> PathBuf {
        self.storage
            .prefs_file
            .clone()
            .unwrap_or_else(|| config_dir().join("prefs.toml"))
    }
}

// ── Config file path ────────────────────────────────────────────────

fn config_dir() -> PathBuf {
    ProjectDirs::from("com", "domus", "domus").map_or_else(dirs_fallback, |dirs| {
        dirs.config_dir().to_path_buf()
    })
}

fn dirs_fallback() -> PathBuf {
    let mut p = PathBuf::from(std::env::var("HOME").unwrap_or_else(|_| ".".into()));
    p.push(".config");
    p.push("domus");
    p
}

/// Resolve the config file path via XDG / platform conventions.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// ── Config loading ──────────────────────────────────────────────────

/// Load the full Config from file + environment.
///
/// Environment keys use `__` between sections, e.g.
/// `DOMUS_DEFAULTS__TIMEOUT=10` or `DOMUS_STORAGE__BACKEND=plaintext`.
pub fn load_config() -> Result<Config, ConfigError> {
    load_config_from(&config_path())
}

/// Load from an explicit file path (plus environment).
pub fn load_config_from(path: &std::path::Path) -> Result<Config, ConfigError> {
    let config: Config = Figment::new()
        .merge(Serialized::defaults(Config::default()))
        .merge(Toml::file(path))
        .merge(Env::prefixed("DOMUS_").split("__"))
        .extract()?;

    if config.defaults.timeout == 0 {
        return Err(ConfigError::Validation {
            field: "defaults.timeout".into(),
            reason: "must be at least 1 second".into(),
        });
    }
    Ok(config)
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
        assert_eq!(cfg.defaults.timeout, 30);
        assert_eq!(cfg.storage.backend, BackendPreference::Auto);
        assert_eq!(cfg.storage.keyring_service, "domus");
    }

    #[test]
    fn file_values_override_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\ntimeout = 5\ninsecure = true\n\n[storage]\nbackend = \"plaintext\"\n",
        )
        .unwrap();

        let cfg = load_config_from(&path).unwrap();
        assert_eq!(cfg.defaults.timeout, 5);
        assert_eq!(cfg.storage.backend, BackendPreference::Plaintext);

        let transport = cfg.transport();
        assert_eq!(transport.timeout, Duration::from_secs(5));
        assert_eq!(transport.tls, TlsMode::DangerAcceptInvalid);
    }

    #[test]
    fn zero_timeout_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[defaults]\ntimeout = 0\n").unwrap();
        assert!(matches!(
            load_config_from(&path),
            Err(ConfigError::Validation { .. })
        ));
    }
}
