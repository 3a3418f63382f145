// Secure persistence for the endpoint and session token
//
// The OS keyring is tried first. When it cannot be reached at startup the
// store falls back to a plaintext TOML file with the same interface. Either
// way callers see a `CredentialStore` whose reads never fail.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

use tracing::{debug, warn};

use domus_api::{CredentialStore, StoreKey};

use crate::{BackendPreference, Config, ConfigError};

/// Which backend a [`SecureConfigStore`] ended up on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum BackendKind {
    Keyring,
    Plaintext,
}

/// Raw key-value access to one storage backend.
///
/// Unlike [`CredentialStore`], backends report failures; the store decides
/// how to degrade.
pub trait SecretBackend: Send + Sync {
    fn kind(&self) -> BackendKind;
    fn read(&self, key: StoreKey) -> Result<Option<String>, ConfigError>;
    fn write(&self, key: StoreKey, value: &str) -> Result<(), ConfigError>;
    fn delete(&self, key: StoreKey) -> Result<(), ConfigError>;
}

// ── Keyring ─────────────────────────────────────────────────────────

/// Entries in the platform keyring, one per key, under a shared service name.
#[derive(Debug)]
pub struct KeyringBackend {
    service: String,
}

impl KeyringBackend {
    /// Connect and probe the keyring. An empty keyring is fine; an
    /// unreachable one is an error.
    pub fn open(service: &str) -> Result<Self, ConfigError> {
        let backend = Self {
            service: service.to_owned(),
        };
        backend.read(StoreKey::ServerUrl)?;
        debug!(service, "keyring available");
        Ok(backend)
    }

    fn entry(&self, key: StoreKey) -> Result<keyring::Entry, ConfigError> {
        Ok(keyring::Entry::new(&self.service, key.as_str())?)
    }
}

impl SecretBackend for KeyringBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Keyring
    }

    fn read(&self, key: StoreKey) -> Result<Option<String>, ConfigError> {
        match self.entry(key)?.get_password() {
            Ok(value) => Ok(Some(value)),
            Err(keyring::Error::NoEntry) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), ConfigError> {
        Ok(self.entry(key)?.set_password(value)?)
    }

    fn delete(&self, key: StoreKey) -> Result<(), ConfigError> {
        match self.entry(key)?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => Err(e.into()),
        }
    }
}

// ── Plaintext file ──────────────────────────────────────────────────

/// A flat TOML table of strings. Every write rewrites the file before
/// returning, so the next read in any process sees it.
#[derive(Debug)]
pub struct PlainFileBackend {
    path: PathBuf,
    values: RwLock<BTreeMap<String, String>>,
}

impl PlainFileBackend {
    /// Load `path`. A missing file starts empty.
    pub fn open(path: &Path) -> Result<Self, ConfigError> {
        let values = match std::fs::read_to_string(path) {
            Ok(text) => toml::from_str(&text).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self::with_values(path, values))
    }

    /// Start empty regardless of what is on disk. The next write replaces the file.
    pub fn empty(path: &Path) -> Self {
        Self::with_values(path, BTreeMap::new())
    }

    fn with_values(path: &Path, values: BTreeMap<String, String>) -> Self {
        Self {
            path: path.to_path_buf(),
            values: RwLock::new(values),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self, values: &BTreeMap<String, String>) -> Result<(), ConfigError> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, toml::to_string(values)?)?;
        restrict_permissions(&self.path)?;
        Ok(())
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}

impl SecretBackend for PlainFileBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Plaintext
    }

    fn read(&self, key: StoreKey) -> Result<Option<String>, ConfigError> {
        let values = self
            .values
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        Ok(values.get(key.as_str()).cloned())
    }

    fn write(&self, key: StoreKey, value: &str) -> Result<(), ConfigError> {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        values.insert(key.as_str().to_owned(), value.to_owned());
        self.persist(&values)
    }

    fn delete(&self, key: StoreKey) -> Result<(), ConfigError> {
        let mut values = self
            .values
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if values.remove(key.as_str()).is_some() {
            self.persist(&values)?;
        }
        Ok(())
    }
}

// ── Store ───────────────────────────────────────────────────────────

/// Persistent [`CredentialStore`] with keyring-first, plaintext-fallback
/// storage.
pub struct SecureConfigStore {
    backend: Box<dyn SecretBackend>,
}

impl std::fmt::Debug for SecureConfigStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SecureConfigStore")
            .field("backend", &self.backend.kind())
            .finish_non_exhaustive()
    }
}

impl SecureConfigStore {
    /// Open the store described by `config`.
    pub fn open(config: &Config) -> Self {
        let prefs = config.prefs_path();
        match config.storage.backend {
            BackendPreference::Plaintext => Self::plaintext(&prefs),
            BackendPreference::Auto => {
                let secure = KeyringBackend::open(&config.storage.keyring_service)
                    .map(|b| Box::new(b) as Box<dyn SecretBackend>);
                Self::open_with(secure, &prefs)
            }
        }
    }

    /// Use `secure` if it initialized, otherwise the plaintext file at
    /// `fallback`. The fallback is logged, not raised.
    pub fn open_with(secure: Result<Box<dyn SecretBackend>, ConfigError>, fallback: &Path) -> Self {
        match secure {
            Ok(backend) => Self { backend },
            Err(e) => {
                warn!(
                    error = %e,
                    path = %fallback.display(),
                    "secure storage unavailable, using plaintext preferences"
                );
                Self::plaintext(fallback)
            }
        }
    }

    /// Plaintext file only. An unreadable file is logged and replaced on
    /// the next write.
    pub fn plaintext(path: &Path) -> Self {
        let backend = PlainFileBackend::open(path).unwrap_or_else(|e| {
            warn!(error = %e, path = %path.display(), "preferences unreadable, starting empty");
            PlainFileBackend::empty(path)
        });
        Self {
            backend: Box::new(backend),
        }
    }

    /// Backend in use.
    pub fn backend(&self) -> BackendKind {
        self.backend.kind()
    }
}

impl CredentialStore for SecureConfigStore {
    fn get(&self, key: StoreKey) -> Option<String> {
        let fallback = || key.default_value().map(str::to_owned);
        match self.backend.read(key) {
            Ok(Some(value)) => Some(value),
            Ok(None) => fallback(),
            Err(e) => {
                warn!(key = key.as_str(), error = %e, "store read failed, using default");
                fallback()
            }
        }
    }

    fn set(&self, key: StoreKey, value: &str) {
        if let Err(e) = self.backend.write(key, value) {
            warn!(key = key.as_str(), error = %e, "store write failed");
        }
    }

    fn remove(&self, key: StoreKey) {
        if let Err(e) = self.backend.delete(key) {
            warn!(key = key.as_str(), error = %e, "store delete failed");
        }
    }
}
