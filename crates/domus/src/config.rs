//! Wiring from the config file and global flags to a ready [`Home`].
//!
//! The store is opened once per invocation; the gateway built on top of it
//! does no I/O until the first command runs.

use std::sync::Arc;
use std::time::Duration;

use domus_api::transport::TlsMode;
use domus_api::{CredentialStore, SessionGateway};
use domus_config::{BackendKind, Config, SecureConfigStore};
use domus_core::Home;

use crate::cli::GlobalOpts;
use crate::error::CliError;

/// Everything a command handler may need beyond its own arguments.
pub struct Runtime {
    pub config: Config,
    pub backend: BackendKind,
    pub home: Home,
}

/// Load the config file and apply `--timeout` / `--insecure`.
pub fn load(global: &GlobalOpts) -> Result<Config, CliError> {
    let mut cfg = domus_config::load_config()?;
    if let Some(secs) = global.timeout {
        if secs == 0 {
            return Err(CliError::Validation {
                field: "timeout".into(),
                reason: "must be at least 1 second".into(),
            });
        }
        cfg.defaults.timeout = secs;
    }
    if global.insecure {
        cfg.defaults.insecure = true;
    }
    Ok(cfg)
}

/// Open the credential store and build the gateway and facade over it.
pub fn build_runtime(config: Config) -> Result<Runtime, CliError> {
    let store = Arc::new(SecureConfigStore::open(&config));
    let backend = store.backend();

    let transport = config.transport();
    tracing::debug!(
        backend = %backend,
        timeout = ?transport.timeout,
        insecure = transport.tls == TlsMode::DangerAcceptInvalid,
        "building gateway"
    );

    let store: Arc<dyn CredentialStore> = store;
    let gateway = SessionGateway::new(store, transport)?;

    Ok(Runtime {
        config,
        backend,
        home: Home::new(Arc::new(gateway)),
    })
}

/// Effective request timeout, for display.
pub fn timeout(cfg: &Config) -> Duration {
    Duration::from_secs(cfg.defaults.timeout)
}
