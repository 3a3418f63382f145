//! Shared helpers for command handlers.

use domus_core::{CoreError, DashboardSnapshot, Home, RefreshOutcome};

use crate::error::CliError;

/// Prompt for confirmation, auto-approving if `--yes` was passed.
pub fn confirm(message: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    let confirmed = dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(|e| CliError::Io(std::io::Error::other(e)))?;
    Ok(confirmed)
}

/// Refresh the dashboard and return the snapshot.
///
/// A partial refresh still yields a snapshot; failed slices are logged.
/// Only when nothing could be fetched is the first error returned.
pub async fn refreshed(home: &Home) -> Result<std::sync::Arc<DashboardSnapshot>, CliError> {
    if let RefreshOutcome::Completed(report) = home.refresh_now().await {
        if report.refreshed.is_empty() {
            if let Some((_, err)) = report.failed.first() {
                return Err(CoreError::clone(err).into());
            }
        }
        for (slice, err) in &report.failed {
            tracing::warn!(%slice, error = %err, "could not refresh");
        }
    }
    Ok(home.snapshot())
}

/// Not-found error for an id missing from the snapshot.
pub fn not_found(resource_type: &str, identifier: &str, list_command: &str) -> CliError {
    CliError::NotFound {
        resource_type: resource_type.into(),
        identifier: identifier.into(),
        list_command: list_command.into(),
    }
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}
