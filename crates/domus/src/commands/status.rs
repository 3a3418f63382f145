//! `domus status`: connectivity, server version and session.

use serde::Serialize;

use domus_api::ApiEnvelope;
use domus_core::{Home, UserInfo};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Debug, Serialize)]
struct StatusReport {
    endpoint: String,
    base_url: String,
    system_status: Option<String>,
    version: Option<String>,
    logged_in: bool,
    user: Option<UserInfo>,
}

fn detail(r: &StatusReport) -> String {
    let user = r
        .user
        .as_ref()
        .map_or_else(|| "-".into(), |u| format!("{} ({})", u.name, u.role));
    [
        format!("Endpoint:  {}", r.endpoint),
        format!("Base URL:  {}", r.base_url),
        format!("Status:    {}", r.system_status.as_deref().unwrap_or("-")),
        format!("Version:   {}", r.version.as_deref().unwrap_or("-")),
        format!("Session:   {}", if r.logged_in { "active" } else { "none" }),
        format!("User:      {user}"),
    ]
    .join("\n")
}

pub async fn handle(home: &Home, global: &GlobalOpts) -> Result<(), CliError> {
    let gateway = home.gateway();

    let status = gateway.server_status().await?;

    // The profile call doubles as a session check.
    let (logged_in, user) = if home.is_logged_in() {
        match gateway.user_profile().await.and_then(ApiEnvelope::into_result) {
            Ok(profile) => (true, profile.and_then(|p| p.user)),
            Err(e) if e.is_unauthorized() => (false, None),
            Err(e) => return Err(e.into()),
        }
    } else {
        (false, None)
    };

    let report = StatusReport {
        endpoint: home.endpoint(),
        base_url: gateway.base_url().to_string(),
        system_status: status.system_status,
        version: status.version,
        logged_in,
        user,
    };

    let out = output::render_single(&global.output, &report, detail, |r| {
        r.system_status.clone().unwrap_or_default()
    });
    output::print_output(&out, global.quiet);
    Ok(())
}
