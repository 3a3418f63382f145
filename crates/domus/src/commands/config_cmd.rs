//! Config command handlers.

use serde::Serialize;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::config::{self, Runtime};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct ConfigView {
    config_file: String,
    endpoint: String,
    base_url: String,
    storage: String,
    prefs_file: Option<String>,
    timeout_secs: u64,
    insecure: bool,
    logged_in: bool,
}

fn detail(v: &ConfigView) -> String {
    let mut lines = vec![
        format!("Config file: {}", v.config_file),
        format!("Endpoint:    {}", v.endpoint),
        format!("Base URL:    {}", v.base_url),
        format!("Storage:     {}", v.storage),
    ];
    if let Some(ref prefs) = v.prefs_file {
        lines.push(format!("Prefs file:  {prefs}"));
    }
    lines.push(format!("Timeout:     {}s", v.timeout_secs));
    lines.push(format!("Insecure:    {}", v.insecure));
    lines.push(format!("Logged in:   {}", v.logged_in));
    lines.join("\n")
}

/// Print the config file location. Needs no store, so it works even when
/// the config file itself is broken.
pub fn print_path(global: &GlobalOpts) {
    output::print_output(
        &domus_config::config_path().display().to_string(),
        global.quiet,
    );
}

pub fn handle(rt: &Runtime, args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Show => {
            let gateway = rt.home.gateway();
            let plaintext = rt.backend == domus_config::BackendKind::Plaintext;
            let view = ConfigView {
                config_file: domus_config::config_path().display().to_string(),
                endpoint: rt.home.endpoint(),
                base_url: gateway.base_url().to_string(),
                storage: rt.backend.to_string(),
                prefs_file: plaintext.then(|| rt.config.prefs_path().display().to_string()),
                timeout_secs: config::timeout(&rt.config).as_secs(),
                insecure: rt.config.defaults.insecure,
                logged_in: rt.home.is_logged_in(),
            };
            let out = output::render_single(&global.output, &view, detail, |v| v.endpoint.clone());
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ConfigCommand::Path => {
            print_path(global);
            Ok(())
        }

        ConfigCommand::GetEndpoint => {
            output::print_output(&rt.home.endpoint(), global.quiet);
            Ok(())
        }

        ConfigCommand::SetEndpoint { url } => {
            let base = rt.home.set_endpoint(&url)?;
            output::print_done(&format!("Endpoint set to {base}"), global.quiet);
            Ok(())
        }
    }
}
