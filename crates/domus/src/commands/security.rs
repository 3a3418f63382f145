//! Security system status, arm and disarm.

use serde::Serialize;

use domus_core::Home;

use crate::cli::{GlobalOpts, SecurityArgs, SecurityCommand};
use crate::error::CliError;
use crate::output;

#[derive(Serialize)]
struct SecurityView {
    state: String,
    armed: bool,
}

pub async fn handle(home: &Home, args: SecurityArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    let armed = match args.command {
        SecurityCommand::Status => {
            let view = match home.gateway().security_state().await? {
                Some(state) => SecurityView {
                    state: state.label().to_owned(),
                    armed: state.is_armed(),
                },
                None => SecurityView {
                    state: "unknown".into(),
                    armed: false,
                },
            };
            let out = output::render_single(
                &global.output,
                &view,
                |v| format!("Security: {}", output::armed_label(&v.state, v.armed, color)),
                |v| v.state.clone(),
            );
            output::print_output(&out, global.quiet);
            return Ok(());
        }
        SecurityCommand::Arm => true,
        SecurityCommand::Disarm => false,
    };

    home.set_security(armed).await?;
    output::print_done(
        if armed {
            "Security system armed"
        } else {
            "Security system disarmed"
        },
        global.quiet,
    );
    Ok(())
}
