//! Thermostat command handlers.

use std::ops::RangeInclusive;

use tabled::Tabled;

use domus_core::{Home, ThermostatControl, ThermostatDraft};

use crate::cli::{GlobalOpts, ThermostatFields, ThermostatsArgs, ThermostatsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

/// Targets the server's heating controls accept, in °C.
const TARGET_RANGE: RangeInclusive<f64> = 16.0..=30.0;

#[derive(Tabled)]
struct ThermostatRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Target")]
    target: String,
    #[tabled(rename = "Mode")]
    mode: String,
    #[tabled(rename = "Enabled")]
    enabled: String,
}

fn row(t: &ThermostatControl, color: bool) -> ThermostatRow {
    ThermostatRow {
        id: t.id.clone(),
        name: t.name.clone(),
        room: t.room.clone().unwrap_or_else(|| "-".into()),
        target: format!("{:.1} °C", t.target_temperature()),
        mode: t.mode.clone(),
        enabled: output::on_off(t.state, color),
    }
}

fn check_target(temperature: f64) -> Result<f64, CliError> {
    if TARGET_RANGE.contains(&temperature) {
        Ok(temperature)
    } else {
        Err(CliError::Validation {
            field: "temperature".into(),
            reason: format!(
                "{temperature} °C is outside {:.0}-{:.0} °C",
                TARGET_RANGE.start(),
                TARGET_RANGE.end()
            ),
        })
    }
}

fn draft(fields: ThermostatFields) -> Result<ThermostatDraft, CliError> {
    Ok(ThermostatDraft {
        name: fields.name,
        room: fields.room,
        temperature: fields.temperature.map(check_target).transpose()?,
    })
}

pub async fn handle(
    home: &Home,
    args: ThermostatsArgs,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        ThermostatsCommand::List => {
            let thermostats = home.gateway().list_thermostats().await?;
            let out = output::render_list(
                &global.output,
                &thermostats,
                |t| row(t, color),
                |t| t.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        ThermostatsCommand::Set { id, temperature } => {
            let temperature = check_target(temperature)?;
            home.set_thermostat_target(&id, temperature).await?;
            output::print_done(
                &format!("Thermostat {id} set to {temperature:.1} °C"),
                global.quiet,
            );
            Ok(())
        }

        ThermostatsCommand::Create(fields) => {
            let draft = draft(fields)?;
            if draft.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "a new thermostat needs --name".into(),
                });
            }
            home.create_thermostat(&draft).await?;
            output::print_done("Thermostat created", global.quiet);
            Ok(())
        }

        ThermostatsCommand::Update { id, fields } => {
            let draft = draft(fields)?;
            if draft == ThermostatDraft::default() {
                return Err(CliError::Validation {
                    field: "thermostat".into(),
                    reason: "pass at least one of --name, --room, --temperature".into(),
                });
            }
            home.update_thermostat(&id, &draft).await?;
            output::print_done(&format!("Thermostat {id} updated"), global.quiet);
            Ok(())
        }

        ThermostatsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete thermostat {id}?"), global.yes)? {
                return Ok(());
            }
            home.delete_thermostat(&id).await?;
            output::print_done(&format!("Thermostat {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
