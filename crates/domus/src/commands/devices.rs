//! Device command handlers.

use tabled::Tabled;

use domus_core::{Device, DeviceDraft, Home};

use crate::cli::{DeviceFields, DevicesArgs, DevicesCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

use super::util;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DeviceRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Type")]
    dtype: String,
    #[tabled(rename = "State")]
    state: String,
}

fn row(d: &Device, color: bool) -> DeviceRow {
    DeviceRow {
        id: d.id.clone(),
        name: d.name.clone(),
        room: d.room.clone().unwrap_or_else(|| "-".into()),
        dtype: d.device_type.clone().unwrap_or_else(|| "-".into()),
        state: output::on_off(d.state, color),
    }
}

fn draft(fields: DeviceFields) -> DeviceDraft {
    DeviceDraft {
        name: fields.name,
        room: fields.room,
        device_type: fields.device_type,
        color: fields.color,
    }
}

fn require_some(draft: &DeviceDraft) -> Result<(), CliError> {
    if *draft == DeviceDraft::default() {
        return Err(CliError::Validation {
            field: "device".into(),
            reason: "pass at least one of --name, --room, --type, --color".into(),
        });
    }
    Ok(())
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(home: &Home, args: DevicesArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let color = output::should_color(&global.color);

    match args.command {
        DevicesCommand::List { room } => {
            let mut devices = home.gateway().list_devices().await?;
            if let Some(room) = room {
                devices.retain(|d| d.room.as_deref() == Some(room.as_str()));
            }
            let out = output::render_list(
                &global.output,
                &devices,
                |d| row(d, color),
                |d| d.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        DevicesCommand::Toggle { id } => {
            let snap = util::refreshed(home).await?;
            let Some(before) = snap.device(&id).map(|d| d.state) else {
                return Err(util::not_found("device", &id, "devices list"));
            };
            home.toggle_device(&id).await?;
            output::print_done(
                &format!("Device {id} switched {}", output::on_off(!before, color)),
                global.quiet,
            );
            Ok(())
        }

        DevicesCommand::Create(fields) => {
            let draft = draft(fields);
            if draft.name.as_deref().is_none_or(|n| n.trim().is_empty()) {
                return Err(CliError::Validation {
                    field: "name".into(),
                    reason: "a new device needs --name".into(),
                });
            }
            home.create_device(&draft).await?;
            output::print_done("Device created", global.quiet);
            Ok(())
        }

        DevicesCommand::Update { id, fields } => {
            let draft = draft(fields);
            require_some(&draft)?;
            home.update_device(&id, &draft).await?;
            output::print_done(&format!("Device {id} updated"), global.quiet);
            Ok(())
        }

        DevicesCommand::Delete { id } => {
            if !util::confirm(&format!("Delete device {id}?"), global.yes)? {
                return Ok(());
            }
            home.delete_device(&id).await?;
            output::print_done(&format!("Device {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
