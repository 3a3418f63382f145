//! `domus dashboard`: one refresh cycle, rendered room by room.

use tabled::Tabled;

use domus_core::{CoreError, DashboardEvent, DashboardSnapshot, Home, RefreshOutcome};

use crate::cli::GlobalOpts;
use crate::error::CliError;
use crate::output;

#[derive(Tabled)]
struct DashboardRow {
    #[tabled(rename = "Room")]
    room: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "State")]
    state: String,
}

fn rows(snap: &DashboardSnapshot, color: bool) -> Vec<DashboardRow> {
    let mut rows = Vec::new();
    let mut rooms: Vec<Option<&str>> = snap.rooms.iter().map(|r| Some(r.name.as_str())).collect();
    // Items whose room is unknown to the server still show up.
    rooms.push(None);

    for room in rooms {
        let in_room = |r: Option<&str>| match room {
            Some(name) => r == Some(name),
            None => r.is_none_or(|r| !snap.rooms.iter().any(|known| known.name == r)),
        };
        let label = room.unwrap_or("-").to_owned();

        for d in snap.devices.iter().filter(|d| in_room(d.room.as_deref())) {
            rows.push(DashboardRow {
                room: label.clone(),
                kind: "device",
                id: d.id.clone(),
                name: d.name.clone(),
                state: output::on_off(d.state, color),
            });
        }
        for t in snap.thermostats.iter().filter(|t| in_room(t.room.as_deref())) {
            rows.push(DashboardRow {
                room: label.clone(),
                kind: "thermostat",
                id: t.id.clone(),
                name: t.name.clone(),
                state: format!("{:.1} °C", t.target_temperature()),
            });
        }
    }
    rows
}

pub async fn handle(home: &Home, global: &GlobalOpts) -> Result<(), CliError> {
    let mut events = home.subscribe();
    let outcome = home.refresh_now().await;

    let mut stale = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let DashboardEvent::SliceFailed { slice, error } = event {
            tracing::warn!(%slice, %error, "slice not refreshed");
            stale.push(slice);
        }
    }

    if let RefreshOutcome::Completed(report) = &outcome {
        if report.refreshed.is_empty() {
            if let Some((_, err)) = report.failed.first() {
                return Err(CoreError::clone(err).into());
            }
        }
    }

    let snap = home.snapshot();
    let color = output::should_color(&global.color);

    let out = output::render_single(
        &global.output,
        &*snap,
        |s| {
            let mut text = output::render_table(&rows(s, color));
            if !s.security_state.is_empty() {
                text.push_str(&format!(
                    "\nSecurity: {}",
                    output::armed_label(&s.security_state, s.is_armed(), color)
                ));
            }
            if let Some(at) = s.refreshed_at {
                text.push_str(&format!("\nUpdated:  {}", at.format("%Y-%m-%d %H:%M:%S UTC")));
            }
            text
        },
        |s| s.security_state.clone(),
    );
    output::print_output(&out, global.quiet);

    if !stale.is_empty() && !global.quiet {
        let names: Vec<String> = stale.iter().map(ToString::to_string).collect();
        eprintln!("Could not refresh: {}", names.join(", "));
    }
    Ok(())
}
