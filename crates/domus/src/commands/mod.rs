//! Command dispatch: bridges CLI args -> `Home` calls -> output formatting.

pub mod auth;
pub mod config_cmd;
pub mod dashboard;
pub mod devices;
pub mod rooms;
pub mod security;
pub mod status;
pub mod thermostats;
pub mod util;

use crate::cli::{Command, GlobalOpts};
use crate::config::Runtime;
use crate::error::CliError;

/// Dispatch a server-bound command to the appropriate handler.
pub async fn dispatch(cmd: Command, rt: &Runtime, global: &GlobalOpts) -> Result<(), CliError> {
    let home = &rt.home;
    match cmd {
        Command::Login(args) => auth::login(home, args, global).await,
        Command::Logout => auth::logout(home, global).await,
        Command::Status => status::handle(home, global).await,
        Command::Dashboard => dashboard::handle(home, global).await,
        Command::Rooms(args) => rooms::handle(home, args, global).await,
        Command::Devices(args) => devices::handle(home, args, global).await,
        Command::Thermostats(args) => thermostats::handle(home, args, global).await,
        Command::Security(args) => security::handle(home, args, global).await,
        Command::Config(args) => config_cmd::handle(rt, args, global),
        // Completions are handled before dispatch
        Command::Completions(_) => unreachable!(),
    }
}
