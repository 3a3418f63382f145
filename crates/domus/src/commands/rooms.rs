//! Room command handlers.

use tabled::Tabled;

use domus_core::{Home, Room};

use crate::cli::{GlobalOpts, RoomsArgs, RoomsCommand};
use crate::error::CliError;
use crate::output;

use super::util;

#[derive(Tabled)]
struct RoomRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Color")]
    color: String,
}

impl From<&Room> for RoomRow {
    fn from(r: &Room) -> Self {
        Self {
            id: r.id.clone(),
            name: r.name.clone(),
            color: r.color.clone(),
        }
    }
}

pub async fn handle(home: &Home, args: RoomsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        RoomsCommand::List => {
            let rooms = home.gateway().list_rooms().await?;
            let out = output::render_list(
                &global.output,
                &rooms,
                |r| RoomRow::from(r),
                |r| r.id.clone(),
            );
            output::print_output(&out, global.quiet);
            Ok(())
        }

        RoomsCommand::Create { name } => {
            home.create_room(&name).await?;
            output::print_done(&format!("Room '{name}' created"), global.quiet);
            Ok(())
        }

        RoomsCommand::Rename { id, name } => {
            home.update_room(&id, &name).await?;
            output::print_done(&format!("Room {id} renamed to '{name}'"), global.quiet);
            Ok(())
        }

        RoomsCommand::Delete { id } => {
            if !util::confirm(&format!("Delete room {id}?"), global.yes)? {
                return Ok(());
            }
            home.delete_room(&id).await?;
            output::print_done(&format!("Room {id} deleted"), global.quiet);
            Ok(())
        }
    }
}
