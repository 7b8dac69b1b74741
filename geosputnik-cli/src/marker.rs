use clap::Subcommand;
use colored::Colorize;
use geosputnik_lib::{CoreConfig, Geographic, MarkerId, UiEvent};
use sysexits::ExitCode;

use crate::{exit_code, session, terminal::StdinPrompt};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// List markers
    List,
    /// Add a marker at a position, as if the map was clicked there
    Add {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
        /// Skip the description prompt
        #[arg(short, long)]
        description: Option<String>,
        /// Print a shareable summary of the new marker
        #[arg(long)]
        share: bool,
    },
    /// Delete a marker by id
    Delete { id: i64 },
}

pub async fn handle(cfg: &CoreConfig, cmd: Command) -> ExitCode {
    let (prompt, share) = match &cmd {
        Command::Add {
            description, share, ..
        } => (
            description
                .clone()
                .map_or_else(StdinPrompt::default, StdinPrompt::answered),
            *share,
        ),
        _ => (StdinPrompt::default(), false),
    };

    let mut session = match session::open(cfg, prompt, share) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return exit_code(&e);
        }
    };

    let code = match cmd {
        Command::List => ExitCode::Ok,
        Command::Add { lon, lat, .. } => match session.on_click(Geographic::new(lon, lat)).await {
            Ok(marker) => {
                println!("{} {}", "Added marker".green(), marker.id);
                ExitCode::Ok
            }
            Err(e) => exit_code(&e),
        },
        Command::Delete { id } => match session.delete_marker(MarkerId::from(id)) {
            Ok(()) => ExitCode::Ok,
            Err(e) => exit_code(&e),
        },
    };

    if let Some(message) = session.banner() {
        eprintln!("{}", message.red().bold());
    }

    if matches!(code, ExitCode::Ok) {
        session.frontend().list.print();
    }

    code
}

/// Print the SK-42 readout for a position, as if the pointer hovered over it.
pub async fn coords(cfg: &CoreConfig, position: Geographic) -> ExitCode {
    let mut session = match session::open(cfg, StdinPrompt::default(), false) {
        Ok(session) => session,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return exit_code(&e);
        }
    };

    session.handle(UiEvent::PointerMove(position)).await;

    match session.frontend().surface.readout() {
        Some(readout) => {
            println!("{readout}");
            ExitCode::Ok
        }
        None => {
            if let Some(message) = session.banner() {
                eprintln!("{}", message.red().bold());
                return ExitCode::Unavailable;
            }
            eprintln!("{}", "Position can't be converted".red());
            ExitCode::DataErr
        }
    }
}
