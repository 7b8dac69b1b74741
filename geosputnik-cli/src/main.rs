use std::path::PathBuf;

use clap::{Parser, Subcommand};
use colored::Colorize;
use geosputnik_lib::{CoreConfig, Error, Geographic, compass::CompassStatus};
use sysexits::ExitCode;
use tracing_subscriber::EnvFilter;

mod cache;
mod fetch;
mod marker;
mod session;
mod terminal;

#[derive(Parser, Debug)]
#[command(name = "geosputnik")]
#[command(author, version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Use this configuration file instead of the default one
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand, Debug, Clone)]
enum Command {
    /// Operate on markers
    #[command(subcommand)]
    Marker(marker::Command),
    /// Show the SK-42 coordinates of a position
    Coords {
        #[arg(long, allow_hyphen_values = true)]
        lon: f64,
        #[arg(long, allow_hyphen_values = true)]
        lat: f64,
    },
    /// Manage the offline asset cache
    #[command(subcommand)]
    Cache(cache::Command),
    /// Show the compass readout for a device heading
    Compass {
        #[arg(allow_hyphen_values = true)]
        degrees: Option<f64>,
    },
}

fn main() -> ExitCode {
    // Human friendly panicking in release mode
    human_panic::setup_panic!();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let cfg = match &cli.config {
        Some(path) => CoreConfig::load_from(path),
        None => CoreConfig::load(),
    };
    let cfg = match cfg {
        Ok(cfg) => cfg,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::Config;
        }
    };

    // Everything runs on one thread, the same way the page reacts to one event at a time
    let runtime = match tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::OsErr;
        }
    };

    let code = runtime.block_on(run(cli.command, cfg));

    // Don't wait on a description prompt that is still blocked on stdin
    runtime.shutdown_background();

    code
}

async fn run(command: Command, cfg: CoreConfig) -> ExitCode {
    match command {
        Command::Marker(cmd) => marker::handle(&cfg, cmd).await,
        Command::Coords { lon, lat } => marker::coords(&cfg, Geographic::new(lon, lat)).await,
        Command::Cache(cmd) => cache::handle(&cfg, cmd).await,
        Command::Compass { degrees } => {
            println!("{}", CompassStatus::from_reading(degrees));
            ExitCode::Ok
        }
    }
}

pub(crate) fn exit_code(error: &Error) -> ExitCode {
    match error {
        Error::Io(_) | Error::NoHomeDir(_) => ExitCode::IoErr,
        Error::Json(_) | Error::DuplicateId(_) => ExitCode::DataErr,
        Error::OutOfRange { .. } | Error::Transform(_) => ExitCode::DataErr,
        Error::ConfigEncode(_) | Error::ProjectionSetup(_) => ExitCode::Config,
        Error::ConverterUnavailable | Error::Fetch { .. } => ExitCode::Unavailable,
    }
}
