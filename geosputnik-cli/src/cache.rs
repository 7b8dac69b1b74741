use std::io::{self, Write};

use clap::Subcommand;
use colored::Colorize;
use geosputnik_lib::{CoreConfig, offline::OfflineCache};
use sysexits::ExitCode;

use crate::{exit_code, fetch::HttpFetcher};

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Fetch every asset of the manifest into the current cache generation
    Install,
    /// Delete every cache generation but the current one
    Activate,
    /// Write an asset to stdout, from the cache when possible
    Get { url: String },
}

pub async fn handle(cfg: &CoreConfig, cmd: Command) -> ExitCode {
    let cache = match OfflineCache::from_settings(&cfg.offline) {
        Ok(cache) => cache,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return exit_code(&e);
        }
    };

    let fetcher = match HttpFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            return ExitCode::Software;
        }
    };

    let result = match cmd {
        Command::Install => cache.install(&fetcher).await.map(|count| {
            println!("Cached {count} assets in {}", cache.version().bold());
        }),
        Command::Activate => cache.activate().map(|deleted| {
            if deleted.is_empty() {
                println!("{}", "No old caches".dimmed());
            }
            for name in deleted {
                println!("Deleted {name}");
            }
        }),
        Command::Get { url } => match cache.respond(&url, &fetcher).await {
            Ok(body) => io::stdout().write_all(&body).map_err(Into::into),
            Err(e) => Err(e),
        },
    };

    match result {
        Ok(()) => ExitCode::Ok,
        Err(e) => {
            eprintln!("{} {e}", "error:".red().bold());
            exit_code(&e)
        }
    }
}
