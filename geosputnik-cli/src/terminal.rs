//! Terminal stand-ins for the map page collaborators.

use std::{
    future::Future,
    io::{self, Write},
};

use colored::Colorize;
use geosputnik_lib::{
    Geographic,
    share::{Share, ShareError, SharePayload},
    sync::{DescriptionPrompt, MapSurface, PointStyle},
    view::{ListModel, ListRenderer},
};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::trace;

/// Keeps track of the overlay instead of drawing it.
#[derive(Debug, Default)]
pub struct TerminalSurface {
    points: usize,
    readout: Option<String>,
}

impl TerminalSurface {
    pub fn readout(&self) -> Option<&str> {
        self.readout.as_deref()
    }
}

impl MapSurface for TerminalSurface {
    fn add_overlay_point(&mut self, position: Geographic, style: &PointStyle) {
        trace!("Overlay point at {position:?} ({} {}px)", style.color, style.size);
        self.points += 1;
    }

    fn clear_overlay(&mut self) {
        self.points = 0;
    }

    fn show_readout(&mut self, text: &str) {
        self.readout = Some(text.into());
    }
}

/// Remembers the last rendered list so a command can print it once it's done.
#[derive(Debug, Default)]
pub struct TerminalList {
    shown: ListModel,
}

impl TerminalList {
    pub fn print(&self) {
        if !self.shown.is_visible() {
            println!("{}", "No markers".dimmed());
            return;
        }

        for entry in self.shown.entries() {
            println!(
                "{} {}\n  {}",
                format!("[{}]", entry.id).dimmed(),
                entry.description.bold(),
                entry.coordinates()
            );
        }
    }
}

impl ListRenderer for TerminalList {
    fn render(&mut self, list: &ListModel) {
        self.shown = list.clone();
    }
}

/// Reads the description from a line of stdin. An empty line or EOF dismisses the prompt.
#[derive(Debug, Clone, Default)]
pub struct StdinPrompt {
    /// Answer given up front on the command line
    preset: Option<String>,
}

impl StdinPrompt {
    pub fn answered(description: String) -> Self {
        Self {
            preset: Some(description),
        }
    }
}

impl DescriptionPrompt for StdinPrompt {
    fn ask(&self, question: &str) -> impl Future<Output = Option<String>> {
        let question = question.to_string();
        let preset = self.preset.clone();
        async move {
            if preset.is_some() {
                return preset;
            }

            print!("{} ", question.cyan());
            io::stdout().flush().ok()?;

            let mut line = String::new();
            let read = BufReader::new(tokio::io::stdin())
                .read_line(&mut line)
                .await
                .ok()?;

            (read > 0).then_some(line)
        }
    }
}

/// Shares by printing the payload, when enabled.
#[derive(Debug, Clone, Copy)]
pub struct TerminalShare {
    pub enabled: bool,
}

impl Share for TerminalShare {
    fn share(&self, payload: &SharePayload) -> impl Future<Output = Result<(), ShareError>> {
        let result = if self.enabled {
            println!(
                "{}\n{}\n{}",
                payload.title.bold(),
                payload.text,
                payload.url.underline()
            );
            Ok(())
        } else {
            Err(ShareError::Unsupported)
        };

        std::future::ready(result)
    }
}
