// Entry point for the Minesweeper TUI
// Parses options, installs logging when asked, and launches the main UI

use clap::Parser;
use std::error::Error;
use std::fs::File;
use std::sync::Mutex;

use tsweep::tsw_cli::Cli;
use tsweep::tsw_ui::{self, Options};

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    // Logs go to a file only; the alternate screen owns the terminal
    if let Some(path) = &cli.log {
        let file = File::create(path)?;
        tracing_subscriber::fmt()
            .with_writer(Mutex::new(file))
            .with_ansi(false)
            .with_max_level(tracing::Level::DEBUG)
            .init();
    }

    let (term_w, term_h) = crossterm::terminal::size()?;
    let preset = cli.preset(term_w, term_h)?;

    tsw_ui::run(Options {
        preset,
        seed: cli.seed,
        ascii: cli.ascii,
    })
}
