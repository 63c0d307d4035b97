// Command line options

use clap::Parser;
use std::path::PathBuf;

use crate::tsw_preset::{Preset, PresetError};

/// Play Minesweeper in the terminal
#[derive(Debug, Parser)]
#[command(name = "tsweep", version, about)]
pub struct Cli {
    /// Board size preset (tiny, small, medium, large, huge); skips the size picker
    #[arg(
        short,
        long,
        value_parser = parse_preset,
        conflicts_with_all = ["width", "height", "mines"]
    )]
    pub size: Option<Preset>,

    /// Custom board width
    #[arg(long, requires_all = ["height", "mines"])]
    pub width: Option<usize>,

    /// Custom board height
    #[arg(long, requires_all = ["width", "mines"])]
    pub height: Option<usize>,

    /// Custom mine count
    #[arg(long, requires_all = ["width", "height"])]
    pub mines: Option<usize>,

    /// Seed for reproducible mine layouts
    #[arg(long)]
    pub seed: Option<u64>,

    /// Use ASCII glyphs instead of Unicode sprites
    #[arg(long)]
    pub ascii: bool,

    /// Write debug logs to this file
    #[arg(long, value_name = "FILE")]
    pub log: Option<PathBuf>,
}

fn parse_preset(s: &str) -> Result<Preset, PresetError> {
    s.parse()
}

impl Cli {
    /// The board requested on the command line, if any.
    /// Custom sizes are checked against the terminal dimensions.
    pub fn preset(&self, term_w: u16, term_h: u16) -> Result<Option<Preset>, PresetError> {
        match (self.size, self.width, self.height, self.mines) {
            (Some(p), _, _, _) => Ok(Some(p)),
            (None, Some(w), Some(h), Some(n)) => Preset::custom(w, h, n, term_w, term_h).map(Some),
            _ => Ok(None),
        }
    }
}
