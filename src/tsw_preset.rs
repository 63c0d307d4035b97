// Board size presets and custom size bounds
// Used by the CLI and the size picker before a Game is constructed

use std::error::Error;
use std::fmt;

use crate::tsw_game::{self, ConfigError};

/// Rows taken by the header, spacing, banner and instructions around the board
pub const CHROME_ROWS: usize = 8;

/// Board size presets and custom settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Tiny,                        // 5x5, 3 mines
    Small,                       // 9x9, 10 mines
    Medium,                      // 13x13, 15 mines
    Large,                       // 17x17, 20 mines
    Huge,                        // 21x21, 25 mines
    Custom(usize, usize, usize), // width, height, mines
}

impl Preset {
    /// Every fixed preset, in picker order
    pub const ALL: [Preset; 5] = [
        Preset::Tiny,
        Preset::Small,
        Preset::Medium,
        Preset::Large,
        Preset::Huge,
    ];

    /// Get board dimensions (width, height, mine count)
    pub fn params(&self) -> (usize, usize, usize) {
        match self {
            Preset::Tiny => (5, 5, 3),
            Preset::Small => (9, 9, 10),
            Preset::Medium => (13, 13, 15),
            Preset::Large => (17, 17, 20),
            Preset::Huge => (21, 21, 25),
            Preset::Custom(w, h, n) => (*w, *h, *n),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Preset::Tiny => "Tiny",
            Preset::Small => "Small",
            Preset::Medium => "Medium",
            Preset::Large => "Large",
            Preset::Huge => "Huge",
            Preset::Custom(_, _, _) => "Custom",
        }
    }

    /// Picker label, e.g. "Small   9x9   10 mines"
    pub fn label(&self) -> String {
        let (w, h, n) = self.params();
        format!("{:<7}{:>2}x{:<2}  {:>2} mines", self.name(), w, h, n)
    }

    /// Whether the board fits on a terminal of the given size.
    /// Each square takes two columns and the board is given twice its height in rows.
    pub fn fits(&self, term_w: u16, term_h: u16) -> bool {
        let (w, h, _) = self.params();
        w * 2 <= usize::from(term_w) && h * 2 <= usize::from(term_h)
    }

    /// Build a custom preset, checking it against the terminal and engine bounds
    /// - width in [1, term_w / 2]
    /// - height in [1, term_h - CHROME_ROWS]
    /// - mines in [1, width * height - 1]
    pub fn custom(
        w: usize,
        h: usize,
        mines: usize,
        term_w: u16,
        term_h: u16,
    ) -> Result<Preset, PresetError> {
        let max_w = usize::from(term_w) / 2;
        let max_h = usize::from(term_h).saturating_sub(CHROME_ROWS);
        if !(1..=max_w).contains(&w) {
            return Err(PresetError::Width { value: w, max: max_w });
        }
        if !(1..=max_h).contains(&h) {
            return Err(PresetError::Height { value: h, max: max_h });
        }
        tsw_game::validate(w, h, mines).map_err(PresetError::Board)?;
        Ok(Preset::Custom(w, h, mines))
    }
}

impl std::str::FromStr for Preset {
    type Err = PresetError;

    /// Parse a fixed preset by name, case-insensitively
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PresetError::UnknownName(s.to_string()))
    }
}

/// Rejected preset name or custom size
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PresetError {
    UnknownName(String),
    Width { value: usize, max: usize },
    Height { value: usize, max: usize },
    Board(ConfigError),
}

impl fmt::Display for PresetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PresetError::UnknownName(name) => {
                let names: Vec<&str> = Preset::ALL.iter().map(|p| p.name()).collect();
                write!(f, "unknown size '{}', expected one of {}", name, names.join(", "))
            }
            PresetError::Width { value, max } => {
                write!(f, "width {} out of range, must be 1-{} for this terminal", value, max)
            }
            PresetError::Height { value, max } => {
                write!(f, "height {} out of range, must be 1-{} for this terminal", value, max)
            }
            PresetError::Board(e) => write!(f, "{}", e),
        }
    }
}

impl Error for PresetError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            PresetError::Board(e) => Some(e),
            _ => None,
        }
    }
}
