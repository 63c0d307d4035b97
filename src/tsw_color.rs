// Glyphs and colors for the board
// Maps engine display tags to sprites and styles matched to the terminal's color depth

use ratatui::style::{Color, Modifier, Style};
use term_color_support::ColorSupport;

use crate::tsw_game::{CellView, Face};

/// How many colors the terminal can show
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Depth {
    TrueColor,
    Indexed,
    Basic,
}

impl Depth {
    pub fn detect() -> Self {
        let support = ColorSupport::stdout();
        if support.has_16m {
            Depth::TrueColor
        } else if support.has_256 {
            Depth::Indexed
        } else {
            Depth::Basic
        }
    }
}

/// Windows Terminal "Campbell" values for the 16 ANSI colors: ((R, G, B), 256-color index)
fn campbell(c: Color) -> Option<((u8, u8, u8), u8)> {
    match c {
        Color::Black => Some(((12, 12, 12), 232)),
        Color::Red => Some(((197, 15, 31), 160)),
        Color::Green => Some(((19, 161, 14), 28)),
        Color::Yellow => Some(((193, 156, 0), 178)),
        Color::Blue => Some(((0, 55, 218), 20)),
        Color::Magenta => Some(((136, 23, 152), 90)),
        Color::Cyan => Some(((58, 150, 221), 38)),
        Color::Gray => Some(((204, 204, 204), 250)),
        Color::DarkGray => Some(((118, 118, 118), 243)),
        Color::LightRed => Some(((231, 72, 86), 203)),
        Color::LightGreen => Some(((22, 198, 12), 46)),
        Color::LightYellow => Some(((249, 241, 165), 229)),
        Color::LightBlue => Some(((59, 120, 255), 63)),
        Color::LightMagenta => Some(((180, 0, 158), 163)),
        Color::LightCyan => Some(((97, 214, 214), 116)),
        Color::White => Some(((242, 242, 242), 255)),
        _ => None,
    }
}

/// Where a cell sits relative to the cursor and the game outcome
#[derive(Debug, Clone, Copy)]
pub struct CellContext {
    pub active: bool,   // Cursor is on this cell
    pub exploded: bool, // This is the mine that ended the game
    pub face: Face,
}

pub struct Theme {
    depth: Depth,
    ascii: bool, // ASCII fallback glyphs
}

impl Theme {
    pub fn new(depth: Depth, ascii: bool) -> Self {
        Theme { depth, ascii }
    }

    pub fn ascii(&self) -> bool {
        self.ascii
    }

    /// Stable look across terminals: exact RGB with true color, a fixed
    /// 256-color index otherwise, and the plain ANSI color on 16-color terminals
    pub fn color(&self, c: Color) -> Color {
        match (campbell(c), self.depth) {
            (Some((rgb, _)), Depth::TrueColor) => Color::Rgb(rgb.0, rgb.1, rgb.2),
            (Some((_, index256)), Depth::Indexed) => Color::Indexed(index256),
            _ => c,
        }
    }

    fn fg(&self, c: Color) -> Style {
        Style::default().fg(self.color(c))
    }

    pub fn glyph(&self, view: CellView) -> &'static str {
        const CLUES: [&str; 9] = ["◻", "➊", "➋", "➌", "➍", "➎", "➏", "➐", "➑"];
        const ASCII_CLUES: [&str; 9] = [" ", "1", "2", "3", "4", "5", "6", "7", "8"];
        match (view, self.ascii) {
            (CellView::Blank, false) => "◼",
            (CellView::Blank, true) => ".",
            (CellView::Flagged, false) => "✖",
            (CellView::Flagged, true) => "F",
            (CellView::Marked, false) => "⍰",
            (CellView::Marked, true) => "?",
            (CellView::Mine, false) => "☀",
            (CellView::Mine, true) => "*",
            (CellView::Clue(n), false) => CLUES.get(usize::from(n)).copied().unwrap_or("?"),
            (CellView::Clue(n), true) => ASCII_CLUES.get(usize::from(n)).copied().unwrap_or("?"),
        }
    }

    pub fn cell_style(&self, view: CellView, ctx: CellContext) -> Style {
        let style = match view {
            CellView::Blank => Style::default(),
            CellView::Flagged => self.fg(Color::LightRed),
            CellView::Marked => self.fg(Color::LightMagenta),
            CellView::Mine if ctx.face == Face::Won => self.fg(Color::LightGreen),
            CellView::Mine if ctx.exploded => self.fg(Color::Black).bg(self.color(Color::LightRed)),
            CellView::Mine => self.fg(Color::LightRed),
            CellView::Clue(0) => Style::default().add_modifier(Modifier::DIM),
            CellView::Clue(1) => self.fg(Color::Blue),
            CellView::Clue(2) => self.fg(Color::Green),
            CellView::Clue(3) => self.fg(Color::Red),
            CellView::Clue(4) => self.fg(Color::Magenta),
            CellView::Clue(5) => self.fg(Color::Black),
            CellView::Clue(6) => self.fg(Color::LightRed),
            CellView::Clue(7) => self.fg(Color::White),
            CellView::Clue(_) => self.fg(Color::LightCyan),
        };
        if ctx.active && ctx.face == Face::Playing {
            style.add_modifier(Modifier::REVERSED)
        } else {
            style
        }
    }

    pub fn face_glyph(&self, face: Face) -> &'static str {
        match (face, self.ascii) {
            (Face::Playing, false) => "☺",
            (Face::Won, false) => "☻",
            (Face::Lost, false) => "☹",
            (Face::Playing, true) => ":)",
            (Face::Won, true) => "B)",
            (Face::Lost, true) => ":(",
        }
    }

    pub fn face_style(&self, face: Face) -> Style {
        match face {
            Face::Playing => self.fg(Color::LightCyan),
            Face::Won => self.fg(Color::LightYellow),
            Face::Lost => self.fg(Color::LightRed),
        }
    }

    /// Mine counter icon and style for the header
    pub fn counter(&self) -> (&'static str, Style) {
        (if self.ascii { "Mines" } else { "☀" }, self.fg(Color::LightRed))
    }

    /// Clock icon and style for the header
    pub fn clock(&self) -> (&'static str, Style) {
        (if self.ascii { "Time" } else { "◷" }, self.fg(Color::LightCyan))
    }

    pub fn banner(&self, face: Face) -> Option<(String, Style)> {
        let icon = self.face_glyph(face);
        match face {
            Face::Playing => None,
            Face::Won => Some((
                format!("{} YOU WON {}", icon, icon),
                self.fg(Color::LightGreen).add_modifier(Modifier::BOLD),
            )),
            Face::Lost => Some((
                format!("{} GAME OVER {}", icon, icon),
                self.fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
            )),
        }
    }
}
