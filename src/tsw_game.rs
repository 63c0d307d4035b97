// Core game engine
// Owns board state, deferred mine placement, flood-fill reveal, flags and timing

use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::error::Error;
use std::fmt;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Board coordinate as (x, y)
pub type Square = (usize, usize);

/// Cursor movement direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

/// Contents of a revealed square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reveal {
    Clue(u8), // Adjacent mine count (0-8)
    Mine,     // Uncovered when the game was lost
}

/// Display tag for one cell, decided purely from board state.
/// The presentation layer maps these to glyphs and colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellView {
    Blank,
    Flagged,
    Marked,
    Clue(u8),
    Mine,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Face {
    Playing,
    Won,
    Lost,
}

/// Header values: mine counter, clock and face
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub remaining_mines: isize, // Total mines minus flags
    pub elapsed: Duration,      // Zero until the first reveal
    pub face: Face,
}

impl Status {
    /// Elapsed time rounded to whole seconds
    pub fn elapsed_secs(&self) -> u64 {
        let millis = self.elapsed.as_millis() + 500;
        u64::try_from(millis / 1000).unwrap_or(u64::MAX)
    }
}

/// Rejected board dimensions or mine count
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    EmptyBoard { width: usize, height: usize },
    NoMines,
    TooManyMines { mines: usize, max: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::EmptyBoard { width, height } => {
                write!(f, "board must be at least 1x1, got {}x{}", width, height)
            }
            ConfigError::NoMines => write!(f, "board needs at least one mine"),
            ConfigError::TooManyMines { mines, max } => {
                write!(f, "{} mines do not fit, at most {} allowed", mines, max)
            }
        }
    }
}

impl Error for ConfigError {}

/// A single square of a committed layout
#[derive(Clone, Copy)]
struct Cell {
    mine: bool, // Contains a mine
    adj: u8,    // Adjacent mine count (0-8)
}

/// Mine positions with precomputed clues.
/// Only exists once the first reveal has been committed.
#[derive(Clone)]
struct MineLayout {
    cells: Vec<Cell>,
}

impl MineLayout {
    fn build(w: usize, h: usize, mines: impl IntoIterator<Item = usize>) -> Self {
        let mut cells = vec![Cell { mine: false, adj: 0 }; w * h];
        for i in mines {
            cells[i].mine = true;
        }
        for y in 0..h {
            for x in 0..w {
                let adj = neighbors(w, h, (x, y))
                    .filter(|&(ox, oy)| cells[oy * w + ox].mine)
                    .count();
                cells[y * w + x].adj = adj as u8;
            }
        }
        MineLayout { cells }
    }
}

/// Player annotation on a hidden square
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Annotation {
    None,
    Flag,
    Mark, // "unsure", does not count against the mine budget
}

/// Main game state
#[derive(Clone)]
pub struct Game {
    w: usize,                       // Board width
    h: usize,                       // Board height
    mines: usize,                   // Total mine count
    cursor: Square,                 // Active square
    layout: Option<MineLayout>,     // None until the first reveal
    revealed: Vec<Option<Reveal>>,  // Per-square reveal state
    annotations: Vec<Annotation>,   // Per-square flag/mark state
    safe_revealed: usize,           // Number of revealed clues
    flag_count: usize,              // Number of flagged squares
    exploded: Option<Square>,       // The mine that ended the game
    start_time: Option<Instant>,    // Set on the first reveal
    end_time: Option<Instant>,      // Set once on win or loss
    rng: StdRng,
}

impl Game {
    /// Create a new pre-game board seeded from OS entropy
    pub fn new(w: usize, h: usize, mines: usize) -> Result<Self, ConfigError> {
        Self::with_rng(w, h, mines, StdRng::from_entropy())
    }

    /// Create a new pre-game board whose layouts are reproducible from `seed`
    pub fn with_seed(w: usize, h: usize, mines: usize, seed: u64) -> Result<Self, ConfigError> {
        Self::with_rng(w, h, mines, StdRng::seed_from_u64(seed))
    }

    fn with_rng(w: usize, h: usize, mines: usize, rng: StdRng) -> Result<Self, ConfigError> {
        validate(w, h, mines)?;
        let n = w * h;
        let mut game = Game {
            w,
            h,
            mines,
            cursor: (0, 0),
            layout: None,
            revealed: vec![None; n],
            annotations: vec![Annotation::None; n],
            safe_revealed: 0,
            flag_count: 0,
            exploded: None,
            start_time: None,
            end_time: None,
            rng,
        };
        game.restart();
        Ok(game)
    }

    pub fn width(&self) -> usize {
        self.w
    }

    pub fn height(&self) -> usize {
        self.h
    }

    pub fn mine_count(&self) -> usize {
        self.mines
    }

    pub fn active_square(&self) -> Square {
        self.cursor
    }

    fn index(&self, (x, y): Square) -> usize {
        y * self.w + x
    }

    fn square_at(&self, i: usize) -> Square {
        (i % self.w, i / self.w)
    }

    fn is_mine(&self, i: usize) -> bool {
        self.layout.as_ref().is_some_and(|l| l.cells[i].mine)
    }

    /// Reset to a fresh pre-game board of the same size and mine count
    pub fn restart(&mut self) {
        self.cursor = (self.w / 2, self.h / 2);
        self.layout = None;
        self.revealed.fill(None);
        self.annotations.fill(Annotation::None);
        self.safe_revealed = 0;
        self.flag_count = 0;
        self.exploded = None;
        self.start_time = None;
        self.end_time = None;
        debug!(width = self.w, height = self.h, mines = self.mines, "board reset");
    }

    /// Step the active square one cell, wrapping around the board edges
    pub fn move_active(&mut self, direction: Direction) {
        if self.is_over() {
            return;
        }
        let (x, y) = self.cursor;
        self.cursor = match direction {
            Direction::Up => (x, if y == 0 { self.h - 1 } else { y - 1 }),
            Direction::Down => (x, if y + 1 >= self.h { 0 } else { y + 1 }),
            Direction::Left => (if x == 0 { self.w - 1 } else { x - 1 }, y),
            Direction::Right => (if x + 1 >= self.w { 0 } else { x + 1 }, y),
        };
    }

    /// Jump the active square to `square` (mouse input).
    /// Coordinates past the far edge wrap to 0.
    pub fn set_active_square(&mut self, (x, y): Square) {
        if self.is_over() {
            return;
        }
        let x = if x >= self.w { 0 } else { x };
        let y = if y >= self.h { 0 } else { y };
        self.cursor = (x, y);
    }

    /// Cycle the active square: none -> flag -> mark -> none.
    /// Flags are capped at the mine count and only allowed once mines are laid.
    pub fn cycle_flag(&mut self) {
        if self.is_over() || self.layout.is_none() {
            return;
        }
        let idx = self.index(self.cursor);
        if self.revealed[idx].is_some() {
            return;
        }
        let next = match self.annotations[idx] {
            Annotation::Flag => {
                self.flag_count -= 1;
                Annotation::Mark
            }
            Annotation::Mark => Annotation::None,
            Annotation::None if self.flag_count < self.mines => {
                self.flag_count += 1;
                Annotation::Flag
            }
            Annotation::None => {
                debug!(square = ?self.cursor, "flag refused, all flags in use");
                Annotation::None
            }
        };
        self.annotations[idx] = next;
    }

    /// Reveal the active square
    /// - First reveal places mines away from it and starts the clock
    /// - A mine ends the game and uncovers every mine
    /// - A zero clue cascades through its connected zero region
    pub fn reveal_active_square(&mut self) {
        if self.is_over() {
            return;
        }
        let square = self.cursor;
        let idx = self.index(square);
        if self.annotations[idx] == Annotation::Flag || self.revealed[idx].is_some() {
            return;
        }
        if self.layout.is_none() {
            self.place_mines(square);
        }
        if self.start_time.is_none() {
            self.start_time = Some(Instant::now());
        }
        if self.is_mine(idx) {
            self.explode(square);
            return;
        }
        self.flood_reveal(square);
        if self.is_won() {
            self.end_time = Some(Instant::now());
            info!(secs = self.status().elapsed_secs(), "game won");
        }
    }

    /// Draw the mines without replacement from every square except `avoid`
    fn place_mines(&mut self, avoid: Square) {
        let avoid_idx = self.index(avoid);
        let free: Vec<usize> = (0..self.w * self.h).filter(|&i| i != avoid_idx).collect();
        let picked: Vec<usize> = free
            .choose_multiple(&mut self.rng, self.mines)
            .copied()
            .collect();
        self.layout = Some(MineLayout::build(self.w, self.h, picked));
        debug!(mines = self.mines, avoid = ?avoid, "mines placed");
    }

    fn explode(&mut self, square: Square) {
        for i in 0..self.w * self.h {
            if self.is_mine(i) {
                self.revealed[i] = Some(Reveal::Mine);
            }
        }
        self.exploded = Some(square);
        self.end_time = Some(Instant::now());
        info!(square = ?square, secs = self.status().elapsed_secs(), "game lost");
    }

    /// Worklist flood fill. Squares already revealed are skipped, so every
    /// square is processed at most once.
    fn flood_reveal(&mut self, start: Square) {
        let mut stack = vec![start];
        while let Some(square) = stack.pop() {
            let idx = self.index(square);
            if self.revealed[idx].is_some() {
                continue;
            }
            let adj = self.layout.as_ref().map_or(0, |l| l.cells[idx].adj);
            self.revealed[idx] = Some(Reveal::Clue(adj));
            self.safe_revealed += 1;
            // Cascades uncover annotated squares too; their annotation goes away
            if self.annotations[idx] == Annotation::Flag {
                self.flag_count -= 1;
            }
            self.annotations[idx] = Annotation::None;
            if adj == 0 {
                stack.extend(
                    neighbors(self.w, self.h, square)
                        .filter(|&n| self.revealed[self.index(n)].is_none()),
                );
            }
        }
    }

    pub fn is_lost(&self) -> bool {
        self.exploded.is_some()
    }

    pub fn is_won(&self) -> bool {
        !self.is_lost() && self.safe_revealed == self.w * self.h - self.mines
    }

    pub fn is_over(&self) -> bool {
        self.is_won() || self.is_lost()
    }

    /// True while a round is in progress (at least one reveal, not over)
    pub fn is_started(&self) -> bool {
        !self.is_over() && self.safe_revealed > 0
    }

    pub fn exploded_square(&self) -> Option<Square> {
        self.exploded
    }

    /// Mine positions; empty until the first reveal
    pub fn mined_squares(&self) -> Vec<Square> {
        (0..self.w * self.h)
            .filter(|&i| self.is_mine(i))
            .map(|i| self.square_at(i))
            .collect()
    }

    pub fn revealed_at(&self, (x, y): Square) -> Option<Reveal> {
        if x >= self.w || y >= self.h {
            return None;
        }
        self.revealed[self.index((x, y))]
    }

    /// Number of revealed squares, including mines uncovered by a loss
    pub fn revealed_count(&self) -> usize {
        self.revealed.iter().filter(|r| r.is_some()).count()
    }

    pub fn flagged_squares(&self) -> Vec<Square> {
        self.annotated(Annotation::Flag)
    }

    pub fn marked_squares(&self) -> Vec<Square> {
        self.annotated(Annotation::Mark)
    }

    fn annotated(&self, which: Annotation) -> Vec<Square> {
        self.annotations
            .iter()
            .enumerate()
            .filter(|(_, a)| **a == which)
            .map(|(i, _)| self.square_at(i))
            .collect()
    }

    pub fn flag_count(&self) -> usize {
        self.flag_count
    }

    /// Display tag for a square; off-board squares read as blank.
    /// Priority: mine > flag > mark > clue > blank.
    pub fn cell(&self, square: Square) -> CellView {
        if square.0 >= self.w || square.1 >= self.h {
            return CellView::Blank;
        }
        let idx = self.index(square);
        if self.is_mine(idx) && (self.revealed[idx].is_some() || self.is_over()) {
            return CellView::Mine;
        }
        match (self.annotations[idx], self.revealed[idx]) {
            (Annotation::Flag, _) => CellView::Flagged,
            (Annotation::Mark, _) => CellView::Marked,
            (Annotation::None, Some(Reveal::Clue(n))) => CellView::Clue(n),
            (Annotation::None, Some(Reveal::Mine)) => CellView::Mine,
            (Annotation::None, None) => CellView::Blank,
        }
    }

    /// Render model, one row per y
    pub fn grid(&self) -> Vec<Vec<CellView>> {
        (0..self.h)
            .map(|y| (0..self.w).map(|x| self.cell((x, y))).collect())
            .collect()
    }

    pub fn status(&self) -> Status {
        let elapsed = match self.start_time {
            Some(t0) => self.end_time.unwrap_or_else(Instant::now).saturating_duration_since(t0),
            None => Duration::ZERO,
        };
        let face = if self.is_won() {
            Face::Won
        } else if self.is_lost() {
            Face::Lost
        } else {
            Face::Playing
        };
        Status {
            remaining_mines: self.mines as isize - self.flag_count as isize,
            elapsed,
            face,
        }
    }
}

/// Check dimensions and mine count before building a board
pub fn validate(w: usize, h: usize, mines: usize) -> Result<(), ConfigError> {
    if w == 0 || h == 0 {
        return Err(ConfigError::EmptyBoard { width: w, height: h });
    }
    if mines == 0 {
        return Err(ConfigError::NoMines);
    }
    let max = w.saturating_mul(h) - 1;
    if mines > max {
        return Err(ConfigError::TooManyMines { mines, max });
    }
    Ok(())
}

/// In-bounds neighbours of a square (up to 8, never wrapping)
fn neighbors(w: usize, h: usize, (x, y): Square) -> impl Iterator<Item = Square> {
    let xs = x.saturating_sub(1)..=(x + 1).min(w - 1);
    (y.saturating_sub(1)..=(y + 1).min(h - 1))
        .flat_map(move |oy| xs.clone().map(move |ox| (ox, oy)))
        .filter(move |&sq| sq != (x, y))
}
