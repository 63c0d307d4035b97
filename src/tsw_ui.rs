// Terminal UI: size picker, board rendering and input handling
// Only calls engine commands from the input path; the clock redraws on the poll tick

use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::terminal::{disable_raw_mode, enable_raw_mode};
use crossterm::{execute, terminal};
use ratatui::backend::{Backend, CrosstermBackend};
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Span, Spans, Text};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::{Frame, Terminal};
use std::error::Error;
use std::io;
use std::time::Duration;
use tracing::{info, warn};
use unicode_width::UnicodeWidthStr;

use crate::tsw_color::{CellContext, Depth, Theme};
use crate::tsw_game::{ConfigError, Direction, Game, Square};
use crate::tsw_preset::{CHROME_ROWS, Preset};

/// Startup options resolved from the command line
#[derive(Debug, Clone, Default)]
pub struct Options {
    pub preset: Option<Preset>, // Skip the picker when set
    pub seed: Option<u64>,      // Reproducible layouts
    pub ascii: bool,            // ASCII glyphs
}

enum Screen {
    Picker,
    Playing { preset: Preset, game: Game },
}

struct App {
    theme: Theme,
    seed: Option<u64>,
    screen: Screen,
    selected: usize,          // Highlighted picker entry
    grid_rect: Option<Rect>,  // Board area from the last frame, for mouse hits
    quit: bool,
}

impl App {
    fn new(opts: Options, term: (u16, u16)) -> Result<Self, ConfigError> {
        let mut app = App {
            theme: Theme::new(Depth::detect(), opts.ascii),
            seed: opts.seed,
            screen: Screen::Picker,
            selected: 0,
            grid_rect: None,
            quit: false,
        };
        let enabled = enabled_presets(term);
        app.selected = enabled.iter().position(|e| *e).unwrap_or(0);
        if let Some(preset) = opts.preset {
            app.start(preset, term)?;
        }
        Ok(app)
    }

    fn start(&mut self, preset: Preset, term: (u16, u16)) -> Result<(), ConfigError> {
        let (w, h, n) = preset.params();
        let game = match self.seed {
            Some(seed) => Game::with_seed(w, h, n, seed)?,
            None => Game::new(w, h, n)?,
        };
        if !preset.fits(term.0, term.1) {
            warn!(
                preset = preset.name(),
                cols = term.0,
                rows = term.1,
                "terminal too small for board"
            );
        }
        info!(preset = preset.name(), width = w, height = h, mines = n, "new game");
        self.screen = Screen::Playing { preset, game };
        Ok(())
    }

    fn on_key(&mut self, key: KeyEvent, term: (u16, u16)) -> Result<(), ConfigError> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.quit = true;
            return Ok(());
        }
        if matches!(key.code, KeyCode::Esc | KeyCode::Char('q')) {
            self.quit = true;
            return Ok(());
        }
        if matches!(self.screen, Screen::Picker) {
            return self.on_picker_key(key.code, term);
        }
        if key.code == KeyCode::Char('n') {
            self.screen = Screen::Picker;
            self.grid_rect = None;
            return Ok(());
        }
        let Screen::Playing { game, .. } = &mut self.screen else {
            return Ok(());
        };
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => game.move_active(Direction::Up),
            KeyCode::Down | KeyCode::Char('j') => game.move_active(Direction::Down),
            KeyCode::Left | KeyCode::Char('h') => game.move_active(Direction::Left),
            KeyCode::Right | KeyCode::Char('l') => game.move_active(Direction::Right),
            KeyCode::Char('f') | KeyCode::Char(' ') => game.cycle_flag(),
            KeyCode::Enter => game.reveal_active_square(),
            KeyCode::Char('r') => game.restart(),
            _ => {}
        }
        Ok(())
    }

    fn on_picker_key(&mut self, code: KeyCode, term: (u16, u16)) -> Result<(), ConfigError> {
        let enabled = enabled_presets(term);
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(i) = step_enabled(&enabled, self.selected, false) {
                    self.selected = i;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(i) = step_enabled(&enabled, self.selected, true) {
                    self.selected = i;
                }
            }
            KeyCode::Enter => {
                if enabled.get(self.selected).copied().unwrap_or(false) {
                    self.start(Preset::ALL[self.selected], term)?;
                }
            }
            _ => {}
        }
        Ok(())
    }

    /// Left click reveals, right click cycles the flag
    fn on_mouse(&mut self, m: MouseEvent) {
        let Some(area) = self.grid_rect else { return };
        let Screen::Playing { game, .. } = &mut self.screen else { return };
        if game.is_over() {
            return;
        }
        let Some(square) = hit_square(area, m.column, m.row) else { return };
        match m.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                game.set_active_square(square);
                game.reveal_active_square();
            }
            MouseEventKind::Down(MouseButton::Right) => {
                game.set_active_square(square);
                game.cycle_flag();
            }
            _ => {}
        }
    }

    fn draw<B: Backend>(&mut self, f: &mut Frame<B>) {
        f.render_widget(Clear, f.size());
        match &self.screen {
            Screen::Picker => draw_picker(f, &self.theme, self.selected),
            Screen::Playing { preset, game } => {
                self.grid_rect = draw_board(f, &self.theme, *preset, game);
            }
        }
    }
}

pub fn run(opts: Options) -> Result<(), Box<dyn Error>> {
    let term = terminal::size()?;
    let mut app = App::new(opts, term)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnableMouseCapture, terminal::EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.hide_cursor()?;

    let result = event_loop(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableMouseCapture, terminal::LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    result
}

fn event_loop<B: Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<(), Box<dyn Error>> {
    // Redraw at least this often so the clock keeps moving
    let tick_rate = Duration::from_millis(200);
    while !app.quit {
        terminal.draw(|f| app.draw(f))?;
        if event::poll(tick_rate)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    app.on_key(key, terminal::size()?)?;
                }
                Event::Mouse(m) => app.on_mouse(m),
                _ => {}
            }
        }
    }
    Ok(())
}

fn enabled_presets(term: (u16, u16)) -> Vec<bool> {
    Preset::ALL.iter().map(|p| p.fits(term.0, term.1)).collect()
}

/// Next enabled entry from `from`, wrapping around the list
fn step_enabled(enabled: &[bool], from: usize, forward: bool) -> Option<usize> {
    let n = enabled.len();
    (1..=n)
        .map(|k| if forward { (from + k) % n } else { (from + n * k - k) % n })
        .find(|&i| enabled[i])
}

/// Board square under a terminal cell; each square is two columns wide
fn hit_square(area: Rect, column: u16, row: u16) -> Option<Square> {
    if column < area.x || row < area.y || column >= area.right() || row >= area.bottom() {
        return None;
    }
    Some((usize::from((column - area.x) / 2), usize::from(row - area.y)))
}

/// Actions valid right now, e.g. "(←↓↑→ or hjkl)Move  (↵)Reveal  ..."
fn instructions(game: &Game, ascii: bool) -> String {
    let mut parts = Vec::new();
    if !game.is_over() {
        parts.push(if ascii { "(arrows or hjkl)Move" } else { "(←↓↑→ or hjkl)Move" });
    }
    if game.is_started() {
        parts.push(if ascii { "(f or space)Flag/Mark" } else { "(f or ␣)Flag/Mark" });
    }
    if !game.is_over() {
        parts.push(if ascii { "(enter)Reveal" } else { "(↵)Reveal" });
    }
    parts.push("(r)Restart");
    parts.push("(n)New");
    parts.push(if ascii { "(q or esc)Quit" } else { "(q or ⎋)Quit" });
    parts.join("  ")
}

fn center_line<'a>(text: Spans<'a>, area: Rect, row: u16) -> (Paragraph<'a>, Rect) {
    let rect = Rect::new(area.x, row, area.width, 1);
    (Paragraph::new(text).alignment(Alignment::Center), rect)
}

fn draw_picker<B: Backend>(f: &mut Frame<B>, theme: &Theme, selected: usize) {
    let size = f.size();
    let enabled = enabled_presets((size.width, size.height));
    let bold = Style::default().add_modifier(Modifier::BOLD);
    let mut lines = vec![Spans::from(Span::styled("Size:", bold)), Spans::from("")];
    for (i, preset) in Preset::ALL.iter().enumerate() {
        let marker = if i == selected { "› " } else { "  " };
        let (label, style) = if enabled[i] {
            let style = if i == selected {
                Style::default().add_modifier(Modifier::REVERSED)
            } else {
                Style::default()
            };
            (preset.label(), style)
        } else {
            let dim = Style::default().add_modifier(Modifier::DIM);
            (format!("{} (screen too small)", preset.label()), dim)
        };
        lines.push(Spans::from(vec![Span::raw(marker), Span::styled(label, style)]));
    }
    lines.push(Spans::from(""));
    let keys = if theme.ascii() {
        "(up/down or jk)Select  (enter)Play  (q or esc)Quit"
    } else {
        "(↑↓ or jk)Select  (↵)Play  (q or ⎋)Quit"
    };
    lines.push(Spans::from(keys));

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let width = u16::try_from(keys.width() + 2).unwrap_or(u16::MAX);
    let area = center_rect(width.min(size.width), height.min(size.height), size);
    f.render_widget(Paragraph::new(Text::from(lines)), area);
}

/// Draws the header, grid, banner and instructions; returns the grid area
fn draw_board<B: Backend>(
    f: &mut Frame<B>,
    theme: &Theme,
    preset: Preset,
    game: &Game,
) -> Option<Rect> {
    let size = f.size();
    let (w, h) = (game.width(), game.height());
    let help = instructions(game, theme.ascii());
    let need_w = u16::try_from((w * 2).max(help.width())).unwrap_or(u16::MAX);
    let need_h = u16::try_from(h + CHROME_ROWS).unwrap_or(u16::MAX);
    if size.width < need_w || size.height < need_h {
        draw_too_small(f, need_w, need_h);
        return None;
    }
    let top = size.y + (size.height - need_h) / 2;
    let status = game.status();

    // header: mines left, face, clock
    let (mine_icon, mine_style) = theme.counter();
    let (clock_icon, clock_style) = theme.clock();
    let header = Spans::from(vec![
        Span::styled(mine_icon, mine_style),
        Span::raw(format!(" {:03}  ", status.remaining_mines)),
        Span::styled(theme.face_glyph(status.face), theme.face_style(status.face)),
        Span::raw("  "),
        Span::styled(clock_icon, clock_style),
        Span::raw(format!(" {:03}", status.elapsed_secs())),
    ]);
    let (widget, rect) = center_line(header, size, top + 1);
    f.render_widget(widget, rect);

    // grid
    let exploded = game.exploded_square();
    let active = game.active_square();
    let mut lines = Vec::with_capacity(h);
    for (y, row) in game.grid().into_iter().enumerate() {
        let mut spans = Vec::with_capacity(w * 2);
        for (x, view) in row.into_iter().enumerate() {
            let ctx = CellContext {
                active: active == (x, y),
                exploded: exploded == Some((x, y)),
                face: status.face,
            };
            spans.push(Span::styled(theme.glyph(view), theme.cell_style(view, ctx)));
            spans.push(Span::raw(" "));
        }
        lines.push(Spans::from(spans));
    }
    let grid_w = u16::try_from(w * 2).unwrap_or(u16::MAX);
    let grid_h = u16::try_from(h).unwrap_or(u16::MAX);
    let grid_rect = Rect::new(size.x + (size.width - grid_w) / 2, top + 3, grid_w, grid_h);
    f.render_widget(Paragraph::new(Text::from(lines)), grid_rect);

    // footer: result banner then the key help
    let mut row = top + 4 + grid_h;
    if let Some((text, style)) = theme.banner(status.face) {
        let (widget, rect) = center_line(Spans::from(Span::styled(text, style)), size, row);
        f.render_widget(widget, rect);
        row += 1;
    }
    let (widget, rect) = center_line(Spans::from(help), size, row);
    f.render_widget(widget, rect);

    let title = format!(" {} ", preset.name());
    let dim = Style::default().add_modifier(Modifier::DIM);
    let (widget, rect) = center_line(Spans::from(Span::styled(title, dim)), size, top);
    f.render_widget(widget, rect);

    Some(grid_rect)
}

fn draw_too_small<B: Backend>(f: &mut Frame<B>, need_w: u16, need_h: u16) {
    let size = f.size();
    let warn_lines = vec![
        Spans::from(Span::raw("Terminal size too small.")),
        Spans::from(Span::raw(format!("Minimum required: {} x {}", need_w, need_h))),
        Spans::from(Span::raw("(r)Restart  (n)New  (q)Quit")),
    ];
    let warn = Paragraph::new(Text::from(warn_lines))
        .block(Block::default().borders(Borders::ALL).title("Resize Terminal"))
        .alignment(Alignment::Center);
    let w = 40u16.min(size.width);
    let h = 5u16.min(size.height);
    f.render_widget(warn, center_rect(w, h, size));
}

fn center_rect(width: u16, height: u16, r: Rect) -> Rect {
    let x = r.x + (r.width.saturating_sub(width)) / 2;
    let y = r.y + (r.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
