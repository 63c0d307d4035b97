// Terminal Minesweeper
// tsw_game is the engine; the other modules are presentation around it

pub mod tsw_cli;    // Command line options
pub mod tsw_color;  // Glyphs and terminal-matched colors
pub mod tsw_game;   // Board state, reveal, flags, win/loss and timing
pub mod tsw_preset; // Board size presets and custom size bounds
pub mod tsw_ui;     // Terminal UI and event loop
