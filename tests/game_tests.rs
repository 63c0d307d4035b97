//! Engine tests through the public API

use std::collections::HashSet;
use tsweep::tsw_game::{CellView, ConfigError, Direction, Face, Game, Reveal, Square};

fn all_squares(game: &Game) -> Vec<Square> {
    (0..game.height())
        .flat_map(|y| (0..game.width()).map(move |x| (x, y)))
        .collect()
}

/// A seeded game that is still in progress after its first reveal
fn started_game(w: usize, h: usize, mines: usize) -> Game {
    (0..)
        .map(|seed| {
            let mut game = Game::with_seed(w, h, mines, seed).unwrap();
            game.reveal_active_square();
            game
        })
        .find(|game| game.is_started())
        .unwrap()
}

/// Reveal every safe square, in row order
fn clear_board(game: &mut Game) {
    let mines: HashSet<Square> = game.mined_squares().into_iter().collect();
    for sq in all_squares(game) {
        if !mines.contains(&sq) && game.revealed_at(sq).is_none() {
            game.set_active_square(sq);
            game.reveal_active_square();
        }
    }
}

#[test]
fn test_new_game_is_pre_game() {
    let game = Game::with_seed(9, 9, 10, 1).unwrap();
    assert_eq!(game.active_square(), (4, 4));
    assert!(game.mined_squares().is_empty());
    assert_eq!(game.revealed_count(), 0);
    assert!(!game.is_started());
    assert!(!game.is_over());
    let status = game.status();
    assert_eq!(status.remaining_mines, 10);
    assert_eq!(status.elapsed_secs(), 0);
    assert_eq!(status.face, Face::Playing);
    assert!(game.grid().iter().flatten().all(|c| *c == CellView::Blank));
}

#[test]
fn test_rejects_invalid_config() {
    assert!(matches!(Game::new(5, 0, 1), Err(ConfigError::EmptyBoard { .. })));
    assert!(matches!(Game::new(5, 5, 0), Err(ConfigError::NoMines)));
    assert!(matches!(
        Game::new(5, 5, 25),
        Err(ConfigError::TooManyMines { mines: 25, max: 24 })
    ));
    assert!(Game::new(5, 5, 24).is_ok());
}

#[test]
fn test_first_reveal_places_mines_away_from_click() {
    for seed in 0..50 {
        let mut game = Game::with_seed(5, 5, 3, seed).unwrap();
        assert!(game.mined_squares().is_empty());
        game.reveal_active_square();

        let mines = game.mined_squares();
        let distinct: HashSet<Square> = mines.iter().copied().collect();
        assert_eq!(mines.len(), 3, "seed {}", seed);
        assert_eq!(distinct.len(), 3, "seed {}", seed);
        assert!(!distinct.contains(&(2, 2)), "seed {}", seed);
        assert!(game.revealed_count() >= 1);
        assert!(!game.is_lost());
    }
}

#[test]
fn test_same_seed_same_layout() {
    let mut a = Game::with_seed(13, 13, 15, 99).unwrap();
    let mut b = Game::with_seed(13, 13, 15, 99).unwrap();
    a.reveal_active_square();
    b.reveal_active_square();
    assert_eq!(a.mined_squares(), b.mined_squares());
    assert_eq!(a.grid(), b.grid());
}

#[test]
fn test_move_wraps_both_axes() {
    let mut game = Game::with_seed(4, 3, 1, 0).unwrap();
    assert_eq!(game.active_square(), (2, 1));

    game.move_active(Direction::Right);
    game.move_active(Direction::Right);
    assert_eq!(game.active_square(), (0, 1));
    game.move_active(Direction::Left);
    assert_eq!(game.active_square(), (3, 1));

    game.move_active(Direction::Up);
    game.move_active(Direction::Up);
    assert_eq!(game.active_square(), (3, 2));
    game.move_active(Direction::Down);
    assert_eq!(game.active_square(), (3, 0));
}

#[test]
fn test_move_does_not_touch_board() {
    let mut game = Game::with_seed(5, 5, 3, 4).unwrap();
    game.move_active(Direction::Down);
    assert!(game.mined_squares().is_empty());
    assert_eq!(game.revealed_count(), 0);
}

#[test]
fn test_flag_requires_first_reveal() {
    let mut game = Game::with_seed(5, 5, 3, 2).unwrap();
    game.cycle_flag();
    assert_eq!(game.flag_count(), 0);
    assert_eq!(game.cell(game.active_square()), CellView::Blank);
}

#[test]
fn test_flag_cycle() {
    let mut game = started_game(9, 9, 10);
    let hidden = all_squares(&game)
        .into_iter()
        .find(|&sq| game.revealed_at(sq).is_none())
        .unwrap();
    game.set_active_square(hidden);

    game.cycle_flag();
    assert_eq!(game.cell(hidden), CellView::Flagged);
    assert_eq!(game.flagged_squares(), vec![hidden]);
    assert_eq!(game.status().remaining_mines, 9);

    game.cycle_flag();
    assert_eq!(game.cell(hidden), CellView::Marked);
    assert!(game.flagged_squares().is_empty());
    assert_eq!(game.marked_squares(), vec![hidden]);
    assert_eq!(game.status().remaining_mines, 10);

    game.cycle_flag();
    assert_eq!(game.cell(hidden), CellView::Blank);
    assert!(game.marked_squares().is_empty());
}

#[test]
fn test_flag_on_revealed_square_is_noop() {
    let mut game = Game::with_seed(9, 9, 10, 6).unwrap();
    game.reveal_active_square();
    game.cycle_flag();
    assert_eq!(game.flag_count(), 0);
}

#[test]
fn test_flagged_square_cannot_be_revealed_but_marked_can() {
    let mut game = started_game(9, 9, 10);
    let safe = all_squares(&game)
        .into_iter()
        .find(|&sq| game.revealed_at(sq).is_none() && !game.mined_squares().contains(&sq))
        .unwrap();

    game.set_active_square(safe);
    game.cycle_flag();
    game.reveal_active_square();
    assert_eq!(game.revealed_at(safe), None);

    game.cycle_flag();
    assert_eq!(game.cell(safe), CellView::Marked);
    game.reveal_active_square();
    assert!(matches!(game.revealed_at(safe), Some(Reveal::Clue(_))));
}

#[test]
fn test_flags_capped_at_mine_count() {
    let mut game = started_game(9, 9, 10);
    let hidden: Vec<Square> = all_squares(&game)
        .into_iter()
        .filter(|&sq| game.revealed_at(sq).is_none())
        .collect();
    assert!(hidden.len() > 10);

    for &sq in &hidden[..10] {
        game.set_active_square(sq);
        game.cycle_flag();
    }
    assert_eq!(game.flag_count(), 10);

    game.set_active_square(hidden[10]);
    game.cycle_flag();
    assert_eq!(game.flag_count(), 10);
    assert_eq!(game.cell(hidden[10]), CellView::Blank);
    assert_eq!(game.status().remaining_mines, 0);
}

#[test]
fn test_win() {
    let mut game = Game::with_seed(9, 9, 10, 21).unwrap();
    game.reveal_active_square();
    clear_board(&mut game);

    assert!(game.is_won());
    assert!(!game.is_lost());
    assert!(game.is_over());
    assert!(!game.is_started());
    assert_eq!(game.revealed_count(), 81 - 10);
    assert_eq!(game.status().face, Face::Won);
    for sq in game.mined_squares() {
        assert_eq!(game.cell(sq), CellView::Mine);
    }

    // Clock is frozen once the game ends
    let first = game.status().elapsed;
    std::thread::sleep(std::time::Duration::from_millis(5));
    assert_eq!(game.status().elapsed, first);
}

#[test]
fn test_loss() {
    let mut game = started_game(9, 9, 10);
    let mine = game.mined_squares()[0];
    game.set_active_square(mine);
    game.reveal_active_square();

    assert!(game.is_lost());
    assert!(!game.is_won());
    assert_eq!(game.exploded_square(), Some(mine));
    assert_eq!(game.status().face, Face::Lost);
    for sq in game.mined_squares() {
        assert_eq!(game.cell(sq), CellView::Mine);
        assert_eq!(game.revealed_at(sq), Some(Reveal::Mine));
    }

    let frozen = game.grid();
    game.move_active(Direction::Up);
    game.cycle_flag();
    game.reveal_active_square();
    assert_eq!(game.active_square(), mine);
    assert_eq!(game.grid(), frozen);
}

#[test]
fn test_restart_after_game_over() {
    let mut game = started_game(7, 4, 5);
    let mine = game.mined_squares()[0];
    game.set_active_square(mine);
    game.reveal_active_square();
    assert!(game.is_over());

    game.restart();
    assert_eq!(game.active_square(), (3, 2));
    assert!(game.mined_squares().is_empty());
    assert_eq!(game.revealed_count(), 0);
    assert!(game.flagged_squares().is_empty());
    assert!(game.marked_squares().is_empty());
    assert!(!game.is_over());
    assert_eq!(game.status().elapsed_secs(), 0);
    assert_eq!((game.width(), game.height(), game.mine_count()), (7, 4, 5));

    game.reveal_active_square();
    assert_eq!(game.mined_squares().len(), 5);
}

#[test]
fn test_restart_after_win() {
    let mut game = started_game(9, 9, 10);
    game.set_active_square(game.mined_squares()[0]);
    game.cycle_flag();
    assert_eq!(game.flag_count(), 1);
    clear_board(&mut game);
    assert!(game.is_won());

    game.restart();
    assert_eq!(game.active_square(), (4, 4));
    assert!(game.mined_squares().is_empty());
    assert_eq!(game.revealed_count(), 0);
    assert!(game.flagged_squares().is_empty());
    assert_eq!(game.flag_count(), 0);
    assert!(!game.is_won());
    assert!(!game.is_over());
    assert!(!game.is_started());
    assert_eq!(game.status().face, Face::Playing);
    assert_eq!(game.status().remaining_mines, 10);
    assert_eq!(game.status().elapsed_secs(), 0);
    assert!(game.grid().iter().flatten().all(|v| *v == CellView::Blank));

    game.reveal_active_square();
    assert_eq!(game.mined_squares().len(), 10);
    assert!(!game.is_lost());
}

#[test]
fn test_dense_board_wins_on_first_click() {
    let mut game = Game::with_seed(3, 3, 8, 0).unwrap();
    game.reveal_active_square();
    assert!(game.is_won());
    assert_eq!(game.revealed_at((1, 1)), Some(Reveal::Clue(8)));
}

#[test]
fn test_single_row_board() {
    let mut game = Game::with_seed(6, 1, 1, 3).unwrap();
    assert_eq!(game.active_square(), (3, 0));
    game.move_active(Direction::Up);
    assert_eq!(game.active_square(), (3, 0));
    game.reveal_active_square();
    assert!(!game.is_lost());
}
