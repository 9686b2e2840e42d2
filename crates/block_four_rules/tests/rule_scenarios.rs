//! End-to-end rule scenarios played through the public `Game` API.

use block_four_rules::{
    Board, Cell, Game, Move, MoveError, Outcome, Phase, Player, Position, Supply, rules,
};
use rand::{Rng, SeedableRng, rngs::StdRng};

fn at(index: usize) -> Position {
    Position::from_index(index).expect("index in range")
}

/// 48 placements that fill every cell but 41 without a four-in-a-row.
/// Every move obeys the frontier rule.
const DRAW_GAME: [usize; 48] = [
    24, 23, 17, 10, 18, 12, 5, 6, 13, 20, 19, 26, 32, 33, 27, 34, 40, 39, 45, 44, 36, 30, 29, 28,
    22, 21, 14, 8, 0, 7, 1, 2, 3, 11, 4, 15, 9, 16, 31, 25, 35, 43, 42, 47, 46, 38, 37, 48,
];

#[test]
fn test_center_then_adjacency_scenario() {
    let mut game = Game::new();

    game.place(Position::CENTER).expect("center accepted");
    assert_eq!(game.to_move(), Player::Blue);

    game.place(at(23)).expect("23 touches the center");
    assert_eq!(game.to_move(), Player::Red);

    // 25 touches the center but 23 still has empty neighbours.
    assert_eq!(game.place(at(25)), Err(MoveError::OffFrontier(at(25))));
    assert_eq!(game.to_move(), Player::Red, "rejection keeps the turn");
    assert_eq!(game.history().len(), 2);
}

#[test]
fn test_nothing_but_center_before_center() {
    let mut game = Game::new();
    for index in (0..49).filter(|i| *i != 24) {
        assert_eq!(game.place(at(index)), Err(MoveError::CenterRequired));
    }
    assert_eq!(game.phase(), Phase::AwaitingCenter);
}

#[test]
fn test_top_row_win_detected() {
    let mut board = Board::new();
    for index in [0, 1, 2, 3] {
        board.set(at(index), Cell::Occupied(Player::Red));
    }
    assert!(rules::check_win(&board, at(3), Player::Red));
}

#[test]
fn test_undo_inverts_placement() {
    let mut game = Game::new();
    for index in [24, 31, 30, 29] {
        game.place(at(index)).expect("legal move");
    }
    let board_before = game.board().clone();
    let supply_before = *game.supply();
    let turn_before = game.to_move();

    game.place(at(22)).expect("22 touches 29");
    game.undo().expect("undo accepted");

    assert_eq!(game.board(), &board_before);
    assert_eq!(game.supply(), &supply_before);
    assert_eq!(game.to_move(), turn_before);
}

#[test]
fn test_undo_back_to_center_then_refused() {
    let mut game = Game::new();
    for index in [24, 25, 26] {
        game.place(at(index)).expect("legal move");
    }
    game.undo().expect("undo 26");
    game.undo().expect("undo 25");
    assert_eq!(game.undo().map(|u| u.mv), Err(MoveError::CenterImmutable));
    assert_eq!(game.to_move(), Player::Blue);
    assert_eq!(game.supply(), &Supply::new());
}

#[test]
fn test_turn_alternates_only_on_acceptance() {
    let mut game = Game::new();
    let mut expected = Player::Red;
    for index in [24, 24, 16, 0, 8, 8, 9] {
        if game.place(at(index)).is_ok() {
            expected = expected.opponent();
        }
        assert_eq!(game.to_move(), expected);
    }
}

#[test]
fn test_full_game_without_line_is_draw() {
    let moves: Vec<Move> = DRAW_GAME
        .iter()
        .enumerate()
        .map(|(i, &index)| {
            let player = if i % 2 == 0 { Player::Red } else { Player::Blue };
            Move::new(player, at(index))
        })
        .collect();

    let (last, rest) = moves.split_last().expect("non-empty");
    let mut game = Game::replay(rest).expect("47 legal moves");
    assert!(!game.is_over());
    assert_eq!(game.supply(), &Supply::with_counts(0, 1));

    let placement = game.place_as(*last).expect("final move accepted");
    assert_eq!(placement.outcome, Some(Outcome::Draw));
    assert_eq!(game.phase(), Phase::Finished(Outcome::Draw));
    assert!(game.supply().is_exhausted());
    assert_eq!(game.board().filled(), 48);
    assert!(game.board().is_empty(at(41)));
}

#[test]
fn test_winning_move_ends_game_before_supply_runs_out() {
    // Red completes 24-27 on row 3 with pieces to spare.
    let mut game = Game::new();
    for index in [24, 17, 25, 18, 26, 19, 27] {
        game.place(at(index)).expect("legal move");
    }
    assert_eq!(game.outcome(), Some(Outcome::Winner(Player::Red)));
    assert_eq!(game.to_move(), Player::Red);
    assert_eq!(game.supply().red(), 20);
}

#[test]
fn test_undo_inverts_every_legal_placement_in_random_playouts() {
    let mut rng = StdRng::seed_from_u64(0xB10C_4);

    for _ in 0..200 {
        let mut game = Game::new();
        game.place(Position::CENTER).expect("center accepted");

        loop {
            let legal = game.legal_positions();
            if legal.is_empty() {
                break;
            }

            for &pos in &legal {
                let mut trial = game.clone();
                let placement = trial.place(pos).expect("legal position accepted");
                if placement.outcome.is_some() {
                    // Undo is only offered while the game is running.
                    continue;
                }
                trial.undo().expect("undo after a fresh placement");
                assert_eq!(trial.board(), game.board(), "board after undoing {}", pos);
                assert_eq!(trial.supply(), game.supply(), "supply after undoing {}", pos);
                assert_eq!(trial.to_move(), game.to_move(), "turn after undoing {}", pos);
                assert_eq!(trial.history(), game.history(), "history after undoing {}", pos);
            }

            let pos = legal[rng.random_range(0..legal.len())];
            if game.place(pos).expect("legal position accepted").outcome.is_some() {
                break;
            }
        }
    }
}
