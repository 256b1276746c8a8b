use othello_engine::board::apply::apply_move;
use othello_engine::board::movegen::{has_any_moves, is_valid_move, valid_moves, valid_moves_mask, valid_moves_reference};
use othello_engine::board::{BoardState, Color, Position};
use othello_engine::eval::verify::random_positions;
use pretty_assertions::assert_eq;

fn sq(s: &str) -> Position { Position::from_algebraic(s).unwrap() }

#[test]
fn flood_matches_reference_on_random_playouts() {
    for (board, color) in random_positions(0xC0FFEE, 60) {
        assert_eq!(valid_moves(&board, color), valid_moves_reference(&board, color), "board {:#x}/{:#x}", board.black(), board.white());
    }
}

#[test]
fn point_check_agrees_with_mask_everywhere() {
    for (board, color) in random_positions(99, 10) {
        let mask = valid_moves_mask(&board, color);
        for idx in 0u8..64 {
            let p = Position::from_index(idx).unwrap();
            assert_eq!(is_valid_move(&board, color, p), mask.contains(p), "square {} for {}", p, color);
        }
    }
}

#[test]
fn moves_are_sorted_row_then_column() {
    for (board, color) in random_positions(5, 10) {
        let m = valid_moves(&board, color);
        let mut sorted = m.clone();
        sorted.sort_by_key(|p| (p.row(), p.col()));
        assert_eq!(m, sorted);
    }
}

#[test]
fn start_position_black_moves() {
    let b = BoardState::initial();
    assert_eq!(valid_moves(&b, Color::Black), vec![sq("d3"), sq("c4"), sq("f5"), sq("e6")]);
    assert!(has_any_moves(&b, Color::White));
}

#[test]
fn every_generated_move_applies() {
    for (board, color) in random_positions(17, 5) {
        for p in valid_moves(&board, color) {
            assert!(apply_move(&board, color, p).is_ok(), "{} rejected", p);
        }
    }
}

#[test]
fn edge_runs_do_not_wrap() {
    // white run on the h file ending at h8 with black above: nothing past the edge
    let b: BoardState = "
        .......B
        .......W
        .......W
        .......W
        .......W
        .......W
        .......W
        ........".parse().unwrap();
    assert_eq!(valid_moves(&b, Color::Black), vec![sq("h8")]);
    assert_eq!(valid_moves_reference(&b, Color::Black), vec![sq("h8")]);
}
