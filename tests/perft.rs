use othello_engine::board::{BoardState, Color};
use othello_engine::perft::{divide, perft};

#[test]
fn perft_startpos_small_depths() {
    let b = BoardState::initial();
    assert_eq!(perft(&b, Color::Black, 1), 4);
    assert_eq!(perft(&b, Color::Black, 2), 12);
    assert_eq!(perft(&b, Color::Black, 3), 56);
    assert_eq!(perft(&b, Color::Black, 4), 244);
    assert_eq!(perft(&b, Color::Black, 5), 1396);
    assert_eq!(perft(&b, Color::Black, 6), 8200);
}

#[test]
fn divide_sums_to_perft() {
    let b = BoardState::initial();
    let parts = divide(&b, Color::Black, 6);
    assert_eq!(parts.len(), 4);
    assert_eq!(parts.iter().map(|(_, n)| n).sum::<u64>(), 8200);
    // the four openings are symmetric
    assert!(parts.iter().all(|(_, n)| *n == 2050));
}

#[test]
fn finished_board_is_a_single_leaf() {
    let b: BoardState = "BB.....W ........ ........ ........ ........ ........ ........ B.......".parse().unwrap();
    assert_eq!(perft(&b, Color::Black, 5), 1);
}
