//! Draw detection tests.

use crate::board::Board;

fn apply_uci(board: &mut Board, uci: &str) {
    board.play_uci(uci).expect("uci move not legal");
}

#[test]
fn test_fen_halfmove_parsing() {
    let board: Board = "8/8/8/8/8/8/8/K1k5 w - - 57 1".parse().unwrap();
    assert_eq!(board.halfmove_clock(), 57);
}

#[test]
fn test_fifty_move_rule_draw() {
    let board: Board = "8/8/8/8/8/8/3R4/K1k5 w - - 100 80".parse().unwrap();
    assert!(board.is_draw_by_rule());
}

#[test]
fn test_halfmove_resets_on_pawn_move() {
    let mut board: Board = "8/8/8/8/8/8/4P3/K1k5 w - - 99 1".parse().unwrap();
    apply_uci(&mut board, "e2e4");
    assert_eq!(board.halfmove_clock(), 0);
    assert!(!board.is_draw_by_rule());
}

#[test]
fn test_threefold_repetition() {
    let mut board = Board::new();
    for round in 0..2 {
        apply_uci(&mut board, "g1f3");
        apply_uci(&mut board, "g8f6");
        apply_uci(&mut board, "f3g1");
        apply_uci(&mut board, "f6g8");
        assert!(board.is_repetition());
        assert_eq!(board.is_draw_by_rule(), round == 1);
    }
}

#[test]
fn test_repetition_is_undone_by_unmake() {
    let mut board = Board::new();
    let mut infos = Vec::new();
    for mv in ["g1f3", "g8f6", "f3g1", "f6g8"] {
        infos.push(board.make_move_uci(mv).unwrap());
    }
    assert!(board.is_repetition());
    while let Some(info) = infos.pop() {
        board.unmake_move(info);
    }
    assert!(!board.is_repetition());
}

#[test]
fn test_insufficient_material_draw() {
    for fen in [
        "8/8/8/8/8/8/8/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6N1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/6b1/K1k5 w - - 0 1",
        // Bishops on the same square color
        "8/8/8/8/8/5B2/6b1/K1k5 w - - 0 1",
    ] {
        let board: Board = fen.parse().unwrap();
        assert!(board.is_insufficient_material(), "{fen}");
        assert!(board.is_draw_by_rule(), "{fen}");
    }
}

#[test]
fn test_sufficient_material_is_not_draw() {
    for fen in [
        "8/8/8/8/8/8/4P3/K1k5 w - - 0 1",
        "8/8/8/8/8/8/5NN1/K1k5 w - - 0 1",
        "8/8/8/8/8/6B1/6b1/K1k5 w - - 0 1",
        "8/8/8/8/8/8/5BN1/K1k5 w - - 0 1",
    ] {
        let board: Board = fen.parse().unwrap();
        assert!(!board.is_insufficient_material(), "{fen}");
    }
}
