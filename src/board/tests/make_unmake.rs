//! Make/unmake move tests.

use crate::board::{Board, Color, Move, Piece, Square, UnmakeInfo};
use rand::prelude::*;

fn find_move(board: &mut Board, from: Square, to: Square, promotion: Option<Piece>) -> Move {
    for m in board.legal_moves().iter() {
        if m.from() == from && m.to() == to && m.promotion() == promotion {
            return *m;
        }
    }
    panic!("Expected move not found");
}

#[test]
fn test_en_passant_make_unmake() {
    let mut board: Board = "rnbqkbnr/ppp1p1pp/8/3pPp2/8/8/PPPP1PPP/RNBQKBNR w KQkq f6 0 3"
        .parse()
        .unwrap();
    let original_hash = board.hash();
    let original_ep = board.en_passant_target();
    let mv = find_move(&mut board, Square(4, 4), Square(5, 5), None);
    assert!(mv.is_en_passant());
    let info = board.make_move(mv);
    assert_eq!(board.piece_at(Square(4, 5)), None);
    board.unmake_move(info);
    assert_eq!(board.hash(), original_hash);
    assert_eq!(board.en_passant_target(), original_ep);
    assert_eq!(
        board.piece_at(Square(4, 5)),
        Some((Color::Black, Piece::Pawn))
    );
}

#[test]
fn test_promotion_make_unmake() {
    let mut board: Board = "8/P7/8/8/8/8/8/K1k5 w - - 0 1".parse().unwrap();
    let original_hash = board.hash();
    for piece in [Piece::Queen, Piece::Rook, Piece::Bishop, Piece::Knight] {
        let mv = find_move(&mut board, Square(6, 0), Square(7, 0), Some(piece));
        let info = board.make_move(mv);
        assert_eq!(board.piece_at(Square(7, 0)), Some((Color::White, piece)));
        assert_eq!(board.hash(), board.compute_hash());
        board.unmake_move(info);
    }
    assert_eq!(board.hash(), original_hash);
    assert_eq!(
        board.piece_at(Square(6, 0)),
        Some((Color::White, Piece::Pawn))
    );
}

#[test]
fn test_black_castling_make_unmake() {
    let mut board: Board = "r3k2r/8/8/8/8/8/8/R3K2R b KQkq - 3 10".parse().unwrap();
    let before = board.to_fen();
    let mv = find_move(&mut board, Square(7, 4), Square(7, 2), None);
    assert!(mv.is_castling());
    let info = board.make_move(mv);
    assert_eq!(board.piece_at(Square(7, 3)), Some((Color::Black, Piece::Rook)));
    assert_eq!(board.castling_rights().to_fen_field(), "KQ");
    assert_eq!(board.fullmove_number(), 11);
    board.unmake_move(info);
    assert_eq!(board.to_fen(), before);
}

#[test]
fn test_nested_scoped_moves_unwind_in_order() {
    let mut board = Board::new();
    let start = board.to_fen();
    let e4 = board.parse_move("e2e4").unwrap();
    {
        let mut first = board.scoped(e4);
        let e5 = first.parse_move("e7e5").unwrap();
        {
            let second = first.scoped(e5);
            assert_eq!(second.fullmove_number(), 2);
        }
        assert_eq!(first.side_to_move(), Color::Black);
    }
    assert_eq!(board.to_fen(), start);
}

#[test]
fn test_random_games_unmake_restores_everything() {
    let mut rng = StdRng::seed_from_u64(0xC0FFEE);
    for _ in 0..20 {
        let mut board = Board::new();
        let start_fen = board.to_fen();
        let start_hash = board.hash();
        let mut stack: Vec<(String, UnmakeInfo)> = Vec::new();

        for _ in 0..60 {
            let moves = board.legal_moves();
            if moves.is_empty() {
                break;
            }
            let mv = moves[rng.gen_range(0..moves.len())];
            let fen = board.to_fen();
            stack.push((fen, board.make_move(mv)));
            assert_eq!(board.hash(), board.compute_hash());
        }

        while let Some((fen, info)) = stack.pop() {
            board.unmake_move(info);
            assert_eq!(board.to_fen(), fen);
        }
        assert_eq!(board.to_fen(), start_fen);
        assert_eq!(board.hash(), start_hash);
    }
}
