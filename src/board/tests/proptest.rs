//! Property-based tests using proptest.

use crate::board::{Board, UnmakeInfo};
use proptest::prelude::*;
use rand::prelude::*;
use rand::Rng;

/// Strategy to generate a random legal move sequence length
fn move_count_strategy() -> impl Strategy<Value = usize> {
    1..=30usize
}

/// Strategy to generate a random seed for move selection
fn seed_strategy() -> impl Strategy<Value = u64> {
    any::<u64>()
}

/// Play up to `num_moves` random legal moves, returning the unmake tokens.
fn random_walk(board: &mut Board, seed: u64, num_moves: usize) -> Vec<UnmakeInfo> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut history = Vec::new();
    for _ in 0..num_moves {
        let moves = board.legal_moves();
        if moves.is_empty() {
            break;
        }
        let mv = moves[rng.gen_range(0..moves.len())];
        history.push(board.make_move(mv));
    }
    history
}

proptest! {
    /// Property: make_move followed by unmake_move restores board state exactly
    #[test]
    fn prop_make_unmake_restores_state(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let initial_hash = board.hash();
        let initial_fen = board.to_fen();

        let mut history = random_walk(&mut board, seed, num_moves);
        while let Some(info) = history.pop() {
            board.unmake_move(info);
        }

        prop_assert_eq!(board.hash(), initial_hash);
        prop_assert_eq!(board.to_fen(), initial_fen);
        prop_assert!(!board.is_repetition());
    }

    /// Property: hash is always consistent with recomputed hash
    #[test]
    fn prop_hash_consistency(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let _history = random_walk(&mut board, seed, num_moves);
        prop_assert_eq!(board.hash(), board.compute_hash());
    }

    /// Property: FEN round-trip preserves position
    #[test]
    fn prop_fen_roundtrip(seed in seed_strategy(), num_moves in move_count_strategy()) {
        let mut board = Board::new();
        let _history = random_walk(&mut board, seed, num_moves);

        let fen = board.to_fen();
        let restored: Board = fen.parse().unwrap();

        prop_assert_eq!(board.hash(), restored.hash());
        prop_assert_eq!(restored.to_fen(), fen);
    }

    /// Property: legal moves never leave the mover's king in check
    #[test]
    fn prop_legal_moves_are_legal(seed in seed_strategy(), num_moves in 0..20usize) {
        let mut board = Board::new();
        let _history = random_walk(&mut board, seed, num_moves);

        let us = board.side_to_move();
        for mv in board.legal_moves() {
            let child = board.scoped(mv);
            prop_assert!(!child.is_in_check(us), "Legal move left king in check: {:?}", mv);
        }
    }

    /// Property: every legal move is also produced by the pseudo-legal generator
    #[test]
    fn prop_legal_subset_of_pseudo_legal(seed in seed_strategy(), num_moves in 0..20usize) {
        let mut board = Board::new();
        let _history = random_walk(&mut board, seed, num_moves);

        let pseudo: Vec<_> = board.pseudo_legal_moves().collect();
        for mv in board.legal_moves() {
            prop_assert!(pseudo.contains(&mv));
        }
    }
}
