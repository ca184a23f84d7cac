//! Move ordering for the alpha-beta search.

use super::constants::{
    CAPTURE_SCORE, CHECK_SCORE, KILLER1_SCORE, KILLER2_SCORE, PROMOTION_SCORE, TT_MOVE_SCORE,
};
use super::HistoryTable;
use crate::board::{Board, Move, Piece, ScoredMoveList};

/// Most valuable victim, least valuable attacker. Zero for quiet moves.
pub(crate) fn mvv_lva(board: &Board, mv: Move) -> i32 {
    if !mv.is_capture() {
        return 0;
    }
    let victim = if mv.is_en_passant() {
        Some(Piece::Pawn)
    } else {
        board.piece_at(mv.to()).map(|(_, piece)| piece)
    };
    let attacker = board.piece_at(mv.from()).map_or(0, |(_, piece)| piece.index() as i32);
    victim.map_or(0, |victim| victim.value() * 10 - attacker)
}

/// Priority of each move at one node.
///
/// The hash move comes first, then captures by MVV-LVA, promotions,
/// checking moves, the two killers of the ply and finally quiet moves by
/// history score.
pub(crate) struct MoveOrderer<'a> {
    hash_move: Option<Move>,
    killers: [Move; 2],
    history: &'a HistoryTable,
}

impl<'a> MoveOrderer<'a> {
    pub(crate) fn new(hash_move: Option<Move>, killers: [Move; 2], history: &'a HistoryTable) -> Self {
        MoveOrderer {
            hash_move,
            killers,
            history,
        }
    }

    pub(crate) fn score(&self, board: &Board, mv: Move, gives_check: bool) -> i32 {
        if self.hash_move == Some(mv) {
            return TT_MOVE_SCORE;
        }
        if mv.is_capture() {
            let promo = mv.promotion().map_or(0, Piece::value);
            return CAPTURE_SCORE + mvv_lva(board, mv) + promo;
        }
        if let Some(piece) = mv.promotion() {
            return PROMOTION_SCORE + piece.value();
        }
        if gives_check {
            return CHECK_SCORE;
        }
        if mv == self.killers[0] {
            return KILLER1_SCORE;
        }
        if mv == self.killers[1] {
            return KILLER2_SCORE;
        }
        self.history.score(mv)
    }

    /// All legal moves of `board`, ready to be consumed best first.
    pub(crate) fn order(&self, board: &mut Board) -> ScoredMoveList {
        board.legal_moves_ordered(|board, mv, gives_check| self.score(board, mv, gives_check))
    }
}

/// Legal captures and promotions of `board` by MVV-LVA, for quiescence.
pub(crate) fn order_tactical(board: &mut Board) -> ScoredMoveList {
    let mut list = ScoredMoveList::new();
    for mv in board.tactical_moves() {
        let promo = mv.promotion().map_or(0, Piece::value);
        list.push(mv, mvv_lva(board, mv) + promo);
    }
    list
}
