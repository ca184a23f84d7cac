//! Static evaluation.
//!
//! Scores are centipawns from the side to move's point of view. The
//! default `StandardEvaluator` tapers between middlegame and endgame values
//! by the amount of non-pawn material left on the board.

mod tables;

use super::movegen::attacks_from;
use super::{Bitboard, Board, Color, Piece, Square};
use tables::{
    BISHOP_MOB_EG, BISHOP_MOB_MG, BISHOP_PAIR, DOUBLED_PAWN, ISOLATED_PAWN, KING_SHIELD_PAWN,
    KNIGHT_MOB_EG, KNIGHT_MOB_MG, MATERIAL_EG, MATERIAL_MG, MAX_PHASE, PASSED_PAWN_EG,
    PASSED_PAWN_MG, PHASE_WEIGHTS, PST_EG, PST_MG, QUEEN_MOB_EG, QUEEN_MOB_MG, ROOK_MOB_EG,
    ROOK_MOB_MG, ROOK_OPEN_FILE, ROOK_SEMI_OPEN_FILE, ROOK_SEVENTH_RANK,
};

/// A position scorer used at the leaves of the search.
///
/// Implementations must be deterministic and must not keep state between
/// calls: the same position always yields the same score.
pub trait Evaluator: Send + Sync {
    /// Score `board` from the side to move's perspective; positive favours the mover.
    fn evaluate(&self, board: &Board) -> i32;
}

/// Material, piece-square tables, mobility, pawn structure, rook placement
/// and king shelter.
#[derive(Clone, Copy, Debug, Default)]
pub struct StandardEvaluator;

/// Paired middlegame / endgame accumulator.
#[derive(Clone, Copy, Default)]
struct Score {
    mg: i32,
    eg: i32,
}

impl Score {
    fn add(&mut self, (mg, eg): (i32, i32)) {
        self.mg += mg;
        self.eg += eg;
    }

    fn scaled(&mut self, (mg, eg): (i32, i32), n: i32) {
        self.mg += mg * n;
        self.eg += eg * n;
    }
}

impl Evaluator for StandardEvaluator {
    fn evaluate(&self, board: &Board) -> i32 {
        if board.is_insufficient_material() {
            return 0;
        }

        let mut phase = 0;
        let mut sides = [Score::default(); 2];
        for color in Color::BOTH {
            let score = &mut sides[color.index()];
            for piece in Piece::ALL {
                for sq in board.pieces(color, piece) {
                    let idx = pst_index(color, sq);
                    score.mg += MATERIAL_MG[piece.index()] + PST_MG[piece.index()][idx];
                    score.eg += MATERIAL_EG[piece.index()] + PST_EG[piece.index()][idx];
                    phase += PHASE_WEIGHTS[piece.index()];
                }
            }
            mobility(board, color, score);
            pawn_structure(board, color, score);
            rooks(board, color, score);
            king_shelter(board, color, score);
            if board.pieces(color, Piece::Bishop).popcount() >= 2 {
                score.add(BISHOP_PAIR);
            }
        }

        let white = sides[Color::White.index()];
        let black = sides[Color::Black.index()];
        let mg = white.mg - black.mg;
        let eg = white.eg - black.eg;
        let phase = phase.min(MAX_PHASE);
        let blended = (mg * phase + eg * (MAX_PHASE - phase)) / MAX_PHASE;

        match board.side_to_move() {
            Color::White => blended,
            Color::Black => -blended,
        }
    }
}

impl Board {
    /// Evaluate with the default evaluator.
    #[must_use]
    pub fn evaluate(&self) -> i32 {
        StandardEvaluator.evaluate(self)
    }
}

#[inline]
fn pst_index(color: Color, sq: Square) -> usize {
    match color {
        Color::White => sq.index(),
        Color::Black => sq.flip_vertical().index(),
    }
}

fn mobility(board: &Board, color: Color, score: &mut Score) {
    let occ = board.all_occupied.0;
    let own = board.occupied_by(color).0;
    for piece in [Piece::Knight, Piece::Bishop, Piece::Rook, Piece::Queen] {
        for sq in board.pieces(color, piece) {
            let count = (attacks_from(piece, color, sq, occ) & !own).count_ones() as usize;
            let (mg, eg) = match piece {
                Piece::Knight => (KNIGHT_MOB_MG[count], KNIGHT_MOB_EG[count]),
                Piece::Bishop => (BISHOP_MOB_MG[count], BISHOP_MOB_EG[count]),
                Piece::Rook => (ROOK_MOB_MG[count], ROOK_MOB_EG[count]),
                _ => (QUEEN_MOB_MG[count], QUEEN_MOB_EG[count]),
            };
            score.add((mg, eg));
        }
    }
}

/// Squares strictly ahead of `sq` (from `color`'s side) on its file and both neighbours.
fn front_span(color: Color, sq: Square) -> Bitboard {
    let mut files = Bitboard::file_mask(sq.file());
    if sq.file() > 0 {
        files |= Bitboard::file_mask(sq.file() - 1);
    }
    if sq.file() < 7 {
        files |= Bitboard::file_mask(sq.file() + 1);
    }
    let ahead = match color {
        Color::White => (sq.rank() + 1..8).fold(Bitboard::EMPTY, |bb, r| bb | Bitboard::rank_mask(r)),
        Color::Black => (0..sq.rank()).fold(Bitboard::EMPTY, |bb, r| bb | Bitboard::rank_mask(r)),
    };
    files & ahead
}

fn pawn_structure(board: &Board, color: Color, score: &mut Score) {
    let pawns = board.pieces(color, Piece::Pawn);
    let enemy_pawns = board.pieces(color.opponent(), Piece::Pawn);

    for file in 0..8 {
        let on_file = (pawns & Bitboard::file_mask(file)).popcount() as i32;
        if on_file == 0 {
            continue;
        }
        if on_file > 1 {
            score.scaled(DOUBLED_PAWN, on_file - 1);
        }
        let left = file > 0 && !(pawns & Bitboard::file_mask(file - 1)).is_empty();
        let right = file < 7 && !(pawns & Bitboard::file_mask(file + 1)).is_empty();
        if !left && !right {
            score.scaled(ISOLATED_PAWN, on_file);
        }
    }

    for sq in pawns {
        if (front_span(color, sq) & enemy_pawns).is_empty() {
            let advanced = match color {
                Color::White => sq.rank() - 1,
                Color::Black => 6 - sq.rank(),
            };
            score.add((PASSED_PAWN_MG[advanced], PASSED_PAWN_EG[advanced]));
        }
    }
}

fn rooks(board: &Board, color: Color, score: &mut Score) {
    let own_pawns = board.pieces(color, Piece::Pawn);
    let enemy_pawns = board.pieces(color.opponent(), Piece::Pawn);
    let seventh = match color {
        Color::White => 6,
        Color::Black => 1,
    };
    for sq in board.pieces(color, Piece::Rook) {
        let file = Bitboard::file_mask(sq.file());
        if (file & own_pawns).is_empty() {
            if (file & enemy_pawns).is_empty() {
                score.add(ROOK_OPEN_FILE);
            } else {
                score.add(ROOK_SEMI_OPEN_FILE);
            }
        }
        if sq.rank() == seventh {
            score.add(ROOK_SEVENTH_RANK);
        }
    }
}

/// Middlegame bonus for pawns sheltering a king that stays on its back two ranks.
fn king_shelter(board: &Board, color: Color, score: &mut Score) {
    let Some(king) = board.king_square(color) else {
        return;
    };
    let (home, shield_ranks) = match color {
        Color::White => (king.rank() <= 1, [king.rank() + 1, king.rank() + 2]),
        Color::Black => (
            king.rank() >= 6,
            [king.rank().saturating_sub(1), king.rank().saturating_sub(2)],
        ),
    };
    if !home {
        return;
    }
    let pawns = board.pieces(color, Piece::Pawn);
    let lo = king.file().saturating_sub(1);
    let hi = (king.file() + 1).min(7);
    let shield = shield_ranks
        .into_iter()
        .filter(|&r| r < 8)
        .flat_map(|r| (lo..=hi).map(move |f| Square(r, f)))
        .filter(|&sq| pawns.contains(sq))
        .count() as i32;
    score.mg += shield * KING_SHIELD_PAWN;
}
