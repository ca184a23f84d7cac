//! Search constants.

// ============================================================================
// SEARCH LIMITS
// ============================================================================

/// Deepest ply the search will ever reach, including quiescence.
pub const MAX_PLY: usize = 128;

/// Iterative deepening stops here when no depth limit is given.
pub const MAX_DEPTH: u32 = 64;

/// Maximum quiescence search depth to prevent explosion
pub const MAX_QSEARCH_DEPTH: u32 = 8;

/// Deadline and node cap are checked when the node count is a multiple of this.
pub const POLL_INTERVAL: u64 = 1024;

// ============================================================================
// SCORES
// ============================================================================

/// Score of being mated at the root; mated at ply `p` scores `-(MATE_SCORE - p)`.
pub const MATE_SCORE: i32 = 30_000;

/// Scores with absolute value >= this are checkmate scores
pub const MATE_THRESHOLD: i32 = MATE_SCORE - MAX_PLY as i32;

/// Wider than any reachable score.
pub const INFINITY: i32 = 32_000;

// ============================================================================
// MOVE ORDERING PRIORITIES
// ============================================================================
// Higher scores = tried earlier. Ordered: hash move > captures > promotions
// > checks > killers > history

/// Hash move (from transposition table or the previous iteration) - highest priority
pub const TT_MOVE_SCORE: i32 = 1 << 20;

/// Base for captures, plus MVV-LVA
pub const CAPTURE_SCORE: i32 = 1 << 18;

/// Base for quiet promotions, plus the promoted piece's value
pub const PROMOTION_SCORE: i32 = 1 << 17;

/// Quiet moves that give check
pub const CHECK_SCORE: i32 = 1 << 16;

/// First killer move (quiet that caused beta cutoff at same ply)
pub const KILLER1_SCORE: i32 = 20_000;

/// Second killer move (replaced killer)
pub const KILLER2_SCORE: i32 = 10_000;

/// History scores saturate here so they stay below the killers.
pub const HISTORY_MAX: i32 = 8_000;
