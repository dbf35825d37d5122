use serde::Serialize;

use crate::cards::{rank_char, rank_from_char, Card, Suit};
use crate::layout::Layout;
use crate::moves::Move;
use crate::node::replay_trail;

pub mod pool;
pub mod table;
pub mod bucket;
pub mod beam;
pub mod astar;

pub use astar::astar_search;
pub use beam::beam_search;
pub use bucket::Bucket;
pub use pool::{NodeId, Pool};
pub use table::TransTable;

/// Hard depth cap on the search: no solution longer than this is pursued.
pub const MAX_MOVES: usize = 192;
pub const MIN_MOVES: usize = 0;
/// Bin slots per bucket; bins are `g + remaining estimate` and stay well
/// inside this range for any reachable node.
pub const NUM_BINS: usize = (MAX_MOVES - MIN_MOVES) * 2;

/// What counts as "solved".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Challenge {
    /// Sort the whole deck onto the foundations.
    FullSolve,
    /// A specific card must reach its foundation.
    Card(Card),
    /// At least `need` suits must have the card of `rank` on their
    /// foundation.
    Count { rank: u8, need: u8 },
}

impl Challenge {
    /// Parse the two-character challenge code: `00` = full solve,
    /// rank+suit = specific card (`kd`), rank+digit = count (`k4`).
    pub fn parse(code: &str) -> Result<Challenge, String> {
        if code == "00" {
            return Ok(Challenge::FullSolve);
        }
        let mut chars = code.chars();
        let (Some(r), Some(t), None) = (chars.next(), chars.next(), chars.next()) else {
            return Err(format!("challenge code '{code}' must be exactly two characters"));
        };
        let rank = rank_from_char(r)
            .ok_or_else(|| format!("invalid rank '{r}' in challenge code '{code}'"))?;
        if let Some(suit) = Suit::from_char(t) {
            return Ok(Challenge::Card(Card::new(suit, rank)));
        }
        if let Some(need) = t.to_digit(10) {
            if (1..=4).contains(&need) {
                return Ok(Challenge::Count {
                    rank,
                    need: need as u8,
                });
            }
        }
        Err(format!("invalid challenge target '{t}' in code '{code}'"))
    }

    pub fn code(&self) -> String {
        match *self {
            Challenge::FullSolve => "00".to_string(),
            Challenge::Card(card) => card.code_string(),
            Challenge::Count { rank, need } => format!("{}{need}", rank_char(rank)),
        }
    }

    pub fn is_met(&self, layout: &Layout) -> bool {
        match *self {
            Challenge::FullSolve => layout.cards_unsorted() == 0,
            Challenge::Card(card) => layout.foundation_height(card.suit()) > card.rank(),
            Challenge::Count { rank, need } => {
                let sorted = Suit::ALL
                    .iter()
                    .filter(|s| layout.foundation_height(**s) > rank)
                    .count();
                sorted >= need as usize
            }
        }
    }

    #[inline]
    pub fn is_full_solve(&self) -> bool {
        matches!(self, Challenge::FullSolve)
    }
}

#[derive(Debug, Clone)]
pub struct SolverConfig {
    /// Max nodes retained per level per worker.
    pub beam_size: usize,
    /// Worker thread count; children are hash-partitioned across workers.
    pub workers: usize,
    /// Deal seed carried for reporting; the search itself is deterministic.
    pub seed: u64,
    pub challenge: Challenge,
    /// Per-node cap on moves performed; zero disables the cap.
    pub move_limit: u32,
    /// Suppress the per-level progress spinner.
    pub quiet: bool,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            beam_size: 2048,
            workers: 1,
            seed: 0,
            challenge: Challenge::FullSolve,
            move_limit: 0,
            quiet: false,
        }
    }
}

/// A replayed, encoded solution.
#[derive(Debug, Clone)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub encoded: String,
    /// Position after the final move.
    pub layout: Layout,
    pub length: u32,
}

#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct SolveStats {
    pub nodes_expanded: u64,
    pub nodes_kept: u64,
    pub max_level_size: usize,
    pub deepest_level: usize,
}

/// Solve a layout: full solves run the parallel bounded beam, challenges
/// run A*. The winning node's trail is replayed once from the root to
/// produce the canonical encoded solution; a replay mismatch surfaces as
/// an error because it means move ordering was not deterministic.
pub fn solve(root: &Layout, config: &SolverConfig) -> Result<(Option<Solution>, SolveStats), String> {
    let (found, stats) = if config.challenge.is_full_solve() {
        beam::beam_search(root, config)
    } else {
        astar::astar_search(root, config)
    };

    let Some(node) = found else {
        return Ok((None, stats));
    };

    let replay = replay_trail(root, node.trail(), node.g())?;
    if replay.layout.fingerprint() != node.fingerprint() {
        return Err("replay mismatch: reconstructed layout differs from solving node".to_string());
    }
    Ok((
        Some(Solution {
            moves: replay.moves,
            encoded: replay.encoded,
            layout: replay.layout,
            length: node.g(),
        }),
        stats,
    ))
}
