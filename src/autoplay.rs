//! Safe auto-play: drive trivially safe cards to the foundations before
//! the search runs. This is a transform on layouts applied outside the
//! core; the solver accepts the post-autoplay state as its root and the
//! captured encoding is prepended to the solution string.

use crate::layout::{Layout, TABLEAU_COUNT};
use crate::moves::Move;
use crate::solver::Challenge;

#[derive(Debug, Clone)]
pub struct AutoPlayed {
    /// State after all captured auto moves.
    pub layout: Layout,
    /// Encoded moves, concatenated in play order.
    pub encoded: String,
    pub count: u32,
}

/// Repeatedly play the first safe card, reserve slots before tableau tops.
/// For a targeted challenge the capture stops as soon as the challenge is
/// met; a full solve plays to exhaustion.
pub fn capture_auto_moves(start: &Layout, challenge: &Challenge) -> AutoPlayed {
    let mut layout = start.clone();
    let mut encoded = String::new();
    let mut count = 0;

    loop {
        if !challenge.is_full_solve() && challenge.is_met(&layout) {
            break;
        }
        let Some(mv) = next_auto_move(&layout) else {
            break;
        };
        encoded.push_str(&mv.encode(&layout));
        layout = layout.apply(mv);
        count += 1;
    }

    AutoPlayed {
        layout,
        encoded,
        count,
    }
}

fn next_auto_move(layout: &Layout) -> Option<Move> {
    for (slot, &card) in layout.reserve().iter().enumerate() {
        if layout.can_auto_play(card) {
            return Some(Move::ReserveToFoundation { slot: slot as u8 });
        }
    }
    for from in 0..TABLEAU_COUNT {
        if let Some(&card) = layout.tableau(from).last() {
            if layout.can_auto_play(card) {
                return Some(Move::TableauToFoundation { from: from as u8 });
            }
        }
    }
    None
}
