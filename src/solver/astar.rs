use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::BuildHasherDefault;

use hashbrown::HashSet as HbHashSet;

use crate::cards::{Card, Suit};
use crate::layout::{Layout, TABLEAU_COUNT};
use crate::node::Node;

use super::pool::{NodeId, Pool};
use super::{Challenge, SolveStats, SolverConfig};

type FastHasher = BuildHasherDefault<ahash::AHasher>;
type FastSet = HbHashSet<u64, FastHasher>;

/// Depth recursion cap for the predecessor chain.
const DEPTH_BUDGET: u32 = 13;
/// Sentinel for a card absent from every store; unreachable in a
/// conserved deck.
const ABSENT_DEPTH: u32 = 1000;

/// Open-list entry ordered so the max-heap pops the smallest f first,
/// ties broken by insertion order.
struct OpenEntry {
    f: u32,
    seq: u64,
    id: NodeId,
}

impl PartialEq for OpenEntry {
    fn eq(&self, other: &Self) -> bool {
        self.f == other.f && self.seq == other.seq
    }
}

impl Eq for OpenEntry {}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .f
            .cmp(&self.f)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Best-first search for a targeted challenge. Children are produced
/// exactly as on the beam path; the closed set keys on fingerprint
/// hashes, so already-seen positions never enter the pool.
pub fn astar_search(root: &Layout, config: &SolverConfig) -> (Option<Node>, SolveStats) {
    let mut stats = SolveStats::default();
    let mut pool = Pool::new();
    let mut closed = FastSet::default();
    let mut open: BinaryHeap<OpenEntry> = BinaryHeap::new();
    let mut seq = 0u64;

    let root_node = Node::root(root.clone());
    closed.insert(root_node.hash());
    let f = challenge_heuristic(root_node.layout(), &config.challenge);
    let id = pool.insert(root_node);
    open.push(OpenEntry { f, seq, id });

    while let Some(entry) = open.pop() {
        if config.challenge.is_met(pool.get(entry.id).layout()) {
            return (Some(pool.remove(entry.id)), stats);
        }
        if config.move_limit > 0 && pool.get(entry.id).g() >= config.move_limit {
            continue;
        }

        let children = pool.get(entry.id).expand();
        stats.nodes_expanded += 1;
        for child in children {
            if config.move_limit > 0 && child.g() > config.move_limit {
                continue;
            }
            if !closed.insert(child.hash()) {
                continue;
            }
            let h = challenge_heuristic(child.layout(), &config.challenge);
            let f = child.g() + h;
            seq += 1;
            let id = pool.insert(child);
            open.push(OpenEntry { f, seq, id });
            stats.nodes_kept += 1;
        }
    }

    (None, stats)
}

/// Remaining-move estimate for a challenge. For count challenges the k
/// cheapest suits are summed; nothing forces a particular k suits to be
/// the ones sorted, so any dearer choice only costs more.
pub fn challenge_heuristic(layout: &Layout, challenge: &Challenge) -> u32 {
    match *challenge {
        Challenge::FullSolve => layout.cards_unsorted(),
        Challenge::Card(card) => target_cost(layout, card, DEPTH_BUDGET),
        Challenge::Count { rank, need } => {
            let mut costs: Vec<u32> = Suit::ALL
                .iter()
                .map(|&suit| target_cost(layout, Card::new(suit, rank), DEPTH_BUDGET))
                .collect();
            costs.sort_unstable();
            costs.iter().take(need as usize).sum()
        }
    }
}

/// Cost to get `target` onto its foundation: its burial depth plus the
/// cost of its predecessor, recursively down the rank chain.
fn target_cost(layout: &Layout, target: Card, depth_budget: u32) -> u32 {
    if depth_budget == 0 {
        return 0;
    }
    if layout.foundation_height(target.suit()) > target.rank() {
        return 0;
    }
    let mut cost = card_depth(layout, target);
    if target.rank() > 0 {
        cost += target_cost(
            layout,
            Card::new(target.suit(), target.rank() - 1),
            depth_budget - 1,
        );
    }
    cost
}

/// Cards stacked on top of `target`: zero in the reserve, column height
/// minus one minus its index in a tableau.
fn card_depth(layout: &Layout, target: Card) -> u32 {
    if layout.reserve().contains(&target) {
        return 0;
    }
    for col in 0..TABLEAU_COUNT {
        let column = layout.tableau(col);
        if let Some(pos) = column.iter().position(|&c| c == target) {
            return (column.len() - 1 - pos) as u32;
        }
    }
    ABSENT_DEPTH
}
