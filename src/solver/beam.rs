use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Barrier;
use std::thread;
use std::time::Duration;

use crossbeam_channel::{unbounded, Receiver, Sender};
use indicatif::{ProgressBar, ProgressStyle};

use crate::hash::target_worker;
use crate::layout::Layout;
use crate::node::Node;

use super::bucket::Bucket;
use super::pool::Pool;
use super::table::TransTable;
use super::{SolveStats, SolverConfig, MAX_MOVES, NUM_BINS};

/// Levels kept alive behind the active one. With the next level under
/// construction that bounds live memory to two frontiers per worker.
const KEEP_LEVELS: usize = 1;

/// Expansions between partition flushes, so peers receive work while the
/// level is still being iterated.
const FLUSH_INTERVAL: usize = 100;

struct SharedState<'a> {
    config: &'a SolverConfig,
    barrier: Barrier,
    senders: Vec<Sender<Node>>,
    level_sizes: Vec<AtomicUsize>,
}

/// Parallel bounded beam search. Every worker owns its pool, transposition
/// table and level buckets; children migrate between workers by hash
/// partition through the queues, so a given position is always judged by
/// the same worker and per-worker tables never need cross-worker
/// visibility.
pub fn beam_search(root: &Layout, config: &SolverConfig) -> (Option<Node>, SolveStats) {
    let workers = config.workers.max(1);

    let mut senders = Vec::with_capacity(workers);
    let mut receivers = Vec::with_capacity(workers);
    for _ in 0..workers {
        let (tx, rx) = unbounded();
        senders.push(tx);
        receivers.push(rx);
    }
    let shared = SharedState {
        config,
        barrier: Barrier::new(workers),
        senders,
        level_sizes: (0..workers).map(|_| AtomicUsize::new(0)).collect(),
    };

    let progress = if config.quiet {
        None
    } else {
        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::with_template("[{elapsed_precise}] beam {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.enable_steady_tick(Duration::from_millis(120));
        Some(pb)
    };

    let results: Vec<(Option<Node>, SolveStats)> = thread::scope(|scope| {
        let shared = &shared;
        let handles: Vec<_> = receivers
            .into_iter()
            .enumerate()
            .map(|(id, inbox)| {
                let progress = progress.clone();
                scope.spawn(move || Worker::new(id, shared, inbox, progress).run(root))
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("beam worker panicked"))
            .collect()
    });

    if let Some(pb) = &progress {
        pb.finish_and_clear();
    }

    let mut best: Option<Node> = None;
    let mut stats = SolveStats::default();
    for (found, worker_stats) in results {
        stats.nodes_expanded += worker_stats.nodes_expanded;
        stats.nodes_kept += worker_stats.nodes_kept;
        stats.max_level_size = stats.max_level_size.max(worker_stats.max_level_size);
        stats.deepest_level = stats.deepest_level.max(worker_stats.deepest_level);
        if let Some(node) = found {
            // Strict comparison: ties go to the lowest worker id.
            if best.as_ref().map_or(true, |b| node.g() < b.g()) {
                best = Some(node);
            }
        }
    }
    (best, stats)
}

struct Worker<'a> {
    id: usize,
    shared: &'a SharedState<'a>,
    inbox: Receiver<Node>,
    pool: Pool,
    table: TransTable,
    levels: Vec<Bucket>,
    upperbound: u32,
    best: Option<Node>,
    stats: SolveStats,
    progress: Option<ProgressBar>,
}

impl<'a> Worker<'a> {
    fn new(
        id: usize,
        shared: &'a SharedState<'a>,
        inbox: Receiver<Node>,
        progress: Option<ProgressBar>,
    ) -> Self {
        let beam_size = shared.config.beam_size;
        Self {
            id,
            shared,
            inbox,
            pool: Pool::with_capacity(beam_size * 2 + 16),
            table: TransTable::with_capacity(beam_size * 2),
            levels: (0..=MAX_MOVES).map(|_| Bucket::new(NUM_BINS)).collect(),
            upperbound: MAX_MOVES as u32,
            best: None,
            stats: SolveStats::default(),
            progress,
        }
    }

    fn run(mut self, root: &Layout) -> (Option<Node>, SolveStats) {
        let root_node = Node::root(root.clone());

        // Goal already met at the root: zero-length solution, nothing to
        // search. Every worker takes this path, so no barrier is entered.
        if self.shared.config.challenge.is_met(root_node.layout()) {
            self.upperbound = 0;
            return (Some(root_node), self.stats);
        }

        let (hash, bin) = (root_node.hash(), root_node.bin());
        let id = self.pool.insert(root_node);
        self.levels[0].add(id, bin);
        self.table.insert(hash, id);

        let workers = self.shared.config.workers.max(1);
        for level in 0..MAX_MOVES {
            let proceed = if workers == 1 {
                !self.levels[level].is_empty()
            } else {
                // Two-phase: publish sizes, rendezvous, decide together.
                // A second barrier keeps a fast worker from racing ahead
                // and republishing before everyone has read.
                self.shared.level_sizes[self.id].store(self.levels[level].len(), Ordering::Release);
                self.shared.barrier.wait();
                let all_empty = self
                    .shared
                    .level_sizes
                    .iter()
                    .all(|size| size.load(Ordering::Acquire) == 0);
                self.shared.barrier.wait();
                !all_empty
            };
            if !proceed {
                break;
            }

            self.stats.max_level_size = self.stats.max_level_size.max(self.levels[level].len());
            self.stats.deepest_level = level;
            if self.id == 0 {
                if let Some(pb) = &self.progress {
                    pb.set_message(format!(
                        "level {level}: {} nodes, upperbound {}",
                        self.levels[level].len(),
                        self.upperbound
                    ));
                }
            }

            self.create_new_level(level);

            if level >= KEEP_LEVELS {
                self.sweep_level(level - KEEP_LEVELS);
            }
        }

        for level in 0..self.levels.len() {
            self.sweep_level(level);
        }
        (self.best.take(), self.stats)
    }

    fn create_new_level(&mut self, level: usize) {
        let workers = self.shared.config.workers.max(1);
        let mut partitions: Vec<Vec<Node>> = (0..workers).map(|_| Vec::new()).collect();

        let mut ids = Vec::with_capacity(self.levels[level].len());
        self.levels[level].iterate(|id| ids.push(id));

        let mut since_flush = 0usize;
        for id in ids {
            if self.pool.get(id).g() + 1 >= self.upperbound {
                continue;
            }
            let children = self.pool.get(id).expand();
            if children.is_empty() {
                continue;
            }
            self.stats.nodes_expanded += 1;

            if workers == 1 {
                self.process_new_nodes(children, level + 1, &mut partitions);
            } else {
                for child in children {
                    partitions[target_worker(child.hash(), workers)].push(child);
                }
                since_flush += 1;
                if since_flush >= FLUSH_INTERVAL {
                    since_flush = 0;
                    self.flush_partitions(&mut partitions);
                    let inbound = self.drain_inbox();
                    self.process_new_nodes(inbound, level + 1, &mut partitions);
                }
            }
        }

        if workers > 1 {
            self.flush_partitions(&mut partitions);
            // Quiesce. After the first barrier every regular child is in
            // some queue; draining may record solutions whose broadcast
            // clones are only delivered by a second round. Broadcast
            // clones never trigger further sends, so two rounds empty the
            // queues.
            for _ in 0..2 {
                self.shared.barrier.wait();
                let inbound = self.drain_inbox();
                self.process_new_nodes(inbound, level + 1, &mut partitions);
                self.flush_partitions(&mut partitions);
            }
            self.shared.barrier.wait();
            debug_assert!(self.inbox.is_empty());
        }
    }

    /// Intake for freshly expanded or received children.
    fn process_new_nodes(&mut self, nodes: Vec<Node>, level: usize, partitions: &mut [Vec<Node>]) {
        let workers = self.shared.config.workers.max(1);
        let move_limit = self.shared.config.move_limit;
        let beam_size = self.shared.config.beam_size;

        for node in nodes {
            if move_limit > 0 && node.g() > move_limit {
                continue;
            }
            if node.bin() >= self.upperbound || node.bin() < self.levels[level].lowerbound() {
                continue;
            }
            if self.shared.config.challenge.is_met(node.layout()) {
                if node.g() < self.upperbound {
                    self.upperbound = node.g();
                    // Broadcast from the owning partition only, so every
                    // solution crosses the wire exactly once.
                    if workers > 1 && target_worker(node.hash(), workers) == self.id {
                        for (worker, partition) in partitions.iter_mut().enumerate() {
                            if worker != self.id {
                                partition.push(node.clone());
                            }
                        }
                    }
                    self.best = Some(node);
                }
                continue;
            }
            if self
                .table
                .find(&self.pool, node.hash(), node.fingerprint())
                .is_some()
            {
                continue;
            }
            if self.levels[level].len() < beam_size {
                self.admit(node, level);
            } else if node.bin() >= self.levels[level].max() {
                continue;
            } else {
                if let Some(victim) = self.levels[level].remove_max() {
                    let evicted = self.pool.remove(victim);
                    self.table.remove(evicted.hash(), victim);
                }
                self.admit(node, level);
            }
        }
    }

    fn admit(&mut self, node: Node, level: usize) {
        let (hash, bin) = (node.hash(), node.bin());
        let id = self.pool.insert(node);
        self.levels[level].add(id, bin);
        self.table.insert(hash, id);
        self.stats.nodes_kept += 1;
    }

    fn flush_partitions(&self, partitions: &mut [Vec<Node>]) {
        for (worker, partition) in partitions.iter_mut().enumerate() {
            for node in partition.drain(..) {
                // A send only fails once every worker has exited.
                let _ = self.shared.senders[worker].send(node);
            }
        }
    }

    fn drain_inbox(&self) -> Vec<Node> {
        self.inbox.try_iter().collect()
    }

    fn sweep_level(&mut self, level: usize) {
        if self.levels[level].is_empty() {
            return;
        }
        for id in self.levels[level].take_all() {
            let node = self.pool.remove(id);
            self.table.remove(node.hash(), id);
        }
    }
}
