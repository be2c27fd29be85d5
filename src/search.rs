//! Best-first search over packed states.
//!
//! Settled states live in an arena of [`Node`]s; each node points back at
//! the node it was reached from by index. The visited table maps a state to
//! its arena slot. A state may sit in the frontier several times, but only
//! its first pop is settled.

use rustc_hash::FxHashMap;
use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::config::SolverConfig;
use crate::error::SolveError;
use crate::heuristic::{Heuristic, MismatchHeuristic};
use crate::path;
use crate::puzzle::{BoardReader, Solution};
use crate::state::{Action, PackedState};

/// A settled state and how it was first reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Node {
    pub state: PackedState,
    pub action: Option<Action>,
    pub parent: Option<usize>,
    pub cost: u32,
}

#[derive(Debug, Clone, Copy)]
struct FrontierEntry {
    priority: u32,
    cost: u32,
    state: PackedState,
    action: Action,
    parent: usize,
    seq: u64,
}

// BinaryHeap is a max-heap: lower priority must compare greater. Among equal
// priorities the deeper entry goes first, then the older one.
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .priority
            .cmp(&self.priority)
            .then_with(|| self.cost.cmp(&other.cost))
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Counters from a finished search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchStats {
    pub iterations: usize,
    pub visited: usize,
    pub frontier_peak: usize,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOutcome {
    pub solution: Solution,
    pub stats: SearchStats,
}

/// Mutable context for one search. Dropped as a whole when the search ends.
pub(crate) struct Search<'h, H> {
    heuristic: &'h H,
    target: PackedState,
    config: SolverConfig,
    nodes: Vec<Node>,
    visited: FxHashMap<PackedState, usize>,
    frontier: BinaryHeap<FrontierEntry>,
    seq: u64,
    iterations: usize,
    frontier_peak: usize,
}

impl<'h, H: Heuristic> Search<'h, H> {
    pub fn new(
        start: PackedState,
        target: PackedState,
        heuristic: &'h H,
        config: SolverConfig,
    ) -> Self {
        let mut search = Self {
            heuristic,
            target,
            config,
            nodes: Vec::new(),
            visited: FxHashMap::default(),
            frontier: BinaryHeap::new(),
            seq: 0,
            iterations: 0,
            frontier_peak: 0,
        };
        search.commit(start, None, None, 0);
        search
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn stats(&self) -> SearchStats {
        SearchStats {
            iterations: self.iterations,
            visited: self.visited.len(),
            frontier_peak: self.frontier_peak,
        }
    }

    /// Runs until the target is settled and returns its arena index.
    pub fn run(&mut self) -> Result<usize, SolveError> {
        let mut current = 0;
        log::debug!(
            "search start {} (estimate {})",
            self.nodes[current].state,
            self.heuristic.estimate(self.nodes[current].state)
        );

        while self.nodes[current].state != self.target {
            self.iterations += 1;
            if let Some(limit) = self.config.max_iterations {
                if self.iterations > limit {
                    log::debug!("iteration ceiling {} reached", limit);
                    return Err(SolveError::IterationLimit { limit });
                }
            }

            self.expand(current)?;
            current = self.settle_next()?;

            let interval = self.config.progress_interval;
            if interval > 0 && self.iterations % interval == 0 {
                let node = &self.nodes[current];
                log::info!(
                    "iteration {}: cost {} priority {} visited {} frontier {}",
                    self.iterations,
                    node.cost,
                    node.cost + self.heuristic.estimate(node.state),
                    self.visited.len(),
                    self.frontier.len()
                );
            }
        }

        log::debug!(
            "goal settled at cost {} after {} iterations, {} states visited",
            self.nodes[current].cost,
            self.iterations,
            self.visited.len()
        );
        Ok(current)
    }

    /// Pushes every unsettled neighbour of `index`, except the one that
    /// undoes the move that reached it.
    fn expand(&mut self, index: usize) -> Result<(), SolveError> {
        let node = self.nodes[index];
        let blank = node.state.blank_index()?;

        for action in Action::around(blank) {
            if node.action == Some(action) {
                continue;
            }
            let next = node.state.apply(action);
            if self.visited.contains_key(&next) {
                continue;
            }

            let cost = node.cost + 1;
            self.frontier.push(FrontierEntry {
                priority: cost + self.heuristic.estimate(next),
                cost,
                state: next,
                action,
                parent: index,
                seq: self.seq,
            });
            self.seq += 1;
        }

        self.frontier_peak = self.frontier_peak.max(self.frontier.len());
        Ok(())
    }

    /// Pops the best entry whose state is not settled yet and settles it.
    fn settle_next(&mut self) -> Result<usize, SolveError> {
        while let Some(entry) = self.frontier.pop() {
            if self.visited.contains_key(&entry.state) {
                continue;
            }
            return Ok(self.commit(
                entry.state,
                Some(entry.action),
                Some(entry.parent),
                entry.cost,
            ));
        }

        log::debug!("frontier exhausted after {} iterations", self.iterations);
        Err(SolveError::NoPath {
            iterations: self.iterations,
        })
    }

    fn commit(
        &mut self,
        state: PackedState,
        action: Option<Action>,
        parent: Option<usize>,
        cost: u32,
    ) -> usize {
        let index = self.nodes.len();
        self.nodes.push(Node {
            state,
            action,
            parent,
            cost,
        });
        self.visited.insert(state, index);
        index
    }
}

/// Finds a move sequence that sorts a 4×4 board.
#[derive(Debug, Clone, Copy, Default)]
pub struct Solver {
    config: SolverConfig,
}

impl Solver {
    pub fn new(config: SolverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Solves `board` and reports how much work it took.
    ///
    /// The board is read once and never modified. Solvability is not
    /// checked: an unsolvable board either exhausts the frontier or, in
    /// practice, runs into `max_iterations`.
    pub fn search<B: BoardReader + ?Sized>(&self, board: &B) -> Result<SearchOutcome, SolveError> {
        let start = PackedState::encode(board);
        start.blank_index()?;

        let heuristic = MismatchHeuristic::new(PackedState::TARGET);
        let mut search = Search::new(start, PackedState::TARGET, &heuristic, self.config);
        let goal = search.run()?;
        let solution = path::reconstruct(search.nodes(), goal)?;

        Ok(SearchOutcome {
            solution,
            stats: search.stats(),
        })
    }

    pub fn solve<B: BoardReader + ?Sized>(&self, board: &B) -> Result<Solution, SolveError> {
        self.search(board).map(|outcome| outcome.solution)
    }
}

/// Solves `board` with the default configuration.
pub fn solve<B: BoardReader + ?Sized>(board: &B) -> Result<Solution, SolveError> {
    Solver::default().solve(board)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Puzzle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn heuristic() -> MismatchHeuristic {
        MismatchHeuristic::new(PackedState::TARGET)
    }

    #[test]
    fn frontier_pops_lowest_priority_first() {
        let entry = |priority, cost, seq| FrontierEntry {
            priority,
            cost,
            state: PackedState::TARGET,
            action: Action::new(14, 15),
            parent: 0,
            seq,
        };
        let mut heap = BinaryHeap::new();
        heap.push(entry(5, 1, 0));
        heap.push(entry(3, 1, 1));
        heap.push(entry(3, 2, 2));
        heap.push(entry(4, 0, 3));

        let order: Vec<_> = std::iter::from_fn(|| heap.pop()).map(|e| e.seq).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
    }

    #[test]
    fn start_at_target_settles_immediately() {
        let h = heuristic();
        let mut search = Search::new(PackedState::TARGET, PackedState::TARGET, &h, SolverConfig::default());
        assert_eq!(search.run(), Ok(0));
        assert_eq!(search.stats().iterations, 0);
        assert_eq!(search.nodes().len(), 1);
    }

    #[test]
    fn empty_frontier_is_no_path() {
        let h = heuristic();
        let start = PackedState::TARGET.apply(Action::new(11, 15));
        let mut search = Search::new(start, PackedState::TARGET, &h, SolverConfig::default());

        // Pretend every neighbour is already settled so nothing gets pushed.
        let blank = start.blank_index().unwrap();
        for action in Action::around(blank) {
            search.commit(start.apply(action), None, None, 0);
        }

        assert_eq!(search.run(), Err(SolveError::NoPath { iterations: 1 }));
    }

    #[test]
    fn expand_skips_the_incoming_action_even_when_unsettled() {
        let h = heuristic();
        let root = PackedState::TARGET.apply(Action::new(14, 15));
        let mut search = Search::new(root, PackedState::TARGET, &h, SolverConfig::default());

        // Blank at 11, reached by swapping 10 and 11. Undoing that swap leads
        // to a state that is not in the visited table.
        let incoming = Action::new(10, 11);
        let state = PackedState::TARGET.apply(Action::new(11, 15));
        assert!(!search.visited.contains_key(&state.apply(incoming)));
        let index = search.commit(state, Some(incoming), Some(0), 1);

        search.expand(index).unwrap();

        let mut pushed: Vec<Action> = search.frontier.iter().map(|e| e.action).collect();
        pushed.sort_by_key(|a| a.bits());
        assert_eq!(pushed, vec![Action::new(7, 11), Action::new(11, 15)]);
        assert!(search.frontier.iter().all(|e| e.parent == index && e.cost == 2));
    }

    #[test]
    fn corrupt_start_is_reported() {
        let h = heuristic();
        let start = PackedState::from_bits(0x1234_5678_9ABC_DEF1);
        let mut search = Search::new(start, PackedState::TARGET, &h, SolverConfig::default());
        assert_eq!(search.run(), Err(SolveError::CorruptState { state: start }));
    }

    #[test]
    fn iteration_ceiling_stops_unsolvable_board() {
        let puzzle: Puzzle = "1 2 3 4 5 6 7 8 9 10 11 12 13 15 14 0".parse().unwrap();
        let solver = Solver::new(SolverConfig::default().with_max_iterations(2_000));
        assert_eq!(
            solver.solve(&puzzle),
            Err(SolveError::IterationLimit { limit: 2_000 })
        );
    }

    #[test]
    fn settled_chain_never_repeats_an_action() {
        let h = heuristic();
        let mut rng = StdRng::seed_from_u64(11);
        for _ in 0..20 {
            let mut puzzle = Puzzle::new();
            puzzle.scramble(&mut rng, 12);
            let start = PackedState::encode(&puzzle);
            let mut search = Search::new(start, PackedState::TARGET, &h, SolverConfig::default());
            let goal = search.run().unwrap();

            let nodes = search.nodes();
            assert_eq!(search.visited.len(), nodes.len());
            let mut index = goal;
            while let Some(parent) = nodes[index].parent {
                assert_eq!(nodes[parent].cost + 1, nodes[index].cost);
                if nodes[parent].action.is_some() {
                    assert_ne!(nodes[parent].action, nodes[index].action);
                }
                let action = nodes[index].action.unwrap();
                assert_eq!(nodes[parent].state.apply(action), nodes[index].state);
                index = parent;
            }
            assert_eq!(nodes[index].state, start);
        }
    }

    #[test]
    fn outcome_reports_work_done() {
        let mut puzzle = Puzzle::new();
        let mut rng = StdRng::seed_from_u64(5);
        puzzle.scramble(&mut rng, 8);

        let outcome = Solver::default().search(&puzzle).unwrap();
        assert!(outcome.solution.len() <= 8);
        assert!(outcome.stats.visited > outcome.solution.len());
        assert!(outcome.stats.iterations >= outcome.solution.len());
        assert!(outcome.stats.frontier_peak > 0);
    }
}
