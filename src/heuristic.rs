use crate::state::{PackedState, CELLS};

/// Estimated number of moves left before `state` reaches the goal.
pub trait Heuristic {
    fn estimate(&self, state: PackedState) -> u32;
}

/// Counts cells that differ from the target and halves the count.
///
/// Every move rewrites exactly two cells, so at least half the mismatches
/// must each be fixed by a separate move.
#[derive(Debug, Clone, Copy)]
pub struct MismatchHeuristic {
    target: PackedState,
}

impl MismatchHeuristic {
    pub fn new(target: PackedState) -> Self {
        Self { target }
    }

    pub fn mismatches(&self, state: PackedState) -> u32 {
        let diff = state.bits() ^ self.target.bits();
        (0..CELLS)
            .filter(|&index| (diff >> (4 * index)) & 0xF != 0)
            .count() as u32
    }
}

impl Heuristic for MismatchHeuristic {
    fn estimate(&self, state: PackedState) -> u32 {
        self.mismatches(state) / 2
    }
}
