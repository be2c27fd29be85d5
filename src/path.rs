use crate::error::SolveError;
use crate::puzzle::{Move, Solution};
use crate::search::Node;
use crate::state::{decode_location, Action, PackedState};

/// Walks parent links back from `goal` and returns the moves start-first.
pub(crate) fn reconstruct(nodes: &[Node], goal: usize) -> Result<Solution, SolveError> {
    let mut steps = Vec::new();
    let mut node = &nodes[goal];

    while let Some(parent) = node.parent {
        let action = node
            .action
            .ok_or(SolveError::CorruptState { state: node.state })?;
        steps.push((nodes[parent].state, action));
        node = &nodes[parent];
    }

    let mut solution = Solution::new();
    for (before, action) in steps.into_iter().rev() {
        solution.push(to_move(before, action)?);
    }
    Ok(solution)
}

/// Translates `action` played on `before` into the tile that slides and the
/// cell it lands on.
pub fn to_move(before: PackedState, action: Action) -> Result<Move, SolveError> {
    let (lo, hi) = action.cells();
    let (from, to) = match (before.cell(lo), before.cell(hi)) {
        (0, tile) if tile != 0 => (hi, lo),
        (tile, 0) if tile != 0 => (lo, hi),
        _ => return Err(SolveError::CorruptState { state: before }),
    };
    Ok(Move::new(before.piece_at(from), decode_location(to)))
}
