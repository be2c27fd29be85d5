use std::error::Error as StdError;
use std::fmt;

use crate::state::PackedState;

/// Ways a search can fail. No partial solution is ever returned alongside one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolveError {
    /// A packed state broke the one-blank invariant.
    CorruptState { state: PackedState },
    /// The frontier ran dry before the target was settled.
    NoPath { iterations: usize },
    /// The configured iteration ceiling was hit.
    IterationLimit { limit: usize },
}

impl fmt::Display for SolveError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SolveError::CorruptState { state } => {
                write!(f, "corrupt packed state {:#018x}: no blank cell", state.bits())
            }
            SolveError::NoPath { iterations } => {
                write!(f, "no path possible: frontier empty after {} iterations", iterations)
            }
            SolveError::IterationLimit { limit } => {
                write!(f, "search gave up after {} iterations", limit)
            }
        }
    }
}

impl StdError for SolveError {}

/// Rejected board input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    WrongCellCount(usize),
    BadNumber(String),
    OutOfRange(u8),
    Duplicate(u8),
}

impl fmt::Display for BoardError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BoardError::WrongCellCount(n) => write!(f, "expected 16 cells, got {}", n),
            BoardError::BadNumber(s) => write!(f, "not a tile number: {:?}", s),
            BoardError::OutOfRange(n) => write!(f, "tile {} is outside 0..=15", n),
            BoardError::Duplicate(n) => write!(f, "tile {} appears more than once", n),
        }
    }
}

impl StdError for BoardError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_problem() {
        let err = SolveError::NoPath { iterations: 7 };
        assert_eq!(
            err.to_string(),
            "no path possible: frontier empty after 7 iterations"
        );
        assert_eq!(
            BoardError::Duplicate(4).to_string(),
            "tile 4 appears more than once"
        );
    }
}
