//! # Sliding puzzle search
//!
//! Best-first search for the 4×4 sliding-tile puzzle. Boards are packed
//! into a `u64`, expanded one blank swap at a time, and ranked by path cost
//! plus half the number of cells that differ from the sorted layout.
//!
//! ```rust
//! use slider_search::{solve, Puzzle};
//!
//! let puzzle: Puzzle = "1 2 3 4 5 6 7 8 9 10 11 12 13 14 0 15".parse().unwrap();
//! let solution = solve(&puzzle).unwrap();
//! assert_eq!(solution.len(), 1);
//! ```

pub mod config;
pub mod error;
pub mod heuristic;
pub mod path;
pub mod puzzle;
pub mod search;
pub mod state;

pub use config::SolverConfig;
pub use error::{BoardError, SolveError};
pub use heuristic::{Heuristic, MismatchHeuristic};
pub use puzzle::{BoardReader, Location, Move, Piece, Puzzle, Slide, Solution};
pub use search::{solve, SearchOutcome, SearchStats, Solver};
pub use state::{decode_location, Action, PackedState};
