//! Bit-packed board states and the swap actions that move between them.
//!
//! A [`PackedState`] stores the sixteen cells of the 4×4 board as 4-bit
//! fields in a single `u64`, row-major, cell 0 in the most significant
//! nibble. Cell indices are `row * 4 + column` everywhere in the crate.

use std::fmt;

use crate::error::SolveError;
use crate::puzzle::{BoardReader, Location, Piece};

pub const WIDTH: usize = 4;
pub const CELLS: usize = WIDTH * WIDTH;

const NIBBLE: u64 = 0xF;

#[inline]
fn shift(index: usize) -> u32 {
    (4 * (CELLS - 1 - index)) as u32
}

/// Maps a cell index to its location on the board.
pub fn decode_location(index: usize) -> Location {
    Location::new(index % WIDTH, index / WIDTH)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PackedState(u64);

impl PackedState {
    /// Tiles 1..15 in order, blank in the bottom-right corner.
    pub const TARGET: PackedState = PackedState(0x1234_5678_9ABC_DEF0);

    pub fn from_bits(bits: u64) -> Self {
        PackedState(bits)
    }

    pub fn bits(self) -> u64 {
        self.0
    }

    /// Reads every cell of the board, row by row.
    pub fn encode<B: BoardReader + ?Sized>(board: &B) -> Self {
        let mut bits = 0u64;
        for index in 0..CELLS {
            let piece = board.piece_at(decode_location(index));
            bits = (bits << 4) | (piece.number() as u64 & NIBBLE);
        }
        PackedState(bits)
    }

    /// Packs raw cell values. Only the low nibble of each value is kept.
    pub fn from_cells(cells: [u8; CELLS]) -> Self {
        let bits = cells
            .iter()
            .fold(0u64, |acc, &cell| (acc << 4) | (cell as u64 & NIBBLE));
        PackedState(bits)
    }

    pub fn cells(self) -> [u8; CELLS] {
        let mut cells = [0u8; CELLS];
        for (index, cell) in cells.iter_mut().enumerate() {
            *cell = self.cell(index);
        }
        cells
    }

    #[inline]
    pub fn cell(self, index: usize) -> u8 {
        ((self.0 >> shift(index)) & NIBBLE) as u8
    }

    pub fn piece_at(self, index: usize) -> Piece {
        Piece::from_nibble(self.cell(index))
    }

    /// Index of the blank cell.
    pub fn blank_index(self) -> Result<usize, SolveError> {
        (0..CELLS)
            .find(|&index| self.cell(index) == 0)
            .ok_or(SolveError::CorruptState { state: self })
    }

    /// Swaps the two cells addressed by `action`, leaving the rest alone.
    #[inline]
    pub fn apply(self, action: Action) -> PackedState {
        let (lo, hi) = action.cells();
        let lo_value = (self.0 >> shift(lo)) & NIBBLE;
        let hi_value = (self.0 >> shift(hi)) & NIBBLE;
        let cleared = self.0 & !((NIBBLE << shift(lo)) | (NIBBLE << shift(hi)));
        PackedState(cleared | (hi_value << shift(lo)) | (lo_value << shift(hi)))
    }
}

impl fmt::Display for PackedState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, cell) in self.cells().iter().enumerate() {
            if index > 0 {
                f.write_str(if index % WIDTH == 0 { " | " } else { " " })?;
            }
            write!(f, "{}", cell)?;
        }
        Ok(())
    }
}

/// A swap of two adjacent cells, packed as `(lo << 4) | hi` with `lo < hi`.
///
/// Both orientations of the same swap encode to the same byte, which is what
/// lets the search recognise an immediate undo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Action(u8);

impl Action {
    pub fn new(lo: usize, hi: usize) -> Self {
        debug_assert!(lo < hi && hi < CELLS, "bad action cells ({}, {})", lo, hi);
        Action((((lo as u8) & 0x0F) << 4) | ((hi as u8) & 0x0F))
    }

    /// Builds the action for two cells given in either order.
    pub fn between(a: usize, b: usize) -> Self {
        Action::new(a.min(b), a.max(b))
    }

    pub fn cells(self) -> (usize, usize) {
        ((self.0 >> 4) as usize, (self.0 & 0x0F) as usize)
    }

    pub fn bits(self) -> u8 {
        self.0
    }

    /// Swaps available to a blank at `blank`: right, left, down, up.
    pub fn around(blank: usize) -> impl Iterator<Item = Action> {
        let column = blank % WIDTH;
        let right = (column + 1 < WIDTH).then(|| Action::between(blank, blank + 1));
        let left = (column > 0).then(|| Action::between(blank, blank - 1));
        let down = (blank + WIDTH < CELLS).then(|| Action::between(blank, blank + WIDTH));
        let up = (blank >= WIDTH).then(|| Action::between(blank, blank - WIDTH));
        [right, left, down, up].into_iter().flatten()
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let (lo, hi) = self.cells();
        write!(f, "swap({}, {})", lo, hi)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::puzzle::Puzzle;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn solved_board_encodes_to_target() {
        assert_eq!(PackedState::encode(&Puzzle::new()), PackedState::TARGET);
        assert_eq!(PackedState::TARGET.blank_index(), Ok(15));
    }

    #[test]
    fn most_significant_nibble_is_cell_zero() {
        let mut cells = [0u8; CELLS];
        for (index, cell) in cells.iter_mut().enumerate() {
            *cell = index as u8;
        }
        let state = PackedState::from_cells(cells);
        assert_eq!(state.bits(), 0x0123_4567_89AB_CDEF);
        assert_eq!(state.cell(0), 0);
        assert_eq!(state.cell(15), 15);
        assert_eq!(state.blank_index(), Ok(0));
        assert_eq!(state.cells(), cells);
    }

    #[test]
    fn leading_blank_survives_encoding() {
        let puzzle: Puzzle = "0 1 2 3 4 5 6 7 8 9 10 11 12 13 14 15".parse().unwrap();
        let state = PackedState::encode(&puzzle);
        assert_eq!(state.blank_index(), Ok(0));
        assert_eq!(Puzzle::from_state(state).unwrap(), puzzle);
    }

    #[test]
    fn blank_index_rejects_state_without_blank() {
        let state = PackedState::from_bits(0x1234_5678_9ABC_DEF1);
        assert_eq!(
            state.blank_index(),
            Err(SolveError::CorruptState { state })
        );
    }

    #[test]
    fn decode_location_is_column_then_row() {
        assert_eq!(decode_location(0), Location::new(0, 0));
        assert_eq!(decode_location(6), Location::new(2, 1));
        assert_eq!(decode_location(15), Location::new(3, 3));
    }

    #[test]
    fn action_packs_low_index_high() {
        let action = Action::between(11, 7);
        assert_eq!(action.bits(), 0x7B);
        assert_eq!(action.cells(), (7, 11));
        assert_eq!(action, Action::new(7, 11));
    }

    #[test]
    fn around_respects_edges() {
        let corner: Vec<_> = Action::around(0).collect();
        assert_eq!(corner, vec![Action::new(0, 1), Action::new(0, 4)]);

        let edge: Vec<_> = Action::around(7).collect();
        assert_eq!(
            edge,
            vec![Action::new(6, 7), Action::new(7, 11), Action::new(3, 7)]
        );

        let middle: Vec<_> = Action::around(5).collect();
        assert_eq!(
            middle,
            vec![
                Action::new(5, 6),
                Action::new(4, 5),
                Action::new(5, 9),
                Action::new(1, 5)
            ]
        );

        // No wrap from the end of one row to the start of the next.
        assert!(Action::around(3).all(|a| a != Action::new(3, 4)));
        assert!(Action::around(4).all(|a| a != Action::new(3, 4)));
    }

    #[test]
    fn apply_swaps_only_the_addressed_cells() {
        let state = PackedState::TARGET;
        let moved = state.apply(Action::new(14, 15));
        assert_eq!(moved.cell(14), 0);
        assert_eq!(moved.cell(15), 15);
        for index in 0..14 {
            assert_eq!(moved.cell(index), state.cell(index));
        }
        assert_eq!(state, PackedState::TARGET);
    }

    #[test]
    fn apply_is_self_inverse_along_random_walks() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut puzzle = Puzzle::new();
        for _ in 0..50 {
            puzzle.scramble(&mut rng, 13);
            let state = PackedState::encode(&puzzle);
            let blank = state.blank_index().unwrap();
            for action in Action::around(blank) {
                let next = state.apply(action);
                assert_ne!(next, state);
                assert_eq!(next.apply(action), state);
                assert_eq!(PackedState::from_cells(next.cells()), next);
            }
        }
    }
}
