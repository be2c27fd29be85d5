use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use std::str::FromStr;

use crate::error::BoardError;
use crate::state::{decode_location, PackedState, CELLS, WIDTH};

/// A tile identifier. `0` is reserved for the empty cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Piece(u8);

impl Piece {
    pub const EMPTY: Piece = Piece(0);

    pub fn for_number(number: u8) -> Option<Piece> {
        (number < CELLS as u8).then(|| Piece(number))
    }

    pub(crate) fn from_nibble(nibble: u8) -> Piece {
        Piece(nibble & 0x0F)
    }

    pub fn number(&self) -> u8 {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_empty() {
            write!(f, "empty")
        } else {
            write!(f, "{}", self.0)
        }
    }
}

/// A cell on the board, addressed by column then row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Location {
    column: usize,
    row: usize,
}

impl Location {
    /// Panics if the cell is off the board.
    pub fn new(column: usize, row: usize) -> Self {
        Self::try_new(column, row)
            .unwrap_or_else(|| panic!("location ({}, {}) is off the board", column, row))
    }

    pub fn try_new(column: usize, row: usize) -> Option<Self> {
        (column < WIDTH && row < WIDTH).then(|| Self { column, row })
    }

    pub fn column(&self) -> usize {
        self.column
    }

    pub fn row(&self) -> usize {
        self.row
    }

    pub fn from_index(index: usize) -> Self {
        decode_location(index)
    }

    pub fn index(&self) -> usize {
        self.row * WIDTH + self.column
    }

    fn is_adjacent(&self, other: Location) -> bool {
        self.column.abs_diff(other.column) + self.row.abs_diff(other.row) == 1
    }

    fn neighbours(self) -> impl Iterator<Item = Location> {
        (0..CELLS)
            .map(Location::from_index)
            .filter(move |loc| loc.is_adjacent(self))
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.column, self.row)
    }
}

/// One tile sliding into the empty cell at `location`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Move {
    pub piece: Piece,
    pub location: Location,
}

impl Move {
    pub fn new(piece: Piece, location: Location) -> Self {
        Self { piece, location }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "piece {} to {}", self.piece, self.location)
    }
}

/// Moves in the order they are to be played.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Solution {
    moves: Vec<Move>,
}

impl Solution {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, movement: Move) {
        self.moves.push(movement);
    }

    pub fn len(&self) -> usize {
        self.moves.len()
    }

    pub fn is_empty(&self) -> bool {
        self.moves.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Move> {
        self.moves.iter()
    }

    pub fn as_slice(&self) -> &[Move] {
        &self.moves
    }
}

impl IntoIterator for Solution {
    type Item = Move;
    type IntoIter = std::vec::IntoIter<Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.into_iter()
    }
}

impl<'a> IntoIterator for &'a Solution {
    type Item = &'a Move;
    type IntoIter = std::slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.moves.iter()
    }
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (step, movement) in self.moves.iter().enumerate() {
            writeln!(f, "{:3}. {}", step + 1, movement)?;
        }
        Ok(())
    }
}

/// Read access to a 4×4 board, one cell at a time.
pub trait BoardReader {
    fn piece_at(&self, location: Location) -> Piece;
}

/// Direction a tile slides into the blank.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slide {
    Up,
    Left,
    Down,
    Right,
}

impl Slide {
    pub const ALL: [Slide; 4] = [Slide::Up, Slide::Left, Slide::Down, Slide::Right];

    /// Where the blank travels, as (column, row) deltas.
    pub fn as_offset(&self) -> (isize, isize) {
        match self {
            Slide::Up => (0, 1),
            Slide::Left => (1, 0),
            Slide::Down => (0, -1),
            Slide::Right => (-1, 0),
        }
    }

    pub fn opposite(&self) -> Self {
        match self {
            Slide::Up => Slide::Down,
            Slide::Down => Slide::Up,
            Slide::Left => Slide::Right,
            Slide::Right => Slide::Left,
        }
    }
}

impl fmt::Display for Slide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match *self {
            Slide::Up => "Up",
            Slide::Left => "Left",
            Slide::Down => "Down",
            Slide::Right => "Right",
        };
        write!(f, "{}", s)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Puzzle {
    board: [[u8; WIDTH]; WIDTH],
    blank: Location,
}

impl Default for Puzzle {
    fn default() -> Self {
        Self::new()
    }
}

impl Puzzle {
    /// The solved layout: 1..15 row by row, blank bottom-right.
    pub fn new() -> Self {
        let mut board = [[0u8; WIDTH]; WIDTH];
        let mut value = 1;

        for (i, row) in board.iter_mut().enumerate() {
            for (j, cell) in row.iter_mut().enumerate() {
                if i == WIDTH - 1 && j == WIDTH - 1 {
                    *cell = 0; // The empty space is represented by 0
                } else {
                    *cell = value;
                    value += 1;
                }
            }
        }

        Self {
            board,
            blank: Location::new(WIDTH - 1, WIDTH - 1),
        }
    }

    /// Builds a board from sixteen numbers in row-major order.
    pub fn from_numbers(numbers: &[u8]) -> Result<Self, BoardError> {
        if numbers.len() != CELLS {
            return Err(BoardError::WrongCellCount(numbers.len()));
        }

        let mut seen = [false; CELLS];
        let mut board = [[0u8; WIDTH]; WIDTH];
        let mut blank = Location::new(0, 0);

        for (index, &number) in numbers.iter().enumerate() {
            if number as usize >= CELLS {
                return Err(BoardError::OutOfRange(number));
            }
            if seen[number as usize] {
                return Err(BoardError::Duplicate(number));
            }
            seen[number as usize] = true;

            let location = Location::from_index(index);
            board[location.row][location.column] = number;
            if number == 0 {
                blank = location;
            }
        }

        Ok(Self { board, blank })
    }

    pub fn from_state(state: PackedState) -> Result<Self, BoardError> {
        Self::from_numbers(&state.cells())
    }

    pub fn blank(&self) -> Location {
        self.blank
    }

    fn numbers(&self) -> Vec<u8> {
        self.board.iter().flat_map(|row| row.iter()).copied().collect()
    }

    /// Plays `movement` if its piece sits next to the blank and its
    /// destination is the blank.
    pub fn apply_move(&mut self, movement: Move) -> bool {
        if movement.piece.is_empty() || movement.location != self.blank {
            return false;
        }

        let from = self
            .blank
            .neighbours()
            .find(|&loc| self.board[loc.row][loc.column] == movement.piece.number());

        match from {
            Some(from) => {
                self.board[self.blank.row][self.blank.column] = movement.piece.number();
                self.board[from.row][from.column] = 0;
                self.blank = from;
                true
            }
            None => false,
        }
    }

    /// Slides the tile next to the blank in `direction`, if there is one.
    pub fn slide(&mut self, direction: Slide) -> bool {
        let (dx, dy) = direction.as_offset();

        let new_x = self.blank.column as isize + dx;
        let new_y = self.blank.row as isize + dy;

        if new_x >= 0 && new_x < WIDTH as isize && new_y >= 0 && new_y < WIDTH as isize {
            let target = Location::new(new_x as usize, new_y as usize);
            let piece = self.piece_at(target);
            self.apply_move(Move::new(piece, self.blank))
        } else {
            false
        }
    }

    /// Random walk of `steps` slides that never immediately undoes itself.
    /// Returns the slides in the order they were played.
    pub fn scramble<R: Rng + ?Sized>(&mut self, rng: &mut R, steps: usize) -> Vec<Slide> {
        let mut walk = Vec::with_capacity(steps);
        let mut last: Option<Slide> = None;

        while walk.len() < steps {
            let options: Vec<Slide> = Slide::ALL
                .iter()
                .copied()
                .filter(|dir| last.map_or(true, |l| *dir != l.opposite()))
                .collect();

            if let Some(&dir) = options.choose(rng) {
                if self.slide(dir) {
                    last = Some(dir);
                    walk.push(dir);
                }
            }
        }
        walk
    }

    pub fn is_solvable(&self) -> bool {
        let inversions = Self::count_inversions(&self.numbers());

        // Even width: solvable if inversions plus the blank's row is odd.
        (inversions + self.blank.row) % 2 == 1
    }

    fn count_inversions(flattened: &[u8]) -> usize {
        flattened
            .iter()
            .enumerate()
            .filter(|&(_, &val)| val != 0)
            .map(|(i, &val)| {
                flattened[i + 1..]
                    .iter()
                    .filter(|&&next| next != 0 && next < val)
                    .count()
            })
            .sum()
    }

    pub fn is_solved(&self) -> bool {
        PackedState::encode(self) == PackedState::TARGET
    }
}

impl BoardReader for Puzzle {
    fn piece_at(&self, location: Location) -> Piece {
        Piece::from_nibble(self.board[location.row][location.column])
    }
}

impl FromStr for Puzzle {
    type Err = BoardError;

    /// Sixteen whitespace or comma separated numbers, row by row.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let numbers = s
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|tok| !tok.is_empty())
            .map(|tok| {
                tok.parse::<u8>()
                    .map_err(|_| BoardError::BadNumber(tok.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_numbers(&numbers)
    }
}

impl fmt::Display for Puzzle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.board {
            for &val in row {
                write!(f, "{:2} ", val)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
