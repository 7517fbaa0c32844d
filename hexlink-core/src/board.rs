//! Hex board model with row/column coordinates
//!
//! Cells are stored row-major. First (red) connects the top and bottom rows,
//! Second (blue) connects the left and right columns.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GameError;

/// Row separator in the canonical wire board string
pub const ROW_SEPARATOR: char = ',';

/// Largest supported side length
pub const MAX_BOARD_SIZE: usize = 256;

/// Neighbour offsets (drow, dcol), clockwise from top-left
pub const NEIGHBOURS: [(isize, isize); 6] = [
    (-1, 0),
    (-1, 1),
    (0, 1),
    (1, 0),
    (1, -1),
    (0, -1),
];

// ============================================================================
// COLOUR
// ============================================================================

/// Stone colour of a cell
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Colour {
    #[default]
    Empty,
    /// Red, connects top to bottom
    First,
    /// Blue, connects left to right
    Second,
}

impl Colour {
    /// The other stone colour. `None` for `Empty`.
    pub fn opposite(self) -> Option<Colour> {
        match self {
            Colour::First => Some(Colour::Second),
            Colour::Second => Some(Colour::First),
            Colour::Empty => None,
        }
    }

    pub fn is_stone(self) -> bool {
        self != Colour::Empty
    }

    /// Wire character: '0', 'R' or 'B'
    pub fn to_char(self) -> char {
        match self {
            Colour::Empty => '0',
            Colour::First => 'R',
            Colour::Second => 'B',
        }
    }

    pub fn from_char(c: char) -> Option<Colour> {
        match c {
            '0' => Some(Colour::Empty),
            'R' => Some(Colour::First),
            'B' => Some(Colour::Second),
            _ => None,
        }
    }

    /// Parse a side name as sent by the server ("R" or "B")
    pub fn from_wire(s: &str) -> Option<Colour> {
        match s {
            "R" => Some(Colour::First),
            "B" => Some(Colour::Second),
            _ => None,
        }
    }

    /// Human-readable name
    pub fn name(self) -> &'static str {
        match self {
            Colour::Empty => "None",
            Colour::First => "Red",
            Colour::Second => "Blue",
        }
    }
}

// ============================================================================
// POSITION
// ============================================================================

/// Cell position. Displays as `row,col`, the wire move format.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Pos {
    pub row: usize,
    pub col: usize,
}

impl Pos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    pub fn in_bounds(&self, size: usize) -> bool {
        self.row < size && self.col < size
    }

    /// On-board neighbours of this cell
    pub fn neighbours(self, size: usize) -> impl Iterator<Item = Pos> {
        NEIGHBOURS.iter().filter_map(move |&(dr, dc)| {
            let row = self.row.checked_add_signed(dr)?;
            let col = self.col.checked_add_signed(dc)?;
            let pos = Pos::new(row, col);
            pos.in_bounds(size).then_some(pos)
        })
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.row, self.col)
    }
}

// ============================================================================
// BOARD
// ============================================================================

/// Square Hex board of side `size`
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Board {
    size: usize,
    cells: Vec<Colour>,
}

impl Board {
    /// Empty board. Fails with `InvalidSize` unless `1 <= size <= MAX_BOARD_SIZE`.
    pub fn new(size: usize) -> Result<Self, GameError> {
        let cells = Some(size)
            .filter(|n| (1..=MAX_BOARD_SIZE).contains(n))
            .and_then(|n| n.checked_mul(n))
            .ok_or(GameError::InvalidSize(size))?;
        Ok(Self {
            size,
            cells: vec![Colour::Empty; cells],
        })
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Colour at `pos`, `None` when off the board
    pub fn get(&self, pos: Pos) -> Option<Colour> {
        pos.in_bounds(self.size)
            .then(|| self.cells[pos.row * self.size + pos.col])
    }

    pub fn set_cell(&mut self, pos: Pos, colour: Colour) -> Result<(), GameError> {
        if !pos.in_bounds(self.size) {
            return Err(GameError::OutOfBounds { pos, size: self.size });
        }
        self.cells[pos.row * self.size + pos.col] = colour;
        Ok(())
    }

    /// All cells in row-major order
    pub fn cells(&self) -> impl Iterator<Item = (Pos, Colour)> + '_ {
        let size = self.size;
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, &c)| (Pos::new(i / size, i % size), c))
    }

    pub fn empty_cells(&self) -> impl Iterator<Item = Pos> + '_ {
        self.cells()
            .filter(|(_, c)| *c == Colour::Empty)
            .map(|(pos, _)| pos)
    }

    pub fn stone_count(&self, colour: Colour) -> usize {
        self.cells.iter().filter(|&&c| c == colour).count()
    }

    /// Number of non-empty cells
    pub fn placed(&self) -> usize {
        self.cells.len() - self.stone_count(Colour::Empty)
    }

    pub fn is_full(&self) -> bool {
        !self.cells.contains(&Colour::Empty)
    }

    // ========================================================================
    // WIRE FORMAT
    // ========================================================================

    /// Canonical wire string: one character per cell, rows joined by ','
    pub fn serialize(&self) -> String {
        let mut out = String::with_capacity(self.size * (self.size + 1));
        for (i, row) in self.cells.chunks(self.size).enumerate() {
            if i > 0 {
                out.push(ROW_SEPARATOR);
            }
            out.extend(row.iter().map(|c| c.to_char()));
        }
        out
    }

    /// Inverse of [`Board::serialize`]
    pub fn deserialize(s: &str, size: usize) -> Result<Self, GameError> {
        let rows: Vec<&str> = s.split(ROW_SEPARATOR).collect();
        Self::from_rows(&rows, size, |row| row.chars().collect())
    }

    // ========================================================================
    // TEXT FORMAT
    // ========================================================================

    /// Rhombus layout for humans: row i is indented by i spaces
    pub fn render(&self) -> String {
        let mut out = String::new();
        for (i, row) in self.cells.chunks(self.size).enumerate() {
            out.push_str(&" ".repeat(i));
            for c in row {
                out.push(c.to_char());
                out.push(' ');
            }
            out.push('\n');
        }
        out
    }

    /// Inverse of [`Board::render`]
    pub fn parse_rendered(text: &str, size: usize) -> Result<Self, GameError> {
        let rows: Vec<&str> = text.lines().filter(|l| !l.trim().is_empty()).collect();
        Self::from_rows(&rows, size, |row| {
            // Multi-character tokens map to '?' so the cell check rejects them
            row.split_whitespace()
                .map(|token| {
                    let mut chars = token.chars();
                    match (chars.next(), chars.next()) {
                        (Some(c), None) => c,
                        _ => '?',
                    }
                })
                .collect()
        })
    }

    fn from_rows<F>(rows: &[&str], size: usize, split_row: F) -> Result<Self, GameError>
    where
        F: Fn(&str) -> Vec<char>,
    {
        let mut board = Board::new(size)?;
        if rows.len() != size {
            return Err(GameError::MalformedBoard(format!(
                "expected {} rows, found {}",
                size,
                rows.len()
            )));
        }

        for (row, line) in rows.iter().enumerate() {
            let chars = split_row(line);
            if chars.len() != size {
                return Err(GameError::MalformedBoard(format!(
                    "row {} has {} cells, expected {}",
                    row,
                    chars.len(),
                    size
                )));
            }
            for (col, ch) in chars.into_iter().enumerate() {
                let colour = Colour::from_char(ch).ok_or_else(|| {
                    GameError::MalformedBoard(format!("unrecognised cell {:?} at {},{}", ch, row, col))
                })?;
                board.cells[row * size + col] = colour;
            }
        }

        Ok(board)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
