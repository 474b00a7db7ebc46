//! Board representation for a 3x3 game.
//!
//! This module contains:
//! - Marks (the human player's X and the opponent's O)
//! - Cells and the 9-cell board, indexed 0-8 row-major
//! - The eight fixed winning lines
//! - Cell classes the opponent AI reasons about (center, corners, edges)

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of cells on the board
pub const CELL_COUNT: usize = 9;

/// Index of the center cell
pub const CENTER: usize = 4;

/// Corner cell indices
pub const CORNERS: [usize; 4] = [0, 2, 6, 8];

/// Edge cell indices (the middle of each side)
pub const EDGES: [usize; 4] = [1, 3, 5, 7];

/// Every line that wins the game, in the order they are checked
pub const WINNING_LINES: [[usize; 3]; 8] = [
    // Rows
    [0, 1, 2],
    [3, 4, 5],
    [6, 7, 8],
    // Columns
    [0, 3, 6],
    [1, 4, 7],
    [2, 5, 8],
    // Diagonals
    [0, 4, 8],
    [2, 4, 6],
];

/// A symbol placed on the board
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mark {
    /// The human player, always X, always moves first
    Player,
    /// The automated opponent, always O
    Opponent,
}

impl Mark {
    /// The mark that moves after this one
    pub fn other(&self) -> Mark {
        match self {
            Mark::Player => Mark::Opponent,
            Mark::Opponent => Mark::Player,
        }
    }

    /// Symbol shown on the board
    pub fn symbol(&self) -> char {
        match self {
            Mark::Player => 'X',
            Mark::Opponent => 'O',
        }
    }
}

/// Contents of a single cell
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Cell {
    #[default]
    Empty,
    Taken(Mark),
}

impl Cell {
    pub fn is_empty(&self) -> bool {
        matches!(self, Cell::Empty)
    }

    pub fn mark(&self) -> Option<Mark> {
        match self {
            Cell::Empty => None,
            Cell::Taken(mark) => Some(*mark),
        }
    }
}

/// The 3x3 board.
///
/// Cells are only ever written while empty. Clearing happens by building a
/// fresh board for a new game.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Board {
    cells: [Cell; CELL_COUNT],
}

impl Board {
    /// Create an empty board
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from marks at the given indices. Out-of-range indices are skipped.
    pub fn with_marks(player: &[usize], opponent: &[usize]) -> Self {
        let mut board = Self::new();
        for &i in player {
            if i < CELL_COUNT {
                board.cells[i] = Cell::Taken(Mark::Player);
            }
        }
        for &i in opponent {
            if i < CELL_COUNT {
                board.cells[i] = Cell::Taken(Mark::Opponent);
            }
        }
        board
    }

    /// Get the cell at an index, `None` when out of range
    pub fn get(&self, index: usize) -> Option<Cell> {
        self.cells.get(index).copied()
    }

    /// All cells in index order
    pub fn cells(&self) -> &[Cell; CELL_COUNT] {
        &self.cells
    }

    /// Whether the cell at `index` exists and is empty
    pub fn is_empty(&self, index: usize) -> bool {
        self.get(index).is_some_and(|c| c.is_empty())
    }

    /// Indices of empty cells in ascending order
    pub fn empty_cells(&self) -> Vec<usize> {
        (0..CELL_COUNT).filter(|&i| self.cells[i].is_empty()).collect()
    }

    /// Empty cells from a fixed candidate set, keeping the candidate order
    pub fn empty_among(&self, candidates: &[usize]) -> Vec<usize> {
        candidates
            .iter()
            .copied()
            .filter(|&i| self.is_empty(i))
            .collect()
    }

    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|c| !c.is_empty())
    }

    /// Number of cells holding a mark
    pub fn filled(&self) -> usize {
        self.cells.iter().filter(|c| !c.is_empty()).count()
    }

    /// First winning line (in check order) fully held by `mark`
    pub fn winning_line(&self, mark: Mark) -> Option<[usize; 3]> {
        let taken = Cell::Taken(mark);
        WINNING_LINES
            .iter()
            .copied()
            .find(|line| line.iter().all(|&i| self.cells[i] == taken))
    }

    /// Would placing `mark` on the empty cell at `index` complete a line?
    pub fn completes_line(&self, index: usize, mark: Mark) -> bool {
        if !self.is_empty(index) {
            return false;
        }
        let mut probe = *self;
        probe.cells[index] = Cell::Taken(mark);
        probe.winning_line(mark).is_some()
    }

    /// Write a mark into a cell. Callers must check the cell is empty first.
    pub(crate) fn place(&mut self, index: usize, mark: Mark) {
        debug_assert!(self.is_empty(index), "cell {} already taken", index);
        self.cells[index] = Cell::Taken(mark);
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(3) {
            let line: String = row
                .iter()
                .map(|c| c.mark().map_or('.', |m| m.symbol()))
                .collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}
