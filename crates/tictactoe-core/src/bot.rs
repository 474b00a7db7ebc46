//! Opponent AI.
//!
//! This module provides three difficulty levels:
//! - Easy: Random empty cell
//! - Medium: Coin flip between Easy and Hard on every move
//! - Hard: Fixed priority chain (win, block, center, corner, edge)
//!
//! Hard is a heuristic, not a minimax search. A player who knows the
//! priority order can still beat it.

use crate::board::{Board, Mark, CENTER, CORNERS, EDGES};
use rand::prelude::*;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Opponent difficulty level
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];

    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Easy => "easy",
            Difficulty::Medium => "medium",
            Difficulty::Hard => "hard",
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown difficulty '{0}', expected easy, medium or hard")]
pub struct ParseDifficultyError(pub String);

impl FromStr for Difficulty {
    type Err = ParseDifficultyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Difficulty::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ParseDifficultyError(s.to_string()))
    }
}

/// Source of uniform randomness for move selection.
///
/// Every random decision the opponent makes goes through `next_unit`, so a
/// scripted source pins down tie-breaks exactly.
pub trait RandomSource {
    /// A uniform sample in `[0, 1)`
    fn next_unit(&mut self) -> f64;

    /// True with probability `p`
    fn chance(&mut self, p: f64) -> bool {
        self.next_unit() < p
    }

    /// Uniform index into a collection of `len` items. `len` must be non-zero.
    fn pick_index(&mut self, len: usize) -> usize {
        let i = (self.next_unit() * len as f64) as usize;
        i.min(len.saturating_sub(1))
    }
}

impl<R: RngCore> RandomSource for R {
    fn next_unit(&mut self) -> f64 {
        self.gen::<f64>()
    }
}

/// Chooses the opponent's cell
pub struct MoveSelector<R = StdRng> {
    rng: R,
}

impl MoveSelector<StdRng> {
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl Default for MoveSelector<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RandomSource> MoveSelector<R> {
    pub fn with_source(rng: R) -> Self {
        Self { rng }
    }

    /// Choose a cell for the opponent. `None` only when the board is full.
    pub fn select(&mut self, board: &Board, difficulty: Difficulty) -> Option<usize> {
        match difficulty {
            Difficulty::Easy => self.random_move(board),
            Difficulty::Medium => {
                if self.rng.chance(0.5) {
                    self.best_move(board)
                } else {
                    self.random_move(board)
                }
            }
            Difficulty::Hard => self.best_move(board),
        }
    }

    /// Easy: any empty cell
    fn random_move(&mut self, board: &Board) -> Option<usize> {
        self.pick(&board.empty_cells())
    }

    /// Hard: win, block, center, corner, edge
    fn best_move(&mut self, board: &Board) -> Option<usize> {
        let me = Mark::Opponent;
        let empty = board.empty_cells();

        if let Some(&win) = empty.iter().find(|&&i| board.completes_line(i, me)) {
            return Some(win);
        }
        if let Some(&block) = empty.iter().find(|&&i| board.completes_line(i, me.other())) {
            return Some(block);
        }
        if board.is_empty(CENTER) {
            return Some(CENTER);
        }

        let corners = board.empty_among(&CORNERS);
        if !corners.is_empty() {
            return self.pick(&corners);
        }
        self.pick(&board.empty_among(&EDGES))
    }

    fn pick(&mut self, cells: &[usize]) -> Option<usize> {
        if cells.is_empty() {
            return None;
        }
        cells.get(self.rng.pick_index(cells.len())).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Replays a fixed list of samples, then repeats the last one
    struct Scripted {
        samples: Vec<f64>,
        next: usize,
    }

    impl Scripted {
        fn new(samples: &[f64]) -> Self {
            Self {
                samples: samples.to_vec(),
                next: 0,
            }
        }
    }

    impl RandomSource for Scripted {
        fn next_unit(&mut self) -> f64 {
            let i = self.next.min(self.samples.len() - 1);
            self.next += 1;
            self.samples[i]
        }
    }

    fn scripted(samples: &[f64]) -> MoveSelector<Scripted> {
        MoveSelector::with_source(Scripted::new(samples))
    }

    #[test]
    fn test_difficulty_parse_and_display() {
        assert_eq!("Hard".parse::<Difficulty>(), Ok(Difficulty::Hard));
        assert_eq!(" medium ".parse::<Difficulty>(), Ok(Difficulty::Medium));
        assert!("expert".parse::<Difficulty>().is_err());
        assert_eq!(Difficulty::Easy.to_string(), "easy");
        assert_eq!(Difficulty::default(), Difficulty::Easy);
    }

    #[test]
    fn test_pick_index_clamps() {
        let mut rng = Scripted::new(&[0.0, 0.49, 0.999_999]);
        assert_eq!(rng.pick_index(4), 0);
        assert_eq!(rng.pick_index(4), 1);
        assert_eq!(rng.pick_index(4), 3);
    }

    #[test]
    fn test_easy_picks_among_empty_cells() {
        let board = Board::with_marks(&[0, 4], &[8]);
        // Empty cells: 1 2 3 5 6 7
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Easy), Some(1));
        assert_eq!(scripted(&[0.5]).select(&board, Difficulty::Easy), Some(5));
        assert_eq!(scripted(&[0.99]).select(&board, Difficulty::Easy), Some(7));
    }

    #[test]
    fn test_full_board_has_no_move() {
        let board = Board::with_marks(&[0, 2, 3, 7, 8], &[1, 4, 5, 6]);
        for difficulty in Difficulty::ALL {
            assert_eq!(scripted(&[0.0]).select(&board, difficulty), None);
        }
    }

    #[test]
    fn test_hard_takes_win() {
        let board = Board::with_marks(&[3, 8], &[0, 1]);
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Hard), Some(2));
    }

    #[test]
    fn test_hard_blocks() {
        let board = Board::with_marks(&[3, 4], &[0]);
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Hard), Some(5));
    }

    #[test]
    fn test_hard_prefers_win_over_block() {
        // Player threatens 2 and 8, opponent can win at 8 on the bottom row
        let board = Board::with_marks(&[0, 1, 4], &[6, 7]);
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Hard), Some(8));
    }

    #[test]
    fn test_hard_takes_lowest_winning_cell() {
        // Opponent can win at 2 (row 0) or 6 (column 0)
        let board = Board::with_marks(&[4, 5, 7], &[0, 1, 3]);
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Hard), Some(2));
    }

    #[test]
    fn test_hard_takes_center() {
        let board = Board::with_marks(&[0], &[]);
        assert_eq!(scripted(&[0.9]).select(&board, Difficulty::Hard), Some(CENTER));
    }

    #[test]
    fn test_hard_random_corner() {
        let board = Board::with_marks(&[4], &[]);
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Hard), Some(0));
        assert_eq!(scripted(&[0.3]).select(&board, Difficulty::Hard), Some(2));
        assert_eq!(scripted(&[0.6]).select(&board, Difficulty::Hard), Some(6));
        assert_eq!(scripted(&[0.8]).select(&board, Difficulty::Hard), Some(8));
    }

    #[test]
    fn test_hard_random_edge() {
        // Center and corners taken, no open threats: only edges 1 and 7 remain
        let board = Board::with_marks(&[2, 3, 4, 8], &[0, 5, 6]);
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Hard), Some(1));
        assert_eq!(scripted(&[0.9]).select(&board, Difficulty::Hard), Some(7));
    }

    #[test]
    fn test_hard_blocks_before_center() {
        let board = Board::with_marks(&[0, 1], &[8]);
        assert_eq!(scripted(&[0.0]).select(&board, Difficulty::Hard), Some(2));
    }

    #[test]
    fn test_medium_coin_flip() {
        let board = Board::with_marks(&[3, 4], &[0]);
        // Below 0.5: Hard blocks at 5
        assert_eq!(scripted(&[0.2]).select(&board, Difficulty::Medium), Some(5));
        // At or above 0.5: Easy picks from 1 2 5 6 7 8 using the second sample
        assert_eq!(scripted(&[0.5, 0.0]).select(&board, Difficulty::Medium), Some(1));
        assert_eq!(scripted(&[0.7, 0.99]).select(&board, Difficulty::Medium), Some(8));
    }

    #[test]
    fn test_seeded_selector_is_deterministic() {
        let board = Board::with_marks(&[4], &[]);
        let a: Vec<_> = {
            let mut s = MoveSelector::with_seed(42);
            (0..20).map(|_| s.select(&board, Difficulty::Easy)).collect()
        };
        let b: Vec<_> = {
            let mut s = MoveSelector::with_seed(42);
            (0..20).map(|_| s.select(&board, Difficulty::Easy)).collect()
        };
        assert_eq!(a, b);
        assert!(a.iter().all(|m| m.is_some_and(|i| board.is_empty(i))));
    }
}
