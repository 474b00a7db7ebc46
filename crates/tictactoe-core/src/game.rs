//! Core game state machine.
//!
//! This module contains the `GameSession` struct, move application with
//! win/draw detection, and the cross-game `Score` tally.

use crate::actions::GameEvent;
use crate::board::{Board, Mark, CELL_COUNT};
use crate::bot::Difficulty;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Where a session stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    InProgress,
    PlayerWon,
    OpponentWon,
    Draw,
}

impl GameStatus {
    /// Won and drawn sessions accept no further moves
    pub fn is_terminal(&self) -> bool {
        !matches!(self, GameStatus::InProgress)
    }

    pub fn winner(&self) -> Option<Mark> {
        match self {
            GameStatus::PlayerWon => Some(Mark::Player),
            GameStatus::OpponentWon => Some(Mark::Opponent),
            GameStatus::InProgress | GameStatus::Draw => None,
        }
    }

    fn won_by(mark: Mark) -> Self {
        match mark {
            Mark::Player => GameStatus::PlayerWon,
            Mark::Opponent => GameStatus::OpponentWon,
        }
    }
}

/// Errors that can occur when applying a move
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum MoveError {
    #[error("Cell {0} is off the board")]
    InvalidIndex(usize),

    #[error("Cell {0} is already taken")]
    CellOccupied(usize),

    #[error("Game is over")]
    GameOver,

    #[error("Not your turn: expected {expected:?}, got {got:?}")]
    WrongTurn { expected: Mark, got: Mark },
}

/// One playthrough from an empty board to a terminal status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GameSession {
    board: Board,
    turn: Mark,
    status: GameStatus,
    difficulty: Difficulty,
    /// The completed line, set only once a mark has won
    winning_line: Option<[usize; 3]>,
}

impl GameSession {
    /// Start a game: empty board, the human player to move
    pub fn new(difficulty: Difficulty) -> Self {
        Self {
            board: Board::new(),
            turn: Mark::Player,
            status: GameStatus::InProgress,
            difficulty,
            winning_line: None,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Whose turn it is. After the game ends this is the mark that moved last.
    pub fn turn(&self) -> Mark {
        self.turn
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn difficulty(&self) -> Difficulty {
        self.difficulty
    }

    pub fn winning_line(&self) -> Option<[usize; 3]> {
        self.winning_line
    }

    pub fn is_finished(&self) -> bool {
        self.status.is_terminal()
    }

    pub fn winner(&self) -> Option<Mark> {
        self.status.winner()
    }

    /// Is the game still running with `mark` to move?
    pub fn awaiting(&self, mark: Mark) -> bool {
        self.status == GameStatus::InProgress && self.turn == mark
    }

    /// Validate a move without applying it
    pub fn check_move(&self, index: usize, mark: Mark) -> Result<(), MoveError> {
        if index >= CELL_COUNT {
            return Err(MoveError::InvalidIndex(index));
        }
        if !self.board.is_empty(index) {
            return Err(MoveError::CellOccupied(index));
        }
        if self.status.is_terminal() {
            return Err(MoveError::GameOver);
        }
        if mark != self.turn {
            return Err(MoveError::WrongTurn {
                expected: self.turn,
                got: mark,
            });
        }
        Ok(())
    }

    /// Apply a move.
    ///
    /// On error the session is left untouched. On success the cell is set
    /// and the terminal checks run in order: a completed line for `mark`,
    /// then a full board, otherwise the turn passes.
    pub fn apply_move(&mut self, index: usize, mark: Mark) -> Result<Vec<GameEvent>, MoveError> {
        self.check_move(index, mark)?;

        self.board.place(index, mark);
        let mut events = vec![GameEvent::MarkPlaced { index, mark }];

        if let Some(line) = self.board.winning_line(mark) {
            self.status = GameStatus::won_by(mark);
            self.winning_line = Some(line);
            events.push(GameEvent::GameWon { mark, line });
        } else if self.board.is_full() {
            self.status = GameStatus::Draw;
            events.push(GameEvent::GameDrawn);
        } else {
            self.turn = mark.other();
            events.push(GameEvent::TurnChanged { next: self.turn });
        }

        Ok(events)
    }
}

impl Default for GameSession {
    fn default() -> Self {
        Self::new(Difficulty::default())
    }
}

/// Win tally that outlives individual sessions
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Score {
    pub player_wins: u32,
    pub opponent_wins: u32,
}

impl Score {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count a finished session. Returns whether the tally changed.
    pub fn record(&mut self, status: GameStatus) -> bool {
        match status {
            GameStatus::PlayerWon => {
                self.player_wins += 1;
                true
            }
            GameStatus::OpponentWon => {
                self.opponent_wins += 1;
                true
            }
            GameStatus::InProgress | GameStatus::Draw => false,
        }
    }
}
