//! Events produced by applying a move.
//!
//! Adapters can replay these to animate a move instead of diffing whole
//! sessions.

use crate::board::Mark;
use serde::{Deserialize, Serialize};

/// Events that occur as a result of a move
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A mark was written into a cell
    MarkPlaced { index: usize, mark: Mark },

    /// The move completed a line
    GameWon { mark: Mark, line: [usize; 3] },

    /// The move filled the last cell without completing a line
    GameDrawn,

    /// Play passes to the other mark
    TurnChanged { next: Mark },
}

impl GameEvent {
    /// Whether this event ends the game
    pub fn is_terminal(&self) -> bool {
        matches!(self, GameEvent::GameWon { .. } | GameEvent::GameDrawn)
    }
}
