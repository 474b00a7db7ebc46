//! WebSocket protocol messages.

use serde::{Deserialize, Serialize};
use tictactoe_core::{Difficulty, GameStatus, Mark};
use uuid::Uuid;

/// Messages sent from client to server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ClientMessage {
    /// Human clicked a cell
    CellActivated { index: usize },

    /// Pick a difficulty; starts a new game
    SetDifficulty { difficulty: Difficulty },

    /// Start a new game at the current difficulty
    Reset,

    /// Ping for keepalive
    Ping,
}

/// Messages sent from server to client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload")]
pub enum ServerMessage {
    /// Welcome message with assigned player ID
    Welcome { player_id: Uuid },

    /// The board changed or a new game started
    State { view: SessionView },

    /// Win tally changed
    Score { player_wins: u32, opponent_wins: u32 },

    /// Error occurred
    Error { message: String },

    /// Pong response
    Pong,
}

/// Everything a client needs to draw one frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionView {
    /// Cells in index order, `None` for empty
    pub cells: Vec<Option<Mark>>,
    pub turn: Mark,
    pub status: GameStatus,
    pub difficulty: Difficulty,
    /// Cells to highlight after a win
    pub winning_line: Option<[usize; 3]>,
    /// Human-readable status line
    pub status_text: String,
}
