//! One player's game table.

use tictactoe_core::{
    Difficulty, GameController, GameEvent, GameSession, GameStatus, Mark, MoveSelector, Presenter,
    Score,
};
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use crate::protocol::{ServerMessage, SessionView};

/// Status line shown under the board
pub fn status_text(session: &GameSession) -> &'static str {
    match session.status() {
        GameStatus::InProgress => match session.turn() {
            Mark::Player => "Your turn",
            Mark::Opponent => "Opponent thinking",
        },
        GameStatus::PlayerWon => "You win!",
        GameStatus::OpponentWon => "Opponent wins!",
        GameStatus::Draw => "Draw",
    }
}

impl From<&GameSession> for SessionView {
    fn from(session: &GameSession) -> Self {
        SessionView {
            cells: session.board().cells().iter().map(|c| c.mark()).collect(),
            turn: session.turn(),
            status: session.status(),
            difficulty: session.difficulty(),
            winning_line: session.winning_line(),
            status_text: status_text(session).to_string(),
        }
    }
}

/// Forwards notifications to the connection's outgoing channel
pub struct ChannelPresenter {
    player_id: Uuid,
    tx: mpsc::UnboundedSender<ServerMessage>,
}

impl ChannelPresenter {
    pub fn new(player_id: Uuid, tx: mpsc::UnboundedSender<ServerMessage>) -> Self {
        Self { player_id, tx }
    }

    fn send(&self, msg: ServerMessage) {
        if self.tx.send(msg).is_err() {
            debug!("Dropping update for disconnected player {}", self.player_id);
        }
    }
}

impl Presenter for ChannelPresenter {
    fn state_changed(&mut self, session: &GameSession) {
        self.send(ServerMessage::State {
            view: SessionView::from(session),
        });
    }

    fn score_changed(&mut self, score: &Score) {
        self.send(ServerMessage::Score {
            player_wins: score.player_wins,
            opponent_wins: score.opponent_wins,
        });
    }
}

/// A connected player and their game against the opponent.
pub struct Table {
    pub player_id: Uuid,
    controller: GameController<ChannelPresenter>,
}

impl Table {
    pub fn new(
        player_id: Uuid,
        tx: mpsc::UnboundedSender<ServerMessage>,
        difficulty: Difficulty,
        selector: MoveSelector,
    ) -> Self {
        Self {
            player_id,
            controller: GameController::new(
                ChannelPresenter::new(player_id, tx),
                selector,
                difficulty,
            ),
        }
    }

    pub fn session(&self) -> &GameSession {
        self.controller.session()
    }

    pub fn score(&self) -> Score {
        self.controller.score()
    }

    pub fn generation(&self) -> u64 {
        self.controller.generation()
    }

    pub fn awaiting_opponent(&self) -> bool {
        self.controller.awaiting_opponent()
    }

    /// Push a message that is not tied to a state change
    pub fn send(&mut self, msg: ServerMessage) {
        self.controller.presenter_mut().send(msg);
    }

    /// Events from the click, empty when it was rejected
    pub fn cell_activated(&mut self, index: usize) -> Vec<GameEvent> {
        let events = self.controller.on_cell_activated(index);
        if events.is_empty() {
            debug!(
                "Ignoring click on cell {} from player {}",
                index, self.player_id
            );
        }
        events
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.controller.on_difficulty_changed(difficulty);
    }

    pub fn reset(&mut self) {
        self.controller.on_reset_requested();
    }

    pub fn play_opponent_turn(&mut self) -> Option<usize> {
        self.controller.play_opponent_turn()
    }
}
