//! The boundary between the engine and whatever renders it.
//!
//! An adapter owns one `GameController`, forwards user input to the
//! `on_*` methods and renders what its `Presenter` is told. Pacing the
//! opponent (the short pause before it moves) is the adapter's job: it
//! checks `awaiting_opponent` after a move, waits, then calls
//! `play_opponent_turn`.

use crate::actions::GameEvent;
use crate::board::Mark;
use crate::bot::{Difficulty, MoveSelector, RandomSource};
use crate::game::{GameSession, Score};
use rand::rngs::StdRng;

/// Receives state-change notifications
pub trait Presenter {
    /// The session changed: a move landed or a new game started
    fn state_changed(&mut self, session: &GameSession);

    /// The win tally changed
    fn score_changed(&mut self, score: &Score);
}

/// Headless presenter for adapters that poll instead
impl Presenter for () {
    fn state_changed(&mut self, _session: &GameSession) {}

    fn score_changed(&mut self, _score: &Score) {}
}

/// Owns the long-lived session and score for one human player
pub struct GameController<P, R = StdRng> {
    session: GameSession,
    score: Score,
    selector: MoveSelector<R>,
    presenter: P,
    generation: u64,
}

impl<P: Presenter, R: RandomSource> GameController<P, R> {
    /// Start the first game and render it
    pub fn new(presenter: P, selector: MoveSelector<R>, difficulty: Difficulty) -> Self {
        let mut controller = Self {
            session: GameSession::new(difficulty),
            score: Score::new(),
            selector,
            presenter,
            generation: 0,
        };
        controller.presenter.state_changed(&controller.session);
        controller
    }

    pub fn session(&self) -> &GameSession {
        &self.session
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn difficulty(&self) -> Difficulty {
        self.session.difficulty()
    }

    /// Number of games started after the first one
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    pub fn presenter_mut(&mut self) -> &mut P {
        &mut self.presenter
    }

    /// The human clicked a cell.
    ///
    /// Ignored unless the game is running and it is the human's turn.
    /// Rejected moves are ignored too and produce no events.
    pub fn on_cell_activated(&mut self, index: usize) -> Vec<GameEvent> {
        if !self.session.awaiting(Mark::Player) {
            return Vec::new();
        }
        self.apply(index, Mark::Player)
    }

    /// Switch difficulty. Always starts a new game, the score is kept.
    pub fn on_difficulty_changed(&mut self, difficulty: Difficulty) {
        self.start_new_game(difficulty);
    }

    /// Start over at the current difficulty. The score is kept.
    pub fn on_reset_requested(&mut self) {
        self.start_new_game(self.session.difficulty());
    }

    /// Is the opponent due to move?
    pub fn awaiting_opponent(&self) -> bool {
        self.session.awaiting(Mark::Opponent)
    }

    /// Let the opponent move. Returns the chosen cell, or `None` when it is
    /// not the opponent's turn.
    pub fn play_opponent_turn(&mut self) -> Option<usize> {
        if !self.awaiting_opponent() {
            return None;
        }
        let index = self
            .selector
            .select(self.session.board(), self.session.difficulty())?;
        let events = self.apply(index, Mark::Opponent);
        if events.is_empty() {
            None
        } else {
            Some(index)
        }
    }

    fn apply(&mut self, index: usize, mark: Mark) -> Vec<GameEvent> {
        let events = match self.session.apply_move(index, mark) {
            Ok(events) => events,
            Err(_) => return Vec::new(),
        };

        if self.session.is_finished() && self.score.record(self.session.status()) {
            self.presenter.score_changed(&self.score);
        }
        self.presenter.state_changed(&self.session);
        events
    }

    fn start_new_game(&mut self, difficulty: Difficulty) {
        self.session = GameSession::new(difficulty);
        self.generation += 1;
        self.presenter.state_changed(&self.session);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::GameStatus;
    use pretty_assertions::assert_eq;

    /// Records every notification
    #[derive(Default)]
    struct Recorder {
        states: Vec<GameSession>,
        scores: Vec<Score>,
    }

    impl Presenter for Recorder {
        fn state_changed(&mut self, session: &GameSession) {
            self.states.push(session.clone());
        }

        fn score_changed(&mut self, score: &Score) {
            self.scores.push(*score);
        }
    }

    /// Always returns the same sample
    struct Fixed(f64);

    impl RandomSource for Fixed {
        fn next_unit(&mut self) -> f64 {
            self.0
        }
    }

    fn controller(difficulty: Difficulty) -> GameController<Recorder, Fixed> {
        GameController::new(
            Recorder::default(),
            MoveSelector::with_source(Fixed(0.0)),
            difficulty,
        )
    }

    #[test]
    fn test_new_controller_renders_first_game() {
        let c = controller(Difficulty::Easy);
        assert_eq!(c.presenter().states.len(), 1);
        assert_eq!(c.generation(), 0);
        assert!(!c.awaiting_opponent());
    }

    #[test]
    fn test_click_applies_player_move() {
        let mut c = controller(Difficulty::Easy);
        let events = c.on_cell_activated(4);
        assert!(!events.is_empty());
        assert!(c.awaiting_opponent());
        assert_eq!(c.presenter().states.len(), 2);
    }

    #[test]
    fn test_clicks_ignored_while_opponent_to_move() {
        let mut c = controller(Difficulty::Easy);
        c.on_cell_activated(4);
        let before = c.session().clone();

        assert!(c.on_cell_activated(0).is_empty());
        assert_eq!(c.session(), &before);
        // No render for ignored input
        assert_eq!(c.presenter().states.len(), 2);
    }

    #[test]
    fn test_occupied_click_is_silent() {
        let mut c = controller(Difficulty::Easy);
        c.on_cell_activated(4);
        c.play_opponent_turn().unwrap();
        let before = c.session().clone();

        assert!(c.on_cell_activated(4).is_empty());
        assert!(c.on_cell_activated(42).is_empty());
        assert_eq!(c.session(), &before);
    }

    #[test]
    fn test_opponent_move_only_on_its_turn() {
        let mut c = controller(Difficulty::Hard);
        assert_eq!(c.play_opponent_turn(), None);

        c.on_cell_activated(0);
        // Hard takes the center after a corner opening
        assert_eq!(c.play_opponent_turn(), Some(4));
        assert!(c.session().awaiting(Mark::Player));
    }

    #[test]
    fn test_difficulty_change_resets_board_keeps_score() {
        let mut c = controller(Difficulty::Hard);
        c.on_cell_activated(0);
        c.play_opponent_turn();

        c.on_difficulty_changed(Difficulty::Medium);

        assert_eq!(c.session(), &GameSession::new(Difficulty::Medium));
        assert_eq!(c.score(), Score::default());
        assert_eq!(c.generation(), 1);
    }

    #[test]
    fn test_reset_keeps_difficulty() {
        let mut c = controller(Difficulty::Hard);
        c.on_cell_activated(0);
        c.on_reset_requested();
        assert_eq!(c.session(), &GameSession::new(Difficulty::Hard));
        assert_eq!(c.generation(), 1);
    }

    #[test]
    fn test_opponent_win_scores_once() {
        let mut c = controller(Difficulty::Hard);
        c.on_cell_activated(0);
        assert_eq!(c.play_opponent_turn(), Some(4));
        c.on_cell_activated(1);
        assert_eq!(c.play_opponent_turn(), Some(2));
        // Ignore the 2-4-6 threat
        c.on_cell_activated(8);
        assert_eq!(c.play_opponent_turn(), Some(6));

        assert_eq!(c.session().status(), GameStatus::OpponentWon);
        assert_eq!(c.session().winning_line(), Some([2, 4, 6]));
        let expected = Score {
            player_wins: 0,
            opponent_wins: 1,
        };
        assert_eq!(c.score(), expected);
        assert_eq!(c.presenter().scores, vec![expected]);

        // Finished games ignore everything until a reset
        assert!(c.on_cell_activated(3).is_empty());
        assert_eq!(c.play_opponent_turn(), None);
        c.on_reset_requested();
        assert_eq!(c.score(), expected);
    }

    #[test]
    fn test_hard_can_be_forked() {
        let mut c = controller(Difficulty::Hard);
        c.on_cell_activated(0);
        assert_eq!(c.play_opponent_turn(), Some(4));
        c.on_cell_activated(8);
        // First empty corner with a zero sample
        assert_eq!(c.play_opponent_turn(), Some(2));
        c.on_cell_activated(6);
        // Two threats (3 and 7); Hard blocks the lower one
        assert_eq!(c.play_opponent_turn(), Some(3));
        c.on_cell_activated(7);

        assert_eq!(c.session().status(), GameStatus::PlayerWon);
        assert_eq!(c.session().winning_line(), Some([6, 7, 8]));
        assert_eq!(c.score().player_wins, 1);
        assert!(!c.awaiting_opponent());
    }
}
