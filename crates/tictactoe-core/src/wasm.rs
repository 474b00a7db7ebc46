//! WebAssembly bindings for the game engine.
//!
//! This module exposes a single game to JavaScript through wasm-bindgen.
//! The page calls `opponentMove` from a `setTimeout` after a human move so
//! the human's mark is drawn before the reply lands.

use wasm_bindgen::prelude::*;

use crate::bot::{Difficulty, MoveSelector};
use crate::controller::GameController;

/// Initialize panic hook for better error messages in browser console
#[wasm_bindgen(start)]
pub fn init() {
    console_error_panic_hook::set_once();
}

/// WASM-exposed game wrapper
#[wasm_bindgen]
pub struct WasmGame {
    controller: GameController<()>,
}

#[wasm_bindgen]
impl WasmGame {
    /// Create a game at the given difficulty ("easy", "medium" or "hard")
    #[wasm_bindgen(constructor)]
    pub fn new(difficulty: &str) -> Result<WasmGame, JsValue> {
        let difficulty = parse_difficulty(difficulty)?;
        Ok(WasmGame {
            controller: GameController::new((), MoveSelector::new(), difficulty),
        })
    }

    /// Human clicked a cell. Returns whether the move was applied.
    #[wasm_bindgen(js_name = cellActivated)]
    pub fn cell_activated(&mut self, index: usize) -> bool {
        !self.controller.on_cell_activated(index).is_empty()
    }

    /// Whether the page should schedule `opponentMove`
    #[wasm_bindgen(js_name = awaitingOpponent)]
    pub fn awaiting_opponent(&self) -> bool {
        self.controller.awaiting_opponent()
    }

    /// Play the opponent's move, returning the chosen cell
    #[wasm_bindgen(js_name = opponentMove)]
    pub fn opponent_move(&mut self) -> Option<usize> {
        self.controller.play_opponent_turn()
    }

    /// Change difficulty and start a new game
    #[wasm_bindgen(js_name = setDifficulty)]
    pub fn set_difficulty(&mut self, difficulty: &str) -> Result<(), JsValue> {
        let difficulty = parse_difficulty(difficulty)?;
        self.controller.on_difficulty_changed(difficulty);
        Ok(())
    }

    /// Start a new game at the same difficulty
    pub fn reset(&mut self) {
        self.controller.on_reset_requested();
    }

    /// Game counter, bumped on every reset or difficulty change
    pub fn generation(&self) -> f64 {
        self.controller.generation() as f64
    }

    /// Get the current session as JSON
    #[wasm_bindgen(js_name = getState)]
    pub fn get_state(&self) -> String {
        serde_json::to_string(self.controller.session()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Get the win tally as JSON
    #[wasm_bindgen(js_name = getScore)]
    pub fn get_score(&self) -> String {
        serde_json::to_string(&self.controller.score()).unwrap_or_else(|_| "{}".to_string())
    }

    /// Board as three lines of text
    #[wasm_bindgen(js_name = getBoard)]
    pub fn get_board(&self) -> String {
        self.controller.session().board().to_string()
    }
}

fn parse_difficulty(s: &str) -> Result<Difficulty, JsValue> {
    s.parse::<Difficulty>()
        .map_err(|e| JsValue::from_str(&e.to_string()))
}
