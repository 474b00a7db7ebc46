//! Tic-tac-toe against a three-tier automated opponent.
//!
//! This crate provides the core game logic, including:
//! - The 3x3 board and its eight winning lines
//! - A session state machine with win/draw detection and turn order
//! - The opponent AI (Easy, Medium, Hard) with an injectable random source
//! - A controller that adapters drive with input events and observe
//!   through the `Presenter` trait
//!
//! # Architecture
//!
//! The engine has no rendering or timing dependency. It can be compiled to:
//! - Native Rust for the WebSocket server
//! - WebAssembly for playing directly in the browser
//!
//! # Modules
//!
//! - [`board`]: Marks, cells and winning lines
//! - [`game`]: Session state machine and score
//! - [`bot`]: Difficulty levels and move selection
//! - [`controller`]: Adapter-facing input and notification surface

pub mod actions;
pub mod board;
pub mod bot;
pub mod controller;
pub mod game;
#[cfg(feature = "wasm")]
pub mod wasm;

// Re-export commonly used types
pub use actions::GameEvent;
pub use board::{Board, Cell, Mark, CELL_COUNT, WINNING_LINES};
pub use bot::{Difficulty, MoveSelector, ParseDifficultyError, RandomSource};
pub use controller::{GameController, Presenter};
pub use game::{GameSession, GameStatus, MoveError, Score};
