//! Core game logic module for Snake
//!
//! This module contains the game rules and the tick scheduler without any I/O
//! or rendering dependencies. Front ends read snapshots and subscribe to them.

pub mod config;
pub mod direction;
pub mod engine;
pub mod scheduler;
pub mod state;

// Re-export commonly used types
pub use config::GameConfig;
pub use direction::Direction;
pub use engine::{GameEngine, Listener, SubscriptionId};
pub use scheduler::GameDriver;
pub use state::{FieldSize, GameState, GameStatus, Position, Snake};
