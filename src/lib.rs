//! Snake on a wrapping grid
//!
//! This library provides:
//! - Core game logic and the tick scheduler (game module)
//! - Keyboard mapping (input module)
//! - TUI rendering (render module)
//! - Session statistics (metrics module)
//! - Execution modes: interactive terminal play and a headless run (modes module)

pub mod game;
pub mod input;
pub mod metrics;
pub mod modes;
pub mod render;
