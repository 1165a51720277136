//! Core game logic module for Snake
//!
//! Pure tick-by-tick rules with no I/O or rendering dependencies: movement
//! with edge wrapping, food and powerup scoring, timed obstacles and level
//! progression.

pub mod action;
pub mod config;
pub mod engine;
pub mod state;

// Re-export commonly used types
pub use action::{Action, Direction};
pub use config::GameConfig;
pub use engine::{GameEngine, StepInfo, StepResult};
pub use state::{CollisionType, GameState, Position, Snake, TimedItem};
