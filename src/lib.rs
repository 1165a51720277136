//! Ultimate Snake - a terminal Snake game
//!
//! This library provides:
//! - Core game logic with powerups, obstacles and levels (game module)
//! - Persisted player preferences (settings module)
//! - The local high-score table (highscores module)
//! - Menu and gameplay screens driven by key events (screens module)
//! - TUI rendering (render module)
//! - The async event loop tying it all together (app module)

pub mod app;
pub mod game;
pub mod highscores;
pub mod input;
pub mod metrics;
pub mod render;
pub mod screens;
pub mod settings;
