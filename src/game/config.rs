use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::settings::Settings;

/// Gameplay constants for a single round
///
/// Built from the persisted [`Settings`] whenever a new game starts, so
/// toggling powerups or difficulty takes effect on the next round.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameConfig {
    /// Width of the game grid in cells
    pub grid_width: usize,
    /// Height of the game grid in cells
    pub grid_height: usize,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Head cell at the start of a round (clamped into the grid)
    pub start_x: i32,
    pub start_y: i32,

    /// Tick interval at level 1
    pub initial_tick: Duration,
    /// How much each level shaves off the tick interval
    pub speed_step: Duration,
    /// Fastest the game is allowed to run
    pub min_tick: Duration,

    pub food_points: u32,
    pub powerup_points: u32,
    /// A new level starts every this many points
    pub points_per_level: u32,

    pub powerups_enabled: bool,
    pub obstacles_enabled: bool,

    /// Powerups vanish after this long on the board
    pub powerup_lifetime: Duration,
    /// Obstacles vanish after this long on the board
    pub obstacle_lifetime: Duration,
    /// Chance per tick, in thousandths, of a powerup appearing on an empty board
    pub powerup_spawn_per_mille: u32,
    /// Chance per tick, in percent, of a new obstacle appearing
    pub obstacle_spawn_percent: u32,
    /// Obstacles only show up once the score reaches this
    pub obstacle_min_score: u32,
    pub max_obstacles: usize,
    /// Random cells tried before giving up on placing a timed item
    pub spawn_attempts: usize,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_width: 40,
            grid_height: 30,
            initial_snake_length: 3,
            start_x: 10,
            start_y: 10,
            initial_tick: Duration::from_millis(150),
            speed_step: Duration::from_millis(10),
            min_tick: Duration::from_millis(50),
            food_points: 10,
            powerup_points: 25,
            points_per_level: 100,
            powerups_enabled: true,
            obstacles_enabled: false,
            powerup_lifetime: Duration::from_secs(8),
            obstacle_lifetime: Duration::from_secs(12),
            powerup_spawn_per_mille: 5,
            obstacle_spawn_percent: 2,
            obstacle_min_score: 60,
            max_obstacles: 2,
            spawn_attempts: 50,
        }
    }
}

impl GameConfig {
    /// Create a new configuration with custom grid size
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            grid_width: width,
            grid_height: height,
            ..Default::default()
        }
    }

    /// Apply the player's saved preferences on top of this configuration
    pub fn with_settings(self, settings: &Settings) -> Self {
        Self {
            initial_tick: settings.difficulty.tick_interval(),
            powerups_enabled: settings.powerups_enabled,
            obstacles_enabled: settings.obstacles_enabled,
            ..self
        }
    }

    /// Create a small grid for testing
    pub fn small() -> Self {
        Self {
            start_x: 5,
            start_y: 5,
            ..Self::new(10, 10)
        }
    }

    /// Total number of cells on the board
    pub fn cell_count(&self) -> usize {
        self.grid_width * self.grid_height
    }
}
