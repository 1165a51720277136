use std::time::Instant;

use log::debug;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use super::{
    action::{Action, Direction},
    config::GameConfig,
    state::{CollisionType, GameState, Position, Snake, TimedItem},
};

/// What happened during a tick
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StepInfo {
    pub ate_food: bool,
    pub collected_powerup: bool,
    pub leveled_up: bool,
    /// Set when this tick ended the round
    pub collision_type: Option<CollisionType>,
}

/// Result of a game step
#[derive(Debug, Clone, PartialEq)]
pub struct StepResult {
    /// Whether the round is over
    pub terminated: bool,
    pub info: StepInfo,
}

impl StepResult {
    fn idle(terminated: bool) -> Self {
        Self {
            terminated,
            info: StepInfo::default(),
        }
    }
}

/// Advances a [`GameState`] one tick at a time
pub struct GameEngine {
    config: GameConfig,
    rng: StdRng,
}

impl GameEngine {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            rng: StdRng::from_entropy(),
        }
    }

    /// Deterministic engine for tests and replays
    pub fn with_seed(config: GameConfig, seed: u64) -> Self {
        Self {
            config,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Swap in a new configuration; takes effect from the next [`reset`](Self::reset)
    pub fn set_config(&mut self, config: GameConfig) {
        self.config = config;
    }

    /// Start a fresh round
    pub fn reset(&mut self) -> GameState {
        let width = self.config.grid_width;
        let height = self.config.grid_height;
        let start = Position::new(self.config.start_x, self.config.start_y).wrapped(width, height);

        let mut snake = Snake::new(start, Direction::Right, self.config.initial_snake_length);
        for segment in &mut snake.body {
            *segment = segment.wrapped(width, height);
        }

        let mut state = GameState::new(snake, None, width, height, self.config.initial_tick);
        state.food = self.spawn_food(&state);
        state
    }

    /// Execute one tick using the wall clock for item lifetimes
    pub fn step(&mut self, state: &mut GameState, action: Action) -> StepResult {
        self.step_at(state, action, Instant::now())
    }

    /// Execute one tick as if the current time were `now`
    pub fn step_at(&mut self, state: &mut GameState, action: Action, now: Instant) -> StepResult {
        if !state.is_active() {
            return StepResult::idle(!state.is_alive);
        }

        if let Action::Move(new_direction) = action {
            if !state.snake.direction.is_opposite(new_direction) {
                state.snake.direction = new_direction;
            }
        }

        let new_head = state.snake.head().stepped_wrapping(
            state.snake.direction,
            state.grid_width,
            state.grid_height,
        );
        state.steps += 1;

        // The tail has not moved out of the way yet, so it counts too
        if state.snake.occupies(new_head) {
            return Self::end_round(state, CollisionType::SelfCollision);
        }

        let mut info = StepInfo::default();

        if state.food == Some(new_head) {
            state.snake.advance_to(new_head, true);
            state.score += self.config.food_points;
            state.food = None;
            state.food = self.spawn_food(state);
            info.ate_food = true;
            info.leveled_up = self.level_up_if_due(state);
        } else if self.config.powerups_enabled && state.has_powerup_at(new_head) {
            state.powerups.retain(|item| item.position != new_head);
            state.snake.advance_to(new_head, true);
            state.score += self.config.powerup_points;
            info.collected_powerup = true;
        } else if self.config.obstacles_enabled && state.has_obstacle_at(new_head) {
            return Self::end_round(state, CollisionType::Obstacle);
        } else {
            state.snake.advance_to(new_head, false);
        }

        self.manage_timed_items(state, now);

        StepResult {
            terminated: false,
            info,
        }
    }

    fn end_round(state: &mut GameState, collision: CollisionType) -> StepResult {
        debug!(
            "round over after {} steps: {:?}, score {}",
            state.steps, collision, state.score
        );
        state.is_alive = false;
        state.collision = Some(collision);

        StepResult {
            terminated: true,
            info: StepInfo {
                collision_type: Some(collision),
                ..StepInfo::default()
            },
        }
    }

    /// Levels are only re-evaluated when food is eaten
    fn level_up_if_due(&self, state: &mut GameState) -> bool {
        let per_level = self.config.points_per_level.max(1);
        if state.score / per_level + 1 <= state.level {
            return false;
        }

        state.level += 1;
        state.tick_interval = state
            .tick_interval
            .saturating_sub(self.config.speed_step)
            .max(self.config.min_tick);
        debug!(
            "level {} reached, tick interval now {:?}",
            state.level, state.tick_interval
        );
        true
    }

    /// Expire old powerups/obstacles and roll for new ones
    fn manage_timed_items(&mut self, state: &mut GameState, now: Instant) {
        if self.config.powerups_enabled {
            let lifetime = self.config.powerup_lifetime;
            state.powerups.retain(|item| !item.is_expired(now, lifetime));

            if state.powerups.is_empty()
                && self.rng.gen_range(0..1000) < self.config.powerup_spawn_per_mille
            {
                if let Some(pos) = self.find_free_cell(state) {
                    debug!("powerup spawned at ({}, {})", pos.x, pos.y);
                    state.powerups.push(TimedItem::new(pos, now));
                }
            }
        }

        if self.config.obstacles_enabled {
            let lifetime = self.config.obstacle_lifetime;
            state.obstacles.retain(|item| !item.is_expired(now, lifetime));

            if state.score >= self.config.obstacle_min_score
                && state.obstacles.len() < self.config.max_obstacles
                && self.rng.gen_range(0..100) < self.config.obstacle_spawn_percent
            {
                if let Some(pos) = self.find_free_cell(state) {
                    debug!("obstacle spawned at ({}, {})", pos.x, pos.y);
                    state.obstacles.push(TimedItem::new(pos, now));
                }
            }
        }
    }

    /// A bounded number of random picks; `None` if every pick was taken
    fn find_free_cell(&mut self, state: &GameState) -> Option<Position> {
        (0..self.config.spawn_attempts)
            .map(|_| self.random_cell())
            .find(|pos| !state.is_occupied(*pos))
    }

    /// Place food on an empty cell, or `None` when the board is full
    fn spawn_food(&mut self, state: &GameState) -> Option<Position> {
        for _ in 0..self.config.cell_count() {
            let pos = self.random_cell();
            if !state.is_occupied(pos) {
                return Some(pos);
            }
        }

        // Crowded board: pick uniformly among whatever is left
        let free: Vec<Position> = (0..state.grid_height as i32)
            .flat_map(|y| (0..state.grid_width as i32).map(move |x| Position::new(x, y)))
            .filter(|pos| !state.is_occupied(*pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    fn random_cell(&mut self) -> Position {
        let x = self.rng.gen_range(0..self.config.grid_width) as i32;
        let y = self.rng.gen_range(0..self.config.grid_height) as i32;
        Position::new(x, y)
    }
}
