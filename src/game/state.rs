use std::time::{Duration, Instant};

use super::action::Direction;

/// A cell on the game grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Move position by delta
    pub fn moved_by(&self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// One step in `direction`, wrapping around the board edges
    pub fn stepped_wrapping(&self, direction: Direction, width: usize, height: usize) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy).wrapped(width, height)
    }

    /// Bring a position that fell off one edge back in on the opposite one
    pub fn wrapped(&self, width: usize, height: usize) -> Self {
        Self {
            x: self.x.rem_euclid(width as i32),
            y: self.y.rem_euclid(height as i32),
        }
    }
}

/// The snake in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Current direction of movement
    pub direction: Direction,
}

impl Snake {
    /// Lay out a snake of `length` cells with its tail trailing behind `head`
    pub fn new(head: Position, direction: Direction, length: usize) -> Self {
        let (dx, dy) = direction.opposite().delta();
        let body = (0..length.max(1) as i32)
            .map(|i| head.moved_by(dx * i, dy * i))
            .collect();

        Self { body, direction }
    }

    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Whether any segment, head or tail included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    /// Push `new_head` on the front; the tail stays put only when growing
    pub fn advance_to(&mut self, new_head: Position, grow: bool) {
        self.body.insert(0, new_head);
        if !grow {
            self.body.pop();
        }
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// A powerup or obstacle that disappears after a while
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimedItem {
    pub position: Position,
    pub spawned_at: Instant,
}

impl TimedItem {
    pub fn new(position: Position, spawned_at: Instant) -> Self {
        Self {
            position,
            spawned_at,
        }
    }

    /// True once the item has been on the board for longer than `lifetime`
    pub fn is_expired(&self, now: Instant, lifetime: Duration) -> bool {
        now.saturating_duration_since(self.spawned_at) > lifetime
    }
}

/// What ended the round
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionType {
    /// Snake ran into its own body
    SelfCollision,
    /// Snake ran into an obstacle
    Obstacle,
}

/// Complete state of one round
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub snake: Snake,
    /// `None` only when the snake fills the whole board
    pub food: Option<Position>,
    pub powerups: Vec<TimedItem>,
    pub obstacles: Vec<TimedItem>,
    pub grid_width: usize,
    pub grid_height: usize,
    pub score: u32,
    pub level: u32,
    /// Current delay between ticks; shrinks as levels go up
    pub tick_interval: Duration,
    pub steps: u32,
    pub is_alive: bool,
    pub paused: bool,
    pub collision: Option<CollisionType>,
}

impl GameState {
    pub fn new(
        snake: Snake,
        food: Option<Position>,
        grid_width: usize,
        grid_height: usize,
        tick_interval: Duration,
    ) -> Self {
        Self {
            snake,
            food,
            powerups: Vec::new(),
            obstacles: Vec::new(),
            grid_width,
            grid_height,
            score: 0,
            level: 1,
            tick_interval,
            steps: 0,
            is_alive: true,
            paused: false,
            collision: None,
        }
    }

    /// Running and not paused: the only state in which ticks change anything
    pub fn is_active(&self) -> bool {
        self.is_alive && !self.paused
    }

    /// Pausing only applies to a round that is still running
    pub fn toggle_pause(&mut self) {
        if self.is_alive {
            self.paused = !self.paused;
        }
    }

    pub fn has_powerup_at(&self, pos: Position) -> bool {
        self.powerups.iter().any(|item| item.position == pos)
    }

    pub fn has_obstacle_at(&self, pos: Position) -> bool {
        self.obstacles.iter().any(|item| item.position == pos)
    }

    /// Whether anything at all sits on `pos`
    pub fn is_occupied(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
            || self.food == Some(pos)
            || self.has_powerup_at(pos)
            || self.has_obstacle_at(pos)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrapping_at_every_edge() {
        assert_eq!(
            Position::new(0, 5).stepped_wrapping(Direction::Left, 40, 30),
            Position::new(39, 5)
        );
        assert_eq!(
            Position::new(39, 5).stepped_wrapping(Direction::Right, 40, 30),
            Position::new(0, 5)
        );
        assert_eq!(
            Position::new(7, 0).stepped_wrapping(Direction::Up, 40, 30),
            Position::new(7, 29)
        );
        assert_eq!(
            Position::new(7, 29).stepped_wrapping(Direction::Down, 40, 30),
            Position::new(7, 0)
        );
        assert_eq!(
            Position::new(7, 7).stepped_wrapping(Direction::Down, 40, 30),
            Position::new(7, 8)
        );
    }

    #[test]
    fn test_snake_creation() {
        let snake = Snake::new(Position::new(10, 10), Direction::Right, 3);
        assert_eq!(
            snake.body,
            vec![
                Position::new(10, 10),
                Position::new(9, 10),
                Position::new(8, 10)
            ]
        );
    }

    #[test]
    fn test_snake_advance() {
        let mut snake = Snake::new(Position::new(5, 5), Direction::Right, 3);

        snake.advance_to(Position::new(6, 5), false);
        assert_eq!(snake.len(), 3);
        assert_eq!(snake.head(), Position::new(6, 5));
        assert!(!snake.occupies(Position::new(3, 5)));

        snake.advance_to(Position::new(7, 5), true);
        assert_eq!(snake.len(), 4);
        assert!(snake.occupies(Position::new(4, 5)));
    }

    #[test]
    fn test_timed_item_expiry() {
        let start = Instant::now();
        let item = TimedItem::new(Position::new(1, 1), start);
        let lifetime = Duration::from_secs(8);

        assert!(!item.is_expired(start + Duration::from_secs(8), lifetime));
        assert!(item.is_expired(start + Duration::from_millis(8001), lifetime));
    }

    #[test]
    fn test_occupancy_covers_all_items() {
        let now = Instant::now();
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            Some(Position::new(1, 1)),
            10,
            10,
            Duration::from_millis(150),
        );
        state.powerups.push(TimedItem::new(Position::new(2, 2), now));
        state.obstacles.push(TimedItem::new(Position::new(3, 3), now));

        for occupied in [(4, 5), (1, 1), (2, 2), (3, 3)] {
            assert!(state.is_occupied(Position::new(occupied.0, occupied.1)));
        }
        assert!(!state.is_occupied(Position::new(8, 8)));
        assert!(state.is_active());
    }

    #[test]
    fn test_pause_only_while_running() {
        let mut state = GameState::new(
            Snake::new(Position::new(5, 5), Direction::Right, 3),
            None,
            10,
            10,
            Duration::from_millis(150),
        );

        state.toggle_pause();
        assert!(state.paused);
        assert!(!state.is_active());
        state.toggle_pause();
        assert!(state.is_active());

        state.is_alive = false;
        state.toggle_pause();
        assert!(!state.paused);
    }
}
