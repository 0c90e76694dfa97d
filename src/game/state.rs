use serde::{Deserialize, Serialize};

use super::config::GameConfig;
use super::direction::Direction;

/// A cell on the game field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
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

    /// Move position one cell in a direction, without wrapping
    pub fn moved_in_direction(&self, direction: Direction) -> Self {
        let (dx, dy) = direction.delta();
        self.moved_by(dx, dy)
    }
}

/// Dimensions of the toroidal playing field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSize {
    pub width: usize,
    pub height: usize,
}

impl FieldSize {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height }
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.x < self.width as i32 && pos.y >= 0 && pos.y < self.height as i32
    }

    /// Fold a position back onto the field; leaving one edge re-enters at the opposite one
    pub fn wrap(&self, pos: Position) -> Position {
        Position::new(
            pos.x.rem_euclid(self.width as i32),
            pos.y.rem_euclid(self.height as i32),
        )
    }

    /// Neighbouring cell in `direction`, wrapping at the edges
    pub fn step(&self, pos: Position, direction: Direction) -> Position {
        self.wrap(pos.moved_in_direction(direction))
    }

    /// All cells, row by row from `y = 0`
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.height as i32)
            .flat_map(move |y| (0..self.width as i32).map(move |x| Position::new(x, y)))
    }
}

/// The snake: its body plus the direction in effect and the one requested for the next tick
#[derive(Debug, Clone, PartialEq)]
pub struct Snake {
    /// Body segments, with head at index 0
    pub body: Vec<Position>,
    /// Direction applied on the last move
    pub current_direction: Direction,
    /// Buffered direction, applied on the next move
    pub next_direction: Direction,
}

impl Snake {
    /// Lay out a straight snake of `length` cells whose head points in `direction`.
    ///
    /// Segments trail behind the head and wrap around the field edges.
    pub fn straight(head: Position, direction: Direction, length: usize, field: FieldSize) -> Self {
        let length = length.max(1);
        let mut body = Vec::with_capacity(length);
        body.push(head);

        let back = direction.opposite();
        for i in 1..length {
            let prev = body[i - 1];
            body.push(field.step(prev, back));
        }

        Self {
            body,
            current_direction: direction,
            next_direction: direction,
        }
    }

    /// Get the head position
    pub fn head(&self) -> Position {
        self.body[0]
    }

    /// Get the tail position (last segment)
    pub fn tail(&self) -> Position {
        self.body[self.body.len() - 1]
    }

    /// Get body segments (excluding head)
    pub fn body_segments(&self) -> &[Position] {
        &self.body[1..]
    }

    /// Check if position collides with snake body (excluding head)
    pub fn collides_with_body(&self, pos: Position) -> bool {
        self.body_segments().contains(&pos)
    }

    /// Check if any segment, head included, sits on `pos`
    pub fn occupies(&self, pos: Position) -> bool {
        self.body.contains(&pos)
    }

    pub fn len(&self) -> usize {
        self.body.len()
    }

    /// Always false for a snapshot produced by the engine
    pub fn is_empty(&self) -> bool {
        self.body.is_empty()
    }
}

/// Whether the game can still advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameStatus {
    Running,
    /// The head ran into the body. Terminal until reset.
    GameOver,
}

/// Complete game snapshot.
///
/// The engine never mutates a published snapshot; every change produces a new
/// one, so holders of an `Arc<GameState>` can detect change with `Arc::ptr_eq`.
#[derive(Debug, Clone, PartialEq)]
pub struct GameState {
    pub field: FieldSize,
    pub snake: Snake,
    /// `None` only when no free cell was left to place it on
    pub edible: Option<Position>,
    /// Set by eating; the next move grows the body instead of shifting it
    pub eaten: bool,
    /// Whether the tick scheduler is armed
    pub running: bool,
    pub status: GameStatus,
    /// Edibles eaten so far
    pub score: u32,
    /// Moves applied so far
    pub ticks: u32,
}

impl GameState {
    /// The fixed starting layout: a four-cell snake heading up from (5,5), edible at (5,7)
    pub fn initial(field: FieldSize) -> Self {
        let snake = Snake::straight(Position::new(5, 5), Direction::Up, 4, field);
        Self::new(field, snake, Some(Position::new(5, 7)))
    }

    /// Starting layout described by a configuration
    pub fn from_config(config: &GameConfig) -> Self {
        let field = config.field_size();
        let snake = Snake::straight(
            config.start_head,
            config.start_direction,
            config.initial_snake_length,
            field,
        );
        Self::new(field, snake, Some(config.start_edible))
    }

    pub fn new(field: FieldSize, snake: Snake, edible: Option<Position>) -> Self {
        Self {
            field,
            snake,
            edible,
            eaten: false,
            running: false,
            status: GameStatus::Running,
            score: 0,
            ticks: 0,
        }
    }

    pub fn head(&self) -> Position {
        self.snake.head()
    }

    pub fn is_game_over(&self) -> bool {
        self.status == GameStatus::GameOver
    }

    /// Check if a position is within the field bounds
    pub fn is_in_field(&self, pos: Position) -> bool {
        self.field.contains(pos)
    }

    /// Check if a position is occupied by the snake
    pub fn is_occupied_by_snake(&self, pos: Position) -> bool {
        self.snake.occupies(pos)
    }

    /// Cells holding neither the snake nor the edible
    pub fn free_cells(&self) -> Vec<Position> {
        self.field
            .cells()
            .filter(|&pos| !self.snake.occupies(pos) && self.edible != Some(pos))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_position_movement() {
        let pos = Position::new(5, 5);
        assert_eq!(pos.moved_by(1, 0), Position::new(6, 5));
        assert_eq!(pos.moved_by(-1, 0), Position::new(4, 5));
        assert_eq!(pos.moved_in_direction(Direction::Up), Position::new(5, 6));
        assert_eq!(pos.moved_in_direction(Direction::Down), Position::new(5, 4));
    }

    #[test]
    fn test_field_wrapping() {
        let field = FieldSize::new(10, 10);
        assert_eq!(field.step(Position::new(3, 9), Direction::Up), Position::new(3, 0));
        assert_eq!(field.step(Position::new(3, 0), Direction::Down), Position::new(3, 9));
        assert_eq!(field.step(Position::new(0, 4), Direction::Left), Position::new(9, 4));
        assert_eq!(field.step(Position::new(9, 4), Direction::Right), Position::new(0, 4));
        assert_eq!(field.step(Position::new(4, 4), Direction::Right), Position::new(5, 4));
    }

    #[test]
    fn test_field_cells() {
        let field = FieldSize::new(3, 2);
        let cells: Vec<_> = field.cells().collect();
        assert_eq!(cells.len(), field.cell_count());
        assert_eq!(cells[0], Position::new(0, 0));
        assert_eq!(cells[5], Position::new(2, 1));
        assert!(cells.iter().all(|&c| field.contains(c)));
    }

    #[test]
    fn test_initial_state() {
        let state = GameState::initial(FieldSize::new(10, 10));
        assert_eq!(
            state.snake.body,
            vec![
                Position::new(5, 5),
                Position::new(5, 4),
                Position::new(5, 3),
                Position::new(5, 2),
            ]
        );
        assert_eq!(state.snake.current_direction, Direction::Up);
        assert_eq!(state.snake.next_direction, Direction::Up);
        assert_eq!(state.edible, Some(Position::new(5, 7)));
        assert!(!state.eaten);
        assert!(!state.running);
        assert_eq!(state.status, GameStatus::Running);
    }

    #[test]
    fn test_default_config_matches_initial() {
        let config = GameConfig::default();
        assert_eq!(
            GameState::from_config(&config),
            GameState::initial(config.field_size())
        );
    }

    #[test]
    fn test_straight_snake_wraps() {
        let field = FieldSize::new(5, 5);
        let snake = Snake::straight(Position::new(0, 2), Direction::Right, 3, field);
        assert_eq!(
            snake.body,
            vec![Position::new(0, 2), Position::new(4, 2), Position::new(3, 2)]
        );
        assert_eq!(snake.tail(), Position::new(3, 2));
    }

    #[test]
    fn test_collision_detection() {
        let snake = Snake::straight(Position::new(5, 5), Direction::Right, 3, FieldSize::new(10, 10));
        assert!(!snake.collides_with_body(Position::new(5, 5))); // head
        assert!(snake.collides_with_body(Position::new(4, 5))); // body
        assert!(!snake.collides_with_body(Position::new(9, 9))); // empty
        assert!(snake.occupies(Position::new(5, 5)));
    }

    #[test]
    fn test_free_cells_exclude_snake_and_edible() {
        let state = GameState::initial(FieldSize::new(10, 10));
        let free = state.free_cells();
        assert_eq!(free.len(), 100 - 4 - 1);
        assert!(!free.contains(&Position::new(5, 7)));
        assert!(!free.contains(&Position::new(5, 2)));
    }

    #[test]
    fn test_bounds_checking() {
        let state = GameState::initial(FieldSize::new(10, 10));
        assert!(state.is_in_field(Position::new(0, 0)));
        assert!(state.is_in_field(Position::new(9, 9)));
        assert!(!state.is_in_field(Position::new(-1, 0)));
        assert!(!state.is_in_field(Position::new(10, 0)));
        assert!(!state.is_in_field(Position::new(0, 10)));
    }
}
