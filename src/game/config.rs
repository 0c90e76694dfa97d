use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use super::direction::Direction;
use super::state::{FieldSize, Position, Snake};

/// Configuration for the game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Width of the game field
    pub grid_width: usize,
    /// Height of the game field
    pub grid_height: usize,
    /// Delay between two moves, in milliseconds
    pub tick_interval_ms: u64,
    /// Cell holding the snake's head at start
    pub start_head: Position,
    /// Initial length of the snake
    pub initial_snake_length: usize,
    /// Direction the snake heads in at start
    pub start_direction: Direction,
    /// Cell holding the first edible
    pub start_edible: Position,
    /// Seed for edible placement; entropy when absent
    pub rng_seed: Option<u64>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::new(10, 10)
    }
}

impl GameConfig {
    /// Create a configuration for a `width` x `height` field.
    ///
    /// The snake starts in the middle heading up, the edible two cells ahead of
    /// it. On a 10x10 field this is the classic (5,5) / (5,7) opening.
    pub fn new(width: usize, height: usize) -> Self {
        let mut config = Self {
            grid_width: width,
            grid_height: height,
            tick_interval_ms: 500,
            start_head: Position::new(0, 0),
            initial_snake_length: 4,
            start_direction: Direction::Up,
            start_edible: Position::new(0, 0),
            rng_seed: None,
        };
        config.center_layout();
        config
    }

    /// Create a small field for testing
    pub fn small() -> Self {
        Self::new(6, 6)
    }

    /// Resize the field and re-center the starting layout on it
    pub fn with_field(mut self, width: usize, height: usize) -> Self {
        self.grid_width = width;
        self.grid_height = height;
        self.center_layout();
        self
    }

    fn center_layout(&mut self) {
        let head = Position::new((self.grid_width / 2) as i32, (self.grid_height / 2) as i32);
        let ahead = Position::new(head.x, head.y + 2);

        self.start_direction = Direction::Up;
        self.start_head = head;
        // Degenerate fields are left for validate() to reject
        self.start_edible = if self.grid_width == 0 || self.grid_height == 0 {
            ahead
        } else {
            self.field_size().wrap(ahead)
        };
        self.initial_snake_length = (self.grid_height / 2).clamp(1, 4);
    }

    pub fn field_size(&self) -> FieldSize {
        FieldSize::new(self.grid_width, self.grid_height)
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    /// Load a configuration from a JSON file; missing keys take their default
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Validate the configuration
    ///
    /// Returns an error message if the field cannot hold the starting layout.
    pub fn validate(&self) -> Result<(), String> {
        if self.grid_width == 0 || self.grid_height == 0 {
            return Err(format!(
                "field must be at least 1x1, got {}x{}",
                self.grid_width, self.grid_height
            ));
        }

        if self.grid_width > i32::MAX as usize || self.grid_height > i32::MAX as usize {
            return Err("field dimensions must fit in i32".to_string());
        }

        if self.tick_interval_ms == 0 {
            return Err("tick_interval_ms must be at least 1".to_string());
        }

        if self.initial_snake_length == 0 {
            return Err("initial_snake_length must be at least 1".to_string());
        }

        let field = self.field_size();

        if !field.contains(self.start_head) {
            return Err(format!(
                "start_head ({}, {}) lies outside the {}x{} field",
                self.start_head.x, self.start_head.y, self.grid_width, self.grid_height
            ));
        }

        if !field.contains(self.start_edible) {
            return Err(format!(
                "start_edible ({}, {}) lies outside the {}x{} field",
                self.start_edible.x, self.start_edible.y, self.grid_width, self.grid_height
            ));
        }

        let axis_len = match self.start_direction {
            Direction::Up | Direction::Down => self.grid_height,
            Direction::Left | Direction::Right => self.grid_width,
        };
        if self.initial_snake_length > axis_len {
            return Err(format!(
                "initial_snake_length ({}) does not fit along a line of {} cells",
                self.initial_snake_length, axis_len
            ));
        }

        let snake = Snake::straight(
            self.start_head,
            self.start_direction,
            self.initial_snake_length,
            field,
        );
        if snake.occupies(self.start_edible) {
            return Err(format!(
                "start_edible ({}, {}) overlaps the starting snake",
                self.start_edible.x, self.start_edible.y
            ));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_width, 10);
        assert_eq!(config.grid_height, 10);
        assert_eq!(config.tick_interval_ms, 500);
        assert_eq!(config.start_head, Position::new(5, 5));
        assert_eq!(config.start_edible, Position::new(5, 7));
        assert_eq!(config.initial_snake_length, 4);
        assert_eq!(config.start_direction, Direction::Up);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15, 20);
        assert_eq!(config.grid_width, 15);
        assert_eq!(config.grid_height, 20);
        assert_eq!(config.start_head, Position::new(7, 10));
        assert_eq!(config.start_edible, Position::new(7, 12));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_small_fields_stay_valid() {
        assert!(GameConfig::small().validate().is_ok());
        for size in 3..10 {
            let config = GameConfig::new(size, size);
            assert!(config.validate().is_ok(), "{}x{} rejected", size, size);
        }
    }

    #[test]
    fn test_validation_zero_field() {
        let config = GameConfig::new(0, 10);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_zero_tick() {
        let config = GameConfig {
            tick_interval_ms: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_edible_on_snake() {
        let config = GameConfig {
            start_edible: Position::new(5, 3),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.contains("overlaps"));
    }

    #[test]
    fn test_validation_head_outside_field() {
        let config = GameConfig {
            start_head: Position::new(10, 5),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validation_snake_too_long() {
        let config = GameConfig {
            initial_snake_length: 11,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_with_field_recenters() {
        let config = GameConfig::default().with_field(20, 8);
        assert_eq!(config.start_head, Position::new(10, 4));
        assert_eq!(config.start_edible, Position::new(10, 6));
        assert_eq!(config.initial_snake_length, 4);
    }

    #[test]
    fn test_from_json_file_partial() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "tick_interval_ms": 250, "rng_seed": 7 }}"#).unwrap();

        let config = GameConfig::from_json_file(file.path()).unwrap();
        assert_eq!(config.tick_interval_ms, 250);
        assert_eq!(config.rng_seed, Some(7));
        assert_eq!(config.grid_width, 10);
        assert_eq!(config.start_edible, Position::new(5, 7));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = GameConfig::from_json_file(Path::new("/nonexistent/snake.json"));
        assert!(result.is_err());
    }
}
