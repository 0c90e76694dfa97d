use std::time::{Duration, Instant};

/// Session statistics shown alongside the field
pub struct GameMetrics {
    pub round_start: Instant,
    pub elapsed_time: Duration,
    pub best_score: u32,
    pub longest_snake: usize,
    pub games_played: u32,
}

impl GameMetrics {
    pub fn new() -> Self {
        Self {
            round_start: Instant::now(),
            elapsed_time: Duration::ZERO,
            best_score: 0,
            longest_snake: 0,
            games_played: 0,
        }
    }

    /// Refresh the round clock; frozen while the game is paused or over
    pub fn update(&mut self, running: bool) {
        if running {
            self.elapsed_time = self.round_start.elapsed();
        } else if let Some(start) = Instant::now().checked_sub(self.elapsed_time) {
            self.round_start = start;
        }
    }

    pub fn on_game_start(&mut self) {
        self.round_start = Instant::now();
        self.elapsed_time = Duration::ZERO;
    }

    pub fn on_game_over(&mut self, final_score: u32, final_length: usize) {
        self.games_played += 1;
        self.best_score = self.best_score.max(final_score);
        self.longest_snake = self.longest_snake.max(final_length);
    }

    pub fn format_time(&self) -> String {
        let total_secs = self.elapsed_time.as_secs();
        format!("{:02}:{:02}", total_secs / 60, total_secs % 60)
    }
}

impl Default for GameMetrics {
    fn default() -> Self {
        Self::new()
    }
}
