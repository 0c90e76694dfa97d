//! Terminal-free game run
//!
//! Drives the scheduler in real time, steers greedily towards the edible and
//! logs every snapshot. Useful for watching the engine from logs alone.

use anyhow::{Result, bail};
use std::sync::Arc;
use tokio::sync::mpsc::unbounded_channel;
use tracing::info;

use crate::game::{Direction, GameConfig, GameDriver, GameState, Position};

pub struct HeadlessMode {
    driver: GameDriver,
    max_ticks: u32,
}

impl HeadlessMode {
    pub fn new(config: GameConfig, max_ticks: u32) -> Self {
        Self {
            driver: GameDriver::new(config),
            max_ticks,
        }
    }

    /// Play until the game is over or `max_ticks` moves were made. Returns the final snapshot.
    pub async fn run(&mut self) -> Result<Arc<GameState>> {
        let (tx, mut snapshots) = unbounded_channel();
        let subscription = self.driver.subscribe(move |state| {
            let _ = tx.send(Arc::clone(state));
        });

        let initial = self.driver.state();
        info!(
            "Headless run on a {}x{} field, tick every {:?}, limit {} ticks",
            initial.field.width,
            initial.field.height,
            self.driver.period(),
            self.max_ticks
        );

        let mut last = initial;
        if self.max_ticks > 0 && !self.driver.start() {
            bail!("Scheduler refused to start");
        }

        while last.ticks < self.max_ticks && !last.is_game_over() {
            let Some(snapshot) = snapshots.recv().await else {
                break;
            };

            if snapshot.ticks != last.ticks {
                log_tick(&snapshot);
                if let Some(direction) = steer(&snapshot) {
                    self.driver.change_direction(direction);
                }
            }
            last = snapshot;
        }

        self.driver.stop();
        self.driver.unsubscribe(subscription);

        info!(
            "Headless run finished: {} ticks, score {}, length {}, game over: {}",
            last.ticks,
            last.score,
            last.snake.len(),
            last.is_game_over()
        );
        Ok(last)
    }
}

fn log_tick(state: &GameState) {
    let head = state.head();
    match state.edible {
        Some(edible) => info!(
            "tick {}: head ({}, {}) heading {:?}, length {}, edible ({}, {})",
            state.ticks,
            head.x,
            head.y,
            state.snake.current_direction,
            state.snake.len(),
            edible.x,
            edible.y
        ),
        None => info!(
            "tick {}: head ({}, {}) heading {:?}, length {}, no edible",
            state.ticks,
            head.x,
            head.y,
            state.snake.current_direction,
            state.snake.len()
        ),
    }
}

/// Signed shortest offset from `from` to `to` along an axis of `len` cells
fn wrapped_offset(from: i32, to: i32, len: i32) -> i32 {
    let forward = (to - from).rem_euclid(len);
    if forward * 2 > len {
        forward - len
    } else {
        forward
    }
}

/// Pick a turn that brings the head closer to the edible without biting the body.
///
/// Returns `None` when the current heading is as good as any option.
fn steer(state: &GameState) -> Option<Direction> {
    let head = state.head();
    let current = state.snake.current_direction;
    let target = state.edible.unwrap_or(head);

    let dx = wrapped_offset(head.x, target.x, state.field.width as i32);
    let dy = wrapped_offset(head.y, target.y, state.field.height as i32);

    let mut preferred = Vec::with_capacity(4);
    if dx > 0 {
        preferred.push(Direction::Right);
    } else if dx < 0 {
        preferred.push(Direction::Left);
    }
    if dy > 0 {
        preferred.push(Direction::Up);
    } else if dy < 0 {
        preferred.push(Direction::Down);
    }
    preferred.push(current);
    preferred.extend(Direction::ALL);

    // The tail moves out of the way unless the snake is about to grow
    let blocked = |pos: Position| {
        let body = &state.snake.body;
        let len = if state.eaten { body.len() } else { body.len() - 1 };
        body[..len].contains(&pos)
    };

    let choice = preferred
        .into_iter()
        .filter(|d| !d.is_opposite(current))
        .find(|&d| !blocked(state.field.step(head, d)))?;

    (choice != current).then_some(choice)
}
