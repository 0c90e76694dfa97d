//! Tick scheduling for the game engine
//!
//! [`GameDriver`] owns the engine behind a mutex so that timer ticks, key
//! input and explicit commands never interleave, and holds the handle of the
//! repeating timer task so it can be cancelled.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info};

use super::{
    config::GameConfig,
    direction::Direction,
    engine::{GameEngine, SubscriptionId},
    state::GameState,
};

pub struct GameDriver {
    engine: Arc<Mutex<GameEngine>>,
    period: Duration,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl GameDriver {
    /// Build the engine and a stopped scheduler ticking at the configured period
    pub fn new(config: GameConfig) -> Self {
        let period = config.tick_interval();
        Self::from_engine(GameEngine::new(config), period)
    }

    pub fn from_engine(engine: GameEngine, period: Duration) -> Self {
        Self {
            engine: Arc::new(Mutex::new(engine)),
            period,
            ticker: Mutex::new(None),
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Arm the repeating timer. Must be called from within a tokio runtime.
    ///
    /// Returns false if the timer is already armed or the game is over.
    pub fn start(&self) -> bool {
        let mut ticker = lock(&self.ticker);
        if ticker.as_ref().is_some_and(|handle| !handle.is_finished()) {
            return false;
        }

        {
            let mut engine = lock(&self.engine);
            if engine.state().is_game_over() {
                return false;
            }
            engine.set_running(true);
        }

        let engine = Arc::clone(&self.engine);
        let period = self.period;
        *ticker = Some(tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                timer.tick().await;
                if !tick(&engine) {
                    break;
                }
            }
        }));

        info!("Scheduler started, period {:?}", period);
        true
    }

    /// Cancel the timer. Returns false if it was not armed.
    pub fn stop(&self) -> bool {
        let handle = lock(&self.ticker).take();
        let was_armed = match handle {
            Some(handle) => {
                let armed = !handle.is_finished();
                handle.abort();
                armed
            }
            None => false,
        };

        lock(&self.engine).set_running(false);
        if was_armed {
            info!("Scheduler stopped");
        }
        was_armed
    }

    pub fn is_running(&self) -> bool {
        lock(&self.ticker)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    pub fn state(&self) -> Arc<GameState> {
        lock(&self.engine).state()
    }

    /// Register a listener for every published snapshot.
    ///
    /// Listeners run while the engine is locked and must not call back into
    /// the driver.
    pub fn subscribe<F>(&self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Arc<GameState>) + Send + 'static,
    {
        lock(&self.engine).subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.engine).unsubscribe(id)
    }

    pub fn change_direction(&self, direction: Direction) -> bool {
        lock(&self.engine).change_direction(direction)
    }

    pub fn eat(&self) {
        lock(&self.engine).eat();
    }

    /// Advance one tick by hand, outside the timer
    pub fn step(&self) -> bool {
        lock(&self.engine).move_snake()
    }

    pub fn reset(&self) {
        lock(&self.engine).reset();
    }
}

impl Drop for GameDriver {
    fn drop(&mut self) {
        if let Some(handle) = lock(&self.ticker).take() {
            handle.abort();
        }
    }
}

/// One timer tick. Returns false once the game is over and the timer should end.
fn tick(engine: &Mutex<GameEngine>) -> bool {
    let mut engine = lock(engine);
    engine.move_snake();

    if engine.state().is_game_over() {
        engine.set_running(false);
        debug!("Scheduler halted by game over");
        return false;
    }
    true
}

// Snapshots are swapped whole; a poisoned lock still guards a consistent engine.
fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
