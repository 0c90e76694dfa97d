use std::sync::Arc;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use tracing::{debug, info};

use super::{
    config::GameConfig,
    direction::Direction,
    state::{GameState, GameStatus, Position, Snake},
};

/// Random draws tried before falling back to scanning the free cells
const MAX_PLACEMENT_ATTEMPTS: usize = 64;

/// Callback invoked with every newly published snapshot
pub type Listener = Box<dyn FnMut(&Arc<GameState>) + Send>;

/// Handle returned by [`GameEngine::subscribe`], used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// The game engine: sole owner of the current snapshot and of the rules that replace it.
///
/// Every effective command publishes exactly one new snapshot to the
/// subscribers, in command order. Rejected commands publish nothing.
pub struct GameEngine {
    config: GameConfig,
    state: Arc<GameState>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    rng: StdRng,
}

impl GameEngine {
    /// Create a new game engine with the given configuration
    pub fn new(config: GameConfig) -> Self {
        let rng = match config.rng_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        let state = Arc::new(GameState::from_config(&config));

        Self {
            config,
            state,
            listeners: Vec::new(),
            next_subscription: 0,
            rng,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// The current snapshot
    pub fn state(&self) -> Arc<GameState> {
        Arc::clone(&self.state)
    }

    /// Register a listener for every snapshot published from now on
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&Arc<GameState>) + Send + 'static,
    {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Returns false if the subscription was already gone
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(sid, _)| *sid != id);
        self.listeners.len() != before
    }

    /// Buffer a direction change for the next move.
    ///
    /// Ignored when it repeats the buffered direction, when it would reverse
    /// the direction of the last move, or once the game is over. Returns
    /// whether the request was buffered.
    pub fn change_direction(&mut self, requested: Direction) -> bool {
        let snake = &self.state.snake;

        if self.state.is_game_over() || snake.next_direction == requested {
            return false;
        }

        if snake.current_direction.is_opposite(requested) {
            debug!(
                "Rejected reversal from {:?} to {:?}",
                snake.current_direction, requested
            );
            return false;
        }

        let mut next = (*self.state).clone();
        next.snake.next_direction = requested;
        debug!("Buffered direction {:?}", requested);
        self.publish(next);
        true
    }

    /// Advance the snake by one cell. Called once per tick.
    ///
    /// Applies the buffered direction, wraps at the field edges and grows the
    /// body if the previous snapshot was flagged as eaten. A head landing on
    /// the body ends the game; a head landing on the edible eats it. Returns
    /// false if the game was already over.
    pub fn move_snake(&mut self) -> bool {
        if self.state.is_game_over() {
            return false;
        }

        let mut next = (*self.state).clone();
        let direction = next.snake.next_direction;
        next.snake.current_direction = direction;

        let new_head = next.field.step(next.snake.head(), direction);
        if !next.eaten {
            next.snake.body.pop();
        }
        next.eaten = false;
        next.snake.body.insert(0, new_head);
        next.ticks += 1;

        if next.snake.collides_with_body(new_head) {
            info!(
                "Game over at ({}, {}) after {} ticks, score {}",
                new_head.x, new_head.y, next.ticks, next.score
            );
            next.status = GameStatus::GameOver;
            next.running = false;
        } else if next.edible == Some(new_head) {
            self.apply_eat(&mut next);
        }

        self.publish(next);
        true
    }

    /// Consume the edible: the next move grows the snake and a new edible is placed.
    pub fn eat(&mut self) {
        if self.state.is_game_over() {
            return;
        }

        let mut next = (*self.state).clone();
        self.apply_eat(&mut next);
        self.publish(next);
    }

    /// Replace the snapshot with the configured starting layout
    pub fn reset(&mut self) {
        let mut next = GameState::from_config(&self.config);
        next.running = self.state.running;
        info!("Game reset");
        self.publish(next);
    }

    /// Record whether the tick scheduler is armed. Returns false if unchanged.
    pub(crate) fn set_running(&mut self, running: bool) -> bool {
        if self.state.running == running {
            return false;
        }

        let mut next = (*self.state).clone();
        next.running = running;
        self.publish(next);
        true
    }

    fn apply_eat(&mut self, state: &mut GameState) {
        state.eaten = true;
        state.score += 1;
        state.edible = self.place_edible(state, state.edible);

        match state.edible {
            Some(pos) => debug!("Edible respawned at ({}, {})", pos.x, pos.y),
            None => info!("No free cell left for an edible"),
        }
    }

    /// Pick a uniformly random cell that holds neither the snake nor `previous`
    fn place_edible(&mut self, state: &GameState, previous: Option<Position>) -> Option<Position> {
        let field = state.field;
        let is_free =
            |snake: &Snake, pos: Position| Some(pos) != previous && !snake.occupies(pos);

        for _ in 0..MAX_PLACEMENT_ATTEMPTS {
            let pos = Position::new(
                self.rng.gen_range(0..field.width) as i32,
                self.rng.gen_range(0..field.height) as i32,
            );
            if is_free(&state.snake, pos) {
                return Some(pos);
            }
        }

        // Crowded field: choose among what is left
        let free: Vec<Position> = field
            .cells()
            .filter(|&pos| is_free(&state.snake, pos))
            .collect();
        free.choose(&mut self.rng).copied()
    }

    fn publish(&mut self, next: GameState) {
        self.state = Arc::new(next);
        let snapshot = Arc::clone(&self.state);
        for (_, listener) in &mut self.listeners {
            listener(&snapshot);
        }
    }
}
