use anyhow::{Context, Result};
use crossterm::{
    event::{Event, EventStream, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures::StreamExt;
use ratatui::{Terminal, backend::CrosstermBackend};
use std::io::{Stderr, stderr};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{UnboundedReceiver, unbounded_channel};
use tokio::time::interval;
use tracing::info;

use crate::game::{GameConfig, GameDriver, GameState};
use crate::input::{InputHandler, KeyAction};
use crate::metrics::GameMetrics;
use crate::render::Renderer;

/// Keyboard-driven game in the terminal
pub struct HumanMode {
    driver: GameDriver,
    snapshots: UnboundedReceiver<Arc<GameState>>,
    state: Arc<GameState>,
    metrics: GameMetrics,
    renderer: Renderer,
    input_handler: InputHandler,
    should_quit: bool,
}

impl HumanMode {
    pub fn new(config: GameConfig) -> Self {
        let driver = GameDriver::new(config);
        let (tx, snapshots) = unbounded_channel();
        driver.subscribe(move |state| {
            // Receiver gone means the mode is shutting down
            let _ = tx.send(Arc::clone(state));
        });
        let state = driver.state();

        Self {
            driver,
            snapshots,
            state,
            metrics: GameMetrics::new(),
            renderer: Renderer::new(),
            input_handler: InputHandler::new(),
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode().context("Failed to enable raw mode")?;
        let mut stderr = stderr();
        execute!(stderr, EnterAlternateScreen).context("Failed to enter alternate screen")?;
        let backend = CrosstermBackend::new(stderr);
        let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;
        terminal.hide_cursor().context("Failed to hide cursor")?;
        terminal.clear().context("Failed to clear terminal")?;

        // Run game loop with cleanup
        let result = self.run_game_loop(&mut terminal).await;

        self.driver.stop();
        self.cleanup_terminal(&mut terminal)?;

        result
    }

    async fn run_game_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        let mut event_stream = EventStream::new();

        // Snapshots trigger their own redraws; this only keeps the clock moving
        let mut clock_timer = interval(Duration::from_millis(250));

        self.draw(terminal)?;
        self.driver.start();
        info!("Game started");

        loop {
            tokio::select! {
                maybe_event = event_stream.next() => {
                    if let Some(Ok(event)) = maybe_event {
                        self.handle_event(event);
                    }
                }

                Some(snapshot) = self.snapshots.recv() => {
                    self.on_snapshot(snapshot);
                    self.draw(terminal)?;
                }

                _ = clock_timer.tick() => {
                    self.draw(terminal)?;
                }

                _ = tokio::signal::ctrl_c() => {
                    self.should_quit = true;
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    fn draw(&mut self, terminal: &mut Terminal<CrosstermBackend<Stderr>>) -> Result<()> {
        self.metrics.update(self.state.running);
        terminal
            .draw(|frame| {
                self.renderer.render(frame, &self.state, &self.metrics);
            })
            .context("Failed to draw frame")?;
        Ok(())
    }

    fn handle_event(&mut self, event: Event) {
        let Event::Key(key) = event else {
            return;
        };
        // Only process key press events, not release
        if key.kind != KeyEventKind::Press {
            return;
        }

        match self.input_handler.handle_key_event(key) {
            KeyAction::Turn(direction) => {
                self.driver.change_direction(direction);
            }
            KeyAction::TogglePause => self.toggle_pause(),
            KeyAction::Restart => self.restart(),
            KeyAction::Quit => self.should_quit = true,
            KeyAction::None => {}
        }
    }

    fn on_snapshot(&mut self, snapshot: Arc<GameState>) {
        if snapshot.is_game_over() && !self.state.is_game_over() {
            self.metrics.on_game_over(snapshot.score, snapshot.snake.len());
        }
        self.state = snapshot;
    }

    fn toggle_pause(&mut self) {
        if self.state.is_game_over() {
            return;
        }
        if !self.driver.stop() {
            self.driver.start();
        }
    }

    fn restart(&mut self) {
        self.driver.stop();
        self.driver.reset();
        self.metrics.on_game_start();
        self.driver.start();
    }

    fn cleanup_terminal(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stderr>>,
    ) -> Result<()> {
        disable_raw_mode().context("Failed to disable raw mode")?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)
            .context("Failed to leave alternate screen")?;
        terminal.show_cursor().context("Failed to show cursor")?;
        Ok(())
    }
}
