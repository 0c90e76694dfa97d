use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

use crate::game::{GameState, Position};
use crate::metrics::GameMetrics;

pub struct Renderer;

impl Renderer {
    pub fn new() -> Self {
        Self
    }

    pub fn render(&self, frame: &mut Frame, state: &GameState, metrics: &GameMetrics) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Header
                Constraint::Min(0),    // Game area
                Constraint::Length(3), // Footer
            ])
            .split(frame.area());

        frame.render_widget(self.render_stats(state, metrics), chunks[0]);

        let game_area = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Percentage(10),
                Constraint::Percentage(80),
                Constraint::Percentage(10),
            ])
            .split(chunks[1])[1];

        if state.is_game_over() {
            frame.render_widget(self.render_game_over(state, metrics), game_area);
        } else {
            frame.render_widget(self.render_grid(state), game_area);
        }

        frame.render_widget(self.render_controls(), chunks[2]);
    }

    /// Draw the field with the highest row on top, so Up moves up the screen
    fn render_grid(&self, state: &GameState) -> Paragraph<'_> {
        let head = state.head();
        let lines: Vec<Line> = (0..state.field.height as i32)
            .rev()
            .map(|y| {
                let spans: Vec<Span> = (0..state.field.width as i32)
                    .map(|x| cell_span(state, head, Position::new(x, y)))
                    .collect();
                Line::from(spans)
            })
            .collect();

        let title = if state.running { " Snake " } else { " Snake (paused) " };

        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_type(BorderType::Double)
                    .border_style(Style::default().fg(Color::White))
                    .title(title),
            )
            .alignment(Alignment::Center)
    }

    fn render_stats(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let label = Style::default().fg(Color::Yellow);
        let value = Style::default().fg(Color::White);

        let text = vec![Line::from(vec![
            Span::styled("Score: ", label),
            Span::styled(state.score.to_string(), value.add_modifier(Modifier::BOLD)),
            Span::raw("    "),
            Span::styled("Length: ", label),
            Span::styled(state.snake.len().to_string(), value),
            Span::raw("    "),
            Span::styled("Ticks: ", label),
            Span::styled(state.ticks.to_string(), value),
            Span::raw("    "),
            Span::styled("Time: ", label),
            Span::styled(metrics.format_time(), value),
            Span::raw("    "),
            Span::styled("Best: ", label),
            Span::styled(metrics.best_score.to_string(), value),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }

    fn render_game_over(&self, state: &GameState, metrics: &GameMetrics) -> Paragraph<'_> {
        let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
        let gray = Style::default().fg(Color::Gray);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled("GAME OVER", bold(Color::Red))]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Final Score: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.score.to_string(), bold(Color::White)),
                Span::styled("   Length: ", Style::default().fg(Color::Yellow)),
                Span::styled(state.snake.len().to_string(), bold(Color::White)),
            ]),
            Line::from(vec![
                Span::styled("Games played: ", gray),
                Span::styled(metrics.games_played.to_string(), gray),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("Press ", gray),
                Span::styled("R", bold(Color::Green)),
                Span::styled(" to restart or ", gray),
                Span::styled("Q", bold(Color::Red)),
                Span::styled(" to quit", gray),
            ]),
        ];

        Paragraph::new(text).alignment(Alignment::Center).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red)),
        )
    }

    fn render_controls(&self) -> Paragraph<'_> {
        let text = vec![Line::from(vec![
            Span::styled("↑↓←→", Style::default().fg(Color::Cyan)),
            Span::raw(" or "),
            Span::styled("WASD", Style::default().fg(Color::Cyan)),
            Span::raw(" to move | "),
            Span::styled("P", Style::default().fg(Color::Cyan)),
            Span::raw(" to pause | "),
            Span::styled("Q", Style::default().fg(Color::Red)),
            Span::raw(" to quit"),
        ])];

        Paragraph::new(text).alignment(Alignment::Center)
    }
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new()
    }
}

fn cell_span(state: &GameState, head: Position, pos: Position) -> Span<'static> {
    if pos == head {
        Span::styled(
            "■ ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )
    } else if state.snake.occupies(pos) {
        Span::styled("□ ", Style::default().fg(Color::Green))
    } else if state.edible == Some(pos) {
        Span::styled(
            "O ",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )
    } else {
        Span::styled(". ", Style::default().fg(Color::DarkGray))
    }
}
