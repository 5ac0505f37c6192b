//! TUI module for pluck
//!
//! Replays the recorded delay-line snapshots of each rendered note next to
//! the note's spectrum.

mod spectrum;
mod waveform;

use color_eyre::eyre::Result as EyreResult;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    widgets::Paragraph,
    DefaultTerminal, Frame,
};
use std::time::{Duration, Instant};

pub use spectrum::Spectrum;

use spectrum::render_spectrum;
use waveform::render_string;

/// Time between animation frames
const FRAME_INTERVAL: Duration = Duration::from_millis(60);

/// Everything needed to draw one rendered note
pub struct NotePlot {
    pub name: String,
    pub frequency: f32,
    /// (output step, delay-line contents)
    pub snapshots: Vec<(usize, Vec<f32>)>,
    pub spectrum: Spectrum,
}

/// Plot viewer state
struct PlotApp<'a> {
    plots: &'a [NotePlot],
    selected: usize,
    frame_index: usize,
    should_quit: bool,
}

/// Show the plots until the user quits
pub fn show(plots: &[NotePlot]) -> EyreResult<()> {
    if plots.is_empty() {
        return Ok(());
    }

    let mut terminal = ratatui::init();
    let result = PlotApp {
        plots,
        selected: 0,
        frame_index: 0,
        should_quit: false,
    }
    .run(&mut terminal);
    ratatui::restore();
    result
}

impl PlotApp<'_> {
    fn run(&mut self, terminal: &mut DefaultTerminal) -> EyreResult<()> {
        let mut last_frame = Instant::now();

        while !self.should_quit {
            terminal.draw(|frame| self.render(frame))?;

            if event::poll(Duration::from_millis(16))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code);
                    }
                }
            }

            if last_frame.elapsed() >= FRAME_INTERVAL {
                last_frame = Instant::now();
                let frames = self.plots[self.selected].snapshots.len().max(1);
                self.frame_index = (self.frame_index + 1) % frames;
            }
        }

        Ok(())
    }

    fn handle_key(&mut self, key: KeyCode) {
        let count = self.plots.len();
        match key {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Right | KeyCode::Char('l') => {
                self.selected = (self.selected + 1) % count;
                self.frame_index = 0;
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected = (self.selected + count - 1) % count;
                self.frame_index = 0;
            }
            _ => {}
        }
    }

    fn render(&self, frame: &mut Frame) {
        let plot = &self.plots[self.selected];

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),      // Title
                Constraint::Percentage(55), // String
                Constraint::Min(6),         // Spectrum
                Constraint::Length(1),      // Help bar
            ])
            .split(frame.area());

        let title = Paragraph::new(format!(
            " {} - {} Hz ({}/{})",
            plot.name,
            plot.frequency,
            self.selected + 1,
            self.plots.len()
        ))
        .style(Style::default().fg(Color::Cyan));
        frame.render_widget(title, chunks[0]);

        if let Some((step, contents)) = plot.snapshots.get(self.frame_index) {
            render_string(frame, chunks[1], contents, *step);
        }

        render_spectrum(frame, chunks[2], &plot.spectrum);

        let help = Paragraph::new(" [Q] Quit  [←/→] Previous/next note")
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(help, chunks[3]);
    }
}
