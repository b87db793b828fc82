//! Terminal keyboard synth
//!
//! Provides a TUI showing:
//! - Current note and scrolling waveform preview
//! - Effect pedals and waveform selector
//! - Recorder status
//! - The on-screen keyboard

mod waveform;

pub use waveform::Waveform;

use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use log::warn;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use crate::engine::PlaybackSink;
use crate::keyboard::{self, KEYMAP};
use crate::session::SessionRecorder;
use crate::synth::{Effect, Note, Synthesizer, Waveform as Shape};

const FRAME_TIME: Duration = Duration::from_millis(16);
const STATUS_TIME: Duration = Duration::from_secs(3);
const SCROLL_STEP: usize = 2;
const HELP: &str = concat!(
    "A-K: notes  W E T Y U: sharps  Space: waveform  1-4: effects  ",
    "r: record  Ctrl-S: save  x: stop  q: quit",
);

/// State of the interactive synth
pub struct App<S: PlaybackSink> {
    synth: Synthesizer,
    recorder: SessionRecorder,
    sink: S,
    waveform: Shape,
    note_duration: f64,
    scroll: usize,
    status: Option<(String, Instant)>,
    running: bool,
}

impl<S: PlaybackSink> App<S> {
    pub fn new(
        synth: Synthesizer,
        recorder: SessionRecorder,
        sink: S,
        waveform: Shape,
        note_duration: f64,
    ) -> Self {
        Self {
            synth,
            recorder,
            sink,
            waveform,
            note_duration,
            scroll: 0,
            status: None,
            running: true,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn synth(&self) -> &Synthesizer {
        &self.synth
    }

    pub fn recorder(&self) -> &SessionRecorder {
        &self.recorder
    }

    pub fn waveform(&self) -> Shape {
        self.waveform
    }

    /// Status message, if one was set recently
    pub fn status(&self) -> Option<&str> {
        self.status
            .as_ref()
            .filter(|(_, at)| at.elapsed() < STATUS_TIME)
            .map(|(msg, _)| msg.as_str())
    }

    /// Advance the waveform scroll by one frame
    pub fn tick(&mut self) {
        let len = self.synth.preview().len().max(1);
        self.scroll = (self.scroll + SCROLL_STEP) % len;
    }

    /// React to a key press
    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        match (key.code, key.modifiers) {
            (KeyCode::Esc, _) | (KeyCode::Char('q'), KeyModifiers::NONE) => self.running = false,
            (KeyCode::Char('c'), KeyModifiers::CONTROL) => self.running = false,
            (KeyCode::Char('s'), KeyModifiers::CONTROL) => self.save(),
            (KeyCode::Char(' '), _) => self.waveform = self.waveform.next(),
            (KeyCode::Char('r'), KeyModifiers::NONE) => {
                self.recorder.toggle();
            }
            (KeyCode::Char('x'), KeyModifiers::NONE) => {
                self.synth.stop();
                self.sink.stop();
            }
            (KeyCode::Char(c @ '1'..='4'), _) => {
                let effect = Effect::ALL[c as usize - '1' as usize];
                self.synth.toggle(effect);
            }
            (KeyCode::Char(c), m) if !m.contains(KeyModifiers::CONTROL) => {
                if let Some(key) = keyboard::lookup(c) {
                    self.play(key.frequency, key.note);
                }
            }
            _ => {}
        }
    }

    fn play(&mut self, frequency: f64, name: &str) {
        let result = Note::new(frequency, name, self.waveform, self.note_duration)
            .map_err(anyhow::Error::from)
            .and_then(|note| {
                let buffer = self.synth.play_note(&note)?;
                self.sink.play(buffer)?;
                self.recorder.add_note(&note);
                Ok(())
            });

        if let Err(e) = result {
            warn!("failed to play {}: {:#}", name, e);
            self.set_status(format!("Playback failed: {}", e));
        }
        self.scroll = 0;
    }

    fn save(&mut self) {
        match self.recorder.save() {
            Ok(handle) => self.set_status(format!("Recording saved: {}", handle.name)),
            Err(e) => {
                warn!("failed to save recording: {}", e);
                self.set_status(format!("Not saved: {}", e));
            }
        }
    }

    fn set_status(&mut self, message: String) {
        self.status = Some((message, Instant::now()));
    }
}

/// Run the interactive synth until the user quits
pub fn run<S: PlaybackSink>(app: &mut App<S>) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = event_loop(&mut terminal, app);

    // Cleanup
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend, S: PlaybackSink>(
    terminal: &mut Terminal<B>,
    app: &mut App<S>,
) -> Result<()> {
    while app.is_running() {
        terminal.draw(|f| draw_ui(f, app))?;

        if event::poll(FRAME_TIME)? {
            if let Event::Key(key) = event::read()? {
                app.handle_key(key);
            }
        }
        app.tick();
    }
    Ok(())
}

fn draw_ui<S: PlaybackSink>(f: &mut Frame, app: &App<S>) {
    let area = f.area();

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(5), // Note + waveform selector
            Constraint::Min(7),    // Waveform + pedals
            Constraint::Length(5), // Keyboard + recorder
            Constraint::Length(3), // Help
        ])
        .split(area);

    let top = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[0]);
    let middle = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[1]);
    let bottom = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(rows[2]);

    draw_note(f, top[0], app);
    draw_selector(f, top[1], app);
    draw_waveform(f, middle[0], app);
    draw_pedals(f, middle[1], app);
    draw_keyboard(f, bottom[0], app);
    draw_recorder(f, bottom[1], app);
    draw_help(f, rows[3]);
}

fn panel(title: &str, color: Color) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(Span::styled(title, Style::default().fg(color)))
}

fn draw_note<S: PlaybackSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let text = match app.synth().current_note() {
        Some(note) => Line::from(vec![
            Span::styled(
                note.name().to_string(),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            ),
            Span::raw(format!("  {:.2} Hz  {}", note.frequency(), note.waveform())),
        ]),
        None => Line::from(Span::styled("-", Style::default().fg(Color::DarkGray))),
    };

    let paragraph = Paragraph::new(text).block(panel(" CURRENT NOTE ", Color::Yellow));
    f.render_widget(paragraph, area);
}

fn draw_selector<S: PlaybackSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let spans: Vec<Span> = Shape::ALL
        .iter()
        .flat_map(|&shape| {
            let label = format!(" {} ", shape.name().to_uppercase());
            let style = if shape == app.waveform() {
                Style::default().fg(Color::Black).bg(Color::Green)
            } else {
                Style::default().fg(Color::Gray)
            };
            [Span::styled(label, style), Span::raw(" ")]
        })
        .collect();

    let paragraph = Paragraph::new(Line::from(spans)).block(panel(" WAVEFORM ", Color::Green));
    f.render_widget(paragraph, area);
}

fn draw_waveform<S: PlaybackSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let waveform = Waveform::new(app.synth().preview().as_slice())
        .offset(app.scroll)
        .style(Style::default().fg(Color::Cyan))
        .block(panel(" Waveform ", Color::Cyan));

    f.render_widget(waveform, area);
}

fn draw_pedals<S: PlaybackSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let effects = app.synth().effects();
    let lines: Vec<Line> = Effect::ALL
        .iter()
        .enumerate()
        .map(|(i, &effect)| {
            let (dot, style) = if effects.is_enabled(effect) {
                ("●", Style::default().fg(Color::Magenta))
            } else {
                ("○", Style::default().fg(Color::DarkGray))
            };
            Line::from(Span::styled(format!(" {} {} [{}]", dot, effect, i + 1), style))
        })
        .collect();

    let paragraph = Paragraph::new(lines).block(panel(" EFFECTS PEDALS ", Color::Magenta));
    f.render_widget(paragraph, area);
}

fn draw_keyboard<S: PlaybackSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let current = app.synth().current_note().map(Note::name);

    let keys: Vec<Span> = KEYMAP
        .iter()
        .map(|key| {
            let style = if current == Some(key.note) {
                Style::default().fg(Color::Black).bg(Color::Yellow)
            } else if key.sharp {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().fg(Color::Blue)
            };
            Span::styled(format!("{:^4}", key.note), style)
        })
        .collect();
    let labels: Vec<Span> = KEYMAP
        .iter()
        .map(|key| {
            Span::styled(
                format!("{:^4}", key.key.to_ascii_uppercase()),
                Style::default().fg(Color::DarkGray),
            )
        })
        .collect();

    let paragraph = Paragraph::new(vec![Line::from(keys), Line::from(labels)])
        .block(panel(" KEYBOARD ", Color::Yellow));
    f.render_widget(paragraph, area);
}

fn draw_recorder<S: PlaybackSink>(f: &mut Frame, area: Rect, app: &App<S>) {
    let recorder = app.recorder();
    let count = recorder.events().len();

    let mut lines = if recorder.is_recording() {
        vec![
            Line::from(vec![
                Span::styled(
                    "● RECORDING",
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
                ),
                Span::raw(format!("  {:.1}s", recorder.duration_secs())),
            ]),
            Line::from(format!("Notes: {}  (r to stop)", count)),
        ]
    } else if count > 0 {
        vec![
            Line::from(Span::styled(
                format!("Ready ({} notes)", count),
                Style::default().fg(Color::Green),
            )),
            Line::from(Span::styled(
                "r: record, Ctrl-S: save",
                Style::default().fg(Color::DarkGray),
            )),
        ]
    } else {
        vec![Line::from(Span::styled(
            "Press r to start recording",
            Style::default().fg(Color::DarkGray),
        ))]
    };

    if let Some(status) = app.status() {
        lines.push(Line::from(Span::styled(
            status.to_string(),
            Style::default().fg(Color::Green),
        )));
    }

    let paragraph = Paragraph::new(lines).block(panel(" RECORDER ", Color::Red));
    f.render_widget(paragraph, area);
}

fn draw_help(f: &mut Frame, area: Rect) {
    let text = Line::from(Span::styled(HELP, Style::default().fg(Color::DarkGray)));

    let paragraph = Paragraph::new(text).block(Block::default().borders(Borders::ALL));
    f.render_widget(paragraph, area);
}
