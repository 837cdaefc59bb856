// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Terminal UI for keydrill.
//!
//! Provides a ratatui-based view of the practice readout (root, degree,
//! chord, score), the notes currently held, and recent MIDI activity.
//! In chords mode the keyboard doubles as the root picker.

mod midi_activity;
mod readout;

pub use midi_activity::MidiActivityWidget;
pub use readout::ReadoutWidget;

use std::io::{self, Stdout};
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};

use crate::config::RootSetting;
use crate::midi::NoteEvent;
use crate::music::pitch::{pitch_label, Pitch, PitchClass};
use crate::practice::{DisplaySurface, Mode, Readout};

/// UI state shared between the session and the renderer
#[derive(Debug, Clone)]
pub struct UiState {
    /// Practice mode (fixed for the session)
    pub mode: Mode,
    /// Values pushed by the session
    pub readout: Readout,
    /// Pitches currently held, ascending
    pub held: Vec<Pitch>,
    /// Recent note events
    pub midi_activity: MidiActivityState,
    /// Root picker (chords mode)
    pub root_controls: RootSetting,
    /// Help text visible
    pub show_help: bool,
    /// Status message
    pub status_message: Option<String>,
    /// Status message timestamp
    pub status_time: Option<Instant>,
}

impl UiState {
    /// Create state for a session in `mode` starting on `root`
    pub fn new(mode: Mode, root_controls: RootSetting) -> Self {
        Self {
            mode,
            readout: Readout::default(),
            held: Vec::new(),
            midi_activity: MidiActivityState::new(),
            root_controls,
            show_help: false,
            status_message: None,
            status_time: None,
        }
    }

    /// Set a status message that will be displayed temporarily
    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_time = Some(Instant::now());
    }

    /// Clear expired status message
    pub fn clear_expired_status(&mut self) {
        if let Some(time) = self.status_time {
            if time.elapsed() > Duration::from_secs(3) {
                self.status_message = None;
                self.status_time = None;
            }
        }
    }

    /// Log an inbound event and the resulting held notes
    pub fn record_event<'a, I>(&mut self, event: &NoteEvent, held: I)
    where
        I: IntoIterator<Item = &'a Pitch>,
    {
        self.midi_activity.add(MidiActivityMessage::from_event(event));
        self.held = held.into_iter().copied().collect();
    }

    /// Apply a root-picker key; returns the new root when it changed
    pub fn apply_root_key(&mut self, action: &KeyAction) -> Option<Pitch> {
        if self.mode != Mode::Chords {
            return None;
        }
        let before = self.root_controls.pitch();
        match *action {
            KeyAction::SetNatural(pc) => {
                let octave_base = self.root_controls.natural.div_euclid(12) * 12;
                self.root_controls.natural = octave_base + Pitch::from(pc.index());
            }
            KeyAction::SetSharpFlat(offset) => self.root_controls.sharp_flat = offset,
            _ => return None,
        }
        let after = self.root_controls.pitch();
        (after != before).then_some(after)
    }
}

/// Shared handle the session writes through
#[derive(Debug, Clone)]
pub struct UiHandle(Arc<Mutex<UiState>>);

impl UiHandle {
    pub fn new(state: UiState) -> Self {
        Self(Arc::new(Mutex::new(state)))
    }

    /// Lock the state, recovering from a poisoned lock
    pub fn lock(&self) -> MutexGuard<'_, UiState> {
        self.0.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Snapshot of the current state
    pub fn snapshot(&self) -> UiState {
        self.lock().clone()
    }
}

impl DisplaySurface for UiHandle {
    fn show_root(&mut self, name: &str) {
        self.lock().readout.show_root(name);
    }

    fn show_degree(&mut self, degree: usize) {
        self.lock().readout.show_degree(degree);
    }

    fn show_chord(&mut self, label: &str) {
        self.lock().readout.show_chord(label);
    }

    fn show_correct(&mut self, count: u32) {
        let mut state = self.lock();
        state.readout.show_correct(count);
        state.set_status(format!("Correct! ({})", count));
    }
}

/// MIDI activity state
#[derive(Debug, Clone, Default)]
pub struct MidiActivityState {
    /// Recent note events
    pub messages: Vec<MidiActivityMessage>,
    /// Maximum messages to keep
    pub max_messages: usize,
}

impl MidiActivityState {
    /// Create with default capacity
    pub fn new() -> Self {
        Self {
            max_messages: 10,
            ..Default::default()
        }
    }

    /// Add a message, dropping the oldest past capacity
    pub fn add(&mut self, msg: MidiActivityMessage) {
        self.messages.push(msg);
        if self.messages.len() > self.max_messages {
            self.messages.remove(0);
        }
    }

    /// Clear all messages
    pub fn clear(&mut self) {
        self.messages.clear();
    }
}

/// A MIDI activity message for display
#[derive(Debug, Clone)]
pub struct MidiActivityMessage {
    /// Message type description
    pub message_type: String,
    /// Note label and pitch
    pub data: String,
    /// Timestamp
    pub time: Instant,
}

impl MidiActivityMessage {
    /// Describe a note event
    pub fn from_event(event: &NoteEvent) -> Self {
        let message_type = match event {
            NoteEvent::NoteOn(_) => "Note On",
            NoteEvent::NoteOff(_) => "Note Off",
        };
        let pitch = event.note().pitch;
        Self {
            message_type: message_type.to_string(),
            data: format!("{} ({})", pitch_label(pitch), pitch),
            time: Instant::now(),
        }
    }
}

/// Key event result
#[derive(Debug, Clone, PartialEq)]
pub enum KeyAction {
    /// No action needed
    None,
    /// Quit the application
    Quit,
    /// Choose the natural note of the root
    SetNatural(PitchClass),
    /// Choose sharp (1), flat (-1) or natural (0)
    SetSharpFlat(i32),
    /// Toggle help
    ToggleHelp,
}

/// Terminal UI application
pub struct App {
    /// Shared UI state
    state: UiHandle,
    /// Terminal handle
    terminal: Terminal<CrosstermBackend<Stdout>>,
    /// Target frame rate
    frame_rate: u32,
    /// Whether to continue running
    running: bool,
}

impl App {
    /// Create a new app with shared state
    pub fn new(state: UiHandle) -> io::Result<Self> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state,
            terminal,
            frame_rate: 30,
            running: true,
        })
    }

    /// Check if running
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Stop the app
    pub fn quit(&mut self) {
        self.running = false;
    }

    /// Handle a key event
    pub fn handle_key(&mut self, code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
        let action = map_key(code, modifiers);
        match action {
            KeyAction::Quit => self.quit(),
            KeyAction::ToggleHelp => {
                let mut state = self.state.lock();
                state.show_help = !state.show_help;
            }
            _ => {}
        }
        action
    }

    /// Poll for events with timeout
    pub fn poll_event(&self) -> io::Result<Option<Event>> {
        let timeout = Duration::from_millis(1000 / self.frame_rate as u64);
        if event::poll(timeout)? {
            Ok(Some(event::read()?))
        } else {
            Ok(None)
        }
    }

    /// Draw the UI
    pub fn draw(&mut self) -> io::Result<()> {
        let state = {
            let mut guard = self.state.lock();
            guard.clear_expired_status();
            guard.clone()
        };

        self.terminal.draw(|frame| {
            let area = frame.area();

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([
                    Constraint::Length(6), // Readout
                    Constraint::Length(3), // Held notes
                    Constraint::Min(6),    // MIDI Activity
                    Constraint::Length(1), // Status bar
                ])
                .split(area);

            frame.render_widget(
                ReadoutWidget::new(&state.readout, state.mode).block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(format!(" keydrill - {} ", state.mode)),
                ),
                chunks[0],
            );
            render_held(frame, chunks[1], &state.held);
            frame.render_widget(MidiActivityWidget::new(&state.midi_activity), chunks[2]);
            render_status_bar(frame, chunks[3], &state);

            if state.show_help {
                render_help_overlay(frame, area, state.mode);
            }
        })?;

        Ok(())
    }

    /// Cleanup terminal on drop
    fn cleanup(&mut self) -> io::Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }
}

impl Drop for App {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}

/// Translate a key press into an action
pub fn map_key(code: KeyCode, modifiers: KeyModifiers) -> KeyAction {
    if modifiers.contains(KeyModifiers::CONTROL) {
        return match code {
            KeyCode::Char('c') => KeyAction::Quit,
            _ => KeyAction::None,
        };
    }

    match code {
        KeyCode::Char('q') | KeyCode::Esc => KeyAction::Quit,
        KeyCode::Char('?') | KeyCode::Char('h') => KeyAction::ToggleHelp,
        KeyCode::Char('#') => KeyAction::SetSharpFlat(1),
        KeyCode::Char('-') => KeyAction::SetSharpFlat(-1),
        KeyCode::Char('n') => KeyAction::SetSharpFlat(0),
        KeyCode::Char(c) => {
            let natural = match c.to_ascii_uppercase() {
                'C' => PitchClass::C,
                'D' => PitchClass::D,
                'E' => PitchClass::E,
                'F' => PitchClass::F,
                'G' => PitchClass::G,
                'A' => PitchClass::A,
                'B' => PitchClass::B,
                _ => return KeyAction::None,
            };
            KeyAction::SetNatural(natural)
        }
        _ => KeyAction::None,
    }
}

/// Render the held-notes row
fn render_held(frame: &mut Frame, area: Rect, held: &[Pitch]) {
    let block = Block::default().borders(Borders::ALL).title(" Held ");
    let text = if held.is_empty() {
        Span::styled("-", Style::default().fg(Color::DarkGray))
    } else {
        let labels: Vec<String> = held.iter().map(|&p| pitch_label(p)).collect();
        Span::styled(labels.join(" "), Style::default().fg(Color::Green))
    };
    frame.render_widget(Paragraph::new(text).block(block), area);
}

/// Render status bar
fn render_status_bar(frame: &mut Frame, area: Rect, state: &UiState) {
    let text = if let Some(ref msg) = state.status_message {
        Span::styled(msg, Style::default().fg(Color::Yellow))
    } else if state.mode == Mode::Chords {
        Span::styled(
            " c-b: Root | #/-/n: Sharp/Flat/Natural | h: Help | q: Quit",
            Style::default().fg(Color::DarkGray),
        )
    } else {
        Span::styled(" h: Help | q: Quit", Style::default().fg(Color::DarkGray))
    };

    frame.render_widget(Paragraph::new(text), area);
}

/// Render help overlay
fn render_help_overlay(frame: &mut Frame, area: Rect, mode: Mode) {
    let width = 48.min(area.width.saturating_sub(4));
    let height = 12.min(area.height.saturating_sub(4));
    let x = (area.width - width) / 2;
    let y = (area.height - height) / 2;
    let help_area = Rect::new(x, y, width, height);

    frame.render_widget(Clear, help_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title(" Help ")
        .style(Style::default().bg(Color::Black));

    let inner = block.inner(help_area);
    frame.render_widget(block, help_area);

    let mut help_text = vec![
        Line::from(Span::styled("Practice", Style::default().add_modifier(Modifier::BOLD))),
    ];
    match mode {
        Mode::Scales => {
            help_text.push(Line::from("  Play the major scale on the root,"));
            help_text.push(Line::from("  root to octave, one note at a time."));
        }
        Mode::Chords => {
            help_text.push(Line::from("  Play the chord for the shown degree,"));
            help_text.push(Line::from("  in the root octave or one below."));
            help_text.push(Line::from(""));
            help_text.push(Line::from(Span::styled(
                "Root",
                Style::default().add_modifier(Modifier::BOLD),
            )));
            help_text.push(Line::from("  c d e f g a b  Natural"));
            help_text.push(Line::from("  # / - / n      Sharp / Flat / Natural"));
        }
    }
    help_text.push(Line::from(""));
    help_text.push(Line::from("  h/?            Toggle help"));
    help_text.push(Line::from("  q/Esc/Ctrl+c   Quit"));

    frame.render_widget(Paragraph::new(help_text), inner);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chords_state() -> UiState {
        UiState::new(
            Mode::Chords,
            RootSetting {
                natural: 60,
                sharp_flat: 0,
            },
        )
    }

    #[test]
    fn test_ui_state_status() {
        let mut state = chords_state();
        assert!(state.status_message.is_none());

        state.set_status("Test message");
        assert_eq!(state.status_message, Some("Test message".to_string()));
    }

    #[test]
    fn test_handle_forwards_to_readout() {
        let mut handle = UiHandle::new(chords_state());
        handle.show_root("Db");
        handle.show_degree(1);
        handle.show_chord("IV");
        handle.show_correct(3);

        let state = handle.snapshot();
        assert_eq!(state.readout.root, "Db");
        assert_eq!(state.readout.chord, "IV");
        assert_eq!(state.readout.correct, 3);
        assert!(state.status_message.unwrap().contains('3'));
    }

    #[test]
    fn test_record_event() {
        let mut state = chords_state();
        state.record_event(&NoteEvent::on(60), &[60]);
        state.record_event(&NoteEvent::on(64), &[60, 64]);

        assert_eq!(state.held, vec![60, 64]);
        assert_eq!(state.midi_activity.messages.len(), 2);
        assert_eq!(state.midi_activity.messages[1].message_type, "Note On");
        assert_eq!(state.midi_activity.messages[1].data, "E4 (64)");
    }

    #[test]
    fn test_activity_capacity() {
        let mut activity = MidiActivityState::new();
        for pitch in 0..15 {
            activity.add(MidiActivityMessage::from_event(&NoteEvent::off(pitch)));
        }
        assert_eq!(activity.messages.len(), 10);
        assert_eq!(activity.messages[0].data, "F-1 (5)");

        activity.clear();
        assert!(activity.messages.is_empty());
    }

    #[test]
    fn test_map_key() {
        assert_eq!(map_key(KeyCode::Char('q'), KeyModifiers::NONE), KeyAction::Quit);
        assert_eq!(map_key(KeyCode::Char('c'), KeyModifiers::CONTROL), KeyAction::Quit);
        assert_eq!(
            map_key(KeyCode::Char('c'), KeyModifiers::NONE),
            KeyAction::SetNatural(PitchClass::C)
        );
        assert_eq!(
            map_key(KeyCode::Char('G'), KeyModifiers::SHIFT),
            KeyAction::SetNatural(PitchClass::G)
        );
        assert_eq!(
            map_key(KeyCode::Char('#'), KeyModifiers::SHIFT),
            KeyAction::SetSharpFlat(1)
        );
        assert_eq!(map_key(KeyCode::Char('z'), KeyModifiers::NONE), KeyAction::None);
    }

    #[test]
    fn test_root_keys() {
        let mut state = chords_state();

        assert_eq!(state.apply_root_key(&KeyAction::SetNatural(PitchClass::E)), Some(64));
        assert_eq!(state.apply_root_key(&KeyAction::SetSharpFlat(-1)), Some(63));
        // same value again is not a change
        assert_eq!(state.apply_root_key(&KeyAction::SetSharpFlat(-1)), None);
        assert_eq!(state.apply_root_key(&KeyAction::Quit), None);
    }

    #[test]
    fn test_root_keys_ignored_for_scales() {
        let mut state = UiState::new(
            Mode::Scales,
            RootSetting {
                natural: 57,
                sharp_flat: 0,
            },
        );
        assert_eq!(state.apply_root_key(&KeyAction::SetNatural(PitchClass::C)), None);
    }
}
