// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI activity display widget.

use std::time::Duration;

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use super::MidiActivityState;

/// Widget listing the most recent note events, newest first
pub struct MidiActivityWidget<'a> {
    state: &'a MidiActivityState,
}

impl<'a> MidiActivityWidget<'a> {
    /// Create a new MIDI activity widget
    pub fn new(state: &'a MidiActivityState) -> Self {
        Self { state }
    }
}

impl Widget for MidiActivityWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default().borders(Borders::ALL).title(" MIDI Activity ");

        let inner = block.inner(area);
        block.render(area, buf);

        let lines: Vec<Line> = self
            .state
            .messages
            .iter()
            .rev()
            .take(inner.height as usize)
            .map(|msg| {
                let color = message_color(msg.time.elapsed());
                Line::from(vec![
                    Span::styled(format!("{:8} ", msg.message_type), Style::default().fg(color)),
                    Span::styled(msg.data.as_str(), Style::default().fg(color)),
                ])
            })
            .collect();

        Paragraph::new(lines).render(inner, buf);
    }
}

/// Get color based on message age
fn message_color(age: Duration) -> Color {
    if age < Duration::from_millis(500) {
        Color::White
    } else if age < Duration::from_secs(2) {
        Color::Gray
    } else {
        Color::DarkGray
    }
}
