// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Practice readout widget.

use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Paragraph, Widget},
};

use crate::practice::{Mode, Readout};

/// Root, degree or chord, and score in large-ish columns
pub struct ReadoutWidget<'a> {
    readout: &'a Readout,
    mode: Mode,
    block: Option<Block<'a>>,
}

impl<'a> ReadoutWidget<'a> {
    /// Create a new readout widget
    pub fn new(readout: &'a Readout, mode: Mode) -> Self {
        Self {
            readout,
            mode,
            block: None,
        }
    }

    /// Set the block wrapper
    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = Some(block);
        self
    }
}

impl Widget for ReadoutWidget<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let area = if let Some(block) = self.block {
            let inner = block.inner(area);
            block.render(area, buf);
            inner
        } else {
            area
        };

        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([
                Constraint::Length(12), // Root
                Constraint::Length(2),  // Spacer
                Constraint::Length(14), // Degree or chord
                Constraint::Length(2),  // Spacer
                Constraint::Length(12), // Correct
                Constraint::Min(0),     // Remaining
            ])
            .split(area);

        let root = self.readout.root.clone();
        field("Root", root, Color::Cyan).render(chunks[0], buf);

        match self.mode {
            Mode::Scales => {
                field("Degree", self.readout.degree.to_string(), Color::Magenta)
                    .render(chunks[2], buf);
            }
            Mode::Chords => {
                field("Chord", self.readout.chord.clone(), Color::Magenta)
                    .render(chunks[2], buf);
                field("Correct", self.readout.correct.to_string(), Color::Green)
                    .render(chunks[4], buf);
            }
        }
    }
}

/// A caption over a bold value
fn field(caption: &'static str, value: String, color: Color) -> Paragraph<'static> {
    Paragraph::new(vec![
        Line::from(Span::styled(caption, Style::default().fg(Color::DarkGray))),
        Line::from(Span::styled(
            value,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
}
