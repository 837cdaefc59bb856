// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Note scripts: a text stand-in for a MIDI device.
//!
//! One command per line:
//!
//! ```text
//! # C major triad, one octave down
//! chord C3 E3 G3
//! release
//! on 60
//! off C4
//! ```
//!
//! Notes are pitch numbers or labels such as `C#4`. `chord` presses notes in
//! order; `release` lets go of everything the script still holds.

use std::collections::BTreeSet;
use std::collections::VecDeque;
use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};

use super::{NoteEvent, NoteSource};
use crate::music::pitch::{parse_note_label, Pitch};

/// A queue of scripted note events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteScript {
    events: VecDeque<NoteEvent>,
}

impl NoteScript {
    /// Load a script from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())
            .with_context(|| format!("Failed to read note script: {:?}", path.as_ref()))?;
        Self::parse(&contents)
            .with_context(|| format!("Failed to parse note script: {:?}", path.as_ref()))
    }

    /// Parse a script from text
    pub fn parse(text: &str) -> Result<Self> {
        let mut events = VecDeque::new();
        let mut held: BTreeSet<Pitch> = BTreeSet::new();

        for (number, line) in text.lines().enumerate() {
            let line = strip_comment(line).trim();
            if line.is_empty() {
                continue;
            }
            let mut words = line.split_whitespace();
            let command = words.next().unwrap_or("");
            let notes = words
                .map(parse_note)
                .collect::<Result<Vec<Pitch>>>()
                .with_context(|| format!("line {}", number + 1))?;

            match (command, notes.as_slice()) {
                ("on", [pitch]) => {
                    held.insert(*pitch);
                    events.push_back(NoteEvent::on(*pitch));
                }
                ("off", [pitch]) => {
                    held.remove(pitch);
                    events.push_back(NoteEvent::off(*pitch));
                }
                ("chord", pitches) if !pitches.is_empty() => {
                    for &pitch in pitches {
                        held.insert(pitch);
                        events.push_back(NoteEvent::on(pitch));
                    }
                }
                ("release", []) => {
                    for pitch in std::mem::take(&mut held) {
                        events.push_back(NoteEvent::off(pitch));
                    }
                }
                _ => bail!("line {}: cannot understand {:?}", number + 1, line),
            }
        }

        Ok(Self { events })
    }

    /// Events not yet delivered
    pub fn remaining(&self) -> usize {
        self.events.len()
    }
}

impl NoteSource for NoteScript {
    fn poll(&mut self) -> Vec<NoteEvent> {
        self.events.drain(..).collect()
    }

    fn is_exhausted(&self) -> bool {
        self.events.is_empty()
    }
}

/// Drop a `#` comment; a `#` inside a word such as `C#4` is a sharp
fn strip_comment(line: &str) -> &str {
    let bytes = line.as_bytes();
    for (i, &b) in bytes.iter().enumerate() {
        if b == b'#' && (i == 0 || bytes[i - 1].is_ascii_whitespace()) {
            return &line[..i];
        }
    }
    line
}

/// A pitch number ("60") or a note label ("C4")
fn parse_note(word: &str) -> Result<Pitch> {
    if let Ok(pitch) = word.parse::<Pitch>() {
        return Ok(pitch);
    }
    Ok(parse_note_label(word)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TheoryError;
    use std::io::Write;

    #[test]
    fn test_parse_commands() {
        let script = NoteScript::parse(
            "# warm up\n\
             on 60\n\
             off C4   # same note\n\
             \n\
             chord C3 E3 G3\n\
             release\n",
        )
        .unwrap();

        assert_eq!(script.remaining(), 8);
        let events: Vec<NoteEvent> = script.events.iter().copied().collect();
        assert_eq!(
            events,
            vec![
                NoteEvent::on(60),
                NoteEvent::off(60),
                NoteEvent::on(48),
                NoteEvent::on(52),
                NoteEvent::on(55),
                NoteEvent::off(48),
                NoteEvent::off(52),
                NoteEvent::off(55),
            ]
        );
    }

    #[test]
    fn test_release_skips_released_notes() {
        let mut script = NoteScript::parse("chord 60 64\noff 60\nrelease").unwrap();
        assert_eq!(
            script.poll(),
            vec![
                NoteEvent::on(60),
                NoteEvent::on(64),
                NoteEvent::off(60),
                NoteEvent::off(64),
            ]
        );
        assert!(script.is_exhausted());
        assert!(script.poll().is_empty());
    }

    #[test]
    fn test_unknown_note_name() {
        let err = NoteScript::parse("on 60\non H4").unwrap_err();
        assert!(format!("{:#}", err).contains("line 2"));
        assert_eq!(
            err.downcast_ref::<TheoryError>(),
            Some(&TheoryError::UnknownNoteName("H".to_string()))
        );
    }

    #[test]
    fn test_sharp_is_not_a_comment() {
        let mut script = NoteScript::parse("on C#4 # sharp\noff Db4").unwrap();
        assert_eq!(script.poll(), vec![NoteEvent::on(61), NoteEvent::off(61)]);
    }

    #[test]
    fn test_bad_command() {
        assert!(NoteScript::parse("press 60").is_err());
        assert!(NoteScript::parse("on 60 62").is_err());
        assert!(NoteScript::parse("chord").is_err());
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "on A3").unwrap();
        let script = NoteScript::load(file.path()).unwrap();
        assert_eq!(script.remaining(), 1);
    }
}
