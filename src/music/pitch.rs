// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Pitch model: note names, pitch classes and absolute pitch numbers.
//!
//! Pitches follow the MIDI convention where middle C (C4) is 60 and
//! C-1 is 0. Several spellings may resolve to one pitch class, but every
//! pitch class has exactly one canonical name, flats preferred except for
//! F# and B.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TheoryError;

/// Absolute note number (60 = middle C)
pub type Pitch = i32;

/// Semitone offset type
pub type Semitones = i32;

/// Accepted note spellings and their offset from C
const SPELLINGS: [(&str, u8); 17] = [
    ("C", 0),
    ("C#", 1),
    ("Db", 1),
    ("D", 2),
    ("D#", 3),
    ("Eb", 3),
    ("E", 4),
    ("F", 5),
    ("F#", 6),
    ("Gb", 6),
    ("G", 7),
    ("G#", 8),
    ("Ab", 8),
    ("A", 9),
    ("A#", 10),
    ("Bb", 10),
    ("B", 11),
];

/// Pitch classes, named by their canonical spelling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PitchClass {
    C,
    Db,
    D,
    Eb,
    E,
    F,
    Fs,
    G,
    Ab,
    A,
    Bb,
    B,
}

impl PitchClass {
    /// All pitch classes in chromatic order
    pub const ALL: [PitchClass; 12] = [
        PitchClass::C,
        PitchClass::Db,
        PitchClass::D,
        PitchClass::Eb,
        PitchClass::E,
        PitchClass::F,
        PitchClass::Fs,
        PitchClass::G,
        PitchClass::Ab,
        PitchClass::A,
        PitchClass::Bb,
        PitchClass::B,
    ];

    /// Semitones above C (0-11)
    pub fn index(self) -> u8 {
        self as u8
    }

    /// Pitch class for an index in 0..12.
    ///
    /// # Panics
    /// Panics if `index > 11`. Callers reduce modulo 12 first.
    pub fn from_index(index: u8) -> Self {
        Self::ALL[index as usize]
    }

    /// Pitch class of an absolute pitch
    pub fn of(pitch: Pitch) -> Self {
        Self::ALL[pitch.rem_euclid(12) as usize]
    }

    /// Canonical spelling
    pub fn name(self) -> &'static str {
        match self {
            PitchClass::C => "C",
            PitchClass::Db => "Db",
            PitchClass::D => "D",
            PitchClass::Eb => "Eb",
            PitchClass::E => "E",
            PitchClass::F => "F",
            PitchClass::Fs => "F#",
            PitchClass::G => "G",
            PitchClass::Ab => "Ab",
            PitchClass::A => "A",
            PitchClass::Bb => "Bb",
            PitchClass::B => "B",
        }
    }
}

impl FromStr for PitchClass {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        note_name_to_pitch_class(s).map(PitchClass::from_index)
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Canonical name for a pitch class.
///
/// # Panics
/// Panics if `pitch_class > 11`; reduce with `% 12` before calling.
pub fn pitch_class_to_name(pitch_class: u8) -> &'static str {
    PitchClass::from_index(pitch_class).name()
}

/// Resolve a spelling (naturals, sharps, flats) to its offset from C
pub fn note_name_to_pitch_class(name: &str) -> Result<u8, TheoryError> {
    SPELLINGS
        .iter()
        .find(|(spelling, _)| *spelling == name)
        .map(|&(_, pc)| pc)
        .ok_or_else(|| TheoryError::UnknownNoteName(name.to_string()))
}

/// Absolute pitch for a spelling and octave: `(octave + 1) * 12 + pitch class`
pub fn pitch_number(name: &str, octave: i32) -> Result<Pitch, TheoryError> {
    Ok((octave + 1) * 12 + Pitch::from(note_name_to_pitch_class(name)?))
}

/// Canonical name of a pitch, ignoring octave
pub fn pitch_name(pitch: Pitch) -> &'static str {
    PitchClass::of(pitch).name()
}

/// Octave number of a pitch (60 is in octave 4)
pub fn octave_of(pitch: Pitch) -> i32 {
    pitch.div_euclid(12) - 1
}

/// Name plus octave, e.g. "C4" or "Bb-1"
pub fn pitch_label(pitch: Pitch) -> String {
    format!("{}{}", pitch_name(pitch), octave_of(pitch))
}

/// Parse a label such as "A3", "C#4" or "Bb-1" into a pitch
pub fn parse_note_label(label: &str) -> Result<Pitch, TheoryError> {
    let label = label.trim();
    let mut chars = label.char_indices();
    let split = match (chars.next(), chars.next()) {
        (Some(_), Some((i, '#'))) | (Some(_), Some((i, 'b'))) => i + 1,
        (Some((_, c)), _) => c.len_utf8(),
        (None, _) => return Err(TheoryError::MalformedNoteLabel(label.to_string())),
    };
    let (name, octave) = label.split_at(split);
    let octave: i32 = octave
        .parse()
        .map_err(|_| TheoryError::MalformedNoteLabel(label.to_string()))?;
    pitch_number(name, octave)
}
