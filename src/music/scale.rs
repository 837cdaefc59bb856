// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale and chord generation from interval templates.
//!
//! Provides the major scale template, the diatonic triad table for a
//! major key, and helpers to pick random roots and chord degrees.

use std::collections::BTreeSet;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::pitch::{Pitch, Semitones};
use crate::error::TheoryError;

/// Major scale, root through octave inclusive
pub const MAJOR_SCALE: [Semitones; 8] = [0, 2, 4, 5, 7, 9, 11, 12];

/// Offsets above the baseline a random root may land on
pub const ROOT_SPAN: Semitones = 11;

/// Triad qualities found on the degrees of a major scale
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChordQuality {
    Major,
    Minor,
    Diminished,
}

impl ChordQuality {
    /// Semitones from the chord root
    pub fn intervals(self) -> &'static [Semitones] {
        match self {
            ChordQuality::Major => &[0, 4, 7],
            ChordQuality::Minor => &[0, 3, 7],
            ChordQuality::Diminished => &[0, 3, 6],
        }
    }

    /// Short symbol ("M", "m", "dim")
    pub fn symbol(self) -> &'static str {
        match self {
            ChordQuality::Major => "M",
            ChordQuality::Minor => "m",
            ChordQuality::Diminished => "dim",
        }
    }
}

impl fmt::Display for ChordQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ChordQuality::Major => "major",
            ChordQuality::Minor => "minor",
            ChordQuality::Diminished => "diminished",
        };
        f.write_str(name)
    }
}

/// A scale degree with its roman-numeral label and triad quality
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChordDegree {
    pub label: &'static str,
    pub quality: ChordQuality,
}

/// Diatonic triads of a major key, in scale order
pub const MAJOR_CHORD_DEGREES: [ChordDegree; 7] = [
    ChordDegree { label: "I", quality: ChordQuality::Major },
    ChordDegree { label: "ii", quality: ChordQuality::Minor },
    ChordDegree { label: "iii", quality: ChordQuality::Minor },
    ChordDegree { label: "IV", quality: ChordQuality::Major },
    ChordDegree { label: "V", quality: ChordQuality::Major },
    ChordDegree { label: "vi", quality: ChordQuality::Minor },
    ChordDegree { label: "vii dim", quality: ChordQuality::Diminished },
];

/// Degrees eligible for random practice (vii dim is never drawn)
pub const PRACTICE_DEGREES: [usize; 6] = [0, 1, 2, 3, 4, 5];

/// Index of a degree label in `MAJOR_CHORD_DEGREES`
pub fn degree_index(label: &str) -> Result<usize, TheoryError> {
    MAJOR_CHORD_DEGREES
        .iter()
        .position(|d| d.label == label.trim())
        .ok_or_else(|| TheoryError::UnknownChordDegree(label.to_string()))
}

/// Ordered scale: each interval added to the root, order preserved
pub fn generate_scale(root: Pitch, intervals: &[Semitones]) -> Vec<Pitch> {
    intervals.iter().map(|&i| root + i).collect()
}

/// Unordered chord: each interval added to the root, duplicates collapse
pub fn generate_chord(root: Pitch, intervals: &[Semitones]) -> BTreeSet<Pitch> {
    intervals.iter().map(|&i| root + i).collect()
}

/// Major scale starting at `root`
pub fn major_scale(root: Pitch) -> Vec<Pitch> {
    generate_scale(root, &MAJOR_SCALE)
}

/// Random root within one octave above the baseline (0..=11 semitones)
pub fn random_root_in_octave<R: Rng + ?Sized>(rng: &mut R, baseline: Pitch) -> Pitch {
    baseline + rng.gen_range(0..=ROOT_SPAN)
}

/// Random degree index drawn uniformly from `allowed`.
///
/// Falls back to the tonic when `allowed` is empty.
pub fn random_degree<R: Rng + ?Sized>(rng: &mut R, allowed: &[usize]) -> usize {
    if allowed.is_empty() {
        return 0;
    }
    allowed[rng.gen_range(0..allowed.len())]
}
