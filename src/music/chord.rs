// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chord matching.
//!
//! A chord counts as played when the set of held pitches equals the target
//! exactly, either in the generated voicing or one octave below it. Subsets
//! and supersets never match.

use std::collections::BTreeSet;

use super::pitch::{Pitch, Semitones};
use super::scale::{generate_chord, ChordDegree, MAJOR_CHORD_DEGREES};

/// Unordered set of pitches
pub type Chord = BTreeSet<Pitch>;

/// Shift every pitch of a chord by `semitones`
pub fn transpose(chord: &Chord, semitones: Semitones) -> Chord {
    chord.iter().map(|&p| p + semitones).collect()
}

/// True iff `held` and `target` contain exactly the same pitches
pub fn is_exact_match(held: &Chord, target: &Chord) -> bool {
    held.len() == target.len() && held.iter().all(|p| target.contains(p))
}

/// True if `held` exactly equals either the target or its octave-down variant
pub fn matches_either_octave(held: &Chord, target: &Chord, target_octave_down: &Chord) -> bool {
    is_exact_match(held, target) || is_exact_match(held, target_octave_down)
}

/// The chord the player is currently asked to play
#[derive(Debug, Clone, PartialEq)]
pub struct TargetChord {
    degree: usize,
    voicing: Chord,
    octave_down: Chord,
}

impl TargetChord {
    /// Build the triad on `degree` (0-based) of `scale`.
    ///
    /// `degree` must index both `scale` and `MAJOR_CHORD_DEGREES`.
    pub fn on_degree(scale: &[Pitch], degree: usize) -> Self {
        let info = &MAJOR_CHORD_DEGREES[degree];
        let voicing = generate_chord(scale[degree], info.quality.intervals());
        let octave_down = transpose(&voicing, -12);
        Self {
            degree,
            voicing,
            octave_down,
        }
    }

    /// 0-based degree index
    pub fn degree(&self) -> usize {
        self.degree
    }

    /// Degree label and quality
    pub fn info(&self) -> &'static ChordDegree {
        &MAJOR_CHORD_DEGREES[self.degree]
    }

    /// Label shown to the player ("I", "ii", ...)
    pub fn label(&self) -> &'static str {
        self.info().label
    }

    /// Generated voicing
    pub fn voicing(&self) -> &Chord {
        &self.voicing
    }

    /// Voicing transposed down one octave
    pub fn octave_down(&self) -> &Chord {
        &self.octave_down
    }

    /// Whether the held notes complete this chord in either octave
    pub fn is_matched_by(&self, held: &Chord) -> bool {
        matches_either_octave(held, &self.voicing, &self.octave_down)
    }
}
