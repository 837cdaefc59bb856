// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Music theory utilities for keydrill.
//!
//! This module provides the pitch model, scale and chord generation,
//! and octave-invariant chord matching.

pub mod chord;
pub mod pitch;
pub mod scale;

pub use chord::{is_exact_match, matches_either_octave, transpose, Chord, TargetChord};
pub use pitch::{
    note_name_to_pitch_class, parse_note_label, pitch_class_to_name, pitch_label, pitch_name,
    pitch_number, Pitch, PitchClass, Semitones,
};
pub use scale::{
    degree_index, generate_chord, generate_scale, major_scale, random_degree,
    random_root_in_octave, ChordDegree, ChordQuality, MAJOR_CHORD_DEGREES, MAJOR_SCALE,
    PRACTICE_DEGREES,
};
