// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! keydrill: a MIDI scale and chord trainer.
//!
//! Listens to note events from a MIDI keyboard and checks them against a
//! major scale (played in order) or a diatonic triad (played together, in
//! either of two octaves).

pub mod config;
pub mod error;
pub mod midi;
pub mod music;
pub mod practice;
pub mod ui;

pub use error::TheoryError;
pub use midi::{NoteEvent, NoteListener, NoteSource, PlayedNote};
pub use music::{Chord, Pitch};
pub use practice::{DisplaySurface, Mode, Readout, Session, SessionSettings, SessionState};
