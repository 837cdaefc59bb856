// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Practice session: scale and chord drills driven by note events.
//!
//! The session pushes plain values (root name, scale degree, chord label,
//! correct count) to a [`DisplaySurface`] whenever they change.

pub mod progress;
pub mod session;

pub use progress::{Advance, ScaleProgress};
pub use session::{Mode, Session, SessionSettings, SessionState};

/// Receiver of the values a practice session shows to the player
pub trait DisplaySurface {
    /// Name of the current root, e.g. "Eb"
    fn show_root(&mut self, name: &str);

    /// 1-based scale degree expected next
    fn show_degree(&mut self, degree: usize);

    /// Roman-numeral label of the chord to play
    fn show_chord(&mut self, label: &str);

    /// Running count of chords played correctly
    fn show_correct(&mut self, count: u32);
}

impl<D: DisplaySurface + ?Sized> DisplaySurface for Box<D> {
    fn show_root(&mut self, name: &str) {
        (**self).show_root(name)
    }

    fn show_degree(&mut self, degree: usize) {
        (**self).show_degree(degree)
    }

    fn show_chord(&mut self, label: &str) {
        (**self).show_chord(label)
    }

    fn show_correct(&mut self, count: u32) {
        (**self).show_correct(count)
    }
}

/// Latest value of every display field
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Readout {
    pub root: String,
    pub degree: usize,
    pub chord: String,
    pub correct: u32,
}

impl DisplaySurface for Readout {
    fn show_root(&mut self, name: &str) {
        self.root = name.to_string();
    }

    fn show_degree(&mut self, degree: usize) {
        self.degree = degree;
    }

    fn show_chord(&mut self, label: &str) {
        self.chord = label.to_string();
    }

    fn show_correct(&mut self, count: u32) {
        self.correct = count;
    }
}

/// Prints each update on its own line
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleDisplay;

impl DisplaySurface for ConsoleDisplay {
    fn show_root(&mut self, name: &str) {
        println!("Root:    {}", name);
    }

    fn show_degree(&mut self, degree: usize) {
        println!("Degree:  {}", degree);
    }

    fn show_chord(&mut self, label: &str) {
        println!("Chord:   {}", label);
    }

    fn show_correct(&mut self, count: u32) {
        println!("Correct: {}", count);
    }
}
