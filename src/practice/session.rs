// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Session controller.
//!
//! Owns all mutable practice state and reacts to note events:
//!
//! - **scales**: each note-on is offered to the scale tracker; finishing a
//!   scale draws a new random root within an octave of the baseline.
//! - **chords**: the held notes are compared with the target triad (in its
//!   generated voicing or one octave down); a match bumps the counter and
//!   draws a new degree.
//!
//! The mode is fixed for the lifetime of a session. Pitches are assumed to
//! be valid; nothing here fails.

use std::fmt;
use std::str::FromStr;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use super::progress::ScaleProgress;
use super::DisplaySurface;
use crate::midi::{NoteEvent, NoteListener, PlayedNote};
use crate::music::chord::{Chord, TargetChord};
use crate::music::pitch::{pitch_label, pitch_name, Pitch};
use crate::music::scale::{random_degree, random_root_in_octave, PRACTICE_DEGREES};

/// What the player is drilling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Mode {
    /// Play major scales note by note
    #[default]
    Scales,
    /// Play diatonic triads
    Chords,
}

impl FromStr for Mode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "scales" | "scale" => Ok(Mode::Scales),
            "chords" | "chord" => Ok(Mode::Chords),
            other => Err(format!("unknown mode: {:?}", other)),
        }
    }
}

impl TryFrom<String> for Mode {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Scales => f.write_str("scales"),
            Mode::Chords => f.write_str("chords"),
        }
    }
}

/// Resolved startup values for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub mode: Mode,
    /// Lowest root a random scale may start on
    pub baseline: Pitch,
    /// First root
    pub root: Pitch,
    /// Degree indices chords are drawn from
    pub degrees: Vec<usize>,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            mode: Mode::Scales,
            baseline: 48, // C3
            root: 57,     // A3
            degrees: PRACTICE_DEGREES.to_vec(),
        }
    }
}

/// Mode, root and score
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionState {
    pub mode: Mode,
    pub root: Pitch,
    pub correct: u32,
}

/// A running practice session
pub struct Session<D: DisplaySurface, R: Rng = StdRng> {
    state: SessionState,
    baseline: Pitch,
    degrees: Vec<usize>,
    progress: ScaleProgress,
    target: TargetChord,
    held: Chord,
    display: D,
    rng: R,
}

impl<D: DisplaySurface> Session<D, StdRng> {
    /// Start a session seeded from the OS
    pub fn new(settings: SessionSettings, display: D) -> Self {
        Self::with_rng(settings, display, StdRng::from_entropy())
    }

    /// Start a session with a reproducible random sequence
    pub fn seeded(settings: SessionSettings, display: D, seed: u64) -> Self {
        Self::with_rng(settings, display, StdRng::seed_from_u64(seed))
    }
}

impl<D: DisplaySurface, R: Rng> Session<D, R> {
    /// Start a session drawing roots and degrees from `rng`
    pub fn with_rng(settings: SessionSettings, display: D, rng: R) -> Self {
        let SessionSettings {
            mode,
            baseline,
            root,
            degrees,
        } = settings;

        let mut degrees: Vec<usize> = degrees
            .into_iter()
            .filter(|d| PRACTICE_DEGREES.contains(d))
            .collect();
        if degrees.is_empty() {
            degrees = PRACTICE_DEGREES.to_vec();
        }

        let progress = ScaleProgress::major(root);
        let target = TargetChord::on_degree(progress.notes(), degrees[0]);

        let mut session = Self {
            state: SessionState {
                mode,
                root,
                correct: 0,
            },
            baseline,
            degrees,
            progress,
            target,
            held: Chord::new(),
            display,
            rng,
        };
        session.set_root(root);
        session.next_chord();

        info!(%mode, root = %pitch_label(root), "session started");
        session
    }

    /// Deliver an inbound event
    pub fn handle(&mut self, event: &NoteEvent) {
        event.dispatch(self);
    }

    /// Move the key to `root` (chords mode only).
    ///
    /// Regenerates the underlying scale and the chord target, and resets
    /// the degree display to 1. Ignored in scales mode.
    pub fn change_root(&mut self, root: Pitch) {
        if self.state.mode != Mode::Chords {
            warn!(root, "root change ignored outside chords mode");
            return;
        }
        info!(root = %pitch_label(root), "root changed");
        self.set_root(root);
        self.next_chord();
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode
    }

    /// Pitches currently sounding
    pub fn held_notes(&self) -> &Chord {
        &self.held
    }

    /// Scale being played (also the key chords are built in)
    pub fn progress(&self) -> &ScaleProgress {
        &self.progress
    }

    /// Chord the player is asked for
    pub fn target(&self) -> &TargetChord {
        &self.target
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    pub fn display_mut(&mut self) -> &mut D {
        &mut self.display
    }

    /// Tear down the session, returning the display surface
    pub fn into_display(self) -> D {
        self.display
    }

    fn set_root(&mut self, root: Pitch) {
        self.state.root = root;
        self.progress = ScaleProgress::major(root);
        self.display.show_root(pitch_name(root));
        self.display.show_degree(self.progress.current_degree());
    }

    fn next_chord(&mut self) {
        let degree = random_degree(&mut self.rng, &self.degrees);
        self.target = TargetChord::on_degree(self.progress.notes(), degree);
        debug!(
            degree = self.target.label(),
            voicing = ?self.target.voicing(),
            "new chord target"
        );
        if self.state.mode == Mode::Chords {
            self.display.show_chord(self.target.label());
        }
    }

    fn advance_scale(&mut self, pitch: Pitch) {
        let advance = self.progress.try_advance(pitch);
        debug!(pitch, matched = advance.matched, "scale step");

        if advance.completed {
            let root = random_root_in_octave(&mut self.rng, self.baseline);
            info!(
                finished = %pitch_label(self.state.root),
                next = %pitch_label(root),
                "scale complete"
            );
            self.set_root(root);
        } else {
            self.display.show_degree(self.progress.current_degree());
        }
    }

    fn check_chord(&mut self) {
        if !self.target.is_matched_by(&self.held) {
            return;
        }
        self.state.correct += 1;
        info!(
            chord = self.target.label(),
            correct = self.state.correct,
            "chord matched"
        );
        self.display.show_correct(self.state.correct);
        self.next_chord();
    }
}

impl<D: DisplaySurface, R: Rng> NoteListener for Session<D, R> {
    fn note_on(&mut self, note: &PlayedNote) {
        self.held.insert(note.pitch);
        debug!(pitch = note.pitch, note = note.name, octave = note.octave, held = ?self.held, "note on");

        match self.state.mode {
            Mode::Scales => self.advance_scale(note.pitch),
            Mode::Chords => self.check_chord(),
        }
    }

    fn note_off(&mut self, note: &PlayedNote) {
        self.held.remove(&note.pitch);
        debug!(pitch = note.pitch, held = ?self.held, "note off");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::practice::Readout;

    /// Remembers every update in order
    #[derive(Debug, Default)]
    struct Journal {
        updates: Vec<String>,
    }

    impl DisplaySurface for Journal {
        fn show_root(&mut self, name: &str) {
            self.updates.push(format!("root {}", name));
        }

        fn show_degree(&mut self, degree: usize) {
            self.updates.push(format!("degree {}", degree));
        }

        fn show_chord(&mut self, label: &str) {
            self.updates.push(format!("chord {}", label));
        }

        fn show_correct(&mut self, count: u32) {
            self.updates.push(format!("correct {}", count));
        }
    }

    fn settings(mode: Mode, root: Pitch) -> SessionSettings {
        SessionSettings {
            mode,
            root,
            ..SessionSettings::default()
        }
    }

    fn press(session: &mut Session<impl DisplaySurface, impl Rng>, pitches: &[Pitch]) {
        for &p in pitches {
            session.handle(&NoteEvent::on(p));
        }
    }

    fn release(session: &mut Session<impl DisplaySurface, impl Rng>, pitches: &[Pitch]) {
        for &p in pitches {
            session.handle(&NoteEvent::off(p));
        }
    }

    #[test]
    fn test_startup_shows_root_and_degree() {
        let session = Session::seeded(settings(Mode::Scales, 57), Journal::default(), 1);
        assert_eq!(session.display().updates, vec!["root A", "degree 1"]);
        assert_eq!(session.state().root, 57);
        assert_eq!(session.progress().notes()[0], 57);
    }

    #[test]
    fn test_chords_startup_shows_label() {
        let session = Session::seeded(settings(Mode::Chords, 60), Journal::default(), 1);
        let updates = &session.display().updates;
        assert_eq!(updates.len(), 3);
        assert!(updates[2].starts_with("chord "));
        assert_eq!(
            session.target().octave_down(),
            &crate::music::chord::transpose(session.target().voicing(), -12)
        );
    }

    #[test]
    fn test_scale_degrees_advance() {
        let mut session = Session::seeded(settings(Mode::Scales, 60), Readout::default(), 2);
        press(&mut session, &[60, 62, 64]);
        assert_eq!(session.display().degree, 4);

        // wrong note repeats the current degree
        press(&mut session, &[66]);
        assert_eq!(session.display().degree, 4);
        assert_eq!(session.progress().expected(), Some(65));
    }

    #[test]
    fn test_scale_completion_draws_new_root() {
        let mut session = Session::seeded(settings(Mode::Scales, 60), Journal::default(), 3);
        press(&mut session, &[60, 62, 64, 65, 67, 69, 71, 72]);

        let root = session.state().root;
        assert!((48..=59).contains(&root));
        assert_eq!(session.progress().index(), 0);
        assert_eq!(session.progress().notes()[0], root);

        let updates = &session.display().updates;
        let tail: Vec<&str> = updates[updates.len() - 2..]
            .iter()
            .map(String::as_str)
            .collect();
        assert_eq!(tail[0], format!("root {}", pitch_name(root)));
        assert_eq!(tail[1], "degree 1");
    }

    #[test]
    fn test_chord_match_in_either_octave() {
        let mut session = Session::seeded(settings(Mode::Chords, 60), Readout::default(), 4);

        let low: Vec<Pitch> = session.target().octave_down().iter().copied().collect();
        press(&mut session, &low);
        assert_eq!(session.state().correct, 1);
        assert_eq!(session.display().correct, 1);
        release(&mut session, &low);
        assert!(session.held_notes().is_empty());

        let high: Vec<Pitch> = session.target().voicing().iter().copied().collect();
        press(&mut session, &high);
        assert_eq!(session.state().correct, 2);
    }

    #[test]
    fn test_chord_needs_exact_set() {
        let mut session = Session::seeded(settings(Mode::Chords, 60), Readout::default(), 5);
        let mut pitches: Vec<Pitch> = session.target().voicing().iter().copied().collect();

        // an extra note held from before blocks the match
        pitches.insert(0, 30);
        press(&mut session, &pitches);
        assert_eq!(session.state().correct, 0);

        release(&mut session, &[30]);
        // releasing never triggers a match on its own
        assert_eq!(session.state().correct, 0);
    }

    #[test]
    fn test_scales_mode_ignores_chords() {
        let mut session = Session::seeded(settings(Mode::Scales, 60), Readout::default(), 6);
        let chord: Vec<Pitch> = session.target().voicing().iter().copied().collect();
        press(&mut session, &chord);
        assert_eq!(session.state().correct, 0);
    }

    #[test]
    fn test_change_root_in_chords_mode() {
        let mut session = Session::seeded(settings(Mode::Chords, 60), Journal::default(), 7);
        session.display_mut().updates.clear();

        session.change_root(62);
        assert_eq!(session.state().root, 62);
        assert_eq!(session.progress().notes()[0], 62);
        let degree = session.target().degree();
        assert!(session
            .target()
            .voicing()
            .contains(&session.progress().notes()[degree]));

        let updates = &session.display().updates;
        assert_eq!(updates[0], "root D");
        assert_eq!(updates[1], "degree 1");
        assert!(updates[2].starts_with("chord "));
    }

    #[test]
    fn test_change_root_ignored_in_scales_mode() {
        let mut session = Session::seeded(settings(Mode::Scales, 60), Readout::default(), 8);
        session.change_root(62);
        assert_eq!(session.state().root, 60);
    }

    #[test]
    fn test_degree_filter() {
        let settings = SessionSettings {
            mode: Mode::Chords,
            root: 60,
            degrees: vec![4, 6],
            ..SessionSettings::default()
        };
        let mut session = Session::seeded(settings, Readout::default(), 9);
        for _ in 0..20 {
            assert_eq!(session.target().label(), "V");
            let pitches: Vec<Pitch> = session.target().voicing().iter().copied().collect();
            press(&mut session, &pitches);
            release(&mut session, &pitches);
        }
        assert_eq!(session.state().correct, 20);
    }

    #[test]
    fn test_mode_parse() {
        assert_eq!("scales".parse::<Mode>(), Ok(Mode::Scales));
        assert_eq!("Chords".parse::<Mode>(), Ok(Mode::Chords));
        assert!("arpeggios".parse::<Mode>().is_err());
        assert_eq!(Mode::Chords.to_string(), "chords");
    }
}
