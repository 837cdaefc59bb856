// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! MIDI input abstraction layer.
//!
//! The practice session only ever sees two events, note-on and note-off,
//! each carrying a pitch. Device backends (Core MIDI, midir) and note
//! scripts are interchangeable sources of those events.

#[cfg(target_os = "macos")]
pub mod coremidi_backend;
pub mod input;
#[cfg(feature = "midir")]
pub mod midir_backend;
pub mod script;

use anyhow::{bail, Result};

use crate::music::pitch::{octave_of, pitch_name, Pitch};

#[cfg(target_os = "macos")]
pub use coremidi_backend::CoreMidiInput;
pub use input::MidiMessage;
#[cfg(feature = "midir")]
pub use midir_backend::MidirInput;
pub use script::NoteScript;

/// A note as reported by the input layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlayedNote {
    /// Absolute pitch (60 = middle C)
    pub pitch: Pitch,
    /// Canonical spelling of the pitch class
    pub name: &'static str,
    /// Octave number (middle C is octave 4)
    pub octave: i32,
}

impl PlayedNote {
    /// Describe a pitch
    pub fn new(pitch: Pitch) -> Self {
        Self {
            pitch,
            name: pitch_name(pitch),
            octave: octave_of(pitch),
        }
    }
}

/// Inbound note events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    NoteOn(PlayedNote),
    NoteOff(PlayedNote),
}

impl NoteEvent {
    /// Note-on for a pitch
    pub fn on(pitch: Pitch) -> Self {
        NoteEvent::NoteOn(PlayedNote::new(pitch))
    }

    /// Note-off for a pitch
    pub fn off(pitch: Pitch) -> Self {
        NoteEvent::NoteOff(PlayedNote::new(pitch))
    }

    /// The note carried by this event
    pub fn note(&self) -> &PlayedNote {
        match self {
            NoteEvent::NoteOn(note) | NoteEvent::NoteOff(note) => note,
        }
    }

    /// Deliver this event to a listener
    pub fn dispatch<L: NoteListener + ?Sized>(&self, listener: &mut L) {
        match self {
            NoteEvent::NoteOn(note) => listener.note_on(note),
            NoteEvent::NoteOff(note) => listener.note_off(note),
        }
    }
}

/// Receiver of note events.
///
/// Events are delivered in arrival order; implementations run each handler
/// to completion.
pub trait NoteListener {
    /// A key was pressed
    fn note_on(&mut self, note: &PlayedNote);

    /// A key was released
    fn note_off(&mut self, note: &PlayedNote);
}

/// Anything that yields note events
pub trait NoteSource {
    /// Drain all pending events (non-blocking)
    fn poll(&mut self) -> Vec<NoteEvent>;

    /// No further events will ever arrive
    fn is_exhausted(&self) -> bool {
        false
    }
}

/// MIDI message constants
pub mod messages {
    // Channel Voice Messages (upper nibble, lower nibble is channel 0-15)
    pub const NOTE_OFF: u8 = 0x80;
    pub const NOTE_ON: u8 = 0x90;
    pub const CONTROL_CHANGE: u8 = 0xB0;
}

/// List available MIDI sources on the compiled-in backend
pub fn list_sources() -> Vec<(usize, String)> {
    #[cfg(target_os = "macos")]
    {
        coremidi_backend::list_sources()
    }
    #[cfg(all(not(target_os = "macos"), feature = "midir"))]
    {
        midir_backend::list_sources()
    }
    #[cfg(all(not(target_os = "macos"), not(feature = "midir")))]
    {
        Vec::new()
    }
}

/// Print all available MIDI sources to stdout
pub fn print_sources() {
    let sources = list_sources();
    if sources.is_empty() {
        println!("No MIDI sources found.");
    } else {
        println!("Available MIDI sources (inputs):");
        for (i, name) in sources {
            println!("  {}: {}", i, name);
        }
    }
}

/// Open a device source by index on the compiled-in backend
pub fn open_source(index: usize) -> Result<Box<dyn NoteSource>> {
    #[cfg(target_os = "macos")]
    {
        Ok(Box::new(CoreMidiInput::new(index)?))
    }
    #[cfg(all(not(target_os = "macos"), feature = "midir"))]
    {
        Ok(Box::new(MidirInput::new(index)?))
    }
    #[cfg(all(not(target_os = "macos"), not(feature = "midir")))]
    {
        bail!(
            "MIDI source {} unavailable: built without a device backend (enable the `midir` feature)",
            index
        )
    }
}

/// Find a device source index whose name contains `name`
pub fn find_source(name: &str) -> Result<usize> {
    match list_sources().into_iter().find(|(_, n)| n.contains(name)) {
        Some((index, _)) => Ok(index),
        None => bail!("MIDI source matching {:?} not found", name),
    }
}
