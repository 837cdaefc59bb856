// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Cross-platform input backend built on midir.

use std::sync::mpsc::{channel, Receiver};

use anyhow::{anyhow, Result};
use midir::{Ignore, MidiInput, MidiInputConnection};
use tracing::debug;

use super::input::MidiMessage;
use super::{NoteEvent, NoteSource};

/// Note input from a midir port
pub struct MidirInput {
    _connection: MidiInputConnection<()>,
    receiver: Receiver<NoteEvent>,
}

impl MidirInput {
    /// Connect to the input port at `index`
    pub fn new(index: usize) -> Result<Self> {
        let mut midi_in = MidiInput::new("keydrill Input")
            .map_err(|e| anyhow!("Failed to create MIDI client: {}", e))?;
        midi_in.ignore(Ignore::Sysex | Ignore::Time);

        let ports = midi_in.ports();
        let port = ports
            .get(index)
            .ok_or_else(|| anyhow!("MIDI source {} not found", index))?;
        let port_name = midi_in.port_name(port).unwrap_or_default();

        let (sender, receiver) = channel::<NoteEvent>();
        let connection = midi_in
            .connect(
                port,
                "keydrill-input",
                move |_stamp, message, _| {
                    if let Some(event) = MidiMessage::parse(message).and_then(|m| m.to_note_event())
                    {
                        let _ = sender.send(event);
                    }
                },
                (),
            )
            .map_err(|e| anyhow!("Failed to connect to source {}: {}", index, e))?;

        debug!(index, port = %port_name, "connected midir source");

        Ok(Self {
            _connection: connection,
            receiver,
        })
    }
}

impl NoteSource for MidirInput {
    fn poll(&mut self) -> Vec<NoteEvent> {
        self.receiver.try_iter().collect()
    }
}

/// List all available MIDI input ports
pub fn list_sources() -> Vec<(usize, String)> {
    let Ok(midi_in) = MidiInput::new("keydrill Scanner") else {
        return Vec::new();
    };
    midi_in
        .ports()
        .iter()
        .enumerate()
        .filter_map(|(i, port)| midi_in.port_name(port).ok().map(|name| (i, name)))
        .collect()
}
