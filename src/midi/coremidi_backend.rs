// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Core MIDI input backend (macOS).

use std::sync::mpsc::{self, Receiver, Sender};

use anyhow::{anyhow, Result};
use coremidi::{Client, InputPort, PacketList, Source, Sources};
use tracing::debug;

use super::input::MidiMessage;
use super::{NoteEvent, NoteSource};

/// Note input from a Core MIDI source
pub struct CoreMidiInput {
    _client: Client,
    _input_port: InputPort,
    receiver: Receiver<NoteEvent>,
}

impl CoreMidiInput {
    /// Create a new MIDI input connected to the specified source
    pub fn new(source_index: usize) -> Result<Self> {
        let client = Client::new("keydrill Input")
            .map_err(|e| anyhow!("Failed to create MIDI client: {:?}", e))?;

        let source = Source::from_index(source_index)
            .ok_or_else(|| anyhow!("MIDI source {} not found", source_index))?;

        let (tx, rx): (Sender<NoteEvent>, Receiver<NoteEvent>) = mpsc::channel();

        let input_port = client
            .input_port("keydrill Input Port", move |packet_list: &PacketList| {
                for packet in packet_list.iter() {
                    if let Some(event) =
                        MidiMessage::parse(packet.data()).and_then(|m| m.to_note_event())
                    {
                        let _ = tx.send(event);
                    }
                }
            })
            .map_err(|e| anyhow!("Failed to create input port: {:?}", e))?;

        input_port
            .connect_source(&source)
            .map_err(|e| anyhow!("Failed to connect to source: {:?}", e))?;

        debug!(source_index, "connected Core MIDI source");

        Ok(Self {
            _client: client,
            _input_port: input_port,
            receiver: rx,
        })
    }
}

impl NoteSource for CoreMidiInput {
    fn poll(&mut self) -> Vec<NoteEvent> {
        self.receiver.try_iter().collect()
    }
}

/// List all available MIDI sources
pub fn list_sources() -> Vec<(usize, String)> {
    Sources
        .into_iter()
        .enumerate()
        .map(|(i, source)| {
            let name = source.display_name().unwrap_or_else(|| format!("Unknown {}", i));
            (i, name)
        })
        .collect()
}
