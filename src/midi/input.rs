// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Parsing of raw MIDI bytes from input devices.

use super::{messages, NoteEvent};
use crate::music::pitch::Pitch;

/// Parsed MIDI message types
#[derive(Debug, Clone, PartialEq)]
pub enum MidiMessage {
    /// Note On: channel (0-15), note (0-127), velocity (1-127)
    NoteOn { channel: u8, note: u8, velocity: u8 },
    /// Note Off: channel (0-15), note (0-127), velocity (0-127)
    NoteOff { channel: u8, note: u8, velocity: u8 },
    /// Control Change: channel (0-15), controller (0-127), value (0-127)
    ControlChange { channel: u8, controller: u8, value: u8 },
    /// Anything the trainer does not care about
    Unknown(Vec<u8>),
}

impl MidiMessage {
    /// Parse raw MIDI bytes into a MidiMessage
    pub fn parse(data: &[u8]) -> Option<Self> {
        if data.is_empty() {
            return None;
        }

        let status = data[0];
        let msg_type = status & 0xF0;
        let channel = status & 0x0F;

        match msg_type {
            messages::NOTE_OFF if data.len() >= 3 => Some(MidiMessage::NoteOff {
                channel,
                note: data[1] & 0x7F,
                velocity: data[2] & 0x7F,
            }),
            messages::NOTE_ON if data.len() >= 3 => {
                let velocity = data[2] & 0x7F;
                // Note On with velocity 0 is equivalent to Note Off
                if velocity == 0 {
                    Some(MidiMessage::NoteOff {
                        channel,
                        note: data[1] & 0x7F,
                        velocity: 0,
                    })
                } else {
                    Some(MidiMessage::NoteOn {
                        channel,
                        note: data[1] & 0x7F,
                        velocity,
                    })
                }
            }
            messages::CONTROL_CHANGE if data.len() >= 3 => Some(MidiMessage::ControlChange {
                channel,
                controller: data[1] & 0x7F,
                value: data[2] & 0x7F,
            }),
            _ => Some(MidiMessage::Unknown(data.to_vec())),
        }
    }

    /// The note event carried by this message, if any (all channels)
    pub fn to_note_event(&self) -> Option<NoteEvent> {
        match *self {
            MidiMessage::NoteOn { note, .. } => Some(NoteEvent::on(Pitch::from(note))),
            MidiMessage::NoteOff { note, .. } => Some(NoteEvent::off(Pitch::from(note))),
            _ => None,
        }
    }
}

/// Decode every note event in a batch of raw messages
pub fn note_events<'a, I>(packets: I) -> Vec<NoteEvent>
where
    I: IntoIterator<Item = &'a [u8]>,
{
    packets
        .into_iter()
        .filter_map(MidiMessage::parse)
        .filter_map(|msg| msg.to_note_event())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_note_on() {
        let msg = MidiMessage::parse(&[0x90, 60, 100]);
        assert_eq!(
            msg,
            Some(MidiMessage::NoteOn {
                channel: 0,
                note: 60,
                velocity: 100
            })
        );
    }

    #[test]
    fn test_parse_note_on_velocity_zero() {
        // Note On with velocity 0 should be treated as Note Off
        let msg = MidiMessage::parse(&[0x93, 60, 0]);
        assert_eq!(
            msg,
            Some(MidiMessage::NoteOff {
                channel: 3,
                note: 60,
                velocity: 0
            })
        );
    }

    #[test]
    fn test_parse_note_off() {
        let msg = MidiMessage::parse(&[0x80, 60, 64]);
        assert_eq!(
            msg,
            Some(MidiMessage::NoteOff {
                channel: 0,
                note: 60,
                velocity: 64
            })
        );
    }

    #[test]
    fn test_parse_other_messages() {
        assert_eq!(
            MidiMessage::parse(&[0xB0, 64, 127]),
            Some(MidiMessage::ControlChange {
                channel: 0,
                controller: 64,
                value: 127
            })
        );
        assert_eq!(
            MidiMessage::parse(&[0xF8]),
            Some(MidiMessage::Unknown(vec![0xF8]))
        );
        assert_eq!(MidiMessage::parse(&[]), None);
    }

    #[test]
    fn test_truncated_note_is_unknown() {
        assert_eq!(
            MidiMessage::parse(&[0x90, 60]),
            Some(MidiMessage::Unknown(vec![0x90, 60]))
        );
    }

    #[test]
    fn test_to_note_event() {
        let on = MidiMessage::parse(&[0x90, 64, 90]).unwrap();
        assert_eq!(on.to_note_event(), Some(NoteEvent::on(64)));

        let off = MidiMessage::parse(&[0x90, 64, 0]).unwrap();
        assert_eq!(off.to_note_event(), Some(NoteEvent::off(64)));

        let cc = MidiMessage::parse(&[0xB0, 1, 10]).unwrap();
        assert_eq!(cc.to_note_event(), None);
    }

    #[test]
    fn test_note_events_batch() {
        let packets: [&[u8]; 3] = [&[0x90, 60, 100], &[0xF8], &[0x80, 60, 0]];
        assert_eq!(
            note_events(packets),
            vec![NoteEvent::on(60), NoteEvent::off(60)]
        );
    }
}
