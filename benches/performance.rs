// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for keydrill
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Chord matching against held notes
//! - Note handling through a full session
//! - Raw MIDI decoding
//! - Note script parsing

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use keydrill::midi::input::note_events;
use keydrill::midi::{MidiMessage, NoteScript};
use keydrill::music::{is_exact_match, major_scale, matches_either_octave, Chord, TargetChord};
use keydrill::{Mode, NoteEvent, Readout, Session, SessionSettings};

/// Benchmark held-note comparison (runs on every note-on in chords mode)
fn bench_chord_matching(c: &mut Criterion) {
    let mut group = c.benchmark_group("chord_matching");
    let target = TargetChord::on_degree(&major_scale(60), 4);

    for size in [1usize, 3, 10].iter() {
        let held: Chord = target.voicing().iter().copied().chain(36..).take(*size).collect();
        group.bench_with_input(BenchmarkId::new("exact", size), &held, |b, held| {
            b.iter(|| black_box(is_exact_match(black_box(held), target.voicing())))
        });
        group.bench_with_input(BenchmarkId::new("either_octave", size), &held, |b, held| {
            b.iter(|| {
                black_box(matches_either_octave(
                    black_box(held),
                    target.voicing(),
                    target.octave_down(),
                ))
            })
        });
    }

    group.finish();
}

/// Benchmark note events through a session in each mode
fn bench_session(c: &mut Criterion) {
    let mut group = c.benchmark_group("session");

    group.bench_function("scales_octave", |b| {
        let settings = SessionSettings {
            mode: Mode::Scales,
            root: 60,
            ..SessionSettings::default()
        };
        let mut session = Session::seeded(settings, Readout::default(), 42);
        b.iter(|| {
            let scale = session.progress().notes().to_vec();
            for pitch in scale {
                session.handle(&NoteEvent::on(pitch));
                session.handle(&NoteEvent::off(pitch));
            }
            black_box(session.state())
        })
    });

    group.bench_function("chords_match", |b| {
        let settings = SessionSettings {
            mode: Mode::Chords,
            root: 60,
            ..SessionSettings::default()
        };
        let mut session = Session::seeded(settings, Readout::default(), 42);
        b.iter(|| {
            let target = session.target().clone();
            for &pitch in target.octave_down() {
                session.handle(&NoteEvent::on(pitch));
            }
            for &pitch in target.octave_down() {
                session.handle(&NoteEvent::off(pitch));
            }
            black_box(session.state().correct)
        })
    });

    group.finish();
}

/// Benchmark raw MIDI message parsing
fn bench_midi_parsing(c: &mut Criterion) {
    let note_on = [0x90u8, 60, 100];
    let note_off = [0x80u8, 60, 0];
    let cc = [0xB0u8, 74, 64];

    c.bench_function("midi_parse_note_on", |b| {
        b.iter(|| black_box(MidiMessage::parse(black_box(&note_on))))
    });

    c.bench_function("midi_parse_cc", |b| {
        b.iter(|| black_box(MidiMessage::parse(black_box(&cc))))
    });

    let packets: Vec<&[u8]> = (0..64)
        .map(|i| if i % 2 == 0 { &note_on[..] } else { &note_off[..] })
        .collect();
    c.bench_function("midi_note_events_batch", |b| {
        b.iter(|| black_box(note_events(packets.iter().copied())))
    });
}

/// Benchmark note script parsing
fn bench_script_parsing(c: &mut Criterion) {
    let mut text = String::from("# drill\n");
    for _ in 0..100 {
        text.push_str("chord C3 E3 G3\nrelease\non 60\noff C#4\n");
    }

    c.bench_function("script_parse_400_lines", |b| {
        b.iter(|| black_box(NoteScript::parse(black_box(&text))))
    });
}

criterion_group!(
    benches,
    bench_chord_matching,
    bench_session,
    bench_midi_parsing,
    bench_script_parsing,
);

criterion_main!(benches);
