// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Performance benchmarks for harmonia
//!
//! Run with: cargo bench
//!
//! These benchmarks measure:
//! - Text parsing of notes and chords
//! - Spelled note arithmetic
//! - Chord identification against the shared index
//! - Scale ranking by weighted pitch-class profile

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use harmonia::music::{Chord, ChordIndex, Element, Interval, Note, PitchClass, Scale};

/// Benchmark parsing of the common text forms
fn bench_parsing(c: &mut Criterion) {
    let mut group = c.benchmark_group("parse");

    group.bench_function("note", |b| {
        b.iter(|| {
            let mut total = 0;
            for text in ["C4", "F#3", "Bb5", "E♭2", "G𝄪6"] {
                total += Note::parse(black_box(text)).map(|n| n.number()).unwrap_or(0);
            }
            black_box(total)
        })
    });

    group.bench_function("chord", |b| {
        b.iter(|| {
            let mut total = 0;
            for text in ["C", "Ebm7", "F#ø7", "Bbmaj9", "Am/C"] {
                total += Chord::parse(black_box(text)).map(|c| c.len()).unwrap_or(0);
            }
            black_box(total)
        })
    });

    group.finish();
}

/// Benchmark note plus interval across simple and compound sizes
fn bench_note_arithmetic(c: &mut Criterion) {
    let mut group = c.benchmark_group("note_arithmetic");
    let start = Note::parse("C2").unwrap();

    for text in ["M3", "P5", "m10", "M17"] {
        let interval = Interval::parse(text).unwrap();
        group.bench_with_input(BenchmarkId::new("add", text), &interval, |b, interval| {
            b.iter(|| black_box(start).add_interval(black_box(interval)))
        });
    }

    let upper = Note::parse("G#5").unwrap();
    group.bench_function("difference", |b| {
        b.iter(|| black_box(upper).difference(black_box(&start)))
    });

    group.bench_function("interval_add", |b| {
        let m3 = Interval::parse("m3").unwrap();
        let p5 = Interval::parse("P5").unwrap();
        b.iter(|| black_box(m3).add(black_box(&p5)))
    });

    group.finish();
}

/// Benchmark chord identification from notes and from intervals
fn bench_chord_identification(c: &mut Criterion) {
    let mut group = c.benchmark_group("chord_identify");
    let index = ChordIndex::global();

    let voicings: [(&str, &[&str]); 3] = [
        ("triad", &["C4", "E4", "G4"]),
        ("inverted_seventh", &["F3", "G3", "B3", "D4"]),
        ("spread_ninth", &["D2", "F3", "C4", "E4", "A4"]),
    ];
    for (name, texts) in voicings {
        let notes: Vec<Note> = texts.iter().map(|t| Note::parse(t).unwrap()).collect();
        group.bench_with_input(BenchmarkId::new("notes", name), &notes, |b, notes| {
            b.iter(|| index.identify_notes(black_box(notes)))
        });
    }

    let intervals: Vec<Interval> = ["m3", "d5", "m7"]
        .iter()
        .map(|t| Interval::parse(t).unwrap())
        .collect();
    group.bench_function("intervals", |b| {
        b.iter(|| index.identify_intervals(black_box(&intervals)))
    });

    group.bench_function("build_index", |b| {
        b.iter(|| ChordIndex::build(harmonia::music::chord::catalogue()))
    });

    group.finish();
}

/// Benchmark scale ranking against growing evidence
fn bench_scale_ranking(c: &mut Criterion) {
    let mut group = c.benchmark_group("scale_rank");

    let progression: Vec<(Element, f64)> = ["C", "Am", "F", "G7"]
        .iter()
        .map(|t| (Element::Chord(Chord::parse(t).unwrap()), 1.0))
        .collect();
    group.bench_function("wpcp_progression", |b| {
        b.iter(|| Scale::identify_wpcp(black_box(&progression), false))
    });

    for count in [3, 7, 12] {
        let items: Vec<(Element, f64)> = PitchClass::all(None)
            .unwrap()
            .into_iter()
            .step_by(2)
            .take(count)
            .map(|p| (Element::PitchClass(p), 1.0))
            .collect();
        group.bench_with_input(BenchmarkId::new("wpcp_pitches", count), &items, |b, items| {
            b.iter(|| Scale::identify_wpcp_all(black_box(items), true))
        });
    }

    let members: Vec<Element> = ["C", "E", "G"]
        .iter()
        .map(|t| Element::PitchClass(PitchClass::parse(t).unwrap()))
        .collect();
    group.bench_function("membership", |b| {
        b.iter(|| Scale::identify(black_box(&members), false))
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_parsing,
    bench_note_arithmetic,
    bench_chord_identification,
    bench_scale_ranking,
);

criterion_main!(benches);
