// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

use anyhow::{anyhow, Context, Result};
use harmonia::config::Notation;
use harmonia::music::{Chord, Element, Extension, Scale};
use std::env;
use tracing::{debug, Level};

/// Number of WPCP candidates printed by --identify-scale
const SCALE_RESULTS: usize = 5;

fn print_usage() {
    println!("harmonia - Spelled music theory toolkit");
    println!();
    println!("Usage: harmonia [--config <PATH>] [--verbose] <COMMAND>");
    println!();
    println!("Commands:");
    println!("  --chord <NAME>                Show a chord's pitches and notes (e.g. Cm7/Eb)");
    println!("  --identify <NOTE>...          Identify chords from notes (e.g. C4 E4 G4)");
    println!("  --scale <ROOT> <RECIPE>       Show a scale's pitches and diatonic triads");
    println!("  --identify-scale <ITEM>...    Rank scales for pitch classes, notes, or chords");
    println!("  --interval <NOTE> <NOTE>      Show the interval from the first note up to the second");
    println!("  --list-recipes                List chord and scale recipe names");
    println!("  --help                        Show this help message");
    println!();
    println!("Options:");
    println!("  --config <PATH>               Load notation settings (YAML or TOML)");
    println!("  --verbose                     Log at debug level");
}

fn join(items: impl IntoIterator<Item = String>) -> String {
    items.into_iter().collect::<Vec<_>>().join(" ")
}

fn show_chord(notation: &Notation, name: &str) -> Result<()> {
    let chord = Chord::parse(name).with_context(|| format!("Invalid chord: {}", name))?;
    let notes = chord.notes(notation.base_octave as i32)?;

    println!("Chord:     {}", chord);
    println!("Recipe:    {}", chord.recipe().unwrap_or("custom"));
    println!("Inversion: {}", chord.inversion());
    println!(
        "Pitches:   {}",
        join(chord.pitches().iter().map(|p| notation.format_pitch_class(p)))
    );
    println!("Notes:     {}", join(notes.iter().map(|n| notation.format_note(n))));
    Ok(())
}

fn identify_chords(notation: &Notation, texts: &[String]) -> Result<()> {
    let notes = texts
        .iter()
        .map(|t| notation.parse_note(t))
        .collect::<Result<Vec<_>>>()?;
    let chords = Chord::identify_from_notes(&notes)?;

    if chords.is_empty() {
        println!("No known chord matches {}", texts.join(" "));
        return Ok(());
    }
    for chord in chords {
        println!("{}", chord);
    }
    Ok(())
}

fn show_scale(notation: &Notation, root: &str, recipe: &str) -> Result<()> {
    let root = notation.parse_pitch_class(root)?;
    let scale = Scale::new(root, recipe).with_context(|| format!("Invalid scale: {}", recipe))?;

    println!("Scale:    {}", scale);
    println!(
        "Pitches:  {}",
        join(scale.pitches().iter().map(|p| notation.format_pitch_class(p)))
    );
    println!("Diatonic: {}", if scale.is_diatonic() { "yes" } else { "no" });
    println!("Triads:");
    for degree in 1..=scale.len() as i32 {
        match scale.chord(degree, Extension::Triad) {
            Ok(chord) => println!("  {:>2}  {}", degree, chord),
            Err(e) => println!("  {:>2}  ({})", degree, e),
        }
    }
    Ok(())
}

fn parse_item(notation: &Notation, text: &str) -> Result<Element> {
    if let Ok(pc) = notation.parse_pitch_class(text) {
        return Ok(Element::PitchClass(pc));
    }
    if let Ok(note) = notation.parse_note(text) {
        return Ok(Element::Note(note));
    }
    Chord::parse(text)
        .map(Element::Chord)
        .map_err(|_| anyhow!("Not a pitch class, note, or chord: {}", text))
}

fn identify_scales(notation: &Notation, texts: &[String]) -> Result<()> {
    let items = texts
        .iter()
        .map(|t| parse_item(notation, t).map(|e| (e, 1.0)))
        .collect::<Result<Vec<_>>>()?;
    let ranked = Scale::identify_wpcp_all(&items, false)?;

    for (scale, score) in ranked.iter().take(SCALE_RESULTS) {
        println!("{:>7.2}  {}", score, scale);
    }
    Ok(())
}

fn show_interval(notation: &Notation, lower: &str, upper: &str) -> Result<()> {
    let lower = notation.parse_note(lower)?;
    let upper = notation.parse_note(upper)?;
    let interval = upper
        .difference(&lower)
        .with_context(|| format!("No interval from {} up to {}", lower, upper))?;

    println!("Interval:  {}", interval);
    println!("Semitones: {}", interval.semitones());
    if !interval.is_compound() {
        println!("Inverted:  {}", interval.complement()?);
    }
    Ok(())
}

fn require(args: &[String], count: usize, flag: &str, what: &str) {
    if args.len() < count {
        eprintln!("Error: {} requires {}", flag, what);
        print_usage();
        std::process::exit(1);
    }
}

fn main() -> Result<()> {
    let raw: Vec<String> = env::args().skip(1).collect();

    let mut verbose = false;
    let mut config_path = None;
    let mut args = Vec::new();
    let mut iter = raw.into_iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--verbose" | "-v" => verbose = true,
            "--config" => {
                config_path = Some(
                    iter.next()
                        .ok_or_else(|| anyhow!("--config requires a file path"))?,
                );
            }
            _ => args.push(arg),
        }
    }

    tracing_subscriber::fmt()
        .with_max_level(if verbose { Level::DEBUG } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let notation = match &config_path {
        Some(path) => Notation::load(path)?,
        None => Notation::default(),
    };
    debug!(?notation, "notation settings");

    if args.is_empty() {
        println!("harmonia - Spelled music theory toolkit");
        println!("Run with --help for usage information");
        return Ok(());
    }

    let rest = &args[1..];
    match args[0].as_str() {
        "--chord" => {
            require(rest, 1, "--chord", "a chord name");
            show_chord(&notation, &rest[0])?;
        }
        "--identify" => {
            require(rest, 1, "--identify", "at least one note");
            identify_chords(&notation, rest)?;
        }
        "--scale" => {
            require(rest, 2, "--scale", "a root and a recipe");
            show_scale(&notation, &rest[0], &rest[1])?;
        }
        "--identify-scale" => {
            require(rest, 1, "--identify-scale", "at least one item");
            identify_scales(&notation, rest)?;
        }
        "--interval" => {
            require(rest, 2, "--interval", "two notes");
            show_interval(&notation, &rest[0], &rest[1])?;
        }
        "--list-recipes" => {
            println!("Chords: {}", Chord::recipe_names().join(" "));
            println!("Scales: {}", Scale::recipe_names().join(" "));
        }
        "--help" | "-h" => {
            print_usage();
        }
        _ => {
            eprintln!("Unknown option: {}", args[0]);
            print_usage();
            std::process::exit(1);
        }
    }

    Ok(())
}
