// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Notes: spelled pitch classes at a specific octave.
//!
//! Arithmetic works on two coordinates at once: diatonic steps (letter
//! position counted from C0) decide the spelling, and the chromatic number
//! decides the sounding pitch. The accidental is whatever reconciles them.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::error::{Result, TheoryError};
use super::interval::Interval;
use super::pitch_class::{Glyphs, Letter, PitchClass, DEFAULT_MAX_ACCIDENTALS};

/// Lowest and highest written octave
pub const MIN_OCTAVE: i32 = 0;
pub const MAX_OCTAVE: i32 = 9;

/// Chromatic number of A4, the tuning reference
const A4_NUMBER: i32 = 57;
const A4_FREQUENCY: f64 = 440.0;

/// A pitch class at a specific octave
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Note {
    pitch_class: PitchClass,
    octave: i8,
}

impl Note {
    /// Create a note, rejecting octaves outside 0-9
    pub fn new(pitch_class: PitchClass, octave: i32) -> Result<Self> {
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            return Err(TheoryError::argument(format!(
                "octave {} is outside {}..={}",
                octave, MIN_OCTAVE, MAX_OCTAVE
            )));
        }
        Ok(Self {
            pitch_class,
            octave: octave as i8,
        })
    }

    /// C0, the origin used to project interval arithmetic onto notes
    pub fn reference() -> Self {
        Self {
            pitch_class: PitchClass::natural_of(Letter::C),
            octave: 0,
        }
    }

    /// Parse "C4", "F#3", "B♭5"
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_with_limit(s, DEFAULT_MAX_ACCIDENTALS)
    }

    /// Parse with an explicit accidental limit
    pub fn parse_with_limit(s: &str, limit: u8) -> Result<Self> {
        let digits_at = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| TheoryError::parse(format!("missing octave in '{}'", s)))?;
        let (pitch_text, octave_text) = s.split_at(digits_at);
        if pitch_text.is_empty() {
            return Err(TheoryError::parse(format!("missing pitch in '{}'", s)));
        }
        if !octave_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(TheoryError::parse(format!("invalid octave in '{}'", s)));
        }
        let octave: i32 = octave_text
            .parse()
            .map_err(|_| TheoryError::parse(format!("invalid octave in '{}'", s)))?;
        let pitch_class = PitchClass::parse_with_limit(pitch_text, limit)?;
        Self::new(pitch_class, octave).map_err(TheoryError::into_parse)
    }

    /// Every spelling of a chromatic number (C0 = 0), simplest first
    pub fn from_number(number: i32) -> &'static [Note] {
        SpellingIndex::global().spellings(number)
    }

    /// Every spelling of a MIDI note number (C4 = 60)
    pub fn from_midi(midi: u8) -> &'static [Note] {
        Self::from_number(midi as i32 - 12)
    }

    pub fn pitch_class(&self) -> PitchClass {
        self.pitch_class
    }

    pub fn octave(&self) -> i32 {
        self.octave as i32
    }

    /// Absolute chromatic height, C0 = 0
    pub fn number(&self) -> i32 {
        self.pitch_class.chromatic_number() + self.octave() * 12
    }

    /// MIDI note number (C4 = 60)
    pub fn midi_note(&self) -> i32 {
        self.number() + 12
    }

    /// Equal-tempered frequency in Hz, A4 = 440
    pub fn frequency(&self) -> f64 {
        A4_FREQUENCY * 2f64.powf((self.number() - A4_NUMBER) as f64 / 12.0)
    }

    /// Diatonic position counted from C0
    fn steps(&self) -> i32 {
        self.octave() * 7 + self.pitch_class.diatonic_index()
    }

    /// Spell the note at a diatonic position with a given chromatic number
    fn spell(steps: i32, number: i32) -> Result<Self> {
        let letter = Letter::from_index(steps);
        let octave = steps.div_euclid(7);
        if !(MIN_OCTAVE..=MAX_OCTAVE).contains(&octave) {
            return Err(TheoryError::operation(format!(
                "result octave {} is outside {}..={}",
                octave, MIN_OCTAVE, MAX_OCTAVE
            )));
        }
        let accidentals = number - octave * 12 - letter.base_number();
        let pitch_class = PitchClass::new(letter, accidentals).map_err(|_| {
            TheoryError::operation(format!(
                "result needs {} accidentals on {}",
                accidentals,
                letter.as_char()
            ))
        })?;
        Ok(Self {
            pitch_class,
            octave: octave as i8,
        })
    }

    /// The note an interval above this one
    pub fn add_interval(&self, interval: &Interval) -> Result<Self> {
        self.moved(interval, 1)
    }

    /// The note an interval below this one
    pub fn sub_interval(&self, interval: &Interval) -> Result<Self> {
        self.moved(interval, -1)
    }

    /// Move by an interval in `direction` (1 up, -1 down) in one step, so
    /// compound intervals never pass through an intermediate spelling
    fn moved(&self, interval: &Interval, direction: i32) -> Result<Self> {
        let out_of_range = || {
            TheoryError::operation(format!("{} from {} leaves the note range", interval, self))
        };
        let steps = i32::try_from(interval.size() - 1)
            .ok()
            .and_then(|s| self.steps().checked_add(s * direction))
            .ok_or_else(out_of_range)?;
        let number = self
            .number()
            .checked_add(interval.semitones() * direction)
            .ok_or_else(out_of_range)?;
        Self::spell(steps, number)
    }

    /// Interval from `lower` up to this note.
    ///
    /// The difference is directed: it fails when this note lies below
    /// `lower` by more than a diminished unison.
    pub fn difference(&self, lower: &Note) -> Result<Interval> {
        let steps = self.steps() - lower.steps();
        let semitones = self.number() - lower.number();
        if steps < 0 || semitones < -1 {
            return Err(TheoryError::operation(format!(
                "{} lies below {}",
                self, lower
            )));
        }
        Interval::from_size_and_semitones(steps as u32 + 1, semitones).ok_or_else(|| {
            TheoryError::operation(format!("no interval spells {} above {}", self, lower))
        })
    }

    pub fn sharp(&self) -> Result<Self> {
        Self::new(self.pitch_class.sharp()?, self.octave())
    }

    pub fn flat(&self) -> Result<Self> {
        Self::new(self.pitch_class.flat()?, self.octave())
    }

    pub fn natural(&self) -> Self {
        Self {
            pitch_class: self.pitch_class.natural(),
            octave: self.octave,
        }
    }

    /// Lilypond absolute pitch, with octave 3 unmarked ("c" = C3, "fis''" = F#5)
    pub fn to_lilypond(&self) -> String {
        let mut out = String::new();
        out.push(self.pitch_class.letter().as_char().to_ascii_lowercase());
        let accidentals = self.pitch_class.accidentals();
        let suffix = if accidentals > 0 { "is" } else { "es" };
        out.push_str(&suffix.repeat(accidentals.unsigned_abs() as usize));
        let marks = self.octave() - 3;
        let mark = if marks > 0 { "'" } else { "," };
        out.push_str(&mark.repeat(marks.unsigned_abs() as usize));
        out
    }

    /// Render with the given glyph set
    pub fn render(&self, glyphs: Glyphs) -> String {
        format!("{}{}", self.pitch_class.render(glyphs), self.octave)
    }
}

impl Ord for Note {
    fn cmp(&self, other: &Self) -> Ordering {
        self.octave
            .cmp(&other.octave)
            .then(self.pitch_class.cmp(&other.pitch_class))
    }
}

impl PartialOrd for Note {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Note {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.pitch_class, self.octave)
    }
}

/// Inverse map from chromatic number to every spelling of it
#[derive(Debug, Clone, Default)]
pub struct SpellingIndex {
    by_number: HashMap<i32, Vec<Note>>,
}

static SPELLINGS: Lazy<SpellingIndex> = Lazy::new(SpellingIndex::build);

impl SpellingIndex {
    /// Enumerate every note within the default accidental limit
    pub fn build() -> Self {
        let mut by_number: HashMap<i32, Vec<Note>> = HashMap::new();
        for octave in MIN_OCTAVE..=MAX_OCTAVE {
            for pitch_class in PitchClass::within(DEFAULT_MAX_ACCIDENTALS) {
                let note = Note {
                    pitch_class,
                    octave: octave as i8,
                };
                by_number.entry(note.number()).or_default().push(note);
            }
        }
        for notes in by_number.values_mut() {
            notes.sort_by_key(|n| (n.pitch_class.accidentals().abs(), n.pitch_class.letter()));
        }
        debug!(numbers = by_number.len(), "built note spelling index");
        Self { by_number }
    }

    /// Shared index, built on first use
    pub fn global() -> &'static SpellingIndex {
        &SPELLINGS
    }

    pub fn spellings(&self, number: i32) -> &[Note] {
        self.by_number
            .get(&number)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }
}
