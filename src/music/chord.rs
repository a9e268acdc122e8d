// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Chords: a root pitch class plus an interval recipe.
//!
//! Chords are built from named recipes (with shorthand aliases) or from
//! explicit interval lists, can be inverted, and can be identified in
//! reverse from a set of notes or intervals above a bass.

use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap, HashSet};
use std::fmt;
use std::hash::{Hash, Hasher};

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use super::element::Element;
use super::error::{Result, TheoryError};
use super::interval::Interval;
use super::note::{Note, SpellingIndex};
use super::pitch_class::PitchClass;
use super::recipe::{spell_pitches, AliasTable, RecipeBook, RecipeTable};

/// Octave at which chord and scale pitches are materialized
pub const BASE_OCTAVE: i32 = 4;

const CHORD_RECIPES: RecipeTable = &[
    // Triads
    ("maj", &["P1", "M3", "P5"]),
    ("min", &["P1", "m3", "P5"]),
    ("aug", &["P1", "M3", "A5"]),
    ("dim", &["P1", "m3", "d5"]),
    ("sus2", &["P1", "M2", "P5"]),
    ("sus4", &["P1", "P4", "P5"]),
    ("open5", &["P1", "P5"]),
    // Sevenths
    ("dom7", &["P1", "M3", "P5", "m7"]),
    ("min7", &["P1", "m3", "P5", "m7"]),
    ("maj7", &["P1", "M3", "P5", "M7"]),
    ("aug7", &["P1", "M3", "A5", "m7"]),
    ("dim7", &["P1", "m3", "d5", "d7"]),
    ("min7dim5", &["P1", "m3", "d5", "m7"]),
    ("minmaj7", &["P1", "m3", "P5", "M7"]),
    ("7sus2", &["P1", "M2", "P5", "m7"]),
    ("7sus4", &["P1", "P4", "P5", "m7"]),
    // Sixths
    ("maj6", &["P1", "M3", "P5", "M6"]),
    ("min6", &["P1", "m3", "P5", "M6"]),
    // Extended
    ("add9", &["P1", "M3", "P5", "M9"]),
    ("dom9", &["P1", "M3", "P5", "m7", "M9"]),
    ("min9", &["P1", "m3", "P5", "m7", "M9"]),
    ("maj9", &["P1", "M3", "P5", "M7", "M9"]),
    ("aug9", &["P1", "M3", "A5", "m7", "M9"]),
    ("dim9", &["P1", "m3", "d5", "d7", "M9"]),
    ("dom11", &["P1", "M3", "P5", "m7", "M9", "P11"]),
    ("min11", &["P1", "m3", "P5", "m7", "M9", "P11"]),
    ("maj11", &["P1", "M3", "P5", "M7", "M9", "P11"]),
    ("aug11", &["P1", "M3", "A5", "m7", "M9", "P11"]),
    ("dim11", &["P1", "m3", "d5", "d7", "M9", "P11"]),
    ("dom13", &["P1", "M3", "P5", "m7", "M9", "P11", "M13"]),
    ("min13", &["P1", "m3", "P5", "m7", "M9", "P11", "M13"]),
    ("maj13", &["P1", "M3", "P5", "M7", "M9", "P11", "M13"]),
    ("aug13", &["P1", "M3", "A5", "m7", "M9", "P11", "M13"]),
    ("dim13", &["P1", "m3", "d5", "d7", "M9", "P11", "M13"]),
];

const CHORD_ALIASES: AliasTable = &[
    ("M", "maj"),
    ("m", "min"),
    ("+", "aug"),
    ("°", "dim"),
    ("o", "dim"),
    ("sus", "sus4"),
    ("5", "open5"),
    ("7", "dom7"),
    ("m7", "min7"),
    ("M7", "maj7"),
    ("Δ7", "maj7"),
    ("+7", "aug7"),
    ("°7", "dim7"),
    ("o7", "dim7"),
    ("m7b5", "min7dim5"),
    ("ø7", "min7dim5"),
    ("ø", "min7dim5"),
    ("half_diminished", "min7dim5"),
    ("mM7", "minmaj7"),
    ("6", "maj6"),
    ("m6", "min6"),
    ("9", "dom9"),
    ("m9", "min9"),
    ("M9", "maj9"),
    ("11", "dom11"),
    ("m11", "min11"),
    ("M11", "maj11"),
    ("13", "dom13"),
    ("m13", "min13"),
    ("M13", "maj13"),
];

static CATALOGUE: Lazy<RecipeBook> = Lazy::new(|| {
    RecipeBook::load(CHORD_RECIPES, CHORD_ALIASES).expect("built-in chord recipes are valid")
});

/// The built-in chord catalogue
pub fn catalogue() -> &'static RecipeBook {
    &CATALOGUE
}

/// A root pitch class plus ascending intervals, optionally inverted
#[derive(Debug, Clone, Serialize)]
#[serde(into = "String")]
pub struct Chord {
    root: PitchClass,
    recipe: Option<&'static str>,
    /// Root-position intervals, ascending from P1
    intervals: Vec<Interval>,
    /// Root-position pitches, parallel to `intervals`
    pitches: Vec<PitchClass>,
    inversion: usize,
}

impl Chord {
    /// Build from a recipe name or alias
    pub fn new(root: PitchClass, name: &str) -> Result<Self> {
        let recipe = catalogue()
            .resolve(name)
            .ok_or_else(|| TheoryError::argument(format!("unknown chord recipe '{}'", name)))?;
        Self::build(root, Some(recipe.name), recipe.intervals.clone())
    }

    /// Build from explicit intervals; P1 is implied and order is irrelevant
    pub fn from_intervals(root: PitchClass, mut intervals: Vec<Interval>) -> Result<Self> {
        intervals.push(Interval::unison());
        intervals.sort();
        intervals.dedup();
        let recipe = catalogue().find_by_intervals(&intervals).map(|r| r.name);
        Self::build(root, recipe, intervals)
    }

    /// Build from interval spellings such as `["M3", "P5"]`
    pub fn from_interval_texts(root: PitchClass, texts: &[&str]) -> Result<Self> {
        let intervals = texts
            .iter()
            .map(|t| Interval::parse(t))
            .collect::<Result<Vec<_>>>()?;
        Self::from_intervals(root, intervals)
    }

    /// Build from a heterogeneous list; only interval elements are accepted
    pub fn from_elements(root: PitchClass, elements: &[Element]) -> Result<Self> {
        let intervals = elements
            .iter()
            .map(|e| match e {
                Element::Interval(i) => Ok(*i),
                other => Err(TheoryError::argument(format!(
                    "expected an interval in chord recipe, got {}",
                    other.kind()
                ))),
            })
            .collect::<Result<Vec<_>>>()?;
        Self::from_intervals(root, intervals)
    }

    fn build(root: PitchClass, recipe: Option<&'static str>, intervals: Vec<Interval>) -> Result<Self> {
        let pitches = spell_pitches(root, &intervals, "chord")?;
        Ok(Self {
            root,
            recipe,
            intervals,
            pitches,
            inversion: 0,
        })
    }

    /// Parse "C", "Cmaj7", "F#m7b5", "Bb/D", "Gdom7/F"
    pub fn parse(s: &str) -> Result<Self> {
        if let Some((base, bass)) = s.split_once('/') {
            let chord = Self::parse(base)?;
            let bass = PitchClass::parse(bass)?;
            let position = chord
                .pitches
                .iter()
                .position(|p| *p == bass)
                .ok_or_else(|| TheoryError::parse(format!("{} is not in {}", bass, base)))?;
            return chord.invert(position);
        }

        for (suffix, name) in catalogue().suffixes() {
            if let Some(prefix) = s.strip_suffix(suffix) {
                if let Ok(root) = PitchClass::parse(prefix) {
                    return Self::new(root, name);
                }
            }
        }
        let root = PitchClass::parse(s)
            .map_err(|_| TheoryError::parse(format!("unrecognized chord '{}'", s)))?;
        Self::new(root, "maj")
    }

    /// Canonical names of every built-in recipe
    pub fn recipe_names() -> Vec<&'static str> {
        catalogue().recipes().iter().map(|r| r.name).collect()
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    /// Canonical recipe name, if the intervals match a built-in recipe
    pub fn recipe(&self) -> Option<&'static str> {
        self.recipe
    }

    pub fn inversion(&self) -> usize {
        self.inversion
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Root-position intervals
    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Invert `n` more times from the current voicing.
    ///
    /// Inversions compose: `invert(1)` on a first-inversion triad gives the
    /// second inversion, and stepping past the last tone wraps back to root
    /// position. `n` must be below the number of chord tones.
    pub fn invert(&self, n: usize) -> Result<Self> {
        let len = self.intervals.len();
        if n >= len {
            return Err(TheoryError::argument(format!(
                "inversion {} out of range for {} ({} tones)",
                n,
                self.root_position(),
                len
            )));
        }
        Ok(Self {
            inversion: (self.inversion + n) % len,
            ..self.clone()
        })
    }

    fn root_position(&self) -> Self {
        Self {
            inversion: 0,
            ..self.clone()
        }
    }

    /// Intervals from the root as voiced, lowest first: each rotated tone is
    /// raised by octaves until it sits above the previous top
    pub fn voiced_intervals(&self) -> Result<Vec<Interval>> {
        let mut voiced: Vec<Interval> = self.intervals[self.inversion..].to_vec();
        for interval in &self.intervals[..self.inversion] {
            let mut raised = interval.add(&Interval::octave())?;
            if let Some(top) = voiced.last().copied() {
                while raised <= top {
                    raised = raised.add(&Interval::octave())?;
                }
            }
            voiced.push(raised);
        }
        Ok(voiced)
    }

    /// Pitch classes as voiced, lowest first
    pub fn pitches(&self) -> Vec<PitchClass> {
        let mut out = self.pitches[self.inversion..].to_vec();
        out.extend_from_slice(&self.pitches[..self.inversion]);
        out
    }

    /// Lowest voiced pitch class
    pub fn bass(&self) -> PitchClass {
        self.pitches[self.inversion]
    }

    /// Voiced notes with the root placed in `octave`
    pub fn notes(&self, octave: i32) -> Result<Vec<Note>> {
        let base = self.root.to_octave(octave)?;
        self.voiced_intervals()?
            .iter()
            .map(|i| base.add_interval(i))
            .collect()
    }

    /// Whether a pitch class, note, or interval above the root is a chord tone
    pub fn contains(&self, item: &Element) -> Result<bool> {
        let pitch_class = match item {
            Element::PitchClass(pc) => *pc,
            Element::Note(note) => note.pitch_class(),
            Element::Interval(interval) => self
                .root
                .to_octave(BASE_OCTAVE)?
                .add_interval(interval)?
                .pitch_class(),
            other => {
                return Err(TheoryError::operation(format!(
                    "a chord cannot contain a {}",
                    other.kind()
                )))
            }
        };
        Ok(self.pitches.contains(&pitch_class))
    }

    /// Every (recipe, inversion) whose pitch classes match these intervals
    /// above a bass, using the shared index
    pub fn identify_from_intervals(intervals: &[Interval]) -> Vec<ChordMatch> {
        ChordIndex::global().identify_intervals(intervals)
    }

    /// Every chord whose pitch classes match these notes, using the shared index
    pub fn identify_from_notes(notes: &[Note]) -> Result<Vec<Chord>> {
        ChordIndex::global().identify_notes(notes)
    }
}

impl PartialEq for Chord {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root
            && self.intervals == other.intervals
            && self.inversion == other.inversion
    }
}

impl Eq for Chord {}

impl Hash for Chord {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.intervals.hash(state);
        self.inversion.hash(state);
    }
}

impl Ord for Chord {
    fn cmp(&self, other: &Self) -> Ordering {
        self.root
            .cmp(&other.root)
            .then_with(|| self.intervals.cmp(&other.intervals))
            .then(self.inversion.cmp(&other.inversion))
    }
}

impl PartialOrd for Chord {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Chord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.root)?;
        match self.recipe {
            Some(name) => write!(f, "{}", name)?,
            None => {
                let names: Vec<String> = self.intervals.iter().map(|i| i.to_string()).collect();
                write!(f, "{{{}}}", names.join(","))?;
            }
        }
        if self.inversion > 0 {
            write!(f, "/{}", self.bass())?;
        }
        Ok(())
    }
}

/// One identification result: a recipe at a given inversion
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChordMatch {
    pub recipe: &'static str,
    pub inversion: usize,
}

impl fmt::Display for ChordMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (inversion {})", self.recipe, self.inversion)
    }
}

/// Reverse index from an octave-independent interval set above the bass to
/// the recipes and inversions that produce it
#[derive(Debug, Clone, Default)]
pub struct ChordIndex {
    by_key: HashMap<Vec<Interval>, Vec<ChordMatch>>,
    recipes: HashMap<&'static str, Vec<Interval>>,
    /// Every interval that appears in some key
    known: HashSet<Interval>,
}

static INDEX: Lazy<ChordIndex> =
    Lazy::new(|| ChordIndex::build(catalogue()).expect("built-in chord recipes index cleanly"));

impl ChordIndex {
    /// Instantiate every recipe at every inversion and record its key
    pub fn build(book: &RecipeBook) -> Result<Self> {
        let root = PitchClass::parse("C")?;
        let mut by_key: HashMap<Vec<Interval>, Vec<ChordMatch>> = HashMap::new();
        let mut recipes = HashMap::new();
        for recipe in book.recipes() {
            recipes.insert(recipe.name, recipe.intervals.clone());
            let chord = Chord::build(root, Some(recipe.name), recipe.intervals.clone())?;
            for inversion in 0..chord.len() {
                let notes = chord.invert(inversion)?.notes(BASE_OCTAVE)?;
                let bass = notes[0];
                let above = notes
                    .iter()
                    .map(|n| n.difference(&bass))
                    .collect::<Result<Vec<_>>>()?;
                by_key.entry(normalize(&above)).or_default().push(ChordMatch {
                    recipe: recipe.name,
                    inversion,
                });
            }
        }
        let known = by_key.keys().flatten().copied().collect();
        debug!(keys = by_key.len(), recipes = book.recipes().len(), "built chord index");
        Ok(Self {
            by_key,
            recipes,
            known,
        })
    }

    /// Shared index over the built-in catalogue, built on first use
    pub fn global() -> &'static ChordIndex {
        &INDEX
    }

    /// Matches for intervals above a bass; P1 is implied and octave
    /// placement of each interval is irrelevant
    pub fn identify_intervals(&self, intervals: &[Interval]) -> Vec<ChordMatch> {
        let mut with_bass = intervals.to_vec();
        with_bass.push(Interval::unison());
        let key = normalize(&with_bass);
        let mut matches = self.by_key.get(&key).cloned().unwrap_or_default();
        matches.sort();
        trace!(intervals = ?key, matches = matches.len(), "identified intervals");
        matches
    }

    /// Chords whose pitch classes match these notes, voiced over the lowest
    /// note.
    ///
    /// Notes above the bass may be respelled enharmonically, so D#4 over C4
    /// can be read as Eb4. The bass keeps its written spelling.
    pub fn identify_notes(&self, notes: &[Note]) -> Result<Vec<Chord>> {
        let bass = notes
            .iter()
            .min()
            .copied()
            .ok_or_else(|| TheoryError::argument("cannot identify a chord from no notes"))?;

        let mut keys: Vec<Vec<Interval>> = vec![Vec::new()];
        for note in notes {
            let readings = self.readings_above(note, &bass);
            keys = keys
                .iter()
                .flat_map(|key| {
                    readings.iter().map(move |reading| {
                        let mut next = key.clone();
                        next.push(*reading);
                        next
                    })
                })
                .collect();
        }
        let keys: BTreeSet<Vec<Interval>> = keys.iter().map(|key| normalize(key)).collect();
        let matches: BTreeSet<ChordMatch> = keys
            .iter()
            .filter_map(|key| self.by_key.get(key))
            .flatten()
            .copied()
            .collect();
        trace!(readings = keys.len(), matches = matches.len(), "identified notes");

        let bass_note = bass.pitch_class().to_octave(BASE_OCTAVE)?;
        let mut chords = Vec::new();
        for found in matches {
            let intervals = match self.recipes.get(found.recipe) {
                Some(intervals) => intervals,
                None => continue,
            };
            let above_root = intervals[found.inversion].reduce();
            let chord = bass_note
                .sub_interval(&above_root)
                .and_then(|root| {
                    Chord::build(root.pitch_class(), Some(found.recipe), intervals.clone())
                })
                .and_then(|chord| chord.invert(found.inversion));
            match chord {
                Ok(chord) => chords.push(chord),
                Err(e) => trace!(candidate = %found, error = %e, "skipping unspellable chord"),
            }
        }
        chords.sort();
        chords.dedup();
        Ok(chords)
    }

    /// Reduced intervals a note can form above the bass, counting every
    /// enharmonic spelling of it that some chord uses
    fn readings_above(&self, note: &Note, bass: &Note) -> Vec<Interval> {
        if note == bass {
            return vec![Interval::unison()];
        }
        let mut readings: Vec<Interval> = std::iter::once(note)
            .chain(SpellingIndex::global().spellings(note.number()))
            .filter_map(|spelling| spelling.difference(bass).ok())
            .map(|interval| interval.reduce())
            .filter(|interval| self.known.contains(interval))
            .collect();
        readings.sort();
        readings.dedup();
        readings
    }
}

/// Fold each interval into a single octave, then sort and deduplicate
fn normalize(intervals: &[Interval]) -> Vec<Interval> {
    let mut key: Vec<Interval> = intervals.iter().map(|i| i.reduce()).collect();
    key.sort();
    key.dedup();
    key
}


// Written by hand: the derive would tie `'de` to the `&'static str` recipe field
impl<'de> Deserialize<'de> for Chord {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::try_from(text).map_err(serde::de::Error::custom)
    }
}
