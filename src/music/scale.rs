// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Scale definitions, degree access, and scale identification.
//!
//! Scales are spelled: a root pitch class plus an interval recipe, so
//! C major contains B and Db major contains Cb. Identification works either
//! by strict membership or by a weighted pitch-class profile score.

use std::cmp::Ordering;
use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use tracing::trace;

use super::chord::{Chord, BASE_OCTAVE};
use super::element::Element;
use super::error::{Result, TheoryError};
use super::interval::Interval;
use super::note::Note;
use super::pitch_class::PitchClass;
use super::recipe::{spell_pitches, RecipeBook, RecipeTable};

const SCALE_RECIPES: RecipeTable = &[
    ("major", &["P1", "M2", "M3", "P4", "P5", "M6", "M7"]),
    ("natural_minor", &["P1", "M2", "m3", "P4", "P5", "m6", "m7"]),
    ("harmonic_minor", &["P1", "M2", "m3", "P4", "P5", "m6", "M7"]),
    ("melodic_minor", &["P1", "M2", "m3", "P4", "P5", "M6", "M7"]),
    ("major_pentatonic", &["P1", "M2", "M3", "P5", "M6"]),
    ("minor_pentatonic", &["P1", "m3", "P4", "P5", "m7"]),
    // Greek modes
    ("ionian", &["P1", "M2", "M3", "P4", "P5", "M6", "M7"]),
    ("dorian", &["P1", "M2", "m3", "P4", "P5", "M6", "m7"]),
    ("phrygian", &["P1", "m2", "m3", "P4", "P5", "m6", "m7"]),
    ("lydian", &["P1", "M2", "M3", "A4", "P5", "M6", "M7"]),
    ("mixolydian", &["P1", "M2", "M3", "P4", "P5", "M6", "m7"]),
    ("aeolian", &["P1", "M2", "m3", "P4", "P5", "m6", "m7"]),
    ("locrian", &["P1", "m2", "m3", "P4", "d5", "m6", "m7"]),
    // Exotic
    ("hungarian_minor", &["P1", "M2", "m3", "A4", "P5", "m6", "M7"]),
    ("hungarian_major", &["P1", "A2", "M3", "A4", "P5", "M6", "m7"]),
    ("enigmatic", &["P1", "m2", "M3", "A4", "A5", "A6", "M7"]),
    ("double_harmonic", &["P1", "m2", "M3", "P4", "P5", "m6", "M7"]),
    ("persian", &["P1", "m2", "M3", "P4", "d5", "m6", "M7"]),
    ("altered", &["P1", "m2", "m3", "d4", "d5", "m6", "m7"]),
    ("oriental", &["P1", "m2", "M3", "P4", "d5", "M6", "m7"]),
    ("neapolitan_major", &["P1", "m2", "m3", "P4", "P5", "M6", "M7"]),
    ("neapolitan_minor", &["P1", "m2", "m3", "P4", "P5", "m6", "M7"]),
    ("whole_tone", &["P1", "M2", "M3", "A4", "A5", "A6"]),
    ("blues", &["P1", "m3", "P4", "d5", "P5", "m7"]),
    // Synthetic
    ("major_locrian", &["P1", "M2", "M3", "P4", "d5", "m6", "m7"]),
    ("lydian_dominant", &["P1", "M2", "M3", "A4", "P5", "M6", "m7"]),
    ("lydian_augmented", &["P1", "M2", "M3", "A4", "A5", "M6", "M7"]),
];

/// Modes that restate the major scale's content from another degree
const GREEK_MODES: [&str; 7] = [
    "ionian",
    "dorian",
    "phrygian",
    "lydian",
    "mixolydian",
    "aeolian",
    "locrian",
];

/// Step pattern of the major scale, in semitones
const DIATONIC_STEPS: [i32; 7] = [2, 2, 1, 2, 2, 2, 1];

/// WPCP weight multipliers
const ROOT_WEIGHT: f64 = 1.05;
const MEMBER_WEIGHT: f64 = 1.0;
const OUTSIDER_WEIGHT: f64 = -0.5;
/// Tie-breaker so a relative major outranks its natural minor
const NATURAL_MINOR_PENALTY: f64 = 0.01;

static CATALOGUE: Lazy<RecipeBook> =
    Lazy::new(|| RecipeBook::load(SCALE_RECIPES, &[]).expect("built-in scale recipes are valid"));

/// The built-in scale catalogue
pub fn catalogue() -> &'static RecipeBook {
    &CATALOGUE
}

/// Chord shapes that can be stacked on a scale degree
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Extension {
    Triad,
    Seventh,
    Ninth,
    Eleventh,
    Thirteenth,
    Sus2,
    Sus4,
    Sixth,
}

impl Extension {
    /// Scale degrees above the chord root, counted from 1
    fn degrees(self) -> &'static [i32] {
        match self {
            Extension::Triad => &[1, 3, 5],
            Extension::Seventh => &[1, 3, 5, 7],
            Extension::Ninth => &[1, 3, 5, 7, 9],
            Extension::Eleventh => &[1, 3, 5, 7, 9, 11],
            Extension::Thirteenth => &[1, 3, 5, 7, 9, 11, 13],
            Extension::Sus2 => &[1, 2, 5],
            Extension::Sus4 => &[1, 4, 5],
            Extension::Sixth => &[1, 3, 5, 6],
        }
    }
}

impl FromStr for Extension {
    type Err = TheoryError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "" | "5" | "triad" => Ok(Extension::Triad),
            "7" | "seventh" => Ok(Extension::Seventh),
            "9" | "ninth" => Ok(Extension::Ninth),
            "11" | "eleventh" => Ok(Extension::Eleventh),
            "13" | "thirteenth" => Ok(Extension::Thirteenth),
            "sus2" => Ok(Extension::Sus2),
            "sus4" | "sus" => Ok(Extension::Sus4),
            "6" | "sixth" => Ok(Extension::Sixth),
            _ => Err(TheoryError::parse(format!("unknown chord extension '{}'", s))),
        }
    }
}

/// A root pitch class plus an ascending interval recipe
#[derive(Debug, Clone, Serialize)]
#[serde(into = "String")]
pub struct Scale {
    root: PitchClass,
    recipe: Option<&'static str>,
    intervals: Vec<Interval>,
    pitches: Vec<PitchClass>,
}

impl Scale {
    /// Create a scale from a recipe name
    pub fn new(root: PitchClass, name: &str) -> Result<Self> {
        let recipe = catalogue()
            .resolve(name)
            .ok_or_else(|| TheoryError::argument(format!("unknown scale recipe '{}'", name)))?;
        Self::build(root, Some(recipe.name), recipe.intervals.clone())
    }

    /// Create a custom scale; P1 is implied and order is irrelevant
    pub fn from_intervals(root: PitchClass, mut intervals: Vec<Interval>) -> Result<Self> {
        intervals.push(Interval::unison());
        intervals.sort();
        intervals.dedup();
        let recipe = catalogue().find_by_intervals(&intervals).map(|r| r.name);
        Self::build(root, recipe, intervals)
    }

    fn build(root: PitchClass, recipe: Option<&'static str>, intervals: Vec<Interval>) -> Result<Self> {
        let pitches = spell_pitches(root, &intervals, "scale")?;
        Ok(Self {
            root,
            recipe,
            intervals,
            pitches,
        })
    }

    /// Parse "<root> <recipe>", e.g. "C major" or "F# harmonic_minor"
    pub fn parse(s: &str) -> Result<Self> {
        let (root, name) = s
            .trim()
            .split_once(char::is_whitespace)
            .ok_or_else(|| TheoryError::parse(format!("expected '<root> <recipe>' in '{}'", s)))?;
        let root = PitchClass::parse(root)?;
        let name = name.trim().to_lowercase().replace([' ', '-'], "_");
        Self::new(root, &name).map_err(TheoryError::into_parse)
    }

    /// Canonical names of every built-in recipe
    pub fn recipe_names() -> Vec<&'static str> {
        catalogue().recipes().iter().map(|r| r.name).collect()
    }

    /// Every common-spelling root with every recipe, optionally skipping the
    /// Greek modes. Roots whose spelling would need too many accidentals are
    /// left out.
    pub fn all(include_greek_modes: bool) -> Vec<Scale> {
        let mut out = Vec::new();
        for root in PitchClass::common() {
            for recipe in catalogue().recipes() {
                if !include_greek_modes && GREEK_MODES.contains(&recipe.name) {
                    continue;
                }
                if let Ok(scale) = Self::build(root, Some(recipe.name), recipe.intervals.clone()) {
                    out.push(scale);
                }
            }
        }
        out
    }

    pub fn root(&self) -> PitchClass {
        self.root
    }

    pub fn recipe(&self) -> Option<&'static str> {
        self.recipe
    }

    pub fn intervals(&self) -> &[Interval] {
        &self.intervals
    }

    /// Pitch classes in scale order
    pub fn pitches(&self) -> &[PitchClass] {
        &self.pitches
    }

    pub fn len(&self) -> usize {
        self.intervals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.intervals.is_empty()
    }

    /// Note at a 1-based scale degree, with degree 1 on the root in the
    /// base octave. Degrees past the recipe length continue into higher
    /// octaves; degrees below 1 continue downward.
    pub fn degree(&self, k: i32) -> Result<Note> {
        let out_of_range =
            || TheoryError::argument(format!("degree {} of {} is out of range", k, self));
        let index = k.checked_sub(1).ok_or_else(out_of_range)?;
        let n = self.intervals.len() as i32;
        let octaves = index.div_euclid(n);
        let offset = index.rem_euclid(n) as usize;
        let note = self
            .root
            .to_octave(BASE_OCTAVE)?
            .add_interval(&self.intervals[offset])?;
        let octave = note.octave().checked_add(octaves).ok_or_else(out_of_range)?;
        Note::new(note.pitch_class(), octave).map_err(|_| out_of_range())
    }

    /// Diatonic chord stacked on a scale degree
    pub fn chord(&self, degree: i32, extension: Extension) -> Result<Chord> {
        let root = self.degree(degree)?;
        let intervals = extension
            .degrees()
            .iter()
            .map(|&d| {
                let above = degree.checked_add(d - 1).ok_or_else(|| {
                    TheoryError::argument(format!("degree {} of {} is out of range", degree, self))
                })?;
                self.degree(above)?.difference(&root)
            })
            .collect::<Result<Vec<_>>>()?;
        Chord::from_intervals(root.pitch_class(), intervals)
    }

    /// Membership for pitch classes, notes, chords, scales, and collections
    pub fn contains(&self, item: &Element) -> Result<bool> {
        match item {
            Element::PitchClass(pc) => Ok(self.pitches.contains(pc)),
            Element::Note(note) => Ok(self.pitches.contains(&note.pitch_class())),
            Element::Chord(chord) => Ok(chord.pitches().iter().all(|p| self.pitches.contains(p))),
            Element::Scale(scale) => Ok(scale.pitches.iter().all(|p| self.pitches.contains(p))),
            Element::Collection(items) => {
                for item in items {
                    if !self.contains(item)? {
                        return Ok(false);
                    }
                }
                Ok(true)
            }
            Element::Interval(interval) => Err(TheoryError::operation(format!(
                "a scale cannot contain interval {}",
                interval
            ))),
        }
    }

    /// Seven notes whose steps are a rotation of the major-scale pattern
    pub fn is_diatonic(&self) -> bool {
        if self.intervals.len() != 7 {
            return false;
        }
        let semitones: Vec<i32> = self.intervals.iter().map(|i| i.semitones()).collect();
        let mut steps: Vec<i32> = semitones.windows(2).map(|w| w[1] - w[0]).collect();
        steps.push(12 + semitones[0] - semitones[6]);
        (0..7).any(|shift| {
            let mut rotated = DIATONIC_STEPS;
            rotated.rotate_left(shift);
            rotated[..] == steps[..]
        })
    }

    /// Number of this scale's pitches missing from `other`
    pub fn distance(&self, other: &Scale) -> usize {
        let shared = self
            .pitches
            .iter()
            .filter(|p| other.pitches.contains(p))
            .count();
        self.pitches.len() - shared
    }

    /// Other scales within `max_distance`, closest first
    pub fn find_similar(&self, max_distance: usize, include_greek_modes: bool) -> Vec<(Scale, usize)> {
        let mut out: Vec<(Scale, usize)> = Self::all(include_greek_modes)
            .into_iter()
            .filter(|s| s != self)
            .map(|s| {
                let d = self.distance(&s);
                (s, d)
            })
            .filter(|(_, d)| *d <= max_distance)
            .collect();
        out.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        out
    }

    /// Weighted pitch-class-profile score against weighted evidence
    pub fn wpcp_score(&self, items: &[(Element, f64)]) -> Result<f64> {
        Ok(self.score_profile(&weighted_profile(items)?))
    }

    fn score_profile(&self, profile: &[(PitchClass, f64)]) -> f64 {
        let mut score: f64 = profile
            .iter()
            .map(|(pc, weight)| {
                if *pc == self.root {
                    ROOT_WEIGHT * weight
                } else if self.pitches.contains(pc) {
                    MEMBER_WEIGHT * weight
                } else {
                    OUTSIDER_WEIGHT * weight
                }
            })
            .sum();
        if self.recipe == Some("natural_minor") {
            score -= NATURAL_MINOR_PENALTY;
        }
        score
    }

    /// Highest-scoring scale for the weighted evidence
    pub fn identify_wpcp(items: &[(Element, f64)], include_greek_modes: bool) -> Result<Option<Scale>> {
        Ok(Self::identify_wpcp_all(items, include_greek_modes)?
            .into_iter()
            .next()
            .map(|(scale, _)| scale))
    }

    /// Every scale with its score, best first; ties keep catalogue order
    pub fn identify_wpcp_all(
        items: &[(Element, f64)],
        include_greek_modes: bool,
    ) -> Result<Vec<(Scale, f64)>> {
        let profile = weighted_profile(items)?;
        let mut ranked: Vec<(Scale, f64)> = Self::all(include_greek_modes)
            .into_iter()
            .map(|s| {
                let score = s.score_profile(&profile);
                (s, score)
            })
            .collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
        trace!(candidates = ranked.len(), pitch_classes = profile.len(), "ranked scales");
        Ok(ranked)
    }

    /// Every scale containing all of the given items, ascending
    pub fn identify(items: &[Element], include_greek_modes: bool) -> Result<Vec<Scale>> {
        let wanted = Element::Collection(items.to_vec());
        let mut found = Vec::new();
        for scale in Self::all(include_greek_modes) {
            if scale.contains(&wanted)? {
                found.push(scale);
            }
        }
        found.sort();
        Ok(found)
    }
}

/// Expand weighted evidence into pitch classes, averaging repeated ones.
/// Keeps first-seen order.
fn weighted_profile(items: &[(Element, f64)]) -> Result<Vec<(PitchClass, f64)>> {
    let mut order: Vec<PitchClass> = Vec::new();
    let mut totals: HashMap<PitchClass, (f64, u32)> = HashMap::new();
    for (item, weight) in items {
        for pc in item.pitch_classes()? {
            let entry = totals.entry(pc).or_insert_with(|| {
                order.push(pc);
                (0.0, 0)
            });
            entry.0 += weight;
            entry.1 += 1;
        }
    }
    Ok(order
        .into_iter()
        .map(|pc| {
            let (sum, count) = totals[&pc];
            (pc, sum / count as f64)
        })
        .collect())
}

impl PartialEq for Scale {
    fn eq(&self, other: &Self) -> bool {
        self.root == other.root && self.intervals == other.intervals
    }
}

impl Eq for Scale {}

impl Hash for Scale {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.root.hash(state);
        self.intervals.hash(state);
    }
}

impl Ord for Scale {
    fn cmp(&self, other: &Self) -> Ordering {
        self.root
            .cmp(&other.root)
            .then_with(|| self.intervals.cmp(&other.intervals))
    }
}

impl PartialOrd for Scale {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Scale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.recipe {
            Some(name) => write!(f, "{} {}", self.root, name),
            None => {
                let names: Vec<String> = self.intervals.iter().map(|i| i.to_string()).collect();
                write!(f, "{} {{{}}}", self.root, names.join(","))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(s: &str) -> PitchClass {
        PitchClass::parse(s).unwrap()
    }

    fn pcs(list: &[&str]) -> Vec<PitchClass> {
        list.iter().map(|s| pc(s)).collect()
    }

    fn n(s: &str) -> Note {
        Note::parse(s).unwrap()
    }

    fn scale(root: &str, name: &str) -> Scale {
        Scale::new(pc(root), name).unwrap()
    }

    #[test]
    fn test_catalogue_loads() {
        assert!(RecipeBook::load(SCALE_RECIPES, &[]).is_ok());
        assert!(Scale::recipe_names().contains(&"enigmatic"));
        for mode in GREEK_MODES {
            assert!(catalogue().resolve(mode).is_some());
        }
    }

    #[test]
    fn test_scale_pitches() {
        assert_eq!(
            scale("C", "major").pitches(),
            &pcs(&["C", "D", "E", "F", "G", "A", "B"])[..]
        );
        assert_eq!(
            scale("C", "natural_minor").pitches(),
            &pcs(&["C", "D", "Eb", "F", "G", "Ab", "Bb"])[..]
        );
        assert_eq!(
            scale("Db", "major").pitches(),
            &pcs(&["Db", "Eb", "F", "Gb", "Ab", "Bb", "C"])[..]
        );
        assert_eq!(
            scale("A", "harmonic_minor").pitches(),
            &pcs(&["A", "B", "C", "D", "E", "F", "G#"])[..]
        );
    }

    #[test]
    fn test_unknown_recipe() {
        assert!(matches!(
            Scale::new(pc("C"), "nonesuch"),
            Err(TheoryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_parse() {
        assert_eq!(Scale::parse("C major").unwrap(), scale("C", "major"));
        assert_eq!(Scale::parse("F# Harmonic Minor").unwrap(), scale("F#", "harmonic_minor"));
        assert!(matches!(Scale::parse("C"), Err(TheoryError::Parse(_))));
        assert!(matches!(Scale::parse("C nonesuch"), Err(TheoryError::Parse(_))));
        assert_eq!(scale("Bb", "dorian").to_string(), "Bb dorian");
    }

    #[test]
    fn test_degree_wraps_octaves() {
        let c = scale("C", "major");
        assert_eq!(c.degree(1).unwrap(), n("C4"));
        assert_eq!(c.degree(7).unwrap(), n("B4"));
        assert_eq!(c.degree(8).unwrap(), n("C5"));
        assert_eq!(c.degree(10).unwrap(), n("E5"));
        assert_eq!(c.degree(0).unwrap(), n("B3"));
        assert_eq!(c.degree(-6).unwrap(), n("C3"));
        assert!(c.degree(100).is_err());
    }

    #[test]
    fn test_degree_extremes_rejected() {
        let c = scale("C", "major");
        assert!(matches!(c.degree(i32::MIN), Err(TheoryError::InvalidArgument(_))));
        assert!(matches!(c.degree(i32::MAX), Err(TheoryError::InvalidArgument(_))));
        assert!(matches!(
            c.chord(i32::MAX, Extension::Triad),
            Err(TheoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            c.chord(i32::MAX - 1, Extension::Thirteenth),
            Err(TheoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            c.chord(i32::MIN, Extension::Triad),
            Err(TheoryError::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_degree_arithmetic_thirds() {
        let c = scale("C", "major");
        let thirds: Vec<String> = (1..=7)
            .map(|i| {
                c.degree(i + 2)
                    .unwrap()
                    .difference(&c.degree(i).unwrap())
                    .unwrap()
                    .to_string()
            })
            .collect();
        assert_eq!(thirds, vec!["M3", "m3", "m3", "M3", "M3", "m3", "m3"]);
    }

    #[test]
    fn test_diatonic_chords() {
        let c = scale("C", "major");
        assert_eq!(c.chord(1, Extension::Triad).unwrap().to_string(), "Cmaj");
        assert_eq!(c.chord(2, Extension::Triad).unwrap().to_string(), "Dmin");
        assert_eq!(c.chord(7, Extension::Triad).unwrap().to_string(), "Bdim");
        assert_eq!(c.chord(5, Extension::Seventh).unwrap().to_string(), "Gdom7");
        assert_eq!(c.chord(7, Extension::Seventh).unwrap().to_string(), "Bmin7dim5");
        assert_eq!(c.chord(1, Extension::Ninth).unwrap().to_string(), "Cmaj9");
        assert_eq!(c.chord(5, Extension::Thirteenth).unwrap().to_string(), "Gdom13");
        assert_eq!(c.chord(2, Extension::Sus4).unwrap().to_string(), "Dsus4");
        assert_eq!(c.chord(4, Extension::Sixth).unwrap().to_string(), "Fmaj6");
        let a = scale("A", "harmonic_minor");
        assert_eq!(a.chord(3, Extension::Triad).unwrap().to_string(), "Caug");
    }

    #[test]
    fn test_extension_from_str() {
        assert_eq!("7".parse::<Extension>().unwrap(), Extension::Seventh);
        assert_eq!("sus2".parse::<Extension>().unwrap(), Extension::Sus2);
        assert!("8".parse::<Extension>().is_err());
    }

    #[test]
    fn test_contains() {
        let c = scale("C", "major");
        assert!(c.contains(&Element::PitchClass(pc("F"))).unwrap());
        assert!(!c.contains(&Element::PitchClass(pc("F#"))).unwrap());
        assert!(!c.contains(&Element::PitchClass(pc("E#"))).unwrap());
        assert!(c.contains(&Element::Note(n("B2"))).unwrap());
        assert!(c.contains(&Element::Chord(Chord::parse("Dm7").unwrap())).unwrap());
        assert!(!c.contains(&Element::Chord(Chord::parse("D").unwrap())).unwrap());
        assert!(c.contains(&Element::Scale(scale("C", "major_pentatonic"))).unwrap());
        let group: Element = vec![pc("C"), pc("E"), pc("G")].into();
        assert!(c.contains(&group).unwrap());
        assert!(matches!(
            c.contains(&Element::Interval(Interval::parse("M3").unwrap())),
            Err(TheoryError::InvalidOperation(_))
        ));
    }

    #[test]
    fn test_is_diatonic() {
        assert!(scale("C", "major").is_diatonic());
        assert!(scale("E", "phrygian").is_diatonic());
        assert!(scale("A", "natural_minor").is_diatonic());
        assert!(!scale("A", "harmonic_minor").is_diatonic());
        assert!(!scale("C", "major_pentatonic").is_diatonic());
        assert!(!scale("C", "whole_tone").is_diatonic());
    }

    #[test]
    fn test_distance_and_similar() {
        let c = scale("C", "major");
        assert_eq!(c.distance(&scale("A", "natural_minor")), 0);
        assert_eq!(c.distance(&scale("G", "major")), 1);
        assert_eq!(c.distance(&scale("C", "major_pentatonic")), 2);
        let similar = c.find_similar(1, false);
        assert!(similar.iter().any(|(s, d)| *s == scale("A", "natural_minor") && *d == 0));
        assert!(similar.iter().any(|(s, _)| *s == scale("G", "major")));
        assert!(!similar.iter().any(|(s, _)| *s == c));
        assert!(similar.windows(2).all(|w| w[0].1 <= w[1].1));
    }

    #[test]
    fn test_all() {
        let without = Scale::all(false);
        let with = Scale::all(true);
        assert!(with.len() > without.len());
        assert!(!without.iter().any(|s| s.recipe() == Some("dorian")));
        assert!(with.contains(&scale("D", "dorian")));
    }

    #[test]
    fn test_wpcp_prefers_relative_major() {
        let items: Vec<(Element, f64)> = pcs(&["C", "D", "E", "F", "G", "A", "B"])
            .into_iter()
            .map(|p| (Element::PitchClass(p), 1.0))
            .collect();
        let best = Scale::identify_wpcp(&items, false).unwrap().unwrap();
        assert_eq!(best, scale("C", "major"));
        let major = scale("C", "major").wpcp_score(&items).unwrap();
        let minor = scale("A", "natural_minor").wpcp_score(&items).unwrap();
        assert!((major - 7.05).abs() < 1e-9);
        assert!((minor - 7.04).abs() < 1e-9);
    }

    #[test]
    fn test_wpcp_averages_duplicates() {
        let items = vec![
            (Element::Chord(Chord::parse("C").unwrap()), 1.0),
            (Element::PitchClass(pc("C")), 2.0),
        ];
        let score = scale("C", "major").wpcp_score(&items).unwrap();
        assert!((score - (1.05 * 1.5 + 2.0)).abs() < 1e-9);
        let best = Scale::identify_wpcp(&items, false).unwrap().unwrap();
        assert_eq!(best, scale("C", "major"));
    }

    #[test]
    fn test_wpcp_ranking_and_errors() {
        let items = vec![(Element::Note(n("F#4")), 1.0), (Element::Note(n("C#5")), 1.0)];
        let ranked = Scale::identify_wpcp_all(&items, false).unwrap();
        assert!(ranked.windows(2).all(|w| w[0].1 >= w[1].1));
        assert!(ranked[ranked.len() - 1].1 < 0.0);
        let bad = vec![(Element::Interval(Interval::parse("P5").unwrap()), 1.0)];
        assert!(Scale::identify_wpcp(&bad, false).is_err());
    }

    #[test]
    fn test_identify() {
        let items = vec![
            Element::Chord(Chord::parse("C").unwrap()),
            Element::Chord(Chord::parse("Dm").unwrap()),
            Element::Chord(Chord::parse("G7").unwrap()),
        ];
        let found = Scale::identify(&items, false).unwrap();
        assert!(found.contains(&scale("C", "major")));
        assert!(found.contains(&scale("A", "natural_minor")));
        assert!(!found.contains(&scale("G", "major")));
        assert!(found.windows(2).all(|w| w[0] <= w[1]));
        let with_modes = Scale::identify(&items, true).unwrap();
        assert!(with_modes.contains(&scale("D", "dorian")));
    }
}

// Written by hand: the derive would tie `'de` to the `&'static str` recipe field
impl<'de> Deserialize<'de> for Scale {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        Self::try_from(text).map_err(serde::de::Error::custom)
    }
}
