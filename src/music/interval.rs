// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Diatonic intervals.
//!
//! An interval is a quality (diminished, minor, perfect, major, augmented,
//! with repeated d/A for doubly and triply altered) and a size counted
//! inclusively (1 = unison, 8 = octave). Semitones are derived from a base
//! table for sizes 1-8 plus twelve per extra octave.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Result, TheoryError};
use super::note::Note;

/// Deepest diminution/augmentation that can be written (ddd / AAA)
pub const MAX_ALTERATION: u8 = 3;

/// Base semitones for sizes 1-8 (perfect or major form), and whether the
/// size belongs to the perfect family
const BASE_INTERVALS: [(i32, bool); 8] = [
    (0, true),   // unison
    (2, false),  // second
    (4, false),  // third
    (5, true),   // fourth
    (7, true),   // fifth
    (9, false),  // sixth
    (11, false), // seventh
    (12, true),  // octave
];

/// Interval quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quality {
    /// Diminished, repeated 1-3 times
    Diminished(u8),
    Minor,
    Perfect,
    Major,
    /// Augmented, repeated 1-3 times
    Augmented(u8),
}

impl Quality {
    /// Every writable quality, narrowest first
    pub const ALL: [Quality; 9] = [
        Quality::Diminished(3),
        Quality::Diminished(2),
        Quality::Diminished(1),
        Quality::Minor,
        Quality::Perfect,
        Quality::Major,
        Quality::Augmented(1),
        Quality::Augmented(2),
        Quality::Augmented(3),
    ];

    /// Quality of the complementary interval
    pub fn inverse(self) -> Self {
        match self {
            Quality::Diminished(n) => Quality::Augmented(n),
            Quality::Minor => Quality::Major,
            Quality::Perfect => Quality::Perfect,
            Quality::Major => Quality::Minor,
            Quality::Augmented(n) => Quality::Diminished(n),
        }
    }

    fn is_valid_for(self, perfect_family: bool) -> bool {
        match self {
            Quality::Diminished(n) | Quality::Augmented(n) => (1..=MAX_ALTERATION).contains(&n),
            Quality::Perfect => perfect_family,
            Quality::Minor | Quality::Major => !perfect_family,
        }
    }

    /// Semitone offset from the perfect/major form of the same size
    fn offset(self, perfect_family: bool) -> i32 {
        match self {
            Quality::Perfect | Quality::Major => 0,
            Quality::Minor => -1,
            Quality::Diminished(n) if perfect_family => -(n as i32),
            Quality::Diminished(n) => -(n as i32) - 1,
            Quality::Augmented(n) => n as i32,
        }
    }
}

impl fmt::Display for Quality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Quality::Diminished(n) => write!(f, "{}", "d".repeat(*n as usize)),
            Quality::Minor => write!(f, "m"),
            Quality::Perfect => write!(f, "P"),
            Quality::Major => write!(f, "M"),
            Quality::Augmented(n) => write!(f, "{}", "A".repeat(*n as usize)),
        }
    }
}

/// A spelled interval: quality plus inclusive size
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Interval {
    quality: Quality,
    size: u32,
    semitones: i32,
}

impl Interval {
    /// Create an interval, checking the quality against the size family
    pub fn new(quality: Quality, size: u32) -> Result<Self> {
        if size == 0 {
            return Err(TheoryError::argument("interval size must be at least 1"));
        }
        let (base, perfect) = base_interval(size)
            .ok_or_else(|| TheoryError::argument(format!("interval size {} is too large", size)))?;
        if !quality.is_valid_for(perfect) {
            return Err(TheoryError::argument(format!(
                "quality {} is not valid for size {}",
                quality, size
            )));
        }
        let semitones = base
            .checked_add(quality.offset(perfect))
            .ok_or_else(|| TheoryError::argument(format!("interval size {} is too large", size)))?;
        Ok(Self {
            quality,
            size,
            semitones,
        })
    }

    /// The perfect octave
    pub fn octave() -> Self {
        Self {
            quality: Quality::Perfect,
            size: 8,
            semitones: 12,
        }
    }

    /// The perfect unison
    pub fn unison() -> Self {
        Self {
            quality: Quality::Perfect,
            size: 1,
            semitones: 0,
        }
    }

    /// Parse "P5", "m3", "M9", "dd7", "AAA4"
    pub fn parse(s: &str) -> Result<Self> {
        let digits_at = s
            .find(|c: char| c.is_ascii_digit())
            .ok_or_else(|| TheoryError::parse(format!("missing interval size in '{}'", s)))?;
        let (quality_text, size_text) = s.split_at(digits_at);
        if !size_text.chars().all(|c| c.is_ascii_digit()) {
            return Err(TheoryError::parse(format!("invalid interval size in '{}'", s)));
        }
        let size: u32 = size_text
            .parse()
            .map_err(|_| TheoryError::parse(format!("invalid interval size in '{}'", s)))?;
        if size == 0 {
            return Err(TheoryError::parse(format!("interval size must be positive in '{}'", s)));
        }
        let quality = parse_quality(quality_text)
            .ok_or_else(|| TheoryError::parse(format!("invalid interval quality in '{}'", s)))?;
        Self::new(quality, size).map_err(TheoryError::into_parse)
    }

    /// Look up the interval with the given size and semitone count
    pub fn from_size_and_semitones(size: u32, semitones: i32) -> Option<Self> {
        Quality::ALL
            .iter()
            .filter_map(|&q| Self::new(q, size).ok())
            .find(|i| i.semitones == semitones)
    }

    pub fn quality(&self) -> Quality {
        self.quality
    }

    pub fn size(&self) -> u32 {
        self.size
    }

    pub fn semitones(&self) -> i32 {
        self.semitones
    }

    /// Size folded into 1-7 (unison through seventh)
    pub fn simple_size(&self) -> u32 {
        (self.size - 1) % 7 + 1
    }

    /// Whether the size falls in the perfect family (unison, 4th, 5th, octave)
    pub fn perfect_family(&self) -> bool {
        BASE_INTERVALS[(self.simple_size() - 1) as usize].1
    }

    /// Larger than an octave
    pub fn is_compound(&self) -> bool {
        self.size > 8
    }

    /// Interval that completes this one to an octave
    pub fn complement(&self) -> Result<Self> {
        if self.is_compound() {
            return Err(TheoryError::operation(format!(
                "cannot complement compound interval {}",
                self
            )));
        }
        Self::new(self.quality.inverse(), 9 - self.size)
    }

    /// Fold down by whole octaves until smaller than an octave
    pub fn reduce(&self) -> Self {
        self.lowered_to(self.simple_size())
    }

    /// Split into perfect octaves plus a remainder no larger than an octave
    pub fn split(&self) -> Vec<Interval> {
        let octaves = self.size.saturating_sub(2) / 7;
        let mut parts = vec![Self::octave(); octaves as usize];
        parts.push(self.lowered_to(self.size - 7 * octaves));
        parts
    }

    /// Move to the other side of the octave: octaves and compounds fold
    /// down, anything smaller goes up an octave
    pub fn flip(&self) -> Self {
        if self.size >= 8 {
            self.reduce()
        } else {
            Self {
                size: self.size + 7,
                semitones: self.semitones + 12,
                ..*self
            }
        }
    }

    /// Same quality, lowered by whole octaves to `size`
    fn lowered_to(&self, size: u32) -> Self {
        let octaves = ((self.size - size) / 7) as i32;
        Self {
            size,
            semitones: self.semitones - 12 * octaves,
            ..*self
        }
    }

    /// Sum of two intervals, spelled by stacking them on C0
    pub fn add(&self, other: &Interval) -> Result<Self> {
        let base = Note::reference();
        let top = base
            .add_interval(self)
            .and_then(|n| n.add_interval(other))
            .map_err(|e| {
                TheoryError::operation(format!("cannot add {} and {}: {}", self, other, e))
            })?;
        top.difference(&base)
    }

    /// Difference of two intervals; fails if `other` is the larger
    pub fn sub(&self, other: &Interval) -> Result<Self> {
        let base = Note::reference();
        base.add_interval(self)
            .and_then(|n| n.sub_interval(other))
            .and_then(|n| n.difference(&base))
            .map_err(|_| TheoryError::operation(format!("cannot subtract {} from {}", other, self)))
    }
}

/// Semitones of the perfect or major form of `size`, and its family.
/// `None` for size 0 or when the semitone count overflows.
fn base_interval(size: u32) -> Option<(i32, bool)> {
    if size == 0 {
        return None;
    }
    let octaves = size.saturating_sub(2) / 7;
    let (semitones, perfect) = BASE_INTERVALS[(size - 7 * octaves - 1) as usize];
    let extra = i32::try_from(octaves).ok()?.checked_mul(12)?;
    Some((semitones.checked_add(extra)?, perfect))
}

fn parse_quality(text: &str) -> Option<Quality> {
    match text {
        "m" => return Some(Quality::Minor),
        "P" => return Some(Quality::Perfect),
        "M" => return Some(Quality::Major),
        _ => {}
    }
    let count = text.chars().count();
    if count == 0 || count > MAX_ALTERATION as usize {
        return None;
    }
    if text.chars().all(|c| c == 'd') {
        Some(Quality::Diminished(count as u8))
    } else if text.chars().all(|c| c == 'A') {
        Some(Quality::Augmented(count as u8))
    } else {
        None
    }
}

impl Ord for Interval {
    fn cmp(&self, other: &Self) -> Ordering {
        self.size
            .cmp(&other.size)
            .then(self.semitones.cmp(&other.semitones))
    }
}

impl PartialOrd for Interval {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.quality, self.size)
    }
}
