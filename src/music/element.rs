// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Closed sum type over every theory value, for operations that accept
//! more than one kind of input (membership tests, scale scoring).

use std::fmt;

use super::chord::Chord;
use super::error::{Result, TheoryError};
use super::interval::Interval;
use super::note::Note;
use super::pitch_class::PitchClass;
use super::scale::Scale;

#[derive(Debug, Clone, PartialEq)]
pub enum Element {
    PitchClass(PitchClass),
    Note(Note),
    Interval(Interval),
    Chord(Chord),
    Scale(Scale),
    /// Any finite group of elements, possibly nested
    Collection(Vec<Element>),
}

impl Element {
    /// Short name of the variant, for error messages
    pub fn kind(&self) -> &'static str {
        match self {
            Element::PitchClass(_) => "pitch class",
            Element::Note(_) => "note",
            Element::Interval(_) => "interval",
            Element::Chord(_) => "chord",
            Element::Scale(_) => "scale",
            Element::Collection(_) => "collection",
        }
    }

    /// Parse the first notation that fits: note, pitch class, interval, chord
    pub fn parse(s: &str) -> Result<Self> {
        if let Ok(note) = Note::parse(s) {
            return Ok(Element::Note(note));
        }
        if let Ok(pc) = PitchClass::parse(s) {
            return Ok(Element::PitchClass(pc));
        }
        if let Ok(interval) = Interval::parse(s) {
            return Ok(Element::Interval(interval));
        }
        Chord::parse(s)
            .map(Element::Chord)
            .map_err(|_| TheoryError::parse(format!("unrecognized element '{}'", s)))
    }

    /// Every pitch class this element sounds; intervals have none
    pub fn pitch_classes(&self) -> Result<Vec<PitchClass>> {
        match self {
            Element::PitchClass(pc) => Ok(vec![*pc]),
            Element::Note(note) => Ok(vec![note.pitch_class()]),
            Element::Chord(chord) => Ok(chord.pitches()),
            Element::Scale(scale) => Ok(scale.pitches().to_vec()),
            Element::Collection(items) => {
                let mut out = Vec::new();
                for item in items {
                    out.extend(item.pitch_classes()?);
                }
                Ok(out)
            }
            Element::Interval(interval) => Err(TheoryError::operation(format!(
                "interval {} has no pitch classes without a root",
                interval
            ))),
        }
    }
}

impl fmt::Display for Element {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Element::PitchClass(pc) => write!(f, "{}", pc),
            Element::Note(note) => write!(f, "{}", note),
            Element::Interval(interval) => write!(f, "{}", interval),
            Element::Chord(chord) => write!(f, "{}", chord),
            Element::Scale(scale) => write!(f, "{}", scale),
            Element::Collection(items) => {
                let parts: Vec<String> = items.iter().map(|i| i.to_string()).collect();
                write!(f, "[{}]", parts.join(", "))
            }
        }
    }
}

impl From<PitchClass> for Element {
    fn from(pc: PitchClass) -> Self {
        Element::PitchClass(pc)
    }
}

impl From<Note> for Element {
    fn from(note: Note) -> Self {
        Element::Note(note)
    }
}

impl From<Interval> for Element {
    fn from(interval: Interval) -> Self {
        Element::Interval(interval)
    }
}

impl From<Chord> for Element {
    fn from(chord: Chord) -> Self {
        Element::Chord(chord)
    }
}

impl From<Scale> for Element {
    fn from(scale: Scale) -> Self {
        Element::Scale(scale)
    }
}

impl<T: Into<Element>> From<Vec<T>> for Element {
    fn from(items: Vec<T>) -> Self {
        Element::Collection(items.into_iter().map(Into::into).collect())
    }
}
