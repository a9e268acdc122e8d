// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spelled pitch classes.
//!
//! A pitch class is a letter name plus a signed accidental count. Spelling
//! is significant: `C#` and `Db` sound the same but are different values.

use std::cmp::Ordering;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::error::{Result, TheoryError};
use super::note::Note;

/// Accidental limit applied when no explicit bound is given
pub const DEFAULT_MAX_ACCIDENTALS: u8 = 6;

/// Largest accidental limit any caller may request
pub const MAX_ACCIDENTAL_LIMIT: u8 = 12;

/// Accidentals enumerated by `PitchClass::all(None)`; covers every key
/// signature up to seven sharps or flats
const NORMAL_ACCIDENTALS: [i32; 3] = [-1, 0, 1];

/// Natural letter names, in diatonic order starting from C
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Letter {
    C,
    D,
    E,
    F,
    G,
    A,
    B,
}

impl Letter {
    /// All letters in diatonic order
    pub const ALL: [Letter; 7] = [
        Letter::C,
        Letter::D,
        Letter::E,
        Letter::F,
        Letter::G,
        Letter::A,
        Letter::B,
    ];

    /// Semitones above C for the natural form of this letter
    pub fn base_number(self) -> i32 {
        match self {
            Letter::C => 0,
            Letter::D => 2,
            Letter::E => 4,
            Letter::F => 5,
            Letter::G => 7,
            Letter::A => 9,
            Letter::B => 11,
        }
    }

    /// Position (0-6) among the natural letters
    pub fn diatonic_index(self) -> i32 {
        self as i32
    }

    /// Letter at a diatonic position, wrapping modulo 7
    pub fn from_index(index: i32) -> Self {
        Letter::ALL[index.rem_euclid(7) as usize]
    }

    /// Parse an uppercase letter name
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            'C' => Some(Letter::C),
            'D' => Some(Letter::D),
            'E' => Some(Letter::E),
            'F' => Some(Letter::F),
            'G' => Some(Letter::G),
            'A' => Some(Letter::A),
            'B' => Some(Letter::B),
            _ => None,
        }
    }

    pub fn as_char(self) -> char {
        match self {
            Letter::C => 'C',
            Letter::D => 'D',
            Letter::E => 'E',
            Letter::F => 'F',
            Letter::G => 'G',
            Letter::A => 'A',
            Letter::B => 'B',
        }
    }
}

/// Glyph set used when rendering accidentals
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Glyphs {
    /// `#` and `b`, repeated
    #[default]
    Ascii,
    /// `♯` and `♭`, with `𝄪`/`𝄫` for exactly two
    Unicode,
}

/// A letter name with a signed accidental count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PitchClass {
    letter: Letter,
    accidentals: i8,
}

impl PitchClass {
    /// Create a pitch class within the default accidental limit
    pub fn new(letter: Letter, accidentals: i32) -> Result<Self> {
        Self::with_limit(letter, accidentals, DEFAULT_MAX_ACCIDENTALS)
    }

    /// Create a pitch class, rejecting more than `limit` accidentals
    pub fn with_limit(letter: Letter, accidentals: i32, limit: u8) -> Result<Self> {
        check_limit(limit)?;
        if accidentals.unsigned_abs() > limit as u32 {
            return Err(TheoryError::argument(format!(
                "{} accidentals on {} exceeds the limit of {}",
                accidentals,
                letter.as_char(),
                limit
            )));
        }
        Ok(Self {
            letter,
            accidentals: accidentals as i8,
        })
    }

    /// Natural pitch class for a letter
    pub fn natural_of(letter: Letter) -> Self {
        Self {
            letter,
            accidentals: 0,
        }
    }

    /// Parse within the default accidental limit (e.g. "C", "F#", "Bbb", "E♭")
    pub fn parse(s: &str) -> Result<Self> {
        Self::parse_with_limit(s, DEFAULT_MAX_ACCIDENTALS)
    }

    /// Parse, rejecting more than `limit` accidentals
    pub fn parse_with_limit(s: &str, limit: u8) -> Result<Self> {
        let mut chars = s.chars();
        let first = chars
            .next()
            .ok_or_else(|| TheoryError::parse("empty pitch class"))?;
        let letter = Letter::from_char(first)
            .ok_or_else(|| TheoryError::parse(format!("invalid letter '{}' in '{}'", first, s)))?;
        let accidentals = parse_accidentals(chars.as_str())
            .map_err(|e| TheoryError::parse(format!("{} in '{}'", e, s)))?;
        Self::with_limit(letter, accidentals, limit).map_err(TheoryError::into_parse)
    }

    /// Every pitch class of every letter.
    ///
    /// Without a bound only the commonly used spellings (one flat, natural,
    /// one sharp) are produced; with a bound every accidental count from
    /// `-max` to `max` is produced. Bounds above `MAX_ACCIDENTAL_LIMIT` are
    /// rejected.
    pub fn all(max_accidentals: Option<u8>) -> Result<Vec<PitchClass>> {
        match max_accidentals {
            None => Ok(Self::common()),
            Some(max) => {
                check_limit(max)?;
                Ok(Self::within(max))
            }
        }
    }

    /// One flat, natural, and one sharp on every letter
    pub(crate) fn common() -> Vec<PitchClass> {
        Self::spelled(NORMAL_ACCIDENTALS)
    }

    /// Every spelling up to `max` accidentals; `max` is already checked
    pub(crate) fn within(max: u8) -> Vec<PitchClass> {
        let max = max as i32;
        Self::spelled(-max..=max)
    }

    fn spelled(accidentals: impl IntoIterator<Item = i32> + Clone) -> Vec<PitchClass> {
        Letter::ALL
            .iter()
            .flat_map(|&letter| {
                accidentals.clone().into_iter().map(move |acc| Self {
                    letter,
                    accidentals: acc as i8,
                })
            })
            .collect()
    }

    pub fn letter(&self) -> Letter {
        self.letter
    }

    pub fn accidentals(&self) -> i32 {
        self.accidentals as i32
    }

    /// Semitones above natural C; not reduced modulo 12
    pub fn chromatic_number(&self) -> i32 {
        self.letter.base_number() + self.accidentals as i32
    }

    pub fn diatonic_index(&self) -> i32 {
        self.letter.diatonic_index()
    }

    /// Raise by one accidental
    pub fn sharp(&self) -> Result<Self> {
        Self::new(self.letter, self.accidentals() + 1)
    }

    /// Lower by one accidental
    pub fn flat(&self) -> Result<Self> {
        Self::new(self.letter, self.accidentals() - 1)
    }

    /// Drop all accidentals
    pub fn natural(&self) -> Self {
        Self::natural_of(self.letter)
    }

    /// Same sounding pitch class, regardless of spelling
    pub fn is_enharmonic(&self, other: &PitchClass) -> bool {
        self.chromatic_number().rem_euclid(12) == other.chromatic_number().rem_euclid(12)
    }

    /// Respell onto another letter, keeping the sounding pitch class
    pub fn enharmonic_to(&self, letter: Letter) -> Result<Self> {
        let raw = self.chromatic_number() - letter.base_number();
        // Pick the fold of the difference that lies closest to zero
        let accidentals = (raw + 6).rem_euclid(12) - 6;
        Self::new(letter, accidentals)
    }

    /// Place this pitch class in an octave
    pub fn to_octave(&self, octave: i32) -> Result<Note> {
        Note::new(*self, octave)
    }

    /// Render with the given glyph set
    pub fn render(&self, glyphs: Glyphs) -> String {
        let mut out = String::new();
        out.push(self.letter.as_char());
        out.push_str(&accidental_text(self.accidentals(), glyphs));
        out
    }

    pub fn to_unicode(&self) -> String {
        self.render(Glyphs::Unicode)
    }
}

/// Accidental suffix for a signed count
pub(crate) fn accidental_text(count: i32, glyphs: Glyphs) -> String {
    let n = count.unsigned_abs() as usize;
    match glyphs {
        Glyphs::Ascii if count > 0 => "#".repeat(n),
        Glyphs::Ascii => "b".repeat(n),
        Glyphs::Unicode => match count {
            2 => "𝄪".to_string(),
            -2 => "𝄫".to_string(),
            c if c > 0 => "♯".repeat(n),
            _ => "♭".repeat(n),
        },
    }
}

fn check_limit(limit: u8) -> Result<()> {
    if limit > MAX_ACCIDENTAL_LIMIT {
        return Err(TheoryError::argument(format!(
            "accidental limit {} exceeds {}",
            limit, MAX_ACCIDENTAL_LIMIT
        )));
    }
    Ok(())
}

/// Signed accidental count for a suffix made of one repeated symbol
fn parse_accidentals(text: &str) -> std::result::Result<i32, String> {
    let mut chars = text.chars();
    let first = match chars.next() {
        None => return Ok(0),
        Some(c) => c,
    };
    let step = match first {
        '𝄪' | '𝄫' => {
            if chars.next().is_some() {
                return Err("double accidental glyph must stand alone".to_string());
            }
            return Ok(if first == '𝄪' { 2 } else { -2 });
        }
        '#' | '♯' => 1,
        'b' | '♭' => -1,
        other => return Err(format!("invalid accidental '{}'", other)),
    };
    let mut count = 1;
    for c in chars {
        if c != first {
            return Err("mixed accidental symbols".to_string());
        }
        count += 1;
    }
    Ok(step * count)
}

impl Ord for PitchClass {
    fn cmp(&self, other: &Self) -> Ordering {
        self.chromatic_number()
            .cmp(&other.chromatic_number())
            .then(self.accidentals.cmp(&other.accidentals))
    }
}

impl PartialOrd for PitchClass {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for PitchClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.render(Glyphs::Ascii))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pc(s: &str) -> PitchClass {
        PitchClass::parse(s).unwrap()
    }

    #[test]
    fn test_parse_ascii() {
        assert_eq!(pc("C"), PitchClass::natural_of(Letter::C));
        assert_eq!(pc("F#").accidentals(), 1);
        assert_eq!(pc("Bbb").accidentals(), -2);
        assert_eq!(pc("G######").accidentals(), 6);
    }

    #[test]
    fn test_parse_unicode() {
        assert_eq!(pc("E♭"), pc("Eb"));
        assert_eq!(pc("F♯♯"), pc("F##"));
        assert_eq!(pc("C𝄪"), pc("C##"));
        assert_eq!(pc("B𝄫"), pc("Bbb"));
    }

    #[test]
    fn test_parse_errors() {
        for bad in ["", "H", "c", "C#b", "Cb#", "C𝄪#", "C𝄪𝄪", "C#######", "Cx"] {
            assert!(
                matches!(PitchClass::parse(bad), Err(TheoryError::Parse(_))),
                "{} should fail",
                bad
            );
        }
    }

    #[test]
    fn test_accidental_limit() {
        assert!(PitchClass::new(Letter::C, 6).is_ok());
        assert!(matches!(
            PitchClass::new(Letter::C, 7),
            Err(TheoryError::InvalidArgument(_))
        ));
        assert!(PitchClass::new(Letter::C, -7).is_err());
        assert!(PitchClass::with_limit(Letter::C, 3, 2).is_err());
        assert!(PitchClass::parse_with_limit("C##", 1).is_err());
    }

    #[test]
    fn test_chromatic_number_not_reduced() {
        assert_eq!(pc("Cb").chromatic_number(), -1);
        assert_eq!(pc("B#").chromatic_number(), 12);
        assert_eq!(pc("A").chromatic_number(), 9);
    }

    #[test]
    fn test_spelling_is_identity() {
        assert_ne!(pc("C#"), pc("Db"));
        assert!(pc("C#").is_enharmonic(&pc("Db")));
        assert!(pc("B#").is_enharmonic(&pc("C")));
    }

    #[test]
    fn test_ordering() {
        assert!(pc("C") < pc("C#"));
        assert!(pc("Db") < pc("C#"));
        assert!(pc("Cb") < pc("C"));
        assert!(pc("B") > pc("Cb"));
        assert!(pc("E#") < pc("F"));
    }

    #[test]
    fn test_sharp_flat_round_trip() {
        for p in PitchClass::all(Some(5)).unwrap() {
            assert_eq!(p.sharp().unwrap().flat().unwrap(), p);
            assert_eq!(p.flat().unwrap().sharp().unwrap(), p);
        }
        assert!(pc("C######").sharp().is_err());
        assert_eq!(pc("Ebb").natural(), pc("E"));
    }

    #[test]
    fn test_all() {
        assert_eq!(PitchClass::all(None).unwrap().len(), 21);
        assert_eq!(PitchClass::all(Some(2)).unwrap().len(), 35);
        assert_eq!(PitchClass::all(Some(12)).unwrap().len(), 7 * 25);
        assert!(PitchClass::all(None).unwrap().contains(&pc("Bb")));
    }

    #[test]
    fn test_oversized_limit_rejected() {
        assert!(matches!(
            PitchClass::all(Some(200)),
            Err(TheoryError::InvalidArgument(_))
        ));
        assert!(PitchClass::all(Some(13)).is_err());
        assert!(matches!(
            PitchClass::with_limit(Letter::C, 1, 130),
            Err(TheoryError::InvalidArgument(_))
        ));
        assert!(matches!(
            PitchClass::parse_with_limit("C#", 255),
            Err(TheoryError::Parse(_))
        ));
        let widest = PitchClass::with_limit(Letter::B, -12, 12).unwrap();
        assert_eq!(widest.accidentals(), -12);
    }

    #[test]
    fn test_display_round_trip() {
        for p in PitchClass::all(Some(6)).unwrap() {
            assert_eq!(PitchClass::parse(&p.to_string()).unwrap(), p);
            assert_eq!(PitchClass::parse(&p.to_unicode()).unwrap(), p);
        }
        assert_eq!(pc("F##").to_unicode(), "F𝄪");
        assert_eq!(pc("Ab").to_unicode(), "A♭");
        assert_eq!(pc("Abbb").to_unicode(), "A♭♭♭");
    }

    #[test]
    fn test_enharmonic_to() {
        assert_eq!(pc("C#").enharmonic_to(Letter::D).unwrap(), pc("Db"));
        assert_eq!(pc("B#").enharmonic_to(Letter::C).unwrap(), pc("C"));
        assert_eq!(pc("C").enharmonic_to(Letter::B).unwrap(), pc("B#"));
    }

    #[test]
    fn test_serde_as_string() {
        let yaml = serde_yaml::to_string(&pc("F#")).unwrap();
        let parsed: PitchClass = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, pc("F#"));
        let back: PitchClass = serde_yaml::from_str("Eb").unwrap();
        assert_eq!(back, pc("Eb"));
    }
}
