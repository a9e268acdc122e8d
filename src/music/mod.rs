// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Spelled music theory: pitch classes, intervals, notes, chords, and scales.
//!
//! Every value keeps its letter spelling, so C# and Db are different pitch
//! classes and an augmented fourth is not a diminished fifth.

/// Text conversions for values that parse from and display as one string
macro_rules! text_conversions {
    ($($ty:ty),+ $(,)?) => {$(
        impl std::str::FromStr for $ty {
            type Err = TheoryError;

            fn from_str(s: &str) -> Result<Self> {
                Self::parse(s)
            }
        }

        impl TryFrom<String> for $ty {
            type Error = TheoryError;

            fn try_from(s: String) -> Result<Self> {
                Self::parse(&s)
            }
        }

        impl From<$ty> for String {
            fn from(value: $ty) -> String {
                value.to_string()
            }
        }
    )+};
}

pub mod chord;
pub mod element;
pub mod error;
pub mod interval;
pub mod note;
pub mod pitch_class;
pub mod recipe;
pub mod scale;

pub use chord::{Chord, ChordIndex, ChordMatch};
pub use element::Element;
pub use error::{Result, TheoryError};
pub use interval::{Interval, Quality};
pub use note::{Note, SpellingIndex};
pub use pitch_class::{Glyphs, Letter, PitchClass, DEFAULT_MAX_ACCIDENTALS, MAX_ACCIDENTAL_LIMIT};
pub use recipe::{Recipe, RecipeBook};
pub use scale::{Extension, Scale};

text_conversions!(PitchClass, Interval, Note, Chord, Scale);
