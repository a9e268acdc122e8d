// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Notation settings for harmonia.
//!
//! Settings live in a YAML or TOML file and control how pitch classes and
//! notes are read and written: the accidental limit, the glyph set, and the
//! octave bare pitch classes are placed in.

use std::fs;
use std::path::Path;

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::music::{Glyphs, Note, PitchClass, DEFAULT_MAX_ACCIDENTALS, MAX_ACCIDENTAL_LIMIT};

/// Highest octave a configuration may use as its base
const MAX_BASE_OCTAVE: u8 = 9;

/// Notation settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Notation {
    /// Most accidentals accepted on a single letter
    #[serde(default = "default_max_accidentals")]
    pub max_accidentals: u8,
    /// Glyphs used when formatting
    #[serde(default)]
    pub glyphs: Glyphs,
    /// Octave used when a bare pitch class needs to become a note
    #[serde(default = "default_base_octave")]
    pub base_octave: u8,
}

fn default_max_accidentals() -> u8 {
    DEFAULT_MAX_ACCIDENTALS
}
fn default_base_octave() -> u8 {
    4
}

impl Default for Notation {
    fn default() -> Self {
        Self {
            max_accidentals: default_max_accidentals(),
            glyphs: Glyphs::default(),
            base_octave: default_base_octave(),
        }
    }
}

impl Notation {
    /// Load settings from a YAML (`.yaml`/`.yml`) or TOML (`.toml`) file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read notation file: {:?}", path))?;
        let notation = match path.extension().and_then(|e| e.to_str()) {
            Some("yaml") | Some("yml") => Self::from_yaml(&contents)?,
            Some("toml") => Self::from_toml(&contents)?,
            _ => bail!("Unsupported notation file type: {:?}", path),
        };
        notation.validate()?;
        Ok(notation)
    }

    /// Parse settings from a YAML string
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse YAML notation settings")
    }

    /// Parse settings from a TOML string
    pub fn from_toml(text: &str) -> Result<Self> {
        toml::from_str(text).context("Failed to parse TOML notation settings")
    }

    /// Serialize to a YAML string
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).context("Failed to serialize notation settings to YAML")
    }

    /// Save settings to a YAML file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let yaml = self.to_yaml()?;
        fs::write(path.as_ref(), yaml)
            .with_context(|| format!("Failed to write notation file: {:?}", path.as_ref()))
    }

    /// Check the settings are usable
    pub fn validate(&self) -> Result<()> {
        if self.max_accidentals == 0 || self.max_accidentals > MAX_ACCIDENTAL_LIMIT {
            bail!(
                "max_accidentals must be between 1 and {}, got {}",
                MAX_ACCIDENTAL_LIMIT,
                self.max_accidentals
            );
        }
        if self.base_octave > MAX_BASE_OCTAVE {
            bail!(
                "base_octave must be at most {}, got {}",
                MAX_BASE_OCTAVE,
                self.base_octave
            );
        }
        Ok(())
    }

    pub fn parse_pitch_class(&self, text: &str) -> Result<PitchClass> {
        PitchClass::parse_with_limit(text, self.max_accidentals)
            .with_context(|| format!("Invalid pitch class: {}", text))
    }

    pub fn parse_note(&self, text: &str) -> Result<Note> {
        Note::parse_with_limit(text, self.max_accidentals)
            .with_context(|| format!("Invalid note: {}", text))
    }

    /// Place a pitch class in the configured base octave
    pub fn place(&self, pitch_class: PitchClass) -> Result<Note> {
        pitch_class
            .to_octave(self.base_octave as i32)
            .with_context(|| format!("Cannot place {} in octave {}", pitch_class, self.base_octave))
    }

    pub fn format_pitch_class(&self, pitch_class: &PitchClass) -> String {
        pitch_class.render(self.glyphs)
    }

    pub fn format_note(&self, note: &Note) -> String {
        note.render(self.glyphs)
    }

    /// Every spelling within the configured accidental limit
    pub fn all_pitch_classes(&self) -> Result<Vec<PitchClass>> {
        PitchClass::all(Some(self.max_accidentals))
            .with_context(|| format!("Invalid accidental limit: {}", self.max_accidentals))
    }
}
