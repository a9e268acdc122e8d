// Copyright (c) 2026 Robert L. Snyder, Sierra Vista, AZ
// Licensed under the MIT License. See LICENSE file in the project root for details.

//! Named interval recipes for chords and scales.
//!
//! Recipes are declared as static text tables and resolved into typed
//! interval lists once, when the catalogue is first loaded.

use std::collections::HashMap;

use super::chord::BASE_OCTAVE;
use super::error::{Result, TheoryError};
use super::interval::Interval;
use super::pitch_class::PitchClass;

/// Static recipe declaration: canonical name and interval spellings
pub type RecipeTable = &'static [(&'static str, &'static [&'static str])];

/// Static alias declaration: shorthand and the canonical name it stands for
pub type AliasTable = &'static [(&'static str, &'static str)];

/// A resolved recipe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub name: &'static str,
    pub intervals: Vec<Interval>,
}

/// A validated catalogue of recipes plus their aliases
#[derive(Debug, Clone)]
pub struct RecipeBook {
    recipes: Vec<Recipe>,
    by_name: HashMap<&'static str, usize>,
    aliases: HashMap<&'static str, &'static str>,
}

impl RecipeBook {
    /// Resolve and validate a static table.
    ///
    /// Every recipe must start at P1 and ascend strictly; names must be
    /// unique and every alias must point at a known recipe.
    pub fn load(recipes: RecipeTable, aliases: AliasTable) -> Result<Self> {
        let mut book = Self {
            recipes: Vec::with_capacity(recipes.len()),
            by_name: HashMap::new(),
            aliases: HashMap::new(),
        };

        for &(name, texts) in recipes {
            let intervals = texts
                .iter()
                .map(|t| Interval::parse(t))
                .collect::<Result<Vec<_>>>()
                .map_err(|e| TheoryError::argument(format!("recipe {}: {}", name, e)))?;
            if intervals.first() != Some(&Interval::unison()) {
                return Err(TheoryError::argument(format!("recipe {} must start at P1", name)));
            }
            if intervals.windows(2).any(|w| w[0] >= w[1]) {
                return Err(TheoryError::argument(format!(
                    "recipe {} is not strictly ascending",
                    name
                )));
            }
            if book.by_name.insert(name, book.recipes.len()).is_some() {
                return Err(TheoryError::argument(format!("duplicate recipe {}", name)));
            }
            book.recipes.push(Recipe { name, intervals });
        }

        for &(alias, target) in aliases {
            if !book.by_name.contains_key(target) {
                return Err(TheoryError::argument(format!(
                    "alias {} points at unknown recipe {}",
                    alias, target
                )));
            }
            if book.by_name.contains_key(alias) || book.aliases.insert(alias, target).is_some() {
                return Err(TheoryError::argument(format!("duplicate alias {}", alias)));
            }
        }

        Ok(book)
    }

    /// Recipes in declaration order
    pub fn recipes(&self) -> &[Recipe] {
        &self.recipes
    }

    /// Look up by canonical name or alias
    pub fn resolve(&self, name: &str) -> Option<&Recipe> {
        let canonical = self.aliases.get(name).copied().unwrap_or(name);
        self.by_name.get(canonical).map(|&i| &self.recipes[i])
    }

    /// First recipe with exactly these intervals
    pub fn find_by_intervals(&self, intervals: &[Interval]) -> Option<&Recipe> {
        self.recipes.iter().find(|r| r.intervals == intervals)
    }

    /// Every canonical name and alias, longest first
    pub fn suffixes(&self) -> Vec<(&'static str, &'static str)> {
        let mut out: Vec<(&'static str, &'static str)> = self
            .recipes
            .iter()
            .map(|r| (r.name, r.name))
            .chain(self.aliases.iter().map(|(&a, &t)| (a, t)))
            .collect();
        out.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then(a.0.cmp(b.0)));
        out
    }
}

/// Pitch classes of `intervals` stacked on `root`, spelled from the root
pub(crate) fn spell_pitches(
    root: PitchClass,
    intervals: &[Interval],
    kind: &str,
) -> Result<Vec<PitchClass>> {
    let base = root.to_octave(BASE_OCTAVE)?;
    intervals
        .iter()
        .map(|i| base.add_interval(i).map(|n| n.pitch_class()))
        .collect::<Result<Vec<_>>>()
        .map_err(|e| TheoryError::argument(format!("cannot spell {} on {}: {}", kind, root, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    const RECIPES: RecipeTable = &[("maj", &["P1", "M3", "P5"]), ("min", &["P1", "m3", "P5"])];
    const ALIASES: AliasTable = &[("M", "maj"), ("m", "min")];

    #[test]
    fn test_load_and_resolve() {
        let book = RecipeBook::load(RECIPES, ALIASES).unwrap();
        assert_eq!(book.recipes().len(), 2);
        assert_eq!(book.resolve("M").unwrap().name, "maj");
        assert_eq!(book.resolve("min").unwrap().intervals.len(), 3);
        assert!(book.resolve("dim").is_none());
    }

    #[test]
    fn test_find_by_intervals() {
        let book = RecipeBook::load(RECIPES, ALIASES).unwrap();
        let minor = book.resolve("m").unwrap().intervals.clone();
        assert_eq!(book.find_by_intervals(&minor).unwrap().name, "min");
    }

    #[test]
    fn test_suffixes_longest_first() {
        let book = RecipeBook::load(RECIPES, ALIASES).unwrap();
        let suffixes = book.suffixes();
        assert_eq!(suffixes.len(), 4);
        assert!(suffixes[0].0.len() >= suffixes[3].0.len());
    }

    #[test]
    fn test_rejects_malformed_tables() {
        const BAD_INTERVAL: RecipeTable = &[("bad", &["P1", "X3"])];
        const NO_UNISON: RecipeTable = &[("nounison", &["M3", "P5"])];
        const UNSORTED: RecipeTable = &[("unsorted", &["P1", "P5", "M3"])];
        const DUPLICATE: RecipeTable = &[("a", &["P1"]), ("a", &["P1", "P5"])];
        const DANGLING: AliasTable = &[("x", "nope")];

        assert!(RecipeBook::load(BAD_INTERVAL, &[]).is_err());
        assert!(RecipeBook::load(NO_UNISON, &[]).is_err());
        assert!(RecipeBook::load(UNSORTED, &[]).is_err());
        assert!(RecipeBook::load(DUPLICATE, &[]).is_err());
        assert!(RecipeBook::load(RECIPES, DANGLING).is_err());
    }

    #[test]
    fn test_spell_pitches() {
        let book = RecipeBook::load(RECIPES, ALIASES).unwrap();
        let minor = &book.resolve("min").unwrap().intervals;
        let root = PitchClass::parse("Eb").unwrap();
        let expected: Vec<PitchClass> = ["Eb", "Gb", "Bb"]
            .iter()
            .map(|s| PitchClass::parse(s).unwrap())
            .collect();
        assert_eq!(spell_pitches(root, minor, "chord").unwrap(), expected);

        let far = PitchClass::parse("B######").unwrap();
        let major = &book.resolve("maj").unwrap().intervals;
        assert!(matches!(
            spell_pitches(far, major, "chord"),
            Err(TheoryError::InvalidArgument(_))
        ));
    }
}
