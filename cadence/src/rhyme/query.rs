//! Rhyme query parameters.

use std::fmt;
use std::str::FromStr;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};
use crate::lexicon::{Entry, PartOfSpeech, Register, Sense};

/// Rhyme matching strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RhymeType {
    /// Same vowel sequence and same final consonant cluster.
    #[default]
    Perfect,
    /// Same final vowel only.
    VowelOnly,
}

impl RhymeType {
    pub fn as_str(self) -> &'static str {
        match self {
            RhymeType::Perfect => "perfect",
            RhymeType::VowelOnly => "vowel-only",
        }
    }
}

impl fmt::Display for RhymeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RhymeType {
    type Err = CadenceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "perfect" => Ok(RhymeType::Perfect),
            "vowel-only" | "vowel_only" | "vowel" => Ok(RhymeType::VowelOnly),
            other => Err(CadenceError::invalid_argument(format!(
                "unknown rhyme type: {other:?}"
            ))),
        }
    }
}

/// A rhyme query: strategy plus post-filters.
///
/// Empty allow-sets and a syllable count of zero mean "any".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhymeQuery {
    pub rhyme_type: RhymeType,
    pub syllables: usize,
    pub parts_of_speech: AHashSet<PartOfSpeech>,
    pub registers: AHashSet<Register>,
    /// Drop the queried entry from its own results.
    pub exclude_query: bool,
}

impl RhymeQuery {
    pub fn new(rhyme_type: RhymeType) -> Self {
        Self {
            rhyme_type,
            ..Default::default()
        }
    }

    pub fn builder() -> RhymeQueryBuilder {
        RhymeQueryBuilder::default()
    }

    /// True if a candidate sense passes every post-filter.
    pub fn accepts(&self, entry: &Entry, sense: &Sense) -> bool {
        if self.syllables != 0 && sense.syllable_count() != self.syllables {
            return false;
        }
        if !self.parts_of_speech.is_empty()
            && !self.parts_of_speech.contains(&sense.part_of_speech)
        {
            return false;
        }
        if !self.registers.is_empty()
            && !self.registers.contains(&Register::Rarity(entry.rarity))
            && !self.registers.contains(&Register::Tag(sense.register))
        {
            return false;
        }
        true
    }
}

#[derive(Debug, Default)]
pub struct RhymeQueryBuilder {
    query: RhymeQuery,
}

impl RhymeQueryBuilder {
    pub fn rhyme_type(mut self, rhyme_type: RhymeType) -> Self {
        self.query.rhyme_type = rhyme_type;
        self
    }

    /// Only keep senses with exactly this many vowel codes. Zero disables the filter.
    pub fn syllables(mut self, syllables: usize) -> Self {
        self.query.syllables = syllables;
        self
    }

    pub fn part_of_speech(mut self, part_of_speech: PartOfSpeech) -> Self {
        self.query.parts_of_speech.insert(part_of_speech);
        self
    }

    pub fn parts_of_speech<I: IntoIterator<Item = PartOfSpeech>>(mut self, parts: I) -> Self {
        self.query.parts_of_speech.extend(parts);
        self
    }

    pub fn register(mut self, register: impl Into<Register>) -> Self {
        self.query.registers.insert(register.into());
        self
    }

    pub fn registers<I: IntoIterator<Item = Register>>(mut self, registers: I) -> Self {
        self.query.registers.extend(registers);
        self
    }

    pub fn exclude_query(mut self, exclude: bool) -> Self {
        self.query.exclude_query = exclude;
        self
    }

    pub fn build(self) -> RhymeQuery {
        self.query
    }
}
