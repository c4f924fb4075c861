use serde::{Deserialize, Serialize};

use crate::lexicon::tag::{PartOfSpeech, Rarity, RegisterTag};
use crate::phoneme::PhonemeKey;

/// One meaning or usage of a token, with its own pronunciation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sense {
    pub key: PhonemeKey,
    pub part_of_speech: PartOfSpeech,
    pub register: RegisterTag,
    pub meaning: String,
}

impl Sense {
    pub fn new(key: PhonemeKey, part_of_speech: PartOfSpeech) -> Self {
        Self {
            key,
            part_of_speech,
            register: RegisterTag::Neutral,
            meaning: String::new(),
        }
    }

    /// Build a sense from IPA text, skipping unknown symbols.
    pub fn from_ipa(ipa: &str, part_of_speech: PartOfSpeech) -> Self {
        Self::new(PhonemeKey::from_ipa(ipa), part_of_speech)
    }

    pub fn with_register(mut self, register: RegisterTag) -> Self {
        self.register = register;
        self
    }

    pub fn with_meaning(mut self, meaning: impl Into<String>) -> Self {
        self.meaning = meaning.into();
        self
    }

    pub fn syllable_count(&self) -> usize {
        self.key.syllable_count()
    }
}

/// A word or space-joined phrase with its senses.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub token: String,
    pub rarity: Rarity,
    pub senses: Vec<Sense>,
}

impl Entry {
    pub fn new(token: impl Into<String>, rarity: Rarity) -> Self {
        Self {
            token: token.into(),
            rarity,
            senses: Vec::new(),
        }
    }

    pub fn with_sense(mut self, sense: Sense) -> Self {
        self.senses.push(sense);
        self
    }

    /// Shorthand for a common single-sense entry.
    pub fn word(token: impl Into<String>, ipa: &str, part_of_speech: PartOfSpeech) -> Self {
        Self::new(token, Rarity::Common).with_sense(Sense::from_ipa(ipa, part_of_speech))
    }

    /// True if the token contains a word separator.
    pub fn is_phrase(&self) -> bool {
        is_phrase_token(&self.token)
    }

    /// Pronunciation of the first sense.
    pub fn primary_key(&self) -> Option<&PhonemeKey> {
        self.senses.first().map(|sense| &sense.key)
    }
}

/// Case-folded, whitespace-collapsed form used for token lookups.
pub fn token_key(token: &str) -> String {
    token
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

pub fn is_phrase_token(token: &str) -> bool {
    token.split_whitespace().nth(1).is_some()
}
