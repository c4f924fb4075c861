//! Closed tag enumerations for entries and senses.
//!
//! Ordinals are persisted, so each variant keeps its discriminant forever.
//! Free-text tags from ingestion sources go through `from_tag_lossy`, which
//! always lands on a variant (falling back to an explicit default).

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};

macro_rules! tag_enum {
    (
        $(#[$meta:meta])*
        $name:ident, fallback = $fallback:ident {
            $($variant:ident = $ordinal:literal => $label:literal),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        #[repr(u8)]
        pub enum $name {
            $($variant = $ordinal),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            /// Stable ordinal used by the persisted format.
            #[inline]
            pub fn ordinal(self) -> u8 {
                self as u8
            }

            pub fn from_ordinal(ordinal: u8) -> Option<Self> {
                match ordinal {
                    $($ordinal => Some($name::$variant),)+
                    _ => None,
                }
            }

            /// Canonical lowercase label.
            pub fn as_str(self) -> &'static str {
                match self {
                    $($name::$variant => $label),+
                }
            }

            /// Map a free-text source tag, falling back when it is not recognized.
            pub fn from_tag_lossy(tag: &str) -> Self {
                Self::from_alias(&tag.trim().to_lowercase()).unwrap_or($name::$fallback)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                $name::$fallback
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = CadenceError;

            fn from_str(s: &str) -> Result<Self> {
                Self::from_alias(&s.trim().to_lowercase()).ok_or_else(|| {
                    CadenceError::invalid_argument(format!(
                        "unknown {} tag: {s:?}",
                        stringify!($name)
                    ))
                })
            }
        }
    };
}

tag_enum! {
    /// How common a token is.
    Rarity, fallback = Common {
        Common = 0 => "common",
        Uncommon = 1 => "uncommon",
        Rare = 2 => "rare",
        Obsolete = 3 => "obsolete",
    }
}

impl Rarity {
    fn from_alias(tag: &str) -> Option<Self> {
        Some(match tag {
            "common" | "frequent" | "" => Rarity::Common,
            "uncommon" | "infrequent" => Rarity::Uncommon,
            "rare" | "rarely used" => Rarity::Rare,
            "obsolete" | "dated" | "archaic spelling" => Rarity::Obsolete,
            _ => return None,
        })
    }
}

tag_enum! {
    /// Grammatical category of a sense.
    PartOfSpeech, fallback = Other {
        Noun = 0 => "noun",
        Verb = 1 => "verb",
        Adjective = 2 => "adjective",
        Adverb = 3 => "adverb",
        Pronoun = 4 => "pronoun",
        Preposition = 5 => "preposition",
        Conjunction = 6 => "conjunction",
        Interjection = 7 => "interjection",
        Determiner = 8 => "determiner",
        Numeral = 9 => "numeral",
        Particle = 10 => "particle",
        ProperNoun = 11 => "proper_noun",
        Abbreviation = 12 => "abbreviation",
        Affix = 13 => "affix",
        Phrase = 14 => "phrase",
        Other = 15 => "other",
    }
}

impl PartOfSpeech {
    fn from_alias(tag: &str) -> Option<Self> {
        Some(match tag {
            "noun" | "n" => PartOfSpeech::Noun,
            "verb" | "v" => PartOfSpeech::Verb,
            "adjective" | "adj" | "a" => PartOfSpeech::Adjective,
            "adverb" | "adv" | "r" => PartOfSpeech::Adverb,
            "pronoun" | "pron" => PartOfSpeech::Pronoun,
            "preposition" | "prep" | "postposition" => PartOfSpeech::Preposition,
            "conjunction" | "conj" => PartOfSpeech::Conjunction,
            "interjection" | "intj" | "interj" => PartOfSpeech::Interjection,
            "determiner" | "det" | "article" => PartOfSpeech::Determiner,
            "numeral" | "num" | "number" => PartOfSpeech::Numeral,
            "particle" | "particle word" => PartOfSpeech::Particle,
            "proper_noun" | "proper noun" | "name" => PartOfSpeech::ProperNoun,
            "abbreviation" | "abbrev" | "abbr" | "initialism" | "acronym" => {
                PartOfSpeech::Abbreviation
            }
            "affix" | "prefix" | "suffix" | "infix" => PartOfSpeech::Affix,
            "phrase" | "idiom" | "proverb" => PartOfSpeech::Phrase,
            "other" => PartOfSpeech::Other,
            _ => return None,
        })
    }
}

tag_enum! {
    /// Usage register of a sense.
    RegisterTag, fallback = Neutral {
        Neutral = 0 => "neutral",
        Offensive = 1 => "offensive",
        Vulgar = 2 => "vulgar",
        Slang = 3 => "slang",
        Informal = 4 => "informal",
        Archaic = 5 => "archaic",
        Historical = 6 => "historical",
        Literary = 7 => "literary",
    }
}

impl RegisterTag {
    fn from_alias(tag: &str) -> Option<Self> {
        Some(match tag {
            "neutral" | "none" | "" => RegisterTag::Neutral,
            "offensive" | "derogatory" | "pejorative" | "ethnic slur" | "slur" => {
                RegisterTag::Offensive
            }
            "vulgar" | "obscene" => RegisterTag::Vulgar,
            "slang" | "internet slang" => RegisterTag::Slang,
            "informal" | "colloquial" => RegisterTag::Informal,
            "archaic" | "obsolete" => RegisterTag::Archaic,
            "historical" => RegisterTag::Historical,
            "literary" | "poetic" => RegisterTag::Literary,
            _ => return None,
        })
    }
}

/// A register filter value: either an entry rarity or a sense register tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Register {
    Rarity(Rarity),
    Tag(RegisterTag),
}

impl From<Rarity> for Register {
    fn from(rarity: Rarity) -> Self {
        Register::Rarity(rarity)
    }
}

impl From<RegisterTag> for Register {
    fn from(tag: RegisterTag) -> Self {
        Register::Tag(tag)
    }
}

impl fmt::Display for Register {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Register::Rarity(rarity) => rarity.fmt(f),
            Register::Tag(tag) => tag.fmt(f),
        }
    }
}

impl FromStr for Register {
    type Err = CadenceError;

    /// Canonical labels only; rarity labels win over register aliases.
    fn from_str(s: &str) -> Result<Self> {
        let label = s.trim().to_lowercase();
        if let Some(rarity) = Rarity::ALL.iter().find(|r| r.as_str() == label) {
            return Ok(Register::Rarity(*rarity));
        }
        if let Some(tag) = RegisterTag::ALL.iter().find(|t| t.as_str() == label) {
            return Ok(Register::Tag(*tag));
        }
        Err(CadenceError::invalid_argument(format!(
            "unknown register: {s:?}"
        )))
    }
}
