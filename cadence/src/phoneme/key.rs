//! Pronunciation keys and the sub-key operations the rhyme index is built on.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::phoneme::codec;
use crate::phoneme::symbol::{self, PhonemeClass, SPACE};

/// A byte-encoded pronunciation, one byte per matched symbol.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PhonemeKey(Vec<u8>);

impl PhonemeKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Encode IPA text, skipping unknown symbols.
    pub fn from_ipa(ipa: &str) -> Self {
        codec::encode(ipa)
    }

    /// Join per-word keys into a phrase key, separated by the space code.
    pub fn join_phrase<'a, I>(parts: I) -> Self
    where
        I: IntoIterator<Item = &'a PhonemeKey>,
    {
        let mut bytes = Vec::new();
        for (i, part) in parts.into_iter().enumerate() {
            if i > 0 {
                bytes.push(SPACE);
            }
            bytes.extend_from_slice(&part.0);
        }
        Self(bytes)
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// IPA text for this key.
    pub fn to_ipa(&self) -> String {
        codec::decode(&self.0)
    }

    /// Vowel codes in order.
    pub fn vowels(&self) -> PhonemeKey {
        self.filter_class(PhonemeClass::Vowel)
    }

    /// Consonant codes in order.
    pub fn consonants(&self) -> PhonemeKey {
        self.filter_class(PhonemeClass::Consonant)
    }

    /// Number of vowel codes.
    pub fn syllable_count(&self) -> usize {
        self.0.iter().filter(|&&code| symbol::is_vowel(code)).count()
    }

    /// A key without vowels cannot rhyme.
    pub fn is_rhymable(&self) -> bool {
        self.0.iter().any(|&code| symbol::is_vowel(code))
    }

    /// The rightmost vowel code.
    pub fn last_vowel(&self) -> Option<u8> {
        self.0.iter().rev().copied().find(|&code| symbol::is_vowel(code))
    }

    /// The maximal run of consonant codes ending at the last position.
    ///
    /// Empty when the key ends on a vowel or a boundary code, or is empty.
    /// Rhyme buckets read the cluster of the [`segmental`](Self::segmental)
    /// key, so `kæt.` has no cluster here but rhymes on `t`.
    pub fn trailing_consonants(&self) -> PhonemeKey {
        let start = self.0.len() - trailing_run(&self.0, symbol::is_consonant);
        Self(self.0[start..].to_vec())
    }

    /// The run of vowel codes that immediately precedes the trailing
    /// consonant cluster (or ends the key, if there is no cluster).
    pub fn trailing_vowel_run(&self) -> PhonemeKey {
        let coda = trailing_run(&self.0, symbol::is_consonant);
        let head = &self.0[..self.0.len() - coda];
        let start = head.len() - trailing_run(head, symbol::is_vowel);
        Self(head[start..].to_vec())
    }

    /// True iff the key contains the word separator.
    pub fn is_phrase(&self) -> bool {
        self.0.contains(&SPACE)
    }

    /// Split at word separators. Separators are not kept.
    pub fn split_on_boundary(&self) -> Vec<PhonemeKey> {
        self.0
            .split(|&code| code == SPACE)
            .map(|segment| Self(segment.to_vec()))
            .collect()
    }

    /// The key with stress, syllable-break and length codes removed.
    ///
    /// Word separators are kept so phrase structure survives.
    pub fn segmental(&self) -> PhonemeKey {
        Self(
            self.0
                .iter()
                .copied()
                .filter(|&code| code == SPACE || symbol::classify(code) != PhonemeClass::Boundary)
                .collect(),
        )
    }

    fn filter_class(&self, class: PhonemeClass) -> PhonemeKey {
        Self(
            self.0
                .iter()
                .copied()
                .filter(|&code| symbol::classify(code) == class)
                .collect(),
        )
    }
}

fn trailing_run(bytes: &[u8], pred: fn(u8) -> bool) -> usize {
    bytes.iter().rev().take_while(|&&code| pred(code)).count()
}

impl From<Vec<u8>> for PhonemeKey {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for PhonemeKey {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl AsRef<[u8]> for PhonemeKey {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for PhonemeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_ipa())
    }
}
