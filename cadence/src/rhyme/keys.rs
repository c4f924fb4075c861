//! Rhyme sub-key derivation.
//!
//! Every bucket key is computed from the segmental form of a pronunciation,
//! so stress marks, syllable breaks and length marks never split a rhyme.
//! The same derivation runs at build time and at query time.

use crate::phoneme::{PhonemeKey, SPACE};

/// The bucket keys of one pronunciation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RhymeKeys {
    /// Every vowel code of the key, in order.
    pub vowel_seq: Vec<u8>,
    /// The tail's vowel run before its final consonant cluster.
    pub end_vowel: Vec<u8>,
    /// The tail's rightmost vowel, if the tail has one.
    pub last_vowel: Option<u8>,
    /// The tail's final consonant cluster.
    pub last_consonants: Vec<u8>,
    /// First word's final cluster, the space code, last word's final cluster.
    /// Present only for keys with at least two non-empty words.
    pub phrase_edge: Option<Vec<u8>>,
}

impl RhymeKeys {
    /// Derive the bucket keys, or `None` if the key has no vowel.
    pub fn derive(key: &PhonemeKey) -> Option<Self> {
        let segmental = key.segmental();
        if !segmental.is_rhymable() {
            return None;
        }

        let words: Vec<PhonemeKey> = segmental
            .split_on_boundary()
            .into_iter()
            .filter(|word| !word.is_empty())
            .collect();
        let (first, tail) = match (words.first(), words.last()) {
            (Some(first), Some(tail)) => (first, tail),
            _ => return None,
        };

        let phrase_edge = (words.len() > 1).then(|| {
            let mut edge = first.trailing_consonants().into_bytes();
            edge.push(SPACE);
            edge.extend_from_slice(tail.trailing_consonants().as_bytes());
            edge
        });

        Some(Self {
            vowel_seq: segmental.vowels().into_bytes(),
            end_vowel: tail.trailing_vowel_run().into_bytes(),
            last_vowel: tail.last_vowel(),
            last_consonants: tail.trailing_consonants().into_bytes(),
            phrase_edge,
        })
    }

    /// True if the keys came from a multi-word pronunciation.
    pub fn is_phrase(&self) -> bool {
        self.phrase_edge.is_some()
    }
}
