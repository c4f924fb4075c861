//! The rhyme index: five packed bucket maps built from one lexicon store.

use std::fmt;

use serde::Serialize;

use crate::error::{CadenceError, Result};
use crate::lexicon::LexiconStore;
use crate::phoneme::PhonemeKey;
use crate::rhyme::keys::RhymeKeys;
use crate::rhyme::postings::{BucketMap, BucketMapBuilder, intersect_sorted};
use crate::rhyme::query::RhymeType;

/// The named inverted maps of a [`RhymeIndex`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Bucket {
    VowelSeq,
    EndVowel,
    LastVowel,
    LastConsonant,
    PhraseEdge,
}

impl Bucket {
    pub const ALL: [Bucket; 5] = [
        Bucket::VowelSeq,
        Bucket::EndVowel,
        Bucket::LastVowel,
        Bucket::LastConsonant,
        Bucket::PhraseEdge,
    ];

    /// Persisted map name.
    pub fn name(self) -> &'static str {
        match self {
            Bucket::VowelSeq => "vowel_seq",
            Bucket::EndVowel => "end_vowel",
            Bucket::LastVowel => "last_vowel",
            Bucket::LastConsonant => "last_consonant",
            Bucket::PhraseEdge => "phrase_edge",
        }
    }

    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|bucket| bucket.name() == name)
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which bucket layout an index was built with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IndexScheme {
    /// Vowel-sequence, end-vowel, last-vowel, last-consonant and phrase-edge buckets.
    EdgeCluster = 1,
}

impl IndexScheme {
    pub const CURRENT: IndexScheme = IndexScheme::EdgeCluster;

    pub fn as_u16(self) -> u16 {
        self as u16
    }

    pub fn from_u16(value: u16) -> Option<Self> {
        match value {
            1 => Some(IndexScheme::EdgeCluster),
            _ => None,
        }
    }
}

/// Per-map statistics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketStats {
    pub name: &'static str,
    pub keys: usize,
    pub postings: usize,
    pub largest: usize,
}

/// Statistics for a whole index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IndexStats {
    pub sense_count: usize,
    pub indexed_senses: usize,
    pub buckets: Vec<BucketStats>,
}

/// Precomputed inverted maps from rhyme sub-keys to global sense indices.
///
/// An index is built from exactly one [`LexiconStore`] and is never updated
/// afterwards; a changed store needs a new index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RhymeIndex {
    maps: [BucketMap; 5],
    sense_count: usize,
    indexed_senses: usize,
}

impl RhymeIndex {
    /// Build the index with one pass over the store's senses.
    pub fn build(store: &LexiconStore) -> Self {
        let mut builders: [BucketMapBuilder; 5] = Default::default();
        let mut indexed_senses = 0;

        for (global, _entry, sense) in store.senses() {
            let Some(keys) = RhymeKeys::derive(&sense.key) else {
                continue;
            };
            indexed_senses += 1;

            builders[Bucket::VowelSeq.slot()].push(&keys.vowel_seq, global);
            if !keys.end_vowel.is_empty() {
                builders[Bucket::EndVowel.slot()].push(&keys.end_vowel, global);
            }
            if let Some(vowel) = keys.last_vowel {
                builders[Bucket::LastVowel.slot()].push(&[vowel], global);
            }
            if !keys.last_consonants.is_empty() {
                builders[Bucket::LastConsonant.slot()].push(&keys.last_consonants, global);
            }
            if let Some(edge) = &keys.phrase_edge {
                builders[Bucket::PhraseEdge.slot()].push(edge, global);
            }
        }

        Self {
            maps: builders.map(BucketMapBuilder::build),
            sense_count: store.sense_count(),
            indexed_senses,
        }
    }

    /// Assemble an index from decoded maps, in [`Bucket::ALL`] order.
    pub(crate) fn from_maps(maps: [BucketMap; 5], sense_count: usize) -> Result<Self> {
        if let Some(bad) = maps
            .iter()
            .flat_map(|map| map.iter())
            .flat_map(|(_, list)| list.iter())
            .find(|&&index| index as usize >= sense_count)
        {
            return Err(CadenceError::invalid_format(format!(
                "sense index {bad} out of range ({sense_count} senses)"
            )));
        }
        let indexed_senses = maps[Bucket::VowelSeq.slot()].posting_count();
        Ok(Self {
            maps,
            sense_count,
            indexed_senses,
        })
    }

    pub fn bucket(&self, bucket: Bucket) -> &BucketMap {
        &self.maps[bucket.slot()]
    }

    /// Number of senses in the store the index was built from.
    pub fn sense_count(&self) -> usize {
        self.sense_count
    }

    /// Candidate sense indices for `key`, ascending.
    ///
    /// Keys without vowels and keys whose primary bucket is absent give no
    /// candidates. An absent secondary bucket does not constrain the result.
    pub fn candidates(&self, key: &PhonemeKey, rhyme_type: RhymeType) -> Vec<u32> {
        let Some(keys) = RhymeKeys::derive(key) else {
            return Vec::new();
        };

        let (primary, secondary): (Option<&[u32]>, Option<&[u32]>) = if let Some(edge) =
            &keys.phrase_edge
        {
            let primary = self.bucket(Bucket::EndVowel).get(&keys.end_vowel);
            let secondary = match rhyme_type {
                RhymeType::Perfect => self.bucket(Bucket::PhraseEdge).get(edge),
                RhymeType::VowelOnly => None,
            };
            (primary, secondary)
        } else {
            match rhyme_type {
                RhymeType::Perfect => {
                    let primary = self.bucket(Bucket::VowelSeq).get(&keys.vowel_seq);
                    let secondary = if keys.last_consonants.is_empty() {
                        None
                    } else {
                        self.bucket(Bucket::LastConsonant).get(&keys.last_consonants)
                    };
                    (primary, secondary)
                }
                RhymeType::VowelOnly => {
                    let primary = keys
                        .last_vowel
                        .and_then(|vowel| self.bucket(Bucket::LastVowel).get(&[vowel]));
                    (primary, None)
                }
            }
        };

        match (primary, secondary) {
            (None, _) => Vec::new(),
            (Some(primary), None) => primary.to_vec(),
            (Some(primary), Some(secondary)) => intersect_sorted(primary, secondary),
        }
    }

    pub fn stats(&self) -> IndexStats {
        IndexStats {
            sense_count: self.sense_count,
            indexed_senses: self.indexed_senses,
            buckets: Bucket::ALL
                .iter()
                .map(|&bucket| {
                    let map = self.bucket(bucket);
                    BucketStats {
                        name: bucket.name(),
                        keys: map.len(),
                        postings: map.posting_count(),
                        largest: map.max_bucket_len(),
                    }
                })
                .collect(),
        }
    }

    pub(crate) fn maps(&self) -> &[BucketMap; 5] {
        &self.maps
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexicon::{Entry, PartOfSpeech};

    fn store() -> LexiconStore {
        LexiconStore::from_entries([
            Entry::word("cat", "kæt", PartOfSpeech::Noun),
            Entry::word("bat", "bæt", PartOfSpeech::Noun),
            Entry::word("can", "kæn", PartOfSpeech::Verb),
            Entry::word("hm", "hm", PartOfSpeech::Interjection),
            Entry::word("blue", "bluː", PartOfSpeech::Adjective),
            Entry::word("through", "θɹuː", PartOfSpeech::Preposition),
        ])
    }

    #[test]
    fn test_build_skips_vowelless_senses() {
        let index = RhymeIndex::build(&store());
        assert_eq!(index.sense_count(), 6);
        assert_eq!(index.stats().indexed_senses, 5);
        assert_eq!(index.bucket(Bucket::VowelSeq).posting_count(), 5);
        // "blue" and "through" end on a vowel
        assert_eq!(index.bucket(Bucket::LastConsonant).posting_count(), 3);
        assert!(index.bucket(Bucket::PhraseEdge).is_empty());
    }

    #[test]
    fn test_perfect_vs_vowel_only() {
        let index = RhymeIndex::build(&store());
        let cat = PhonemeKey::from_ipa("kæt");
        assert_eq!(index.candidates(&cat, RhymeType::Perfect), vec![0, 1]);
        assert_eq!(index.candidates(&cat, RhymeType::VowelOnly), vec![0, 1, 2]);
    }

    #[test]
    fn test_open_syllable_has_no_secondary() {
        let index = RhymeIndex::build(&store());
        let blue = PhonemeKey::from_ipa("bluː");
        assert_eq!(index.candidates(&blue, RhymeType::Perfect), vec![4, 5]);
    }

    #[test]
    fn test_absent_buckets() {
        let index = RhymeIndex::build(&store());
        assert!(index.candidates(&PhonemeKey::from_ipa("hm"), RhymeType::Perfect).is_empty());
        // primary absent
        assert!(index.candidates(&PhonemeKey::from_ipa("ɔɪ"), RhymeType::Perfect).is_empty());
        // secondary absent: no constraint
        assert_eq!(
            index.candidates(&PhonemeKey::from_ipa("ɡæʒ"), RhymeType::Perfect),
            vec![0, 1, 2]
        );
    }

    #[test]
    fn test_cluster_membership_follows_segmental_key() {
        let mut store = store();
        store.add_entry(Entry::word("kit", "ˈkɪt.", PartOfSpeech::Noun));
        store.add_entry(Entry::word("seat", "siːt", PartOfSpeech::Noun));
        store.add_entry(Entry::word("sea", "siː.", PartOfSpeech::Noun));
        store.add_entry(Entry::word("cat nap", "kæt næp", PartOfSpeech::Phrase));
        let index = RhymeIndex::build(&store);
        let bucket = index.bucket(Bucket::LastConsonant);

        for (global, entry, sense) in store.senses() {
            let tail = sense
                .key
                .segmental()
                .split_on_boundary()
                .into_iter()
                .filter(|word| !word.is_empty())
                .next_back()
                .unwrap_or_default();
            let cluster = tail.trailing_consonants();
            let listed = bucket
                .get(cluster.as_bytes())
                .is_some_and(|postings| postings.contains(&global));
            let rhymable = sense.key.is_rhymable();
            assert_eq!(listed, rhymable && !cluster.is_empty(), "{}", entry.token);
        }

        let t = PhonemeKey::from_ipa("t").into_bytes();
        assert!(bucket.get(&t).unwrap().contains(&6));
    }

    #[test]
    fn test_build_is_deterministic() {
        let a = RhymeIndex::build(&store());
        let b = RhymeIndex::build(&store());
        assert_eq!(a, b);
        for bucket in Bucket::ALL {
            assert_eq!(a.bucket(bucket).to_parts(), b.bucket(bucket).to_parts());
        }
    }

    #[test]
    fn test_bucket_names() {
        for bucket in Bucket::ALL {
            assert_eq!(Bucket::from_name(bucket.name()), Some(bucket));
        }
        assert_eq!(Bucket::from_name("rime"), None);
        assert_eq!(IndexScheme::from_u16(IndexScheme::CURRENT.as_u16()), Some(IndexScheme::CURRENT));
        assert_eq!(IndexScheme::from_u16(0), None);
    }

    #[test]
    fn test_from_maps_rejects_out_of_range() {
        let index = RhymeIndex::build(&store());
        assert!(RhymeIndex::from_maps(index.maps().clone(), 6).is_ok());
        assert!(RhymeIndex::from_maps(index.maps().clone(), 3).is_err());
    }
}
