//! Immutable lexicon and index pairs.
//!
//! A [`Snapshot`] owns a [`LexiconStore`] together with the [`RhymeIndex`]
//! built from it, so the index can never describe a different store than the
//! one it is queried against. To change the lexicon, take it back with
//! [`Snapshot::into_lexicon`] and build a new snapshot.
//!
//! # Module Structure
//!
//! - `format`: the persisted container (header, checksum, archived body)

pub mod format;

use serde::Serialize;

use crate::error::Result;
use crate::lexicon::LexiconStore;
use crate::phoneme::PhonemeKey;
use crate::rhyme::{IndexStats, RhymeIndex, RhymeQuery, RhymeType, search};

/// Summary counts for a snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SnapshotStats {
    pub entries: usize,
    pub phrases: usize,
    pub senses: usize,
    pub index: IndexStats,
}

/// A lexicon store plus the rhyme index built from exactly that store.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    lexicon: LexiconStore,
    index: RhymeIndex,
}

impl Snapshot {
    /// Index `lexicon` and freeze both.
    pub fn build(lexicon: LexiconStore) -> Self {
        let index = RhymeIndex::build(&lexicon);
        Self { lexicon, index }
    }

    pub fn empty() -> Self {
        Self::build(LexiconStore::new())
    }

    pub(crate) fn from_parts(lexicon: LexiconStore, index: RhymeIndex) -> Self {
        Self { lexicon, index }
    }

    pub fn lexicon(&self) -> &LexiconStore {
        &self.lexicon
    }

    pub fn index(&self) -> &RhymeIndex {
        &self.index
    }

    /// Give up the index and return the store for further mutation.
    pub fn into_lexicon(self) -> LexiconStore {
        self.lexicon
    }

    /// Candidate global sense indices for a pronunciation.
    pub fn rhyme_candidates(&self, key: &PhonemeKey, rhyme_type: RhymeType) -> Vec<u32> {
        self.index.candidates(key, rhyme_type)
    }

    /// Entries that rhyme with `token`, in first-seen order.
    ///
    /// Unknown tokens give an empty store. Phrase tokens that are not stored
    /// are synthesized from their words.
    pub fn get_rhymes(&self, token: &str, query: &RhymeQuery) -> LexiconStore {
        search::get_rhymes(&self.lexicon, &self.index, token, query)
    }

    pub fn stats(&self) -> SnapshotStats {
        SnapshotStats {
            entries: self.lexicon.len(),
            phrases: self
                .lexicon
                .entries()
                .iter()
                .filter(|entry| entry.is_phrase())
                .count(),
            senses: self.lexicon.sense_count(),
            index: self.index.stats(),
        }
    }

    /// Serialize into the persisted container format.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        format::encode(self)
    }

    /// Parse a persisted container.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        format::decode(bytes)
    }
}

impl From<LexiconStore> for Snapshot {
    fn from(lexicon: LexiconStore) -> Self {
        Self::build(lexicon)
    }
}
