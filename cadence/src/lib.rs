//! # Cadence
//!
//! A phonetic rhyme-indexing engine.
//!
//! ## Features
//!
//! - Compact one-byte-per-symbol encoding of IPA pronunciations
//! - Lexicon store with stable global sense addressing
//! - Precomputed rhyme buckets for perfect and vowel-only rhymes
//! - Phrase rhymes synthesized from single words
//! - Filtering by syllable count, part of speech and register
//! - Versioned, checksummed snapshot persistence
//! - Pluggable storage backends
//!
//! ## Example
//!
//! ```
//! use cadence::lexicon::{Entry, LexiconStore, PartOfSpeech};
//! use cadence::rhyme::{RhymeQuery, RhymeType};
//! use cadence::Snapshot;
//!
//! let mut lexicon = LexiconStore::new();
//! lexicon.add_entry(Entry::word("cat", "kæt", PartOfSpeech::Noun));
//! lexicon.add_entry(Entry::word("bat", "bæt", PartOfSpeech::Noun));
//! lexicon.add_entry(Entry::word("can", "kæn", PartOfSpeech::Verb));
//!
//! let snapshot = Snapshot::build(lexicon);
//! let perfect = snapshot.get_rhymes("cat", &RhymeQuery::default());
//! assert_eq!(perfect.len(), 2);
//!
//! let loose = snapshot.get_rhymes("cat", &RhymeQuery::new(RhymeType::VowelOnly));
//! assert_eq!(loose.len(), 3);
//! ```
pub mod builder;
pub mod engine;
mod error;
pub mod lexicon;
pub mod phoneme;
pub mod rhyme;
pub mod snapshot;
pub mod storage;

// Re-exports for the public API
pub use builder::{DuplicatePolicy, EntrySource, SnapshotBuilder};
pub use engine::{EngineConfig, RhymeEngine};
pub use error::{CadenceError, Result};
pub use lexicon::{Entry, LexiconStore, PartOfSpeech, Rarity, Register, RegisterTag, Sense};
pub use phoneme::{PhonemeKey, UnknownSymbolPolicy};
pub use rhyme::{RhymeIndex, RhymeQuery, RhymeType};
pub use snapshot::{Snapshot, SnapshotStats};
pub use storage::{Storage, StorageConfig, StorageFactory};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
