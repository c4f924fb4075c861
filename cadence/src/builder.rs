//! The snapshot build pipeline.
//!
//! A [`SnapshotBuilder`] reads entries from any number of [`EntrySource`]s
//! into a lexicon store, optionally adds synthesized phrases and sorts, then
//! indexes the result into a [`Snapshot`]. The build checks its cancellation
//! predicate between phases only.
//!
//! # Module Structure
//!
//! - `source`: the [`EntrySource`] trait, in-memory and JSON-lines sources

pub mod source;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};
use crate::lexicon::LexiconStore;
use crate::snapshot::Snapshot;

pub use source::{EntryRecord, EntrySource, JsonLinesSource, SenseRecord, VecSource};

/// What to do when a source yields a token that is already stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DuplicatePolicy {
    /// Keep the first entry and drop later ones.
    #[default]
    FirstWins,
    /// Replace the stored entry with the later one.
    LastWins,
}

type StopFn = Box<dyn Fn() -> bool + Send + Sync>;
type ProgressFn = Box<dyn Fn(&str) + Send + Sync>;

/// Builds a [`Snapshot`] from entry sources.
///
/// # Example
///
/// ```
/// use cadence::builder::{SnapshotBuilder, VecSource};
/// use cadence::lexicon::{Entry, PartOfSpeech};
/// use cadence::rhyme::RhymeQuery;
///
/// let snapshot = SnapshotBuilder::new()
///     .source(VecSource::new("inline", vec![
///         Entry::word("cat", "kæt", PartOfSpeech::Noun),
///         Entry::word("hat", "hæt", PartOfSpeech::Noun),
///     ]))
///     .build()
///     .unwrap();
///
/// let rhymes = snapshot.get_rhymes("cat", &RhymeQuery::default());
/// assert!(rhymes.has_entry("hat"));
/// ```
#[derive(Default)]
pub struct SnapshotBuilder {
    base: LexiconStore,
    sources: Vec<Box<dyn EntrySource>>,
    phrases: Vec<String>,
    duplicates: DuplicatePolicy,
    sort_entries: bool,
    should_stop: Option<StopFn>,
    on_progress: Option<ProgressFn>,
}

impl SnapshotBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from an existing store instead of an empty one.
    pub fn from_lexicon(lexicon: LexiconStore) -> Self {
        Self {
            base: lexicon,
            ..Self::default()
        }
    }

    pub fn source<S: EntrySource + 'static>(mut self, source: S) -> Self {
        self.sources.push(Box::new(source));
        self
    }

    /// Synthesize and store a phrase once all sources are read.
    pub fn phrase(mut self, phrase: impl Into<String>) -> Self {
        self.phrases.push(phrase.into());
        self
    }

    pub fn duplicates(mut self, policy: DuplicatePolicy) -> Self {
        self.duplicates = policy;
        self
    }

    /// Sort entries by case-folded token before indexing.
    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.sort_entries = sort;
        self
    }

    /// Predicate polled between phases; returning `true` cancels the build.
    pub fn should_stop<F>(mut self, should_stop: F) -> Self
    where
        F: Fn() -> bool + Send + Sync + 'static,
    {
        self.should_stop = Some(Box::new(should_stop));
        self
    }

    /// Callback for human-readable progress messages.
    pub fn on_progress<F>(mut self, on_progress: F) -> Self
    where
        F: Fn(&str) + Send + Sync + 'static,
    {
        self.on_progress = Some(Box::new(on_progress));
        self
    }

    /// Run every phase and return the indexed snapshot.
    pub fn build(self) -> Result<Snapshot> {
        let SnapshotBuilder {
            mut base,
            sources,
            phrases,
            duplicates,
            sort_entries,
            should_stop,
            on_progress,
        } = self;

        let check = || -> Result<()> {
            match &should_stop {
                Some(stop) if stop() => {
                    log::info!("snapshot build cancelled");
                    Err(CadenceError::Cancelled)
                }
                _ => Ok(()),
            }
        };
        let progress = |message: String| {
            log::info!("{message}");
            if let Some(callback) = &on_progress {
                callback(&message);
            }
        };

        for mut source in sources {
            check()?;
            let name = source.name().to_string();
            progress(format!("reading {name}"));

            let (mut added, mut replaced, mut skipped) = (0usize, 0usize, 0usize);
            for entry in source.by_ref() {
                let entry = entry?;
                match duplicates {
                    DuplicatePolicy::FirstWins => {
                        if base.add_entry(entry) {
                            added += 1;
                        } else {
                            skipped += 1;
                        }
                    }
                    DuplicatePolicy::LastWins => {
                        if base.replace_entry_deferred(entry) {
                            replaced += 1;
                        } else {
                            added += 1;
                        }
                    }
                }
            }
            if replaced > 0 {
                base.rebuild_sense_table();
            }
            log::debug!("{name}: {added} added, {replaced} replaced, {skipped} duplicates skipped");
        }

        if !phrases.is_empty() {
            check()?;
            progress(format!("adding {} phrases", phrases.len()));
            for phrase in &phrases {
                if !base.add_phrase(phrase) {
                    log::warn!("could not add phrase {phrase:?}");
                }
            }
        }

        if sort_entries {
            check()?;
            progress(format!("sorting {} entries", base.len()));
            base.sort_entries_lexicographically();
        }

        check()?;
        progress(format!("indexing {} senses", base.sense_count()));
        let snapshot = Snapshot::build(base);

        let stats = snapshot.stats();
        progress(format!(
            "built snapshot: {} entries, {} senses, {} indexed",
            stats.entries, stats.senses, stats.index.indexed_senses
        ));
        Ok(snapshot)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    use super::*;
    use crate::lexicon::{Entry, PartOfSpeech, Rarity};

    fn words() -> VecSource {
        VecSource::new(
            "words",
            vec![
                Entry::word("rat", "ɹæt", PartOfSpeech::Noun),
                Entry::word("cat", "kæt", PartOfSpeech::Noun),
                Entry::word("nap", "næp", PartOfSpeech::Noun),
                Entry::word("trap", "tɹæp", PartOfSpeech::Noun),
            ],
        )
    }

    #[test]
    fn test_build_from_sources() {
        let snapshot = SnapshotBuilder::new()
            .source(words())
            .phrase("rat trap")
            .build()
            .unwrap();
        assert_eq!(snapshot.lexicon().len(), 5);
        assert!(snapshot.lexicon().has_entry("rat trap"));
    }

    #[test]
    fn test_sort_entries() {
        let snapshot = SnapshotBuilder::new()
            .source(words())
            .sort_entries(true)
            .build()
            .unwrap();
        let tokens: Vec<&str> = snapshot
            .lexicon()
            .entries()
            .iter()
            .map(|e| e.token.as_str())
            .collect();
        assert_eq!(tokens, vec!["cat", "nap", "rat", "trap"]);
    }

    #[test]
    fn test_duplicate_policies() {
        let later = || {
            VecSource::new(
                "later",
                vec![Entry::new("cat", Rarity::Rare).with_sense(crate::lexicon::Sense::from_ipa(
                    "kɑt",
                    PartOfSpeech::Noun,
                ))],
            )
        };

        let first = SnapshotBuilder::new().source(words()).source(later()).build().unwrap();
        assert_eq!(first.lexicon().get_entry("cat").unwrap().rarity, Rarity::Common);

        let last = SnapshotBuilder::new()
            .source(words())
            .source(later())
            .duplicates(DuplicatePolicy::LastWins)
            .build()
            .unwrap();
        assert_eq!(last.lexicon().get_entry("cat").unwrap().rarity, Rarity::Rare);
        assert_eq!(last.lexicon().len(), 4);
    }

    #[test]
    fn test_last_wins_addressing_matches_upserts() {
        let revised = || {
            VecSource::new(
                "revised",
                vec![
                    Entry::new("cat", Rarity::Rare)
                        .with_sense(crate::lexicon::Sense::from_ipa("kæt", PartOfSpeech::Noun))
                        .with_sense(crate::lexicon::Sense::from_ipa("kæt", PartOfSpeech::Verb)),
                    Entry::word("bat", "bæt", PartOfSpeech::Noun),
                    Entry::word("Trap", "tɹæp", PartOfSpeech::Verb),
                    Entry::word("hat", "hæt", PartOfSpeech::Noun),
                ],
            )
        };

        let snapshot = SnapshotBuilder::new()
            .source(words())
            .source(revised())
            .duplicates(DuplicatePolicy::LastWins)
            .build()
            .unwrap();

        let mut expected = LexiconStore::new();
        for entry in words().chain(revised()) {
            expected.upsert_entry(entry.unwrap());
        }

        let lexicon = snapshot.lexicon();
        assert_eq!(lexicon.len(), 6);
        assert_eq!(lexicon.sense_count(), expected.sense_count());
        assert_eq!(lexicon.sense_count(), 7);
        for global in 0..expected.sense_count() as u32 {
            assert_eq!(lexicon.sense_address(global), expected.sense_address(global));
        }
        // cat moved from one sense to two, shifting everything after it
        assert_eq!(lexicon.owning_entry_index(2), Some(1));
        assert_eq!(
            lexicon.get_sense(4).unwrap().part_of_speech,
            PartOfSpeech::Verb
        );
    }

    #[test]
    fn test_cancellation_between_phases() {
        let polls = Arc::new(AtomicUsize::new(0));
        let counter = polls.clone();
        let result = SnapshotBuilder::new()
            .source(words())
            .should_stop(move || counter.fetch_add(1, Ordering::SeqCst) >= 1)
            .build();
        assert!(matches!(result, Err(CadenceError::Cancelled)));
        // polled once before the source, once before indexing
        assert_eq!(polls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_progress_messages() {
        let messages = Arc::new(Mutex::new(Vec::new()));
        let sink = messages.clone();
        SnapshotBuilder::new()
            .source(words())
            .sort_entries(true)
            .on_progress(move |message| sink.lock().unwrap().push(message.to_string()))
            .build()
            .unwrap();

        let messages = messages.lock().unwrap();
        assert_eq!(messages[0], "reading words");
        assert_eq!(messages[1], "sorting 4 entries");
        assert_eq!(messages[2], "indexing 4 senses");
        assert!(messages[3].starts_with("built snapshot: 4 entries"));
    }

    #[test]
    fn test_source_errors_propagate() {
        struct Failing;
        impl Iterator for Failing {
            type Item = Result<Entry>;
            fn next(&mut self) -> Option<Self::Item> {
                Some(Err(CadenceError::invalid_format("broken")))
            }
        }
        impl EntrySource for Failing {
            fn name(&self) -> &str {
                "failing"
            }
        }

        let result = SnapshotBuilder::new().source(Failing).build();
        assert!(matches!(result, Err(CadenceError::InvalidFormat(_))));
    }
}
