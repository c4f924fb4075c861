//! The lexicon store: entries, senses and their global addressing.
//!
//! Entries keep insertion order, and an entry's position is its index.
//! Every sense gets a global index at insertion time; the flattened
//! addressing table maps it back to `(entry, local sense)` in O(1). Indices
//! only move on an explicit re-sort or a last-wins replacement, and both
//! rebuild the table wholesale.

use std::borrow::Cow;

use ahash::AHashMap;

use crate::lexicon::entry::{Entry, Sense, is_phrase_token, token_key};
use crate::lexicon::tag::{PartOfSpeech, Rarity, RegisterTag};
use crate::phoneme::PhonemeKey;

/// Where a global sense index points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SenseAddress {
    pub entry: u32,
    pub sense: u32,
}

/// Canonical collection of entries and senses.
#[derive(Debug, Clone, Default)]
pub struct LexiconStore {
    entries: Vec<Entry>,
    tokens: AHashMap<String, u32>,
    senses: Vec<SenseAddress>,
}

impl LexiconStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from entries, dropping later duplicates.
    pub fn from_entries<I: IntoIterator<Item = Entry>>(entries: I) -> Self {
        let mut store = Self::new();
        for entry in entries {
            store.add_entry(entry);
        }
        store
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of globally addressed senses.
    pub fn sense_count(&self) -> usize {
        self.senses.len()
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// Add an entry unless its token already exists (case-insensitive).
    ///
    /// Returns `true` if the entry was stored. The first write wins; later
    /// duplicates are dropped silently.
    pub fn add_entry(&mut self, entry: Entry) -> bool {
        let key = token_key(&entry.token);
        if key.is_empty() || self.tokens.contains_key(&key) {
            return false;
        }

        let entry_index = self.entries.len() as u32;
        for local in 0..entry.senses.len() {
            self.senses.push(SenseAddress {
                entry: entry_index,
                sense: local as u32,
            });
        }
        self.tokens.insert(key, entry_index);
        self.entries.push(entry);
        true
    }

    /// Add an entry, replacing any existing entry with the same token.
    ///
    /// A replacement keeps the entry's position but regenerates all sense
    /// indices. Returns `true` if an existing entry was replaced.
    pub fn upsert_entry(&mut self, entry: Entry) -> bool {
        let replaced = self.replace_entry_deferred(entry);
        if replaced {
            self.rebuild_sense_table();
        }
        replaced
    }

    /// [`upsert_entry`](Self::upsert_entry) without regenerating sense
    /// indices on replacement.
    ///
    /// The addressing table is stale after a replacement until
    /// [`rebuild_sense_table`](Self::rebuild_sense_table) runs.
    pub(crate) fn replace_entry_deferred(&mut self, entry: Entry) -> bool {
        let key = token_key(&entry.token);
        match self.tokens.get(&key) {
            Some(&index) => {
                self.entries[index as usize] = entry;
                true
            }
            None => {
                self.add_entry(entry);
                false
            }
        }
    }

    /// Synthesize a phrase entry from existing words and store it.
    pub fn add_phrase(&mut self, phrase: &str) -> bool {
        match self.synthesize_phrase(phrase) {
            Some(entry) => self.add_entry(entry),
            None => false,
        }
    }

    /// Case-insensitive lookup, falling back to phrase synthesis for
    /// phrase-shaped tokens that are not stored.
    pub fn get_entry(&self, token: &str) -> Option<Cow<'_, Entry>> {
        if let Some(entry) = self.entry_index(token).and_then(|i| self.entries.get(i as usize)) {
            return Some(Cow::Borrowed(entry));
        }
        if is_phrase_token(token) {
            return self.synthesize_phrase(token).map(Cow::Owned);
        }
        None
    }

    /// Index of a stored entry. Does not synthesize phrases.
    pub fn entry_index(&self, token: &str) -> Option<u32> {
        self.tokens.get(&token_key(token)).copied()
    }

    pub fn get_entry_by_index(&self, index: usize) -> Option<&Entry> {
        self.entries.get(index)
    }

    /// True if the token is stored. Does not synthesize phrases.
    pub fn has_entry(&self, token: &str) -> bool {
        self.entry_index(token).is_some()
    }

    pub fn has_sense_index(&self, index: u32) -> bool {
        (index as usize) < self.senses.len()
    }

    pub fn sense_address(&self, index: u32) -> Option<SenseAddress> {
        self.senses.get(index as usize).copied()
    }

    pub fn get_sense(&self, index: u32) -> Option<&Sense> {
        let address = self.sense_address(index)?;
        self.entries
            .get(address.entry as usize)?
            .senses
            .get(address.sense as usize)
    }

    pub fn owning_entry_index(&self, index: u32) -> Option<u32> {
        self.sense_address(index).map(|address| address.entry)
    }

    /// Iterate `(global index, entry, sense)` in global index order.
    pub fn senses(&self) -> impl Iterator<Item = (u32, &Entry, &Sense)> + '_ {
        self.senses.iter().enumerate().map(move |(global, address)| {
            let entry = &self.entries[address.entry as usize];
            (global as u32, entry, &entry.senses[address.sense as usize])
        })
    }

    /// A new store with the entries that satisfy `predicate`, in order.
    pub fn filter<F>(&self, mut predicate: F) -> LexiconStore
    where
        F: FnMut(&Entry) -> bool,
    {
        Self::from_entries(self.entries.iter().filter(|e| predicate(e)).cloned())
    }

    /// Append entries whose tokens are not present yet. Returns how many were added.
    pub fn append(&mut self, other: &LexiconStore) -> usize {
        other
            .entries
            .iter()
            .filter(|entry| self.add_entry((*entry).clone()))
            .count()
    }

    /// Reorder entries by case-folded token and reassign every index.
    ///
    /// Any rhyme index built before the sort no longer matches this store.
    pub fn sort_entries_lexicographically(&mut self) {
        self.entries.sort_by(|a, b| {
            token_key(&a.token)
                .cmp(&token_key(&b.token))
                .then_with(|| a.token.cmp(&b.token))
        });
        self.tokens = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| (token_key(&entry.token), i as u32))
            .collect();
        self.rebuild_sense_table();
    }

    /// Build a transient phrase entry from stored single words.
    ///
    /// The single sense's key joins each word's first-sense key with the
    /// space code. Returns `None` if any word is missing or has no senses.
    pub fn synthesize_phrase(&self, phrase: &str) -> Option<Entry> {
        let words: Vec<&str> = phrase.split_whitespace().collect();
        if words.len() < 2 {
            return None;
        }

        let mut keys: Vec<&PhonemeKey> = Vec::with_capacity(words.len());
        let mut rarity = Rarity::Common;
        for word in &words {
            let entry = self.entries.get(self.entry_index(word)? as usize)?;
            keys.push(entry.primary_key()?);
            rarity = rarity.max(entry.rarity);
        }

        let sense = Sense::new(PhonemeKey::join_phrase(keys), PartOfSpeech::Phrase)
            .with_register(RegisterTag::Neutral);
        Some(Entry::new(words.join(" "), rarity).with_sense(sense))
    }

    /// A new store holding the given entries in the given order.
    pub(crate) fn subset(&self, entry_indices: &[u32]) -> LexiconStore {
        Self::from_entries(
            entry_indices
                .iter()
                .filter_map(|&i| self.entries.get(i as usize))
                .cloned(),
        )
    }

    pub(crate) fn rebuild_sense_table(&mut self) {
        self.senses.clear();
        for (entry_index, entry) in self.entries.iter().enumerate() {
            for local in 0..entry.senses.len() {
                self.senses.push(SenseAddress {
                    entry: entry_index as u32,
                    sense: local as u32,
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn word(token: &str, ipa: &str) -> Entry {
        Entry::word(token, ipa, PartOfSpeech::Noun)
    }

    fn sample() -> LexiconStore {
        let mut store = LexiconStore::new();
        store.add_entry(word("cat", "kæt"));
        store.add_entry(
            Entry::new("bat", Rarity::Common)
                .with_sense(Sense::from_ipa("bæt", PartOfSpeech::Noun))
                .with_sense(Sense::from_ipa("bæt", PartOfSpeech::Verb)),
        );
        store.add_entry(word("nap", "næp"));
        store
    }

    #[test]
    fn test_sense_indices_are_sequential() {
        let store = sample();
        assert_eq!(store.len(), 3);
        assert_eq!(store.sense_count(), 4);

        assert_eq!(store.owning_entry_index(0), Some(0));
        assert_eq!(store.owning_entry_index(1), Some(1));
        assert_eq!(store.owning_entry_index(2), Some(1));
        assert_eq!(store.owning_entry_index(3), Some(2));
        assert_eq!(
            store.sense_address(2),
            Some(SenseAddress { entry: 1, sense: 1 })
        );
        assert_eq!(store.get_sense(2).unwrap().part_of_speech, PartOfSpeech::Verb);
    }

    #[test]
    fn test_out_of_range_accessors() {
        let store = sample();
        assert!(store.get_entry_by_index(99).is_none());
        assert!(store.get_sense(99).is_none());
        assert!(store.owning_entry_index(99).is_none());
        assert!(!store.has_sense_index(4));
        assert!(store.has_sense_index(3));
    }

    #[test]
    fn test_duplicates_first_write_wins() {
        let mut store = sample();
        let before = store.sense_count();
        assert!(!store.add_entry(word("CAT", "dɒɡ")));
        assert_eq!(store.sense_count(), before);
        assert_eq!(store.get_entry("Cat").unwrap().primary_key().unwrap().to_ipa(), "kæt");
    }

    #[test]
    fn test_upsert_replaces_and_readdresses() {
        let mut store = sample();
        let replacement = Entry::new("bat", Rarity::Rare)
            .with_sense(Sense::from_ipa("bæt", PartOfSpeech::Noun));
        assert!(store.upsert_entry(replacement));
        assert_eq!(store.len(), 3);
        assert_eq!(store.sense_count(), 3);
        assert_eq!(store.owning_entry_index(2), Some(2));
        assert_eq!(store.get_entry("bat").unwrap().rarity, Rarity::Rare);

        assert!(!store.upsert_entry(word("rat", "ɹæt")));
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_deferred_replacement_matches_upsert() {
        let stream = || {
            vec![
                Entry::new("cat", Rarity::Rare)
                    .with_sense(Sense::from_ipa("kæt", PartOfSpeech::Noun))
                    .with_sense(Sense::from_ipa("kæt", PartOfSpeech::Verb)),
                word("rat", "ɹæt"),
                Entry::new("bat", Rarity::Uncommon).with_sense(Sense::from_ipa("bæt", PartOfSpeech::Verb)),
                word("trap", "tɹæp"),
                word("Nap", "næp"),
            ]
        };

        let mut eager = sample();
        for entry in stream() {
            eager.upsert_entry(entry);
        }

        let mut deferred = sample();
        let replaced = stream()
            .into_iter()
            .map(|entry| deferred.replace_entry_deferred(entry))
            .filter(|&replaced| replaced)
            .count();
        deferred.rebuild_sense_table();

        assert_eq!(replaced, 3);
        assert_eq!(deferred.len(), eager.len());
        assert_eq!(deferred.sense_count(), eager.sense_count());
        assert_eq!(deferred.sense_count(), 6);
        for global in 0..eager.sense_count() as u32 {
            assert_eq!(deferred.sense_address(global), eager.sense_address(global));
        }
        assert_eq!(deferred.owning_entry_index(2), Some(1));
        assert_eq!(deferred.get_entry("bat").unwrap().senses.len(), 1);
    }

    #[test]
    fn test_case_insensitive_lookup() {
        let store = sample();
        assert!(store.has_entry("CAT"));
        assert!(store.get_entry("Nap").is_some());
        assert!(store.get_entry("zzznotaword").is_none());
    }

    #[test]
    fn test_phrase_synthesis() {
        let store = sample();
        let entry = store.get_entry("Cat  Nap").unwrap();
        assert!(matches!(entry, Cow::Owned(_)));
        assert_eq!(entry.token, "Cat Nap");
        assert_eq!(entry.senses.len(), 1);
        assert_eq!(entry.senses[0].part_of_speech, PartOfSpeech::Phrase);
        assert_eq!(entry.senses[0].key.to_ipa(), "kæt næp");

        // not persisted
        assert!(!store.has_entry("cat nap"));
        assert!(store.get_entry("cat zzz").is_none());
        assert!(store.synthesize_phrase("cat").is_none());
    }

    #[test]
    fn test_phrase_rarity_is_rarest_word() {
        let mut store = sample();
        store.add_entry(Entry::new("yclept", Rarity::Obsolete).with_sense(Sense::from_ipa(
            "ɪˈklɛpt",
            PartOfSpeech::Adjective,
        )));
        let entry = store.synthesize_phrase("cat yclept").unwrap();
        assert_eq!(entry.rarity, Rarity::Obsolete);
    }

    #[test]
    fn test_add_phrase_stores_entry() {
        let mut store = sample();
        assert!(store.add_phrase("cat nap"));
        assert!(store.has_entry("cat nap"));
        assert_eq!(store.sense_count(), 5);
        assert!(!store.add_phrase("cat zzz"));
    }

    #[test]
    fn test_sort_reassigns_indices() {
        let mut store = sample();
        store.add_entry(word("Ant", "ænt"));
        store.sort_entries_lexicographically();

        let tokens: Vec<_> = store.entries().iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens, vec!["Ant", "bat", "cat", "nap"]);
        assert_eq!(store.entry_index("cat"), Some(2));
        assert_eq!(store.owning_entry_index(0), Some(0));
        assert_eq!(store.owning_entry_index(1), Some(1));
        assert_eq!(store.owning_entry_index(2), Some(1));
        assert_eq!(store.get_sense(3).unwrap().key.to_ipa(), "kæt");
    }

    #[test]
    fn test_filter_clone_append() {
        let store = sample();
        let nouns_only = store.filter(|entry| entry.token != "bat");
        assert_eq!(nouns_only.len(), 2);
        assert_eq!(nouns_only.sense_count(), 2);

        let mut copy = store.clone();
        copy.add_entry(word("rat", "ɹæt"));
        assert_eq!(store.len(), 3);

        let mut merged = nouns_only;
        assert_eq!(merged.append(&copy), 2);
        assert_eq!(merged.len(), 4);
    }

    #[test]
    fn test_senses_iterator_matches_table() {
        let store = sample();
        for (global, entry, sense) in store.senses() {
            let address = store.sense_address(global).unwrap();
            assert_eq!(&store.entries()[address.entry as usize], entry);
            assert_eq!(store.get_sense(global).unwrap(), sense);
        }
        assert_eq!(store.senses().count(), store.sense_count());
    }

    #[test]
    fn test_subset_keeps_order() {
        let store = sample();
        let subset = store.subset(&[2, 0]);
        let tokens: Vec<_> = subset.entries().iter().map(|e| e.token.as_str()).collect();
        assert_eq!(tokens, vec!["nap", "cat"]);
    }
}
