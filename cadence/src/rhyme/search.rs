use ahash::AHashSet;

use crate::lexicon::LexiconStore;
use crate::lexicon::entry::token_key;
use crate::rhyme::index::RhymeIndex;
use crate::rhyme::query::RhymeQuery;

/// Resolve `token`, collect candidates over all of its senses, post-filter,
/// and return the owning entries in first-seen order.
///
/// `index` must have been built from `store`.
pub(crate) fn get_rhymes(
    store: &LexiconStore,
    index: &RhymeIndex,
    token: &str,
    query: &RhymeQuery,
) -> LexiconStore {
    let Some(entry) = store.get_entry(token) else {
        return LexiconStore::new();
    };
    let own = token_key(&entry.token);

    let mut seen_senses = AHashSet::new();
    let mut seen_entries = AHashSet::new();
    let mut hits = Vec::new();
    for sense in &entry.senses {
        for candidate in index.candidates(&sense.key, query.rhyme_type) {
            if !seen_senses.insert(candidate) {
                continue;
            }
            let (Some(owner), Some(hit)) = (
                store.owning_entry_index(candidate),
                store.get_sense(candidate),
            ) else {
                continue;
            };
            let Some(owner_entry) = store.get_entry_by_index(owner as usize) else {
                continue;
            };
            if !query.accepts(owner_entry, hit) {
                continue;
            }
            if query.exclude_query && token_key(&owner_entry.token) == own {
                continue;
            }
            if seen_entries.insert(owner) {
                hits.push(owner);
            }
        }
    }

    log::debug!("{} rhymes for {token:?}", hits.len());
    store.subset(&hits)
}
