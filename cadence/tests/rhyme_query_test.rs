use cadence::lexicon::{Entry, LexiconStore, PartOfSpeech, Rarity, RegisterTag, Sense};
use cadence::rhyme::{RhymeKeys, RhymeQuery, RhymeType};
use cadence::{PhonemeKey, Snapshot};

fn lexicon() -> LexiconStore {
    let mut lexicon = LexiconStore::new();
    lexicon.add_entry(Entry::word("cat", "kæt", PartOfSpeech::Noun));
    lexicon.add_entry(
        Entry::new("bat", Rarity::Common)
            .with_sense(Sense::from_ipa("bæt", PartOfSpeech::Noun))
            .with_sense(Sense::from_ipa("bæt", PartOfSpeech::Verb)),
    );
    lexicon.add_entry(Entry::word("can", "kæn", PartOfSpeech::Verb));
    lexicon.add_entry(Entry::word("hat", "hæt", PartOfSpeech::Noun));
    lexicon.add_entry(Entry::word("rat", "ɹæt", PartOfSpeech::Noun));
    lexicon.add_entry(Entry::word("nap", "næp", PartOfSpeech::Noun));
    lexicon.add_entry(Entry::word("trap", "tɹæp", PartOfSpeech::Noun));
    lexicon.add_entry(Entry::word("attack", "əˈtæk", PartOfSpeech::Verb));
    lexicon.add_entry(Entry::word("acrobat", "ˈækɹəbæt", PartOfSpeech::Noun));
    lexicon.add_entry(
        Entry::new("brat", Rarity::Rare)
            .with_sense(Sense::from_ipa("bɹæt", PartOfSpeech::Noun).with_register(RegisterTag::Slang)),
    );
    lexicon.add_entry(Entry::word("dog", "dɒɡ", PartOfSpeech::Noun));
    lexicon
}

fn tokens(store: &LexiconStore) -> Vec<&str> {
    store.entries().iter().map(|e| e.token.as_str()).collect()
}

#[test]
fn test_perfect_rhymes() {
    let snapshot = Snapshot::build(lexicon());
    let rhymes = snapshot.get_rhymes("cat", &RhymeQuery::default());
    assert_eq!(tokens(&rhymes), vec!["cat", "bat", "hat", "rat", "brat"]);
}

#[test]
fn test_vowel_only_rhymes() {
    let snapshot = Snapshot::build(lexicon());
    let rhymes = snapshot.get_rhymes("cat", &RhymeQuery::new(RhymeType::VowelOnly));
    assert_eq!(
        tokens(&rhymes),
        vec!["cat", "bat", "can", "hat", "rat", "nap", "trap", "attack", "acrobat", "brat"]
    );
    assert!(!rhymes.has_entry("dog"));
}

#[test]
fn test_lookup_is_case_insensitive() {
    let snapshot = Snapshot::build(lexicon());
    let lower = snapshot.get_rhymes("cat", &RhymeQuery::default());
    let upper = snapshot.get_rhymes("CAT", &RhymeQuery::default());
    assert_eq!(tokens(&lower), tokens(&upper));
}

#[test]
fn test_unknown_token_is_empty() {
    let snapshot = Snapshot::build(lexicon());
    assert!(snapshot.get_rhymes("zzznotaword", &RhymeQuery::default()).is_empty());
    assert!(snapshot.get_rhymes("", &RhymeQuery::default()).is_empty());
}

#[test]
fn test_syllable_filter() {
    let snapshot = Snapshot::build(lexicon());
    let two = RhymeQuery::builder()
        .rhyme_type(RhymeType::VowelOnly)
        .syllables(2)
        .build();
    assert_eq!(tokens(&snapshot.get_rhymes("cat", &two)), vec!["attack"]);

    let three = RhymeQuery::builder()
        .rhyme_type(RhymeType::VowelOnly)
        .syllables(3)
        .build();
    assert_eq!(tokens(&snapshot.get_rhymes("cat", &three)), vec!["acrobat"]);
}

#[test]
fn test_part_of_speech_filter_checks_each_sense() {
    let snapshot = Snapshot::build(lexicon());
    let verbs = RhymeQuery::builder().part_of_speech(PartOfSpeech::Verb).build();
    assert_eq!(tokens(&snapshot.get_rhymes("cat", &verbs)), vec!["bat"]);
}

#[test]
fn test_register_filter() {
    let snapshot = Snapshot::build(lexicon());
    let rare = RhymeQuery::builder().register(Rarity::Rare).build();
    assert_eq!(tokens(&snapshot.get_rhymes("cat", &rare)), vec!["brat"]);

    let slang = RhymeQuery::builder().register(RegisterTag::Slang).build();
    assert_eq!(tokens(&snapshot.get_rhymes("cat", &slang)), vec!["brat"]);

    let archaic = RhymeQuery::builder().register(RegisterTag::Archaic).build();
    assert!(snapshot.get_rhymes("cat", &archaic).is_empty());
}

#[test]
fn test_exclude_query() {
    let snapshot = Snapshot::build(lexicon());
    let query = RhymeQuery::builder().exclude_query(true).build();
    let rhymes = snapshot.get_rhymes("Cat", &query);
    assert!(!rhymes.has_entry("cat"));
    assert_eq!(rhymes.len(), 4);
}

#[test]
fn test_multi_sense_results_are_deduplicated() {
    let snapshot = Snapshot::build(lexicon());
    let rhymes = snapshot.get_rhymes("bat", &RhymeQuery::default());
    assert_eq!(tokens(&rhymes), vec!["cat", "bat", "hat", "rat", "brat"]);
    assert_eq!(rhymes.get_entry("bat").unwrap().senses.len(), 2);
}

#[test]
fn test_phrase_rhymes() {
    let mut lexicon = lexicon();
    assert!(lexicon.add_phrase("rat trap"));
    assert!(lexicon.add_phrase("bat nap"));
    assert!(!lexicon.add_phrase("hat trick"));
    let snapshot = Snapshot::build(lexicon);

    // "cat nap" is not stored; it is synthesized from its words
    let rhymes = snapshot.get_rhymes("cat nap", &RhymeQuery::default());
    assert_eq!(tokens(&rhymes), vec!["rat trap", "bat nap"]);

    let loose = snapshot.get_rhymes("cat nap", &RhymeQuery::new(RhymeType::VowelOnly));
    assert!(loose.has_entry("nap"));
    assert!(loose.has_entry("trap"));
    assert!(loose.has_entry("rat trap"));
    assert!(!loose.has_entry("dog"));
}

#[test]
fn test_perfect_candidates_share_vowels_and_final_cluster() {
    let snapshot = Snapshot::build(lexicon());
    let store = snapshot.lexicon();

    for (_, _, sense) in store.senses() {
        let Some(query) = RhymeKeys::derive(&sense.key) else {
            continue;
        };
        if query.last_consonants.is_empty() {
            continue;
        }
        for candidate in snapshot.rhyme_candidates(&sense.key, RhymeType::Perfect) {
            let hit = store.get_sense(candidate).unwrap();
            let keys = RhymeKeys::derive(&hit.key).unwrap();
            assert_eq!(keys.vowel_seq, query.vowel_seq);
            assert_eq!(keys.last_consonants, query.last_consonants);
        }
    }
}

#[test]
fn test_candidates_are_ascending_and_in_range() {
    let snapshot = Snapshot::build(lexicon());
    for rhyme_type in [RhymeType::Perfect, RhymeType::VowelOnly] {
        let candidates = snapshot.rhyme_candidates(&PhonemeKey::from_ipa("kæt"), rhyme_type);
        assert!(candidates.windows(2).all(|pair| pair[0] < pair[1]));
        assert!(
            candidates
                .iter()
                .all(|&c| snapshot.lexicon().has_sense_index(c))
        );
    }
}

#[test]
fn test_non_rhymable_key_has_no_candidates() {
    let snapshot = Snapshot::build(lexicon());
    let key = PhonemeKey::from_ipa("pst");
    assert!(snapshot.rhyme_candidates(&key, RhymeType::Perfect).is_empty());
    assert!(snapshot.rhyme_candidates(&key, RhymeType::VowelOnly).is_empty());
}

#[test]
fn test_rebuilds_are_identical() {
    let a = Snapshot::build(lexicon());
    let b = Snapshot::build(lexicon());
    assert_eq!(a.index(), b.index());
    assert_eq!(a.to_bytes().unwrap(), b.to_bytes().unwrap());
}

#[test]
fn test_sorted_store_gives_same_rhymes() {
    let mut sorted = lexicon();
    sorted.sort_entries_lexicographically();
    let snapshot = Snapshot::build(sorted);

    let mut rhymes = tokens(&snapshot.get_rhymes("cat", &RhymeQuery::default()))
        .into_iter()
        .map(str::to_string)
        .collect::<Vec<_>>();
    rhymes.sort();
    assert_eq!(rhymes, vec!["bat", "brat", "cat", "hat", "rat"]);
}
