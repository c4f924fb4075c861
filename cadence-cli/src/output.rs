use anyhow::Result;
use cadence::phoneme::symbol::text_of;
use cadence::phoneme::{PhonemeClass, classify};
use cadence::{Entry, LexiconStore, PhonemeKey, RhymeQuery, Sense, SnapshotStats};
use clap::ValueEnum;
use serde::Serialize;
use serde_json::json;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format for CLI results.
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table.
    Table,
    /// JSON output.
    Json,
}

/// Print rhyme results, one row per sense that passes the query's filters.
pub fn print_rhymes(
    token: &str,
    rhymes: &LexiconStore,
    query: &RhymeQuery,
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(&rhymes_json(token, rhymes, query)),
        OutputFormat::Table => {
            if rhymes.is_empty() {
                println!("No rhymes found for '{token}'.");
                return Ok(());
            }

            let rows = rhyme_rows(rhymes, query);
            let table = Table::new(&rows).with(Style::rounded()).to_string();
            println!("{table}");
            println!("{} rhymes", rhymes.len());
            Ok(())
        }
    }
}

fn matching_senses<'a>(
    entry: &'a Entry,
    query: &'a RhymeQuery,
) -> impl Iterator<Item = &'a Sense> + 'a {
    entry.senses.iter().filter(move |sense| query.accepts(entry, sense))
}

fn rhymes_json(token: &str, rhymes: &LexiconStore, query: &RhymeQuery) -> serde_json::Value {
    let entries: Vec<serde_json::Value> = rhymes
        .entries()
        .iter()
        .map(|entry| {
            let senses: Vec<serde_json::Value> = matching_senses(entry, query)
                .map(|sense| {
                    json!({
                        "ipa": sense.key.to_ipa(),
                        "pos": sense.part_of_speech.as_str(),
                        "register": sense.register.as_str(),
                        "syllables": sense.syllable_count(),
                        "meaning": sense.meaning,
                    })
                })
                .collect();
            json!({
                "token": entry.token,
                "rarity": entry.rarity.as_str(),
                "senses": senses,
            })
        })
        .collect();
    json!({ "query": token, "rhymes": entries })
}

fn rhyme_rows(rhymes: &LexiconStore, query: &RhymeQuery) -> Vec<RhymeRow> {
    rhymes
        .entries()
        .iter()
        .flat_map(|entry| {
            matching_senses(entry, query).enumerate().map(move |(i, sense)| {
                let first = i == 0;
                RhymeRow {
                    token: if first { entry.token.clone() } else { String::new() },
                    rarity: if first {
                        entry.rarity.to_string()
                    } else {
                        String::new()
                    },
                    ipa: sense.key.to_ipa(),
                    pos: sense.part_of_speech.to_string(),
                    register: sense.register.to_string(),
                    syllables: sense.syllable_count(),
                }
            })
        })
        .collect()
}

/// Print the codes of an encoded pronunciation.
pub fn print_key(input: &str, key: &PhonemeKey, format: OutputFormat) -> Result<()> {
    let rows: Vec<CodeRow> = key
        .as_bytes()
        .iter()
        .enumerate()
        .map(|(position, &code)| CodeRow {
            position,
            code: format!("0x{code:02X}"),
            class: class_label(classify(code)),
            symbol: text_of(code).unwrap_or("?").to_string(),
        })
        .collect();

    match format {
        OutputFormat::Json => print_json(&json!({
            "input": input,
            "ipa": key.to_ipa(),
            "syllables": key.syllable_count(),
            "rhymable": key.is_rhymable(),
            "codes": rows,
        })),
        OutputFormat::Table => {
            if rows.is_empty() {
                println!("No symbols recognized in '{input}'.");
                return Ok(());
            }
            let table = Table::new(&rows).with(Style::rounded()).to_string();
            println!("{table}");
            println!("{} ({} syllables)", key.to_ipa(), key.syllable_count());
            Ok(())
        }
    }
}

/// Print snapshot statistics.
pub fn print_stats(stats: &SnapshotStats, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Json => print_json(stats),
        OutputFormat::Table => {
            let summary = vec![
                StatRow::new("Entries", stats.entries),
                StatRow::new("Phrases", stats.phrases),
                StatRow::new("Senses", stats.senses),
                StatRow::new("Indexed senses", stats.index.indexed_senses),
            ];
            let table = Table::new(&summary).with(Style::rounded()).to_string();
            println!("{table}");

            let buckets: Vec<BucketRow> = stats
                .index
                .buckets
                .iter()
                .map(|bucket| BucketRow {
                    name: bucket.name,
                    keys: bucket.keys,
                    postings: bucket.postings,
                    largest: bucket.largest,
                })
                .collect();
            let table = Table::new(&buckets).with(Style::rounded()).to_string();
            println!("{table}");
            Ok(())
        }
    }
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn class_label(class: PhonemeClass) -> &'static str {
    match class {
        PhonemeClass::Vowel => "vowel",
        PhonemeClass::Consonant => "consonant",
        PhonemeClass::Boundary => "boundary",
    }
}

#[derive(Debug, Tabled)]
struct RhymeRow {
    #[tabled(rename = "Token")]
    token: String,
    #[tabled(rename = "Rarity")]
    rarity: String,
    #[tabled(rename = "IPA")]
    ipa: String,
    #[tabled(rename = "POS")]
    pos: String,
    #[tabled(rename = "Register")]
    register: String,
    #[tabled(rename = "Syllables")]
    syllables: usize,
}

#[derive(Tabled, Serialize)]
struct CodeRow {
    #[tabled(rename = "#")]
    position: usize,
    #[tabled(rename = "Code")]
    code: String,
    #[tabled(rename = "Class")]
    class: &'static str,
    #[tabled(rename = "Symbol")]
    symbol: String,
}

#[derive(Tabled)]
struct StatRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Value")]
    value: usize,
}

impl StatRow {
    fn new(metric: &'static str, value: usize) -> Self {
        Self { metric, value }
    }
}

#[derive(Tabled)]
struct BucketRow {
    #[tabled(rename = "Bucket")]
    name: &'static str,
    #[tabled(rename = "Keys")]
    keys: usize,
    #[tabled(rename = "Postings")]
    postings: usize,
    #[tabled(rename = "Largest")]
    largest: usize,
}
