//! Entry sources for the snapshot builder.
//!
//! A source yields [`Entry`] values one at a time. [`JsonLinesSource`] reads
//! one [`EntryRecord`] per line:
//!
//! ```text
//! {"token": "cat", "rarity": "common", "senses": [{"ipa": "/kæt/", "pos": "noun"}]}
//! ```

use std::fs::File;
use std::io::{BufRead, BufReader, ErrorKind, Read};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};
use crate::lexicon::{Entry, PartOfSpeech, Rarity, RegisterTag, Sense};
use crate::phoneme::{UnknownSymbolPolicy, encode_with};

/// A stream of entries to ingest.
pub trait EntrySource: Iterator<Item = Result<Entry>> + Send {
    /// Human-readable name for logs and progress messages.
    fn name(&self) -> &str;
}

/// Entries already in memory.
#[derive(Debug)]
pub struct VecSource {
    name: String,
    entries: std::vec::IntoIter<Entry>,
}

impl VecSource {
    pub fn new(name: impl Into<String>, entries: Vec<Entry>) -> Self {
        Self {
            name: name.into(),
            entries: entries.into_iter(),
        }
    }
}

impl Iterator for VecSource {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        self.entries.next().map(Ok)
    }
}

impl EntrySource for VecSource {
    fn name(&self) -> &str {
        &self.name
    }
}

/// One ingestion record. Tags are free text and mapped lossily.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryRecord {
    pub token: String,
    #[serde(default)]
    pub rarity: String,
    #[serde(default)]
    pub senses: Vec<SenseRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SenseRecord {
    pub ipa: String,
    #[serde(default)]
    pub pos: String,
    #[serde(default)]
    pub register: String,
    #[serde(default)]
    pub meaning: String,
}

impl EntryRecord {
    /// Convert to an entry, encoding IPA under `policy`.
    ///
    /// Senses whose pronunciation is rejected are dropped with a warning.
    /// Returns `None` if no sense survives.
    pub fn into_entry(self, policy: UnknownSymbolPolicy) -> Option<Entry> {
        let mut entry = Entry::new(self.token, Rarity::from_tag_lossy(&self.rarity));
        for sense in self.senses {
            match encode_with(&sense.ipa, policy) {
                Ok(key) => entry.senses.push(
                    Sense::new(key, PartOfSpeech::from_tag_lossy(&sense.pos))
                        .with_register(RegisterTag::from_tag_lossy(&sense.register))
                        .with_meaning(sense.meaning),
                ),
                Err(e) => log::warn!("dropping sense of {:?}: {e}", entry.token),
            }
        }
        if entry.senses.is_empty() {
            log::warn!("skipping {:?}: no usable pronunciation", entry.token);
            return None;
        }
        Some(entry)
    }
}

/// Reads JSON-lines records from any reader.
pub struct JsonLinesSource<R> {
    name: String,
    lines: std::io::Lines<BufReader<R>>,
    line_number: usize,
    policy: UnknownSymbolPolicy,
}

impl JsonLinesSource<File> {
    /// Open a JSON-lines file.
    pub fn open(path: impl AsRef<Path>, policy: UnknownSymbolPolicy) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path)?;
        Ok(Self::new(path.display().to_string(), file, policy))
    }
}

impl<R: Read> JsonLinesSource<R> {
    pub fn new(name: impl Into<String>, reader: R, policy: UnknownSymbolPolicy) -> Self {
        Self {
            name: name.into(),
            lines: BufReader::new(reader).lines(),
            line_number: 0,
            policy,
        }
    }
}

impl<R> JsonLinesSource<R> {
    fn malformed(&self, error: impl std::fmt::Display) -> CadenceError {
        CadenceError::invalid_format(format!("{} line {}: {error}", self.name, self.line_number))
    }
}

impl<R: Read> Iterator for JsonLinesSource<R> {
    type Item = Result<Entry>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            self.line_number += 1;
            let line = match self.lines.next()? {
                Ok(line) => line,
                Err(e) if e.kind() == ErrorKind::InvalidData => return Some(Err(self.malformed(e))),
                Err(e) => return Some(Err(e.into())),
            };
            if line.trim().is_empty() {
                continue;
            }

            let record: EntryRecord = match serde_json::from_str(&line) {
                Ok(record) => record,
                Err(e) => return Some(Err(self.malformed(e))),
            };
            if let Some(entry) = record.into_entry(self.policy) {
                return Some(Ok(entry));
            }
        }
    }
}

impl<R: Read + Send> EntrySource for JsonLinesSource<R> {
    fn name(&self) -> &str {
        &self.name
    }
}
