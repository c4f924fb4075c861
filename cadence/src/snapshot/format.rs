//! Versioned binary container for snapshots.
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │ magic "CDNC"               [u8; 4]       │
//! │ format version             u16           │
//! │ symbol table version       u16           │
//! │ index scheme               u16           │
//! │ reserved                   u16           │
//! │ body length                u64           │
//! │ body CRC-32                u32           │
//! ├──────────────────────────────────────────┤
//! │ rkyv archive: entries + bucket maps      │
//! └──────────────────────────────────────────┘
//! ```
//!
//! All header integers are little-endian. Tags are stored as their ordinals.

use std::io::{Cursor, Read, Write};

use byteorder::{LittleEndian, ReadBytesExt, WriteBytesExt};
use rkyv::util::AlignedVec;
use rkyv::{Archive, Deserialize as RkyvDeserialize, Serialize as RkyvSerialize};

use crate::error::{CadenceError, Result};
use crate::lexicon::{Entry, LexiconStore, PartOfSpeech, Rarity, RegisterTag, Sense};
use crate::phoneme::{PhonemeKey, SYMBOL_TABLE_VERSION};
use crate::rhyme::{Bucket, BucketMap, BucketParts, IndexScheme, RhymeIndex};
use crate::snapshot::Snapshot;

pub const MAGIC: [u8; 4] = *b"CDNC";
pub const FORMAT_VERSION: u16 = 1;
pub const HEADER_SIZE: usize = 24;

/// Fixed-size container header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapshotHeader {
    pub format_version: u16,
    pub symbol_table_version: u16,
    pub index_scheme: u16,
    pub body_len: u64,
    pub checksum: u32,
}

impl SnapshotHeader {
    fn for_body(body: &[u8]) -> Self {
        Self {
            format_version: FORMAT_VERSION,
            symbol_table_version: SYMBOL_TABLE_VERSION,
            index_scheme: IndexScheme::CURRENT.as_u16(),
            body_len: body.len() as u64,
            checksum: crc32fast::hash(body),
        }
    }

    pub fn write<W: Write>(&self, w: &mut W) -> Result<()> {
        w.write_all(&MAGIC)?;
        w.write_u16::<LittleEndian>(self.format_version)?;
        w.write_u16::<LittleEndian>(self.symbol_table_version)?;
        w.write_u16::<LittleEndian>(self.index_scheme)?;
        w.write_u16::<LittleEndian>(0)?; // reserved
        w.write_u64::<LittleEndian>(self.body_len)?;
        w.write_u32::<LittleEndian>(self.checksum)?;
        Ok(())
    }

    /// Parse and check the header at the start of `bytes`.
    pub fn read(bytes: &[u8]) -> Result<Self> {
        if bytes.len() < HEADER_SIZE {
            return Err(CadenceError::invalid_format(format!(
                "snapshot truncated: {} bytes, header needs {HEADER_SIZE}",
                bytes.len()
            )));
        }

        let mut r = Cursor::new(&bytes[..HEADER_SIZE]);
        let mut magic = [0u8; 4];
        r.read_exact(&mut magic)?;
        if magic != MAGIC {
            return Err(CadenceError::invalid_format(format!(
                "bad snapshot magic: {magic:?}"
            )));
        }

        let format_version = r.read_u16::<LittleEndian>()?;
        let symbol_table_version = r.read_u16::<LittleEndian>()?;
        let index_scheme = r.read_u16::<LittleEndian>()?;
        let _reserved = r.read_u16::<LittleEndian>()?;
        let body_len = r.read_u64::<LittleEndian>()?;
        let checksum = r.read_u32::<LittleEndian>()?;

        if format_version != FORMAT_VERSION {
            return Err(CadenceError::UnsupportedVersion {
                what: "snapshot format",
                found: format_version,
                expected: FORMAT_VERSION,
            });
        }
        if symbol_table_version != SYMBOL_TABLE_VERSION {
            return Err(CadenceError::UnsupportedVersion {
                what: "symbol table",
                found: symbol_table_version,
                expected: SYMBOL_TABLE_VERSION,
            });
        }

        Ok(Self {
            format_version,
            symbol_table_version,
            index_scheme,
            body_len,
            checksum,
        })
    }
}

#[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
struct StoredSense {
    key: Vec<u8>,
    part_of_speech: u8,
    register: u8,
    meaning: String,
}

#[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
struct StoredEntry {
    token: String,
    rarity: u8,
    senses: Vec<StoredSense>,
}

#[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
struct StoredBucket {
    name: String,
    keys: Vec<Vec<u8>>,
    slots: Vec<u32>,
    postings: Vec<u32>,
}

#[derive(Archive, RkyvSerialize, RkyvDeserialize, Debug)]
struct StoredBody {
    entries: Vec<StoredEntry>,
    buckets: Vec<StoredBucket>,
}

/// Serialize a snapshot into a self-describing byte container.
pub fn encode(snapshot: &Snapshot) -> Result<Vec<u8>> {
    let body = StoredBody {
        entries: snapshot.lexicon().entries().iter().map(store_entry).collect(),
        buckets: Bucket::ALL
            .iter()
            .map(|&bucket| {
                let parts = snapshot.index().bucket(bucket).to_parts();
                StoredBucket {
                    name: bucket.name().to_string(),
                    keys: parts.keys,
                    slots: parts.slots,
                    postings: parts.postings,
                }
            })
            .collect(),
    };
    let archived = rkyv::to_bytes::<rkyv::rancor::Error>(&body)?;

    let mut out = Vec::with_capacity(HEADER_SIZE + archived.len());
    SnapshotHeader::for_body(&archived).write(&mut out)?;
    out.extend_from_slice(&archived);
    Ok(out)
}

/// Parse a container produced by [`encode`].
///
/// A container whose index scheme is not the current one still loads: the
/// entries are kept and the index is rebuilt from them.
pub fn decode(bytes: &[u8]) -> Result<Snapshot> {
    let header = SnapshotHeader::read(bytes)?;
    let body = &bytes[HEADER_SIZE..];
    if body.len() as u64 != header.body_len {
        return Err(CadenceError::invalid_format(format!(
            "snapshot body is {} bytes, header says {}",
            body.len(),
            header.body_len
        )));
    }
    let actual = crc32fast::hash(body);
    if actual != header.checksum {
        return Err(CadenceError::ChecksumMismatch {
            expected: header.checksum,
            actual,
        });
    }

    let mut aligned = AlignedVec::<16>::with_capacity(body.len());
    aligned.extend_from_slice(body);
    let stored = rkyv::from_bytes::<StoredBody, rkyv::rancor::Error>(&aligned)?;

    let entry_count = stored.entries.len();
    let entries = stored
        .entries
        .into_iter()
        .map(load_entry)
        .collect::<Result<Vec<_>>>()?;
    let lexicon = LexiconStore::from_entries(entries);
    if lexicon.len() != entry_count {
        return Err(CadenceError::invalid_format(
            "snapshot contains duplicate tokens",
        ));
    }

    if IndexScheme::from_u16(header.index_scheme) != Some(IndexScheme::CURRENT) {
        log::warn!(
            "snapshot index scheme {} differs from {}; rebuilding index from {} entries",
            header.index_scheme,
            IndexScheme::CURRENT.as_u16(),
            lexicon.len()
        );
        return Ok(Snapshot::build(lexicon));
    }

    let mut maps: [Option<BucketMap>; 5] = Default::default();
    for stored in stored.buckets {
        let Some(bucket) = Bucket::from_name(&stored.name) else {
            log::warn!("ignoring unknown bucket map {:?}", stored.name);
            continue;
        };
        let parts = BucketParts {
            keys: stored.keys,
            slots: stored.slots,
            postings: stored.postings,
        };
        maps[bucket as usize] = Some(BucketMap::from_parts(parts, lexicon.sense_count())?);
    }

    let mut ordered: [BucketMap; 5] = Default::default();
    for (bucket, slot) in Bucket::ALL.iter().zip(maps) {
        ordered[*bucket as usize] = slot.ok_or_else(|| {
            CadenceError::invalid_format(format!("snapshot is missing bucket map {bucket}"))
        })?;
    }
    let index = RhymeIndex::from_maps(ordered, lexicon.sense_count())?;

    Ok(Snapshot::from_parts(lexicon, index))
}

fn store_entry(entry: &Entry) -> StoredEntry {
    StoredEntry {
        token: entry.token.clone(),
        rarity: entry.rarity.ordinal(),
        senses: entry
            .senses
            .iter()
            .map(|sense| StoredSense {
                key: sense.key.as_bytes().to_vec(),
                part_of_speech: sense.part_of_speech.ordinal(),
                register: sense.register.ordinal(),
                meaning: sense.meaning.clone(),
            })
            .collect(),
    }
}

fn load_entry(stored: StoredEntry) -> Result<Entry> {
    let rarity = Rarity::from_ordinal(stored.rarity).ok_or_else(|| {
        CadenceError::invalid_format(format!("bad rarity ordinal {}", stored.rarity))
    })?;
    let mut entry = Entry::new(stored.token, rarity);
    for sense in stored.senses {
        let part_of_speech = PartOfSpeech::from_ordinal(sense.part_of_speech).ok_or_else(|| {
            CadenceError::invalid_format(format!(
                "bad part-of-speech ordinal {}",
                sense.part_of_speech
            ))
        })?;
        let register = RegisterTag::from_ordinal(sense.register).ok_or_else(|| {
            CadenceError::invalid_format(format!("bad register ordinal {}", sense.register))
        })?;
        entry.senses.push(
            Sense::new(PhonemeKey::from(sense.key), part_of_speech)
                .with_register(register)
                .with_meaning(sense.meaning),
        );
    }
    Ok(entry)
}
