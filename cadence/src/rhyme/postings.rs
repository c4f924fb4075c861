//! Packed bucket maps.
//!
//! A bucket map sends a byte key to a list of global sense indices. All lists
//! of one map live back to back in a single `Vec<u32>`; each key holds the
//! `(offset, len)` of its slice. Lists are ascending because the builder
//! receives indices in ascending order.

use ahash::AHashMap;

use crate::error::{CadenceError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Slot {
    offset: u32,
    len: u32,
}

/// An immutable, packed inverted map from bucket key to sense indices.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketMap {
    slots: AHashMap<Box<[u8]>, Slot>,
    postings: Vec<u32>,
}

/// Flat, key-sorted form of a [`BucketMap`] used by the persisted format.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketParts {
    pub keys: Vec<Vec<u8>>,
    /// `offset, len` pairs, one pair per key.
    pub slots: Vec<u32>,
    pub postings: Vec<u32>,
}

impl BucketMap {
    /// The sense indices stored under `key`.
    #[inline]
    pub fn get(&self, key: &[u8]) -> Option<&[u32]> {
        self.slots.get(key).map(|slot| {
            let start = slot.offset as usize;
            &self.postings[start..start + slot.len as usize]
        })
    }

    /// Number of distinct bucket keys.
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Total number of stored sense indices across all buckets.
    pub fn posting_count(&self) -> usize {
        self.postings.len()
    }

    /// Iterate buckets in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = (&[u8], &[u32])> + '_ {
        self.slots.iter().map(|(key, slot)| {
            let start = slot.offset as usize;
            (&key[..], &self.postings[start..start + slot.len as usize])
        })
    }

    /// Size of the largest bucket.
    pub fn max_bucket_len(&self) -> usize {
        self.slots.values().map(|slot| slot.len as usize).max().unwrap_or(0)
    }

    pub fn to_parts(&self) -> BucketParts {
        let mut entries: Vec<(&Box<[u8]>, &Slot)> = self.slots.iter().collect();
        entries.sort_unstable_by(|a, b| a.0.cmp(b.0));

        let mut parts = BucketParts {
            keys: Vec::with_capacity(entries.len()),
            slots: Vec::with_capacity(entries.len() * 2),
            postings: self.postings.clone(),
        };
        for (key, slot) in entries {
            parts.keys.push(key.to_vec());
            parts.slots.push(slot.offset);
            parts.slots.push(slot.len);
        }
        parts
    }

    /// Rebuild a map from persisted parts, checking every slot and index.
    ///
    /// `sense_count` bounds the sense indices the map may reference.
    pub fn from_parts(parts: BucketParts, sense_count: usize) -> Result<Self> {
        if parts.slots.len() != parts.keys.len() * 2 {
            return Err(CadenceError::invalid_format(format!(
                "bucket map has {} keys but {} slot values",
                parts.keys.len(),
                parts.slots.len()
            )));
        }
        if let Some(bad) = parts.postings.iter().find(|&&i| i as usize >= sense_count) {
            return Err(CadenceError::invalid_format(format!(
                "sense index {bad} out of range ({sense_count} senses)"
            )));
        }

        let mut slots = AHashMap::with_capacity(parts.keys.len());
        for (key, pair) in parts.keys.into_iter().zip(parts.slots.chunks_exact(2)) {
            let slot = Slot {
                offset: pair[0],
                len: pair[1],
            };
            let end = slot.offset as usize + slot.len as usize;
            if end > parts.postings.len() {
                return Err(CadenceError::invalid_format(format!(
                    "bucket slot {}..{end} exceeds {} postings",
                    slot.offset,
                    parts.postings.len()
                )));
            }
            if slots.insert(key.into_boxed_slice(), slot).is_some() {
                return Err(CadenceError::invalid_format("duplicate bucket key"));
            }
        }

        Ok(Self {
            slots,
            postings: parts.postings,
        })
    }
}

/// Accumulates bucket lists during an index build.
#[derive(Debug, Default)]
pub struct BucketMapBuilder {
    buckets: AHashMap<Vec<u8>, Vec<u32>>,
}

impl BucketMapBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append `index` to the bucket for `key`.
    #[inline]
    pub fn push(&mut self, key: &[u8], index: u32) {
        match self.buckets.get_mut(key) {
            Some(list) => list.push(index),
            None => {
                self.buckets.insert(key.to_vec(), vec![index]);
            }
        }
    }

    /// Pack the buckets. Keys are laid out in sorted order so equal inputs
    /// give equal layouts.
    pub fn build(self) -> BucketMap {
        let mut buckets: Vec<(Vec<u8>, Vec<u32>)> = self.buckets.into_iter().collect();
        buckets.sort_unstable_by(|a, b| a.0.cmp(&b.0));

        let total = buckets.iter().map(|(_, list)| list.len()).sum();
        let mut postings = Vec::with_capacity(total);
        let mut slots = AHashMap::with_capacity(buckets.len());
        for (key, list) in buckets {
            let slot = Slot {
                offset: postings.len() as u32,
                len: list.len() as u32,
            };
            postings.extend_from_slice(&list);
            slots.insert(key.into_boxed_slice(), slot);
        }

        BucketMap { slots, postings }
    }
}

/// Intersect two ascending lists, keeping the order of `primary`.
pub fn intersect_sorted(primary: &[u32], secondary: &[u32]) -> Vec<u32> {
    let mut out = Vec::with_capacity(primary.len().min(secondary.len()));
    let (mut i, mut j) = (0, 0);
    while i < primary.len() && j < secondary.len() {
        match primary[i].cmp(&secondary[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                out.push(primary[i]);
                i += 1;
                j += 1;
            }
        }
    }
    out
}
