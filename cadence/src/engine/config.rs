use serde::{Deserialize, Serialize};

use crate::builder::DuplicatePolicy;
use crate::error::Result;
use crate::phoneme::UnknownSymbolPolicy;
use crate::storage::{StorageConfig, validate_name};

/// Configuration for a [`RhymeEngine`](crate::engine::RhymeEngine).
///
/// Every field has a default, so partial TOML or JSON documents are accepted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Where snapshots are persisted.
    pub storage: StorageConfig,
    /// Storage prefix under which snapshots live.
    pub collection: String,
    /// Name of the live snapshot within the collection.
    pub snapshot_key: String,
    /// Tokenization policy for ingested IPA.
    pub unknown_symbols: UnknownSymbolPolicy,
    /// Handling of repeated tokens during ingestion.
    pub duplicates: DuplicatePolicy,
    /// Sort entries lexicographically before indexing.
    pub sort_entries: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            storage: StorageConfig::default(),
            collection: "lexicon".to_string(),
            snapshot_key: "current".to_string(),
            unknown_symbols: UnknownSymbolPolicy::default(),
            duplicates: DuplicatePolicy::default(),
            sort_entries: false,
        }
    }
}

impl EngineConfig {
    /// File name of the live snapshot inside the collection.
    pub fn snapshot_file(&self) -> String {
        format!("{}.snap", self.snapshot_key)
    }

    pub fn validate(&self) -> Result<()> {
        validate_name(&self.collection)?;
        validate_name(&self.snapshot_file())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::file::FileStorageConfig;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.collection, "lexicon");
        assert_eq!(config.snapshot_file(), "current.snap");
        assert_eq!(config.unknown_symbols, UnknownSymbolPolicy::Skip);
        assert_eq!(config.duplicates, DuplicatePolicy::FirstWins);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_document() {
        let config: EngineConfig = serde_json::from_str(
            r#"{"unknown_symbols": "reject", "storage": {"type": "file", "path": "data"}}"#,
        )
        .unwrap();
        assert_eq!(config.unknown_symbols, UnknownSymbolPolicy::Reject);
        assert_eq!(config.storage, StorageConfig::File(FileStorageConfig::new("data")));
        assert_eq!(config.snapshot_key, "current");
    }

    #[test]
    fn test_validate_rejects_bad_names() {
        let config = EngineConfig {
            collection: "../escape".to_string(),
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
