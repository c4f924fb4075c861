use std::path::Path;

use anyhow::{Context, Result, bail};
use cadence::storage::file::FileStorageConfig;
use cadence::{EngineConfig, RhymeEngine, StorageConfig};

const CONFIG_FILE: &str = "cadence.toml";
const STORE_DIR: &str = "store";

/// Resolve the engine configuration.
///
/// An explicit `--config` file must exist. Otherwise `cadence.toml` in the
/// data directory is used when present. A configuration without a
/// `[storage]` table stores snapshots under `<data-dir>/store`.
pub fn load_config(data_dir: &Path, config_path: Option<&Path>) -> Result<EngineConfig> {
    let path = match config_path {
        Some(path) => {
            if !path.exists() {
                bail!("Config file not found: {}", path.display());
            }
            Some(path.to_path_buf())
        }
        None => Some(data_dir.join(CONFIG_FILE)).filter(|path| path.exists()),
    };

    let Some(path) = path else {
        return Ok(EngineConfig {
            storage: default_storage(data_dir),
            ..Default::default()
        });
    };

    let text = std::fs::read_to_string(&path).context("Failed to read config file")?;
    let mut config: EngineConfig =
        toml::from_str(&text).context("Failed to parse config TOML")?;
    let table: toml::Table = toml::from_str(&text).context("Failed to parse config TOML")?;
    if !table.contains_key("storage") {
        config.storage = default_storage(data_dir);
    }
    if matches!(config.storage, StorageConfig::Memory(_)) {
        tracing::warn!("memory storage configured; built snapshots will not outlive this process");
    }
    config.validate().context("Invalid engine configuration")?;

    tracing::debug!(config = %path.display(), "loaded engine configuration");
    Ok(config)
}

/// Open the engine, loading the persisted snapshot if there is one.
pub fn open_engine(config: EngineConfig) -> Result<RhymeEngine> {
    RhymeEngine::open(config).context("Failed to open rhyme engine")
}

/// Open the engine for a rebuild.
///
/// An unreadable persisted snapshot is reported and left to be overwritten.
pub fn open_for_build(config: EngineConfig) -> Result<RhymeEngine> {
    let engine = RhymeEngine::open_unloaded(config).context("Failed to open rhyme engine")?;
    if let Err(e) = engine.load() {
        tracing::warn!("ignoring unreadable snapshot, the build will replace it: {e}");
    }
    Ok(engine)
}

/// Open the engine and require a persisted snapshot.
pub fn open_existing(config: EngineConfig) -> Result<RhymeEngine> {
    let engine = open_engine(config)?;
    if engine.snapshot().lexicon().is_empty() {
        bail!("No snapshot found. Run 'cadence build' first.");
    }
    Ok(engine)
}

fn default_storage(data_dir: &Path) -> StorageConfig {
    StorageConfig::File(FileStorageConfig::new(data_dir.join(STORE_DIR)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cadence::UnknownSymbolPolicy;
    use tempfile::TempDir;

    #[test]
    fn test_defaults_to_file_storage_in_data_dir() {
        let dir = TempDir::new().unwrap();
        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(
            config.storage,
            StorageConfig::File(FileStorageConfig::new(dir.path().join(STORE_DIR)))
        );
        assert_eq!(config.collection, "lexicon");
    }

    #[test]
    fn test_reads_config_from_data_dir() {
        let dir = TempDir::new().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "collection = \"en\"\nunknown_symbols = \"reject\"\n",
        )
        .unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert_eq!(config.collection, "en");
        assert_eq!(config.unknown_symbols, UnknownSymbolPolicy::Reject);
        assert!(matches!(config.storage, StorageConfig::File(_)));
    }

    #[test]
    fn test_explicit_storage_is_kept() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(&path, "[storage]\ntype = \"memory\"\n").unwrap();

        let config = load_config(dir.path(), Some(&path)).unwrap();
        assert!(matches!(config.storage, StorageConfig::Memory(_)));
    }

    #[test]
    fn test_missing_explicit_config_fails() {
        let dir = TempDir::new().unwrap();
        assert!(load_config(dir.path(), Some(&dir.path().join("nope.toml"))).is_err());
    }

    #[test]
    fn test_build_opens_over_corrupt_snapshot() {
        let dir = TempDir::new().unwrap();
        let snapshot_dir = dir.path().join(STORE_DIR).join("lexicon");
        std::fs::create_dir_all(&snapshot_dir).unwrap();
        std::fs::write(snapshot_dir.join("current.snap"), b"CDNC not a snapshot").unwrap();

        let config = load_config(dir.path(), None).unwrap();
        assert!(open_engine(config.clone()).is_err());
        assert!(open_existing(config.clone()).is_err());

        let engine = open_for_build(config).unwrap();
        assert!(engine.snapshot().lexicon().is_empty());
    }

    #[test]
    fn test_invalid_collection_fails() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE), "collection = \"../up\"\n").unwrap();
        assert!(load_config(dir.path(), None).is_err());
    }
}
