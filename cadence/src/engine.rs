//! The engine handle: owns the live snapshot and its persistence.
//!
//! Readers take a cheap `Arc` of the current [`Snapshot`] and query it
//! without holding any lock. Rebuilds run off the async executor and swap
//! the new snapshot in only when they succeed.
//!
//! # Module Structure
//!
//! - `config`: [`EngineConfig`]

pub mod config;

use std::path::Path;
use std::sync::Arc;

use parking_lot::RwLock;

use crate::builder::{JsonLinesSource, SnapshotBuilder};
use crate::error::{CadenceError, Result};
use crate::lexicon::LexiconStore;
use crate::phoneme::PhonemeKey;
use crate::rhyme::{RhymeQuery, RhymeType};
use crate::snapshot::{Snapshot, SnapshotStats};
use crate::storage::prefixed::PrefixedStorage;
use crate::storage::{self, Storage, StorageFactory};

pub use config::EngineConfig;

/// Handle to a live rhyme snapshot.
///
/// # Example
///
/// ```
/// use cadence::engine::{EngineConfig, RhymeEngine};
/// use cadence::builder::VecSource;
/// use cadence::lexicon::{Entry, PartOfSpeech};
/// use cadence::rhyme::RhymeQuery;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> cadence::Result<()> {
/// let engine = RhymeEngine::open(EngineConfig::default())?;
/// let builder = engine.builder().source(VecSource::new("inline", vec![
///     Entry::word("cat", "kæt", PartOfSpeech::Noun),
///     Entry::word("bat", "bæt", PartOfSpeech::Noun),
/// ]));
/// engine.rebuild(builder).await?;
///
/// let rhymes = engine.get_rhymes("cat", &RhymeQuery::default());
/// assert!(rhymes.has_entry("bat"));
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RhymeEngine {
    config: EngineConfig,
    storage: Arc<dyn Storage>,
    current: RwLock<Arc<Snapshot>>,
}

impl RhymeEngine {
    /// Create the configured storage and load the persisted snapshot, if any.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let storage = StorageFactory::create(config.storage.clone())?;
        Self::with_storage(config, storage)
    }

    /// Create the configured storage and start from an empty snapshot.
    ///
    /// Whatever is persisted is left unread until [`load`](Self::load), so a
    /// corrupt or outdated snapshot can still be replaced by a rebuild.
    pub fn open_unloaded(config: EngineConfig) -> Result<Self> {
        let storage = StorageFactory::create(config.storage.clone())?;
        Self::with_storage_unloaded(config, storage)
    }

    /// Use an existing storage; `config.storage` is ignored.
    pub fn with_storage(config: EngineConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        let engine = Self::with_storage_unloaded(config, storage)?;
        engine.load()?;
        Ok(engine)
    }

    /// [`with_storage`](Self::with_storage) without loading the persisted
    /// snapshot.
    pub fn with_storage_unloaded(config: EngineConfig, storage: Arc<dyn Storage>) -> Result<Self> {
        config.validate()?;
        let storage: Arc<dyn Storage> =
            Arc::new(PrefixedStorage::new(config.collection.clone(), storage));
        Ok(Self {
            config,
            storage,
            current: RwLock::new(Arc::new(Snapshot::empty())),
        })
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The live snapshot.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    /// Swap in a new snapshot and return the previous one.
    pub fn replace(&self, snapshot: Snapshot) -> Arc<Snapshot> {
        self.swap(Arc::new(snapshot))
    }

    fn swap(&self, snapshot: Arc<Snapshot>) -> Arc<Snapshot> {
        std::mem::replace(&mut *self.current.write(), snapshot)
    }

    pub fn get_rhymes(&self, token: &str, query: &RhymeQuery) -> LexiconStore {
        self.snapshot().get_rhymes(token, query)
    }

    pub fn rhyme_candidates(&self, key: &PhonemeKey, rhyme_type: RhymeType) -> Vec<u32> {
        self.snapshot().rhyme_candidates(key, rhyme_type)
    }

    pub fn stats(&self) -> SnapshotStats {
        self.snapshot().stats()
    }

    /// A builder preset with this engine's duplicate and sort settings.
    pub fn builder(&self) -> SnapshotBuilder {
        SnapshotBuilder::new()
            .duplicates(self.config.duplicates)
            .sort_entries(self.config.sort_entries)
    }

    /// Open a JSON-lines file with this engine's tokenization policy.
    pub fn json_lines_source(&self, path: impl AsRef<Path>) -> Result<JsonLinesSource<std::fs::File>> {
        JsonLinesSource::open(path, self.config.unknown_symbols)
    }

    /// Run `builder` on the blocking pool and make its result live.
    ///
    /// On error or cancellation the previous snapshot stays in place.
    pub async fn rebuild(&self, builder: SnapshotBuilder) -> Result<Arc<Snapshot>> {
        let snapshot = tokio::task::spawn_blocking(move || builder.build())
            .await
            .map_err(|e| CadenceError::ThreadPanic(e.to_string()))??;
        let snapshot = Arc::new(snapshot);
        self.swap(snapshot.clone());
        Ok(snapshot)
    }

    /// Write the live snapshot to storage.
    pub fn persist(&self) -> Result<()> {
        let snapshot = self.snapshot();
        let bytes = snapshot.to_bytes()?;
        let name = self.config.snapshot_file();
        storage::write_file(self.storage.as_ref(), &name, &bytes)?;
        log::info!(
            "persisted snapshot {}/{name} ({} entries, {} bytes)",
            self.config.collection,
            snapshot.lexicon().len(),
            bytes.len()
        );
        Ok(())
    }

    /// Replace the live snapshot with the persisted one.
    ///
    /// Returns `false` if nothing has been persisted yet.
    pub fn load(&self) -> Result<bool> {
        let name = self.config.snapshot_file();
        if !self.storage.file_exists(&name) {
            return Ok(false);
        }
        let bytes = storage::read_file(self.storage.as_ref(), &name)?;
        let snapshot = Snapshot::from_bytes(&bytes)?;
        log::info!(
            "loaded snapshot {}/{name} ({} entries)",
            self.config.collection,
            snapshot.lexicon().len()
        );
        self.replace(snapshot);
        Ok(true)
    }
}
