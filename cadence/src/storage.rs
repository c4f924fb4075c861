//! Pluggable blob storage for persisted snapshots.
//!
//! A [`Storage`] is a flat namespace of named files. Writers go through a
//! [`StorageOutput`], and nothing becomes visible to readers until the output
//! is closed, so a crashed or abandoned write never replaces a good file.
//!
//! # Module Structure
//!
//! - `memory`: in-process storage backed by a hash map
//! - `file`: a directory on the local file system
//! - `prefixed`: a view that scopes another storage under a name prefix
//!
//! # Example
//!
//! ```
//! use std::io::Write;
//!
//! use cadence::storage::memory::MemoryStorageConfig;
//! use cadence::storage::{StorageConfig, StorageFactory};
//!
//! let storage = StorageFactory::create(StorageConfig::Memory(MemoryStorageConfig::default())).unwrap();
//! let mut output = storage.create_output("greeting.bin").unwrap();
//! output.write_all(b"hello").unwrap();
//! output.close().unwrap();
//!
//! assert_eq!(cadence::storage::read_file(storage.as_ref(), "greeting.bin").unwrap(), b"hello");
//! ```

pub mod file;
pub mod memory;
pub mod prefixed;

use std::fmt::Debug;
use std::io::{Read, Write};
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};
use crate::storage::file::{FileStorage, FileStorageConfig};
use crate::storage::memory::{MemoryStorage, MemoryStorageConfig};

/// A readable file.
pub trait StorageInput: Read + Send + Debug {
    /// Total size of the file in bytes.
    fn size(&self) -> Result<u64>;
}

/// A writable file. Written bytes are published on [`StorageOutput::close`].
pub trait StorageOutput: Write + Send + Debug {
    /// Flush buffered bytes and sync them to the backing medium.
    fn flush_and_sync(&mut self) -> Result<()>;

    /// Publish the file under its name, replacing any previous content.
    fn close(self: Box<Self>) -> Result<()>;
}

/// A flat namespace of named files.
pub trait Storage: Send + Sync + Debug {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>>;

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>>;

    fn file_exists(&self, name: &str) -> bool;

    /// Remove a file. Returns `false` if it did not exist.
    fn delete_file(&self, name: &str) -> Result<bool>;

    /// All file names, sorted.
    fn list_files(&self) -> Result<Vec<String>>;

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()>;
}

/// Read a whole file into memory.
pub fn read_file(storage: &dyn Storage, name: &str) -> Result<Vec<u8>> {
    let mut input = storage.open_input(name)?;
    let mut buffer = Vec::with_capacity(input.size()? as usize);
    input.read_to_end(&mut buffer)?;
    Ok(buffer)
}

/// Write and publish a whole file.
pub fn write_file(storage: &dyn Storage, name: &str, bytes: &[u8]) -> Result<()> {
    let mut output = storage.create_output(name)?;
    output.write_all(bytes)?;
    output.flush_and_sync()?;
    output.close()
}

/// Storage backend selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum StorageConfig {
    Memory(MemoryStorageConfig),
    File(FileStorageConfig),
}

impl Default for StorageConfig {
    fn default() -> Self {
        StorageConfig::Memory(MemoryStorageConfig::default())
    }
}

/// Creates storage backends from configuration.
pub struct StorageFactory;

impl StorageFactory {
    pub fn create(config: StorageConfig) -> Result<Arc<dyn Storage>> {
        match config {
            StorageConfig::Memory(config) => Ok(Arc::new(MemoryStorage::new(config))),
            StorageConfig::File(config) => Ok(Arc::new(FileStorage::new(config)?)),
        }
    }
}

/// Check a file name: `/`-separated components, none empty, `.` or `..`,
/// and no backslashes.
pub(crate) fn validate_name(name: &str) -> Result<()> {
    let valid = !name.is_empty()
        && !name.contains('\\')
        && name
            .split('/')
            .all(|part| !part.is_empty() && part != "." && part != "..");
    if valid {
        Ok(())
    } else {
        Err(CadenceError::storage(format!("invalid file name: {name:?}")))
    }
}
