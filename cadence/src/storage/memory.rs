use std::io::{Cursor, Read, Write};
use std::sync::Arc;

use ahash::AHashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

use crate::error::{CadenceError, Result};
use crate::storage::{Storage, StorageInput, StorageOutput, validate_name};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryStorageConfig {}

type Files = Arc<RwLock<AHashMap<String, Arc<Vec<u8>>>>>;

/// Storage held entirely in process memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    files: Files,
}

impl MemoryStorage {
    pub fn new(_config: MemoryStorageConfig) -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let data = self
            .files
            .read()
            .get(name)
            .cloned()
            .ok_or_else(|| CadenceError::storage(format!("file not found: {name}")))?;
        Ok(Box::new(MemoryInput {
            cursor: Cursor::new(data.as_ref().clone()),
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        validate_name(name)?;
        Ok(Box::new(MemoryOutput {
            name: name.to_string(),
            buffer: Vec::new(),
            files: Arc::clone(&self.files),
        }))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.files.read().contains_key(name)
    }

    fn delete_file(&self, name: &str) -> Result<bool> {
        Ok(self.files.write().remove(name).is_some())
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names: Vec<String> = self.files.read().keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        validate_name(new_name)?;
        let mut files = self.files.write();
        let data = files
            .remove(old_name)
            .ok_or_else(|| CadenceError::storage(format!("file not found: {old_name}")))?;
        files.insert(new_name.to_string(), data);
        Ok(())
    }
}

#[derive(Debug)]
struct MemoryInput {
    cursor: Cursor<Vec<u8>>,
}

impl Read for MemoryInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.cursor.read(buf)
    }
}

impl StorageInput for MemoryInput {
    fn size(&self) -> Result<u64> {
        Ok(self.cursor.get_ref().len() as u64)
    }
}

#[derive(Debug)]
struct MemoryOutput {
    name: String,
    buffer: Vec<u8>,
    files: Files,
}

impl Write for MemoryOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.buffer.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl StorageOutput for MemoryOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        let MemoryOutput {
            name,
            buffer,
            files,
        } = *self;
        files.write().insert(name, Arc::new(buffer));
        Ok(())
    }
}
