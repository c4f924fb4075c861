use std::sync::Arc;

use crate::error::Result;
use crate::storage::{Storage, StorageInput, StorageOutput, validate_name};

/// A view of another storage in which every name is placed under `prefix/`.
#[derive(Debug, Clone)]
pub struct PrefixedStorage {
    prefix: String,
    inner: Arc<dyn Storage>,
}

impl PrefixedStorage {
    pub fn new(prefix: impl Into<String>, inner: Arc<dyn Storage>) -> Self {
        Self {
            prefix: prefix.into(),
            inner,
        }
    }

    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    fn full_name(&self, name: &str) -> Result<String> {
        validate_name(name)?;
        Ok(format!("{}/{name}", self.prefix))
    }
}

impl Storage for PrefixedStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        self.inner.open_input(&self.full_name(name)?)
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        self.inner.create_output(&self.full_name(name)?)
    }

    fn file_exists(&self, name: &str) -> bool {
        self.full_name(name)
            .map(|full| self.inner.file_exists(&full))
            .unwrap_or(false)
    }

    fn delete_file(&self, name: &str) -> Result<bool> {
        self.inner.delete_file(&self.full_name(name)?)
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let prefix = format!("{}/", self.prefix);
        Ok(self
            .inner
            .list_files()?
            .into_iter()
            .filter_map(|name| name.strip_prefix(&prefix).map(str::to_string))
            .collect())
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        self.inner
            .rename_file(&self.full_name(old_name)?, &self.full_name(new_name)?)
    }
}
