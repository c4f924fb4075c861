use std::fs::{self, File};
use std::io::{BufReader, Read, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tempfile::NamedTempFile;

use crate::error::{CadenceError, Result};
use crate::storage::{Storage, StorageInput, StorageOutput, validate_name};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileStorageConfig {
    /// Root directory. Created if missing.
    pub path: PathBuf,
}

impl FileStorageConfig {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

/// Storage rooted at a local directory.
///
/// Names map to paths below the root; `/` separates directories. Outputs are
/// written to a temporary file in the target directory and renamed into place
/// on close.
#[derive(Debug, Clone)]
pub struct FileStorage {
    root: PathBuf,
}

impl FileStorage {
    pub fn new(config: FileStorageConfig) -> Result<Self> {
        fs::create_dir_all(&config.path)?;
        Ok(Self { root: config.path })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_of(&self, name: &str) -> Result<PathBuf> {
        validate_name(name)?;
        Ok(name.split('/').fold(self.root.clone(), |path, part| path.join(part)))
    }
}

impl Storage for FileStorage {
    fn open_input(&self, name: &str) -> Result<Box<dyn StorageInput>> {
        let file = File::open(self.path_of(name)?)?;
        let size = file.metadata()?.len();
        Ok(Box::new(FileInput {
            reader: BufReader::new(file),
            size,
        }))
    }

    fn create_output(&self, name: &str) -> Result<Box<dyn StorageOutput>> {
        let target = self.path_of(name)?;
        let dir = target
            .parent()
            .ok_or_else(|| CadenceError::storage(format!("no parent directory for {name}")))?;
        fs::create_dir_all(dir)?;
        Ok(Box::new(FileOutput {
            temp: NamedTempFile::new_in(dir)?,
            target,
        }))
    }

    fn file_exists(&self, name: &str) -> bool {
        self.path_of(name).map(|path| path.is_file()).unwrap_or(false)
    }

    fn delete_file(&self, name: &str) -> Result<bool> {
        match fs::remove_file(self.path_of(name)?) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    fn list_files(&self) -> Result<Vec<String>> {
        let mut names = Vec::new();
        collect_files(&self.root, "", &mut names)?;
        names.sort();
        Ok(names)
    }

    fn rename_file(&self, old_name: &str, new_name: &str) -> Result<()> {
        let target = self.path_of(new_name)?;
        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::rename(self.path_of(old_name)?, target)?;
        Ok(())
    }
}

fn collect_files(dir: &Path, prefix: &str, names: &mut Vec<String>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
            continue;
        };
        let name = if prefix.is_empty() {
            file_name
        } else {
            format!("{prefix}/{file_name}")
        };
        let file_type = entry.file_type()?;
        if file_type.is_dir() {
            collect_files(&entry.path(), &name, names)?;
        } else if file_type.is_file() && !file_name_is_temp(&name) {
            names.push(name);
        }
    }
    Ok(())
}

// NamedTempFile names start with ".tmp".
fn file_name_is_temp(name: &str) -> bool {
    name.rsplit('/').next().is_some_and(|last| last.starts_with(".tmp"))
}

#[derive(Debug)]
struct FileInput {
    reader: BufReader<File>,
    size: u64,
}

impl Read for FileInput {
    fn read(&mut self, buf: &mut [u8]) -> std::io::Result<usize> {
        self.reader.read(buf)
    }
}

impl StorageInput for FileInput {
    fn size(&self) -> Result<u64> {
        Ok(self.size)
    }
}

#[derive(Debug)]
struct FileOutput {
    temp: NamedTempFile,
    target: PathBuf,
}

impl Write for FileOutput {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.temp.flush()
    }
}

impl StorageOutput for FileOutput {
    fn flush_and_sync(&mut self) -> Result<()> {
        self.temp.flush()?;
        self.temp.as_file().sync_all()?;
        Ok(())
    }

    fn close(self: Box<Self>) -> Result<()> {
        let FileOutput { temp, target } = *self;
        temp.persist(&target)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::{read_file, write_file};
    use tempfile::TempDir;

    fn storage() -> (TempDir, FileStorage) {
        let dir = TempDir::new().unwrap();
        let storage = FileStorage::new(FileStorageConfig::new(dir.path())).unwrap();
        (dir, storage)
    }

    #[test]
    fn test_write_and_read() {
        let (dir, storage) = storage();
        write_file(&storage, "lexicon/current.snap", b"payload").unwrap();

        assert!(dir.path().join("lexicon").join("current.snap").is_file());
        assert!(storage.file_exists("lexicon/current.snap"));
        assert_eq!(read_file(&storage, "lexicon/current.snap").unwrap(), b"payload");
        assert_eq!(storage.list_files().unwrap(), vec!["lexicon/current.snap"]);
    }

    #[test]
    fn test_unclosed_output_leaves_no_file() {
        let (_dir, storage) = storage();
        {
            let mut output = storage.create_output("a.bin").unwrap();
            output.write_all(b"partial").unwrap();
        }
        assert!(!storage.file_exists("a.bin"));
        assert!(storage.list_files().unwrap().is_empty());
    }

    #[test]
    fn test_overwrite_replaces_content() {
        let (_dir, storage) = storage();
        write_file(&storage, "a.bin", b"old").unwrap();
        write_file(&storage, "a.bin", b"new").unwrap();
        assert_eq!(read_file(&storage, "a.bin").unwrap(), b"new");
    }

    #[test]
    fn test_rejects_escaping_names() {
        let (_dir, storage) = storage();
        assert!(storage.create_output("../escape").is_err());
        assert!(storage.open_input("a/../../b").is_err());
        assert!(!storage.file_exists(""));
    }

    #[test]
    fn test_delete_and_rename() {
        let (_dir, storage) = storage();
        write_file(&storage, "a.bin", b"1").unwrap();
        storage.rename_file("a.bin", "nested/b.bin").unwrap();
        assert!(!storage.file_exists("a.bin"));
        assert!(storage.file_exists("nested/b.bin"));
        assert!(storage.delete_file("nested/b.bin").unwrap());
        assert!(!storage.delete_file("nested/b.bin").unwrap());
    }
}
