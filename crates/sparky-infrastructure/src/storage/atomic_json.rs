//! Atomic JSON file operations with ACID guarantees.
//!
//! Provides a thin layer for safe access to the JSON state files. The
//! persisted store of the original product was a browser-local key-value
//! store; here each logical key is one JSON file written atomically.

use serde::{de::DeserializeOwned, Serialize};
use sparky_core::error::{Result, SparkyError};
use std::fs::{self, File, OpenOptions};
use std::io::Write as IoWrite;
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

/// A handle to an atomic JSON file.
///
/// Provides:
/// - **Atomicity**: Updates are all-or-nothing via tmp file + atomic rename
/// - **Isolation**: File locking prevents concurrent modifications
/// - **Durability**: Explicit fsync before rename
pub struct AtomicJsonFile<T> {
    path: PathBuf,
    _phantom: PhantomData<T>,
}

impl<T> AtomicJsonFile<T>
where
    T: Serialize + DeserializeOwned,
{
    /// Creates a new atomic JSON file handle.
    pub fn new(path: PathBuf) -> Self {
        Self {
            path,
            _phantom: PhantomData,
        }
    }

    /// Returns the underlying path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Loads the file and deserializes it.
    ///
    /// Returns `None` if the file doesn't exist or is empty.
    pub fn load(&self) -> Result<Option<T>> {
        if !self.path.exists() {
            return Ok(None);
        }

        let content = fs::read_to_string(&self.path)?;

        if content.trim().is_empty() {
            return Ok(None);
        }

        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }

    /// Saves data atomically via a temporary file and rename.
    pub fn save(&self, data: &T) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let json_string = serde_json::to_string_pretty(data)?;

        let tmp_path = self.temp_path()?;
        let mut tmp_file = File::create(&tmp_path)?;
        tmp_file.write_all(json_string.as_bytes())?;

        // Make sure the bytes hit the disk before the rename publishes them
        tmp_file.sync_all()?;
        drop(tmp_file);

        fs::rename(&tmp_path, &self.path)?;

        Ok(())
    }

    /// Removes the file if it exists.
    pub fn remove(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Performs a transactional update with file locking.
    ///
    /// The update function receives the current data (or `default_value`
    /// when the file doesn't exist) and the result is written back
    /// atomically.
    pub fn update<F>(&self, default_value: T, f: F) -> Result<()>
    where
        F: FnOnce(&mut T) -> Result<()>,
    {
        let _lock = FileLock::acquire(&self.path)?;

        let mut data = self.load()?.unwrap_or(default_value);
        f(&mut data)?;
        self.save(&data)?;

        Ok(())
    }

    fn temp_path(&self) -> Result<PathBuf> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| SparkyError::io("Path has no parent directory"))?;

        let file_name = self
            .path
            .file_name()
            .ok_or_else(|| SparkyError::io("Path has no file name"))?;

        let tmp_name = format!(".{}.tmp", file_name.to_string_lossy());
        Ok(parent.join(tmp_name))
    }
}

/// A file lock guard that releases the lock when dropped.
struct FileLock {
    #[allow(dead_code)]
    file: File,
    lock_path: PathBuf,
}

impl FileLock {
    fn acquire(path: &Path) -> Result<Self> {
        let lock_path = path.with_extension("lock");

        if let Some(parent) = lock_path.parent() {
            if !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(false)
            .open(&lock_path)?;

        #[cfg(unix)]
        {
            use fs2::FileExt;
            file.lock_exclusive()
                .map_err(|e| SparkyError::io(format!("Failed to acquire lock: {}", e)))?;
        }

        Ok(FileLock { file, lock_path })
    }
}

impl Drop for FileLock {
    fn drop(&mut self) {
        // Unlock is automatic when the file handle is dropped
        let _ = fs::remove_file(&self.lock_path);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use tempfile::TempDir;

    #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
    struct TestRecord {
        name: String,
        count: u32,
    }

    #[test]
    fn test_save_and_load() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("record.json"));

        let record = TestRecord {
            name: "test".to_string(),
            count: 42,
        };

        file.save(&record).unwrap();

        let loaded = file.load().unwrap().unwrap();
        assert_eq!(loaded, record);
    }

    #[test]
    fn test_load_nonexistent_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("missing.json"));

        assert!(file.load().unwrap().is_none());
    }

    #[test]
    fn test_remove_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("record.json"));

        file.save(&TestRecord {
            name: "x".to_string(),
            count: 1,
        })
        .unwrap();

        file.remove().unwrap();
        assert!(file.load().unwrap().is_none());
        // Removing again is not an error
        file.remove().unwrap();
    }

    #[test]
    fn test_update() {
        let temp_dir = TempDir::new().unwrap();
        let file = AtomicJsonFile::<TestRecord>::new(temp_dir.path().join("record.json"));

        let default = TestRecord {
            name: "default".to_string(),
            count: 0,
        };

        file.update(default.clone(), |record| {
            record.count += 10;
            Ok(())
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().count, 10);

        file.update(default, |record| {
            record.count += 5;
            Ok(())
        })
        .unwrap();

        assert_eq!(file.load().unwrap().unwrap().count, 15);
    }

    #[test]
    fn test_atomic_write_leaves_no_temp_file() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("record.json");
        let file = AtomicJsonFile::<TestRecord>::new(path.clone());

        file.save(&TestRecord {
            name: "test".to_string(),
            count: 42,
        })
        .unwrap();

        assert!(!temp_dir.path().join(".record.json.tmp").exists());
        assert!(path.exists());
    }
}
