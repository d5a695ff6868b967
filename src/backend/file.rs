//! Directory-backed byte store.
//!
//! Each key is one file, `<dir>/<key>.json`. Writes go to a temporary
//! file which is synced and then renamed over the target, so a reader
//! sees either the previous value or the new one.

use super::StorageBackend;
use crate::error::{Error, Result};
use std::fs::{self, File};
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

/// Durable byte store rooted at a directory.
///
/// # Example
///
/// ```no_run
/// use storefront_state::backend::{FileBackend, StorageBackend};
///
/// # fn main() -> storefront_state::Result<()> {
/// let backend = FileBackend::open("./shop-state")?;
/// backend.set("cart", b"[]".to_vec())?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct FileBackend {
    dir: PathBuf,
}

impl FileBackend {
    /// Open (creating if needed) a store in `dir`.
    ///
    /// # Errors
    ///
    /// Returns `Error::BackendError` if the directory cannot be created.
    pub fn open(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;
        info!("File store opened at {}", dir.display());
        Ok(FileBackend { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, key: &str) -> Result<PathBuf> {
        let valid = !key.is_empty()
            && key
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | ':'));
        if !valid {
            return Err(Error::ValidationError(format!(
                "storage key {:?} contains unsupported characters",
                key
            )));
        }
        Ok(self.dir.join(format!("{}.json", key)))
    }
}

impl StorageBackend for FileBackend {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let path = self.path_for(key)?;
        match fs::read(&path) {
            Ok(bytes) => {
                debug!("✓ File GET {} -> HIT ({} bytes)", key, bytes.len());
                Ok(Some(bytes))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("✓ File GET {} -> MISS", key);
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let path = self.path_for(key)?;
        let tmp_path = path.with_extension("json.tmp");

        let mut file = File::create(&tmp_path)?;
        file.write_all(&value)?;
        file.sync_all()?;
        fs::rename(&tmp_path, &path)?;

        debug!("✓ File SET {} ({} bytes)", key, value.len());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        let path = self.path_for(key)?;
        match fs::remove_file(&path) {
            Ok(()) => {}
            Err(e) if e.kind() == ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
        debug!("✓ File DELETE {}", key);
        Ok(())
    }

    fn health_check(&self) -> Result<bool> {
        Ok(self.dir.is_dir())
    }

    fn clear_all(&self) -> Result<()> {
        for entry in fs::read_dir(&self.dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                fs::remove_file(&path)?;
            }
        }
        warn!("⚠ File CLEAR_ALL executed in {}", self.dir.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_file_backend_set_get() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("cart", b"[]".to_vec()).expect("Failed to set");

        assert_eq!(backend.get("cart").unwrap(), Some(b"[]".to_vec()));
        assert!(dir.path().join("cart.json").exists());
        assert!(!dir.path().join("cart.json.tmp").exists());
    }

    #[test]
    fn test_file_backend_miss() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        assert_eq!(backend.get("wishlist").unwrap(), None);
    }

    #[test]
    fn test_file_backend_survives_reopen() {
        let dir = TempDir::new().unwrap();
        {
            let backend = FileBackend::open(dir.path()).unwrap();
            backend.set("shop:compare", b"[1]".to_vec()).unwrap();
        }

        let reopened = FileBackend::open(dir.path()).unwrap();
        assert_eq!(reopened.get("shop:compare").unwrap(), Some(b"[1]".to_vec()));
    }

    #[test]
    fn test_file_backend_rejects_path_keys() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        let result = backend.set("../escape", b"x".to_vec());
        assert!(matches!(result, Err(Error::ValidationError(_))));
    }

    #[test]
    fn test_file_backend_delete_and_clear() {
        let dir = TempDir::new().unwrap();
        let backend = FileBackend::open(dir.path()).unwrap();

        backend.set("cart", b"[]".to_vec()).unwrap();
        backend.set("wishlist", b"[]".to_vec()).unwrap();

        backend.delete("cart").unwrap();
        backend.delete("cart").unwrap();
        assert!(!backend.exists("cart").unwrap());

        backend.clear_all().unwrap();
        assert!(!backend.exists("wishlist").unwrap());
        assert!(backend.health_check().unwrap());
    }
}
