//! Exclusive lock on the data directory
//!
//! A call chain loads the whole state, runs, and writes it back. Two
//! processes doing that at once would lose one of the writes, so every
//! chain holds `usdd.lock` exclusively until it has committed.

use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use fs2::FileExt;

pub const LOCK_FILENAME: &str = "usdd.lock";

/// Held for as long as the guard lives; released on drop
#[derive(Debug)]
pub struct DataDirLock {
    file: File,
    path: PathBuf,
}

impl DataDirLock {
    /// Block until the lock is ours
    pub fn acquire(data_dir: &Path) -> Result<Self> {
        let (file, path) = Self::open(data_dir)?;
        file.lock_exclusive()
            .with_context(|| format!("Failed to lock {:?}", path))?;
        Ok(Self { file, path })
    }

    /// Take the lock only if nobody else holds it
    pub fn try_acquire(data_dir: &Path) -> Result<Option<Self>> {
        let (file, path) = Self::open(data_dir)?;
        match file.try_lock_exclusive() {
            Ok(()) => Ok(Some(Self { file, path })),
            Err(e) if e.kind() == fs2::lock_contended_error().kind() => Ok(None),
            Err(e) => Err(e).with_context(|| format!("Failed to lock {:?}", path)),
        }
    }

    fn open(data_dir: &Path) -> Result<(File, PathBuf)> {
        let path = data_dir.join(LOCK_FILENAME);
        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(true)
            .truncate(false)
            .open(&path)
            .with_context(|| format!("Failed to open lock file {:?}", path))?;
        Ok((file, path))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for DataDirLock {
    fn drop(&mut self) {
        let _ = self.file.unlock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_lock_is_exclusive_until_dropped() {
        let dir = tempdir().unwrap();
        let held = DataDirLock::acquire(dir.path()).unwrap();
        assert!(held.path().exists());
        assert!(DataDirLock::try_acquire(dir.path()).unwrap().is_none());

        drop(held);
        assert!(DataDirLock::try_acquire(dir.path()).unwrap().is_some());
    }
}
