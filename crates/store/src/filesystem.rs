//! Filesystem-backed slot storage.
//!
//! Each slot is one file inside the base directory. Writes land in a
//! temporary file next to it and are renamed over the slot file, so a reader
//! sees either the previous raster or the new one, never a partial write.
//! Concurrent writers are last-write-wins; nothing is locked.

use crate::backend::{RasterStore, SlotKey};
use crate::error::StoreError;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

#[derive(Debug)]
pub struct FilesystemRasterStore {
    base_path: PathBuf,
    slot: SlotKey,
}

impl FilesystemRasterStore {
    /// Opens a store rooted at `base_path`, creating the directory if needed.
    pub fn new<P: AsRef<Path>>(base_path: P) -> Result<Self, StoreError> {
        Self::with_slot(base_path, SlotKey::signature())
    }

    pub fn with_slot<P: AsRef<Path>>(base_path: P, slot: SlotKey) -> Result<Self, StoreError> {
        let base_path = base_path.as_ref().to_path_buf();
        std::fs::create_dir_all(&base_path)?;
        Ok(Self { base_path, slot })
    }

    /// Opens a store for reading without touching the filesystem.
    ///
    /// A missing directory reads as an empty store; saving into it fails.
    pub fn open<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
            slot: SlotKey::signature(),
        }
    }

    pub fn base(&self) -> &Path {
        &self.base_path
    }

    pub fn slot_path(&self, key: &SlotKey) -> PathBuf {
        self.base_path.join(key.file_name())
    }
}

impl RasterStore for FilesystemRasterStore {
    fn slot(&self) -> &SlotKey {
        &self.slot
    }

    fn save(&self, bytes: &[u8]) -> Result<SlotKey, StoreError> {
        let dest = self.slot_path(&self.slot);

        let mut tmp = NamedTempFile::new_in(&self.base_path)?;
        tmp.write_all(bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&dest).map_err(|e| e.error)?;

        log::debug!("Saved {} bytes to {}", bytes.len(), dest.display());
        Ok(self.slot.clone())
    }

    fn load(&self, key: &SlotKey) -> Result<Option<Vec<u8>>, StoreError> {
        match std::fs::read(self.slot_path(key)) {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn location(&self, key: &SlotKey) -> String {
        self.slot_path(key).display().to_string()
    }

    fn name(&self) -> &'static str {
        "filesystem"
    }
}
