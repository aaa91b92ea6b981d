//! Slot storage backends
//!
//! A store maps slot numbers to serialized records. `FileStore` keeps one
//! JSON file per slot; `MemoryStore` keeps them in a map for tests.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use super::save_game::SaveError;

/// Key-value storage for save slots
pub trait SlotStore {
    /// Raw contents of a slot, `None` if never written
    fn read(&self, slot: u8) -> Result<Option<String>, SaveError>;
    fn write(&mut self, slot: u8, data: &str) -> Result<(), SaveError>;
    fn delete(&mut self, slot: u8) -> Result<(), SaveError>;
}

/// One `save_{n}.json` file per slot
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn directory(&self) -> &Path {
        &self.dir
    }

    /// Get the path for a specific save slot
    pub fn slot_path(&self, slot: u8) -> PathBuf {
        self.dir.join(format!("save_{}.json", slot))
    }
}

impl SlotStore for FileStore {
    fn read(&self, slot: u8) -> Result<Option<String>, SaveError> {
        let path = self.slot_path(slot);
        if !path.exists() {
            return Ok(None);
        }
        Ok(Some(fs::read_to_string(path)?))
    }

    fn write(&mut self, slot: u8, data: &str) -> Result<(), SaveError> {
        fs::create_dir_all(&self.dir)?;
        fs::write(self.slot_path(slot), data)?;
        Ok(())
    }

    fn delete(&mut self, slot: u8) -> Result<(), SaveError> {
        let path = self.slot_path(slot);
        if path.exists() {
            fs::remove_file(path)?;
            log::info!("Deleted save slot {}", slot);
        }
        Ok(())
    }
}

/// In-memory slots
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: HashMap<u8, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SlotStore for MemoryStore {
    fn read(&self, slot: u8) -> Result<Option<String>, SaveError> {
        Ok(self.slots.get(&slot).cloned())
    }

    fn write(&mut self, slot: u8, data: &str) -> Result<(), SaveError> {
        self.slots.insert(slot, data.to_string());
        Ok(())
    }

    fn delete(&mut self, slot: u8) -> Result<(), SaveError> {
        self.slots.remove(&slot);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_file_store_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path().join("saves"));
        assert_eq!(store.read(2).unwrap(), None);
        store.write(2, "{}").unwrap();
        assert!(store.slot_path(2).ends_with("save_2.json"));
        assert_eq!(store.read(2).unwrap().as_deref(), Some("{}"));
        store.delete(2).unwrap();
        assert_eq!(store.read(2).unwrap(), None);
    }

    #[test]
    fn test_last_writer_wins() {
        let mut store = MemoryStore::new();
        store.write(1, "a").unwrap();
        store.write(1, "b").unwrap();
        assert_eq!(store.read(1).unwrap().as_deref(), Some("b"));
    }
}
