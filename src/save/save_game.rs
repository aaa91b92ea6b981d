//! Game save/load system
//!
//! Five slots. Slots 1-4 are written by the player; slot 5 only by the
//! auto-save. Records are self-describing JSON: fields added later carry
//! serde defaults so older records still load. A record that cannot be
//! read or parsed is reported as an empty slot.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::store::SlotStore;
use crate::ecs::Position;
use crate::entities::Player;
use crate::navigation::Location;
use crate::progression::WorldProgress;
use crate::world::Region;

/// Save file version for compatibility checking
pub const SAVE_VERSION: u32 = 1;
/// Number of slots
pub const SLOT_COUNT: u8 = 5;
/// The slot reserved for automatic saves
pub const AUTO_SAVE_SLOT: u8 = 5;

/// Save error types
#[derive(Debug, Error)]
pub enum SaveError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("slot {0} is reserved for auto-saves")]
    ReservedSlot(u8),

    #[error("no such slot: {0}")]
    InvalidSlot(u8),
}

/// A point-in-time snapshot of the session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveRecord {
    #[serde(default)]
    pub version: u32,
    pub player: Player,
    pub region: Region,
    pub overworld_pos: Position,
    pub town_pos: Position,
    pub dungeon_floor: u8,
    #[serde(default)]
    pub dungeon_pos: Position,
    #[serde(default)]
    pub progress: WorldProgress,
    #[serde(default)]
    pub context: Location,
    pub location_label: String,
    pub timestamp: DateTime<Utc>,
}

/// Brief summary of a save for display
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveSummary {
    pub label: String,
    pub name: String,
    pub level: u32,
    pub timestamp: DateTime<Utc>,
}

impl From<&SaveRecord> for SaveSummary {
    fn from(record: &SaveRecord) -> Self {
        Self {
            label: record.location_label.clone(),
            name: record.player.name.clone(),
            level: record.player.level,
            timestamp: record.timestamp,
        }
    }
}

fn check_slot(slot: u8) -> Result<(), SaveError> {
    if (1..=SLOT_COUNT).contains(&slot) {
        Ok(())
    } else {
        Err(SaveError::InvalidSlot(slot))
    }
}

fn write_record(store: &mut dyn SlotStore, slot: u8, record: &SaveRecord) -> Result<(), SaveError> {
    let json = serde_json::to_string_pretty(record)?;
    store.write(slot, &json)?;
    Ok(())
}

/// Player-initiated save. Slot 5 is refused.
pub fn save_game(store: &mut dyn SlotStore, slot: u8, record: &SaveRecord) -> Result<(), SaveError> {
    check_slot(slot)?;
    if slot == AUTO_SAVE_SLOT {
        return Err(SaveError::ReservedSlot(slot));
    }
    write_record(store, slot, record)?;
    log::info!("Game saved to slot {}", slot);
    Ok(())
}

/// Write the auto-save slot
pub fn auto_save(store: &mut dyn SlotStore, record: &SaveRecord) -> Result<(), SaveError> {
    write_record(store, AUTO_SAVE_SLOT, record)?;
    log::info!("Auto-saved ({})", record.location_label);
    Ok(())
}

/// Load a slot. Missing, unreadable, corrupt or newer-version records are `None`.
pub fn load_game(store: &dyn SlotStore, slot: u8) -> Option<SaveRecord> {
    check_slot(slot).ok()?;
    let data = match store.read(slot) {
        Ok(Some(data)) => data,
        Ok(None) => return None,
        Err(e) => {
            log::warn!("Failed to read slot {}: {}", slot, e);
            return None;
        }
    };
    let mut record: SaveRecord = match serde_json::from_str(&data) {
        Ok(record) => record,
        Err(e) => {
            log::warn!("Slot {} is unreadable, treating as empty: {}", slot, e);
            return None;
        }
    };
    if record.version > SAVE_VERSION {
        log::warn!("Slot {} has newer version {}, treating as empty", slot, record.version);
        return None;
    }
    record.player.sanitize();
    record.dungeon_floor = record.dungeon_floor.clamp(1, 2);
    log::info!("Game loaded from slot {}", slot);
    Some(record)
}

/// List every slot with its summary
pub fn list_saves(store: &dyn SlotStore) -> Vec<(u8, Option<SaveSummary>)> {
    (1..=SLOT_COUNT)
        .map(|slot| (slot, load_game(store, slot).as_ref().map(SaveSummary::from)))
        .collect()
}

/// Delete a save slot
pub fn delete_save(store: &mut dyn SlotStore, slot: u8) -> Result<(), SaveError> {
    check_slot(slot)?;
    store.delete(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::save::store::{FileStore, MemoryStore};
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn record() -> SaveRecord {
        let mut player = Player::new("Diana");
        player.level = 6;
        player.exp = 120;
        player.gold = 345;
        player.potions = 2;
        player.equipment_atk = 4;
        player.hp.current = 101;
        let mut progress = WorldProgress::new();
        progress.mark_cleared(Region::Avonlea, 1);
        SaveRecord {
            version: SAVE_VERSION,
            player,
            region: Region::Cavendish,
            overworld_pos: Position::new(4, 5),
            town_pos: Position::new(6, 6),
            dungeon_floor: 2,
            dungeon_pos: Position::new(3, 3),
            progress,
            context: Location::Dungeon,
            location_label: "Cavendish B2".to_string(),
            timestamp: Utc.with_ymd_and_hms(2025, 11, 27, 12, 0, 0).unwrap(),
        }
    }

    #[test]
    fn test_round_trip() {
        let dir = tempdir().unwrap();
        let mut store = FileStore::new(dir.path());
        let original = record();
        save_game(&mut store, 3, &original).unwrap();
        let loaded = load_game(&store, 3).unwrap();
        assert_eq!(loaded, original);
    }

    #[test]
    fn test_manual_save_to_auto_slot_refused() {
        let mut store = MemoryStore::new();
        let result = save_game(&mut store, AUTO_SAVE_SLOT, &record());
        assert!(matches!(result, Err(SaveError::ReservedSlot(5))));
        assert!(load_game(&store, AUTO_SAVE_SLOT).is_none());

        auto_save(&mut store, &record()).unwrap();
        assert!(load_game(&store, AUTO_SAVE_SLOT).is_some());
    }

    #[test]
    fn test_invalid_slot() {
        let mut store = MemoryStore::new();
        assert!(matches!(save_game(&mut store, 0, &record()), Err(SaveError::InvalidSlot(0))));
        assert!(matches!(save_game(&mut store, 6, &record()), Err(SaveError::InvalidSlot(6))));
    }

    #[test]
    fn test_corrupt_slot_is_empty() {
        let mut store = MemoryStore::new();
        store.write(1, "{ not json").unwrap();
        assert!(load_game(&store, 1).is_none());
    }

    #[test]
    fn test_legacy_record_without_progress() {
        let mut value = serde_json::to_value(record()).unwrap();
        let obj = value.as_object_mut().unwrap();
        obj.remove("progress");
        obj.remove("context");
        obj.remove("version");
        obj.remove("dungeon_pos");
        let mut store = MemoryStore::new();
        store.write(2, &value.to_string()).unwrap();

        let loaded = load_game(&store, 2).unwrap();
        assert!(loaded.progress.all_uncleared());
        assert_eq!(loaded.context, Location::Overworld);
        assert_eq!(loaded.version, 0);
    }

    #[test]
    fn test_newer_version_is_empty() {
        let mut newer = record();
        newer.version = SAVE_VERSION + 1;
        let mut store = MemoryStore::new();
        store.write(1, &serde_json::to_string(&newer).unwrap()).unwrap();
        assert!(load_game(&store, 1).is_none());
    }

    #[test]
    fn test_list_saves() {
        let mut store = MemoryStore::new();
        save_game(&mut store, 2, &record()).unwrap();
        let slots = list_saves(&store);
        assert_eq!(slots.len(), 5);
        assert!(slots[0].1.is_none());
        let summary = slots[1].1.as_ref().unwrap();
        assert_eq!(summary.level, 6);
        assert_eq!(summary.label, "Cavendish B2");
    }
}
