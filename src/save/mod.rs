//! Save/load system
//!
//! Snapshots of the session written to five fixed slots.

pub mod save_game;
pub mod store;

pub use save_game::{
    SaveRecord, SaveError, SaveSummary,
    save_game, auto_save, load_game, delete_save, list_saves,
    AUTO_SAVE_SLOT, SAVE_VERSION, SLOT_COUNT,
};
pub use store::{FileStore, MemoryStore, SlotStore};
