//! Navigators
//!
//! Movement and tile interaction for the three exploration contexts. Each
//! context keeps its own position; `Explorer` holds all of them so a save
//! can capture the whole navigator state at once.

pub mod overworld;
pub mod town;
pub mod dungeon;
pub mod shop;

use hecs::World;
use serde::{Deserialize, Serialize};

use crate::ecs::Position;
use crate::world::{Region, DUNGEON_START, OVERWORLD_START, TOWN_START};

pub use shop::{ShopMenu, ShopOutcome};

/// Which navigator is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Location {
    #[default]
    Overworld,
    Town,
    Dungeon,
}

/// What a move or interaction asks the caller to do next
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavOutcome {
    /// Nothing beyond what was already applied
    Stay,
    /// Start a fight here
    Encounter { boss: bool },
    /// Switch to another navigator
    Enter(Location),
}

/// Navigator context for the whole session
pub struct Explorer {
    pub region: Region,
    pub overworld_pos: Position,
    pub town_pos: Position,
    /// 1 or 2
    pub dungeon_floor: u8,
    pub dungeon_pos: Position,
    /// Open shop dialog, town only
    pub shop: Option<ShopMenu>,
    /// Consecutive passive ticks spent on the Academy tile
    pub study_streak: u32,
    /// Current town population
    pub townsfolk: World,
}

impl Explorer {
    pub fn new() -> Self {
        Self {
            region: Region::Avonlea,
            overworld_pos: OVERWORLD_START,
            town_pos: TOWN_START,
            dungeon_floor: 1,
            dungeon_pos: DUNGEON_START,
            shop: None,
            study_streak: 0,
            townsfolk: World::new(),
        }
    }

    /// Drop transient interaction state when leaving a context
    pub fn leave_context(&mut self) {
        self.shop = None;
        self.study_streak = 0;
    }

    /// Back to the first region's start, used by reincarnation
    pub fn reset_to_start(&mut self) {
        self.leave_context();
        self.region = Region::Avonlea;
        self.overworld_pos = OVERWORLD_START;
        self.dungeon_floor = 1;
        self.dungeon_pos = DUNGEON_START;
    }
}

impl Default for Explorer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Explorer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Explorer")
            .field("region", &self.region)
            .field("overworld_pos", &self.overworld_pos)
            .field("town_pos", &self.town_pos)
            .field("dungeon_floor", &self.dungeon_floor)
            .field("dungeon_pos", &self.dungeon_pos)
            .field("shop", &self.shop)
            .field("study_streak", &self.study_streak)
            .field("townsfolk", &self.townsfolk.len())
            .finish()
    }
}
