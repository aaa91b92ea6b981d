//! World module
//!
//! Static tile maps and tile semantics. Pure data, no behaviour.

pub mod map;
pub mod tile;
pub mod regions;

pub use map::Grid;
pub use regions::{Region, WorldMaps, DUNGEON_START, OVERWORLD_START, TOWN_START};
pub use tile::{DungeonTile, OverworldTile, PassiveEffect, ShopKind, TileKind, TownTile};
