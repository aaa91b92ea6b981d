//! Static world data
//!
//! The three overworld regions, the town, and the two dungeon floors.

use serde::{Deserialize, Serialize};

use super::map::Grid;
use super::tile::{DungeonTile, OverworldTile, TownTile};
use crate::ecs::Position;

/// Overworld arrival tile for every region
pub const OVERWORLD_START: Position = Position::new(2, 2);
/// Town arrival tile (just inside the exit), also the recovery point after defeat
pub const TOWN_START: Position = Position::new(6, 7);
/// Dungeon floor 1 arrival tile (the entrance)
pub const DUNGEON_START: Position = Position::new(1, 7);

/// The three overworld regions, in order of difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Region {
    #[default]
    Avonlea,
    Cavendish,
    Charlottetown,
}

impl Region {
    pub const ALL: [Region; 3] = [Region::Avonlea, Region::Cavendish, Region::Charlottetown];

    pub fn index(&self) -> usize {
        match self {
            Region::Avonlea => 0,
            Region::Cavendish => 1,
            Region::Charlottetown => 2,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Region::Avonlea => "Avonlea",
            Region::Cavendish => "Cavendish",
            Region::Charlottetown => "Charlottetown",
        }
    }

    /// Additive offset applied to every enemy level band in this region
    pub fn level_offset(&self) -> u32 {
        match self {
            Region::Avonlea => 0,
            Region::Cavendish => 5,
            Region::Charlottetown => 10,
        }
    }

    pub fn next(&self) -> Option<Region> {
        match self {
            Region::Avonlea => Some(Region::Cavendish),
            Region::Cavendish => Some(Region::Charlottetown),
            Region::Charlottetown => None,
        }
    }

    pub fn previous(&self) -> Option<Region> {
        match self {
            Region::Avonlea => None,
            Region::Cavendish => Some(Region::Avonlea),
            Region::Charlottetown => Some(Region::Cavendish),
        }
    }

    /// The last region; clearing its second floor triggers reincarnation
    pub fn is_final(&self) -> bool {
        self.next().is_none()
    }

    fn rows(&self) -> &'static [&'static str] {
        match self {
            Region::Avonlea => &AVONLEA_ROWS,
            Region::Cavendish => &CAVENDISH_ROWS,
            Region::Charlottetown => &CHARLOTTETOWN_ROWS,
        }
    }
}

const AVONLEA_ROWS: [&str; 10] = [
    "WWWWWWWWWWWWWWW",
    "WGGGFFFMMMMMFFW",
    "WGCGFFGGMMMFVFW",
    "WGGGFFFMMMFFFMW",
    "WGGGFFFMMMMFMMW",
    "WGGGFFFFGGGMMWW",
    "WGGGGGGFGHGMWWW",
    "WWGMMGGGGGGWWWW",
    "WWWWMGGGGWWWWWW",
    "WWWWWWWWWWWWWWW",
];

const CAVENDISH_ROWS: [&str; 10] = [
    "WWWWWWWWWWWWWWW",
    "WGGGGGGGFFMMMMW",
    "WGCGGGGGFFMMVMW",
    "WGGGFFFMMMFFFFW",
    "WGGFFFFGGGGGGGW",
    "WGGGFFFFGGGGGWW",
    "WGGGGGGFGKGMWWW",
    "WWGMMGGGGGGWWWW",
    "WWWWMGGGGWWWWWW",
    "WWWWWWWWWWWWWWW",
];

const CHARLOTTETOWN_ROWS: [&str; 10] = [
    "WWWWWWWWWWWWWWW",
    "WGGGGGGGMMMMMMW",
    "WGCGGGGGMMMMVMW",
    "WGGGFFFMMMGGGGW",
    "WGGFFFFGGGGGGGW",
    "WGGGFFFFGGGGGWW",
    "WGGGGGGFGUGMWWW",
    "WWGMMGGGGGGWWWW",
    "WWWWMGGGGWWWWWW",
    "WWWWWWWWWWWWWWW",
];

const TOWN_ROWS: [&str; 9] = [
    "TTTTTTTTTTTTTTT",
    "TNNTgTmTNNTNNTT",
    "TRRRRRRRRRRRRRT",
    "TRTTTRTRTTTRTRT",
    "TRwTaRiRNTNRNRT",
    "TRRRRRRRRRRRRRT",
    "TRRRRRRRRRRRRRT",
    "TTTTTTRTTTTTTTT",
    "TTTTTTETTTTTTTT",
];

const DUNGEON_B1_ROWS: [&str; 9] = [
    "ddddddddddddddd",
    "dddddffffffdBdd",
    "dfffdfddddfdfdd",
    "dfdfdfddffffffd",
    "dfdfdffffddddfd",
    "dfdfddddddffffd",
    "dffffffffffdddd",
    "dEddddddddddddd",
    "ddddddddddddddd",
];

const DUNGEON_B2_ROWS: [&str; 9] = [
    "ddddddddddddddd",
    "dBffffddddddSdd",
    "dddddfdffffdfdd",
    "dfffffdfddfdfdd",
    "dfdddddfddfdfdd",
    "dfdffffffffffdd",
    "dfdfddddddddddd",
    "dfffddddddddddd",
    "ddddddddddddddd",
];

/// All static maps, parsed once per session
#[derive(Debug, Clone)]
pub struct WorldMaps {
    overworld: [Grid<OverworldTile>; 3],
    pub town: Grid<TownTile>,
    dungeon: [Grid<DungeonTile>; 2],
}

impl WorldMaps {
    pub fn new() -> Self {
        Self {
            overworld: Region::ALL.map(|r| Grid::parse(r.rows(), OverworldTile::Water)),
            town: Grid::parse(&TOWN_ROWS, TownTile::Tree),
            dungeon: [
                Grid::parse(&DUNGEON_B1_ROWS, DungeonTile::Wall),
                Grid::parse(&DUNGEON_B2_ROWS, DungeonTile::Wall),
            ],
        }
    }

    pub fn overworld(&self, region: Region) -> &Grid<OverworldTile> {
        &self.overworld[region.index()]
    }

    /// Dungeon grid for floor 1 or 2 (anything above 1 is treated as floor 2)
    pub fn dungeon(&self, floor: u8) -> &Grid<DungeonTile> {
        if floor <= 1 {
            &self.dungeon[0]
        } else {
            &self.dungeon[1]
        }
    }

    /// Where the player lands on a dungeon floor when taking the stairs
    pub fn stair_arrival(&self, floor: u8) -> Position {
        let tile = if floor <= 1 { DungeonTile::Boss } else { DungeonTile::Stairs };
        self.dungeon(floor).find(tile).unwrap_or(DUNGEON_START)
    }
}

impl Default for WorldMaps {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::tile::ShopKind;

    #[test]
    fn test_start_positions_are_walkable() {
        let maps = WorldMaps::new();
        for region in Region::ALL {
            let grid = maps.overworld(region);
            assert!(grid.is_walkable(OVERWORLD_START));
            assert_eq!(grid.find(OverworldTile::Town), Some(Position::new(2, 2)));
            assert_eq!(grid.find(OverworldTile::Dungeon), Some(Position::new(12, 2)));
        }
        assert!(maps.town.is_walkable(TOWN_START));
        assert_eq!(maps.dungeon(1).get(DUNGEON_START), Some(DungeonTile::Entrance));
    }

    #[test]
    fn test_town_has_all_shops() {
        let maps = WorldMaps::new();
        for kind in [ShopKind::Guild, ShopKind::Weapon, ShopKind::Armor, ShopKind::Item, ShopKind::Magic] {
            assert!(maps.town.find(TownTile::Shop(kind)).is_some(), "{:?}", kind);
        }
    }

    #[test]
    fn test_stair_arrivals() {
        let maps = WorldMaps::new();
        assert_eq!(maps.stair_arrival(2), Position::new(12, 1));
        assert_eq!(maps.stair_arrival(1), Position::new(12, 1));
        assert_eq!(maps.dungeon(2).find(DungeonTile::Boss), Some(Position::new(1, 1)));
    }

    #[test]
    fn test_region_order() {
        assert_eq!(Region::Avonlea.next(), Some(Region::Cavendish));
        assert!(Region::Charlottetown.is_final());
        assert_eq!(Region::Cavendish.level_offset(), 5);
        assert_eq!(Region::Charlottetown.level_offset(), 10);
    }
}
