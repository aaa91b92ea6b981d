//! Tile definitions
//!
//! The three tile families (overworld, town, dungeon) and their semantics:
//! passability, random-encounter rate, and special behaviour.

use serde::{Deserialize, Serialize};

/// Encounter probability on dungeon floor tiles
pub const DUNGEON_ENCOUNTER_RATE: f64 = 0.35;

/// Behaviour of a tile while the player stands on it in the overworld
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PassiveEffect {
    /// +1 hp and +1 mp per tick
    Regen,
    /// +10 gold per tick
    Stipend,
    /// One potion after several consecutive ticks
    Study,
}

/// Shared tile semantics used by the grid and the navigators
pub trait TileKind: Copy + PartialEq {
    fn from_char(c: char) -> Option<Self>;
    fn glyph(&self) -> char;
    fn is_walkable(&self) -> bool;
    /// Probability that stepping onto this tile starts a fight.
    /// `None` means the tile is categorically exempt.
    fn encounter_rate(&self) -> Option<f64>;
}

// ============================================================================
// Overworld
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverworldTile {
    Water,
    Grass,
    Forest,
    Mountain,
    /// Town entrance
    Town,
    /// Dungeon entrance
    Dungeon,
    /// Green Gables: hp/mp regeneration
    Homestead,
    /// Avonlea School: gold trickle
    School,
    /// Queen's Academy: slow potion accumulation
    Academy,
}

impl OverworldTile {
    pub fn passive_effect(&self) -> Option<PassiveEffect> {
        match self {
            OverworldTile::Homestead => Some(PassiveEffect::Regen),
            OverworldTile::School => Some(PassiveEffect::Stipend),
            OverworldTile::Academy => Some(PassiveEffect::Study),
            _ => None,
        }
    }

    pub fn fg_color(&self) -> (u8, u8, u8) {
        match self {
            OverworldTile::Water => (70, 110, 230),
            OverworldTile::Grass => (90, 170, 80),
            OverworldTile::Forest => (30, 110, 40),
            OverworldTile::Mountain => (150, 150, 150),
            OverworldTile::Town => (220, 190, 60),
            OverworldTile::Dungeon => (220, 60, 40),
            OverworldTile::Homestead => (60, 200, 140),
            OverworldTile::School => (120, 180, 255),
            OverworldTile::Academy => (180, 100, 230),
        }
    }
}

impl TileKind for OverworldTile {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'W' => OverworldTile::Water,
            'G' => OverworldTile::Grass,
            'F' => OverworldTile::Forest,
            'M' => OverworldTile::Mountain,
            'C' => OverworldTile::Town,
            'V' => OverworldTile::Dungeon,
            'H' => OverworldTile::Homestead,
            'K' => OverworldTile::School,
            'U' => OverworldTile::Academy,
            _ => return None,
        })
    }

    fn glyph(&self) -> char {
        match self {
            OverworldTile::Water => '~',
            OverworldTile::Grass => '.',
            OverworldTile::Forest => '♣',
            OverworldTile::Mountain => '^',
            OverworldTile::Town => 'T',
            OverworldTile::Dungeon => 'D',
            OverworldTile::Homestead => 'h',
            OverworldTile::School => 's',
            OverworldTile::Academy => 'a',
        }
    }

    fn is_walkable(&self) -> bool {
        !matches!(self, OverworldTile::Water)
    }

    fn encounter_rate(&self) -> Option<f64> {
        match self {
            OverworldTile::Grass => Some(0.1),
            OverworldTile::Forest => Some(0.2),
            OverworldTile::Mountain => Some(0.3),
            _ => None,
        }
    }
}

// ============================================================================
// Town
// ============================================================================

/// The five town facilities
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShopKind {
    Guild,
    Weapon,
    Armor,
    Item,
    Magic,
}

impl ShopKind {
    pub fn name(&self) -> &'static str {
        match self {
            ShopKind::Guild => "Adventurer's Guild",
            ShopKind::Weapon => "Blacksmith",
            ShopKind::Armor => "Armory",
            ShopKind::Item => "General Store",
            ShopKind::Magic => "Wizard's Tower",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TownTile {
    Tree,
    House,
    Road,
    Shop(ShopKind),
    Exit,
}

impl TileKind for TownTile {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'T' => TownTile::Tree,
            'N' => TownTile::House,
            'R' => TownTile::Road,
            'g' => TownTile::Shop(ShopKind::Guild),
            'w' => TownTile::Shop(ShopKind::Weapon),
            'a' => TownTile::Shop(ShopKind::Armor),
            'i' => TownTile::Shop(ShopKind::Item),
            'm' => TownTile::Shop(ShopKind::Magic),
            'E' => TownTile::Exit,
            _ => return None,
        })
    }

    fn glyph(&self) -> char {
        match self {
            TownTile::Tree => '♠',
            TownTile::House => '▲',
            TownTile::Road => '.',
            TownTile::Shop(ShopKind::Guild) => 'G',
            TownTile::Shop(ShopKind::Weapon) => 'W',
            TownTile::Shop(ShopKind::Armor) => 'A',
            TownTile::Shop(ShopKind::Item) => 'I',
            TownTile::Shop(ShopKind::Magic) => 'M',
            TownTile::Exit => 'E',
        }
    }

    fn is_walkable(&self) -> bool {
        !matches!(self, TownTile::Tree | TownTile::House)
    }

    fn encounter_rate(&self) -> Option<f64> {
        None
    }
}

// ============================================================================
// Dungeon
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DungeonTile {
    Wall,
    Floor,
    /// Floor guardian; becomes a stair down / exit portal once cleared
    Boss,
    /// Stair back up to floor 1
    Stairs,
    /// Way out to the overworld
    Entrance,
}

impl TileKind for DungeonTile {
    fn from_char(c: char) -> Option<Self> {
        Some(match c {
            'd' => DungeonTile::Wall,
            'f' => DungeonTile::Floor,
            'B' => DungeonTile::Boss,
            'S' => DungeonTile::Stairs,
            'E' => DungeonTile::Entrance,
            _ => return None,
        })
    }

    fn glyph(&self) -> char {
        match self {
            DungeonTile::Wall => '#',
            DungeonTile::Floor => '.',
            DungeonTile::Boss => 'B',
            DungeonTile::Stairs => '<',
            DungeonTile::Entrance => 'E',
        }
    }

    fn is_walkable(&self) -> bool {
        !matches!(self, DungeonTile::Wall)
    }

    fn encounter_rate(&self) -> Option<f64> {
        match self {
            DungeonTile::Floor => Some(DUNGEON_ENCOUNTER_RATE),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_special_tiles_never_roll() {
        for tile in [
            OverworldTile::Town,
            OverworldTile::Dungeon,
            OverworldTile::Homestead,
            OverworldTile::School,
            OverworldTile::Academy,
        ] {
            assert_eq!(tile.encounter_rate(), None, "{:?}", tile);
        }
        assert_eq!(DungeonTile::Boss.encounter_rate(), None);
    }

    #[test]
    fn test_water_and_walls_block() {
        assert!(!OverworldTile::Water.is_walkable());
        assert!(!TownTile::Tree.is_walkable());
        assert!(!TownTile::House.is_walkable());
        assert!(!DungeonTile::Wall.is_walkable());
        assert!(TownTile::Shop(ShopKind::Magic).is_walkable());
    }

    #[test]
    fn test_char_parsing() {
        assert_eq!(OverworldTile::from_char('K'), Some(OverworldTile::School));
        assert_eq!(TownTile::from_char('i'), Some(TownTile::Shop(ShopKind::Item)));
        assert_eq!(DungeonTile::from_char('x'), None);
    }
}
