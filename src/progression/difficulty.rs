//! Encounter level scaling
//!
//! Picks the level of the next enemy from where the player stands, and
//! decides whether stepping onto a tile starts a fight at all.
//!
//! Overworld regions share one base band shifted by a per-region offset.
//! Inside a region, distance to the town and to the dungeon entrance split
//! the band into thirds:
//!
//! - safe zone (near town): low third
//! - danger zone (near the dungeon): high third
//! - everywhere else: the middle third, or the midpoint when it is empty

use rand::rngs::StdRng;
use rand::Rng;

use crate::ecs::Position;
use crate::world::{OverworldTile, Region, WorldMaps};

/// Region 1 overworld band, before the region offset
pub const OVERWORLD_BAND: (u32, u32) = (1, 8);
/// Dungeon floor 1 band, before the region offset
pub const DUNGEON_F1_BAND: (u32, u32) = (5, 9);
/// Dungeon floor 2 band, before the region offset
pub const DUNGEON_F2_BAND: (u32, u32) = (8, 10);
/// Fixed boss levels for floor 1 and floor 2, before the region offset
pub const BOSS_LEVELS: [u32; 2] = [12, 15];
/// Manhattan radius around the town tile that counts as safe
pub const SAFE_RADIUS: i32 = 5;
/// Manhattan radius around the dungeon entrance that counts as dangerous
pub const DANGER_RADIUS: i32 = 3;

/// Where an encounter is happening
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EncounterContext {
    Overworld { region: Region, position: Position },
    Dungeon { region: Region, floor: u8 },
}

/// Difficulty zone of an overworld position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    Safe,
    Middle,
    Danger,
}

/// Level range of a region's overworld
pub fn region_band(region: Region) -> (u32, u32) {
    let offset = region.level_offset();
    (OVERWORLD_BAND.0 + offset, OVERWORLD_BAND.1 + offset)
}

/// Classify a position. Safe wins when both radii apply.
pub fn zone_at(maps: &WorldMaps, region: Region, position: Position) -> Zone {
    let grid = maps.overworld(region);
    let near = |tile: OverworldTile, radius: i32| {
        grid.find(tile).is_some_and(|p| p.distance(&position) <= radius)
    };
    if near(OverworldTile::Town, SAFE_RADIUS) {
        Zone::Safe
    } else if near(OverworldTile::Dungeon, DANGER_RADIUS) {
        Zone::Danger
    } else {
        Zone::Middle
    }
}

/// Sample a level from `zone`'s third of `[min, max]`
pub fn sample_zone(min: u32, max: u32, zone: Zone, rng: &mut StdRng) -> u32 {
    let total = max.saturating_sub(min);
    let low_end_max = min + total / 3;
    let high_end_min = min + (2 * total).div_ceil(3);

    match zone {
        Zone::Safe => rng.gen_range(min..=low_end_max),
        Zone::Danger => rng.gen_range(high_end_min..=max.max(high_end_min)),
        Zone::Middle => {
            let mid_min = low_end_max + 1;
            if high_end_min == 0 || mid_min > high_end_min - 1 {
                min + total / 2
            } else {
                rng.gen_range(mid_min..=high_end_min - 1)
            }
        }
    }
}

/// Level of the next enemy
pub fn target_level(is_boss: bool, ctx: EncounterContext, maps: &WorldMaps, rng: &mut StdRng) -> u32 {
    match ctx {
        EncounterContext::Dungeon { region, floor } => {
            let offset = region.level_offset();
            let idx = if floor <= 1 { 0 } else { 1 };
            if is_boss {
                return BOSS_LEVELS[idx] + offset;
            }
            let (min, max) = if idx == 0 { DUNGEON_F1_BAND } else { DUNGEON_F2_BAND };
            rng.gen_range(min + offset..=max + offset)
        }
        EncounterContext::Overworld { region, position } => {
            let (min, max) = region_band(region);
            let zone = zone_at(maps, region, position);
            sample_zone(min, max, zone, rng)
        }
    }
}

/// One uniform draw against a tile's encounter rate. Exempt tiles never fire.
pub fn roll_encounter(rate: Option<f64>, rng: &mut StdRng) -> bool {
    match rate {
        Some(p) if p > 0.0 => rng.gen::<f64>() < p,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{DungeonTile, TileKind};
    use rand::SeedableRng;

    #[test]
    fn test_zone_thirds() {
        let mut rng = StdRng::seed_from_u64(42);
        // [1,8]: low [1,3], middle [4,5], high [6,8]
        for _ in 0..500 {
            let safe = sample_zone(1, 8, Zone::Safe, &mut rng);
            assert!((1..=3).contains(&safe));
            let mid = sample_zone(1, 8, Zone::Middle, &mut rng);
            assert!((4..=5).contains(&mid));
            let danger = sample_zone(1, 8, Zone::Danger, &mut rng);
            assert!((6..=8).contains(&danger));
        }
    }

    #[test]
    fn test_empty_middle_falls_back_to_midpoint() {
        let mut rng = StdRng::seed_from_u64(1);
        // [10,12]: low_end_max 10, high_end_min 12, middle [11,11] non-empty
        assert_eq!(sample_zone(10, 12, Zone::Middle, &mut rng), 11);
        // [10,11]: low_end_max 10, high_end_min 11, middle empty
        assert_eq!(sample_zone(10, 11, Zone::Middle, &mut rng), 10);
        assert_eq!(sample_zone(5, 5, Zone::Middle, &mut rng), 5);
    }

    #[test]
    fn test_zones_on_map() {
        let maps = WorldMaps::new();
        assert_eq!(zone_at(&maps, Region::Avonlea, Position::new(3, 3)), Zone::Safe);
        assert_eq!(zone_at(&maps, Region::Avonlea, Position::new(12, 3)), Zone::Danger);
        assert_eq!(zone_at(&maps, Region::Avonlea, Position::new(9, 6)), Zone::Middle);
    }

    #[test]
    fn test_region_offsets() {
        let maps = WorldMaps::new();
        let mut rng = StdRng::seed_from_u64(9);
        let ctx = EncounterContext::Overworld { region: Region::Charlottetown, position: Position::new(2, 3) };
        for _ in 0..200 {
            let level = target_level(false, ctx, &maps, &mut rng);
            assert!((11..=13).contains(&level));
        }
    }

    #[test]
    fn test_dungeon_levels() {
        let maps = WorldMaps::new();
        let mut rng = StdRng::seed_from_u64(3);
        let f1 = EncounterContext::Dungeon { region: Region::Avonlea, floor: 1 };
        let f2 = EncounterContext::Dungeon { region: Region::Cavendish, floor: 2 };
        for _ in 0..200 {
            assert!((5..=9).contains(&target_level(false, f1, &maps, &mut rng)));
            assert!((13..=15).contains(&target_level(false, f2, &maps, &mut rng)));
        }
        assert_eq!(target_level(true, f1, &maps, &mut rng), 12);
        assert_eq!(target_level(true, f2, &maps, &mut rng), 20);
    }

    #[test]
    fn test_encounter_rate_statistics() {
        let mut rng = StdRng::seed_from_u64(2024);
        let fired = (0..100_000).filter(|_| roll_encounter(Some(0.2), &mut rng)).count();
        assert!((19_000..=21_000).contains(&fired), "fired {}", fired);
    }

    #[test]
    fn test_exempt_tiles_never_fire() {
        let mut rng = StdRng::seed_from_u64(0);
        for _ in 0..1000 {
            assert!(!roll_encounter(OverworldTile::Town.encounter_rate(), &mut rng));
            assert!(!roll_encounter(DungeonTile::Boss.encounter_rate(), &mut rng));
        }
    }
}
