//! Overworld navigation
//!
//! Free movement over the region map, random encounters, the town and
//! dungeon entrances, and the passive tiles that act while the hero stands
//! still.

use rand::rngs::StdRng;

use super::{Explorer, Location, NavOutcome};
use crate::ecs::Direction;
use crate::entities::Player;
use crate::game::{LogEntry, MessageLog};
use crate::progression::{roll_encounter, WorldProgress};
use crate::world::{OverworldTile, PassiveEffect, Region, TileKind, WorldMaps, DUNGEON_START, OVERWORLD_START};

/// Ticks on the Academy tile per potion
pub const STUDY_TICKS: u32 = 5;
/// Gold per School tick
pub const STIPEND_GOLD: u32 = 10;

/// Try to step one tile. Impassable targets leave the hero in place.
pub fn step(explorer: &mut Explorer, maps: &WorldMaps, direction: Direction, rng: &mut StdRng) -> NavOutcome {
    let grid = maps.overworld(explorer.region);
    let target = explorer.overworld_pos.step(direction);
    let Some(tile) = grid.get(target).filter(|t| t.is_walkable()) else {
        return NavOutcome::Stay;
    };

    explorer.overworld_pos = target;
    if tile != OverworldTile::Academy {
        explorer.study_streak = 0;
    }

    if roll_encounter(tile.encounter_rate(), rng) {
        log::debug!("Random encounter on {:?} at {:?}", tile, target);
        NavOutcome::Encounter { boss: false }
    } else {
        NavOutcome::Stay
    }
}

/// Interact with the tile under the hero
pub fn confirm(explorer: &mut Explorer, maps: &WorldMaps, log: &mut MessageLog) -> NavOutcome {
    let tile = maps.overworld(explorer.region).get(explorer.overworld_pos);
    match tile {
        Some(OverworldTile::Town) => {
            explorer.leave_context();
            log.push(LogEntry::EnterTown);
            NavOutcome::Enter(Location::Town)
        }
        Some(OverworldTile::Dungeon) => {
            explorer.leave_context();
            explorer.dungeon_floor = 1;
            explorer.dungeon_pos = DUNGEON_START;
            log.push(LogEntry::EnterDungeon);
            NavOutcome::Enter(Location::Dungeon)
        }
        // Passive tiles act on their own
        Some(t) if t.passive_effect().is_some() => NavOutcome::Stay,
        _ => {
            log.push(LogEntry::NothingHere);
            NavOutcome::Stay
        }
    }
}

/// Apply one passive tick for the tile under the hero
pub fn passive_tick(explorer: &mut Explorer, maps: &WorldMaps, player: &mut Player, log: &mut MessageLog) {
    let effect = maps
        .overworld(explorer.region)
        .get(explorer.overworld_pos)
        .and_then(|t| t.passive_effect());

    match effect {
        Some(PassiveEffect::Regen) => {
            explorer.study_streak = 0;
            let healed = player.hp.heal(1) + player.mp.heal(1);
            if healed > 0 {
                log.push(LogEntry::Regenerated);
            }
        }
        Some(PassiveEffect::Stipend) => {
            explorer.study_streak = 0;
            player.add_gold(STIPEND_GOLD);
            log.push(LogEntry::Stipend { gold: STIPEND_GOLD });
        }
        Some(PassiveEffect::Study) => {
            explorer.study_streak += 1;
            if explorer.study_streak >= STUDY_TICKS {
                explorer.study_streak = 0;
                player.potions = player.potions.saturating_add(1);
                log.push(LogEntry::Studied);
            }
        }
        None => explorer.study_streak = 0,
    }
}

/// Move to another region's start tile if it is unlocked
pub fn travel_to(explorer: &mut Explorer, progress: &WorldProgress, region: Region, log: &mut MessageLog) -> bool {
    if !progress.is_unlocked(region) {
        log.push(LogEntry::RegionLocked(region));
        return false;
    }
    explorer.leave_context();
    explorer.region = region;
    explorer.overworld_pos = OVERWORLD_START;
    log.push(LogEntry::Travelled(region));
    log::info!("Travelled to {}", region.name());
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Position;
    use rand::SeedableRng;

    fn setup() -> (Explorer, WorldMaps, MessageLog, StdRng) {
        (Explorer::new(), WorldMaps::new(), MessageLog::new(), StdRng::seed_from_u64(12))
    }

    #[test]
    fn test_water_blocks() {
        let (mut explorer, maps, _, mut rng) = setup();
        explorer.overworld_pos = Position::new(1, 1);
        assert_eq!(step(&mut explorer, &maps, Direction::Up, &mut rng), NavOutcome::Stay);
        assert_eq!(explorer.overworld_pos, Position::new(1, 1));
        assert_eq!(step(&mut explorer, &maps, Direction::Left, &mut rng), NavOutcome::Stay);
        assert_eq!(explorer.overworld_pos, Position::new(1, 1));
    }

    #[test]
    fn test_entrances() {
        let (mut explorer, maps, mut log, _) = setup();
        assert_eq!(confirm(&mut explorer, &maps, &mut log), NavOutcome::Enter(Location::Town));
        explorer.overworld_pos = Position::new(12, 2);
        explorer.dungeon_floor = 2;
        assert_eq!(confirm(&mut explorer, &maps, &mut log), NavOutcome::Enter(Location::Dungeon));
        assert_eq!(explorer.dungeon_floor, 1);
        assert_eq!(explorer.dungeon_pos, DUNGEON_START);
        explorer.overworld_pos = Position::new(1, 1);
        assert_eq!(confirm(&mut explorer, &maps, &mut log), NavOutcome::Stay);
        assert_eq!(log.last(), Some(&LogEntry::NothingHere));
    }

    #[test]
    fn test_exempt_tiles_never_encounter() {
        let (mut explorer, maps, _, mut rng) = setup();
        // Walk back and forth onto the town tile
        for _ in 0..200 {
            explorer.overworld_pos = Position::new(2, 1);
            assert_eq!(step(&mut explorer, &maps, Direction::Down, &mut rng), NavOutcome::Stay);
            assert_eq!(explorer.overworld_pos, OVERWORLD_START);
        }
    }

    #[test]
    fn test_homestead_regen() {
        let (mut explorer, maps, mut log, _) = setup();
        explorer.overworld_pos = Position::new(9, 6);
        let mut player = Player::new("Anne");
        player.hp.current = 10;
        passive_tick(&mut explorer, &maps, &mut player, &mut log);
        assert_eq!(player.hp.current, 11);
        assert_eq!(player.mp.current, 50);
        assert_eq!(log.last(), Some(&LogEntry::Regenerated));
    }

    #[test]
    fn test_school_stipend() {
        let (mut explorer, maps, mut log, _) = setup();
        explorer.region = Region::Cavendish;
        explorer.overworld_pos = Position::new(9, 6);
        let mut player = Player::new("Anne");
        passive_tick(&mut explorer, &maps, &mut player, &mut log);
        passive_tick(&mut explorer, &maps, &mut player, &mut log);
        assert_eq!(player.gold, 20);
    }

    #[test]
    fn test_academy_streak_resets_on_leave() {
        let (mut explorer, maps, mut log, mut rng) = setup();
        explorer.region = Region::Charlottetown;
        explorer.overworld_pos = Position::new(9, 6);
        let mut player = Player::new("Anne");
        for _ in 0..4 {
            passive_tick(&mut explorer, &maps, &mut player, &mut log);
        }
        assert_eq!(player.potions, 0);
        // step off and back on
        step(&mut explorer, &maps, Direction::Left, &mut rng);
        explorer.overworld_pos = Position::new(9, 6);
        assert_eq!(explorer.study_streak, 0);
        for _ in 0..4 {
            passive_tick(&mut explorer, &maps, &mut player, &mut log);
        }
        assert_eq!(player.potions, 0);
        passive_tick(&mut explorer, &maps, &mut player, &mut log);
        assert_eq!(player.potions, 1);
    }

    #[test]
    fn test_travel_requires_unlock() {
        let (mut explorer, _, mut log, _) = setup();
        let mut progress = WorldProgress::new();
        assert!(!travel_to(&mut explorer, &progress, Region::Cavendish, &mut log));
        assert_eq!(explorer.region, Region::Avonlea);
        progress.mark_cleared(Region::Avonlea, 2);
        explorer.overworld_pos = Position::new(5, 5);
        assert!(travel_to(&mut explorer, &progress, Region::Cavendish, &mut log));
        assert_eq!(explorer.region, Region::Cavendish);
        assert_eq!(explorer.overworld_pos, OVERWORLD_START);
    }
}
