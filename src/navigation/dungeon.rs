//! Dungeon navigation
//!
//! Two floors per region. Floor 1's guardian, once beaten, leaves a stair
//! down; floor 2's guardian leaves a portal back to the surface that, in
//! every region but the last, carries the hero on to the next region.

use rand::rngs::StdRng;

use super::{Explorer, Location, NavOutcome};
use crate::ecs::Direction;
use crate::game::{LogEntry, MessageLog};
use crate::progression::{roll_encounter, WorldProgress};
use crate::world::{DungeonTile, TileKind, WorldMaps, OVERWORLD_START};

/// Try to step one tile on the current floor
pub fn step(explorer: &mut Explorer, maps: &WorldMaps, direction: Direction, rng: &mut StdRng) -> NavOutcome {
    let grid = maps.dungeon(explorer.dungeon_floor);
    let target = explorer.dungeon_pos.step(direction);
    let Some(tile) = grid.get(target).filter(|t| t.is_walkable()) else {
        return NavOutcome::Stay;
    };
    explorer.dungeon_pos = target;

    if roll_encounter(tile.encounter_rate(), rng) {
        NavOutcome::Encounter { boss: false }
    } else {
        NavOutcome::Stay
    }
}

/// Interact with the tile under the hero
pub fn confirm(explorer: &mut Explorer, maps: &WorldMaps, progress: &WorldProgress, log: &mut MessageLog) -> NavOutcome {
    let floor = explorer.dungeon_floor;
    let tile = maps.dungeon(floor).get(explorer.dungeon_pos);
    let cleared = progress.region(explorer.region).is_cleared(floor);

    match tile {
        Some(DungeonTile::Entrance) => {
            explorer.leave_context();
            log.push(LogEntry::LeaveDungeon);
            NavOutcome::Enter(Location::Overworld)
        }
        Some(DungeonTile::Boss) if !cleared => {
            log::info!("Boss challenge on {} B{}", explorer.region.name(), floor);
            NavOutcome::Encounter { boss: true }
        }
        Some(DungeonTile::Boss) if floor <= 1 => {
            explorer.dungeon_floor = 2;
            explorer.dungeon_pos = maps.stair_arrival(2);
            log.push(LogEntry::Descend { floor: 2 });
            NavOutcome::Stay
        }
        Some(DungeonTile::Boss) => {
            explorer.leave_context();
            match explorer.region.next() {
                Some(next) => {
                    explorer.region = next;
                    explorer.overworld_pos = OVERWORLD_START;
                    log.push(LogEntry::Travelled(next));
                    log::info!("Portal to {}", next.name());
                }
                None => log.push(LogEntry::LeaveDungeon),
            }
            NavOutcome::Enter(Location::Overworld)
        }
        Some(DungeonTile::Stairs) => {
            explorer.dungeon_floor = 1;
            explorer.dungeon_pos = maps.stair_arrival(1);
            log.push(LogEntry::Ascend { floor: 1 });
            NavOutcome::Stay
        }
        _ => {
            log.push(LogEntry::NothingHere);
            NavOutcome::Stay
        }
    }
}
