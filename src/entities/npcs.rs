//! Town population
//!
//! A handful of townsfolk are spawned into a `hecs::World` every time the
//! player walks into town. They wander the roads, block movement, and one
//! of them carries a one-time gift.

use hecs::{Entity, World};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::ecs::{BlocksMovement, Direction, PendingReward, Position, RewardKind, Townsfolk};
use crate::world::{Grid, TownTile};

/// Number of townsfolk per visit
pub const TOWNSFOLK_COUNT: usize = 4;
/// Chance that a townsperson moves on a wander tick
pub const WANDER_CHANCE: f64 = 0.5;
/// Max hp granted by the max-stat gift
pub const GIFT_MAX_HP: i32 = 10;
/// Gold gift per player level
pub const GIFT_GOLD_PER_LEVEL: u32 = 100;

const NAMES: [&str; 8] = [
    "Diana",
    "Gilbert",
    "Marilla",
    "Matthew",
    "Mrs. Lynde",
    "Josie Pye",
    "Ruby",
    "Mr. Phillips",
];

const DIALOGUE: [&str; 6] = [
    "The turkeys have been restless since the harvest.",
    "I heard gobbling from the old cellar again last night.",
    "Mind the mountains, the big birds roost up there.",
    "The blacksmith can sharpen anything, for a price.",
    "They say a turkey god sleeps under Charlottetown.",
    "Rest at the guild before you go poking at dungeons.",
];

/// Display name of a townsperson
pub fn townsfolk_name(folk: &Townsfolk) -> &'static str {
    NAMES[folk.name_index % NAMES.len()]
}

/// Small talk line of a townsperson
pub fn townsfolk_line(folk: &Townsfolk) -> &'static str {
    DIALOGUE[folk.dialogue_index % DIALOGUE.len()]
}

/// Roll the gift for this visit
pub fn roll_reward(player_level: u32, rng: &mut StdRng) -> RewardKind {
    match rng.gen_range(0..3) {
        0 => RewardKind::Gold(GIFT_GOLD_PER_LEVEL * player_level.max(1)),
        1 => RewardKind::Potion,
        _ => RewardKind::MaxHp(GIFT_MAX_HP),
    }
}

/// Despawn the old population and place a fresh one on free road tiles.
/// Exactly one townsperson carries a reward.
pub fn spawn_townsfolk(
    world: &mut World,
    grid: &Grid<TownTile>,
    player_pos: Position,
    player_level: u32,
    rng: &mut StdRng,
) -> Vec<Entity> {
    world.clear();

    let mut free: Vec<Position> = grid
        .positions_where(|t| t == TownTile::Road)
        .into_iter()
        .filter(|p| *p != player_pos)
        .collect();
    free.shuffle(rng);

    let mut names: Vec<usize> = (0..NAMES.len()).collect();
    names.shuffle(rng);

    let count = TOWNSFOLK_COUNT.min(free.len());
    if count == 0 {
        return Vec::new();
    }
    let gift_holder = rng.gen_range(0..count);

    let mut spawned = Vec::with_capacity(count);
    for (i, pos) in free.into_iter().take(count).enumerate() {
        let folk = Townsfolk {
            name_index: names[i % names.len()],
            dialogue_index: rng.gen_range(0..DIALOGUE.len()),
        };
        let entity = world.spawn((pos, folk, BlocksMovement));
        if i == gift_holder {
            let reward = roll_reward(player_level, rng);
            log::debug!("{} carries {:?}", townsfolk_name(&folk), reward);
            // Entity was just spawned so insertion cannot fail
            let _ = world.insert_one(entity, PendingReward(reward));
        }
        spawned.push(entity);
    }
    spawned
}

/// Townsperson standing at `pos`, if any
pub fn townsfolk_at(world: &World, pos: Position) -> Option<Entity> {
    world
        .query::<(&Position, &BlocksMovement)>()
        .iter()
        .find(|(_, (p, _))| **p == pos)
        .map(|(e, _)| e)
}

/// A townsperson orthogonally adjacent to `pos`, checked in direction order
pub fn townsfolk_adjacent(world: &World, pos: Position) -> Option<Entity> {
    pos.neighbours().into_iter().find_map(|n| townsfolk_at(world, n))
}

/// Move each townsperson one road step with `WANDER_CHANCE`.
/// Townsfolk never step onto each other or the player.
pub fn wander_townsfolk(world: &mut World, grid: &Grid<TownTile>, player_pos: Position, rng: &mut StdRng) {
    let mut occupied: Vec<(Entity, Position)> = world
        .query::<(&Position, &Townsfolk)>()
        .iter()
        .map(|(e, (p, _))| (e, *p))
        .collect();

    for i in 0..occupied.len() {
        if !rng.gen_bool(WANDER_CHANCE) {
            continue;
        }
        let (entity, from) = occupied[i];
        let Some(direction) = Direction::ALL.choose(rng) else {
            continue;
        };
        let to = from.step(*direction);
        let blocked = to == player_pos || occupied.iter().any(|(_, p)| *p == to);
        if blocked || grid.get(to) != Some(TownTile::Road) {
            continue;
        }
        if let Ok(mut pos) = world.get::<&mut Position>(entity) {
            *pos = to;
            occupied[i].1 = to;
        }
    }
}

/// What a townsperson says when spoken to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversation {
    pub name: &'static str,
    pub line: &'static str,
    /// Gift handed over during this conversation, removed from the entity
    pub reward: Option<RewardKind>,
}

/// Talk to a townsperson, claiming their gift if they still hold one
pub fn talk_to(world: &mut World, entity: Entity) -> Option<Conversation> {
    let folk = *world.get::<&Townsfolk>(entity).ok()?;
    let reward = world.remove_one::<PendingReward>(entity).ok().map(|r| r.0);
    Some(Conversation {
        name: townsfolk_name(&folk),
        line: townsfolk_line(&folk),
        reward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::world::{WorldMaps, TOWN_START};
    use rand::SeedableRng;

    fn populated(seed: u64) -> (World, WorldMaps, StdRng) {
        let maps = WorldMaps::new();
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(seed);
        spawn_townsfolk(&mut world, &maps.town, TOWN_START, 3, &mut rng);
        (world, maps, rng)
    }

    #[test]
    fn test_spawn_population() {
        let (world, maps, _) = populated(7);
        let positions: Vec<Position> = world.query::<&Position>().iter().map(|(_, p)| *p).collect();
        assert_eq!(positions.len(), TOWNSFOLK_COUNT);
        for p in &positions {
            assert_eq!(maps.town.get(*p), Some(TownTile::Road));
            assert_ne!(*p, TOWN_START);
        }
        let gifts = world.query::<&PendingReward>().iter().count();
        assert_eq!(gifts, 1);
    }

    #[test]
    fn test_respawn_replaces_population() {
        let (mut world, maps, mut rng) = populated(11);
        spawn_townsfolk(&mut world, &maps.town, TOWN_START, 1, &mut rng);
        assert_eq!(world.query::<&Townsfolk>().iter().count(), TOWNSFOLK_COUNT);
    }

    #[test]
    fn test_reward_claimed_once() {
        let (mut world, _, _) = populated(3);
        let holder = world
            .query::<&PendingReward>()
            .iter()
            .map(|(e, _)| e)
            .next()
            .unwrap();
        let first = talk_to(&mut world, holder).unwrap();
        assert!(first.reward.is_some());
        let second = talk_to(&mut world, holder).unwrap();
        assert!(second.reward.is_none());
        assert_eq!(first.name, second.name);
    }

    #[test]
    fn test_wander_stays_on_road() {
        let (mut world, maps, mut rng) = populated(5);
        for _ in 0..200 {
            wander_townsfolk(&mut world, &maps.town, TOWN_START, &mut rng);
            let positions: Vec<Position> = world.query::<&Position>().iter().map(|(_, p)| *p).collect();
            for (i, p) in positions.iter().enumerate() {
                assert_eq!(maps.town.get(*p), Some(TownTile::Road));
                assert_ne!(*p, TOWN_START);
                assert!(!positions[i + 1..].contains(p));
            }
        }
    }

    #[test]
    fn test_lookup_helpers() {
        let (world, _, _) = populated(9);
        let (entity, pos) = world
            .query::<&Position>()
            .iter()
            .map(|(e, p)| (e, *p))
            .next()
            .unwrap();
        assert_eq!(townsfolk_at(&world, pos), Some(entity));
        let beside = pos.step(Direction::Left);
        assert!(townsfolk_adjacent(&world, beside).is_some());
    }

    #[test]
    fn test_gold_gift_scales() {
        let mut rng = StdRng::seed_from_u64(1);
        for _ in 0..50 {
            if let RewardKind::Gold(g) = roll_reward(4, &mut rng) {
                assert_eq!(g, 400);
            }
        }
    }
}
