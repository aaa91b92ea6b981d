//! Town navigation
//!
//! Walking the streets, shop doors, the exit, and the townsfolk. While a
//! shop dialog is open, Up/Down move its cursor instead of the hero.

use rand::rngs::StdRng;

use super::shop::{ShopMenu, ShopOutcome};
use super::{Explorer, Location, NavOutcome};
use crate::ecs::{Direction, RewardKind};
use crate::entities::{spawn_townsfolk, talk_to, townsfolk_adjacent, townsfolk_at, wander_townsfolk, Player};
use crate::game::{LogEntry, MessageLog};
use crate::world::{TileKind, TownTile, WorldMaps, TOWN_START};

/// Arrive in town: reset the position and repopulate the streets
pub fn enter(explorer: &mut Explorer, maps: &WorldMaps, player_level: u32, rng: &mut StdRng) {
    explorer.town_pos = TOWN_START;
    explorer.shop = None;
    spawn_townsfolk(&mut explorer.townsfolk, &maps.town, explorer.town_pos, player_level, rng);
}

/// Directional input in town
pub fn step(explorer: &mut Explorer, maps: &WorldMaps, direction: Direction) -> NavOutcome {
    if let Some(menu) = explorer.shop.as_mut() {
        if matches!(direction, Direction::Up | Direction::Down) {
            menu.toggle();
        }
        return NavOutcome::Stay;
    }

    let target = explorer.town_pos.step(direction);
    let walkable = maps.town.get(target).is_some_and(|t| t.is_walkable());
    if walkable && townsfolk_at(&explorer.townsfolk, target).is_none() {
        explorer.town_pos = target;
    }
    NavOutcome::Stay
}

fn apply_gift(player: &mut Player, reward: RewardKind) {
    match reward {
        RewardKind::Gold(gold) => player.add_gold(gold),
        RewardKind::Potion => player.potions = player.potions.saturating_add(1),
        RewardKind::MaxHp(hp) => player.hp.grow(hp),
    }
}

/// Confirm in town: shop choice, shop door, exit, or conversation
pub fn confirm(explorer: &mut Explorer, maps: &WorldMaps, player: &mut Player, log: &mut MessageLog) -> NavOutcome {
    if let Some(menu) = explorer.shop {
        if menu.confirm(player, log) == ShopOutcome::Left {
            explorer.shop = None;
        }
        return NavOutcome::Stay;
    }

    match maps.town.get(explorer.town_pos) {
        Some(TownTile::Shop(kind)) => {
            explorer.shop = Some(ShopMenu::new(kind));
            log.push(LogEntry::ShopWelcome(kind));
            return NavOutcome::Stay;
        }
        Some(TownTile::Exit) => {
            explorer.leave_context();
            explorer.townsfolk.clear();
            log.push(LogEntry::LeaveTown);
            return NavOutcome::Enter(Location::Overworld);
        }
        _ => {}
    }

    let Some(entity) = townsfolk_adjacent(&explorer.townsfolk, explorer.town_pos) else {
        log.push(LogEntry::NothingHere);
        return NavOutcome::Stay;
    };
    if let Some(conversation) = talk_to(&mut explorer.townsfolk, entity) {
        log.push(LogEntry::TownsfolkSays {
            name: conversation.name.to_string(),
            line: conversation.line.to_string(),
        });
        if let Some(reward) = conversation.reward {
            apply_gift(player, reward);
            log.push(LogEntry::Gift(reward));
            log::info!("{} received {:?} from {}", player.name, reward, conversation.name);
        }
    }
    NavOutcome::Stay
}

/// One townsfolk wander tick
pub fn wander_tick(explorer: &mut Explorer, maps: &WorldMaps, rng: &mut StdRng) {
    wander_townsfolk(&mut explorer.townsfolk, &maps.town, explorer.town_pos, rng);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::{PendingReward, Position};
    use crate::world::ShopKind;
    use rand::SeedableRng;

    fn in_town(seed: u64) -> (Explorer, WorldMaps, StdRng) {
        let maps = WorldMaps::new();
        let mut explorer = Explorer::new();
        let mut rng = StdRng::seed_from_u64(seed);
        enter(&mut explorer, &maps, 2, &mut rng);
        (explorer, maps, rng)
    }

    #[test]
    fn test_open_shop_and_cursor() {
        let (mut explorer, maps, _) = in_town(1);
        explorer.townsfolk.clear();
        let mut player = Player::new("Anne");
        let mut log = MessageLog::new();
        // Item shop door at (6, 4)
        explorer.town_pos = Position::new(6, 4);
        confirm(&mut explorer, &maps, &mut player, &mut log);
        assert_eq!(explorer.shop, Some(ShopMenu::new(ShopKind::Item)));

        // Movement keys drive the dialog, not the hero
        step(&mut explorer, &maps, Direction::Down);
        assert_eq!(explorer.town_pos, Position::new(6, 4));
        assert_eq!(explorer.shop.map(|m| m.selected), Some(1));

        confirm(&mut explorer, &maps, &mut player, &mut log);
        assert!(explorer.shop.is_none());
    }

    #[test]
    fn test_exit() {
        let (mut explorer, maps, _) = in_town(2);
        let mut player = Player::new("Anne");
        let mut log = MessageLog::new();
        explorer.town_pos = Position::new(6, 8);
        assert_eq!(
            confirm(&mut explorer, &maps, &mut player, &mut log),
            NavOutcome::Enter(Location::Overworld)
        );
        assert_eq!(explorer.townsfolk.len(), 0);
    }

    #[test]
    fn test_townsfolk_block_movement() {
        let (mut explorer, maps, _) = in_town(3);
        explorer.townsfolk.clear();
        explorer.town_pos = Position::new(3, 5);
        explorer.townsfolk.spawn((
            Position::new(4, 5),
            crate::ecs::Townsfolk { name_index: 0, dialogue_index: 0 },
            crate::ecs::BlocksMovement,
        ));
        step(&mut explorer, &maps, Direction::Right);
        assert_eq!(explorer.town_pos, Position::new(3, 5));
        step(&mut explorer, &maps, Direction::Down);
        assert_eq!(explorer.town_pos, Position::new(3, 6));
        // trees block too
        step(&mut explorer, &maps, Direction::Down);
        assert_eq!(explorer.town_pos, Position::new(3, 6));
    }

    #[test]
    fn test_gift_claimed_once() {
        let (mut explorer, maps, _) = in_town(4);
        explorer.townsfolk.clear();
        explorer.town_pos = Position::new(3, 5);
        explorer.townsfolk.spawn((
            Position::new(4, 5),
            crate::ecs::Townsfolk { name_index: 1, dialogue_index: 2 },
            crate::ecs::BlocksMovement,
            PendingReward(RewardKind::MaxHp(10)),
        ));
        let mut player = Player::new("Anne");
        let mut log = MessageLog::new();

        confirm(&mut explorer, &maps, &mut player, &mut log);
        assert_eq!(player.hp.max, 260);
        assert_eq!(log.last(), Some(&LogEntry::Gift(RewardKind::MaxHp(10))));

        confirm(&mut explorer, &maps, &mut player, &mut log);
        assert_eq!(player.hp.max, 260);
        assert!(matches!(log.last(), Some(LogEntry::TownsfolkSays { .. })));
    }

    #[test]
    fn test_enter_resets_position() {
        let (mut explorer, maps, mut rng) = in_town(5);
        explorer.town_pos = Position::new(1, 2);
        enter(&mut explorer, &maps, 1, &mut rng);
        assert_eq!(explorer.town_pos, TOWN_START);
        assert_eq!(explorer.townsfolk.len(), 4);
    }
}
