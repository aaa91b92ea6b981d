//! Town shops
//!
//! Every shop offers exactly two choices: transact or leave. Equipment and
//! magic prices scale with level; rest and potions are flat.

use crate::entities::Player;
use crate::game::{LogEntry, MessageLog};
use crate::world::ShopKind;

pub const REST_COST: u32 = 20;
pub const POTION_COST: u32 = 20;
pub const WEAPON_COST_PER_LEVEL: u32 = 100;
pub const ARMOR_COST_PER_LEVEL: u32 = 100;
pub const MAGIC_COST_PER_LEVEL: u32 = 200;
/// Attack or defense gained from one upgrade
pub const GEAR_UPGRADE: u32 = 3;
/// Max mp gained from one magic lesson
pub const MAGIC_UPGRADE: i32 = 5;

/// Price of the shop's service at `level`
pub fn cost(kind: ShopKind, level: u32) -> u32 {
    let level = level.max(1);
    match kind {
        ShopKind::Guild => REST_COST,
        ShopKind::Weapon => WEAPON_COST_PER_LEVEL * level,
        ShopKind::Armor => ARMOR_COST_PER_LEVEL * level,
        ShopKind::Item => POTION_COST,
        ShopKind::Magic => MAGIC_COST_PER_LEVEL * level,
    }
}

/// Label of the transact choice
pub fn offer(kind: ShopKind) -> &'static str {
    match kind {
        ShopKind::Guild => "Rest",
        ShopKind::Weapon => "Sharpen weapon (+3 ATK)",
        ShopKind::Armor => "Reinforce armor (+3 DEF)",
        ShopKind::Item => "Buy potion",
        ShopKind::Magic => "Study magic (+5 max MP)",
    }
}

/// Result of confirming a shop choice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopOutcome {
    Purchased,
    NotEnoughGold,
    Left,
}

/// An open shop dialog
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShopMenu {
    pub kind: ShopKind,
    /// 0 = transact, 1 = leave
    pub selected: usize,
}

impl ShopMenu {
    pub fn new(kind: ShopKind) -> Self {
        Self { kind, selected: 0 }
    }

    pub fn toggle(&mut self) {
        self.selected = (self.selected + 1) % 2;
    }

    /// Carry out the highlighted choice
    pub fn confirm(&self, player: &mut Player, log: &mut MessageLog) -> ShopOutcome {
        if self.selected == 1 {
            return ShopOutcome::Left;
        }
        transact(self.kind, player, log)
    }
}

/// Buy the shop's service. Insufficient gold changes nothing but the log.
pub fn transact(kind: ShopKind, player: &mut Player, log: &mut MessageLog) -> ShopOutcome {
    let price = cost(kind, player.level);
    if !player.spend_gold(price) {
        log.push(LogEntry::NotEnoughGold { cost: price });
        return ShopOutcome::NotEnoughGold;
    }

    match kind {
        ShopKind::Guild => {
            player.restore_full();
            log.push(LogEntry::Rested);
        }
        ShopKind::Weapon => {
            player.equipment_atk = player.equipment_atk.saturating_add(GEAR_UPGRADE);
            log.push(LogEntry::Purchased(kind));
        }
        ShopKind::Armor => {
            player.equipment_def = player.equipment_def.saturating_add(GEAR_UPGRADE);
            log.push(LogEntry::Purchased(kind));
        }
        ShopKind::Item => {
            player.potions = player.potions.saturating_add(1);
            log.push(LogEntry::Purchased(kind));
        }
        ShopKind::Magic => {
            player.mp.grow(MAGIC_UPGRADE);
            log.push(LogEntry::Purchased(kind));
        }
    }
    log::debug!("{} bought from {} for {}", player.name, kind.name(), price);
    ShopOutcome::Purchased
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_costs() {
        assert_eq!(cost(ShopKind::Guild, 9), 20);
        assert_eq!(cost(ShopKind::Weapon, 3), 300);
        assert_eq!(cost(ShopKind::Armor, 3), 300);
        assert_eq!(cost(ShopKind::Item, 9), 20);
        assert_eq!(cost(ShopKind::Magic, 2), 400);
    }

    #[test]
    fn test_insufficient_gold_changes_nothing() {
        let mut player = Player::new("Anne");
        player.gold = 99;
        let before = player.clone();
        let mut log = MessageLog::new();
        assert_eq!(transact(ShopKind::Weapon, &mut player, &mut log), ShopOutcome::NotEnoughGold);
        assert_eq!(player, before);
        assert_eq!(log.last(), Some(&LogEntry::NotEnoughGold { cost: 100 }));
    }

    #[test]
    fn test_purchases() {
        let mut player = Player::new("Anne");
        player.gold = 1_000;
        player.hp.current = 1;
        player.mp.current = 40;
        let mut log = MessageLog::new();

        transact(ShopKind::Guild, &mut player, &mut log);
        assert!(player.hp.is_full() && player.mp.is_full());
        transact(ShopKind::Weapon, &mut player, &mut log);
        transact(ShopKind::Armor, &mut player, &mut log);
        transact(ShopKind::Item, &mut player, &mut log);
        player.mp.current = 40;
        transact(ShopKind::Magic, &mut player, &mut log);

        assert_eq!(player.equipment_atk, 3);
        assert_eq!(player.equipment_def, 3);
        assert_eq!(player.potions, 1);
        assert_eq!(player.mp.max, 55);
        assert_eq!(player.mp.current, 45);
        assert_eq!(player.gold, 1_000 - 20 - 100 - 100 - 20 - 200);
    }

    #[test]
    fn test_leave_choice() {
        let mut player = Player::new("Anne");
        player.gold = 500;
        let mut log = MessageLog::new();
        let mut menu = ShopMenu::new(ShopKind::Item);
        menu.toggle();
        assert_eq!(menu.confirm(&mut player, &mut log), ShopOutcome::Left);
        assert_eq!(player.gold, 500);
        menu.toggle();
        assert_eq!(menu.confirm(&mut player, &mut log), ShopOutcome::Purchased);
    }
}
