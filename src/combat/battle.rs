//! Turn-based battle
//!
//! One `Battle` per encounter. The player picks an action from a five-entry
//! menu; the battle resolves it, then lets the enemy answer if it is still
//! standing. Actions that cannot be paid for (no mp, no potions) log a
//! warning and hand the turn straight back without the enemy acting.

use rand::Rng;

use super::damage::{self, MAGIC_ATTACK_COST, MAGIC_HEAL_COST, POTION_HEAL};
use super::loot::{apply_loot, roll_loot, Loot};
use crate::entities::{Enemy, Player};
use crate::game::{LogEntry, MessageLog};
use crate::progression::{gain_experience, BossClear, WorldProgress};
use crate::world::Region;

/// Battle phases
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BattlePhase {
    /// Waiting for the player's command
    PlayerInput,
    /// A command is being resolved
    Processing,
    /// Enemy defeated; waiting for acknowledgement
    Victory,
    /// Hero defeated; waiting for acknowledgement
    Defeat,
}

/// Player commands, in menu order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Physical,
    MagicAttack,
    MagicHeal,
    UseItem,
    Flee,
}

impl Action {
    pub const MENU: [Action; 5] = [
        Action::Physical,
        Action::MagicAttack,
        Action::MagicHeal,
        Action::UseItem,
        Action::Flee,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Action::Physical => "Attack",
            Action::MagicAttack => "Magic Attack",
            Action::MagicHeal => "Heal",
            Action::UseItem => "Potion",
            Action::Flee => "Flee",
        }
    }
}

/// Where the fight takes place; decides which boss flag a kill sets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BattleSite {
    pub region: Region,
    /// Dungeon floor, `None` in the overworld
    pub floor: Option<u8>,
}

/// Result of resolving one command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnOutcome {
    /// Back to `PlayerInput` (including a refused command)
    Continue,
    /// Escaped; the caller returns to the pre-battle state
    Fled,
    /// Enemy died; `boss` holds the progress change for boss kills
    Won { boss: Option<BossClear> },
    /// Hero died
    Lost,
}

/// A single encounter
#[derive(Debug, Clone)]
pub struct Battle {
    pub enemy: Enemy,
    pub site: BattleSite,
    phase: BattlePhase,
    selected: usize,
}

impl Battle {
    pub fn new(enemy: Enemy, site: BattleSite) -> Self {
        Self { enemy, site, phase: BattlePhase::PlayerInput, selected: 0 }
    }

    pub fn phase(&self) -> BattlePhase {
        self.phase
    }

    pub fn selected(&self) -> Action {
        Action::MENU[self.selected]
    }

    pub fn selected_index(&self) -> usize {
        self.selected
    }

    /// Move the menu cursor, wrapping around
    pub fn cycle(&mut self, forward: bool) {
        let len = Action::MENU.len();
        self.selected = if forward {
            (self.selected + 1) % len
        } else {
            (self.selected + len - 1) % len
        };
    }

    /// Resolve the highlighted command
    pub fn confirm(
        &mut self,
        player: &mut Player,
        progress: &mut WorldProgress,
        log: &mut MessageLog,
        rng: &mut impl Rng,
    ) -> TurnOutcome {
        self.act(self.selected(), player, progress, log, rng)
    }

    /// Resolve `action`. Ignored outside `PlayerInput`.
    pub fn act(
        &mut self,
        action: Action,
        player: &mut Player,
        progress: &mut WorldProgress,
        log: &mut MessageLog,
        rng: &mut impl Rng,
    ) -> TurnOutcome {
        if self.phase != BattlePhase::PlayerInput {
            return TurnOutcome::Continue;
        }
        self.phase = BattlePhase::Processing;

        match action {
            Action::Physical => {
                let hit = damage::physical_attack(player, self.enemy.defense, rng);
                self.enemy.hp.take_damage(hit.damage);
                log.push(LogEntry::PlayerHit { damage: hit.damage, crit: hit.is_crit });
            }
            Action::MagicAttack => {
                if !player.mp.spend(MAGIC_ATTACK_COST) {
                    return self.refuse(LogEntry::NoMp, log);
                }
                let hit = damage::magic_attack(player, rng);
                self.enemy.hp.take_damage(hit.damage);
                log.push(LogEntry::MagicHit { damage: hit.damage });
            }
            Action::MagicHeal => {
                if !player.mp.spend(MAGIC_HEAL_COST) {
                    return self.refuse(LogEntry::NoMp, log);
                }
                let amount = damage::heal_amount(player.level);
                player.hp.heal(amount);
                log.push(LogEntry::Healed { amount });
            }
            Action::UseItem => {
                if !player.take_potion() {
                    return self.refuse(LogEntry::NoPotion, log);
                }
                player.hp.heal(POTION_HEAL);
                log.push(LogEntry::PotionUsed { amount: POTION_HEAL });
            }
            Action::Flee => {
                if self.enemy.is_boss {
                    log.push(LogEntry::NoEscape);
                } else if damage::roll_flee(rng) {
                    log.push(LogEntry::FleeSucceeded);
                    log::debug!("Fled from {}", self.enemy.name);
                    return TurnOutcome::Fled;
                } else {
                    log.push(LogEntry::FleeFailed);
                }
            }
        }

        if self.enemy.is_dead() {
            let boss = self.resolve_victory(player, progress, log, rng);
            return TurnOutcome::Won { boss };
        }

        self.enemy_turn(player, log)
    }

    fn refuse(&mut self, entry: LogEntry, log: &mut MessageLog) -> TurnOutcome {
        log.push(entry);
        self.phase = BattlePhase::PlayerInput;
        TurnOutcome::Continue
    }

    fn enemy_turn(&mut self, player: &mut Player, log: &mut MessageLog) -> TurnOutcome {
        let dealt = damage::enemy_attack(self.enemy.attack, player);
        player.hp.take_damage(dealt);
        log.push(LogEntry::EnemyHit { name: self.enemy.name.clone(), damage: dealt });

        if player.hp.is_depleted() {
            log.push(LogEntry::Defeated);
            log::info!("{} was defeated by {}", player.name, self.enemy.name);
            self.phase = BattlePhase::Defeat;
            TurnOutcome::Lost
        } else {
            self.phase = BattlePhase::PlayerInput;
            TurnOutcome::Continue
        }
    }

    fn resolve_victory(
        &mut self,
        player: &mut Player,
        progress: &mut WorldProgress,
        log: &mut MessageLog,
        rng: &mut impl Rng,
    ) -> Option<BossClear> {
        let exp = self.enemy.exp_reward();
        let gold = self.enemy.gold_reward();
        player.add_gold(gold);
        let levels = gain_experience(player, exp);
        log.push(LogEntry::Victory { exp, gold });
        if levels > 0 {
            log.push(LogEntry::LevelUp { level: player.level });
        }

        let loot = roll_loot(rng);
        apply_loot(player, &loot);
        if loot != Loot::Nothing {
            log.push(LogEntry::LootFound(loot));
        }

        log::info!(
            "{} defeated {} (+{} exp, +{} gold, level {})",
            player.name,
            self.enemy.name,
            exp,
            gold,
            player.level
        );

        self.phase = BattlePhase::Victory;

        let floor = self.site.floor.filter(|_| self.enemy.is_boss)?;
        let clear = progress.mark_cleared(self.site.region, floor);
        log.push(LogEntry::FloorCleared { floor });
        if let BossClear::RegionCleared { unlocked: Some(region) } = clear {
            log.push(LogEntry::RegionUnlocked(region));
        }
        Some(clear)
    }
}
