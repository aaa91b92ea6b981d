//! Enemy creation
//!
//! An `Enemy` lives for exactly one encounter. Its flavour (name, stats,
//! description, art) comes from an `EnemyProvider`; this module only turns
//! that content into a combatant and applies the boss multipliers.

use serde::{Deserialize, Serialize};

use crate::data::provider::MAX_ENEMY_STAT;
use crate::data::EnemyContent;
use crate::ecs::Pool;

/// Boss hp multiplier
pub const BOSS_HP_MULT: f64 = 1.5;
/// Boss attack multiplier
pub const BOSS_ATK_MULT: f64 = 1.2;
/// Name prefix applied to bosses
pub const BOSS_PREFIX: &str = "BOSS: ";

/// The opponent of a single battle
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enemy {
    pub name: String,
    pub level: u32,
    pub hp: Pool,
    /// Display only; enemies never cast
    pub mp: Pool,
    pub attack: i32,
    pub defense: i32,
    pub description: String,
    pub is_boss: bool,
    pub art_ref: Option<String>,
}

impl Enemy {
    /// Build an enemy from provider content. Stats are clamped into
    /// `0..=MAX_ENEMY_STAT` (hp to at least 1) since provider output is not trusted.
    pub fn from_content(content: EnemyContent, level: u32, is_boss: bool) -> Self {
        let mut hp = content.hp.clamp(1, MAX_ENEMY_STAT);
        let mut attack = content.attack.clamp(0, MAX_ENEMY_STAT);
        let mut name = content.name;

        if is_boss {
            hp = (f64::from(hp) * BOSS_HP_MULT).floor() as i32;
            attack = (f64::from(attack) * BOSS_ATK_MULT).floor() as i32;
            name = format!("{}{}", BOSS_PREFIX, name);
        }

        Self {
            name,
            level,
            hp: Pool::new(hp),
            mp: Pool::new(content.mp.clamp(0, MAX_ENEMY_STAT)),
            attack,
            defense: content.defense.clamp(0, MAX_ENEMY_STAT),
            description: content.description,
            is_boss,
            art_ref: content.art_ref,
        }
    }

    pub fn is_dead(&self) -> bool {
        self.hp.is_depleted()
    }

    /// Experience awarded on defeat
    pub fn exp_reward(&self) -> u32 {
        (self.hp.max.max(0) as u32).saturating_mul(2)
    }

    /// Gold awarded on defeat
    pub fn gold_reward(&self) -> u32 {
        (self.attack.max(0) as u32).saturating_mul(5)
    }
}
