//! Combat system

pub mod damage;
pub mod loot;
pub mod battle;

pub use battle::{Action, Battle, BattlePhase, BattleSite, TurnOutcome};
pub use damage::{enemy_attack, magic_attack, physical_attack, player_defense, Hit};
pub use loot::{apply_loot, roll_loot, Loot};
