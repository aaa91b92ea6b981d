//! Progression systems

pub mod xp;
pub mod prestige;
pub mod difficulty;

pub use xp::{apply_defeat_penalty, exp_threshold, gain_experience, level_floor_exp, level_title};
pub use prestige::{apply_prestige, BossClear, RegionProgress, WorldProgress, PRESTIGE_EQUIP_BONUS};
pub use difficulty::{roll_encounter, target_level, zone_at, EncounterContext, Zone};
