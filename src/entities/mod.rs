//! Entity creation and management

pub mod player;
pub mod enemies;
pub mod npcs;

pub use player::{bounded_name, name_width, Player, DEFAULT_NAME, NAME_WIDTH};
pub use enemies::Enemy;
pub use npcs::{spawn_townsfolk, talk_to, townsfolk_adjacent, townsfolk_at, wander_townsfolk, Conversation};
