//! Turkey Quest - A turn-based terminal adventure
//!
//! Roam three island regions, clear their dungeon guardians,
//! and reincarnate stronger once the last one falls.

pub mod game;
pub mod ecs;
pub mod world;
pub mod entities;
pub mod combat;
pub mod progression;
pub mod navigation;
pub mod ui;
pub mod save;
pub mod data;

// Re-export commonly used types
pub use game::{Game, GameState, Input};
pub use ecs::components::*;
pub use world::Region;
