//! Entity Component System module
//!
//! Shared components. The town population lives in a `hecs::World`
//! built from these.

pub mod components;

pub use components::*;
