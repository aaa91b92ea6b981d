//! User Interface module
//!
//! Terminal frontend built on ratatui. Keys are normalized into the five
//! engine inputs plus a handful of menu commands.

pub mod app;
pub mod widgets;

pub use app::App;
