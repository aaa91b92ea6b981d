//! Game module - Core game logic and state management

mod input;
mod messages;
mod state;
mod time;

pub use input::Input;
pub use messages::{LogEntry, MessageCategory, MessageLog, LOG_CAPACITY};
pub use state::{Game, GameState, Modal, Snapshot, MENU_BACK};
pub use time::{Interval, Scheduler, TaskKind, TaskOwner};
