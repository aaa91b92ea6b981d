//! Input signals
//!
//! The engine only ever sees these five. Frontends normalize their own key
//! or pointer events before dispatching.

use crate::ecs::Direction;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Input {
    Up,
    Down,
    Left,
    Right,
    Confirm,
}

impl Input {
    pub fn direction(&self) -> Option<Direction> {
        match self {
            Input::Up => Some(Direction::Up),
            Input::Down => Some(Direction::Down),
            Input::Left => Some(Direction::Left),
            Input::Right => Some(Direction::Right),
            Input::Confirm => None,
        }
    }
}
