//! ECS Components
//!
//! Components shared by the player, the town population, and the map code.

use serde::{Deserialize, Serialize};

// ============================================================================
// Position & Movement
// ============================================================================

/// Position on a tile grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Manhattan distance to another position
    pub fn distance(&self, other: &Position) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Position one step away in the given direction
    pub fn step(&self, direction: Direction) -> Position {
        let (dx, dy) = direction.delta();
        Position::new(self.x + dx, self.y + dy)
    }

    /// The four orthogonal neighbours
    pub fn neighbours(&self) -> [Position; 4] {
        Direction::ALL.map(|d| self.step(d))
    }
}

/// Orthogonal movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    pub const ALL: [Direction; 4] = [Direction::Up, Direction::Down, Direction::Left, Direction::Right];

    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }
}

// ============================================================================
// Vitals
// ============================================================================

/// A clamped resource pool (hp or mp).
///
/// `current` always stays within `[0, max]`; every mutation clamps rather
/// than rejecting out-of-range arithmetic.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub current: i32,
    pub max: i32,
}

impl Pool {
    pub fn new(max: i32) -> Self {
        let max = max.max(0);
        Self { current: max, max }
    }

    /// Subtract up to `amount`, returning the amount actually removed
    pub fn take_damage(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.current);
        self.current -= actual;
        actual
    }

    /// Add up to `amount`, returning the amount actually restored
    pub fn heal(&mut self, amount: i32) -> i32 {
        let actual = amount.max(0).min(self.max - self.current);
        self.current += actual;
        actual
    }

    /// Spend `amount` if available
    pub fn spend(&mut self, amount: i32) -> bool {
        if self.current >= amount {
            self.current -= amount;
            true
        } else {
            false
        }
    }

    pub fn restore_full(&mut self) {
        self.current = self.max;
    }

    /// Raise the maximum (and current by the same amount, clamped)
    pub fn grow(&mut self, amount: i32) {
        self.max = (self.max + amount).max(0);
        self.current = (self.current + amount).clamp(0, self.max);
    }

    /// Re-establish `0 <= current <= max` after external edits
    pub fn clamp(&mut self) {
        self.max = self.max.max(0);
        self.current = self.current.clamp(0, self.max);
    }

    pub fn is_depleted(&self) -> bool {
        self.current <= 0
    }

    pub fn is_full(&self) -> bool {
        self.current >= self.max
    }
}

// ============================================================================
// Town population
// ============================================================================

/// A wandering townsperson
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Townsfolk {
    /// Index into the townsfolk name table
    pub name_index: usize,
    /// Index into the dialogue table
    pub dialogue_index: usize,
}

/// One-time reward carried by exactly one townsperson per visit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingReward(pub RewardKind);

/// What a townsperson's gift contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewardKind {
    Gold(u32),
    Potion,
    MaxHp(i32),
}

/// Marks an entity that blocks movement
#[derive(Debug, Clone, Copy, Default)]
pub struct BlocksMovement;
