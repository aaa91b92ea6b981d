//! The player character

use serde::{Deserialize, Serialize};

use crate::ecs::Pool;
use crate::progression::gain_experience;

/// Starting max hp
pub const START_HP: i32 = 250;
/// Starting max mp
pub const START_MP: i32 = 50;
/// Display width budget for the hero's name
pub const NAME_WIDTH: usize = 10;
/// Name used when the player submits a blank one
pub const DEFAULT_NAME: &str = "Anne";

/// The single player entity, owned by the session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub name: String,
    /// Reincarnation rank
    #[serde(default)]
    pub prestige: u32,
    pub hp: Pool,
    pub mp: Pool,
    pub level: u32,
    /// Progress toward the next level
    pub exp: u32,
    pub gold: u32,
    pub potions: u32,
    pub equipment_atk: u32,
    pub equipment_def: u32,
}

impl Player {
    pub fn new(name: &str) -> Self {
        Self {
            name: bounded_name(name),
            prestige: 0,
            hp: Pool::new(START_HP),
            mp: Pool::new(START_MP),
            level: 1,
            exp: 0,
            gold: 0,
            potions: 0,
            equipment_atk: 0,
            equipment_def: 0,
        }
    }

    /// Pay `cost` gold if affordable
    pub fn spend_gold(&mut self, cost: u32) -> bool {
        if self.gold >= cost {
            self.gold -= cost;
            true
        } else {
            false
        }
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold = self.gold.saturating_add(amount);
    }

    /// Consume one potion if any are left
    pub fn take_potion(&mut self) -> bool {
        if self.potions > 0 {
            self.potions -= 1;
            true
        } else {
            false
        }
    }

    pub fn restore_full(&mut self) {
        self.hp.restore_full();
        self.mp.restore_full();
    }

    /// Re-establish vital invariants after deserialization
    pub fn sanitize(&mut self) {
        self.hp.clamp();
        self.mp.clamp();
        self.level = self.level.max(1);
        // Experience past the threshold is carried through the level-up loop
        let gained = gain_experience(self, 0);
        if gained > 0 {
            log::warn!("Loaded hero was {} level(s) behind their experience", gained);
        }
        if self.hp.is_depleted() {
            self.hp.restore_full();
        }
        self.name = bounded_name(&self.name);
    }
}

impl Default for Player {
    fn default() -> Self {
        Self::new(DEFAULT_NAME)
    }
}

/// Columns a character occupies: anything past Latin-1 counts double
fn char_width(c: char) -> usize {
    if u32::from(c) > 0xFF {
        2
    } else {
        1
    }
}

/// Display width of a name
pub fn name_width(name: &str) -> usize {
    name.chars().map(char_width).sum()
}

/// Trim and truncate a submitted name to the width budget.
/// Blank input becomes the default name.
pub fn bounded_name(input: &str) -> String {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return DEFAULT_NAME.to_string();
    }
    let mut width = 0;
    let mut out = String::new();
    for c in trimmed.chars() {
        let w = char_width(c);
        if width + w > NAME_WIDTH {
            break;
        }
        width += w;
        out.push(c);
    }
    out
}
