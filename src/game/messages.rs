//! Message log
//!
//! A short rolling log of typed entries. The presentation layer decides how
//! to word them; `Display` gives the default English text.

use std::collections::VecDeque;
use std::fmt;

use crate::combat::Loot;
use crate::ecs::RewardKind;
use crate::world::{Region, ShopKind};

/// Entries kept in the rolling log
pub const LOG_CAPACITY: usize = 5;

/// Broad grouping, used for colouring
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageCategory {
    Combat,
    Reward,
    World,
    System,
    Warning,
}

/// Everything the engine can report
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogEntry {
    // Session
    Welcome { name: String },
    Saved { slot: u8 },
    AutoSaved,
    Loaded { slot: u8 },
    EmptySlot { slot: u8 },
    ReservedSlot,
    SaveFailed,
    Deleted { slot: u8 },

    // Combat
    Generating,
    EnemyAppears { name: String, level: u32 },
    PlayerHit { damage: i32, crit: bool },
    MagicHit { damage: i32 },
    Healed { amount: i32 },
    PotionUsed { amount: i32 },
    NoMp,
    NoPotion,
    FleeSucceeded,
    FleeFailed,
    NoEscape,
    EnemyHit { name: String, damage: i32 },
    Victory { exp: u32, gold: u32 },
    LevelUp { level: u32 },
    LootFound(Loot),
    FloorCleared { floor: u8 },
    RegionUnlocked(Region),
    Defeated,
    Recovered { exp_lost: u32 },
    Reincarnated { rank: u32 },

    // World
    EnterTown,
    LeaveTown,
    EnterDungeon,
    LeaveDungeon,
    Descend { floor: u8 },
    Ascend { floor: u8 },
    NothingHere,
    Travelled(Region),
    RegionLocked(Region),
    Regenerated,
    Stipend { gold: u32 },
    Studied,

    // Town
    ShopWelcome(ShopKind),
    Purchased(ShopKind),
    Rested,
    NotEnoughGold { cost: u32 },
    TownsfolkSays { name: String, line: String },
    Gift(RewardKind),
}

impl LogEntry {
    pub fn category(&self) -> MessageCategory {
        use LogEntry::*;
        match self {
            Welcome { .. } | Saved { .. } | AutoSaved | Loaded { .. } | Deleted { .. } | Generating => {
                MessageCategory::System
            }
            EmptySlot { .. } | ReservedSlot | SaveFailed | NoMp | NoPotion | NotEnoughGold { .. }
            | RegionLocked(_) | NoEscape | Defeated => MessageCategory::Warning,
            Victory { .. } | LevelUp { .. } | LootFound(_) | Gift(_) | Stipend { .. } | Studied
            | Reincarnated { .. } | RegionUnlocked(_) | FloorCleared { .. } => MessageCategory::Reward,
            EnemyAppears { .. } | PlayerHit { .. } | MagicHit { .. } | Healed { .. } | PotionUsed { .. }
            | FleeSucceeded | FleeFailed | EnemyHit { .. } | Recovered { .. } => MessageCategory::Combat,
            _ => MessageCategory::World,
        }
    }
}

impl fmt::Display for LogEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use LogEntry::*;
        match self {
            Welcome { name } => write!(f, "Welcome to Avonlea, {}.", name),
            Saved { slot } => write!(f, "Saved to slot {}.", slot),
            AutoSaved => write!(f, "Auto-saved."),
            Loaded { slot } => write!(f, "Loaded slot {}.", slot),
            EmptySlot { slot } => write!(f, "Slot {} is empty.", slot),
            ReservedSlot => write!(f, "Slot 5 is reserved for auto-saves."),
            SaveFailed => write!(f, "The save could not be written."),
            Deleted { slot } => write!(f, "Slot {} erased.", slot),

            Generating => write!(f, "Something stirs..."),
            EnemyAppears { name, level } => write!(f, "{} (Lv.{}) appears!", name, level),
            PlayerHit { damage, crit: true } => write!(f, "Critical hit! {} damage.", damage),
            PlayerHit { damage, crit: false } => write!(f, "You deal {} damage.", damage),
            MagicHit { damage } => write!(f, "Your spell deals {} damage.", damage),
            Healed { amount } => write!(f, "You recover {} HP.", amount),
            PotionUsed { amount } => write!(f, "You drink a potion and recover {} HP.", amount),
            NoMp => write!(f, "Not enough MP!"),
            NoPotion => write!(f, "You have no potions."),
            FleeSucceeded => write!(f, "You got away safely."),
            FleeFailed => write!(f, "You couldn't escape!"),
            NoEscape => write!(f, "There is no escaping this foe!"),
            EnemyHit { name, damage } => write!(f, "{} hits you for {} damage.", name, damage),
            Victory { exp, gold } => write!(f, "Victory! +{} EXP, +{} gold.", exp, gold),
            LevelUp { level } => write!(f, "Level up! You are now level {}.", level),
            LootFound(loot) => match loot {
                Loot::Grimoire { name, max_mp } => write!(f, "Found {}! Max MP +{}.", name, max_mp),
                Loot::Weapon { name, atk } => write!(f, "Found {}! ATK +{}.", name, atk),
                Loot::Armor { name, def } => write!(f, "Found {}! DEF +{}.", name, def),
                Loot::Potion => write!(f, "Found a potion."),
                Loot::Nothing => write!(f, "Nothing else of value."),
            },
            FloorCleared { floor } => write!(f, "Floor B{} has been cleared!", floor),
            RegionUnlocked(region) => write!(f, "The road to {} is open.", region.name()),
            Defeated => write!(f, "You have fallen..."),
            Recovered { exp_lost } => write!(f, "You wake up in town. Lost {} EXP.", exp_lost),
            Reincarnated { rank } => write!(f, "Reincarnated! Prestige rank {}.", rank),

            EnterTown => write!(f, "You enter the town."),
            LeaveTown => write!(f, "You head back out."),
            EnterDungeon => write!(f, "You descend into the dungeon."),
            LeaveDungeon => write!(f, "You climb back to the surface."),
            Descend { floor } => write!(f, "You go down to B{}.", floor),
            Ascend { floor } => write!(f, "You climb up to B{}.", floor),
            NothingHere => write!(f, "Nothing here."),
            Travelled(region) => write!(f, "You travel to {}.", region.name()),
            RegionLocked(region) => write!(f, "{} is not reachable yet.", region.name()),
            Regenerated => write!(f, "You feel rested. +1 HP, +1 MP."),
            Stipend { gold } => write!(f, "You earn {} gold helping at school.", gold),
            Studied => write!(f, "Your studies paid off: +1 potion."),

            ShopWelcome(kind) => write!(f, "Welcome to the {}.", kind.name()),
            Purchased(kind) => write!(f, "Thank you for visiting the {}!", kind.name()),
            Rested => write!(f, "You rest and recover fully."),
            NotEnoughGold { cost } => write!(f, "Not enough gold ({} needed).", cost),
            TownsfolkSays { name, line } => write!(f, "{}: \"{}\"", name, line),
            Gift(RewardKind::Gold(g)) => write!(f, "You received {} gold!", g),
            Gift(RewardKind::Potion) => write!(f, "You received a potion!"),
            Gift(RewardKind::MaxHp(hp)) => write!(f, "You feel sturdier. Max HP +{}.", hp),
        }
    }
}

/// Append-only ring holding the latest `LOG_CAPACITY` entries
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    entries: VecDeque<LogEntry>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self { entries: VecDeque::with_capacity(LOG_CAPACITY) }
    }

    pub fn push(&mut self, entry: LogEntry) {
        log::debug!("log: {}", entry);
        if self.entries.len() == LOG_CAPACITY {
            self.entries.pop_front();
        }
        self.entries.push_back(entry);
    }

    /// Oldest first
    pub fn entries(&self) -> impl Iterator<Item = &LogEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&LogEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ring_keeps_latest_five() {
        let mut log = MessageLog::new();
        for slot in 1..=7 {
            log.push(LogEntry::Saved { slot });
        }
        assert_eq!(log.len(), LOG_CAPACITY);
        let slots: Vec<u8> = log
            .entries()
            .map(|e| match e {
                LogEntry::Saved { slot } => *slot,
                _ => 0,
            })
            .collect();
        assert_eq!(slots, vec![3, 4, 5, 6, 7]);
    }

    #[test]
    fn test_display() {
        assert_eq!(LogEntry::NoMp.to_string(), "Not enough MP!");
        assert_eq!(
            LogEntry::Victory { exp: 20, gold: 15 }.to_string(),
            "Victory! +20 EXP, +15 gold."
        );
        assert_eq!(LogEntry::NoMp.category(), MessageCategory::Warning);
    }
}
