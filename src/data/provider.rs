//! Enemy content providers
//!
//! A provider turns a target level into enemy flavour: name, stats,
//! description and an art reference. Providers may fail; callers always
//! fall back to `FallbackProvider`, which cannot.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::loader::Language;

/// Provider failures. None of these ever reach the player.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("failed to read script: {0}")]
    Io(#[from] std::io::Error),

    #[error("script error: {0}")]
    Lua(#[from] mlua::Error),

    #[error("invalid enemy content: {0}")]
    InvalidContent(String),

    #[error("generation timed out")]
    Timeout,

    #[error("generation worker disconnected")]
    Disconnected,
}

/// Largest hp, mp, attack or defense a provider may hand out
pub const MAX_ENEMY_STAT: i32 = 99_999;

/// Raw enemy flavour as supplied by a provider
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnemyContent {
    pub name: String,
    pub hp: i32,
    pub mp: i32,
    pub attack: i32,
    pub defense: i32,
    pub description: String,
    #[serde(default)]
    pub art_ref: Option<String>,
}

impl EnemyContent {
    /// Reject content no battle can use
    pub fn validate(self) -> Result<Self, ProviderError> {
        if self.name.trim().is_empty() {
            return Err(ProviderError::InvalidContent("empty name".to_string()));
        }
        if !(1..=MAX_ENEMY_STAT).contains(&self.hp) {
            return Err(ProviderError::InvalidContent(format!("hp {}", self.hp)));
        }
        for (stat, value) in [("mp", self.mp), ("attack", self.attack), ("defense", self.defense)] {
            if !(0..=MAX_ENEMY_STAT).contains(&value) {
                return Err(ProviderError::InvalidContent(format!("{} {}", stat, value)));
            }
        }
        Ok(self)
    }
}

/// Pluggable source of enemy flavour
pub trait EnemyProvider: Send {
    fn name(&self) -> &str;
    fn generate(&mut self, level: u32, language: Language) -> Result<EnemyContent, ProviderError>;
}

/// Deterministic enemy derived from the level alone
pub fn fallback_enemy(level: u32, language: Language) -> EnemyContent {
    let l = level as i32;
    let (name, description) = match language {
        Language::En => (
            "Angry Turkey",
            "A giant turkey fueled by rage and vengeance against Thanksgiving.",
        ),
        Language::Zh => ("憤怒火雞", "一隻被激怒的巨型火雞，眼神中燃燒著對感恩節的復仇之火。"),
    };
    EnemyContent {
        name: name.to_string(),
        hp: 20 + l * 10,
        mp: 10 + l * 5,
        attack: 5 + l * 2,
        defense: 2 + l,
        description: description.to_string(),
        art_ref: None,
    }
}

/// Provider that always returns the fallback enemy
#[derive(Debug, Clone, Copy, Default)]
pub struct FallbackProvider;

impl EnemyProvider for FallbackProvider {
    fn name(&self) -> &str {
        "fallback"
    }

    fn generate(&mut self, level: u32, language: Language) -> Result<EnemyContent, ProviderError> {
        Ok(fallback_enemy(level, language))
    }
}

/// Ask `provider`, substituting the fallback enemy on any failure
pub fn generate_or_fallback(provider: &mut dyn EnemyProvider, level: u32, language: Language) -> EnemyContent {
    match provider.generate(level, language).and_then(EnemyContent::validate) {
        Ok(content) => content,
        Err(e) => {
            log::warn!("Provider '{}' failed ({}), using fallback enemy", provider.name(), e);
            fallback_enemy(level, language)
        }
    }
}
