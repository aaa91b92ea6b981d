//! External content and configuration
//!
//! Enemy content providers (built-in fallback and Lua scripts), the
//! background generation worker, and the RON configuration file.

pub mod loader;
pub mod provider;
pub mod lua;
pub mod worker;

pub use loader::{config_directory, data_directory, ConfigError, GameConfig, Language, ProviderKind};
pub use provider::{fallback_enemy, generate_or_fallback, EnemyContent, EnemyProvider, FallbackProvider, ProviderError};
pub use lua::LuaProvider;
pub use worker::{GenerationRequest, GenerationResponse, Generator, InlineGenerator, ThreadedGenerator};
