//! Lua-scripted enemy provider
//!
//! The script must define a global `generate(level, language)` returning a
//! table with `name`, `hp`, `mp`, `attack`, `defense`, `description` and an
//! optional `art` string. `language` is `"EN"` or `"ZH"`.

use std::fs;
use std::path::Path;

use mlua::{Function, Lua, Table};

use super::loader::Language;
use super::provider::{EnemyContent, EnemyProvider, ProviderError};

/// Enemy provider backed by a Lua script
pub struct LuaProvider {
    lua: Lua,
    script: String,
}

impl LuaProvider {
    /// Load a script from disk
    pub fn from_file(path: &Path) -> Result<Self, ProviderError> {
        let source = fs::read_to_string(path)?;
        Self::from_source(&path.display().to_string(), &source)
    }

    /// Load a script from memory
    pub fn from_source(script: &str, source: &str) -> Result<Self, ProviderError> {
        let lua = Lua::new();
        lua.load(source).set_name(script).exec()?;
        // Fail early when the entry point is missing
        let _: Function = lua.globals().get("generate")?;
        log::info!("Loaded enemy script {}", script);
        Ok(Self { lua, script: script.to_string() })
    }
}

impl EnemyProvider for LuaProvider {
    fn name(&self) -> &str {
        &self.script
    }

    fn generate(&mut self, level: u32, language: Language) -> Result<EnemyContent, ProviderError> {
        let generate: Function = self.lua.globals().get("generate")?;
        let t: Table = generate.call((level, language.code()))?;
        let content = EnemyContent {
            name: t.get("name")?,
            hp: t.get("hp")?,
            mp: t.get::<Option<i32>>("mp")?.unwrap_or(0),
            attack: t.get("attack")?,
            defense: t.get::<Option<i32>>("defense")?.unwrap_or(0),
            description: t.get::<Option<String>>("description")?.unwrap_or_default(),
            art_ref: t.get("art")?,
        };
        content.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SCRIPT: &str = r#"
        function generate(level, language)
            local name = "Count Turkula"
            if language == "ZH" then name = "火雞伯爵" end
            return {
                name = name,
                hp = 30 + level * 12,
                mp = 5,
                attack = 4 + level * 3,
                defense = level,
                description = "It drinks gravy.",
                art = "turkula.png",
            }
        end
    "#;

    #[test]
    fn test_generate_from_script() {
        let mut provider = LuaProvider::from_source("test", SCRIPT).unwrap();
        let content = provider.generate(2, Language::En).unwrap();
        assert_eq!(content.name, "Count Turkula");
        assert_eq!(content.hp, 54);
        assert_eq!(content.attack, 10);
        assert_eq!(content.art_ref.as_deref(), Some("turkula.png"));
        assert_eq!(provider.generate(1, Language::Zh).unwrap().name, "火雞伯爵");
    }

    #[test]
    fn test_missing_entry_point() {
        assert!(LuaProvider::from_source("empty", "x = 1").is_err());
    }

    #[test]
    fn test_runtime_error_surfaces() {
        let mut provider = LuaProvider::from_source("bad", "function generate() error('boom') end").unwrap();
        assert!(matches!(provider.generate(1, Language::En), Err(ProviderError::Lua(_))));
    }

    #[test]
    fn test_invalid_table_rejected() {
        let src = "function generate() return { name = '', hp = 10, attack = 1 } end";
        let mut provider = LuaProvider::from_source("blank", src).unwrap();
        assert!(matches!(provider.generate(1, Language::En), Err(ProviderError::InvalidContent(_))));
    }

    #[test]
    fn test_shipped_script_loads() {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join("assets/scripts/enemies.lua");
        let mut provider = LuaProvider::from_file(&path).unwrap();
        for level in [1, 8, 25] {
            let content = provider.generate(level, Language::En).unwrap();
            assert!(content.hp > 0);
        }
    }
}
