//! Character catalog loader.
//!
//! A catalog is a RON list of [`CharacterDef`]s. A definition either names a
//! Lua script (scripted character) or leaves `script` empty (data-driven
//! character driven by a controller or by the coordinator).

use std::path::{Path, PathBuf};

use serde::Deserialize;
use skirmish_core::{BaseStats, CharacterTemplate, HitBox, ObjectType, Parameter, ParameterLevels};

use crate::loaders::{LoadResult, read_file};
use crate::script::ScriptSource;

/// One character template as written in a catalog.
#[derive(Clone, Debug, Deserialize)]
pub struct CharacterDef {
    pub id: String,
    pub name: String,
    pub kind: ObjectType,
    #[serde(default)]
    pub hitbox: HitBox,
    #[serde(default)]
    pub stats: BaseStats,
    /// Sprint stamina cost; twice the move cost when omitted.
    #[serde(default)]
    pub sprint_stamina_cost: Option<u32>,
    #[serde(default)]
    pub parameters: Vec<(Parameter, u32)>,
    #[serde(default = "CharacterDef::default_level")]
    pub level: u32,
    #[serde(default)]
    pub skill_points: u32,
    /// Script path relative to the catalog file.
    #[serde(default)]
    pub script: Option<PathBuf>,
}

impl CharacterDef {
    fn default_level() -> u32 {
        1
    }

    pub fn to_template(&self) -> CharacterTemplate {
        let mut stats = self.stats;
        stats.sprint_stamina_cost = self
            .sprint_stamina_cost
            .unwrap_or_else(|| stats.move_stamina_cost.saturating_mul(2));

        CharacterTemplate {
            name: self.name.clone(),
            kind: self.kind,
            hitbox: self.hitbox,
            stats,
            parameters: ParameterLevels::from_pairs(self.parameters.iter().copied()),
            level: self.level.max(1),
            skill_points: self.skill_points,
        }
    }

    /// Reads the script this definition points at, if any.
    pub fn load_script(&self, base_dir: &Path) -> LoadResult<Option<ScriptSource>> {
        let Some(relative) = &self.script else {
            return Ok(None);
        };
        let path = base_dir.join(relative);
        let text = read_file(&path)?;
        Ok(Some(ScriptSource::new(relative.display().to_string(), text)))
    }
}

/// Loader for character catalogs from RON files.
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<CharacterDef>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<CharacterDef>> {
        let defs: Vec<CharacterDef> = ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character catalog RON: {}", e))?;

        for def in &defs {
            if !def.kind.is_character() {
                anyhow::bail!("Character '{}' has non-character kind {}", def.id, def.kind);
            }
        }
        Ok(defs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CATALOG: &str = r#"[
        (
            id: "brute",
            name: "Brute",
            kind: Npc,
            stats: (max_hit_points: 150, move_stamina_cost: 3),
            parameters: [(HitPoints, 2), (AttackDamage, 1)],
        ),
        (
            id: "hero",
            name: "Hero",
            kind: Player,
            sprint_stamina_cost: Some(5),
            level: 3,
            script: Some("scripts/hero.lua"),
        ),
    ]"#;

    #[test]
    fn parses_templates_with_defaults() {
        let defs = CharacterLoader::parse(CATALOG).unwrap();
        assert_eq!(defs.len(), 2);

        let brute = defs[0].to_template();
        assert_eq!(brute.stats.max_hit_points, 150);
        assert_eq!(brute.stats.max_stamina, BaseStats::default().max_stamina);
        assert_eq!(brute.stats.sprint_stamina_cost, 6);
        assert_eq!(brute.parameters.get(Parameter::HitPoints), 2);
        assert_eq!(brute.level, 1);
        assert!(defs[0].script.is_none());

        let hero = defs[1].to_template();
        assert_eq!(hero.stats.sprint_stamina_cost, 5);
        assert_eq!(hero.level, 3);
    }

    #[test]
    fn rejects_item_kinds() {
        let catalog = r#"[(id: "odd", name: "Odd", kind: HealingItem)]"#;
        assert!(CharacterLoader::parse(catalog).is_err());
    }

    #[test]
    fn reads_script_relative_to_catalog() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir(dir.path().join("scripts")).unwrap();
        std::fs::write(
            dir.path().join("scripts/hero.lua"),
            "function decide(tick) end",
        )
        .unwrap();

        let defs = CharacterLoader::parse(CATALOG).unwrap();
        let source = defs[1].load_script(dir.path()).unwrap().unwrap();
        assert_eq!(source.name(), "scripts/hero.lua");
        assert!(source.text().contains("decide"));
        assert!(defs[0].load_script(dir.path()).unwrap().is_none());
    }
}
