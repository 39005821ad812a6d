//! Scenario loader.
//!
//! A scenario places catalog templates into an arena:
//!
//! ```ron
//! (
//!     arena: (width: 400, height: 300, walls: []),
//!     characters: [(template: "knight", at: (x: 40, y: 140))],
//!     items: [(template: "potion", at: (x: 100, y: 100))],
//! )
//! ```
//!
//! Template ids are resolved against the character and item catalogs, and
//! script paths against the catalog directory, so a loaded [`Scenario`] is
//! fully self-contained.

use std::collections::HashMap;
use std::path::Path;

use serde::Deserialize;
use skirmish_core::{CharacterTemplate, Item, MapDimensions, Position, Rect};

use crate::loaders::{CharacterDef, ItemDef, LoadResult, read_file};
use crate::script::ScriptSource;

/// Arena bounds and solid walls.
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
pub struct ArenaSpec {
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub walls: Vec<Rect>,
}

impl ArenaSpec {
    pub fn dimensions(&self) -> MapDimensions {
        MapDimensions::new(self.width, self.height)
    }
}

/// Placement of a catalog template.
#[derive(Clone, Debug, Deserialize)]
pub struct Placement {
    pub template: String,
    pub at: Position,
    /// Overrides the template's display name.
    #[serde(default)]
    pub name: Option<String>,
}

/// Scenario file as written.
#[derive(Clone, Debug, Deserialize)]
pub struct ScenarioDef {
    pub arena: ArenaSpec,
    #[serde(default)]
    pub characters: Vec<Placement>,
    #[serde(default)]
    pub items: Vec<Placement>,
}

/// Character ready to spawn.
#[derive(Clone, Debug)]
pub struct CharacterSpawn {
    pub template: CharacterTemplate,
    pub position: Position,
    pub script: Option<ScriptSource>,
}

/// Scenario with every reference resolved.
#[derive(Clone, Debug)]
pub struct Scenario {
    pub arena: ArenaSpec,
    pub characters: Vec<CharacterSpawn>,
    pub items: Vec<Item>,
}

/// Loader for scenarios from RON files.
pub struct ScenarioLoader;

impl ScenarioLoader {
    pub fn load(path: &Path) -> LoadResult<ScenarioDef> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<ScenarioDef> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse scenario RON: {}", e))
    }

    /// Resolves template ids and loads scripts from `script_dir`.
    pub fn resolve(
        def: ScenarioDef,
        characters: &[CharacterDef],
        items: &[ItemDef],
        script_dir: &Path,
    ) -> LoadResult<Scenario> {
        let character_index: HashMap<&str, &CharacterDef> = characters
            .iter()
            .map(|character| (character.id.as_str(), character))
            .collect();
        let item_index: HashMap<&str, &ItemDef> =
            items.iter().map(|item| (item.id.as_str(), item)).collect();

        let mut spawns = Vec::with_capacity(def.characters.len());
        for placement in &def.characters {
            let character = character_index
                .get(placement.template.as_str())
                .ok_or_else(|| {
                    anyhow::anyhow!("Unknown character template '{}'", placement.template)
                })?;
            let mut template = character.to_template();
            if let Some(name) = &placement.name {
                template.name = name.clone();
            }
            let script = character.load_script(script_dir).map_err(|e| {
                anyhow::anyhow!("Failed to load script for '{}': {}", character.id, e)
            })?;
            spawns.push(CharacterSpawn {
                template,
                position: placement.at,
                script,
            });
        }

        let mut placed = Vec::with_capacity(def.items.len());
        for placement in &def.items {
            let item = item_index
                .get(placement.template.as_str())
                .ok_or_else(|| anyhow::anyhow!("Unknown item template '{}'", placement.template))?;
            let mut instance = item.instantiate(placement.at);
            if let Some(name) = &placement.name {
                instance.record.name = name.clone();
            }
            placed.push(instance);
        }

        Ok(Scenario {
            arena: def.arena,
            characters: spawns,
            items: placed,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::loaders::{CharacterLoader, ItemLoader};

    #[test]
    fn resolves_templates_and_overrides_names() {
        let characters = CharacterLoader::parse(
            r#"[(id: "grunt", name: "Grunt", kind: Npc)]"#,
        )
        .unwrap();
        let items =
            ItemLoader::parse(r#"[(id: "potion", name: "Potion", effect: Heal(10))]"#).unwrap();
        let def = ScenarioLoader::parse(
            r#"(
                arena: (width: 100, height: 100, walls: [(min: (x: 40, y: 0), max: (x: 60, y: 50))]),
                characters: [
                    (template: "grunt", at: (x: 5, y: 5)),
                    (template: "grunt", at: (x: 70, y: 5), name: Some("Grunt B")),
                ],
                items: [(template: "potion", at: (x: 20, y: 20))],
            )"#,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let scenario = ScenarioLoader::resolve(def, &characters, &items, dir.path()).unwrap();
        assert_eq!(scenario.arena.walls.len(), 1);
        assert_eq!(scenario.characters.len(), 2);
        assert_eq!(scenario.characters[1].template.name, "Grunt B");
        assert_eq!(scenario.characters[0].position, Position::new(5, 5));
        assert!(scenario.characters[0].script.is_none());
        assert_eq!(scenario.items[0].record.position, Position::new(20, 20));
    }

    #[test]
    fn unknown_template_is_an_error() {
        let def = ScenarioLoader::parse(
            r#"(arena: (width: 10, height: 10), characters: [(template: "ghost", at: (x: 0, y: 0))])"#,
        )
        .unwrap();
        let dir = tempfile::tempdir().unwrap();
        let err = ScenarioLoader::resolve(def, &[], &[], dir.path()).unwrap_err();
        assert!(err.to_string().contains("ghost"));
    }
}
