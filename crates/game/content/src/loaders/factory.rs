//! Content factory for building scenarios from a data directory.

use std::path::{Path, PathBuf};

use skirmish_core::RulesConfig;

use crate::loaders::{
    CharacterDef, CharacterLoader, ItemDef, ItemLoader, LoadResult, RulesLoader, Scenario,
    ScenarioLoader,
};

/// Content factory that loads all skirmish content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── rules.toml
/// ├── characters.ron
/// ├── items.ron
/// ├── scenarios/
/// │   └── duel.ron
/// └── scripts/
///     └── knight.lua
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Data directory shipped with this crate.
    pub fn bundled() -> Self {
        Self::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("data"))
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    /// Load rules from `rules.toml`; a missing file means default rules.
    pub fn load_rules(&self) -> LoadResult<RulesConfig> {
        let path = self.data_dir.join("rules.toml");
        if !path.exists() {
            return Ok(RulesConfig::default());
        }
        RulesLoader::load(&path)
    }

    /// Load character catalog from `characters.ron`.
    pub fn load_characters(&self) -> LoadResult<Vec<CharacterDef>> {
        CharacterLoader::load(&self.data_dir.join("characters.ron"))
    }

    /// Load item catalog from `items.ron`.
    pub fn load_items(&self) -> LoadResult<Vec<ItemDef>> {
        ItemLoader::load(&self.data_dir.join("items.ron"))
    }

    /// Load and resolve `scenarios/<name>.ron`.
    pub fn load_scenario(&self, name: &str) -> LoadResult<Scenario> {
        let path = self.data_dir.join("scenarios").join(format!("{name}.ron"));
        let def = ScenarioLoader::load(&path)?;
        let characters = self.load_characters()?;
        let items = self.load_items()?;
        ScenarioLoader::resolve(def, &characters, &items, &self.data_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::ObjectType;

    #[test]
    fn bundled_content_loads() {
        let factory = ContentFactory::bundled();
        assert_eq!(factory.load_rules().unwrap(), RulesConfig::default());

        let duel = factory.load_scenario("duel").unwrap();
        assert_eq!(duel.characters.len(), 2);
        assert_eq!(duel.characters[0].template.kind, ObjectType::Player);
        assert!(duel.characters.iter().all(|spawn| spawn.script.is_some()));
        assert_eq!(duel.items.len(), 2);

        let training = factory.load_scenario("training").unwrap();
        assert!(training.characters[1].script.is_none());
    }

    #[test]
    fn missing_rules_file_means_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());
        assert_eq!(factory.load_rules().unwrap(), RulesConfig::default());
        assert!(factory.load_scenario("nowhere").is_err());
    }
}
