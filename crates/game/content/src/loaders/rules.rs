//! Rules table loader.

use std::path::Path;

use skirmish_core::RulesConfig;

use crate::loaders::{LoadResult, read_file};

/// Loader for [`RulesConfig`] from TOML files.
///
/// Every key is optional; missing keys keep their defaults.
pub struct RulesLoader;

impl RulesLoader {
    pub fn load(path: &Path) -> LoadResult<RulesConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<RulesConfig> {
        toml::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse rules TOML: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_tables_keep_defaults() {
        let rules = RulesLoader::parse(
            r#"
            block_mitigation_percent = 50

            [strong_attack]
            damage_percent = 300
            "#,
        )
        .unwrap();
        assert_eq!(rules.block_mitigation_percent, 50);
        assert_eq!(rules.strong_attack.damage_percent, 300);
        assert_eq!(rules.strong_attack.cooldown_percent, 150);
        assert_eq!(rules.inventory_capacity, RulesConfig::DEFAULT_INVENTORY_CAPACITY);
    }

    #[test]
    fn empty_document_is_default_rules() {
        assert_eq!(RulesLoader::parse("").unwrap(), RulesConfig::default());
    }

    #[test]
    fn malformed_toml_is_an_error() {
        assert!(RulesLoader::parse("block_mitigation_percent = \"lots\"").is_err());
    }
}
