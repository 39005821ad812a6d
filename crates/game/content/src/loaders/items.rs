//! Item catalog loader.

use std::path::Path;

use serde::Deserialize;
use skirmish_core::{Item, ItemEffect, Position};

use crate::loaders::{LoadResult, read_file};

/// One item template as written in a catalog.
#[derive(Clone, Debug, Deserialize)]
pub struct ItemDef {
    pub id: String,
    pub name: String,
    pub effect: ItemEffect,
    #[serde(default = "ItemDef::default_charges")]
    pub charges: u32,
    #[serde(default = "ItemDef::default_size")]
    pub size: u32,
    #[serde(default)]
    pub use_cooldown: u64,
    #[serde(default)]
    pub stamina_cost: u32,
}

impl ItemDef {
    fn default_charges() -> u32 {
        1
    }

    fn default_size() -> u32 {
        1
    }

    /// Instantiates the item at `position` with every charge available.
    pub fn instantiate(&self, position: Position) -> Item {
        Item::new(self.name.clone(), position, self.effect, self.charges)
            .with_size(self.size)
            .with_use_cooldown(self.use_cooldown)
            .with_stamina_cost(self.stamina_cost)
    }
}

/// Loader for item catalogs from RON files.
pub struct ItemLoader;

impl ItemLoader {
    pub fn load(path: &Path) -> LoadResult<Vec<ItemDef>> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<Vec<ItemDef>> {
        ron::from_str(content).map_err(|e| anyhow::anyhow!("Failed to parse item catalog RON: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::ObjectType;

    #[test]
    fn parses_items_and_instantiates_fresh_charges() {
        let defs = ItemLoader::parse(
            r#"[
                (id: "potion", name: "Potion", effect: Heal(40), charges: 2, use_cooldown: 5),
                (id: "tome", name: "Tome", effect: Exp(120), size: 3, stamina_cost: 4),
            ]"#,
        )
        .unwrap();

        let potion = defs[0].instantiate(Position::new(3, 4));
        assert_eq!(potion.record.kind, ObjectType::HealingItem);
        assert_eq!(potion.charges_left(), 2);
        assert_eq!(potion.use_cooldown, 5);
        assert_eq!(potion.size, 1);

        let tome = defs[1].instantiate(Position::ORIGIN);
        assert_eq!(tome.record.kind, ObjectType::ExpItem);
        assert_eq!(tome.size, 3);
        assert_eq!(tome.stamina_cost, 4);
        assert_eq!(tome.max_charges, 1);
    }
}
