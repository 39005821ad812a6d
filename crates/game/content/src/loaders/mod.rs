//! Content loaders for reading skirmish data from files.
//!
//! Every loader reads one RON or TOML file into core types; the
//! [`ContentFactory`] ties them together for a data directory.

pub mod characters;
pub mod factory;
pub mod items;
pub mod rules;
pub mod scenario;

pub use characters::{CharacterDef, CharacterLoader};
pub use factory::ContentFactory;
pub use items::{ItemDef, ItemLoader};
pub use rules::RulesLoader;
pub use scenario::{ArenaSpec, CharacterSpawn, Placement, Scenario, ScenarioDef, ScenarioLoader};

use std::path::Path;

/// Common result type for loaders.
pub type LoadResult<T> = anyhow::Result<T>;

/// Helper function to read file contents.
pub(crate) fn read_file(path: &Path) -> LoadResult<String> {
    std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("Failed to read file {}: {}", path.display(), e))
}
