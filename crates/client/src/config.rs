//! Client configuration structures and loaders.
use std::env;
use std::path::PathBuf;

use skirmish_runtime::RuntimeConfig;

/// Configuration required to load a scenario and drive the runtime.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// Content directory; the bundled data when unset.
    pub data_dir: Option<PathBuf>,
    pub scenario: String,
    /// Rules file overriding `<data_dir>/rules.toml`.
    pub rules: Option<PathBuf>,
    /// Ticks to simulate before shutting down.
    pub ticks: u64,
    pub runtime: RuntimeConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            scenario: String::from("duel"),
            rules: None,
            ticks: 300,
            runtime: RuntimeConfig::default(),
        }
    }
}

impl ClientConfig {
    /// Construct configuration from process environment variables.
    ///
    /// - `SKIRMISH_DATA_DIR`
    /// - `SKIRMISH_SCENARIO`
    /// - `SKIRMISH_RULES`
    /// - `SKIRMISH_TICKS`
    /// - `SKIRMISH_TICK_MS` and the other runtime settings, see
    ///   [`RuntimeConfig::from_env`]
    pub fn from_env() -> Self {
        let mut config = Self {
            runtime: RuntimeConfig::from_env(),
            ..Self::default()
        };

        if let Some(dir) = read_env::<PathBuf>("SKIRMISH_DATA_DIR") {
            config.data_dir = Some(dir);
        }
        if let Ok(scenario) = env::var("SKIRMISH_SCENARIO")
            && !scenario.trim().is_empty()
        {
            config.scenario = scenario.trim().to_owned();
        }
        if let Some(rules) = read_env::<PathBuf>("SKIRMISH_RULES") {
            config.rules = Some(rules);
        }
        if let Some(ticks) = read_env::<u64>("SKIRMISH_TICKS") {
            config.ticks = ticks;
        }

        config
    }
}

fn read_env<T>(key: &str) -> Option<T>
where
    T: std::str::FromStr,
{
    env::var(key).ok()?.parse().ok()
}
