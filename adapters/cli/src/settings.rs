//! Engine configuration assembled from a TOML file and command-line flags.

use std::{fs, path::Path};

use anyhow::{Context, Result};
use maze_chase_engine::EngineConfig;
use maze_chase_system_pursuit::StrategyKind;

/// Flag values that take precedence over the configuration file.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Overrides {
    pub(crate) strategy: Option<StrategyKind>,
    pub(crate) seed: Option<u64>,
    pub(crate) tick_interval_ms: Option<u64>,
}

/// Reads the configuration file when given, then applies the overrides.
pub(crate) fn load(path: Option<&Path>, overrides: Overrides) -> Result<EngineConfig> {
    let mut config = match path {
        Some(path) => {
            let contents = fs::read_to_string(path)
                .with_context(|| format!("failed to read config file {}", path.display()))?;
            parse(&contents)
                .with_context(|| format!("invalid config file {}", path.display()))?
        }
        None => EngineConfig::default(),
    };

    if let Some(strategy) = overrides.strategy {
        config.strategy = strategy;
    }
    if let Some(seed) = overrides.seed {
        config.rng_seed = seed;
    }
    if let Some(tick_interval_ms) = overrides.tick_interval_ms {
        config.tick_interval_ms = tick_interval_ms;
    }
    Ok(config)
}

fn parse(contents: &str) -> Result<EngineConfig> {
    toml::from_str(contents).context("failed to parse engine config toml contents")
}
