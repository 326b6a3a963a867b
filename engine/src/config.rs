//! Session tuning loaded from configuration files.

use std::time::Duration;

use maze_chase_system_pursuit::{self as pursuit, StrategyKind};
use maze_chase_world::Rules;
use serde::{Deserialize, Serialize};

use crate::intents::DEFAULT_INTENT_CAPACITY;

/// Tunables for one engine session. Missing fields fall back to defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Wall-clock period between ticks, in milliseconds. Zero is treated as one.
    pub tick_interval_ms: u64,
    /// Maximum number of pending player intents.
    pub intent_capacity: usize,
    /// Power-up duration after eating a pellet, in milliseconds.
    pub power_up_ms: u64,
    /// Score for catching a pursuer while powered up.
    pub capture_bonus: u32,
    /// Pursuer behaviour for the session.
    pub strategy: StrategyKind,
    /// Seed for the random walk.
    pub rng_seed: u64,
    /// Bound on memoised shortest-path routes.
    pub path_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: 150,
            intent_capacity: DEFAULT_INTENT_CAPACITY,
            power_up_ms: 5_000,
            capture_bonus: 200,
            strategy: StrategyKind::default(),
            rng_seed: 0,
            path_cache_capacity: pursuit::DEFAULT_ROUTE_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    /// Period between ticks, never shorter than one millisecond.
    #[must_use]
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Scoring and timing rules handed to the world.
    #[must_use]
    pub fn rules(&self) -> Rules {
        Rules {
            power_up_duration: Duration::from_millis(self.power_up_ms),
            capture_bonus: self.capture_bonus,
        }
    }

    /// Construction parameters for the pursuer strategy.
    #[must_use]
    pub fn pursuit(&self) -> pursuit::Config {
        pursuit::Config::new(self.strategy, self.rng_seed)
            .with_route_cache_capacity(self.path_cache_capacity)
    }
}
