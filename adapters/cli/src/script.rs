//! Scripted player input for unattended runs.

use anyhow::{bail, Result};
use maze_chase_core::Direction;

/// Player intents replayed in a loop, one entry per tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct IntentScript {
    steps: Vec<Option<Direction>>,
}

impl IntentScript {
    /// Parses `U`, `D`, `L` and `R` (any case) as intents and `-` as a tick
    /// without input.
    pub(crate) fn parse(text: &str) -> Result<Self> {
        let mut steps = Vec::with_capacity(text.len());
        for (position, marker) in text.chars().enumerate() {
            let step = match marker.to_ascii_uppercase() {
                'U' => Some(Direction::Up),
                'D' => Some(Direction::Down),
                'L' => Some(Direction::Left),
                'R' => Some(Direction::Right),
                '-' => None,
                _ => bail!("invalid character `{marker}` in intent script at position {position}"),
            };
            steps.push(step);
        }
        Ok(Self { steps })
    }

    /// Intent for the given tick, cycling through the script.
    pub(crate) fn at(&self, tick: u64) -> Option<Direction> {
        if self.steps.is_empty() {
            return None;
        }
        let len = self.steps.len() as u64;
        let index = usize::try_from(tick % len).ok()?;
        self.steps.get(index).copied().flatten()
    }
}
