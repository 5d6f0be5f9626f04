//! Session configuration.
//!
//! A [`GameConfig`] can only be built from in-range values, so a grid with
//! unsupported dimensions never reaches the simulation.

use std::time::Duration;

use crate::types::{
    DEFAULT_GRID_HEIGHT, DEFAULT_GRID_WIDTH, DEFAULT_TICK_MS, GRID_HEIGHT_MAX, GRID_HEIGHT_MIN,
    GRID_WIDTH_MAX, GRID_WIDTH_MIN, TICK_MS_MAX, TICK_MS_MIN,
};

/// Rejected configuration value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("grid width {value} is outside the supported range {min}..={max}")]
    Width { value: usize, min: usize, max: usize },
    #[error("grid height {value} is outside the supported range {min}..={max}")]
    Height { value: usize, min: usize, max: usize },
    #[error("tick interval {value}ms is outside the supported range {min}..={max}ms")]
    TickMs { value: u32, min: u32, max: u32 },
}

/// Validated settings, read once when a session starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameConfig {
    width: usize,
    height: usize,
    tick_ms: u32,
    seed: u32,
}

impl GameConfig {
    pub fn new(width: usize, height: usize, tick_ms: u32) -> Result<Self, ConfigError> {
        if !(GRID_WIDTH_MIN..=GRID_WIDTH_MAX).contains(&width) {
            return Err(ConfigError::Width {
                value: width,
                min: GRID_WIDTH_MIN,
                max: GRID_WIDTH_MAX,
            });
        }
        if !(GRID_HEIGHT_MIN..=GRID_HEIGHT_MAX).contains(&height) {
            return Err(ConfigError::Height {
                value: height,
                min: GRID_HEIGHT_MIN,
                max: GRID_HEIGHT_MAX,
            });
        }
        if !(TICK_MS_MIN..=TICK_MS_MAX).contains(&tick_ms) {
            return Err(ConfigError::TickMs {
                value: tick_ms,
                min: TICK_MS_MIN,
                max: TICK_MS_MAX,
            });
        }
        Ok(Self {
            width,
            height,
            tick_ms,
            seed: 1,
        })
    }

    /// Same settings with a different RNG seed.
    pub fn with_seed(mut self, seed: u32) -> Self {
        self.seed = seed;
        self
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tick_ms(&self) -> u32 {
        self.tick_ms
    }

    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_ms as u64)
    }

    pub fn seed(&self) -> u32 {
        self.seed
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_GRID_WIDTH,
            height: DEFAULT_GRID_HEIGHT,
            tick_ms: DEFAULT_TICK_MS,
            seed: 1,
        }
    }
}
