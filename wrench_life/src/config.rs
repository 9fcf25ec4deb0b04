// config.rs - Every tunable of the simulation in one place

use std::time::Duration;

use rand::{Rng, SeedableRng, rngs::SmallRng};
use serde::{Deserialize, Serialize};

use crate::color::{Palette, Rgba};
use crate::error::ConfigError;
use crate::rule::ColorMode;

/// Inclusive size range. `min == max` gives a fixed size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizeRange {
    pub min: usize,
    pub max: usize,
}

impl SizeRange {
    pub const fn fixed(size: usize) -> Self {
        Self {
            min: size,
            max: size,
        }
    }

    #[inline]
    pub fn pick<R: Rng + ?Sized>(self, rng: &mut R) -> usize {
        if self.min >= self.max {
            self.min
        } else {
            rng.random_range(self.min..=self.max)
        }
    }

    fn validate(self, field: &'static str) -> Result<(), ConfigError> {
        if self.min == 0 || self.min > self.max {
            return Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Settings for the wrench overlay and the scheduler that rearms it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OverlayConfig {
    /// Columns the box advances per generation.
    pub step_size: usize,
    pub box_height: SizeRange,
    pub box_width: SizeRange,
    pub color: Rgba,
    /// Enables text mode: one full sweep per character.
    pub text: Option<String>,
    /// Milliseconds between scheduler firings.
    pub interval_ms: u64,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            step_size: 1,
            box_height: SizeRange::fixed(15),
            box_width: SizeRange::fixed(3),
            color: Rgba::opaque(250, 50, 0),
            text: None,
            interval_ms: 5_000,
        }
    }
}

impl OverlayConfig {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.step_size == 0 {
            return Err(ConfigError::ZeroStepSize);
        }
        if self.interval_ms == 0 {
            return Err(ConfigError::ZeroDisruptionInterval);
        }
        self.box_height.validate("overlay.box_height")?;
        self.box_width.validate("overlay.box_width")?;
        Ok(())
    }
}

/// Static configuration for a simulation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LifeConfig {
    pub width: usize,
    pub height: usize,
    pub initial_live_cells: usize,
    /// Minimum milliseconds between generations; 0 disables the gate.
    pub step_interval_ms: u64,
    pub color_mode: ColorMode,
    pub palette: Palette,
    /// Optional RNG seed for reproducible runs.
    pub seed: Option<u64>,
    pub overlay: OverlayConfig,
}

impl Default for LifeConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            initial_live_cells: 10_000,
            step_interval_ms: 30,
            color_mode: ColorMode::Fixed,
            palette: Palette::default(),
            seed: None,
            overlay: OverlayConfig::default(),
        }
    }
}

impl LifeConfig {
    pub fn step_interval(&self) -> Duration {
        Duration::from_millis(self.step_interval_ms)
    }

    /// RNG for one consumer. With a seed, each `stream` gets its own reproducible sequence.
    pub fn rng(&self, stream: u64) -> SmallRng {
        match self.seed {
            Some(seed) => SmallRng::seed_from_u64(seed ^ stream.wrapping_mul(0x9E37_79B9_7F4A_7C15)),
            None => SmallRng::from_os_rng(),
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if self.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        if self.initial_live_cells == 0 {
            return Err(ConfigError::ZeroInitialLiveCells);
        }
        self.palette.validate()?;
        self.overlay.validate()
    }
}
