// color.rs - Cell colours and the background/alive palette

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// One grid cell. The background colour means dead, anything else is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn to_bytes(self) -> [u8; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

/// The two colours the automaton itself knows about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub background: Rgba,
    pub alive: Rgba,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Rgba::TRANSPARENT,
            alive: Rgba::opaque(60, 200, 40),
        }
    }
}

impl Palette {
    /// Liveness is colour inequality, so the two colours must differ.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.alive == self.background {
            return Err(ConfigError::IndistinctPalette);
        }
        Ok(())
    }

    #[inline]
    pub fn is_alive(&self, cell: Rgba) -> bool {
        cell != self.background
    }
}
