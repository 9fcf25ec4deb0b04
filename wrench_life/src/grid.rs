// grid.rs - Row-major cell buffer for the automaton

use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;

use crate::color::{Palette, Rgba};
use crate::error::ConfigError;
use crate::patterns::Pattern;

/// A fixed-size, row-major array of coloured cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    cells: Vec<Rgba>,
    width: usize,
    height: usize,
    palette: Palette,
}

impl Grid {
    /// Creates an all-background grid.
    pub fn new(width: usize, height: usize, palette: Palette) -> Result<Self, ConfigError> {
        palette.validate()?;
        if width == 0 {
            return Err(ConfigError::ZeroWidth);
        }
        if height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        Ok(Self {
            cells: vec![palette.background; width * height],
            width,
            height,
            palette,
        })
    }

    /// Creates a grid with `live` cells set alive at uniformly drawn positions.
    /// Positions may repeat, so the population can end up below `live`.
    pub fn random<R: Rng + ?Sized>(
        width: usize,
        height: usize,
        palette: Palette,
        live: usize,
        rng: &mut R,
    ) -> Result<Self, ConfigError> {
        let mut grid = Self::new(width, height, palette)?;
        grid.seed_random(live, rng);
        Ok(grid)
    }

    pub fn seed_random<R: Rng + ?Sized>(&mut self, live: usize, rng: &mut R) {
        for _ in 0..live {
            let x = rng.random_range(0..self.width);
            let y = rng.random_range(0..self.height);
            self.cells[y * self.width + x] = self.palette.alive;
        }
    }

    /// A background-filled grid with the same shape and palette.
    pub fn blank_like(&self) -> Self {
        Self {
            cells: vec![self.palette.background; self.cells.len()],
            width: self.width,
            height: self.height,
            palette: self.palette,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn palette(&self) -> Palette {
        self.palette
    }

    pub fn cells(&self) -> &[Rgba] {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut [Rgba] {
        &mut self.cells
    }

    pub fn get(&self, x: usize, y: usize) -> Option<Rgba> {
        if x < self.width && y < self.height {
            Some(self.cells[y * self.width + x])
        } else {
            None
        }
    }

    /// Writes a cell; coordinates outside the grid are ignored.
    pub fn set(&mut self, x: usize, y: usize, color: Rgba) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = color;
        }
    }

    pub fn is_alive(&self, x: usize, y: usize) -> bool {
        self.get(x, y).is_some_and(|c| self.palette.is_alive(c))
    }

    pub fn clear(&mut self) {
        self.cells.fill(self.palette.background);
    }

    /// Stamps a pattern in the alive colour with its top-left corner at the origin.
    pub fn stamp_pattern(&mut self, pattern: &Pattern, origin_x: usize, origin_y: usize) {
        let alive = self.palette.alive;
        for &(dx, dy) in pattern.cells {
            self.set(origin_x + dx, origin_y + dy, alive);
        }
    }

    pub fn population(&self) -> usize {
        self.cells
            .iter()
            .filter(|&&c| self.palette.is_alive(c))
            .count()
    }

    /// Writes interleaved RGBA bytes into a caller-owned buffer.
    /// Writes stop at whichever of the grid or the buffer runs out first.
    pub fn render_into(&self, pixels: &mut [u8]) {
        for (px, cell) in pixels.chunks_exact_mut(4).zip(&self.cells) {
            px.copy_from_slice(&cell.to_bytes());
        }
    }

    pub fn byte_len(&self) -> usize {
        self.cells.len() * 4
    }

    pub(crate) fn fingerprint(&self) -> u64 {
        let mut hasher = DefaultHasher::new();
        self.cells.hash(&mut hasher);
        hasher.finish()
    }
}
