// engine.rs - Time-gated generation stepping with the overlay composited on top

use std::collections::VecDeque;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{debug, trace};

use crate::clock::{Clock, SystemClock};
use crate::config::LifeConfig;
use crate::error::ConfigError;
use crate::grid::Grid;
use crate::overlay::Overlay;
use crate::patterns::Pattern;
use crate::rule::{self, ColorMode};

const HISTORY_LEN: usize = 10;

/// The simulation as seen by a host loop: `step`, `render_into`, `layout`.
pub struct Simulation {
    grid: Grid,
    color_mode: ColorMode,
    overlay: Overlay,
    clock: Arc<dyn Clock>,
    step_interval: Duration,
    last_step: Instant,
    generation: u64,
    history: VecDeque<u64>,
    cycling: bool,
}

impl Simulation {
    /// Builds a randomly populated simulation from a validated config.
    pub fn new(config: &LifeConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut rng = config.rng(0);
        let grid = Grid::random(
            config.width,
            config.height,
            config.palette,
            config.initial_live_cells,
            &mut rng,
        )?;
        Self::from_grid(config, grid)
    }

    /// Wraps an already seeded grid. The grid's shape and palette win over the config's,
    /// so only the overlay settings are checked here.
    pub fn from_grid(config: &LifeConfig, grid: Grid) -> Result<Self, ConfigError> {
        config.overlay.validate()?;
        let clock: Arc<dyn Clock> = Arc::new(SystemClock);
        let last_step = clock.now();
        let mut sim = Self {
            grid,
            color_mode: config.color_mode,
            overlay: Overlay::from_config(&config.overlay),
            clock,
            step_interval: config.step_interval(),
            last_step,
            generation: 0,
            history: VecDeque::with_capacity(HISTORY_LEN),
            cycling: false,
        };
        sim.reset_history();
        Ok(sim)
    }

    /// Shares an existing overlay, typically one a scheduler also holds.
    pub fn with_overlay(mut self, overlay: Overlay) -> Self {
        self.overlay = overlay;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.last_step = clock.now();
        self.clock = clock;
        self
    }

    /// Advances one generation if the step interval has elapsed since the last one,
    /// otherwise does nothing. The returned flag is an extra for hosts that want to
    /// react to new generations; callers that only drive the loop can ignore it.
    pub fn step(&mut self) -> bool {
        let now = self.clock.now();
        if now.saturating_duration_since(self.last_step) < self.step_interval {
            return false;
        }
        self.last_step = now;
        self.advance();
        true
    }

    /// Unconditionally computes the next generation and composites the overlay.
    pub fn advance(&mut self) {
        let palette = self.grid.palette();
        let (width, height) = (self.grid.width(), self.grid.height());
        let mut next = self.grid.blank_like();

        {
            let cells = next.cells_mut();
            for y in 0..height {
                for x in 0..width {
                    let n = rule::neighbourhood(&self.grid, x, y);
                    let alive = palette.is_alive(self.grid.cells()[y * width + x]);
                    if rule::survives(alive, n.count) {
                        cells[y * width + x] = self.color_mode.cell_color(&palette, &n);
                    }
                }
            }
        }

        self.overlay.tick(&mut next);
        self.grid = next;
        self.generation += 1;
        self.record_history();
        trace!(generation = self.generation, "generation advanced");
    }

    pub fn render_into(&self, pixels: &mut [u8]) {
        self.grid.render_into(pixels);
    }

    /// The simulation resolution is fixed; host suggestions are ignored.
    pub fn layout(&self, _host_width: usize, _host_height: usize) -> (usize, usize) {
        (self.grid.width(), self.grid.height())
    }

    /// Clears the grid, stamps `pattern` at the origin and restarts counting.
    pub fn apply_pattern(&mut self, pattern: &Pattern, origin_x: usize, origin_y: usize) {
        self.grid.clear();
        self.grid.stamp_pattern(pattern, origin_x, origin_y);
        self.generation = 0;
        self.reset_history();
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn population(&self) -> usize {
        self.grid.population()
    }

    /// Whether the latest generation repeats one of the previous few.
    pub fn is_cycling(&self) -> bool {
        self.cycling
    }

    fn reset_history(&mut self) {
        self.history.clear();
        self.history.push_back(self.grid.fingerprint());
        self.cycling = false;
    }

    fn record_history(&mut self) {
        let fingerprint = self.grid.fingerprint();
        let cycling = self.history.contains(&fingerprint);
        if cycling && !self.cycling {
            debug!(generation = self.generation, "grid settled into a cycle");
        }
        self.cycling = cycling;
        if self.history.len() == HISTORY_LEN {
            self.history.pop_front();
        }
        self.history.push_back(fingerprint);
    }
}
