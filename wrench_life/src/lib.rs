//! Conway's Game of Life rendered into an RGBA pixel buffer, with a periodic
//! "wrench" overlay that sweeps a coloured box (optionally typing through a
//! short text) across the grid.
//!
//! A host loop owns the window and calls [`Simulation::step`],
//! [`Simulation::render_into`] and [`Simulation::layout`] once per frame. A
//! [`DisruptionScheduler`] runs on a tokio runtime and rearms the shared
//! [`Overlay`] on its own schedule.
//!
//! ```
//! use wrench_life::{LifeConfig, Simulation};
//!
//! let config = LifeConfig {
//!     width: 64,
//!     height: 48,
//!     initial_live_cells: 500,
//!     seed: Some(7),
//!     ..LifeConfig::default()
//! };
//! let mut sim = Simulation::new(&config).unwrap();
//! sim.advance();
//!
//! let mut pixels = vec![0u8; 64 * 48 * 4];
//! sim.render_into(&mut pixels);
//! ```

pub mod clock;
pub mod color;
pub mod config;
pub mod engine;
pub mod error;
pub mod grid;
pub mod overlay;
pub mod patterns;
pub mod rule;
pub mod scheduler;

pub use clock::{Clock, ManualClock, SystemClock};
pub use color::{Palette, Rgba};
pub use config::{LifeConfig, OverlayConfig, SizeRange};
pub use engine::Simulation;
pub use error::ConfigError;
pub use grid::Grid;
pub use overlay::{Overlay, OverlayState, OverlayStatus, Placement};
pub use patterns::{PATTERNS, Pattern, pattern_by_name};
pub use rule::{ColorMode, Neighbourhood};
pub use scheduler::{DisruptionScheduler, SchedulerHandle};
