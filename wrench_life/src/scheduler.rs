// scheduler.rs - Background task that rearms the wrench at a fixed interval

use std::time::Duration;

use rand::{Rng, rngs::SmallRng};
use tokio::runtime::Handle;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, info, warn};

use crate::config::{LifeConfig, SizeRange};
use crate::engine::Simulation;
use crate::error::ConfigError;
use crate::overlay::{Overlay, Placement};

/// Rearms the overlay with a random placement unless a sweep is running.
pub struct DisruptionScheduler {
    overlay: Overlay,
    height: usize,
    box_height: SizeRange,
    box_width: SizeRange,
    interval: Duration,
    rng: SmallRng,
}

impl DisruptionScheduler {
    /// Placements span `config.height` rows.
    pub fn new(overlay: Overlay, config: &LifeConfig) -> Result<Self, ConfigError> {
        if config.height == 0 {
            return Err(ConfigError::ZeroHeight);
        }
        config.overlay.validate()?;
        Ok(Self {
            overlay,
            height: config.height,
            box_height: config.overlay.box_height,
            box_width: config.overlay.box_width,
            interval: config.overlay.interval(),
            rng: config.rng(1),
        })
    }

    /// Rearms the simulation's own overlay, placing it within the grid's actual height.
    pub fn for_simulation(sim: &Simulation, config: &LifeConfig) -> Result<Self, ConfigError> {
        let (_, height) = sim.layout(0, 0);
        let config = LifeConfig {
            height,
            ..config.clone()
        };
        Self::new(sim.overlay().clone(), &config)
    }

    pub fn with_rng(mut self, rng: SmallRng) -> Self {
        self.rng = rng;
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// One firing. Returns the new placement, or `None` if the overlay was running.
    pub fn fire(&mut self) -> Option<Placement> {
        let (height, box_height, box_width) = (self.height, self.box_height, self.box_width);
        let rng = &mut self.rng;
        let placement = self.overlay.rearm_with(|_| Placement {
            y: rng.random_range(0..height),
            box_height: box_height.pick(&mut *rng),
            box_width: box_width.pick(&mut *rng),
        });

        match placement {
            Some(p) => info!(
                y = p.y,
                box_height = p.box_height,
                box_width = p.box_width,
                "🔧 wrench armed"
            ),
            None => debug!("wrench still running, skipping"),
        }
        placement
    }

    /// Runs the scheduler on `runtime` until the handle stops it. The first firing
    /// happens immediately.
    pub fn spawn(self, runtime: &Handle) -> SchedulerHandle {
        let (stop, stopped) = oneshot::channel();
        let task = runtime.spawn(self.run(stopped));
        SchedulerHandle {
            stop: Some(stop),
            task,
        }
    }

    async fn run(mut self, mut stop: oneshot::Receiver<()>) -> u64 {
        let mut ticker = time::interval(self.interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        let mut firings = 0;
        debug!(interval_ms = self.interval.as_millis() as u64, "disruption scheduler started");

        loop {
            tokio::select! {
                // A dropped sender also ends the loop
                _ = &mut stop => break,
                _ = ticker.tick() => {
                    self.fire();
                    firings += 1;
                }
            }
        }

        debug!(firings, "disruption scheduler stopped");
        firings
    }
}

pub struct SchedulerHandle {
    stop: Option<oneshot::Sender<()>>,
    task: JoinHandle<u64>,
}

impl SchedulerHandle {
    /// Signals the task to stop without waiting for it.
    pub fn stop(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
    }

    /// Stops the task and returns how many times it fired.
    pub async fn shutdown(mut self) -> u64 {
        self.stop();
        match self.task.await {
            Ok(firings) => firings,
            Err(err) => {
                warn!(?err, "disruption scheduler task failed");
                0
            }
        }
    }
}
