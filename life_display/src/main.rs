// main.rs - eframe host: owns the window and the tokio runtime, drives the simulation

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use eframe::egui;
use tracing::info;
use wrench_life::{
    ColorMode, DisruptionScheduler, LifeConfig, SchedulerHandle, Simulation, pattern_by_name,
};

mod ui;

#[derive(Parser, Debug)]
#[command(
    name = "life_display",
    version,
    about = "Conway's Game of Life with a periodic wrench in the works"
)]
struct Cli {
    /// JSON configuration file; missing fields keep their defaults.
    #[arg(long, env = "WRENCH_LIFE_CONFIG")]
    config: Option<PathBuf>,

    /// Seed for a reproducible run.
    #[arg(long)]
    seed: Option<u64>,

    /// Colour newborn cells with the average of their neighbours.
    #[arg(long)]
    emergent: bool,

    /// Text the wrench types, one character per sweep.
    #[arg(long)]
    text: Option<String>,

    /// Start from a named pattern (e.g. "Gosper Glider Gun") instead of random cells.
    #[arg(long)]
    pattern: Option<String>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    let runtime = tokio::runtime::Runtime::new().context("failed to start tokio runtime")?;
    let mut sim = Simulation::new(&config)?;

    if let Some(name) = &cli.pattern {
        let pattern =
            pattern_by_name(name).with_context(|| format!("unknown pattern {name:?}"))?;
        let (pw, ph) = pattern.extent();
        sim.apply_pattern(
            pattern,
            config.width.saturating_sub(pw) / 2,
            config.height.saturating_sub(ph) / 2,
        );
        info!(pattern = pattern.name, "seeded from pattern");
    }

    let scheduler = DisruptionScheduler::for_simulation(&sim, &config)?.spawn(runtime.handle());

    let (width, height) = sim.layout(0, 0);
    info!(
        width,
        height,
        color_mode = ?config.color_mode,
        population = sim.population(),
        "starting simulation"
    );

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([(width * 2) as f32, (height * 2) as f32]),
        ..Default::default()
    };

    eframe::run_native(
        "Game of Life (wrench)",
        options,
        Box::new(move |_cc| Box::new(LifeApp::new(sim, scheduler, runtime))),
    )
    .map_err(|err| anyhow!("window failed: {err}"))
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

fn load_config(cli: &Cli) -> Result<LifeConfig> {
    let mut config = match &cli.config {
        Some(path) => {
            let raw = fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            serde_json::from_str(&raw)
                .with_context(|| format!("failed to parse {}", path.display()))?
        }
        None => LifeConfig::default(),
    };

    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if cli.emergent {
        config.color_mode = ColorMode::Emergent;
    }
    if let Some(text) = &cli.text {
        config.overlay.text = Some(text.clone());
    }

    config.validate()?;
    Ok(config)
}

/// Host state. Everything simulation-related lives in `sim`.
pub struct LifeApp {
    sim: Simulation,
    scheduler: SchedulerHandle,
    pixels: Vec<u8>,
    texture: Option<egui::TextureHandle>,
    reported_cycle: bool,
    _runtime: tokio::runtime::Runtime,
}

impl LifeApp {
    fn new(sim: Simulation, scheduler: SchedulerHandle, runtime: tokio::runtime::Runtime) -> Self {
        let pixels = vec![0; sim.grid().byte_len()];
        Self {
            sim,
            scheduler,
            pixels,
            texture: None,
            reported_cycle: false,
            _runtime: runtime,
        }
    }
}

impl Drop for LifeApp {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}
