mod rendering;
mod stats_panel;

use std::path::PathBuf;

use clap::Parser;
use macroquad::prelude::*;
use tracing::{error, info};

use harvester::config::window_conf;
use harvester::simulation::Timer;
use harvester::telemetry::{TelemetrySink, TracingSink};
use harvester::{Simulation, SimulationConfig};

use rendering::Renderer;
use stats_panel::StatsPanel;

/// Upper bound on ticks run in one frame after a stall.
const MAX_TICKS_PER_FRAME: f64 = 50.0;

/// Command-line arguments for the viewer.
#[derive(Parser)]
#[command(name = "harvester-viewer", version, about = "Watch a harvester ant colony forage")]
struct Cli {
    /// Path to the TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Overrides the RNG seed from the configuration.
    #[arg(long)]
    seed: Option<u64>,
}

fn build_simulation(cli: &Cli) -> anyhow::Result<Simulation> {
    let mut config = match &cli.config {
        Some(path) => SimulationConfig::load(path)?,
        None => SimulationConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.run.seed = seed;
    }
    Ok(Simulation::new(config)?)
}

#[macroquad::main(window_conf)]
async fn main() {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let mut sim = match build_simulation(&cli) {
        Ok(sim) => sim,
        Err(e) => {
            error!("Failed to start simulation: {:#}", e);
            return;
        }
    };

    let mut renderer = Renderer::new(sim.arena.width, sim.arena.height);
    let mut panel = StatsPanel::new();
    let mut sink = TracingSink::new(200);
    let mut step_timer = Timer::new(sim.config.run.dt, 0.0);

    loop {
        // Quitting is only observed here, between ticks.
        if is_key_pressed(KeyCode::Escape) {
            info!(tick = sim.tick, "Viewer closed");
            break;
        }
        if is_key_pressed(KeyCode::Space) {
            panel.paused = !panel.paused;
        }

        if !panel.paused && !sim.is_finished() {
            step_timer.update(get_frame_time() as f64 * panel.speed);
            step_timer.cap(MAX_TICKS_PER_FRAME);
            while step_timer.is_ready() && !sim.is_finished() {
                let sample = sim.tick();
                sink.record(&sample);
                step_timer.consume();
            }
        }

        let snapshot = sim.snapshot();
        renderer.render(&snapshot);

        new_egui_macroquad::ui(|egui_ctx| {
            catppuccin_egui::set_theme(egui_ctx, catppuccin_egui::MOCHA);
            panel.draw(egui_ctx, &snapshot, sim.is_finished());
        });
        new_egui_macroquad::draw();

        next_frame().await;
    }

    println!("{}", sim.report());
}
