//! Rigidbody Sim entry point
//!
//! Headless runner: populates a simulation, steps it at a fixed frame rate,
//! logs collision cues, and prints the final snapshot as JSON.

use std::path::PathBuf;

use clap::Parser;
use rigidbody_sim::sim::{SimEvent, Simulation};
use rigidbody_sim::{SimConfig, SimResult};

/// Frame time fed to each tick
const FRAME_DT: f64 = 1.0 / 60.0;
/// Log conservation drift every this many ticks
const REPORT_INTERVAL: u64 = 60;

#[derive(Parser, Debug)]
#[command(about = "Elastic collisions between circular bodies on a bounded plane")]
struct Args {
    /// JSON config file (defaults are used when omitted)
    config: Option<PathBuf>,
    /// Number of ticks to run
    #[arg(default_value_t = 600)]
    ticks: u64,
}

/// Runner holding the simulation and run statistics
struct Runner {
    sim: Simulation,
    initial_energy: f64,
    collisions: u64,
}

impl Runner {
    fn new(config: SimConfig) -> SimResult<Self> {
        let sim = Simulation::initialize(config.body_count, config)?;
        let initial_energy = sim.total_kinetic_energy();
        Ok(Self {
            sim,
            initial_energy,
            collisions: 0,
        })
    }

    /// Stand-in for the audio player
    fn play_hit_sound(&mut self, event: SimEvent) {
        match event {
            SimEvent::Collision { initiator, other } => {
                self.collisions += 1;
                log::debug!("hit: body {} -> body {}", initiator, other);
            }
        }
    }

    fn run(&mut self, ticks: u64) -> SimResult<()> {
        for _ in 0..ticks {
            self.sim.tick(FRAME_DT)?;
            for event in self.sim.drain_events() {
                self.play_hit_sound(event);
            }

            if self.sim.time_ticks % REPORT_INTERVAL == 0 {
                let energy = self.sim.total_kinetic_energy();
                let drift = if self.initial_energy > 0.0 {
                    (energy - self.initial_energy) / self.initial_energy
                } else {
                    0.0
                };
                let momentum = self.sim.total_momentum();
                log::info!(
                    "tick {}: {} collisions, energy drift {:+.2e}, momentum ({:.1}, {:.1})",
                    self.sim.time_ticks,
                    self.collisions,
                    drift,
                    momentum.x,
                    momentum.y
                );
            }
        }
        self.sim.stop();
        Ok(())
    }
}

fn run(args: Args) -> SimResult<()> {
    let config = match &args.config {
        Some(path) => SimConfig::load(path)?,
        None => SimConfig::default(),
    };
    log::info!(
        "Rigidbody Sim starting: {} bodies, {} ticks, seed {}",
        config.body_count,
        args.ticks,
        config.seed
    );

    let mut runner = Runner::new(config)?;
    runner.run(args.ticks)?;

    log::info!("Done: {} collisions", runner.collisions);
    println!("{}", serde_json::to_string_pretty(&runner.sim.snapshot())?);
    Ok(())
}

fn main() {
    env_logger::init();
    let args = Args::parse();
    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
