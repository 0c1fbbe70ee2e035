//! Collision simulator CLI
//!
//! Runs a random hard-disc gas to the time limit and reports what happened.

use clap::Parser;
use collide::config::{SimConfig, SpawnParams};
use collide::core::{Particle, RunSummary, Simulation};
use collide::render::Renderer;
use std::process::ExitCode;
use tracing::{debug, error, info, Level};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// Event-driven elastic collision simulator
#[derive(Parser, Debug)]
#[command(name = "collide")]
#[command(about = "Simulate elastic collisions between hard discs in a box", long_about = None)]
struct Args {
    /// Number of particles
    #[arg(short = 'n', long, default_value = "100")]
    particles: usize,

    /// Particle radius
    #[arg(short, long, default_value = "0.01")]
    radius: f64,

    /// Particle mass
    #[arg(short, long, default_value = "1.0")]
    mass: f64,

    /// Maximum initial velocity component
    #[arg(long, default_value = "0.1")]
    speed: f64,

    /// RNG seed (omit for a random one)
    #[arg(short, long)]
    seed: Option<u64>,

    /// Simulation time limit (overrides the config file)
    #[arg(short, long)]
    limit: Option<f64>,

    /// Redraw frequency in ticks per unit time; 0 disables redraws
    #[arg(long)]
    hz: Option<f64>,

    /// JSON file with a SimConfig
    #[arg(short, long)]
    config: Option<String>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,

    /// JSON output for scripting
    #[arg(long)]
    json: bool,
}

/// Logs a one-line digest of every redraw tick.
#[derive(Default)]
struct LogRenderer {
    frames: u64,
}

impl Renderer for LogRenderer {
    fn redraw(&mut self, clock: f64, particles: &[Particle]) {
        self.frames += 1;
        let energy: f64 = particles.iter().map(Particle::kinetic_energy).sum();
        debug!(frame = self.frames, clock, energy, "redraw");
    }
}

fn build_config(args: &Args) -> collide::Result<SimConfig> {
    let mut config = match &args.config {
        Some(path) => SimConfig::from_path(path)?,
        None => SimConfig::default(),
    };
    if let Some(limit) = args.limit {
        config.time_limit = limit;
    }
    if let Some(hz) = args.hz {
        config.redraw_interval = (hz > 0.0).then(|| 1.0 / hz);
    }
    config.validate()?;
    Ok(config)
}

fn run(args: &Args) -> collide::Result<RunSummary> {
    let config = build_config(args)?;
    let spawn = SpawnParams {
        count: args.particles,
        radius: args.radius,
        mass: args.mass,
        max_speed: args.speed,
    };
    let mut sim = Simulation::random(&spawn, config, args.seed)?;
    let mut renderer = LogRenderer::default();
    sim.run(&mut renderer)
}

fn main() -> ExitCode {
    let args = Args::parse();

    // Initialize logging; RUST_LOG wins over --verbose.
    let level = if args.verbose { Level::DEBUG } else { Level::INFO };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(level.as_str().to_lowercase()));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("failed to set tracing subscriber: {e}");
    }

    let summary = match run(&args) {
        Ok(s) => s,
        Err(e) => {
            error!("simulation failed: {e}");
            return ExitCode::FAILURE;
        }
    };

    if args.json {
        match serde_json::to_string_pretty(&summary) {
            Ok(s) => println!("{s}"),
            Err(e) => {
                error!("failed to serialize summary: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let stats = summary.stats;
        let popped = stats.fired() + stats.stale_discarded;
        let stale_ratio = if popped == 0 {
            0.0
        } else {
            stats.stale_discarded as f64 / popped as f64
        };
        info!("finished: {:?} at t={:.4}", summary.termination, summary.clock);
        info!(
            "particle collisions: {} | wall collisions: {} | redraws: {}",
            stats.particle_collisions, stats.wall_collisions, stats.redraws
        );
        info!(
            "events scheduled: {} | stale discarded: {} ({:.1}%) | still pending: {}",
            stats.scheduled,
            stats.stale_discarded,
            100.0 * stale_ratio,
            summary.pending_events
        );
        info!(
            "kinetic energy: {:.6e} -> {:.6e} (relative drift {:.3e})",
            summary.initial_energy,
            summary.final_energy,
            summary.energy_drift()
        );
    }
    ExitCode::SUCCESS
}
