//! Hexabounce headless runner
//!
//! Drives the simulation from a simulated frame clock, logs run statistics
//! and prints the final world as JSON. A renderer would sit where the
//! per-frame report is.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;

use hexabounce::SimulationConfig;
use hexabounce::sim::{FixedTimestep, Telemetry, World, advance};

/// Ball bouncing inside a spinning hexagon
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// JSON config file (missing fields use defaults)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Simulated run length in seconds
    #[arg(short, long, default_value_t = 10.0)]
    seconds: f32,

    /// Frame rate of the simulated frame clock
    #[arg(long, default_value_t = 60.0)]
    fps: f32,

    /// Log a telemetry summary every N frames (0 disables)
    #[arg(long, default_value_t = 60)]
    report_every: u64,

    /// Print the effective config and exit
    #[arg(long)]
    print_config: bool,
}

fn run(args: &Args) -> hexabounce::Result<()> {
    let config = match &args.config {
        Some(path) => SimulationConfig::load(path)?,
        None => {
            let config = SimulationConfig::default();
            config.validate()?;
            config
        }
    };

    if args.print_config {
        println!("{}", config.to_json_pretty()?);
        return Ok(());
    }
    if !(args.fps > 0.0) {
        return Err(hexabounce::SimError::invalid("fps", "must be positive"));
    }

    let frame_dt = 1.0 / args.fps;
    let frames = (args.seconds.max(0.0) * args.fps).round() as u64;
    let mut clock = FixedTimestep::new(config.time_step)?;
    let mut world = World::new(&config);
    let mut telemetry = Telemetry::new();

    log::info!(
        "Hexabounce starting: {} frames at {} fps, step {:.5}s, spin {} rad/s",
        frames,
        args.fps,
        config.time_step,
        config.angular_velocity
    );

    for frame in 1..=frames {
        for _ in 0..clock.advance(frame_dt) {
            let outcome = advance(&world, &config, clock.step())?;
            telemetry.record(&outcome);
            world = outcome.world;
        }

        if args.report_every > 0 && frame % args.report_every == 0 {
            log::info!(
                "frame {}: angle={:.3} pos=({:.1}, {:.1}) speed avg={:.1} max={:.1} collisions={}",
                frame,
                world.hexagon.rotation_angle,
                world.ball.position.x,
                world.ball.position.y,
                telemetry.average_speed(),
                telemetry.max_speed,
                telemetry.collisions
            );
        }
    }

    if let Some(accel) = telemetry.acceleration(config.time_step) {
        log::info!("Speed trend at end: {:+.2}/s", accel);
    }
    if telemetry.clamps > 0 {
        log::warn!("Ball was clamped inside on {} steps", telemetry.clamps);
    }
    log::info!(
        "Done: {} steps, {} collisions, min clearance {:.4}",
        telemetry.steps(),
        telemetry.collisions,
        world.min_clearance()
    );

    println!("{}", serde_json::to_string_pretty(&world)?);
    Ok(())
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}
