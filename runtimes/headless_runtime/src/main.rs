// Headless Runtime - runs the grapple simulation without a headset
//
// Hands are driven by a keyframed input script, the world is a small rapier
// arena, and every frame is written to stdout as one line of JSON. Logs go to
// stderr; tune them with GRAPPLE_LOG (e.g. GRAPPLE_LOG=warn,grapple=debug).

mod script;

use std::{
    io::{BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

use anyhow::Context;
use cgmath::vec3;
use clap::Parser;
use grapple::{
    physics::PhysicsWorld, FixedStepper, GrappleConfig, GrappleController, Time,
};
use tracing::info;

use crate::script::InputScript;

#[derive(Parser)]
#[command(name = "headless_runtime")]
#[command(about = "Runs the grapple simulation against a demo arena and prints each frame as JSON")]
struct Args {
    /// Grapple tuning file (JSON); built-in defaults when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Input script (JSON keyframes); built-in demo when omitted
    #[arg(short, long)]
    script: Option<PathBuf>,

    /// Number of frames to simulate
    #[arg(short, long, default_value = "400")]
    frames: u64,

    /// Frame (update) rate in Hz
    #[arg(long, default_value = "72")]
    frame_rate: u32,

    /// Fixed (gravity and rigid body) rate in Hz
    #[arg(long, default_value = "50")]
    fixed_rate: u32,

    /// Print every Nth frame only
    #[arg(long, default_value = "1")]
    every: u64,
}

/// Floor, a wall to swing from and a crate to reel in
fn build_arena() -> PhysicsWorld {
    let mut world = PhysicsWorld::new();
    world.add_floor(0.0);
    world.add_static_box(vec3(0.0, 5.0, -9.5), vec3(10.0, 10.0, 0.5));
    world.add_movable_box(vec3(0.0, 1.0, 4.0), vec3(1.0, 1.0, 1.0));
    world
}

fn main() -> anyhow::Result<()> {
    engine::logging::init_logging("GRAPPLE_LOG");

    let args = Args::parse();
    anyhow::ensure!(args.frame_rate > 0, "--frame-rate must be positive");
    anyhow::ensure!(args.fixed_rate > 0, "--fixed-rate must be positive");
    anyhow::ensure!(args.every > 0, "--every must be positive");

    let config = match &args.config {
        Some(path) => GrappleConfig::load(path)?,
        None => GrappleConfig::default(),
    };
    let script = match &args.script {
        Some(path) => InputScript::load(path)?,
        None => InputScript::demo(),
    };

    info!(
        "Running {} frames at {} Hz (fixed {} Hz), {} keyframes",
        args.frames,
        args.frame_rate,
        args.fixed_rate,
        script.keyframes.len()
    );

    let mut world = build_arena();
    let mut controller = GrappleController::new(config, vec3(0.0, 0.05, 0.0))?;
    let mut stepper = FixedStepper::from_rate(args.fixed_rate);
    let frame_time = Duration::from_secs(1) / args.frame_rate;
    let mut time = Time::default();

    let stdout = std::io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    for frame in 0..args.frames {
        let input = script.input_at(frame, controller.player_position());
        time = time.tick(frame_time);
        controller.update(&input, &time, &mut world);

        let step = stepper.step_secs();
        for _ in 0..stepper.advance(frame_time) {
            controller.fixed_update(step, &world);
            world.step(step);
        }

        if frame % args.every == 0 {
            serde_json::to_writer(&mut out, &controller.snapshot())
                .context("writing frame snapshot")?;
            writeln!(out)?;
        }
    }
    out.flush()?;

    info!(
        "Done after {:.2}s simulated, player at {:?}",
        time.total.as_secs_f32(),
        controller.player_position()
    );
    Ok(())
}
