//! Headless driver for the kinematic capsule controller.
//!
//! Builds one of the built-in scenario worlds, spawns a character and runs the
//! fixed-timestep loop, logging the pose every tick.
//!
//! ```text
//! RUST_LOG=debug sim ramp --ticks 120 --settings sim/settings.ron --trace
//! ```

mod scenario;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use env_logger::{Builder, Env};
use kcc::{Character, CharacterSettings};
use log::{debug, info, warn};

use scenario::Scenario;

/// Longest tick the driver will simulate; larger requests are clamped.
const MAX_DT_S: f32 = 0.10;

/// Run the kinematic capsule controller headless
#[derive(Parser, Debug)]
#[command(name = "sim")]
#[command(about = "Headless kinematic capsule controller driver", long_about = None)]
#[command(version)]
struct Cli {
    /// Scenario to run
    #[arg(value_enum, default_value_t = Scenario::Wall)]
    scenario: Scenario,

    /// Number of ticks to simulate
    #[arg(long, default_value_t = 60)]
    ticks: u32,

    /// Fixed timestep in seconds
    #[arg(long, default_value_t = 0.05)]
    dt: f32,

    /// RON file with character settings; missing fields use defaults
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Log the per-tick diagnostic trace
    #[arg(long)]
    trace: bool,
}

fn main() -> Result<()> {
    Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut settings = load_settings(cli.settings.as_deref())?;
    settings.record_trace |= cli.trace;

    let dt = cli.dt.clamp(0.0, MAX_DT_S);
    if dt != cli.dt {
        warn!("dt {} clamped to {dt}", cli.dt);
    }

    let setup = cli
        .scenario
        .build()
        .with_context(|| format!("building scenario {:?}", cli.scenario))?;
    let mut character =
        Character::new(settings, setup.spawn).context("invalid character settings")?;

    info!(
        "scenario {:?}: {} colliders, spawn {:?}, {} ticks of {dt}s",
        cli.scenario,
        setup.world.len(),
        setup.spawn,
        cli.ticks
    );

    for tick in 0..cli.ticks {
        let result = character.step(&setup.world, setup.input, dt);
        debug!(
            "tick {tick:4} pos ({:.3}, {:.3}, {:.3}) vel ({:.3}, {:.3}, {:.3}) grounded {}",
            result.position.x,
            result.position.y,
            result.position.z,
            result.velocity.x,
            result.velocity.y,
            result.velocity.z,
            result.grounded
        );
        for record in &result.trace {
            debug!("    {:?} {:?} -> {:?}", record.tag, record.from, record.to);
        }
    }

    let motion = character.motion();
    info!(
        "final position {:?}, speed {:.3}, grounded {}",
        character.position(),
        motion.speed(),
        motion.grounded
    );
    Ok(())
}

fn load_settings(path: Option<&Path>) -> Result<CharacterSettings> {
    let Some(path) = path else {
        return Ok(CharacterSettings::default());
    };
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading settings from {}", path.display()))?;
    let settings = ron::from_str(&text)
        .with_context(|| format!("parsing settings from {}", path.display()))?;
    Ok(settings)
}
