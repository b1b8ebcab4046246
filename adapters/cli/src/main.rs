#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line adapter that generates a facility and runs a pursuit demo.
//!
//! This is the stand-in for the excluded presentation layer: it renders the
//! classified grid as text, prints the boundary and spawn results, and then
//! drives the pursuer agent against a stationary player for a configurable
//! number of ticks.

mod level_code;
mod render;
mod sim;

use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use hollow_halls_core::{GenerationConfig, GridDimensions};
use hollow_halls_system_generation::generate;
use tracing_subscriber::EnvFilter;

/// Seeded facility generation and pursuit demo.
#[derive(Debug, Parser)]
#[command(name = "hollow-halls")]
struct Args {
    /// Seed for the generation run.
    #[arg(long, default_value_t = 0)]
    seed: u64,

    /// Map width in cells.
    #[arg(long, default_value_t = 30)]
    width: i32,

    /// Map height in cells.
    #[arg(long, default_value_t = 30)]
    height: i32,

    /// Simulation ticks to run after generation; zero skips the demo.
    #[arg(long, default_value_t = 120)]
    ticks: u32,

    /// Simulated milliseconds per tick.
    #[arg(long, default_value_t = 100)]
    tick_ms: u64,

    /// Level code to replay instead of the seed and size flags.
    #[arg(long)]
    code: Option<String>,

    /// Print the level code for the resolved configuration and exit.
    #[arg(long)]
    emit_code: bool,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = resolve_config(&args)?;

    if args.emit_code {
        println!("{}", level_code::encode(&config));
        return Ok(());
    }

    let level = generate(&config).context("generation failed")?;
    println!("{}", render::render_level(&level));
    println!(
        "rooms {}/{} (min {}), halls {}, jumps {}, layout events {}",
        level.report.rooms_placed,
        level.report.target_rooms,
        level.report.min_rooms,
        level.report.paint_steps,
        level.report.jumps,
        level.layout.len(),
    );
    println!("share code: {}", level_code::encode(&config));

    if args.ticks > 0 {
        sim::run(
            &level,
            config.seed,
            args.ticks,
            Duration::from_millis(args.tick_ms),
        );
    }

    Ok(())
}

fn resolve_config(args: &Args) -> anyhow::Result<GenerationConfig> {
    let config = match &args.code {
        Some(code) => level_code::decode(code).context("invalid level code")?,
        None => GenerationConfig {
            seed: args.seed,
            dimensions: GridDimensions::new(args.width, 1, args.height),
            ..GenerationConfig::default()
        },
    };
    config.validate()?;
    Ok(config)
}
