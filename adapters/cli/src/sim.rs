//! Pursuit demo loop: a stationary player, a moving pursuer, and a sampled
//! sight probe standing in for the engine's raycast.

use std::time::Duration;

use glam::Vec2;
use hollow_halls_core::{PursuitConfig, WorldPos};
use hollow_halls_system_generation::GeneratedLevel;
use hollow_halls_system_pursuit::{PursuerAgent, PursuerInput, PursuitDecision};
use hollow_halls_world::GridMap;
use rand_chacha::rand_core::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// How often a status line is logged, in ticks.
const STATUS_INTERVAL: u32 = 10;

/// Tick on which the demo fires a trap-style aggro trigger.
const AGGRO_TICK: u32 = 40;

/// Runs the demo for up to `ticks` simulated steps.
pub(crate) fn run(level: &GeneratedLevel, seed: u64, ticks: u32, dt: Duration) {
    let grid = &level.grid;
    let Some(enemy_cell) = level.spawns.enemy else {
        tracing::warn!("no enemy spawn on this map; skipping the pursuit demo");
        return;
    };

    let config = PursuitConfig::default();
    let mut agent = match PursuerAgent::new(config, ChaCha8Rng::seed_from_u64(seed)) {
        Ok(agent) => agent,
        Err(error) => {
            tracing::warn!(%error, "pursuit tuning rejected; skipping the demo");
            return;
        }
    };

    let player = grid.cell_center_world(level.spawns.player);
    let mut pursuer = to_vec(grid.cell_center_world(enemy_cell));
    let catch_radius = grid.tile_length() * 0.5;

    for tick in 0..ticks {
        if tick == AGGRO_TICK {
            tracing::info!(tick, "trap sprung: aggro triggered");
            agent.aggro(None);
        }

        let input = PursuerInput {
            pursuer: to_pos(pursuer),
            player,
        };
        let decision = agent.tick(dt, grid, &input, |from, to| sight_blocked(grid, from, to));

        if let PursuitDecision::MoveToward { target, speed } = decision {
            pursuer = advance(pursuer, to_vec(target), speed * dt.as_secs_f32());
        }

        if tick % STATUS_INTERVAL == 0 {
            tracing::info!(
                tick,
                mode = ?agent.mode(),
                aggression = agent.aggression_level(),
                cell = ?grid.world_to_cell(to_pos(pursuer)),
                "pursuer status"
            );
        }

        if pursuer.distance(to_vec(player)) <= catch_radius {
            tracing::info!(tick, "the pursuer reached the player");
            return;
        }
    }

    tracing::info!(ticks, "demo finished without a catch");
}

fn advance(from: Vec2, target: Vec2, max_step: f32) -> Vec2 {
    let delta = target - from;
    let distance = delta.length();
    if distance <= max_step || distance <= f32::EPSILON {
        target
    } else {
        from + delta * (max_step / distance)
    }
}

/// Sampled stand-in for the engine raycast: sight is blocked when the
/// segment crosses any cell that carries no floor.
fn sight_blocked(grid: &GridMap, from: WorldPos, to: WorldPos) -> bool {
    let from = to_vec(from);
    let to = to_vec(to);
    let delta = to - from;
    let distance = delta.length();
    if distance <= f32::EPSILON {
        return false;
    }

    let sample_spacing = grid.tile_length() * 0.25;
    let samples = (distance / sample_spacing).ceil() as u32;
    for sample in 1..samples {
        let point = from + delta * (sample as f32 / samples as f32);
        let cell = grid.world_to_cell(to_pos(point));
        if !grid.classify(cell).is_floor_like() {
            return true;
        }
    }
    false
}

fn to_vec(position: WorldPos) -> Vec2 {
    Vec2::new(position.x(), position.z())
}

fn to_pos(position: Vec2) -> WorldPos {
    WorldPos::new(position.x, position.y)
}
