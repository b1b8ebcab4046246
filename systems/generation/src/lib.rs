#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Deterministic level generation for Hollow Halls.
//!
//! One synchronous [`generate`] call takes a validated configuration and
//! produces the finished grid, the ordered boundary-placement queue, the
//! spawn plan, and a report of how the run went. Nothing yields
//! mid-generation and nothing here touches global state: every stage draws
//! from its own seeded stream, so a seed replays the exact same level.

mod boundary;
mod painter;
mod rooms;
mod spawn;

use hollow_halls_core::{
    ConfigError, Direction, GenerationConfig, GridCoord, LayoutEvent, MapElement,
};
use hollow_halls_world::GridMap;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

/// Everything a finished generation run hands to its consumers.
#[derive(Clone, Debug)]
pub struct GeneratedLevel {
    /// The immutable-after-generation cell classification grid.
    pub grid: GridMap,
    /// Ordered wall/door/object placement queue for the instantiation layer.
    pub layout: Vec<LayoutEvent>,
    /// Chosen spawn cells.
    pub spawns: SpawnPlan,
    /// Outcome accounting for the run.
    pub report: GenerationReport,
}

/// Spawn cells selected by the planner.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpawnPlan {
    /// Cell the player starts on: the center of the seed room.
    pub player: GridCoord,
    /// Enemy spawn cell; `None` only when the map holds no walkable cell.
    pub enemy: Option<GridCoord>,
    /// Distinct walkable cells carrying narrative notes, in corner order.
    pub notes: Vec<GridCoord>,
}

/// Accounting for one generation run.
///
/// Shortfalls are reported here (and logged) instead of failing the run; a
/// sparser map is a graceful degradation, not an error.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerationReport {
    /// Room count the run aimed for, drawn from the configured range.
    pub target_rooms: u32,
    /// Configured lower bound the run tried to guarantee.
    pub min_rooms: u32,
    /// Rooms actually stamped, starter room and forced placements included.
    pub rooms_placed: u32,
    /// Rooms stamped by the forced-placement fallback.
    pub forced_rooms: u32,
    /// Hall cells the painter placed.
    pub paint_steps: u32,
    /// Trunk restarts the painter consumed.
    pub jumps: u32,
}

impl GenerationReport {
    /// How far the run fell below the configured room minimum.
    #[must_use]
    pub const fn shortfall(&self) -> u32 {
        self.min_rooms.saturating_sub(self.rooms_placed)
    }
}

/// Runs the whole generation pipeline: seed room, hall painting, room
/// stamping, boundary synthesis, spawn planning.
///
/// Fails only on configuration errors; every mid-run placement failure is
/// recovered by the retry and fallback policies of the individual stages.
pub fn generate(config: &GenerationConfig) -> Result<GeneratedLevel, ConfigError> {
    config.validate()?;
    let mut grid = GridMap::new(config.dimensions, config.tile_length)?;

    let center = GridCoord::new(
        config.dimensions.width / 2,
        0,
        config.dimensions.height / 2,
    );
    stamp_seed_room(&mut grid, center);
    seed_hall_stubs(&mut grid, center);

    let mut paint_rng = stream_rng(config.seed, STREAM_PAINT);
    let report = painter::paint(&mut grid, &config.paint, &config.rooms, &mut paint_rng);

    let mut boundary_rng = stream_rng(config.seed, STREAM_BOUNDARY);
    let layout = boundary::synthesize(&mut grid, &config.boundary, center, &mut boundary_rng);

    let mut spawn_rng = stream_rng(config.seed, STREAM_SPAWN);
    let spawns = spawn::plan(&grid, &config.spawns, center, &mut spawn_rng);

    tracing::info!(
        rooms = report.rooms_placed,
        target = report.target_rooms,
        halls = report.paint_steps,
        walls = layout.len(),
        "generation complete"
    );

    Ok(GeneratedLevel {
        grid,
        layout,
        spawns,
        report,
    })
}

const STREAM_PAINT: &[u8] = b"paint";
const STREAM_BOUNDARY: &[u8] = b"boundary";
const STREAM_SPAWN: &[u8] = b"spawn";

/// Derives an independent RNG for one pipeline stage from the root seed, so
/// tuning one stage never perturbs the draws of another.
fn stream_rng(seed: u64, label: &[u8]) -> ChaCha8Rng {
    use rand::SeedableRng;

    let mut hasher = Sha256::new();
    hasher.update(seed.to_le_bytes());
    hasher.update(label);
    ChaCha8Rng::from_seed(hasher.finalize().into())
}

/// Stamps the 3x3 starter room around the map center. Counts toward the
/// room target like any other room.
fn stamp_seed_room(grid: &mut GridMap, center: GridCoord) {
    for x in center.x() - 1..=center.x() + 1 {
        for z in center.z() - 1..=center.z() + 1 {
            let _ = grid.set_element(GridCoord::new(x, 0, z), MapElement::Room);
        }
    }
}

/// Places one hall stub two cells out from the center along each axis so the
/// painter has valid trunks before its first step. Stubs are stamped
/// directly and bypass the painting constraints.
fn seed_hall_stubs(grid: &mut GridMap, center: GridCoord) {
    for direction in Direction::ALL {
        let stub = center.offset(direction).offset(direction);
        let _ = grid.set_element(stub, MapElement::Hall);
    }
}
