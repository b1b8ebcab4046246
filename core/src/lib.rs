#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Core contracts shared across the Hollow Halls simulation.
//!
//! This crate defines the vocabulary that connects the generation pipeline,
//! the authoritative grid map, the pursuit system, and the adapters: cell
//! coordinates and classifications, boundary-synthesis events, and the
//! configuration surface with its fail-fast validation. It deliberately owns
//! no behavior beyond coordinate arithmetic and validation so that every
//! other crate can agree on the same types without depending on each other.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification assigned to a single grid cell.
///
/// Cells start `Empty`, are painted or stamped exactly once during
/// generation, and never change afterwards apart from the single sanctioned
/// `Room` to `RoomWithObject` promotion performed by boundary synthesis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MapElement {
    /// Unclaimed cell; also the classification reported for out-of-bounds
    /// queries so that boundary logic never needs a separate bounds branch.
    #[default]
    Empty,
    /// One-wide corridor cell carved by the painter.
    Hall,
    /// Exterior filler terrain assigned to every leftover cell.
    Grass,
    /// Floor cell belonging to a stamped rectangular room.
    Room,
    /// Room cell occupied by a decorative object or trap.
    RoomWithObject,
}

impl MapElement {
    /// Reports whether the element carries a floor (halls, rooms, and
    /// occupied room cells).
    #[must_use]
    pub const fn is_floor_like(self) -> bool {
        matches!(self, Self::Hall | Self::Room | Self::RoomWithObject)
    }

    /// Reports whether the element belongs to a room, occupied or not.
    #[must_use]
    pub const fn is_room_like(self) -> bool {
        matches!(self, Self::Room | Self::RoomWithObject)
    }

    /// Reports whether agents may traverse the element. Occupied room cells
    /// block movement even though they carry a floor.
    #[must_use]
    pub const fn is_walkable(self) -> bool {
        matches!(self, Self::Hall | Self::Room)
    }
}

/// Cardinal directions on the floor plane.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Movement toward increasing `z`.
    North,
    /// Movement toward increasing `x`.
    East,
    /// Movement toward decreasing `z`.
    South,
    /// Movement toward decreasing `x`.
    West,
}

impl Direction {
    /// All cardinal directions in neighbor-visit order.
    pub const ALL: [Self; 4] = [Self::North, Self::East, Self::South, Self::West];

    /// Offset applied to a cell coordinate when stepping this way.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Self::North => (0, 1),
            Self::East => (1, 0),
            Self::South => (0, -1),
            Self::West => (-1, 0),
        }
    }
}

/// Integer coordinate of a single grid cell.
///
/// `y` indexes the floor; generation currently operates on floor 0 but the
/// grid keeps the axis so multi-floor maps stay representable. Coordinates
/// outside the map are valid values; the map classifies them as [`MapElement::Empty`].
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct GridCoord {
    x: i32,
    y: i32,
    z: i32,
}

impl GridCoord {
    /// Creates a new cell coordinate.
    #[must_use]
    pub const fn new(x: i32, y: i32, z: i32) -> Self {
        Self { x, y, z }
    }

    /// Column index of the cell.
    #[must_use]
    pub const fn x(&self) -> i32 {
        self.x
    }

    /// Floor index of the cell.
    #[must_use]
    pub const fn y(&self) -> i32 {
        self.y
    }

    /// Row index of the cell.
    #[must_use]
    pub const fn z(&self) -> i32 {
        self.z
    }

    /// Neighboring cell one step in the provided direction on the same floor.
    #[must_use]
    pub const fn offset(self, direction: Direction) -> Self {
        let (dx, dz) = direction.delta();
        Self::new(self.x + dx, self.y, self.z + dz)
    }

    /// The four same-floor neighbors in north, east, south, west order.
    #[must_use]
    pub const fn neighbors4(self) -> [Self; 4] {
        [
            self.offset(Direction::North),
            self.offset(Direction::East),
            self.offset(Direction::South),
            self.offset(Direction::West),
        ]
    }

    /// Manhattan distance to another cell measured on the floor plane.
    #[must_use]
    pub const fn manhattan_distance(self, other: Self) -> i32 {
        (self.x - other.x).abs() + (self.z - other.z).abs()
    }

    /// Squared Euclidean distance to another cell on the floor plane.
    ///
    /// Widened to `i64` so spawn scoring never overflows on large maps.
    #[must_use]
    pub const fn distance_squared(self, other: Self) -> i64 {
        let dx = (self.x - other.x) as i64;
        let dz = (self.z - other.z) as i64;
        dx * dx + dz * dz
    }
}

/// Dimensions of the dense cell grid.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct GridDimensions {
    /// Number of columns along the `x` axis.
    pub width: i32,
    /// Number of floors along the `y` axis.
    pub depth: i32,
    /// Number of rows along the `z` axis.
    pub height: i32,
}

impl GridDimensions {
    /// Creates a new dimension triple.
    #[must_use]
    pub const fn new(width: i32, depth: i32, height: i32) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    /// Fails on any non-positive axis; the grid must hold at least one cell.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (axis, value) in [
            ("width", self.width),
            ("depth", self.depth),
            ("height", self.height),
        ] {
            if value <= 0 {
                return Err(ConfigError::NonPositiveDimension { axis, value });
            }
        }
        Ok(())
    }
}

/// A point on the floor plane expressed in world units.
///
/// The vertical axis is owned by the excluded presentation layer; the core
/// only ever reasons about planar positions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct WorldPos {
    x: f32,
    z: f32,
}

impl WorldPos {
    /// Creates a new world-space point.
    #[must_use]
    pub const fn new(x: f32, z: f32) -> Self {
        Self { x, z }
    }

    /// Horizontal component of the point.
    #[must_use]
    pub const fn x(&self) -> f32 {
        self.x
    }

    /// Depth component of the point.
    #[must_use]
    pub const fn z(&self) -> f32 {
        self.z
    }

    /// Squared planar distance to another point.
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dz = self.z - other.z;
        dx * dx + dz * dz
    }

    /// Planar distance to another point.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }
}

/// Order-independent identifier of the undirected edge between two adjacent
/// cells.
///
/// Both cells flanking an edge visit it during boundary synthesis (or one
/// cell visits it with an out-of-bounds neighbor); canonicalizing the pair by
/// coordinate order guarantees each physical edge is processed exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EdgeKey {
    lo: GridCoord,
    hi: GridCoord,
}

impl EdgeKey {
    /// Builds the canonical key for the edge between two cells. The argument
    /// order never matters; out-of-bounds coordinates are fine since they are
    /// still well-defined values.
    #[must_use]
    pub fn between(a: GridCoord, b: GridCoord) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// Lexicographically smaller endpoint of the edge.
    #[must_use]
    pub const fn lo(&self) -> GridCoord {
        self.lo
    }

    /// Lexicographically larger endpoint of the edge.
    #[must_use]
    pub const fn hi(&self) -> GridCoord {
        self.hi
    }
}

/// Kind of object staged on a room cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectKind {
    /// Harmless set dressing.
    Decor,
    /// A trap the gameplay layer arms against the player.
    Trap,
}

/// Discrete placement request emitted by boundary synthesis.
///
/// The instantiation layer drains these in order after generation completes;
/// they are queued data, never callbacks issued mid-generation. Wall and door
/// orientation follows from `edge` alone: north/south edges take one rotation,
/// east/west the other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LayoutEvent {
    /// A wall segment closes off `edge` of `cell`.
    WallPlaced {
        /// Floor cell the wall borders.
        cell: GridCoord,
        /// Which cardinal edge of the cell carries the wall.
        edge: Direction,
    },
    /// A doorway joins a hall and a room across `edge` of `cell`.
    DoorPlaced {
        /// Floor cell the door borders.
        cell: GridCoord,
        /// Which cardinal edge of the cell carries the door.
        edge: Direction,
    },
    /// An object occupies a room cell, promoting it to
    /// [`MapElement::RoomWithObject`].
    ObjectPlaced {
        /// Room cell the object occupies.
        cell: GridCoord,
        /// What was placed there.
        kind: ObjectKind,
    },
}

/// Inclusive side-length range for stamped room rectangles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SideRange {
    /// Smallest permitted side length in cells.
    pub min: i32,
    /// Largest permitted side length in cells.
    pub max: i32,
}

impl SideRange {
    /// Creates a new inclusive range.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        Self { min, max }
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min < 1 {
            return Err(ConfigError::NonPositiveDimension {
                axis: field,
                value: self.min,
            });
        }
        if self.min > self.max {
            return Err(ConfigError::InvertedRange {
                field,
                min: self.min,
                max: self.max,
            });
        }
        Ok(())
    }
}

/// Tuning for the hallway painter's biased random walk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PaintConfig {
    /// Number of hall cells the walk may place; decrements only on success.
    pub paint_budget: u32,
    /// Probability of first retrying the previous heading each step.
    pub directional_stickiness: f64,
    /// Independent per-step probability of restarting from a fresh trunk.
    pub jump_chance_per_step: f64,
    /// Upper bound on trunk restarts; guarantees termination when stuck.
    pub max_jumps: u32,
    /// Sampling attempts when hunting for a trunk with room to grow.
    pub trunk_pick_attempts: u32,
    /// Most existing hall neighbors a new hall cell may touch. The same cap
    /// bounds how many neighbors an existing hall cell may accumulate, so the
    /// finished grid never holds a hall cell with more than `cap + 1` hall
    /// neighbors.
    pub max_hall_neighbors: u32,
}

impl Default for PaintConfig {
    fn default() -> Self {
        Self {
            paint_budget: 500,
            directional_stickiness: 0.7,
            jump_chance_per_step: 0.02,
            max_jumps: 200,
            trunk_pick_attempts: 200,
            max_hall_neighbors: 1,
        }
    }
}

impl PaintConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        probability("directional_stickiness", self.directional_stickiness)?;
        probability("jump_chance_per_step", self.jump_chance_per_step)?;
        attempts("trunk_pick_attempts", self.trunk_pick_attempts)?;
        if self.max_hall_neighbors == 0 {
            return Err(ConfigError::ZeroBudget {
                field: "max_hall_neighbors",
            });
        }
        Ok(())
    }
}

/// Tuning for room stamping during and after the paint walk.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct RoomConfig {
    /// Fewest rooms a finished map should carry, starter room included.
    pub min_rooms: u32,
    /// Most rooms the walk will aim for.
    pub max_rooms: u32,
    /// Per-paint-step probability of anchoring a room off the current hall.
    pub attempt_chance_per_paint_step: f64,
    /// Permitted room widths.
    pub width_range: SideRange,
    /// Permitted room heights.
    pub height_range: SideRange,
    /// Anchor samples granted to forced placement when the walk falls short.
    pub placement_attempts: u32,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            min_rooms: 6,
            max_rooms: 12,
            attempt_chance_per_paint_step: 0.03,
            width_range: SideRange::new(3, 7),
            height_range: SideRange::new(3, 7),
            placement_attempts: 200,
        }
    }
}

impl RoomConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.min_rooms == 0 {
            return Err(ConfigError::ZeroBudget { field: "min_rooms" });
        }
        if self.min_rooms > self.max_rooms {
            return Err(ConfigError::InvertedRange {
                field: "room count",
                min: self.min_rooms as i32,
                max: self.max_rooms as i32,
            });
        }
        probability(
            "attempt_chance_per_paint_step",
            self.attempt_chance_per_paint_step,
        )?;
        self.width_range.validate("room width")?;
        self.height_range.validate("room height")?;
        attempts("placement_attempts", self.placement_attempts)?;
        Ok(())
    }
}

/// Tuning for boundary synthesis over the finished grid.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// Per-visit probability that a hall/room boundary receives a door.
    pub door_chance: f64,
    /// Probability that an eligible interior room cell receives an object.
    pub object_chance: f64,
    /// Share of placed objects that are traps rather than decor.
    pub trap_weight: f64,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            door_chance: 1.0,
            object_chance: 0.3,
            trap_weight: 0.25,
        }
    }
}

impl BoundaryConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        probability("door_chance", self.door_chance)?;
        probability("object_chance", self.object_chance)?;
        probability("trap_weight", self.trap_weight)?;
        Ok(())
    }
}

/// Tuning for enemy and note spawn selection.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpawnConfig {
    /// Minimum enemy distance from the player in whole tiles.
    pub min_enemy_distance_tiles: i32,
    /// Biased samples granted before the farthest-cell fallback engages.
    pub enemy_spawn_attempts: u32,
    /// Probability an enemy sample draws from room cells instead of halls.
    pub enemy_room_bias: f64,
    /// Number of narrative notes to scatter, one per map corner, at most four.
    pub note_count: u32,
    /// Chebyshev radius searched around each corner anchor.
    pub note_corner_radius: i32,
    /// Samples granted per corner before quadrant fallback engages.
    pub note_corner_attempts: u32,
    /// Minimum note distance from the player in whole tiles.
    pub note_min_player_distance_tiles: i32,
    /// Uniform jitter added to squared-distance scores so equal-seed runs do
    /// not cluster notes against the same corner walls.
    pub note_score_jitter: f64,
}

impl Default for SpawnConfig {
    fn default() -> Self {
        Self {
            min_enemy_distance_tiles: 12,
            enemy_spawn_attempts: 300,
            enemy_room_bias: 0.7,
            note_count: 4,
            note_corner_radius: 3,
            note_corner_attempts: 40,
            note_min_player_distance_tiles: 8,
            note_score_jitter: 4.0,
        }
    }
}

impl SpawnConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        probability("enemy_room_bias", self.enemy_room_bias)?;
        attempts("enemy_spawn_attempts", self.enemy_spawn_attempts)?;
        attempts("note_corner_attempts", self.note_corner_attempts)?;
        if self.note_count > 4 {
            return Err(ConfigError::TooManyNotes {
                value: self.note_count,
            });
        }
        for (field, value) in [
            (
                "min_enemy_distance_tiles",
                f64::from(self.min_enemy_distance_tiles),
            ),
            ("note_corner_radius", f64::from(self.note_corner_radius)),
            (
                "note_min_player_distance_tiles",
                f64::from(self.note_min_player_distance_tiles),
            ),
            ("note_score_jitter", self.note_score_jitter),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeParameter { field, value });
            }
        }
        Ok(())
    }
}

/// Complete configuration for one generation run.
///
/// Validation is fail-fast and happens once at generation start; everything
/// downstream may assume the values are coherent.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GenerationConfig {
    /// Cell grid dimensions.
    pub dimensions: GridDimensions,
    /// Side length of one square cell in world units.
    pub tile_length: f32,
    /// Root seed for every stage of the run; identical seeds replay
    /// identical maps.
    pub seed: u64,
    /// Hallway painter tuning.
    pub paint: PaintConfig,
    /// Room stamping tuning.
    pub rooms: RoomConfig,
    /// Boundary synthesis tuning.
    pub boundary: BoundaryConfig,
    /// Spawn planning tuning.
    pub spawns: SpawnConfig,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            dimensions: GridDimensions::new(30, 1, 30),
            tile_length: 5.0,
            seed: 0,
            paint: PaintConfig::default(),
            rooms: RoomConfig::default(),
            boundary: BoundaryConfig::default(),
            spawns: SpawnConfig::default(),
        }
    }
}

impl GenerationConfig {
    /// Validates every tuning section, reporting the first inconsistency.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.dimensions.validate()?;
        if !(self.tile_length > 0.0) {
            return Err(ConfigError::NonPositiveTileLength {
                value: self.tile_length,
            });
        }
        self.paint.validate()?;
        self.rooms.validate()?;
        self.boundary.validate()?;
        self.spawns.validate()?;
        Ok(())
    }
}

/// Tuning for the pursuer's chase/wander control loop.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct PursuitConfig {
    /// Elapsed time required between next-step recomputations.
    pub repath_cooldown: Duration,
    /// Default time for a full aggro charge to decay back to zero.
    pub aggression_decay: Duration,
    /// Chase speed at zero aggression, world units per second.
    pub aggro_speed_min: f32,
    /// Chase speed at full aggression, world units per second.
    pub aggro_speed_max: f32,
    /// Fixed speed used inside the close-chase ring.
    pub close_chase_speed: f32,
    /// Hop-count radius that forces chase mode and the close-chase speed.
    pub close_chase_tiles: i32,
    /// Farthest the pursuer can see, in world units.
    pub los_max_distance: f32,
    /// Straight-line speed while the player is directly visible.
    pub los_chase_speed: f32,
    /// Movement speed while wandering.
    pub wander_speed: f32,
    /// Elapsed time between wander-goal re-picks.
    pub wander_pick_cooldown: Duration,
    /// Samples granted per wander-goal pick.
    pub wander_pick_attempts: u32,
    /// Minimum Manhattan distance a wander goal must keep from the pursuer.
    pub wander_min_manhattan: i32,
    /// Arrival tolerance around the wander goal in tiles; zero requires the
    /// exact goal cell.
    pub wander_goal_arrive_tiles: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            repath_cooldown: Duration::from_millis(50),
            aggression_decay: Duration::from_secs(15),
            aggro_speed_min: 3.0,
            aggro_speed_max: 5.0,
            close_chase_speed: 3.0,
            close_chase_tiles: 3,
            los_max_distance: 999.0,
            los_chase_speed: 5.0,
            wander_speed: 4.0,
            wander_pick_cooldown: Duration::from_secs(1),
            wander_pick_attempts: 200,
            wander_min_manhattan: 6,
            wander_goal_arrive_tiles: 0.0,
        }
    }
}

impl PursuitConfig {
    /// Validates speeds, budgets, and decay tuning.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, value) in [
            ("aggro_speed_min", self.aggro_speed_min),
            ("aggro_speed_max", self.aggro_speed_max),
            ("close_chase_speed", self.close_chase_speed),
            ("los_chase_speed", self.los_chase_speed),
            ("wander_speed", self.wander_speed),
            ("los_max_distance", self.los_max_distance),
        ] {
            if !(value > 0.0) {
                return Err(ConfigError::NonPositiveSpeed { field, value });
            }
        }
        if self.aggression_decay.is_zero() {
            return Err(ConfigError::ZeroDecay);
        }
        attempts("wander_pick_attempts", self.wander_pick_attempts)?;
        for (field, value) in [
            ("close_chase_tiles", f64::from(self.close_chase_tiles)),
            ("wander_min_manhattan", f64::from(self.wander_min_manhattan)),
            (
                "wander_goal_arrive_tiles",
                f64::from(self.wander_goal_arrive_tiles),
            ),
        ] {
            if value < 0.0 {
                return Err(ConfigError::NegativeParameter { field, value });
            }
        }
        Ok(())
    }
}

/// Configuration mistakes detected before any generation work begins.
///
/// These are caller errors and intentionally unrecoverable; placement
/// failures during generation are handled by retry and fallback policies
/// instead and never surface here.
#[derive(Clone, Debug, PartialEq, Error)]
pub enum ConfigError {
    /// A grid axis or side length was zero or negative.
    #[error("{axis} must be positive, got {value}")]
    NonPositiveDimension {
        /// Which dimension was rejected.
        axis: &'static str,
        /// The offending value.
        value: i32,
    },
    /// The world-units-per-cell factor was zero, negative, or NaN.
    #[error("tile length must be positive, got {value}")]
    NonPositiveTileLength {
        /// The offending value.
        value: f32,
    },
    /// A min/max pair was supplied in the wrong order.
    #[error("{field} range is inverted: min {min} exceeds max {max}")]
    InvertedRange {
        /// Which range was rejected.
        field: &'static str,
        /// Lower bound as supplied.
        min: i32,
        /// Upper bound as supplied.
        max: i32,
    },
    /// A probability fell outside the unit interval.
    #[error("{field} must lie in 0.0..=1.0, got {value}")]
    ProbabilityOutOfRange {
        /// Which probability was rejected.
        field: &'static str,
        /// The offending value.
        value: f64,
    },
    /// An attempt or count budget that must be positive was zero.
    #[error("{field} must be positive")]
    ZeroBudget {
        /// Which budget was rejected.
        field: &'static str,
    },
    /// A speed or distance that must be positive was not.
    #[error("{field} must be positive, got {value}")]
    NonPositiveSpeed {
        /// Which parameter was rejected.
        field: &'static str,
        /// The offending value.
        value: f32,
    },
    /// A parameter that must not be negative was negative.
    #[error("{field} must not be negative, got {value}")]
    NegativeParameter {
        /// Which parameter was rejected.
        field: &'static str,
        /// The offending value.
        value: f64,
    },
    /// More notes were requested than the map has corners.
    #[error("note count must not exceed the four map corners, got {value}")]
    TooManyNotes {
        /// The offending value.
        value: u32,
    },
    /// The aggro decay duration was zero.
    #[error("aggression decay must be positive")]
    ZeroDecay,
}

fn probability(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::ProbabilityOutOfRange { field, value })
    }
}

fn attempts(field: &'static str, value: u32) -> Result<(), ConfigError> {
    if value == 0 {
        Err(ConfigError::ZeroBudget { field })
    } else {
        Ok(())
    }
}
