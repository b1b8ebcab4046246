#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative cell-classification store for Hollow Halls.
//!
//! The [`GridMap`] is written exclusively by the generation pipeline and
//! shared immutably afterwards; runtime consumers (pursuit, presentation)
//! only ever hold `&GridMap`. There is no interior mutability and no
//! post-generation write path beyond what the pipeline itself uses, so the
//! single-threaded read-only contract is enforced by ownership rather than
//! by a runtime flag.

use hollow_halls_core::{ConfigError, GridCoord, GridDimensions, MapElement, WorldPos};
use rand::Rng;

/// Dense grid of cell classifications with the ancillary placement-order
/// lists the spawn planner samples from.
///
/// Cells are stored in a single flattened array indexed by coordinate; the
/// coordinate is always derivable from the index, so nothing is stored per
/// cell beyond its [`MapElement`].
#[derive(Clone, Debug)]
pub struct GridMap {
    dimensions: GridDimensions,
    tile_length: f32,
    cells: Vec<MapElement>,
    hall_cells: Vec<GridCoord>,
    room_cells: Vec<GridCoord>,
}

impl GridMap {
    /// Allocates a fully [`MapElement::Empty`] grid.
    ///
    /// Fails only on non-positive dimensions or tile length; this is the
    /// fail-fast half of the error policy, everything later degrades
    /// gracefully instead.
    pub fn new(dimensions: GridDimensions, tile_length: f32) -> Result<Self, ConfigError> {
        dimensions.validate()?;
        if !(tile_length > 0.0) {
            return Err(ConfigError::NonPositiveTileLength { value: tile_length });
        }
        let cell_count = dimensions.width as usize
            * dimensions.depth as usize
            * dimensions.height as usize;
        Ok(Self {
            dimensions,
            tile_length,
            cells: vec![MapElement::Empty; cell_count],
            hall_cells: Vec::new(),
            room_cells: Vec::new(),
        })
    }

    /// Dimensions the grid was allocated with.
    #[must_use]
    pub const fn dimensions(&self) -> GridDimensions {
        self.dimensions
    }

    /// Side length of one square cell in world units.
    #[must_use]
    pub const fn tile_length(&self) -> f32 {
        self.tile_length
    }

    /// Strict half-open bounds check on all three axes.
    #[must_use]
    pub const fn in_bounds(&self, cell: GridCoord) -> bool {
        cell.x() >= 0
            && cell.x() < self.dimensions.width
            && cell.y() >= 0
            && cell.y() < self.dimensions.depth
            && cell.z() >= 0
            && cell.z() < self.dimensions.height
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if !self.in_bounds(cell) {
            return None;
        }
        let width = self.dimensions.width as usize;
        let height = self.dimensions.height as usize;
        Some((cell.y() as usize * height + cell.z() as usize) * width + cell.x() as usize)
    }

    /// Classification of the cell; out-of-bounds coordinates report
    /// [`MapElement::Empty`] so edge logic needs no bounds branch.
    #[must_use]
    pub fn classify(&self, cell: GridCoord) -> MapElement {
        self.index(cell)
            .map_or(MapElement::Empty, |index| self.cells[index])
    }

    /// Writes a classification into an `Empty` cell, recording it in the
    /// matching placement list.
    ///
    /// Out-of-bounds targets and cells that already carry a classification
    /// are silently left alone; the painter and room placer rely on this to
    /// attempt placements without pre-validating every call site. Returns
    /// whether the write landed.
    pub fn set_element(&mut self, cell: GridCoord, element: MapElement) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        if self.cells[index] != MapElement::Empty || element == MapElement::Empty {
            return false;
        }
        self.cells[index] = element;
        match element {
            MapElement::Hall => self.hall_cells.push(cell),
            MapElement::Room => self.room_cells.push(cell),
            _ => {}
        }
        true
    }

    /// Promotes a `Room` cell to `RoomWithObject` when boundary synthesis
    /// stages an object on it.
    ///
    /// This is the single sanctioned reclassification of a non-`Empty` cell;
    /// the cell stays in the room placement list and is filtered out of
    /// walkable queries instead. Returns whether the promotion landed.
    pub fn promote_to_object(&mut self, cell: GridCoord) -> bool {
        let Some(index) = self.index(cell) else {
            return false;
        };
        if self.cells[index] != MapElement::Room {
            return false;
        }
        self.cells[index] = MapElement::RoomWithObject;
        true
    }

    /// Reports whether agents may stand on the cell: halls and unoccupied
    /// rooms only, everything else (including out-of-bounds) blocks.
    #[must_use]
    pub fn is_walkable(&self, cell: GridCoord) -> bool {
        self.classify(cell).is_walkable()
    }

    /// Every hall cell in placement order.
    #[must_use]
    pub fn hall_cells(&self) -> &[GridCoord] {
        &self.hall_cells
    }

    /// Every room cell in placement order, including cells later promoted to
    /// `RoomWithObject`.
    #[must_use]
    pub fn room_cells(&self) -> &[GridCoord] {
        &self.room_cells
    }

    /// World-space center of the cell.
    #[must_use]
    pub fn cell_center_world(&self, cell: GridCoord) -> WorldPos {
        WorldPos::new(
            cell.x() as f32 * self.tile_length,
            cell.z() as f32 * self.tile_length,
        )
    }

    /// Cell containing the world-space point, rounding to the nearest cell
    /// center on the ground floor.
    #[must_use]
    pub fn world_to_cell(&self, position: WorldPos) -> GridCoord {
        GridCoord::new(
            (position.x() / self.tile_length).round() as i32,
            0,
            (position.z() / self.tile_length).round() as i32,
        )
    }

    /// Uniform rejection sample for a walkable ground-floor cell.
    ///
    /// Used by the wander goal picker: `avoid` rejects one cell outright and,
    /// together with `min_manhattan`, rejects everything too close to it.
    /// Returns `None` once the attempt budget is exhausted.
    pub fn try_random_walkable_cell<R: Rng>(
        &self,
        rng: &mut R,
        attempts: u32,
        avoid: Option<GridCoord>,
        min_manhattan: i32,
    ) -> Option<GridCoord> {
        for _ in 0..attempts {
            let candidate = GridCoord::new(
                rng.gen_range(0..self.dimensions.width),
                0,
                rng.gen_range(0..self.dimensions.height),
            );
            if !self.is_walkable(candidate) {
                continue;
            }
            if let Some(avoid) = avoid {
                if candidate == avoid {
                    continue;
                }
                if min_manhattan > 0 && candidate.manhattan_distance(avoid) < min_manhattan {
                    continue;
                }
            }
            return Some(candidate);
        }
        None
    }
}
