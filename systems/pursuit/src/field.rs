//! Breadth-first distance field over the map footprint.

use std::collections::VecDeque;

use hollow_halls_core::GridCoord;
use hollow_halls_world::GridMap;

/// Marker stored for cells no walkable path reaches from the source.
const UNREACHABLE: i32 = -1;

/// Dense map of shortest walkable hop counts from a single source cell.
///
/// The field covers the grid footprint on the source's floor; `-1` marks
/// unreachable cells, `0` the source itself. It is rebuilt wholesale whenever
/// its owner's source cell changes; maps are small and rebuilds happen only
/// on discrete cell-crossing events, so there is no incremental update path.
/// A freshly constructed field answers every query with `None`.
#[derive(Clone, Debug, Default)]
pub struct DistanceField {
    width: i32,
    height: i32,
    floor: i32,
    distances: Vec<i32>,
}

impl DistanceField {
    /// Creates an empty field that reports every cell as not found until the
    /// first [`build_from`](Self::build_from).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuilds the field from scratch via breadth-first search out of
    /// `source` over 4-connected walkable neighbors.
    ///
    /// Breadth-first order guarantees the first visit writes the minimal hop
    /// count, so no relaxation pass is needed. A non-walkable or out-of-bounds
    /// source leaves the whole field unreachable.
    pub fn build_from(&mut self, grid: &GridMap, source: GridCoord) {
        let dimensions = grid.dimensions();
        self.width = dimensions.width;
        self.height = dimensions.height;
        self.floor = source.y();

        let cell_count = self.width as usize * self.height as usize;
        if self.distances.len() != cell_count {
            self.distances = vec![UNREACHABLE; cell_count];
        } else {
            self.distances.fill(UNREACHABLE);
        }

        if !grid.is_walkable(source) {
            return;
        }

        let Some(source_index) = self.index(source) else {
            return;
        };
        self.distances[source_index] = 0;

        let mut queue = VecDeque::new();
        queue.push_back(source);

        while let Some(cell) = queue.pop_front() {
            let Some(cell_index) = self.index(cell) else {
                continue;
            };
            let here = self.distances[cell_index];
            for neighbor in cell.neighbors4() {
                if !grid.is_walkable(neighbor) {
                    continue;
                }
                let Some(neighbor_index) = self.index(neighbor) else {
                    continue;
                };
                if self.distances[neighbor_index] != UNREACHABLE {
                    continue;
                }
                self.distances[neighbor_index] = here + 1;
                queue.push_back(neighbor);
            }
        }
    }

    /// Hop count from the source to `cell`; `None` when the cell is outside
    /// the footprint, on another floor, unreachable, or the field has never
    /// been built.
    #[must_use]
    pub fn distance(&self, cell: GridCoord) -> Option<i32> {
        let index = self.index(cell)?;
        match self.distances.get(index).copied() {
            Some(UNREACHABLE) | None => None,
            found => found,
        }
    }

    /// One steepest-descent step: the walkable 4-neighbor with the smallest
    /// hop count strictly below the current cell's.
    ///
    /// Returns `None` when the current cell has no distance, already sits on
    /// the source, or no neighbor improves on it; callers treat that as "no
    /// decision this tick". From any reachable cell, repeated descent reaches
    /// the source in exactly the starting hop count.
    #[must_use]
    pub fn descend_from(&self, grid: &GridMap, cell: GridCoord) -> Option<GridCoord> {
        let mut best_distance = self.distance(cell)?;
        if best_distance == 0 {
            return None;
        }

        let mut best = None;
        for neighbor in cell.neighbors4() {
            if !grid.is_walkable(neighbor) {
                continue;
            }
            let Some(neighbor_distance) = self.distance(neighbor) else {
                continue;
            };
            if neighbor_distance < best_distance {
                best_distance = neighbor_distance;
                best = Some(neighbor);
            }
        }

        best
    }

    fn index(&self, cell: GridCoord) -> Option<usize> {
        if cell.y() != self.floor
            || cell.x() < 0
            || cell.x() >= self.width
            || cell.z() < 0
            || cell.z() >= self.height
        {
            return None;
        }
        Some(cell.z() as usize * self.width as usize + cell.x() as usize)
    }
}
