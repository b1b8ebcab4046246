//! Wall, door, and object synthesis over the finished grid.
//!
//! A single row-major pass classifies the leftover exterior as grass,
//! stages objects on interior room cells, and walks every cardinal edge of
//! every floor cell exactly once. Edges are visited from both flanking cells
//! (or once, with an out-of-bounds neighbor), so emission is deduplicated
//! through the order-independent [`EdgeKey`].

use std::collections::HashSet;

use hollow_halls_core::{
    BoundaryConfig, Direction, EdgeKey, GridCoord, LayoutEvent, MapElement, ObjectKind,
};
use hollow_halls_world::GridMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Runs the boundary pass, returning the ordered placement queue.
///
/// `player_start` never receives an object, whatever the rolls say; the
/// player must materialize on a clear cell.
pub(crate) fn synthesize(
    grid: &mut GridMap,
    config: &BoundaryConfig,
    player_start: GridCoord,
    rng: &mut ChaCha8Rng,
) -> Vec<LayoutEvent> {
    let mut events = Vec::new();
    let mut door_edges: HashSet<EdgeKey> = HashSet::new();
    let mut wall_edges: HashSet<EdgeKey> = HashSet::new();

    let dimensions = grid.dimensions();
    for x in 0..dimensions.width {
        for z in 0..dimensions.height {
            let cell = GridCoord::new(x, 0, z);
            let here = grid.classify(cell);

            if !here.is_floor_like() {
                let _ = grid.set_element(cell, MapElement::Grass);
                continue;
            }

            // Objects go on room cells the corridor does not touch, and the
            // promotion must land before this cell's edges are walked.
            if here.is_room_like()
                && cell != player_start
                && !touches_hall(grid, cell)
                && rng.gen_bool(config.object_chance)
            {
                let kind = if rng.gen_bool(config.trap_weight) {
                    ObjectKind::Trap
                } else {
                    ObjectKind::Decor
                };
                if grid.promote_to_object(cell) {
                    events.push(LayoutEvent::ObjectPlaced { cell, kind });
                }
            }

            for edge in Direction::ALL {
                try_place_door(grid, cell, edge, config, rng, &mut door_edges, &mut events);
            }
            for edge in Direction::ALL {
                try_place_wall(grid, cell, edge, &mut wall_edges, &mut events);
            }
        }
    }

    events
}

fn touches_hall(grid: &GridMap, cell: GridCoord) -> bool {
    cell.neighbors4()
        .into_iter()
        .any(|neighbor| grid.classify(neighbor) == MapElement::Hall)
}

/// Doors join a hall and a room across one edge. The probability gate rolls
/// per visit, so an edge skipped from one side may still gain its door when
/// the flanking cell comes around; the dedup set only registers emissions.
fn try_place_door(
    grid: &GridMap,
    cell: GridCoord,
    edge: Direction,
    config: &BoundaryConfig,
    rng: &mut ChaCha8Rng,
    door_edges: &mut HashSet<EdgeKey>,
    events: &mut Vec<LayoutEvent>,
) {
    if !rng.gen_bool(config.door_chance) {
        return;
    }

    let neighbor = cell.offset(edge);
    if !grid.in_bounds(neighbor) {
        return;
    }

    let here = grid.classify(cell);
    let there = grid.classify(neighbor);
    let boundary = (here == MapElement::Hall && there.is_room_like())
        || (here.is_room_like() && there == MapElement::Hall);
    if !boundary {
        return;
    }

    if !door_edges.insert(EdgeKey::between(cell, neighbor)) {
        return;
    }
    events.push(LayoutEvent::DoorPlaced { cell, edge });
}

/// Walls close every floor edge whose neighbor carries no floor, including
/// edges against the map border.
fn try_place_wall(
    grid: &GridMap,
    cell: GridCoord,
    edge: Direction,
    wall_edges: &mut HashSet<EdgeKey>,
    events: &mut Vec<LayoutEvent>,
) {
    let neighbor = cell.offset(edge);
    if grid.classify(neighbor).is_floor_like() {
        return;
    }

    if !wall_edges.insert(EdgeKey::between(cell, neighbor)) {
        return;
    }
    events.push(LayoutEvent::WallPlaced { cell, edge });
}

#[cfg(test)]
mod tests {
    use super::*;
    use hollow_halls_core::GridDimensions;
    use rand::SeedableRng;

    fn single_hall_map() -> GridMap {
        let mut grid = GridMap::new(GridDimensions::new(3, 1, 3), 1.0).expect("valid");
        assert!(grid.set_element(GridCoord::new(1, 0, 1), MapElement::Hall));
        grid
    }

    #[test]
    fn isolated_hall_cell_is_walled_on_all_sides() {
        let mut grid = single_hall_map();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let events = synthesize(&mut grid, &BoundaryConfig::default(), GridCoord::new(0, 0, 0), &mut rng);

        let walls: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, LayoutEvent::WallPlaced { .. }))
            .collect();
        assert_eq!(walls.len(), 4);
        assert!(!events
            .iter()
            .any(|event| matches!(event, LayoutEvent::DoorPlaced { .. })));
    }

    #[test]
    fn leftover_cells_become_grass() {
        let mut grid = single_hall_map();
        let mut rng = ChaCha8Rng::seed_from_u64(2);
        let _ = synthesize(&mut grid, &BoundaryConfig::default(), GridCoord::new(0, 0, 0), &mut rng);

        for x in 0..3 {
            for z in 0..3 {
                let cell = GridCoord::new(x, 0, z);
                if cell == GridCoord::new(1, 0, 1) {
                    assert_eq!(grid.classify(cell), MapElement::Hall);
                } else {
                    assert_eq!(grid.classify(cell), MapElement::Grass);
                }
            }
        }
    }

    #[test]
    fn hall_room_boundary_gains_exactly_one_door() {
        let mut grid = GridMap::new(GridDimensions::new(4, 1, 3), 1.0).expect("valid");
        assert!(grid.set_element(GridCoord::new(1, 0, 1), MapElement::Hall));
        assert!(grid.set_element(GridCoord::new(2, 0, 1), MapElement::Room));

        let config = BoundaryConfig {
            door_chance: 1.0,
            object_chance: 0.0,
            trap_weight: 0.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let events = synthesize(&mut grid, &config, GridCoord::new(0, 0, 0), &mut rng);

        let doors: Vec<_> = events
            .iter()
            .filter(|event| matches!(event, LayoutEvent::DoorPlaced { .. }))
            .collect();
        assert_eq!(doors.len(), 1, "the shared edge must emit a single door");
    }

    #[test]
    fn corridor_adjacent_rooms_never_take_objects() {
        let mut grid = GridMap::new(GridDimensions::new(4, 1, 3), 1.0).expect("valid");
        assert!(grid.set_element(GridCoord::new(1, 0, 1), MapElement::Hall));
        assert!(grid.set_element(GridCoord::new(2, 0, 1), MapElement::Room));

        let config = BoundaryConfig {
            door_chance: 0.0,
            object_chance: 1.0,
            trap_weight: 1.0,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let events = synthesize(&mut grid, &config, GridCoord::new(0, 0, 0), &mut rng);

        assert!(!events
            .iter()
            .any(|event| matches!(event, LayoutEvent::ObjectPlaced { .. })));
        assert_eq!(grid.classify(GridCoord::new(2, 0, 1)), MapElement::Room);
    }
}
