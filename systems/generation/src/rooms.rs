//! Rectangle room stamping anchored off hall cells.
//!
//! Rooms are only ever placed against an existing corridor, with the cell
//! between the anchor and the rectangle acting as the doorway. Anchoring off
//! halls is what guarantees every room is reachable without a separate
//! connectivity pass.

use hollow_halls_core::{Direction, GridCoord, MapElement, RoomConfig};
use hollow_halls_world::GridMap;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

/// Tries to stamp one room off the given hall anchor.
///
/// Directions are tried in shuffled order; each needs an empty door cell
/// adjacent to the anchor, and the rectangle grown outward from that door
/// must sit fully in bounds on fully empty cells. The door's position along
/// the room edge is randomized so doorways are not always centered.
pub(crate) fn try_stamp_from_hall(
    grid: &mut GridMap,
    anchor: GridCoord,
    config: &RoomConfig,
    rng: &mut ChaCha8Rng,
) -> bool {
    let mut directions = Direction::ALL;
    directions.shuffle(rng);

    for direction in directions {
        let door = anchor.offset(direction);
        if !grid.in_bounds(door) || grid.classify(door) != MapElement::Empty {
            continue;
        }

        let width = rng.gen_range(config.width_range.min..=config.width_range.max);
        let height = rng.gen_range(config.height_range.min..=config.height_range.max);
        let lateral = match direction {
            Direction::North | Direction::South => width,
            Direction::East | Direction::West => height,
        };
        let lateral_offset = rng.gen_range(0..lateral);

        let (x0, x1, z0, z1) = match direction {
            Direction::North => {
                let z0 = door.z();
                let x0 = door.x() - lateral_offset;
                (x0, x0 + width - 1, z0, z0 + height - 1)
            }
            Direction::South => {
                let z1 = door.z();
                let x0 = door.x() - lateral_offset;
                (x0, x0 + width - 1, z1 - (height - 1), z1)
            }
            Direction::East => {
                let x0 = door.x();
                let z0 = door.z() - lateral_offset;
                (x0, x0 + width - 1, z0, z0 + height - 1)
            }
            Direction::West => {
                let x1 = door.x();
                let z0 = door.z() - lateral_offset;
                (x1 - (width - 1), x1, z0, z0 + height - 1)
            }
        };

        if !rect_in_bounds(grid, anchor.y(), x0, x1, z0, z1) {
            continue;
        }
        if !rect_empty(grid, anchor.y(), x0, x1, z0, z1) {
            continue;
        }

        for x in x0..=x1 {
            for z in z0..=z1 {
                let _ = grid.set_element(GridCoord::new(x, anchor.y(), z), MapElement::Room);
            }
        }
        return true;
    }

    false
}

/// Stamps up to `deficit` additional rooms off random hall anchors.
///
/// Under-fulfillment is a logged warning, never an error: the run proceeds
/// with a sparser map.
pub(crate) fn force_place(
    grid: &mut GridMap,
    deficit: u32,
    config: &RoomConfig,
    rng: &mut ChaCha8Rng,
) -> u32 {
    let mut placed = 0u32;

    for _ in 0..config.placement_attempts {
        if placed >= deficit || grid.hall_cells().is_empty() {
            break;
        }
        let anchor = grid.hall_cells()[rng.gen_range(0..grid.hall_cells().len())];
        if try_stamp_from_hall(grid, anchor, config, rng) {
            placed += 1;
        }
    }

    if placed < deficit {
        tracing::warn!(
            placed,
            requested = deficit,
            "forced room placement fell short; raise the paint budget, \
             placement attempts, or loosen the room size ranges"
        );
    }

    placed
}

fn rect_in_bounds(grid: &GridMap, y: i32, x0: i32, x1: i32, z0: i32, z1: i32) -> bool {
    grid.in_bounds(GridCoord::new(x0, y, z0)) && grid.in_bounds(GridCoord::new(x1, y, z1))
}

fn rect_empty(grid: &GridMap, y: i32, x0: i32, x1: i32, z0: i32, z1: i32) -> bool {
    for x in x0..=x1 {
        for z in z0..=z1 {
            if grid.classify(GridCoord::new(x, y, z)) != MapElement::Empty {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use hollow_halls_core::GridDimensions;
    use rand::SeedableRng;

    #[test]
    fn stamped_rooms_touch_their_anchor_through_the_door() {
        let mut grid = GridMap::new(GridDimensions::new(20, 1, 20), 1.0).expect("valid");
        let anchor = GridCoord::new(10, 0, 10);
        assert!(grid.set_element(anchor, MapElement::Hall));

        let config = RoomConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        assert!(try_stamp_from_hall(&mut grid, anchor, &config, &mut rng));

        let door_count = anchor
            .neighbors4()
            .into_iter()
            .filter(|cell| grid.classify(*cell) == MapElement::Room)
            .count();
        assert!(door_count >= 1, "the room must reach the anchor");

        let width_span = config.width_range.max;
        let room_cells = grid.room_cells().len() as i32;
        assert!(room_cells >= config.width_range.min * config.height_range.min);
        assert!(room_cells <= width_span * config.height_range.max);
    }

    #[test]
    fn stamping_fails_when_every_direction_is_blocked() {
        let mut grid = GridMap::new(GridDimensions::new(5, 1, 5), 1.0).expect("valid");
        let anchor = GridCoord::new(2, 0, 2);
        assert!(grid.set_element(anchor, MapElement::Hall));
        for neighbor in anchor.neighbors4() {
            assert!(grid.set_element(neighbor, MapElement::Grass));
        }

        let config = RoomConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        assert!(!try_stamp_from_hall(&mut grid, anchor, &config, &mut rng));
        assert!(grid.room_cells().is_empty());
    }

    #[test]
    fn force_place_reports_what_it_achieved() {
        let mut grid = GridMap::new(GridDimensions::new(40, 1, 40), 1.0).expect("valid");
        for x in 5..35 {
            assert!(grid.set_element(GridCoord::new(x, 0, 20), MapElement::Hall));
        }

        let config = RoomConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let placed = force_place(&mut grid, 3, &config, &mut rng);
        assert!(placed >= 1, "a long open corridor accepts rooms");
        assert!(placed <= 3);
    }
}
