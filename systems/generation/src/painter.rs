//! Biased random-walk hallway painter.
//!
//! Grows a sparse network of one-wide hall corridors from the seeded trunk
//! stubs. The walk prefers to keep its heading (`directional_stickiness`),
//! occasionally teleports to a fresh trunk for coverage, and anchors rooms
//! off the corridor as it goes. Acceptance rules keep corridors one cell
//! wide and bound how many hall neighbors any cell may accumulate.

use hollow_halls_core::{Direction, GridCoord, MapElement, PaintConfig, RoomConfig};
use hollow_halls_world::GridMap;
use rand::seq::SliceRandom;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::{rooms, GenerationReport};

/// Runs the paint walk to completion and settles the room minimum through
/// forced placement.
pub(crate) fn paint(
    grid: &mut GridMap,
    paint: &PaintConfig,
    room_config: &RoomConfig,
    rng: &mut ChaCha8Rng,
) -> GenerationReport {
    let target_rooms = rng.gen_range(room_config.min_rooms..=room_config.max_rooms);
    let mut rooms_placed = u32::from(!grid.room_cells().is_empty());

    let mut report = GenerationReport {
        target_rooms,
        min_rooms: room_config.min_rooms,
        rooms_placed,
        forced_rooms: 0,
        paint_steps: 0,
        jumps: 0,
    };

    let mut budget = paint.paint_budget;
    let mut jumps = 0u32;

    let Some((mut pos, mut heading)) = pick_trunk(grid, paint, rng) else {
        report.rooms_placed = rooms_placed;
        return report;
    };

    while budget > 0 && jumps < paint.max_jumps {
        // Occasionally anchor a room off the corridor, then jump away from
        // it so rooms do not clump along one trunk.
        if rooms_placed < target_rooms
            && rng.gen_bool(room_config.attempt_chance_per_paint_step)
            && grid.classify(pos) == MapElement::Hall
            && rooms::try_stamp_from_hall(grid, pos, room_config, rng)
        {
            rooms_placed += 1;
            if let Some((next_pos, next_heading)) = pick_trunk(grid, paint, rng) {
                pos = next_pos;
                heading = next_heading;
                jumps += 1;
                continue;
            }
        }

        if rng.gen_bool(paint.jump_chance_per_step) {
            match pick_trunk(grid, paint, rng) {
                Some((next_pos, next_heading)) => {
                    pos = next_pos;
                    heading = next_heading;
                    jumps += 1;
                    continue;
                }
                None => break,
            }
        }

        match attempt_hall_step(grid, pos, heading, paint, rng) {
            Some((next_pos, next_heading)) => {
                budget -= 1;
                report.paint_steps += 1;
                pos = next_pos;
                heading = next_heading;
            }
            None => match pick_trunk(grid, paint, rng) {
                Some((next_pos, next_heading)) => {
                    pos = next_pos;
                    heading = next_heading;
                    jumps += 1;
                }
                None => break,
            },
        }
    }

    // Settle the configured minimum if the probabilistic path fell short.
    let min_target = room_config.min_rooms.max(1);
    let deficit = min_target.saturating_sub(rooms_placed);
    if deficit > 0 {
        report.forced_rooms = rooms::force_place(grid, deficit, room_config, rng);
        rooms_placed += report.forced_rooms;
    }

    report.rooms_placed = rooms_placed;
    report.jumps = jumps;
    report
}

/// Samples a hall cell the walk can restart from: one that still has an
/// empty neighbor to grow into and has not already saturated its hall
/// neighbor allowance.
fn pick_trunk(
    grid: &GridMap,
    paint: &PaintConfig,
    rng: &mut ChaCha8Rng,
) -> Option<(GridCoord, Direction)> {
    if grid.hall_cells().is_empty() {
        return None;
    }

    for _ in 0..paint.trunk_pick_attempts {
        let candidate = grid.hall_cells()[rng.gen_range(0..grid.hall_cells().len())];
        if hall_neighbor_count(grid, candidate) > paint.max_hall_neighbors {
            continue;
        }

        let mut directions = Direction::ALL;
        directions.shuffle(rng);
        for direction in directions {
            let next = candidate.offset(direction);
            if grid.in_bounds(next) && grid.classify(next) == MapElement::Empty {
                return Some((candidate, direction));
            }
        }
    }

    None
}

/// Attempts one walk step: stickiness first, then the remaining directions
/// in shuffled order. Returns the new position and heading on success.
fn attempt_hall_step(
    grid: &mut GridMap,
    pos: GridCoord,
    heading: Direction,
    paint: &PaintConfig,
    rng: &mut ChaCha8Rng,
) -> Option<(GridCoord, Direction)> {
    let mut directions: Vec<Direction> = Direction::ALL.to_vec();

    if rng.gen_bool(paint.directional_stickiness) {
        if try_place_hall(grid, pos, heading, paint) {
            return Some((pos.offset(heading), heading));
        }
        directions.retain(|direction| *direction != heading);
    }

    directions.shuffle(rng);
    for direction in directions {
        if try_place_hall(grid, pos, direction, paint) {
            return Some((pos.offset(direction), direction));
        }
    }

    None
}

/// Places a hall cell one step away if every acceptance rule holds:
/// in bounds, empty, no completed 2x2 hall square, and the hall fanout cap
/// respected on both the new cell and every existing neighbor it touches.
fn try_place_hall(
    grid: &mut GridMap,
    from: GridCoord,
    direction: Direction,
    paint: &PaintConfig,
) -> bool {
    let next = from.offset(direction);
    if !grid.in_bounds(next) || grid.classify(next) != MapElement::Empty {
        return false;
    }
    if completes_hall_square(grid, next) {
        return false;
    }

    let mut adjacent_halls = 0u32;
    for neighbor in next.neighbors4() {
        if grid.classify(neighbor) != MapElement::Hall {
            continue;
        }
        adjacent_halls += 1;
        if adjacent_halls > paint.max_hall_neighbors {
            return false;
        }
        // The neighbor gains a hall neighbor too; refuse to push any cell
        // past the cap so the finished grid never grows a junction wider
        // than `cap + 1`.
        if hall_neighbor_count(grid, neighbor) > paint.max_hall_neighbors {
            return false;
        }
    }

    grid.set_element(next, MapElement::Hall)
}

fn hall_neighbor_count(grid: &GridMap, cell: GridCoord) -> u32 {
    cell.neighbors4()
        .into_iter()
        .filter(|neighbor| grid.classify(*neighbor) == MapElement::Hall)
        .count() as u32
}

/// Would placing a hall at `candidate` complete a 2x2 square of halls?
/// Rooms may be chunky; corridors stay one wide.
fn completes_hall_square(grid: &GridMap, candidate: GridCoord) -> bool {
    for offset_x in [-1, 0] {
        for offset_z in [-1, 0] {
            let all_halls = [(0, 0), (1, 0), (0, 1), (1, 1)].into_iter().all(|(dx, dz)| {
                let cell = GridCoord::new(
                    candidate.x() + offset_x + dx,
                    candidate.y(),
                    candidate.z() + offset_z + dz,
                );
                cell == candidate || grid.classify(cell) == MapElement::Hall
            });
            if all_halls {
                return true;
            }
        }
    }
    false
}
