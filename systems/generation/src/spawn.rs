//! Spawn planning over the classified grid.
//!
//! The enemy spawns far from the player, biased toward rooms; narrative
//! notes scatter toward the map corners. Both selectors degrade through
//! fallbacks instead of failing: the worst outcome is a missing spawn on a
//! map with no walkable cells at all.

use hollow_halls_core::{GridCoord, SpawnConfig};
use hollow_halls_world::GridMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::SpawnPlan;

/// Selects the enemy spawn and the note cells.
pub(crate) fn plan(
    grid: &GridMap,
    config: &SpawnConfig,
    player: GridCoord,
    rng: &mut ChaCha8Rng,
) -> SpawnPlan {
    let enemy = pick_enemy_cell(grid, config, player, rng);
    let notes = pick_note_cells(grid, config, player, rng);
    SpawnPlan {
        player,
        enemy,
        notes,
    }
}

/// Biased rejection sampling first, farthest-cell scan as the fallback.
///
/// The fallback guarantees a spawn whenever any walkable cell exists; only a
/// fully blocked map yields `None`, and that is logged for the operator.
fn pick_enemy_cell(
    grid: &GridMap,
    config: &SpawnConfig,
    player: GridCoord,
    rng: &mut ChaCha8Rng,
) -> Option<GridCoord> {
    let min_distance_squared = i64::from(config.min_enemy_distance_tiles).pow(2);

    for _ in 0..config.enemy_spawn_attempts {
        let pick_room = !grid.room_cells().is_empty() && rng.gen_bool(config.enemy_room_bias);
        let list = if pick_room {
            grid.room_cells()
        } else {
            grid.hall_cells()
        };
        if list.is_empty() {
            continue;
        }

        let cell = list[rng.gen_range(0..list.len())];
        if !grid.is_walkable(cell) {
            continue;
        }
        if cell.distance_squared(player) < min_distance_squared {
            continue;
        }
        return Some(cell);
    }

    let mut best: Option<(i64, GridCoord)> = None;
    for cell in grid.room_cells().iter().chain(grid.hall_cells()) {
        if !grid.is_walkable(*cell) {
            continue;
        }
        let distance_squared = cell.distance_squared(player);
        if best.map_or(true, |(best_distance, _)| distance_squared > best_distance) {
            best = Some((distance_squared, *cell));
        }
    }

    if best.is_none() {
        tracing::warn!("no walkable cell available for the enemy spawn");
    }
    best.map(|(_, cell)| cell)
}

/// Corner-biased note placement with quadrant and whole-map fallbacks.
///
/// Each corner anchor sits one cell inside the map border. Candidates are
/// scored by squared player distance plus a little jitter so identical maps
/// do not pin every note against the same corner wall; picked cells are
/// excluded from later corners.
fn pick_note_cells(
    grid: &GridMap,
    config: &SpawnConfig,
    player: GridCoord,
    rng: &mut ChaCha8Rng,
) -> Vec<GridCoord> {
    let dimensions = grid.dimensions();
    let width = dimensions.width;
    let height = dimensions.height;
    let corners = [
        GridCoord::new(1, 0, 1),
        GridCoord::new(width - 2, 0, 1),
        GridCoord::new(1, 0, height - 2),
        GridCoord::new(width - 2, 0, height - 2),
    ];

    let min_distance_squared = i64::from(config.note_min_player_distance_tiles).pow(2);
    let mut notes: Vec<GridCoord> = Vec::new();

    for (index, anchor) in corners.iter().take(config.note_count as usize).enumerate() {
        let mut best: Option<(f64, GridCoord)> = None;
        for _ in 0..config.note_corner_attempts {
            let radius = config.note_corner_radius;
            let candidate = GridCoord::new(
                anchor.x() + rng.gen_range(-radius..=radius),
                0,
                anchor.z() + rng.gen_range(-radius..=radius),
            );
            if !note_cell_ok(grid, &notes, candidate, player, min_distance_squared) {
                continue;
            }
            let score = candidate.distance_squared(player) as f64 + jitter(config, rng);
            if best.map_or(true, |(best_score, _)| score > best_score) {
                best = Some((score, candidate));
            }
        }

        let mut chosen = best.map(|(_, cell)| cell);

        if chosen.is_none() {
            chosen = sample_quadrant(grid, config, &notes, player, min_distance_squared, *anchor, rng);
        }
        if chosen.is_none() {
            chosen = sample_anywhere(grid, config, &notes, rng);
        }

        match chosen {
            Some(cell) => notes.push(cell),
            None => tracing::warn!(corner = index, "no walkable cell found for a note"),
        }
    }

    notes
}

fn note_cell_ok(
    grid: &GridMap,
    used: &[GridCoord],
    candidate: GridCoord,
    player: GridCoord,
    min_distance_squared: i64,
) -> bool {
    grid.is_walkable(candidate)
        && !used.contains(&candidate)
        && candidate.distance_squared(player) >= min_distance_squared
}

fn jitter(config: &SpawnConfig, rng: &mut ChaCha8Rng) -> f64 {
    if config.note_score_jitter > 0.0 {
        rng.gen::<f64>() * config.note_score_jitter
    } else {
        0.0
    }
}

/// Uniform sampling inside the anchor's quadrant of the map.
fn sample_quadrant(
    grid: &GridMap,
    config: &SpawnConfig,
    used: &[GridCoord],
    player: GridCoord,
    min_distance_squared: i64,
    anchor: GridCoord,
    rng: &mut ChaCha8Rng,
) -> Option<GridCoord> {
    let dimensions = grid.dimensions();
    let half_width = (dimensions.width / 2).max(1);
    let half_height = (dimensions.height / 2).max(1);
    let x_range = if anchor.x() < half_width {
        0..half_width
    } else {
        half_width..dimensions.width
    };
    let z_range = if anchor.z() < half_height {
        0..half_height
    } else {
        half_height..dimensions.height
    };

    for _ in 0..config.note_corner_attempts {
        let candidate = GridCoord::new(
            rng.gen_range(x_range.clone()),
            0,
            rng.gen_range(z_range.clone()),
        );
        if note_cell_ok(grid, used, candidate, player, min_distance_squared) {
            return Some(candidate);
        }
    }
    None
}

/// Last resort: anywhere walkable and unused, distance constraint waived.
fn sample_anywhere(
    grid: &GridMap,
    config: &SpawnConfig,
    used: &[GridCoord],
    rng: &mut ChaCha8Rng,
) -> Option<GridCoord> {
    let dimensions = grid.dimensions();
    for _ in 0..config.note_corner_attempts {
        let candidate = GridCoord::new(
            rng.gen_range(0..dimensions.width),
            0,
            rng.gen_range(0..dimensions.height),
        );
        if grid.is_walkable(candidate) && !used.contains(&candidate) {
            return Some(candidate);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use hollow_halls_core::{GridDimensions, MapElement};
    use rand::SeedableRng;

    fn open_map(side: i32) -> GridMap {
        let mut grid = GridMap::new(GridDimensions::new(side, 1, side), 1.0).expect("valid");
        for x in 0..side {
            for z in 0..side {
                assert!(grid.set_element(GridCoord::new(x, 0, z), MapElement::Room));
            }
        }
        grid
    }

    #[test]
    fn enemy_respects_the_distance_floor() {
        let grid = open_map(30);
        let config = SpawnConfig::default();
        let player = GridCoord::new(15, 0, 15);
        let mut rng = ChaCha8Rng::seed_from_u64(20);
        let enemy = pick_enemy_cell(&grid, &config, player, &mut rng).expect("open map spawns");
        let threshold = i64::from(config.min_enemy_distance_tiles).pow(2);
        assert!(enemy.distance_squared(player) >= threshold);
    }

    #[test]
    fn enemy_fallback_takes_the_farthest_cell() {
        // A map too small for the distance floor forces the fallback scan.
        let grid = open_map(5);
        let config = SpawnConfig::default();
        let player = GridCoord::new(2, 0, 2);
        let mut rng = ChaCha8Rng::seed_from_u64(21);
        let enemy = pick_enemy_cell(&grid, &config, player, &mut rng).expect("fallback spawns");

        let best = grid
            .room_cells()
            .iter()
            .map(|cell| cell.distance_squared(player))
            .max()
            .expect("cells exist");
        assert_eq!(enemy.distance_squared(player), best);
    }

    #[test]
    fn enemy_spawn_is_none_without_walkable_cells() {
        let grid = GridMap::new(GridDimensions::new(4, 1, 4), 1.0).expect("valid");
        let config = SpawnConfig::default();
        let mut rng = ChaCha8Rng::seed_from_u64(22);
        assert_eq!(
            pick_enemy_cell(&grid, &config, GridCoord::new(0, 0, 0), &mut rng),
            None
        );
    }

    #[test]
    fn notes_land_on_distinct_walkable_cells() {
        let grid = open_map(30);
        let config = SpawnConfig::default();
        let player = GridCoord::new(15, 0, 15);
        let mut rng = ChaCha8Rng::seed_from_u64(23);
        let notes = pick_note_cells(&grid, &config, player, &mut rng);

        assert_eq!(notes.len(), config.note_count as usize);
        for (index, note) in notes.iter().enumerate() {
            assert!(grid.is_walkable(*note));
            assert!(!notes[..index].contains(note), "notes must not share cells");
        }
    }

    #[test]
    fn notes_fall_back_when_corners_are_blocked() {
        // Walkable cells only exist in a central block the corner-radius
        // sampling cannot reach, so a fallback has to supply the note.
        let mut grid = GridMap::new(GridDimensions::new(30, 1, 30), 1.0).expect("valid");
        for x in 10..20 {
            for z in 10..20 {
                assert!(grid.set_element(GridCoord::new(x, 0, z), MapElement::Room));
            }
        }

        let config = SpawnConfig {
            note_count: 1,
            note_min_player_distance_tiles: 0,
            note_corner_attempts: 400,
            ..SpawnConfig::default()
        };
        let player = GridCoord::new(15, 0, 15);
        let mut rng = ChaCha8Rng::seed_from_u64(24);
        let notes = pick_note_cells(&grid, &config, player, &mut rng);
        assert_eq!(notes.len(), 1);
        assert!(grid.is_walkable(notes[0]));
    }
}
