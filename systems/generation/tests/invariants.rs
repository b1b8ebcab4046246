//! Seed-sweeping checks of the structural map invariants.

use std::collections::{HashSet, VecDeque};

use hollow_halls_core::{GenerationConfig, GridCoord, GridDimensions, MapElement};
use hollow_halls_system_generation::generate;
use hollow_halls_world::GridMap;
use proptest::prelude::*;

fn sweep_config(seed: u64) -> GenerationConfig {
    let mut config = GenerationConfig::default();
    config.seed = seed;
    config.dimensions = GridDimensions::new(24, 1, 24);
    config.paint.paint_budget = 300;
    config
}

fn hall_neighbor_count(grid: &GridMap, cell: GridCoord) -> u32 {
    cell.neighbors4()
        .into_iter()
        .filter(|neighbor| grid.classify(*neighbor) == MapElement::Hall)
        .count() as u32
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(24))]

    #[test]
    fn corridors_stay_thin_for_every_seed(seed in any::<u64>()) {
        let level = generate(&sweep_config(seed)).expect("valid config");
        let dimensions = level.grid.dimensions();
        for x in 0..dimensions.width - 1 {
            for z in 0..dimensions.height - 1 {
                let all_halls = [(0, 0), (1, 0), (0, 1), (1, 1)].into_iter().all(|(dx, dz)| {
                    level.grid.classify(GridCoord::new(x + dx, 0, z + dz)) == MapElement::Hall
                });
                prop_assert!(!all_halls, "2x2 hall block at ({}, {}) for seed {}", x, z, seed);
            }
        }
    }

    #[test]
    fn hall_fanout_is_bounded_for_every_seed(seed in any::<u64>()) {
        let config = sweep_config(seed);
        let level = generate(&config).expect("valid config");
        let bound = config.paint.max_hall_neighbors + 1;
        for hall in level.grid.hall_cells() {
            let count = hall_neighbor_count(&level.grid, *hall);
            prop_assert!(
                count <= bound,
                "hall {:?} has {} hall neighbors for seed {}",
                hall,
                count,
                seed,
            );
        }
    }

    #[test]
    fn floors_stay_connected_for_every_seed(seed in any::<u64>()) {
        let level = generate(&sweep_config(seed)).expect("valid config");
        let grid = &level.grid;
        let dimensions = grid.dimensions();

        let mut total = 0usize;
        for x in 0..dimensions.width {
            for z in 0..dimensions.height {
                if grid.classify(GridCoord::new(x, 0, z)).is_floor_like() {
                    total += 1;
                }
            }
        }

        let mut seen: HashSet<GridCoord> = HashSet::new();
        let mut queue = VecDeque::new();
        let start = level.spawns.player;
        prop_assert!(grid.classify(start).is_floor_like());
        let _ = seen.insert(start);
        queue.push_back(start);
        while let Some(cell) = queue.pop_front() {
            for neighbor in cell.neighbors4() {
                if grid.classify(neighbor).is_floor_like() && seen.insert(neighbor) {
                    queue.push_back(neighbor);
                }
            }
        }

        prop_assert_eq!(seen.len(), total, "disconnected floor cells for seed {}", seed);
    }

    #[test]
    fn replay_is_exact_for_every_seed(seed in any::<u64>()) {
        let config = sweep_config(seed);
        let first = generate(&config).expect("valid config");
        let second = generate(&config).expect("valid config");
        prop_assert_eq!(&first.layout, &second.layout);
        prop_assert_eq!(&first.spawns, &second.spawns);
        prop_assert_eq!(first.grid.hall_cells(), second.grid.hall_cells());
        prop_assert_eq!(first.grid.room_cells(), second.grid.room_cells());
    }
}
