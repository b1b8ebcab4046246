use hollow_halls_core::{GridCoord, GridDimensions, MapElement};
use hollow_halls_system_pursuit::DistanceField;
use hollow_halls_world::GridMap;

fn cell(x: i32, z: i32) -> GridCoord {
    GridCoord::new(x, 0, z)
}

/// 5x5 open map with a three-cell barrier at x = 2, z = 1..=3. Crossings
/// only exist along the top and bottom rows.
fn barrier_map() -> GridMap {
    let mut grid = GridMap::new(GridDimensions::new(5, 1, 5), 1.0).expect("valid");
    for x in 0..5 {
        for z in 0..5 {
            let element = if x == 2 && (1..=3).contains(&z) {
                MapElement::Grass
            } else {
                MapElement::Hall
            };
            assert!(grid.set_element(cell(x, z), element));
        }
    }
    grid
}

/// 5x5 map split in two by a full grass column at x = 2.
fn split_map() -> GridMap {
    let mut grid = GridMap::new(GridDimensions::new(5, 1, 5), 1.0).expect("valid");
    for x in 0..5 {
        for z in 0..5 {
            let element = if x == 2 {
                MapElement::Grass
            } else {
                MapElement::Hall
            };
            assert!(grid.set_element(cell(x, z), element));
        }
    }
    grid
}

#[test]
fn hop_counts_match_hand_computed_values() {
    let grid = barrier_map();
    let mut field = DistanceField::new();
    field.build_from(&grid, cell(0, 2));

    assert_eq!(field.distance(cell(0, 2)), Some(0));
    assert_eq!(field.distance(cell(1, 2)), Some(1));
    assert_eq!(field.distance(cell(0, 0)), Some(2));
    assert_eq!(field.distance(cell(2, 0)), Some(4));
    assert_eq!(field.distance(cell(2, 4)), Some(4));
    assert_eq!(field.distance(cell(4, 4)), Some(6));
    // The barrier forces a detour: the straight-line gap is 4, the walk is 8.
    assert_eq!(field.distance(cell(3, 2)), Some(7));
    assert_eq!(field.distance(cell(4, 2)), Some(8));
    // Barrier cells themselves are not part of the field.
    assert_eq!(field.distance(cell(2, 2)), None);
    assert_eq!(field.distance(cell(2, 1)), None);
}

#[test]
fn every_open_cell_is_reachable_around_the_barrier() {
    let grid = barrier_map();
    let mut field = DistanceField::new();
    field.build_from(&grid, cell(0, 2));

    for x in 0..5 {
        for z in 0..5 {
            let expected_blocked = x == 2 && (1..=3).contains(&z);
            assert_eq!(field.distance(cell(x, z)).is_none(), expected_blocked);
        }
    }
}

#[test]
fn disconnected_pockets_stay_unreachable() {
    let grid = split_map();
    let mut field = DistanceField::new();
    field.build_from(&grid, cell(0, 0));

    assert_eq!(field.distance(cell(1, 4)), Some(5));
    for z in 0..5 {
        assert_eq!(field.distance(cell(2, z)), None, "grass column");
        assert_eq!(field.distance(cell(3, z)), None, "cut-off half");
        assert_eq!(field.distance(cell(4, z)), None, "cut-off half");
    }
}

#[test]
fn unbuilt_field_answers_nothing() {
    let field = DistanceField::new();
    assert_eq!(field.distance(cell(0, 0)), None);
    assert_eq!(field.distance(cell(2, 2)), None);
}

#[test]
fn non_walkable_source_leaves_the_field_unreachable() {
    let grid = barrier_map();
    let mut field = DistanceField::new();
    field.build_from(&grid, cell(2, 2));

    for x in 0..5 {
        for z in 0..5 {
            assert_eq!(field.distance(cell(x, z)), None);
        }
    }
}

#[test]
fn out_of_bounds_source_leaves_the_field_unreachable() {
    let grid = barrier_map();
    let mut field = DistanceField::new();
    field.build_from(&grid, cell(-3, 2));
    assert_eq!(field.distance(cell(0, 2)), None);
}

#[test]
fn descent_reaches_the_source_within_the_initial_distance() {
    let grid = barrier_map();
    let mut field = DistanceField::new();
    let source = cell(0, 2);
    field.build_from(&grid, source);

    let start = cell(4, 2);
    let initial = field.distance(start).expect("start is reachable");
    let mut current = start;
    let mut steps = 0;
    while current != source {
        let next = field
            .descend_from(&grid, current)
            .expect("descent never stalls on a connected field");
        assert!(
            field.distance(next).expect("steps stay on the field")
                < field.distance(current).expect("steps stay on the field"),
        );
        current = next;
        steps += 1;
        assert!(steps <= initial, "descent must not exceed the hop count");
    }
    assert_eq!(steps, initial);
}

#[test]
fn descent_yields_nothing_at_or_off_the_source() {
    let grid = barrier_map();
    let mut field = DistanceField::new();
    field.build_from(&grid, cell(0, 2));

    assert_eq!(field.descend_from(&grid, cell(0, 2)), None, "at the source");
    assert_eq!(field.descend_from(&grid, cell(2, 2)), None, "off the field");
}
