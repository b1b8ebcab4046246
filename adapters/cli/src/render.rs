//! Text rendering of a generated level.

use hollow_halls_core::{GridCoord, MapElement};
use hollow_halls_system_generation::GeneratedLevel;

/// Renders the classified grid with spawns overlaid, one row per line,
/// north at the top.
pub(crate) fn render_level(level: &GeneratedLevel) -> String {
    let dimensions = level.grid.dimensions();
    let mut out = String::with_capacity(
        (dimensions.width as usize + 1) * dimensions.height as usize,
    );

    for z in (0..dimensions.height).rev() {
        for x in 0..dimensions.width {
            let cell = GridCoord::new(x, 0, z);
            out.push(glyph(level, cell));
        }
        out.push('\n');
    }
    out
}

fn glyph(level: &GeneratedLevel, cell: GridCoord) -> char {
    if level.spawns.player == cell {
        return '@';
    }
    if level.spawns.enemy == Some(cell) {
        return 'M';
    }
    if level.spawns.notes.contains(&cell) {
        return 'N';
    }
    match level.grid.classify(cell) {
        MapElement::Empty => ' ',
        MapElement::Hall => '.',
        MapElement::Grass => '"',
        MapElement::Room => 'o',
        MapElement::RoomWithObject => '%',
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hollow_halls_core::{GenerationConfig, GridDimensions};
    use hollow_halls_system_generation::generate;

    #[test]
    fn rendering_covers_the_whole_footprint() {
        let config = GenerationConfig {
            seed: 99,
            dimensions: GridDimensions::new(16, 1, 12),
            ..GenerationConfig::default()
        };
        let level = generate(&config).expect("valid config");
        let rendered = render_level(&level);

        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 12);
        assert!(lines.iter().all(|line| line.chars().count() == 16));
        assert_eq!(
            rendered.matches('@').count(),
            1,
            "exactly one player marker"
        );
        assert!(
            !rendered.contains(' '),
            "every cell is classified, so no blank glyphs remain"
        );
    }

    #[test]
    fn spawn_markers_override_cell_glyphs() {
        let config = GenerationConfig {
            seed: 7,
            ..GenerationConfig::default()
        };
        let level = generate(&config).expect("valid config");
        let rendered = render_level(&level);

        if level.spawns.enemy.is_some() {
            assert_eq!(rendered.matches('M').count(), 1);
        }
        // Player and enemy markers win when a note shares their cell.
        let visible_notes = level
            .spawns
            .notes
            .iter()
            .filter(|note| Some(**note) != level.spawns.enemy && **note != level.spawns.player)
            .count();
        assert_eq!(rendered.matches('N').count(), visible_notes);
    }
}
