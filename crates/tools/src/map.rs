use std::fmt::Write;
use tilecube_common::GridCoord;
use tilecube_terrain::{Terrain, Tile};

/// Render the terrain as text, one line per row.
///
/// `#` wall, `=` demi-wall, `.` walkable floor, the first letter of a custom
/// tile's tag, `@` the player. Cells that are not walkable yet (terrain not
/// initialized) are blank.
pub fn ascii_map(terrain: &Terrain, player: Option<GridCoord>) -> String {
    let grid = terrain.grid();
    let mut out = String::with_capacity((grid.width() + 1) * grid.height());
    for cell in grid.iter() {
        let glyph = if player == Some(GridCoord::new(cell.x, cell.z)) {
            '@'
        } else if grid.is_wall(cell.tile) {
            '#'
        } else if grid.is_demi_wall(cell.tile) {
            '='
        } else if let Tile::Tag(tag) = cell.tile {
            tag.chars().next().unwrap_or('?')
        } else if terrain.is_walkable(cell.x, cell.z) {
            '.'
        } else {
            ' '
        };
        out.push(glyph);
        if cell.x as usize + 1 == grid.width() {
            out.push('\n');
        }
    }
    out
}

/// One line per custom tag: where its tiles were recorded.
pub fn custom_tile_report(terrain: &Terrain) -> String {
    let mut out = String::new();
    for tag in terrain.grid().custom_tiles().tags() {
        let cells: Vec<String> = terrain
            .positions_of(tag)
            .iter()
            .map(|p| GridCoord::from_position(*p).to_string())
            .collect();
        let _ = writeln!(out, "{tag}: {}", cells.join(" "));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use tilecube_common::EntityId;
    use tilecube_ecs::ComponentStore;
    use tilecube_terrain::{Grid, TileTypeRegistry};

    fn terrain(initialize: bool) -> Terrain {
        let types = TileTypeRegistry::new([("Floor", -1), ("Wall", 1), ("DemiWall", 2)]).unwrap();
        let rows = vec![
            vec![Tile::from(1), Tile::from(2), Tile::from(1)],
            vec![Tile::from("Spawn"), Tile::from(-1), Tile::from("TP_A")],
        ];
        let mut grid = Grid::new(rows, types).unwrap();
        grid.register_marker("Spawn").unwrap();
        grid.register_marker("TP_A").unwrap();
        let mut terrain = Terrain::new(grid);
        if initialize {
            terrain
                .initialize(EntityId::new(), &mut ComponentStore::new())
                .unwrap();
        }
        terrain
    }

    #[test]
    fn renders_rows_with_glyphs() {
        let map = ascii_map(&terrain(true), None);
        assert_eq!(map, "#=#\nS.T\n");
    }

    #[test]
    fn player_overrides_the_tile() {
        let map = ascii_map(&terrain(true), Some(GridCoord::new(1, 1)));
        assert_eq!(map, "#=#\nS@T\n");
    }

    #[test]
    fn uninitialized_floor_is_blank() {
        let map = ascii_map(&terrain(false), None);
        assert_eq!(map, "#=#\nS T\n");
    }

    #[test]
    fn report_lists_recorded_cells() {
        let report = custom_tile_report(&terrain(true));
        assert_eq!(report, "Spawn: (0, 1)\nTP_A: (2, 1)\n");
    }
}
