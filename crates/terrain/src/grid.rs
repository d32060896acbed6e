use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use tilecube_common::{EntityId, GridCoord};
use tilecube_ecs::Renderable;

use crate::custom_tile::{CustomTileInit, CustomTileRegistry};
use crate::tile_type::{TileId, TileTypeRegistry};
use crate::{DEMI_WALL, TerrainError, WALL};

/// Content of one grid cell: a registered tile id or a custom tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Tile {
    Id(TileId),
    Tag(String),
}

impl From<i32> for Tile {
    fn from(id: i32) -> Self {
        Tile::Id(TileId(id))
    }
}

impl From<&str> for Tile {
    fn from(tag: &str) -> Self {
        Tile::Tag(tag.to_string())
    }
}

/// One cell yielded by [`Grid::iter`].
#[derive(Debug, Clone, Copy)]
pub struct GridCell<'a> {
    pub tile: &'a Tile,
    /// Tile type name for ids, the tag itself for custom tiles.
    pub name: &'a str,
    pub x: i32,
    pub z: i32,
}

/// Rectangular tile grid with a derived walkable set.
///
/// Columns map to `x` and rows to `z`. The walkable set and the custom tile
/// positions are filled by a single initialization pass (see
/// [`crate::Terrain::initialize`]); before it, nothing is walkable.
#[derive(Debug)]
pub struct Grid {
    width: usize,
    height: usize,
    tiles: Vec<Vec<Tile>>,
    tile_types: TileTypeRegistry,
    wall: TileId,
    demi_wall: TileId,
    custom_tiles: CustomTileRegistry,
    walkable: HashSet<GridCoord>,
    initialized: bool,
}

impl Grid {
    /// Validate and take ownership of the rows.
    ///
    /// Every row must be as long as the first one. Tags that spell a
    /// registered tile name are stored as that tile's id.
    pub fn new(rows: Vec<Vec<Tile>>, tile_types: TileTypeRegistry) -> Result<Self, TerrainError> {
        let width = rows.first().map(Vec::len).unwrap_or(0);
        if width == 0 {
            return Err(TerrainError::EmptyGrid);
        }
        let wall = tile_types.id(WALL)?;
        let demi_wall = tile_types.id(DEMI_WALL)?;

        let mut tiles = Vec::with_capacity(rows.len());
        for (row, cells) in rows.into_iter().enumerate() {
            if cells.len() != width {
                return Err(TerrainError::RaggedRow {
                    row,
                    expected: width,
                    found: cells.len(),
                });
            }
            let normalized = cells
                .into_iter()
                .map(|tile| match tile {
                    Tile::Id(id) => tile_types.name(id).map(|_| Tile::Id(id)),
                    Tile::Tag(tag) => Ok(match tile_types.id(&tag) {
                        Ok(id) => Tile::Id(id),
                        Err(_) => Tile::Tag(tag),
                    }),
                })
                .collect::<Result<Vec<_>, _>>()?;
            tiles.push(normalized);
        }

        Ok(Self {
            width,
            height: tiles.len(),
            tiles,
            tile_types,
            wall,
            demi_wall,
            custom_tiles: CustomTileRegistry::new(),
            walkable: HashSet::new(),
            initialized: false,
        })
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn tile_types(&self) -> &TileTypeRegistry {
        &self.tile_types
    }

    pub fn tile_at(&self, x: i32, z: i32) -> Option<&Tile> {
        let x = usize::try_from(x).ok()?;
        let z = usize::try_from(z).ok()?;
        self.tiles.get(z)?.get(x)
    }

    pub fn is_wall(&self, tile: &Tile) -> bool {
        *tile == Tile::Id(self.wall)
    }

    pub fn is_demi_wall(&self, tile: &Tile) -> bool {
        *tile == Tile::Id(self.demi_wall)
    }

    /// Cells in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = GridCell<'_>> {
        self.tiles.iter().enumerate().flat_map(move |(z, row)| {
            row.iter().enumerate().map(move |(x, tile)| GridCell {
                tile,
                name: match tile {
                    Tile::Id(id) => self.tile_types.name(*id).unwrap_or_default(),
                    Tile::Tag(tag) => tag.as_str(),
                },
                x: x as i32,
                z: z as i32,
            })
        })
    }

    pub fn is_walkable(&self, x: i32, z: i32) -> bool {
        self.walkable.contains(&GridCoord::new(x, z))
    }

    pub fn walkable_count(&self) -> usize {
        self.walkable.len()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Declare the behavior of a custom tile tag.
    pub fn register_custom_tile(
        &mut self,
        tag: impl Into<String>,
        on_init: impl FnMut(&CustomTileInit<'_>) -> Option<Renderable> + 'static,
    ) -> Result<(), TerrainError> {
        if self.initialized {
            return Err(TerrainError::AlreadyInitialized);
        }
        self.custom_tiles.add(tag, Some(Box::new(on_init)));
        Ok(())
    }

    /// Declare a tag whose positions are recorded but which spawns nothing.
    pub fn register_marker(&mut self, tag: impl Into<String>) -> Result<(), TerrainError> {
        if self.initialized {
            return Err(TerrainError::AlreadyInitialized);
        }
        self.custom_tiles.add(tag, None);
        Ok(())
    }

    pub fn custom_tiles(&self) -> &CustomTileRegistry {
        &self.custom_tiles
    }

    /// First position recorded for a tag during initialization.
    pub fn first_position_of(&self, tag: &str) -> Option<Vec3> {
        self.custom_tiles.position_of(tag)
    }

    pub fn tile_by_name(&self, tag: &str) -> Option<Vec3> {
        self.first_position_of(tag)
    }

    pub fn positions_of(&self, tag: &str) -> &[Vec3] {
        self.custom_tiles.positions_of(tag)
    }

    /// Initialization of a single cell: walkability plus custom tile handler.
    pub(crate) fn init_cell(
        &mut self,
        x: i32,
        z: i32,
        y: f32,
        host: EntityId,
    ) -> Option<Renderable> {
        let tile = self.tile_at(x, z)?.clone();
        if !self.is_wall(&tile) && !self.is_demi_wall(&tile) {
            self.walkable.insert(GridCoord::new(x, z));
        }

        let Tile::Tag(tag) = tile else {
            return None;
        };
        match self.custom_tiles.init(&tag, host, Vec3::new(x as f32, y, z as f32)) {
            Some(renderable) => renderable,
            None => {
                tracing::debug!(%tag, x, z, "no handler registered for custom tile");
                None
            }
        }
    }

    pub(crate) fn mark_initialized(&mut self) -> Result<(), TerrainError> {
        if self.initialized {
            return Err(TerrainError::AlreadyInitialized);
        }
        self.initialized = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile_types() -> TileTypeRegistry {
        TileTypeRegistry::new([("Floor", -1), ("Empty", 0), ("Wall", 1), ("DemiWall", 2)]).unwrap()
    }

    fn rows(raw: &[&[Tile]]) -> Vec<Vec<Tile>> {
        raw.iter().map(|row| row.to_vec()).collect()
    }

    #[test]
    fn empty_grid_is_rejected() {
        assert!(matches!(
            Grid::new(Vec::new(), tile_types()),
            Err(TerrainError::EmptyGrid)
        ));
        assert!(matches!(
            Grid::new(vec![Vec::new()], tile_types()),
            Err(TerrainError::EmptyGrid)
        ));
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let raw = rows(&[&[1.into(), 1.into()], &[1.into()]]);
        assert!(matches!(
            Grid::new(raw, tile_types()),
            Err(TerrainError::RaggedRow {
                row: 1,
                expected: 2,
                found: 1
            })
        ));
    }

    #[test]
    fn unknown_ids_and_missing_wall_types_are_rejected() {
        assert!(matches!(
            Grid::new(rows(&[&[9.into()]]), tile_types()),
            Err(TerrainError::UnknownTileId(9))
        ));
        let no_walls = TileTypeRegistry::new([("Floor", 0)]).unwrap();
        assert!(matches!(
            Grid::new(rows(&[&[0.into()]]), no_walls),
            Err(TerrainError::UnknownTileName(name)) if name == "Wall"
        ));
    }

    #[test]
    fn dimensions_and_row_major_iteration() {
        let grid = Grid::new(
            rows(&[&[1.into(), 2.into(), 1.into()], &[0.into(), "Spawn".into(), (-1).into()]]),
            tile_types(),
        )
        .unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);

        let names: Vec<(&str, i32, i32)> = grid.iter().map(|c| (c.name, c.x, c.z)).collect();
        assert_eq!(
            names,
            vec![
                ("Wall", 0, 0),
                ("DemiWall", 1, 0),
                ("Wall", 2, 0),
                ("Empty", 0, 1),
                ("Spawn", 1, 1),
                ("Floor", 2, 1),
            ]
        );
    }

    #[test]
    fn tags_naming_registered_tiles_become_ids() {
        let grid = Grid::new(rows(&[&["Wall".into(), "DemiWall".into()]]), tile_types()).unwrap();
        assert!(grid.is_wall(grid.tile_at(0, 0).unwrap()));
        assert!(grid.is_demi_wall(grid.tile_at(1, 0).unwrap()));
    }

    #[test]
    fn nothing_is_walkable_before_initialization() {
        let grid = Grid::new(rows(&[&[0.into()]]), tile_types()).unwrap();
        assert!(!grid.is_initialized());
        assert!(!grid.is_walkable(0, 0));
    }

    #[test]
    fn tile_at_out_of_bounds() {
        let grid = Grid::new(rows(&[&[0.into()]]), tile_types()).unwrap();
        assert!(grid.tile_at(-1, 0).is_none());
        assert!(grid.tile_at(0, 1).is_none());
        assert_eq!(grid.tile_at(0, 0), Some(&Tile::Id(TileId(0))));
    }

    #[test]
    fn tile_deserializes_from_number_or_string() {
        let tiles: Vec<Tile> = serde_json::from_str(r#"[1, "TP_A", -1]"#).unwrap();
        assert_eq!(tiles, vec![Tile::from(1), Tile::from("TP_A"), Tile::from(-1)]);
    }
}
