//! Terrain: tile types, the walkable grid and named custom tiles.
//!
//! # Invariants
//! - A cell is walkable iff its tile is neither `Wall` nor `DemiWall`.
//! - The grid is read-only once initialized; custom tile handlers must be
//!   registered before the initialization pass.
//! - Custom tile positions are recorded in row-major scan order.

mod custom_tile;
mod grid;
pub mod level;
mod terrain;
mod tile_type;

pub use custom_tile::{CustomTileInit, CustomTileRegistry, TileInitFn};
pub use grid::{Grid, GridCell, Tile};
pub use level::LevelDef;
pub use terrain::Terrain;
pub use tile_type::{TileId, TileTypeRegistry};

/// Tile name that blocks movement with a full-height wall.
pub const WALL: &str = "Wall";
/// Tile name that blocks movement with a half-height wall.
pub const DEMI_WALL: &str = "DemiWall";

/// Errors from building or initializing terrain.
#[derive(Debug, thiserror::Error)]
pub enum TerrainError {
    #[error("grid cannot be empty")]
    EmptyGrid,
    #[error("row {row} has {found} tiles, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("unknown tile name: {0:?}")]
    UnknownTileName(String),
    #[error("unknown tile id: {0}")]
    UnknownTileId(i32),
    #[error("tile name {0:?} is defined twice")]
    DuplicateTileName(String),
    #[error("tile id {0} is used by more than one name")]
    DuplicateTileId(i32),
    #[error("terrain is already initialized")]
    AlreadyInitialized,
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported level file extension: {0:?}")]
    UnsupportedFormat(String),
}

pub fn crate_info() -> &'static str {
    "tilecube-terrain v0.1.0"
}
