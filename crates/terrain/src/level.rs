//! Level files: tile type table plus rows, in YAML or JSON.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

use crate::grid::{Grid, Tile};
use crate::tile_type::TileTypeRegistry;
use crate::TerrainError;

/// Static description of a level's terrain.
///
/// ```yaml
/// name: corridor
/// tile_types: { Floor: -1, Wall: 1, DemiWall: 2 }
/// rows:
///   - [1, 1, 1]
///   - [1, Spawn, 1]
///   - [1, 1, 1]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelDef {
    #[serde(default)]
    pub name: String,
    pub tile_types: BTreeMap<String, i32>,
    pub rows: Vec<Vec<Tile>>,
}

impl LevelDef {
    pub fn from_yaml_str(s: &str) -> Result<Self, TerrainError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, TerrainError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a level, picking the format from the file extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, TerrainError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&data),
            Some("json") => Self::from_json_str(&data),
            other => Err(TerrainError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    pub fn tile_type_registry(&self) -> Result<TileTypeRegistry, TerrainError> {
        TileTypeRegistry::new(self.tile_types.iter().map(|(name, id)| (name.clone(), *id)))
    }

    pub fn build_grid(&self) -> Result<Grid, TerrainError> {
        Grid::new(self.rows.clone(), self.tile_type_registry()?)
    }
}
