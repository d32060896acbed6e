use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::TerrainError;

/// Compact identifier of a tile type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TileId(pub i32);

impl std::fmt::Display for TileId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bidirectional mapping between tile names and tile ids.
///
/// Built once from a definition table and immutable afterwards.
#[derive(Debug, Clone, Default)]
pub struct TileTypeRegistry {
    name_to_id: BTreeMap<String, TileId>,
    id_to_name: BTreeMap<TileId, String>,
}

impl TileTypeRegistry {
    /// Build the registry. Names and ids must both be unique.
    pub fn new<S: Into<String>>(
        definitions: impl IntoIterator<Item = (S, i32)>,
    ) -> Result<Self, TerrainError> {
        let mut registry = Self::default();
        for (name, id) in definitions {
            let name = name.into();
            let id = TileId(id);
            if registry.name_to_id.contains_key(&name) {
                return Err(TerrainError::DuplicateTileName(name));
            }
            if registry.id_to_name.contains_key(&id) {
                return Err(TerrainError::DuplicateTileId(id.0));
            }
            registry.name_to_id.insert(name.clone(), id);
            registry.id_to_name.insert(id, name);
        }
        Ok(registry)
    }

    pub fn id(&self, name: &str) -> Result<TileId, TerrainError> {
        self.name_to_id
            .get(name)
            .copied()
            .ok_or_else(|| TerrainError::UnknownTileName(name.to_string()))
    }

    pub fn name(&self, id: TileId) -> Result<&str, TerrainError> {
        self.id_to_name
            .get(&id)
            .map(String::as_str)
            .ok_or(TerrainError::UnknownTileId(id.0))
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.name_to_id.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.name_to_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.name_to_id.is_empty()
    }

    /// Definitions ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, TileId)> {
        self.name_to_id.iter().map(|(name, id)| (name.as_str(), *id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> TileTypeRegistry {
        TileTypeRegistry::new([("Floor", -1), ("Empty", 0), ("Wall", 1), ("DemiWall", 2)]).unwrap()
    }

    #[test]
    fn lookups_are_inverse() {
        let r = registry();
        for (name, id) in r.iter() {
            assert_eq!(r.id(name).unwrap(), id);
            assert_eq!(r.name(id).unwrap(), name);
        }
        assert_eq!(r.len(), 4);
        assert_eq!(r.id("Floor").unwrap(), TileId(-1));
    }

    #[test]
    fn unknown_lookups_fail() {
        let r = registry();
        assert!(matches!(
            r.id("Lava"),
            Err(TerrainError::UnknownTileName(name)) if name == "Lava"
        ));
        assert!(matches!(r.name(TileId(42)), Err(TerrainError::UnknownTileId(42))));
    }

    #[test]
    fn duplicate_definitions_are_rejected() {
        assert!(matches!(
            TileTypeRegistry::new([("Wall", 1), ("Wall", 2)]),
            Err(TerrainError::DuplicateTileName(_))
        ));
        assert!(matches!(
            TileTypeRegistry::new([("Wall", 1), ("DemiWall", 1)]),
            Err(TerrainError::DuplicateTileId(1))
        ));
    }

    #[test]
    fn empty_registry() {
        let r = TileTypeRegistry::new(Vec::<(String, i32)>::new()).unwrap();
        assert!(r.is_empty());
        assert!(!r.contains_name("Wall"));
    }
}
