use tilecube_terrain::TerrainError;

/// Errors that abort scene construction.
#[derive(Debug, thiserror::Error)]
pub enum GameError {
    #[error(transparent)]
    Terrain(#[from] TerrainError),
    #[error("destination tag {0:?} has no recorded position")]
    DestinationNotFound(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("unsupported file extension: {0:?}")]
    UnsupportedFormat(String),
}
