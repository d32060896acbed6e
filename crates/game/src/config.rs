//! Tunables for movement, triggers, transitions and the camera.

use serde::{Deserialize, Serialize};
use std::path::Path;
use tilecube_input::KeyBindings;

use crate::GameError;

/// Game tunables. Every field falls back to its default when absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seconds a one-cell roll takes.
    pub roll_duration: f32,
    /// Minimum time between the end of a roll and the start of the next.
    pub roll_cooldown_ms: f64,
    pub detection_radius: f32,
    pub lose_delay_ms: f64,
    /// Shared by every teleport pad in a scene.
    pub teleport_cooldown_ms: f64,
    pub fade_duration_ms: f64,
    /// How long the screen stays black before fading back.
    pub fade_hold_ms: f64,
    pub camera: CameraConfig,
    pub bindings: KeyBindings,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            roll_duration: 0.15,
            roll_cooldown_ms: 10.0,
            detection_radius: 0.5,
            lose_delay_ms: 1000.0,
            teleport_cooldown_ms: 1000.0,
            fade_duration_ms: 750.0,
            fade_hold_ms: 750.0,
            camera: CameraConfig::default(),
            bindings: KeyBindings::default(),
        }
    }
}

impl GameConfig {
    pub fn from_yaml_str(s: &str) -> Result<Self, GameError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let data = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&data)
    }
}

/// Orbit camera placement. Angles in radians.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub azimuth: f32,
    /// Angle from the vertical axis.
    pub polar: f32,
    pub distance: f32,
    /// Radians per pixel of horizontal mouse drag.
    pub sensitivity: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            polar: 1.0,
            distance: 8.0,
            sensitivity: 0.005,
        }
    }
}
