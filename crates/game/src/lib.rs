//! Game layer: rolling-cube movement, proximity triggers, teleport pads and
//! the scene that wires them to terrain, input and the actor world.
//!
//! # Invariants
//! - Everything runs on one thread, advanced by [`Scene::update`].
//! - Cooldowns and delays read an injected [`tilecube_common::Clock`];
//!   animations accumulate frame time.
//! - The terrain is read-only once the scene is built. The teleport
//!   cooldown is the only state shared between components.

pub mod camera;
pub mod config;
pub mod context;
pub mod detection;
mod error;
pub mod events;
pub mod overlay;
pub mod player;
pub mod scene;
pub mod teleport;

pub use camera::CameraRig;
pub use config::{CameraConfig, GameConfig};
pub use context::{FrameContext, Transition};
pub use detection::{Detection, DetectionChange, DetectionEvent};
pub use error::GameError;
pub use events::{GameEvents, TeleportEvent};
pub use overlay::{Overlay, OverlayEvent, OverlayPhase};
pub use player::{MoveState, MovementController, resolve_step};
pub use scene::{PadDef, Scene, SceneBuilder, SceneDef};
pub use teleport::{Destination, SharedCooldown, Teleport};

pub fn crate_info() -> &'static str {
    "tilecube-game v0.1.0"
}
