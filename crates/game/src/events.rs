use glam::Vec3;
use tilecube_common::Signal;

/// The player was carried from one position to another by a teleport pad.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TeleportEvent {
    pub from: Vec3,
    pub to: Vec3,
}

/// Game-wide broadcasts other systems can subscribe to.
#[derive(Debug, Default)]
pub struct GameEvents {
    pub player_respawned: Signal<()>,
    pub teleported: Signal<TeleportEvent>,
}

impl GameEvents {
    pub fn new() -> Self {
        Self::default()
    }
}
