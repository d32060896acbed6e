use glam::Vec3;
use tilecube_common::Clock;
use tilecube_input::{InputState, KeyBindings};
use tilecube_kernel::World;
use tilecube_terrain::Terrain;

use crate::events::GameEvents;

/// A screen transition framed by the overlay fade.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Warp the player to a world position once the screen is black.
    Teleport(Vec3),
    /// Warp the player back to the spawn tile.
    Respawn,
}

/// Everything a component may touch during one frame.
///
/// Built by the scene from its own fields, so collaborators are handed in
/// rather than looked up.
pub struct FrameContext<'a> {
    pub world: &'a mut World,
    pub terrain: &'a Terrain,
    pub input: &'a InputState,
    pub bindings: &'a KeyBindings,
    pub clock: &'a dyn Clock,
    pub events: &'a mut GameEvents,
    /// Transitions requested this frame; the scene starts at most one.
    pub requests: &'a mut Vec<Transition>,
    pub camera_azimuth: f32,
    /// Gameplay input is ignored while a transition holds the screen.
    pub paused: bool,
}

impl FrameContext<'_> {
    pub fn now_ms(&self) -> f64 {
        self.clock.now_ms()
    }

    pub fn request(&mut self, transition: Transition) {
        self.requests.push(transition);
    }
}
