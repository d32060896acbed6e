use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::rc::Rc;
use tilecube_common::{EntityId, Timer};
use tilecube_ecs::Component;

use crate::config::GameConfig;
use crate::context::{FrameContext, Transition};
use crate::detection::{Detection, DetectionChange};
use crate::GameError;

/// Where a pad sends the player.
///
/// Written as a one-key map in scene files: `{ tag: TP_B }` or
/// `{ position: [1.0, 0.0, 2.0] }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Destination {
    /// A tile position in world space.
    Position { position: Vec3 },
    /// The first tile recorded under a custom tag.
    Tag { tag: String },
}

impl Destination {
    pub fn position(position: Vec3) -> Self {
        Self::Position { position }
    }

    pub fn tag(tag: impl Into<String>) -> Self {
        Self::Tag { tag: tag.into() }
    }
}

/// Cooldown shared by every pad of a scene, so arriving on the paired pad
/// does not bounce the player straight back.
#[derive(Debug, Clone)]
pub struct SharedCooldown(Rc<Cell<Timer>>);

impl SharedCooldown {
    pub fn new(duration_ms: f64) -> Self {
        Self(Rc::new(Cell::new(Timer::new(duration_ms))))
    }

    pub fn ready(&self, now_ms: f64) -> bool {
        self.0.get().ready(now_ms)
    }

    pub fn start(&self, now_ms: f64) {
        let mut timer = self.0.get();
        timer.start(now_ms);
        self.0.set(timer);
    }

    pub fn remaining(&self, now_ms: f64) -> f64 {
        self.0.get().remaining(now_ms)
    }
}

/// A pad that requests a fade-framed warp when the player steps on it.
#[derive(Debug)]
pub struct Teleport {
    detection: Detection,
    destination: Destination,
    resolved: Option<Vec3>,
    cooldown: SharedCooldown,
    triggered: usize,
}

impl Teleport {
    pub fn new(detection: Detection, destination: Destination, cooldown: SharedCooldown) -> Self {
        let resolved = match destination {
            Destination::Position { position } => Some(position),
            Destination::Tag { .. } => None,
        };
        Self {
            detection,
            destination,
            resolved,
            cooldown,
            triggered: 0,
        }
    }

    /// Pad hosted by `host`, using the configured radius and lose delay.
    pub fn on_host(
        host: EntityId,
        destination: Destination,
        cooldown: SharedCooldown,
        config: &GameConfig,
    ) -> Self {
        Self::new(Detection::from_config(Some(host), config), destination, cooldown)
    }

    pub fn detection(&self) -> &Detection {
        &self.detection
    }

    pub fn detection_mut(&mut self) -> &mut Detection {
        &mut self.detection
    }

    pub fn destination(&self) -> &Destination {
        &self.destination
    }

    /// Destination position once [`Component::start`] resolved it.
    pub fn resolved_destination(&self) -> Option<Vec3> {
        self.resolved
    }

    /// Number of transitions this pad requested.
    pub fn triggered(&self) -> usize {
        self.triggered
    }

    fn on_enter(&mut self, ctx: &mut FrameContext<'_>) {
        if self.detection.player().is_none() {
            return;
        }
        let Some(destination) = self.resolved else {
            return;
        };
        if ctx.paused {
            tracing::debug!(?destination, "transition holds the screen, teleport ignored");
            return;
        }
        let now = ctx.now_ms();
        if !self.cooldown.ready(now) {
            tracing::debug!(remaining_ms = self.cooldown.remaining(now), "teleport cooling down");
            return;
        }
        self.cooldown.start(now);
        self.triggered += 1;
        tracing::debug!(?destination, "teleport triggered");
        ctx.request(Transition::Teleport(destination));
    }
}

impl<'a> Component<FrameContext<'a>> for Teleport {
    type Error = GameError;

    fn type_name(&self) -> &'static str {
        "Teleport"
    }

    fn start(&mut self, ctx: &mut FrameContext<'a>) -> Result<(), GameError> {
        self.detection.start(ctx)?;
        if let Destination::Tag { tag } = &self.destination {
            let position = ctx
                .terrain
                .first_position_of(tag)
                .ok_or_else(|| GameError::DestinationNotFound(tag.clone()))?;
            self.resolved = Some(position);
        }
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameContext<'a>, _dt: f32) {
        let now = ctx.now_ms();
        if let Some(DetectionChange::Entered) = self.detection.poll(ctx.world, now) {
            self.on_enter(ctx);
        }
    }

    fn destroy(&mut self, ctx: &mut FrameContext<'a>) {
        self.detection.destroy(ctx);
    }

    fn needs_update(&self) -> bool {
        self.detection.is_active()
    }
}
