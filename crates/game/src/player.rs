//! Rolling-cube movement controller.
//!
//! The player's discrete position jumps to the target cell as soon as a move
//! is accepted. Only the mesh, a child transform of the player actor, lags
//! behind: it starts one cell back and pivots a quarter turn about the
//! bottom edge it rolls over.
//!
//! # Invariants
//! - A step moves exactly one cell along exactly one axis.
//! - Rejected moves leave the controller untouched (no cooldown consumed).
//! - A warp always leaves the controller idle with an untransformed mesh.

use glam::{Quat, Vec3};
use std::f32::consts::FRAC_PI_2;
use tilecube_common::{EntityId, GridCoord, Timer, Transform};
use tilecube_ecs::Component;
use tilecube_input::Action;
use tilecube_kernel::{Role, World};

use crate::config::GameConfig;
use crate::context::FrameContext;
use crate::GameError;

/// Offset from the grid surface to the cube's center.
pub const CUBE_LIFT: f32 = 0.5;

/// Uniform scale of the player mesh.
pub const MESH_SCALE: f32 = 0.5;

const PROGRESS_EPSILON: f32 = 1e-5;

/// Resolve camera-relative intent to a single cardinal grid step.
///
/// `forward` and `right` are in {-1, 0, 1}. The intent is rotated by the
/// camera azimuth and snapped to whichever world axis dominates, X winning
/// ties. Returns `None` when there is no intent.
pub fn resolve_step(forward: i32, right: i32, azimuth: f32) -> Option<(i32, i32)> {
    if forward == 0 && right == 0 {
        return None;
    }
    let (sin, cos) = azimuth.sin_cos();
    let (f, r) = (forward as f32, right as f32);
    let raw_x = f * -sin + r * cos;
    let raw_z = f * -cos + r * -sin;
    if raw_x.abs() >= raw_z.abs() {
        Some((raw_x.signum() as i32, 0))
    } else {
        Some((0, raw_z.signum() as i32))
    }
}

/// Controller state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveState {
    Idle,
    Rolling,
}

/// An accepted step being animated.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Roll {
    /// Bottom edge the cube tips over, relative to the new position.
    pivot: Vec3,
    /// Where the mesh center starts, relative to the new position.
    start_offset: Vec3,
    axis: Vec3,
    start_rotation: Quat,
}

impl Roll {
    fn new(dx: i32, dz: i32, start_rotation: Quat) -> Self {
        let (dx, dz) = (dx as f32, dz as f32);
        Self {
            pivot: Vec3::new(-dx * 0.5, -0.5, -dz * 0.5),
            start_offset: Vec3::new(-dx, 0.0, -dz),
            axis: Vec3::Y.cross(Vec3::new(dx, 0.0, dz)).normalize(),
            start_rotation,
        }
    }

    /// Mesh position and rotation `progress` of the way through the turn.
    fn pose(&self, progress: f32) -> (Vec3, Quat) {
        let q = Quat::from_axis_angle(self.axis, progress * FRAC_PI_2);
        let arm = self.start_offset - self.pivot;
        (self.pivot + q * arm, q * self.start_rotation)
    }
}

/// Grid movement for the player actor, animated as a rolling cube.
#[derive(Debug, Clone)]
pub struct MovementController {
    actor: Option<EntityId>,
    state: MoveState,
    roll: Option<Roll>,
    progress: f32,
    roll_duration: f32,
    cooldown: Timer,
    mesh: Transform,
    spawn_tag: String,
}

impl MovementController {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            actor: None,
            state: MoveState::Idle,
            roll: None,
            progress: 0.0,
            roll_duration: config.roll_duration,
            cooldown: Timer::new(config.roll_cooldown_ms),
            mesh: Transform::default(),
            spawn_tag: "Spawn".to_string(),
        }
    }

    pub fn with_spawn_tag(mut self, tag: impl Into<String>) -> Self {
        self.spawn_tag = tag.into();
        self
    }

    pub fn actor(&self) -> Option<EntityId> {
        self.actor
    }

    pub fn state(&self) -> MoveState {
        self.state
    }

    pub fn is_rolling(&self) -> bool {
        self.state == MoveState::Rolling
    }

    /// 0 right after a step is accepted or a warp, 1 once a roll finished.
    pub fn roll_progress(&self) -> f32 {
        self.progress
    }

    /// Mesh transform relative to the player actor.
    pub fn mesh_transform(&self) -> Transform {
        self.mesh
    }

    pub fn spawn_tag(&self) -> &str {
        &self.spawn_tag
    }

    /// Discrete cell the player occupies.
    pub fn grid_position(&self, world: &World) -> Option<GridCoord> {
        let actor = self.actor?;
        world.world_position(actor).map(GridCoord::from_position)
    }

    /// Where the cube is drawn: actor position plus the mesh offset.
    pub fn visual_position(&self, world: &World) -> Option<Vec3> {
        let actor = self.actor?;
        world
            .world_position(actor)
            .map(|position| position + self.mesh.position)
    }

    /// Put the player on top of the tile at `position`, abandoning any roll.
    pub fn warp_to_position(&mut self, world: &mut World, position: Vec3) {
        let Some(actor) = self.actor else {
            tracing::warn!("warp requested before the player actor was resolved");
            return;
        };
        let target = position + Vec3::new(0.0, CUBE_LIFT, 0.0);
        world.set_local_position(actor, target);
        self.mesh.position = Vec3::ZERO;
        self.mesh.rotation = Quat::IDENTITY;
        self.roll = None;
        self.progress = 0.0;
        self.state = MoveState::Idle;
        tracing::debug!(?target, "player warped");
    }

    /// Warp to the first spawn tile. Returns false when the level has none.
    pub fn warp_to_spawn(&mut self, ctx: &mut FrameContext<'_>) -> bool {
        let Some(spawn) = ctx.terrain.first_position_of(&self.spawn_tag) else {
            tracing::warn!(tag = %self.spawn_tag, "no spawn tile recorded");
            return false;
        };
        ctx.events.player_respawned.emit(&());
        self.warp_to_position(ctx.world, spawn);
        true
    }

    /// Accumulate the (forward, right) intent of this frame's fresh presses.
    fn intent(ctx: &FrameContext<'_>) -> (i32, i32) {
        let (mut forward, mut right) = (0, 0);
        for action in [
            Action::MoveForward,
            Action::MoveBackward,
            Action::MoveLeft,
            Action::MoveRight,
        ] {
            if !ctx.input.was_action_just_pressed(action, ctx.bindings) {
                continue;
            }
            if let Some((f, r)) = action.move_intent() {
                forward += f;
                right += r;
            }
        }
        (forward.clamp(-1, 1), right.clamp(-1, 1))
    }

    /// Try to begin a roll by one cell. Returns whether it started.
    pub fn try_step(&mut self, ctx: &mut FrameContext<'_>, dx: i32, dz: i32) -> bool {
        let Some(actor) = self.actor else {
            return false;
        };
        if self.is_rolling() || !self.cooldown.ready(ctx.now_ms()) {
            return false;
        }
        let Some(position) = ctx.world.world_position(actor) else {
            return false;
        };
        let target = GridCoord::from_position(position).offset(dx, dz);
        if !ctx.terrain.is_walkable(target.x, target.z) {
            tracing::trace!(%target, "step rejected");
            return false;
        }

        ctx.world
            .set_local_position(actor, target.to_position(position.y));
        let roll = Roll::new(dx, dz, self.mesh.rotation);
        self.mesh.position = roll.start_offset;
        self.roll = Some(roll);
        self.progress = 0.0;
        self.state = MoveState::Rolling;
        tracing::debug!(%target, dx, dz, "roll started");
        true
    }

    fn advance_roll(&mut self, ctx: &FrameContext<'_>, dt: f32) {
        let Some(roll) = self.roll else {
            self.state = MoveState::Idle;
            return;
        };
        self.progress += dt / self.roll_duration;
        if self.progress < 1.0 - PROGRESS_EPSILON {
            let (position, rotation) = roll.pose(self.progress);
            self.mesh.position = position;
            self.mesh.rotation = rotation;
            return;
        }

        self.progress = 1.0;
        let (_, rotation) = roll.pose(1.0);
        self.mesh.position = Vec3::ZERO;
        self.mesh.rotation = rotation;
        self.roll = None;
        self.cooldown.start(ctx.now_ms());
        self.state = MoveState::Idle;
        tracing::trace!("roll finished");
    }
}

impl<'a> Component<FrameContext<'a>> for MovementController {
    type Error = GameError;

    fn type_name(&self) -> &'static str {
        "MovementController"
    }

    fn awake(&mut self, ctx: &mut FrameContext<'a>) {
        self.actor = ctx.world.actor_by_role(Role::Player);
    }

    fn start(&mut self, ctx: &mut FrameContext<'a>) -> Result<(), GameError> {
        if self.actor.is_none() {
            self.actor = ctx.world.actor_by_role(Role::Player);
        }
        if self.actor.is_none() {
            tracing::warn!("no player actor, movement disabled");
            return Ok(());
        }
        self.mesh.scale = Vec3::splat(MESH_SCALE);
        self.warp_to_spawn(ctx);
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameContext<'a>, dt: f32) {
        if self.is_rolling() {
            self.advance_roll(ctx, dt);
            return;
        }
        if ctx.paused {
            return;
        }
        let (forward, right) = Self::intent(ctx);
        if let Some((dx, dz)) = resolve_step(forward, right, ctx.camera_azimuth) {
            self.try_step(ctx, dx, dz);
        }
    }

    fn needs_update(&self) -> bool {
        self.actor.is_some()
    }
}
