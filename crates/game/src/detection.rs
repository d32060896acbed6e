//! Proximity detection of the player with a delayed exit.
//!
//! # Invariants
//! - `on_enter` fires every time the player comes into range, `on_exit`
//!   once per loss.
//! - An exit is only reported after the player stayed out of range for the
//!   whole lose delay; re-entering cancels the pending exit.

use glam::{Vec2, Vec3};
use tilecube_common::{EntityId, Signal, Timer};
use tilecube_ecs::Component;
use tilecube_kernel::{Role, World};

use crate::config::GameConfig;
use crate::context::FrameContext;
use crate::GameError;

/// Payload of [`Detection::on_enter`] and [`Detection::on_exit`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DetectionEvent {
    pub player: EntityId,
    /// Monitored position at the time of the change.
    pub position: Vec3,
}

/// Edge reported by [`Detection::poll`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectionChange {
    Entered,
    Exited,
}

/// Watches the planar distance between the player and a position.
#[derive(Debug)]
pub struct Detection {
    host: Option<EntityId>,
    monitored: Option<Vec3>,
    radius: f32,
    lose_timer: Timer,
    player: Option<EntityId>,
    in_range: bool,
    detected: bool,
    active: bool,
    pub on_enter: Signal<DetectionEvent>,
    pub on_exit: Signal<DetectionEvent>,
}

impl Detection {
    /// Detection centered on `host`'s world position.
    pub fn new(host: Option<EntityId>, radius: f32, lose_delay_ms: f64) -> Self {
        Self {
            host,
            monitored: None,
            radius,
            lose_timer: Timer::new(lose_delay_ms),
            player: None,
            in_range: false,
            detected: false,
            active: true,
            on_enter: Signal::new(),
            on_exit: Signal::new(),
        }
    }

    pub fn from_config(host: Option<EntityId>, config: &GameConfig) -> Self {
        Self::new(host, config.detection_radius, config.lose_delay_ms)
    }

    /// Watch a fixed position instead of the host actor.
    pub fn monitor(mut self, position: Vec3) -> Self {
        self.monitored = Some(position);
        self
    }

    pub fn radius(&self) -> f32 {
        self.radius
    }

    pub fn detected(&self) -> bool {
        self.detected
    }

    /// False once the player lookup failed.
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn player(&self) -> Option<EntityId> {
        self.player
    }

    pub fn host(&self) -> Option<EntityId> {
        self.host
    }

    /// The point distances are measured from.
    pub fn monitored_position(&self, world: &World) -> Option<Vec3> {
        self.monitored
            .or_else(|| self.host.and_then(|host| world.world_position(host)))
    }

    /// Look up the player actor. Without one the detection stays idle.
    pub fn resolve_player(&mut self, world: &World) {
        self.player = world.actor_by_role(Role::Player);
        self.active = self.player.is_some();
        if !self.active {
            tracing::warn!(host = ?self.host, "no player actor, detection suspended");
        }
    }

    /// Sample the player's distance and report a detection edge, if any.
    pub fn poll(&mut self, world: &World, now_ms: f64) -> Option<DetectionChange> {
        if !self.active {
            return None;
        }
        let player = self.player?;
        let center = self.monitored_position(world)?;
        let target = world.world_position(player)?;
        let distance = Vec2::new(center.x, center.z).distance(Vec2::new(target.x, target.z));
        let in_range = distance <= self.radius;
        let was_in_range = std::mem::replace(&mut self.in_range, in_range);
        let event = DetectionEvent {
            player,
            position: center,
        };

        if in_range {
            self.lose_timer.reset();
            if !was_in_range {
                self.detected = true;
                tracing::debug!(?center, distance, "player detected");
                self.on_enter.emit(&event);
                return Some(DetectionChange::Entered);
            }
            return None;
        }

        if !self.detected {
            return None;
        }
        if was_in_range {
            self.lose_timer.start(now_ms);
        }
        if self.lose_timer.ready(now_ms) {
            self.detected = false;
            self.lose_timer.reset();
            tracing::debug!(?center, distance, "player lost");
            self.on_exit.emit(&event);
            return Some(DetectionChange::Exited);
        }
        None
    }
}

impl<'a> Component<FrameContext<'a>> for Detection {
    type Error = GameError;

    fn type_name(&self) -> &'static str {
        "Detection"
    }

    fn start(&mut self, ctx: &mut FrameContext<'a>) -> Result<(), GameError> {
        self.resolve_player(ctx.world);
        Ok(())
    }

    fn update(&mut self, ctx: &mut FrameContext<'a>, _dt: f32) {
        let now = ctx.now_ms();
        self.poll(ctx.world, now);
    }

    fn destroy(&mut self, _ctx: &mut FrameContext<'a>) {
        self.on_enter.clear();
        self.on_exit.clear();
    }

    fn needs_update(&self) -> bool {
        self.is_active()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;
    use tilecube_common::Transform;

    struct Setup {
        world: World,
        player: EntityId,
        detection: Detection,
        log: Rc<RefCell<Vec<(&'static str, f64)>>>,
        now: Rc<RefCell<f64>>,
    }

    /// Detection at the origin with radius 0.5 and a 1000 ms lose delay.
    fn setup() -> Setup {
        let mut world = World::new();
        let pad = world.spawn_actor("Pad", None, Transform::default());
        let player = world.spawn_actor("Player", None, Transform::default());
        world.assign_role(Role::Player, player);

        let mut detection = Detection::new(Some(pad), 0.5, 1000.0);
        let log = Rc::new(RefCell::new(Vec::new()));
        let now = Rc::new(RefCell::new(0.0));
        let (l, n) = (log.clone(), now.clone());
        detection
            .on_enter
            .connect(move |_| l.borrow_mut().push(("enter", *n.borrow())));
        let (l, n) = (log.clone(), now.clone());
        detection
            .on_exit
            .connect(move |_| l.borrow_mut().push(("exit", *n.borrow())));
        detection.resolve_player(&world);

        Setup {
            world,
            player,
            detection,
            log,
            now,
        }
    }

    impl Setup {
        /// Place the player at planar distance `x` and poll at `t` ms.
        fn at(&mut self, x: f32, t: f64) -> Option<DetectionChange> {
            self.world
                .set_local_position(self.player, Vec3::new(x, 0.5, 0.0));
            *self.now.borrow_mut() = t;
            self.detection.poll(&self.world, t)
        }
    }

    #[test]
    fn enter_and_delayed_exit() {
        let mut s = setup();
        assert_eq!(s.at(2.0, 0.0), None);
        assert_eq!(s.at(0.0, 100.0), Some(DetectionChange::Entered));
        assert!(s.detection.detected());
        assert_eq!(s.at(0.2, 200.0), None);

        assert_eq!(s.at(1.0, 300.0), None);
        assert_eq!(s.at(1.0, 1299.0), None);
        assert!(s.detection.detected());
        assert_eq!(s.at(1.0, 1300.0), Some(DetectionChange::Exited));
        assert!(!s.detection.detected());
        assert_eq!(*s.log.borrow(), vec![("enter", 100.0), ("exit", 1300.0)]);
    }

    #[test]
    fn boundary_counts_as_in_range_and_height_is_ignored() {
        let mut s = setup();
        assert_eq!(s.at(0.5, 0.0), Some(DetectionChange::Entered));
    }

    #[test]
    fn re_entry_enters_again_and_restarts_the_lose_delay() {
        let mut s = setup();
        assert_eq!(s.at(0.0, 0.0), Some(DetectionChange::Entered));
        assert_eq!(s.at(1.0, 100.0), None);
        assert!(s.detection.detected());
        assert_eq!(s.at(0.0, 600.0), Some(DetectionChange::Entered));
        assert_eq!(s.at(0.0, 650.0), None);
        assert_eq!(s.at(1.0, 700.0), None);
        // the first exit would have been due at 1100
        assert_eq!(s.at(1.0, 1150.0), None);
        assert_eq!(s.at(1.0, 1700.0), Some(DetectionChange::Exited));
        assert_eq!(
            *s.log.borrow(),
            vec![("enter", 0.0), ("enter", 600.0), ("exit", 1700.0)]
        );
    }

    #[test]
    fn explicit_position_overrides_host() {
        let mut s = setup();
        s.detection = Detection::new(None, 0.5, 0.0).monitor(Vec3::new(3.0, 0.0, 0.0));
        s.detection.resolve_player(&s.world);
        assert_eq!(s.at(0.0, 0.0), None);
        assert_eq!(s.at(3.2, 10.0), Some(DetectionChange::Entered));
        assert_eq!(s.at(0.0, 20.0), Some(DetectionChange::Exited));
    }

    #[test]
    fn without_player_detection_is_suspended() {
        let mut world = World::new();
        let pad = world.spawn_actor("Pad", None, Transform::default());
        let mut detection = Detection::new(Some(pad), 0.5, 0.0);
        detection.resolve_player(&world);
        assert!(!detection.needs_update());
        assert_eq!(detection.poll(&world, 0.0), None);
        assert!(!detection.detected());
    }

    #[test]
    fn signals_reach_every_listener() {
        let mut s = setup();
        let extra = Rc::new(RefCell::new(0));
        let e = extra.clone();
        s.detection.on_enter.connect(move |_| *e.borrow_mut() += 1);
        s.at(0.0, 0.0);
        assert_eq!(*extra.borrow(), 1);
        assert_eq!(s.log.borrow().len(), 1);
    }
}
