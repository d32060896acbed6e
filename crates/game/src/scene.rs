//! Scene assembly and the per-frame update loop.
//!
//! # Invariants
//! - Collaborators are resolved once, while the scene is built; a failed
//!   lookup of a configured destination aborts the build.
//! - Components update in a fixed order every frame.
//! - At most one transition runs at a time. Gameplay input is paused from
//!   its trigger until the black hold ends.
//! - A request made once input is back but before the fade-out finished is
//!   queued and starts when the screen is clear; requests made while input
//!   is paused are dropped.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::rc::Rc;
use tilecube_common::{Clock, EntityId, GridCoord, SystemClock, Transform};
use tilecube_ecs::{Component, ComponentStore, MaterialHandle, MeshHandle, Renderable};
use tilecube_input::{Action, InputState};
use tilecube_kernel::{Role, World, WorldEvent};
use tilecube_terrain::{LevelDef, Terrain};

use crate::camera::CameraRig;
use crate::config::GameConfig;
use crate::context::{FrameContext, Transition};
use crate::detection::Detection;
use crate::events::{GameEvents, TeleportEvent};
use crate::overlay::{Overlay, OverlayEvent};
use crate::player::MovementController;
use crate::teleport::{Destination, SharedCooldown, Teleport};
use crate::GameError;

const DEFAULT_LEVEL: &str = include_str!("../levels/default.yaml");

fn default_spawn_tag() -> String {
    "Spawn".to_string()
}

/// A teleport pad declaration: every tile tagged `tag` sends the player to
/// `destination`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PadDef {
    pub tag: String,
    pub destination: Destination,
}

/// Everything needed to build a scene besides tunables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneDef {
    pub level: LevelDef,
    #[serde(default = "default_spawn_tag")]
    pub spawn_tag: String,
    #[serde(default)]
    pub pads: Vec<PadDef>,
}

impl SceneDef {
    /// A level with the default spawn tag and no pads.
    pub fn from_level(level: LevelDef) -> Self {
        Self {
            level,
            spawn_tag: default_spawn_tag(),
            pads: Vec::new(),
        }
    }

    /// The built-in arena.
    pub fn default_level() -> Result<Self, GameError> {
        Self::from_yaml_str(DEFAULT_LEVEL)
    }

    pub fn from_yaml_str(s: &str) -> Result<Self, GameError> {
        Ok(serde_yaml::from_str(s)?)
    }

    pub fn from_json_str(s: &str) -> Result<Self, GameError> {
        Ok(serde_json::from_str(s)?)
    }

    /// Load a scene file, picking the format from the extension.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GameError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path)?;
        match path.extension().and_then(|e| e.to_str()) {
            Some("yaml" | "yml") => Self::from_yaml_str(&data),
            Some("json") => Self::from_json_str(&data),
            other => Err(GameError::UnsupportedFormat(
                other.unwrap_or_default().to_string(),
            )),
        }
    }

    /// Add a pad declaration.
    pub fn with_pad(mut self, tag: impl Into<String>, destination: Destination) -> Self {
        self.pads.push(PadDef {
            tag: tag.into(),
            destination,
        });
        self
    }
}

/// State handed to components through [`FrameContext`].
struct SceneState {
    world: World,
    terrain: Terrain,
    store: ComponentStore,
    input: InputState,
    config: GameConfig,
    clock: Rc<dyn Clock>,
    events: GameEvents,
    requests: Vec<Transition>,
}

impl SceneState {
    fn ctx(&mut self, camera_azimuth: f32, paused: bool) -> FrameContext<'_> {
        FrameContext {
            world: &mut self.world,
            terrain: &self.terrain,
            input: &self.input,
            bindings: &self.config.bindings,
            clock: &*self.clock,
            events: &mut self.events,
            requests: &mut self.requests,
            camera_azimuth,
            paused,
        }
    }
}

/// Builds a [`Scene`]: spawns the well-known actors, initializes the
/// terrain with spawn and pad tiles, and starts every component.
pub struct SceneBuilder {
    def: SceneDef,
    config: GameConfig,
    clock: Option<Rc<dyn Clock>>,
}

impl SceneBuilder {
    pub fn new(def: SceneDef) -> Self {
        Self {
            def,
            config: GameConfig::default(),
            clock: None,
        }
    }

    pub fn config(mut self, config: GameConfig) -> Self {
        self.config = config;
        self
    }

    /// Clock for cooldowns and delays. Defaults to the system clock.
    pub fn clock(mut self, clock: Rc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<Scene, GameError> {
        let Self { def, config, clock } = self;
        let _span = tracing::info_span!("scene_build", level = %def.level.name).entered();

        let mut world = World::new();
        let mut store = ComponentStore::new();
        let game = world.spawn_actor("Game", None, Transform::default());
        let terrain_actor = world.spawn_actor("Terrain", Some(game), Transform::default());
        let player_actor = world.spawn_actor("Player", None, Transform::default());
        let camera_actor = world.spawn_actor("Camera", None, Transform::default());
        for (role, id, name) in [
            (Role::Game, game, "Game"),
            (Role::Terrain, terrain_actor, "Terrain"),
            (Role::Player, player_actor, "Player"),
            (Role::Camera, camera_actor, "Camera"),
        ] {
            world.assign_role(role, id);
            store.set_name(id, name);
        }
        store.attach(
            player_actor,
            Renderable {
                mesh: MeshHandle::CUBE,
                material: MaterialHandle(0),
                transform: Transform::default(),
            },
        );

        let mut grid = def.level.build_grid()?;
        grid.register_marker(def.spawn_tag.clone())?;
        let pad_material = MaterialHandle(grid.tile_types().len() as u64);
        for pad in &def.pads {
            grid.register_custom_tile(pad.tag.clone(), move |init| {
                Some(Renderable {
                    mesh: MeshHandle::TILE_PAD,
                    material: pad_material,
                    transform: Transform::from_position(init.position),
                })
            })?;
        }
        let mut terrain = Terrain::new(grid);
        terrain.initialize(terrain_actor, &mut store)?;

        let cooldown = SharedCooldown::new(config.teleport_cooldown_ms);
        let mut teleports = Vec::new();
        for pad in &def.pads {
            for &position in terrain.positions_of(&pad.tag) {
                let name = format!("{}@{}", pad.tag, GridCoord::from_position(position));
                let host = world.spawn_actor(
                    name.clone(),
                    Some(terrain_actor),
                    Transform::from_position(position),
                );
                store.set_name(host, name);
                teleports.push(Teleport::on_host(
                    host,
                    pad.destination.clone(),
                    cooldown.clone(),
                    &config,
                ));
            }
        }

        let clock = clock.unwrap_or_else(|| Rc::new(SystemClock::new()) as Rc<dyn Clock>);
        let player = MovementController::new(&config).with_spawn_tag(def.spawn_tag.clone());
        let camera = CameraRig::from(config.camera);
        let overlay = Overlay::new(config.fade_duration_ms, config.fade_hold_ms);
        let mut scene = Scene {
            state: SceneState {
                world,
                terrain,
                store,
                input: InputState::new(),
                config,
                clock,
                events: GameEvents::new(),
                requests: Vec::new(),
            },
            camera,
            overlay,
            player,
            detections: Vec::new(),
            teleports,
            transition: None,
            queued: None,
            paused: false,
            frame_events: Vec::new(),
        };
        scene.start()?;

        tracing::info!(
            actors = scene.state.world.actor_count(),
            teleports = scene.teleports.len(),
            walkable = scene.state.terrain.walkable_count(),
            "scene built"
        );
        Ok(scene)
    }
}

/// A running level: world, terrain, player, triggers and the fade overlay.
pub struct Scene {
    state: SceneState,
    camera: CameraRig,
    overlay: Overlay,
    player: MovementController,
    detections: Vec<Detection>,
    teleports: Vec<Teleport>,
    transition: Option<Transition>,
    queued: Option<Transition>,
    paused: bool,
    frame_events: Vec<WorldEvent>,
}

impl Scene {
    fn start(&mut self) -> Result<(), GameError> {
        let mut ctx = self.state.ctx(self.camera.azimuth, self.paused);
        self.player.awake(&mut ctx);
        for teleport in &mut self.teleports {
            teleport.awake(&mut ctx);
        }
        self.player.start(&mut ctx)?;
        for teleport in &mut self.teleports {
            teleport.start(&mut ctx)?;
        }
        drop(ctx);
        self.sync_camera();
        Ok(())
    }

    /// Advance one frame of `dt` seconds.
    pub fn update(&mut self, dt: f32) {
        let _span = tracing::trace_span!("scene_update", tick = self.state.world.tick()).entered();
        self.state.world.step();

        if let Some(event) = self.overlay.update(dt) {
            self.on_overlay_event(event);
        }

        if !self.paused
            && self
                .state
                .input
                .was_action_just_pressed(Action::Respawn, &self.state.config.bindings)
        {
            self.begin_transition(Transition::Respawn);
        }

        self.camera.update(&self.state.input, self.camera.target);
        self.sync_camera();

        let mut ctx = self.state.ctx(self.camera.azimuth, self.paused);
        if self.player.needs_update() {
            self.player.update(&mut ctx, dt);
        }
        for detection in &mut self.detections {
            if detection.needs_update() {
                detection.update(&mut ctx, dt);
            }
        }
        for teleport in &mut self.teleports {
            if teleport.needs_update() {
                teleport.update(&mut ctx, dt);
            }
        }
        drop(ctx);

        for request in std::mem::take(&mut self.state.requests) {
            self.begin_transition(request);
        }
        self.state.input.end_frame();
        self.frame_events = self.state.world.drain_events();
    }

    /// Point the rig at the player and move the camera actor to the eye.
    fn sync_camera(&mut self) {
        if let Some(target) = self.player.visual_position(&self.state.world) {
            self.camera.target = target;
        }
        if let Some(camera) = self.state.world.actor_by_role(Role::Camera) {
            self.state.world.set_local_position(camera, self.camera.eye());
        }
    }

    fn begin_transition(&mut self, transition: Transition) {
        if let Some(running) = self.transition {
            if self.paused || self.queued.is_some() {
                tracing::debug!(?running, ?transition, "transition already running, request dropped");
            } else {
                tracing::debug!(?running, ?transition, "transition queued");
                self.queued = Some(transition);
            }
            return;
        }
        tracing::debug!(?transition, "transition started");
        self.transition = Some(transition);
        self.paused = true;
        self.overlay.fade_in();
    }

    fn on_overlay_event(&mut self, event: OverlayEvent) {
        match event {
            OverlayEvent::Opaque => {
                match self.transition {
                    Some(Transition::Teleport(destination)) => self.teleport_player(destination),
                    Some(Transition::Respawn) => {
                        let mut ctx = self.state.ctx(self.camera.azimuth, self.paused);
                        self.player.warp_to_spawn(&mut ctx);
                    }
                    None => {}
                }
                self.overlay.fade_out();
            }
            OverlayEvent::HoldComplete => self.paused = false,
            OverlayEvent::Transparent => {
                tracing::debug!(transition = ?self.transition, "transition finished");
                self.transition = None;
                self.paused = false;
                if let Some(next) = self.queued.take() {
                    self.begin_transition(next);
                }
            }
        }
    }

    fn teleport_player(&mut self, destination: Vec3) {
        let Some(actor) = self.player.actor() else {
            return;
        };
        let world = &mut self.state.world;
        let from = world.world_position(actor).unwrap_or_default();
        self.player.warp_to_position(world, destination);
        let to = world.world_position(actor).unwrap_or_default();
        tracing::info!(?from, ?to, "player teleported");
        self.state.events.teleported.emit(&TeleportEvent { from, to });
    }

    /// Warp the player immediately, outside of any transition.
    pub fn warp_player(&mut self, position: Vec3) {
        self.player.warp_to_position(&mut self.state.world, position);
        self.sync_camera();
    }

    /// Start `detection` and add it to the per-frame update.
    /// Returns its index for [`Scene::detection`].
    pub fn add_detection(&mut self, mut detection: Detection) -> Result<usize, GameError> {
        let mut ctx = self.state.ctx(self.camera.azimuth, self.paused);
        detection.awake(&mut ctx);
        detection.start(&mut ctx)?;
        self.detections.push(detection);
        Ok(self.detections.len() - 1)
    }

    /// Run every component's `destroy` hook.
    pub fn shutdown(&mut self) {
        let mut ctx = self.state.ctx(self.camera.azimuth, self.paused);
        self.player.destroy(&mut ctx);
        for detection in &mut self.detections {
            detection.destroy(&mut ctx);
        }
        for teleport in &mut self.teleports {
            teleport.destroy(&mut ctx);
        }
        drop(ctx);
        self.state.events.player_respawned.clear();
        self.state.events.teleported.clear();
    }

    pub fn player(&self) -> &MovementController {
        &self.player
    }

    /// Cell the player occupies.
    pub fn player_cell(&self) -> Option<GridCoord> {
        self.player.grid_position(&self.state.world)
    }

    pub fn player_actor(&self) -> Option<EntityId> {
        self.player.actor()
    }

    pub fn terrain(&self) -> &Terrain {
        &self.state.terrain
    }

    pub fn world(&self) -> &World {
        &self.state.world
    }

    pub fn store(&self) -> &ComponentStore {
        &self.state.store
    }

    pub fn config(&self) -> &GameConfig {
        &self.state.config
    }

    pub fn camera(&self) -> &CameraRig {
        &self.camera
    }

    pub fn overlay(&self) -> &Overlay {
        &self.overlay
    }

    pub fn events_mut(&mut self) -> &mut GameEvents {
        &mut self.state.events
    }

    pub fn input_mut(&mut self) -> &mut InputState {
        &mut self.state.input
    }

    pub fn detection(&self, index: usize) -> Option<&Detection> {
        self.detections.get(index)
    }

    pub fn detection_mut(&mut self, index: usize) -> Option<&mut Detection> {
        self.detections.get_mut(index)
    }

    pub fn teleports(&self) -> &[Teleport] {
        &self.teleports
    }

    pub fn transition(&self) -> Option<Transition> {
        self.transition
    }

    /// Transition waiting for the running one to finish.
    pub fn queued_transition(&self) -> Option<Transition> {
        self.queued
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// World events recorded during the last update.
    pub fn frame_events(&self) -> &[WorldEvent] {
        &self.frame_events
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::io::Write;
    use tilecube_common::{ManualClock, Signal};
    use tilecube_input::Key;
    use tilecube_terrain::{TerrainError, Tile};

    const DT: f32 = 1.0 / 60.0;

    struct Harness {
        scene: Scene,
        clock: Rc<ManualClock>,
    }

    impl Harness {
        fn new(def: SceneDef) -> Self {
            let clock = Rc::new(ManualClock::new());
            let scene = SceneBuilder::new(def).clock(clock.clone()).build().unwrap();
            Self { scene, clock }
        }

        fn frame(&mut self, key: Option<Key>) {
            if let Some(key) = key {
                self.scene.input_mut().press(key);
            }
            self.scene.update(DT);
            if let Some(key) = key {
                self.scene.input_mut().release(key);
            }
            self.clock.advance(f64::from(DT) * 1000.0);
        }

        fn frames(&mut self, n: usize) {
            for _ in 0..n {
                self.frame(None);
            }
        }
    }

    fn count<T: 'static>(signal: &mut Signal<T>) -> Rc<Cell<usize>> {
        let count = Rc::new(Cell::new(0));
        let seen = count.clone();
        signal.connect(move |_| seen.set(seen.get() + 1));
        count
    }

    /// `[[W,W,W],[W,"TP_A","."],[".","TP_B","."],[W,W,W]]`, pads linked both ways.
    fn two_pads() -> SceneDef {
        let w = || Tile::from(1);
        let f = || Tile::from(-1);
        let level = LevelDef {
            name: "two-pads".into(),
            tile_types: [("Floor", -1), ("Empty", 0), ("Wall", 1), ("DemiWall", 2)]
                .into_iter()
                .map(|(name, id)| (name.to_string(), id))
                .collect(),
            rows: vec![
                vec![w(), w(), w()],
                vec![w(), "TP_A".into(), f()],
                vec![f(), "TP_B".into(), f()],
                vec![w(), w(), w()],
            ],
        };
        SceneDef::from_level(level)
            .with_pad("TP_A", Destination::tag("TP_B"))
            .with_pad("TP_B", Destination::tag("TP_A"))
    }

    #[test]
    fn default_level_builds() {
        let h = Harness::new(SceneDef::default_level().unwrap());
        let scene = &h.scene;
        assert_eq!(scene.terrain().width(), 19);
        assert_eq!(scene.terrain().height(), 8);
        assert_eq!(scene.terrain().walkable_count(), 6 * 17);
        assert_eq!(scene.player_cell(), Some(GridCoord::new(8, 3)));
        assert_eq!(scene.teleports().len(), 2);
        assert_eq!(scene.teleports()[0].destination(), &Destination::tag("TP_B"));
        assert_eq!(
            scene.teleports()[0].resolved_destination(),
            Some(Vec3::new(17.0, 0.0, 1.0))
        );
        assert_eq!(
            scene.teleports()[1].resolved_destination(),
            Some(Vec3::new(1.0, 0.0, 1.0))
        );
        assert_eq!(scene.world().actor_by_role(Role::Player), scene.player_actor());
        assert!(!scene.is_paused());
    }

    #[test]
    fn pad_tiles_get_pad_geometry() {
        let h = Harness::new(two_pads());
        let terrain_actor = h.scene.world().actor_by_role(Role::Terrain).unwrap();
        let pads = h
            .scene
            .store()
            .renderables_of(terrain_actor)
            .iter()
            .filter(|r| r.mesh == MeshHandle::TILE_PAD)
            .count();
        assert_eq!(pads, 2);
        assert_eq!(h.scene.world().children_of(terrain_actor).len(), 2);
    }

    #[test]
    fn stepping_onto_a_pad_teleports_to_its_partner() {
        let mut h = Harness::new(two_pads());
        let teleported = count(&mut h.scene.events_mut().teleported);

        // no Spawn tile in this level: start next to TP_A
        h.scene.warp_player(Vec3::new(2.0, 0.0, 1.0));
        h.frame(Some(Key::A));
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(1, 1)));
        assert!(h.scene.is_paused());
        assert_eq!(h.scene.transition(), Some(Transition::Teleport(Vec3::new(1.0, 0.0, 2.0))));

        // input is ignored while the screen fades
        h.frames(20);
        h.frame(Some(Key::D));
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(1, 1)));

        h.frames(200);
        assert_eq!(teleported.get(), 1);
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(1, 2)));
        assert_ne!(h.scene.player_cell(), Some(GridCoord::new(1, 1)));
        assert!(!h.scene.is_paused());
        assert!(h.scene.overlay().is_transparent());
        assert_eq!(h.scene.transition(), None);
        // arriving on the partner pad did not bounce back
        assert_eq!(h.scene.teleports()[0].triggered(), 1);
        assert_eq!(h.scene.teleports()[1].triggered(), 0);
        assert!(h.scene.teleports()[1].detection().detected());
    }

    #[test]
    fn stepping_back_onto_the_arrival_pad_teleports_again() {
        let mut h = Harness::new(SceneDef::default_level().unwrap());
        let teleported = count(&mut h.scene.events_mut().teleported);

        h.scene.warp_player(Vec3::new(2.0, 0.0, 1.0));
        h.frame(Some(Key::A));
        h.frames(200);
        assert_eq!(teleported.get(), 1);
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(17, 1)));
        assert_eq!(h.scene.transition(), None);

        // off and straight back on, well inside the lose delay
        h.frame(Some(Key::A));
        h.frames(15);
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(16, 1)));
        assert!(h.scene.teleports()[1].detection().detected());
        h.frame(Some(Key::D));
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(17, 1)));
        assert_eq!(
            h.scene.transition(),
            Some(Transition::Teleport(Vec3::new(1.0, 0.0, 1.0)))
        );

        h.frames(200);
        assert_eq!(teleported.get(), 2);
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(1, 1)));
        assert_eq!(h.scene.teleports()[0].triggered(), 1);
        assert_eq!(h.scene.teleports()[1].triggered(), 1);
    }

    #[test]
    fn pad_entered_during_the_fade_back_runs_next() {
        let mut h = Harness::new(SceneDef::default_level().unwrap());
        let teleported = count(&mut h.scene.events_mut().teleported);

        h.frame(Some(Key::R));
        while h.scene.is_paused() {
            h.frame(None);
        }
        assert_eq!(h.scene.transition(), Some(Transition::Respawn));

        h.scene.warp_player(Vec3::new(2.0, 0.0, 1.0));
        h.frame(Some(Key::A));
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(1, 1)));
        assert_eq!(h.scene.teleports()[0].triggered(), 1);
        assert_eq!(
            h.scene.queued_transition(),
            Some(Transition::Teleport(Vec3::new(17.0, 0.0, 1.0)))
        );

        h.frames(300);
        assert_eq!(teleported.get(), 1);
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(17, 1)));
        assert_eq!(h.scene.transition(), None);
        assert_eq!(h.scene.queued_transition(), None);
        assert!(!h.scene.is_paused());
        // arrival during the hold does not spend the cooldown
        assert_eq!(h.scene.teleports()[1].triggered(), 0);
        assert!(h.scene.teleports()[1].detection().detected());
    }

    #[test]
    fn respawn_fades_back_to_spawn() {
        let mut h = Harness::new(SceneDef::default_level().unwrap());
        let respawned = count(&mut h.scene.events_mut().player_respawned);

        h.frame(Some(Key::D));
        h.frames(30);
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(9, 3)));

        h.frame(Some(Key::R));
        assert!(h.scene.is_paused());
        assert_eq!(h.scene.transition(), Some(Transition::Respawn));
        // a second request while one runs is dropped
        h.frame(Some(Key::R));

        h.frames(200);
        assert_eq!(respawned.get(), 1);
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(8, 3)));
        assert!(!h.scene.is_paused());
    }

    #[test]
    fn input_resumes_when_the_hold_ends() {
        let mut h = Harness::new(SceneDef::default_level().unwrap());
        h.frame(Some(Key::R));
        let mut frames = 1;
        while h.scene.is_paused() {
            h.frame(None);
            frames += 1;
            assert!(frames < 1000);
        }
        // fade in plus hold, the fade back is still running
        assert!(!h.scene.overlay().is_transparent());
        assert!(h.scene.transition().is_some());
        h.frame(Some(Key::W));
        assert_eq!(h.scene.player_cell(), Some(GridCoord::new(8, 2)));
    }

    #[test]
    fn detections_fire_their_signals() {
        let mut h = Harness::new(SceneDef::default_level().unwrap());
        let mut detection = Detection::new(None, 0.5, 0.0).monitor(Vec3::new(9.0, 0.0, 3.0));
        let entered = count(&mut detection.on_enter);
        let index = h.scene.add_detection(detection).unwrap();

        h.frame(Some(Key::D));
        assert_eq!(entered.get(), 1);
        assert!(h.scene.detection(index).unwrap().detected());
    }

    #[test]
    fn camera_actor_tracks_the_eye() {
        let mut h = Harness::new(SceneDef::default_level().unwrap());
        h.scene.input_mut().press_mouse(tilecube_input::MouseButton::Left);
        h.scene.input_mut().move_mouse(glam::Vec2::new(40.0, 0.0));
        h.frame(None);

        let camera = h.scene.world().actor_by_role(Role::Camera).unwrap();
        let position = h.scene.world().world_position(camera).unwrap();
        assert!((position - h.scene.camera().eye()).length() < 1e-4);
        assert!((h.scene.camera().azimuth + 0.2).abs() < 1e-5);
        assert!(!h.scene.frame_events().is_empty());
    }

    #[test]
    fn unknown_destination_aborts_the_build() {
        let def = SceneDef::from_level(two_pads().level)
            .with_pad("TP_A", Destination::tag("TP_Z"));
        let err = SceneBuilder::new(def)
            .clock(Rc::new(ManualClock::new()))
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, GameError::DestinationNotFound(tag) if tag == "TP_Z"));
    }

    #[test]
    fn ragged_level_aborts_the_build() {
        let mut def = two_pads();
        def.level.rows[2].pop();
        let err = SceneBuilder::new(def).build().err().unwrap();
        assert!(matches!(
            err,
            GameError::Terrain(TerrainError::RaggedRow { row: 2, .. })
        ));
    }

    #[test]
    fn scene_files_load_from_yaml_and_json() {
        let yaml = SceneDef::default_level().unwrap();
        let json = serde_json::to_string(&yaml).unwrap();

        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        file.write_all(json.as_bytes()).unwrap();
        let loaded = SceneDef::load(file.path()).unwrap();
        assert_eq!(loaded, yaml);
        assert_eq!(loaded.pads.len(), 2);

        let minimal = SceneDef::from_yaml_str(
            "level:\n  tile_types: { Wall: 1, DemiWall: 2 }\n  rows: [[Spawn]]\n",
        )
        .unwrap();
        assert_eq!(minimal.spawn_tag, "Spawn");
        assert!(minimal.pads.is_empty());
    }

    #[test]
    fn shutdown_disconnects_listeners() {
        let mut h = Harness::new(SceneDef::default_level().unwrap());
        count(&mut h.scene.events_mut().player_respawned);
        h.scene.shutdown();
        assert_eq!(h.scene.events_mut().player_respawned.listener_count(), 0);
    }
}
