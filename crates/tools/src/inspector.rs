use tilecube_common::{EntityId, GridCoord};
use tilecube_game::Scene;
use tilecube_kernel::World;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a running scene for debugging and headless
/// runs.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &Scene) -> SceneSummary {
        tracing::debug!(tick = scene.world().tick(), "inspecting scene");
        SceneSummary {
            tick: scene.world().tick(),
            actor_count: scene.world().actor_count(),
            player_cell: scene.player_cell(),
            rolling: scene.player().is_rolling(),
            paused: scene.is_paused(),
            opacity: scene.overlay().opacity(),
            walkable: scene.terrain().walkable_count(),
            teleports: scene.teleports().len(),
        }
    }

    /// Transform of a specific actor, in world space.
    pub fn inspect_actor(world: &World, id: EntityId) -> Option<ActorInfo> {
        let data = world.get(id)?;
        let transform = world.world_transform(id)?;
        let p = transform.position;
        let r = transform.rotation;
        let s = transform.scale;
        Some(ActorInfo {
            id,
            name: data.name.clone(),
            position: [p.x, p.y, p.z],
            rotation: [r.x, r.y, r.z, r.w],
            scale: [s.x, s.y, s.z],
        })
    }

    /// All actor ids, in world storage order.
    pub fn list_actors(world: &World) -> Vec<EntityId> {
        world.actors().keys().copied().collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub tick: u64,
    pub actor_count: usize,
    pub player_cell: Option<GridCoord>,
    pub rolling: bool,
    pub paused: bool,
    pub opacity: f32,
    pub walkable: usize,
    pub teleports: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let cell = self
            .player_cell
            .map(|c| c.to_string())
            .unwrap_or_else(|| "-".to_string());
        write!(
            f,
            "Scene: tick={} actors={} player={} rolling={} paused={} opacity={:.2} walkable={} teleports={}",
            self.tick,
            self.actor_count,
            cell,
            self.rolling,
            self.paused,
            self.opacity,
            self.walkable,
            self.teleports
        )
    }
}

/// Detailed info about a single actor.
#[derive(Debug, Clone)]
pub struct ActorInfo {
    pub id: EntityId,
    pub name: String,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
}

impl std::fmt::Display for ActorInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Actor {} [{:.8}] pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.name,
            &self.id.0.to_string()[..8],
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}
