use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilecube_common::{EntityId, Transform};

/// Logical role of a well-known actor, resolved once when a scene is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Role {
    Game,
    Terrain,
    Player,
    Camera,
}

/// An event record produced by every mutation to the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum WorldEvent {
    /// Actor was spawned with the given local transform.
    Spawned {
        id: EntityId,
        name: String,
        transform: Transform,
    },
    /// Actor was despawned. Carries the transform it had.
    Despawned { id: EntityId, transform: Transform },
    /// Actor local transform was updated.
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    /// A frame was stepped.
    Stepped { tick: u64 },
}

/// Per-actor data stored in the world.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActorData {
    pub name: String,
    pub transform: Transform,
    pub parent: Option<EntityId>,
}

/// The actor world.
///
/// Stores local transforms and the parent links between actors. Uses
/// BTreeMap so iteration order does not depend on hashing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct World {
    actors: BTreeMap<EntityId, ActorData>,
    roles: BTreeMap<Role, EntityId>,
    tick: u64,
    /// Append-only event log of all mutations.
    #[serde(skip)]
    event_log: Vec<WorldEvent>,
}

impl World {
    /// Create an empty world at tick 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current frame tick.
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Number of actors in the world.
    pub fn actor_count(&self) -> usize {
        self.actors.len()
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<WorldEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[WorldEvent] {
        &self.event_log
    }

    /// Read-only access to all actors.
    pub fn actors(&self) -> &BTreeMap<EntityId, ActorData> {
        &self.actors
    }

    /// Spawn an actor under an optional parent. Returns its id.
    pub fn spawn_actor(
        &mut self,
        name: impl Into<String>,
        parent: Option<EntityId>,
        transform: Transform,
    ) -> EntityId {
        let id = EntityId::new();
        let name = name.into();
        let parent = parent.filter(|p| self.actors.contains_key(p));
        tracing::trace!(%name, ?parent, "spawning actor");
        self.actors.insert(
            id,
            ActorData {
                name: name.clone(),
                transform,
                parent,
            },
        );
        self.event_log.push(WorldEvent::Spawned {
            id,
            name,
            transform,
        });
        id
    }

    /// Remove an actor. Its children are detached, not removed.
    pub fn despawn(&mut self, id: EntityId) -> Option<ActorData> {
        let data = self.actors.remove(&id)?;
        for actor in self.actors.values_mut() {
            if actor.parent == Some(id) {
                actor.parent = None;
            }
        }
        self.roles.retain(|_, actor| *actor != id);
        self.event_log.push(WorldEvent::Despawned {
            id,
            transform: data.transform,
        });
        Some(data)
    }

    pub fn get(&self, id: EntityId) -> Option<&ActorData> {
        self.actors.get(&id)
    }

    /// Bind a role to an actor, replacing any previous binding.
    pub fn assign_role(&mut self, role: Role, id: EntityId) -> bool {
        if !self.actors.contains_key(&id) {
            return false;
        }
        self.roles.insert(role, id);
        true
    }

    pub fn actor_by_role(&self, role: Role) -> Option<EntityId> {
        self.roles.get(&role).copied()
    }

    pub fn children_of(&self, id: EntityId) -> Vec<EntityId> {
        self.actors
            .iter()
            .filter(|(_, data)| data.parent == Some(id))
            .map(|(child, _)| *child)
            .collect()
    }

    pub fn local_transform(&self, id: EntityId) -> Option<Transform> {
        self.actors.get(&id).map(|data| data.transform)
    }

    /// Transform in world space, composed through the parent chain.
    pub fn world_transform(&self, id: EntityId) -> Option<Transform> {
        let data = self.actors.get(&id)?;
        let mut result = data.transform;
        let mut parent = data.parent;
        while let Some(pid) = parent {
            let Some(pdata) = self.actors.get(&pid) else {
                break;
            };
            result = pdata.transform.compose(&result);
            parent = pdata.parent;
        }
        Some(result)
    }

    pub fn world_position(&self, id: EntityId) -> Option<Vec3> {
        self.world_transform(id).map(|t| t.position)
    }

    /// Update an actor's local transform and log the change.
    pub fn set_local_transform(&mut self, id: EntityId, new: Transform) -> bool {
        if let Some(data) = self.actors.get_mut(&id) {
            let old = data.transform;
            data.transform = new;
            self.event_log
                .push(WorldEvent::TransformUpdated { id, old, new });
            true
        } else {
            false
        }
    }

    pub fn set_local_position(&mut self, id: EntityId, position: Vec3) -> bool {
        match self.local_transform(id) {
            Some(t) => self.set_local_transform(id, Transform { position, ..t }),
            None => false,
        }
    }

    /// Advance the frame counter.
    pub fn step(&mut self) {
        self.tick += 1;
        self.event_log.push(WorldEvent::Stepped { tick: self.tick });
    }
}
