//! Component model: lifecycle hooks and renderables attached to actors.
//!
//! Components receive their collaborators through an explicit context value
//! instead of looking them up in a global scene tree.
//!
//! # Invariants
//! - Storage iteration order is deterministic (BTreeMap).
//! - Renderables stay attached to the actor they were added to, in insertion order.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tilecube_common::{EntityId, Transform};

/// Lifecycle hooks of a component driven by a host scene.
///
/// `C` is the per-frame context the host passes in. Hooks run in this order:
/// `awake` once, `start` once (may fail, aborting scene setup), `update`
/// every frame while [`Component::needs_update`] is true, `destroy` once.
pub trait Component<C> {
    type Error: std::error::Error;

    fn type_name(&self) -> &'static str;

    fn awake(&mut self, _ctx: &mut C) {}

    fn start(&mut self, _ctx: &mut C) -> Result<(), Self::Error> {
        Ok(())
    }

    fn update(&mut self, ctx: &mut C, dt: f32);

    fn destroy(&mut self, _ctx: &mut C) {}

    /// A component may switch itself off, e.g. when a collaborator it needs
    /// never showed up.
    fn needs_update(&self) -> bool {
        true
    }
}

/// A handle referencing a mesh asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MeshHandle(pub u64);

impl MeshHandle {
    pub const CUBE: Self = Self(0);
    pub const DEMI_CUBE: Self = Self(1);
    pub const TILE_PAD: Self = Self(2);
}

/// A handle referencing a material asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MaterialHandle(pub u64);

/// Human-readable name component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Name(pub String);

/// A renderable object attached to an actor, positioned relative to it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Renderable {
    pub mesh: MeshHandle,
    pub material: MaterialHandle,
    pub transform: Transform,
}

/// Deterministic storage for names and attached renderables.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStore {
    names: BTreeMap<EntityId, Name>,
    renderables: BTreeMap<EntityId, Vec<Renderable>>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Name ---
    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        self.names.insert(entity, Name(name.into()));
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&Name> {
        self.names.get(&entity)
    }

    pub fn names(&self) -> &BTreeMap<EntityId, Name> {
        &self.names
    }

    // --- Renderables ---
    pub fn attach(&mut self, entity: EntityId, renderable: Renderable) {
        self.renderables.entry(entity).or_default().push(renderable);
    }

    pub fn renderables_of(&self, entity: EntityId) -> &[Renderable] {
        self.renderables
            .get(&entity)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Total number of renderables across all actors.
    pub fn renderable_count(&self) -> usize {
        self.renderables.values().map(Vec::len).sum()
    }

    /// Remove all components for an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.names.remove(&entity);
        if let Some(removed) = self.renderables.remove(&entity) {
            tracing::trace!(count = removed.len(), "dropped renderables");
        }
    }
}

pub fn crate_info() -> &'static str {
    "tilecube-ecs v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cube() -> Renderable {
        Renderable {
            mesh: MeshHandle::CUBE,
            material: MaterialHandle(0),
            transform: Transform::default(),
        }
    }

    #[test]
    fn name_set_and_replace() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.set_name(id, "First");
        store.set_name(id, "Second");
        assert_eq!(store.get_name(id).unwrap().0, "Second");
        assert_eq!(store.names().len(), 1);
    }

    #[test]
    fn renderables_keep_insertion_order() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.attach(id, cube());
        store.attach(
            id,
            Renderable {
                mesh: MeshHandle::DEMI_CUBE,
                ..cube()
            },
        );
        let attached = store.renderables_of(id);
        assert_eq!(attached.len(), 2);
        assert_eq!(attached[1].mesh, MeshHandle::DEMI_CUBE);
        assert_eq!(store.renderable_count(), 2);
    }

    #[test]
    fn unknown_entity_has_no_renderables() {
        let store = ComponentStore::new();
        assert!(store.renderables_of(EntityId::new()).is_empty());
    }

    #[test]
    fn remove_entity_clears_all() {
        let mut store = ComponentStore::new();
        let id = EntityId::new();
        store.set_name(id, "Test");
        store.attach(id, cube());

        store.remove_entity(id);
        assert!(store.get_name(id).is_none());
        assert!(store.renderables_of(id).is_empty());
    }

    #[test]
    fn deterministic_iteration_order() {
        let mut store = ComponentStore::new();
        let mut ids: Vec<EntityId> = (0..50).map(|_| EntityId::new()).collect();
        for id in &ids {
            store.set_name(*id, format!("actor_{}", id.0));
        }
        ids.sort();
        let stored_keys: Vec<EntityId> = store.names().keys().copied().collect();
        assert_eq!(stored_keys, ids);
    }

    struct Counter {
        updates: u32,
        limit: u32,
    }

    #[derive(Debug)]
    struct Never;

    impl std::fmt::Display for Never {
        fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("never")
        }
    }

    impl std::error::Error for Never {}

    impl Component<Vec<u32>> for Counter {
        type Error = Never;

        fn type_name(&self) -> &'static str {
            "Counter"
        }

        fn update(&mut self, ctx: &mut Vec<u32>, _dt: f32) {
            self.updates += 1;
            ctx.push(self.updates);
        }

        fn needs_update(&self) -> bool {
            self.updates < self.limit
        }
    }

    #[test]
    fn component_default_hooks_and_suspension() {
        let mut log = Vec::new();
        let mut counter = Counter {
            updates: 0,
            limit: 2,
        };
        counter.awake(&mut log);
        assert!(counter.start(&mut log).is_ok());
        for _ in 0..5 {
            if counter.needs_update() {
                counter.update(&mut log, 0.016);
            }
        }
        counter.destroy(&mut log);
        assert_eq!(log, vec![1, 2]);
        assert_eq!(counter.type_name(), "Counter");
    }
}
