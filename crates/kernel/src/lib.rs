//! Actor world: the authoritative transforms of every actor in a scene.
//!
//! # Invariants
//! - All transform mutations flow through explicit operations and are logged.
//! - Collaborators are found through the role index, never by name search.

pub mod world;

pub use world::{ActorData, Role, World, WorldEvent};
