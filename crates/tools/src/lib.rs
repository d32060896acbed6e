//! Developer tooling: scene inspector and ASCII level maps.
//!
//! # Invariants
//! - Tools only read scene state; they never mutate it.

mod inspector;
mod map;

pub use inspector::{ActorInfo, SceneInspector, SceneSummary};
pub use map::{ascii_map, custom_tile_report};

pub fn crate_info() -> &'static str {
    "tilecube-tools v0.1.0"
}
