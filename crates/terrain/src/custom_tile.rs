use glam::Vec3;
use std::collections::BTreeMap;
use tilecube_common::EntityId;
use tilecube_ecs::Renderable;

/// What a custom tile handler gets to see when its tile is initialized.
#[derive(Debug, Clone)]
pub struct CustomTileInit<'a> {
    pub tag: &'a str,
    /// Actor hosting the terrain; returned renderables are attached to it.
    pub host: EntityId,
    pub position: Vec3,
}

/// Handler run once per occurrence of a custom tile tag.
pub type TileInitFn = Box<dyn FnMut(&CustomTileInit<'_>) -> Option<Renderable>>;

struct CustomTileEntry {
    on_init: Option<TileInitFn>,
    positions: Vec<Vec3>,
}

/// Named tile behaviors and the positions where their tiles were found.
#[derive(Default)]
pub struct CustomTileRegistry {
    entries: BTreeMap<String, CustomTileEntry>,
}

impl CustomTileRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a tag. Re-adding a tag replaces its handler and forgets its
    /// recorded positions.
    pub fn add(&mut self, tag: impl Into<String>, on_init: Option<TileInitFn>) {
        self.entries.insert(
            tag.into(),
            CustomTileEntry {
                on_init,
                positions: Vec::new(),
            },
        );
    }

    pub fn has(&self, tag: &str) -> bool {
        self.entries.contains_key(tag)
    }

    /// First recorded position of a tag, in row-major scan order.
    pub fn position_of(&self, tag: &str) -> Option<Vec3> {
        self.entries
            .get(tag)
            .and_then(|entry| entry.positions.first().copied())
    }

    pub fn positions_of(&self, tag: &str) -> &[Vec3] {
        self.entries
            .get(tag)
            .map(|entry| entry.positions.as_slice())
            .unwrap_or_default()
    }

    /// Registered tags, ordered by name.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Run the handler for one occurrence and record its position.
    /// Returns `None` for unregistered tags.
    pub(crate) fn init(
        &mut self,
        tag: &str,
        host: EntityId,
        position: Vec3,
    ) -> Option<Option<Renderable>> {
        let entry = self.entries.get_mut(tag)?;
        let renderable = entry.on_init.as_mut().and_then(|on_init| {
            on_init(&CustomTileInit {
                tag,
                host,
                position,
            })
        });
        entry.positions.push(position);
        Some(renderable)
    }
}

impl std::fmt::Debug for CustomTileRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_map()
            .entries(
                self.entries
                    .iter()
                    .map(|(tag, entry)| (tag, entry.positions.len())),
            )
            .finish()
    }
}
