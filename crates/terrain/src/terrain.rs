use glam::Vec3;
use tilecube_common::{EntityId, Transform};
use tilecube_ecs::{ComponentStore, MaterialHandle, MeshHandle, Renderable};

use crate::grid::{Grid, Tile};
use crate::TerrainError;

/// Terrain built from a [`Grid`]: runs the initialization pass and answers
/// walkability and custom tile queries afterwards.
#[derive(Debug)]
pub struct Terrain {
    grid: Grid,
}

impl Terrain {
    /// Elevation of the walkable surface.
    pub const Y: f32 = 0.0;

    pub fn new(grid: Grid) -> Self {
        Self { grid }
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Custom tile handlers can only be registered through this before
    /// [`Terrain::initialize`] runs.
    pub fn grid_mut(&mut self) -> &mut Grid {
        &mut self.grid
    }

    pub fn is_walkable(&self, x: i32, z: i32) -> bool {
        self.grid.is_walkable(x, z)
    }

    pub fn walkable_count(&self) -> usize {
        self.grid.walkable_count()
    }

    pub fn first_position_of(&self, tag: &str) -> Option<Vec3> {
        self.grid.first_position_of(tag)
    }

    pub fn positions_of(&self, tag: &str) -> &[Vec3] {
        self.grid.positions_of(tag)
    }

    /// Scan every cell once in row-major order: fill the walkable set, run
    /// custom tile handlers, and attach floor and wall geometry to `host`.
    ///
    /// Returns the number of renderables attached.
    pub fn initialize(
        &mut self,
        host: EntityId,
        store: &mut ComponentStore,
    ) -> Result<usize, TerrainError> {
        let _span = tracing::info_span!("terrain_init").entered();
        self.grid.mark_initialized()?;

        let floor_material = self.material_for("Floor");
        let mut attached = 0;
        for z in 0..self.grid.height() as i32 {
            for x in 0..self.grid.width() as i32 {
                if let Some(custom) = self.grid.init_cell(x, z, Self::Y, host) {
                    store.attach(host, custom);
                    attached += 1;
                }

                store.attach(
                    host,
                    piece(MeshHandle::CUBE, floor_material, Vec3::new(x as f32, Self::Y - 0.5, z as f32)),
                );
                attached += 1;

                let Some(tile) = self.grid.tile_at(x, z) else {
                    continue;
                };
                let wall = if self.grid.is_wall(tile) {
                    Some((MeshHandle::CUBE, 0.5))
                } else if self.grid.is_demi_wall(tile) {
                    Some((MeshHandle::DEMI_CUBE, 0.25))
                } else {
                    None
                };
                if let Some((mesh, y)) = wall {
                    let material = self.material_for_tile(tile);
                    store.attach(host, piece(mesh, material, Vec3::new(x as f32, y, z as f32)));
                    attached += 1;
                }
            }
        }

        tracing::info!(
            width = self.grid.width(),
            height = self.grid.height(),
            walkable = self.grid.walkable_count(),
            attached,
            "terrain initialized"
        );
        Ok(attached)
    }

    /// Materials are numbered by the tile type's rank in the registry.
    fn material_for(&self, name: &str) -> MaterialHandle {
        let rank = self
            .grid
            .tile_types()
            .iter()
            .position(|(n, _)| n == name)
            .unwrap_or(0);
        MaterialHandle(rank as u64)
    }

    fn material_for_tile(&self, tile: &Tile) -> MaterialHandle {
        match tile {
            Tile::Id(id) => self.material_for(self.grid.tile_types().name(*id).unwrap_or_default()),
            Tile::Tag(tag) => self.material_for(tag),
        }
    }
}

fn piece(mesh: MeshHandle, material: MaterialHandle, position: Vec3) -> Renderable {
    Renderable {
        mesh,
        material,
        transform: Transform::from_position(position),
    }
}
