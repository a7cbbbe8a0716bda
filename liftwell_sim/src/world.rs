// Dense voxel storage for the reference host.
//
// `VoxelWorld` stores one world's materials as a flat `Vec<Material>` indexed
// by `x + z * size_x + (y - min_y) * size_x * size_z`, giving O(1) read/write.
// The vertical range is `[min_y, min_y + size_y)` so worlds can extend below
// zero the way real hosts do. Out-of-bounds reads return `Air`; out-of-bounds
// writes are no-ops.
//
// `Worlds` maps `WorldId` to `VoxelWorld` and implements `WorldQuery`, which
// is everything the pattern validator and floor-group cache need from a host.
// Unknown worlds read as empty air with a zero-height range, so a rescan over
// them visits nothing.
//
// See also: `host.rs` for the `WorldQuery` trait, `sandbox.rs` which owns a
// `Worlds` as part of `SandboxHost`, `pattern.rs` for the predicate that
// reads it.

use crate::host::WorldQuery;
use crate::types::{Compass, Material, Position, WorldId};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Dense 3D material grid for one world.
#[derive(Clone, Debug, Default)]
pub struct VoxelWorld {
    /// Flat storage: index = x + z * size_x + (y - min_y) * size_x * size_z.
    voxels: Vec<Material>,
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
    /// Lowest buildable height (inclusive).
    pub min_y: i32,
}

/// Dimensions of a world, as written in scenario files.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorldShape {
    pub size_x: u32,
    pub size_y: u32,
    pub size_z: u32,
    #[serde(default)]
    pub min_y: i32,
}

impl VoxelWorld {
    /// Create a new world filled with `Air`.
    pub fn new(shape: WorldShape) -> Self {
        let total = (shape.size_x as usize) * (shape.size_y as usize) * (shape.size_z as usize);
        Self {
            voxels: vec![Material::Air; total],
            size_x: shape.size_x,
            size_y: shape.size_y,
            size_z: shape.size_z,
            min_y: shape.min_y,
        }
    }

    /// Highest buildable height plus one (exclusive bound).
    pub fn max_y(&self) -> i32 {
        self.min_y + self.size_y as i32
    }

    /// Check whether a position's coordinates are within bounds. The world
    /// component is not consulted.
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.x >= 0
            && pos.z >= 0
            && pos.y >= self.min_y
            && (pos.x as u32) < self.size_x
            && pos.y < self.max_y()
            && (pos.z as u32) < self.size_z
    }

    /// Convert a position to a flat index. Returns `None` if out of bounds.
    fn index(&self, pos: Position) -> Option<usize> {
        if self.in_bounds(pos) {
            let x = pos.x as usize;
            let y = (pos.y - self.min_y) as usize;
            let z = pos.z as usize;
            let sx = self.size_x as usize;
            let sz = self.size_z as usize;
            Some(x + z * sx + y * sx * sz)
        } else {
            None
        }
    }

    /// Read a block. Returns `Air` for out-of-bounds positions.
    pub fn get(&self, pos: Position) -> Material {
        self.index(pos)
            .map(|i| self.voxels[i])
            .unwrap_or(Material::Air)
    }

    /// Write a block. No-op for out-of-bounds positions.
    pub fn set(&mut self, pos: Position, material: Material) {
        if let Some(i) = self.index(pos) {
            self.voxels[i] = material;
        }
    }
}

/// Every world the host knows about, keyed by `WorldId`.
#[derive(Clone, Debug, Default)]
pub struct Worlds {
    worlds: BTreeMap<WorldId, VoxelWorld>,
}

impl Worlds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) a world.
    pub fn insert(&mut self, id: WorldId, world: VoxelWorld) {
        self.worlds.insert(id, world);
    }

    pub fn get(&self, id: WorldId) -> Option<&VoxelWorld> {
        self.worlds.get(&id)
    }

    pub fn contains(&self, id: WorldId) -> bool {
        self.worlds.contains_key(&id)
    }

    /// Write a block. Returns the material that was there before, or `None`
    /// if the world is unknown.
    pub fn set_block(&mut self, pos: Position, material: Material) -> Option<Material> {
        let world = self.worlds.get_mut(&pos.world)?;
        let prior = world.get(pos);
        world.set(pos, material);
        Some(prior)
    }

    /// Stamp a floor marker: `center` at `pos` and `rim` on its four
    /// horizontal neighbors.
    pub fn build_floor(&mut self, pos: Position, center: Material, rim: Material) {
        self.set_block(pos, center);
        for dir in Compass::ALL {
            self.set_block(pos.neighbor(dir), rim);
        }
    }
}

impl WorldQuery for Worlds {
    fn material_at(&self, pos: Position) -> Material {
        self.worlds
            .get(&pos.world)
            .map_or(Material::Air, |w| w.get(pos))
    }

    fn min_height(&self, world: WorldId) -> i32 {
        self.worlds.get(&world).map_or(0, |w| w.min_y)
    }

    fn max_height(&self, world: WorldId) -> i32 {
        self.worlds.get(&world).map_or(0, VoxelWorld::max_y)
    }
}
