// Core types shared across the elevator system.
//
// Defines spatial coordinates (`Position`, `ColumnKey`), the four horizontal
// compass directions, agent and world identifiers, the `Material` enum that
// world queries return, and the small value types carried by gestures and
// moves. All types derive `Serialize` and `Deserialize` so scenarios and
// configs can name them in JSON.
//
// The coordinate system follows the host world's conventions:
// - X: east  (positive) / west  (negative)
// - Y: up    (positive) / down  (negative)
// - Z: south (positive) / north (negative)
//
// See also: `floor_group.rs` for the ordered per-column floor list keyed by
// `ColumnKey`, `pattern.rs` for the marker predicate over `Material`,
// `host.rs` for the traits that consume these types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// Identifies one world (dimension) of the host. Columns in different worlds
/// never interact.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WorldId(pub u32);

/// Identifies a connected agent (player). Assigned by the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AgentId(pub u32);

impl fmt::Display for WorldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "world#{}", self.0)
    }
}

impl fmt::Display for AgentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "agent#{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Spatial types
// ---------------------------------------------------------------------------

/// One of the four horizontal compass directions, in the order the marker
/// pattern checks them.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Compass {
    North,
    East,
    South,
    West,
}

impl Compass {
    /// All four directions in N, E, S, W order.
    pub const ALL: [Compass; 4] = [Compass::North, Compass::East, Compass::South, Compass::West];

    /// Unit offset `(dx, dz)` for this direction.
    pub const fn offset(self) -> (i32, i32) {
        match self {
            Compass::North => (0, -1),
            Compass::East => (1, 0),
            Compass::South => (0, 1),
            Compass::West => (-1, 0),
        }
    }
}

/// A block position in a specific world. Each component is in voxel units.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub world: WorldId,
    pub x: i32,
    pub y: i32,
    pub z: i32,
}

impl Position {
    pub const fn new(world: WorldId, x: i32, y: i32, z: i32) -> Self {
        Self { world, x, y, z }
    }

    /// The column this position belongs to (ignores `y`).
    pub const fn column(self) -> ColumnKey {
        ColumnKey {
            world: self.world,
            x: self.x,
            z: self.z,
        }
    }

    /// The horizontally adjacent position in the given direction.
    pub const fn neighbor(self, dir: Compass) -> Self {
        let (dx, dz) = dir.offset();
        Self::new(self.world, self.x + dx, self.y, self.z + dz)
    }

    /// The position directly below.
    pub const fn below(self) -> Self {
        Self::new(self.world, self.x, self.y - 1, self.z)
    }

    /// Same column, different height.
    pub const fn with_y(self, y: i32) -> Self {
        Self::new(self.world, self.x, y, self.z)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, {}, {})", self.world, self.x, self.y, self.z)
    }
}

/// Identity of a vertical column: world plus horizontal coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ColumnKey {
    pub world: WorldId,
    pub x: i32,
    pub z: i32,
}

impl ColumnKey {
    /// The position in this column at height `y`.
    pub const fn at(self, y: i32) -> Position {
        Position::new(self.world, self.x, y, self.z)
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({}, *, {})", self.world, self.x, self.z)
    }
}

/// An agent's velocity in blocks per tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Velocity {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Velocity {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// This velocity with the vertical component zeroed.
    pub const fn without_vertical(self) -> Self {
        Self::new(self.x, 0.0, self.z)
    }
}

/// Which way a move goes through a floor group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Ascend,
    Descend,
}

// ---------------------------------------------------------------------------
// Materials
// ---------------------------------------------------------------------------

/// The material of a single block in the world.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Material {
    #[default]
    Air,
    Stone,
    SmoothStone,
    Dirt,
    Grass,
    Planks,
    Glass,
    IronBlock,
    GoldBlock,
    DiamondBlock,
    QuartzBlock,
    Obsidian,
    Ladder,
    Vine,
    Water,
}

impl Material {
    /// Every material, in declaration order.
    pub const ALL: [Material; 15] = [
        Material::Air,
        Material::Stone,
        Material::SmoothStone,
        Material::Dirt,
        Material::Grass,
        Material::Planks,
        Material::Glass,
        Material::IronBlock,
        Material::GoldBlock,
        Material::DiamondBlock,
        Material::QuartzBlock,
        Material::Obsidian,
        Material::Ladder,
        Material::Vine,
        Material::Water,
    ];

    /// Canonical lowercase name, as written in configs.
    pub const fn name(self) -> &'static str {
        match self {
            Material::Air => "air",
            Material::Stone => "stone",
            Material::SmoothStone => "smooth_stone",
            Material::Dirt => "dirt",
            Material::Grass => "grass",
            Material::Planks => "planks",
            Material::Glass => "glass",
            Material::IronBlock => "iron_block",
            Material::GoldBlock => "gold_block",
            Material::DiamondBlock => "diamond_block",
            Material::QuartzBlock => "quartz_block",
            Material::Obsidian => "obsidian",
            Material::Ladder => "ladder",
            Material::Vine => "vine",
            Material::Water => "water",
        }
    }

    /// Agents standing in these blocks are climbing, not jumping.
    pub const fn is_climbable(self) -> bool {
        matches!(self, Material::Ladder | Material::Vine)
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Returned when a string names no known material.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownMaterialName(pub String);

impl FromStr for Material {
    type Err = UnknownMaterialName;

    /// Case-insensitive: `iron_block`, `IRON_BLOCK` and `Iron_Block` all
    /// resolve to `IronBlock`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Material::ALL
            .iter()
            .copied()
            .find(|m| m.name() == wanted)
            .ok_or_else(|| UnknownMaterialName(s.to_string()))
    }
}
