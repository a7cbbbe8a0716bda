// Floor marker pattern recognition.
//
// A floor marker is a plus-shaped pattern: one block of the configured
// center material with the configured rim material on all four horizontal
// sides. `PatternValidator` is a stateless predicate over a `WorldQuery`,
// so it is cheap enough to call on every gesture and on every height of a
// column rescan (five material reads, stopping at the first mismatch).
//
// A validator built from a config whose material names did not resolve is
// `disabled`: it rejects every position, so the system degrades to "no
// elevators" instead of crashing.
//
// See also: `cache.rs` which rescans columns with this predicate,
// `config.rs` for where the two materials come from.

use crate::host::WorldQuery;
use crate::types::{Compass, Material, Position};

/// The two materials that make up a floor marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MarkerPattern {
    pub center: Material,
    pub rim: Material,
}

/// Decides whether a position is the center of a floor marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PatternValidator {
    pattern: Option<MarkerPattern>,
}

impl PatternValidator {
    pub fn new(pattern: MarkerPattern) -> Self {
        Self {
            pattern: Some(pattern),
        }
    }

    /// A validator that never recognizes anything.
    pub fn disabled() -> Self {
        Self { pattern: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.pattern.is_some()
    }

    pub fn center(&self) -> Option<Material> {
        self.pattern.map(|p| p.center)
    }

    pub fn rim(&self) -> Option<Material> {
        self.pattern.map(|p| p.rim)
    }

    /// True iff `pos` holds the center material and all four horizontal
    /// neighbors hold the rim material.
    pub fn is_valid_floor<W: WorldQuery + ?Sized>(&self, world: &W, pos: Position) -> bool {
        let Some(pattern) = self.pattern else {
            return false;
        };
        world.material_at(pos) == pattern.center
            && Compass::ALL
                .iter()
                .all(|&dir| world.material_at(pos.neighbor(dir)) == pattern.rim)
    }

    /// For a rim block, the first horizontal neighbor (N, E, S, W) holding
    /// the center material. Only the neighbor's material is checked, not its
    /// full pattern, since the rim block itself may already be gone.
    pub fn center_of_rim<W: WorldQuery + ?Sized>(
        &self,
        world: &W,
        rim_pos: Position,
    ) -> Option<Position> {
        let center = self.center()?;
        Compass::ALL
            .iter()
            .map(|&dir| rim_pos.neighbor(dir))
            .find(|&p| world.material_at(p) == center)
    }
}
