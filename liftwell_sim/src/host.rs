// Host collaborator interfaces.
//
// The elevator system never owns the world, the agents, or the screen. It
// reaches them through three traits the host implements:
//
// - `WorldQuery`: block materials and the vertical bounds of each world.
//   Horizontal adjacency is plain geometry (`Position::neighbor`), so it is
//   not part of the trait.
// - `AgentControl`: relocation, velocity, and where an agent is standing.
// - `Feedback`: decorative effects and the floor indicator. Failures come
//   back as `FeedbackError` and are logged, never propagated.
//
// `Host` is the blanket combination that `ElevatorSystem` handlers take.
//
// All methods are synchronous and must be consistent within one tick. A
// world query that cannot answer must panic; returning a default material
// would silently unregister floors.
//
// See also: `sandbox.rs` for the in-memory implementation used by tests and
// the replay binary, `elevator.rs` for the handlers that call these.

use crate::error::FeedbackError;
use crate::indicator::FloorIndicator;
use crate::types::{AgentId, Material, Position, Velocity, WorldId};

/// Read-only access to block materials.
pub trait WorldQuery {
    /// The material at a position. Positions outside a world's bounds read
    /// as `Air`.
    fn material_at(&self, pos: Position) -> Material;

    /// Lowest height of the world (inclusive).
    fn min_height(&self, world: WorldId) -> i32;

    /// Highest height of the world (exclusive).
    fn max_height(&self, world: WorldId) -> i32;
}

/// Movement primitives for connected agents.
pub trait AgentControl {
    /// Move the agent so its feet rest one unit above `target`, keeping its
    /// horizontal position and orientation.
    fn relocate(&mut self, agent: AgentId, target: Position);

    fn velocity(&self, agent: AgentId) -> Option<Velocity>;

    fn set_velocity(&mut self, agent: AgentId, velocity: Velocity);

    /// The block directly under the agent's feet.
    fn standing_on(&self, agent: AgentId) -> Option<Position>;

    /// Whether the agent is on a ladder, vine, or similar.
    fn is_climbing(&self, agent: AgentId) -> bool;
}

/// Decorative output. Nothing in the core depends on these succeeding.
pub trait Feedback {
    /// Particles and sound for a completed move from `from` to `to`.
    fn teleport_effects(
        &mut self,
        agent: AgentId,
        from: Position,
        to: Position,
    ) -> Result<(), FeedbackError>;

    /// Show or update the agent's floor indicator.
    fn show_indicator(
        &mut self,
        agent: AgentId,
        indicator: &FloorIndicator,
    ) -> Result<(), FeedbackError>;

    fn hide_indicator(&mut self, agent: AgentId) -> Result<(), FeedbackError>;
}

/// Everything an `ElevatorSystem` handler needs from the host.
pub trait Host: WorldQuery + AgentControl + Feedback {}

impl<T: WorldQuery + AgentControl + Feedback> Host for T {}
