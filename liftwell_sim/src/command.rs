// Scripted host input for the sandbox.
//
// A `HostCommand` is one thing that happens in the reference host at a given
// tick: a block placed or broken, an agent joining, leaving, moving, or
// toggling sneak. Scenario files are a list of these sorted by tick, and
// `Sandbox::step()` applies them in order, translating each into the
// matching `ElevatorSystem` handler call.
//
// Current actions:
// - `SetBlock` / `BreakBlock`: edit the world. A changed block notifies
//   `on_block_changed` with the material it replaced.
// - `Join` / `Quit`: connect or disconnect an agent.
// - `Move`: a raw movement sample, optionally repositioning the agent. Jumps
//   are `Move`s with a positive vertical velocity and `on_ground: false`.
// - `Walk`: reposition an agent on the ground with no velocity.
// - `ToggleSneak`: start or stop sneaking.
//
// See also: `sandbox.rs` for `apply_command()`, `elevator.rs` for the
// handlers each action reaches.

use crate::types::{AgentId, Material, Position, Velocity, WorldId};
use serde::{Deserialize, Serialize};

/// Continuous agent location (x, y, z). The agent's feet occupy the block
/// containing this point.
pub type Location = [f64; 3];

/// One scripted host event.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HostCommand {
    pub tick: u64,
    pub action: HostAction,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum HostAction {
    SetBlock {
        position: Position,
        material: Material,
    },
    BreakBlock {
        position: Position,
    },
    Join {
        agent: AgentId,
        world: WorldId,
        location: Location,
    },
    Quit {
        agent: AgentId,
    },
    Move {
        agent: AgentId,
        #[serde(default)]
        location: Option<Location>,
        velocity: Velocity,
        on_ground: bool,
    },
    Walk {
        agent: AgentId,
        to: Location,
    },
    ToggleSneak {
        agent: AgentId,
        sneaking: bool,
    },
}

impl HostCommand {
    pub fn new(tick: u64, action: HostAction) -> Self {
        Self { tick, action }
    }
}
