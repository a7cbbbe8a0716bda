// Jump gesture synthesis.
//
// The host reports movement, not jumps. `GestureSynthesizer` turns each
// agent's stream of movement samples into discrete ascend gestures with a
// two-state machine per agent:
//
//   Grounded  --[velocity.y > 0.3 and not climbing]-->  Ascending  (emit)
//   Ascending --[on ground]------------------------->  Grounded
//
// Every other sample leaves the state alone. The gesture fires on the edge
// into `Ascending`, so a jump arc that reports several fast upward samples
// still produces one gesture. Ladders and vines give steady upward
// velocity, so climbing samples never count.
//
// Emitted gestures go through an ordered list of observers. Each returns a
// `JumpVerdict`; the first `Cancel` stops dispatch and the outcome carries a
// corrected velocity with the vertical component zeroed, which the caller
// applies to neutralize the jump. A cancelled jump still moves the agent to
// `Ascending`, so it cannot re-fire until the agent lands.
//
// The tracking table holds one entry per connected agent. Samples for
// agents that are not tracked are ignored.
//
// See also: `elevator.rs` which feeds samples in and turns a proceeding
// gesture into an ascend move.

use crate::types::{AgentId, Velocity};
use log::{debug, trace};
use std::collections::BTreeMap;
use std::fmt;

/// Vertical velocity (blocks per tick) above which an ungrounded upward
/// movement counts as a jump.
pub const JUMP_VELOCITY_THRESHOLD: f64 = 0.3;

/// Per-agent jump state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JumpState {
    #[default]
    Grounded,
    Ascending,
}

/// One movement report from the host.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MovementSample {
    pub velocity: Velocity,
    /// Agent is on a ladder, vine, or similar.
    pub climbing: bool,
    pub on_ground: bool,
}

/// A synthesized jump.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AscendGesture {
    pub agent: AgentId,
    /// The agent's velocity at the moment the jump was detected.
    pub velocity: Velocity,
}

/// An observer's answer to a gesture.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum JumpVerdict {
    Proceed,
    Cancel { reason: String },
}

/// What became of an emitted gesture.
#[derive(Clone, Debug, PartialEq)]
pub enum GestureOutcome {
    /// Every observer let it through.
    Proceed(AscendGesture),
    /// An observer cancelled it. The caller should apply
    /// `corrected_velocity` to the agent.
    Cancelled {
        gesture: AscendGesture,
        reason: String,
        corrected_velocity: Velocity,
    },
}

/// Callback invoked for every emitted gesture, in registration order.
pub type JumpObserver = Box<dyn FnMut(&AscendGesture) -> JumpVerdict>;

/// Tracks each agent's jump state and emits ascend gestures.
#[derive(Default)]
pub struct GestureSynthesizer {
    agents: BTreeMap<AgentId, JumpState>,
    observers: Vec<JumpObserver>,
}

impl fmt::Debug for GestureSynthesizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GestureSynthesizer")
            .field("agents", &self.agents)
            .field("observers", &self.observers.len())
            .finish()
    }
}

impl GestureSynthesizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an observer. Observers run in the order they were added.
    pub fn add_observer(&mut self, observer: JumpObserver) {
        self.observers.push(observer);
    }

    /// Start tracking an agent as `Grounded`. Already-tracked agents keep
    /// their current state.
    pub fn track(&mut self, agent: AgentId) {
        self.agents.entry(agent).or_default();
    }

    /// Track every agent in `agents` (for agents already connected when the
    /// system starts).
    pub fn track_all(&mut self, agents: impl IntoIterator<Item = AgentId>) {
        for agent in agents {
            self.track(agent);
        }
    }

    pub fn untrack(&mut self, agent: AgentId) {
        self.agents.remove(&agent);
    }

    /// Forget every agent. Observers stay registered.
    pub fn clear(&mut self) {
        self.agents.clear();
    }

    pub fn state(&self, agent: AgentId) -> Option<JumpState> {
        self.agents.get(&agent).copied()
    }

    pub fn tracked_count(&self) -> usize {
        self.agents.len()
    }

    /// Feed one movement sample. Returns the outcome of the gesture if this
    /// sample started a jump.
    pub fn observe(&mut self, agent: AgentId, sample: MovementSample) -> Option<GestureOutcome> {
        let Some(state) = self.agents.get_mut(&agent) else {
            trace!("ignoring movement of untracked {agent}");
            return None;
        };
        let current = *state;
        match current {
            JumpState::Grounded
                if sample.velocity.y > JUMP_VELOCITY_THRESHOLD && !sample.climbing =>
            {
                *state = JumpState::Ascending;
                let gesture = AscendGesture {
                    agent,
                    velocity: sample.velocity,
                };
                Some(self.dispatch(gesture))
            }
            JumpState::Ascending if sample.on_ground => {
                *state = JumpState::Grounded;
                None
            }
            _ => None,
        }
    }

    fn dispatch(&mut self, gesture: AscendGesture) -> GestureOutcome {
        for observer in &mut self.observers {
            if let JumpVerdict::Cancel { reason } = observer(&gesture) {
                debug!("{}: jump cancelled ({reason})", gesture.agent);
                return GestureOutcome::Cancelled {
                    gesture,
                    reason,
                    corrected_velocity: gesture.velocity.without_vertical(),
                };
            }
        }
        debug!("{}: jump", gesture.agent);
        GestureOutcome::Proceed(gesture)
    }
}
