// liftwell_sim: block-based elevators for voxel worlds.
//
// A floor marker is a block of the center material with the rim material on
// all four horizontal sides. Every marker in one vertical column belongs to
// that column's elevator. Jumping on a marker moves the agent to the next
// marker up; starting to sneak on one moves it to the next marker down. The
// crate owns the elevator logic and reaches the world, the agents, and the
// screen only through the traits in `host.rs`, so it runs unchanged inside a
// game server or against the in-memory sandbox.
//
// Module overview:
// - `elevator.rs`:    ElevatorSystem, the host event handlers and lifecycle.
// - `pattern.rs`:     PatternValidator, the floor-marker predicate.
// - `floor_group.rs`: FloorGroup, the ascending floor list of one column.
// - `cache.rs`:       FloorGroupCache, lazy per-column discovery and upkeep.
// - `resolver.rs`:    resolve_move, next floor up or down from a marker.
// - `gesture.rs`:     GestureSynthesizer, jump detection from movement samples.
// - `indicator.rs`:   FloorIndicators, the "Floor N of M" display lifecycle.
// - `event.rs`:       EventQueue (tick-ordered priority queue).
// - `config.rs`:      ElevatorConfig, JSON-loaded materials and display settings.
// - `host.rs`:        WorldQuery / AgentControl / Feedback collaborator traits.
// - `error.rs`:       ConfigError, FeedbackError, ScenarioError.
// - `types.rs`:       Position, ColumnKey, Material, ids, Velocity.
// - `world.rs`:       Dense voxel grid used by the sandbox.
// - `command.rs`:     HostCommand / HostAction, scripted host input.
// - `sandbox.rs`:     SandboxHost, Sandbox step loop, Scenario files.
//
// Everything runs synchronously on the caller's thread. Per-agent state
// lives in `BTreeMap`s so iteration order (and therefore log and feedback
// order) is reproducible.

pub mod cache;
pub mod command;
pub mod config;
pub mod elevator;
pub mod error;
pub mod event;
pub mod floor_group;
pub mod gesture;
pub mod host;
pub mod indicator;
pub mod pattern;
pub mod resolver;
pub mod sandbox;
pub mod types;
pub mod world;
