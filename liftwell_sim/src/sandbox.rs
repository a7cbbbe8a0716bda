// In-memory reference host and scripted driver.
//
// `SandboxHost` is a complete `Host`: voxel worlds, a table of connected
// agents with continuous locations, and a log of every feedback call. It
// stands in for a real game server in tests and in the replay binary.
//
// Agent geometry follows the usual voxel-game convention: an agent at
// location (x, y, z) has its feet in the block containing that point and is
// standing on the block directly below. Relocating to a floor marker puts
// the feet one block above it and keeps x and z. An agent is climbing when
// the block at its feet is a ladder or vine.
//
// `Sandbox` pairs a host with an `ElevatorSystem` and replays a sorted list
// of `HostCommand`s through `step(commands, target_tick)`. Between commands
// the clock jumps straight to the next command or the next pending
// indicator check, whichever comes first, so idle ticks cost nothing.
//
// `Scenario` is the JSON file format: worlds to create, floor markers to
// stamp before the first tick, and the command script.
//
// See also: `command.rs` for the actions, `elevator.rs` for the handlers,
// the `liftwell_replay` crate which runs scenario files from the command
// line.

use crate::command::{HostAction, HostCommand, Location};
use crate::config::ElevatorConfig;
use crate::elevator::ElevatorSystem;
use crate::error::{FeedbackError, ScenarioError};
use crate::gesture::MovementSample;
use crate::host::{AgentControl, Feedback, WorldQuery};
use crate::indicator::FloorIndicator;
use crate::resolver::MoveTarget;
use crate::types::{AgentId, Material, Position, Velocity, WorldId};
use crate::world::{VoxelWorld, WorldShape, Worlds};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

// ---------------------------------------------------------------------------
// Reference host
// ---------------------------------------------------------------------------

/// A connected agent as the sandbox sees it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AgentState {
    pub world: WorldId,
    pub location: Location,
    pub velocity: Velocity,
    pub sneaking: bool,
}

impl AgentState {
    /// The block the agent's feet occupy.
    pub fn feet(&self) -> Position {
        Position::new(
            self.world,
            self.location[0].floor() as i32,
            self.location[1].floor() as i32,
            self.location[2].floor() as i32,
        )
    }
}

/// A feedback call the sandbox received.
#[derive(Clone, Debug, PartialEq)]
pub enum FeedbackEvent {
    Teleport {
        agent: AgentId,
        from: Position,
        to: Position,
    },
    ShowIndicator {
        agent: AgentId,
        title: String,
        progress: f32,
    },
    HideIndicator {
        agent: AgentId,
    },
}

#[derive(Clone, Debug)]
pub struct SandboxHost {
    pub worlds: Worlds,
    agents: BTreeMap<AgentId, AgentState>,
    feedback: Vec<FeedbackEvent>,
    /// When false, every feedback call fails with `Unavailable`.
    pub feedback_available: bool,
}

impl SandboxHost {
    pub fn new(worlds: Worlds) -> Self {
        Self {
            worlds,
            agents: BTreeMap::new(),
            feedback: Vec::new(),
            feedback_available: true,
        }
    }

    /// Connect an agent at rest. Replaces any previous state for the id.
    pub fn join(&mut self, agent: AgentId, world: WorldId, location: Location) {
        self.agents.insert(
            agent,
            AgentState {
                world,
                location,
                velocity: Velocity::default(),
                sneaking: false,
            },
        );
    }

    pub fn quit(&mut self, agent: AgentId) -> Option<AgentState> {
        self.agents.remove(&agent)
    }

    pub fn agent(&self, agent: AgentId) -> Option<&AgentState> {
        self.agents.get(&agent)
    }

    pub fn agent_ids(&self) -> impl Iterator<Item = AgentId> + '_ {
        self.agents.keys().copied()
    }

    pub fn set_location(&mut self, agent: AgentId, location: Location) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.location = location;
        }
    }

    pub fn set_sneaking(&mut self, agent: AgentId, sneaking: bool) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.sneaking = sneaking;
        }
    }

    /// Every feedback call so far, oldest first.
    pub fn feedback(&self) -> &[FeedbackEvent] {
        &self.feedback
    }

    pub fn take_feedback(&mut self) -> Vec<FeedbackEvent> {
        std::mem::take(&mut self.feedback)
    }

    fn record(&mut self, agent: AgentId, event: FeedbackEvent) -> Result<(), FeedbackError> {
        if !self.feedback_available {
            return Err(FeedbackError::Unavailable { agent });
        }
        self.feedback.push(event);
        Ok(())
    }
}

impl WorldQuery for SandboxHost {
    fn material_at(&self, pos: Position) -> Material {
        self.worlds.material_at(pos)
    }

    fn min_height(&self, world: WorldId) -> i32 {
        self.worlds.min_height(world)
    }

    fn max_height(&self, world: WorldId) -> i32 {
        self.worlds.max_height(world)
    }
}

impl AgentControl for SandboxHost {
    fn relocate(&mut self, agent: AgentId, target: Position) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.world = target.world;
            state.location[1] = f64::from(target.y + 1);
        }
    }

    fn velocity(&self, agent: AgentId) -> Option<Velocity> {
        self.agents.get(&agent).map(|s| s.velocity)
    }

    fn set_velocity(&mut self, agent: AgentId, velocity: Velocity) {
        if let Some(state) = self.agents.get_mut(&agent) {
            state.velocity = velocity;
        }
    }

    fn standing_on(&self, agent: AgentId) -> Option<Position> {
        self.agents.get(&agent).map(|s| s.feet().below())
    }

    fn is_climbing(&self, agent: AgentId) -> bool {
        self.agents
            .get(&agent)
            .is_some_and(|s| self.worlds.material_at(s.feet()).is_climbable())
    }
}

impl Feedback for SandboxHost {
    fn teleport_effects(
        &mut self,
        agent: AgentId,
        from: Position,
        to: Position,
    ) -> Result<(), FeedbackError> {
        self.record(agent, FeedbackEvent::Teleport { agent, from, to })
    }

    fn show_indicator(
        &mut self,
        agent: AgentId,
        indicator: &FloorIndicator,
    ) -> Result<(), FeedbackError> {
        self.record(
            agent,
            FeedbackEvent::ShowIndicator {
                agent,
                title: indicator.title(),
                progress: indicator.progress,
            },
        )
    }

    fn hide_indicator(&mut self, agent: AgentId) -> Result<(), FeedbackError> {
        self.record(agent, FeedbackEvent::HideIndicator { agent })
    }
}

// ---------------------------------------------------------------------------
// Scenario files
// ---------------------------------------------------------------------------

fn default_center() -> Material {
    Material::IronBlock
}

fn default_rim() -> Material {
    Material::SmoothStone
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioWorld {
    pub id: WorldId,
    pub shape: WorldShape,
}

/// A floor marker stamped before the script runs.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFloor {
    pub at: Position,
    #[serde(default = "default_center")]
    pub center: Material,
    #[serde(default = "default_rim")]
    pub rim: Material,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub worlds: Vec<ScenarioWorld>,
    #[serde(default)]
    pub floors: Vec<ScenarioFloor>,
    #[serde(default)]
    pub commands: Vec<HostCommand>,
    /// Tick to run until. Defaults to the last command's tick.
    #[serde(default)]
    pub run_until: Option<u64>,
}

impl Scenario {
    pub fn from_json(json: &str) -> Result<Self, ScenarioError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, ScenarioError> {
        let json = std::fs::read_to_string(path).map_err(|source| ScenarioError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    pub fn end_tick(&self) -> u64 {
        self.run_until
            .or_else(|| self.commands.last().map(|c| c.tick))
            .unwrap_or(0)
    }

    /// Build the worlds and stamp every floor marker.
    pub fn build_worlds(&self) -> Result<Worlds, ScenarioError> {
        let mut worlds = Worlds::new();
        for w in &self.worlds {
            worlds.insert(w.id, VoxelWorld::new(w.shape));
        }
        for floor in &self.floors {
            if !worlds.contains(floor.at.world) {
                return Err(ScenarioError::UnknownWorld(floor.at.world));
            }
            worlds.build_floor(floor.at, floor.center, floor.rim);
        }
        Ok(worlds)
    }
}

// ---------------------------------------------------------------------------
// Scripted driver
// ---------------------------------------------------------------------------

/// A move the elevator system made while stepping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveRecord {
    pub tick: u64,
    pub agent: AgentId,
    pub moved: MoveTarget,
}

/// Output of one `Sandbox::step()` call.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepResult {
    pub moves: Vec<MoveRecord>,
    /// Floors that stopped being floors because a block changed.
    pub removed_floors: Vec<Position>,
}

#[derive(Debug)]
pub struct Sandbox {
    pub host: SandboxHost,
    pub elevators: ElevatorSystem,
    tick: u64,
}

impl Sandbox {
    /// Start the system over an existing host. Agents already connected are
    /// tracked from the start.
    pub fn new(host: SandboxHost, config: ElevatorConfig) -> Self {
        let mut elevators = ElevatorSystem::new(config);
        elevators.startup(host.agent_ids());
        Self {
            host,
            elevators,
            tick: 0,
        }
    }

    pub fn from_scenario(scenario: &Scenario, config: ElevatorConfig) -> Result<Self, ScenarioError> {
        let worlds = scenario.build_worlds()?;
        info!(
            "scenario: {} world(s), {} floor(s), {} command(s)",
            scenario.worlds.len(),
            scenario.floors.len(),
            scenario.commands.len()
        );
        Ok(Self::new(SandboxHost::new(worlds), config))
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Run `scenario.commands` to `scenario.end_tick()`.
    pub fn run(&mut self, scenario: &Scenario) -> Result<StepResult, ScenarioError> {
        self.step(&scenario.commands, scenario.end_tick())
    }

    /// Apply `commands` (sorted by tick) and advance the clock to
    /// `target_tick`. Commands past `target_tick` are left unapplied.
    pub fn step(
        &mut self,
        commands: &[HostCommand],
        target_tick: u64,
    ) -> Result<StepResult, ScenarioError> {
        if let Some(w) = commands.windows(2).find(|w| w[1].tick < w[0].tick) {
            return Err(ScenarioError::UnsortedCommands {
                previous: w[0].tick,
                found: w[1].tick,
            });
        }

        let mut result = StepResult::default();
        let mut cmd_idx = 0;

        loop {
            let next_check = self.elevators.indicators().next_check();
            let next_cmd = commands
                .get(cmd_idx)
                .filter(|c| c.tick <= target_tick)
                .map(|c| c.tick);
            let next_tick = match (next_check, next_cmd) {
                (Some(et), Some(ct)) => et.min(ct),
                (Some(et), None) => et,
                (None, Some(ct)) => ct,
                (None, None) => target_tick,
            }
            .min(target_tick)
            .max(self.tick);

            self.tick = next_tick;
            self.elevators.advance_to(&mut self.host, self.tick);

            while let Some(cmd) = commands.get(cmd_idx).filter(|c| c.tick <= self.tick) {
                cmd_idx += 1;
                self.apply_command(cmd, &mut result)?;
            }

            if self.tick >= target_tick {
                break;
            }
        }

        self.elevators.advance_to(&mut self.host, target_tick);
        Ok(result)
    }

    fn apply_command(
        &mut self,
        cmd: &HostCommand,
        result: &mut StepResult,
    ) -> Result<(), ScenarioError> {
        debug!("tick {}: {:?}", self.tick, cmd.action);
        let host = &mut self.host;
        let elevators = &mut self.elevators;
        let moved = match cmd.action {
            HostAction::SetBlock { position, material } => {
                let prior = host
                    .worlds
                    .set_block(position, material)
                    .ok_or(ScenarioError::UnknownWorld(position.world))?;
                if prior != material {
                    result
                        .removed_floors
                        .extend(elevators.on_block_changed(&*host, position, prior));
                }
                None
            }
            HostAction::BreakBlock { position } => {
                let prior = host
                    .worlds
                    .set_block(position, Material::Air)
                    .ok_or(ScenarioError::UnknownWorld(position.world))?;
                result
                    .removed_floors
                    .extend(elevators.on_block_changed(&*host, position, prior));
                None
            }
            HostAction::Join {
                agent,
                world,
                location,
            } => {
                if !host.worlds.contains(world) {
                    return Err(ScenarioError::UnknownWorld(world));
                }
                host.join(agent, world, location);
                elevators.agent_connected(agent);
                None
            }
            HostAction::Quit { agent } => {
                require_agent(host, agent)?;
                elevators.agent_disconnected(host, agent);
                host.quit(agent);
                None
            }
            HostAction::Move {
                agent,
                location,
                velocity,
                on_ground,
            } => {
                require_agent(host, agent)?;
                if let Some(location) = location {
                    host.set_location(agent, location);
                }
                host.set_velocity(agent, velocity);
                let sample = MovementSample {
                    velocity,
                    climbing: host.is_climbing(agent),
                    on_ground,
                };
                elevators.on_movement_sample(host, agent, sample)
            }
            HostAction::Walk { agent, to } => {
                require_agent(host, agent)?;
                host.set_location(agent, to);
                host.set_velocity(agent, Velocity::default());
                let sample = MovementSample {
                    velocity: Velocity::default(),
                    climbing: host.is_climbing(agent),
                    on_ground: true,
                };
                elevators.on_movement_sample(host, agent, sample)
            }
            HostAction::ToggleSneak { agent, sneaking } => {
                require_agent(host, agent)?;
                host.set_sneaking(agent, sneaking);
                elevators.on_sneak_toggled(host, agent, sneaking)
            }
        };

        if let Some(moved) = moved {
            let agent = match cmd.action {
                HostAction::Move { agent, .. }
                | HostAction::Walk { agent, .. }
                | HostAction::ToggleSneak { agent, .. } => agent,
                _ => return Ok(()),
            };
            result.moves.push(MoveRecord {
                tick: self.tick,
                agent,
                moved,
            });
        }
        Ok(())
    }
}

fn require_agent(host: &SandboxHost, agent: AgentId) -> Result<(), ScenarioError> {
    host.agent(agent)
        .map(|_| ())
        .ok_or(ScenarioError::UnknownAgent(agent))
}
