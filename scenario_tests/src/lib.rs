// Test-only driver for end-to-end elevator scenarios.
//
// `TestTower` wraps a real `Sandbox` (reference host plus `ElevatorSystem`)
// and gives tests a synchronous, tick-by-tick API: each helper turns into a
// `HostCommand` at the next tick and goes through `Sandbox::step()`, the
// same path scenario files take. Nothing here calls elevator handlers
// directly.
//
// See also: `tests/full_pipeline.rs` for the scenarios.

use liftwell_sim::command::{HostAction, HostCommand, Location};
use liftwell_sim::config::ElevatorConfig;
use liftwell_sim::host::AgentControl;
use liftwell_sim::sandbox::{FeedbackEvent, MoveRecord, Sandbox, Scenario, ScenarioFloor, ScenarioWorld};
use liftwell_sim::types::{AgentId, Material, Position, Velocity, WorldId};
use liftwell_sim::world::WorldShape;

/// The world every tower is built in.
pub const WORLD: WorldId = WorldId(0);

/// Column every tower's floors are stacked in.
pub const SHAFT: (i32, i32) = (8, 8);

/// Vertical speed of a normal jump, in blocks per tick.
pub const JUMP_SPEED: f64 = 0.42;

/// Floor marker in the tower's shaft at height `y`.
pub fn floor(y: i32) -> Position {
    Position::new(WORLD, SHAFT.0, y, SHAFT.1)
}

/// Location of an agent standing on the marker at `y`.
pub fn on_floor(y: i32) -> Location {
    [
        f64::from(SHAFT.0) + 0.5,
        f64::from(y + 1),
        f64::from(SHAFT.1) + 0.5,
    ]
}

/// A sandbox with one world and a stack of floors in the shaft column.
pub struct TestTower {
    pub sandbox: Sandbox,
    /// Every move made so far.
    pub moves: Vec<MoveRecord>,
    /// Every floor removed by a block change so far.
    pub removed: Vec<Position>,
}

impl TestTower {
    /// A 17x128x17 world (heights -32..96) with floors at `ys`.
    pub fn new(ys: &[i32]) -> Self {
        Self::with_config(ys, ElevatorConfig::default())
    }

    pub fn with_config(ys: &[i32], config: ElevatorConfig) -> Self {
        let scenario = Scenario {
            worlds: vec![ScenarioWorld {
                id: WORLD,
                shape: WorldShape {
                    size_x: 17,
                    size_y: 128,
                    size_z: 17,
                    min_y: -32,
                },
            }],
            floors: ys
                .iter()
                .map(|&y| ScenarioFloor {
                    at: floor(y),
                    center: Material::IronBlock,
                    rim: Material::SmoothStone,
                })
                .collect(),
            ..Scenario::default()
        };
        let sandbox = Sandbox::from_scenario(&scenario, config).unwrap();
        Self {
            sandbox,
            moves: Vec::new(),
            removed: Vec::new(),
        }
    }

    /// Apply one action at the next tick.
    pub fn act(&mut self, action: HostAction) {
        let tick = self.sandbox.tick() + 1;
        self.act_at(tick, action);
    }

    /// Apply one action at `tick` (running any checks due before it).
    pub fn act_at(&mut self, tick: u64, action: HostAction) {
        let result = self
            .sandbox
            .step(&[HostCommand::new(tick, action)], tick)
            .unwrap();
        self.moves.extend(result.moves);
        self.removed.extend(result.removed_floors);
    }

    /// Let time pass with no input.
    pub fn wait(&mut self, ticks: u64) {
        let target = self.sandbox.tick() + ticks;
        self.sandbox.step(&[], target).unwrap();
    }

    pub fn join(&mut self, agent: AgentId, location: Location) {
        self.act(HostAction::Join {
            agent,
            world: WORLD,
            location,
        });
    }

    pub fn quit(&mut self, agent: AgentId) {
        self.act(HostAction::Quit { agent });
    }

    /// Leave the ground with jump speed.
    pub fn jump(&mut self, agent: AgentId) {
        self.act(HostAction::Move {
            agent,
            location: None,
            velocity: Velocity::new(0.0, JUMP_SPEED, 0.0),
            on_ground: false,
        });
    }

    /// Touch the ground where the agent is.
    pub fn land(&mut self, agent: AgentId) {
        self.act(HostAction::Move {
            agent,
            location: None,
            velocity: Velocity::default(),
            on_ground: true,
        });
    }

    /// Jump and land, the way a player taps the jump key.
    pub fn hop(&mut self, agent: AgentId) {
        self.jump(agent);
        self.land(agent);
    }

    pub fn walk_to(&mut self, agent: AgentId, to: Location) {
        self.act(HostAction::Walk { agent, to });
    }

    /// Press and release sneak.
    pub fn sneak(&mut self, agent: AgentId) {
        self.act(HostAction::ToggleSneak {
            agent,
            sneaking: true,
        });
        self.act(HostAction::ToggleSneak {
            agent,
            sneaking: false,
        });
    }

    pub fn set_block(&mut self, position: Position, material: Material) {
        self.act(HostAction::SetBlock { position, material });
    }

    pub fn break_block(&mut self, position: Position) {
        self.act(HostAction::BreakBlock { position });
    }

    /// Height of the block the agent is standing on.
    pub fn standing_y(&self, agent: AgentId) -> i32 {
        self.sandbox.host.standing_on(agent).unwrap().y
    }

    /// Title of the agent's indicator, if one is up.
    pub fn indicator(&self, agent: AgentId) -> Option<String> {
        self.sandbox
            .elevators
            .indicators()
            .current(agent)
            .map(|i| i.title())
    }

    /// Heights of the known floors in the shaft.
    pub fn shaft_floors(&self) -> Vec<i32> {
        self.sandbox
            .elevators
            .cache()
            .group(floor(0).column())
            .map(|g| g.floors().iter().map(|p| p.y).collect())
            .unwrap_or_default()
    }

    /// Indicator titles shown to `agent`, oldest first.
    pub fn indicator_titles(&self, agent: AgentId) -> Vec<String> {
        self.sandbox
            .host
            .feedback()
            .iter()
            .filter_map(|e| match e {
                FeedbackEvent::ShowIndicator { agent: a, title, .. } if *a == agent => {
                    Some(title.clone())
                }
                _ => None,
            })
            .collect()
    }

    pub fn hide_count(&self, agent: AgentId) -> usize {
        self.sandbox
            .host
            .feedback()
            .iter()
            .filter(|e| matches!(e, FeedbackEvent::HideIndicator { agent: a } if *a == agent))
            .count()
    }
}
