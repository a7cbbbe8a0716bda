// The elevator system: every registry plus the host event handlers.
//
// `ElevatorSystem` is the one value a host holds. It owns the configuration,
// the floor-group cache, the jump gesture synthesizer, the floor indicators,
// and the host tick it last saw. The host forwards its events to the
// handlers below and passes itself in as the `Host` collaborator:
//
//   host event                 handler
//   -------------------------  ---------------------------------------------
//   plugin enabled             startup(connected agents)
//   plugin disabled            shutdown()
//   agent joins / leaves       agent_connected / agent_disconnected
//   agent moved                on_movement_sample -> (gesture) -> on_jump
//   agent toggled sneak        on_sneak_toggled
//   block broken / replaced    on_block_changed
//   clock advanced             advance_to
//
// Jumping on a floor marker moves the agent to the next floor up; starting
// to sneak on one moves it to the next floor down. A move relocates the
// agent, plays the teleport effects, and then shows the floor indicator.
// Feedback failures are logged and otherwise ignored.
//
// See also: `gesture.rs`, `resolver.rs`, `cache.rs`, `indicator.rs` for the
// pieces, `sandbox.rs` for a host that drives this from a command script.

use crate::cache::FloorGroupCache;
use crate::config::ElevatorConfig;
use crate::gesture::{GestureOutcome, GestureSynthesizer, JumpObserver, MovementSample};
use crate::host::Host;
use crate::indicator::FloorIndicators;
use crate::pattern::PatternValidator;
use crate::resolver::{MoveTarget, resolve_move};
use crate::types::{AgentId, Direction, Material, Position};
use log::{debug, error, info, warn};

#[derive(Debug)]
pub struct ElevatorSystem {
    config: ElevatorConfig,
    cache: FloorGroupCache,
    gestures: GestureSynthesizer,
    indicators: FloorIndicators,
    tick: u64,
}

impl ElevatorSystem {
    /// Build the system from a parsed config. Unknown material names are
    /// logged and leave the system running with no recognizable floors.
    pub fn new(config: ElevatorConfig) -> Self {
        let validator = match config.marker_pattern() {
            Ok(pattern) => PatternValidator::new(pattern),
            Err(e) => {
                error!("elevators disabled: {e}");
                PatternValidator::disabled()
            }
        };
        let indicators = FloorIndicators::new(config.display_ticks());
        Self {
            config,
            cache: FloorGroupCache::new(validator),
            gestures: GestureSynthesizer::new(),
            indicators,
            tick: 0,
        }
    }

    pub fn config(&self) -> &ElevatorConfig {
        &self.config
    }

    pub fn cache(&self) -> &FloorGroupCache {
        &self.cache
    }

    pub fn gestures(&self) -> &GestureSynthesizer {
        &self.gestures
    }

    pub fn indicators(&self) -> &FloorIndicators {
        &self.indicators
    }

    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Register a callback that sees every synthesized jump before it moves
    /// anyone. Returning `Cancel` neutralizes the jump.
    pub fn add_jump_observer(&mut self, observer: JumpObserver) {
        self.gestures.add_observer(observer);
    }

    // -----------------------------------------------------------------------
    // Lifecycle
    // -----------------------------------------------------------------------

    /// Start tracking every agent already connected.
    pub fn startup(&mut self, agents: impl IntoIterator<Item = AgentId>) {
        self.gestures.track_all(agents);
        info!(
            "elevator system started ({} agent(s) online, elevators {})",
            self.gestures.tracked_count(),
            if self.cache.validator().is_enabled() {
                "enabled"
            } else {
                "disabled"
            }
        );
    }

    /// Drop all session state. Floor groups are rediscovered on next use.
    pub fn shutdown(&mut self) {
        info!(
            "elevator system stopped ({} group(s) known)",
            self.cache.len()
        );
        self.gestures.clear();
        self.indicators.clear();
        self.cache.clear();
    }

    pub fn agent_connected(&mut self, agent: AgentId) {
        self.gestures.track(agent);
        info!("{agent} connected ({} online)", self.gestures.tracked_count());
    }

    pub fn agent_disconnected<H: Host + ?Sized>(&mut self, host: &mut H, agent: AgentId) {
        self.gestures.untrack(agent);
        self.indicators.hide(host, agent);
        info!(
            "{agent} disconnected ({} online)",
            self.gestures.tracked_count()
        );
    }

    // -----------------------------------------------------------------------
    // Agent input
    // -----------------------------------------------------------------------

    /// Feed one movement sample. Returns the move made if the sample
    /// completed a jump on a floor marker.
    pub fn on_movement_sample<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        agent: AgentId,
        sample: MovementSample,
    ) -> Option<MoveTarget> {
        match self.gestures.observe(agent, sample)? {
            GestureOutcome::Proceed(gesture) => self.on_jump(host, gesture.agent),
            GestureOutcome::Cancelled {
                corrected_velocity, ..
            } => {
                host.set_velocity(agent, corrected_velocity);
                None
            }
        }
    }

    /// The agent jumped. If it is standing on a floor marker, move it up.
    pub fn on_jump<H: Host + ?Sized>(&mut self, host: &mut H, agent: AgentId) -> Option<MoveTarget> {
        let marker = self.marker_under(host, agent)?;
        self.try_move(host, agent, marker, Direction::Ascend)
    }

    /// The agent's sneak state changed. Starting to sneak on a floor marker
    /// moves it down; releasing sneak does nothing.
    pub fn on_sneak_toggled<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        agent: AgentId,
        now_sneaking: bool,
    ) -> Option<MoveTarget> {
        if !now_sneaking {
            return None;
        }
        let marker = self.marker_under(host, agent)?;
        self.try_move(host, agent, marker, Direction::Descend)
    }

    // -----------------------------------------------------------------------
    // World and clock
    // -----------------------------------------------------------------------

    /// A block at `pos` was destroyed or replaced; it used to be
    /// `prior_material`. Returns the floor that stopped being one, if any.
    pub fn on_block_changed<H: Host + ?Sized>(
        &mut self,
        host: &H,
        pos: Position,
        prior_material: Material,
    ) -> Option<Position> {
        self.cache.on_marker_removed(host, pos, prior_material)
    }

    /// Move the clock forward and run every indicator check now due. The
    /// clock never goes backwards.
    pub fn advance_to<H: Host + ?Sized>(&mut self, host: &mut H, tick: u64) {
        self.tick = self.tick.max(tick);
        self.indicators.process_due(host, &self.cache, self.tick);
    }

    // -----------------------------------------------------------------------
    // Internals
    // -----------------------------------------------------------------------

    fn marker_under<H: Host + ?Sized>(&self, host: &H, agent: AgentId) -> Option<Position> {
        let below = host.standing_on(agent)?;
        self.cache
            .validator()
            .is_valid_floor(host, below)
            .then_some(below)
    }

    fn try_move<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        agent: AgentId,
        marker: Position,
        direction: Direction,
    ) -> Option<MoveTarget> {
        let moved = resolve_move(&mut self.cache, &*host, direction, agent, marker)?;
        self.perform_move(host, agent, marker, &moved);
        Some(moved)
    }

    fn perform_move<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        agent: AgentId,
        from: Position,
        moved: &MoveTarget,
    ) {
        host.relocate(agent, moved.target);
        if let Err(e) = host.teleport_effects(agent, from, moved.target) {
            warn!("{agent}: teleport effects failed: {e}");
        }
        if self.config.display_floor_on_teleport {
            self.indicators.show(host, agent, moved, self.tick);
        }
        debug!(
            "{agent}: moved to {} at tick {}",
            moved.target, self.tick
        );
    }
}
