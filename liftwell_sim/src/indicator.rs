// Floor indicator lifecycle.
//
// After a successful move the agent is shown "Floor {rank} of {total}" with
// a progress fraction of `rank / total`. `FloorIndicators` tracks which
// agents currently have an indicator up and decides when to take it down:
//
// - First show: the indicator is pushed to the host and a hide check is
//   scheduled `display_ticks` ahead.
// - Show while already shown: the text and progress are updated in place
//   and the group column is replaced. The pending check is left as is.
// - Hide check: if the block under the agent is a floor of the indicator's
//   group, a new check is scheduled; otherwise the indicator is hidden and
//   forgotten.
// - Disconnect: hidden and forgotten immediately.
//
// Each first show takes a fresh generation number and checks carry the
// generation they were scheduled for, so a check left over from an
// indicator that was since hidden (and maybe shown again) does nothing.
//
// See also: `event.rs` for the queue, `elevator.rs` which calls `show`
// after `perform_move` and drains checks from `advance_to`.

use crate::cache::FloorGroupCache;
use crate::event::{EventQueue, ScheduledEventKind};
use crate::host::{AgentControl, Feedback};
use crate::resolver::MoveTarget;
use crate::types::{AgentId, ColumnKey};
use log::{debug, warn};
use std::collections::BTreeMap;

/// What the host renders for one agent.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FloorIndicator {
    pub rank: usize,
    pub total: usize,
    /// `rank / total`, in `(0, 1]`.
    pub progress: f32,
}

impl FloorIndicator {
    pub fn new(rank: usize, total: usize) -> Self {
        let progress = if total == 0 {
            0.0
        } else {
            rank as f32 / total as f32
        };
        Self {
            rank,
            total,
            progress,
        }
    }

    pub fn title(&self) -> String {
        format!("Floor {} of {}", self.rank, self.total)
    }
}

#[derive(Clone, Copy, Debug)]
struct ShownIndicator {
    column: ColumnKey,
    indicator: FloorIndicator,
    generation: u64,
}

/// Every indicator currently on screen, plus their pending hide checks.
#[derive(Clone, Debug)]
pub struct FloorIndicators {
    display_ticks: u64,
    shown: BTreeMap<AgentId, ShownIndicator>,
    queue: EventQueue,
    next_generation: u64,
}

impl FloorIndicators {
    pub fn new(display_ticks: u64) -> Self {
        Self {
            display_ticks: display_ticks.max(1),
            shown: BTreeMap::new(),
            queue: EventQueue::new(),
            next_generation: 0,
        }
    }

    /// Show (or update) the indicator for a completed move.
    pub fn show<H: Feedback + ?Sized>(
        &mut self,
        host: &mut H,
        agent: AgentId,
        moved: &MoveTarget,
        now: u64,
    ) {
        let indicator = FloorIndicator::new(moved.rank, moved.floor_count);
        if let Err(e) = host.show_indicator(agent, &indicator) {
            warn!("{agent}: could not show floor indicator: {e}");
            return;
        }

        if let Some(shown) = self.shown.get_mut(&agent) {
            shown.column = moved.column;
            shown.indicator = indicator;
            return;
        }

        let generation = self.next_generation;
        self.next_generation += 1;
        self.shown.insert(
            agent,
            ShownIndicator {
                column: moved.column,
                indicator,
                generation,
            },
        );
        self.queue.schedule(
            now + self.display_ticks,
            ScheduledEventKind::IndicatorCheck { agent, generation },
        );
    }

    /// Run every hide check due at or before `now`.
    pub fn process_due<H: AgentControl + Feedback + ?Sized>(
        &mut self,
        host: &mut H,
        cache: &FloorGroupCache,
        now: u64,
    ) {
        while let Some(event) = self.queue.pop_if_ready(now) {
            let ScheduledEventKind::IndicatorCheck { agent, generation } = event.kind;
            let Some(shown) = self.shown.get(&agent).copied() else {
                continue;
            };
            if shown.generation != generation {
                continue;
            }

            let on_group = host.standing_on(agent).is_some_and(|below| {
                cache
                    .group(shown.column)
                    .is_some_and(|group| group.contains(below))
            });
            if on_group {
                debug!("{agent}: still on {}, keeping indicator", shown.column);
                self.queue.schedule(
                    event.tick + self.display_ticks,
                    ScheduledEventKind::IndicatorCheck { agent, generation },
                );
            } else {
                debug!("{agent}: left {}, hiding indicator", shown.column);
                self.hide(host, agent);
            }
        }
    }

    /// Hide and forget an agent's indicator, if any.
    pub fn hide<H: Feedback + ?Sized>(&mut self, host: &mut H, agent: AgentId) {
        if self.shown.remove(&agent).is_none() {
            return;
        }
        if let Err(e) = host.hide_indicator(agent) {
            warn!("{agent}: could not hide floor indicator: {e}");
        }
    }

    pub fn current(&self, agent: AgentId) -> Option<&FloorIndicator> {
        self.shown.get(&agent).map(|s| &s.indicator)
    }

    pub fn shown_count(&self) -> usize {
        self.shown.len()
    }

    /// Tick of the next pending hide check.
    pub fn next_check(&self) -> Option<u64> {
        self.queue.peek_tick()
    }

    /// Forget every indicator and pending check without touching the host.
    pub fn clear(&mut self) {
        self.shown.clear();
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FeedbackError;
    use crate::pattern::{MarkerPattern, PatternValidator};
    use crate::types::{Material, Position, Velocity, WorldId};
    use crate::world::{VoxelWorld, WorldShape, Worlds};

    const W: WorldId = WorldId(0);
    const A: AgentId = AgentId(1);

    /// Minimal host: one agent whose standing block is set directly.
    #[derive(Default)]
    struct Stub {
        below: Option<Position>,
        log: Vec<String>,
        fail_show: bool,
    }

    impl AgentControl for Stub {
        fn relocate(&mut self, _: AgentId, target: Position) {
            self.below = Some(target);
        }
        fn velocity(&self, _: AgentId) -> Option<Velocity> {
            None
        }
        fn set_velocity(&mut self, _: AgentId, _: Velocity) {}
        fn standing_on(&self, _: AgentId) -> Option<Position> {
            self.below
        }
        fn is_climbing(&self, _: AgentId) -> bool {
            false
        }
    }

    impl Feedback for Stub {
        fn teleport_effects(&mut self, _: AgentId, _: Position, _: Position) -> Result<(), FeedbackError> {
            Ok(())
        }
        fn show_indicator(&mut self, _: AgentId, indicator: &FloorIndicator) -> Result<(), FeedbackError> {
            if self.fail_show {
                return Err(FeedbackError::Rejected {
                    reason: "no screen".into(),
                });
            }
            self.log.push(format!("show {}", indicator.title()));
            Ok(())
        }
        fn hide_indicator(&mut self, _: AgentId) -> Result<(), FeedbackError> {
            self.log.push("hide".into());
            Ok(())
        }
    }

    fn at(y: i32) -> Position {
        Position::new(W, 2, y, 2)
    }

    fn cache_with_floors() -> FloorGroupCache {
        let pattern = MarkerPattern {
            center: Material::IronBlock,
            rim: Material::SmoothStone,
        };
        let mut worlds = Worlds::new();
        worlds.insert(
            W,
            VoxelWorld::new(WorldShape {
                size_x: 5,
                size_y: 40,
                size_z: 5,
                min_y: 0,
            }),
        );
        for y in [5, 15, 25] {
            worlds.build_floor(at(y), pattern.center, pattern.rim);
        }
        let mut cache = FloorGroupCache::new(PatternValidator::new(pattern));
        cache.create_group(&worlds, at(5));
        cache
    }

    fn moved_to(y: i32, rank: usize) -> MoveTarget {
        MoveTarget {
            target: at(y),
            rank,
            floor_count: 3,
            column: at(0).column(),
        }
    }

    #[test]
    fn title_and_progress() {
        let indicator = FloorIndicator::new(2, 4);
        assert_eq!(indicator.title(), "Floor 2 of 4");
        assert!((indicator.progress - 0.5).abs() < f32::EPSILON);
        assert_eq!(FloorIndicator::new(0, 0).progress, 0.0);
    }

    #[test]
    fn hides_after_agent_leaves() {
        let cache = cache_with_floors();
        let mut host = Stub::default();
        let mut indicators = FloorIndicators::new(60);

        host.below = Some(at(15));
        indicators.show(&mut host, A, &moved_to(15, 2), 100);
        assert_eq!(indicators.next_check(), Some(160));

        host.below = Some(Position::new(W, 0, 0, 0));
        indicators.process_due(&mut host, &cache, 159);
        assert_eq!(indicators.shown_count(), 1);
        indicators.process_due(&mut host, &cache, 160);
        assert_eq!(indicators.shown_count(), 0);
        assert_eq!(host.log, vec!["show Floor 2 of 3", "hide"]);
    }

    #[test]
    fn rearms_while_agent_stays_on_group() {
        let cache = cache_with_floors();
        let mut host = Stub::default();
        let mut indicators = FloorIndicators::new(60);

        host.below = Some(at(25));
        indicators.show(&mut host, A, &moved_to(25, 3), 0);
        indicators.process_due(&mut host, &cache, 60);
        assert_eq!(indicators.next_check(), Some(120));
        indicators.process_due(&mut host, &cache, 120);
        assert_eq!(indicators.next_check(), Some(180));

        host.below = None;
        indicators.process_due(&mut host, &cache, 180);
        assert!(indicators.current(A).is_none());
        assert_eq!(indicators.next_check(), None);
    }

    #[test]
    fn update_in_place_does_not_rearm() {
        let cache = cache_with_floors();
        let mut host = Stub::default();
        let mut indicators = FloorIndicators::new(60);

        indicators.show(&mut host, A, &moved_to(15, 2), 0);
        indicators.show(&mut host, A, &moved_to(25, 3), 50);
        assert_eq!(indicators.current(A).map(|i| i.rank), Some(3));
        assert_eq!(indicators.next_check(), Some(60));

        // The first check still fires at 60.
        host.below = None;
        indicators.process_due(&mut host, &cache, 60);
        assert_eq!(indicators.shown_count(), 0);
    }

    #[test]
    fn stale_check_after_rehide_is_inert() {
        let cache = cache_with_floors();
        let mut host = Stub::default();
        let mut indicators = FloorIndicators::new(60);

        indicators.show(&mut host, A, &moved_to(15, 2), 0);
        indicators.hide(&mut host, A);
        indicators.show(&mut host, A, &moved_to(25, 3), 30);

        // The first generation's check at 60 must not hide the new one.
        host.below = None;
        indicators.process_due(&mut host, &cache, 60);
        assert!(indicators.current(A).is_some());
        indicators.process_due(&mut host, &cache, 90);
        assert!(indicators.current(A).is_none());
    }

    #[test]
    fn failed_show_is_not_tracked() {
        let mut host = Stub {
            fail_show: true,
            ..Stub::default()
        };
        let mut indicators = FloorIndicators::new(60);
        indicators.show(&mut host, A, &moved_to(15, 2), 0);
        assert_eq!(indicators.shown_count(), 0);
        assert_eq!(indicators.next_check(), None);
    }

    #[test]
    fn hide_without_indicator_does_not_touch_host() {
        let mut host = Stub::default();
        let mut indicators = FloorIndicators::new(60);
        indicators.hide(&mut host, A);
        assert!(host.log.is_empty());
    }
}
