// Scheduled events and the tick-ordered queue that holds them.
//
// Work that must happen later (currently only the floor indicator's hide
// check) is pushed onto an `EventQueue` keyed by `(tick, sequence)`. The
// owner drains it with `pop_if_ready(now)` each time the host clock
// advances. Ticks with nothing due cost one heap peek.
//
// `sequence` is a monotonic counter assigned at scheduling time, so two
// events due on the same tick fire in the order they were scheduled.
//
// See also: `indicator.rs` which schedules and consumes `IndicatorCheck`,
// `elevator.rs` whose `advance_to` drives the drain.

use crate::types::AgentId;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// An event scheduled for a future tick.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ScheduledEvent {
    pub tick: u64,
    /// Tiebreak within a tick. Lower values fire first.
    pub sequence: u64,
    pub kind: ScheduledEventKind,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ScheduledEventKind {
    /// Decide whether the agent's floor indicator stays up. `generation`
    /// must match the indicator currently shown, otherwise the check is
    /// stale and ignored.
    IndicatorCheck { agent: AgentId, generation: u64 },
}

// BinaryHeap is a max-heap; reverse the ordering so the earliest
// (tick, sequence) pops first.
impl PartialEq for ScheduledEvent {
    fn eq(&self, other: &Self) -> bool {
        self.tick == other.tick && self.sequence == other.sequence
    }
}

impl Eq for ScheduledEvent {}

impl PartialOrd for ScheduledEvent {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ScheduledEvent {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .tick
            .cmp(&self.tick)
            .then_with(|| other.sequence.cmp(&self.sequence))
    }
}

/// Min-heap of scheduled events.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct EventQueue {
    heap: BinaryHeap<ScheduledEvent>,
    next_sequence: u64,
}

impl EventQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn schedule(&mut self, tick: u64, kind: ScheduledEventKind) {
        let sequence = self.next_sequence;
        self.next_sequence += 1;
        self.heap.push(ScheduledEvent {
            tick,
            sequence,
            kind,
        });
    }

    /// Tick of the earliest pending event.
    pub fn peek_tick(&self) -> Option<u64> {
        self.heap.peek().map(|e| e.tick)
    }

    /// Pop the next event if it is due at or before `up_to_tick`.
    pub fn pop_if_ready(&mut self, up_to_tick: u64) -> Option<ScheduledEvent> {
        if self.heap.peek().is_some_and(|e| e.tick <= up_to_tick) {
            self.heap.pop()
        } else {
            None
        }
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Drop every pending event. Sequence numbering continues.
    pub fn clear(&mut self) {
        self.heap.clear();
    }
}
