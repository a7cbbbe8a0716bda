// Directional move resolution.
//
// `resolve_move` is the one entry point gesture handlers call once they
// have confirmed the agent is standing on a valid marker. It finds the
// marker's floor group (creating and scanning it on first use), then picks
// the next floor up or down. The result carries the target's rank and the
// group's floor count for the floor indicator.
//
// Apart from the cache's lazy creation and self-healing insert, resolution
// has no side effects: relocating the agent and showing feedback are the
// caller's job (see `ElevatorSystem::perform_move` in `elevator.rs`).

use crate::cache::FloorGroupCache;
use crate::host::WorldQuery;
use crate::types::{AgentId, ColumnKey, Direction, Position};
use log::debug;

/// Where a move lands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MoveTarget {
    /// The marker the agent will stand on.
    pub target: Position,
    /// 1-based rank of `target` within its group.
    pub rank: usize,
    /// Number of floors in the group.
    pub floor_count: usize,
    pub column: ColumnKey,
}

/// Resolve a move from `marker` in `direction`. Returns `None` when there is
/// no floor that way.
pub fn resolve_move<W: WorldQuery + ?Sized>(
    cache: &mut FloorGroupCache,
    world: &W,
    direction: Direction,
    agent: AgentId,
    marker: Position,
) -> Option<MoveTarget> {
    if cache.lookup_owning_group(marker).is_none() {
        cache.create_group(world, marker);
    }
    let group = cache.group(marker.column())?;

    let target = match direction {
        Direction::Ascend => group.above(marker),
        Direction::Descend => group.below(marker),
    };
    let Some(target) = target else {
        debug!("{agent}: no floor to {direction:?} from {marker}");
        return None;
    };

    let resolved = MoveTarget {
        target,
        rank: group.rank_of(target)?,
        floor_count: group.floor_count(),
        column: group.key(),
    };
    debug!(
        "{agent}: {direction:?} {marker} -> {target} (floor {} of {})",
        resolved.rank, resolved.floor_count
    );
    Some(resolved)
}
