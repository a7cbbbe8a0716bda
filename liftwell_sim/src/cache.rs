// Registry of every discovered floor group.
//
// `FloorGroupCache` maps each `ColumnKey` to its `FloorGroup`, so asking
// "is there an elevator in this column" is one hash lookup instead of a
// world scan. Groups are created lazily: the first time an agent uses a
// marker in an unknown column, `create_group` rescans the whole column from
// the world's minimum height (inclusive) to its maximum (exclusive) and
// records every valid marker it finds, lowest first.
//
// After creation the cache is kept consistent incrementally:
//
// - Markers built after the rescan are picked up by `lookup_owning_group`,
//   which inserts the looked-up marker into its group if missing. Callers
//   only look up positions the validator accepted.
// - Markers broken later arrive through `on_marker_removed` with the block's
//   prior material. Breaking a center removes that floor; breaking a rim
//   removes the center next to it.
//
// Groups are never dropped when they empty out. The column stays known, and
// the next marker built there is healed in by lookup rather than triggering
// another full rescan.
//
// The map is `FxHashMap` keyed by `ColumnKey`. Nothing iterates it in an
// order-sensitive way; `groups()` callers that need order must sort.
//
// See also: `floor_group.rs` for the per-column ordered list,
// `pattern.rs` for the predicate used by rescans, `resolver.rs` for the
// create-or-lookup entry point.

use crate::floor_group::FloorGroup;
use crate::host::WorldQuery;
use crate::pattern::PatternValidator;
use crate::types::{ColumnKey, Material, Position};
use log::{debug, trace};
use rustc_hash::FxHashMap;

/// Every floor group known this session.
#[derive(Clone, Debug)]
pub struct FloorGroupCache {
    validator: PatternValidator,
    groups: FxHashMap<ColumnKey, FloorGroup>,
}

impl FloorGroupCache {
    pub fn new(validator: PatternValidator) -> Self {
        Self {
            validator,
            groups: FxHashMap::default(),
        }
    }

    pub fn validator(&self) -> &PatternValidator {
        &self.validator
    }

    /// The group owning `pos`'s column, if one exists. If the group does not
    /// yet list `pos`, it is inserted first, so a marker built after the
    /// column was scanned is picked up the first time it is used.
    pub fn lookup_owning_group(&mut self, pos: Position) -> Option<&FloorGroup> {
        let group = self.groups.get_mut(&pos.column())?;
        if !group.contains(pos) {
            debug!("healing {pos} into group {}", group.key());
            group.insert(pos);
        }
        Some(&*group)
    }

    /// Register a group for `pos`'s column and fill it from a full-height
    /// rescan. An existing group for the column is rescanned in place.
    pub fn create_group<W: WorldQuery + ?Sized>(&mut self, world: &W, pos: Position) -> &FloorGroup {
        let key = pos.column();
        let group = self
            .groups
            .entry(key)
            .or_insert_with(|| FloorGroup::new(key));
        rescan_into(&self.validator, world, group);
        debug!("created group {key} with {} floor(s)", group.floor_count());
        group
    }

    /// Rebuild a known group from the world. Returns `None` for columns that
    /// have no group.
    pub fn rescan_column<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        column: ColumnKey,
    ) -> Option<&FloorGroup> {
        let group = self.groups.get_mut(&column)?;
        rescan_into(&self.validator, world, group);
        debug!("rescanned group {column}: {} floor(s)", group.floor_count());
        Some(&*group)
    }

    /// React to a block at `pos` being destroyed or changed from
    /// `prior_material`. Returns the floor removed from its group, if any.
    pub fn on_marker_removed<W: WorldQuery + ?Sized>(
        &mut self,
        world: &W,
        pos: Position,
        prior_material: Material,
    ) -> Option<Position> {
        let center = self.validator.center()?;
        let rim = self.validator.rim()?;
        let floor = if prior_material == center {
            pos
        } else if prior_material == rim {
            self.validator.center_of_rim(world, pos)?
        } else {
            return None;
        };
        self.remove_floor(floor)
    }

    /// Remove one floor from whichever group owns its column. Returns the
    /// floor if it was listed.
    pub fn remove_floor(&mut self, floor: Position) -> Option<Position> {
        let Some(group) = self.groups.get_mut(&floor.column()) else {
            trace!("no group for {floor}; nothing to remove");
            return None;
        };
        if !group.contains(floor) {
            return None;
        }
        group.remove(floor);
        debug!(
            "removed floor {floor}; group {} now has {} floor(s)",
            group.key(),
            group.floor_count()
        );
        Some(floor)
    }

    pub fn group(&self, column: ColumnKey) -> Option<&FloorGroup> {
        self.groups.get(&column)
    }

    /// All groups, in no particular order.
    pub fn groups(&self) -> impl Iterator<Item = &FloorGroup> {
        self.groups.values()
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Forget every group.
    pub fn clear(&mut self) {
        self.groups.clear();
    }
}

/// Refill `group` with every valid marker in its column, lowest first.
fn rescan_into<W: WorldQuery + ?Sized>(
    validator: &PatternValidator,
    world: &W,
    group: &mut FloorGroup,
) {
    group.clear();
    let key = group.key();
    for y in world.min_height(key.world)..world.max_height(key.world) {
        let pos = key.at(y);
        if validator.is_valid_floor(world, pos) {
            group.insert(pos);
        }
    }
}
