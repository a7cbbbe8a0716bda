// Ordered floor list for one vertical column.
//
// A `FloorGroup` is the elevator shaft of one column: every known floor
// marker at that (world, x, z), sorted ascending by height. Insertion walks
// the list to the first strictly higher floor and inserts before it, so the
// order is maintained incrementally and never re-sorted. Columns rarely hold
// more than a handful of floors, so the linear walk and the inline
// `SmallVec` storage are the right size.
//
// The group does not validate markers itself; callers (the cache's rescan
// and self-healing lookup) only insert positions the validator accepted.
//
// See also: `cache.rs` which owns every `FloorGroup` keyed by `ColumnKey`,
// `resolver.rs` which walks `above`/`below`.

use crate::types::{ColumnKey, Position};
use smallvec::SmallVec;

/// The known floors of one column, lowest first.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FloorGroup {
    key: ColumnKey,
    floors: SmallVec<[Position; 8]>,
}

impl FloorGroup {
    /// An empty group for the given column.
    pub fn new(key: ColumnKey) -> Self {
        Self {
            key,
            floors: SmallVec::new(),
        }
    }

    pub fn key(&self) -> ColumnKey {
        self.key
    }

    /// True iff `pos` lies in this group's column (height ignored).
    pub fn belongs_to_column(&self, pos: Position) -> bool {
        pos.column() == self.key
    }

    /// Insert a floor, keeping ascending order. No-op if already present.
    pub fn insert(&mut self, pos: Position) {
        if self.contains(pos) {
            return;
        }
        match self.floors.iter().position(|f| f.y > pos.y) {
            Some(i) => self.floors.insert(i, pos),
            None => self.floors.push(pos),
        }
    }

    /// Remove a floor. No-op if absent.
    pub fn remove(&mut self, pos: Position) {
        if let Some(i) = self.index_of(pos) {
            self.floors.remove(i);
        }
    }

    /// The next floor up from `pos`, or `None` if `pos` is not a floor here
    /// or is the top floor.
    pub fn above(&self, pos: Position) -> Option<Position> {
        let i = self.index_of(pos)?;
        self.floors.get(i + 1).copied()
    }

    /// The next floor down from `pos`, or `None` if `pos` is not a floor here
    /// or is the bottom floor.
    pub fn below(&self, pos: Position) -> Option<Position> {
        let i = self.index_of(pos)?;
        i.checked_sub(1).and_then(|j| self.floors.get(j).copied())
    }

    pub fn floor_count(&self) -> usize {
        self.floors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.floors.is_empty()
    }

    /// 1-based rank of `pos` counting from the bottom floor.
    pub fn rank_of(&self, pos: Position) -> Option<usize> {
        self.index_of(pos).map(|i| i + 1)
    }

    pub fn contains(&self, pos: Position) -> bool {
        self.floors.contains(&pos)
    }

    pub fn clear(&mut self) {
        self.floors.clear();
    }

    /// All floors, lowest first.
    pub fn floors(&self) -> &[Position] {
        &self.floors
    }

    fn index_of(&self, pos: Position) -> Option<usize> {
        self.floors.iter().position(|&f| f == pos)
    }
}
