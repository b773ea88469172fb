use std::collections::BTreeMap;

use bitflags::bitflags;

use crate::grid::{GridCoord, Level};

bitflags! {
    /// What happened to the visuals of a cell during a mutation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct RefreshFlags: u8 {
        /// Variant mesh respawned.
        const MESH    = 1 << 0;
        /// Path UVs rebuilt.
        const TEXTURE = 1 << 1;
        /// Visual destroyed.
        const REMOVED = 1 << 2;
        /// Prop spawned or destroyed in the cell.
        const PROP    = 1 << 3;
    }
}

/// Cells whose visuals changed during one mutation, so the host can refresh them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RefreshSet {
    entries: BTreeMap<(Level, GridCoord), RefreshFlags>,
}

impl RefreshSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `flags` for a cell; empty flags are ignored.
    pub fn mark(&mut self, level: Level, coord: GridCoord, flags: RefreshFlags) {
        if flags.is_empty() {
            return;
        }
        *self.entries.entry((level, coord)).or_default() |= flags;
    }

    pub fn merge(&mut self, other: RefreshSet) {
        for ((level, coord), flags) in other.entries {
            self.mark(level, coord, flags);
        }
    }

    pub fn flags(&self, level: Level, coord: GridCoord) -> RefreshFlags {
        self.entries
            .get(&(level, coord))
            .copied()
            .unwrap_or_default()
    }

    pub fn contains(&self, level: Level, coord: GridCoord) -> bool {
        self.entries.contains_key(&(level, coord))
    }

    /// Refreshed cells on `level`, in coordinate order.
    pub fn coords_on(&self, level: Level) -> impl Iterator<Item = GridCoord> + '_ {
        self.entries
            .keys()
            .filter(move |(entry_level, _)| *entry_level == level)
            .map(|(_, coord)| *coord)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Level, GridCoord, RefreshFlags)> + '_ {
        self.entries
            .iter()
            .map(|((level, coord), flags)| (*level, *coord, *flags))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marks_accumulate_per_cell() {
        let mut refresh = RefreshSet::new();
        let cell = GridCoord::new(1, 2);
        refresh.mark(Level(1), cell, RefreshFlags::MESH);
        refresh.mark(Level(1), cell, RefreshFlags::TEXTURE);
        refresh.mark(Level(2), cell, RefreshFlags::empty());

        assert_eq!(refresh.len(), 1);
        assert_eq!(
            refresh.flags(Level(1), cell),
            RefreshFlags::MESH | RefreshFlags::TEXTURE
        );
        assert!(!refresh.contains(Level(2), cell));
    }

    #[test]
    fn merge_unions_flags() {
        let cell = GridCoord::ORIGIN;
        let mut first = RefreshSet::new();
        first.mark(Level(0), cell, RefreshFlags::MESH);
        let mut second = RefreshSet::new();
        second.mark(Level(0), cell, RefreshFlags::REMOVED);
        second.mark(Level(0), GridCoord::new(0, 1), RefreshFlags::MESH);

        first.merge(second);
        assert_eq!(first.len(), 2);
        assert_eq!(
            first.flags(Level(0), cell),
            RefreshFlags::MESH | RefreshFlags::REMOVED
        );
        assert_eq!(first.coords_on(Level(0)).count(), 2);
    }
}
