//! Fixed-capacity slot table backing one workspace's region tree.
//!
//! Regions are addressed by [`RegionId`], a plain slot index.  Parent and
//! child links are stored as ids rather than references, so freeing a region
//! is just emptying its slot.  Allocation reuses the lowest free slot.

use crate::command::{Axis, WindowId};
use crate::tree::TreeError;
use std::fmt;

/// Index of a slot in an [`Arena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RegionId(pub usize);

impl fmt::Display for RegionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// What a region holds: a window (leaf) or a split between two children.
#[derive(Debug, Clone, PartialEq)]
pub enum RegionKind {
    Leaf {
        window: WindowId,
    },
    Split {
        /// `children[0]` receives `factor` of the extent along `axis`,
        /// `children[1]` the remainder.
        children: [RegionId; 2],
        axis: Axis,
        factor: f64,
    },
}

/// A node in a binary space-partition tree.
#[derive(Debug, Clone, PartialEq)]
pub struct Region {
    /// `None` for the tree root.
    pub parent: Option<RegionId>,
    pub kind: RegionKind,
}

impl Region {
    pub fn leaf(window: WindowId, parent: Option<RegionId>) -> Self {
        Self {
            parent,
            kind: RegionKind::Leaf { window },
        }
    }

    /// The window held by this region, if it is a leaf.
    pub fn window(&self) -> Option<WindowId> {
        match self.kind {
            RegionKind::Leaf { window } => Some(window),
            RegionKind::Split { .. } => None,
        }
    }

    /// The two children, if this region is a split.
    pub fn children(&self) -> Option<[RegionId; 2]> {
        match self.kind {
            RegionKind::Leaf { .. } => None,
            RegionKind::Split { children, .. } => Some(children),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.kind, RegionKind::Leaf { .. })
    }
}

/// Fixed-capacity table of region slots.
#[derive(Debug, Clone)]
pub struct Arena {
    slots: Vec<Option<Region>>,
}

impl Arena {
    /// Create an arena with room for exactly `capacity` live regions.
    pub fn new(capacity: usize) -> Self {
        Self {
            slots: vec![None; capacity],
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of live regions.
    pub fn live_count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    pub fn free_count(&self) -> usize {
        self.capacity() - self.live_count()
    }

    /// Store `region` in the first free slot.
    ///
    /// A full arena is a configuration limit, reported as
    /// [`TreeError::ArenaFull`].
    pub fn alloc(&mut self, region: Region) -> Result<RegionId, TreeError> {
        let idx = self
            .slots
            .iter()
            .position(Option::is_none)
            .ok_or(TreeError::ArenaFull {
                capacity: self.capacity(),
            })?;
        self.slots[idx] = Some(region);
        Ok(RegionId(idx))
    }

    /// Return the slot to the free pool.  Freeing a free slot is a no-op.
    pub fn free(&mut self, id: RegionId) {
        if let Some(slot) = self.slots.get_mut(id.0) {
            *slot = None;
        }
    }

    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.slots.get(id.0).and_then(Option::as_ref)
    }

    pub fn get_mut(&mut self, id: RegionId) -> Option<&mut Region> {
        self.slots.get_mut(id.0).and_then(Option::as_mut)
    }

    pub fn is_live(&self, id: RegionId) -> bool {
        self.get(id).is_some()
    }

    /// Iterate over live regions in slot order.
    pub fn iter(&self) -> impl Iterator<Item = (RegionId, &Region)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|r| (RegionId(i), r)))
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn alloc_uses_first_free_slot() {
        let mut a = Arena::new(4);
        let r0 = a.alloc(Region::leaf(1, None)).unwrap();
        let r1 = a.alloc(Region::leaf(2, None)).unwrap();
        let r2 = a.alloc(Region::leaf(3, None)).unwrap();
        assert_eq!((r0, r1, r2), (RegionId(0), RegionId(1), RegionId(2)));

        a.free(r1);
        assert!(!a.is_live(r1));
        let reused = a.alloc(Region::leaf(4, None)).unwrap();
        assert_eq!(reused, RegionId(1), "freed slot should be reused first");
        assert_eq!(a.get(reused).unwrap().window(), Some(4));
    }

    #[test]
    fn full_arena_is_an_error() {
        let mut a = Arena::new(2);
        a.alloc(Region::leaf(1, None)).unwrap();
        a.alloc(Region::leaf(2, None)).unwrap();
        let err = a.alloc(Region::leaf(3, None)).unwrap_err();
        assert!(matches!(err, TreeError::ArenaFull { capacity: 2 }));
        assert_eq!(a.live_count(), 2);
        assert_eq!(a.free_count(), 0);
    }

    #[test]
    fn free_out_of_range_is_noop() {
        let mut a = Arena::new(1);
        a.free(RegionId(10));
        assert_eq!(a.free_count(), 1);
        assert!(a.get(RegionId(10)).is_none());
    }

    #[test]
    fn iter_skips_free_slots() {
        let mut a = Arena::new(3);
        a.alloc(Region::leaf(1, None)).unwrap();
        let mid = a.alloc(Region::leaf(2, None)).unwrap();
        a.alloc(Region::leaf(3, None)).unwrap();
        a.free(mid);
        let ids: Vec<RegionId> = a.iter().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![RegionId(0), RegionId(2)]);
    }

    #[test]
    fn region_accessors() {
        let leaf = Region::leaf(7, None);
        assert!(leaf.is_leaf());
        assert_eq!(leaf.window(), Some(7));
        assert_eq!(leaf.children(), None);

        let split = Region {
            parent: None,
            kind: RegionKind::Split {
                children: [RegionId(1), RegionId(2)],
                axis: Axis::Vertical,
                factor: 0.5,
            },
        };
        assert!(!split.is_leaf());
        assert_eq!(split.window(), None);
        assert_eq!(split.children(), Some([RegionId(1), RegionId(2)]));
    }
}
