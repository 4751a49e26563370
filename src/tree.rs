//! Binary space-partition region tree.
//!
//! A [`RegionTree`] tiles one workspace.  Every leaf holds exactly one
//! window; every internal region splits its rectangle between two children
//! along an [`Axis`] by a factor.  New windows split an existing leaf in two,
//! removed windows let their sibling take over the parent's rectangle.
//!
//! The tree is purely a model: [`RegionTree::layout`] computes
//! [`Placement`]s, and it is up to the caller to push them to the display.

use crate::arena::{Arena, Region, RegionId, RegionKind};
use crate::command::{Axis, Placement, Rect, WindowId};
use std::collections::HashSet;

/// Axis given to a newly created split.
pub const DEFAULT_AXIS: Axis = Axis::Horizontal;

/// Factor given to a newly created split.
pub const DEFAULT_FACTOR: f64 = 0.5;

/// Errors that indicate the tree can no longer be trusted.
///
/// None of these are recoverable: they are either a configuration limit
/// being hit or a broken parent/child link.
#[derive(Debug, thiserror::Error)]
pub enum TreeError {
    #[error("region arena full (capacity {capacity})")]
    ArenaFull { capacity: usize },

    #[error("corrupt region tree at {region}: {reason}")]
    CorruptLink { region: RegionId, reason: String },

    #[error("split factor {factor} of {region} outside [{min}, {max}]")]
    FactorOutOfBounds {
        region: RegionId,
        factor: f64,
        min: f64,
        max: f64,
    },
}

fn corrupt(region: RegionId, reason: impl Into<String>) -> TreeError {
    TreeError::CorruptLink {
        region,
        reason: reason.into(),
    }
}

/// A region tree backed by its own fixed-capacity [`Arena`].
#[derive(Debug, Clone)]
pub struct RegionTree {
    arena: Arena,
    root: Option<RegionId>,
    min_factor: f64,
}

impl RegionTree {
    /// Create an empty tree with room for `capacity` regions.
    ///
    /// `min_factor` bounds every split factor to
    /// `[min_factor, 1 - min_factor]`.
    pub fn new(capacity: usize, min_factor: f64) -> Self {
        Self {
            arena: Arena::new(capacity),
            root: None,
            min_factor: min_factor.clamp(0.0, 0.5),
        }
    }

    //  Accessors

    pub fn root(&self) -> Option<RegionId> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of live regions (leaves and splits).
    pub fn len(&self) -> usize {
        self.arena.live_count()
    }

    pub fn capacity(&self) -> usize {
        self.arena.capacity()
    }

    pub fn min_factor(&self) -> f64 {
        self.min_factor
    }

    pub fn region(&self, id: RegionId) -> Option<&Region> {
        self.arena.get(id)
    }

    /// Find the leaf holding `window`.
    pub fn find_leaf(&self, window: WindowId) -> Option<RegionId> {
        self.arena
            .iter()
            .find(|(_, r)| r.window() == Some(window))
            .map(|(id, _)| id)
    }

    pub fn contains(&self, window: WindowId) -> bool {
        self.find_leaf(window).is_some()
    }

    /// Every window in the tree, in layout order (`child0` before `child1`).
    pub fn windows(&self) -> Vec<WindowId> {
        let mut out = Vec::new();
        let mut stack: Vec<RegionId> = self.root.into_iter().collect();
        while let Some(id) = stack.pop() {
            match self.arena.get(id).map(|r| &r.kind) {
                Some(RegionKind::Leaf { window }) => out.push(*window),
                Some(RegionKind::Split { children, .. }) => {
                    stack.push(children[1]);
                    stack.push(children[0]);
                }
                None => {}
            }
        }
        out
    }

    //  Mutation

    /// Insert `window` as a new leaf.
    ///
    /// The leaf holding `parent_hint` is split if there is one, otherwise
    /// the root is.  The new window goes into `child0` of the new split,
    /// the previous occupant into `child1`.  Returns the new leaf.
    ///
    /// Inserting a window that is already tracked returns its existing leaf
    /// and leaves the tree unchanged.
    pub fn insert(
        &mut self,
        parent_hint: Option<WindowId>,
        window: WindowId,
    ) -> Result<RegionId, TreeError> {
        if let Some(existing) = self.find_leaf(window) {
            return Ok(existing);
        }

        let Some(root) = self.root else {
            let id = self.arena.alloc(Region::leaf(window, None))?;
            self.root = Some(id);
            return Ok(id);
        };

        // Both slots must be available before anything is touched.
        if self.arena.free_count() < 2 {
            return Err(TreeError::ArenaFull {
                capacity: self.arena.capacity(),
            });
        }

        let anchor = parent_hint
            .and_then(|hint| self.find_leaf(hint))
            .unwrap_or(root);
        let grandparent = self.linked(anchor)?.parent;
        if grandparent.is_none() && anchor != root {
            return Err(corrupt(anchor, "parentless region is not the root"));
        }

        let leaf = self.arena.alloc(Region::leaf(window, None))?;
        let split = self.arena.alloc(Region {
            parent: grandparent,
            kind: RegionKind::Split {
                children: [leaf, anchor],
                axis: DEFAULT_AXIS,
                factor: DEFAULT_FACTOR,
            },
        })?;

        match grandparent {
            None => self.root = Some(split),
            Some(gp) => self.replace_child(gp, anchor, split)?,
        }
        self.set_parent(leaf, Some(split))?;
        self.set_parent(anchor, Some(split))?;
        Ok(leaf)
    }

    /// Remove the leaf holding `window`, promoting its sibling into the
    /// parent's place.
    ///
    /// Returns `Ok(false)` if the window is not in this tree.
    pub fn remove(&mut self, window: WindowId) -> Result<bool, TreeError> {
        let Some(leaf) = self.find_leaf(window) else {
            return Ok(false);
        };

        let Some(parent) = self.linked(leaf)?.parent else {
            if self.root != Some(leaf) {
                return Err(corrupt(leaf, "parentless leaf is not the root"));
            }
            self.arena.free(leaf);
            self.root = None;
            return Ok(true);
        };

        let parent_region = self.linked(parent)?;
        let children = parent_region
            .children()
            .ok_or_else(|| corrupt(parent, "parent of a leaf is itself a leaf"))?;
        let sibling = match children {
            [a, b] if a == leaf => b,
            [a, b] if b == leaf => a,
            _ => return Err(corrupt(parent, format!("does not list child {}", leaf))),
        };
        let grandparent = parent_region.parent;
        self.linked(sibling)?;

        match grandparent {
            None => {
                if self.root != Some(parent) {
                    return Err(corrupt(parent, "parentless region is not the root"));
                }
                self.root = Some(sibling);
            }
            Some(gp) => self.replace_child(gp, parent, sibling)?,
        }
        self.set_parent(sibling, grandparent)?;
        self.arena.free(leaf);
        self.arena.free(parent);
        Ok(true)
    }

    /// Flip the axis of the split that positions `window`.
    ///
    /// Returns `false` if the window is unknown or has no parent.
    pub fn toggle_split(&mut self, window: WindowId) -> bool {
        let Some(parent) = self.parent_of_window(window) else {
            return false;
        };
        match self.arena.get_mut(parent).map(|r| &mut r.kind) {
            Some(RegionKind::Split { axis, .. }) => {
                *axis = axis.flipped();
                true
            }
            _ => false,
        }
    }

    /// Add `delta` to the factor of the split that positions `window`,
    /// clamped to `[min_factor, 1 - min_factor]`.
    ///
    /// Returns `false` if the window is unknown or has no parent.
    pub fn adjust_factor(&mut self, window: WindowId, delta: f64) -> bool {
        let Some(parent) = self.parent_of_window(window) else {
            return false;
        };
        let (min, max) = self.factor_bounds();
        match self.arena.get_mut(parent).map(|r| &mut r.kind) {
            Some(RegionKind::Split { factor, .. }) => {
                *factor = (*factor + delta).clamp(min, max);
                true
            }
            _ => false,
        }
    }

    //  Layout

    /// Compute the placement of every window when the tree fills `rect`.
    pub fn layout(&self, rect: Rect) -> Vec<Placement> {
        let mut out = Vec::new();
        if let Some(root) = self.root {
            self.layout_region(root, rect, &mut out);
        }
        out
    }

    /// Lay out the subtree rooted at `id` inside `rect`, appending to `out`.
    pub fn layout_region(&self, id: RegionId, rect: Rect, out: &mut Vec<Placement>) {
        match self.arena.get(id).map(|r| &r.kind) {
            Some(RegionKind::Leaf { window }) => out.push(Placement {
                window: *window,
                rect,
            }),
            Some(RegionKind::Split {
                children,
                axis,
                factor,
            }) => {
                let (first, second) = rect.split(*axis, *factor);
                self.layout_region(children[0], first, out);
                self.layout_region(children[1], second, out);
            }
            None => log::warn!("layout reached free region slot {}", id),
        }
    }

    //  Invariants

    /// Check the structural invariants of the tree.
    ///
    /// * every live region is reachable from the root, exactly once;
    /// * every child's parent link points back at the split listing it;
    /// * every split factor lies within the configured bounds.
    ///
    /// Leaf/split exclusivity holds by construction of [`RegionKind`].
    pub fn validate(&self) -> Result<(), TreeError> {
        let Some(root) = self.root else {
            if let Some((id, _)) = self.arena.iter().next() {
                return Err(corrupt(id, "live region in an empty tree"));
            }
            return Ok(());
        };
        if self.linked(root)?.parent.is_some() {
            return Err(corrupt(root, "root has a parent"));
        }

        let (min, max) = self.factor_bounds();
        let mut seen = HashSet::new();
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            if !seen.insert(id) {
                return Err(corrupt(id, "reachable more than once"));
            }
            if let RegionKind::Split {
                children, factor, ..
            } = self.linked(id)?.kind
            {
                if !(min..=max).contains(&factor) {
                    return Err(TreeError::FactorOutOfBounds {
                        region: id,
                        factor,
                        min,
                        max,
                    });
                }
                for child in children {
                    if self.linked(child)?.parent != Some(id) {
                        return Err(corrupt(child, format!("parent link does not point at {}", id)));
                    }
                    stack.push(child);
                }
            }
        }

        if seen.len() != self.arena.live_count() {
            let orphan = self
                .arena
                .iter()
                .map(|(id, _)| id)
                .find(|id| !seen.contains(id))
                .unwrap_or(root);
            return Err(corrupt(orphan, "not reachable from the root"));
        }
        Ok(())
    }

    //  Internal

    fn factor_bounds(&self) -> (f64, f64) {
        (self.min_factor, 1.0 - self.min_factor)
    }

    /// Resolve a link that the tree structure says must be live.
    fn linked(&self, id: RegionId) -> Result<&Region, TreeError> {
        self.arena
            .get(id)
            .ok_or_else(|| corrupt(id, "link points at a free slot"))
    }

    fn set_parent(&mut self, id: RegionId, parent: Option<RegionId>) -> Result<(), TreeError> {
        let region = self
            .arena
            .get_mut(id)
            .ok_or_else(|| corrupt(id, "link points at a free slot"))?;
        region.parent = parent;
        Ok(())
    }

    /// Swap `old` for `new` in `parent`'s child slots.
    fn replace_child(
        &mut self,
        parent: RegionId,
        old: RegionId,
        new: RegionId,
    ) -> Result<(), TreeError> {
        let region = self
            .arena
            .get_mut(parent)
            .ok_or_else(|| corrupt(parent, "link points at a free slot"))?;
        match &mut region.kind {
            RegionKind::Split { children, .. } => {
                let slot = children
                    .iter_mut()
                    .find(|c| **c == old)
                    .ok_or_else(|| corrupt(parent, format!("does not list child {}", old)))?;
                *slot = new;
                Ok(())
            }
            RegionKind::Leaf { .. } => Err(corrupt(parent, "expected a split, found a leaf")),
        }
    }

    fn parent_of_window(&self, window: WindowId) -> Option<RegionId> {
        self.find_leaf(window)
            .and_then(|leaf| self.arena.get(leaf))
            .and_then(|r| r.parent)
    }
}

//  Tests
