//! Workspace multiplexer.
//!
//! [`Workspaces`] owns one [`RegionTree`] per virtual desktop and tracks
//! which one is visible.  Every structural change to the active tree is
//! followed by a layout pass that pushes fresh geometry to the
//! [`Display`]; hidden trees are laid out again when they become active.
//!
//! Display failures are logged and otherwise ignored: the trees stay the
//! source of truth and are re-applied on the next layout pass.

use crate::command::{Rect, WindowId};
use crate::traits::Display;
use crate::tree::{RegionTree, TreeError};
use log::{debug, info, warn};

/// N independent region trees with one active selector.
#[derive(Debug, Clone)]
pub struct Workspaces {
    trees: Vec<RegionTree>,
    active: usize,
    screen: Rect,
}

impl Workspaces {
    /// Create `count` empty workspaces, each with room for `max_regions`
    /// regions.  Workspace 0 starts active.
    pub fn new(count: usize, max_regions: usize, min_factor: f64, screen: Rect) -> Self {
        Self {
            trees: (0..count.max(1))
                .map(|_| RegionTree::new(max_regions, min_factor))
                .collect(),
            active: 0,
            screen,
        }
    }

    //  Accessors

    /// Index of the visible workspace.
    pub fn active(&self) -> usize {
        self.active
    }

    pub fn count(&self) -> usize {
        self.trees.len()
    }

    pub fn screen(&self) -> Rect {
        self.screen
    }

    /// Replace the screen rectangle.  Takes effect on the next layout pass.
    pub fn set_screen(&mut self, screen: Rect) {
        self.screen = screen;
    }

    pub fn tree(&self, index: usize) -> Option<&RegionTree> {
        self.trees.get(index)
    }

    pub fn active_tree(&self) -> &RegionTree {
        &self.trees[self.active]
    }

    /// Index of the workspace whose tree holds `window`.
    pub fn workspace_of(&self, window: WindowId) -> Option<usize> {
        if self.trees[self.active].contains(window) {
            return Some(self.active);
        }
        self.trees.iter().position(|t| t.contains(window))
    }

    //  Tree operations

    /// Tile `window` into the active workspace and lay it out.
    pub fn insert<D: Display>(
        &mut self,
        parent_hint: Option<WindowId>,
        window: WindowId,
        display: &D,
    ) -> Result<(), TreeError> {
        let leaf = self.trees[self.active].insert(parent_hint, window)?;
        debug!(
            "tiled window {:#x} as {} on workspace {}",
            window, leaf, self.active
        );
        self.relayout(display);
        Ok(())
    }

    /// Drop `window` from whichever workspace holds it.
    ///
    /// Untracked windows (e.g. override-redirect popups) are a warning, not
    /// an error.  Only the active workspace is laid out again.
    pub fn remove<D: Display>(&mut self, window: WindowId, display: &D) -> Result<(), TreeError> {
        let Some(index) = self.workspace_of(window) else {
            warn!("destroyed window {:#x} was not tiled", window);
            return Ok(());
        };
        self.trees[index].remove(window)?;
        debug!("untiled window {:#x} from workspace {}", window, index);
        if index == self.active && !self.trees[index].is_empty() {
            self.relayout(display);
        }
        Ok(())
    }

    /// Flip the split that positions `window` in the active workspace.
    pub fn toggle_split<D: Display>(&mut self, window: WindowId, display: &D) -> bool {
        let changed = self.trees[self.active].toggle_split(window);
        if changed {
            self.relayout(display);
        }
        changed
    }

    /// Grow or shrink the split that positions `window` in the active
    /// workspace.
    pub fn adjust_factor<D: Display>(&mut self, window: WindowId, delta: f64, display: &D) -> bool {
        let changed = self.trees[self.active].adjust_factor(window, delta);
        if changed {
            self.relayout(display);
        }
        changed
    }

    /// Make workspace `target` the visible one.
    ///
    /// Hides every window of the current workspace, shows every window of
    /// the target, and lays the target out over the full screen.  Switching
    /// to the active workspace re-runs the same steps.
    pub fn switch<D: Display>(&mut self, target: usize, display: &D) {
        if target >= self.trees.len() {
            warn!(
                "workspace {} out of range (have {})",
                target,
                self.trees.len()
            );
            return;
        }
        info!("switch workspace {} -> {}", self.active, target);

        for window in self.trees[self.active].windows() {
            if let Err(e) = display.hide_window(window) {
                warn!("failed to hide window {:#x}: {}", window, e);
            }
        }

        self.active = target;

        for window in self.trees[self.active].windows() {
            if let Err(e) = display.show_window(window) {
                warn!("failed to show window {:#x}: {}", window, e);
            }
        }

        if !self.trees[self.active].is_empty() {
            self.relayout(display);
        }
    }

    /// Push the active tree's geometry to the display.
    pub fn relayout<D: Display>(&self, display: &D) {
        for placement in self.trees[self.active].layout(self.screen) {
            debug!("  {:#x} -> {}", placement.window, placement.rect);
            if let Err(e) = display.place_window(placement.window, placement.rect) {
                warn!("failed to place window {:#x}: {}", placement.window, e);
            }
        }
    }
}

//  Tests
