//! The main orchestrator that ties workspaces, shortcuts, and the display
//! together.
//!
//! [`Manager`] owns all window-manager state and reacts to [`Event`]s by
//! updating the region trees and issuing calls to the [`Display`] trait.

use crate::command::{Action, Rect, WindowId};
use crate::config::Config;
use crate::event::{ConfigureRequest, Event};
use crate::keys::ModMask;
use crate::shortcuts::ShortcutTable;
use crate::traits::{Display, EventSource, KeyResolver, Spawner};
use crate::tree::TreeError;
use crate::workspace::Workspaces;
use log::{debug, info, warn};

/// Errors that stop the manager.
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    /// The region model is broken or full.
    #[error("region tree error: {0}")]
    Tree(#[from] TreeError),

    /// The event stream failed.
    #[error("event source error: {0}")]
    Source(String),
}

/// All window-manager state plus the collaborators it drives.
///
/// The manager is generic over the display, the key resolver, and the
/// process spawner, making it completely independent of X11.
///
/// # Typical usage
///
/// ```ignore
/// let mut manager = Manager::new(&config, screen, display, keys, ProcessSpawner);
/// manager.run(&mut events)?;
/// ```
pub struct Manager<D: Display, K: KeyResolver, S: Spawner> {
    display: D,
    keys: K,
    spawner: S,
    workspaces: Workspaces,
    shortcuts: ShortcutTable,
    focused: Option<WindowId>,
    running: bool,
}

impl<D: Display, K: KeyResolver, S: Spawner> Manager<D, K, S> {
    /// Create a manager with empty workspaces covering `screen`.
    pub fn new(config: &Config, screen: Rect, display: D, keys: K, spawner: S) -> Self {
        let tiling = &config.tiling;
        Self {
            display,
            keys,
            spawner,
            workspaces: Workspaces::new(
                tiling.workspaces,
                tiling.max_regions,
                tiling.min_split_factor,
                screen,
            ),
            shortcuts: config.shortcut_table(),
            focused: None,
            running: true,
        }
    }

    //  Accessors

    pub fn workspaces(&self) -> &Workspaces {
        &self.workspaces
    }

    pub fn shortcuts(&self) -> &ShortcutTable {
        &self.shortcuts
    }

    /// The window that last received input focus, if it still exists.
    pub fn focused(&self) -> Option<WindowId> {
        self.focused
    }

    /// `false` once a [`Quit`](Action::Quit) action has run.
    pub fn running(&self) -> bool {
        self.running
    }

    pub fn display(&self) -> &D {
        &self.display
    }

    //  Event loop

    /// Handle events from `source` until quit or a fatal error.
    pub fn run<E: EventSource>(&mut self, source: &mut E) -> Result<(), ManagerError> {
        info!("splitwm running");
        while self.running {
            let event = source
                .next_event()
                .map_err(|e| ManagerError::Source(e.to_string()))?;
            self.handle(event)?;
        }
        info!("quit requested, exiting");
        Ok(())
    }

    /// Process a single [`Event`].
    ///
    /// Only tree errors are returned; individual display requests that
    /// fail are logged and the model stays authoritative.
    pub fn handle(&mut self, event: Event) -> Result<(), ManagerError> {
        match event {
            Event::CreateNotify {
                window,
                parent,
                override_redirect,
            } => {
                if override_redirect {
                    debug!("create {:#x}: override-redirect, not tiled", window);
                } else {
                    debug!("create {:#x} (parent {:#x})", window, parent);
                    self.workspaces.insert(Some(parent), window, &self.display)?;
                }
            }

            Event::DestroyNotify { window } => {
                debug!("destroy {:#x}", window);
                if self.focused == Some(window) {
                    self.focused = None;
                }
                self.workspaces.remove(window, &self.display)?;
            }

            Event::MapRequest { window } => {
                info!("map request for {:#x}", window);
                if let Err(e) = self.display.map_window(window) {
                    warn!("failed to map window {:#x}: {}", window, e);
                }
                if let Err(e) = self.display.send_take_focus(window) {
                    warn!("failed to send WM_TAKE_FOCUS to {:#x}: {}", window, e);
                }
            }

            Event::ConfigureRequest(request) => {
                self.configure(&request);
            }

            Event::KeyPress { keycode, state } => {
                self.key_press(keycode, state);
            }

            Event::FocusIn { window } => {
                debug!("focus in {:#x}", window);
                self.focused = Some(window);
            }

            Event::ScreenChange { screen } => {
                if screen != self.workspaces.screen() {
                    info!("screen is now {}", screen);
                    self.workspaces.set_screen(screen);
                    self.workspaces.relayout(&self.display);
                }
            }

            Event::Other(kind) => {
                debug!("ignoring {}", kind);
            }
        }
        Ok(())
    }

    //  Handlers

    /// Pass the client's requested geometry straight through.  Tiled
    /// windows are put back in place by the next layout pass.
    fn configure(&self, request: &ConfigureRequest) {
        info!("configure request for {:#x}", request.window);
        if let Err(e) = self.display.configure_window(request) {
            warn!("failed to configure window {:#x}: {}", request.window, e);
        }
    }

    /// Resolve the key and run every matching binding.
    fn key_press(&mut self, keycode: u8, state: ModMask) {
        let keysym = self.keys.keysym(keycode, state);
        debug!(
            "key press: keycode={} keysym={:#x} state={:#x}",
            keycode, keysym, state
        );
        let actions: Vec<Action> = self
            .shortcuts
            .matching(state, keysym)
            .map(|b| b.action.clone())
            .collect();
        for action in actions {
            self.execute(action);
        }
    }

    /// Run one shortcut action.
    pub fn execute(&mut self, action: Action) {
        info!("{}", action);
        match action {
            Action::Quit => {
                self.running = false;
            }

            Action::CloseFocused => match self.focused {
                Some(window) => {
                    if let Err(e) = self.display.send_close(window) {
                        warn!("failed to send WM_DELETE_WINDOW to {:#x}: {}", window, e);
                    }
                }
                None => debug!("no focused window, nothing to close"),
            },

            Action::Spawn(command) => {
                if let Err(e) = self.spawner.spawn(&command) {
                    warn!("{}", e);
                }
            }

            Action::ToggleSplit => match self.focused {
                Some(window) => {
                    if !self.workspaces.toggle_split(window, &self.display) {
                        debug!("window {:#x} has no split to toggle", window);
                    }
                }
                None => debug!("no focused window, nothing to toggle"),
            },

            Action::AdjustFactor(delta) => match self.focused {
                Some(window) => {
                    if !self.workspaces.adjust_factor(window, delta, &self.display) {
                        debug!("window {:#x} has no split to adjust", window);
                    }
                }
                None => debug!("no focused window, nothing to adjust"),
            },

            Action::SwitchWorkspace(target) => {
                self.workspaces.switch(target, &self.display);
                // Hidden windows lose focus along with visibility.
                if let Some(window) = self.focused {
                    if !self.workspaces.active_tree().contains(window) {
                        debug!("focus on hidden window {:#x} dropped", window);
                        self.focused = None;
                    }
                }
            }
        }
    }
}

//  Tests
