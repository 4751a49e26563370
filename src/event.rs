//! Display-server events as seen by the [`Manager`](crate::manager::Manager).
//!
//! Backends translate their native protocol events into [`Event`]s; the
//! manager never sees a raw protocol type.  Events arrive strictly one at a
//! time and in order.

use crate::command::{Rect, WindowId};
use crate::keys::ModMask;
use std::fmt;

/// A client's request to change its own geometry or stacking.
///
/// Each field is `Some` only if the client asked for it, mirroring the
/// protocol's value mask.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfigureRequest {
    pub window: WindowId,
    pub x: Option<i32>,
    pub y: Option<i32>,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub border_width: Option<u32>,
    pub sibling: Option<WindowId>,
    /// Raw protocol stack mode (`Above`, `Below`, …).
    pub stack_mode: Option<u32>,
}

/// Notification kinds that are accepted but change nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotifyKind {
    Map,
    Unmap,
    Reparent,
    Configure,
    Gravity,
    CirculateRequest,
    KeyRelease,
    Unknown,
}

impl fmt::Display for NotifyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NotifyKind::Map => "map-notify",
            NotifyKind::Unmap => "unmap-notify",
            NotifyKind::Reparent => "reparent-notify",
            NotifyKind::Configure => "configure-notify",
            NotifyKind::Gravity => "gravity-notify",
            NotifyKind::CirculateRequest => "circulate-request",
            NotifyKind::KeyRelease => "key-release",
            NotifyKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// Every event the manager routes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// A window was created.  `override_redirect` windows (menus, popups)
    /// are never tiled.
    CreateNotify {
        window: WindowId,
        parent: WindowId,
        override_redirect: bool,
    },

    /// A window was destroyed.
    DestroyNotify { window: WindowId },

    /// A client asks for its window to be made visible.
    MapRequest { window: WindowId },

    /// A client asks to change its geometry.
    ConfigureRequest(ConfigureRequest),

    /// A key was pressed.  `state` is the modifier mask at press time.
    KeyPress { keycode: u8, state: ModMask },

    /// Input focus moved to `window`.
    FocusIn { window: WindowId },

    /// The root window changed size, e.g. after a RandR mode switch.
    ScreenChange { screen: Rect },

    /// Anything else; accepted and ignored.
    Other(NotifyKind),
}
