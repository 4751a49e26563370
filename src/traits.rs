//! Core traits that decouple splitwm from any specific display server,
//! keyboard layout, or process launcher.
//!
//! Every concrete backend (X11, a test harness, …) implements these traits.
//! The [`Manager`](crate::manager::Manager) and
//! [`Workspaces`](crate::workspace::Workspaces) only depend on these
//! abstractions.

use crate::command::{Rect, SpawnCommand, WindowId};
use crate::event::{ConfigureRequest, Event};
use crate::keys::{Keysym, ModMask};

/// Requests the window manager sends to the display server.
///
/// Every request may fail individually.  Callers log failures and carry
/// on; the tree remains the source of truth and is re-applied on the next
/// layout pass.
pub trait Display {
    /// The error type produced by this display.
    type Error: std::error::Error + 'static;

    /// Move and resize `window` to exactly `rect`.
    fn place_window(&self, window: WindowId, rect: Rect) -> Result<(), Self::Error>;

    /// Make a window of a newly activated workspace visible again.
    fn show_window(&self, window: WindowId) -> Result<(), Self::Error>;

    /// Hide a window whose workspace is being deactivated.
    fn hide_window(&self, window: WindowId) -> Result<(), Self::Error>;

    /// Grant a client's request to map its window.
    fn map_window(&self, window: WindowId) -> Result<(), Self::Error>;

    /// Apply a client's configure request as-is.
    fn configure_window(&self, request: &ConfigureRequest) -> Result<(), Self::Error>;

    /// Ask `window` to close itself (`WM_DELETE_WINDOW`).  Never forced.
    fn send_close(&self, window: WindowId) -> Result<(), Self::Error>;

    /// Offer input focus to `window` (`WM_TAKE_FOCUS`).  Never forced.
    fn send_take_focus(&self, window: WindowId) -> Result<(), Self::Error>;
}

/// Translates a physical key into a symbolic one.
///
/// Treated as a pure lookup: it always answers, possibly with
/// [`NO_SYMBOL`](crate::keys::NO_SYMBOL).
pub trait KeyResolver {
    fn keysym(&self, keycode: u8, state: ModMask) -> Keysym;
}

/// Starts external programs.
///
/// Spawned processes are detached: the caller never waits for them or
/// observes how they exit.
pub trait Spawner {
    /// The error type produced by this spawner.
    type Error: std::error::Error + 'static;

    fn spawn(&self, command: &SpawnCommand) -> Result<(), Self::Error>;
}

/// A blocking, ordered stream of display-server [`Event`]s.
///
/// # Contract
///
/// * [`next_event`](EventSource::next_event) **blocks** until an event is
///   available.
/// * Events are delivered exactly once, in arrival order, never batched.
/// * An error means the stream is unusable; the caller stops.
pub trait EventSource {
    /// The error type produced by this source.
    type Error: std::error::Error + 'static;

    fn next_event(&mut self) -> Result<Event, Self::Error>;
}

//  Test doubles


#[cfg(test)]
mod tests {
    use super::mock::*;
    use super::*;

    #[test]
    fn recorder_records_even_when_failing() {
        let d = RecorderDisplay::default();
        d.map_window(7).unwrap();
        d.failing.set(true);
        assert!(d.hide_window(7).is_err());
        assert_eq!(d.take(), vec![Call::Map(7), Call::Hide(7)]);
        assert!(d.take().is_empty());
    }

    #[test]
    fn scripted_source_emits_in_order_then_ends() {
        let mut src = ScriptedSource {
            events: vec![
                Event::MapRequest { window: 1 },
                Event::DestroyNotify { window: 1 },
            ]
            .into(),
        };
        assert_eq!(src.next_event().unwrap(), Event::MapRequest { window: 1 });
        assert_eq!(src.next_event().unwrap(), Event::DestroyNotify { window: 1 });
        assert!(src.next_event().is_err());
    }
}
