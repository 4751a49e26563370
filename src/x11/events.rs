//! [`EventSource`] reading from an X connection.

use super::X11Error;
use crate::command::Rect;
use crate::event::{ConfigureRequest, Event, NotifyKind};
use crate::traits::EventSource;
use log::{debug, warn};
use std::rc::Rc;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::{
    ChangeWindowAttributesAux, ConfigWindow, ConfigureRequestEvent, ConnectionExt as _, EventMask,
    Window,
};
use x11rb::protocol::Event as XEvent;
use x11rb::rust_connection::RustConnection;

/// Blocking event stream over a shared connection.
pub struct X11Events {
    conn: Rc<RustConnection>,
    root: Window,
}

impl X11Events {
    pub(super) fn new(conn: Rc<RustConnection>, root: Window) -> Self {
        Self { conn, root }
    }

    /// Ask for focus-change events on a fresh window so the manager learns
    /// which window has focus.
    fn watch_focus(&self, window: u32) {
        let aux = ChangeWindowAttributesAux::new().event_mask(EventMask::FOCUS_CHANGE);
        let result = self
            .conn
            .change_window_attributes(window, &aux)
            .map_err(X11Error::from)
            .and_then(|cookie| cookie.check().map_err(X11Error::from));
        if let Err(e) = result {
            // The window may already be gone again.
            warn!("failed to watch focus of {:#x}: {}", window, e);
        }
    }
}

fn configure_request(e: &ConfigureRequestEvent) -> ConfigureRequest {
    let has = |flag: ConfigWindow| e.value_mask.contains(flag);
    ConfigureRequest {
        window: e.window,
        x: has(ConfigWindow::X).then_some(i32::from(e.x)),
        y: has(ConfigWindow::Y).then_some(i32::from(e.y)),
        width: has(ConfigWindow::WIDTH).then_some(u32::from(e.width)),
        height: has(ConfigWindow::HEIGHT).then_some(u32::from(e.height)),
        border_width: has(ConfigWindow::BORDER_WIDTH).then_some(u32::from(e.border_width)),
        sibling: has(ConfigWindow::SIBLING).then_some(e.sibling),
        stack_mode: has(ConfigWindow::STACK_MODE).then_some(u32::from(e.stack_mode)),
    }
}

/// Translate a protocol event into the manager's vocabulary.  `root` is
/// the managed screen's root window.
fn convert(event: XEvent, root: Window) -> Event {
    match event {
        XEvent::CreateNotify(e) => Event::CreateNotify {
            window: e.window,
            parent: e.parent,
            override_redirect: e.override_redirect,
        },
        XEvent::DestroyNotify(e) => Event::DestroyNotify { window: e.window },
        XEvent::MapRequest(e) => Event::MapRequest { window: e.window },
        XEvent::ConfigureRequest(e) => Event::ConfigureRequest(configure_request(&e)),
        XEvent::KeyPress(e) => Event::KeyPress {
            keycode: e.detail,
            state: u16::from(e.state),
        },
        XEvent::FocusIn(e) => Event::FocusIn { window: e.event },
        XEvent::MapNotify(_) => Event::Other(NotifyKind::Map),
        XEvent::UnmapNotify(_) => Event::Other(NotifyKind::Unmap),
        XEvent::ReparentNotify(_) => Event::Other(NotifyKind::Reparent),
        XEvent::ConfigureNotify(e) if e.window == root => Event::ScreenChange {
            screen: Rect::new(
                i32::from(e.x),
                i32::from(e.y),
                u32::from(e.width),
                u32::from(e.height),
            ),
        },
        XEvent::ConfigureNotify(_) => Event::Other(NotifyKind::Configure),
        XEvent::GravityNotify(_) => Event::Other(NotifyKind::Gravity),
        XEvent::CirculateRequest(_) => Event::Other(NotifyKind::CirculateRequest),
        XEvent::KeyRelease(_) => Event::Other(NotifyKind::KeyRelease),
        XEvent::Error(e) => {
            warn!("X error: {:?}", e);
            Event::Other(NotifyKind::Unknown)
        }
        other => {
            debug!("unhandled X event: {:?}", other);
            Event::Other(NotifyKind::Unknown)
        }
    }
}

impl EventSource for X11Events {
    type Error = X11Error;

    fn next_event(&mut self) -> Result<Event, X11Error> {
        let event = self.conn.wait_for_event()?;
        let event = convert(event, self.root);
        if let Event::CreateNotify {
            window,
            override_redirect: false,
            ..
        } = event
        {
            self.watch_focus(window);
        }
        Ok(event)
    }
}
