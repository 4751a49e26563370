//! [`Display`] implementation backed by an X connection.

use super::{Atoms, X11Error};
use crate::command::{Rect, WindowId};
use crate::event::ConfigureRequest;
use crate::traits::Display;
use std::rc::Rc;
use x11rb::protocol::xproto::{
    Atom, ClientMessageEvent, ConfigureWindowAux, ConnectionExt as _, EventMask, StackMode,
    CLIENT_MESSAGE_EVENT,
};
use x11rb::rust_connection::RustConnection;
use x11rb::CURRENT_TIME;

/// Sends window requests over a shared connection.
///
/// Every request is checked before returning, so a failure is reported
/// against the request that caused it.
pub struct X11Display {
    conn: Rc<RustConnection>,
    atoms: Atoms,
}

impl X11Display {
    pub(super) fn new(conn: Rc<RustConnection>, atoms: Atoms) -> Self {
        Self { conn, atoms }
    }

    /// Send a `WM_PROTOCOLS` client message carrying `protocol`.
    fn send_protocol(&self, window: WindowId, protocol: Atom) -> Result<(), X11Error> {
        let event = ClientMessageEvent {
            response_type: CLIENT_MESSAGE_EVENT,
            format: 32,
            sequence: 0,
            window,
            type_: self.atoms.wm_protocols,
            data: [protocol, CURRENT_TIME, 0, 0, 0].into(),
        };
        self.conn
            .send_event(false, window, EventMask::NO_EVENT, event)?
            .check()?;
        Ok(())
    }
}

/// Geometry for a tiled window.  Zero-sized windows are a protocol error,
/// so both dimensions are raised to at least one pixel.
fn placement_aux(rect: Rect) -> ConfigureWindowAux {
    ConfigureWindowAux::new()
        .x(rect.x)
        .y(rect.y)
        .width(rect.width.max(1))
        .height(rect.height.max(1))
}

/// Forward exactly the fields the client asked for.
fn request_aux(request: &ConfigureRequest) -> ConfigureWindowAux {
    let mut aux = ConfigureWindowAux::new();
    aux.x = request.x;
    aux.y = request.y;
    aux.width = request.width.map(|w| w.max(1));
    aux.height = request.height.map(|h| h.max(1));
    aux.border_width = request.border_width;
    aux.sibling = request.sibling;
    aux.stack_mode = request.stack_mode.map(|m| StackMode::from(m as u8));
    aux
}

impl Display for X11Display {
    type Error = X11Error;

    fn place_window(&self, window: WindowId, rect: Rect) -> Result<(), X11Error> {
        self.conn
            .configure_window(window, &placement_aux(rect))?
            .check()?;
        Ok(())
    }

    fn show_window(&self, window: WindowId) -> Result<(), X11Error> {
        self.conn.map_window(window)?.check()?;
        Ok(())
    }

    fn hide_window(&self, window: WindowId) -> Result<(), X11Error> {
        self.conn.unmap_window(window)?.check()?;
        Ok(())
    }

    fn map_window(&self, window: WindowId) -> Result<(), X11Error> {
        self.conn.map_window(window)?.check()?;
        Ok(())
    }

    fn configure_window(&self, request: &ConfigureRequest) -> Result<(), X11Error> {
        self.conn
            .configure_window(request.window, &request_aux(request))?
            .check()?;
        Ok(())
    }

    fn send_close(&self, window: WindowId) -> Result<(), X11Error> {
        self.send_protocol(window, self.atoms.wm_delete_window)
    }

    fn send_take_focus(&self, window: WindowId) -> Result<(), X11Error> {
        self.send_protocol(window, self.atoms.wm_take_focus)
    }
}
