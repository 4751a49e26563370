//! X11 implementations.
//!
//! This module provides concrete backends for the
//! [`Display`](crate::traits::Display),
//! [`KeyResolver`](crate::traits::KeyResolver), and
//! [`EventSource`](crate::traits::EventSource) traits, powered by `x11rb`.
//!
//! Nothing outside this module should reference X11 directly.

pub mod display;
pub mod events;
pub mod keys;

use crate::command::Rect;
use crate::keys::{modifier, ModMask};
use crate::shortcuts::ShortcutTable;
use log::{debug, info, warn};
use std::rc::Rc;
use x11rb::connection::Connection;
use x11rb::errors::{ConnectError, ConnectionError, ReplyError, ReplyOrIdError};
use x11rb::protocol::xproto::{
    self, Atom, ChangeWindowAttributesAux, ConnectionExt as _, EventMask, GrabMode, Window,
};
use x11rb::rust_connection::RustConnection;

pub use display::X11Display;
pub use events::X11Events;
pub use keys::X11Keys;

/// Glyph of the standard left-pointer arrow in the `cursor` font.
const CURSOR_GLYPH: u16 = 68;

/// Errors that can occur when talking to the X server.
#[derive(Debug, thiserror::Error)]
pub enum X11Error {
    #[error("failed to connect to X server: {0}")]
    Connect(#[from] ConnectError),

    #[error("X connection error: {0}")]
    Connection(#[from] ConnectionError),

    #[error("X request failed: {0}")]
    Reply(#[from] ReplyError),

    #[error("X request failed: {0}")]
    ReplyOrId(#[from] ReplyOrIdError),

    #[error("X server has no screen {0}")]
    NoScreen(usize),

    #[error("another window manager is already running: {0}")]
    AnotherWm(#[source] ReplyError),

    #[error("cannot grab keycode {keycode} with modifiers {modifiers:#x}: {source}")]
    GrabKey {
        keycode: u8,
        modifiers: ModMask,
        #[source]
        source: ReplyError,
    },
}

/// Atoms used by the client-message protocols.
#[derive(Debug, Clone, Copy)]
pub struct Atoms {
    pub wm_protocols: Atom,
    pub wm_delete_window: Atom,
    pub wm_take_focus: Atom,
}

impl Atoms {
    fn intern(conn: &RustConnection) -> Result<Self, X11Error> {
        let intern = |name: &[u8]| -> Result<Atom, X11Error> {
            Ok(conn.intern_atom(false, name)?.reply()?.atom)
        };
        Ok(Self {
            wm_protocols: intern(b"WM_PROTOCOLS")?,
            wm_delete_window: intern(b"WM_DELETE_WINDOW")?,
            wm_take_focus: intern(b"WM_TAKE_FOCUS")?,
        })
    }
}

/// Everything the manager needs from one X connection.
pub struct X11Backend {
    pub display: X11Display,
    pub keys: X11Keys,
    pub events: X11Events,
    /// Full area of the managed screen.
    pub screen: Rect,
}

/// Connect to the X server and take over window management of its first
/// screen.
///
/// Grabs the keys of every binding in `shortcuts`.  Any failure here is
/// fatal to the caller.
pub fn connect(shortcuts: &ShortcutTable) -> Result<X11Backend, X11Error> {
    let (conn, screen_num) = x11rb::connect(None)?;
    let (root, screen) = {
        let s = conn
            .setup()
            .roots
            .get(screen_num)
            .ok_or(X11Error::NoScreen(screen_num))?;
        (
            s.root,
            Rect::new(0, 0, u32::from(s.width_in_pixels), u32::from(s.height_in_pixels)),
        )
    };
    info!("connected to X screen {} ({})", screen_num, screen);

    let atoms = Atoms::intern(&conn)?;
    become_wm(&conn, root)?;

    let keys = X11Keys::query(&conn)?;
    grab_keys(&conn, root, &keys, shortcuts)?;
    set_root_cursor(&conn, root)?;
    conn.flush()?;

    let conn = Rc::new(conn);
    Ok(X11Backend {
        display: X11Display::new(Rc::clone(&conn), atoms),
        keys,
        events: X11Events::new(conn, root),
        screen,
    })
}

/// Request substructure redirection on the root window.  Only one client
/// may hold it, so a failure means another window manager owns the screen.
///
/// Structure events on the root report screen size changes.
fn become_wm(conn: &RustConnection, root: Window) -> Result<(), X11Error> {
    let mask = EventMask::SUBSTRUCTURE_REDIRECT
        | EventMask::SUBSTRUCTURE_NOTIFY
        | EventMask::STRUCTURE_NOTIFY;
    conn.change_window_attributes(root, &ChangeWindowAttributesAux::new().event_mask(mask))?
        .check()
        .map_err(X11Error::AnotherWm)?;
    info!("selected substructure redirect on root {:#x}", root);
    Ok(())
}

/// Every `(keycode, modifiers)` pair to grab for `shortcuts`, with and
/// without Lock and NumLock so those never block a shortcut.
///
/// Bindings whose keysym has no keycode are skipped with a warning.
fn key_grabs(keys: &X11Keys, shortcuts: &ShortcutTable) -> Vec<(u8, ModMask)> {
    let mut grabs = Vec::new();
    for binding in shortcuts.bindings() {
        let Some(keycode) = keys.keycode(binding.keysym) else {
            warn!(
                "no keycode for keysym {:#x}, `{}` is unreachable",
                binding.keysym, binding.action
            );
            continue;
        };
        for extra in [0, modifier::LOCK, modifier::MOD2, modifier::LOCK | modifier::MOD2] {
            let grab = (keycode, binding.modifiers | extra);
            if !grabs.contains(&grab) {
                grabs.push(grab);
            }
        }
    }
    grabs
}

/// Grab every bound key on the root window.  A key already grabbed by
/// another client is an error.
fn grab_keys(
    conn: &RustConnection,
    root: Window,
    keys: &X11Keys,
    shortcuts: &ShortcutTable,
) -> Result<(), X11Error> {
    for (keycode, modifiers) in key_grabs(keys, shortcuts) {
        conn.grab_key(
            false,
            root,
            xproto::ModMask::from(modifiers),
            keycode,
            GrabMode::ASYNC,
            GrabMode::ASYNC,
        )?
        .check()
        .map_err(|source| X11Error::GrabKey {
            keycode,
            modifiers,
            source,
        })?;
        debug!("grabbed keycode {} mods {:#x}", keycode, modifiers);
    }
    info!("grabbed {} shortcut(s)", shortcuts.len());
    Ok(())
}

fn set_root_cursor(conn: &RustConnection, root: Window) -> Result<(), X11Error> {
    let font = conn.generate_id()?;
    conn.open_font(font, b"cursor")?.check()?;
    let cursor = conn.generate_id()?;
    conn.create_glyph_cursor(
        cursor,
        font,
        font,
        CURSOR_GLYPH,
        CURSOR_GLYPH + 1,
        0,
        0,
        0,
        0xFFFF,
        0xFFFF,
        0xFFFF,
    )?
    .check()?;
    conn.change_window_attributes(root, &ChangeWindowAttributesAux::new().cursor(cursor))?
        .check()?;
    // The root keeps its own reference to the cursor.
    conn.free_cursor(cursor)?.check()?;
    conn.close_font(font)?.check()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Action;
    use crate::keys::{sym, Keysym, NO_SYMBOL};
    use crate::shortcuts::ShortcutBinding;

    fn keys() -> X11Keys {
        X11Keys::from_mapping(
            8,
            1,
            vec!['q' as Keysym, sym::RETURN, NO_SYMBOL],
        )
    }

    #[test]
    fn each_binding_is_grabbed_with_lock_variants() {
        let table = ShortcutTable::new(vec![ShortcutBinding::new(
            modifier::MOD1,
            'q' as Keysym,
            Action::Quit,
        )]);
        let m = modifier::MOD1;
        assert_eq!(
            key_grabs(&keys(), &table),
            vec![
                (8, m),
                (8, m | modifier::LOCK),
                (8, m | modifier::MOD2),
                (8, m | modifier::LOCK | modifier::MOD2),
            ]
        );
    }

    #[test]
    fn overlapping_bindings_are_grabbed_once() {
        let table = ShortcutTable::new(vec![
            ShortcutBinding::new(modifier::MOD1, sym::RETURN, Action::Quit),
            ShortcutBinding::new(modifier::MOD1, sym::RETURN, Action::ToggleSplit),
        ]);
        assert_eq!(key_grabs(&keys(), &table).len(), 4);
    }

    #[test]
    fn unmapped_keysyms_are_skipped() {
        let table = ShortcutTable::new(vec![ShortcutBinding::new(
            modifier::MOD1,
            'z' as Keysym,
            Action::Quit,
        )]);
        assert!(key_grabs(&keys(), &table).is_empty());
    }
}
