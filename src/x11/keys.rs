//! [`KeyResolver`] backed by the server's keyboard mapping.

use super::X11Error;
use crate::keys::{Keysym, ModMask, NO_SYMBOL};
use crate::traits::KeyResolver;
use x11rb::connection::Connection;
use x11rb::protocol::xproto::ConnectionExt as _;
use x11rb::rust_connection::RustConnection;

/// Keyboard mapping fetched once at startup.
///
/// Lookups always use the first (unshifted) keysym of a keycode, so a
/// binding on `q` with Shift in its modifiers fires for Shift+q.  Mapping
/// changes after startup are not picked up.
#[derive(Debug, Clone)]
pub struct X11Keys {
    min_keycode: u8,
    per_keycode: usize,
    keysyms: Vec<Keysym>,
}

impl X11Keys {
    pub(super) fn query(conn: &RustConnection) -> Result<Self, X11Error> {
        let setup = conn.setup();
        let (min, max) = (setup.min_keycode, setup.max_keycode);
        let reply = conn.get_keyboard_mapping(min, max - min + 1)?.reply()?;
        Ok(Self::from_mapping(
            min,
            reply.keysyms_per_keycode,
            reply.keysyms,
        ))
    }

    /// Build from a raw `GetKeyboardMapping` reply.
    pub fn from_mapping(min_keycode: u8, per_keycode: u8, keysyms: Vec<Keysym>) -> Self {
        Self {
            min_keycode,
            per_keycode: usize::from(per_keycode.max(1)),
            keysyms,
        }
    }

    /// First keycode whose unshifted symbol is `keysym`.
    pub fn keycode(&self, keysym: Keysym) -> Option<u8> {
        self.keysyms
            .chunks(self.per_keycode)
            .position(|chunk| chunk.first() == Some(&keysym))
            .and_then(|i| u8::try_from(i).ok())
            .and_then(|i| self.min_keycode.checked_add(i))
    }
}

impl KeyResolver for X11Keys {
    fn keysym(&self, keycode: u8, _state: ModMask) -> Keysym {
        keycode
            .checked_sub(self.min_keycode)
            .map(|offset| usize::from(offset) * self.per_keycode)
            .and_then(|index| self.keysyms.get(index).copied())
            .unwrap_or(NO_SYMBOL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keys::{modifier, sym};

    // Two keysyms per keycode, starting at keycode 8.
    fn mapping() -> X11Keys {
        X11Keys::from_mapping(
            8,
            2,
            vec![
                'q' as Keysym, 'Q' as Keysym, // 8
                sym::RETURN, NO_SYMBOL,       // 9
                '1' as Keysym, '!' as Keysym, // 10
            ],
        )
    }

    #[test]
    fn resolves_unshifted_symbol() {
        let k = mapping();
        assert_eq!(k.keysym(8, 0), 'q' as Keysym);
        assert_eq!(k.keysym(8, modifier::SHIFT), 'q' as Keysym);
        assert_eq!(k.keysym(9, modifier::MOD1), sym::RETURN);
        assert_eq!(k.keysym(10, modifier::SHIFT), '1' as Keysym);
    }

    #[test]
    fn out_of_range_keycodes_have_no_symbol() {
        let k = mapping();
        assert_eq!(k.keysym(7, 0), NO_SYMBOL);
        assert_eq!(k.keysym(11, 0), NO_SYMBOL);
    }

    #[test]
    fn finds_keycode_for_symbol() {
        let k = mapping();
        assert_eq!(k.keycode('q' as Keysym), Some(8));
        assert_eq!(k.keycode(sym::RETURN), Some(9));
        assert_eq!(k.keycode('Q' as Keysym), None);
        assert_eq!(k.keycode('z' as Keysym), None);
    }
}
