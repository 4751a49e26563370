//! Key symbols and modifier masks.
//!
//! Values follow the X11 core protocol so the X11 backend can pass them
//! through untouched: Latin-1 keysyms equal their character code, function
//! keys live in the `0xff00` block, and modifiers are the eight core mask
//! bits.

/// A symbolic key, independent of keyboard layout.
pub type Keysym = u32;

/// A modifier bitmask.
pub type ModMask = u16;

/// The keysym meaning "no symbol bound to this key".
pub const NO_SYMBOL: Keysym = 0;

/// Core modifier bits.
pub mod modifier {
    use super::ModMask;

    pub const SHIFT: ModMask = 1 << 0;
    pub const LOCK: ModMask = 1 << 1;
    pub const CONTROL: ModMask = 1 << 2;
    pub const MOD1: ModMask = 1 << 3;
    pub const MOD2: ModMask = 1 << 4;
    pub const MOD3: ModMask = 1 << 5;
    pub const MOD4: ModMask = 1 << 6;
    pub const MOD5: ModMask = 1 << 7;
}

/// Named non-printing keys.
pub mod sym {
    use super::Keysym;

    pub const BACKSPACE: Keysym = 0xff08;
    pub const TAB: Keysym = 0xff09;
    pub const RETURN: Keysym = 0xff0d;
    pub const ESCAPE: Keysym = 0xff1b;
    pub const HOME: Keysym = 0xff50;
    pub const LEFT: Keysym = 0xff51;
    pub const UP: Keysym = 0xff52;
    pub const RIGHT: Keysym = 0xff53;
    pub const DOWN: Keysym = 0xff54;
    pub const PAGE_UP: Keysym = 0xff55;
    pub const PAGE_DOWN: Keysym = 0xff56;
    pub const END: Keysym = 0xff57;
    pub const PRINT: Keysym = 0xff61;
    pub const INSERT: Keysym = 0xff63;
    pub const F1: Keysym = 0xffbe;
    pub const DELETE: Keysym = 0xffff;
}

/// Punctuation names as used by X keysym naming.
const PUNCTUATION: &[(&str, char)] = &[
    ("space", ' '),
    ("minus", '-'),
    ("equal", '='),
    ("plus", '+'),
    ("comma", ','),
    ("period", '.'),
    ("slash", '/'),
    ("backslash", '\\'),
    ("semicolon", ';'),
    ("apostrophe", '\''),
    ("grave", '`'),
    ("bracketleft", '['),
    ("bracketright", ']'),
];

/// Resolve a key name to its keysym.
///
/// Accepts single printable ASCII characters (`"q"`, `"1"`), X-style
/// punctuation names (`"minus"`, `"bracketleft"`), and named keys
/// (`"Return"`, `"Escape"`, `"F5"`, …).  Named keys are matched
/// case-insensitively; single characters are case-sensitive, as in X.
pub fn parse_keysym(name: &str) -> Option<Keysym> {
    let name = name.trim();
    let mut chars = name.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        return (c.is_ascii_graphic()).then_some(c as Keysym);
    }

    let lower = name.to_ascii_lowercase();
    if let Some(&(_, c)) = PUNCTUATION.iter().find(|(n, _)| *n == lower) {
        return Some(c as Keysym);
    }
    if let Some(n) = lower.strip_prefix('f').and_then(|n| n.parse::<u32>().ok()) {
        return (1..=12).contains(&n).then(|| sym::F1 + n - 1);
    }
    let keysym = match lower.as_str() {
        "return" | "enter" => sym::RETURN,
        "tab" => sym::TAB,
        "escape" | "esc" => sym::ESCAPE,
        "backspace" => sym::BACKSPACE,
        "delete" => sym::DELETE,
        "insert" => sym::INSERT,
        "home" => sym::HOME,
        "end" => sym::END,
        "prior" | "pageup" => sym::PAGE_UP,
        "next" | "pagedown" => sym::PAGE_DOWN,
        "left" => sym::LEFT,
        "right" => sym::RIGHT,
        "up" => sym::UP,
        "down" => sym::DOWN,
        "print" => sym::PRINT,
        _ => return None,
    };
    Some(keysym)
}

/// Whether `keysym` is only reachable with Shift held on a US layout
/// (`Q`, `+`, `!`, ...).  Keys resolve to their unshifted symbol, so a
/// binding on one of these never fires.
pub fn is_shifted_symbol(keysym: Keysym) -> bool {
    char::from_u32(keysym)
        .is_some_and(|c| c.is_ascii_uppercase() || "~!@#$%^&*()_+{}|:\"<>?".contains(c))
}

/// Resolve a modifier name (case-insensitive) to its mask bit.
pub fn parse_modifier(name: &str) -> Option<ModMask> {
    let mask = match name.trim().to_ascii_lowercase().as_str() {
        "shift" => modifier::SHIFT,
        "lock" | "capslock" => modifier::LOCK,
        "control" | "ctrl" => modifier::CONTROL,
        "mod1" | "alt" => modifier::MOD1,
        "mod2" | "numlock" => modifier::MOD2,
        "mod3" => modifier::MOD3,
        "mod4" | "super" | "logo" => modifier::MOD4,
        "mod5" => modifier::MOD5,
        _ => return None,
    };
    Some(mask)
}
