//! Keyboard shortcut table.
//!
//! A [`ShortcutTable`] is built once from configuration and never changes.
//! On every key press the manager asks it for all bindings that match; each
//! one fires, in table order.  Overlapping bindings therefore trigger more
//! than one action for a single key press.

use crate::command::{Action, SpawnCommand};
use crate::keys::{
    is_shifted_symbol, modifier, parse_keysym, parse_modifier, sym, Keysym, ModMask,
};
use serde::Deserialize;

/// One key binding: when `keysym` is pressed with at least `modifiers`
/// held, run `action`.
///
/// # Wire format
///
/// ```json
/// { "modifiers": ["mod1", "shift"], "key": "q", "action": "CloseFocused" }
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "BindingSpec")]
pub struct ShortcutBinding {
    pub modifiers: ModMask,
    pub keysym: Keysym,
    pub action: Action,
}

impl ShortcutBinding {
    pub fn new(modifiers: ModMask, keysym: Keysym, action: Action) -> Self {
        Self {
            modifiers,
            keysym,
            action,
        }
    }

    /// Whether a press of `keysym` with modifier `state` triggers this
    /// binding.  Extra modifiers in `state` (Lock, NumLock, …) are allowed.
    pub fn matches(&self, state: ModMask, keysym: Keysym) -> bool {
        self.keysym == keysym && self.modifiers & !state == 0
    }
}

/// Human-readable binding as written in the config file.
#[derive(Debug, Deserialize)]
struct BindingSpec {
    #[serde(default)]
    modifiers: Vec<String>,
    key: String,
    action: Action,
}

impl TryFrom<BindingSpec> for ShortcutBinding {
    type Error = String;

    fn try_from(raw: BindingSpec) -> Result<Self, Self::Error> {
        let keysym =
            parse_keysym(&raw.key).ok_or_else(|| format!("unknown key name: {:?}", raw.key))?;
        if is_shifted_symbol(keysym) {
            return Err(format!(
                "key {:?} needs shift; bind its unshifted key with the \"shift\" modifier",
                raw.key
            ));
        }
        let mut modifiers = 0;
        for name in &raw.modifiers {
            modifiers |=
                parse_modifier(name).ok_or_else(|| format!("unknown modifier: {:?}", name))?;
        }
        Ok(Self::new(modifiers, keysym, raw.action))
    }
}

/// Immutable, ordered list of [`ShortcutBinding`]s.
#[derive(Debug, Clone, PartialEq)]
pub struct ShortcutTable {
    bindings: Vec<ShortcutBinding>,
}

impl ShortcutTable {
    pub fn new(bindings: Vec<ShortcutBinding>) -> Self {
        Self { bindings }
    }

    pub fn bindings(&self) -> &[ShortcutBinding] {
        &self.bindings
    }

    pub fn len(&self) -> usize {
        self.bindings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bindings.is_empty()
    }

    /// Every binding triggered by `keysym` under modifier `state`, in
    /// table order.
    pub fn matching(&self, state: ModMask, keysym: Keysym) -> impl Iterator<Item = &ShortcutBinding> {
        self.bindings
            .iter()
            .filter(move |b| b.matches(state, keysym))
    }
}

impl Default for ShortcutTable {
    /// Alt-based bindings: quit, close, terminal, launcher, split control,
    /// and workspaces 1 through 9.
    fn default() -> Self {
        let spawn = |argv: &[&str]| {
            SpawnCommand::new(argv.iter().copied()).map(Action::Spawn)
        };
        let mut bindings = vec![ShortcutBinding::new(modifier::MOD1, 'c' as Keysym, Action::Quit)];
        bindings.push(ShortcutBinding::new(
            modifier::MOD1 | modifier::SHIFT,
            'q' as Keysym,
            Action::CloseFocused,
        ));
        if let Some(action) = spawn(&["st"]) {
            bindings.push(ShortcutBinding::new(modifier::MOD1, sym::RETURN, action));
        }
        if let Some(action) = spawn(&["dmenu_run", "-m", "0"]) {
            bindings.push(ShortcutBinding::new(modifier::MOD1, 'd' as Keysym, action));
        }
        bindings.push(ShortcutBinding::new(modifier::MOD1, 's' as Keysym, Action::ToggleSplit));
        bindings.push(ShortcutBinding::new(
            modifier::MOD1,
            'h' as Keysym,
            Action::AdjustFactor(-0.05),
        ));
        bindings.push(ShortcutBinding::new(
            modifier::MOD1,
            'l' as Keysym,
            Action::AdjustFactor(0.05),
        ));
        for n in 0..9u32 {
            bindings.push(ShortcutBinding::new(
                modifier::MOD1,
                '1' as Keysym + n,
                Action::SwitchWorkspace(n as usize),
            ));
        }
        Self::new(bindings)
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    const Q: Keysym = 'q' as Keysym;

    #[test]
    fn modifiers_must_be_a_subset_of_state() {
        let b = ShortcutBinding::new(modifier::MOD1, Q, Action::Quit);
        assert!(b.matches(modifier::MOD1, Q));
        assert!(b.matches(modifier::MOD1 | modifier::LOCK | modifier::MOD2, Q));
        assert!(!b.matches(modifier::CONTROL, Q));
        assert!(!b.matches(0, Q));
        assert!(!b.matches(modifier::MOD1, 'w' as Keysym));
    }

    #[test]
    fn binding_without_modifiers_matches_any_state() {
        let b = ShortcutBinding::new(0, sym::F1, Action::ToggleSplit);
        assert!(b.matches(0, sym::F1));
        assert!(b.matches(modifier::SHIFT | modifier::MOD4, sym::F1));
    }

    #[test]
    fn all_overlapping_bindings_fire_in_order() {
        let table = ShortcutTable::new(vec![
            ShortcutBinding::new(modifier::MOD1, Q, Action::ToggleSplit),
            ShortcutBinding::new(modifier::MOD1 | modifier::SHIFT, Q, Action::CloseFocused),
            ShortcutBinding::new(modifier::MOD4, Q, Action::Quit),
        ]);
        let fired: Vec<&Action> = table
            .matching(modifier::MOD1 | modifier::SHIFT, Q)
            .map(|b| &b.action)
            .collect();
        assert_eq!(fired, vec![&Action::ToggleSplit, &Action::CloseFocused]);

        let fired: Vec<&Action> = table.matching(modifier::MOD1, Q).map(|b| &b.action).collect();
        assert_eq!(fired, vec![&Action::ToggleSplit]);
    }

    #[test]
    fn default_table_contents() {
        let table = ShortcutTable::default();
        assert_eq!(table.len(), 16);

        let quit: Vec<_> = table.matching(modifier::MOD1, 'c' as Keysym).collect();
        assert_eq!(quit.len(), 1);
        assert_eq!(quit[0].action, Action::Quit);

        let term: Vec<_> = table.matching(modifier::MOD1, sym::RETURN).collect();
        assert_eq!(
            term[0].action,
            Action::Spawn(SpawnCommand::new(["st"]).unwrap())
        );

        let ws9: Vec<_> = table.matching(modifier::MOD1, '9' as Keysym).collect();
        assert_eq!(ws9[0].action, Action::SwitchWorkspace(8));

        // Close needs shift; plain Alt+q does nothing.
        assert_eq!(table.matching(modifier::MOD1, Q).count(), 0);
        assert_eq!(
            table.matching(modifier::MOD1 | modifier::SHIFT, Q).count(),
            1
        );
    }

    #[test]
    fn deserialize_binding() {
        let json = r#"{ "modifiers": ["Mod1", "shift"], "key": "Return", "action": {"Spawn": "st -e htop"} }"#;
        let b: ShortcutBinding = serde_json::from_str(json).unwrap();
        assert_eq!(b.modifiers, modifier::MOD1 | modifier::SHIFT);
        assert_eq!(b.keysym, sym::RETURN);
        assert_eq!(
            b.action,
            Action::Spawn(SpawnCommand::new(["st", "-e", "htop"]).unwrap())
        );
    }

    #[test]
    fn deserialize_binding_without_modifiers() {
        let json = r#"{ "key": "F1", "action": "ToggleSplit" }"#;
        let b: ShortcutBinding = serde_json::from_str(json).unwrap();
        assert_eq!(b.modifiers, 0);
        assert_eq!(b.keysym, sym::F1);
    }

    #[test]
    fn deserialize_rejects_unknown_names() {
        let bad_key = r#"{ "modifiers": ["mod1"], "key": "hyper", "action": "Quit" }"#;
        let err = serde_json::from_str::<ShortcutBinding>(bad_key).unwrap_err();
        assert!(err.to_string().contains("unknown key name"));

        let shifted = r#"{ "modifiers": ["mod1", "shift"], "key": "Q", "action": "Quit" }"#;
        let err = serde_json::from_str::<ShortcutBinding>(shifted).unwrap_err();
        assert!(err.to_string().contains("needs shift"));

        let shifted = r#"{ "modifiers": ["mod1"], "key": "+", "action": "Quit" }"#;
        assert!(serde_json::from_str::<ShortcutBinding>(shifted).is_err());

        let bad_mod = r#"{ "modifiers": ["meta"], "key": "q", "action": "Quit" }"#;
        let err = serde_json::from_str::<ShortcutBinding>(bad_mod).unwrap_err();
        assert!(err.to_string().contains("unknown modifier"));
    }
}
