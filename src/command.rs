//! Actions and geometry types used throughout splitwm.
//!
//! This module defines the vocabulary that all components share:
//! [`Action`] describes every thing a shortcut can make the window manager
//! do, and [`Axis`] / [`Rect`] / [`Placement`] describe how screen space is
//! divided between windows.
//!
//! Config files may spell axes loosely ("horizontal", "H", "vertical") and
//! spawn commands either as an argv array or as a single command-line string.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// Opaque display-server window identifier.
pub type WindowId = u32;

/// Axis along which a split region divides its rectangle.
///
/// [`Horizontal`](Axis::Horizontal) partitions the width (children side by
/// side); [`Vertical`](Axis::Vertical) partitions the height (children
/// stacked).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub enum Axis {
    #[default]
    Horizontal,
    Vertical,
}

impl Axis {
    /// The other axis.
    pub fn flipped(self) -> Self {
        match self {
            Axis::Horizontal => Axis::Vertical,
            Axis::Vertical => Axis::Horizontal,
        }
    }
}

impl fmt::Display for Axis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "horizontal"),
            Axis::Vertical => write!(f, "vertical"),
        }
    }
}

/// Parse an axis string (case-insensitive; accepts "horizontal", "h", "Vertical", …).
fn parse_axis(s: &str) -> Option<Axis> {
    match s.trim().to_lowercase().as_str() {
        "horizontal" | "h" => Some(Axis::Horizontal),
        "vertical" | "v" => Some(Axis::Vertical),
        _ => None,
    }
}

impl<'de> Deserialize<'de> for Axis {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        parse_axis(&s).ok_or_else(|| DeError::custom(format!("invalid axis: {:?}", s)))
    }
}

/// A screen rectangle in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: u32,
    pub height: u32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Split this rectangle along `axis`, giving `factor` of the extent to
    /// the first half.
    ///
    /// The first extent is `floor(extent * factor)` and the second receives
    /// the remainder, so the two halves always tile `self` exactly.
    pub fn split(&self, axis: Axis, factor: f64) -> (Rect, Rect) {
        let extent = match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        };
        let first = ((extent as f64) * factor).floor().clamp(0.0, extent as f64) as u32;
        let second = extent - first;
        match axis {
            Axis::Horizontal => (
                Rect::new(self.x, self.y, first, self.height),
                Rect::new(self.x + first as i32, self.y, second, self.height),
            ),
            Axis::Vertical => (
                Rect::new(self.x, self.y, self.width, first),
                Rect::new(self.x, self.y + first as i32, self.width, second),
            ),
        }
    }

    /// Area in square pixels.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}+{}+{}", self.width, self.height, self.x, self.y)
    }
}

/// A geometry request produced by a layout pass: put `window` at `rect`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub window: WindowId,
    pub rect: Rect,
}

/// A non-empty argv for an external program.
///
/// Wire format: either `["dmenu_run", "-m", "0"]` or `"dmenu_run -m 0"`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SpawnCommand(Vec<String>);

impl SpawnCommand {
    /// Build a command from an argv. Returns `None` if `argv` is empty.
    pub fn new(argv: impl IntoIterator<Item = impl Into<String>>) -> Option<Self> {
        let argv: Vec<String> = argv.into_iter().map(Into::into).collect();
        if argv.is_empty() {
            None
        } else {
            Some(Self(argv))
        }
    }

    /// The executable name.
    pub fn program(&self) -> &str {
        &self.0[0]
    }

    /// Arguments after the program name.
    pub fn args(&self) -> &[String] {
        &self.0[1..]
    }
}

impl fmt::Display for SpawnCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.join(" "))
    }
}

impl<'de> Deserialize<'de> for SpawnCommand {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        use serde::de::Visitor;
        struct V;
        impl<'de> Visitor<'de> for V {
            type Value = SpawnCommand;
            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "array of strings or a command-line string")
            }
            fn visit_seq<A>(self, mut seq: A) -> Result<SpawnCommand, A::Error>
            where
                A: serde::de::SeqAccess<'de>,
            {
                let mut argv = Vec::new();
                while let Some(arg) = seq.next_element::<String>()? {
                    argv.push(arg);
                }
                SpawnCommand::new(argv).ok_or_else(|| DeError::custom("Spawn: empty command"))
            }
            fn visit_str<E>(self, s: &str) -> Result<SpawnCommand, E>
            where
                E: DeError,
            {
                SpawnCommand::new(s.split_whitespace())
                    .ok_or_else(|| DeError::custom("Spawn: empty command"))
            }
        }
        deserializer.deserialize_any(V)
    }
}

/// Every action a shortcut can trigger.
///
/// Actions are bound to keys by a
/// [`ShortcutTable`](crate::shortcuts::ShortcutTable) and executed by the
/// [`Manager`](crate::manager::Manager).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Action {
    /// Stop the event loop and exit.
    Quit,

    /// Ask the focused window to close itself (`WM_DELETE_WINDOW`).
    CloseFocused,

    /// Start a detached external program.
    Spawn(SpawnCommand),

    /// Flip the split axis of the focused window's parent region.
    ToggleSplit,

    /// Add a delta to the split factor of the focused window's parent region.
    AdjustFactor(f64),

    /// Make workspace `n` (0-indexed) the visible one.
    SwitchWorkspace(usize),
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Quit => write!(f, "quit"),
            Action::CloseFocused => write!(f, "close focused"),
            Action::Spawn(cmd) => write!(f, "spawn `{}`", cmd),
            Action::ToggleSplit => write!(f, "toggle split"),
            Action::AdjustFactor(d) => write!(f, "adjust factor {:+.2}", d),
            Action::SwitchWorkspace(n) => write!(f, "switch to workspace {}", n),
        }
    }
}

//  Tests

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn axis_display_and_flip() {
        assert_eq!(Axis::Horizontal.to_string(), "horizontal");
        assert_eq!(Axis::Vertical.to_string(), "vertical");
        assert_eq!(Axis::Horizontal.flipped(), Axis::Vertical);
        assert_eq!(Axis::Vertical.flipped().flipped(), Axis::Vertical);
    }

    #[test]
    fn axis_parses_loosely() {
        let a: Axis = serde_json::from_str(r#""Vertical""#).unwrap();
        assert_eq!(a, Axis::Vertical);
        let a: Axis = serde_json::from_str(r#"" h ""#).unwrap();
        assert_eq!(a, Axis::Horizontal);
        assert!(serde_json::from_str::<Axis>(r#""diagonal""#).is_err());
    }

    #[test]
    fn split_horizontal_halves() {
        let r = Rect::new(0, 0, 1000, 800);
        let (a, b) = r.split(Axis::Horizontal, 0.5);
        assert_eq!(a, Rect::new(0, 0, 500, 800));
        assert_eq!(b, Rect::new(500, 0, 500, 800));
    }

    #[test]
    fn split_vertical_with_offset_origin() {
        let r = Rect::new(10, 20, 300, 101);
        let (a, b) = r.split(Axis::Vertical, 0.5);
        assert_eq!(a, Rect::new(10, 20, 300, 50));
        assert_eq!(b, Rect::new(10, 70, 300, 51));
    }

    #[test]
    fn split_extents_always_sum_to_parent() {
        let r = Rect::new(0, 0, 997, 613);
        for i in 1..20 {
            let f = i as f64 / 20.0;
            let (a, b) = r.split(Axis::Horizontal, f);
            assert_eq!(a.width + b.width, r.width);
            let (a, b) = r.split(Axis::Vertical, f);
            assert_eq!(a.height + b.height, r.height);
        }
    }

    #[test]
    fn spawn_command_from_string_or_array() {
        let c: SpawnCommand = serde_json::from_str(r#""dmenu_run -m 0""#).unwrap();
        assert_eq!(c.program(), "dmenu_run");
        assert_eq!(c.args(), &["-m".to_string(), "0".to_string()]);

        let c: SpawnCommand = serde_json::from_str(r#"["st", "-e", "htop"]"#).unwrap();
        assert_eq!(c.to_string(), "st -e htop");
    }

    #[test]
    fn spawn_command_rejects_empty() {
        assert!(serde_json::from_str::<SpawnCommand>(r#""   ""#).is_err());
        assert!(serde_json::from_str::<SpawnCommand>("[]").is_err());
        assert!(SpawnCommand::new(Vec::<String>::new()).is_none());
    }

    #[test]
    fn action_wire_format() {
        let a: Action = serde_json::from_str(r#""Quit""#).unwrap();
        assert_eq!(a, Action::Quit);
        let a: Action = serde_json::from_str(r#"{"AdjustFactor": -0.05}"#).unwrap();
        assert_eq!(a, Action::AdjustFactor(-0.05));
        let a: Action = serde_json::from_str(r#"{"SwitchWorkspace": 3}"#).unwrap();
        assert_eq!(a, Action::SwitchWorkspace(3));
        let a: Action = serde_json::from_str(r#"{"Spawn": "st"}"#).unwrap();
        assert_eq!(a, Action::Spawn(SpawnCommand::new(["st"]).unwrap()));
    }

    #[test]
    fn action_display() {
        assert_eq!(Action::SwitchWorkspace(2).to_string(), "switch to workspace 2");
        assert_eq!(Action::AdjustFactor(0.05).to_string(), "adjust factor +0.05");
    }
}
