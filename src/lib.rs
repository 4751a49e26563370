//! **splitwm**: a minimal binary space-partition tiling window manager.
//!
//! Every workspace owns a tree of screen regions.  A new window splits the
//! region of the window it was created from (or the root region) in two;
//! a destroyed window's sibling takes over the freed space.  Only the
//! active workspace's windows are visible.
//!
//! # Architecture
//!
//! The crate is organised around four core traits in [`traits`]:
//!
//! * [`traits::Display`]: abstracts the requests sent to the display
//!   server so the tiling logic is not coupled to X11.
//! * [`traits::KeyResolver`]: turns keycodes into keysyms.
//! * [`traits::Spawner`]: starts the programs bound to shortcuts.
//! * [`traits::EventSource`]: delivers display-server events one at a
//!   time.
//!
//! The region model lives in [`arena`] and [`tree`], the per-desktop
//! multiplexer in [`workspace`], and the event state machine in
//! [`manager`].  Concrete implementations live in [`x11`] (an `x11rb`
//! connection) and [`spawn`] (`std::process`).

pub mod arena;
pub mod command;
pub mod config;
pub mod event;
pub mod keys;
pub mod manager;
pub mod shortcuts;
pub mod spawn;
pub mod traits;
pub mod tree;
pub mod workspace;
pub mod x11;
