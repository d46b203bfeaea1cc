//! # ECHOES Input
//!
//! Input collaborators for the effect engine.
//!
//! Host events (pointer moves, clicks, key presses, scrolls) are pushed into
//! an [`InputHub`]. Once per executed tick the engine asks its
//! [`InputProvider`] for an [`InputSnapshot`] and never touches the raw
//! events itself.
//!
//! ```text
//! host event ──► InputHub ──snapshot(now)──► Effect::tick
//! ```
//!
//! Everything runs on one cooperative thread: events and ticks never
//! interleave, so shared hubs are plain `Rc<RefCell<_>>`.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod idle;
pub mod pointer;
pub mod provider;
pub mod scroll;
pub mod snapshot;

pub use idle::{ActivityKind, IdleDetector};
pub use pointer::PointerTracker;
pub use provider::{InputHub, InputProvider, SharedInput, StaticInput};
pub use scroll::ScrollTracker;
pub use snapshot::{Click, InputSnapshot, PointerMove};
