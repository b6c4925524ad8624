//! # Homestead Core
//!
//! Host-agnostic vocabulary for a tick-driven game-mechanics plugin core:
//! stable entity references, internal events, effect descriptions, and the
//! plugin-owned state store.
//!
//! ## Architecture Overview
//!
//! The full control flow (wired up by `homestead_host`) is:
//!
//! ```text
//! host callback -> event adapter -> rule engine -> effect dispatcher -> host
//!                                      |  ^
//!                                      v  |
//!                                  state store
//! ```
//!
//! This crate defines the values that cross each arrow:
//!
//! - [`GameEvent`] — produced once by the adapter, consumed once by the
//!   engine; ordered by a monotonic [`Tick`] and a per-kind priority
//! - [`Effect`] — produced by the engine, consumed exactly once by the
//!   dispatcher; all host mutation is mediated through effects
//! - [`StateRecord`] / [`StateDelta`] / [`StateStore`] — plugin-owned state,
//!   independent of the host's object graph so decision logic stays testable
//!   without a live server
//!
//! ## Per-Entity State Machine
//!
//! `Unknown -> Active -> Active (updated) -> Removed`. `Unknown` is implicit
//! (no record). The first event referencing an entity makes it `Active`;
//! only an explicit host removal signal makes it `Removed`, and `Removed` is
//! terminal — the store tombstones the reference so no later event can
//! resurrect it.

pub mod effects;
pub mod events;
pub mod state;
pub mod types;

pub use effects::{Effect, EntityMutation};
pub use events::{EventPriority, GameEvent, InteractionKind, PlayerAction};
pub use state::{
    DeltaEntry, StateDelta, StateError, StateRecord, StateStore, StateView, FLAG_OPERATOR,
};
pub use types::{EntityRef, Location, Tick};
