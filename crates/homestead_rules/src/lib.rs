//! # Homestead Rules
//!
//! The pure decision half of the Homestead plugin core. Given one internal
//! event and a read-only state view, [`RuleEngine::decide`] returns the
//! [`Decision`] to apply: a state delta plus the ordered effects to hand to
//! the host. Nothing in this crate touches a host runtime, a clock, or any
//! mutable shared state, which is exactly what keeps the game mechanics
//! unit-testable.
//!
//! ## Mechanics
//!
//! The shipped rules implement a homes system: per-player named home
//! locations with a configurable count limit, teleports guarded by a
//! tick-based cooldown (expiry is a scheduled follow-up event, cancellable
//! by key), operator-managed world-wide global homes, runtime tuning of the
//! home limit and cooldown, and localized player messages with an English
//! fallback catalog.

pub mod engine;
pub mod homes;
pub mod messages;

pub use engine::{Decision, RuleEngine, RuleError, RuleSettings};
pub use homes::{COOLDOWN_TAG, MAX_COOLDOWN_TICKS};
pub use messages::{MessageCatalog, FALLBACK_LOCALE};
