//! # Core Type Definitions
//!
//! Fundamental types shared by every layer of the Homestead core: stable
//! entity references, the monotonic tick counter used to order events, and
//! the world location payload carried by teleport mechanics.
//!
//! ## Design Principles
//!
//! - **Type Safety**: wrapper types prevent identifier confusion (an
//!   [`EntityRef`] is never a plain UUID or a tick number by accident)
//! - **Host Neutrality**: nothing in here names a concrete host runtime;
//!   an entity reference is a lookup capability, not ownership
//! - **Serialization**: all types serialize with serde so hosts can log,
//!   persist, or ship them across their own boundaries

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque, stable identifier for an entity owned by the host world.
///
/// The host owns entity lifetime; this is a back-reference only. Wrapping
/// the UUID keeps entity references from being confused with other
/// identifiers in the system.
///
/// # Examples
///
/// ```rust
/// use homestead_core::EntityRef;
///
/// let player = EntityRef::new();
/// println!("entity: {player}");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef(pub Uuid);

impl EntityRef {
    /// Creates a new random entity reference using UUID v4.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EntityRef {
    fn default() -> Self {
        Self::new()
    }
}

impl std::str::FromStr for EntityRef {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl std::fmt::Display for EntityRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One discrete server simulation step.
///
/// Ticks are the only clock this core understands: every event carries the
/// tick it was observed at, and delayed effects fire at a target tick. The
/// counter is monotonic and supplied by the host.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Tick(pub u64);

impl Tick {
    /// Returns this tick advanced by `delta` steps, saturating at `u64::MAX`.
    pub fn advance(self, delta: u64) -> Self {
        Self(self.0.saturating_add(delta))
    }

    /// Number of ticks from `self` until `later`, or zero if `later` has
    /// already passed.
    pub fn until(self, later: Tick) -> u64 {
        later.0.saturating_sub(self.0)
    }
}

impl std::fmt::Display for Tick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A position in a host world, the payload of teleport mechanics.
///
/// World identity is the host's world entity reference; coordinates use
/// double precision as large worlds accumulate visible error in f32.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// The world this location belongs to.
    pub world: EntityRef,
    /// X coordinate (east-west axis).
    pub x: f64,
    /// Y coordinate (vertical axis).
    pub y: f64,
    /// Z coordinate (north-south axis).
    pub z: f64,
    /// Horizontal facing in degrees.
    pub yaw: f32,
    /// Vertical facing in degrees.
    pub pitch: f32,
}

impl Location {
    /// Creates a location with neutral facing.
    pub fn new(world: EntityRef, x: f64, y: f64, z: f64) -> Self {
        Self {
            world,
            x,
            y,
            z,
            yaw: 0.0,
            pitch: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_ref_round_trips_through_display_and_from_str() {
        let entity = EntityRef::new();
        let parsed: EntityRef = entity.to_string().parse().expect("valid uuid");
        assert_eq!(entity, parsed);
    }

    #[test]
    fn tick_advance_saturates() {
        assert_eq!(Tick(10).advance(5), Tick(15));
        assert_eq!(Tick(u64::MAX).advance(1), Tick(u64::MAX));
    }

    #[test]
    fn tick_until_is_zero_for_past_ticks() {
        assert_eq!(Tick(10).until(Tick(25)), 15);
        assert_eq!(Tick(25).until(Tick(10)), 0);
    }
}
