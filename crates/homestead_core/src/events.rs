//! # Internal Events
//!
//! The host-agnostic event vocabulary consumed by the rule engine. The event
//! adapter produces each [`GameEvent`] exactly once from a raw host callback;
//! the rule engine consumes it exactly once. Events are immutable values.
//!
//! ## Ordering
//!
//! Every event carries the monotonic [`Tick`] it was observed at. When two
//! events become due at the same tick (two cooldowns expiring together), the
//! scheduler orders them by the per-kind [`EventPriority`] declared here,
//! stable by insertion otherwise.

use crate::types::{EntityRef, Location, Tick};
use serde::{Deserialize, Serialize};

// ============================================================================
// Event Variants
// ============================================================================

/// A host-agnostic event, produced by the event adapter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A player issued an action (command) against the world.
    PlayerAction {
        tick: Tick,
        player: EntityRef,
        world: EntityRef,
        action: PlayerAction,
    },
    /// The world advanced one simulation step.
    WorldTick { tick: Tick, world: EntityRef },
    /// An entity interacted with another entity (or itself, for scheduled
    /// follow-ups such as cooldown expiry).
    EntityInteraction {
        tick: Tick,
        entity: EntityRef,
        target: EntityRef,
        kind: InteractionKind,
    },
    /// The host signalled that an entity is permanently gone.
    EntityRemoved { tick: Tick, entity: EntityRef },
}

impl GameEvent {
    /// The tick this event was observed (or scheduled to fire) at.
    pub fn tick(&self) -> Tick {
        match self {
            GameEvent::PlayerAction { tick, .. }
            | GameEvent::WorldTick { tick, .. }
            | GameEvent::EntityInteraction { tick, .. }
            | GameEvent::EntityRemoved { tick, .. } => *tick,
        }
    }

    /// The entity whose state record this event is primarily about.
    ///
    /// `WorldTick` is about the world itself.
    pub fn primary_entity(&self) -> EntityRef {
        match self {
            GameEvent::PlayerAction { player, .. } => *player,
            GameEvent::WorldTick { world, .. } => *world,
            GameEvent::EntityInteraction { entity, .. } => *entity,
            GameEvent::EntityRemoved { entity, .. } => *entity,
        }
    }

    /// Declared priority of this event kind, used to order same-tick fires.
    pub fn priority(&self) -> EventPriority {
        match self {
            GameEvent::EntityRemoved { .. } => EventPriority::Removal,
            GameEvent::PlayerAction { .. } => EventPriority::Action,
            GameEvent::EntityInteraction { .. } => EventPriority::Interaction,
            GameEvent::WorldTick { .. } => EventPriority::Tick,
        }
    }
}

/// Per-kind event priority; lower values apply first at an equal tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EventPriority {
    /// Removal signals outrank everything: no later event at the same tick
    /// may observe the entity as live.
    Removal = 0,
    /// Direct player actions.
    Action = 1,
    /// Entity interactions, including scheduled follow-ups.
    Interaction = 2,
    /// World ticks apply last.
    Tick = 3,
}

// ============================================================================
// Action Payloads
// ============================================================================

/// The action a player performed, parsed by the event adapter from host
/// command callbacks.
///
/// Home names are normalized to lowercase by the adapter. Global-home
/// mutations require the operator flag on the acting player's record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PlayerAction {
    /// A generic interaction; increments the record counter and reports it.
    Interact,
    /// Save the player's current location under `name`.
    SetHome { name: String, location: Location },
    /// Teleport to the named home, subject to the teleport cooldown.
    TeleportHome { name: String },
    /// Delete the named home.
    DeleteHome { name: String },
    /// List the player's homes.
    ListHomes,
    /// Save a world-wide home under `name` (operator only).
    SetGlobalHome { name: String, location: Location },
    /// Teleport to a world-wide home.
    TeleportGlobalHome { name: String },
    /// Delete a world-wide home (operator only).
    DeleteGlobalHome { name: String },
    /// List the world-wide homes.
    ListGlobalHomes,
    /// Override the configured home limit for this world (operator only).
    SetHomeLimit { value: i64 },
    /// Override the configured teleport cooldown for this world, in ticks
    /// (operator only).
    SetCooldown { value: i64 },
    /// A recognized command with a malformed argument list; the engine
    /// answers with the command's usage message.
    Usage { command: String },
    /// A recognized command whose numeric argument did not parse.
    InvalidNumber { command: String },
}

/// What kind of entity interaction occurred.
///
/// Marked non-exhaustive: new kinds may be added without breaking hosts, and
/// the rule engine surfaces an unknown kind as an invariant violation rather
/// than silently ignoring it.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum InteractionKind {
    /// Physical contact between two entities.
    Touch,
    /// A previously scheduled teleport cooldown ran out.
    CooldownExpired,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EntityRef, Tick};

    #[test]
    fn priority_orders_removal_before_actions_before_ticks() {
        let entity = EntityRef::new();
        let world = EntityRef::new();
        let removed = GameEvent::EntityRemoved {
            tick: Tick(5),
            entity,
        };
        let action = GameEvent::PlayerAction {
            tick: Tick(5),
            player: entity,
            world,
            action: PlayerAction::Interact,
        };
        let tick = GameEvent::WorldTick {
            tick: Tick(5),
            world,
        };
        assert!(removed.priority() < action.priority());
        assert!(action.priority() < tick.priority());
    }

    #[test]
    fn events_round_trip_through_serde() {
        let event = GameEvent::EntityInteraction {
            tick: Tick(42),
            entity: EntityRef::new(),
            target: EntityRef::new(),
            kind: InteractionKind::CooldownExpired,
        };
        let json = serde_json::to_string(&event).expect("serialize");
        let back: GameEvent = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(event, back);
    }

    #[test]
    fn primary_entity_matches_variant() {
        let entity = EntityRef::new();
        let event = GameEvent::EntityRemoved {
            tick: Tick(1),
            entity,
        };
        assert_eq!(event.primary_entity(), entity);
        assert_eq!(event.tick(), Tick(1));
    }
}
