//! # Effects
//!
//! Descriptions of desired host-side side effects. The rule engine never
//! touches the host world directly: it emits [`Effect`] values, and the
//! effect dispatcher applies each one exactly once against the host API.
//!
//! Delayed work is expressed as [`Effect::ScheduleDelayedEvent`] handed to
//! the host's own scheduler rather than performed in-line, so nothing in the
//! decision path ever blocks the tick thread.

use crate::events::GameEvent;
use crate::types::{EntityRef, Location, Tick};
use serde::{Deserialize, Serialize};

/// A desired host-side side effect, consumed exactly once by the dispatcher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Effect {
    /// Deliver a chat message to an entity.
    SendMessage { entity: EntityRef, message: String },
    /// Mutate a host entity.
    MutateEntity {
        entity: EntityRef,
        mutation: EntityMutation,
    },
    /// Ask the host scheduler to feed `event` back at `fire_at`. The
    /// (entity, tag) pair is the cancellation key; scheduling again under
    /// the same key replaces the pending entry.
    ScheduleDelayedEvent {
        entity: EntityRef,
        tag: String,
        fire_at: Tick,
        event: Box<GameEvent>,
    },
    /// Cancel a pending delayed event by key. Cancelling a key with nothing
    /// pending is a no-op.
    CancelDelayed { entity: EntityRef, tag: String },
}

impl Effect {
    /// Short kind label for logs and dispatch errors.
    pub fn kind(&self) -> &'static str {
        match self {
            Effect::SendMessage { .. } => "send_message",
            Effect::MutateEntity { .. } => "mutate_entity",
            Effect::ScheduleDelayedEvent { .. } => "schedule_delayed_event",
            Effect::CancelDelayed { .. } => "cancel_delayed",
        }
    }

    /// The entity this effect targets.
    pub fn entity(&self) -> EntityRef {
        match self {
            Effect::SendMessage { entity, .. }
            | Effect::MutateEntity { entity, .. }
            | Effect::ScheduleDelayedEvent { entity, .. }
            | Effect::CancelDelayed { entity, .. } => *entity,
        }
    }
}

/// A concrete mutation of a host entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EntityMutation {
    /// Move the entity to a location.
    Teleport(Location),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::{GameEvent, InteractionKind};

    #[test]
    fn kind_labels_are_stable() {
        let entity = EntityRef::new();
        let effect = Effect::CancelDelayed {
            entity,
            tag: "cooldown".to_string(),
        };
        assert_eq!(effect.kind(), "cancel_delayed");
        assert_eq!(effect.entity(), entity);
    }

    #[test]
    fn scheduled_effects_round_trip_through_serde() {
        let entity = EntityRef::new();
        let effect = Effect::ScheduleDelayedEvent {
            entity,
            tag: "cooldown".to_string(),
            fire_at: Tick(20),
            event: Box::new(GameEvent::EntityInteraction {
                tick: Tick(20),
                entity,
                target: entity,
                kind: InteractionKind::CooldownExpired,
            }),
        };
        let json = serde_json::to_string(&effect).expect("serialize");
        let back: Effect = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(effect, back);
    }
}
