//! # Delayed-Event Scheduler
//!
//! The plugin-side model of the host's delayed-task API. Rule decisions
//! never wait in-line; anything that needs latency is a
//! `ScheduleDelayedEvent` effect that lands here, keyed by
//! (entity, tag), and the host drives firing by advancing the tick.
//!
//! ## Semantics
//!
//! - Scheduling again under an existing key replaces the pending entry.
//! - Cancelling by key before the fire tick removes the entry; a cancelled
//!   entry firing is a no-op, not an error.
//! - Entries due at the same tick drain in event-priority order
//!   ([`GameEvent::priority`]), stable by insertion order within a priority.

use homestead_core::{EntityRef, GameEvent, Tick};
use tracing::{debug, trace};

#[derive(Debug)]
struct Pending {
    entity: EntityRef,
    tag: String,
    fire_at: Tick,
    seq: u64,
    event: GameEvent,
}

/// Pending delayed events, keyed by (entity, tag).
#[derive(Debug, Default)]
pub struct TickScheduler {
    pending: Vec<Pending>,
    next_seq: u64,
}

impl TickScheduler {
    /// Creates an empty scheduler.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedules `event` to fire at `fire_at`, replacing any entry already
    /// pending under the same (entity, tag) key.
    pub fn schedule(&mut self, entity: EntityRef, tag: &str, fire_at: Tick, event: GameEvent) {
        self.pending
            .retain(|entry| !(entry.entity == entity && entry.tag == tag));
        let seq = self.next_seq;
        self.next_seq += 1;
        trace!(%entity, tag, %fire_at, "delayed event scheduled");
        self.pending.push(Pending {
            entity,
            tag: tag.to_string(),
            fire_at,
            seq,
            event,
        });
    }

    /// Cancels the pending entry under (entity, tag). Returns whether an
    /// entry was actually pending; cancelling nothing is fine.
    pub fn cancel(&mut self, entity: EntityRef, tag: &str) -> bool {
        let before = self.pending.len();
        self.pending
            .retain(|entry| !(entry.entity == entity && entry.tag == tag));
        let cancelled = self.pending.len() != before;
        if cancelled {
            debug!(%entity, tag, "delayed event cancelled");
        }
        cancelled
    }

    /// Whether an entry is pending under (entity, tag).
    pub fn is_pending(&self, entity: EntityRef, tag: &str) -> bool {
        self.pending
            .iter()
            .any(|entry| entry.entity == entity && entry.tag == tag)
    }

    /// Removes and returns every event due at or before `now`, ordered by
    /// event priority then insertion order.
    pub fn drain_due(&mut self, now: Tick) -> Vec<GameEvent> {
        let mut due = Vec::new();
        let mut keep = Vec::new();
        for entry in self.pending.drain(..) {
            if entry.fire_at <= now {
                due.push(entry);
            } else {
                keep.push(entry);
            }
        }
        self.pending = keep;

        due.sort_by_key(|entry| (entry.event.priority(), entry.seq));
        due.into_iter().map(|entry| entry.event).collect()
    }

    /// Number of pending entries.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether nothing is pending.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use homestead_core::{InteractionKind, PlayerAction};

    fn expiry(entity: EntityRef, tick: u64) -> GameEvent {
        GameEvent::EntityInteraction {
            tick: Tick(tick),
            entity,
            target: entity,
            kind: InteractionKind::CooldownExpired,
        }
    }

    #[test]
    fn cancelled_entries_do_not_fire() {
        let mut scheduler = TickScheduler::new();
        let entity = EntityRef::new();
        scheduler.schedule(entity, "cooldown", Tick(20), expiry(entity, 20));
        assert!(scheduler.is_pending(entity, "cooldown"));

        assert!(scheduler.cancel(entity, "cooldown"));
        assert!(scheduler.drain_due(Tick(20)).is_empty());
        // Firing after cancellation stays a no-op on later ticks too.
        assert!(scheduler.drain_due(Tick(30)).is_empty());
    }

    #[test]
    fn cancelling_nothing_is_a_no_op() {
        let mut scheduler = TickScheduler::new();
        assert!(!scheduler.cancel(EntityRef::new(), "cooldown"));
    }

    #[test]
    fn rescheduling_replaces_the_pending_entry() {
        let mut scheduler = TickScheduler::new();
        let entity = EntityRef::new();
        scheduler.schedule(entity, "cooldown", Tick(10), expiry(entity, 10));
        scheduler.schedule(entity, "cooldown", Tick(30), expiry(entity, 30));

        assert_eq!(scheduler.len(), 1);
        assert!(scheduler.drain_due(Tick(10)).is_empty());
        assert_eq!(scheduler.drain_due(Tick(30)).len(), 1);
    }

    #[test]
    fn same_tick_fires_drain_in_priority_order() {
        let mut scheduler = TickScheduler::new();
        let (a, b, world) = (EntityRef::new(), EntityRef::new(), EntityRef::new());

        // Inserted lowest-priority first to prove ordering is by priority,
        // not insertion.
        scheduler.schedule(a, "cooldown", Tick(20), expiry(a, 20));
        scheduler.schedule(
            b,
            "farewell",
            Tick(20),
            GameEvent::EntityRemoved {
                tick: Tick(20),
                entity: b,
            },
        );
        scheduler.schedule(
            a,
            "nudge",
            Tick(20),
            GameEvent::PlayerAction {
                tick: Tick(20),
                player: a,
                world,
                action: PlayerAction::Interact,
            },
        );

        let due = scheduler.drain_due(Tick(20));
        assert!(matches!(due[0], GameEvent::EntityRemoved { .. }));
        assert!(matches!(due[1], GameEvent::PlayerAction { .. }));
        assert!(matches!(due[2], GameEvent::EntityInteraction { .. }));
    }

    #[test]
    fn equal_priority_keeps_insertion_order() {
        let mut scheduler = TickScheduler::new();
        let (a, b) = (EntityRef::new(), EntityRef::new());
        scheduler.schedule(a, "cooldown", Tick(20), expiry(a, 20));
        scheduler.schedule(b, "cooldown", Tick(20), expiry(b, 20));

        let due = scheduler.drain_due(Tick(20));
        match (&due[0], &due[1]) {
            (
                GameEvent::EntityInteraction { entity: first, .. },
                GameEvent::EntityInteraction { entity: second, .. },
            ) => {
                assert_eq!(*first, a);
                assert_eq!(*second, b);
            }
            other => panic!("unexpected events: {other:?}"),
        }
    }

    #[test]
    fn future_entries_stay_pending() {
        let mut scheduler = TickScheduler::new();
        let entity = EntityRef::new();
        scheduler.schedule(entity, "cooldown", Tick(25), expiry(entity, 25));

        assert!(scheduler.drain_due(Tick(24)).is_empty());
        assert_eq!(scheduler.len(), 1);
        assert_eq!(scheduler.drain_due(Tick(25)).len(), 1);
        assert!(scheduler.is_empty());
    }
}
