//! # Game State Store
//!
//! Plugin-owned state, held apart from the host's own object graph so the
//! rule engine stays testable without a live server.
//!
//! ## Write Discipline
//!
//! One logical writer: all mutation (`put`, `remove`, `apply`) happens on the
//! host's tick thread, driven by rule-engine decisions. The dashmap backing
//! exists so observability and tests may read concurrently, not to permit
//! cross-thread writes.
//!
//! ## Removal Semantics
//!
//! Removing an entity deletes its record *and* retires the reference. A
//! retired reference reads as absent — no orphaned record survives removal —
//! but stays tombstoned so the rule engine can reject any later event for
//! that entity (the per-entity state machine is terminal in `Removed`).

use crate::types::{EntityRef, Location, Tick};
use dashmap::{DashMap, DashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, warn};

/// Record flag granting access to global-home mutations.
pub const FLAG_OPERATOR: &str = "operator";

// ============================================================================
// Records
// ============================================================================

/// Plugin-owned state for one entity.
///
/// Created on the first observed interaction with the entity, destroyed when
/// the host signals permanent removal. Mutated exclusively by the rule
/// engine (via deltas); everything here is plugin-side bookkeeping, never a
/// copy of host-owned state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StateRecord {
    /// Interactions observed for this entity.
    pub counter: u64,
    /// Tick at which the teleport cooldown ends, if one is running.
    pub cooldown_until: Option<Tick>,
    /// Named home locations. BTreeMap keeps listings deterministic.
    pub homes: BTreeMap<String, Location>,
    /// Custom flags such as [`FLAG_OPERATOR`].
    pub flags: BTreeSet<String>,
    /// Operator override of the configured home limit. Meaningful on world
    /// records only; `None` defers to the engine settings.
    #[serde(default)]
    pub max_homes_override: Option<i64>,
    /// Operator override of the configured teleport cooldown, in ticks.
    /// Meaningful on world records only.
    #[serde(default)]
    pub cooldown_override: Option<i64>,
    /// Tick of the first event that referenced this entity.
    pub first_seen: Tick,
    /// Tick of the most recent event that referenced this entity.
    pub last_seen: Tick,
}

impl StateRecord {
    /// A fresh record for an entity first observed at `tick`.
    pub fn new(tick: Tick) -> Self {
        Self {
            counter: 0,
            cooldown_until: None,
            homes: BTreeMap::new(),
            flags: BTreeSet::new(),
            max_homes_override: None,
            cooldown_override: None,
            first_seen: tick,
            last_seen: tick,
        }
    }

    /// Whether this record carries the operator flag.
    pub fn is_operator(&self) -> bool {
        self.flags.contains(FLAG_OPERATOR)
    }
}

// ============================================================================
// Deltas
// ============================================================================

/// An ordered batch of state changes decided by the rule engine.
///
/// Entries carry absolute records, never increments, so applying a delta is
/// idempotent: applying it twice leaves the store exactly as applying it
/// once.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StateDelta {
    entries: Vec<DeltaEntry>,
}

/// One entry of a [`StateDelta`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeltaEntry {
    /// Install `record` as the entity's state.
    Upsert {
        entity: EntityRef,
        record: StateRecord,
    },
    /// Delete the entity's record and retire the reference.
    Remove { entity: EntityRef },
}

impl StateDelta {
    /// An empty delta.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an upsert entry.
    pub fn upsert(&mut self, entity: EntityRef, record: StateRecord) -> &mut Self {
        self.entries.push(DeltaEntry::Upsert { entity, record });
        self
    }

    /// Appends a removal entry.
    pub fn remove(&mut self, entity: EntityRef) -> &mut Self {
        self.entries.push(DeltaEntry::Remove { entity });
        self
    }

    /// Whether this delta changes nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entries in application order.
    pub fn entries(&self) -> &[DeltaEntry] {
        &self.entries
    }
}

// ============================================================================
// Errors
// ============================================================================

/// State store failures.
#[derive(Debug, thiserror::Error)]
pub enum StateError {
    /// A lookup required presence and the record was absent. Callers that
    /// can recover treat absence as default state instead of calling
    /// [`StateStore::require`].
    #[error("no state record for entity {0}")]
    NotFound(EntityRef),
}

// ============================================================================
// Store
// ============================================================================

/// Read access to plugin state, the view the rule engine decides against.
///
/// Implemented by [`StateStore`]; tests may implement it over plain maps.
pub trait StateView {
    /// Snapshot of the entity's record, absent if never observed or removed.
    fn view(&self, entity: EntityRef) -> Option<StateRecord>;

    /// Whether the entity has been permanently removed (terminal state).
    fn is_retired(&self, entity: EntityRef) -> bool;
}

/// Keyed store of plugin state records with retired-entity tombstones.
#[derive(Debug, Default)]
pub struct StateStore {
    records: DashMap<EntityRef, StateRecord>,
    retired: DashSet<EntityRef>,
    refused_upserts: AtomicU64,
}

impl StateStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the entity's record, or `None` if absent.
    pub fn get(&self, entity: EntityRef) -> Option<StateRecord> {
        self.records.get(&entity).map(|r| r.clone())
    }

    /// Like [`get`](Self::get) but for callers that require presence.
    pub fn require(&self, entity: EntityRef) -> Result<StateRecord, StateError> {
        self.get(entity).ok_or(StateError::NotFound(entity))
    }

    /// Installs `record` as the entity's state. Upserts against a retired
    /// entity are refused and counted, never applied.
    pub fn put(&self, entity: EntityRef, record: StateRecord) {
        if self.retired.contains(&entity) {
            self.refused_upserts.fetch_add(1, Ordering::Relaxed);
            warn!(%entity, "refusing state upsert for retired entity");
            return;
        }
        self.records.insert(entity, record);
    }

    /// Deletes the entity's record and retires the reference. Terminal: no
    /// later upsert for this entity will be accepted.
    pub fn remove(&self, entity: EntityRef) {
        self.records.remove(&entity);
        self.retired.insert(entity);
        debug!(%entity, "entity state removed and reference retired");
    }

    /// Applies a delta entry by entry, in order. Returns the number of
    /// entries that took effect (refused upserts do not count).
    pub fn apply(&self, delta: &StateDelta) -> usize {
        let mut applied = 0;
        for entry in delta.entries() {
            match entry {
                DeltaEntry::Upsert { entity, record } => {
                    if self.retired.contains(entity) {
                        self.refused_upserts.fetch_add(1, Ordering::Relaxed);
                        warn!(entity = %entity, "delta upsert refused: entity retired");
                        continue;
                    }
                    self.records.insert(*entity, record.clone());
                    applied += 1;
                }
                DeltaEntry::Remove { entity } => {
                    self.remove(*entity);
                    applied += 1;
                }
            }
        }
        applied
    }

    /// Number of live records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the store holds no live records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Upserts refused because the entity was already retired.
    pub fn refused_upserts(&self) -> u64 {
        self.refused_upserts.load(Ordering::Relaxed)
    }
}

impl StateView for StateStore {
    fn view(&self, entity: EntityRef) -> Option<StateRecord> {
        self.get(entity)
    }

    fn is_retired(&self, entity: EntityRef) -> bool {
        self.retired.contains(&entity)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unobserved_entities_read_as_absent() {
        let store = StateStore::new();
        assert!(store.get(EntityRef::new()).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn require_reports_not_found() {
        let store = StateStore::new();
        let entity = EntityRef::new();
        match store.require(entity) {
            Err(StateError::NotFound(missing)) => assert_eq!(missing, entity),
            Ok(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn put_then_get_round_trips() {
        let store = StateStore::new();
        let entity = EntityRef::new();
        let mut record = StateRecord::new(Tick(3));
        record.counter = 7;
        store.put(entity, record.clone());
        assert_eq!(store.get(entity), Some(record));
    }

    #[test]
    fn removal_is_terminal_and_leaves_no_record() {
        let store = StateStore::new();
        let entity = EntityRef::new();
        store.put(entity, StateRecord::new(Tick(1)));
        store.remove(entity);

        assert!(store.get(entity).is_none());
        assert!(store.is_retired(entity));

        // A late upsert must not resurrect the entity.
        store.put(entity, StateRecord::new(Tick(2)));
        assert!(store.get(entity).is_none());
        assert_eq!(store.refused_upserts(), 1);
    }

    #[test]
    fn delta_application_is_idempotent() {
        let store = StateStore::new();
        let keep = EntityRef::new();
        let gone = EntityRef::new();
        store.put(gone, StateRecord::new(Tick(0)));

        let mut record = StateRecord::new(Tick(5));
        record.counter = 2;
        let mut delta = StateDelta::new();
        delta.upsert(keep, record.clone());
        delta.remove(gone);

        store.apply(&delta);
        let first = store.get(keep);
        store.apply(&delta);
        let second = store.get(keep);

        assert_eq!(first, Some(record));
        assert_eq!(first, second);
        assert!(store.get(gone).is_none());
        assert!(store.is_retired(gone));
    }

    #[test]
    fn apply_counts_effective_entries_only() {
        let store = StateStore::new();
        let gone = EntityRef::new();
        store.remove(gone);

        let mut delta = StateDelta::new();
        delta.upsert(gone, StateRecord::new(Tick(1)));
        assert_eq!(store.apply(&delta), 0);
        assert_eq!(store.refused_upserts(), 1);
    }
}
