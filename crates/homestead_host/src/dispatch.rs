//! # Effect Dispatcher
//!
//! Applies decided effects back onto the host runtime. The dispatcher is the
//! only component that calls the host's mutate/message APIs; the rule engine
//! stays pure and the host boundary stays one trait wide.
//!
//! ## Partial-Failure Semantics
//!
//! One failed effect never aborts its batch: every sibling still attempts to
//! apply, failures are logged with their batch index, and the caller gets a
//! [`BatchOutcome`] accounting for both.

use crate::scheduler::TickScheduler;
use homestead_core::{Effect, EntityMutation, EntityRef};
use tracing::{error, trace};

/// Failure reported by a host API call, e.g. the entity is already gone.
#[derive(Debug, thiserror::Error)]
#[error("{0}")]
pub struct HostApiError(pub String);

/// The consumed host boundary: the few capabilities this core needs from the
/// host runtime. Entity/world queries stay host-owned; the plugin only ever
/// reaches the world through these calls.
pub trait HostApi {
    /// Delivers a chat message to an entity.
    fn send_message(&self, entity: EntityRef, message: &str) -> Result<(), HostApiError>;

    /// Applies a mutation to a host entity.
    fn mutate_entity(
        &self,
        entity: EntityRef,
        mutation: &EntityMutation,
    ) -> Result<(), HostApiError>;
}

/// Effect application failures.
#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    /// The host API call errored, typically because the referenced entity no
    /// longer exists on the host side.
    #[error("host unavailable applying {effect} to {entity}: {reason}")]
    HostUnavailable {
        effect: &'static str,
        entity: EntityRef,
        reason: String,
    },
}

/// Result of applying one batch of effects.
#[derive(Debug, Default)]
pub struct BatchOutcome {
    /// Effects that applied successfully.
    pub applied: usize,
    /// Failed effects with their index in the batch.
    pub failures: Vec<(usize, DispatchError)>,
}

impl BatchOutcome {
    /// Whether every effect in the batch applied.
    pub fn fully_applied(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Applies effects against a [`HostApi`] implementation.
#[derive(Debug)]
pub struct EffectDispatcher<H: HostApi> {
    host: H,
}

impl<H: HostApi> EffectDispatcher<H> {
    /// Creates a dispatcher over the given host.
    pub fn new(host: H) -> Self {
        Self { host }
    }

    /// The wrapped host.
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Applies one effect. Scheduling effects land in the plugin's scheduler
    /// model and cannot fail; host-facing effects surface
    /// [`DispatchError::HostUnavailable`] on host errors.
    pub fn apply(
        &self,
        effect: &Effect,
        scheduler: &mut TickScheduler,
    ) -> Result<(), DispatchError> {
        trace!(kind = effect.kind(), entity = %effect.entity(), "applying effect");
        match effect {
            Effect::SendMessage { entity, message } => self
                .host
                .send_message(*entity, message)
                .map_err(|err| Self::unavailable(effect, *entity, err)),
            Effect::MutateEntity { entity, mutation } => self
                .host
                .mutate_entity(*entity, mutation)
                .map_err(|err| Self::unavailable(effect, *entity, err)),
            Effect::ScheduleDelayedEvent {
                entity,
                tag,
                fire_at,
                event,
            } => {
                scheduler.schedule(*entity, tag, *fire_at, (**event).clone());
                Ok(())
            }
            Effect::CancelDelayed { entity, tag } => {
                scheduler.cancel(*entity, tag);
                Ok(())
            }
        }
    }

    /// Applies a batch in order with partial-failure semantics.
    pub fn apply_batch(&self, effects: &[Effect], scheduler: &mut TickScheduler) -> BatchOutcome {
        let mut outcome = BatchOutcome::default();
        for (index, effect) in effects.iter().enumerate() {
            match self.apply(effect, scheduler) {
                Ok(()) => outcome.applied += 1,
                Err(err) => {
                    error!(index, error = %err, "effect failed; continuing batch");
                    outcome.failures.push((index, err));
                }
            }
        }
        outcome
    }

    fn unavailable(effect: &Effect, entity: EntityRef, err: HostApiError) -> DispatchError {
        DispatchError::HostUnavailable {
            effect: effect.kind(),
            entity,
            reason: err.0,
        }
    }
}
