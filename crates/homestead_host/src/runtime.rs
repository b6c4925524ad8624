//! # Tick Driver
//!
//! Wires the full control flow together, synchronously on the host's tick
//! thread: host callback → event adapter → rule engine (reads and writes the
//! state store) → effect dispatcher → host. Nothing here blocks; delayed
//! work goes through the scheduler and comes back as events on later ticks.
//!
//! Rule-engine errors are surfaced at the logging boundary: a rejected event
//! for a removed entity is warn-logged and dropped, an unhandled variant is
//! error-logged as an invariant violation. Neither is ever silently ignored.

use crate::adapter::{EventAdapter, HostEvent};
use crate::dispatch::{BatchOutcome, EffectDispatcher, HostApi};
use crate::scheduler::TickScheduler;
use homestead_core::{EntityRef, GameEvent, StateStore, Tick};
use homestead_rules::{RuleEngine, RuleError, RuleSettings};
use tracing::{error, info, warn};

/// The assembled plugin core.
///
/// Owns every component; the host owns only the `HostApi` implementation it
/// passed in and the cadence at which it calls [`handle_host_event`] and
/// [`tick`].
///
/// [`handle_host_event`]: Core::handle_host_event
/// [`tick`]: Core::tick
pub struct Core<H: HostApi> {
    adapter: EventAdapter,
    engine: RuleEngine,
    store: StateStore,
    scheduler: TickScheduler,
    dispatcher: EffectDispatcher<H>,
}

impl<H: HostApi> Core<H> {
    /// Assembles a core with the built-in English messages.
    pub fn new(settings: RuleSettings, host: H) -> Self {
        Self::with_engine(RuleEngine::new(settings), host)
    }

    /// Assembles a core around a pre-built engine (custom catalog, etc.).
    pub fn with_engine(engine: RuleEngine, host: H) -> Self {
        info!(
            max_homes = engine.settings().max_homes,
            cooldown_ticks = engine.settings().cooldown_ticks,
            "homestead core assembled"
        );
        Self {
            adapter: EventAdapter::new(),
            engine,
            store: StateStore::new(),
            scheduler: TickScheduler::new(),
            dispatcher: EffectDispatcher::new(host),
        }
    }

    /// Handles one raw host callback. Returns one batch outcome per internal
    /// event processed; an empty vec means the callback was filtered.
    ///
    /// A tick callback additionally fires due delayed events, removal
    /// signals first (event-priority order).
    pub fn handle_host_event(&mut self, host_event: &HostEvent) -> Vec<BatchOutcome> {
        let Some(event) = self.adapter.adapt(host_event) else {
            return Vec::new();
        };
        match event {
            GameEvent::WorldTick { tick, world } => self.tick(world, tick),
            other => vec![self.process(other)],
        }
    }

    /// Advances the core to `tick`: fires due delayed events, then processes
    /// the world tick itself.
    pub fn tick(&mut self, world: EntityRef, tick: Tick) -> Vec<BatchOutcome> {
        let mut outcomes = Vec::new();
        for event in self.scheduler.drain_due(tick) {
            outcomes.push(self.process(event));
        }
        outcomes.push(self.process(GameEvent::WorldTick { tick, world }));
        outcomes
    }

    /// Host-initiated cancellation of a pending delayed event by key.
    pub fn cancel_delayed(&mut self, entity: EntityRef, tag: &str) -> bool {
        self.scheduler.cancel(entity, tag)
    }

    fn process(&mut self, event: GameEvent) -> BatchOutcome {
        match self.engine.decide(&event, &self.store) {
            Ok(decision) => {
                self.store.apply(&decision.delta);
                self.dispatcher
                    .apply_batch(&decision.effects, &mut self.scheduler)
            }
            Err(RuleError::EntityRetired(entity)) => {
                warn!(%entity, "event for removed entity dropped");
                BatchOutcome::default()
            }
            Err(err @ RuleError::UnhandledEvent(_)) => {
                error!(error = %err, "rule engine invariant violation");
                BatchOutcome::default()
            }
        }
    }

    /// The state store, readable concurrently for observability and tests.
    pub fn store(&self) -> &StateStore {
        &self.store
    }

    /// The scheduler, for observing pending delayed events.
    pub fn scheduler(&self) -> &TickScheduler {
        &self.scheduler
    }

    /// Host events dropped by the adapter so far.
    pub fn dropped_host_events(&self) -> u64 {
        self.adapter.dropped()
    }

    /// The host handle the dispatcher applies effects against.
    pub fn host(&self) -> &H {
        self.dispatcher.host()
    }
}
