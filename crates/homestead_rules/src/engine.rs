//! # Rule Engine
//!
//! The pure decision core: given one internal event and a read-only view of
//! plugin state, produce the state delta to apply and the ordered effects to
//! hand back to the host. Determinism is a hard requirement — identical
//! (event, view) inputs always yield the identical decision — which is what
//! keeps the whole plugin testable without a live server.
//!
//! ## Variant Coverage
//!
//! Every [`GameEvent`] variant is matched exhaustively; there is no
//! catch-all. The one wildcard arm in the crate sits behind the
//! non-exhaustive [`InteractionKind`], and reaching it is reported as
//! [`RuleError::UnhandledEvent`] rather than silently ignored.
//!
//! ## Terminal Entities
//!
//! An event referencing a retired (removed) entity is rejected with
//! [`RuleError::EntityRetired`]; the driver logs the rejection and drops the
//! event.

use crate::homes::{
    format_home_list, home_limit_reached, remaining_cooldown, COOLDOWN_TAG, MAX_COOLDOWN_TICKS,
};
use crate::messages::MessageCatalog;
use homestead_core::{
    Effect, EntityMutation, EntityRef, GameEvent, InteractionKind, PlayerAction, StateDelta,
    StateRecord, StateView, Tick,
};
use serde::{Deserialize, Serialize};

fn default_max_homes() -> i64 {
    -1
}

fn default_cooldown_ticks() -> i64 {
    -1
}

fn default_locale() -> String {
    "en".to_string()
}

/// Tunable rule parameters, loadable from the host config file.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RuleSettings {
    /// Maximum homes per player; -1 means unlimited.
    #[serde(default = "default_max_homes")]
    pub max_homes: i64,
    /// Teleport cooldown in ticks; -1 (or 0) disables the cooldown.
    #[serde(default = "default_cooldown_ticks")]
    pub cooldown_ticks: i64,
    /// Locale used to render player messages.
    #[serde(default = "default_locale")]
    pub locale: String,
}

impl Default for RuleSettings {
    fn default() -> Self {
        Self {
            max_homes: default_max_homes(),
            cooldown_ticks: default_cooldown_ticks(),
            locale: default_locale(),
        }
    }
}

/// The outcome of one decision: what to change and what to tell the host.
///
/// Effects keep their construction order; the driver applies them in order
/// with partial-failure semantics.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Decision {
    /// State changes to apply to the store.
    pub delta: StateDelta,
    /// Host-side effects, in application order.
    pub effects: Vec<Effect>,
}

impl Decision {
    /// A decision that changes nothing.
    pub fn empty() -> Self {
        Self::default()
    }
}

/// Rule engine failures.
#[derive(Debug, thiserror::Error)]
pub enum RuleError {
    /// The event references an entity whose state machine is terminal.
    #[error("entity {0} is removed; event rejected")]
    EntityRetired(EntityRef),
    /// An event variant reached a branch no rule handles. A design defect,
    /// surfaced to the logging boundary, never a silent fallback.
    #[error("no rule handles event variant: {0}")]
    UnhandledEvent(String),
}

/// Pure decision logic over plugin state.
///
/// Holds only immutable configuration (settings and message catalog), so a
/// given engine value is a deterministic function of its inputs.
#[derive(Debug, Clone)]
pub struct RuleEngine {
    settings: RuleSettings,
    catalog: MessageCatalog,
}

impl RuleEngine {
    /// Creates an engine with the built-in English message catalog.
    pub fn new(settings: RuleSettings) -> Self {
        Self::with_catalog(settings, MessageCatalog::default_english())
    }

    /// Creates an engine with a host-supplied message catalog.
    pub fn with_catalog(settings: RuleSettings, catalog: MessageCatalog) -> Self {
        Self { settings, catalog }
    }

    /// The engine's settings.
    pub fn settings(&self) -> &RuleSettings {
        &self.settings
    }

    /// Decides state changes and effects for one event.
    pub fn decide(
        &self,
        event: &GameEvent,
        state: &dyn StateView,
    ) -> Result<Decision, RuleError> {
        let primary = event.primary_entity();
        if state.is_retired(primary) {
            return Err(RuleError::EntityRetired(primary));
        }
        tracing::debug!(tick = %event.tick(), entity = %primary, "deciding event");

        match event {
            GameEvent::PlayerAction {
                tick,
                player,
                world,
                action,
            } => self.decide_player_action(*tick, *player, *world, action, state),
            GameEvent::WorldTick { .. } => {
                // Timing is scheduler-driven; the tick itself decides nothing.
                Ok(Decision::empty())
            }
            GameEvent::EntityInteraction {
                tick, entity, kind, ..
            } => self.decide_interaction(*tick, *entity, *kind, state),
            GameEvent::EntityRemoved { entity, .. } => Ok(Self::decide_removal(*entity)),
        }
    }

    // ========================================================================
    // Player actions
    // ========================================================================

    fn decide_player_action(
        &self,
        tick: Tick,
        player: EntityRef,
        world: EntityRef,
        action: &PlayerAction,
        state: &dyn StateView,
    ) -> Result<Decision, RuleError> {
        if state.is_retired(world) {
            return Err(RuleError::EntityRetired(world));
        }

        // Operator overrides on the world record take precedence over the
        // configured settings.
        let world_view = state.view(world);
        let max_homes = world_view
            .as_ref()
            .and_then(|record| record.max_homes_override)
            .unwrap_or(self.settings.max_homes);
        let cooldown_ticks = world_view
            .as_ref()
            .and_then(|record| record.cooldown_override)
            .unwrap_or(self.settings.cooldown_ticks);

        let mut record = state
            .view(player)
            .unwrap_or_else(|| StateRecord::new(tick));
        record.last_seen = tick;
        record.counter += 1;

        let mut decision = Decision::empty();
        match action {
            PlayerAction::Interact => {
                self.say(
                    &mut decision,
                    player,
                    "interact.count",
                    &[("count", record.counter.to_string())],
                );
            }
            PlayerAction::SetHome { name, location } => {
                if home_limit_reached(max_homes, &record) {
                    self.say(
                        &mut decision,
                        player,
                        "homes.limit.reached",
                        &[("max", max_homes.to_string())],
                    );
                } else {
                    record.homes.insert(name.clone(), location.clone());
                    self.say(&mut decision, player, "home.set", &[("home", name.clone())]);
                }
            }
            PlayerAction::TeleportHome { name } => {
                self.teleport_home(&mut decision, &mut record, tick, player, name, cooldown_ticks);
            }
            PlayerAction::DeleteHome { name } => {
                let key = if record.homes.remove(name).is_some() {
                    "home.deleted"
                } else {
                    "home.not_exist"
                };
                self.say(&mut decision, player, key, &[("home", name.clone())]);
            }
            PlayerAction::ListHomes => {
                self.list_homes(&mut decision, player, &record, max_homes);
            }
            PlayerAction::SetGlobalHome { name, location } => {
                if record.is_operator() {
                    let mut world_record = Self::world_record(world, tick, state);
                    world_record.homes.insert(name.clone(), location.clone());
                    decision.delta.upsert(world, world_record);
                    self.say(
                        &mut decision,
                        player,
                        "globalhome.set",
                        &[("home", name.clone())],
                    );
                } else {
                    self.say(&mut decision, player, "no_permission", &[]);
                }
            }
            PlayerAction::TeleportGlobalHome { name } => {
                let world_record = Self::world_record(world, tick, state);
                match world_record.homes.get(name) {
                    Some(location) => {
                        decision.effects.push(Effect::MutateEntity {
                            entity: player,
                            mutation: EntityMutation::Teleport(location.clone()),
                        });
                        self.say(
                            &mut decision,
                            player,
                            "globalhome.teleport",
                            &[("home", name.clone())],
                        );
                    }
                    None => {
                        self.say(
                            &mut decision,
                            player,
                            "globalhome.not_exist",
                            &[("home", name.clone())],
                        );
                    }
                }
            }
            PlayerAction::DeleteGlobalHome { name } => {
                if record.is_operator() {
                    let mut world_record = Self::world_record(world, tick, state);
                    let key = if world_record.homes.remove(name).is_some() {
                        decision.delta.upsert(world, world_record);
                        "globalhome.deleted"
                    } else {
                        "globalhome.not_exist"
                    };
                    self.say(&mut decision, player, key, &[("home", name.clone())]);
                } else {
                    self.say(&mut decision, player, "no_permission", &[]);
                }
            }
            PlayerAction::ListGlobalHomes => {
                let world_record = Self::world_record(world, tick, state);
                if world_record.homes.is_empty() {
                    self.say(&mut decision, player, "globalhomes.none", &[]);
                } else {
                    self.say(&mut decision, player, "globalhomes.list.header", &[]);
                    self.say(
                        &mut decision,
                        player,
                        "globalhomes.list.items",
                        &[("homes", format_home_list(&world_record))],
                    );
                }
            }
            PlayerAction::SetHomeLimit { value } => {
                if record.is_operator() {
                    if *value < -1 {
                        self.say(&mut decision, player, "invalid_number", &[]);
                    } else {
                        let mut world_record = Self::world_record(world, tick, state);
                        world_record.max_homes_override = Some(*value);
                        decision.delta.upsert(world, world_record);
                        self.say(
                            &mut decision,
                            player,
                            "homes.limit.set",
                            &[("max", value.to_string())],
                        );
                    }
                } else {
                    self.say(&mut decision, player, "no_permission", &[]);
                }
            }
            PlayerAction::SetCooldown { value } => {
                if record.is_operator() {
                    if *value < -1 || *value > MAX_COOLDOWN_TICKS {
                        self.say(
                            &mut decision,
                            player,
                            "cooldown.range",
                            &[("max", MAX_COOLDOWN_TICKS.to_string())],
                        );
                    } else {
                        let mut world_record = Self::world_record(world, tick, state);
                        world_record.cooldown_override = Some(*value);
                        decision.delta.upsert(world, world_record);
                        if *value == -1 {
                            self.say(&mut decision, player, "cooldown.disabled", &[]);
                        } else {
                            self.say(
                                &mut decision,
                                player,
                                "cooldown.set",
                                &[("time", value.to_string())],
                            );
                        }
                    }
                } else {
                    self.say(&mut decision, player, "no_permission", &[]);
                }
            }
            PlayerAction::Usage { command } => {
                self.say(&mut decision, player, &format!("usage.{command}"), &[]);
            }
            PlayerAction::InvalidNumber { .. } => {
                // Both numeric commands are operator commands; mirror their
                // permission check before complaining about the argument.
                let key = if record.is_operator() {
                    "invalid_number"
                } else {
                    "no_permission"
                };
                self.say(&mut decision, player, key, &[]);
            }
        }

        decision.delta.upsert(player, record);
        Ok(decision)
    }

    fn teleport_home(
        &self,
        decision: &mut Decision,
        record: &mut StateRecord,
        tick: Tick,
        player: EntityRef,
        name: &str,
        cooldown_ticks: i64,
    ) {
        let Some(location) = record.homes.get(name).cloned() else {
            self.say(decision, player, "home.not_exist", &[("home", name.to_string())]);
            return;
        };
        if let Some(remaining) = remaining_cooldown(record, tick) {
            self.say(
                decision,
                player,
                "home.cooldown",
                &[("time", remaining.to_string())],
            );
            return;
        }

        decision.effects.push(Effect::MutateEntity {
            entity: player,
            mutation: EntityMutation::Teleport(location),
        });
        self.say(decision, player, "home.teleport", &[("home", name.to_string())]);

        // Cooldown applies only to successful teleports.
        if cooldown_ticks > 0 {
            let until = tick.advance(cooldown_ticks as u64);
            record.cooldown_until = Some(until);
            decision.effects.push(Effect::ScheduleDelayedEvent {
                entity: player,
                tag: COOLDOWN_TAG.to_string(),
                fire_at: until,
                event: Box::new(GameEvent::EntityInteraction {
                    tick: until,
                    entity: player,
                    target: player,
                    kind: InteractionKind::CooldownExpired,
                }),
            });
        }
    }

    fn list_homes(
        &self,
        decision: &mut Decision,
        player: EntityRef,
        record: &StateRecord,
        max_homes: i64,
    ) {
        if record.homes.is_empty() {
            self.say(decision, player, "homes.none", &[]);
            return;
        }
        let max = if max_homes < 0 {
            self.catalog
                .render(&self.settings.locale, "homes.unlimited", &[])
        } else {
            max_homes.to_string()
        };
        self.say(
            decision,
            player,
            "homes.list.header",
            &[("current", record.homes.len().to_string()), ("max", max)],
        );
        self.say(
            decision,
            player,
            "homes.list.items",
            &[("homes", format_home_list(record))],
        );
    }

    // ========================================================================
    // Interactions and removal
    // ========================================================================

    fn decide_interaction(
        &self,
        tick: Tick,
        entity: EntityRef,
        kind: InteractionKind,
        state: &dyn StateView,
    ) -> Result<Decision, RuleError> {
        let mut decision = Decision::empty();
        match kind {
            InteractionKind::Touch => {
                let mut record = state
                    .view(entity)
                    .unwrap_or_else(|| StateRecord::new(tick));
                record.last_seen = tick;
                record.counter += 1;
                decision.delta.upsert(entity, record);
            }
            InteractionKind::CooldownExpired => {
                // Absent record means the entity never teleported or was
                // cleaned up already; nothing to do.
                if let Some(mut record) = state.view(entity) {
                    if record.cooldown_until.is_some_and(|until| until <= tick) {
                        record.cooldown_until = None;
                        record.last_seen = tick;
                        decision.delta.upsert(entity, record);
                    }
                }
            }
            other => {
                return Err(RuleError::UnhandledEvent(format!(
                    "interaction kind {other:?}"
                )));
            }
        }
        Ok(decision)
    }

    fn decide_removal(entity: EntityRef) -> Decision {
        let mut decision = Decision::empty();
        decision.delta.remove(entity);
        // Harmless when nothing is pending; guarantees no cooldown follow-up
        // outlives the entity.
        decision.effects.push(Effect::CancelDelayed {
            entity,
            tag: COOLDOWN_TAG.to_string(),
        });
        decision
    }

    // ========================================================================
    // Message helper
    // ========================================================================

    fn say(
        &self,
        decision: &mut Decision,
        entity: EntityRef,
        key: &str,
        args: &[(&str, String)],
    ) {
        let message = self.catalog.render(&self.settings.locale, key, args);
        decision.effects.push(Effect::SendMessage { entity, message });
    }

    /// The world's record, defaulting to a fresh one when the world has not
    /// been observed yet (the local recovery for a presence-required miss).
    fn world_record(world: EntityRef, tick: Tick, state: &dyn StateView) -> StateRecord {
        state.view(world).unwrap_or_else(|| StateRecord::new(tick))
    }
}
