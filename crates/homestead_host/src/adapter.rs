//! # Event Adapter
//!
//! Translates raw host-runtime callbacks into internal, host-agnostic
//! [`GameEvent`] values. The adapter is the only place that understands the
//! host's callback shapes (command strings, despawn signals, tick
//! callbacks); everything downstream speaks the internal vocabulary.
//!
//! ## Contract
//!
//! `adapt(host_event) -> Option<GameEvent>`. Non-blocking, no access to the
//! state store, no side effect beyond producing a value. Unrecognized or
//! filtered payloads return `None` and bump an atomic drop counter —
//! observability only, never an error.
//!
//! If a host delivers callbacks off the tick thread, it must hand them into
//! its tick-thread queue before calling [`EventAdapter::adapt`]; the core
//! never takes that hand-off on itself.

use chrono::{DateTime, Utc};
use homestead_core::{EntityRef, GameEvent, InteractionKind, Location, PlayerAction, Tick};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::debug;

/// A raw host-runtime callback payload.
///
/// Wall-clock stamps are carried for logging only; ordering always uses the
/// host's tick counter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum HostEvent {
    /// A player ran a command.
    Command {
        tick: u64,
        player: EntityRef,
        world: EntityRef,
        /// The player's position when the command ran; captured here because
        /// the rule engine never queries the host world directly.
        position: Location,
        name: String,
        args: Vec<String>,
        received_at: DateTime<Utc>,
    },
    /// A player interacted with the world without a command.
    PlayerInteract {
        tick: u64,
        player: EntityRef,
        world: EntityRef,
        received_at: DateTime<Utc>,
    },
    /// Two entities came into contact.
    EntityTouch {
        tick: u64,
        entity: EntityRef,
        target: EntityRef,
        received_at: DateTime<Utc>,
    },
    /// An entity left the world. Only `permanent` despawns (player quit with
    /// no persistence, entity destroyed) become removal events; transient
    /// ones (chunk unload) are filtered.
    EntityDespawn {
        tick: u64,
        entity: EntityRef,
        permanent: bool,
        received_at: DateTime<Utc>,
    },
    /// The server advanced one simulation step.
    Tick { number: u64, world: EntityRef },
    /// A callback kind this plugin does not subscribe to.
    Unknown { kind: String },
}

/// Translates host callbacks into internal events, counting drops.
#[derive(Debug, Default)]
pub struct EventAdapter {
    dropped: AtomicU64,
}

impl EventAdapter {
    /// Creates an adapter with a zeroed drop counter.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of host events dropped as unrecognized or filtered.
    pub fn dropped(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }

    /// Translates one host callback, or drops it.
    pub fn adapt(&self, host_event: &HostEvent) -> Option<GameEvent> {
        match host_event {
            HostEvent::Command {
                tick,
                player,
                world,
                position,
                name,
                args,
                received_at,
            } => match self.parse_command(name, args, position) {
                Some(action) => Some(GameEvent::PlayerAction {
                    tick: Tick(*tick),
                    player: *player,
                    world: *world,
                    action,
                }),
                None => self.drop_event("command", name, Some(*received_at)),
            },
            HostEvent::PlayerInteract {
                tick,
                player,
                world,
                ..
            } => Some(GameEvent::PlayerAction {
                tick: Tick(*tick),
                player: *player,
                world: *world,
                action: PlayerAction::Interact,
            }),
            HostEvent::EntityTouch {
                tick,
                entity,
                target,
                ..
            } => Some(GameEvent::EntityInteraction {
                tick: Tick(*tick),
                entity: *entity,
                target: *target,
                kind: InteractionKind::Touch,
            }),
            HostEvent::EntityDespawn {
                tick,
                entity,
                permanent,
                received_at,
            } => {
                if *permanent {
                    Some(GameEvent::EntityRemoved {
                        tick: Tick(*tick),
                        entity: *entity,
                    })
                } else {
                    self.drop_event("despawn", "transient", Some(*received_at))
                }
            }
            HostEvent::Tick { number, world } => Some(GameEvent::WorldTick {
                tick: Tick(*number),
                world: *world,
            }),
            HostEvent::Unknown { kind } => self.drop_event("unknown", kind, None),
        }
    }

    /// Parses a command name and argument list into a player action.
    ///
    /// Home names are normalized to lowercase, as the original command set
    /// treated them case-insensitively. A known command with a malformed
    /// argument list becomes [`PlayerAction::Usage`], and an unparseable
    /// numeric argument becomes [`PlayerAction::InvalidNumber`]; an unknown
    /// command is not ours to answer and is dropped.
    fn parse_command(
        &self,
        name: &str,
        args: &[String],
        position: &Location,
    ) -> Option<PlayerAction> {
        let command = name.to_ascii_lowercase();
        let one_arg = || args.first().map(|arg| arg.to_ascii_lowercase());

        let action = match command.as_str() {
            "sethome" => match (args.len(), one_arg()) {
                (1, Some(home)) => PlayerAction::SetHome {
                    name: home,
                    location: position.clone(),
                },
                _ => PlayerAction::Usage { command },
            },
            "home" => match (args.len(), one_arg()) {
                (1, Some(home)) => PlayerAction::TeleportHome { name: home },
                _ => PlayerAction::Usage { command },
            },
            "delhome" => match (args.len(), one_arg()) {
                (1, Some(home)) => PlayerAction::DeleteHome { name: home },
                _ => PlayerAction::Usage { command },
            },
            "homes" => PlayerAction::ListHomes,
            "setglobalhome" => match (args.len(), one_arg()) {
                (1, Some(home)) => PlayerAction::SetGlobalHome {
                    name: home,
                    location: position.clone(),
                },
                _ => PlayerAction::Usage { command },
            },
            "globalhome" => match (args.len(), one_arg()) {
                (1, Some(home)) => PlayerAction::TeleportGlobalHome { name: home },
                _ => PlayerAction::Usage { command },
            },
            "delglobalhome" | "dgh" => match (args.len(), one_arg()) {
                (1, Some(home)) => PlayerAction::DeleteGlobalHome { name: home },
                _ => PlayerAction::Usage {
                    command: "delglobalhome".to_string(),
                },
            },
            "globalhomes" => PlayerAction::ListGlobalHomes,
            "homecount" => match args {
                [raw] => match raw.parse::<i64>() {
                    Ok(value) => PlayerAction::SetHomeLimit { value },
                    Err(_) => PlayerAction::InvalidNumber { command },
                },
                _ => PlayerAction::Usage { command },
            },
            "homecooldown" => match args {
                [raw] => match raw.parse::<i64>() {
                    Ok(value) => PlayerAction::SetCooldown { value },
                    Err(_) => PlayerAction::InvalidNumber { command },
                },
                _ => PlayerAction::Usage { command },
            },
            _ => return None,
        };
        Some(action)
    }

    fn drop_event(
        &self,
        category: &str,
        detail: &str,
        received_at: Option<DateTime<Utc>>,
    ) -> Option<GameEvent> {
        self.dropped.fetch_add(1, Ordering::Relaxed);
        debug!(category, detail, received_at = ?received_at, "host event dropped");
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn command(name: &str, args: &[&str]) -> HostEvent {
        let world = EntityRef::new();
        HostEvent::Command {
            tick: 7,
            player: EntityRef::new(),
            world,
            position: Location::new(world, 1.0, 64.0, 2.0),
            name: name.to_string(),
            args: args.iter().map(|a| a.to_string()).collect(),
            received_at: Utc::now(),
        }
    }

    #[test]
    fn sethome_parses_into_set_home_with_position() {
        let adapter = EventAdapter::new();
        let event = adapter.adapt(&command("sethome", &["Base"])).expect("event");
        match event {
            GameEvent::PlayerAction {
                tick,
                action: PlayerAction::SetHome { name, location },
                ..
            } => {
                assert_eq!(tick, Tick(7));
                assert_eq!(name, "base");
                assert_eq!(location.x, 1.0);
            }
            other => panic!("unexpected event: {other:?}"),
        }
    }

    #[test]
    fn malformed_arguments_become_usage_actions() {
        let adapter = EventAdapter::new();
        let event = adapter.adapt(&command("home", &[])).expect("event");
        match event {
            GameEvent::PlayerAction {
                action: PlayerAction::Usage { command },
                ..
            } => assert_eq!(command, "home"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(adapter.dropped(), 0);
    }

    #[test]
    fn dgh_aliases_delglobalhome() {
        let adapter = EventAdapter::new();
        let event = adapter.adapt(&command("dgh", &["spawn"])).expect("event");
        assert!(matches!(
            event,
            GameEvent::PlayerAction {
                action: PlayerAction::DeleteGlobalHome { .. },
                ..
            }
        ));
    }

    #[test]
    fn numeric_commands_parse_their_argument() {
        let adapter = EventAdapter::new();

        let limit = adapter
            .adapt(&command("homecount", &["5"]))
            .expect("event");
        assert!(matches!(
            limit,
            GameEvent::PlayerAction {
                action: PlayerAction::SetHomeLimit { value: 5 },
                ..
            }
        ));

        let cooldown = adapter
            .adapt(&command("homecooldown", &["-1"]))
            .expect("event");
        assert!(matches!(
            cooldown,
            GameEvent::PlayerAction {
                action: PlayerAction::SetCooldown { value: -1 },
                ..
            }
        ));
    }

    #[test]
    fn non_numeric_arguments_become_invalid_number_actions() {
        let adapter = EventAdapter::new();
        let event = adapter
            .adapt(&command("homecooldown", &["fast"]))
            .expect("event");
        match event {
            GameEvent::PlayerAction {
                action: PlayerAction::InvalidNumber { command },
                ..
            } => assert_eq!(command, "homecooldown"),
            other => panic!("unexpected event: {other:?}"),
        }
        assert_eq!(adapter.dropped(), 0);
    }

    #[test]
    fn numeric_commands_without_an_argument_become_usage_actions() {
        let adapter = EventAdapter::new();
        let event = adapter.adapt(&command("homecount", &[])).expect("event");
        assert!(matches!(
            event,
            GameEvent::PlayerAction {
                action: PlayerAction::Usage { .. },
                ..
            }
        ));
    }

    #[test]
    fn unknown_commands_and_kinds_are_dropped_and_counted() {
        let adapter = EventAdapter::new();
        assert!(adapter.adapt(&command("fly", &["up"])).is_none());
        assert!(adapter
            .adapt(&HostEvent::Unknown {
                kind: "weather_change".to_string()
            })
            .is_none());
        assert_eq!(adapter.dropped(), 2);
    }

    #[test]
    fn only_permanent_despawns_become_removals() {
        let adapter = EventAdapter::new();
        let entity = EntityRef::new();
        let transient = HostEvent::EntityDespawn {
            tick: 3,
            entity,
            permanent: false,
            received_at: Utc::now(),
        };
        let permanent = HostEvent::EntityDespawn {
            tick: 4,
            entity,
            permanent: true,
            received_at: Utc::now(),
        };

        assert!(adapter.adapt(&transient).is_none());
        assert_eq!(
            adapter.adapt(&permanent),
            Some(GameEvent::EntityRemoved {
                tick: Tick(4),
                entity
            })
        );
        assert_eq!(adapter.dropped(), 1);
    }

    #[test]
    fn ticks_map_to_world_ticks() {
        let adapter = EventAdapter::new();
        let world = EntityRef::new();
        assert_eq!(
            adapter.adapt(&HostEvent::Tick { number: 99, world }),
            Some(GameEvent::WorldTick {
                tick: Tick(99),
                world
            })
        );
    }
}
