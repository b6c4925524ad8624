//! # Homestead Host Boundary
//!
//! Everything that faces the host runtime: the event adapter that turns raw
//! callbacks into internal events, the effect dispatcher that applies
//! decisions back through the narrow [`HostApi`] trait, the delayed-event
//! scheduler, and the [`Core`] driver that wires the whole loop together on
//! the host's tick thread.
//!
//! ## Embedding
//!
//! ```rust,no_run
//! use homestead_host::{Core, HostApi, HostApiError, HostEvent};
//! use homestead_core::{EntityRef, EntityMutation};
//! use homestead_rules::RuleSettings;
//!
//! struct MyServer;
//!
//! impl HostApi for MyServer {
//!     fn send_message(&self, _entity: EntityRef, _message: &str) -> Result<(), HostApiError> {
//!         // deliver through the real server
//!         Ok(())
//!     }
//!     fn mutate_entity(
//!         &self,
//!         _entity: EntityRef,
//!         _mutation: &EntityMutation,
//!     ) -> Result<(), HostApiError> {
//!         Ok(())
//!     }
//! }
//!
//! let mut core = Core::new(RuleSettings::default(), MyServer);
//! // For every subscribed callback, on the tick thread:
//! // core.handle_host_event(&host_event);
//! ```
//!
//! The host registers one adapter callback per subscribed event kind at
//! start-up and calls [`Core::handle_host_event`] synchronously from its
//! tick thread; tick callbacks additionally fire any due delayed events.

pub mod adapter;
pub mod config;
pub mod dispatch;
pub mod logging;
pub mod runtime;
pub mod scheduler;

pub use adapter::{EventAdapter, HostEvent};
pub use config::{ConfigError, LoggingSettings, PluginConfig};
pub use dispatch::{BatchOutcome, DispatchError, EffectDispatcher, HostApi, HostApiError};
pub use logging::setup_logging;
pub use runtime::Core;
pub use scheduler::TickScheduler;
