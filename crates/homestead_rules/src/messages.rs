//! # Localized Messages
//!
//! Player-facing message catalogs keyed by locale, with `{placeholder}`
//! template substitution. Lookup falls back in two steps: a missing locale
//! falls back to English, and a key missing from a locale falls back to the
//! English entry before giving up with a visible marker.
//!
//! Catalogs are plain serde maps so a host can load its own translations
//! from whatever storage it already owns.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The fallback locale every catalog is expected to carry.
pub const FALLBACK_LOCALE: &str = "en";

/// Locale-keyed message templates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageCatalog {
    locales: BTreeMap<String, BTreeMap<String, String>>,
}

impl MessageCatalog {
    /// An empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in English catalog covering every message the rule engine
    /// emits.
    pub fn default_english() -> Self {
        let mut catalog = Self::new();
        let entries = [
            ("interact.count", "count:{count}"),
            ("home.set", "Home '{home}' set."),
            ("home.deleted", "Home '{home}' deleted."),
            ("home.not_exist", "Home '{home}' does not exist."),
            ("home.teleport", "Teleported to home '{home}'."),
            (
                "home.cooldown",
                "You must wait {time} more ticks before teleporting home.",
            ),
            ("homes.none", "You have no homes set."),
            ("homes.list.header", "Homes ({current}/{max}):"),
            ("homes.list.items", "{homes}"),
            ("homes.limit.reached", "You have reached the home limit of {max}."),
            ("homes.limit.set", "Home limit set to {max}."),
            ("homes.unlimited", "unlimited"),
            ("cooldown.set", "Teleport cooldown set to {time} ticks."),
            ("cooldown.disabled", "Teleport cooldown disabled."),
            ("cooldown.range", "Cooldown must be between -1 and {max} ticks."),
            ("invalid_number", "That is not a valid number."),
            ("globalhome.set", "Global home '{home}' set."),
            ("globalhome.deleted", "Global home '{home}' deleted."),
            ("globalhome.not_exist", "Global home '{home}' does not exist."),
            ("globalhome.teleport", "Teleported to global home '{home}'."),
            ("globalhomes.none", "No global homes set."),
            ("globalhomes.list.header", "Global homes:"),
            ("globalhomes.list.items", "{homes}"),
            ("no_permission", "You do not have permission to do that."),
            ("usage.sethome", "Usage: /sethome <name>"),
            ("usage.delhome", "Usage: /delhome <name>"),
            ("usage.home", "Usage: /home <name>"),
            ("usage.setglobalhome", "Usage: /setglobalhome <name>"),
            ("usage.globalhome", "Usage: /globalhome <name>"),
            ("usage.delglobalhome", "Usage: /delglobalhome <name>"),
            ("usage.homecount", "Usage: /homecount <max>"),
            ("usage.homecooldown", "Usage: /homecooldown <ticks>"),
        ];
        for (key, template) in entries {
            catalog.insert(FALLBACK_LOCALE, key, template);
        }
        catalog
    }

    /// Inserts or replaces a template.
    pub fn insert(&mut self, locale: &str, key: &str, template: &str) {
        self.locales
            .entry(locale.to_string())
            .or_default()
            .insert(key.to_string(), template.to_string());
    }

    /// Raw template lookup with the locale/key fallback chain.
    fn template(&self, locale: &str, key: &str) -> Option<&str> {
        self.locales
            .get(locale)
            .and_then(|catalog| catalog.get(key))
            .or_else(|| {
                self.locales
                    .get(FALLBACK_LOCALE)
                    .and_then(|catalog| catalog.get(key))
            })
            .map(String::as_str)
    }

    /// Renders the message for `key` in `locale`, substituting each
    /// `{placeholder}` from `args`. A key missing everywhere renders as a
    /// visible marker rather than an empty string.
    pub fn render(&self, locale: &str, key: &str, args: &[(&str, String)]) -> String {
        let Some(template) = self.template(locale, key) else {
            return format!("missing message: {key}");
        };
        let mut message = template.to_string();
        for (name, value) in args {
            message = message.replace(&format!("{{{name}}}"), value);
        }
        message
    }
}
