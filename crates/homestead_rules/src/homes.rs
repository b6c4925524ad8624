//! # Homes Helpers
//!
//! Pure helpers behind the homes mechanics: home-count limits, teleport
//! cooldown arithmetic, and deterministic list formatting. Kept free of any
//! store or host access so the rule engine stays a pure function of
//! (event, state view).

use homestead_core::{StateRecord, Tick};

/// Cancellation tag for the scheduled cooldown-expiry follow-up.
pub const COOLDOWN_TAG: &str = "cooldown";

/// Upper bound an operator may set the cooldown to at runtime: 60 seconds
/// at 20 ticks per second.
pub const MAX_COOLDOWN_TICKS: i64 = 1200;

/// Whether setting another home would exceed the configured limit.
///
/// A negative `max_homes` means unlimited, matching the config convention.
pub fn home_limit_reached(max_homes: i64, record: &StateRecord) -> bool {
    max_homes >= 0 && record.homes.len() as i64 >= max_homes
}

/// Remaining cooldown ticks at `now`, or `None` when no cooldown is active.
pub fn remaining_cooldown(record: &StateRecord, now: Tick) -> Option<u64> {
    match record.cooldown_until {
        Some(until) if until > now => Some(now.until(until)),
        _ => None,
    }
}

/// Comma-separated home names in deterministic (sorted) order.
pub fn format_home_list(record: &StateRecord) -> String {
    record
        .homes
        .keys()
        .cloned()
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use homestead_core::{EntityRef, Location};

    fn record_with_homes(names: &[&str]) -> StateRecord {
        let world = EntityRef::new();
        let mut record = StateRecord::new(Tick(0));
        for name in names {
            record
                .homes
                .insert(name.to_string(), Location::new(world, 0.0, 64.0, 0.0));
        }
        record
    }

    #[test]
    fn negative_limit_means_unlimited() {
        let record = record_with_homes(&["a", "b", "c"]);
        assert!(!home_limit_reached(-1, &record));
        assert!(home_limit_reached(3, &record));
        assert!(!home_limit_reached(4, &record));
    }

    #[test]
    fn zero_limit_blocks_the_first_home() {
        let record = record_with_homes(&[]);
        assert!(home_limit_reached(0, &record));
    }

    #[test]
    fn cooldown_reports_remaining_ticks_then_clears() {
        let mut record = StateRecord::new(Tick(0));
        record.cooldown_until = Some(Tick(20));
        assert_eq!(remaining_cooldown(&record, Tick(12)), Some(8));
        assert_eq!(remaining_cooldown(&record, Tick(20)), None);
        assert_eq!(remaining_cooldown(&record, Tick(25)), None);
    }

    #[test]
    fn home_list_is_sorted_and_comma_separated() {
        let record = record_with_homes(&["mine", "base", "farm"]);
        assert_eq!(format_home_list(&record), "base, farm, mine");
    }
}
