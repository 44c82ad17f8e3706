//! Unit tests for review requests and the review lifecycle.

mod decision_tests;
mod state_tests;
mod transition_tests;

use chrono::{DateTime, Local, TimeZone, Utc};
use mockable::Clock;

/// Clock frozen at one instant.
pub(super) struct FixedClock(pub DateTime<Utc>);

impl Clock for FixedClock {
    fn local(&self) -> DateTime<Local> {
        self.0.with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        self.0
    }
}

/// Returns a timestamp `minutes` after a fixed base.
pub(super) fn at(minutes: i64) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0)
        .single()
        .map(|base| base + chrono::Duration::minutes(minutes))
        .unwrap_or_else(|| panic!("fixed base timestamp should be valid"))
}
