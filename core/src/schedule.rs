//! Trigger gating — pure functions of the current instant.
//!
//! Two fixed weekly slots, each live only in even ISO weeks. Week numbering
//! is computed at UTC+3, the report's home timezone, so a Sunday-night UTC
//! instant already counts as the following Monday's week. The net effect is
//! one sync and one notification every 14 days.

use chrono::{DateTime, Datelike, FixedOffset, Timelike, Utc, Weekday};

const REPORT_TZ_SECS: i32 = 3 * 3600;

/// Sync slot: Sunday 21:01 UTC — Monday 00:01 in the reporting timezone.
pub const SYNC_SLOT: WeeklySlot = WeeklySlot {
    weekday: Weekday::Sun,
    hour: 21,
    minute: 1,
};

/// Notify slot: Monday 06:30 UTC — 09:30 in the reporting timezone.
pub const NOTIFY_SLOT: WeeklySlot = WeeklySlot {
    weekday: Weekday::Mon,
    hour: 6,
    minute: 30,
};

/// ISO week number of `now`, evaluated in the reporting timezone.
pub fn iso_week_in_report_tz(now: DateTime<Utc>) -> u32 {
    let tz = FixedOffset::east_opt(REPORT_TZ_SECS).expect("static in-range offset");
    now.with_timezone(&tz).iso_week().week()
}

/// The alternating-week gate: slots only fire in even ISO weeks.
pub fn is_even_week(now: DateTime<Utc>) -> bool {
    iso_week_in_report_tz(now) % 2 == 0
}

/// A fixed weekly time slot, expressed in UTC.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeeklySlot {
    pub weekday: Weekday,
    pub hour: u32,
    pub minute: u32,
}

impl WeeklySlot {
    /// True for the whole of the slot's minute.
    pub fn matches(&self, now: DateTime<Utc>) -> bool {
        now.weekday() == self.weekday && now.hour() == self.hour && now.minute() == self.minute
    }

    /// The full gate: slot minute reached, in an even ISO week.
    pub fn should_run(&self, now: DateTime<Utc>) -> bool {
        self.matches(now) && is_even_week(now)
    }
}
