//! Tests for the trigger gate.
//!
//! ISO weeks are numbered in the reporting timezone (UTC+3), which matters
//! precisely at the Sunday-night sync slot: 21:01 UTC is already Monday
//! there, so the slot instant belongs to the *following* ISO week.

use chrono::{DateTime, TimeZone, Utc};
use debtsync_core::schedule::{is_even_week, iso_week_in_report_tz, NOTIFY_SLOT, SYNC_SLOT};

fn at(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

// ─────────────────────────────────────────────────────────────────────────────
// Week numbering
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn week_number_is_computed_in_report_tz() {
    // Sunday 2025-01-05 21:01 UTC is Monday 00:01 UTC+3 → ISO week 2.
    assert_eq!(iso_week_in_report_tz(at(2025, 1, 5, 21, 1)), 2);
    // Earlier the same UTC day it is still Sunday in UTC+3 → ISO week 1.
    assert_eq!(iso_week_in_report_tz(at(2025, 1, 5, 12, 0)), 1);
}

#[test]
fn even_week_gate() {
    assert!(is_even_week(at(2025, 1, 6, 12, 0))); // week 2
    assert!(!is_even_week(at(2024, 12, 30, 12, 0))); // week 1
}

// ─────────────────────────────────────────────────────────────────────────────
// Sync slot: Sunday 21:01 UTC
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn sync_slot_fires_in_even_weeks_only() {
    // 2025-01-05 is a Sunday; 21:01 UTC lands in week 2 (even).
    assert!(SYNC_SLOT.should_run(at(2025, 1, 5, 21, 1)));

    // 2024-12-29 is a Sunday; 21:01 UTC lands in week 1 (odd). The slot
    // minute matches but the gate holds it back.
    let odd_week = at(2024, 12, 29, 21, 1);
    assert!(SYNC_SLOT.matches(odd_week));
    assert!(!SYNC_SLOT.should_run(odd_week));
}

#[test]
fn sync_slot_matches_exactly_one_minute() {
    assert!(!SYNC_SLOT.matches(at(2025, 1, 5, 21, 2)));
    assert!(!SYNC_SLOT.matches(at(2025, 1, 5, 20, 1)));
    assert!(!SYNC_SLOT.matches(at(2025, 1, 4, 21, 1))); // Saturday
}

// ─────────────────────────────────────────────────────────────────────────────
// Notify slot: Monday 06:30 UTC
// ─────────────────────────────────────────────────────────────────────────────

#[test]
fn notify_slot_fires_in_even_weeks_only() {
    assert!(NOTIFY_SLOT.should_run(at(2025, 1, 6, 6, 30))); // week 2
    assert!(!NOTIFY_SLOT.should_run(at(2024, 12, 30, 6, 30))); // week 1
}

#[test]
fn slots_are_independent() {
    // The notify instant never triggers the sync slot and vice versa.
    assert!(!SYNC_SLOT.matches(at(2025, 1, 6, 6, 30)));
    assert!(!NOTIFY_SLOT.matches(at(2025, 1, 5, 21, 1)));
}
