use chrono::Duration;

use super::common::*;
use crate::marketplace::reservations::domain::BookingShape;
use crate::marketplace::reservations::window::{resolve_window, WindowError};

#[test]
fn date_range_resolves_to_utc_midnights() {
    let window = resolve_window(&march_stay(), 0).expect("window resolves");
    assert_eq!(window.start, instant(2025, 3, 1, 0, 0));
    assert_eq!(window.end, instant(2025, 3, 4, 0, 0));
}

#[test]
fn buffer_pads_both_endpoints_independently() {
    let window = resolve_window(&march_stay(), 30).expect("window resolves");
    assert_eq!(window.start, instant(2025, 2, 28, 23, 30));
    assert_eq!(window.end, instant(2025, 3, 4, 0, 30));
}

#[test]
fn negative_buffer_is_treated_as_zero() {
    let padded = resolve_window(&march_stay(), -15).expect("window resolves");
    let raw = resolve_window(&march_stay(), 0).expect("window resolves");
    assert_eq!(padded, raw);
}

#[test]
fn time_slot_keeps_raw_timestamps_with_zero_buffer() {
    let shape = BookingShape::TimeSlot {
        starts_at: instant(2025, 6, 10, 14, 0),
        ends_at: instant(2025, 6, 10, 16, 0),
    };
    let window = resolve_window(&shape, 0).expect("window resolves");
    assert_eq!(window.end - window.start, Duration::hours(2));
}

#[test]
fn inverted_interval_is_rejected() {
    let shape = BookingShape::TimeSlot {
        starts_at: instant(2025, 6, 10, 16, 0),
        ends_at: instant(2025, 6, 10, 14, 0),
    };
    assert_eq!(resolve_window(&shape, 0), Err(WindowError::EmptyInterval));
}

#[test]
fn empty_interval_is_rejected() {
    let shape = BookingShape::DateRange {
        check_in: date(2025, 3, 1),
        check_out: date(2025, 3, 1),
    };
    assert_eq!(resolve_window(&shape, 0), Err(WindowError::EmptyInterval));
}

#[test]
fn boundary_touch_is_not_an_overlap() {
    let first = resolve_window(&march_stay(), 0).expect("window resolves");
    let second = resolve_window(
        &BookingShape::DateRange {
            check_in: date(2025, 3, 4),
            check_out: date(2025, 3, 6),
        },
        0,
    )
    .expect("window resolves");

    assert_eq!(first.end, second.start);
    assert!(!first.overlaps(&second));
    assert!(!second.overlaps(&first));
}
