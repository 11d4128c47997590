use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{Reservation, ReservationId};
use super::hold::still_blocks;
use super::window::{resolve_window, BookingWindow};

/// Scan candidate reservations for one that still blocks the incoming window.
///
/// Candidates are expected pre-filtered to live statuses (pending/confirmed,
/// enabled) by the store query; each one is re-checked against the hold rules
/// before its window is resolved with the resource's *current* buffer. Returns
/// the first conflicting reservation id, short-circuiting on match. Linear in
/// the candidate count, no ordering requirement.
pub fn first_conflict(
    incoming: &BookingWindow,
    candidates: &[Reservation],
    buffer_minutes: i64,
    now: DateTime<Utc>,
) -> Option<ReservationId> {
    for candidate in candidates {
        if !still_blocks(candidate.status, candidate.hold_expires_at.as_ref(), now) {
            continue;
        }

        let existing = match resolve_window(&candidate.shape, buffer_minutes) {
            Ok(window) => window,
            Err(err) => {
                // A stored row with an unresolvable window cannot be compared;
                // skipping it beats wedging the whole resource on bad data.
                warn!(
                    reservation = %candidate.id.0,
                    error = %err,
                    "skipping candidate with unresolvable window"
                );
                continue;
            }
        };

        if existing.overlaps(incoming) {
            return Some(candidate.id.clone());
        }
    }

    None
}
