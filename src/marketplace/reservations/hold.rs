use chrono::{DateTime, Utc};

use super::domain::{HoldExpiry, ReservationStatus};

/// Whether a reservation still occupies its window at `now`.
///
/// Confirmed reservations always block. Pending reservations block while their
/// hold has not expired; a pending reservation with a missing or unparseable
/// expiry blocks too, since treating malformed data as free would silently
/// allow a double-booking. Every other status has released its window.
pub fn still_blocks(
    status: ReservationStatus,
    hold_expires_at: Option<&HoldExpiry>,
    now: DateTime<Utc>,
) -> bool {
    match status {
        ReservationStatus::Confirmed => true,
        ReservationStatus::Pending => match hold_expires_at.and_then(HoldExpiry::instant) {
            Some(expires_at) => expires_at > now,
            None => true,
        },
        ReservationStatus::Completed
        | ReservationStatus::Cancelled
        | ReservationStatus::Expired => false,
    }
}
