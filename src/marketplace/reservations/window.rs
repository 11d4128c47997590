use chrono::{DateTime, Duration, NaiveTime, Utc};

use super::domain::BookingShape;

/// Half-open interval `[start, end)` in absolute time occupied by a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BookingWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl BookingWindow {
    /// Half-open overlap test. An exact boundary touch (`self.end == other.start`)
    /// is not an overlap, which is what makes back-to-back bookings possible.
    pub fn overlaps(&self, other: &BookingWindow) -> bool {
        self.start < other.end && self.end > other.start
    }
}

/// Errors raised while normalizing a booking's raw temporal fields.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum WindowError {
    #[error("booking must end after it starts")]
    EmptyInterval,
}

/// Resolve a booking shape into its buffer-padded absolute window.
///
/// Date-range endpoints anchor to UTC midnight. The buffer pads both endpoints
/// independently; a zero buffer yields the raw interval. The same resolution is
/// applied to incoming requests and to existing reservations, always with the
/// resource's buffer value at evaluation time (current-state-wins).
pub fn resolve_window(
    shape: &BookingShape,
    buffer_minutes: i64,
) -> Result<BookingWindow, WindowError> {
    let (start, end) = match shape {
        BookingShape::DateRange {
            check_in,
            check_out,
        } => (
            check_in.and_time(NaiveTime::MIN).and_utc(),
            check_out.and_time(NaiveTime::MIN).and_utc(),
        ),
        BookingShape::TimeSlot { starts_at, ends_at } => (*starts_at, *ends_at),
    };

    if end <= start {
        return Err(WindowError::EmptyInterval);
    }

    let buffer = Duration::minutes(buffer_minutes.max(0));
    Ok(BookingWindow {
        start: start - buffer,
        end: end + buffer,
    })
}
