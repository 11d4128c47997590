use chrono::{DateTime, Utc};
use tracing::warn;

use super::domain::{PaymentStatus, Reservation, ReservationStatus, ResourceId, UserId};
use super::hold::still_blocks;
use super::repository::ReservationStore;

/// External reference recorded for a client-supplied idempotency token.
pub fn client_ref(token: &str) -> String {
    format!("client:{token}")
}

/// Resolve a retried submission to its still-valid pending reservation.
///
/// Without a token this always resolves to nothing; idempotency is opt-in per
/// request. A stored match must be pending, unpaid, enabled, and still within
/// its hold at `now` — an expired hold is not reusable and the caller falls
/// through to create a fresh reservation. Store failures degrade to "no match"
/// so a transient read error costs at worst a double submission, never a hard
/// failure.
pub async fn resolve_replay<S>(
    store: &S,
    resource_id: &ResourceId,
    guest_id: &UserId,
    token: Option<&str>,
    now: DateTime<Utc>,
) -> Option<Reservation>
where
    S: ReservationStore + ?Sized,
{
    let token = token?.trim();
    if token.is_empty() {
        return None;
    }

    let external_ref = client_ref(token);
    let existing = match store.find_replay(resource_id, guest_id, &external_ref).await {
        Ok(found) => found?,
        Err(err) => {
            warn!(
                resource = %resource_id.0,
                error = %err,
                "idempotency lookup failed, treating as no match"
            );
            return None;
        }
    };

    let reusable = existing.status == ReservationStatus::Pending
        && existing.payment_status == PaymentStatus::Unpaid
        && existing.enabled
        && still_blocks(existing.status, existing.hold_expires_at.as_ref(), now);

    reusable.then_some(existing)
}
