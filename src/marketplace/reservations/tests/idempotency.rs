use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

use super::common::*;
use crate::marketplace::reservations::domain::{
    HoldExpiry, PaymentStatus, Reservation, ResourceId, UserId,
};
use crate::marketplace::reservations::idempotency::{client_ref, resolve_replay};
use crate::marketplace::reservations::memory::MemoryReservationStore;
use crate::marketplace::reservations::repository::{ReservationStore, StoreError};

#[test]
fn client_ref_prefixes_token() {
    assert_eq!(client_ref("abc-123"), "client:abc-123");
}

#[tokio::test]
async fn no_token_resolves_to_nothing() {
    let store = MemoryReservationStore::default();
    store.insert(replayable_reservation("rsv-a", "tok", march_stay()));

    let hit = resolve_replay(&store, &resource_id(), &guest_id(), None, Utc::now()).await;
    assert!(hit.is_none());
}

#[tokio::test]
async fn blank_token_resolves_to_nothing() {
    let store = MemoryReservationStore::default();
    let hit = resolve_replay(&store, &resource_id(), &guest_id(), Some("  "), Utc::now()).await;
    assert!(hit.is_none());
}

#[tokio::test]
async fn live_pending_match_is_reused() {
    let store = MemoryReservationStore::default();
    let stored = replayable_reservation("rsv-a", "tok", march_stay());
    store.insert(stored.clone());

    let hit = resolve_replay(&store, &resource_id(), &guest_id(), Some("tok"), Utc::now()).await;
    assert_eq!(hit.map(|reservation| reservation.id), Some(stored.id));
}

#[tokio::test]
async fn expired_hold_is_not_reusable() {
    let store = MemoryReservationStore::default();
    let mut stored = replayable_reservation("rsv-a", "tok", march_stay());
    stored.hold_expires_at = Some(HoldExpiry::At(Utc::now() - Duration::seconds(1)));
    store.insert(stored);

    let hit = resolve_replay(&store, &resource_id(), &guest_id(), Some("tok"), Utc::now()).await;
    assert!(hit.is_none());
}

#[tokio::test]
async fn paid_reservation_is_not_reusable() {
    let store = MemoryReservationStore::default();
    let mut stored = replayable_reservation("rsv-a", "tok", march_stay());
    stored.payment_status = PaymentStatus::Paid;
    store.insert(stored);

    let hit = resolve_replay(&store, &resource_id(), &guest_id(), Some("tok"), Utc::now()).await;
    assert!(hit.is_none());
}

#[tokio::test]
async fn other_guests_token_does_not_match() {
    let store = MemoryReservationStore::default();
    store.insert(replayable_reservation("rsv-a", "tok", march_stay()));

    let other = UserId("someone-else".to_string());
    let hit = resolve_replay(&store, &resource_id(), &other, Some("tok"), Utc::now()).await;
    assert!(hit.is_none());
}

struct FailingStore;

#[async_trait]
impl ReservationStore for FailingStore {
    async fn create(&self, _reservation: Reservation) -> Result<Reservation, StoreError> {
        Err(StoreError::Unavailable("create offline".to_string()))
    }

    async fn list_candidates(
        &self,
        _resource_id: &ResourceId,
        _limit: usize,
    ) -> Result<Vec<Reservation>, StoreError> {
        Err(StoreError::Unavailable("list offline".to_string()))
    }

    async fn find_replay(
        &self,
        _resource_id: &ResourceId,
        _guest_id: &UserId,
        _external_ref: &str,
    ) -> Result<Option<Reservation>, StoreError> {
        Err(StoreError::Unavailable("lookup offline".to_string()))
    }

    async fn count_active_since(
        &self,
        _owner_id: &UserId,
        _since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        Err(StoreError::Unavailable("count offline".to_string()))
    }
}

#[tokio::test]
async fn store_failure_degrades_to_no_match() {
    let hit = resolve_replay(
        &FailingStore,
        &resource_id(),
        &guest_id(),
        Some("tok"),
        Utc::now(),
    )
    .await;
    assert!(hit.is_none());
}
