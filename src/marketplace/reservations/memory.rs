//! In-memory collaborator implementations backing the demo wiring and tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::audit::{ActivityEvent, ActivityLog};
use super::domain::{
    Reservation, ReservationId, ReservationStatus, Resource, ResourceId, UserId,
};
use super::repository::{
    FeatureError, FeatureService, IdentityError, IdentityProvider, ReservationStore,
    ResourceStore, StoreError, UserAccount,
};

#[derive(Default, Clone)]
pub struct MemoryResourceStore {
    resources: Arc<Mutex<HashMap<ResourceId, Resource>>>,
}

impl MemoryResourceStore {
    pub fn insert(&self, resource: Resource) {
        let mut guard = self.resources.lock().expect("resource store mutex poisoned");
        guard.insert(resource.id.clone(), resource);
    }

    pub fn get_sync(&self, id: &ResourceId) -> Option<Resource> {
        let guard = self.resources.lock().expect("resource store mutex poisoned");
        guard.get(id).cloned()
    }
}

#[async_trait]
impl ResourceStore for MemoryResourceStore {
    async fn get(&self, id: &ResourceId) -> Result<Option<Resource>, StoreError> {
        let guard = self.resources.lock().expect("resource store mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    async fn increment_reservation_count(&self, id: &ResourceId) -> Result<(), StoreError> {
        let mut guard = self.resources.lock().expect("resource store mutex poisoned");
        let resource = guard
            .get_mut(id)
            .ok_or_else(|| StoreError::Rejected(format!("unknown resource {}", id.0)))?;
        resource.reservation_count += 1;
        Ok(())
    }
}

#[derive(Default, Clone)]
pub struct MemoryReservationStore {
    records: Arc<Mutex<HashMap<ReservationId, Reservation>>>,
}

impl MemoryReservationStore {
    pub fn insert(&self, reservation: Reservation) {
        let mut guard = self.records.lock().expect("reservation store mutex poisoned");
        guard.insert(reservation.id.clone(), reservation);
    }

    pub fn get_sync(&self, id: &ReservationId) -> Option<Reservation> {
        let guard = self.records.lock().expect("reservation store mutex poisoned");
        guard.get(id).cloned()
    }

    pub fn len(&self) -> usize {
        let guard = self.records.lock().expect("reservation store mutex poisoned");
        guard.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn is_live(reservation: &Reservation) -> bool {
    reservation.enabled
        && matches!(
            reservation.status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        )
}

#[async_trait]
impl ReservationStore for MemoryReservationStore {
    async fn create(&self, reservation: Reservation) -> Result<Reservation, StoreError> {
        let mut guard = self.records.lock().expect("reservation store mutex poisoned");
        if guard.contains_key(&reservation.id) {
            return Err(StoreError::Rejected(format!(
                "reservation {} already exists",
                reservation.id.0
            )));
        }
        guard.insert(reservation.id.clone(), reservation.clone());
        Ok(reservation)
    }

    async fn list_candidates(
        &self,
        resource_id: &ResourceId,
        limit: usize,
    ) -> Result<Vec<Reservation>, StoreError> {
        let guard = self.records.lock().expect("reservation store mutex poisoned");
        Ok(guard
            .values()
            .filter(|reservation| &reservation.resource_id == resource_id)
            .filter(|reservation| is_live(reservation))
            .take(limit)
            .cloned()
            .collect())
    }

    async fn find_replay(
        &self,
        resource_id: &ResourceId,
        guest_id: &UserId,
        external_ref: &str,
    ) -> Result<Option<Reservation>, StoreError> {
        let guard = self.records.lock().expect("reservation store mutex poisoned");
        Ok(guard
            .values()
            .find(|reservation| {
                &reservation.resource_id == resource_id
                    && &reservation.guest_id == guest_id
                    && reservation.status == ReservationStatus::Pending
                    && reservation.enabled
                    && reservation.external_ref.as_deref() == Some(external_ref)
            })
            .cloned())
    }

    async fn count_active_since(
        &self,
        owner_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError> {
        let guard = self.records.lock().expect("reservation store mutex poisoned");
        Ok(guard
            .values()
            .filter(|reservation| &reservation.owner_id == owner_id)
            .filter(|reservation| is_live(reservation))
            .filter(|reservation| reservation.created_at >= since)
            .count() as u64)
    }
}

#[derive(Default, Clone)]
pub struct MemoryIdentityProvider {
    accounts: Arc<Mutex<HashMap<UserId, UserAccount>>>,
}

impl MemoryIdentityProvider {
    pub fn insert(&self, id: UserId, account: UserAccount) {
        let mut guard = self.accounts.lock().expect("identity mutex poisoned");
        guard.insert(id, account);
    }
}

#[async_trait]
impl IdentityProvider for MemoryIdentityProvider {
    async fn get_user(&self, id: &UserId) -> Result<Option<UserAccount>, IdentityError> {
        let guard = self.accounts.lock().expect("identity mutex poisoned");
        Ok(guard.get(id).cloned())
    }
}

/// Feature service where every module is enabled unless explicitly disabled
/// and numeric limits fall back to their defaults unless overridden.
#[derive(Default, Clone)]
pub struct MemoryFeatureService {
    disabled_modules: Arc<Mutex<Vec<String>>>,
    limits: Arc<Mutex<HashMap<String, u64>>>,
}

impl MemoryFeatureService {
    pub fn disable_module(&self, key: &str) {
        let mut guard = self.disabled_modules.lock().expect("feature mutex poisoned");
        guard.push(key.to_string());
    }

    pub fn set_limit(&self, key: &str, limit: u64) {
        let mut guard = self.limits.lock().expect("feature mutex poisoned");
        guard.insert(key.to_string(), limit);
    }
}

#[async_trait]
impl FeatureService for MemoryFeatureService {
    async fn require_module(&self, key: &str) -> Result<(), FeatureError> {
        let guard = self.disabled_modules.lock().expect("feature mutex poisoned");
        if guard.iter().any(|module| module == key) {
            return Err(FeatureError::ModuleDisabled {
                module: key.to_string(),
            });
        }
        Ok(())
    }

    async fn numeric_limit(&self, key: &str, default: u64) -> u64 {
        let guard = self.limits.lock().expect("feature mutex poisoned");
        guard.get(key).copied().unwrap_or(default)
    }
}

/// Activity sink collecting events for assertions.
#[derive(Default, Clone)]
pub struct RecordingActivityLog {
    events: Arc<Mutex<Vec<ActivityEvent>>>,
}

impl RecordingActivityLog {
    pub fn events(&self) -> Vec<ActivityEvent> {
        self.events.lock().expect("activity mutex poisoned").clone()
    }
}

impl ActivityLog for RecordingActivityLog {
    fn append(&self, event: ActivityEvent) {
        let mut guard = self.events.lock().expect("activity mutex poisoned");
        guard.push(event);
    }
}
