use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{Reservation, Resource, ResourceId, UserId};

/// Error enumeration for document store failures.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("document rejected: {0}")]
    Rejected(String),
}

/// Read side of the resource catalog plus the single counter write-back.
#[async_trait]
pub trait ResourceStore: Send + Sync {
    async fn get(&self, id: &ResourceId) -> Result<Option<Resource>, StoreError>;

    /// Bump the resource's reservation counter after a successful admission.
    /// Issued as a separate write after reservation creation; not atomic with it.
    async fn increment_reservation_count(&self, id: &ResourceId) -> Result<(), StoreError>;
}

/// Reservation collection access used during admission.
#[async_trait]
pub trait ReservationStore: Send + Sync {
    async fn create(&self, reservation: Reservation) -> Result<Reservation, StoreError>;

    /// Live conflict candidates for a resource: `status IN (pending, confirmed)`
    /// and `enabled`, capped at `limit` documents.
    async fn list_candidates(
        &self,
        resource_id: &ResourceId,
        limit: usize,
    ) -> Result<Vec<Reservation>, StoreError>;

    /// Find a reservation carrying the given idempotency reference for this
    /// resource and guest, restricted to pending/unpaid/enabled documents.
    async fn find_replay(
        &self,
        resource_id: &ResourceId,
        guest_id: &UserId,
        external_ref: &str,
    ) -> Result<Option<Reservation>, StoreError>;

    /// Count an owner's live reservations created at or after `since`.
    async fn count_active_since(
        &self,
        owner_id: &UserId,
        since: DateTime<Utc>,
    ) -> Result<u64, StoreError>;
}

/// Authenticated account snapshot from the identity provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserAccount {
    pub email: Option<String>,
    pub email_verified: bool,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// Identity provider lookup failure.
#[derive(Debug, thiserror::Error)]
pub enum IdentityError {
    #[error("identity provider unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait IdentityProvider: Send + Sync {
    async fn get_user(&self, id: &UserId) -> Result<Option<UserAccount>, IdentityError>;
}

/// Typed signals from the feature-flag/entitlement service.
#[derive(Debug, thiserror::Error)]
pub enum FeatureError {
    #[error("module '{module}' is disabled")]
    ModuleDisabled { module: String },
    #[error("limit '{key}' exceeded (limit {limit})")]
    LimitExceeded { key: String, limit: u64 },
    #[error("feature service unavailable: {0}")]
    Unavailable(String),
}

/// Feature-flag and numeric-limit contract consumed by the orchestrator.
/// The decision logic behind each flag lives with the external service.
#[async_trait]
pub trait FeatureService: Send + Sync {
    /// Resolve to `Ok(())` when the module is enabled, `ModuleDisabled` otherwise.
    async fn require_module(&self, key: &str) -> Result<(), FeatureError>;

    async fn numeric_limit(&self, key: &str, default: u64) -> u64;

    /// Raise `LimitExceeded` when `current` has reached the configured limit.
    async fn assert_limit_not_exceeded(
        &self,
        key: &str,
        default: u64,
        current: u64,
    ) -> Result<(), FeatureError> {
        let limit = self.numeric_limit(key, default).await;
        if current >= limit {
            return Err(FeatureError::LimitExceeded {
                key: key.to_string(),
                limit,
            });
        }
        Ok(())
    }
}
