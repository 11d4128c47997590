use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Datelike, Duration, TimeZone, Utc};
use rust_decimal::Decimal;
use tracing::{debug, error, warn};

use super::audit::{ActivityEvent, ActivityLog};
use super::availability::first_conflict;
use super::domain::{
    BookingShape, ContactSnapshot, HoldExpiry, PaymentStatus, Reservation, ReservationId,
    ReservationStatus, Resource, ResourceId, UserId,
};
use super::idempotency::{client_ref, resolve_replay};
use super::pricing::{price_booking, validated_nights, PricingError, Quote};
use super::repository::{
    FeatureError, FeatureService, IdentityError, IdentityProvider, ReservationStore,
    ResourceStore, StoreError, UserAccount,
};
use super::taxonomy::{CommercialTaxonomy, MARKETPLACE_MODULE, PAYMENTS_MODULE};
use super::window::{resolve_window, WindowError};

/// Tunables for the admission lifecycle.
#[derive(Debug, Clone)]
pub struct AdmissionSettings {
    /// Minutes a fresh pending reservation holds its window.
    pub hold_minutes: i64,
    /// Page size for the conflict-candidate listing. Matches the store cap;
    /// resources with more live reservations than this can miss conflicts.
    pub candidate_page_limit: usize,
    /// Limit key consulted for the owner's monthly active-reservation cap.
    pub monthly_quota_key: String,
    /// Fallback when the feature service has no value for the quota key.
    pub monthly_quota_default: u64,
}

impl Default for AdmissionSettings {
    fn default() -> Self {
        Self {
            hold_minutes: 30,
            candidate_page_limit: 100,
            monthly_quota_key: "reservations.monthly_active".to_string(),
            monthly_quota_default: 200,
        }
    }
}

/// One booking request as it reaches the orchestrator.
#[derive(Debug, Clone)]
pub struct AdmissionRequest {
    /// Authenticated guest, when the transport supplied one.
    pub guest_id: Option<UserId>,
    pub resource_id: ResourceId,
    pub shape: BookingShape,
    pub guest_count: u32,
    pub currency: Option<String>,
    pub fees_amount: Option<Decimal>,
    pub tax_amount: Option<Decimal>,
    pub idempotency_token: Option<String>,
}

/// Result of a successful admission.
#[derive(Debug, Clone)]
pub struct AdmissionOutcome {
    pub reservation: Reservation,
    pub nights: u32,
    /// True when an idempotent replay resolved to an existing reservation.
    pub reused: bool,
}

/// User-facing admission error taxonomy. Exactly one of these (or success)
/// per request; unexpected collaborator failures collapse to `Internal`
/// after logging, never leaking detail to the caller.
#[derive(Debug, thiserror::Error)]
pub enum AdmissionError {
    #[error("authentication required")]
    AuthRequired,
    #[error("{0}")]
    Validation(String),
    #[error("resource not found")]
    NotFound,
    #[error("resource is not open for reservations")]
    ResourceUnavailable,
    #[error("module '{module}' is disabled")]
    ModuleDisabled { module: String },
    #[error("limit '{key}' exceeded (limit {limit})")]
    LimitExceeded { key: String, limit: u64 },
    #[error("requested window is no longer available")]
    Conflict,
    #[error("resource misconfigured: {0}")]
    Configuration(String),
    #[error("internal error")]
    Internal,
}

impl AdmissionError {
    /// Stable machine-readable code for API payloads.
    pub const fn code(&self) -> &'static str {
        match self {
            AdmissionError::AuthRequired => "auth_required",
            AdmissionError::Validation(_) => "validation_error",
            AdmissionError::NotFound => "not_found",
            AdmissionError::ResourceUnavailable => "resource_unavailable",
            AdmissionError::ModuleDisabled { .. } => "module_disabled",
            AdmissionError::LimitExceeded { .. } => "limit_exceeded",
            AdmissionError::Conflict => "conflict",
            AdmissionError::Configuration(_) => "configuration_error",
            AdmissionError::Internal => "internal_error",
        }
    }

    fn from_store(err: StoreError) -> Self {
        error!(error = %err, "document store failure during admission");
        AdmissionError::Internal
    }

    fn from_identity(err: IdentityError) -> Self {
        error!(error = %err, "identity provider failure during admission");
        AdmissionError::Internal
    }
}

impl From<FeatureError> for AdmissionError {
    fn from(err: FeatureError) -> Self {
        match err {
            FeatureError::ModuleDisabled { module } => AdmissionError::ModuleDisabled { module },
            FeatureError::LimitExceeded { key, limit } => {
                AdmissionError::LimitExceeded { key, limit }
            }
            FeatureError::Unavailable(detail) => {
                error!(error = %detail, "feature service failure during admission");
                AdmissionError::Internal
            }
        }
    }
}

impl From<PricingError> for AdmissionError {
    fn from(err: PricingError) -> Self {
        match err {
            PricingError::UnpricedResource => AdmissionError::Configuration(err.to_string()),
            other => AdmissionError::Validation(other.to_string()),
        }
    }
}

impl From<WindowError> for AdmissionError {
    fn from(err: WindowError) -> Self {
        AdmissionError::Validation(err.to_string())
    }
}

static RESERVATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reservation_id() -> ReservationId {
    let id = RESERVATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ReservationId(format!("rsv-{id:06}"))
}

/// Per-resource admission locks. The source system ran its availability check
/// and create as two uncoordinated store calls; serializing them per resource
/// closes that check-then-write race without coordinating across resources.
#[derive(Default)]
struct ResourceLocks {
    inner: Mutex<HashMap<ResourceId, Arc<tokio::sync::Mutex<()>>>>,
}

impl ResourceLocks {
    fn for_resource(&self, id: &ResourceId) -> Arc<tokio::sync::Mutex<()>> {
        let mut registry = self.inner.lock().expect("lock registry mutex poisoned");
        registry.entry(id.clone()).or_default().clone()
    }
}

/// Orchestrator sequencing validation, entitlements, idempotency, availability,
/// pricing, and persistence for one booking request.
pub struct AdmissionService<RS, VS, ID, FS, TX> {
    resources: Arc<RS>,
    reservations: Arc<VS>,
    identity: Arc<ID>,
    features: Arc<FS>,
    taxonomy: Arc<TX>,
    activity: Arc<dyn ActivityLog>,
    settings: AdmissionSettings,
    locks: ResourceLocks,
}

impl<RS, VS, ID, FS, TX> AdmissionService<RS, VS, ID, FS, TX>
where
    RS: ResourceStore + 'static,
    VS: ReservationStore + 'static,
    ID: IdentityProvider + 'static,
    FS: FeatureService + 'static,
    TX: CommercialTaxonomy + 'static,
{
    pub fn new(
        resources: Arc<RS>,
        reservations: Arc<VS>,
        identity: Arc<ID>,
        features: Arc<FS>,
        taxonomy: Arc<TX>,
        activity: Arc<dyn ActivityLog>,
        settings: AdmissionSettings,
    ) -> Self {
        Self {
            resources,
            reservations,
            identity,
            features,
            taxonomy,
            activity,
            settings,
            locks: ResourceLocks::default(),
        }
    }

    /// Decide one booking request. Every gate before persistence is read-only;
    /// a failure at any gate aborts with a typed error and no partial writes.
    pub async fn admit(
        &self,
        request: AdmissionRequest,
    ) -> Result<AdmissionOutcome, AdmissionError> {
        let now = Utc::now();

        let guest_id = request
            .guest_id
            .clone()
            .ok_or(AdmissionError::AuthRequired)?;

        let account = self
            .identity
            .get_user(&guest_id)
            .await
            .map_err(AdmissionError::from_identity)?
            .ok_or(AdmissionError::AuthRequired)?;
        let contact = verified_contact(&account)?;

        self.features.require_module(MARKETPLACE_MODULE).await?;

        let resource = self
            .resources
            .get(&request.resource_id)
            .await
            .map_err(AdmissionError::from_store)?
            .ok_or(AdmissionError::NotFound)?;
        if !resource.enabled {
            return Err(AdmissionError::NotFound);
        }
        if !resource.published {
            return Err(AdmissionError::ResourceUnavailable);
        }
        let owner_id = resource
            .owner_id
            .clone()
            .ok_or_else(|| AdmissionError::Configuration("resource has no owner".to_string()))?;

        if let Some(module) = self.taxonomy.booking_module(resource.commercial_mode) {
            self.features.require_module(module).await?;
        }

        if resource.manual_contact_only {
            return Err(AdmissionError::Validation(
                "resource accepts manual enquiries only".to_string(),
            ));
        }

        if self.taxonomy.requires_online_payment(resource.commercial_mode) {
            self.features.require_module(PAYMENTS_MODULE).await?;
        }

        let active = self
            .reservations
            .count_active_since(&owner_id, month_start(now))
            .await
            .map_err(AdmissionError::from_store)?;
        self.features
            .assert_limit_not_exceeded(
                &self.settings.monthly_quota_key,
                self.settings.monthly_quota_default,
                active,
            )
            .await?;

        if request.guest_count == 0 || request.guest_count > resource.max_guests {
            return Err(AdmissionError::Validation(format!(
                "guest count must be between 1 and {}",
                resource.max_guests
            )));
        }

        if let Some(existing) = resolve_replay(
            self.reservations.as_ref(),
            &request.resource_id,
            &guest_id,
            request.idempotency_token.as_deref(),
            now,
        )
        .await
        {
            debug!(
                reservation = %existing.id.0,
                resource = %request.resource_id.0,
                "idempotent replay resolved to existing reservation"
            );
            let nights = validated_nights(&existing.shape).unwrap_or(0);
            return Ok(AdmissionOutcome {
                reservation: existing,
                nights,
                reused: true,
            });
        }

        let incoming = resolve_window(&request.shape, resource.slot_buffer_minutes)?;
        let nights = validated_nights(&request.shape)?;

        // Availability check and create run under the resource's admission
        // lock; concurrent admissions for other resources are unaffected.
        let lock = self.locks.for_resource(&request.resource_id);
        let _guard = lock.lock().await;

        let candidates = self
            .reservations
            .list_candidates(&request.resource_id, self.settings.candidate_page_limit)
            .await
            .map_err(AdmissionError::from_store)?;
        if let Some(blocking) = first_conflict(
            &incoming,
            &candidates,
            resource.slot_buffer_minutes,
            now,
        ) {
            debug!(
                resource = %request.resource_id.0,
                blocking = %blocking.0,
                "window conflict during admission"
            );
            return Err(AdmissionError::Conflict);
        }

        let quote = price_booking(
            &resource,
            &request.shape,
            nights,
            request.fees_amount,
            request.tax_amount,
            request.currency.as_deref(),
        )?;

        let reservation =
            self.build_reservation(&request, &resource, owner_id, guest_id, contact, &quote, now);
        let created = self
            .reservations
            .create(reservation)
            .await
            .map_err(AdmissionError::from_store)?;

        if let Err(err) = self
            .resources
            .increment_reservation_count(&request.resource_id)
            .await
        {
            // Reservation wins: the created document stands even when the
            // counter write-back fails.
            warn!(
                resource = %request.resource_id.0,
                error = %err,
                "reservation counter increment failed after create"
            );
        }

        self.activity.append(ActivityEvent {
            kind: "reservation.admitted",
            resource_id: created.resource_id.clone(),
            reservation_id: created.id.clone(),
            guest_id: created.guest_id.clone(),
            recorded_at: now,
        });

        Ok(AdmissionOutcome {
            reservation: created,
            nights,
            reused: false,
        })
    }

    #[allow(clippy::too_many_arguments)]
    fn build_reservation(
        &self,
        request: &AdmissionRequest,
        resource: &Resource,
        owner_id: UserId,
        guest_id: UserId,
        contact: ContactSnapshot,
        quote: &Quote,
        now: DateTime<Utc>,
    ) -> Reservation {
        let hold_expires_at = now + Duration::minutes(self.settings.hold_minutes);

        Reservation {
            id: next_reservation_id(),
            resource_id: resource.id.clone(),
            owner_id,
            guest_id,
            contact,
            shape: request.shape,
            guest_count: request.guest_count,
            base_amount: quote.base_amount,
            fees_amount: quote.fees_amount,
            tax_amount: quote.tax_amount,
            total_amount: quote.total_amount,
            currency: quote.currency.clone(),
            status: ReservationStatus::Pending,
            payment_status: PaymentStatus::Unpaid,
            hold_expires_at: Some(HoldExpiry::At(hold_expires_at)),
            external_ref: request
                .idempotency_token
                .as_deref()
                .map(str::trim)
                .filter(|token| !token.is_empty())
                .map(client_ref),
            enabled: true,
            created_at: now,
        }
    }
}

fn verified_contact(account: &UserAccount) -> Result<ContactSnapshot, AdmissionError> {
    let email = account
        .email
        .as_deref()
        .map(str::trim)
        .filter(|email| !email.is_empty())
        .ok_or_else(|| {
            AdmissionError::Validation("a contact email is required to book".to_string())
        })?;

    if !account.email_verified {
        return Err(AdmissionError::Validation(
            "email address must be verified before booking".to_string(),
        ));
    }

    Ok(ContactSnapshot {
        email: email.to_string(),
        name: account.name.clone(),
        phone: account.phone.clone(),
    })
}

fn month_start(now: DateTime<Utc>) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(now.year(), now.month(), 1, 0, 0, 0)
        .single()
        .unwrap_or(now)
}
