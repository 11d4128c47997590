use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::json;

use super::domain::{BookingShape, HoldExpiry, ResourceId, UserId};
use super::repository::{FeatureService, IdentityProvider, ReservationStore, ResourceStore};
use super::service::{AdmissionError, AdmissionOutcome, AdmissionRequest, AdmissionService};
use super::taxonomy::CommercialTaxonomy;

/// Header carrying the authenticated user id resolved by the edge proxy.
pub const USER_HEADER: &str = "x-user-id";

/// Booking request body. The shape discriminator selects between a date pair
/// and a timestamp pair.
#[derive(Debug, Clone, Deserialize)]
pub struct AdmissionPayload {
    #[serde(flatten)]
    pub booking: BookingShape,
    pub guest_count: u32,
    #[serde(default)]
    pub currency: Option<String>,
    #[serde(default)]
    pub fees_amount: Option<Decimal>,
    #[serde(default)]
    pub tax_amount: Option<Decimal>,
    #[serde(default)]
    pub idempotency_token: Option<String>,
}

/// Sanitized view of an admitted (or reused) reservation.
#[derive(Debug, Clone, Serialize)]
pub struct AdmissionView {
    pub reservation_id: String,
    pub status: &'static str,
    pub payment_status: &'static str,
    pub total_amount: Decimal,
    pub currency: String,
    pub nights: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hold_expires_at: Option<DateTime<Utc>>,
    pub reused: bool,
}

impl From<&AdmissionOutcome> for AdmissionView {
    fn from(outcome: &AdmissionOutcome) -> Self {
        let reservation = &outcome.reservation;
        Self {
            reservation_id: reservation.id.0.clone(),
            status: reservation.status.label(),
            payment_status: reservation.payment_status.label(),
            total_amount: reservation.total_amount,
            currency: reservation.currency.clone(),
            nights: outcome.nights,
            hold_expires_at: reservation
                .hold_expires_at
                .as_ref()
                .and_then(HoldExpiry::instant),
            reused: outcome.reused,
        }
    }
}

/// Router builder exposing the admission endpoint.
pub fn reservation_router<RS, VS, ID, FS, TX>(
    service: Arc<AdmissionService<RS, VS, ID, FS, TX>>,
) -> Router
where
    RS: ResourceStore + 'static,
    VS: ReservationStore + 'static,
    ID: IdentityProvider + 'static,
    FS: FeatureService + 'static,
    TX: CommercialTaxonomy + 'static,
{
    Router::new()
        .route(
            "/api/v1/resources/:resource_id/reservations",
            post(admit_handler::<RS, VS, ID, FS, TX>),
        )
        .with_state(service)
}

pub(crate) async fn admit_handler<RS, VS, ID, FS, TX>(
    State(service): State<Arc<AdmissionService<RS, VS, ID, FS, TX>>>,
    Path(resource_id): Path<String>,
    headers: HeaderMap,
    axum::Json(payload): axum::Json<AdmissionPayload>,
) -> Response
where
    RS: ResourceStore + 'static,
    VS: ReservationStore + 'static,
    ID: IdentityProvider + 'static,
    FS: FeatureService + 'static,
    TX: CommercialTaxonomy + 'static,
{
    let guest_id = headers
        .get(USER_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(|value| UserId(value.to_string()));

    let request = AdmissionRequest {
        guest_id,
        resource_id: ResourceId(resource_id),
        shape: payload.booking,
        guest_count: payload.guest_count,
        currency: payload.currency,
        fees_amount: payload.fees_amount,
        tax_amount: payload.tax_amount,
        idempotency_token: payload.idempotency_token,
    };

    match service.admit(request).await {
        Ok(outcome) => {
            let status = if outcome.reused {
                StatusCode::OK
            } else {
                StatusCode::CREATED
            };
            (status, axum::Json(AdmissionView::from(&outcome))).into_response()
        }
        Err(err) => error_response(err),
    }
}

fn error_response(err: AdmissionError) -> Response {
    let status = match &err {
        AdmissionError::AuthRequired => StatusCode::UNAUTHORIZED,
        AdmissionError::Validation(_) | AdmissionError::Configuration(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        AdmissionError::NotFound => StatusCode::NOT_FOUND,
        AdmissionError::ResourceUnavailable | AdmissionError::Conflict => StatusCode::CONFLICT,
        AdmissionError::ModuleDisabled { .. } => StatusCode::FORBIDDEN,
        AdmissionError::LimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        AdmissionError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = match &err {
        AdmissionError::ModuleDisabled { module } => json!({
            "error": err.to_string(),
            "code": err.code(),
            "module": module,
        }),
        AdmissionError::LimitExceeded { key, limit } => json!({
            "error": err.to_string(),
            "code": err.code(),
            "limit_key": key,
            "limit": limit,
        }),
        other => json!({
            "error": other.to_string(),
            "code": other.code(),
        }),
    };

    (status, axum::Json(payload)).into_response()
}
