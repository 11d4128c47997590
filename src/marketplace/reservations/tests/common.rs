use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use rust_decimal::Decimal;

use crate::marketplace::reservations::domain::{
    BookingShape, CommercialMode, ContactSnapshot, HoldExpiry, PaymentStatus, PricingModel,
    Reservation, ReservationId, ReservationStatus, Resource, ResourceId, UserId,
};
use crate::marketplace::reservations::idempotency::client_ref;
use crate::marketplace::reservations::memory::{
    MemoryFeatureService, MemoryIdentityProvider, MemoryReservationStore, MemoryResourceStore,
    RecordingActivityLog,
};
use crate::marketplace::reservations::repository::UserAccount;
use crate::marketplace::reservations::service::{
    AdmissionRequest, AdmissionService, AdmissionSettings,
};
use crate::marketplace::reservations::taxonomy::StaticTaxonomy;

pub(super) type TestAdmissionService = AdmissionService<
    MemoryResourceStore,
    MemoryReservationStore,
    MemoryIdentityProvider,
    MemoryFeatureService,
    StaticTaxonomy,
>;

pub(super) struct TestHarness {
    pub service: Arc<TestAdmissionService>,
    pub resources: Arc<MemoryResourceStore>,
    pub reservations: Arc<MemoryReservationStore>,
    pub identity: Arc<MemoryIdentityProvider>,
    pub features: Arc<MemoryFeatureService>,
    pub activity: RecordingActivityLog,
}

pub(super) fn harness() -> TestHarness {
    let resources = Arc::new(MemoryResourceStore::default());
    let reservations = Arc::new(MemoryReservationStore::default());
    let identity = Arc::new(MemoryIdentityProvider::default());
    let features = Arc::new(MemoryFeatureService::default());
    let activity = RecordingActivityLog::default();

    identity.insert(guest_id(), verified_account());
    resources.insert(resource());

    let service = Arc::new(AdmissionService::new(
        resources.clone(),
        reservations.clone(),
        identity.clone(),
        features.clone(),
        Arc::new(StaticTaxonomy),
        Arc::new(activity.clone()),
        AdmissionSettings::default(),
    ));

    TestHarness {
        service,
        resources,
        reservations,
        identity,
        features,
        activity,
    }
}

pub(super) fn guest_id() -> UserId {
    UserId("guest-1".to_string())
}

pub(super) fn owner_id() -> UserId {
    UserId("owner-1".to_string())
}

pub(super) fn resource_id() -> ResourceId {
    ResourceId("cabin-12".to_string())
}

pub(super) fn verified_account() -> UserAccount {
    UserAccount {
        email: Some("guest@example.com".to_string()),
        email_verified: true,
        name: Some("Ana Guest".to_string()),
        phone: Some("+52 55 0000 0000".to_string()),
    }
}

pub(super) fn resource() -> Resource {
    Resource {
        id: resource_id(),
        owner_id: Some(owner_id()),
        enabled: true,
        published: true,
        price: Decimal::from(200),
        pricing_model: PricingModel::PerNight,
        currency: "MXN".to_string(),
        max_guests: 4,
        slot_buffer_minutes: 0,
        manual_contact_only: false,
        commercial_mode: CommercialMode::ShortTermRent,
        reservation_count: 0,
    }
}

pub(super) fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub(super) fn instant(
    year: i32,
    month: u32,
    day: u32,
    hour: u32,
    minute: u32,
) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, hour, minute, 0)
        .single()
        .expect("valid instant")
}

pub(super) fn march_stay() -> BookingShape {
    BookingShape::DateRange {
        check_in: date(2025, 3, 1),
        check_out: date(2025, 3, 4),
    }
}

pub(super) fn request(shape: BookingShape) -> AdmissionRequest {
    AdmissionRequest {
        guest_id: Some(guest_id()),
        resource_id: resource_id(),
        shape,
        guest_count: 2,
        currency: None,
        fees_amount: None,
        tax_amount: None,
        idempotency_token: None,
    }
}

pub(super) fn pending_reservation(id: &str, shape: BookingShape) -> Reservation {
    Reservation {
        id: ReservationId(id.to_string()),
        resource_id: resource_id(),
        owner_id: owner_id(),
        guest_id: UserId("other-guest".to_string()),
        contact: ContactSnapshot {
            email: "other@example.com".to_string(),
            name: None,
            phone: None,
        },
        shape,
        guest_count: 2,
        base_amount: Decimal::from(600),
        fees_amount: Decimal::ZERO,
        tax_amount: Decimal::ZERO,
        total_amount: Decimal::from(600),
        currency: "MXN".to_string(),
        status: ReservationStatus::Pending,
        payment_status: PaymentStatus::Unpaid,
        hold_expires_at: Some(HoldExpiry::At(Utc::now() + Duration::minutes(30))),
        external_ref: None,
        enabled: true,
        created_at: Utc::now() - Duration::minutes(5),
    }
}

pub(super) fn replayable_reservation(id: &str, token: &str, shape: BookingShape) -> Reservation {
    Reservation {
        guest_id: guest_id(),
        external_ref: Some(client_ref(token)),
        ..pending_reservation(id, shape)
    }
}
