use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Identifier wrapper for bookable resources (properties, vehicles, venues, ...).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceId(pub String);

/// Identifier wrapper for reservation documents.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ReservationId(pub String);

/// Identifier wrapper for marketplace users (guests and owners).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct UserId(pub String);

/// How a resource's listed price is applied to a booking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingModel {
    PerNight,
    PerDay,
    #[serde(alias = "total")]
    Fixed,
}

impl PricingModel {
    pub const fn label(self) -> &'static str {
        match self {
            PricingModel::PerNight => "per_night",
            PricingModel::PerDay => "per_day",
            PricingModel::Fixed => "fixed",
        }
    }

    /// Whether the listed price multiplies by the booked night/day count.
    pub const fn scales_with_duration(self) -> bool {
        matches!(self, PricingModel::PerNight | PricingModel::PerDay)
    }
}

/// Monetization mode of a resource; determines required modules and payment handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommercialMode {
    Sale,
    LongTermRent,
    ShortTermRent,
    HourlyRent,
}

impl CommercialMode {
    pub const fn label(self) -> &'static str {
        match self {
            CommercialMode::Sale => "sale",
            CommercialMode::LongTermRent => "long_term_rent",
            CommercialMode::ShortTermRent => "short_term_rent",
            CommercialMode::HourlyRent => "hourly_rent",
        }
    }
}

/// Read-only snapshot of a bookable resource as the admission engine sees it.
///
/// Owned by the catalog side of the marketplace; the only field this engine
/// ever writes back is `reservation_count`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resource {
    pub id: ResourceId,
    pub owner_id: Option<UserId>,
    pub enabled: bool,
    pub published: bool,
    pub price: Decimal,
    pub pricing_model: PricingModel,
    pub currency: String,
    pub max_guests: u32,
    pub slot_buffer_minutes: i64,
    pub manual_contact_only: bool,
    pub commercial_mode: CommercialMode,
    pub reservation_count: u64,
}

/// Temporal footprint of a booking: a calendar date pair or a timestamp pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum BookingShape {
    DateRange {
        check_in: NaiveDate,
        check_out: NaiveDate,
    },
    #[serde(alias = "fixed_event")]
    TimeSlot {
        starts_at: DateTime<Utc>,
        ends_at: DateTime<Utc>,
    },
}

impl BookingShape {
    pub const fn label(&self) -> &'static str {
        match self {
            BookingShape::DateRange { .. } => "date_range",
            BookingShape::TimeSlot { .. } => "time_slot",
        }
    }
}

/// Lifecycle status of a reservation document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    Pending,
    Confirmed,
    Completed,
    Cancelled,
    Expired,
}

impl ReservationStatus {
    pub const fn label(self) -> &'static str {
        match self {
            ReservationStatus::Pending => "pending",
            ReservationStatus::Confirmed => "confirmed",
            ReservationStatus::Completed => "completed",
            ReservationStatus::Cancelled => "cancelled",
            ReservationStatus::Expired => "expired",
        }
    }
}

/// Payment progress, transitioned by out-of-scope payment flows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    Unpaid,
    Pending,
    Paid,
    Failed,
    Refunded,
}

impl PaymentStatus {
    pub const fn label(self) -> &'static str {
        match self {
            PaymentStatus::Unpaid => "unpaid",
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
            PaymentStatus::Failed => "failed",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

/// Hold expiry as stored. Documents written by older clients occasionally carry
/// values that do not parse as timestamps; those must round-trip rather than
/// fail deserialization so the hold evaluator can apply its fail-safe rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum HoldExpiry {
    At(DateTime<Utc>),
    Raw(String),
}

impl HoldExpiry {
    pub fn instant(&self) -> Option<DateTime<Utc>> {
        match self {
            HoldExpiry::At(instant) => Some(*instant),
            HoldExpiry::Raw(_) => None,
        }
    }
}

/// Guest contact details captured at admission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactSnapshot {
    pub email: String,
    pub name: Option<String>,
    pub phone: Option<String>,
}

/// A reservation document as created by the admission engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reservation {
    pub id: ReservationId,
    pub resource_id: ResourceId,
    pub owner_id: UserId,
    pub guest_id: UserId,
    pub contact: ContactSnapshot,
    pub shape: BookingShape,
    pub guest_count: u32,
    pub base_amount: Decimal,
    pub fees_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
    pub status: ReservationStatus,
    pub payment_status: PaymentStatus,
    pub hold_expires_at: Option<HoldExpiry>,
    pub external_ref: Option<String>,
    pub enabled: bool,
    pub created_at: DateTime<Utc>,
}
