//! Reservation admission workflow: decides whether a booking request against a
//! resource and time window can be admitted, prices it, and makes retried
//! submissions idempotent.
//!
//! The pure pieces (window resolution, hold evaluation, availability scan,
//! pricing) are free functions over the domain types; the orchestrator in
//! `service` sequences them with the external collaborators (document store,
//! identity provider, feature service, activity log) behind traits.

pub(crate) mod availability;
pub mod audit;
pub mod domain;
pub(crate) mod hold;
pub(crate) mod idempotency;
pub mod memory;
pub mod pricing;
pub mod repository;
pub mod router;
pub mod service;
pub mod taxonomy;
pub mod window;

#[cfg(test)]
mod tests;

pub use audit::{ActivityEvent, ActivityLog, ChannelActivityLog};
pub use domain::{
    BookingShape, CommercialMode, ContactSnapshot, HoldExpiry, PaymentStatus, PricingModel,
    Reservation, ReservationId, ReservationStatus, Resource, ResourceId, UserId,
};
pub use pricing::{PricingError, Quote};
pub use repository::{
    FeatureError, FeatureService, IdentityError, IdentityProvider, ReservationStore,
    ResourceStore, StoreError, UserAccount,
};
pub use router::{reservation_router, AdmissionPayload, AdmissionView};
pub use service::{
    AdmissionError, AdmissionOutcome, AdmissionRequest, AdmissionService, AdmissionSettings,
};
pub use taxonomy::{CommercialTaxonomy, StaticTaxonomy};
pub use window::{BookingWindow, WindowError};
