//! Reservation admission engine for a bookable-resource marketplace.
//!
//! The marketplace's catalog editing, dashboards, and payment flows live in
//! other services; this crate owns the one decision with real invariants:
//! whether a booking request can be admitted against a resource and time
//! window, how it is priced, and how retried submissions stay idempotent.

pub mod config;
pub mod error;
pub mod marketplace;
pub mod telemetry;
