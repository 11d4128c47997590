use super::domain::CommercialMode;

/// Module key gating the whole resource-serving marketplace.
pub const MARKETPLACE_MODULE: &str = "marketplace";

/// Module key gating online payment collection.
pub const PAYMENTS_MODULE: &str = "payments";

/// Maps a resource's commercial mode to the modules its bookings require.
///
/// The mapping is owned by an external catalog/entitlement collaborator; this
/// trait is the read-only contract the admission engine consults. Implementors
/// must be cheap to call, the orchestrator queries them once per request.
pub trait CommercialTaxonomy: Send + Sync {
    /// Mode-specific booking module that must be enabled, if one applies.
    fn booking_module(&self, mode: CommercialMode) -> Option<&'static str>;

    /// Whether bookings in this mode collect payment online (and therefore
    /// require the payments module).
    fn requires_online_payment(&self, mode: CommercialMode) -> bool;
}

/// Default mapping shipped with the binary.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticTaxonomy;

impl CommercialTaxonomy for StaticTaxonomy {
    fn booking_module(&self, mode: CommercialMode) -> Option<&'static str> {
        match mode {
            CommercialMode::Sale => None,
            CommercialMode::LongTermRent => Some("bookings.long_term"),
            CommercialMode::ShortTermRent => Some("bookings.short_term"),
            CommercialMode::HourlyRent => Some("bookings.hourly"),
        }
    }

    fn requires_online_payment(&self, mode: CommercialMode) -> bool {
        matches!(
            mode,
            CommercialMode::ShortTermRent | CommercialMode::HourlyRent
        )
    }
}
