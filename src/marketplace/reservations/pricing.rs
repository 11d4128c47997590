use rust_decimal::Decimal;
use serde::Serialize;

use super::domain::{BookingShape, Resource};

/// Currencies the marketplace settles in.
pub const SUPPORTED_CURRENCIES: &[&str] = &[
    "USD", "EUR", "GBP", "CAD", "AUD", "MXN", "BRL", "JPY",
];

/// Longest date-range booking accepted, in nights.
pub const MAX_NIGHTS: i64 = 365;

/// Failures computing a booking quote.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PricingError {
    #[error("resource has no positive price configured")]
    UnpricedResource,
    #[error("{field} must be a non-negative amount")]
    NegativeAmount { field: &'static str },
    #[error("currency '{0}' is not supported")]
    CurrencyUnsupported(String),
    #[error("date range must span between 1 and {MAX_NIGHTS} nights, got {0}")]
    NightsOutOfRange(i64),
}

/// Priced breakdown for an admissible booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Quote {
    pub nights: u32,
    pub unit_amount: Decimal,
    pub base_amount: Decimal,
    pub fees_amount: Decimal,
    pub tax_amount: Decimal,
    pub total_amount: Decimal,
    pub currency: String,
}

/// Night/day count for the shape: the day difference for date ranges, bounded
/// to `[1, MAX_NIGHTS]` (out-of-range is a rejection, never a clamp); zero for
/// timestamped slots.
pub fn validated_nights(shape: &BookingShape) -> Result<u32, PricingError> {
    match shape {
        BookingShape::DateRange {
            check_in,
            check_out,
        } => {
            let nights = (*check_out - *check_in).num_days();
            if !(1..=MAX_NIGHTS).contains(&nights) {
                return Err(PricingError::NightsOutOfRange(nights));
            }
            Ok(nights as u32)
        }
        BookingShape::TimeSlot { .. } => Ok(0),
    }
}

/// Compute the quote for a booking against `resource`.
///
/// The unit amount is the resource's listed price and must be positive; a zero
/// or negative price is a catalog misconfiguration, not a free booking. The
/// price multiplies by the night count only for date-range bookings under a
/// duration-scaled model. Fees and tax come from the caller and are validated
/// independently. Every derived amount is rounded to two decimal places.
pub fn price_booking(
    resource: &Resource,
    shape: &BookingShape,
    nights: u32,
    fees_amount: Option<Decimal>,
    tax_amount: Option<Decimal>,
    currency_override: Option<&str>,
) -> Result<Quote, PricingError> {
    if resource.price <= Decimal::ZERO {
        return Err(PricingError::UnpricedResource);
    }

    let fees_amount = non_negative("fees", fees_amount)?;
    let tax_amount = non_negative("tax", tax_amount)?;

    let currency = currency_override
        .unwrap_or(&resource.currency)
        .trim()
        .to_ascii_uppercase();
    if !SUPPORTED_CURRENCIES.contains(&currency.as_str()) {
        return Err(PricingError::CurrencyUnsupported(currency));
    }

    let multiplier = match shape {
        BookingShape::DateRange { .. } if resource.pricing_model.scales_with_duration() => {
            nights.max(1)
        }
        _ => 1,
    };

    let unit_amount = resource.price;
    let base_amount = to_money(unit_amount * Decimal::from(multiplier));
    let total_amount = to_money(base_amount + fees_amount + tax_amount);

    Ok(Quote {
        nights,
        unit_amount,
        base_amount,
        fees_amount,
        tax_amount,
        total_amount,
        currency,
    })
}

fn non_negative(
    field: &'static str,
    amount: Option<Decimal>,
) -> Result<Decimal, PricingError> {
    let amount = amount.unwrap_or(Decimal::ZERO);
    if amount < Decimal::ZERO {
        return Err(PricingError::NegativeAmount { field });
    }
    Ok(to_money(amount))
}

/// Round to two decimal places and pin the scale there, so stored and
/// serialized amounts always read like money.
fn to_money(value: Decimal) -> Decimal {
    let mut rounded = value.round_dp(2);
    rounded.rescale(2);
    rounded
}
