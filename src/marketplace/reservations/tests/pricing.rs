use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::common::*;
use crate::marketplace::reservations::domain::{BookingShape, PricingModel};
use crate::marketplace::reservations::pricing::{
    price_booking, validated_nights, PricingError,
};

#[test]
fn per_night_stay_multiplies_by_nights() {
    let mut resource = resource();
    resource.price = dec!(1000.00);

    let shape = march_stay();
    let nights = validated_nights(&shape).expect("nights valid");
    let quote = price_booking(
        &resource,
        &shape,
        nights,
        Some(dec!(50)),
        Some(dec!(80)),
        None,
    )
    .expect("quote computes");

    assert_eq!(quote.nights, 3);
    assert_eq!(quote.base_amount, dec!(3000.00));
    assert_eq!(quote.total_amount, dec!(3130.00));
    assert_eq!(quote.currency, "MXN");
}

#[test]
fn fixed_price_ignores_night_count() {
    let mut resource = resource();
    resource.price = dec!(4500.00);
    resource.pricing_model = PricingModel::Fixed;

    let shape = BookingShape::DateRange {
        check_in: date(2025, 3, 1),
        check_out: date(2025, 3, 11),
    };
    let nights = validated_nights(&shape).expect("nights valid");
    let quote =
        price_booking(&resource, &shape, nights, None, None, None).expect("quote computes");

    assert_eq!(quote.nights, 10);
    assert_eq!(quote.base_amount, dec!(4500.00));
    assert_eq!(quote.total_amount, dec!(4500.00));
}

#[test]
fn time_slot_never_multiplies() {
    let resource = resource();
    let shape = BookingShape::TimeSlot {
        starts_at: instant(2025, 6, 10, 14, 0),
        ends_at: instant(2025, 6, 10, 16, 0),
    };
    let nights = validated_nights(&shape).expect("nights valid");
    assert_eq!(nights, 0);

    let quote =
        price_booking(&resource, &shape, nights, None, None, None).expect("quote computes");
    assert_eq!(quote.base_amount, resource.price);
}

#[test]
fn zero_price_is_a_configuration_error() {
    let mut resource = resource();
    resource.price = Decimal::ZERO;

    let shape = march_stay();
    let err = price_booking(&resource, &shape, 3, None, None, None)
        .expect_err("zero price rejected");
    assert_eq!(err, PricingError::UnpricedResource);
}

#[test]
fn negative_fees_are_rejected() {
    let resource = resource();
    let err = price_booking(&resource, &march_stay(), 3, Some(dec!(-1)), None, None)
        .expect_err("negative fees rejected");
    assert_eq!(err, PricingError::NegativeAmount { field: "fees" });
}

#[test]
fn unsupported_currency_is_rejected() {
    let resource = resource();
    let err = price_booking(&resource, &march_stay(), 3, None, None, Some("XTS"))
        .expect_err("unknown currency rejected");
    assert_eq!(err, PricingError::CurrencyUnsupported("XTS".to_string()));
}

#[test]
fn explicit_currency_overrides_resource_currency() {
    let resource = resource();
    let quote = price_booking(&resource, &march_stay(), 3, None, None, Some("usd"))
        .expect("quote computes");
    assert_eq!(quote.currency, "USD");
}

#[test]
fn zero_nights_is_rejected_not_clamped() {
    let shape = BookingShape::DateRange {
        check_in: date(2025, 3, 1),
        check_out: date(2025, 3, 1),
    };
    assert_eq!(
        validated_nights(&shape),
        Err(PricingError::NightsOutOfRange(0))
    );
}

#[test]
fn stays_over_a_year_are_rejected() {
    let shape = BookingShape::DateRange {
        check_in: date(2025, 1, 1),
        check_out: date(2026, 1, 2),
    };
    assert_eq!(
        validated_nights(&shape),
        Err(PricingError::NightsOutOfRange(366))
    );
}

#[test]
fn full_year_stay_is_accepted() {
    let shape = BookingShape::DateRange {
        check_in: date(2025, 1, 1),
        check_out: date(2026, 1, 1),
    };
    assert_eq!(validated_nights(&shape), Ok(365));
}

#[test]
fn amounts_round_to_two_decimals() {
    let mut resource = resource();
    resource.price = dec!(33.335);

    let quote = price_booking(&resource, &march_stay(), 3, Some(dec!(0.005)), None, None)
        .expect("quote computes");
    assert_eq!(quote.base_amount, dec!(100.00));
    assert_eq!(quote.fees_amount, dec!(0.00));
    assert_eq!(quote.total_amount, dec!(100.00));
}
