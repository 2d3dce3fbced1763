use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{config::TariffConfig, km::Km, money::Pesos};

/// Chilean IVA, applied to every quote after discounts.
pub const IVA_RATE: f64 = 0.19;

const TIER_BASE_LIMIT_KM: f64 = 6.0;
const TIER_MID_LIMIT_KM: f64 = 10.0;

#[derive(Debug, Error)]
pub enum PricingError {
    #[error("distance must be a finite, non-negative number of kilometers (got {0})")]
    InvalidDistance(f64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PriceBreakdown {
    pub net: Pesos,
    pub discount_amount: Pesos,
    pub discount_label: String,
    pub net_after_discount: Pesos,
    pub tax: Pesos,
    pub total: Pesos,
}

impl PriceBreakdown {
    /// Componentwise sum, used when every leg of a trip is priced on its
    /// own. The label is taken from the first discounted part.
    pub fn combined<'a, I>(parts: I) -> PriceBreakdown
    where
        I: IntoIterator<Item = &'a PriceBreakdown>,
    {
        let mut net = Pesos::ZERO;
        let mut discount_amount = Pesos::ZERO;
        let mut discount_label = String::new();
        let mut net_after_discount = Pesos::ZERO;
        let mut tax = Pesos::ZERO;
        let mut total = Pesos::ZERO;

        for part in parts {
            net += part.net;
            discount_amount += part.discount_amount;
            net_after_discount += part.net_after_discount;
            tax += part.tax;
            total += part.total;
            if discount_label.is_empty() && !part.discount_label.is_empty() {
                discount_label = part.discount_label.clone();
            }
        }

        PriceBreakdown {
            net,
            discount_amount,
            discount_label,
            net_after_discount,
            tax,
            total,
        }
    }
}

/// Prices one distance against the tariff table.
///
/// Tier boundaries are inclusive: up to 6 km the flat base rate applies,
/// up to 10 km the mid per-km rate, above that the long per-km rate. The
/// surcharge multiplies the net before any coupon is subtracted, and IVA
/// is computed on the discounted net.
pub fn price(
    tariff: &TariffConfig,
    distance: Km,
    coupon_code: Option<&str>,
) -> Result<PriceBreakdown, PricingError> {
    let km = distance.value();
    if !km.is_finite() || km < 0.0 {
        return Err(PricingError::InvalidDistance(km));
    }

    let mut net = if km <= TIER_BASE_LIMIT_KM {
        tariff.base_rate
    } else if km <= TIER_MID_LIMIT_KM {
        Pesos::round(km * tariff.rate_6_to_10)
    } else {
        Pesos::round(km * tariff.rate_over_10)
    };

    if !tariff.surcharge.is_zero() {
        net = Pesos::round(net.as_f64() * (1.0 + tariff.surcharge.fraction()));
    }

    let (discount_amount, discount_label) = match lookup_coupon(tariff, coupon_code) {
        Some((code, percent)) => (
            Pesos::round(net.as_f64() * percent.fraction()),
            format!("Discount {code} {}%", percent.points_label()),
        ),
        None => (Pesos::ZERO, String::new()),
    };

    let net_after_discount = net - discount_amount;
    let tax = Pesos::round(net_after_discount.as_f64() * IVA_RATE);

    Ok(PriceBreakdown {
        net,
        discount_amount,
        discount_label,
        net_after_discount,
        tax,
        total: net_after_discount + tax,
    })
}

fn lookup_coupon<'a>(
    tariff: &'a TariffConfig,
    coupon_code: Option<&str>,
) -> Option<(String, crate::percent::Percent)> {
    let code = coupon_code?.trim();
    if code.is_empty() {
        return None;
    }

    let code = code.to_uppercase();
    let percent = *tariff.coupons.get(&code)?;
    Some((code, percent))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::percent::Percent;

    fn tariff() -> TariffConfig {
        TariffConfig::default()
    }

    #[test]
    fn test_base_tier_is_flat() {
        for km in [0.1, 3.0, 5.99, 6.0] {
            let breakdown = price(&tariff(), Km::new(km), None).unwrap();
            assert_eq!(breakdown.net, Pesos::new(6000), "at {km} km");
        }
    }

    #[test]
    fn test_mid_tier_scales_per_km() {
        let breakdown = price(&tariff(), Km::new(6.01), None).unwrap();
        assert_eq!(breakdown.net, Pesos::new(6010));

        let breakdown = price(&tariff(), Km::new(10.0), None).unwrap();
        assert_eq!(breakdown.net, Pesos::new(10000));
    }

    #[test]
    fn test_long_tier_scales_per_km() {
        let breakdown = price(&tariff(), Km::new(10.5), None).unwrap();
        assert_eq!(breakdown.net, Pesos::new(8925));
    }

    #[test]
    fn test_eight_km_no_coupon_scenario() {
        let breakdown = price(&tariff(), Km::new(8.0), None).unwrap();
        assert_eq!(breakdown.net, Pesos::new(8000));
        assert_eq!(breakdown.discount_amount, Pesos::ZERO);
        assert_eq!(breakdown.discount_label, "");
        assert_eq!(breakdown.tax, Pesos::new(1520));
        assert_eq!(breakdown.total, Pesos::new(9520));
    }

    #[test]
    fn test_fifteen_km_with_welcome_coupon_scenario() {
        let breakdown = price(&tariff(), Km::new(15.0), Some("BIENVENIDA10")).unwrap();
        assert_eq!(breakdown.net, Pesos::new(12750));
        assert_eq!(breakdown.discount_amount, Pesos::new(1275));
        assert_eq!(breakdown.discount_label, "Discount BIENVENIDA10 10%");
        assert_eq!(breakdown.net_after_discount, Pesos::new(11475));
        assert_eq!(breakdown.tax, Pesos::new(2180));
        assert_eq!(breakdown.total, Pesos::new(13655));
    }

    #[test]
    fn test_coupon_lookup_is_case_insensitive() {
        let lower = price(&tariff(), Km::new(15.0), Some("bienvenida10")).unwrap();
        let upper = price(&tariff(), Km::new(15.0), Some("BIENVENIDA10")).unwrap();
        assert_eq!(lower, upper);
    }

    #[test]
    fn test_unknown_or_empty_coupon_gives_no_discount() {
        for code in [Some("NOPE"), Some(""), Some("   "), None] {
            let breakdown = price(&tariff(), Km::new(8.0), code).unwrap();
            assert_eq!(breakdown.discount_amount, Pesos::ZERO);
            assert_eq!(breakdown.discount_label, "");
            assert_eq!(breakdown.total, Pesos::new(9520));
        }
    }

    #[test]
    fn test_surcharge_applies_before_discount() {
        let mut tariff = tariff();
        tariff.surcharge = Percent::from_raw(10.0);

        let breakdown = price(&tariff, Km::new(8.0), Some("BIENVENIDA10")).unwrap();
        // 8000 * 1.1 = 8800, then 10% off that
        assert_eq!(breakdown.net, Pesos::new(8800));
        assert_eq!(breakdown.discount_amount, Pesos::new(880));
        assert_eq!(breakdown.net_after_discount, Pesos::new(7920));
        assert_eq!(breakdown.tax, Pesos::new(1505));
        assert_eq!(breakdown.total, Pesos::new(9425));
    }

    #[test]
    fn test_total_is_net_after_discount_plus_tax() {
        for km in [0.5, 6.0, 7.3, 10.0, 12.8, 42.0] {
            let breakdown = price(&tariff(), Km::new(km), Some("BIENVENIDA10")).unwrap();
            assert_eq!(
                breakdown.total,
                breakdown.net_after_discount + breakdown.tax
            );
            assert!(breakdown.discount_amount <= breakdown.net);
            assert!(breakdown.total >= Pesos::ZERO);
        }
    }

    #[test]
    fn test_invalid_distances_are_rejected() {
        for km in [-1.0, f64::NAN, f64::INFINITY] {
            assert!(price(&tariff(), Km::new(km), None).is_err(), "at {km} km");
        }
    }

    #[test]
    fn test_combined_sums_componentwise() {
        let first = price(&tariff(), Km::new(8.0), Some("BIENVENIDA10")).unwrap();
        let second = price(&tariff(), Km::new(12.0), None).unwrap();
        let combined = PriceBreakdown::combined([&first, &second]);

        assert_eq!(combined.net, first.net + second.net);
        assert_eq!(combined.tax, first.tax + second.tax);
        assert_eq!(combined.total, first.total + second.total);
        assert_eq!(combined.discount_label, first.discount_label);
    }
}
