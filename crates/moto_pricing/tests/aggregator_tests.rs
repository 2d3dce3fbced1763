use std::collections::HashMap;

use moto_pricing::aggregator::{DistanceLookup, LegEstimate, QuoteError, aggregate};
use moto_pricing::config::{
    AggregationConfig, AggregationPolicy, FallbackLeg, QuoteConfig, TariffConfig,
};
use moto_pricing::engine::price;
use moto_pricing::km::Km;
use moto_pricing::money::Pesos;

struct TableLookup {
    table: HashMap<(String, String), LegEstimate>,
}

impl TableLookup {
    fn new(entries: &[(&str, &str, f64, u32)]) -> Self {
        let table = entries
            .iter()
            .map(|&(from, to, km, minutes)| {
                (
                    (from.to_string(), to.to_string()),
                    LegEstimate {
                        distance: Km::new(km),
                        duration_minutes: minutes,
                    },
                )
            })
            .collect();
        TableLookup { table }
    }
}

impl DistanceLookup for TableLookup {
    async fn lookup(&self, from: &str, to: &str) -> anyhow::Result<LegEstimate> {
        self.table
            .get(&(from.to_string(), to.to_string()))
            .copied()
            .ok_or_else(|| anyhow::anyhow!("provider has no route for {from} -> {to}"))
    }
}

struct UnavailableLookup;

impl DistanceLookup for UnavailableLookup {
    async fn lookup(&self, _from: &str, _to: &str) -> anyhow::Result<LegEstimate> {
        Err(anyhow::anyhow!("provider returned status 503"))
    }
}

fn config(policy: AggregationPolicy, fallback: Option<FallbackLeg>) -> QuoteConfig {
    QuoteConfig {
        tariff: TariffConfig::default(),
        aggregation: AggregationConfig { policy, fallback },
    }
}

fn dest(names: &[&str]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

#[tokio::test]
async fn test_single_destination_matches_single_engine_call() {
    let config = config(AggregationPolicy::ChainedTrip, None);
    let lookup = TableLookup::new(&[("Providencia", "Las Condes", 8.0, 22)]);

    let quote = aggregate(&config, &lookup, "Providencia", &dest(&["Las Condes"]), None)
        .await
        .unwrap();

    let expected = price(&config.tariff, Km::new(8.0), None).unwrap();
    assert_eq!(quote.legs.len(), 1);
    assert_eq!(quote.total_distance, Km::new(8.0));
    assert_eq!(quote.total_duration_minutes, 22);
    assert_eq!(quote.price, expected);
    assert!(!quote.used_fallback);
}

#[tokio::test]
async fn test_chained_trip_prices_the_summed_distance_once() {
    let config = config(AggregationPolicy::ChainedTrip, None);
    let lookup = TableLookup::new(&[("A", "B", 5.0, 15), ("B", "C", 5.0, 12)]);

    let quote = aggregate(&config, &lookup, "A", &dest(&["B", "C"]), None)
        .await
        .unwrap();

    // two 5 km legs price as one 10 km trip under the chained policy
    assert_eq!(quote.total_distance, Km::new(10.0));
    assert_eq!(quote.total_duration_minutes, 27);
    assert_eq!(quote.price.net, Pesos::new(10000));
    assert!(quote.legs.iter().all(|leg| leg.price.is_none()));
}

#[tokio::test]
async fn test_fan_out_prices_each_leg_and_sums() {
    let config = config(AggregationPolicy::FanOutPerLeg, None);
    let lookup = TableLookup::new(&[("A", "B", 5.0, 15), ("A", "C", 5.0, 12)]);

    let quote = aggregate(&config, &lookup, "A", &dest(&["B", "C"]), None)
        .await
        .unwrap();

    // same distances as the chained test, different policy, different price:
    // each 5 km leg sits in the flat base tier
    assert_eq!(quote.total_distance, Km::new(10.0));
    assert_eq!(quote.price.net, Pesos::new(12000));
    for leg in &quote.legs {
        let expected = price(&config.tariff, leg.distance, None).unwrap();
        assert_eq!(leg.price.as_ref(), Some(&expected));
    }
    assert_eq!(
        quote.price.total,
        quote.legs.iter().map(|l| l.price.as_ref().unwrap().total).sum::<Pesos>()
    );
}

#[tokio::test]
async fn test_fan_out_legs_all_start_at_the_origin() {
    let config = config(AggregationPolicy::FanOutPerLeg, None);
    let lookup = TableLookup::new(&[("A", "B", 4.0, 10), ("A", "C", 9.0, 25)]);

    let quote = aggregate(&config, &lookup, "A", &dest(&["B", "C"]), None)
        .await
        .unwrap();

    assert!(quote.legs.iter().all(|leg| leg.from == "A"));
}

#[tokio::test]
async fn test_coupon_applies_across_the_whole_trip() {
    let config = config(AggregationPolicy::ChainedTrip, None);
    let lookup = TableLookup::new(&[("A", "B", 15.0, 40)]);

    let quote = aggregate(&config, &lookup, "A", &dest(&["B"]), Some("bienvenida10"))
        .await
        .unwrap();

    assert_eq!(quote.price.discount_label, "Discount BIENVENIDA10 10%");
    assert_eq!(quote.price.total, Pesos::new(13655));
}

#[tokio::test]
async fn test_unavailable_provider_uses_configured_fallback() {
    let fallback = FallbackLeg {
        distance: Km::new(8.5),
        duration_minutes: 30,
    };
    let config = config(AggregationPolicy::ChainedTrip, Some(fallback));

    let quote = aggregate(&config, &UnavailableLookup, "A", &dest(&["B"]), None)
        .await
        .unwrap();

    assert!(quote.used_fallback);
    assert!(quote.legs[0].used_fallback);
    assert_eq!(quote.total_distance, Km::new(8.5));
    assert_eq!(quote.total_duration_minutes, 30);
    assert_eq!(
        quote.price,
        price(&config.tariff, Km::new(8.5), None).unwrap()
    );
}

#[tokio::test]
async fn test_fallback_on_one_leg_leaves_the_other_intact() {
    let fallback = FallbackLeg {
        distance: Km::new(8.5),
        duration_minutes: 30,
    };
    let config = config(AggregationPolicy::FanOutPerLeg, Some(fallback));
    let lookup = TableLookup::new(&[("A", "B", 4.0, 10)]);

    let quote = aggregate(&config, &lookup, "A", &dest(&["B", "C"]), None)
        .await
        .unwrap();

    assert!(!quote.legs[0].used_fallback);
    assert_eq!(quote.legs[0].distance, Km::new(4.0));
    assert!(quote.legs[1].used_fallback);
    assert_eq!(quote.legs[1].distance, Km::new(8.5));
    assert!(quote.used_fallback);
}

#[tokio::test]
async fn test_unavailable_provider_without_fallback_names_the_leg() {
    let config = config(AggregationPolicy::ChainedTrip, None);
    let lookup = TableLookup::new(&[("A", "B", 5.0, 15)]);

    let error = aggregate(&config, &lookup, "A", &dest(&["B", "C"]), None)
        .await
        .unwrap_err();

    match error {
        QuoteError::DistanceUnavailable { leg, from, to, .. } => {
            assert_eq!(leg, 1);
            assert_eq!(from, "B");
            assert_eq!(to, "C");
        }
        other => panic!("expected DistanceUnavailable, got {other:?}"),
    }
}

#[tokio::test]
async fn test_empty_inputs_are_rejected() {
    let config = config(AggregationPolicy::ChainedTrip, None);
    let lookup = TableLookup::new(&[]);

    let empty_origin = aggregate(&config, &lookup, "  ", &dest(&["B"]), None).await;
    assert!(matches!(empty_origin, Err(QuoteError::InvalidInput(_))));

    let no_destinations = aggregate(&config, &lookup, "A", &[], None).await;
    assert!(matches!(no_destinations, Err(QuoteError::InvalidInput(_))));

    let blank_destination = aggregate(&config, &lookup, "A", &dest(&["B", " "]), None).await;
    assert!(matches!(blank_destination, Err(QuoteError::InvalidInput(_))));
}
