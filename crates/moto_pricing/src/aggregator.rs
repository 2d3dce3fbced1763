use std::future::Future;

use futures::future::join_all;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    config::{AggregationPolicy, QuoteConfig},
    engine::{self, PriceBreakdown, PricingError},
    km::Km,
};

/// Distance and travel time for one leg, as reported by a routing
/// provider (already converted to km and whole minutes).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct LegEstimate {
    pub distance: Km,
    pub duration_minutes: u32,
}

/// Capability to resolve the driving distance between two addresses.
/// Implementations must bound every call with a timeout; a timed-out or
/// failed call is simply an `Err`, which the aggregator treats as the
/// provider being unavailable for that leg.
pub trait DistanceLookup {
    fn lookup(
        &self,
        from: &str,
        to: &str,
    ) -> impl Future<Output = anyhow::Result<LegEstimate>> + Send;
}

#[derive(Debug, Error)]
pub enum QuoteError {
    #[error("invalid quote request: {0}")]
    InvalidInput(String),

    #[error("no route available from {from} to {to} (leg {leg})")]
    DistanceUnavailable {
        leg: usize,
        from: String,
        to: String,
        #[source]
        source: anyhow::Error,
    },

    #[error(transparent)]
    Pricing(#[from] PricingError),
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Leg {
    pub from: String,
    pub to: String,
    pub distance: Km,
    pub duration_minutes: u32,
    /// Present only when the aggregation policy prices each leg on its own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<PriceBreakdown>,
    pub used_fallback: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Quote {
    pub origin: String,
    pub legs: Vec<Leg>,
    pub total_distance: Km,
    pub total_duration_minutes: u32,
    pub price: PriceBreakdown,
    /// True when any leg was filled in from the configured fallback
    /// because the routing provider could not answer.
    pub used_fallback: bool,
}

/// Builds a quote for a trip from `origin` through `destinations`.
///
/// The aggregation policy decides both how legs are constructed and how
/// they are priced; the two always move together:
///
/// - `ChainedTrip`: stops chain one after another and the summed trip
///   distance is priced once. Lookups run in order, since each leg starts
///   where the previous one ended.
/// - `FanOutPerLeg`: every leg runs from the origin, lookups are issued
///   concurrently, each leg is priced on its own and the trip breakdown
///   is the componentwise sum.
pub async fn aggregate<L>(
    config: &QuoteConfig,
    lookup: &L,
    origin: &str,
    destinations: &[String],
    coupon_code: Option<&str>,
) -> Result<Quote, QuoteError>
where
    L: DistanceLookup + Sync,
{
    let origin = origin.trim();
    if origin.is_empty() {
        return Err(QuoteError::InvalidInput("origin must not be empty".into()));
    }
    if destinations.is_empty() {
        return Err(QuoteError::InvalidInput(
            "at least one destination is required".into(),
        ));
    }
    if let Some(index) = destinations.iter().position(|d| d.trim().is_empty()) {
        return Err(QuoteError::InvalidInput(format!(
            "destination {index} must not be empty"
        )));
    }

    let mut legs = match config.aggregation.policy {
        AggregationPolicy::ChainedTrip => {
            let mut legs = Vec::with_capacity(destinations.len());
            let mut from = origin;
            for (index, to) in destinations.iter().enumerate() {
                legs.push(resolve_leg(config, lookup, index, from, to.trim()).await?);
                from = to.trim();
            }
            legs
        }
        AggregationPolicy::FanOutPerLeg => {
            let lookups = destinations
                .iter()
                .enumerate()
                .map(|(index, to)| resolve_leg(config, lookup, index, origin, to.trim()));
            join_all(lookups)
                .await
                .into_iter()
                .collect::<Result<Vec<_>, _>>()?
        }
    };

    let total_distance: Km = legs.iter().map(|leg| leg.distance).sum();
    let total_duration_minutes: u32 = legs.iter().map(|leg| leg.duration_minutes).sum();
    let used_fallback = legs.iter().any(|leg| leg.used_fallback);

    let price = match config.aggregation.policy {
        AggregationPolicy::ChainedTrip => engine::price(&config.tariff, total_distance, coupon_code)?,
        AggregationPolicy::FanOutPerLeg => {
            for leg in &mut legs {
                leg.price = Some(engine::price(&config.tariff, leg.distance, coupon_code)?);
            }
            PriceBreakdown::combined(legs.iter().filter_map(|leg| leg.price.as_ref()))
        }
    };

    Ok(Quote {
        origin: origin.to_string(),
        legs,
        total_distance,
        total_duration_minutes,
        price,
        used_fallback,
    })
}

async fn resolve_leg<L>(
    config: &QuoteConfig,
    lookup: &L,
    index: usize,
    from: &str,
    to: &str,
) -> Result<Leg, QuoteError>
where
    L: DistanceLookup + Sync,
{
    match lookup.lookup(from, to).await {
        Ok(estimate) => Ok(Leg {
            from: from.to_string(),
            to: to.to_string(),
            distance: estimate.distance,
            duration_minutes: estimate.duration_minutes,
            price: None,
            used_fallback: false,
        }),
        Err(source) => match &config.aggregation.fallback {
            Some(fallback) => {
                tracing::warn!(
                    leg = index,
                    from,
                    to,
                    error = %source,
                    "distance lookup failed, using configured fallback"
                );
                Ok(Leg {
                    from: from.to_string(),
                    to: to.to_string(),
                    distance: fallback.distance,
                    duration_minutes: fallback.duration_minutes,
                    price: None,
                    used_fallback: true,
                })
            }
            None => Err(QuoteError::DistanceUnavailable {
                leg: index,
                from: from.to_string(),
                to: to.to_string(),
                source,
            }),
        },
    }
}
