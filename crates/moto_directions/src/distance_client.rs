use moto_pricing::aggregator::{DistanceLookup, LegEstimate};
use moto_pricing::km::Km;
use tracing::debug;

use crate::google_api::{GoogleDirectionsClient, GoogleDirectionsClientParams, RouteCandidate};

/// Distance-lookup capability backed by the Google Directions API.
pub struct DistanceClient {
    google: GoogleDirectionsClient,
}

impl DistanceClient {
    pub fn new(params: GoogleDirectionsClientParams) -> Self {
        Self {
            google: GoogleDirectionsClient::new(params),
        }
    }
}

impl DistanceLookup for DistanceClient {
    async fn lookup(&self, from: &str, to: &str) -> anyhow::Result<LegEstimate> {
        let candidates = self.google.fetch_routes(from, to).await?;
        let best =
            shortest_candidate(&candidates).ok_or_else(|| anyhow::anyhow!("no routes returned"))?;

        debug!(
            from,
            to,
            candidates = candidates.len(),
            summary = %best.summary,
            distance_meters = best.distance_meters,
            "picked shortest route"
        );

        Ok(to_leg_estimate(best))
    }
}

/// Minimum distance wins; a strict comparison keeps the earliest candidate
/// in provider order when distances tie.
pub fn shortest_candidate(candidates: &[RouteCandidate]) -> Option<&RouteCandidate> {
    let mut best: Option<&RouteCandidate> = None;
    for candidate in candidates {
        match best {
            Some(current) if candidate.distance_meters >= current.distance_meters => {}
            _ => best = Some(candidate),
        }
    }
    best
}

/// Meters become kilometers and seconds become whole minutes; each leg is
/// rounded on its own before any trip-level summing.
pub fn to_leg_estimate(candidate: &RouteCandidate) -> LegEstimate {
    LegEstimate {
        distance: Km::new(candidate.distance_meters / 1000.0),
        duration_minutes: (candidate.duration_seconds / 60.0).round().max(0.0) as u32,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(summary: &str, distance_meters: f64) -> RouteCandidate {
        RouteCandidate {
            summary: summary.to_string(),
            distance_meters,
            duration_seconds: 0.0,
        }
    }

    #[test]
    fn test_shortest_candidate_wins() {
        let candidates = vec![
            candidate("Costanera Norte", 12_300.0),
            candidate("Av. Providencia", 9_800.0),
            candidate("Vespucio Sur", 15_000.0),
        ];

        let best = shortest_candidate(&candidates).unwrap();
        assert_eq!(best.distance_meters, 9_800.0);
        assert_eq!(to_leg_estimate(best).distance, Km::new(9.8));
    }

    #[test]
    fn test_tie_keeps_provider_order() {
        let candidates = vec![
            candidate("first", 9_800.0),
            candidate("second", 9_800.0),
        ];

        assert_eq!(shortest_candidate(&candidates).unwrap().summary, "first");
    }

    #[test]
    fn test_no_candidates_gives_none() {
        assert!(shortest_candidate(&[]).is_none());
    }

    #[test]
    fn test_units_convert_and_round() {
        let estimate = to_leg_estimate(&RouteCandidate {
            summary: String::new(),
            distance_meters: 8_500.0,
            duration_seconds: 1_830.0,
        });

        assert_eq!(estimate.distance, Km::new(8.5));
        // 30.5 minutes rounds away from zero
        assert_eq!(estimate.duration_minutes, 31);
    }
}
