//! Itinerary construction
//!
//! Turns the ordered places resolved for a query into consecutive legs with
//! great-circle distances.
//!
//! Per-leg distances and the total are truncated independently: the total is
//! `floor(Σ d)`, not `Σ floor(d)`, so the displayed legs may not add up to the
//! displayed total.

use crate::coord::Coordinates;
use crate::engine::Place;
use serde::Serialize;

/// One leg of an itinerary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacePair {
    pub departure: Place,

    /// Absent for a single-place result
    pub arrival: Option<Place>,

    /// Great-circle distance, rounded down to whole kilometers
    pub distance_km: u64,
}

/// Legs built from a place sequence
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Itinerary {
    pub pairs: Vec<PlacePair>,

    /// Sum of the exact leg distances, rounded down
    pub total_distance_km: u64,

    /// The engine's interpretation of the query, place by place
    pub corrected_query_string: String,

    /// Set only when exactly one place was resolved
    pub map_center: Option<Coordinates>,
}

/// Build the itinerary for an ordered sequence of places
///
/// - no place: no leg, total 0
/// - one place: one leg without arrival, distance 0, map centered on it
/// - N places: N-1 consecutive legs
pub fn build_itinerary(places: &[Place]) -> Itinerary {
    let corrected_query_string = corrected_query_string(places);

    match places {
        [] => Itinerary {
            pairs: Vec::new(),
            total_distance_km: 0,
            corrected_query_string,
            map_center: None,
        },
        [place] => Itinerary {
            pairs: vec![PlacePair {
                departure: place.clone(),
                arrival: None,
                distance_km: 0,
            }],
            total_distance_km: 0,
            corrected_query_string,
            map_center: Some(place.coordinates),
        },
        _ => {
            let mut total = 0.0;
            let pairs = places
                .windows(2)
                .map(|leg| {
                    let distance = leg[0].coordinates.distance_km(&leg[1].coordinates);
                    total += distance;
                    PlacePair {
                        departure: leg[0].clone(),
                        arrival: Some(leg[1].clone()),
                        distance_km: truncate_km(distance),
                    }
                })
                .collect();

            Itinerary {
                pairs,
                total_distance_km: truncate_km(total),
                corrected_query_string,
                map_center: None,
            }
        }
    }
}

/// Join the corrected keywords of every place, in place order
///
/// `[["ny", "newyork"], ["jfk"]]` gives `"ny newyork jfk"`.
pub fn corrected_query_string(places: &[Place]) -> String {
    places
        .iter()
        .map(|p| p.corrected_keywords.join(" "))
        .collect::<Vec<_>>()
        .join(" ")
}

fn truncate_km(distance: f64) -> u64 {
    distance.floor() as u64
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::geo::EARTH_DIAMETER_KM;

    /// Latitude delta (degrees, along a meridian) covering `km` kilometers
    fn degrees_for_km(km: f64) -> f64 {
        (km / (EARTH_DIAMETER_KM / 2.0)).to_degrees()
    }

    #[test]
    fn test_no_place() {
        let itinerary = build_itinerary(&[]);
        assert!(itinerary.pairs.is_empty());
        assert_eq!(itinerary.total_distance_km, 0);
        assert_eq!(itinerary.corrected_query_string, "");
        assert!(itinerary.map_center.is_none());
    }

    #[test]
    fn test_single_place() {
        let nce = Place::new("NCE", 43.6584, 7.2159).with_keywords(["nce"]);
        let itinerary = build_itinerary(&[nce.clone()]);

        assert_eq!(itinerary.pairs.len(), 1);
        assert_eq!(itinerary.pairs[0].departure, nce);
        assert!(itinerary.pairs[0].arrival.is_none());
        assert_eq!(itinerary.pairs[0].distance_km, 0);
        assert_eq!(itinerary.total_distance_km, 0);
        assert_eq!(itinerary.map_center, Some(Coordinates::new(43.6584, 7.2159)));
    }

    #[test]
    fn test_three_places() {
        let jfk = Place::new("JFK", 40.6413, -73.7781);
        let cdg = Place::new("CDG", 49.0097, 2.5479);
        let nrt = Place::new("NRT", 35.7720, 140.3929);
        let itinerary = build_itinerary(&[jfk.clone(), cdg.clone(), nrt.clone()]);

        assert_eq!(itinerary.pairs.len(), 2);
        assert_eq!(itinerary.pairs[0].departure.code, "JFK");
        assert_eq!(itinerary.pairs[0].arrival.as_ref().unwrap().code, "CDG");
        assert_eq!(itinerary.pairs[1].departure.code, "CDG");
        assert_eq!(itinerary.pairs[1].arrival.as_ref().unwrap().code, "NRT");
        assert!(itinerary.map_center.is_none());

        let d1 = jfk.coordinates.distance_km(&cdg.coordinates);
        let d2 = cdg.coordinates.distance_km(&nrt.coordinates);
        assert_eq!(itinerary.pairs[0].distance_km, d1.floor() as u64);
        assert_eq!(itinerary.pairs[1].distance_km, d2.floor() as u64);
        assert_eq!(itinerary.total_distance_km, (d1 + d2).floor() as u64);
    }

    #[test]
    fn test_total_is_floored_after_summing() {
        // Two legs of 10.6 km each: floor(21.2) = 21, while 10 + 10 = 20
        let step = degrees_for_km(10.6);
        let places = [
            Place::new("AAA", 0.0, 0.0),
            Place::new("BBB", step, 0.0),
            Place::new("CCC", 2.0 * step, 0.0),
        ];

        let itinerary = build_itinerary(&places);
        assert_eq!(itinerary.pairs[0].distance_km, 10);
        assert_eq!(itinerary.pairs[1].distance_km, 10);
        assert_eq!(itinerary.total_distance_km, 21);
    }

    #[test]
    fn test_corrected_query_string() {
        let places = [
            Place::new("JFK", 40.6413, -73.7781).with_keywords(["ny", "newyork"]),
            Place::new("JFK", 40.6413, -73.7781).with_keywords(["jfk"]),
        ];
        assert_eq!(corrected_query_string(&places), "ny newyork jfk");
        assert_eq!(build_itinerary(&places).corrected_query_string, "ny newyork jfk");
    }

    #[test]
    fn test_repeated_place_gives_zero_leg() {
        let cdg = Place::new("CDG", 49.0097, 2.5479);
        let itinerary = build_itinerary(&[cdg.clone(), cdg]);
        assert_eq!(itinerary.pairs.len(), 1);
        assert_eq!(itinerary.pairs[0].distance_km, 0);
        assert_eq!(itinerary.total_distance_km, 0);
    }
}
