//! Display flow
//!
//! One request = one engine session:
//! open → (random draw) → search → decode → close, then itinerary building.
//! `SearchResponse` is the model handed to the presentation layer.

use crate::constants::geo::{FALLBACK_CENTER_LAT, FALLBACK_CENTER_LON};
use crate::constants::help;
use crate::coord::Coordinates;
use crate::engine::{EngineSession, EngineSettings, Place, SearchEngine};
use crate::error::{Error, Result};
use crate::itinerary::{build_itinerary, PlacePair};
use crate::query::{MapType, RequestParams};
use serde::{Deserialize, Serialize};
use tracing::{error, info};

/// One leg as shown to the user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacePairView {
    pub dep: Option<Place>,
    pub arr: Option<Place>,
    pub dist: u64,
}

impl From<PlacePair> for PlacePairView {
    fn from(pair: PlacePair) -> Self {
        Self {
            dep: Some(pair.departure),
            arr: pair.arrival,
            dist: pair.distance_km,
        }
    }
}

/// Map center
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MapCenter {
    pub lat: f64,
    pub lon: f64,
}

impl From<Coordinates> for MapCenter {
    fn from(c: Coordinates) -> Self {
        Self {
            lat: c.lat,
            lon: c.lon,
        }
    }
}

impl MapCenter {
    fn fallback() -> Self {
        Self {
            lat: FALLBACK_CENTER_LAT,
            lon: FALLBACK_CENTER_LON,
        }
    }
}

/// Everything the presentation layer renders for one request
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResponse {
    pub place_list: Vec<Place>,
    pub place_pair_list: Vec<PlacePairView>,
    pub nb_of_places: usize,
    pub dist_total: u64,
    pub unmatched_keyword_list: Vec<String>,
    pub n_unmatched_kw: usize,
    pub query_string: String,
    pub corrected_query_string: String,
    /// Absent on the empty-state page
    #[serde(rename = "coord_for_GMap_center")]
    pub coord_for_gmap_center: Option<MapCenter>,
    pub zoom_level: i32,
    pub map_type_value: MapType,
    /// Help text when nothing in the query was recognised
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SearchResponse {
    /// Model of the empty-state page (no query, no engine call)
    pub fn empty(params: &RequestParams) -> Self {
        Self {
            place_list: Vec::new(),
            place_pair_list: vec![PlacePairView {
                dep: None,
                arr: None,
                dist: 0,
            }],
            nb_of_places: 0,
            dist_total: 0,
            unmatched_keyword_list: Vec::new(),
            n_unmatched_kw: 0,
            query_string: params.query_string.clone(),
            corrected_query_string: params.query_string.clone(),
            coord_for_gmap_center: None,
            zoom_level: params.zoom_level,
            map_type_value: params.map_type,
            message: None,
        }
    }

    /// Map center as coordinates, if any
    pub fn center(&self) -> Option<Coordinates> {
        self.coord_for_gmap_center
            .map(|c| Coordinates::new(c.lat, c.lon))
    }
}

/// Help shown when the engine recognised nothing in `query`
fn not_recognised_message(query: &str) -> String {
    format!(
        "Your entry (\"{}\") was not recognised:\n{}\n{}",
        query,
        help::SINGLE_PLACE,
        help::ITINERARY
    )
}

/// Resolve a request against the engine and build the display model
///
/// Blocking: call from a plain thread or `spawn_blocking`. The engine
/// session is finalised on every path once it has been opened.
pub fn run(
    engine: &dyn SearchEngine,
    settings: &EngineSettings,
    params: &RequestParams,
) -> Result<SearchResponse> {
    if params.is_empty() {
        return Ok(SearchResponse::empty(params));
    }

    let mut session = EngineSession::open(engine, settings).inspect_err(|e| error!("{}", e))?;

    let query_string = params.resolve_query(&mut session)?;
    let answer = session.search(&query_string)?;
    session.close();

    if !answer.ok {
        let msg = answer.error_message.unwrap_or_default();
        error!("Error in the search engine: {}", msg);
        return Err(Error::EngineQueryFailed(msg));
    }

    let itinerary = build_itinerary(&answer.places);
    info!(
        "Query string: \"{}\", corrected query string: \"{}\", unmatched keywords: {:?}",
        query_string, itinerary.corrected_query_string, answer.unmatched_keywords
    );

    let nb_of_places = answer.places.len();
    let message = (nb_of_places == 0).then(|| not_recognised_message(&query_string));
    let center = itinerary
        .map_center
        .map(MapCenter::from)
        .unwrap_or_else(MapCenter::fallback);

    Ok(SearchResponse {
        place_list: answer.places,
        place_pair_list: itinerary.pairs.into_iter().map(PlacePairView::from).collect(),
        nb_of_places,
        dist_total: itinerary.total_distance_km,
        n_unmatched_kw: answer.unmatched_keywords.len(),
        unmatched_keyword_list: answer.unmatched_keywords,
        query_string,
        corrected_query_string: itinerary.corrected_query_string,
        coord_for_gmap_center: Some(center),
        zoom_level: params.zoom_level,
        map_type_value: params.map_type,
        message,
    })
}
