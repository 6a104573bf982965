//! Request parameter normalization
//!
//! Turns the query-string parameters and the submitted form fields of one
//! request into a single `RequestParams`. Both sources go through the same
//! routine; the form is applied last, so its values win.

use crate::constants::draws;
use crate::constants::map::{MAX_ZOOM_LEVEL, MIN_ZOOM_LEVEL};
use crate::constants::params;
use crate::engine::EngineSession;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::{debug, warn};

/// One source of request parameters (query string or form body)
pub type ParamSource = HashMap<String, String>;

/// Map type understood by the map widget
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "UPPERCASE")]
pub enum MapType {
    Roadmap,
    Satellite,
    #[default]
    Hybrid,
    Terrain,
}

impl MapType {
    /// Base layer name for map URL providers
    pub fn basemap(&self) -> &'static str {
        match self {
            Self::Roadmap => "roadmap",
            Self::Satellite | Self::Hybrid => "satellite",
            Self::Terrain => "terrain",
        }
    }
}

impl std::fmt::Display for MapType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Roadmap => write!(f, "ROADMAP"),
            Self::Satellite => write!(f, "SATELLITE"),
            Self::Hybrid => write!(f, "HYBRID"),
            Self::Terrain => write!(f, "TERRAIN"),
        }
    }
}

impl std::str::FromStr for MapType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_uppercase().as_str() {
            "ROADMAP" => Ok(Self::Roadmap),
            "SATELLITE" => Ok(Self::Satellite),
            "HYBRID" => Ok(Self::Hybrid),
            "TERRAIN" => Ok(Self::Terrain),
            _ => Err(Error::InvalidParameter(format!("Unknown map type: {}", s))),
        }
    }
}

/// Map display values in force before any request parameter is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MapDefaults {
    pub zoom_level: i32,
    pub map_type: MapType,
}

impl Default for MapDefaults {
    fn default() -> Self {
        Self {
            zoom_level: crate::config::defaults::DEFAULT_ZOOM_LEVEL,
            map_type: MapType::default(),
        }
    }
}

impl MapDefaults {
    /// Parse a zoom level, clamping it to the range maps accept
    pub fn parse_zoom(value: &str) -> Result<i32> {
        value
            .trim()
            .parse::<i32>()
            .map(Self::clamp_zoom)
            .map_err(|_| Error::InvalidParameter(format!("Invalid zoom level: {}", value)))
    }

    /// Clamp a zoom level to [MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL]
    pub fn clamp_zoom(zoom_level: i32) -> i32 {
        zoom_level.clamp(MIN_ZOOM_LEVEL, MAX_ZOOM_LEVEL)
    }
}

/// Normalized parameters of one request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RequestParams {
    /// Free-text query; empty for random directives until resolved
    pub query_string: String,

    /// Map zoom level
    pub zoom_level: i32,

    /// Map type
    pub map_type: MapType,

    /// Number of random places to draw (0, 1 or 3)
    pub random_draw_count: usize,
}

impl RequestParams {
    /// Parameters for a plain text query
    pub fn for_query(query_string: impl Into<String>, defaults: &MapDefaults) -> Self {
        Self {
            query_string: query_string.into(),
            zoom_level: defaults.zoom_level,
            map_type: defaults.map_type,
            random_draw_count: 0,
        }
    }

    /// Parameters for a random draw of `count` places
    pub fn for_random(count: usize, defaults: &MapDefaults) -> Self {
        Self {
            query_string: String::new(),
            zoom_level: defaults.zoom_level,
            map_type: defaults.map_type,
            random_draw_count: count,
        }
    }

    /// Build parameters from sources listed in increasing precedence
    ///
    /// Typically `[query_string_params, form_params]`.
    pub fn from_sources(sources: &[&ParamSource], defaults: &MapDefaults) -> Self {
        let mut params = Self::for_query(String::new(), defaults);
        for source in sources {
            params.apply(source);
        }

        debug!(
            "Normalized request: query={:?} draws={} zoom={} map_type={}",
            params.query_string, params.random_draw_count, params.zoom_level, params.map_type
        );
        params
    }

    /// Apply one parameter source on top of the current values
    fn apply(&mut self, source: &ParamSource) {
        if source.contains_key(params::SHOW_AIRPORT) {
            self.query_string.clear();
            self.random_draw_count = draws::SINGLE_PLACE;
        } else if source.contains_key(params::SHOW_ITINERARY) {
            self.query_string.clear();
            self.random_draw_count = draws::ITINERARY;
        } else if let Some(query) = source.get(params::QUERY) {
            self.query_string = query.clone();
            self.random_draw_count = 0;
        }

        if let Some(zoom) = source.get(params::ZOOM_LEVEL) {
            match MapDefaults::parse_zoom(zoom) {
                Ok(zoom_level) => self.zoom_level = zoom_level,
                Err(e) => warn!("{}, keeping zoom level {}", e, self.zoom_level),
            }
        }

        if let Some(map_type) = source.get(params::MAP_TYPE) {
            match map_type.parse::<MapType>() {
                Ok(map_type) => self.map_type = map_type,
                Err(e) => warn!("{}, keeping map type {}", e, self.map_type),
            }
        }
    }

    /// Whether the request carries neither query text nor a random directive
    pub fn is_empty(&self) -> bool {
        self.query_string.is_empty() && !self.is_random()
    }

    /// Whether the query comes from a random draw
    pub fn is_random(&self) -> bool {
        self.random_draw_count > 0
    }

    /// Produce the query string to hand to the engine
    ///
    /// For random directives this asks the engine to draw places and joins
    /// their codes with spaces.
    pub fn resolve_query(&self, session: &mut EngineSession<'_>) -> Result<String> {
        if !self.is_random() {
            return Ok(self.query_string.clone());
        }

        let answer = session.generate_random(self.random_draw_count)?;
        if !answer.ok {
            return Err(Error::RandomGenerationFailed(format!(
                "The engine cannot generate {} places: {}",
                self.random_draw_count,
                answer.error_message.unwrap_or_default()
            )));
        }

        let codes: Vec<&str> = answer.places.iter().map(|p| p.code.as_str()).collect();
        if codes.is_empty() {
            return Err(Error::RandomGenerationFailed(format!(
                "The engine cannot generate {} places",
                self.random_draw_count
            )));
        }

        Ok(codes.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::catalog::{CatalogEngine, CatalogEntry};
    use crate::engine::testing::ScriptedEngine;
    use crate::engine::{EngineSettings, QueryAnswer};

    fn source(pairs: &[(&str, &str)]) -> ParamSource {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn normalize(get: &[(&str, &str)], post: &[(&str, &str)]) -> RequestParams {
        let get = source(get);
        let post = source(post);
        RequestParams::from_sources(&[&get, &post], &MapDefaults::default())
    }

    #[test]
    fn test_defaults_when_nothing_given() {
        let params = normalize(&[], &[]);
        assert_eq!(params.query_string, "");
        assert_eq!(params.zoom_level, 5);
        assert_eq!(params.map_type, MapType::Hybrid);
        assert_eq!(params.random_draw_count, 0);
        assert!(params.is_empty());
    }

    #[test]
    fn test_post_overrides_get() {
        let params = normalize(&[("q", "Paris")], &[("q", "Tokyo")]);
        assert_eq!(params.query_string, "Tokyo");
        assert!(!params.is_empty());
    }

    #[test]
    fn test_query_kept_verbatim() {
        let params = normalize(&[("q", "  rio de janeiro ")], &[]);
        assert_eq!(params.query_string, "  rio de janeiro ");
    }

    #[test]
    fn test_random_directives() {
        let params = normalize(&[("show_airport", "1")], &[]);
        assert_eq!(params.random_draw_count, 1);
        assert!(params.is_random());
        assert!(!params.is_empty());

        let params = normalize(&[("show_itinerary", "")], &[]);
        assert_eq!(params.random_draw_count, 3);
    }

    #[test]
    fn test_directive_wins_over_query_in_same_source() {
        let params = normalize(&[("q", "nce"), ("show_airport", "1")], &[]);
        assert_eq!(params.random_draw_count, 1);
        assert_eq!(params.query_string, "");
    }

    #[test]
    fn test_form_query_cancels_get_directive() {
        let params = normalize(&[("show_itinerary", "1")], &[("q", "lhr")]);
        assert_eq!(params.random_draw_count, 0);
        assert_eq!(params.query_string, "lhr");
    }

    #[test]
    fn test_form_directive_cancels_get_query() {
        let params = normalize(&[("q", "lhr")], &[("show_airport", "1")]);
        assert_eq!(params.random_draw_count, 1);
        assert_eq!(params.query_string, "");
    }

    #[test]
    fn test_map_parameters() {
        let params = normalize(&[("z", "3"), ("mt", "roadmap")], &[("mt", "TERRAIN")]);
        assert_eq!(params.zoom_level, 3);
        assert_eq!(params.map_type, MapType::Terrain);
    }

    #[test]
    fn test_invalid_map_parameters_are_ignored() {
        let params = normalize(&[("z", "close"), ("mt", "paper")], &[]);
        assert_eq!(params.zoom_level, 5);
        assert_eq!(params.map_type, MapType::Hybrid);

        // A bad form value does not undo a good query-string value
        let params = normalize(&[("z", "7")], &[("z", "x")]);
        assert_eq!(params.zoom_level, 7);
    }

    #[test]
    fn test_zoom_is_clamped() {
        assert_eq!(normalize(&[("z", "40")], &[]).zoom_level, 21);
        assert_eq!(normalize(&[("z", "-2")], &[]).zoom_level, 0);
    }

    #[test]
    fn test_strict_parsers() {
        assert!(matches!(
            MapDefaults::parse_zoom("abc"),
            Err(Error::InvalidParameter(_))
        ));
        assert!(matches!(
            "STREET".parse::<MapType>(),
            Err(Error::InvalidParameter(_))
        ));
        assert_eq!("Satellite".parse::<MapType>().unwrap(), MapType::Satellite);
        assert_eq!(MapType::Roadmap.to_string(), "ROADMAP");
    }

    #[test]
    fn test_resolve_plain_query_skips_engine() {
        let engine = ScriptedEngine::new();
        let settings = EngineSettings::default();
        let mut session = EngineSession::open(&engine, &settings).unwrap();

        let params = RequestParams::for_query("nce", &MapDefaults::default());
        assert_eq!(params.resolve_query(&mut session).unwrap(), "nce");
        assert_eq!(engine.generate_calls(), 0);
    }

    #[test]
    fn test_resolve_random_query() {
        let engine = CatalogEngine::from_entries(vec![
            CatalogEntry::new("NCE", "Nice", 43.6584, 7.2159),
            CatalogEntry::new("CDG", "Paris Charles de Gaulle", 49.0097, 2.5479),
            CatalogEntry::new("JFK", "New York John F Kennedy", 40.6413, -73.7781),
        ]);
        let settings = EngineSettings::default();
        let mut session = EngineSession::open(&engine, &settings).unwrap();

        let params = RequestParams::for_random(3, &MapDefaults::default());
        let query = params.resolve_query(&mut session).unwrap();
        let mut codes: Vec<&str> = query.split(' ').collect();
        codes.sort();
        assert_eq!(codes, vec!["CDG", "JFK", "NCE"]);
    }

    #[test]
    fn test_resolve_random_failure_is_surfaced() {
        let engine = ScriptedEngine::new().with_generate_answer(QueryAnswer::failure(
            "not enough places",
        ));
        let settings = EngineSettings::default();
        let mut session = EngineSession::open(&engine, &settings).unwrap();

        let params = RequestParams::for_random(1, &MapDefaults::default());
        let err = params.resolve_query(&mut session).unwrap_err();
        assert!(matches!(err, Error::RandomGenerationFailed(_)));
    }

    #[test]
    fn test_resolve_random_empty_answer_is_surfaced() {
        let engine = ScriptedEngine::new()
            .with_generate_answer(QueryAnswer::success(Vec::new(), Vec::new()));
        let settings = EngineSettings::default();
        let mut session = EngineSession::open(&engine, &settings).unwrap();

        let params = RequestParams::for_random(3, &MapDefaults::default());
        assert!(matches!(
            params.resolve_query(&mut session),
            Err(Error::RandomGenerationFailed(_))
        ));
    }
}
