//! Centralized constants for the trep-search crate
//!
//! This module consolidates constants that are used across multiple modules
//! to avoid duplication and ensure consistency.

/// Geographic constants
pub mod geo {
    /// Earth diameter in kilometers used by the great-circle formula
    pub const EARTH_DIAMETER_KM: f64 = 12_756.0;

    /// Map center used when the result is not a single place
    pub const FALLBACK_CENTER_LAT: f64 = 10.0;

    /// Map center used when the result is not a single place
    pub const FALLBACK_CENTER_LON: f64 = 0.0;
}

/// Map display parameters (Google-Maps style)
pub mod map {
    /// Lowest accepted zoom level
    pub const MIN_ZOOM_LEVEL: i32 = 0;

    /// Highest accepted zoom level
    pub const MAX_ZOOM_LEVEL: i32 = 21;
}

/// Request parameter names understood by the index route
pub mod params {
    /// Free-text query
    pub const QUERY: &str = "q";

    /// Draw and resolve one random place
    pub const SHOW_AIRPORT: &str = "show_airport";

    /// Draw and resolve three random places
    pub const SHOW_ITINERARY: &str = "show_itinerary";

    /// Map zoom level
    pub const ZOOM_LEVEL: &str = "z";

    /// Map type
    pub const MAP_TYPE: &str = "mt";
}

/// Number of places drawn for each random directive
pub mod draws {
    /// `show_airport`
    pub const SINGLE_PLACE: usize = 1;

    /// `show_itinerary` (a two-leg itinerary)
    pub const ITINERARY: usize = 3;
}

/// Canned help text shown when nothing in the query was recognised
pub mod help {
    pub const SINGLE_PLACE: &str = "Enter a three-letter code or the name of an airport or city to find out its coordinates (e.g., JFK, or Rio de Janeiro)";

    pub const ITINERARY: &str = "Enter a sequence of two three-letter place codes or names to find out the distance between those airports (e.g., JFK CDG Tokyo)";
}
