//! GPX output formatter

use crate::config::Config;
use crate::engine::Place;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::SearchResponse;

/// GPX formatter - outputs the itinerary as a GPX route
pub struct GpxFormatter;

/// Escape text for XML element content
fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn route_point(place: &Place) -> String {
    let mut point = format!(
        "    <rtept lat=\"{}\" lon=\"{}\">\n",
        place.coordinates.lat, place.coordinates.lon
    );
    point.push_str(&format!("      <name>{}</name>\n", escape(&place.code)));
    if let Some(name) = &place.name {
        point.push_str(&format!("      <desc>{}</desc>\n", escape(name)));
    }
    point.push_str("    </rtept>\n");
    point
}

impl OutputFormatter for GpxFormatter {
    fn name(&self) -> &str {
        "gpx"
    }

    fn description(&self) -> &str {
        "GPX route file"
    }

    fn format(&self, response: &SearchResponse, _config: &Config) -> Result<String> {
        let mut gpx = String::new();

        gpx.push_str(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        gpx.push('\n');
        gpx.push_str(r#"<gpx version="1.1" creator="trep-search">"#);
        gpx.push('\n');

        gpx.push_str("  <metadata>\n");
        gpx.push_str(&format!(
            "    <name>{}</name>\n",
            escape(&response.corrected_query_string)
        ));
        gpx.push_str(&format!(
            "    <desc>Total distance: {} km</desc>\n",
            response.dist_total
        ));
        gpx.push_str("  </metadata>\n");

        if !response.place_list.is_empty() {
            gpx.push_str("  <rte>\n");
            gpx.push_str(&format!(
                "    <name>{}</name>\n",
                escape(&response.query_string)
            ));
            for place in &response.place_list {
                gpx.push_str(&route_point(place));
            }
            gpx.push_str("  </rte>\n");
        }

        gpx.push_str("</gpx>\n");
        Ok(gpx)
    }
}
