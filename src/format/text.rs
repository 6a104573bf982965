//! Human-readable text output formatter

use crate::config::Config;
use crate::engine::Place;
use crate::error::Result;
use crate::format::OutputFormatter;
use crate::search::SearchResponse;

/// Text formatter - outputs human-readable itinerary
pub struct TextFormatter;

fn describe(place: &Place) -> String {
    match &place.name {
        Some(name) => format!(
            "{} ({}) [{:.4}, {:.4}]",
            place.code, name, place.coordinates.lat, place.coordinates.lon
        ),
        None => format!(
            "{} [{:.4}, {:.4}]",
            place.code, place.coordinates.lat, place.coordinates.lon
        ),
    }
}

impl OutputFormatter for TextFormatter {
    fn name(&self) -> &str {
        "text"
    }

    fn description(&self) -> &str {
        "Human-readable text"
    }

    fn format(&self, response: &SearchResponse, _config: &Config) -> Result<String> {
        let mut output = String::new();

        output.push_str(&format!("Query: \"{}\"\n", response.query_string));
        if response.corrected_query_string != response.query_string {
            output.push_str(&format!(
                "Interpreted as: \"{}\"\n",
                response.corrected_query_string
            ));
        }

        if let Some(message) = &response.message {
            output.push('\n');
            output.push_str(message);
            output.push('\n');
            return Ok(output);
        }

        output.push_str(&format!("\nPlaces ({}):\n", response.nb_of_places));
        for place in &response.place_list {
            output.push_str(&format!("  {}\n", describe(place)));
        }

        if response.nb_of_places >= 2 {
            output.push_str("\nItinerary:\n");
            for pair in &response.place_pair_list {
                if let (Some(dep), Some(arr)) = (&pair.dep, &pair.arr) {
                    output.push_str(&format!(
                        "  {} -> {}: {} km\n",
                        dep.code, arr.code, pair.dist
                    ));
                }
            }
            output.push_str(&format!("  Total: {} km\n", response.dist_total));
        }

        if response.n_unmatched_kw > 0 {
            output.push_str(&format!(
                "\nUnmatched keywords: {}\n",
                response.unmatched_keyword_list.join(", ")
            ));
        }

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::fixtures::response_for;

    #[test]
    fn test_text_format_itinerary() {
        let output = TextFormatter
            .format(&response_for("jfk cdg nrt"), &Config::default())
            .unwrap();

        assert!(output.contains("Query: \"jfk cdg nrt\""));
        assert!(output.contains("Places (3):"));
        assert!(output.contains("JFK -> CDG:"));
        assert!(output.contains("CDG -> NRT:"));
        assert!(output.contains("Total:"));
    }

    #[test]
    fn test_text_format_unrecognised() {
        let output = TextFormatter
            .format(&response_for("atlantis"), &Config::default())
            .unwrap();

        assert!(output.contains("was not recognised"));
        assert!(!output.contains("Itinerary:"));
    }

    #[test]
    fn test_text_format_interpretation() {
        let output = TextFormatter
            .format(&response_for("Paris  zzz"), &Config::default())
            .unwrap();

        assert!(output.contains("Interpreted as: \"paris\""));
        assert!(output.contains("Unmatched keywords: zzz"));
    }

    #[test]
    fn test_text_formatter_info() {
        assert_eq!(TextFormatter.name(), "text");
        assert!(!TextFormatter.description().is_empty());
    }
}
