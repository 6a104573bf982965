//! URL output formatter

use crate::config::Config;
use crate::error::{Error, Result};
use crate::format::OutputFormatter;
use crate::search::SearchResponse;

/// URL formatter - outputs a map URL centered like the result page
pub struct UrlFormatter;

impl UrlFormatter {
    /// Format URL with optional provider override
    pub fn format_with_provider(
        &self,
        response: &SearchResponse,
        config: &Config,
        provider: Option<&str>,
    ) -> Result<String> {
        let center = response
            .center()
            .ok_or_else(|| Error::Config("No map center for an empty result".to_string()))?;

        config.format_url(
            provider,
            center,
            response.zoom_level,
            response.map_type_value,
        )
    }
}

impl OutputFormatter for UrlFormatter {
    fn name(&self) -> &str {
        "url"
    }

    fn description(&self) -> &str {
        "Map URL for the result"
    }

    fn format(&self, response: &SearchResponse, config: &Config) -> Result<String> {
        self.format_with_provider(response, config, None)
    }
}
