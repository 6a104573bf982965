//! Local place catalog engine
//!
//! Resolves queries against a CSV list of points of reference:
//!
//! ```text
//! code,name,latitude,longitude
//! NCE,Nice Cote d'Azur,43.6584,7.2159
//! ```
//!
//! Matching is exact and case-insensitive, on codes and on whole names
//! (longest multi-word name first). There is no spelling correction: the
//! corrected keywords of a place are its code, or its name words, lowercased.

use crate::engine::{
    wire, EngineHandle, EngineSettings, Place, PlaceKind, QueryAnswer, SearchEngine,
};
use crate::error::{Error, Result};
use rand::seq::SliceRandom;
use serde::Deserialize;
use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// One catalog row
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct CatalogEntry {
    pub code: String,
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
}

impl CatalogEntry {
    pub fn new(code: &str, name: &str, latitude: f64, longitude: f64) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            latitude,
            longitude,
        }
    }

    fn to_place(&self, corrected_keywords: Vec<String>) -> Place {
        Place::new(&self.code, self.latitude, self.longitude)
            .with_name(&self.name)
            .with_keywords(corrected_keywords)
    }
}

/// Where the catalog comes from
#[derive(Debug, Clone)]
enum CatalogSource {
    /// CSV file at `EngineSettings::index_path`, read on every initialisation
    IndexFile,
    /// Fixed in-memory entries
    Entries(Arc<Vec<CatalogEntry>>),
}

/// Catalog-backed search engine
#[derive(Debug, Clone)]
pub struct CatalogEngine {
    source: CatalogSource,
}

impl CatalogEngine {
    /// Engine reading the catalog file named by the engine settings
    pub fn new() -> Self {
        Self {
            source: CatalogSource::IndexFile,
        }
    }

    /// Engine over a fixed list of entries
    pub fn from_entries(entries: Vec<CatalogEntry>) -> Self {
        Self {
            source: CatalogSource::Entries(Arc::new(entries)),
        }
    }

    /// Read catalog entries from a CSV file
    ///
    /// Rows that fail to parse or carry out-of-range coordinates are skipped.
    pub fn load_entries(path: &Path) -> Result<Vec<CatalogEntry>> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_path(path)?;

        let mut entries = Vec::new();
        for (line, row) in reader.deserialize::<CatalogEntry>().enumerate() {
            match row {
                Ok(entry) => {
                    let coords = crate::coord::Coordinates::new(entry.latitude, entry.longitude);
                    if let Err(e) = coords.validate() {
                        warn!("Skipping catalog row {} ({}): {}", line + 2, entry.code, e);
                        continue;
                    }
                    entries.push(entry);
                }
                Err(e) => warn!("Skipping catalog row {}: {}", line + 2, e),
            }
        }

        Ok(entries)
    }
}

impl Default for CatalogEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchEngine for CatalogEngine {
    fn name(&self) -> &'static str {
        "catalog"
    }

    fn description(&self) -> &'static str {
        "Local place catalog (CSV), exact code and name lookup"
    }

    fn initialize(&self, settings: &EngineSettings) -> Result<Box<dyn EngineHandle + '_>> {
        let entries = match &self.source {
            CatalogSource::Entries(entries) => Arc::clone(entries),
            CatalogSource::IndexFile => {
                let entries = Self::load_entries(&settings.index_path).map_err(|e| {
                    Error::EngineUnavailable(format!(
                        "Cannot read place catalog {}: {}",
                        settings.index_path.display(),
                        e
                    ))
                })?;
                info!(
                    "Loaded {} places from {}",
                    entries.len(),
                    settings.index_path.display()
                );
                Arc::new(entries)
            }
        };

        if entries.is_empty() {
            return Err(Error::EngineUnavailable(
                "The place catalog is empty".to_string(),
            ));
        }

        Ok(Box::new(CatalogHandle::new(entries)))
    }
}

/// Open handle: the catalog plus its lookup tables
struct CatalogHandle {
    entries: Arc<Vec<CatalogEntry>>,
    by_code: HashMap<String, usize>,
    by_name: HashMap<String, usize>,
    max_name_words: usize,
    /// One entry per distinct code, in catalog order
    draw_pool: Vec<usize>,
    finalized: bool,
}

impl CatalogHandle {
    fn new(entries: Arc<Vec<CatalogEntry>>) -> Self {
        let mut by_code = HashMap::new();
        let mut by_name = HashMap::new();
        let mut max_name_words = 1;
        let mut draw_pool = Vec::new();

        for (idx, entry) in entries.iter().enumerate() {
            match by_code.entry(entry.code.to_uppercase()) {
                Entry::Vacant(slot) => {
                    slot.insert(idx);
                    draw_pool.push(idx);
                }
                Entry::Occupied(_) => {
                    debug!(
                        "Duplicate code {} ({}) left out of random draws",
                        entry.code, entry.name
                    );
                }
            }

            let words = name_words(&entry.name);
            if !words.is_empty() {
                max_name_words = max_name_words.max(words.len());
                by_name.entry(words.join(" ")).or_insert(idx);
            }
        }

        Self {
            entries,
            by_code,
            by_name,
            max_name_words,
            draw_pool,
            finalized: false,
        }
    }

    fn ensure_open(&self) -> Result<()> {
        if self.finalized {
            return Err(Error::EngineUnavailable(
                "The catalog handle has been finalised".to_string(),
            ));
        }
        Ok(())
    }

    /// Look up a run of query words as one code or one place name
    fn lookup(&self, tokens: &[&str]) -> Option<(usize, Vec<String>)> {
        if let [token] = tokens {
            if let Some(&idx) = self.by_code.get(&token.to_uppercase()) {
                return Some((idx, vec![self.entries[idx].code.to_lowercase()]));
            }
        }

        let key = tokens
            .iter()
            .map(|t| t.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ");
        self.by_name
            .get(&key)
            .map(|&idx| (idx, name_words(&self.entries[idx].name)))
    }

    fn resolve(&self, query: &str) -> QueryAnswer {
        let tokens: Vec<&str> = query
            .split(|c: char| c.is_whitespace() || c == ',')
            .filter(|t| !t.is_empty())
            .collect();

        let mut places = Vec::new();
        let mut unmatched = Vec::new();
        let mut i = 0;

        while i < tokens.len() {
            let longest = self.max_name_words.min(tokens.len() - i);
            let found = (1..=longest)
                .rev()
                .find_map(|len| self.lookup(&tokens[i..i + len]).map(|hit| (len, hit)));

            match found {
                Some((len, (idx, keywords))) => {
                    places.push(self.entries[idx].to_place(keywords));
                    i += len;
                }
                None => {
                    unmatched.push(tokens[i].to_string());
                    i += 1;
                }
            }
        }

        debug!(
            "Catalog resolved {} places, {} unmatched keywords",
            places.len(),
            unmatched.len()
        );
        QueryAnswer::success(places, unmatched)
    }
}

impl EngineHandle for CatalogHandle {
    fn generate_random(&mut self, _kind: PlaceKind, count: usize) -> Result<Vec<u8>> {
        self.ensure_open()?;

        let answer = if count > self.draw_pool.len() {
            QueryAnswer::failure(format!(
                "Cannot draw {} distinct places from a catalog of {}",
                count,
                self.draw_pool.len()
            ))
        } else {
            let mut rng = rand::thread_rng();
            let places = self
                .draw_pool
                .choose_multiple(&mut rng, count)
                .map(|&idx| {
                    let entry = &self.entries[idx];
                    entry.to_place(vec![entry.code.to_lowercase()])
                })
                .collect();
            QueryAnswer::success(places, Vec::new())
        };

        wire::encode_answer(&answer)
    }

    fn search(&mut self, _kind: PlaceKind, query: &[u8]) -> Result<Vec<u8>> {
        self.ensure_open()?;

        let answer = match std::str::from_utf8(query) {
            Ok(query) => self.resolve(query),
            Err(e) => QueryAnswer::failure(format!("Query is not valid UTF-8: {}", e)),
        };

        wire::encode_answer(&answer)
    }

    fn finalize(&mut self) {
        self.finalized = true;
    }
}

/// Lowercased words of a place name
fn name_words(name: &str) -> Vec<String> {
    name.split_whitespace().map(|w| w.to_lowercase()).collect()
}
