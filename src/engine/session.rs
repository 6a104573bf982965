//! Scoped engine sessions
//!
//! A session owns one engine handle for the duration of a request. The handle
//! is finalised exactly once: by `close`, or on drop for every other exit
//! path (early return, `?`, panic unwinding).

use crate::engine::{wire, EngineHandle, EngineSettings, PlaceKind, QueryAnswer, SearchEngine};
use crate::error::{Error, Result};
use tracing::debug;

/// An initialised engine handle with guaranteed release
pub struct EngineSession<'a> {
    engine_name: &'static str,
    handle: Box<dyn EngineHandle + 'a>,
    finalized: bool,
}

impl<'a> EngineSession<'a> {
    /// Initialise the engine
    ///
    /// Any initialisation failure is reported as `Error::EngineUnavailable`.
    pub fn open(engine: &'a dyn SearchEngine, settings: &EngineSettings) -> Result<Self> {
        let handle = engine.initialize(settings).map_err(|e| match e {
            Error::EngineUnavailable(_) => e,
            other => Error::EngineUnavailable(format!(
                "The {} engine cannot be initialised: {}",
                engine.name(),
                other
            )),
        })?;

        debug!("Opened {} engine session", engine.name());
        Ok(Self {
            engine_name: engine.name(),
            handle,
            finalized: false,
        })
    }

    /// Resolve a free-text query
    pub fn search(&mut self, query: &str) -> Result<QueryAnswer> {
        debug!("Searching {} engine for \"{}\"", self.engine_name, query);
        let raw = self.handle.search(PlaceKind::Place, query.as_bytes())?;
        wire::parse_answer(&raw)
    }

    /// Draw `count` distinct random places
    pub fn generate_random(&mut self, count: usize) -> Result<QueryAnswer> {
        debug!("Drawing {} random places", count);
        let raw = self.handle.generate_random(PlaceKind::Place, count)?;
        wire::parse_answer(&raw)
    }

    /// Finalise the handle now
    pub fn close(mut self) {
        self.finalize();
    }

    fn finalize(&mut self) {
        if !self.finalized {
            self.finalized = true;
            self.handle.finalize();
            debug!("Finalised {} engine session", self.engine_name);
        }
    }
}

impl Drop for EngineSession<'_> {
    fn drop(&mut self) {
        self.finalize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::testing::ScriptedEngine;
    use crate::engine::Place;

    #[test]
    fn test_close_finalizes_once() {
        let engine = ScriptedEngine::new();
        let session = EngineSession::open(&engine, &EngineSettings::default()).unwrap();
        session.close();

        assert_eq!(engine.init_calls(), 1);
        assert_eq!(engine.finalize_calls(), 1);
    }

    #[test]
    fn test_drop_finalizes() {
        let engine = ScriptedEngine::new();
        {
            let _session = EngineSession::open(&engine, &EngineSettings::default()).unwrap();
        }
        assert_eq!(engine.finalize_calls(), 1);
    }

    #[test]
    fn test_failed_init_is_engine_unavailable() {
        let engine = ScriptedEngine::new().failing_init();
        let err = EngineSession::open(&engine, &EngineSettings::default())
            .err()
            .unwrap();

        assert!(matches!(err, Error::EngineUnavailable(_)));
        assert_eq!(engine.finalize_calls(), 0);
    }

    #[test]
    fn test_search_parses_answer() {
        let engine = ScriptedEngine::new().with_search_answer(QueryAnswer::success(
            vec![Place::new("NCE", 43.6584, 7.2159).with_keywords(["nce"])],
            vec!["zzz".to_string()],
        ));
        let mut session = EngineSession::open(&engine, &EngineSettings::default()).unwrap();

        let answer = session.search("nce zzz").unwrap();
        assert!(answer.ok);
        assert_eq!(answer.places[0].code, "NCE");
        assert_eq!(answer.unmatched_keywords, vec!["zzz"]);
        assert_eq!(engine.last_query().as_deref(), Some("nce zzz"));
    }

    #[test]
    fn test_error_after_open_still_finalizes() {
        let engine = ScriptedEngine::new().with_raw_search_answer(b"not an answer".to_vec());

        let result = (|| -> Result<QueryAnswer> {
            let mut session = EngineSession::open(&engine, &EngineSettings::default())?;
            let answer = session.search("cdg")?;
            session.close();
            Ok(answer)
        })();

        assert!(matches!(result, Err(Error::Answer(_))));
        assert_eq!(engine.finalize_calls(), 1);
    }
}
