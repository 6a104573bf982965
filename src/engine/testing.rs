//! Scripted engine for tests
//!
//! Returns canned answers and counts every call made through its handles.

use crate::engine::{wire, EngineHandle, EngineSettings, PlaceKind, QueryAnswer, SearchEngine};
use crate::error::{Error, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

#[derive(Default)]
struct Counters {
    init: AtomicUsize,
    search: AtomicUsize,
    generate: AtomicUsize,
    finalize: AtomicUsize,
    last_query: Mutex<Option<String>>,
}

/// Engine whose answers are fixed up front
pub struct ScriptedEngine {
    counters: Arc<Counters>,
    fail_init: bool,
    search_answer: Vec<u8>,
    generate_answer: Vec<u8>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        let empty = QueryAnswer::success(Vec::new(), Vec::new());
        let raw = wire::encode_answer(&empty).unwrap();
        Self {
            counters: Arc::new(Counters::default()),
            fail_init: false,
            search_answer: raw.clone(),
            generate_answer: raw,
        }
    }

    pub fn failing_init(mut self) -> Self {
        self.fail_init = true;
        self
    }

    pub fn with_search_answer(mut self, answer: QueryAnswer) -> Self {
        self.search_answer = wire::encode_answer(&answer).unwrap();
        self
    }

    pub fn with_raw_search_answer(mut self, raw: Vec<u8>) -> Self {
        self.search_answer = raw;
        self
    }

    pub fn with_generate_answer(mut self, answer: QueryAnswer) -> Self {
        self.generate_answer = wire::encode_answer(&answer).unwrap();
        self
    }

    pub fn init_calls(&self) -> usize {
        self.counters.init.load(Ordering::SeqCst)
    }

    pub fn search_calls(&self) -> usize {
        self.counters.search.load(Ordering::SeqCst)
    }

    pub fn generate_calls(&self) -> usize {
        self.counters.generate.load(Ordering::SeqCst)
    }

    pub fn finalize_calls(&self) -> usize {
        self.counters.finalize.load(Ordering::SeqCst)
    }

    pub fn last_query(&self) -> Option<String> {
        self.counters.last_query.lock().unwrap().clone()
    }
}

impl SearchEngine for ScriptedEngine {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn description(&self) -> &'static str {
        "Canned answers for tests"
    }

    fn initialize(&self, _settings: &EngineSettings) -> Result<Box<dyn EngineHandle + '_>> {
        self.counters.init.fetch_add(1, Ordering::SeqCst);
        if self.fail_init {
            return Err(Error::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "index not found",
            )));
        }
        Ok(Box::new(ScriptedHandle { engine: self }))
    }
}

struct ScriptedHandle<'a> {
    engine: &'a ScriptedEngine,
}

impl EngineHandle for ScriptedHandle<'_> {
    fn generate_random(&mut self, _kind: PlaceKind, _count: usize) -> Result<Vec<u8>> {
        self.engine.counters.generate.fetch_add(1, Ordering::SeqCst);
        Ok(self.engine.generate_answer.clone())
    }

    fn search(&mut self, _kind: PlaceKind, query: &[u8]) -> Result<Vec<u8>> {
        self.engine.counters.search.fetch_add(1, Ordering::SeqCst);
        *self.engine.counters.last_query.lock().unwrap() =
            Some(String::from_utf8_lossy(query).into_owned());
        Ok(self.engine.search_answer.clone())
    }

    fn finalize(&mut self) {
        self.engine.counters.finalize.fetch_add(1, Ordering::SeqCst);
    }
}
