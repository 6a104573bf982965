//! Remote engine backend
//!
//! Talks to an out-of-process search engine service over HTTP:
//!
//! - `POST {url}/init` with the engine settings as JSON, answers
//!   `{"ok": true, "session": "<id>"}`
//! - `POST {url}/search?kind=P&session=<id>` with the UTF-8 query as body
//! - `GET {url}/generate?kind=P&count=<n>&session=<id>`
//! - `POST {url}/finalize?session=<id>`
//!
//! `search` and `generate` answer with the serialized answer, passed through
//! untouched.
//!
//! Note: requests run on a separate thread with the blocking reqwest client,
//! so the backend can be called both from plain threads and from inside the
//! tokio runtime.

use crate::engine::{EngineHandle, EngineSettings, PlaceKind, SearchEngine};
use crate::error::{Error, Result};
use serde::Deserialize;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, warn};

/// Remote engine backend
#[derive(Debug, Clone)]
pub struct RemoteEngine {
    base_url: String,
    timeout: Duration,
}

/// Answer to `POST /init`
#[derive(Debug, Deserialize)]
struct InitResponse {
    ok: bool,
    #[serde(default)]
    session: Option<String>,
    /// Present on failures: `{"ok": false, "message": "..."}`
    #[serde(default)]
    message: Option<String>,
}

/// One HTTP call to the engine service
enum Call {
    Get(String),
    Post(String, Vec<u8>, &'static str),
}

impl RemoteEngine {
    /// Create a new remote backend
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        }
    }

    /// Base URL of the engine service
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Run one HTTP call on a dedicated thread and return the response body
fn execute(call: Call, timeout: Duration) -> Result<Vec<u8>> {
    let (tx, rx) = mpsc::channel();

    thread::spawn(move || {
        let result = (|| -> Result<Vec<u8>> {
            let client = reqwest::blocking::Client::builder()
                .timeout(timeout)
                .build()?;

            let request = match call {
                Call::Get(url) => client.get(url),
                Call::Post(url, body, content_type) => client
                    .post(url)
                    .header(reqwest::header::CONTENT_TYPE, content_type)
                    .body(body),
            };

            let response = request.send()?;
            if !response.status().is_success() {
                return Err(Error::EngineQueryFailed(format!(
                    "Engine service returned status: {}",
                    response.status()
                )));
            }

            Ok(response.bytes()?.to_vec())
        })();

        let _ = tx.send(result);
    });

    rx.recv().map_err(|_| {
        Error::EngineQueryFailed("Failed to receive response from HTTP thread".to_string())
    })?
}

impl SearchEngine for RemoteEngine {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn description(&self) -> &'static str {
        "Out-of-process search engine service over HTTP"
    }

    fn initialize(&self, settings: &EngineSettings) -> Result<Box<dyn EngineHandle + '_>> {
        let body = serde_json::to_vec(settings)?;
        let url = format!("{}/init", self.base_url);

        let raw = execute(Call::Post(url, body, "application/json"), self.timeout)
            .map_err(|e| Error::EngineUnavailable(format!("{}: {}", self.base_url, e)))?;

        let response: InitResponse = serde_json::from_slice(&raw)?;
        if !response.ok {
            return Err(Error::EngineUnavailable(
                response
                    .message
                    .unwrap_or_else(|| "Engine refused to initialise".to_string()),
            ));
        }

        let session = response.session.ok_or_else(|| {
            Error::EngineUnavailable("Engine returned no session id".to_string())
        })?;

        debug!("Remote engine session {} opened", session);
        Ok(Box::new(RemoteHandle {
            engine: self,
            session,
        }))
    }
}

/// Open remote session
struct RemoteHandle<'a> {
    engine: &'a RemoteEngine,
    session: String,
}

impl RemoteHandle<'_> {
    fn url(&self, endpoint: &str, extra: &str) -> String {
        format!(
            "{}/{}?session={}{}",
            self.engine.base_url,
            endpoint,
            urlencoding::encode(&self.session),
            extra
        )
    }
}

/// Report transport failures of an engine call as engine errors
fn engine_call_failed(endpoint: &str, err: Error) -> Error {
    if err.is_engine_failure() {
        err
    } else {
        Error::EngineQueryFailed(format!("Engine {} call failed: {}", endpoint, err))
    }
}

impl EngineHandle for RemoteHandle<'_> {
    fn generate_random(&mut self, kind: PlaceKind, count: usize) -> Result<Vec<u8>> {
        let url = self.url(
            "generate",
            &format!("&kind={}&count={}", kind.as_char(), count),
        );
        execute(Call::Get(url), self.engine.timeout)
            .map_err(|e| engine_call_failed("generate", e))
    }

    fn search(&mut self, kind: PlaceKind, query: &[u8]) -> Result<Vec<u8>> {
        let url = self.url("search", &format!("&kind={}", kind.as_char()));
        execute(
            Call::Post(url, query.to_vec(), "text/plain; charset=utf-8"),
            self.engine.timeout,
        )
        .map_err(|e| engine_call_failed("search", e))
    }

    fn finalize(&mut self) {
        let url = self.url("finalize", "");
        if let Err(e) = execute(Call::Post(url, Vec::new(), "text/plain"), self.engine.timeout) {
            warn!("Failed to finalise remote session {}: {}", self.session, e);
        }
    }
}
