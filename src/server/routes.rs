//! HTTP routes
//!
//! `GET|POST /` is the search page; the `/api` endpoints report on the
//! server and its engine.

use crate::engine::{available_engines, EngineInfo, EngineSession};
use crate::error::Error;
use crate::format::{available_formats, FormatInfo};
use crate::query::{ParamSource, RequestParams};
use crate::search::{self, SearchResponse};
use crate::server::state::AppState;

use axum::{
    extract::{Query, State},
    http::{Method, StatusCode},
    response::IntoResponse,
    routing::get,
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;
use tracing::{error, info_span, warn};
use uuid::Uuid;

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler).post(index_handler))
        .route("/api/status", get(status_handler))
        .route("/api/engines", get(engines_handler))
        .route("/api/formats", get(formats_handler))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        let (status, code) = match &err {
            Error::EngineUnavailable(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENGINE_UNAVAILABLE"),
            Error::EngineQueryFailed(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENGINE_QUERY_FAILED"),
            Error::RandomGenerationFailed(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "RANDOM_GENERATION_FAILED")
            }
            Error::Answer(_) => (StatusCode::INTERNAL_SERVER_ERROR, "ENGINE_ANSWER_INVALID"),
            Error::InvalidParameter(_) => (StatusCode::BAD_REQUEST, "INVALID_PARAMETER"),
            Error::Config(_) => (StatusCode::INTERNAL_SERVER_ERROR, "CONFIG_ERROR"),
            _ => (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        };
        ApiError {
            error: err.to_string(),
            code: code.to_string(),
            status,
        }
    }
}

/// Search page
///
/// GET|POST /?q=<text> | ?show_airport=1 | ?show_itinerary=1 [&z=<int>][&mt=<type>]
///
/// Form fields of a POST override query-string parameters.
async fn index_handler(
    State(state): State<Arc<AppState>>,
    method: Method,
    Query(query): Query<ParamSource>,
    form: Option<Form<ParamSource>>,
) -> Result<Json<SearchResponse>, ApiError> {
    // Form also reads the query string on GET; only a POST body counts here
    let form = match form {
        Some(Form(fields)) if method == Method::POST => fields,
        _ => ParamSource::new(),
    };

    let params = RequestParams::from_sources(&[&query, &form], state.map_defaults());
    if params.is_empty() {
        return Ok(Json(SearchResponse::empty(&params)));
    }

    let engine = state.engine();
    let settings = state.settings().clone();
    let span = info_span!("search", request_id = %Uuid::new_v4());

    let response = tokio::task::spawn_blocking(move || {
        let _guard = span.enter();
        search::run(engine.as_ref(), &settings, &params)
    })
    .await
    .map_err(|e| ApiError::from(Error::Server(format!("Search task failed: {}", e))))?
    .map_err(|e| {
        if e.is_engine_failure() {
            error!("{}", e);
        } else {
            warn!("{}", e);
        }
        ApiError::from(e)
    })?;

    Ok(Json(response))
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    /// Server is running
    pub running: bool,
    /// Server version
    pub version: String,
    /// Engine backend
    pub engine: String,
    /// Whether the engine could be initialised just now
    pub engine_ready: bool,
    /// Initialisation error, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub engine_error: Option<String>,
}

/// Server status endpoint
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let engine = state.engine();
    let engine_name = engine.name().to_string();
    let settings = state.settings().clone();

    let check = tokio::task::spawn_blocking(move || {
        EngineSession::open(engine.as_ref(), &settings).map(EngineSession::close)
    })
    .await;

    let engine_error = match check {
        Ok(Ok(())) => None,
        Ok(Err(e)) => Some(e.to_string()),
        Err(e) => Some(format!("Engine check failed: {}", e)),
    };

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        engine: engine_name,
        engine_ready: engine_error.is_none(),
        engine_error,
    })
}

/// Engines list response
#[derive(Debug, Serialize, Deserialize)]
pub struct EnginesResponse {
    pub engines: Vec<EngineInfo>,
    pub current: String,
}

/// List available engines
///
/// GET /api/engines
async fn engines_handler(State(state): State<Arc<AppState>>) -> Json<EnginesResponse> {
    Json(EnginesResponse {
        engines: available_engines(),
        current: state.engine().name().to_string(),
    })
}

/// Formats list response
#[derive(Debug, Serialize, Deserialize)]
pub struct FormatsResponse {
    pub formats: Vec<FormatInfo>,
}

/// List available CLI output formats
///
/// GET /api/formats
async fn formats_handler() -> Json<FormatsResponse> {
    Json(FormatsResponse {
        formats: available_formats(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::engine::catalog::{CatalogEngine, CatalogEntry};
    use crate::engine::testing::ScriptedEngine;
    use crate::engine::{QueryAnswer, SearchEngine};
    use crate::query::MapType;
    use axum::body::Body;
    use axum::http::Request;
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    fn catalog_state() -> Arc<AppState> {
        let engine = CatalogEngine::from_entries(vec![
            CatalogEntry::new("JFK", "New York", 40.6413, -73.7781),
            CatalogEntry::new("CDG", "Paris", 49.0097, 2.5479),
            CatalogEntry::new("NRT", "Tokyo", 35.7720, 140.3929),
        ]);
        Arc::new(AppState::with_engine(Config::default(), Arc::new(engine)))
    }

    fn state_with(engine: impl SearchEngine + 'static) -> Arc<AppState> {
        Arc::new(AppState::with_engine(Config::default(), Arc::new(engine)))
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        state: Arc<AppState>,
        uri: &str,
    ) -> (StatusCode, T) {
        let response = create_router(state)
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_empty_index() {
        let (status, page): (_, SearchResponse) = get_json(catalog_state(), "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page.nb_of_places, 0);
        assert_eq!(page.query_string, "");
        assert!(page.coord_for_gmap_center.is_none());
    }

    #[tokio::test]
    async fn test_query_string_search() {
        let (status, page): (_, SearchResponse) =
            get_json(catalog_state(), "/?q=jfk%20cdg%20nrt&z=3&mt=TERRAIN").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page.nb_of_places, 3);
        assert_eq!(page.place_pair_list.len(), 2);
        assert_eq!(page.zoom_level, 3);
        assert_eq!(page.map_type_value, MapType::Terrain);
    }

    #[tokio::test]
    async fn test_post_overrides_query_string() {
        let response = create_router(catalog_state())
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/?q=Paris")
                    .header("Content-Type", "application/x-www-form-urlencoded")
                    .body(Body::from("q=Tokyo"))
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let page: SearchResponse = serde_json::from_slice(&body).unwrap();

        assert_eq!(page.query_string, "Tokyo");
        assert_eq!(page.place_list[0].code, "NRT");
    }

    #[tokio::test]
    async fn test_show_airport() {
        let (status, page): (_, SearchResponse) =
            get_json(catalog_state(), "/?show_airport=1").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page.nb_of_places, 1);
        assert!(page.place_pair_list[0].arr.is_none());
    }

    #[tokio::test]
    async fn test_invalid_map_parameters_are_tolerated() {
        let (status, page): (_, SearchResponse) =
            get_json(catalog_state(), "/?q=cdg&z=deep&mt=paper").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(page.zoom_level, 5);
        assert_eq!(page.map_type_value, MapType::Hybrid);
    }

    #[tokio::test]
    async fn test_engine_unavailable() {
        let (status, err): (_, ApiError) =
            get_json(state_with(ScriptedEngine::new().failing_init()), "/?q=cdg").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "ENGINE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_engine_query_failed() {
        let engine =
            ScriptedEngine::new().with_search_answer(QueryAnswer::failure("index corrupted"));
        let (status, err): (_, ApiError) = get_json(state_with(engine), "/?q=cdg").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "ENGINE_QUERY_FAILED");
        assert!(err.error.contains("index corrupted"));
    }

    #[tokio::test]
    async fn test_random_generation_failed() {
        let engine = ScriptedEngine::new().with_generate_answer(QueryAnswer::failure("empty"));
        let (status, err): (_, ApiError) =
            get_json(state_with(engine), "/?show_itinerary=1").await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.code, "RANDOM_GENERATION_FAILED");
    }

    #[tokio::test]
    async fn test_status_endpoint() {
        let (status, body): (_, StatusResponse) = get_json(catalog_state(), "/api/status").await;

        assert_eq!(status, StatusCode::OK);
        assert!(body.running);
        assert_eq!(body.engine, "catalog");
        assert!(body.engine_ready);
    }

    #[tokio::test]
    async fn test_status_reports_engine_error() {
        let (_, body): (_, StatusResponse) = get_json(
            state_with(ScriptedEngine::new().failing_init()),
            "/api/status",
        )
        .await;

        assert!(!body.engine_ready);
        assert!(body.engine_error.is_some());
    }

    #[tokio::test]
    async fn test_engines_endpoint() {
        let (status, body): (_, EnginesResponse) = get_json(catalog_state(), "/api/engines").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.engines.len(), 2);
        assert_eq!(body.current, "catalog");
    }

    #[tokio::test]
    async fn test_formats_endpoint() {
        let (status, body): (_, FormatsResponse) = get_json(catalog_state(), "/api/formats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body.formats.len(), 4);
    }
}
