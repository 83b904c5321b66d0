use anyhow::Result;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use vecrank::normalize::Normalizer;
use vecrank::source::Corpus;
use vecrank::{DocId, Index, Model, Ranking};

#[derive(Deserialize)]
pub struct SearchParams {
    pub q: String,
    #[serde(default = "default_k")]
    pub k: usize,
}
fn default_k() -> usize { 10 }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub model: Model,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub doc_id: DocId,
    pub name: String,
    /// Absent for the Boolean model, which only matches.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f32>,
}

#[derive(Serialize)]
pub struct DocResponse {
    pub doc_id: DocId,
    pub name: String,
    /// Number of vocabulary positions with a non-zero weight.
    pub terms: usize,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

fn api_error(status: StatusCode, message: impl ToString) -> ApiError {
    (status, Json(serde_json::json!({ "error": message.to_string() })))
}

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    pub index: Arc<Index>,
    pub names: Arc<Vec<String>>,
    pub normalizer: Arc<dyn Normalizer>,
}

impl AppState {
    /// Builds the index for `model` from an already-normalized corpus.
    pub fn build(corpus: Corpus, model: Model, normalizer: Arc<dyn Normalizer>) -> Result<Self> {
        let index = Index::build(&corpus.terms, model)?;
        tracing::info!(
            %model,
            num_docs = index.num_docs(),
            num_terms = index.vocabulary().len(),
            "index built"
        );
        Ok(Self { index: Arc::new(index), names: Arc::new(corpus.names), normalizer })
    }
}

pub fn build_app(state: AppState) -> Router {
    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new()
                    .allow_origin(AllowOrigin::list(origins))
                    .allow_methods(Any)
                    .allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/search", get(search_handler))
        .route("/doc/:doc_id", get(doc_handler))
        .with_state(state)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn search_handler(
    State(state): State<AppState>,
    Query(params): Query<SearchParams>,
) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let normalizer = state.normalizer.clone();
    let query = vecrank::Query::parse(&params.q)
        .and_then(|q| q.normalize_terms(|t| normalizer.normalize(t)))
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;
    let mut ranking = state
        .index
        .search(&query)
        .map_err(|e| api_error(StatusCode::BAD_REQUEST, e))?;

    let total_hits = ranking.len();
    ranking.truncate(params.k.clamp(1, 100));

    let name = |doc_id: DocId| state.names.get(doc_id as usize).cloned().unwrap_or_default();
    let results = match ranking {
        Ranking::Matches(ids) => ids
            .into_iter()
            .map(|doc_id| SearchHit { doc_id, name: name(doc_id), score: None })
            .collect(),
        Ranking::Scored(scored) => scored
            .into_iter()
            .map(|d| SearchHit { doc_id: d.doc_id, name: name(d.doc_id), score: Some(d.score) })
            .collect(),
    };

    let elapsed = start.elapsed();
    Ok(Json(SearchResponse {
        query: query.to_string(),
        model: state.index.model(),
        took_s: elapsed.as_secs_f64(),
        total_hits,
        results,
    }))
}

pub async fn doc_handler(
    State(state): State<AppState>,
    Path(doc_id): Path<DocId>,
) -> Result<Json<DocResponse>, ApiError> {
    match (state.index.vector(doc_id), state.names.get(doc_id as usize)) {
        (Some(vector), Some(name)) => Ok(Json(DocResponse {
            doc_id,
            name: name.clone(),
            terms: vector.iter().filter(|w| **w != 0.0).count(),
        })),
        _ => Err(api_error(StatusCode::NOT_FOUND, "not found")),
    }
}
