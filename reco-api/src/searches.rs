use axum::{
    body::Bytes,
    extract::State,
    routing::{get, post},
    Json, Router,
};
use reco_core::{decode_bytes, Pipeline, PipelineError, Reco, Search};
use serde::Serialize;
use tracing::info;

use crate::error::AppError;
use crate::state::AppState;

#[derive(Debug, Serialize)]
pub struct SearchBatch {
    pub searches: Vec<Search>,
    /// Groups dropped because they could not be decorated
    pub failed: u64,
    /// Lines that did not decode
    pub skipped: u64,
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/v1/searches", post(process_searches))
        .route("/v1/recos", post(decode_reco))
}

async fn health() -> &'static str {
    "ok"
}

/// Run the whole pipeline over a plain or gzip record stream
async fn process_searches(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<SearchBatch>, AppError> {
    info!("Received record stream of {} bytes", body.len());
    let batch = tokio::task::spawn_blocking(move || run_pipeline(&state, &body)).await??;
    info!(
        "Produced {} searches ({} failed, {} lines skipped)",
        batch.searches.len(),
        batch.failed,
        batch.skipped
    );
    Ok(Json(batch))
}

pub fn run_pipeline(state: &AppState, body: &[u8]) -> Result<SearchBatch, AppError> {
    let rates = reco_store::load_rates(&state.rates_path)
        .map_err(|e| AppError::RatesUnavailable(e.to_string()))?;
    let pipeline = Pipeline::new(rates, state.geo.clone());

    let mut searches = pipeline.run(reco_store::open_payload(body));
    let mut decorated = Vec::new();
    for item in searches.by_ref() {
        match item {
            Ok(search) => decorated.push(search),
            Err(PipelineError::Read(e)) => {
                return Err(AppError::BadRequest(format!("Unreadable record stream: {}", e)));
            }
            // Already logged and counted by the pipeline
            Err(PipelineError::Decorate(_)) => {}
        }
    }

    let stats = searches.stats();
    Ok(SearchBatch {
        searches: decorated,
        failed: stats.failed,
        skipped: stats.skipped,
    })
}

/// Decode a single record, as delivered one per event
async fn decode_reco(body: Bytes) -> Result<Json<Reco>, AppError> {
    info!("Message received: {}", String::from_utf8_lossy(&body).trim_end());
    let reco = decode_bytes(&body).map_err(|e| AppError::BadRequest(e.to_string()))?;
    info!("Reco OK: {}", reco.search_id);
    Ok(Json(reco))
}
