use reco_core::GeoResolver;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    /// Shared by every request; holds no per-request state
    pub geo: Arc<dyn GeoResolver>,
    /// Rate snapshot, loaded afresh for each pipeline run
    pub rates_path: PathBuf,
    pub max_body_bytes: usize,
}
