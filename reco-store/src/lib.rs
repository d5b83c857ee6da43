pub mod app_config;
pub mod rates;
pub mod geo_db;
pub mod source;

pub use geo_db::{resolver_from_config, GeoDatabase};
pub use rates::load_rates;
pub use source::open_payload;

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Rate snapshot error: {0}")]
    Rates(#[from] reco_core::RateError),
    #[error("Geography database error: {0}")]
    Geo(String),
}

pub type StoreResult<T> = Result<T, StoreError>;
