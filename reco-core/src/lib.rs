pub mod models;
pub mod decoder;
pub mod rates;
pub mod geo;
pub mod aggregator;
pub mod decorator;
pub mod pipeline;

pub use aggregator::SearchAggregator;
pub use decoder::{decode_bytes, decode_line, DecodeError};
pub use decorator::{DecorateError, Decorator};
pub use geo::{FallbackGeoResolver, GeoError, GeoResolver};
pub use models::{Flight, Passenger, Reco, RecoEntry, Search};
pub use pipeline::{Pipeline, PipelineError, PipelineStats};
pub use rates::{RateError, RateTable};
