/// Country code reported when a city cannot be resolved
pub const UNKNOWN_COUNTRY: &str = "XX";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeoError {
    #[error("Unknown city: {0}")]
    UnknownCity(String),

    #[error("Geography database unavailable: {0}")]
    Unavailable(String),
}

/// Resolves cities to countries and measures the distance between them
pub trait GeoResolver: Send + Sync {
    /// Country code of a city
    fn country_of(&self, city_code: &str) -> Result<String, GeoError>;

    /// Distance between two cities in kilometers
    fn distance(&self, city_a: &str, city_b: &str) -> Result<f64, GeoError>;
}

/// Degraded resolver used when no geography database is available
#[derive(Debug, Clone)]
pub struct FallbackGeoResolver {
    unknown_country: String,
}

impl FallbackGeoResolver {
    pub fn new(unknown_country: impl Into<String>) -> Self {
        Self {
            unknown_country: unknown_country.into(),
        }
    }
}

impl Default for FallbackGeoResolver {
    fn default() -> Self {
        Self::new(UNKNOWN_COUNTRY)
    }
}

impl GeoResolver for FallbackGeoResolver {
    fn country_of(&self, _city_code: &str) -> Result<String, GeoError> {
        Ok(self.unknown_country.clone())
    }

    fn distance(&self, _city_a: &str, _city_b: &str) -> Result<f64, GeoError> {
        Ok(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_defaults() {
        let geo = FallbackGeoResolver::default();
        assert_eq!(geo.country_of("PAR").unwrap(), "XX");
        assert_eq!(geo.distance("PAR", "NYC").unwrap(), 0.0);
    }
}
