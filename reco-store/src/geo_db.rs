use reco_core::geo::{FallbackGeoResolver, GeoError, GeoResolver};
use serde::Deserialize;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

use crate::app_config::GeographyConfig;
use crate::{StoreError, StoreResult};

const EARTH_RADIUS_KM: f64 = 6371.0;

/// One row of the city table
#[derive(Debug, Clone, Deserialize)]
pub struct City {
    pub city_code: String,
    pub country_code: String,
    pub latitude: f64,
    pub longitude: f64,
}

/// In-memory city table used to resolve countries and distances
#[derive(Debug)]
pub struct GeoDatabase {
    cities: HashMap<String, City>,
}

impl GeoDatabase {
    /// Read a `city_code,country_code,latitude,longitude` table with header
    pub fn from_reader<R: Read>(source: R) -> StoreResult<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);

        let mut cities = HashMap::new();
        for row in reader.deserialize::<City>() {
            let city = row.map_err(|e| StoreError::Geo(e.to_string()))?;
            cities.insert(city.city_code.to_uppercase(), city);
        }
        Ok(Self { cities })
    }

    pub fn open(path: &Path) -> StoreResult<Self> {
        let file = File::open(path).map_err(|source| StoreError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_reader(file)
    }

    pub fn len(&self) -> usize {
        self.cities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cities.is_empty()
    }

    fn city(&self, code: &str) -> Result<&City, GeoError> {
        self.cities
            .get(&code.trim().to_uppercase())
            .ok_or_else(|| GeoError::UnknownCity(code.to_string()))
    }
}

impl GeoResolver for GeoDatabase {
    fn country_of(&self, city_code: &str) -> Result<String, GeoError> {
        Ok(self.city(city_code)?.country_code.clone())
    }

    fn distance(&self, city_a: &str, city_b: &str) -> Result<f64, GeoError> {
        let a = self.city(city_a)?;
        let b = self.city(city_b)?;
        Ok(haversine_km(a.latitude, a.longitude, b.latitude, b.longitude))
    }
}

/// Great-circle distance between two coordinates
pub fn haversine_km(lat_a: f64, lon_a: f64, lat_b: f64, lon_b: f64) -> f64 {
    let d_lat = (lat_b - lat_a).to_radians();
    let d_lon = (lon_b - lon_a).to_radians();
    let h = (d_lat / 2.0).sin().powi(2)
        + lat_a.to_radians().cos() * lat_b.to_radians().cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

/// Pick the resolver once at startup: the city table when it loads,
/// otherwise the fallback.
pub fn resolver_from_config(config: &GeographyConfig) -> Arc<dyn GeoResolver> {
    let fallback = || -> Arc<dyn GeoResolver> {
        Arc::new(FallbackGeoResolver::new(config.unknown_country.clone()))
    };

    let Some(path) = &config.database_path else {
        info!("No geography database configured, using fallback resolver");
        return fallback();
    };

    match GeoDatabase::open(path) {
        Ok(db) => {
            info!("Loaded {} cities from {}", db.len(), path.display());
            Arc::new(db)
        }
        Err(e) => {
            warn!("Geography database unavailable ({}), using fallback resolver", e);
            fallback()
        }
    }
}
