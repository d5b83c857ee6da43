use serde::Deserialize;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub rates: RatesConfig,
    #[serde(default)]
    pub geography: GeographyConfig,
    #[serde(default)]
    pub payload: PayloadConfig,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RatesConfig {
    /// Rate snapshot CSV, reloaded on every pipeline run
    pub path: PathBuf,
}

#[derive(Debug, Deserialize, Clone)]
pub struct GeographyConfig {
    /// City table; the fallback resolver is used when unset or unreadable
    pub database_path: Option<PathBuf>,
    #[serde(default = "default_unknown_country")]
    pub unknown_country: String,
}

impl Default for GeographyConfig {
    fn default() -> Self {
        Self {
            database_path: None,
            unknown_country: default_unknown_country(),
        }
    }
}

fn default_unknown_country() -> String {
    reco_core::geo::UNKNOWN_COUNTRY.to_string()
}

#[derive(Debug, Deserialize, Clone)]
pub struct PayloadConfig {
    #[serde(default = "default_max_bytes")]
    pub max_bytes: usize,
}

impl Default for PayloadConfig {
    fn default() -> Self {
        Self {
            max_bytes: default_max_bytes(),
        }
    }
}

fn default_max_bytes() -> usize {
    64 * 1024 * 1024
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        let run_mode = env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = config::Config::builder()
            .add_source(config::File::with_name("config/default"))
            // Optional per-environment overrides
            .add_source(config::File::with_name(&format!("config/{}", run_mode)).required(false))
            // Local, never checked in
            .add_source(config::File::with_name("config/local").required(false))
            // Eg.. `RECO_RATES__PATH=/data/rates.csv`
            .add_source(config::Environment::with_prefix("RECO").separator("__"))
            .build()?;

        s.try_deserialize()
    }

    /// Build from a TOML document, without files or environment
    pub fn from_toml(text: &str) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(text, config::FileFormat::Toml))
            .build()?
            .try_deserialize()
    }
}
