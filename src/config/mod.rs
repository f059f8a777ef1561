pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
use crate::adapters::nominatim::{DEFAULT_ENDPOINT, DEFAULT_RESULT_LIMIT, DEFAULT_USER_AGENT};
#[cfg(feature = "cli")]
use crate::core::resolver::DEFAULT_COUNTRY_SUFFIX;
#[cfg(feature = "cli")]
use crate::core::scoring::{ScoringWeights, CONFIDENCE_THRESHOLD};
#[cfg(feature = "cli")]
use crate::core::ConfigProvider;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use crate::utils::validation::{self, Validate};
#[cfg(feature = "cli")]
use clap::Parser;
#[cfg(feature = "cli")]
use serde::{Deserialize, Serialize};
#[cfg(feature = "cli")]
use std::time::Duration;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Serialize, Deserialize, Parser)]
#[command(name = "postcode-boundary")]
#[command(about = "Resolve a UK postcode to its boundary polygon")]
pub struct CliConfig {
    /// Postcode, district or area to resolve (e.g. "SW1A 0AA", "SE21", "M")
    pub postcode: String,

    #[arg(long, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    #[arg(long, default_value_t = 10)]
    pub timeout_seconds: u64,

    #[arg(long, default_value_t = DEFAULT_RESULT_LIMIT)]
    pub limit: usize,

    #[arg(long, default_value_t = 1000, help = "Pause between fragment queries")]
    pub delay_ms: u64,

    #[arg(long, default_value_t = CONFIDENCE_THRESHOLD)]
    pub threshold: f64,

    #[arg(long, default_value = DEFAULT_COUNTRY_SUFFIX)]
    pub country: String,

    #[arg(long, help = "Directory to write the resolved boundary as GeoJSON")]
    pub output_path: Option<String>,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

#[cfg(feature = "cli")]
impl ConfigProvider for CliConfig {
    fn search_endpoint(&self) -> &str {
        &self.endpoint
    }

    fn user_agent(&self) -> &str {
        &self.user_agent
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    fn result_limit(&self) -> usize {
        self.limit
    }

    fn country_suffix(&self) -> &str {
        &self.country
    }

    fn query_delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }

    fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights {
            threshold: self.threshold,
            ..ScoringWeights::default()
        }
    }

    fn output_path(&self) -> Option<&str> {
        self.output_path.as_deref()
    }
}

#[cfg(feature = "cli")]
impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_url("endpoint", &self.endpoint)?;
        validation::validate_non_empty_string("user_agent", &self.user_agent)?;
        validation::validate_positive_number("timeout_seconds", self.timeout_seconds as usize, 1)?;
        validation::validate_range("limit", self.limit, 1, 50)?;
        validation::validate_finite("threshold", self.threshold)?;
        if let Some(path) = &self.output_path {
            validation::validate_path("output_path", path)?;
        }
        Ok(())
    }
}
