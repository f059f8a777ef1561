use crate::adapters::nominatim::{DEFAULT_RESULT_LIMIT, DEFAULT_TIMEOUT, DEFAULT_USER_AGENT};
use crate::core::resolver::{DEFAULT_COUNTRY_SUFFIX, DEFAULT_QUERY_DELAY};
use crate::core::scoring::ScoringWeights;
use crate::core::ConfigProvider;
use crate::utils::error::{ResolveError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("static regex is valid"));

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub search: SearchConfig,
    pub pacing: Option<PacingConfig>,
    pub scoring: Option<ScoringWeights>,
    pub output: Option<OutputConfig>,
    pub logging: Option<LoggingConfig>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    pub endpoint: String,
    pub user_agent: Option<String>,
    pub timeout_seconds: Option<u64>,
    pub result_limit: Option<usize>,
    pub country_suffix: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PacingConfig {
    pub delay_ms: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: Option<String>,
    /// "compact" or "json"
    pub format: Option<String>,
}

impl TomlConfig {
    /// Load and parse a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(ResolveError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| ResolveError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Expand `${VAR}` from the environment; unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validation::validate_url("search.endpoint", &self.search.endpoint)?;

        if let Some(user_agent) = &self.search.user_agent {
            validation::validate_non_empty_string("search.user_agent", user_agent)?;
        }

        if let Some(timeout) = self.search.timeout_seconds {
            validation::validate_positive_number("search.timeout_seconds", timeout as usize, 1)?;
        }

        if let Some(limit) = self.search.result_limit {
            validation::validate_range("search.result_limit", limit, 1, 50)?;
        }

        if let Some(weights) = &self.scoring {
            for (field, value) in [
                ("scoring.postal_code_boundary", weights.postal_code_boundary),
                ("scoring.label_prefix", weights.label_prefix),
                ("scoring.label_contains", weights.label_contains),
                ("scoring.structured_postcode", weights.structured_postcode),
                ("scoring.importance_factor", weights.importance_factor),
                ("scoring.penalized_boundary", weights.penalized_boundary),
                ("scoring.threshold", weights.threshold),
            ] {
                validation::validate_finite(field, value)?;
            }
            validation::validate_range("scoring.importance_factor", weights.importance_factor, 0.0, 100.0)?;
            validation::validate_range("scoring.penalized_boundary", weights.penalized_boundary, 0.0, 1000.0)?;
            if weights.label_contains > weights.label_prefix {
                return Err(ResolveError::InvalidConfigValueError {
                    field: "scoring.label_contains".to_string(),
                    value: weights.label_contains.to_string(),
                    reason: "A label mention cannot outweigh a label prefix match".to_string(),
                });
            }
        }

        if let Some(output) = &self.output {
            validation::validate_path("output.path", &output.path)?;
        }

        if let Some(format) = self.logging.as_ref().and_then(|l| l.format.as_deref()) {
            if !["compact", "json"].contains(&format) {
                return Err(ResolveError::InvalidConfigValueError {
                    field: "logging.format".to_string(),
                    value: format.to_string(),
                    reason: "Valid formats: compact, json".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn log_level(&self) -> &str {
        self.logging
            .as_ref()
            .and_then(|l| l.level.as_deref())
            .unwrap_or("info")
    }

    pub fn json_logs(&self) -> bool {
        self.logging.as_ref().and_then(|l| l.format.as_deref()) == Some("json")
    }
}

impl ConfigProvider for TomlConfig {
    fn search_endpoint(&self) -> &str {
        &self.search.endpoint
    }

    fn user_agent(&self) -> &str {
        self.search.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }

    fn request_timeout(&self) -> Duration {
        self.search
            .timeout_seconds
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    fn result_limit(&self) -> usize {
        self.search.result_limit.unwrap_or(DEFAULT_RESULT_LIMIT)
    }

    fn country_suffix(&self) -> &str {
        self.search.country_suffix.as_deref().unwrap_or(DEFAULT_COUNTRY_SUFFIX)
    }

    fn query_delay(&self) -> Duration {
        self.pacing
            .as_ref()
            .and_then(|p| p.delay_ms)
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_QUERY_DELAY)
    }

    fn scoring_weights(&self) -> ScoringWeights {
        self.scoring.unwrap_or_default()
    }

    fn output_path(&self) -> Option<&str> {
        self.output.as_ref().map(|o| o.path.as_str())
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let toml_content = r#"
[search]
endpoint = "https://nominatim.example.com"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();

        assert_eq!(config.search_endpoint(), "https://nominatim.example.com");
        assert_eq!(config.query_delay(), Duration::from_millis(1000));
        assert_eq!(config.result_limit(), 10);
        assert_eq!(config.country_suffix(), "United Kingdom");
        assert_eq!(config.scoring_weights(), ScoringWeights::default());
        assert_eq!(config.log_level(), "info");
        assert!(!config.json_logs());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_scoring_table_overrides_only_named_weights() {
        let toml_content = r#"
[search]
endpoint = "https://nominatim.example.com"
result_limit = 20

[pacing]
delay_ms = 1500

[scoring]
threshold = 65.0
penalized_boundary = 90.0

[output]
path = "./boundaries"

[logging]
level = "debug"
format = "json"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        let weights = config.scoring_weights();

        assert_eq!(weights.threshold, 65.0);
        assert_eq!(weights.penalized_boundary, 90.0);
        assert_eq!(weights.postal_code_boundary, 100.0);
        assert_eq!(weights.label_prefix, 80.0);
        assert_eq!(config.query_delay(), Duration::from_millis(1500));
        assert_eq!(config.result_limit(), 20);
        assert_eq!(config.output_path(), Some("./boundaries"));
        assert!(config.json_logs());
        assert_eq!(config.log_level(), "debug");
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("POSTCODE_BOUNDARY_TEST_ENDPOINT", "https://geocoder.internal");

        let toml_content = r#"
[search]
endpoint = "${POSTCODE_BOUNDARY_TEST_ENDPOINT}"
"#;

        let config = TomlConfig::from_toml_str(toml_content).unwrap();
        assert_eq!(config.search.endpoint, "https://geocoder.internal");

        std::env::remove_var("POSTCODE_BOUNDARY_TEST_ENDPOINT");
    }

    #[test]
    fn test_config_validation() {
        let bad_endpoint = TomlConfig::from_toml_str("[search]\nendpoint = \"invalid-url\"\n").unwrap();
        assert!(bad_endpoint.validate().is_err());

        let bad_weights = TomlConfig::from_toml_str(
            "[search]\nendpoint = \"https://n.example.com\"\n[scoring]\nlabel_contains = 90.0\n",
        )
        .unwrap();
        assert!(bad_weights.validate().is_err());

        let bad_format = TomlConfig::from_toml_str(
            "[search]\nendpoint = \"https://n.example.com\"\n[logging]\nformat = \"xml\"\n",
        )
        .unwrap();
        assert!(bad_format.validate().is_err());
    }

    #[test]
    fn test_non_finite_weights_are_rejected() {
        for table in ["importance_factor = nan", "threshold = inf", "label_prefix = -inf"] {
            let config = TomlConfig::from_toml_str(&format!(
                "[search]\nendpoint = \"https://n.example.com\"\n[scoring]\n{}\n",
                table
            ))
            .unwrap();
            let err = config.validate().unwrap_err();
            assert!(matches!(err, ResolveError::InvalidConfigValueError { .. }), "{table}");
        }
    }

    #[test]
    fn test_missing_search_table_is_parse_error() {
        let err = TomlConfig::from_toml_str("[pacing]\ndelay_ms = 10\n").unwrap_err();
        assert!(matches!(err, ResolveError::ConfigError { .. }));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();

        let toml_content = r#"
[search]
endpoint = "https://nominatim.example.com"
country_suffix = "UK"
"#;

        temp_file.write_all(toml_content.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.country_suffix(), "UK");
    }
}
