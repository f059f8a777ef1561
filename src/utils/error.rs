use thiserror::Error;

#[derive(Error, Debug)]
pub enum ResolveError {
    #[error("No postcode was entered")]
    InvalidInput,

    #[error("Search for '{fragment}' failed: {message}")]
    UpstreamUnavailable { fragment: String, message: String },

    #[error("No boundary found after trying: {}", attempted.join(", "))]
    NoBoundaryFound { attempted: Vec<String> },

    #[error("Resolution was cancelled")]
    Cancelled,

    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Input,
    Upstream,
    Resolution,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl ResolveError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            ResolveError::InvalidInput => ErrorCategory::Input,
            ResolveError::UpstreamUnavailable { .. } | ResolveError::HttpError(_) => {
                ErrorCategory::Upstream
            }
            ResolveError::NoBoundaryFound { .. } | ResolveError::Cancelled => {
                ErrorCategory::Resolution
            }
            ResolveError::ConfigError { .. }
            | ResolveError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            ResolveError::IoError(_) | ResolveError::SerializationError(_) => {
                ErrorCategory::System
            }
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            ResolveError::Cancelled => ErrorSeverity::Low,
            ResolveError::UpstreamUnavailable { .. } | ResolveError::HttpError(_) => {
                ErrorSeverity::Medium
            }
            ResolveError::InvalidInput
            | ResolveError::NoBoundaryFound { .. }
            | ResolveError::ConfigError { .. }
            | ResolveError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            ResolveError::IoError(_) | ResolveError::SerializationError(_) => {
                ErrorSeverity::Critical
            }
        }
    }

    /// Single human-readable line for the person who typed the postcode.
    pub fn user_friendly_message(&self) -> String {
        match self {
            ResolveError::InvalidInput => "Please enter a postcode".to_string(),
            ResolveError::NoBoundaryFound { attempted } => format!(
                "No boundary found after trying these fragments: {}",
                attempted.join(", ")
            ),
            ResolveError::UpstreamUnavailable { fragment, .. } => {
                format!("The search service could not be reached while looking up {}", fragment)
            }
            ResolveError::HttpError(_) => "The search service could not be reached".to_string(),
            ResolveError::Cancelled => "The search was cancelled".to_string(),
            ResolveError::ConfigError { message } => format!("Configuration problem: {}", message),
            ResolveError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration value for {} is invalid: {}", field, reason)
            }
            ResolveError::IoError(e) => format!("File system error: {}", e),
            ResolveError::SerializationError(e) => format!("Could not encode the result: {}", e),
        }
    }

    /// Process exit code for the binaries.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Low => 130,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Input => "Enter a UK postcode such as 'SW1A 1AA' or a district such as 'SW1A'",
            ErrorCategory::Upstream => "Check network connectivity and the search endpoint, then retry",
            ErrorCategory::Resolution => "Check the postcode for typos or try a broader district",
            ErrorCategory::Configuration => "Review the configuration file and command line flags",
            ErrorCategory::System => "Check the output path exists and is writable",
        }
    }
}

pub type Result<T> = std::result::Result<T, ResolveError>;
