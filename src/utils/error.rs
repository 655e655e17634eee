use thiserror::Error;

#[derive(Error, Debug)]
pub enum PairError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Rate quote error: {message}")]
    QuoteError { message: String },

    #[error("Configuration validation failed for '{field}': {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for '{field}': {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Data,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl PairError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            PairError::ApiError(_) | PairError::QuoteError { .. } => ErrorCategory::Network,
            PairError::SerializationError(_) => ErrorCategory::Data,
            PairError::IoError(_) => ErrorCategory::System,
            PairError::ConfigValidationError { .. } | PairError::InvalidConfigValueError { .. } => {
                ErrorCategory::Configuration
            }
        }
    }

    /// Conversion failures only leave a stale counterpart value, so they are
    /// never more than `Medium`.
    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Data => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            PairError::ApiError(_) | PairError::QuoteError { .. } => {
                "The exchange rate could not be fetched; the last known amount is kept".to_string()
            }
            PairError::SerializationError(_) => {
                "The rate service returned data that could not be read".to_string()
            }
            PairError::IoError(e) => format!("File system error: {}", e),
            PairError::ConfigValidationError { field, message } => {
                format!("Configuration field '{}' is invalid: {}", field, message)
            }
            PairError::InvalidConfigValueError { field, reason, .. } => {
                format!("Configuration field '{}' is invalid: {}", field, reason)
            }
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the quote endpoint and network connectivity",
            ErrorCategory::Data => "Check that the quote endpoint speaks the expected JSON format",
            ErrorCategory::Configuration => "Fix the configuration file and restart",
            ErrorCategory::System => "Check file permissions and available disk space",
        }
    }
}

pub type Result<T> = std::result::Result<T, PairError>;
