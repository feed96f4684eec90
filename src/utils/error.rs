use thiserror::Error;

#[derive(Error, Debug)]
pub enum CheckError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("CSV processing error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid value for {field} ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

impl CheckError {
    /// Transient failures worth another attempt against the search provider.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CheckError::Http(_) | CheckError::Status { .. })
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            CheckError::Http(_) => "Check network connectivity and the search endpoint",
            CheckError::Status { status: 429 | 403, .. } => {
                "The search provider is throttling requests; wait and retry later"
            }
            CheckError::Status { .. } => "The search provider returned an error; retry later",
            CheckError::InvalidUrl(_) => "Check the configured search endpoint URL",
            CheckError::IoError(_) | CheckError::CsvError(_) => {
                "Check that the input file exists and is readable CSV with a name,city header"
            }
            CheckError::SerializationError(_) => "Check the output destination",
            CheckError::ConfigError { .. }
            | CheckError::InvalidConfigValueError { .. }
            | CheckError::MissingConfigError { .. }
            | CheckError::ValidationError { .. } => "Fix the configuration and run again",
        }
    }
}

pub type Result<T> = std::result::Result<T, CheckError>;
