use thiserror::Error;

#[derive(Error, Debug)]
pub enum StorageError {
    #[error("Failed to construct storage client: {message}")]
    ConstructionError { message: String },

    #[error("Validation error for object '{key}': {message}")]
    ValidationError { key: String, message: String },

    #[error("Failed to fetch '{url}' for object '{key}': {source}")]
    FetchError {
        key: String,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Failed to upload object '{key}': {message}")]
    UploadError { key: String, message: String },

    #[error("Failed to parse URL '{url}': {source}")]
    ParseError {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Failed to sign URL for object '{key}': {message}")]
    SignError { key: String, message: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Invalid configuration value for '{field}' ({value}): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },
}

pub type Result<T> = std::result::Result<T, StorageError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    Input,
    Network,
    Remote,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl StorageError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            StorageError::ConstructionError { .. }
            | StorageError::ConfigError { .. }
            | StorageError::InvalidConfigValueError { .. }
            | StorageError::MissingConfigError { .. } => ErrorCategory::Configuration,
            StorageError::ValidationError { .. } | StorageError::ParseError { .. } => {
                ErrorCategory::Input
            }
            StorageError::FetchError { .. } => ErrorCategory::Network,
            StorageError::UploadError { .. } | StorageError::SignError { .. } => {
                ErrorCategory::Remote
            }
            StorageError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::High,
            // 遠端錯誤通常可以重試
            ErrorCategory::Network | ErrorCategory::Remote => ErrorSeverity::Medium,
            ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    /// The object key the failed operation was working on, if any.
    pub fn object_key(&self) -> Option<&str> {
        match self {
            StorageError::ValidationError { key, .. }
            | StorageError::FetchError { key, .. }
            | StorageError::UploadError { key, .. }
            | StorageError::SignError { key, .. } => Some(key),
            _ => None,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            StorageError::ConstructionError { .. } => {
                "Check the endpoint, credentials and bucket name in your configuration"
            }
            StorageError::ValidationError { .. } => "Provide a non-empty payload",
            StorageError::FetchError { .. } => {
                "Make sure the source URL is reachable and returns a 2xx status"
            }
            StorageError::UploadError { .. } => {
                "Verify the bucket exists and the credentials are allowed to write to it"
            }
            StorageError::ParseError { .. } => "Pass an absolute URL such as https://host/path",
            StorageError::SignError { .. } => {
                "Use an expiry between 1 and 604800 seconds and supported signing options"
            }
            StorageError::IoError(_) => "Check that the file exists and is readable",
            StorageError::ConfigError { .. }
            | StorageError::InvalidConfigValueError { .. }
            | StorageError::MissingConfigError { .. } => {
                "Review the configuration file or OSS_* environment variables"
            }
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            StorageError::FetchError { url, key, source } => match source.status() {
                Some(status) => format!(
                    "Source '{}' answered {} so '{}' was not uploaded",
                    url, status, key
                ),
                None => format!("Could not download '{}' for object '{}'", url, key),
            },
            StorageError::MissingConfigError { field } => {
                format!("Required setting '{}' is not configured", field)
            }
            other => other.to_string(),
        }
    }
}
