use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

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

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Validation error on {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("{context} failed with status {status}")]
    HttpStatusError { status: u16, context: String },

    #[error("Not found: {resource}")]
    NotFoundError { resource: String },

    #[error("Not authorized (status {status})")]
    UnauthorizedError { status: u16 },

    #[error("Could not decode {context}: {message}")]
    DecodeError { context: String, message: String },
}

pub type Result<T> = std::result::Result<T, AppError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Configuration,
    Input,
    Data,
    Authentication,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AppError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AppError::ApiError(_) | AppError::HttpStatusError { .. } => ErrorCategory::Network,
            AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorCategory::Configuration,
            AppError::ValidationError { .. } => ErrorCategory::Input,
            AppError::NotFoundError { .. }
            | AppError::DecodeError { .. }
            | AppError::SerializationError(_) => ErrorCategory::Data,
            AppError::UnauthorizedError { .. } => ErrorCategory::Authentication,
            AppError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            AppError::NotFoundError { .. } | AppError::ValidationError { .. } => {
                ErrorSeverity::Low
            }
            AppError::ApiError(_)
            | AppError::HttpStatusError { .. }
            | AppError::UnauthorizedError { .. } => ErrorSeverity::Medium,
            AppError::DecodeError { .. }
            | AppError::SerializationError(_)
            | AppError::ConfigError { .. }
            | AppError::InvalidConfigValueError { .. }
            | AppError::MissingConfigError { .. } => ErrorSeverity::High,
            AppError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            AppError::ApiError(_) => "Could not reach the EatyFy backend".to_string(),
            AppError::HttpStatusError { status, context } => {
                format!("{} was rejected by the backend ({})", context, status)
            }
            AppError::NotFoundError { resource } => format!("{} was not found", resource),
            AppError::UnauthorizedError { .. } => {
                "Your session is missing or has expired".to_string()
            }
            AppError::ValidationError { field, message } => format!("{}: {}", field, message),
            AppError::DecodeError { context, .. } => {
                format!("The backend sent an unexpected {}", context)
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check your connection and the configured API base URL",
            ErrorCategory::Configuration => "Review the configuration file and command-line flags",
            ErrorCategory::Input => "Correct the highlighted field and try again",
            ErrorCategory::Data => "Try again later; the backend may be running another version",
            ErrorCategory::Authentication => "Log in again with `eatyfy login`",
            ErrorCategory::System => "Check file permissions for the session directory",
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, AppError::UnauthorizedError { .. })
    }
}
