use std::fmt;
use thiserror::Error;

/// Step of the quick-buy chain that produced an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CheckoutStep {
    CreateOrder,
    InitiatePayment,
    EnterCode,
    ConfirmPayment,
}

impl fmt::Display for CheckoutStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CheckoutStep::CreateOrder => "order creation",
            CheckoutStep::InitiatePayment => "payment initiation",
            CheckoutStep::EnterCode => "confirmation code entry",
            CheckoutStep::ConfirmPayment => "payment confirmation",
        };
        f.write_str(name)
    }
}

#[derive(Error, Debug)]
pub enum MarketError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Not signed in")]
    Unauthorized,

    #[error("Permission denied")]
    Forbidden,

    #[error("Not found: {path}")]
    NotFound { path: String },

    #[error("API returned {status}: {message}")]
    ApiError { status: u16, message: String },

    #[error("Checkout failed during {step}: {source}")]
    CheckoutError {
        step: CheckoutStep,
        #[source]
        source: Box<MarketError>,
    },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration error in {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Authentication,
    Api,
    Configuration,
    Input,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MarketError {
    pub fn checkout(step: CheckoutStep, source: MarketError) -> Self {
        MarketError::CheckoutError {
            step,
            source: Box::new(source),
        }
    }

    /// Maps an HTTP status and response body onto an error.
    pub fn from_status(status: u16, path: &str, body: &str) -> Self {
        match status {
            401 => MarketError::Unauthorized,
            403 => MarketError::Forbidden,
            404 => MarketError::NotFound {
                path: path.to_string(),
            },
            _ => MarketError::ApiError {
                status,
                message: extract_api_message(body),
            },
        }
    }

    /// True when the server rejected the request because of missing or
    /// insufficient credentials.
    pub fn is_auth_error(&self) -> bool {
        match self {
            MarketError::Unauthorized | MarketError::Forbidden => true,
            MarketError::CheckoutError { source, .. } => source.is_auth_error(),
            _ => false,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MarketError::HttpError(_) => ErrorCategory::Network,
            MarketError::Unauthorized | MarketError::Forbidden => ErrorCategory::Authentication,
            MarketError::NotFound { .. }
            | MarketError::ApiError { .. }
            | MarketError::SerializationError(_) => ErrorCategory::Api,
            MarketError::CheckoutError { source, .. } => source.category(),
            MarketError::UrlError(_)
            | MarketError::ConfigError { .. }
            | MarketError::MissingConfigError { .. }
            | MarketError::InvalidConfigValueError { .. }
            | MarketError::ConfigValidationError { .. } => ErrorCategory::Configuration,
            MarketError::ValidationError { .. } => ErrorCategory::Input,
            MarketError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Network | ErrorCategory::Authentication => ErrorSeverity::Medium,
            ErrorCategory::Api | ErrorCategory::Configuration => ErrorSeverity::High,
            ErrorCategory::System => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self {
            MarketError::HttpError(_) => "Check that the marketplace API is reachable at the configured base_url",
            MarketError::Unauthorized => "Sign in with `market login` or pass --user",
            MarketError::Forbidden => "Sign in with a staff account",
            MarketError::NotFound { .. } => "Check the identifier and try again",
            MarketError::ApiError { .. } => "Inspect the server message above; the request was rejected",
            MarketError::CheckoutError { source, .. } => source.recovery_suggestion(),
            MarketError::SerializationError(_) => "The API answered with an unexpected shape; check the server version",
            MarketError::UrlError(_)
            | MarketError::ConfigError { .. }
            | MarketError::MissingConfigError { .. }
            | MarketError::InvalidConfigValueError { .. }
            | MarketError::ConfigValidationError { .. } => "Fix the configuration file or command-line flags",
            MarketError::ValidationError { .. } => "Correct the input and retry",
            MarketError::IoError(_) => "Check file permissions and the terminal",
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            MarketError::HttpError(_) => "Could not reach the marketplace".to_string(),
            MarketError::Unauthorized => "You need to be signed in".to_string(),
            MarketError::Forbidden => "You are not allowed to do that".to_string(),
            MarketError::CheckoutError { step, source } => {
                format!("Failed to purchase ({}): {}", step, source.user_friendly_message())
            }
            other => other.to_string(),
        }
    }
}

/// Pulls the human readable part out of an error body (`detail` or `error`),
/// falling back to the raw text.
fn extract_api_message(body: &str) -> String {
    if let Ok(serde_json::Value::Object(obj)) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["detail", "error", "message"] {
            if let Some(serde_json::Value::String(s)) = obj.get(key) {
                return s.clone();
            }
        }
        // DRF validation errors: {"field": ["msg", ...]}
        if let Some((field, serde_json::Value::Array(msgs))) = obj.iter().next() {
            if let Some(serde_json::Value::String(first)) = msgs.first() {
                return format!("{}: {}", field, first);
            }
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        "empty response".to_string()
    } else {
        trimmed.to_string()
    }
}

pub type Result<T> = std::result::Result<T, MarketError>;
