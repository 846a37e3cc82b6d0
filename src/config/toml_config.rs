use crate::domain::ports::ConfigProvider;
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::{self, Validate};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_BASE_URL: &str = "http://localhost:8000/api/";
pub const DEFAULT_PAYMENT_METHOD: &str = "mock";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    #[serde(default = "default_base_url")]
    pub base_url: String,
    #[serde(default = "default_timeout")]
    pub timeout_seconds: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CheckoutConfig {
    #[serde(default = "default_payment_method")]
    pub payment_method: String,
    #[serde(default = "default_quantity")]
    pub default_quantity: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    #[serde(default = "default_description_width")]
    pub description_width: usize,
}

fn default_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_user_agent() -> String {
    format!("campus-market/{}", env!("CARGO_PKG_VERSION"))
}

fn default_payment_method() -> String {
    DEFAULT_PAYMENT_METHOD.to_string()
}

fn default_quantity() -> u32 {
    1
}

fn default_description_width() -> usize {
    160
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout_seconds: default_timeout(),
            user_agent: default_user_agent(),
        }
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            payment_method: default_payment_method(),
            default_quantity: default_quantity(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            description_width: default_description_width(),
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(MarketError::IoError)?;
        Self::from_toml_str(&content)
    }

    /// Loads `path` when it exists and falls back to defaults otherwise.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if path.exists() {
            tracing::debug!("Loading configuration from {}", path.display());
            Self::from_file(path)
        } else {
            tracing::debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        let mut config: TomlConfig =
            toml::from_str(&processed_content).map_err(|e| MarketError::ConfigValidationError {
                field: "toml_parsing".to_string(),
                message: format!("TOML parsing error: {}", e),
            })?;
        config.api.base_url = normalize_base_url(&config.api.base_url);
        Ok(config)
    }

    /// 替換環境變數 (例如 ${MARKET_API_URL})
    fn substitute_env_vars(content: &str) -> String {
        static ENV_VAR: OnceLock<Regex> = OnceLock::new();
        let re = ENV_VAR.get_or_init(|| {
            Regex::new(r"\$\{([^}]+)\}").unwrap_or_else(|e| panic!("invalid env var pattern: {}", e))
        });

        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.api.base_url = normalize_base_url(base_url);
        self
    }

    pub fn validate_config(&self) -> Result<()> {
        if self.api.base_url.trim_end_matches('/').trim().is_empty() {
            return Err(MarketError::MissingConfigError {
                field: "api.base_url".to_string(),
            });
        }
        if let Some(start) = self.api.base_url.find("${") {
            let placeholder = self.api.base_url[start..].trim_end_matches('/');
            return Err(MarketError::ConfigError {
                message: format!("api.base_url still contains {}; is the variable set?", placeholder),
            });
        }
        if self.api.user_agent.trim().is_empty() {
            return Err(MarketError::MissingConfigError {
                field: "api.user_agent".to_string(),
            });
        }
        validation::validate_url("api.base_url", &self.api.base_url)?;
        validation::validate_range("api.timeout_seconds", self.api.timeout_seconds, 1, 600)?;
        validation::validate_non_empty_string("checkout.payment_method", &self.checkout.payment_method)?;
        validation::validate_positive_number(
            "checkout.default_quantity",
            u64::from(self.checkout.default_quantity),
            1,
        )?;
        validation::validate_positive_number(
            "display.description_width",
            self.display.description_width as u64,
            8,
        )?;
        Ok(())
    }
}

/// Endpoint paths are relative, so the base must end in `/` for
/// `Url::join` to keep its last segment.
pub fn normalize_base_url(base_url: &str) -> String {
    let trimmed = base_url.trim();
    if trimmed.ends_with('/') {
        trimmed.to_string()
    } else {
        format!("{}/", trimmed)
    }
}

impl ConfigProvider for TomlConfig {
    fn base_url(&self) -> &str {
        &self.api.base_url
    }

    fn timeout_seconds(&self) -> u64 {
        self.api.timeout_seconds
    }

    fn user_agent(&self) -> &str {
        &self.api.user_agent
    }

    fn payment_method(&self) -> &str {
        &self.checkout.payment_method
    }

    fn default_quantity(&self) -> u32 {
        self.checkout.default_quantity
    }

    fn description_width(&self) -> usize {
        self.display.description_width
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}
