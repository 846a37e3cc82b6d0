use crate::utils::error::{MarketError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(MarketError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_positive_number(field_name: &str, value: u64, min_value: u64) -> Result<()> {
    if value < min_value {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(MarketError::ValidationError {
            message: format!("{} cannot be empty or whitespace-only", field_name),
        });
    }
    Ok(())
}

pub fn validate_min_length(field_name: &str, value: &str, min: usize) -> Result<()> {
    if value.chars().count() < min {
        return Err(MarketError::ValidationError {
            message: format!("{} must be at least {} characters", field_name, min),
        });
    }
    Ok(())
}

pub fn validate_max_length(field_name: &str, value: &str, max: usize) -> Result<()> {
    if value.chars().count() > max {
        return Err(MarketError::ValidationError {
            message: format!("{} must be at most {} characters", field_name, max),
        });
    }
    Ok(())
}

/// Loose shape check only; the server does the real validation.
pub fn validate_email(field_name: &str, value: &str) -> Result<()> {
    let valid = match value.split_once('@') {
        Some((local, domain)) => !local.is_empty() && domain.contains('.') && !domain.starts_with('.'),
        None => false,
    };
    if !valid {
        return Err(MarketError::ValidationError {
            message: format!("{} is not a valid email address", field_name),
        });
    }
    Ok(())
}

pub fn validate_range<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min: T,
    max: T,
) -> Result<()> {
    if value < min || value > max {
        return Err(MarketError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be between {} and {}", min, max),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("api.base_url", "https://example.com/api/").is_ok());
        assert!(validate_url("api.base_url", "http://localhost:8000").is_ok());
        assert!(validate_url("api.base_url", "").is_err());
        assert!(validate_url("api.base_url", "invalid-url").is_err());
        assert!(validate_url("api.base_url", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_positive_number() {
        assert!(validate_positive_number("checkout.default_quantity", 1, 1).is_ok());
        assert!(validate_positive_number("checkout.default_quantity", 0, 1).is_err());
    }

    #[test]
    fn test_validate_lengths() {
        assert!(validate_min_length("password", "secret", 6).is_ok());
        assert!(validate_min_length("password", "short", 6).is_err());
        assert!(validate_max_length("username", "ada", 75).is_ok());
        assert!(validate_max_length("username", &"x".repeat(76), 75).is_err());
        assert!(validate_non_empty_string("username", "  ").is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("email", "ada@uni.edu").is_ok());
        assert!(validate_email("email", "ada").is_err());
        assert!(validate_email("email", "@uni.edu").is_err());
        assert!(validate_email("email", "ada@localhost").is_err());
    }

    #[test]
    fn test_validate_range() {
        assert!(validate_range("api.timeout_seconds", 30, 1, 300).is_ok());
        assert!(validate_range("api.timeout_seconds", 0, 1, 300).is_err());
    }
}
