use crate::utils::error::{PairError, Result};
use url::Url;

pub trait Validate {
    fn validate(&self) -> Result<()>;
}

pub fn validate_url(field_name: &str, url_str: &str) -> Result<()> {
    if url_str.is_empty() {
        return Err(PairError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: "URL cannot be empty".to_string(),
        });
    }

    match Url::parse(url_str) {
        Ok(url) => match url.scheme() {
            "http" | "https" => Ok(()),
            scheme => Err(PairError::InvalidConfigValueError {
                field: field_name.to_string(),
                value: url_str.to_string(),
                reason: format!("Unsupported URL scheme: {}", scheme),
            }),
        },
        Err(e) => Err(PairError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: url_str.to_string(),
            reason: format!("Invalid URL format: {}", e),
        }),
    }
}

pub fn validate_non_empty_string(field_name: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(PairError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value cannot be empty or whitespace-only".to_string(),
        });
    }
    Ok(())
}

pub fn validate_at_least<T: PartialOrd + std::fmt::Display + Copy>(
    field_name: &str,
    value: T,
    min_value: T,
) -> Result<()> {
    if value < min_value {
        return Err(PairError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: format!("Value must be at least {}", min_value),
        });
    }
    Ok(())
}

pub fn validate_finite(field_name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(PairError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be a finite number".to_string(),
        });
    }
    Ok(())
}

pub fn validate_strictly_positive(field_name: &str, value: f64) -> Result<()> {
    validate_finite(field_name, value)?;
    if value <= 0.0 {
        return Err(PairError::InvalidConfigValueError {
            field: field_name.to_string(),
            value: value.to_string(),
            reason: "Value must be greater than zero".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_url() {
        assert!(validate_url("quote.endpoint", "https://example.com").is_ok());
        assert!(validate_url("quote.endpoint", "http://example.com").is_ok());
        assert!(validate_url("quote.endpoint", "").is_err());
        assert!(validate_url("quote.endpoint", "invalid-url").is_err());
        assert!(validate_url("quote.endpoint", "ftp://example.com").is_err());
    }

    #[test]
    fn test_validate_strictly_positive() {
        assert!(validate_strictly_positive("left.max", 1.0).is_ok());
        assert!(validate_strictly_positive("left.max", 0.0).is_err());
        assert!(validate_strictly_positive("left.max", -5.0).is_err());
        assert!(validate_strictly_positive("left.max", f64::NAN).is_err());
        assert!(validate_strictly_positive("left.max", f64::INFINITY).is_err());
    }

    #[test]
    fn test_validate_at_least() {
        assert!(validate_at_least("throttle.interval_ms", 1000u64, 1).is_ok());
        assert!(validate_at_least("throttle.interval_ms", 0u64, 1).is_err());
    }

    #[test]
    fn test_validate_non_empty_string() {
        assert!(validate_non_empty_string("quote.serial", "abc").is_ok());
        assert!(validate_non_empty_string("quote.serial", "   ").is_err());
    }
}
