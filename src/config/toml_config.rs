use crate::core::controller::DualFieldController;
use crate::core::formatter::DEFAULT_GLYPH_WIDTH;
use crate::core::throttle::DEFAULT_THROTTLE_INTERVAL;
use crate::domain::model::{FieldConstraints, NumericField, Side};
use crate::utils::error::{PairError, Result};
use crate::utils::validation::{
    validate_at_least, validate_finite, validate_non_empty_string, validate_strictly_positive,
    validate_url, Validate,
};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use std::time::Duration;

static ENV_VAR: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").expect("env var pattern is valid"));

const DEFAULT_TIMEOUT_SECONDS: u64 = 10;

/// Public client key of the exchange's web form.
const DEFAULT_SERIAL: &str = "a7307e89-fbeb-4b28-a8ce-55b7fb3c32aa";
pub const SERIAL_ENV_VAR: &str = "PAIR_CONVERTER_SERIAL";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairConfig {
    pub quote: QuoteConfig,
    #[serde(default)]
    pub throttle: ThrottleConfig,
    #[serde(default)]
    pub display: DisplayConfig,
    pub left: FieldConfig,
    pub right: FieldConfig,
    #[serde(default = "default_initial_driving")]
    pub initial_driving: Side,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuoteConfig {
    pub endpoint: String,
    pub pair_id: u64,
    /// Client key sent in the `serial` header.
    pub serial: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThrottleConfig {
    pub interval_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DisplayConfig {
    pub glyph_width_px: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub currency: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub initial: Option<f64>,
}

fn default_initial_driving() -> Side {
    Side::Right
}

impl QuoteConfig {
    pub fn timeout_seconds(&self) -> u64 {
        self.timeout_seconds.unwrap_or(DEFAULT_TIMEOUT_SECONDS)
    }
}

impl FieldConfig {
    pub fn constraints(&self) -> Result<FieldConstraints> {
        FieldConstraints::new(self.min, self.max, self.step)
    }

    /// Initial value, clamped into bounds; `min` when unset.
    pub fn build_field(&self) -> Result<NumericField> {
        let constraints = self.constraints()?;
        let initial = self.initial.unwrap_or(constraints.min());
        Ok(NumericField::new(self.currency.clone(), constraints, initial))
    }

    fn validate_as(&self, section: &str) -> Result<()> {
        validate_non_empty_string(&format!("{}.currency", section), &self.currency)?;
        validate_finite(&format!("{}.min", section), self.min)?;
        validate_strictly_positive(&format!("{}.max", section), self.max)?;
        validate_strictly_positive(&format!("{}.step", section), self.step)?;
        if self.min > self.max {
            return Err(PairError::InvalidConfigValueError {
                field: format!("{}.min", section),
                value: self.min.to_string(),
                reason: format!("Value must not exceed {}.max ({})", section, self.max),
            });
        }
        if let Some(initial) = self.initial {
            validate_finite(&format!("{}.initial", section), initial)?;
        }
        Ok(())
    }
}

impl Default for PairConfig {
    /// RUB → USDT pair on the public exchange endpoint. The client key comes
    /// from `PAIR_CONVERTER_SERIAL` when set and non-blank.
    fn default() -> Self {
        Self {
            quote: QuoteConfig {
                endpoint: "https://awx.pro/b2api/change/user/pair/calc".to_string(),
                pair_id: 133,
                serial: std::env::var(SERIAL_ENV_VAR)
                    .ok()
                    .filter(|serial| !serial.trim().is_empty())
                    .unwrap_or_else(|| DEFAULT_SERIAL.to_string()),
                timeout_seconds: None,
            },
            throttle: ThrottleConfig::default(),
            display: DisplayConfig::default(),
            left: FieldConfig {
                currency: "RUB".to_string(),
                min: 10000.0,
                max: 70000000.0,
                step: 100.0,
                initial: Some(10000.0),
            },
            right: FieldConfig {
                currency: "USDT".to_string(),
                min: 0.000001,
                max: 70000000.0 / 96.47,
                step: 0.000001,
                initial: Some(0.0),
            },
            initial_driving: default_initial_driving(),
        }
    }
}

impl PairConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path).map_err(PairError::IoError)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| PairError::ConfigValidationError {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the variable's value; unknown variables are
    /// left as written.
    fn substitute_env_vars(content: &str) -> String {
        ENV_VAR
            .replace_all(content, |caps: &regex::Captures| {
                let var_name = &caps[1];
                std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
            })
            .into_owned()
    }

    pub fn validate_config(&self) -> Result<()> {
        validate_url("quote.endpoint", &self.quote.endpoint)?;
        validate_non_empty_string("quote.serial", &self.quote.serial)?;
        if let Some(timeout) = self.quote.timeout_seconds {
            validate_at_least("quote.timeout_seconds", timeout, 1)?;
        }
        if let Some(interval) = self.throttle.interval_ms {
            validate_at_least("throttle.interval_ms", interval, 1)?;
        }
        if let Some(width) = self.display.glyph_width_px {
            validate_strictly_positive("display.glyph_width_px", width)?;
        }
        self.left.validate_as("left")?;
        self.right.validate_as("right")?;
        Ok(())
    }

    pub fn throttle_interval(&self) -> Duration {
        self.throttle
            .interval_ms
            .map(Duration::from_millis)
            .unwrap_or(DEFAULT_THROTTLE_INTERVAL)
    }

    pub fn glyph_width(&self) -> f64 {
        self.display.glyph_width_px.unwrap_or(DEFAULT_GLYPH_WIDTH)
    }

    pub fn build_controller(&self) -> Result<DualFieldController> {
        Ok(DualFieldController::new(
            self.left.build_field()?,
            self.right.build_field()?,
            self.initial_driving,
            self.glyph_width(),
        ))
    }
}

impl Validate for PairConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const BASIC: &str = r#"
initial_driving = "left"

[quote]
endpoint = "https://quotes.example.com/calc"
pair_id = 7
serial = "abc-123"

[throttle]
interval_ms = 250

[left]
currency = "EUR"
min = 10
max = 5000
step = 1
initial = 100

[right]
currency = "USD"
min = 0.01
max = 5500
step = 0.01
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let config = PairConfig::from_toml_str(BASIC).unwrap();

        assert_eq!(config.quote.pair_id, 7);
        assert_eq!(config.quote.timeout_seconds(), 10);
        assert_eq!(config.throttle_interval(), Duration::from_millis(250));
        assert_eq!(config.glyph_width(), 24.0);
        assert_eq!(config.initial_driving, Side::Left);
        assert!(config.validate().is_ok());

        let controller = config.build_controller().unwrap();
        assert_eq!(controller.field(Side::Left).value, 100.0);
        assert_eq!(controller.field(Side::Right).value, 0.01);
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("PAIR_TEST_SERIAL", "from-env");
        let content = BASIC.replace("abc-123", "${PAIR_TEST_SERIAL}");

        let config = PairConfig::from_toml_str(&content).unwrap();
        assert_eq!(config.quote.serial, "from-env");

        std::env::remove_var("PAIR_TEST_SERIAL");
    }

    #[test]
    fn test_non_positive_max_is_rejected() {
        let content = BASIC.replace("max = 5000", "max = 0");
        let config = PairConfig::from_toml_str(&content).unwrap();

        assert!(config.validate().is_err());
        assert!(config.build_controller().is_err());
    }

    #[test]
    fn test_invalid_endpoint_is_rejected() {
        let content = BASIC.replace("https://quotes.example.com/calc", "not a url");
        let config = PairConfig::from_toml_str(&content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_missing_section_fails_to_parse() {
        let content = BASIC.replace("[quote]", "[quotes]");
        assert!(matches!(
            PairConfig::from_toml_str(&content),
            Err(PairError::ConfigValidationError { .. })
        ));
    }

    #[test]
    fn test_default_matches_exchange_form() {
        let config = PairConfig::default();
        let controller = config.build_controller().unwrap();

        assert_eq!(controller.driving(), Side::Right);
        assert_eq!(controller.field(Side::Left).value, 10000.0);
        assert_eq!(controller.field(Side::Right).value, 0.000001);
        assert_eq!(config.throttle_interval(), Duration::from_millis(1000));
    }

    #[test]
    fn test_default_config_is_valid_without_a_file() {
        let config = PairConfig::default();
        assert!(!config.quote.serial.trim().is_empty());
        assert!(config.validate().is_ok());

        let mut blank = config.clone();
        blank.quote.serial = "  ".to_string();
        assert!(matches!(
            blank.validate(),
            Err(PairError::InvalidConfigValueError { field, .. }) if field == "quote.serial"
        ));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(BASIC.as_bytes()).unwrap();

        let config = PairConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.left.currency, "EUR");
    }
}
