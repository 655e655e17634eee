#[cfg(feature = "cli")]
pub mod cli;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::CliConfig;
pub use toml_config::{
    DisplayConfig, FieldConfig, PairConfig, QuoteConfig, ThrottleConfig, SERIAL_ENV_VAR,
};
