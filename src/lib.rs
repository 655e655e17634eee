pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use adapters::HttpRateQuoteService;
pub use config::PairConfig;
pub use crate::core::{
    controller::{ApplyOutcome, DualFieldController},
    formatter::{parse_edit, EditOutcome},
    session::{Dispatch, PairSession, PairStats},
    throttle::RateLookupThrottle,
};
pub use domain::model::{PairEvent, PairSnapshot, Side};
pub use utils::error::{PairError, Result};
