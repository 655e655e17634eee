pub mod controller;
pub mod fill;
pub mod formatter;
pub mod session;
pub mod throttle;

pub use crate::domain::model::{
    ConversionRequest, ConversionResponse, Direction, FieldConstraints, FieldProps, NumericField,
    PairEvent, PairSnapshot, QuickPickProps, Side,
};
pub use crate::domain::ports::{Clock, ManualClock, RateQuoteService, SystemClock};
pub use crate::utils::error::Result;
