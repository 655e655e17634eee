use crate::utils::error::{PairError, Result};
use crate::utils::validation::{validate_finite, validate_strictly_positive};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Which of the two fields a value or event belongs to. Left holds the
/// source currency, right the target currency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }

    /// Direction of a conversion requested while this side is driving.
    pub fn direction(self) -> Direction {
        match self {
            Side::Left => Direction::ToTarget,
            Side::Right => Direction::ToSource,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Left => write!(f, "left"),
            Side::Right => write!(f, "right"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    ToTarget,
    ToSource,
}

impl Direction {
    /// The side whose value was converted.
    pub fn origin(self) -> Side {
        match self {
            Direction::ToTarget => Side::Left,
            Direction::ToSource => Side::Right,
        }
    }

    /// The side that receives the converted amount.
    pub fn destination(self) -> Side {
        self.origin().opposite()
    }
}

/// Bounds and granularity of one numeric field.
///
/// Only constructible through [`FieldConstraints::new`], which rejects a
/// non-positive `max` so fill ratios never divide by zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldConstraints {
    min: f64,
    max: f64,
    step: f64,
}

impl FieldConstraints {
    pub fn new(min: f64, max: f64, step: f64) -> Result<Self> {
        validate_finite("min", min)?;
        validate_strictly_positive("max", max)?;
        validate_strictly_positive("step", step)?;
        if min > max {
            return Err(PairError::InvalidConfigValueError {
                field: "min".to_string(),
                value: min.to_string(),
                reason: format!("Value must not exceed max ({})", max),
            });
        }
        Ok(Self { min, max, step })
    }

    pub fn min(&self) -> f64 {
        self.min
    }

    pub fn max(&self) -> f64 {
        self.max
    }

    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.clamp(self.min, self.max)
    }
}

/// One editable amount. `raw_text` can run ahead of `value` while an edit is
/// incomplete (e.g. `"12."`); `value` always lies within the constraints.
#[derive(Debug, Clone, PartialEq)]
pub struct NumericField {
    pub currency: String,
    pub raw_text: String,
    pub value: f64,
    pub constraints: FieldConstraints,
}

impl NumericField {
    pub fn new(currency: impl Into<String>, constraints: FieldConstraints, initial: f64) -> Self {
        let value = constraints.clamp(initial);
        Self {
            currency: currency.into(),
            raw_text: crate::core::formatter::format_value(value),
            value,
            constraints,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionRequest {
    pub seq: u64,
    pub amount: f64,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConversionResponse {
    pub seq: u64,
    pub direction: Direction,
    pub converted_amount: f64,
}

impl ConversionResponse {
    pub fn for_request(request: &ConversionRequest, converted_amount: f64) -> Self {
        Self {
            seq: request.seq,
            direction: request.direction,
            converted_amount,
        }
    }
}

/// Input from the rendering layer.
#[derive(Debug, Clone, PartialEq)]
pub enum PairEvent {
    /// New raw text typed into the driving field.
    Edit(String),
    /// A quick-pick button (25/50/75/100) was selected on the driving field.
    QuickPick(f64),
    Focus(Side),
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuickPickProps {
    pub bucket_percent: f64,
    pub fill_width_percent: f64,
}

/// Everything the rendering layer needs to draw one field.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldProps {
    pub currency_label: String,
    pub min: f64,
    pub max: f64,
    pub step: f64,
    pub value: f64,
    pub raw_text: String,
    pub label_offset: f64,
    pub quick_picks: Vec<QuickPickProps>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PairSnapshot {
    pub driving: Side,
    pub left: FieldProps,
    pub right: FieldProps,
}

impl PairSnapshot {
    pub fn field(&self, side: Side) -> &FieldProps {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_constraints_reject_non_positive_max() {
        assert!(FieldConstraints::new(0.0, 0.0, 1.0).is_err());
        assert!(FieldConstraints::new(-10.0, -1.0, 1.0).is_err());
        assert!(FieldConstraints::new(0.0, 100.0, 0.0).is_err());
        assert!(FieldConstraints::new(50.0, 10.0, 1.0).is_err());
        assert!(FieldConstraints::new(0.0, 100.0, 1.0).is_ok());
    }

    #[test]
    fn test_direction_sides() {
        assert_eq!(Side::Left.direction(), Direction::ToTarget);
        assert_eq!(Side::Right.direction(), Direction::ToSource);
        assert_eq!(Direction::ToTarget.destination(), Side::Right);
        assert_eq!(Direction::ToSource.destination(), Side::Left);
    }

    #[test]
    fn test_initial_value_is_clamped() {
        let constraints = FieldConstraints::new(0.000001, 100.0, 0.000001).unwrap();
        let field = NumericField::new("USDT", constraints, 0.0);
        assert_eq!(field.value, 0.000001);
        assert_eq!(field.raw_text, "0.000001");
    }
}
