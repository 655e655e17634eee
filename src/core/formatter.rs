//! Text <-> value reconciliation for a single numeric field.

use crate::domain::model::FieldConstraints;
use regex::Regex;
use std::sync::LazyLock;

/// Unsigned decimal: digits, at most one point, digits after it. Empty text
/// matches too and commits as `min`.
static DECIMAL_EDIT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[0-9]*\.?[0-9]*$").expect("decimal edit pattern is valid"));

pub const DEFAULT_GLYPH_WIDTH: f64 = 24.0;

#[derive(Debug, Clone, PartialEq)]
pub enum EditOutcome {
    /// Text is not an unsigned decimal; keep the previous state.
    Rejected,
    /// Text ends in a bare decimal point; show it but commit nothing yet.
    Intermediate { display_text: String },
    Committed { value: f64, display_text: String },
}

impl EditOutcome {
    pub fn committed_value(&self) -> Option<f64> {
        match self {
            EditOutcome::Committed { value, .. } => Some(*value),
            _ => None,
        }
    }
}

pub fn parse_edit(raw_text: &str, constraints: &FieldConstraints) -> EditOutcome {
    if !DECIMAL_EDIT.is_match(raw_text) {
        return EditOutcome::Rejected;
    }

    if raw_text.ends_with('.') {
        return EditOutcome::Intermediate {
            display_text: raw_text.to_string(),
        };
    }

    let value = match raw_text.parse::<f64>() {
        Ok(parsed) if parsed < constraints.min() => constraints.min(),
        Ok(parsed) if parsed > constraints.max() => constraints.max(),
        Ok(parsed) => constraints.clamp(round_to_step(parsed, constraints.step())),
        Err(_) => constraints.min(),
    };

    EditOutcome::Committed {
        value,
        display_text: format_value(value),
    }
}

/// `round(value / step) * step`, snapped to the step's decimal precision so
/// that e.g. a step of `0.000001` never yields `0.30000000000000004`.
pub fn round_to_step(value: f64, step: f64) -> f64 {
    let rounded = (value / step).round() * step;
    let precision = decimal_places(step);
    format!("{:.*}", precision, rounded)
        .parse::<f64>()
        .unwrap_or(rounded)
}

/// Plain decimal notation, never an exponent and never `-0`.
pub fn format_value(value: f64) -> String {
    // -0.0 + 0.0 == +0.0
    (value + 0.0).to_string()
}

/// Horizontal offset of the currency label that trails the typed text.
pub fn label_offset(raw_text: &str, glyph_width: f64) -> f64 {
    raw_text.chars().count() as f64 * glyph_width
}

fn decimal_places(value: f64) -> usize {
    format_value(value)
        .split_once('.')
        .map(|(_, fraction)| fraction.len())
        .unwrap_or(0)
}
