use crate::core::fill::quick_pick_props;
use crate::core::formatter::{format_value, label_offset, parse_edit, EditOutcome};
use crate::domain::model::{
    ConversionRequest, ConversionResponse, FieldProps, NumericField, PairSnapshot, Side,
};

/// What happened to a conversion response handed to the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ApplyOutcome {
    Applied { side: Side, value: f64 },
    /// The response was for a side that is no longer driving, or an older
    /// response than one already applied.
    Stale,
}

/// Owns both fields and the driving flag. Every handler decides on its own
/// whether the counterpart needs a conversion and says so by returning a
/// [`ConversionRequest`].
#[derive(Debug, Clone)]
pub struct DualFieldController {
    left: NumericField,
    right: NumericField,
    driving: Side,
    glyph_width: f64,
    next_seq: u64,
    last_applied_seq: Option<u64>,
}

impl DualFieldController {
    pub fn new(left: NumericField, right: NumericField, driving: Side, glyph_width: f64) -> Self {
        Self {
            left,
            right,
            driving,
            glyph_width,
            next_seq: 1,
            last_applied_seq: None,
        }
    }

    pub fn driving(&self) -> Side {
        self.driving
    }

    pub fn field(&self, side: Side) -> &NumericField {
        match side {
            Side::Left => &self.left,
            Side::Right => &self.right,
        }
    }

    fn field_mut(&mut self, side: Side) -> &mut NumericField {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn on_focus(&mut self, side: Side) {
        if self.driving != side {
            tracing::debug!("Driving side changed: {} -> {}", self.driving, side);
        }
        self.driving = side;
    }

    /// Returns the edit outcome and, for committed edits, the conversion to
    /// request for the counterpart field.
    pub fn on_driving_edit(&mut self, text: &str) -> (EditOutcome, Option<ConversionRequest>) {
        let side = self.driving;
        let outcome = parse_edit(text, &self.field(side).constraints);

        let request = match &outcome {
            EditOutcome::Rejected => {
                tracing::debug!("Rejected edit {:?} on {} field", text, side);
                None
            }
            EditOutcome::Intermediate { display_text } => {
                self.field_mut(side).raw_text = display_text.clone();
                None
            }
            EditOutcome::Committed {
                value,
                display_text,
            } => {
                let field = self.field_mut(side);
                field.value = *value;
                field.raw_text = display_text.clone();
                Some(self.next_request())
            }
        };

        (outcome, request)
    }

    /// Sets the driving field to `bucket_percent` of its maximum. Buckets
    /// outside `(0, 100]` are ignored.
    pub fn on_quick_pick(&mut self, bucket_percent: f64) -> Option<ConversionRequest> {
        if !(bucket_percent > 0.0 && bucket_percent <= 100.0) {
            tracing::warn!("Ignoring quick pick with bucket {}", bucket_percent);
            return None;
        }

        let field = self.field_mut(self.driving);
        let value = field
            .constraints
            .clamp(field.constraints.max() * bucket_percent / 100.0);
        field.value = value;
        field.raw_text = format_value(value);

        Some(self.next_request())
    }

    pub fn apply_conversion(&mut self, response: &ConversionResponse) -> ApplyOutcome {
        if response.direction.origin() != self.driving {
            tracing::debug!(
                "Discarding response #{} for {:?}: {} side is driving now",
                response.seq,
                response.direction,
                self.driving
            );
            return ApplyOutcome::Stale;
        }

        if self
            .last_applied_seq
            .is_some_and(|last| response.seq < last)
        {
            tracing::debug!(
                "Discarding response #{}: #{} already applied",
                response.seq,
                self.last_applied_seq.unwrap_or_default()
            );
            return ApplyOutcome::Stale;
        }

        if !response.converted_amount.is_finite() {
            tracing::warn!(
                "Discarding response #{} with non-finite amount",
                response.seq
            );
            return ApplyOutcome::Stale;
        }

        let side = response.direction.destination();
        let field = self.field_mut(side);
        let value = field.constraints.clamp(response.converted_amount);
        if value != response.converted_amount {
            tracing::debug!(
                "Converted amount {} clamped to {} on {} field",
                response.converted_amount,
                value,
                side
            );
        }
        field.value = value;
        field.raw_text = format_value(value);
        self.last_applied_seq = Some(response.seq);

        ApplyOutcome::Applied { side, value }
    }

    pub fn snapshot(&self) -> PairSnapshot {
        PairSnapshot {
            driving: self.driving,
            left: self.field_props(&self.left),
            right: self.field_props(&self.right),
        }
    }

    fn field_props(&self, field: &NumericField) -> FieldProps {
        let constraints = field.constraints;
        FieldProps {
            currency_label: field.currency.clone(),
            min: constraints.min(),
            max: constraints.max(),
            step: constraints.step(),
            value: field.value,
            raw_text: field.raw_text.clone(),
            label_offset: label_offset(&field.raw_text, self.glyph_width),
            quick_picks: quick_pick_props(field.value, constraints.max()),
        }
    }

    fn next_request(&mut self) -> ConversionRequest {
        let seq = self.next_seq;
        self.next_seq += 1;
        ConversionRequest {
            seq,
            amount: self.field(self.driving).value,
            direction: self.driving.direction(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::formatter::DEFAULT_GLYPH_WIDTH;
    use crate::domain::model::{Direction, FieldConstraints};

    fn controller(driving: Side) -> DualFieldController {
        let left = NumericField::new(
            "RUB",
            FieldConstraints::new(10000.0, 70000000.0, 100.0).unwrap(),
            10000.0,
        );
        let right = NumericField::new(
            "USDT",
            FieldConstraints::new(0.000001, 70000000.0 / 96.47, 0.000001).unwrap(),
            0.0,
        );
        DualFieldController::new(left, right, driving, DEFAULT_GLYPH_WIDTH)
    }

    #[test]
    fn test_focus_switches_driving_side_without_request() {
        let mut pair = controller(Side::Right);
        pair.on_focus(Side::Left);
        assert_eq!(pair.driving(), Side::Left);
        assert_eq!(pair.snapshot().driving, Side::Left);
    }

    #[test]
    fn test_committed_edit_requests_conversion() {
        let mut pair = controller(Side::Left);
        let (outcome, request) = pair.on_driving_edit("12345");

        assert_eq!(outcome.committed_value(), Some(12300.0));
        let request = request.unwrap();
        assert_eq!(request.amount, 12300.0);
        assert_eq!(request.direction, Direction::ToTarget);
        assert_eq!(pair.field(Side::Left).raw_text, "12300");
    }

    #[test]
    fn test_intermediate_edit_keeps_value() {
        let mut pair = controller(Side::Right);
        let (_, request) = pair.on_driving_edit("12.");

        assert!(request.is_none());
        assert_eq!(pair.field(Side::Right).raw_text, "12.");
        assert_eq!(pair.field(Side::Right).value, 0.000001);
    }

    #[test]
    fn test_rejected_edit_keeps_state() {
        let mut pair = controller(Side::Left);
        pair.on_driving_edit("20000");
        let (outcome, request) = pair.on_driving_edit("20000x");

        assert_eq!(outcome, EditOutcome::Rejected);
        assert!(request.is_none());
        assert_eq!(pair.field(Side::Left).raw_text, "20000");
        assert_eq!(pair.field(Side::Left).value, 20000.0);
    }

    #[test]
    fn test_quick_pick_uses_exact_fraction_of_max() {
        let mut pair = controller(Side::Right);
        let max = 70000000.0 / 96.47;
        let request = pair.on_quick_pick(25.0).unwrap();

        assert_eq!(request.amount, max * 25.0 / 100.0);
        assert_eq!(request.direction, Direction::ToSource);
        let snapshot = pair.snapshot();
        assert_eq!(snapshot.right.quick_picks[0].fill_width_percent, 100.0);
        assert!(snapshot.right.quick_picks[1].fill_width_percent < 1e-6);
    }

    #[test]
    fn test_quick_pick_rejects_bad_bucket() {
        let mut pair = controller(Side::Left);
        assert!(pair.on_quick_pick(0.0).is_none());
        assert!(pair.on_quick_pick(150.0).is_none());
        assert!(pair.on_quick_pick(f64::NAN).is_none());
    }

    #[test]
    fn test_response_resyncs_counterpart_text() {
        let mut pair = controller(Side::Left);
        let (_, request) = pair.on_driving_edit("96470");
        let response = ConversionResponse::for_request(&request.unwrap(), 1000.0);

        let outcome = pair.apply_conversion(&response);

        assert_eq!(
            outcome,
            ApplyOutcome::Applied {
                side: Side::Right,
                value: 1000.0
            }
        );
        assert_eq!(pair.field(Side::Right).raw_text, "1000");
        assert_eq!(pair.snapshot().right.label_offset, 96.0);
    }

    #[test]
    fn test_response_for_previous_driving_side_is_discarded() {
        let mut pair = controller(Side::Left);
        let (_, request) = pair.on_driving_edit("20000");
        pair.on_focus(Side::Right);
        pair.on_driving_edit("5");

        let response = ConversionResponse::for_request(&request.unwrap(), 207.32);
        assert_eq!(pair.apply_conversion(&response), ApplyOutcome::Stale);
        assert_eq!(pair.field(Side::Right).value, 5.0);
        assert_eq!(pair.field(Side::Right).raw_text, "5");
    }

    #[test]
    fn test_older_response_does_not_overwrite_newer() {
        let mut pair = controller(Side::Left);
        let (_, first) = pair.on_driving_edit("20000");
        let (_, second) = pair.on_driving_edit("30000");

        let newer = ConversionResponse::for_request(&second.unwrap(), 311.0);
        let older = ConversionResponse::for_request(&first.unwrap(), 207.0);

        assert!(matches!(pair.apply_conversion(&newer), ApplyOutcome::Applied { .. }));
        assert_eq!(pair.apply_conversion(&older), ApplyOutcome::Stale);
        assert_eq!(pair.field(Side::Right).value, 311.0);
    }

    #[test]
    fn test_converted_amount_is_clamped_into_bounds() {
        let mut pair = controller(Side::Right);
        let (_, request) = pair.on_driving_edit("1");
        let response = ConversionResponse::for_request(&request.unwrap(), 96.47);

        pair.apply_conversion(&response);

        assert_eq!(pair.field(Side::Left).value, 10000.0);
        assert_eq!(pair.field(Side::Left).raw_text, "10000");
    }
}
