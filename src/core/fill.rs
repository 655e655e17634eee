//! Fill widths of the quick-pick buttons.
//!
//! Each button owns a 25-point band of the field's maximum (0–25, 25–50, ...)
//! and is drawn filled in proportion to how far the current value reaches into
//! that band.

use crate::domain::model::QuickPickProps;

pub const QUICK_PICK_BUCKETS: [f64; 4] = [25.0, 50.0, 75.0, 100.0];

const BAND_WIDTH: f64 = 25.0;

/// Relative slack on the "bucket reached" comparison; `max * b / 100 / max * 100`
/// is not always exactly `b` in floating point.
const REACHED_TOLERANCE: f64 = 1e-9;

/// Percentage (0–100) of `bucket`'s band covered by `value`.
///
/// `max` must be positive; `FieldConstraints` guarantees that for field data.
pub fn fill_percent(value: f64, max: f64, bucket: f64) -> f64 {
    debug_assert!(max > 0.0, "fill_percent requires a positive max");

    let percent = value / max * 100.0;
    let band_start = bucket - BAND_WIDTH;

    let fill = if percent >= bucket - bucket.abs() * REACHED_TOLERANCE {
        100.0
    } else if percent > band_start {
        (percent - band_start) / BAND_WIDTH * 100.0
    } else {
        0.0
    };

    if fill.is_nan() {
        0.0
    } else {
        fill.clamp(0.0, 100.0)
    }
}

pub fn fill_widths(value: f64, max: f64) -> [f64; 4] {
    QUICK_PICK_BUCKETS.map(|bucket| fill_percent(value, max, bucket))
}

pub fn quick_pick_props(value: f64, max: f64) -> Vec<QuickPickProps> {
    QUICK_PICK_BUCKETS
        .iter()
        .map(|&bucket| QuickPickProps {
            bucket_percent: bucket,
            fill_width_percent: fill_percent(value, max, bucket),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_half_value_fills_first_two_buckets() {
        assert_eq!(fill_widths(50.0, 100.0), [100.0, 100.0, 0.0, 0.0]);
    }

    #[test]
    fn test_partial_band_interpolates() {
        let widths = fill_widths(30.0, 100.0);
        assert_eq!(widths[0], 100.0);
        assert!((widths[1] - 20.0).abs() < 1e-9);
        assert_eq!(widths[2], 0.0);
        assert_eq!(widths[3], 0.0);
    }

    #[test]
    fn test_empty_and_full() {
        assert_eq!(fill_widths(0.0, 100.0), [0.0, 0.0, 0.0, 0.0]);
        assert_eq!(fill_widths(100.0, 100.0), [100.0, 100.0, 100.0, 100.0]);
    }

    #[test]
    fn test_monotonic_and_bounded() {
        let max = 725614.180574;
        for bucket in QUICK_PICK_BUCKETS {
            let mut previous = 0.0;
            for i in 0..=400 {
                let value = max * i as f64 / 400.0;
                let fill = fill_percent(value, max, bucket);
                assert!((0.0..=100.0).contains(&fill));
                assert!(fill >= previous, "bucket {} at {}", bucket, value);
                previous = fill;
            }
        }
    }

    #[test]
    fn test_quick_pick_value_fills_its_bucket() {
        for max in [100.0, 70000000.0, 70000000.0 / 96.47, 3.0] {
            for bucket in QUICK_PICK_BUCKETS {
                let value = max * bucket / 100.0;
                assert_eq!(fill_percent(value, max, bucket), 100.0, "{} {}", max, bucket);
            }
        }
    }

    #[test]
    fn test_props_carry_buckets_in_order() {
        let props = quick_pick_props(75.0, 100.0);
        let buckets: Vec<f64> = props.iter().map(|p| p.bucket_percent).collect();
        assert_eq!(buckets, QUICK_PICK_BUCKETS.to_vec());
        assert_eq!(props[2].fill_width_percent, 100.0);
        assert_eq!(props[3].fill_width_percent, 0.0);
    }
}
