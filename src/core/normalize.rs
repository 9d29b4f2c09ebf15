/// Observed `[min, max]` of one field across a batch
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FieldRange {
    pub min: f64,
    pub max: f64,
}

impl FieldRange {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Range over the finite values in `values`; `[0, 0]` if there are none
    pub fn observe<I>(values: I) -> Self
    where
        I: IntoIterator<Item = Option<f64>>,
    {
        values
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .fold(None, |range: Option<Self>, v| {
                Some(match range {
                    Some(r) => Self::new(r.min.min(v), r.max.max(v)),
                    None => Self::new(v, v),
                })
            })
            .unwrap_or(Self::new(0.0, 0.0))
    }

    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }
}

/// Higher raw value scores higher.
///
/// Missing or non-finite values score 0; a degenerate range scores 1.
#[inline]
pub fn normalize(value: Option<f64>, min: f64, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => {
            if max == min {
                1.0
            } else {
                (v - min) / (max - min)
            }
        }
        _ => 0.0,
    }
}

/// Lower raw value scores higher. Same edge cases as [`normalize`].
#[inline]
pub fn normalize_inverse(value: Option<f64>, min: f64, max: f64) -> f64 {
    match value {
        Some(v) if v.is_finite() => {
            if max == min {
                1.0
            } else {
                (max - v) / (max - min)
            }
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_orientation() {
        assert_eq!(normalize(Some(7.5), 5.0, 10.0), 0.5);
        assert_eq!(normalize(Some(10.0), 5.0, 10.0), 1.0);
        assert_eq!(normalize_inverse(Some(5.0), 5.0, 10.0), 1.0);
        assert_eq!(normalize_inverse(Some(10.0), 5.0, 10.0), 0.0);
    }

    #[test]
    fn test_degenerate_range_scores_one() {
        assert_eq!(normalize(Some(3.0), 3.0, 3.0), 1.0);
        assert_eq!(normalize_inverse(Some(3.0), 3.0, 3.0), 1.0);
    }

    #[test]
    fn test_missing_value_scores_zero() {
        assert_eq!(normalize(None, 0.0, 10.0), 0.0);
        assert_eq!(normalize_inverse(Some(f64::NAN), 0.0, 10.0), 0.0);
        assert_eq!(normalize(None, 2.0, 2.0), 0.0);
    }

    #[test]
    fn test_orientations_are_complementary() {
        for v in [1.0, 2.5, 4.0, 9.75] {
            let sum = normalize(Some(v), 1.0, 9.75) + normalize_inverse(Some(v), 1.0, 9.75);
            assert!((sum - 1.0).abs() < 1e-12);
        }
    }

    #[test]
    fn test_observe_skips_missing_values() {
        let range = FieldRange::observe(vec![Some(4.0), None, Some(f64::NAN), Some(-2.0), Some(9.0)]);
        assert_eq!(range, FieldRange::new(-2.0, 9.0));
    }

    #[test]
    fn test_observe_empty_defaults_to_zero() {
        let range = FieldRange::observe(vec![None, None]);
        assert_eq!(range, FieldRange::new(0.0, 0.0));
        assert!(range.is_degenerate());
    }
}
