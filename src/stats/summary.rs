//! Summary Statistics Module
//! Descriptive statistics backing the grouped dashboard summaries.

/// Summary statistics for one numeric metric within one group.
/// All values are rounded to two decimal places.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricStats {
    pub count: usize,
    pub mean: f64,
    pub min: f64,
    pub max: f64,
    pub median: f64,
}

impl Default for MetricStats {
    fn default() -> Self {
        Self {
            count: 0,
            mean: f64::NAN,
            min: f64::NAN,
            max: f64::NAN,
            median: f64::NAN,
        }
    }
}

impl MetricStats {
    /// Compute statistics over the non-missing values of one group.
    pub fn compute(values: &[f64]) -> MetricStats {
        let n = values.len();
        if n == 0 {
            return MetricStats::default();
        }

        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mean = values.iter().sum::<f64>() / n as f64;
        let median = if n % 2 == 0 {
            (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
        } else {
            sorted[n / 2]
        };

        MetricStats {
            count: n,
            mean: round2(mean),
            min: round2(sorted[0]),
            max: round2(sorted[n - 1]),
            median: round2(median),
        }
    }
}

/// Round to two decimal places.
pub fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn computes_mean_min_max_median() {
        let stats = MetricStats::compute(&[100.0, 300.0]);
        assert_eq!(stats.count, 2);
        assert_eq!(stats.mean, 200.0);
        assert_eq!(stats.min, 100.0);
        assert_eq!(stats.max, 300.0);
        assert_eq!(stats.median, 200.0);
    }

    #[test]
    fn odd_length_median_is_the_middle_value() {
        let stats = MetricStats::compute(&[3.0, 1.0, 2.0]);
        assert_eq!(stats.median, 2.0);
        assert_eq!(stats.mean, 2.0);
    }

    #[test]
    fn values_round_to_two_decimals() {
        let stats = MetricStats::compute(&[1.0, 2.0, 2.0]);
        assert_eq!(stats.mean, 1.67);
    }

    #[test]
    fn empty_group_yields_nan_stats() {
        let stats = MetricStats::compute(&[]);
        assert_eq!(stats.count, 0);
        assert!(stats.mean.is_nan());
    }

    #[test]
    fn round2_keeps_two_decimal_places() {
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(2.346), 2.35);
        assert_eq!(round2(200.0), 200.0);
    }
}
