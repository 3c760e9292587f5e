//! Health ratios and volume for a single edge.

use meshviz_topology::RateCounters;

use crate::types::Metrics;

/// Added to every denominator so an idle edge divides to zero instead of NaN.
/// Ratios therefore sum to slightly less than 1.
pub const EPSILON: f64 = 0.0001;

/// Split the edge's traffic into normal (2xx), warning (3xx) and danger
/// (4xx and 5xx) fractions of `rate`.
pub fn health_ratios(rates: &RateCounters) -> Metrics {
    let denom = rates.rate + EPSILON;
    Metrics {
        normal: rates.rate_2xx / denom,
        warning: rates.rate_3xx / denom,
        danger: (rates.rate_4xx + rates.rate_5xx) / denom,
    }
}

/// The edge's contribution to the region's `maxVolume`.
pub fn volume(rates: &RateCounters) -> f64 {
    rates.rate_2xx + rates.rate_3xx + rates.rate_4xx + rates.rate_5xx
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-3
    }

    #[test]
    fn test_all_ok() {
        let m = health_ratios(&RateCounters::all_ok(100.0));
        assert!(close(m.normal, 1.0));
        assert_eq!(m.warning, 0.0);
        assert_eq!(m.danger, 0.0);
        assert!(m.normal < 1.0);
    }

    #[test]
    fn test_mixed_classes() {
        let m = health_ratios(&RateCounters::new(20.0, 10.0, 0.0, 5.0, 5.0));
        assert!(close(m.normal, 0.5));
        assert!(close(m.danger, 0.5));
        assert_eq!(m.warning, 0.0);

        let m = health_ratios(&RateCounters::new(4.0, 1.0, 3.0, 0.0, 0.0));
        assert!(close(m.warning, 0.75));
    }

    #[test]
    fn test_idle_edge_is_zero() {
        let m = health_ratios(&RateCounters::default());
        assert_eq!(m, Metrics::default());
        assert_eq!(volume(&RateCounters::default()), 0.0);
    }

    #[test]
    fn test_ratios_bounded_and_converge() {
        let mut previous_gap = f64::MAX;
        for rate in [0.001, 1.0, 10.0, 1_000.0, 1_000_000.0] {
            let rates = RateCounters::new(rate, rate * 0.6, rate * 0.1, rate * 0.2, rate * 0.1);
            let m = health_ratios(&rates);
            for ratio in [m.normal, m.warning, m.danger] {
                assert!((0.0..=1.0).contains(&ratio));
            }
            let gap = (0.6 - m.normal).abs();
            assert!(gap <= previous_gap);
            previous_gap = gap;
        }
        assert!(previous_gap < 1e-9);
    }

    #[test]
    fn test_volume_ignores_total_rate() {
        let rates = RateCounters::new(999.0, 1.0, 2.0, 3.0, 4.0);
        assert_eq!(volume(&rates), 10.0);
    }
}
