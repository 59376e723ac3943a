//! Backtest summary metrics — pure functions over the equity curve.
//!
//! CAGR here is money-weighted for a DCA plan: final value against total
//! contributed capital, annualized over the calendar span of the curve.
//! Degenerate inputs (nothing invested, zero elapsed time) define the
//! metric as 0.0 rather than propagating a division error.

use chrono::NaiveDate;

/// Compound annual growth rate of `final_value` over `invested`.
///
/// Years are calendar days between the first and last curve dates divided
/// by 365.25. Returns 0.0 when invested <= 0 or the span is empty.
pub fn cagr(invested: f64, final_value: f64, first: NaiveDate, last: NaiveDate) -> f64 {
    if invested <= 0.0 {
        return 0.0;
    }
    let years = (last - first).num_days() as f64 / 365.25;
    if years <= 0.0 {
        return 0.0;
    }
    (final_value / invested).powf(1.0 / years) - 1.0
}

/// Maximum drawdown as a negative fraction (e.g. -0.15 = 15% drawdown).
///
/// Returns 0.0 for empty or single-point curves and for monotonically
/// rising equity.
pub fn max_drawdown(equity: &[f64]) -> f64 {
    if equity.len() < 2 {
        return 0.0;
    }
    let mut peak = equity[0];
    let mut max_dd = 0.0_f64;

    for &eq in equity {
        if eq > peak {
            peak = eq;
        }
        if peak > 0.0 {
            let dd = (eq - peak) / peak;
            if dd < max_dd {
                max_dd = dd;
            }
        }
    }
    max_dd
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    // ── CAGR ──

    #[test]
    fn cagr_doubling_over_one_year() {
        let c = cagr(1000.0, 2000.0, d("2023-01-01"), d("2024-01-01"));
        // 365 days / 365.25 ≈ 1 year → CAGR ≈ 100%
        assert!((c - 1.0).abs() < 0.01, "got {c}");
    }

    #[test]
    fn cagr_doubling_over_two_years() {
        let c = cagr(1000.0, 2000.0, d("2022-01-01"), d("2024-01-01"));
        // sqrt(2) - 1 ≈ 41.4%
        assert!((c - 0.414).abs() < 0.01, "got {c}");
    }

    #[test]
    fn cagr_losing_money_is_negative() {
        let c = cagr(1000.0, 500.0, d("2023-01-01"), d("2024-01-01"));
        assert!(c < 0.0 && c > -1.0);
    }

    #[test]
    fn cagr_zero_invested_is_zero() {
        assert_eq!(cagr(0.0, 2000.0, d("2023-01-01"), d("2024-01-01")), 0.0);
    }

    #[test]
    fn cagr_zero_span_is_zero() {
        assert_eq!(cagr(1000.0, 2000.0, d("2024-01-01"), d("2024-01-01")), 0.0);
    }

    #[test]
    fn cagr_reversed_span_is_zero() {
        assert_eq!(cagr(1000.0, 2000.0, d("2024-01-01"), d("2023-01-01")), 0.0);
    }

    // ── Max drawdown ──

    #[test]
    fn max_drawdown_known() {
        let eq = vec![100.0, 110.0, 90.0, 95.0];
        let expected = (90.0 - 110.0) / 110.0;
        assert!((max_drawdown(&eq) - expected).abs() < 1e-10);
    }

    #[test]
    fn max_drawdown_monotonic_increase() {
        let eq: Vec<f64> = (0..100).map(|i| 100.0 + i as f64).collect();
        assert_eq!(max_drawdown(&eq), 0.0);
    }

    #[test]
    fn max_drawdown_empty_and_single() {
        assert_eq!(max_drawdown(&[]), 0.0);
        assert_eq!(max_drawdown(&[100.0]), 0.0);
    }

    #[test]
    fn max_drawdown_bounded_below_by_minus_one() {
        let eq = vec![100.0, 0.0, 50.0];
        let dd = max_drawdown(&eq);
        assert!(dd >= -1.0 && dd <= 0.0);
        assert!((dd - (-1.0)).abs() < 1e-10);
    }
}
