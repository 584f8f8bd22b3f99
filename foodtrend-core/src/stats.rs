//! Two-sample significance testing.
//!
//! Implements from first principles:
//! - Lanczos approximation for ln(Gamma)
//! - Regularized incomplete beta function
//! - Student's t-distribution CDF
//! - Independent two-sample t-test with pooled variance (two-sided)
//!
//! Degenerate samples never error: they produce NaN statistics, which the
//! views print as-is.

use serde::Serialize;

// ─── Math primitives ─────────────────────────────────────────────────

/// Lanczos approximation for ln(Gamma(x)), g=7, n=9.
fn ln_gamma(x: f64) -> f64 {
    #[allow(clippy::excessive_precision)]
    const COEFFICIENTS: [f64; 9] = [
        0.99999999999980993,
        676.5203681218851,
        -1259.1392167224028,
        771.32342877765313,
        -176.61502916214059,
        12.507343278686905,
        -0.13857109526572012,
        9.9843695780195716e-6,
        1.5056327351493116e-7,
    ];
    const G: f64 = 7.0;

    if x < 0.5 {
        // Reflection formula: Gamma(x) * Gamma(1-x) = pi / sin(pi*x)
        let log_pi = std::f64::consts::PI.ln();
        let sin_val = (std::f64::consts::PI * x).sin();
        if sin_val.abs() < 1e-300 {
            return f64::INFINITY;
        }
        return log_pi - sin_val.abs().ln() - ln_gamma(1.0 - x);
    }

    let x = x - 1.0;
    let mut sum = COEFFICIENTS[0];
    for (i, &c) in COEFFICIENTS.iter().enumerate().skip(1) {
        sum += c / (x + i as f64);
    }

    let t = x + G + 0.5;
    let log_sqrt_2pi = (2.0 * std::f64::consts::PI).sqrt().ln();

    log_sqrt_2pi + (t.ln() * (x + 0.5)) - t + sum.ln()
}

/// Regularized incomplete beta function I_x(a, b), modified Lentz continued fraction.
fn regularized_incomplete_beta(a: f64, b: f64, x: f64) -> f64 {
    if !(0.0..=1.0).contains(&x) {
        return f64::NAN;
    }
    if x == 0.0 {
        return 0.0;
    }
    if x == 1.0 {
        return 1.0;
    }

    // Symmetry relation converges faster past the mode.
    if x > (a + 1.0) / (a + b + 2.0) {
        return 1.0 - regularized_incomplete_beta(b, a, 1.0 - x);
    }

    let ln_prefix =
        a * x.ln() + b * (1.0 - x).ln() - ln_gamma(a) - ln_gamma(b) + ln_gamma(a + b) - a.ln();
    let prefix = ln_prefix.exp();

    const MAX_ITER: usize = 300;
    const EPSILON: f64 = 1e-14;
    const TINY: f64 = 1e-30;

    let mut c = 1.0_f64;
    let mut d = 1.0 - (a + b) * x / (a + 1.0);
    if d.abs() < TINY {
        d = TINY;
    }
    d = 1.0 / d;
    let mut f = d;

    for m in 1..=MAX_ITER {
        let m = m as f64;

        let even = m * (b - m) * x / ((a + 2.0 * m - 1.0) * (a + 2.0 * m));
        d = 1.0 + even * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + even / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        f *= c * d;

        let odd = -((a + m) * (a + b + m) * x) / ((a + 2.0 * m) * (a + 2.0 * m + 1.0));
        d = 1.0 + odd * d;
        if d.abs() < TINY {
            d = TINY;
        }
        c = 1.0 + odd / c;
        if c.abs() < TINY {
            c = TINY;
        }
        d = 1.0 / d;
        let delta = c * d;
        f *= delta;

        if (delta - 1.0).abs() < EPSILON {
            break;
        }
    }

    prefix * f
}

/// Student's t-distribution CDF: P(T <= t) for `df` degrees of freedom.
pub fn t_cdf(t: f64, df: f64) -> f64 {
    if df <= 0.0 || t.is_nan() {
        return f64::NAN;
    }
    if t == 0.0 {
        return 0.5;
    }
    if t.is_infinite() {
        return if t > 0.0 { 1.0 } else { 0.0 };
    }

    let x = df / (df + t * t);
    let ib = regularized_incomplete_beta(df / 2.0, 0.5, x);

    if t > 0.0 {
        1.0 - 0.5 * ib
    } else {
        0.5 * ib
    }
}

/// Two-sided tail probability P(|T| >= |t|).
pub fn two_sided_p_value(t: f64, df: f64) -> f64 {
    if df <= 0.0 || t.is_nan() {
        return f64::NAN;
    }
    if t.is_infinite() {
        return 0.0;
    }
    // I_x(df/2, 1/2) with x = df / (df + t^2) is exactly the two-sided tail.
    regularized_incomplete_beta(df / 2.0, 0.5, df / (df + t * t))
}

// ─── Two-sample t-test ───────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TTestResult {
    pub t_statistic: f64,
    /// Two-sided p-value. NaN for degenerate samples.
    pub p_value: f64,
    /// Degrees of freedom: n1 + n2 - 2.
    pub df: f64,
}

impl TTestResult {
    fn undefined(df: f64) -> Self {
        Self {
            t_statistic: f64::NAN,
            p_value: f64::NAN,
            df,
        }
    }
}

/// Independent two-sample t-test assuming equal variances.
///
/// Missing values are omitted. With no degrees of freedom left (for example
/// an empty or all-missing sample) the result is NaN rather than an error.
pub fn two_sample_t_test(a: &[Option<f64>], b: &[Option<f64>]) -> TTestResult {
    let a: Vec<f64> = a.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    let b: Vec<f64> = b.iter().flatten().copied().filter(|v| !v.is_nan()).collect();
    two_sample_t_test_complete(&a, &b)
}

/// [`two_sample_t_test`] for samples without missing values.
pub fn two_sample_t_test_complete(a: &[f64], b: &[f64]) -> TTestResult {
    let (n1, n2) = (a.len() as f64, b.len() as f64);
    let df = n1 + n2 - 2.0;
    if a.is_empty() || b.is_empty() || df <= 0.0 {
        return TTestResult::undefined(df);
    }

    let mean1 = mean(a).unwrap_or(f64::NAN);
    let mean2 = mean(b).unwrap_or(f64::NAN);
    let ss1: f64 = a.iter().map(|&x| (x - mean1).powi(2)).sum();
    let ss2: f64 = b.iter().map(|&x| (x - mean2).powi(2)).sum();
    let pooled = (ss1 + ss2) / df;
    let std_err = (pooled * (1.0 / n1 + 1.0 / n2)).sqrt();
    let diff = mean1 - mean2;

    if std_err == 0.0 {
        if diff == 0.0 {
            return TTestResult::undefined(df);
        }
        return TTestResult {
            t_statistic: diff.signum() * f64::INFINITY,
            p_value: 0.0,
            df,
        };
    }

    let t_statistic = diff / std_err;
    TTestResult {
        t_statistic,
        p_value: two_sided_p_value(t_statistic, df),
        df,
    }
}

/// Arithmetic mean; `None` for an empty slice.
pub fn mean(values: &[f64]) -> Option<f64> {
    (!values.is_empty()).then(|| values.iter().sum::<f64>() / values.len() as f64)
}

/// Mean over the non-missing values.
pub fn mean_present(values: &[Option<f64>]) -> Option<f64> {
    let present: Vec<f64> = values.iter().flatten().copied().collect();
    mean(&present)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn some(values: &[f64]) -> Vec<Option<f64>> {
        values.iter().copied().map(Some).collect()
    }

    #[test]
    fn ln_gamma_known_values() {
        assert!(ln_gamma(1.0).abs() < 1e-10);
        assert!(ln_gamma(2.0).abs() < 1e-10);
        assert!((ln_gamma(3.0) - 2.0_f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(5.0) - 24.0_f64.ln()).abs() < 1e-10);
        assert!((ln_gamma(0.5) - std::f64::consts::PI.sqrt().ln()).abs() < 1e-10);
    }

    #[test]
    fn t_cdf_symmetry_and_known_values() {
        for &t in &[0.5, 1.0, 2.0, 3.0] {
            let sum = t_cdf(-t, 10.0) + t_cdf(t, 10.0);
            assert!((sum - 1.0).abs() < 1e-10);
        }
        assert!((t_cdf(0.0, 4.0) - 0.5).abs() < 1e-12);
        // df=1 is Cauchy: CDF(1) = 0.75
        assert!((t_cdf(1.0, 1.0) - 0.75).abs() < 1e-6);
        assert!((t_cdf(1.96, 1000.0) - 0.975).abs() < 0.005);
    }

    #[test]
    fn two_sided_matches_cdf() {
        let t = 2.3;
        let df = 9.0;
        let via_cdf = 2.0 * (1.0 - t_cdf(t, df));
        assert!((two_sided_p_value(t, df) - via_cdf).abs() < 1e-10);
        assert!((two_sided_p_value(-t, df) - via_cdf).abs() < 1e-10);
    }

    #[test]
    fn pooled_t_test_reference_samples() {
        // Retail [1,2,3] vs Wholesale [4,5,6]: t = -3.6742, df = 4, p = 0.021312
        let r = two_sample_t_test(&some(&[1.0, 2.0, 3.0]), &some(&[4.0, 5.0, 6.0]));
        assert!((r.t_statistic + 3.674_234_614).abs() < 1e-6);
        assert_eq!(r.df, 4.0);
        assert!((r.p_value - 0.021_311_6).abs() < 1e-5, "p = {}", r.p_value);
    }

    #[test]
    fn pooled_t_test_unequal_sizes() {
        // [1,2,3,4] vs [2,4,6,8,10]: t = -2.0578, df = 7, p = 0.078619
        let r = two_sample_t_test(&some(&[1.0, 2.0, 3.0, 4.0]), &some(&[2.0, 4.0, 6.0, 8.0, 10.0]));
        assert!((r.t_statistic + 2.057_806_575).abs() < 1e-6);
        assert_eq!(r.df, 7.0);
        assert!((r.p_value - 0.078_618_5).abs() < 1e-5, "p = {}", r.p_value);
    }

    #[test]
    fn missing_values_are_omitted() {
        let with_missing = two_sample_t_test(
            &[Some(1.0), None, Some(3.0)],
            &some(&[4.0, 5.0, 6.0]),
        );
        let without = two_sample_t_test_complete(&[1.0, 3.0], &[4.0, 5.0, 6.0]);
        assert_eq!(with_missing, without);
        assert_eq!(with_missing.df, 3.0);
        assert!((with_missing.p_value - 0.065_320_5).abs() < 1e-5);
    }

    #[test]
    fn empty_or_all_missing_sample_is_nan() {
        let r = two_sample_t_test(&[], &some(&[4.0, 5.0, 6.0]));
        assert!(r.p_value.is_nan());
        let r = two_sample_t_test(&[None, None], &some(&[4.0, 5.0]));
        assert!(r.p_value.is_nan());
        assert!(r.t_statistic.is_nan());
    }

    #[test]
    fn single_values_each_side_have_no_df() {
        let r = two_sample_t_test(&some(&[1.0]), &some(&[2.0]));
        assert!(r.p_value.is_nan());
    }

    #[test]
    fn constant_samples() {
        let same = two_sample_t_test(&some(&[5.0, 5.0, 5.0]), &some(&[5.0, 5.0, 5.0]));
        assert!(same.p_value.is_nan());
        let apart = two_sample_t_test(&some(&[5.0, 5.0, 5.0]), &some(&[6.0, 6.0, 6.0]));
        assert_eq!(apart.p_value, 0.0);
        assert_eq!(apart.t_statistic, f64::NEG_INFINITY);
    }

    #[test]
    fn means() {
        assert_eq!(mean(&[]), None);
        assert_eq!(mean(&[1.0, 2.0, 6.0]), Some(3.0));
        assert_eq!(mean_present(&[Some(2.0), None, Some(4.0)]), Some(3.0));
        assert_eq!(mean_present(&[None]), None);
    }
}
