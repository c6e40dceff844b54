//! Shapiro-Wilk W test using Royston's approximation (algorithm AS R94).
//!
//! Valid for 3 ≤ n ≤ 5000 by default (see [`ProfilerConfig`]). Outside that range,
//! or for a sample without spread, the test is reported as unavailable and the
//! verdict defaults to non-normal.

use super::types::{NormalityStatus, NormalityTest};
use crate::config::ProfilerConfig;
use statrs::distribution::{ContinuousCDF as _, Normal};

const C1: [f64; 6] = [0.0, 0.221_157, -0.147_981, -2.071_19, 4.434_685, -2.706_056];
const C2: [f64; 6] = [0.0, 0.042_981, -0.293_762, -1.752_461, 5.682_633, -3.582_633];
const C3: [f64; 4] = [0.544, -0.399_78, 0.025_054, -6.714e-4];
const C4: [f64; 4] = [1.3822, -0.778_57, 0.062_767, -0.002_032_2];
const C5: [f64; 4] = [-1.5861, -0.310_82, -0.083_751, 0.003_891_5];
const C6: [f64; 3] = [-0.4803, -0.082_676, 0.003_030_2];
const G: [f64; 2] = [-2.273, 0.459];

/// Runs the test on an ascending, finite sample.
pub fn shapiro_wilk(sorted: &[f64], config: &ProfilerConfig) -> NormalityTest {
    let n = sorted.len();
    if n < config.normality_min_samples.max(3) {
        return NormalityTest::unavailable(NormalityStatus::InsufficientData);
    }
    if n > config.normality_max_samples {
        return NormalityTest::unavailable(NormalityStatus::TooManySamples);
    }

    let (Some(&lo), Some(&hi)) = (sorted.first(), sorted.last()) else {
        return NormalityTest::unavailable(NormalityStatus::InsufficientData);
    };
    if !(hi - lo > f64::EPSILON * hi.abs().max(lo.abs()).max(1.0)) {
        return NormalityTest::unavailable(NormalityStatus::ZeroRange);
    }

    match w_and_p(sorted) {
        Some((w, p)) => NormalityTest {
            test: NormalityTest::SHAPIRO_WILK.to_owned(),
            status: NormalityStatus::Computed,
            statistic: Some(w),
            p_value: Some(p),
            is_normal: p > config.normality_alpha,
        },
        None => {
            tracing::debug!(n, "Shapiro-Wilk produced a non-finite result");
            NormalityTest::unavailable(NormalityStatus::Failed)
        }
    }
}

/// Ascending-power polynomial `c[0] + c[1]x + c[2]x² + ...`
fn poly(coeffs: &[f64], x: f64) -> f64 {
    coeffs.iter().rev().fold(0.0, |acc, c| acc * x + c)
}

/// Half-sample coefficients `a[0..n/2]`, largest first, all positive.
fn coefficients(n: usize, std_normal: &Normal) -> Vec<f64> {
    let half = n / 2;
    if n == 3 {
        return vec![std::f64::consts::FRAC_1_SQRT_2];
    }

    let an25 = n as f64 + 0.25;
    let m: Vec<f64> = (1..=half)
        .map(|i| std_normal.inverse_cdf((i as f64 - 0.375) / an25))
        .collect();
    let summ2 = 2.0 * m.iter().map(|v| v * v).sum::<f64>();
    let ssumm2 = summ2.sqrt();
    let rsn = 1.0 / (n as f64).sqrt();

    let m1 = m.first().copied().unwrap_or_default();
    let a1 = poly(&C1, rsn) - m1 / ssumm2;

    let mut a = Vec::with_capacity(half);
    a.push(a1);
    if n > 5 {
        let m2 = m.get(1).copied().unwrap_or_default();
        let a2 = -m2 / ssumm2 + poly(&C2, rsn);
        let fac = ((summ2 - 2.0 * m1 * m1 - 2.0 * m2 * m2) / (1.0 - 2.0 * a1 * a1 - 2.0 * a2 * a2)).sqrt();
        a.push(a2);
        a.extend(m.iter().skip(2).map(|mi| -mi / fac));
    } else {
        let fac = ((summ2 - 2.0 * m1 * m1) / (1.0 - 2.0 * a1 * a1)).sqrt();
        a.extend(m.iter().skip(1).map(|mi| -mi / fac));
    }
    a
}

fn w_and_p(sorted: &[f64]) -> Option<(f64, f64)> {
    let n = sorted.len();
    let std_normal = Normal::new(0.0, 1.0).ok()?;
    let a = coefficients(n, &std_normal);

    // Scale by the range to keep the sums well conditioned
    let range = sorted.last()? - sorted.first()?;
    let scaled: Vec<f64> = sorted.iter().map(|x| x / range).collect();
    let mean = scaled.iter().sum::<f64>() / n as f64;
    let ss: f64 = scaled.iter().map(|x| (x - mean).powi(2)).sum();

    let numerator: f64 = a
        .iter()
        .enumerate()
        .map(|(i, ai)| {
            let upper = scaled.get(n - 1 - i).copied().unwrap_or_default();
            let lower = scaled.get(i).copied().unwrap_or_default();
            ai * (upper - lower)
        })
        .sum();

    let w = (numerator * numerator / ss).clamp(0.0, 1.0);
    if !w.is_finite() {
        return None;
    }
    let p = p_value(n, w)?;
    Some((w, p.clamp(0.0, 1.0)))
}

fn p_value(n: usize, w: f64) -> Option<f64> {
    let an = n as f64;
    if n == 3 {
        const SIX_OVER_PI: f64 = 6.0 / std::f64::consts::PI;
        const ASIN_SQRT_THREE_QUARTERS: f64 = std::f64::consts::FRAC_PI_3;
        return Some((SIX_OVER_PI * (w.sqrt().asin() - ASIN_SQRT_THREE_QUARTERS)).max(0.0));
    }

    let w1 = 1.0 - w;
    if w1 <= 0.0 {
        return Some(1.0);
    }
    let mut y = w1.ln();

    let (mean, sd) = if n <= 11 {
        let gamma = poly(&G, an);
        if y >= gamma {
            return Some(0.0);
        }
        y = -(gamma - y).ln();
        (poly(&C3, an), poly(&C4, an).exp())
    } else {
        let ln_n = an.ln();
        (poly(&C5, ln_n), poly(&C6, ln_n).exp())
    };

    let dist = Normal::new(mean, sd).ok()?;
    let p = dist.sf(y);
    p.is_finite().then_some(p)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyser::logic::distribution::sorted_values;

    fn run(values: Vec<f64>) -> NormalityTest {
        shapiro_wilk(&sorted_values(values), &ProfilerConfig::default())
    }

    /// Evenly spaced quantiles of N(0, 1): as normal as a sample gets.
    fn normal_scores(n: usize) -> Vec<f64> {
        let std_normal = Normal::new(0.0, 1.0).unwrap();
        (1..=n)
            .map(|i| std_normal.inverse_cdf(i as f64 / (n as f64 + 1.0)))
            .collect()
    }

    #[test]
    fn test_normal_sample_passes() {
        let result = run(normal_scores(200));
        assert_eq!(result.status, NormalityStatus::Computed);
        assert!(result.statistic.unwrap() > 0.98, "W = {:?}", result.statistic);
        assert!(result.is_normal, "p = {:?}", result.p_value);
    }

    #[test]
    fn test_exponential_sample_fails() {
        let values = (1..=200).map(|i| (-(1.0 - i as f64 / 201.0).ln()).powi(3)).collect();
        let result = run(values);
        assert_eq!(result.status, NormalityStatus::Computed);
        assert!(!result.is_normal, "p = {:?}", result.p_value);
        assert!(result.p_value.unwrap() < 0.01);
    }

    #[test]
    fn test_small_sample_path() {
        let result = run(vec![2.1, 3.4, 1.9, 2.8, 3.0, 2.5, 2.2]);
        assert_eq!(result.status, NormalityStatus::Computed);
        let p = result.p_value.unwrap();
        assert!((0.0..=1.0).contains(&p));
    }

    #[test]
    fn test_three_values_exact_p() {
        let result = run(vec![1.0, 2.0, 3.0]);
        // Perfectly evenly spaced: W = 1, p = 1
        assert!((result.statistic.unwrap() - 1.0).abs() < 1e-9);
        assert!((result.p_value.unwrap() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_out_of_range_samples_are_unavailable() {
        let tiny = run(vec![1.0, 2.0]);
        assert_eq!(tiny.status, NormalityStatus::InsufficientData);
        assert!(!tiny.is_normal);
        assert!(tiny.p_value.is_none());

        let huge = run((0..5001).map(f64::from).collect());
        assert_eq!(huge.status, NormalityStatus::TooManySamples);

        let flat = run(vec![4.0; 10]);
        assert_eq!(flat.status, NormalityStatus::ZeroRange);
    }

    #[test]
    fn test_poly_is_ascending() {
        assert_eq!(poly(&[1.0, 2.0, 3.0], 2.0), 1.0 + 4.0 + 12.0);
    }
}
