//! Correlation coefficients between two paired observation vectors.
//!
//! Every routine returns the coefficient together with a two-sided p-value
//! for the null hypothesis of no association. Degenerate input (constant
//! vectors, NaN, fewer than two observations) is not rejected: the
//! coefficient comes out as NaN and the p-value follows it.

use std::cmp::Ordering;

use ndarray::{Array2, ArrayView1};
use statrs::distribution::{ContinuousCDF, Normal, StudentsT};

use super::rank::{rankdata, tie_groups};

/// A correlation coefficient and its two-sided p-value
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CorrelationResult {
    pub correlation: f64,
    pub pvalue: f64,
}

/// Pearson correlation matrix of two variables
///
/// Entry `[0, 1]` (equal to `[1, 0]`) is the Pearson coefficient; the
/// diagonal is 1 unless a variable has zero variance, in which case the
/// affected entries are NaN. Values are clipped to [-1, 1].
pub fn corrcoef(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Array2<f64> {
    let mean_a = a.mean().unwrap_or(f64::NAN);
    let mean_b = b.mean().unwrap_or(f64::NAN);
    let da = a.mapv(|x| x - mean_a);
    let db = b.mapv(|x| x - mean_b);

    // the 1/(n-1) factor of the covariance cancels out
    let cov = [
        [da.dot(&da), da.dot(&db)],
        [db.dot(&da), db.dot(&db)],
    ];
    let std = [cov[0][0].sqrt(), cov[1][1].sqrt()];

    Array2::from_shape_fn((2, 2), |(i, j)| (cov[i][j] / std[i] / std[j]).clamp(-1.0, 1.0))
}

/// Pearson product-moment correlation
pub fn pearsonr(a: ArrayView1<f64>, b: ArrayView1<f64>) -> CorrelationResult {
    let r = corrcoef(a, b)[[0, 1]];
    CorrelationResult {
        correlation: r,
        pvalue: t_test_pvalue(r, a.len()),
    }
}

/// Spearman rank correlation: Pearson correlation of average ranks
pub fn spearmanr(a: ArrayView1<f64>, b: ArrayView1<f64>) -> CorrelationResult {
    let ra = rankdata(a);
    let rb = rankdata(b);
    let rho = corrcoef(ra.view(), rb.view())[[0, 1]];
    CorrelationResult {
        correlation: rho,
        pvalue: t_test_pvalue(rho, a.len()),
    }
}

/// Point-biserial correlation between a continuous and a binary variable
///
/// Numerically this is the Pearson coefficient with the binary variable
/// coded as numbers.
pub fn pointbiserialr(a: ArrayView1<f64>, b: ArrayView1<f64>) -> CorrelationResult {
    pearsonr(a, b)
}

/// Kendall's tau-b, corrected for ties in either variable
///
/// Runs in O(n log n): pairs are sorted by `(a, b)` and the discordant pairs
/// are counted as the exchanges of a merge sort on `b` (Knight's method).
///
/// The p-value uses the normal approximation of the tie-corrected variance
/// of `concordant - discordant` for every `n`. For small samples without
/// ties it therefore differs from an exact-distribution p-value.
pub fn kendalltau(a: ArrayView1<f64>, b: ArrayView1<f64>) -> CorrelationResult {
    let n = a.len().min(b.len());
    if a.iter().chain(b.iter()).any(|v| v.is_nan()) {
        return CorrelationResult {
            correlation: f64::NAN,
            pvalue: f64::NAN,
        };
    }

    let mut pairs: Vec<(f64, f64)> = (0..n).map(|i| (a[i], b[i])).collect();
    pairs.sort_by(|x, y| {
        x.0.partial_cmp(&y.0)
            .unwrap_or(Ordering::Equal)
            .then(x.1.partial_cmp(&y.1).unwrap_or(Ordering::Equal))
    });

    let ties_a = tied_pairs(&pairs, |x, y| x.0 == y.0);
    let ties_joint = tied_pairs(&pairs, |x, y| x.0 == y.0 && x.1 == y.1);

    let (sorted_b, discordant) = count_exchanges(pairs.into_iter().map(|p| p.1).collect());
    let ties_b = tied_pairs(&sorted_b, |x, y| x == y);

    let n_pairs = (n as i64) * (n as i64 - 1) / 2;
    let s = (n_pairs - ties_a - ties_b + ties_joint - 2 * discordant) as f64;
    // zero when either variable is constant, giving NaN
    let denom = ((n_pairs - ties_a) as f64 * (n_pairs - ties_b) as f64).sqrt();
    let tau = (s / denom).clamp(-1.0, 1.0);

    CorrelationResult {
        correlation: tau,
        pvalue: kendall_pvalue(s, n, a, b),
    }
}

/// Number of pairs within runs of adjacent equal items of a sorted slice
fn tied_pairs<T>(sorted: &[T], same: impl Fn(&T, &T) -> bool) -> i64 {
    let mut total = 0;
    let mut run: i64 = 1;
    for w in sorted.windows(2) {
        if same(&w[0], &w[1]) {
            run += 1;
        } else {
            total += run * (run - 1) / 2;
            run = 1;
        }
    }
    total + run * (run - 1) / 2
}

/// Bottom-up merge sort returning the sorted values and the number of
/// strictly inverted pairs it resolved
fn count_exchanges(mut values: Vec<f64>) -> (Vec<f64>, i64) {
    let n = values.len();
    let mut buffer = vec![0.0; n];
    let mut exchanges: i64 = 0;
    let mut width = 1;

    while width < n {
        for start in (0..n).step_by(2 * width) {
            let mid = (start + width).min(n);
            let end = (start + 2 * width).min(n);
            let (mut i, mut j, mut k) = (start, mid, start);

            while i < mid && j < end {
                if values[j] < values[i] {
                    buffer[k] = values[j];
                    exchanges += (mid - i) as i64;
                    j += 1;
                } else {
                    buffer[k] = values[i];
                    i += 1;
                }
                k += 1;
            }
            buffer[k..k + (mid - i)].copy_from_slice(&values[i..mid]);
            k += mid - i;
            buffer[k..end].copy_from_slice(&values[j..end]);
        }
        std::mem::swap(&mut values, &mut buffer);
        width *= 2;
    }

    (values, exchanges)
}

fn kendall_pvalue(s: f64, n: usize, a: ArrayView1<f64>, b: ArrayView1<f64>) -> f64 {
    if n < 3 || s.is_nan() {
        return f64::NAN;
    }

    let nf = n as f64;
    let m = nf * (nf - 1.0);
    let (pairs_a, triples_a, weighted_a) = tie_terms(a);
    let (pairs_b, triples_b, weighted_b) = tie_terms(b);

    let variance = (m * (2.0 * nf + 5.0) - weighted_a - weighted_b) / 18.0
        + (2.0 * pairs_a * pairs_b) / m
        + (triples_a * triples_b) / (9.0 * m * (nf - 2.0));

    if variance <= 0.0 {
        return f64::NAN;
    }

    let z = s / variance.sqrt();
    match Normal::new(0.0, 1.0) {
        Ok(normal) => (2.0 * normal.sf(z.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

/// Σ t(t-1)/2, Σ t(t-1)(t-2) and Σ t(t-1)(2t+5) over tie groups of size t
fn tie_terms(values: ArrayView1<f64>) -> (f64, f64, f64) {
    tie_groups(values)
        .into_iter()
        .filter(|&t| t > 1)
        .map(|t| t as f64)
        .fold((0.0, 0.0, 0.0), |(pairs, triples, weighted), t| {
            (
                pairs + t * (t - 1.0) / 2.0,
                triples + t * (t - 1.0) * (t - 2.0),
                weighted + t * (t - 1.0) * (2.0 * t + 5.0),
            )
        })
}

/// Two-sided p-value of `r` under Student's t with n-2 degrees of freedom
fn t_test_pvalue(r: f64, n: usize) -> f64 {
    if n < 3 || r.is_nan() {
        return f64::NAN;
    }
    if r.abs() >= 1.0 {
        return 0.0;
    }

    let df = (n - 2) as f64;
    let t = r * (df / ((1.0 - r) * (1.0 + r))).sqrt();
    match StudentsT::new(0.0, 1.0, df) {
        Ok(dist) => (2.0 * dist.sf(t.abs())).min(1.0),
        Err(_) => f64::NAN,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_corrcoef_matrix() {
        let a = arr1(&[6.0, 8.0, 10.0]);
        let b = arr1(&[12.0, 10.0, 20.0]);
        let m = corrcoef(a.view(), b.view());

        assert!((m[[0, 0]] - 1.0).abs() < 1e-12);
        assert!((m[[1, 1]] - 1.0).abs() < 1e-12);
        assert_eq!(m[[0, 1]], m[[1, 0]]);
        assert!((m[[0, 1]] - 0.755928946).abs() < 1e-8);
    }

    #[test]
    fn test_corrcoef_zero_variance_is_nan() {
        let a = arr1(&[3.0, 3.0, 3.0]);
        let b = arr1(&[1.0, 2.0, 3.0]);
        let m = corrcoef(a.view(), b.view());
        assert!(m[[0, 1]].is_nan());
        assert!(m[[0, 0]].is_nan());
        assert!((m[[1, 1]] - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearsonr_perfect() {
        let a = arr1(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = arr1(&[2.0, 4.0, 6.0, 8.0, 10.0]);
        let result = pearsonr(a.view(), b.view());
        assert!((result.correlation - 1.0).abs() < 1e-12);
        assert!(result.pvalue < 1e-6);
    }

    #[test]
    fn test_pearsonr_pvalue() {
        let a = arr1(&[6.0, 8.0, 10.0]);
        let b = arr1(&[12.0, 10.0, 20.0]);
        let result = pearsonr(a.view(), b.view());
        assert!(result.pvalue > 0.0 && result.pvalue < 1.0);

        let a = arr1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        let b = arr1(&[6.0, 5.0, 4.0, 3.0, 2.0, 1.5]);
        let result = pearsonr(a.view(), b.view());
        assert!(result.correlation < -0.99);
        assert!(result.pvalue < 0.001);
    }

    #[test]
    fn test_spearmanr() {
        let a = arr1(&[35.0, 23.0, 47.0, 17.0, 10.0, 43.0, 9.0, 6.0, 28.0]);
        let b = arr1(&[30.0, 33.0, 45.0, 23.0, 8.0, 49.0, 12.0, 4.0, 31.0]);
        let result = spearmanr(a.view(), b.view());
        assert!((result.correlation - 0.9).abs() < 1e-12);
        // t = 5.46 on 7 degrees of freedom
        assert!(result.pvalue > 0.0005 && result.pvalue < 0.002);
    }

    #[test]
    fn test_spearmanr_monotone_nonlinear() {
        let a = arr1(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        let b = arr1(&[1.0, 8.0, 27.0, 64.0, 125.0]);
        let result = spearmanr(a.view(), b.view());
        assert!((result.correlation - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_kendalltau() {
        let a = arr1(&[1.0, 2.0, 3.0, 4.0, 5.0, 6.0, 7.0, 8.0, 9.0, 10.0, 11.0, 12.0]);
        let b = arr1(&[1.0, 2.0, 3.0, 5.0, 4.0, 7.0, 6.0, 8.0, 10.0, 9.0, 11.0, 12.0]);
        let result = kendalltau(a.view(), b.view());
        assert!((result.correlation - 60.0 / 66.0).abs() < 1e-12);
        assert!(result.pvalue < 0.001);
    }

    #[test]
    fn test_kendalltau_with_ties() {
        // tau-b: C=4, D=0, ties in a: 1 pair, ties in b: 1 pair, n0=6
        let a = arr1(&[1.0, 1.0, 2.0, 3.0]);
        let b = arr1(&[1.0, 2.0, 3.0, 3.0]);
        let result = kendalltau(a.view(), b.view());
        assert!((result.correlation - 4.0 / 5.0).abs() < 1e-12);
    }

    #[test]
    fn test_kendalltau_constant_is_nan() {
        let a = arr1(&[2.0, 2.0, 2.0]);
        let b = arr1(&[1.0, 2.0, 3.0]);
        let result = kendalltau(a.view(), b.view());
        assert!(result.correlation.is_nan());
        assert!(result.pvalue.is_nan());
    }

    /// Exhaustive O(n^2) tau-b used as a reference
    fn kendall_tau_by_pairs(a: &[f64], b: &[f64]) -> f64 {
        let n = a.len();
        let (mut s, mut ties_a, mut ties_b) = (0i64, 0i64, 0i64);
        for i in 0..n {
            for j in (i + 1)..n {
                let da = a[i] - a[j];
                let db = b[i] - b[j];
                if da == 0.0 {
                    ties_a += 1;
                }
                if db == 0.0 {
                    ties_b += 1;
                }
                if da != 0.0 && db != 0.0 {
                    s += if (da > 0.0) == (db > 0.0) { 1 } else { -1 };
                }
            }
        }
        let n_pairs = (n * (n - 1) / 2) as i64;
        s as f64 / (((n_pairs - ties_a) * (n_pairs - ties_b)) as f64).sqrt()
    }

    #[test]
    fn test_kendalltau_matches_pairwise_count() {
        // heavy ties in both variables
        let a: Vec<f64> = (0..600).map(|i| ((i * 7919) % 53) as f64).collect();
        let b: Vec<f64> = (0..600)
            .map(|i| ((i * 104_729) % 47 + i % 3) as f64)
            .collect();

        let result = kendalltau(arr1(&a).view(), arr1(&b).view());
        assert!((result.correlation - kendall_tau_by_pairs(&a, &b)).abs() < 1e-12);

        let b_distinct: Vec<f64> = (0..600).map(|i| ((i * 389) % 600) as f64).collect();
        let result = kendalltau(arr1(&a).view(), arr1(&b_distinct).view());
        assert!((result.correlation - kendall_tau_by_pairs(&a, &b_distinct)).abs() < 1e-12);
    }

    #[test]
    fn test_kendalltau_large_input() {
        let n = 100_000;
        let a: ndarray::Array1<f64> = (0..n).map(|i| i as f64).collect();
        let reversed = a.mapv(|x| -x);
        let shuffled: ndarray::Array1<f64> = (0..n).map(|i| ((i * 7_919) % n) as f64).collect();

        assert!((kendalltau(a.view(), a.view()).correlation - 1.0).abs() < 1e-12);
        assert!((kendalltau(a.view(), reversed.view()).correlation + 1.0).abs() < 1e-12);
        assert!(kendalltau(a.view(), shuffled.view()).correlation.abs() < 0.1);
    }

    #[test]
    fn test_kendalltau_small_sample_pvalue_is_asymptotic() {
        // exact distribution would give 2/24; the normal approximation gives
        // 2 * sf(6 / sqrt(26 / 3))
        let a = arr1(&[1.0, 2.0, 3.0, 4.0]);
        let result = kendalltau(a.view(), a.view());
        assert!((result.pvalue - 0.041540067).abs() < 1e-8);
    }

    #[test]
    fn test_count_exchanges() {
        let (sorted, exchanges) = count_exchanges(vec![3.0, 1.0, 2.0, 2.0, 0.0]);
        assert_eq!(sorted, vec![0.0, 1.0, 2.0, 2.0, 3.0]);
        // (3,1) (3,2) (3,2) (3,0) (1,0) (2,0) (2,0)
        assert_eq!(exchanges, 7);
    }

    #[test]
    fn test_pointbiserialr_matches_pearson() {
        let a = arr1(&[10.0, 12.0, 9.0, 15.0, 14.0]);
        let b = arr1(&[0.0, 1.0, 0.0, 1.0, 1.0]);
        assert_eq!(pointbiserialr(a.view(), b.view()), pearsonr(a.view(), b.view()));
    }
}
