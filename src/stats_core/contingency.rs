//! Cross-tabulation of two categorical variables and the chi-squared test
//! of independence on the resulting table.

use ndarray::{Array1, Array2, ArrayView1, Axis};
use statrs::distribution::{ChiSquared, ContinuousCDF};

use crate::utils::{category_key, unique_values, AssociationError};

/// Sorted category labels with index lookup
#[derive(Debug, Clone, PartialEq)]
pub struct Categories {
    labels: Vec<f64>,
}

impl Categories {
    /// Distinct values of one observation vector
    pub fn of(values: ArrayView1<f64>) -> Self {
        Self {
            labels: unique_values(&values),
        }
    }

    /// Distinct values across two observation vectors
    pub fn union(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Self {
        let mut labels = unique_values(&a);
        labels.extend(unique_values(&b));
        labels.sort_by(f64::total_cmp);
        labels.dedup_by(|x, y| x.total_cmp(y).is_eq());
        Self { labels }
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Index of the category a value falls into
    pub fn position(&self, value: f64) -> Option<usize> {
        let key = category_key(value);
        self.labels.binary_search_by(|l| l.total_cmp(&key)).ok()
    }
}

/// Result of a chi-squared test of independence
#[derive(Debug, Clone, PartialEq)]
pub struct ChiSquareResult {
    pub statistic: f64,
    pub pvalue: f64,
    pub dof: usize,
    pub expected: Array2<f64>,
}

/// Frequency table of paired observations
#[derive(Debug, Clone, PartialEq)]
pub struct ContingencyTable {
    rows: Vec<f64>,
    cols: Vec<f64>,
    counts: Array2<f64>,
}

impl ContingencyTable {
    /// Count co-occurrences of the values of `a` (rows) and `b` (columns)
    ///
    /// Pairs where either value is NaN are left out of the table. Rows and
    /// columns are ordered by ascending label.
    pub fn crosstab(a: ArrayView1<f64>, b: ArrayView1<f64>) -> Self {
        let pairs: Vec<(f64, f64)> = a
            .iter()
            .zip(b.iter())
            .filter(|(x, y)| !x.is_nan() && !y.is_nan())
            .map(|(&x, &y)| (x, y))
            .collect();

        let rows = Categories::of(Array1::from_iter(pairs.iter().map(|p| p.0)).view());
        let cols = Categories::of(Array1::from_iter(pairs.iter().map(|p| p.1)).view());

        let mut counts = Array2::zeros((rows.len(), cols.len()));
        for (x, y) in pairs {
            if let (Some(i), Some(j)) = (rows.position(x), cols.position(y)) {
                counts[[i, j]] += 1.0;
            }
        }

        Self {
            rows: rows.labels,
            cols: cols.labels,
            counts,
        }
    }

    /// Wrap an existing table of counts; labels are the row/column indices
    pub fn from_counts(counts: Array2<f64>) -> Self {
        let rows = (0..counts.nrows()).map(|i| i as f64).collect();
        let cols = (0..counts.ncols()).map(|j| j as f64).collect();
        Self { rows, cols, counts }
    }

    pub fn counts(&self) -> &Array2<f64> {
        &self.counts
    }

    pub fn row_labels(&self) -> &[f64] {
        &self.rows
    }

    pub fn col_labels(&self) -> &[f64] {
        &self.cols
    }

    /// (rows, columns)
    pub fn shape(&self) -> (usize, usize) {
        self.counts.dim()
    }

    /// Total number of counted observations
    pub fn total(&self) -> f64 {
        self.counts.sum()
    }

    /// Frequencies expected under independence: row total × column total / n
    pub fn expected(&self) -> Array2<f64> {
        let row_sums = self.counts.sum_axis(Axis(1));
        let col_sums = self.counts.sum_axis(Axis(0));
        let total = self.total();
        Array2::from_shape_fn(self.shape(), |(i, j)| row_sums[i] * col_sums[j] / total)
    }

    /// Pearson's chi-squared test of independence
    ///
    /// With `correction`, Yates' continuity correction is applied when the
    /// table has exactly one degree of freedom. A table with zero degrees of
    /// freedom yields a statistic of 0 and a p-value of 1.
    ///
    /// # Errors
    /// `AssociationError::Routine` if some expected frequency is zero.
    pub fn chi2_contingency(&self, correction: bool) -> Result<ChiSquareResult, AssociationError> {
        let expected = self.expected();
        if expected.iter().any(|&e| e == 0.0) {
            return Err(AssociationError::Routine(format!(
                "contingency table {:?} has a zero expected frequency",
                self.shape()
            )));
        }

        let (n_rows, n_cols) = self.shape();
        let dof = n_rows.saturating_sub(1) * n_cols.saturating_sub(1);
        if dof == 0 {
            return Ok(ChiSquareResult {
                statistic: 0.0,
                pvalue: 1.0,
                dof,
                expected,
            });
        }

        let yates = correction && dof == 1;
        let statistic: f64 = self
            .counts
            .iter()
            .zip(expected.iter())
            .map(|(&observed, &e)| {
                let diff = if yates {
                    ((observed - e).abs() - 0.5).max(0.0)
                } else {
                    observed - e
                };
                diff * diff / e
            })
            .sum();

        let pvalue = ChiSquared::new(dof as f64)
            .map(|dist| dist.sf(statistic))
            .unwrap_or(f64::NAN);

        Ok(ChiSquareResult {
            statistic,
            pvalue,
            dof,
            expected,
        })
    }
}
