use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, ArrayView1, Axis};

use super::correlation::corrcoef;
use crate::utils::AssociationError;

/// Ordinary least-squares fit of `y = intercept + slope * x`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Pearson coefficient between x and y
    pub rvalue: f64,
}

impl LinearFit {
    /// Fitted values at `x`
    pub fn predict(&self, x: ArrayView1<f64>) -> Array1<f64> {
        x.mapv(|xi| self.intercept + self.slope * xi)
    }

    /// Observed minus fitted values
    pub fn residuals(&self, x: ArrayView1<f64>, y: ArrayView1<f64>) -> Array1<f64> {
        &y - &self.predict(x)
    }
}

/// Simple linear regression of `y` on `x`
///
/// # Arguments
/// * `x` - Regressor (1D)
/// * `y` - Response, same length as `x`
///
/// # Returns
/// * `Ok(LinearFit)` - Slope, intercept and correlation
/// * `Err(AssociationError)` - If the lengths differ, every `x` value is
///   identical, or the solver fails
pub fn linregress(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<LinearFit, AssociationError> {
    if x.len() != y.len() {
        return Err(AssociationError::Routine(format!(
            "x length ({}) must match y length ({})",
            x.len(),
            y.len()
        )));
    }
    // linfa fits a constant regressor with slope 0 instead of failing
    if x.len() > 1 && x.iter().all(|&xi| xi == x[0]) {
        return Err(AssociationError::Routine(
            "cannot calculate a linear regression if all x values are identical".to_string(),
        ));
    }

    // linfa wants an (n_samples, n_features) record matrix
    let records = x.to_owned().insert_axis(Axis(1));
    let dataset = Dataset::new(records, y.to_owned());

    let model = LinearRegression::default()
        .fit(&dataset)
        .map_err(|e| AssociationError::Routine(format!("linear regression failed: {}", e)))?;

    let slope = model.params()[0];
    let intercept = model.intercept();

    tracing::trace!(slope, intercept, n = x.len(), "fitted simple regression");

    Ok(LinearFit {
        slope,
        intercept,
        rvalue: corrcoef(x, y)[[0, 1]],
    })
}

/// Residuals of `y` after regressing it on `x`
pub fn residuals(x: ArrayView1<f64>, y: ArrayView1<f64>) -> Result<Array1<f64>, AssociationError> {
    Ok(linregress(x, y)?.residuals(x, y))
}
