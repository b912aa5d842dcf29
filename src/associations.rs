//! Strength-of-relationship metrics between two (or three) variables.
//!
//! Every function checks its inputs with [`crate::utils::consistency`] before
//! computing anything and hands the arithmetic to [`crate::stats_core`].
//! Validation errors come back unchanged. Degenerate but well-shaped input
//! (constant vectors, NaN, empty vectors) is not intercepted: the result is
//! whatever the routine produces, usually NaN.
//!
//! Which metric fits which data:
//!
//! | Variables | Metric |
//! |---|---|
//! | two binary | [`matthews_corr`] |
//! | two categorical, two or more levels | [`cramers_v`], [`theils_u`] |
//! | ordinal, or continuous with outliers, monotonic | [`kendalls_corr`], [`spearmans_corr`] |
//! | one continuous, one binary | [`pointbiserial_corr`] |
//! | two continuous, no covariate | [`pearson_corr`] |
//! | two continuous plus a covariate | [`partial_corr`] |

use ndarray::{ArrayBase, Data, Dimension};

use crate::stats_core::{
    corrcoef, kendalltau, matthews_corrcoef, pointbiserialr, residuals, spearmanr,
    ContingencyTable,
};
use crate::utils::{
    as_vector, check_binary_categorical, check_named_variables, check_variables,
    AssociationError,
};

/// Theil's U as computed by the reference package
///
/// `sqrt(Σ((v1[t] - v2[t]) / v2[t-1])²) / sqrt(Σ((v2[t] - v2[t-1]) / v2[t-1])²)`
/// for `t = 1..n`.
///
/// This is the forecast-accuracy form with `v1` as the forecast and `v2` as
/// the realised series. It is **not** the uncertainty coefficient U(X|Y)
/// used for categorical association, and its value is kept as is for
/// compatibility. A zero in `v2[..n-1]` yields a non-finite result.
pub fn theils_u<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_variables(v1, v2)?;
    let forecast = as_vector("v1", v1)?;
    let actual = as_vector("v2", v2)?;

    let mut forecast_error = 0.0;
    let mut naive_error = 0.0;
    for t in 1..actual.len() {
        let base = actual[t - 1];
        forecast_error += ((forecast[t] - actual[t]) / base).powi(2);
        naive_error += ((actual[t] - base) / base).powi(2);
    }

    Ok(forecast_error.sqrt() / naive_error.sqrt())
}

/// Matthews correlation coefficient (phi coefficient) of two binary variables
///
/// `v1` is read as the true labels and `v2` as the predicted ones. Any two
/// distinct values work as labels.
///
/// # Errors
/// * `InvalidShape` - lengths differ or an argument is not 1D
/// * `InvalidCategoryCount` - a vector does not hold exactly two values
pub fn matthews_corr<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_binary_categorical(v1, v2)?;
    Ok(matthews_corrcoef(as_vector("v1", v1)?, as_vector("v2", v2)?))
}

/// Cramér's V of two categorical variables
///
/// `sqrt(χ² / (n · (min(rows, cols) - 1)))` where χ² is the uncorrected
/// chi-squared statistic of the `v1 × v2` contingency table.
pub fn cramers_v<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_variables(v1, v2)?;

    let table = ContingencyTable::crosstab(as_vector("v1", v1)?, as_vector("v2", v2)?);
    let chi2 = table.chi2_contingency(false)?.statistic;
    let n = table.total();
    let (rows, cols) = table.shape();
    let dof = rows.min(cols) as f64 - 1.0;

    Ok((chi2 / (n * dof)).sqrt())
}

/// Kendall's tau-b rank correlation
pub fn kendalls_corr<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_variables(v1, v2)?;
    Ok(kendalltau(as_vector("v1", v1)?, as_vector("v2", v2)?).correlation)
}

/// Spearman's rank correlation coefficient
pub fn spearmans_corr<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_variables(v1, v2)?;
    Ok(spearmanr(as_vector("v1", v1)?, as_vector("v2", v2)?).correlation)
}

/// Point-biserial correlation between a continuous `v1` and a binary `v2`
///
/// The binary variable is not checked for having two levels.
pub fn pointbiserial_corr<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_variables(v1, v2)?;
    Ok(pointbiserialr(as_vector("v1", v1)?, as_vector("v2", v2)?).correlation)
}

/// Pearson product-moment correlation
///
/// Off-diagonal entry of the 2×2 correlation matrix of `v1` and `v2`.
pub fn pearson_corr<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_variables(v1, v2)?;
    Ok(corrcoef(as_vector("v1", v1)?, as_vector("v2", v2)?)[[0, 1]])
}

/// Partial correlation of `v1` and `v2` controlling for the covariate `v3`
///
/// # Arguments
/// * `v1`, `v2` - Variables of interest
/// * `v3` - Covariate whose linear effect is removed from both
///
/// # Returns
/// Pearson correlation between the residuals of the OLS fits `v1 ~ v3` and
/// `v2 ~ v3`.
///
/// # Errors
/// * `InvalidShape` - `(v1, v2)` or `(v2, v3)` do not pair up
/// * `Routine` - `v3` is constant, or the regression solver failed
pub fn partial_corr<S1, D1, S2, D2, S3, D3>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
    v3: &ArrayBase<S3, D3>,
) -> Result<f64, AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
    S3: Data<Elem = f64>,
    D3: Dimension,
{
    check_variables(v1, v2)?;
    check_named_variables(("v2", v2), ("v3", v3))?;

    let covariate = as_vector("v3", v3)?;
    let res_v1_v3 = residuals(covariate, as_vector("v1", v1)?)?;
    let res_v2_v3 = residuals(covariate, as_vector("v2", v2)?)?;

    Ok(corrcoef(res_v1_v3.view(), res_v2_v3.view())[[0, 1]])
}
