use ndarray::{ArrayBase, ArrayView1, Data, Dimension, Ix1};

use super::error::{AssociationError, ShapeViolation};

/// Check that two observation vectors pair up and are one-dimensional
///
/// # Arguments
/// * `v1` - First observation vector
/// * `v2` - Second observation vector
///
/// # Returns
/// * `Ok(())` if both vectors have the same length and exactly one dimension
/// * `Err(AssociationError::InvalidShape)` naming the argument that failed
pub fn check_variables<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<(), AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_named_variables(("v1", v1), ("v2", v2))
}

/// Same as [`check_variables`], reporting the caller's own argument names
pub fn check_named_variables<S1, D1, S2, D2>(
    (left, v1): (&str, &ArrayBase<S1, D1>),
    (right, v2): (&str, &ArrayBase<S2, D2>),
) -> Result<(), AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    // a 0-d array has no leading axis, hence no length
    let left_len = v1.shape().first().copied();
    let right_len = v2.shape().first().copied();

    if left_len != right_len {
        return Err(ShapeViolation::LengthMismatch {
            left: left.to_string(),
            right: right.to_string(),
            left_len,
            right_len,
        }
        .into());
    }

    for (argument, ndim) in [(left, v1.ndim()), (right, v2.ndim())] {
        if ndim != 1 {
            return Err(ShapeViolation::Dimensionality {
                argument: argument.to_string(),
                ndim,
            }
            .into());
        }
    }

    Ok(())
}

/// Check that two observation vectors are valid binary categorical variables
///
/// Runs [`check_variables`] first, then requires exactly two distinct values
/// in `v1` and then in `v2`. Constant vectors and vectors with three or more
/// labels are both rejected.
pub fn check_binary_categorical<S1, D1, S2, D2>(
    v1: &ArrayBase<S1, D1>,
    v2: &ArrayBase<S2, D2>,
) -> Result<(), AssociationError>
where
    S1: Data<Elem = f64>,
    D1: Dimension,
    S2: Data<Elem = f64>,
    D2: Dimension,
{
    check_variables(v1, v2)?;

    let v1_unique = unique_values(v1);
    if v1_unique.len() != 2 {
        return Err(AssociationError::InvalidCategoryCount {
            argument: "v1".to_string(),
            distinct: v1_unique,
        });
    }

    let v2_unique = unique_values(v2);
    if v2_unique.len() != 2 {
        return Err(AssociationError::InvalidCategoryCount {
            argument: "v2".to_string(),
            distinct: v2_unique,
        });
    }

    Ok(())
}

/// Normalized form of a value used when treating it as a category label.
///
/// `-0.0` folds into `0.0` and every NaN payload folds into one NaN, so that
/// sorting with `total_cmp` puts equal labels next to each other.
pub fn category_key(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else if value.is_nan() {
        f64::NAN
    } else {
        value
    }
}

/// Sorted distinct values of an observation vector
pub fn unique_values<S, D>(v: &ArrayBase<S, D>) -> Vec<f64>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    let mut values: Vec<f64> = v.iter().map(|&x| category_key(x)).collect();
    values.sort_by(f64::total_cmp);
    values.dedup_by(|a, b| a.total_cmp(b).is_eq());
    values
}

/// View a validated observation vector as one-dimensional
pub fn as_vector<'a, S, D>(
    argument: &str,
    v: &'a ArrayBase<S, D>,
) -> Result<ArrayView1<'a, f64>, AssociationError>
where
    S: Data<Elem = f64>,
    D: Dimension,
{
    v.view().into_dimensionality::<Ix1>().map_err(|_| {
        ShapeViolation::Dimensionality {
            argument: argument.to_string(),
            ndim: v.ndim(),
        }
        .into()
    })
}
