use ndarray::{Array2, ArrayView1, Axis};

use super::contingency::Categories;

/// Confusion matrix over the union of labels of `truth` and `prediction`
///
/// Rows follow the true label, columns the predicted one.
pub fn confusion_matrix(truth: ArrayView1<f64>, prediction: ArrayView1<f64>) -> Array2<f64> {
    let labels = Categories::union(truth, prediction);
    let mut matrix = Array2::zeros((labels.len(), labels.len()));
    for (&t, &p) in truth.iter().zip(prediction.iter()) {
        if let (Some(i), Some(j)) = (labels.position(t), labels.position(p)) {
            matrix[[i, j]] += 1.0;
        }
    }
    matrix
}

/// Matthews correlation coefficient
///
/// Uses the multiclass (R_K) form, which reduces to
/// `(tp·tn - fp·fn) / sqrt((tp+fp)(tp+fn)(tn+fp)(tn+fn))` for two labels.
/// Returns 0.0 when the denominator vanishes.
pub fn matthews_corrcoef(truth: ArrayView1<f64>, prediction: ArrayView1<f64>) -> f64 {
    let matrix = confusion_matrix(truth, prediction);

    let true_sums = matrix.sum_axis(Axis(1));
    let pred_sums = matrix.sum_axis(Axis(0));
    let n_correct = matrix.diag().sum();
    let n_samples = pred_sums.sum();

    let cov_ytyp = n_correct * n_samples - true_sums.dot(&pred_sums);
    let cov_ypyp = n_samples * n_samples - pred_sums.dot(&pred_sums);
    let cov_ytyt = n_samples * n_samples - true_sums.dot(&true_sums);

    if cov_ypyp * cov_ytyt == 0.0 {
        return 0.0;
    }

    cov_ytyp / (cov_ytyt * cov_ypyp).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{arr1, arr2};

    #[test]
    fn test_confusion_matrix() {
        let truth = arr1(&[1.0, 1.0, 2.0]);
        let prediction = arr1(&[2.0, 1.0, 2.0]);
        let matrix = confusion_matrix(truth.view(), prediction.view());
        assert_eq!(matrix, arr2(&[[1.0, 1.0], [0.0, 1.0]]));
    }

    #[test]
    fn test_matthews_perfect() {
        let v = arr1(&[1.0, 1.0, 2.0]);
        assert!((matthews_corrcoef(v.view(), v.view()) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matthews_inverted() {
        let truth = arr1(&[0.0, 1.0, 0.0, 1.0]);
        let prediction = arr1(&[1.0, 0.0, 1.0, 0.0]);
        assert!((matthews_corrcoef(truth.view(), prediction.view()) + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_matthews_partial() {
        let truth = arr1(&[1.0, 1.0, 2.0]);
        let prediction = arr1(&[2.0, 1.0, 2.0]);
        assert!((matthews_corrcoef(truth.view(), prediction.view()) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_matthews_constant_prediction_is_zero() {
        let truth = arr1(&[0.0, 1.0, 1.0]);
        let prediction = arr1(&[1.0, 1.0, 1.0]);
        assert_eq!(matthews_corrcoef(truth.view(), prediction.view()), 0.0);
    }

    #[test]
    fn test_matthews_disjoint_labels() {
        // truth uses {1, 2}, prediction {2, 3}: three classes overall
        let truth = arr1(&[1.0, 2.0, 1.0, 2.0]);
        let prediction = arr1(&[2.0, 3.0, 2.0, 3.0]);
        let mcc = matthews_corrcoef(truth.view(), prediction.view());
        assert!(mcc.is_finite());
        assert!(mcc <= 0.0);
    }
}
