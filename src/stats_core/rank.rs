use ndarray::{Array1, ArrayView1};

/// Rank observations, giving tied values the average of the ranks they span
///
/// Ranks start at 1. A NaN anywhere in the input makes every rank NaN.
pub fn rankdata(values: ArrayView1<f64>) -> Array1<f64> {
    let n = values.len();
    if values.iter().any(|v| v.is_nan()) {
        return Array1::from_elem(n, f64::NAN);
    }

    let mut order: Vec<usize> = (0..n).collect();
    order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));

    let mut ranks = Array1::zeros(n);
    let mut start = 0;
    while start < n {
        let mut end = start + 1;
        while end < n && values[order[end]] == values[order[start]] {
            end += 1;
        }
        // positions start..end share ranks start+1 ..= end
        let average = (start + end + 1) as f64 / 2.0;
        for &idx in &order[start..end] {
            ranks[idx] = average;
        }
        start = end;
    }

    ranks
}

/// Sizes of the groups of equal values, groups of one included
pub fn tie_groups(values: ArrayView1<f64>) -> Vec<usize> {
    let mut sorted: Vec<f64> = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let mut groups = Vec::new();
    let mut start = 0;
    while start < sorted.len() {
        let mut end = start + 1;
        while end < sorted.len() && sorted[end] == sorted[start] {
            end += 1;
        }
        groups.push(end - start);
        start = end;
    }
    groups
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::arr1;

    #[test]
    fn test_rankdata_distinct() {
        let v = arr1(&[35.0, 23.0, 47.0, 17.0]);
        assert_eq!(rankdata(v.view()), arr1(&[3.0, 2.0, 4.0, 1.0]));
    }

    #[test]
    fn test_rankdata_ties() {
        let v = arr1(&[1.0, 2.0, 2.0, 3.0, 2.0]);
        assert_eq!(rankdata(v.view()), arr1(&[1.0, 3.0, 3.0, 5.0, 3.0]));
    }

    #[test]
    fn test_rankdata_signed_zero_tie() {
        let v = arr1(&[0.0, -0.0, 1.0]);
        assert_eq!(rankdata(v.view()), arr1(&[1.5, 1.5, 3.0]));
    }

    #[test]
    fn test_rankdata_nan() {
        let v = arr1(&[1.0, f64::NAN]);
        assert!(rankdata(v.view()).iter().all(|r| r.is_nan()));
    }

    #[test]
    fn test_rankdata_empty() {
        let v = Array1::<f64>::zeros(0);
        assert!(rankdata(v.view()).is_empty());
    }

    #[test]
    fn test_tie_groups() {
        let v = arr1(&[4.0, 1.0, 4.0, 2.0, 4.0, 1.0]);
        let mut groups = tie_groups(v.view());
        groups.sort_unstable();
        assert_eq!(groups, vec![1, 2, 3]);
    }
}
