//! Statistical helpers shared by the analyzers.
//!
//! Quartiles use linear interpolation between closest ranks, the usual
//! "type 7" definition.

use crate::types::DescriptiveStats;
use linfa::prelude::*;
use linfa_linear::LinearRegression;
use ndarray::{Array1, Array2, ArrayView1, Axis};
use polars::prelude::*;
use tracing::debug;

/// Linear-interpolated quantile of an ascending slice.
pub(crate) fn quantile_sorted(sorted: &[f64], q: f64) -> Option<f64> {
    if sorted.is_empty() {
        return None;
    }

    let position = q.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    let fraction = position - lower as f64;

    Some(sorted[lower] + (sorted[upper] - sorted[lower]) * fraction)
}

/// Sort a copy of the values in ascending order.
pub(crate) fn sorted_copy(values: &[f64]) -> Vec<f64> {
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    sorted
}

/// First and third quartile of the values.
pub(crate) fn quartiles(values: &[f64]) -> Option<(f64, f64)> {
    let sorted = sorted_copy(values);
    Some((quantile_sorted(&sorted, 0.25)?, quantile_sorted(&sorted, 0.75)?))
}

/// Tukey fences `[Q1 - k*IQR, Q3 + k*IQR]`.
pub(crate) fn iqr_fences(values: &[f64], multiplier: f64) -> Option<(f64, f64)> {
    let (q1, q3) = quartiles(values)?;
    let iqr = q3 - q1;
    Some((q1 - multiplier * iqr, q3 + multiplier * iqr))
}

/// Arithmetic mean, `None` for an empty slice.
pub(crate) fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

/// Sample standard deviation (n - 1 denominator).
pub(crate) fn calculate_std(values: &[f64]) -> f64 {
    let n = values.len() as f64;
    if n <= 1.0 {
        return 0.0;
    }

    let mean = mean(values).unwrap_or(0.0);
    let variance: f64 = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);

    variance.sqrt()
}

/// Skewness based on the sample standard deviation.
pub(crate) fn calculate_skewness(values: &[f64]) -> f64 {
    let std = calculate_std(values);
    if std == 0.0 {
        return 0.0;
    }

    let mean = mean(values).unwrap_or(0.0);
    let n = values.len() as f64;
    let skew_sum: f64 = values.iter().map(|v| ((v - mean) / std).powi(3)).sum();

    skew_sum / n
}

/// Count, mean, std, min, quartiles and max.
pub(crate) fn describe(values: &[f64]) -> DescriptiveStats {
    let sorted = sorted_copy(values);
    DescriptiveStats {
        count: sorted.len(),
        mean: mean(&sorted),
        std: (sorted.len() > 1).then(|| calculate_std(&sorted)),
        min: sorted.first().copied(),
        q25: quantile_sorted(&sorted, 0.25),
        median: quantile_sorted(&sorted, 0.5),
        q75: quantile_sorted(&sorted, 0.75),
        max: sorted.last().copied(),
    }
}

/// Pearson correlation over the rows where both cells are present.
///
/// Returns `None` with fewer than two complete pairs or when either side has
/// zero variance.
pub(crate) fn pearson_pairwise(x: &[Option<f64>], y: &[Option<f64>]) -> Option<f64> {
    let x = Float64Chunked::from_slice_options(PlSmallStr::EMPTY, x);
    let y = Float64Chunked::from_slice_options(PlSmallStr::EMPTY, y);

    polars::prelude::cov::pearson_corr(&x, &y)
        .filter(|r| r.is_finite())
        .map(|r| r.clamp(-1.0, 1.0))
}

fn has_variance(values: ArrayView1<'_, f64>) -> bool {
    let Some(mean) = values.mean() else {
        return false;
    };
    let spread: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
    spread > f64::EPSILON * values.len() as f64
}

/// Coefficient of determination of an OLS fit (with intercept) of `target`
/// on the columns of `predictors`.
///
/// `None` when the target has zero variance. Constant predictors are
/// dropped; a design that is still singular counts as a perfect fit.
pub(crate) fn r_squared(target: &Array1<f64>, predictors: &Array2<f64>) -> Option<f64> {
    if !has_variance(target.view()) {
        return None;
    }

    let informative: Vec<usize> = (0..predictors.ncols())
        .filter(|&j| has_variance(predictors.column(j)))
        .collect();
    if informative.is_empty() {
        return Some(0.0);
    }

    let dataset = Dataset::new(predictors.select(Axis(1), &informative), target.clone());
    match LinearRegression::default().fit(&dataset) {
        Ok(model) => {
            let prediction = model.predict(&dataset);
            let r2: f64 = prediction.r2(&dataset).ok()?;
            Some(r2.clamp(0.0, 1.0))
        }
        Err(e) => {
            debug!("Singular design in VIF regression: {}", e);
            Some(1.0)
        }
    }
}

/// `1 / (1 - R²)`, infinite for a perfect fit.
pub(crate) fn vif_from_r_squared(r_squared: f64) -> f64 {
    let tolerance = 1.0 - r_squared;
    if tolerance <= 1e-12 {
        f64::INFINITY
    } else {
        1.0 / tolerance
    }
}

/// Variance inflation factor of every column of `matrix` against all the others.
///
/// Columns with zero variance get `NaN` since their VIF is undefined.
pub(crate) fn variance_inflation_factors(matrix: &Array2<f64>) -> Vec<f64> {
    (0..matrix.ncols())
        .map(|target| {
            let others: Vec<usize> = (0..matrix.ncols()).filter(|&j| j != target).collect();
            let predictors = matrix.select(Axis(1), &others);

            r_squared(&matrix.column(target).to_owned(), &predictors)
                .map(vif_from_r_squared)
                .unwrap_or(f64::NAN)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== quantile tests ====================

    #[test]
    fn test_quantile_linear_interpolation() {
        let sorted = [1.0, 2.0, 3.0, 4.0];
        // position = 0.25 * 3 = 0.75 -> 1 + 0.75 * (2 - 1)
        assert!((quantile_sorted(&sorted, 0.25).unwrap() - 1.75).abs() < 1e-12);
        assert!((quantile_sorted(&sorted, 0.5).unwrap() - 2.5).abs() < 1e-12);
        assert!((quantile_sorted(&sorted, 0.75).unwrap() - 3.25).abs() < 1e-12);
    }

    #[test]
    fn test_quantile_empty() {
        assert_eq!(quantile_sorted(&[], 0.5), None);
    }

    #[test]
    fn test_iqr_fences() {
        let values = [1.0, 2.0, 3.0, 4.0, 5.0];
        // Q1 = 2, Q3 = 4, IQR = 2
        let (lower, upper) = iqr_fences(&values, 1.5).unwrap();
        assert_eq!(lower, -1.0);
        assert_eq!(upper, 7.0);
    }

    // ==================== calculate_std tests ====================

    #[test]
    fn test_calculate_std_basic() {
        // Variance = 10 / 4 = 2.5
        let std = calculate_std(&[1.0, 2.0, 3.0, 4.0, 5.0]);
        assert!((std - 2.5f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn test_calculate_std_single_value() {
        assert_eq!(calculate_std(&[5.0]), 0.0);
    }

    #[test]
    fn test_calculate_skewness_positive() {
        assert!(calculate_skewness(&[1.0, 1.0, 1.0, 1.0, 10.0]) > 0.0);
    }

    #[test]
    fn test_calculate_skewness_zero_std() {
        assert_eq!(calculate_skewness(&[5.0, 5.0, 5.0]), 0.0);
    }

    #[test]
    fn test_describe() {
        let stats = describe(&[3.0, 1.0, 2.0]);
        assert_eq!(stats.count, 3);
        assert_eq!(stats.mean, Some(2.0));
        assert_eq!(stats.std, Some(1.0));
        assert_eq!(stats.min, Some(1.0));
        assert_eq!(stats.median, Some(2.0));
        assert_eq!(stats.max, Some(3.0));
    }

    #[test]
    fn test_describe_empty() {
        let stats = describe(&[]);
        assert_eq!(stats.count, 0);
        assert_eq!(stats.mean, None);
        assert_eq!(stats.std, None);
    }

    // ==================== correlation tests ====================

    #[test]
    fn test_pearson_perfect_positive() {
        let x = [Some(1.0), Some(2.0), Some(3.0)];
        let y = [Some(2.0), Some(4.0), Some(6.0)];
        assert!((pearson_pairwise(&x, &y).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_skips_incomplete_pairs() {
        let x = [Some(1.0), None, Some(3.0), Some(4.0)];
        let y = [Some(-1.0), Some(100.0), Some(-3.0), Some(-4.0)];
        assert!((pearson_pairwise(&x, &y).unwrap() + 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_pearson_constant_side() {
        let x = [Some(1.0), Some(1.0), Some(1.0)];
        let y = [Some(1.0), Some(2.0), Some(3.0)];
        assert_eq!(pearson_pairwise(&x, &y), None);
    }

    // ==================== VIF tests ====================

    fn matrix(columns: &[Vec<f64>]) -> Array2<f64> {
        let rows = columns[0].len();
        Array2::from_shape_fn((rows, columns.len()), |(i, j)| columns[j][i])
    }

    #[test]
    fn test_vif_independent_columns() {
        // Orthogonal centered columns -> R² = 0 -> VIF = 1
        let a = vec![1.0, -1.0, 1.0, -1.0];
        let b = vec![1.0, 1.0, -1.0, -1.0];
        let vifs = variance_inflation_factors(&matrix(&[a, b]));
        assert!((vifs[0] - 1.0).abs() < 1e-9);
        assert!((vifs[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vif_perfect_collinearity_is_infinite() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let b: Vec<f64> = a.iter().map(|v| v * 2.0 + 1.0).collect();
        let vifs = variance_inflation_factors(&matrix(&[a, b]));
        assert!(vifs.iter().all(|v| v.is_infinite()));
    }

    #[test]
    fn test_vif_high_but_finite() {
        let a = vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let b = vec![1.1, 1.9, 3.05, 4.1, 4.9, 6.0];
        let c = vec![3.0, 1.0, 4.0, 1.0, 5.0, 9.0];
        let vifs = variance_inflation_factors(&matrix(&[a, b, c]));
        assert!(vifs[0].is_finite() && vifs[0] > 5.0);
        assert!(vifs[1].is_finite() && vifs[1] > 5.0);
    }

    #[test]
    fn test_vif_constant_column_is_nan() {
        let vifs = variance_inflation_factors(&matrix(&[vec![2.0, 2.0, 2.0], vec![1.0, 2.0, 4.0]]));
        assert!(vifs[0].is_nan());
        assert!((vifs[1] - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_vif_fewer_rows_than_predictors_is_infinite() {
        // Two rows are always fitted exactly by two predictors
        let vifs = variance_inflation_factors(&matrix(&[
            vec![1.0, 2.0],
            vec![3.0, 1.0],
            vec![5.0, 7.0],
        ]));
        assert!(vifs.iter().all(|v| v.is_infinite()));
    }

    #[test]
    fn test_r_squared_without_informative_predictors() {
        let target = Array1::from(vec![1.0, 2.0, 3.0]);
        let predictors = matrix(&[vec![4.0, 4.0, 4.0]]);
        assert_eq!(r_squared(&target, &predictors), Some(0.0));
    }
}
