//! Statistical analyzer: expected values under independence, chi-square,
//! degrees of freedom, difference and trend-sign matrices.

use crate::errors::{CoocError, Result};
use crate::types::{Matrix, Trend};
use serde::{Deserialize, Serialize};

/// Cells with expected value at or below this are excluded from the
/// chi-square sum. Carried from the statistical methodology being
/// reproduced; near-zero expectations would otherwise dominate the
/// statistic numerically.
pub const CHI_SQUARE_EXPECTED_FLOOR: f64 = 0.01;

/// Full statistical derivation for one element pair's experimental matrix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairStatistics {
    /// Row marginal totals of the experimental matrix
    pub row_totals: Vec<u64>,
    /// Column marginal totals
    pub col_totals: Vec<u64>,
    /// Grand total (= number of blocks)
    pub total_observations: u64,
    /// Expected cell values under the independence assumption
    pub expected: Matrix<f64>,
    /// Experimental minus expected, elementwise
    pub difference: Matrix<f64>,
    /// Sign of the difference matrix
    pub trend: Matrix<Trend>,
    /// Chi-square over cells with expected above the floor
    pub chi_square: f64,
    /// Full degrees of freedom, (rows − 1)²
    pub degrees_of_freedom: usize,
    /// Reduced degrees of freedom for sparse tables,
    /// (nonzero_rows − 1)(nonzero_cols − 1)
    pub reduced_degrees_of_freedom: usize,
    /// Rows with strictly positive marginal total
    pub nonzero_rows: usize,
    /// Columns with strictly positive marginal total
    pub nonzero_cols: usize,
}

impl PairStatistics {
    /// Derive all statistics from an experimental count matrix.
    ///
    /// Fails with a degenerate-statistics error when the matrix is empty
    /// (`total_observations == 0`), since expected values are then
    /// undefined; callers skip such pairs rather than emit NaN.
    pub fn compute(experimental: &Matrix<u64>) -> Result<Self> {
        let rows = experimental.rows();

        let mut row_totals = vec![0u64; rows];
        let mut col_totals = vec![0u64; rows];
        for i in 0..rows {
            for j in 0..rows {
                let v = experimental.get(i, j);
                row_totals[i] += v;
                col_totals[j] += v;
            }
        }
        let total_observations: u64 = row_totals.iter().sum();
        if total_observations == 0 {
            return Err(CoocError::statistics(
                "contingency table is empty; expected values are undefined",
            ));
        }

        let nonzero_rows = row_totals.iter().filter(|&&t| t > 0).count();
        let nonzero_cols = col_totals.iter().filter(|&&t| t > 0).count();

        let grand = total_observations as f64;
        let mut expected: Matrix<f64> = Matrix::new(rows);
        let mut difference: Matrix<f64> = Matrix::new(rows);
        let mut trend: Matrix<Trend> = Matrix::new(rows);
        let mut chi_square = 0.0;

        for i in 0..rows {
            for j in 0..rows {
                let exp = row_totals[i] as f64 * col_totals[j] as f64 / grand;
                let diff = experimental.get(i, j) as f64 - exp;
                expected.set(i, j, exp);
                difference.set(i, j, diff);
                trend.set(i, j, Trend::of(diff));
                if exp > CHI_SQUARE_EXPECTED_FLOOR {
                    chi_square += diff * diff / exp;
                }
            }
        }

        Ok(Self {
            row_totals,
            col_totals,
            total_observations,
            expected,
            difference,
            trend,
            chi_square,
            degrees_of_freedom: (rows - 1) * (rows - 1),
            reduced_degrees_of_freedom: nonzero_rows.saturating_sub(1)
                * nonzero_cols.saturating_sub(1),
            nonzero_rows,
            nonzero_cols,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filled(rows: usize, cells: &[(usize, usize, u64)]) -> Matrix<u64> {
        let mut m = Matrix::new(rows);
        for &(i, j, v) in cells {
            m.set(i, j, v);
        }
        m
    }

    #[test]
    fn test_marginals_and_grand_total() {
        let m = filled(3, &[(0, 0, 4), (0, 2, 6), (1, 1, 10), (2, 2, 5)]);
        let stats = PairStatistics::compute(&m).unwrap();

        assert_eq!(stats.row_totals, vec![10, 10, 5]);
        assert_eq!(stats.col_totals, vec![4, 10, 11]);
        assert_eq!(stats.total_observations, 25);
        assert_eq!(stats.row_totals.iter().sum::<u64>(), 25);
        assert_eq!(stats.col_totals.iter().sum::<u64>(), 25);
    }

    #[test]
    fn test_expected_preserves_marginals() {
        let m = filled(3, &[(0, 0, 7), (0, 1, 3), (1, 0, 2), (2, 2, 8)]);
        let stats = PairStatistics::compute(&m).unwrap();

        let expected_sum: f64 = stats.expected.total();
        assert!((expected_sum - stats.total_observations as f64).abs() < 1e-9);
    }

    #[test]
    fn test_chi_square_zero_under_perfect_independence() {
        // Rank-one table: experimental equals expected exactly
        let m = filled(2, &[(0, 0, 4), (0, 1, 4), (1, 0, 4), (1, 1, 4)]);
        let stats = PairStatistics::compute(&m).unwrap();
        assert!(stats.chi_square.abs() < 1e-9);
        assert!(stats
            .trend
            .as_slice()
            .iter()
            .all(|&t| t == Trend::Neutral));
    }

    #[test]
    fn test_chi_square_nonnegative_and_df_ordering() {
        let m = filled(4, &[(0, 0, 30), (1, 3, 2), (3, 1, 1)]);
        let stats = PairStatistics::compute(&m).unwrap();

        assert!(stats.chi_square >= 0.0);
        assert!(stats.chi_square.is_finite());
        assert_eq!(stats.degrees_of_freedom, 9);
        assert!(stats.reduced_degrees_of_freedom <= stats.degrees_of_freedom);
        // Rows 0,1,3 and cols 0,1,3 populated -> (3-1)*(3-1)
        assert_eq!(stats.reduced_degrees_of_freedom, 4);
    }

    #[test]
    fn test_trend_matches_difference_sign() {
        let m = filled(2, &[(0, 0, 10), (1, 1, 10)]);
        let stats = PairStatistics::compute(&m).unwrap();

        for i in 0..2 {
            for j in 0..2 {
                let diff = stats.difference.get(i, j);
                let trend = stats.trend.get(i, j);
                assert_eq!(trend == Trend::Excess, diff > 0.0);
                assert_eq!(trend == Trend::Deficit, diff < 0.0);
                assert_eq!(trend == Trend::Neutral, diff == 0.0);
            }
        }
    }

    #[test]
    fn test_empty_table_is_degenerate() {
        let m: Matrix<u64> = Matrix::new(4);
        let err = PairStatistics::compute(&m);
        assert!(matches!(err, Err(CoocError::DegenerateStatistics(_))));
    }

    #[test]
    fn test_low_expectation_cells_excluded() {
        // One heavy cell plus one stray observation far from it. The stray
        // row/col cross cells have tiny expected values; the statistic must
        // stay finite because sub-floor cells are skipped.
        let mut m = Matrix::new(3);
        m.set(0, 0, 10_000);
        m.set(2, 2, 1);
        let stats = PairStatistics::compute(&m).unwrap();
        assert!(stats.chi_square.is_finite());
        assert!(stats.chi_square >= 0.0);
    }
}
