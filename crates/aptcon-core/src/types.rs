//! Shared geometric and numeric data structures.

use serde::{Deserialize, Serialize};

// =============================================================================
// EXTENTS
// =============================================================================

/// Axis-aligned bounding box of the ion cloud (nm).
///
/// Read once from the data provider and fixed for the run.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Extents {
    /// Minimum corner (nm)
    pub min: [f32; 3],
    /// Maximum corner (nm)
    pub max: [f32; 3],
}

impl Extents {
    /// Create extents from corner points
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Per-axis side lengths
    pub fn diff(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// Box volume (nm³)
    pub fn volume(&self) -> f32 {
        let d = self.diff();
        d[0] * d[1] * d[2]
    }
}

// =============================================================================
// SQUARE MATRIX
// =============================================================================

/// Dense square matrix backed by a flat row-major vector.
///
/// All contingency outputs (experimental, expected, difference, trend) are
/// square because both axes use the same bin width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix<T> {
    /// Number of rows (= number of columns)
    rows: usize,
    /// Row-major cell data (data[i * rows + j])
    data: Vec<T>,
}

impl<T: Copy + Default> Matrix<T> {
    /// Create a new default-initialized matrix
    pub fn new(rows: usize) -> Self {
        Self {
            rows,
            data: vec![T::default(); rows * rows],
        }
    }

    /// Number of rows (= columns)
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Get linear index from (row, col)
    #[inline]
    fn index(&self, row: usize, col: usize) -> usize {
        row * self.rows + col
    }

    /// Get value at (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> T {
        self.data[self.index(row, col)]
    }

    /// Set value at (row, col)
    #[inline]
    pub fn set(&mut self, row: usize, col: usize, value: T) {
        let idx = self.index(row, col);
        self.data[idx] = value;
    }

    /// Flat row-major view of the cells
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }
}

impl Matrix<u64> {
    /// Increment a cell by one
    #[inline]
    pub fn bump(&mut self, row: usize, col: usize) {
        let idx = self.index(row, col);
        self.data[idx] += 1;
    }

    /// Sum of all cells
    pub fn total(&self) -> u64 {
        self.data.iter().sum()
    }
}

impl Matrix<f64> {
    /// Sum of all cells
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}

// =============================================================================
// TREND SIGN
// =============================================================================

/// Sign of (experimental − expected) for one cell.
///
/// `Excess` means the pair co-occurs more often than independence predicts,
/// `Deficit` less often. Comparison is exact, no tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    /// Experimental below expected
    Deficit,
    /// Experimental equal to expected
    #[default]
    Neutral,
    /// Experimental above expected
    Excess,
}

impl Trend {
    /// Classify a difference value
    pub fn of(difference: f64) -> Self {
        if difference > 0.0 {
            Trend::Excess
        } else if difference < 0.0 {
            Trend::Deficit
        } else {
            Trend::Neutral
        }
    }

    /// Single-character table symbol
    pub fn symbol(&self) -> char {
        match self {
            Trend::Deficit => '-',
            Trend::Neutral => 'o',
            Trend::Excess => '+',
        }
    }
}

impl std::fmt::Display for Trend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.symbol())
    }
}
