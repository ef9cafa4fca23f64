use nalgebra::DMatrix;
use thiserror::Error;

/// Absolute tolerance used when checking symmetry and the zero diagonal.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Error, PartialEq)]
pub enum MatrixError {
    #[error("Probability matrix is empty")]
    Empty,

    #[error("Probability matrix is not square: {rows}x{cols}")]
    NotSquare { rows: usize, cols: usize },

    #[error("Row {row} has {found} entries, expected {expected}")]
    RaggedRow {
        row: usize,
        found: usize,
        expected: usize,
    },

    #[error("Index ({i}, {j}) is out of bounds for a {size}x{size} matrix")]
    IndexOutOfBounds { i: usize, j: usize, size: usize },

    #[error("Entry ({i}, {j}) = {value} is not a probability in [0, 1]")]
    OutOfRange { i: usize, j: usize, value: f64 },

    #[error("Diagonal entry ({index}, {index}) = {value} is not zero")]
    NonZeroDiagonal { index: usize, value: f64 },

    #[error("Matrix is not symmetric at ({i}, {j}): {upper} vs {lower}")]
    Asymmetric {
        i: usize,
        j: usize,
        upper: f64,
        lower: f64,
    },
}

/// A dense N×N base-pairing probability matrix.
///
/// Construction validates the matrix once: it must be square and non-empty, every entry
/// must lie in `[0, 1]`, the diagonal must be zero and the matrix must be symmetric, the
/// last two within a floating-point tolerance. After construction the matrix is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityMatrix {
    data: DMatrix<f64>,
}

impl ProbabilityMatrix {
    pub fn new(data: DMatrix<f64>) -> Result<Self, MatrixError> {
        Self::with_tolerance(data, DEFAULT_TOLERANCE)
    }

    pub fn with_tolerance(data: DMatrix<f64>, tolerance: f64) -> Result<Self, MatrixError> {
        validate(&data, tolerance)?;
        Ok(Self { data })
    }

    /// Builds a matrix from row vectors, as handed over by a folding engine wrapper.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let n = rows.len();
        if n == 0 {
            return Err(MatrixError::Empty);
        }
        if let Some((row, found)) = rows
            .iter()
            .enumerate()
            .map(|(row, values)| (row, values.len()))
            .find(|&(_, len)| len != n)
        {
            return Err(MatrixError::RaggedRow {
                row,
                found,
                expected: n,
            });
        }
        Self::new(DMatrix::from_fn(n, n, |i, j| rows[i][j]))
    }

    /// Builds a symmetric matrix of size `n` from sparse `(i, j, probability)` entries.
    /// Every entry is mirrored to `(j, i)`; unspecified entries are zero.
    pub fn from_pairs(n: usize, entries: &[(usize, usize, f64)]) -> Result<Self, MatrixError> {
        if n == 0 {
            return Err(MatrixError::Empty);
        }
        let mut data = DMatrix::zeros(n, n);
        for &(i, j, p) in entries {
            if i >= n || j >= n {
                return Err(MatrixError::IndexOutOfBounds { i, j, size: n });
            }
            data[(i, j)] = p;
            data[(j, i)] = p;
        }
        Self::new(data)
    }

    /// Sequence length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.data.nrows()
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> f64 {
        self.data[(i, j)]
    }

    pub fn as_matrix(&self) -> &DMatrix<f64> {
        &self.data
    }

    /// Entries of the strict upper triangle (i < j) in row-major order.
    pub fn upper_triangle(&self) -> impl Iterator<Item = (usize, usize, f64)> + '_ {
        let n = self.size();
        (0..n).flat_map(move |i| (i + 1..n).map(move |j| (i, j, self.data[(i, j)])))
    }
}

fn validate(data: &DMatrix<f64>, tolerance: f64) -> Result<(), MatrixError> {
    let (rows, cols) = data.shape();
    if rows == 0 || cols == 0 {
        return Err(MatrixError::Empty);
    }
    if rows != cols {
        return Err(MatrixError::NotSquare { rows, cols });
    }

    for i in 0..rows {
        for j in 0..cols {
            let value = data[(i, j)];
            // NaN fails this check as well.
            if !(0.0..=1.0).contains(&value) {
                return Err(MatrixError::OutOfRange { i, j, value });
            }
        }
    }

    for index in 0..rows {
        let value = data[(index, index)];
        if value.abs() > tolerance {
            return Err(MatrixError::NonZeroDiagonal { index, value });
        }
    }

    for i in 0..rows {
        for j in (i + 1)..cols {
            let upper = data[(i, j)];
            let lower = data[(j, i)];
            if (upper - lower).abs() > tolerance {
                return Err(MatrixError::Asymmetric { i, j, upper, lower });
            }
        }
    }

    Ok(())
}
