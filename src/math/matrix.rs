use rand::distributions::{Distribution, Uniform};
use rand::Rng;

use crate::error::NetworkError;

/// Dense row-major matrix of `f64`.
///
/// The shape is fixed at construction. Every operation below returns a new
/// matrix and leaves its operands untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<Vec<f64>>,
}

impl Matrix {
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        Matrix::filled(rows, cols, 0.0)
    }

    pub fn filled(rows: usize, cols: usize, value: f64) -> Matrix {
        Matrix {
            rows,
            cols,
            data: vec![vec![value; cols]; rows],
        }
    }

    /// Builds a matrix from nested rows. Empty or ragged input is rejected.
    pub fn from_rows(data: Vec<Vec<f64>>) -> Result<Matrix, NetworkError> {
        let cols = data.first().map(|row| row.len()).unwrap_or(0);
        if data.is_empty() || cols == 0 {
            return Err(NetworkError::mismatch("from_rows", "at least 1x1", "empty data"));
        }
        if let Some((i, row)) = data.iter().enumerate().find(|(_, row)| row.len() != cols) {
            return Err(NetworkError::mismatch(
                "from_rows",
                format!("{} columns in every row", cols),
                format!("{} columns in row {}", row.len(), i),
            ));
        }
        Ok(Matrix { rows: data.len(), cols, data })
    }

    /// Builds a `rows x cols` matrix from a flat row-major buffer.
    pub fn from_row_major(rows: usize, cols: usize, values: &[f64]) -> Result<Matrix, NetworkError> {
        if values.len() != rows * cols {
            return Err(NetworkError::mismatch(
                "from_row_major",
                format!("{} values for {}x{}", rows * cols, rows, cols),
                format!("{} values", values.len()),
            ));
        }
        let data = if cols == 0 {
            vec![Vec::new(); rows]
        } else {
            values.chunks(cols).map(|row| row.to_vec()).collect()
        };
        Ok(Matrix { rows, cols, data })
    }

    /// Column vector (`len x 1`) holding `values`.
    pub fn column(values: &[f64]) -> Matrix {
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.iter().map(|&v| vec![v]).collect(),
        }
    }

    /// Independent draws from the uniform distribution on `[-bound, bound]`.
    ///
    /// `bound` must be finite and non-negative.
    pub fn uniform<R: Rng + ?Sized>(rows: usize, cols: usize, bound: f64, rng: &mut R) -> Matrix {
        let dist = Uniform::new_inclusive(-bound, bound);
        let data = (0..rows)
            .map(|_| (0..cols).map(|_| dist.sample(rng)).collect())
            .collect();
        Matrix { rows, cols, data }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Entry at (`row`, `col`), or `None` when out of range.
    pub fn get(&self, row: usize, col: usize) -> Option<f64> {
        self.data.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Row-major iterator over every entry.
    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.data.iter().flat_map(|row| row.iter().copied())
    }

    /// First column as a plain vector; the natural read-out of an `N x 1` output.
    pub fn to_column_vec(&self) -> Vec<f64> {
        self.data.iter().filter_map(|row| row.first().copied()).collect()
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);

        for i in 0..res.rows {
            for j in 0..res.cols {
                res.data[i][j] = self.data[j][i];
            }
        }

        res
    }

    /// Standard matrix product `self · rhs`.
    pub fn product(&self, rhs: &Matrix) -> Result<Matrix, NetworkError> {
        if self.cols != rhs.rows {
            return Err(NetworkError::mismatch(
                "product",
                format!("rhs with {} rows", self.cols),
                format!("{} · {}", self.shape_str(), rhs.shape_str()),
            ));
        }

        let mut res = Matrix::zeros(self.rows, rhs.cols);

        for i in 0..res.rows {
            for j in 0..res.cols {
                let mut sum = 0.0;

                for k in 0..self.cols {
                    sum += self.data[i][k] * rhs.data[k][j];
                }

                res.data[i][j] = sum;
            }
        }

        Ok(res)
    }

    /// Applies `functor(row, col, value)` to every entry.
    pub fn map_indexed<F>(&self, functor: F) -> Matrix
    where
        F: Fn(usize, usize, f64) -> f64,
    {
        let data = self.data.iter().enumerate()
            .map(|(i, row)| row.iter().enumerate().map(|(j, &x)| functor(i, j, x)).collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        self.map_indexed(|_, _, x| functor(x))
    }

    pub fn scale(&self, k: f64) -> Matrix {
        self.map(|x| x * k)
    }

    /// Element-wise (Hadamard) product.
    pub fn hadamard(&self, rhs: &Matrix) -> Result<Matrix, NetworkError> {
        self.zip_with(rhs, "hadamard", |a, b| a * b)
    }

    pub fn add(&self, rhs: &Matrix) -> Result<Matrix, NetworkError> {
        self.zip_with(rhs, "add", |a, b| a + b)
    }

    pub fn sub(&self, rhs: &Matrix) -> Result<Matrix, NetworkError> {
        self.zip_with(rhs, "sub", |a, b| a - b)
    }

    /// Adds `k` to every entry by summing with a constant matrix of the same shape.
    pub fn add_scalar(&self, k: f64) -> Matrix {
        let constant = Matrix::filled(self.rows, self.cols, k);
        let data = self.data.iter().zip(constant.data.iter())
            .map(|(row_a, row_k)| row_a.iter().zip(row_k.iter()).map(|(a, k)| a + k).collect())
            .collect();
        Matrix { rows: self.rows, cols: self.cols, data }
    }

    fn zip_with<F>(&self, rhs: &Matrix, operation: &'static str, f: F) -> Result<Matrix, NetworkError>
    where
        F: Fn(f64, f64) -> f64,
    {
        if self.shape() != rhs.shape() {
            return Err(NetworkError::mismatch(operation, self.shape_str(), rhs.shape_str()));
        }
        let data = self.data.iter().zip(rhs.data.iter())
            .map(|(row_a, row_b)| row_a.iter().zip(row_b.iter()).map(|(&a, &b)| f(a, b)).collect())
            .collect();
        Ok(Matrix { rows: self.rows, cols: self.cols, data })
    }

    fn shape_str(&self) -> String {
        format!("{}x{}", self.rows, self.cols)
    }
}

impl Default for Matrix {
    fn default() -> Self {
        Matrix { rows: 0, cols: 0, data: vec![] }
    }
}
