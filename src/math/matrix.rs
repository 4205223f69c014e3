use std::ops::{Add, Index, IndexMut, Mul, Sub};

use crate::error::{Error, Result};
use crate::math::random::RandomSource;

/// Dense row-major matrix of `f64`.
///
/// The shape is fixed at construction; only the contents change. Operations
/// come in two flavours: in-place methods take `&mut self` and overwrite it,
/// pure functions take shared references and allocate a fresh result.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Zero-filled `rows x cols` matrix.
    ///
    /// # Panics
    /// Panics if either dimension is zero.
    pub fn zeros(rows: usize, cols: usize) -> Matrix {
        assert!(rows > 0 && cols > 0, "matrix dimensions must be non-zero, got {rows}x{cols}");
        Matrix {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    /// Zero-filled column vector with `rows` entries.
    pub fn column(rows: usize) -> Matrix {
        Matrix::zeros(rows, 1)
    }

    /// Column vector holding `values` top to bottom.
    ///
    /// # Panics
    /// Panics if `values` is empty.
    pub fn from_column(values: &[f64]) -> Matrix {
        assert!(!values.is_empty(), "column vector must have at least one entry");
        Matrix {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    /// Builds a matrix from a row-major 2-D array. Every row must have the
    /// same non-zero length.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Matrix> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if rows.is_empty() || cols == 0 {
            return Err(Error::Configuration("matrix must have at least one row and column".to_owned()));
        }
        if let Some(bad) = rows.iter().find(|row| row.len() != cols) {
            return Err(Error::shape("from_rows", (1, cols), (1, bad.len())));
        }
        let n_rows = rows.len();
        Ok(Matrix {
            rows: n_rows,
            cols,
            data: rows.into_iter().flatten().collect(),
        })
    }

    /// `rows x cols` matrix filled uniformly from `[min, max)`.
    pub fn random_of_size<R>(shape: (usize, usize), range: (f64, f64), rng: &mut R) -> Result<Matrix>
    where
        R: RandomSource + ?Sized,
    {
        let mut res = Matrix::zeros(shape.0, shape.1);
        res.randomize(range.0, range.1, rng)?;
        Ok(res)
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

    pub fn is_column(&self) -> bool {
        self.cols == 1
    }

    /// Row-major view of the contents.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }

    pub fn get(&self, row: usize, col: usize) -> Result<f64> {
        self.offset(row, col).map(|i| self.data[i])
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) -> Result<()> {
        let i = self.offset(row, col)?;
        self.data[i] = value;
        Ok(())
    }

    fn offset(&self, row: usize, col: usize) -> Result<usize> {
        if row >= self.rows || col >= self.cols {
            return Err(Error::IndexOutOfBounds {
                row,
                col,
                rows: self.rows,
                cols: self.cols,
            });
        }
        Ok(row * self.cols + col)
    }

    fn require_same_shape(&self, other: &Matrix, op: &'static str) -> Result<()> {
        if self.shape() != other.shape() {
            return Err(Error::shape(op, self.shape(), other.shape()));
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // In-place operations
    // ---------------------------------------------------------------------

    pub fn add_in_place(&mut self, m: &Matrix) -> Result<()> {
        self.require_same_shape(m, "add")?;
        self.data.iter_mut().zip(&m.data).for_each(|(a, b)| *a += b);
        Ok(())
    }

    pub fn sub_in_place(&mut self, m: &Matrix) -> Result<()> {
        self.require_same_shape(m, "subtract")?;
        self.data.iter_mut().zip(&m.data).for_each(|(a, b)| *a -= b);
        Ok(())
    }

    /// `self += m * factor`, the gradient-descent update primitive.
    pub fn add_scaled(&mut self, m: &Matrix, factor: f64) -> Result<()> {
        self.require_same_shape(m, "add_scaled")?;
        self.data.iter_mut().zip(&m.data).for_each(|(a, b)| *a += b * factor);
        Ok(())
    }

    /// Element-wise product, overwriting `self`.
    pub fn hadamard_in_place(&mut self, m: &Matrix) -> Result<()> {
        self.require_same_shape(m, "hadamard")?;
        self.data.iter_mut().zip(&m.data).for_each(|(a, b)| *a *= b);
        Ok(())
    }

    pub fn add_scalar(&mut self, n: f64) {
        self.data.iter_mut().for_each(|a| *a += n);
    }

    pub fn sub_scalar(&mut self, n: f64) {
        self.data.iter_mut().for_each(|a| *a -= n);
    }

    pub fn scale(&mut self, n: f64) {
        self.data.iter_mut().for_each(|a| *a *= n);
    }

    /// Sets every element to `value`.
    pub fn initialize_with(&mut self, value: f64) {
        self.data.fill(value);
    }

    pub fn set_copy(&mut self, m: &Matrix) -> Result<()> {
        self.require_same_shape(m, "set_copy")?;
        self.data.copy_from_slice(&m.data);
        Ok(())
    }

    /// Overwrites `self` with the transpose of `m`; `self` must already have
    /// the swapped shape.
    pub fn set_transposed_copy(&mut self, m: &Matrix) -> Result<()> {
        if self.shape() != (m.cols, m.rows) {
            return Err(Error::shape("set_transposed_copy", self.shape(), m.shape()));
        }
        for i in 0..self.rows {
            for j in 0..self.cols {
                self.data[i * self.cols + j] = m.data[j * m.cols + i];
            }
        }
        Ok(())
    }

    pub fn evaluate_in_place<F>(&mut self, functor: F)
    where
        F: Fn(f64) -> f64,
    {
        self.data.iter_mut().for_each(|a| *a = functor(*a));
    }

    /// Overwrites `self` with `functor` applied to each element of `src`.
    pub fn set_evaluated<F>(&mut self, src: &Matrix, functor: F) -> Result<()>
    where
        F: Fn(f64) -> f64,
    {
        self.require_same_shape(src, "set_evaluated")?;
        self.data.iter_mut().zip(&src.data).for_each(|(a, &b)| *a = functor(b));
        Ok(())
    }

    /// Fills every element independently from `[min, max)`.
    pub fn randomize<R>(&mut self, min: f64, max: f64, rng: &mut R) -> Result<()>
    where
        R: RandomSource + ?Sized,
    {
        if !(min.is_finite() && max.is_finite() && min < max) {
            return Err(Error::InvalidRange { min, max });
        }
        self.data.iter_mut().for_each(|a| *a = rng.next_in_range(min, max));
        Ok(())
    }

    /// Writes `a * b` into `dest`, which must be `a.rows x b.cols`.
    pub fn multiply_into(dest: &mut Matrix, a: &Matrix, b: &Matrix) -> Result<()> {
        if a.cols != b.rows {
            return Err(Error::shape("multiply", a.shape(), b.shape()));
        }
        if dest.shape() != (a.rows, b.cols) {
            return Err(Error::shape("multiply_into", dest.shape(), (a.rows, b.cols)));
        }
        for i in 0..a.rows {
            for j in 0..b.cols {
                let mut sum = 0.0;
                for k in 0..a.cols {
                    sum += a.data[i * a.cols + k] * b.data[k * b.cols + j];
                }
                dest.data[i * dest.cols + j] = sum;
            }
        }
        Ok(())
    }

    // ---------------------------------------------------------------------
    // Pure operations
    // ---------------------------------------------------------------------

    pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        if a.cols != b.rows {
            return Err(Error::shape("multiply", a.shape(), b.shape()));
        }
        let mut res = Matrix::zeros(a.rows, b.cols);
        Matrix::multiply_into(&mut res, a, b)?;
        Ok(res)
    }

    pub fn sum(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let mut res = a.clone();
        res.add_in_place(b)?;
        Ok(res)
    }

    pub fn difference(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let mut res = a.clone();
        res.sub_in_place(b)?;
        Ok(res)
    }

    pub fn hadamard(a: &Matrix, b: &Matrix) -> Result<Matrix> {
        let mut res = a.clone();
        res.hadamard_in_place(b)?;
        Ok(res)
    }

    pub fn plus_scalar(&self, n: f64) -> Matrix {
        self.map(|x| x + n)
    }

    pub fn minus_scalar(&self, n: f64) -> Matrix {
        self.map(|x| x - n)
    }

    pub fn scaled(&self, n: f64) -> Matrix {
        self.map(|x| x * n)
    }

    pub fn transpose(&self) -> Matrix {
        let mut res = Matrix::zeros(self.cols, self.rows);
        for i in 0..self.rows {
            for j in 0..self.cols {
                res.data[j * res.cols + i] = self.data[i * self.cols + j];
            }
        }
        res
    }

    /// Element-wise map returning a new matrix.
    pub fn map<F>(&self, functor: F) -> Matrix
    where
        F: Fn(f64) -> f64,
    {
        Matrix {
            rows: self.rows,
            cols: self.cols,
            data: self.data.iter().map(|&x| functor(x)).collect(),
        }
    }

    /// Sum of every element.
    pub fn total(&self) -> f64 {
        self.data.iter().sum()
    }
}

impl Index<(usize, usize)> for Matrix {
    type Output = f64;

    fn index(&self, (row, col): (usize, usize)) -> &f64 {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds for {}x{} matrix", self.rows, self.cols);
        &self.data[row * self.cols + col]
    }
}

impl IndexMut<(usize, usize)> for Matrix {
    fn index_mut(&mut self, (row, col): (usize, usize)) -> &mut f64 {
        assert!(row < self.rows && col < self.cols, "index ({row}, {col}) out of bounds for {}x{} matrix", self.rows, self.cols);
        &mut self.data[row * self.cols + col]
    }
}

/// Column-vector access: `m[row]` is `m[(row, 0)]`.
impl Index<usize> for Matrix {
    type Output = f64;

    fn index(&self, row: usize) -> &f64 {
        &self[(row, 0)]
    }
}

impl IndexMut<usize> for Matrix {
    fn index_mut(&mut self, row: usize) -> &mut f64 {
        &mut self[(row, 0)]
    }
}

impl Add for &Matrix {
    type Output = Matrix;

    fn add(self, rhs: Self) -> Matrix {
        Matrix::sum(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Sub for &Matrix {
    type Output = Matrix;

    fn sub(self, rhs: Self) -> Matrix {
        Matrix::difference(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Mul for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: Self) -> Matrix {
        Matrix::multiply(self, rhs).unwrap_or_else(|e| panic!("{e}"))
    }
}

impl Mul<f64> for &Matrix {
    type Output = Matrix;

    fn mul(self, rhs: f64) -> Matrix {
        self.scaled(rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    fn random(rows: usize, cols: usize, rng: &mut StdRng) -> Matrix {
        Matrix::random_of_size((rows, cols), (-1.0, 1.0), rng).unwrap()
    }

    fn assert_matrix_close(a: &Matrix, b: &Matrix) {
        assert_eq!(a.shape(), b.shape());
        for (x, y) in a.as_slice().iter().zip(b.as_slice()) {
            assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
        }
    }

    #[test]
    fn multiply_known_values() {
        let a = Matrix::from_rows(vec![vec![1.0, 2.0, 3.0], vec![4.0, 5.0, 6.0]]).unwrap();
        let b = Matrix::from_rows(vec![vec![7.0, 8.0], vec![9.0, 10.0], vec![11.0, 12.0]]).unwrap();
        let c = Matrix::multiply(&a, &b).unwrap();
        assert_eq!(c.shape(), (2, 2));
        assert_eq!(c.as_slice(), &[58.0, 64.0, 139.0, 154.0]);
    }

    #[test]
    fn multiply_is_associative_and_distributive() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let (m, n, p, q) = (
                rng.gen_range(1..5),
                rng.gen_range(1..5),
                rng.gen_range(1..5),
                rng.gen_range(1..5),
            );
            let a = random(m, n, &mut rng);
            let b = random(n, p, &mut rng);
            let c = random(p, q, &mut rng);
            assert_matrix_close(&(&(&a * &b) * &c), &(&a * &(&b * &c)));

            let d = random(n, p, &mut rng);
            assert_matrix_close(&(&a * &(&b + &d)), &(&(&a * &b) + &(&a * &d)));
        }
    }

    #[test]
    fn multiply_rejects_incompatible_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(2, 3);
        assert!(matches!(
            Matrix::multiply(&a, &b),
            Err(Error::ShapeMismatch { op: "multiply", left: (2, 3), right: (2, 3) })
        ));
        assert!(Matrix::multiply(&a, &b.transpose()).is_ok());
    }

    #[test]
    fn elementwise_ops_reject_mismatched_shapes() {
        let a = Matrix::zeros(2, 3);
        let b = Matrix::zeros(3, 2);
        assert!(matches!(Matrix::sum(&a, &b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(Matrix::difference(&a, &b), Err(Error::ShapeMismatch { .. })));
        assert!(matches!(Matrix::hadamard(&a, &b), Err(Error::ShapeMismatch { .. })));
        let mut c = a.clone();
        assert!(c.add_in_place(&b).is_err());
        assert!(c.sub_in_place(&b).is_err());
        assert!(c.hadamard_in_place(&b).is_err());
        assert!(c.add_scaled(&b, 2.0).is_err());
    }

    #[test]
    #[should_panic(expected = "shape mismatch in add")]
    fn add_operator_panics_on_mismatch() {
        let _ = &Matrix::zeros(1, 2) + &Matrix::zeros(2, 1);
    }

    #[test]
    fn double_transpose_is_identity() {
        let mut rng = StdRng::seed_from_u64(3);
        let m = random(3, 5, &mut rng);
        assert_eq!(m.transpose().transpose(), m);
        assert_eq!(m.transpose().shape(), (5, 3));
        assert_eq!(m.transpose()[(4, 2)], m[(2, 4)]);
    }

    #[test]
    fn set_transposed_copy_overwrites_destination() {
        let m = Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
        let mut dest = Matrix::zeros(2, 3);
        dest.set_transposed_copy(&m).unwrap();
        assert_eq!(dest, m.transpose());
        assert!(Matrix::zeros(3, 2).set_transposed_copy(&m).is_err());
    }

    #[test]
    fn in_place_and_pure_forms_agree() {
        let a = Matrix::from_column(&[1.0, -2.0, 3.0]);
        let b = Matrix::from_column(&[0.5, 4.0, -1.0]);

        let mut c = a.clone();
        c.add_in_place(&b).unwrap();
        assert_eq!(c, Matrix::sum(&a, &b).unwrap());

        let mut c = a.clone();
        c.hadamard_in_place(&b).unwrap();
        assert_eq!(c.as_slice(), &[0.5, -8.0, -3.0]);

        let mut c = a.clone();
        c.scale(2.0);
        assert_eq!(c, a.scaled(2.0));

        let mut c = a.clone();
        c.add_scalar(1.0);
        assert_eq!(c, a.plus_scalar(1.0));
        c.sub_scalar(1.0);
        assert_eq!(c, a);

        let mut c = a.clone();
        c.add_scaled(&b, -2.0).unwrap();
        assert_eq!(c.as_slice(), &[0.0, -10.0, 5.0]);
    }

    #[test]
    fn evaluate_forms() {
        let src = Matrix::from_column(&[1.0, 2.0]);
        let mut dest = Matrix::column(2);
        dest.set_evaluated(&src, |x| x * x).unwrap();
        assert_eq!(dest.as_slice(), &[1.0, 4.0]);
        assert_eq!(src.map(|x| -x).as_slice(), &[-1.0, -2.0]);
        dest.evaluate_in_place(|x| x + 1.0);
        assert_eq!(dest.as_slice(), &[2.0, 5.0]);
    }

    #[test]
    fn element_access() {
        let mut m = Matrix::column(3);
        m[1] = 2.5;
        assert_eq!(m[(1, 0)], 2.5);
        m.set(2, 0, 1.0).unwrap();
        assert_eq!(m.get(2, 0).unwrap(), 1.0);
        assert!(matches!(m.get(3, 0), Err(Error::IndexOutOfBounds { row: 3, .. })));
        assert!(m.set(0, 1, 0.0).is_err());
    }

    #[test]
    fn from_rows_rejects_ragged_input() {
        assert!(Matrix::from_rows(vec![vec![1.0, 2.0], vec![3.0]]).is_err());
        assert!(Matrix::from_rows(vec![]).is_err());
    }

    #[test]
    fn randomize_stays_in_range() {
        let mut rng = StdRng::seed_from_u64(11);
        let mut m = Matrix::zeros(10, 10);
        m.randomize(-0.5, 0.25, &mut rng).unwrap();
        assert!(m.as_slice().iter().all(|&x| (-0.5..0.25).contains(&x)));
        assert!(matches!(m.randomize(1.0, 1.0, &mut rng), Err(Error::InvalidRange { .. })));

        m.initialize_with(3.0);
        assert!(m.as_slice().iter().all(|&x| x == 3.0));
    }
}
