use core::fmt;
use core::ops::{Index, IndexMut};

use super::expression::{MatrixExpression, Product};
use super::view::{MatrixView, MatrixViewMut, Rect};
use super::BasisIndexing;
use crate::base_ring::field_generals::{IntegerType, Ring};
use crate::error::{check_dimension, Result};

/// Dense matrix over an exact ring, stored row-major.
/// The dimensions are fixed at construction.
#[derive(PartialEq, Eq, Clone, Debug)]
pub struct ExactMatrix<F: Ring> {
    height: BasisIndexing,
    width: BasisIndexing,
    entries: Vec<F>,
}

impl<F: Ring> ExactMatrix<F> {
    #[must_use]
    pub fn zero_matrix(height: BasisIndexing, width: BasisIndexing) -> Self {
        Self {
            height,
            width,
            entries: vec![F::zero(); height * width],
        }
    }

    #[must_use]
    pub fn identity(dimension: BasisIndexing) -> Self {
        let mut to_return = Self::zero_matrix(dimension, dimension);
        for idx in 0..dimension {
            to_return[(idx, idx)] = F::one();
        }
        to_return
    }

    /// every cell from `entry(row, col)`, visited row-major
    pub fn from_fn(
        height: BasisIndexing,
        width: BasisIndexing,
        mut entry: impl FnMut(BasisIndexing, BasisIndexing) -> F,
    ) -> Self {
        let mut entries = Vec::with_capacity(height * width);
        for row in 0..height {
            for col in 0..width {
                entries.push(entry(row, col));
            }
        }
        Self {
            height,
            width,
            entries,
        }
    }

    /// the height is the number of rows and the width that of the first row
    /// no rows at all gives the 0x0 matrix
    /// # Errors
    /// a row whose length differs from the first
    pub fn from_rows<R: AsRef<[F]>>(rows: &[R]) -> Result<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, |row| row.as_ref().len());
        let mut entries = Vec::with_capacity(height * width);
        for row in rows {
            let row = row.as_ref();
            check_dimension("ExactMatrix::from_rows", width, row.len())?;
            entries.extend(row.iter().cloned());
        }
        Ok(Self {
            height,
            width,
            entries,
        })
    }

    /// same as `from_rows` with every entry the image of an integer
    /// # Errors
    /// ragged rows
    pub fn from_integer_rows<R: AsRef<[IntegerType]>>(rows: &[R]) -> Result<Self> {
        let converted: Vec<Vec<F>> = rows
            .iter()
            .map(|row| row.as_ref().iter().map(|z| F::from_integer(*z)).collect())
            .collect();
        Self::from_rows(&converted)
    }

    /// evaluate every cell of `expression` exactly once
    pub fn from_expression<E: MatrixExpression<F> + ?Sized>(expression: &E) -> Self {
        Self::from_fn(expression.height(), expression.width(), |row, col| {
            expression.read(row, col)
        })
    }

    #[must_use]
    pub fn height(&self) -> BasisIndexing {
        self.height
    }

    #[must_use]
    pub fn width(&self) -> BasisIndexing {
        self.width
    }

    #[must_use]
    pub fn dimensions(&self) -> (BasisIndexing, BasisIndexing) {
        (self.height, self.width)
    }

    #[must_use]
    pub fn is_zero_matrix(&self) -> bool {
        self.entries.iter().all(F::is_zero)
    }

    #[must_use]
    pub fn row(&self, row: BasisIndexing) -> &[F] {
        &self.entries[row * self.width..(row + 1) * self.width]
    }

    /// `self * rhs`, each cell summed up from zero
    /// # Errors
    /// `self.width() != rhs.height()`
    pub fn multiply<E: MatrixExpression<F> + ?Sized>(&self, rhs: &E) -> Result<Self> {
        let product = Product::new(self, rhs)?;
        Ok(Self::from_expression(&product))
    }

    #[must_use]
    pub fn transpose(&self) -> Self {
        Self::from_fn(self.width, self.height, |row, col| self[(col, row)].clone())
    }

    /// `[self | rhs]`
    /// # Errors
    /// the heights differ
    pub fn concat_columns(&self, rhs: &Self) -> Result<Self> {
        check_dimension("ExactMatrix::concat_columns", self.height, rhs.height)?;
        Ok(Self::from_fn(self.height, self.width + rhs.width, |row, col| {
            if col < self.width {
                self[(row, col)].clone()
            } else {
                rhs[(row, col - self.width)].clone()
            }
        }))
    }

    /// the listed rows in the listed order
    #[must_use]
    pub fn select_rows(&self, rows: &[BasisIndexing]) -> Self {
        Self::from_fn(rows.len(), self.width, |row, col| {
            self[(rows[row], col)].clone()
        })
    }

    /// the listed columns in the listed order
    #[must_use]
    pub fn select_columns(&self, cols: &[BasisIndexing]) -> Self {
        Self::from_fn(self.height, cols.len(), |row, col| {
            self[(row, cols[col])].clone()
        })
    }

    /// read-only window
    /// # Errors
    /// `rect` does not fit inside `self`
    pub fn view(&self, rect: Rect) -> Result<MatrixView<'_, F>> {
        MatrixView::new(self, rect)
    }

    /// writable window
    /// # Errors
    /// `rect` does not fit inside `self`
    pub fn view_mut(&mut self, rect: Rect) -> Result<MatrixViewMut<'_, F>> {
        MatrixViewMut::new(self, rect)
    }

    pub(crate) fn entries_mut(&mut self) -> &mut [F] {
        &mut self.entries
    }
}

impl<F: Ring> Index<(BasisIndexing, BasisIndexing)> for ExactMatrix<F> {
    type Output = F;

    fn index(&self, (row, col): (BasisIndexing, BasisIndexing)) -> &F {
        debug_assert!(row < self.height && col < self.width);
        &self.entries[row * self.width + col]
    }
}

impl<F: Ring> IndexMut<(BasisIndexing, BasisIndexing)> for ExactMatrix<F> {
    fn index_mut(&mut self, (row, col): (BasisIndexing, BasisIndexing)) -> &mut F {
        debug_assert!(row < self.height && col < self.width);
        &mut self.entries[row * self.width + col]
    }
}

impl<F: Ring> MatrixExpression<F> for ExactMatrix<F> {
    fn height(&self) -> BasisIndexing {
        self.height
    }

    fn width(&self) -> BasisIndexing {
        self.width
    }

    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F {
        self[(row, col)].clone()
    }
}

impl<F: Ring + fmt::Display> fmt::Display for ExactMatrix<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Matrix ({}x{})", self.height, self.width)?;
        for row in 0..self.height {
            for entry in self.row(row) {
                write!(f, "{entry} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use super::ExactMatrix;
    use crate::error::StructuralError;
    use num::BigRational;

    type Q = BigRational;

    #[test]
    fn composition() {
        let a = ExactMatrix::<Q>::from_integer_rows(&[[1, 0, 1], [0, 1, 1]]).expect("rectangular");
        let b = ExactMatrix::<Q>::from_integer_rows(&[[1, 0], [0, 1], [1, 1]]).expect("rectangular");
        let c = a.multiply(&b).expect("2x3 times 3x2");
        let c_expected = ExactMatrix::<Q>::from_integer_rows(&[[2, 1], [1, 2]]).expect("rectangular");
        assert_eq!(c, c_expected);
        assert!(matches!(
            a.multiply(&a),
            Err(StructuralError::DimensionMismatch {
                expected: 3,
                found: 2,
                ..
            })
        ));
    }

    #[test]
    fn construction() {
        let empty = ExactMatrix::<Q>::from_integer_rows::<[i64; 0]>(&[]).expect("no rows");
        assert_eq!(empty.dimensions(), (0, 0));
        let ragged = ExactMatrix::<Q>::from_rows(&[vec![Q::from_integer(1.into())], vec![]]);
        assert!(matches!(
            ragged,
            Err(StructuralError::DimensionMismatch { .. })
        ));
        let zero = ExactMatrix::<Q>::zero_matrix(2, 3);
        assert!(zero.is_zero_matrix());
        assert_eq!(zero.dimensions(), (2, 3));
        let id = ExactMatrix::<Q>::identity(3);
        let id_expected =
            ExactMatrix::<Q>::from_integer_rows(&[[1, 0, 0], [0, 1, 0], [0, 0, 1]]).expect("square");
        assert_eq!(id, id_expected);
        let mut m = ExactMatrix::<Q>::zero_matrix(2, 2);
        m[(1, 0)] = Q::from_integer(7.into());
        assert_eq!(m.row(1), &[Q::from_integer(7.into()), Q::from_integer(0.into())]);
        assert_ne!(m, ExactMatrix::<Q>::zero_matrix(2, 2));
        assert_ne!(ExactMatrix::<Q>::zero_matrix(2, 3), ExactMatrix::<Q>::zero_matrix(3, 2));
    }

    #[test]
    fn reshaping() {
        let m = ExactMatrix::<Q>::from_integer_rows(&[[1, 2, 3], [4, 5, 6]]).expect("rectangular");
        let t = ExactMatrix::<Q>::from_integer_rows(&[[1, 4], [2, 5], [3, 6]]).expect("rectangular");
        assert_eq!(m.transpose(), t);
        let cols = ExactMatrix::<Q>::from_integer_rows(&[[3, 1], [6, 4]]).expect("rectangular");
        assert_eq!(m.select_columns(&[2, 0]), cols);
        let rows = ExactMatrix::<Q>::from_integer_rows(&[[4, 5, 6]]).expect("rectangular");
        assert_eq!(m.select_rows(&[1]), rows);
        let glued = m.concat_columns(&ExactMatrix::identity(2)).expect("same height");
        let glued_expected =
            ExactMatrix::<Q>::from_integer_rows(&[[1, 2, 3, 1, 0], [4, 5, 6, 0, 1]]).expect("rectangular");
        assert_eq!(glued, glued_expected);
        assert!(m.concat_columns(&t).is_err());
    }

    #[test]
    fn display() {
        let m = ExactMatrix::<Q>::from_integer_rows(&[[1, -2]]).expect("rectangular");
        assert_eq!(format!("{m}"), "Matrix (1x2)\n1 -2 \n");
    }
}
