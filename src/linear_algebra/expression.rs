use super::exact_matrix::ExactMatrix;
use super::BasisIndexing;
use crate::base_ring::field_generals::Ring;
use crate::error::{check_dimension, Result};

/// Anything that can report its shape and produce one entry on demand.
/// Composite terms built from these are only evaluated when materialized.
pub trait MatrixExpression<F: Ring> {
    fn height(&self) -> BasisIndexing;

    fn width(&self) -> BasisIndexing;

    /// the entry at `(row, col)`, both assumed in bounds
    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F;

    fn dimensions(&self) -> (BasisIndexing, BasisIndexing) {
        (self.height(), self.width())
    }

    /// one evaluation per cell in row-major order
    fn materialize(&self) -> ExactMatrix<F> {
        ExactMatrix::from_expression(self)
    }
}

/// the square identity of any size over any ring
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct IdentityMatrix {
    dimension: BasisIndexing,
}

impl IdentityMatrix {
    #[must_use]
    pub fn new(dimension: BasisIndexing) -> Self {
        Self { dimension }
    }
}

impl<F: Ring> MatrixExpression<F> for IdentityMatrix {
    fn height(&self) -> BasisIndexing {
        self.dimension
    }

    fn width(&self) -> BasisIndexing {
        self.dimension
    }

    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F {
        if row == col {
            F::one()
        } else {
            F::zero()
        }
    }
}

/// `left * right` evaluated lazily
pub struct Product<'a, L: ?Sized, R: ?Sized> {
    left: &'a L,
    right: &'a R,
}

impl<'a, L: ?Sized, R: ?Sized> Product<'a, L, R> {
    /// # Errors
    /// the inner dimensions disagree
    pub fn new<F: Ring>(left: &'a L, right: &'a R) -> Result<Self>
    where
        L: MatrixExpression<F>,
        R: MatrixExpression<F>,
    {
        check_dimension("Product::new", left.width(), right.height())?;
        Ok(Self { left, right })
    }
}

impl<'a, F: Ring, L, R> MatrixExpression<F> for Product<'a, L, R>
where
    L: MatrixExpression<F> + ?Sized,
    R: MatrixExpression<F> + ?Sized,
{
    fn height(&self) -> BasisIndexing {
        self.left.height()
    }

    fn width(&self) -> BasisIndexing {
        self.right.width()
    }

    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F {
        let mut acc = F::zero();
        for k in 0..self.left.width() {
            acc += self.left.read(row, k) * self.right.read(k, col);
        }
        acc
    }
}

/// `left + right` evaluated lazily
pub struct Sum<'a, L: ?Sized, R: ?Sized> {
    left: &'a L,
    right: &'a R,
}

impl<'a, L: ?Sized, R: ?Sized> Sum<'a, L, R> {
    /// # Errors
    /// the shapes disagree
    pub fn new<F: Ring>(left: &'a L, right: &'a R) -> Result<Self>
    where
        L: MatrixExpression<F>,
        R: MatrixExpression<F>,
    {
        check_dimension("Sum::new", left.height(), right.height())?;
        check_dimension("Sum::new", left.width(), right.width())?;
        Ok(Self { left, right })
    }
}

impl<'a, F: Ring, L, R> MatrixExpression<F> for Sum<'a, L, R>
where
    L: MatrixExpression<F> + ?Sized,
    R: MatrixExpression<F> + ?Sized,
{
    fn height(&self) -> BasisIndexing {
        self.left.height()
    }

    fn width(&self) -> BasisIndexing {
        self.left.width()
    }

    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F {
        self.left.read(row, col) + self.right.read(row, col)
    }
}

pub struct Transposed<'a, E: ?Sized> {
    inner: &'a E,
}

impl<'a, E: ?Sized> Transposed<'a, E> {
    #[must_use]
    pub fn new(inner: &'a E) -> Self {
        Self { inner }
    }
}

impl<'a, F: Ring, E: MatrixExpression<F> + ?Sized> MatrixExpression<F> for Transposed<'a, E> {
    fn height(&self) -> BasisIndexing {
        self.inner.width()
    }

    fn width(&self) -> BasisIndexing {
        self.inner.height()
    }

    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F {
        self.inner.read(col, row)
    }
}

#[cfg(test)]
mod test {
    use super::{IdentityMatrix, MatrixExpression, Product, Sum, Transposed};
    use crate::linear_algebra::exact_matrix::ExactMatrix;
    use num::BigRational;
    use proptest::prelude::*;

    type Q = BigRational;

    fn integer_matrix(
        height: usize,
        width: usize,
    ) -> impl Strategy<Value = ExactMatrix<Q>> {
        proptest::collection::vec(-9_i64..10, height * width).prop_map(move |entries| {
            ExactMatrix::from_fn(height, width, |row, col| {
                Q::from_integer(entries[row * width + col].into())
            })
        })
    }

    proptest! {
        #[test]
        fn product_is_associative(
            a in integer_matrix(2, 3),
            b in integer_matrix(3, 4),
            c in integer_matrix(4, 2),
        ) {
            let ab = a.multiply(&b).unwrap();
            let bc = b.multiply(&c).unwrap();
            prop_assert_eq!(ab.multiply(&c).unwrap(), a.multiply(&bc).unwrap());
            let lazy_ab = Product::new(&a, &b).unwrap();
            let lazy_abc = Product::new(&lazy_ab, &c).unwrap();
            prop_assert_eq!(lazy_abc.materialize(), a.multiply(&bc).unwrap());
        }

        #[test]
        fn transpose_reverses_products(
            a in integer_matrix(3, 2),
            b in integer_matrix(2, 3),
        ) {
            let ab = a.multiply(&b).unwrap();
            let bt_at = b.transpose().multiply(&a.transpose()).unwrap();
            prop_assert_eq!(Transposed::new(&ab).materialize(), bt_at);
        }
    }

    #[test]
    fn identity_and_sum() {
        let m = ExactMatrix::<Q>::from_integer_rows(&[[1, 2], [3, 4], [5, 6]]).unwrap();
        let id3 = IdentityMatrix::new(3);
        let id2 = IdentityMatrix::new(2);
        let left_id = Product::new(&id3, &m).unwrap();
        assert_eq!(left_id.materialize(), m);
        let right_id = Product::new(&m, &id2).unwrap();
        assert_eq!(right_id.materialize(), m);
        assert!(Product::new(&m, &IdentityMatrix::new(3)).is_err());

        let doubled = Sum::new(&m, &m).unwrap().materialize();
        let expected = ExactMatrix::<Q>::from_integer_rows(&[[2, 4], [6, 8], [10, 12]]).unwrap();
        assert_eq!(doubled, expected);
        assert!(Sum::new(&m, &m.transpose()).is_err());
        assert_eq!(MatrixExpression::<Q>::dimensions(&IdentityMatrix::new(4)), (4, 4));
    }
}
