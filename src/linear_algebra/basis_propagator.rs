use super::elementary_ops::ElementaryOps;
use super::exact_matrix::ExactMatrix;
use super::BasisIndexing;
use crate::base_ring::field_generals::Field;
use crate::error::{check_dimension, Result, StructuralError};

/// One elementary change of the generators of a group G.
#[derive(PartialEq, Eq, Clone, Debug)]
pub enum BasisChange<F: Field> {
    /// Add(i1, i2, λ): the new generator `i2` is `g_i2 + λ g_i1`
    Add(BasisIndexing, BasisIndexing, F),
    /// Scale(i, λ): the new generator `i` is `λ g_i`, λ must be invertible
    Scale(BasisIndexing, F),
    /// exchange generators `i1` and `i2`
    Swap(BasisIndexing, BasisIndexing),
}

impl<F: Field> BasisChange<F> {
    /// the change that undoes this one,
    /// `None` for adding a generator to itself or scaling by zero
    #[must_use]
    pub fn inverse(self) -> Option<Self> {
        match self {
            Self::Add(i1, i2, _) if i1 == i2 => None,
            Self::Add(i1, i2, lambda) => Some(Self::Add(i1, i2, -lambda)),
            Self::Scale(i, lambda) => lambda
                .inverse()
                .map(|lambda_inverse| Self::Scale(i, lambda_inverse)),
            Self::Swap(i1, i2) => Some(Self::Swap(i1, i2)),
        }
    }
}

pub type MatrixList<'a, F> = Vec<&'a mut ExactMatrix<F>>;

/// Keeps matrices in step with the generators of one group of `rank` generators.
/// Rows of the `into_group` matrices and columns of the `out_of_group` matrices
/// are indexed by those generators.
/// The group's own record (free rank, exponents) is never touched here.
pub struct BasisPropagator<'a, F: Field> {
    rank: BasisIndexing,
    into_group: MatrixList<'a, F>,
    out_of_group: MatrixList<'a, F>,
}

impl<'a, F: Field> BasisPropagator<'a, F> {
    /// # Errors
    /// an into matrix whose height, or an out of matrix whose width,
    /// is not `rank`
    pub fn new(
        rank: BasisIndexing,
        into_group: MatrixList<'a, F>,
        out_of_group: MatrixList<'a, F>,
    ) -> Result<Self> {
        for matrix in &into_group {
            check_dimension("BasisPropagator into group", rank, matrix.height())?;
        }
        for matrix in &out_of_group {
            check_dimension("BasisPropagator out of group", rank, matrix.width())?;
        }
        Ok(Self {
            rank,
            into_group,
            out_of_group,
        })
    }

    #[must_use]
    pub fn rank(&self) -> BasisIndexing {
        self.rank
    }

    fn invalid(&self, generator: BasisIndexing, reason: &'static str) -> StructuralError {
        StructuralError::InvalidBasisChange {
            reason,
            generator,
            rank: self.rank,
        }
    }

    fn check_generator(&self, generator: BasisIndexing) -> Result<()> {
        if generator < self.rank {
            Ok(())
        } else {
            Err(self.invalid(generator, "no such generator"))
        }
    }

    /// rewrite every tracked matrix for the new generators
    /// # Errors
    /// an index past `rank`, a generator added to itself, or scaling by zero;
    /// nothing is written in those cases
    pub fn apply(&mut self, change: &BasisChange<F>) -> Result<()> {
        match change {
            BasisChange::Add(i1, i2, lambda) => {
                self.check_generator(*i1)?;
                self.check_generator(*i2)?;
                if i1 == i2 {
                    return Err(self.invalid(*i1, "a generator cannot be added to itself"));
                }
                let minus_lambda = -lambda.clone();
                for matrix in &mut self.into_group {
                    matrix.row_add(*i2, *i1, &minus_lambda);
                }
                for matrix in &mut self.out_of_group {
                    matrix.col_add(*i1, *i2, lambda);
                }
            }
            BasisChange::Scale(i, lambda) => {
                self.check_generator(*i)?;
                let lambda_inverse = lambda
                    .inverse()
                    .ok_or_else(|| self.invalid(*i, "scaling by zero"))?;
                for matrix in &mut self.into_group {
                    matrix.row_mul(*i, &lambda_inverse);
                }
                for matrix in &mut self.out_of_group {
                    matrix.col_mul(*i, lambda);
                }
            }
            BasisChange::Swap(i1, i2) => {
                self.check_generator(*i1)?;
                self.check_generator(*i2)?;
                for matrix in &mut self.into_group {
                    matrix.row_swap(*i2, *i1);
                }
                for matrix in &mut self.out_of_group {
                    matrix.col_swap(*i1, *i2);
                }
            }
        }
        Ok(())
    }

    /// # Errors
    /// see `apply`
    pub fn add(&mut self, i1: BasisIndexing, i2: BasisIndexing, lambda: F) -> Result<()> {
        self.apply(&BasisChange::Add(i1, i2, lambda))
    }

    /// # Errors
    /// see `apply`
    pub fn scale(&mut self, i: BasisIndexing, lambda: F) -> Result<()> {
        self.apply(&BasisChange::Scale(i, lambda))
    }

    /// # Errors
    /// see `apply`
    pub fn swap(&mut self, i1: BasisIndexing, i2: BasisIndexing) -> Result<()> {
        self.apply(&BasisChange::Swap(i1, i2))
    }

    #[must_use]
    pub fn into_group(&self, idx: usize) -> &ExactMatrix<F> {
        &*self.into_group[idx]
    }

    pub fn into_group_mut(&mut self, idx: usize) -> &mut ExactMatrix<F> {
        &mut *self.into_group[idx]
    }

    #[must_use]
    pub fn out_of_group(&self, idx: usize) -> &ExactMatrix<F> {
        &*self.out_of_group[idx]
    }

    pub fn out_of_group_mut(&mut self, idx: usize) -> &mut ExactMatrix<F> {
        &mut *self.out_of_group[idx]
    }
}

#[cfg(test)]
mod test {
    use super::{BasisChange, BasisPropagator};
    use crate::error::StructuralError;
    use crate::linear_algebra::exact_matrix::ExactMatrix;
    use num::BigRational;
    use proptest::prelude::*;

    type Q = BigRational;

    fn q(value: i64) -> Q {
        Q::from_integer(value.into())
    }

    fn basis_change(rank: usize) -> impl Strategy<Value = BasisChange<Q>> {
        prop_oneof![
            (0..rank, 0..rank, -4_i64..5)
                .prop_filter("distinct generators", |(i1, i2, _)| i1 != i2)
                .prop_map(|(i1, i2, lambda)| BasisChange::Add(i1, i2, q(lambda))),
            (0..rank, 1_i64..5, any::<bool>()).prop_map(|(i, lambda, negate)| {
                BasisChange::Scale(i, if negate { q(-lambda) } else { q(lambda) })
            }),
            (0..rank, 0..rank).prop_map(|(i1, i2)| BasisChange::Swap(i1, i2)),
        ]
    }

    fn matrix(height: usize, width: usize) -> impl Strategy<Value = ExactMatrix<Q>> {
        proptest::collection::vec(-9_i64..10, height * width).prop_map(move |entries| {
            ExactMatrix::from_fn(height, width, |row, col| q(entries[row * width + col]))
        })
    }

    proptest! {
        #[test]
        fn inverse_restores_everything(
            changes in proptest::collection::vec(basis_change(4), 1..8),
            mut into in matrix(4, 3),
            mut out_of in matrix(2, 4),
        ) {
            let into_before = into.clone();
            let out_of_before = out_of.clone();
            let mut propagator = BasisPropagator::new(4, vec![&mut into], vec![&mut out_of]).unwrap();
            for change in &changes {
                propagator.apply(change).unwrap();
            }
            for change in changes.into_iter().rev() {
                propagator.apply(&change.inverse().unwrap()).unwrap();
            }
            drop(propagator);
            prop_assert_eq!(into, into_before);
            prop_assert_eq!(out_of, out_of_before);
        }

        #[test]
        fn composite_is_preserved(
            changes in proptest::collection::vec(basis_change(3), 0..8),
            mut into in matrix(3, 2),
            mut out_of in matrix(2, 3),
        ) {
            let composite_before = out_of.multiply(&into).unwrap();
            let mut propagator = BasisPropagator::new(3, vec![&mut into], vec![&mut out_of]).unwrap();
            for change in &changes {
                propagator.apply(change).unwrap();
            }
            drop(propagator);
            prop_assert_eq!(out_of.multiply(&into).unwrap(), composite_before);
        }
    }

    #[test]
    fn rows_and_columns_move() {
        let mut into = ExactMatrix::<Q>::from_integer_rows(&[[1, 0], [0, 1]]).unwrap();
        let mut out_of = ExactMatrix::<Q>::from_integer_rows(&[[1, 0], [0, 1]]).unwrap();
        let mut propagator =
            BasisPropagator::new(2, vec![&mut into], vec![&mut out_of]).unwrap();
        propagator.add(0, 1, q(3)).unwrap();
        assert_eq!(
            *propagator.into_group(0),
            ExactMatrix::from_integer_rows(&[[1, -3], [0, 1]]).unwrap()
        );
        assert_eq!(
            *propagator.out_of_group(0),
            ExactMatrix::from_integer_rows(&[[1, 3], [0, 1]]).unwrap()
        );
        propagator.scale(1, q(2)).unwrap();
        propagator.swap(0, 1).unwrap();
        drop(propagator);
        let half = Q::new(1.into(), 2.into());
        assert_eq!(
            into,
            ExactMatrix::from_rows(&[vec![q(0), half], vec![q(1), q(-3)]]).unwrap()
        );
        assert_eq!(
            out_of,
            ExactMatrix::from_integer_rows(&[[6, 1], [2, 0]]).unwrap()
        );
    }

    #[test]
    fn shapes_checked_up_front() {
        let mut tall = ExactMatrix::<Q>::zero_matrix(3, 1);
        let mut wide = ExactMatrix::<Q>::zero_matrix(1, 2);
        assert!(matches!(
            BasisPropagator::new(3, vec![&mut tall], vec![&mut wide]),
            Err(StructuralError::DimensionMismatch { expected: 3, found: 2, .. })
        ));
    }

    #[test]
    fn degenerate_changes_write_nothing() {
        let mut into = ExactMatrix::<Q>::from_integer_rows(&[[1, 2], [3, 4]]).unwrap();
        let mut out_of = ExactMatrix::<Q>::from_integer_rows(&[[5, 6], [7, 8]]).unwrap();
        let into_before = into.clone();
        let out_of_before = out_of.clone();
        let composite_before = out_of.multiply(&into).unwrap();
        let mut propagator =
            BasisPropagator::new(2, vec![&mut into], vec![&mut out_of]).unwrap();
        assert!(matches!(
            propagator.add(1, 1, q(1)),
            Err(StructuralError::InvalidBasisChange { generator: 1, rank: 2, .. })
        ));
        assert!(matches!(
            propagator.scale(0, q(0)),
            Err(StructuralError::InvalidBasisChange { generator: 0, .. })
        ));
        assert!(matches!(
            propagator.swap(0, 2),
            Err(StructuralError::InvalidBasisChange { generator: 2, .. })
        ));
        assert!(propagator.add(2, 0, q(1)).is_err());
        drop(propagator);
        assert_eq!(into, into_before);
        assert_eq!(out_of, out_of_before);
        assert_eq!(out_of.multiply(&into).unwrap(), composite_before);
    }

    #[test]
    fn degenerate_changes_have_no_inverse() {
        assert_eq!(BasisChange::Add(1, 1, q(1)).inverse(), None);
        assert_eq!(BasisChange::Scale(0, q(0)).inverse(), None);
        assert_eq!(
            BasisChange::Scale(0, q(4)).inverse(),
            Some(BasisChange::Scale(0, Q::new(1.into(), 4.into())))
        );
        assert_eq!(BasisChange::Add(0, 1, q(2)).inverse(), Some(BasisChange::Add(0, 1, q(-2))));
    }
}
