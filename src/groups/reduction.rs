use log::trace;

use super::abelian_group::AbelianGroup;
use crate::base_ring::field_generals::Field;
use crate::base_ring::valuation::{unit_inverse, PAdicValuation, Prime};
use crate::linear_algebra::basis_propagator::{BasisPropagator, MatrixList};
use crate::linear_algebra::elementary_ops::ElementaryOps;
use crate::linear_algebra::exact_matrix::ExactMatrix;
use crate::error::{Result, StructuralError};
use crate::linear_algebra::BasisIndexing;

mod private {
    pub trait Sealed {}
}

/// Which axis of the working matrix is indexed by the generators being rewritten.
/// Operations along that axis go through the propagator as basis changes,
/// operations along the other axis only touch the working matrix.
pub(crate) trait TrackedAxis: private::Sealed {
    fn working<'p, F: Field>(propagator: &'p BasisPropagator<'_, F>) -> &'p ExactMatrix<F>;

    fn working_mut<'p, F: Field>(
        propagator: &'p mut BasisPropagator<'_, F>,
    ) -> &'p mut ExactMatrix<F>;

    fn entry<F: Field>(
        working: &ExactMatrix<F>,
        tracked: BasisIndexing,
        untracked: BasisIndexing,
    ) -> &F;

    fn tracked_len<F: Field>(working: &ExactMatrix<F>) -> BasisIndexing;

    fn untracked_len<F: Field>(working: &ExactMatrix<F>) -> BasisIndexing;

    /// tracked line `to` += `factor` * tracked line `from`
    fn add_tracked<F: Field>(
        propagator: &mut BasisPropagator<'_, F>,
        from: BasisIndexing,
        to: BasisIndexing,
        factor: F,
    ) -> Result<()>;

    /// untracked line `to` += `factor` * untracked line `from`
    fn add_untracked<F: Field>(
        working: &mut ExactMatrix<F>,
        from: BasisIndexing,
        to: BasisIndexing,
        factor: &F,
    );

    fn scale_untracked<F: Field>(working: &mut ExactMatrix<F>, line: BasisIndexing, factor: &F);

    fn swap_untracked<F: Field>(working: &mut ExactMatrix<F>, a: BasisIndexing, b: BasisIndexing);
}

/// the first "into" matrix is worked on, its rows are the generators
pub(crate) struct Rows;
impl private::Sealed for Rows {}
impl TrackedAxis for Rows {
    fn working<'p, F: Field>(propagator: &'p BasisPropagator<'_, F>) -> &'p ExactMatrix<F> {
        propagator.into_group(0)
    }

    fn working_mut<'p, F: Field>(
        propagator: &'p mut BasisPropagator<'_, F>,
    ) -> &'p mut ExactMatrix<F> {
        propagator.into_group_mut(0)
    }

    fn entry<F: Field>(
        working: &ExactMatrix<F>,
        tracked: BasisIndexing,
        untracked: BasisIndexing,
    ) -> &F {
        &working[(tracked, untracked)]
    }

    fn tracked_len<F: Field>(working: &ExactMatrix<F>) -> BasisIndexing {
        working.height()
    }

    fn untracked_len<F: Field>(working: &ExactMatrix<F>) -> BasisIndexing {
        working.width()
    }

    fn add_tracked<F: Field>(
        propagator: &mut BasisPropagator<'_, F>,
        from: BasisIndexing,
        to: BasisIndexing,
        factor: F,
    ) -> Result<()> {
        propagator.add(to, from, -factor)
    }

    fn add_untracked<F: Field>(
        working: &mut ExactMatrix<F>,
        from: BasisIndexing,
        to: BasisIndexing,
        factor: &F,
    ) {
        working.col_add(from, to, factor);
    }

    fn scale_untracked<F: Field>(working: &mut ExactMatrix<F>, line: BasisIndexing, factor: &F) {
        working.col_mul(line, factor);
    }

    fn swap_untracked<F: Field>(working: &mut ExactMatrix<F>, a: BasisIndexing, b: BasisIndexing) {
        working.col_swap(a, b);
    }
}

/// the first "out of" matrix is worked on, its columns are the generators
pub(crate) struct Columns;
impl private::Sealed for Columns {}
impl TrackedAxis for Columns {
    fn working<'p, F: Field>(propagator: &'p BasisPropagator<'_, F>) -> &'p ExactMatrix<F> {
        propagator.out_of_group(0)
    }

    fn working_mut<'p, F: Field>(
        propagator: &'p mut BasisPropagator<'_, F>,
    ) -> &'p mut ExactMatrix<F> {
        propagator.out_of_group_mut(0)
    }

    fn entry<F: Field>(
        working: &ExactMatrix<F>,
        tracked: BasisIndexing,
        untracked: BasisIndexing,
    ) -> &F {
        &working[(untracked, tracked)]
    }

    fn tracked_len<F: Field>(working: &ExactMatrix<F>) -> BasisIndexing {
        working.width()
    }

    fn untracked_len<F: Field>(working: &ExactMatrix<F>) -> BasisIndexing {
        working.height()
    }

    fn add_tracked<F: Field>(
        propagator: &mut BasisPropagator<'_, F>,
        from: BasisIndexing,
        to: BasisIndexing,
        factor: F,
    ) -> Result<()> {
        propagator.add(from, to, factor)
    }

    fn add_untracked<F: Field>(
        working: &mut ExactMatrix<F>,
        from: BasisIndexing,
        to: BasisIndexing,
        factor: &F,
    ) {
        working.row_add(from, to, factor);
    }

    fn scale_untracked<F: Field>(working: &mut ExactMatrix<F>, line: BasisIndexing, factor: &F) {
        working.row_mul(line, factor);
    }

    fn swap_untracked<F: Field>(working: &mut ExactMatrix<F>, a: BasisIndexing, b: BasisIndexing) {
        working.row_swap(a, b);
    }
}

/// nonzero entry of least valuation outside the first `done` tracked and untracked lines
fn find_pivot<A: TrackedAxis, F: PAdicValuation>(
    working: &ExactMatrix<F>,
    prime: Prime,
    done: BasisIndexing,
) -> Option<(BasisIndexing, BasisIndexing, i64)> {
    let mut best: Option<(BasisIndexing, BasisIndexing, i64)> = None;
    for tracked in done..A::tracked_len(working) {
        for untracked in done..A::untracked_len(working) {
            let Some(valuation) = A::entry(working, tracked, untracked).valuation(prime) else {
                continue;
            };
            if best.map_or(true, |(_, _, best_valuation)| valuation < best_valuation) {
                best = Some((tracked, untracked, valuation));
            }
        }
    }
    best
}

/// Smith form of the working matrix over the integers localized at `prime`.
/// Afterwards the working matrix is zero except for `p^v_k` at `(k, k)`,
/// and the returned `v_k` are nondecreasing.
pub(crate) fn diagonalize<A: TrackedAxis, F: PAdicValuation>(
    prime: Prime,
    propagator: &mut BasisPropagator<'_, F>,
) -> Result<Vec<i64>> {
    let mut pivots: Vec<i64> = Vec::new();
    loop {
        let k = pivots.len();
        let Some((tracked, untracked, valuation)) =
            find_pivot::<A, F>(A::working(propagator), prime, k)
        else {
            break;
        };
        trace!("pivot {k} from ({tracked}, {untracked}) with valuation {valuation}");
        if tracked != k {
            propagator.swap(k, tracked)?;
        }
        let working = A::working_mut(propagator);
        if untracked != k {
            A::swap_untracked(working, k, untracked);
        }
        let normalizer = unit_inverse(A::entry(working, k, k), prime);
        if !normalizer.is_one() {
            A::scale_untracked(working, k, &normalizer);
        }
        let pivot = A::entry(working, k, k).clone();

        let tracked_len = A::tracked_len(working);
        for other in k + 1..tracked_len {
            let factor = {
                let entry = A::entry(A::working(propagator), other, k);
                if entry.is_zero() {
                    continue;
                }
                -(entry.clone() / pivot.clone())
            };
            A::add_tracked(propagator, k, other, factor)?;
        }

        let working = A::working_mut(propagator);
        for other in k + 1..A::untracked_len(working) {
            let entry = A::entry(working, k, other);
            if entry.is_zero() {
                continue;
            }
            let factor = -(entry.clone() / pivot.clone());
            A::add_untracked(working, k, other, &factor);
        }
        pivots.push(valuation);
    }
    Ok(pivots)
}

/// Read off the group presented by a diagonalized relation matrix with `lines` generators.
/// Generators without a pivot are free, pivot `p^v` with `v > 0` leaves `Z/p^v`,
/// any other pivot kills its generator.
/// Also returns which generators survive, in the order of the new group.
/// An exponent past `u32::MAX` is an error rather than a truncation.
pub(crate) fn classify(
    pivots: &[i64],
    lines: BasisIndexing,
) -> Result<(AbelianGroup, Vec<BasisIndexing>)> {
    let free: Vec<BasisIndexing> = (pivots.len()..lines).collect();
    let mut kept = free.clone();
    let mut torsion = Vec::new();
    for (line, valuation) in pivots.iter().enumerate() {
        if *valuation > 0 {
            let exponent = u32::try_from(*valuation).map_err(|_| {
                StructuralError::ExponentOverflow {
                    valuation: *valuation,
                }
            })?;
            kept.push(line);
            torsion.push(exponent);
        }
    }
    Ok((AbelianGroup::new(free.len(), torsion), kept))
}

/// `p^e` on the diagonal below the free generators, one column per torsion generator
pub(crate) fn relation_columns<F: PAdicValuation>(
    prime: Prime,
    group: &AbelianGroup,
) -> ExactMatrix<F> {
    let mut relations = ExactMatrix::zero_matrix(group.rank(), group.tor_rank());
    for (tor_idx, exponent) in group.torsion().iter().enumerate() {
        relations[(group.free_rank() + tor_idx, tor_idx)] =
            F::prime_power(prime, i64::from(*exponent));
    }
    relations
}

/// the propagator's own matrices first, then the caller's
pub(crate) fn tracked_lists<'s, F: Field>(
    own: impl IntoIterator<Item = &'s mut ExactMatrix<F>>,
    caller: MatrixList<'s, F>,
) -> MatrixList<'s, F> {
    let mut list: MatrixList<'s, F> = own.into_iter().collect();
    for matrix in caller {
        list.push(matrix);
    }
    list
}
