use super::exact_matrix::ExactMatrix;
use super::BasisIndexing;
use crate::base_ring::field_generals::Ring;

/// The in-place row and column operations every reduction is made of.
/// Indices are assumed in bounds.
pub trait ElementaryOps<F: Ring> {
    /// row `i2` += `factor` * row `i1`
    fn row_add(&mut self, i1: BasisIndexing, i2: BasisIndexing, factor: &F);

    fn row_mul(&mut self, i: BasisIndexing, factor: &F);

    fn row_swap(&mut self, i1: BasisIndexing, i2: BasisIndexing);

    /// column `j2` += `factor` * column `j1`
    fn col_add(&mut self, j1: BasisIndexing, j2: BasisIndexing, factor: &F);

    fn col_mul(&mut self, j: BasisIndexing, factor: &F);

    fn col_swap(&mut self, j1: BasisIndexing, j2: BasisIndexing);
}

impl<F: Ring> ElementaryOps<F> for ExactMatrix<F> {
    fn row_add(&mut self, i1: BasisIndexing, i2: BasisIndexing, factor: &F) {
        if factor.is_zero() {
            return;
        }
        // the source row is read before anything is written so i1 == i2 doubles correctly
        let source: Vec<F> = self.row(i1).to_vec();
        for (col, entry) in source.into_iter().enumerate() {
            if entry.is_zero() {
                continue;
            }
            let mut summand = factor.clone();
            summand.mul_assign_borrow(&entry);
            self[(i2, col)] += summand;
        }
    }

    fn row_mul(&mut self, i: BasisIndexing, factor: &F) {
        for col in 0..self.width() {
            self[(i, col)].mul_assign_borrow(factor);
        }
    }

    fn row_swap(&mut self, i1: BasisIndexing, i2: BasisIndexing) {
        if i1 == i2 {
            return;
        }
        let width = self.width();
        let entries = self.entries_mut();
        for col in 0..width {
            entries.swap(i1 * width + col, i2 * width + col);
        }
    }

    fn col_add(&mut self, j1: BasisIndexing, j2: BasisIndexing, factor: &F) {
        if factor.is_zero() {
            return;
        }
        for row in 0..self.height() {
            let entry = self[(row, j1)].clone();
            if entry.is_zero() {
                continue;
            }
            let mut summand = factor.clone();
            summand.mul_assign_borrow(&entry);
            self[(row, j2)] += summand;
        }
    }

    fn col_mul(&mut self, j: BasisIndexing, factor: &F) {
        for row in 0..self.height() {
            self[(row, j)].mul_assign_borrow(factor);
        }
    }

    fn col_swap(&mut self, j1: BasisIndexing, j2: BasisIndexing) {
        if j1 == j2 {
            return;
        }
        let (height, width) = self.dimensions();
        let entries = self.entries_mut();
        for row in 0..height {
            entries.swap(row * width + j1, row * width + j2);
        }
    }
}
