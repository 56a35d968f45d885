use core::fmt;

use super::exact_matrix::ExactMatrix;
use super::expression::MatrixExpression;
use super::BasisIndexing;
use crate::base_ring::field_generals::Ring;
use crate::error::{check_dimension, Result, StructuralError};

/// offset and extent of a rectangular region
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Rect {
    pub row: BasisIndexing,
    pub col: BasisIndexing,
    pub height: BasisIndexing,
    pub width: BasisIndexing,
}

impl Rect {
    #[must_use]
    pub fn new(
        row: BasisIndexing,
        col: BasisIndexing,
        height: BasisIndexing,
        width: BasisIndexing,
    ) -> Self {
        Self {
            row,
            col,
            height,
            width,
        }
    }

    /// the whole of a `height x width` matrix
    #[must_use]
    pub fn covering(height: BasisIndexing, width: BasisIndexing) -> Self {
        Self::new(0, 0, height, width)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.height == 0 || self.width == 0
    }

    /// share at least one cell
    /// an empty rectangle overlaps nothing
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.is_empty() || other.is_empty() {
            return false;
        }
        spans_meet(self.row, self.height, other.row, other.height)
            && spans_meet(self.col, self.width, other.col, other.width)
    }

    fn check_fits(&self, height: BasisIndexing, width: BasisIndexing) -> Result<()> {
        let fits = |start: BasisIndexing, extent: BasisIndexing, limit: BasisIndexing| {
            start.checked_add(extent).is_some_and(|end| end <= limit)
        };
        if fits(self.row, self.height, height) && fits(self.col, self.width, width) {
            Ok(())
        } else {
            Err(StructuralError::OutOfBounds {
                rect: *self,
                height,
                width,
            })
        }
    }
}

/// `start..start + extent` and `other..other + other_extent` intersect,
/// an end past `usize::MAX` lies beyond every start
fn spans_meet(
    start: BasisIndexing,
    extent: BasisIndexing,
    other: BasisIndexing,
    other_extent: BasisIndexing,
) -> bool {
    let before = |a: BasisIndexing, b: BasisIndexing, b_extent: BasisIndexing| {
        b.checked_add(b_extent).map_or(true, |end| a < end)
    };
    before(start, other, other_extent) && before(other, start, extent)
}

fn fmt_span(f: &mut fmt::Formatter<'_>, start: BasisIndexing, extent: BasisIndexing) -> fmt::Result {
    match start.checked_add(extent) {
        Some(end) => write!(f, "{start}..{end}"),
        None => write!(f, "{start}..{start}+{extent}"),
    }
}

impl fmt::Display for Rect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rows ")?;
        fmt_span(f, self.row, self.height)?;
        write!(f, " cols ")?;
        fmt_span(f, self.col, self.width)
    }
}

/// Read-only rectangular window into an `ExactMatrix`.
/// Indices are relative to the window's corner.
pub struct MatrixView<'a, F: Ring> {
    matrix: &'a ExactMatrix<F>,
    rect: Rect,
}

impl<'a, F: Ring> MatrixView<'a, F> {
    pub(crate) fn new(matrix: &'a ExactMatrix<F>, rect: Rect) -> Result<Self> {
        rect.check_fits(matrix.height(), matrix.width())?;
        Ok(Self { matrix, rect })
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }
}

impl<'a, F: Ring> MatrixExpression<F> for MatrixView<'a, F> {
    fn height(&self) -> BasisIndexing {
        self.rect.height
    }

    fn width(&self) -> BasisIndexing {
        self.rect.width
    }

    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F {
        self.matrix[(self.rect.row + row, self.rect.col + col)].clone()
    }
}

/// Writable rectangular window into an `ExactMatrix`.
/// Holding it borrows the whole matrix, so the only other region of the same
/// matrix it can copy from is one named by a `Rect`.
pub struct MatrixViewMut<'a, F: Ring> {
    matrix: &'a mut ExactMatrix<F>,
    rect: Rect,
}

impl<'a, F: Ring> MatrixViewMut<'a, F> {
    pub(crate) fn new(matrix: &'a mut ExactMatrix<F>, rect: Rect) -> Result<Self> {
        rect.check_fits(matrix.height(), matrix.width())?;
        Ok(Self { matrix, rect })
    }

    #[must_use]
    pub fn rect(&self) -> Rect {
        self.rect
    }

    pub fn write(&mut self, row: BasisIndexing, col: BasisIndexing, value: F) {
        self.matrix[(self.rect.row + row, self.rect.col + col)] = value;
    }

    /// copy `source` into this window
    /// `source` cannot alias the backing matrix, that is what `assign_within` is for
    /// # Errors
    /// the shapes disagree, nothing is written in that case
    pub fn assign<E: MatrixExpression<F> + ?Sized>(&mut self, source: &E) -> Result<()> {
        check_dimension("MatrixViewMut::assign", self.rect.height, source.height())?;
        check_dimension("MatrixViewMut::assign", self.rect.width, source.width())?;
        for row in 0..self.rect.height {
            for col in 0..self.rect.width {
                self.write(row, col, source.read(row, col));
            }
        }
        Ok(())
    }

    /// copy the region `source` of the backing matrix into this window
    /// # Errors
    /// - `source` sticks out of the matrix
    /// - `source` shares a cell with this window
    /// - the shapes disagree
    ///
    /// nothing is written in any of those cases
    pub fn assign_within(&mut self, source: Rect) -> Result<()> {
        source.check_fits(self.matrix.height(), self.matrix.width())?;
        if self.rect.overlaps(&source) {
            return Err(StructuralError::OverlappingSlices {
                destination: self.rect,
                copied_from: source,
            });
        }
        check_dimension("MatrixViewMut::assign_within", self.rect.height, source.height)?;
        check_dimension("MatrixViewMut::assign_within", self.rect.width, source.width)?;
        for row in 0..self.rect.height {
            for col in 0..self.rect.width {
                let value = self.matrix[(source.row + row, source.col + col)].clone();
                self.write(row, col, value);
            }
        }
        Ok(())
    }
}

impl<'a, F: Ring> MatrixExpression<F> for MatrixViewMut<'a, F> {
    fn height(&self) -> BasisIndexing {
        self.rect.height
    }

    fn width(&self) -> BasisIndexing {
        self.rect.width
    }

    fn read(&self, row: BasisIndexing, col: BasisIndexing) -> F {
        self.matrix[(self.rect.row + row, self.rect.col + col)].clone()
    }
}
