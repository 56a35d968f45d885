//! Structural errors: caller-contract violations detected before any mutation.

use thiserror::Error;

use crate::linear_algebra::view::Rect;

/// Shapes that disagree, regions of one matrix that overlap, a region that
/// sticks out of its matrix, or a basis change that cannot be undone.
/// All are bugs at the call site, nothing is retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StructuralError {
    #[error("{context}: dimension mismatch: {expected} != {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("matrix slices overlap: {destination} and {copied_from}")]
    OverlappingSlices { destination: Rect, copied_from: Rect },

    #[error("{rect} does not fit inside a {height}x{width} matrix")]
    OutOfBounds {
        rect: Rect,
        height: usize,
        width: usize,
    },

    #[error("basis change on generator {generator} of {rank}: {reason}")]
    InvalidBasisChange {
        reason: &'static str,
        generator: usize,
        rank: usize,
    },

    #[error("torsion exponent {valuation} does not fit in 32 bits")]
    ExponentOverflow { valuation: i64 },
}

pub type Result<T> = core::result::Result<T, StructuralError>;

/// `Ok` exactly when `found == expected`
pub(crate) fn check_dimension(context: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(StructuralError::DimensionMismatch {
            context,
            expected,
            found,
        })
    }
}
