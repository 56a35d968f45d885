use core::fmt;
use std::collections::BTreeMap;

use log::debug;
use thiserror::Error;

use super::abelian_group::AbelianGroup;
use crate::base_ring::field_generals::Ring;
use crate::error::{check_dimension, StructuralError};
use crate::linear_algebra::exact_matrix::ExactMatrix;

/// Position `(p, q, s)` of a group in a trigraded spectral sequence.
/// Ordered lexicographically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TrigradedIndex {
    p: i32,
    q: i32,
    s: i32,
}

impl TrigradedIndex {
    #[must_use]
    pub fn new(p: i32, q: i32, s: i32) -> Self {
        Self { p, q, s }
    }

    #[must_use]
    pub fn p(&self) -> i32 {
        self.p
    }

    #[must_use]
    pub fn q(&self) -> i32 {
        self.q
    }

    #[must_use]
    pub fn s(&self) -> i32 {
        self.s
    }
}

impl fmt::Display for TrigradedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {}, {})", self.p, self.q, self.s)
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SequenceError {
    #[error("the sequence is sealed, nothing can be appended")]
    Sealed,

    #[error("index {index} does not come after the last index {last}")]
    OutOfOrder { index: usize, last: usize },

    #[error(transparent)]
    Structural(#[from] StructuralError),
}

/// The successive versions of one group across the pages of a spectral sequence.
/// Each entry holds the group on that page and the map to it from the first group.
/// A page without its own entry shows the nearest earlier one.
/// Pages past the last entry only have an answer once the sequence is sealed.
#[derive(Clone, Debug)]
pub struct GroupSequence<F: Ring> {
    index_min: usize,
    sealed: bool,
    entries: BTreeMap<usize, (AbelianGroup, ExactMatrix<F>)>,
}

impl<F: Ring> GroupSequence<F> {
    /// `group` at `index_min`, mapped to itself by the identity
    #[must_use]
    pub fn new(index_min: usize, group: AbelianGroup) -> Self {
        let identity = ExactMatrix::identity(group.rank());
        let mut entries = BTreeMap::new();
        entries.insert(index_min, (group, identity));
        Self {
            index_min,
            sealed: false,
            entries,
        }
    }

    #[must_use]
    pub fn index_min(&self) -> usize {
        self.index_min
    }

    fn first_group(&self) -> &AbelianGroup {
        &self.entries[&self.index_min].0
    }

    fn last_index(&self) -> usize {
        self.entries
            .keys()
            .next_back()
            .copied()
            .unwrap_or(self.index_min)
    }

    /// record `group` at `index`, with `map` from the first group to it
    /// # Errors
    /// - the sequence is sealed
    /// - `index` is not past every recorded index
    /// - `map` is not `group.rank() x` (rank of the first group)
    pub fn append(
        &mut self,
        index: usize,
        group: AbelianGroup,
        map: ExactMatrix<F>,
    ) -> Result<(), SequenceError> {
        if self.sealed {
            return Err(SequenceError::Sealed);
        }
        let last = self.last_index();
        if index <= last {
            return Err(SequenceError::OutOfOrder { index, last });
        }
        check_dimension("GroupSequence::append", group.rank(), map.height())?;
        check_dimension(
            "GroupSequence::append",
            self.first_group().rank(),
            map.width(),
        )?;
        debug!("page {index}: {group}");
        self.entries.insert(index, (group, map));
        Ok(())
    }

    /// no more appends, every later index now reads as the last entry
    pub fn done(&mut self) {
        self.sealed = true;
    }

    #[must_use]
    pub fn is_sealed(&self) -> bool {
        self.sealed
    }

    fn entry(&self, index: usize) -> Option<&(AbelianGroup, ExactMatrix<F>)> {
        if index < self.index_min || (!self.sealed && index > self.last_index()) {
            return None;
        }
        self.entries.range(..=index).next_back().map(|(_, entry)| entry)
    }

    #[must_use]
    pub fn get_group(&self, index: usize) -> Option<&AbelianGroup> {
        self.entry(index).map(|(group, _)| group)
    }

    #[must_use]
    pub fn get_matrix(&self, index: usize) -> Option<&ExactMatrix<F>> {
        self.entry(index).map(|(_, map)| map)
    }
}

#[cfg(test)]
mod test {
    use super::{GroupSequence, SequenceError, TrigradedIndex};
    use crate::error::StructuralError;
    use crate::groups::abelian_group::AbelianGroup;
    use crate::linear_algebra::exact_matrix::ExactMatrix;
    use num::BigRational;
    use std::collections::BTreeMap;

    type Q = BigRational;

    #[test]
    fn lookups_fall_back() {
        let start = AbelianGroup::with_ranks(2, 0);
        let mut sequence = GroupSequence::<Q>::new(2, start.clone());
        assert_eq!(sequence.get_group(2), Some(&start));
        assert_eq!(sequence.get_matrix(2), Some(&ExactMatrix::identity(2)));
        assert_eq!(sequence.get_group(1), None);
        assert_eq!(sequence.get_group(3), None);

        let later = AbelianGroup::new(1, vec![1]);
        let projection = ExactMatrix::from_integer_rows(&[[1, 0], [0, 1]]).unwrap();
        sequence.append(5, later.clone(), projection.clone()).unwrap();
        assert_eq!(sequence.get_group(4), Some(&start));
        assert_eq!(sequence.get_group(5), Some(&later));
        assert_eq!(sequence.get_matrix(5), Some(&projection));
        assert_eq!(sequence.get_group(6), None);

        sequence.done();
        assert!(sequence.is_sealed());
        assert_eq!(sequence.get_group(1000), Some(&later));
        assert_eq!(sequence.get_group(1), None);
    }

    #[test]
    fn misuse_is_reported() {
        let mut sequence = GroupSequence::<Q>::new(0, AbelianGroup::with_ranks(1, 1));
        let map = ExactMatrix::identity(2);
        assert_eq!(
            sequence.append(0, AbelianGroup::with_ranks(1, 1), map.clone()),
            Err(SequenceError::OutOfOrder { index: 0, last: 0 })
        );
        assert!(matches!(
            sequence.append(1, AbelianGroup::with_ranks(1, 0), map.clone()),
            Err(SequenceError::Structural(
                StructuralError::DimensionMismatch { .. }
            ))
        ));
        sequence.append(1, AbelianGroup::new(1, vec![2]), map.clone()).unwrap();
        sequence.done();
        assert_eq!(
            sequence.append(2, AbelianGroup::trivial(), ExactMatrix::zero_matrix(0, 2)),
            Err(SequenceError::Sealed)
        );
    }

    #[test]
    fn addressed_by_trigrading() {
        let mut pages: BTreeMap<TrigradedIndex, GroupSequence<Q>> = BTreeMap::new();
        pages.insert(TrigradedIndex::new(1, 0, 0), GroupSequence::new(1, AbelianGroup::with_ranks(1, 0)));
        pages.insert(TrigradedIndex::new(0, 2, 1), GroupSequence::new(1, AbelianGroup::trivial()));
        pages.insert(TrigradedIndex::new(0, 2, 0), GroupSequence::new(1, AbelianGroup::with_ranks(0, 1)));
        let order: Vec<TrigradedIndex> = pages.keys().copied().collect();
        assert_eq!(
            order,
            vec![
                TrigradedIndex::new(0, 2, 0),
                TrigradedIndex::new(0, 2, 1),
                TrigradedIndex::new(1, 0, 0)
            ]
        );
        let index = order[1];
        assert_eq!((index.p(), index.q(), index.s()), (0, 2, 1));
        assert_eq!(index.to_string(), "(0, 2, 1)");
        assert!(pages[&index].get_group(1).is_some_and(AbelianGroup::is_trivial));
    }
}
