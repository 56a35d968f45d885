use core::fmt;
use core::ops::{Index, IndexMut};

use crate::linear_algebra::BasisIndexing;

/// A finitely generated abelian group localized at a prime p,
/// `Z_(p)^free_rank + Z/p^e_0 + Z/p^e_1 + ...`.
/// Generators are numbered free ones first, then the torsion ones in order.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct AbelianGroup {
    free_rank: BasisIndexing,
    torsion: Vec<u32>,
}

impl AbelianGroup {
    #[must_use]
    pub fn new(free_rank: BasisIndexing, torsion: Vec<u32>) -> Self {
        Self { free_rank, torsion }
    }

    /// every torsion exponent starts at 1
    #[must_use]
    pub fn with_ranks(free_rank: BasisIndexing, tor_rank: BasisIndexing) -> Self {
        Self::new(free_rank, vec![1; tor_rank])
    }

    #[must_use]
    pub fn trivial() -> Self {
        Self::default()
    }

    /// number of generators
    #[must_use]
    pub fn rank(&self) -> BasisIndexing {
        self.free_rank + self.torsion.len()
    }

    #[must_use]
    pub fn free_rank(&self) -> BasisIndexing {
        self.free_rank
    }

    #[must_use]
    pub fn tor_rank(&self) -> BasisIndexing {
        self.torsion.len()
    }

    #[must_use]
    pub fn torsion(&self) -> &[u32] {
        &self.torsion
    }

    /// `None` for a free generator, otherwise the exponent of its order
    #[must_use]
    pub fn generator_order(&self, generator: BasisIndexing) -> Option<u32> {
        generator
            .checked_sub(self.free_rank)
            .and_then(|tor_idx| self.torsion.get(tor_idx).copied())
    }

    #[must_use]
    pub fn is_trivial(&self) -> bool {
        self.free_rank == 0 && self.torsion.is_empty()
    }

    #[must_use]
    pub fn is_free(&self) -> bool {
        self.torsion.is_empty()
    }
}

/// the torsion exponents, 0 based among the torsion generators
impl Index<BasisIndexing> for AbelianGroup {
    type Output = u32;

    fn index(&self, tor_idx: BasisIndexing) -> &u32 {
        &self.torsion[tor_idx]
    }
}

impl IndexMut<BasisIndexing> for AbelianGroup {
    fn index_mut(&mut self, tor_idx: BasisIndexing) -> &mut u32 {
        &mut self.torsion[tor_idx]
    }
}

impl fmt::Display for AbelianGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_trivial() {
            return write!(f, "0");
        }
        let mut summands = Vec::with_capacity(1 + self.torsion.len());
        if self.free_rank > 0 {
            summands.push(if self.free_rank == 1 {
                "Z".to_string()
            } else {
                format!("Z^{}", self.free_rank)
            });
        }
        summands.extend(self.torsion.iter().map(|e| format!("Z/p^{e}")));
        write!(f, "{}", summands.join(" + "))
    }
}

#[cfg(test)]
mod test {

    #[test]
    fn counting_generators() {
        use super::AbelianGroup;
        let mut g = AbelianGroup::with_ranks(2, 3);
        assert_eq!(g.rank(), 5);
        assert_eq!(g.free_rank(), 2);
        assert_eq!(g.tor_rank(), 3);
        assert_eq!(g.torsion(), &[1, 1, 1]);
        g[1] = 4;
        assert_eq!(g[1], 4);
        assert_eq!(g.generator_order(0), None);
        assert_eq!(g.generator_order(3), Some(4));
        assert_eq!(g.generator_order(5), None);
        assert!(!g.is_trivial());
        assert!(!g.is_free());
        assert!(AbelianGroup::trivial().is_trivial());
        assert_eq!(AbelianGroup::new(0, vec![1, 2]), AbelianGroup::new(0, vec![1, 2]));
    }

    #[test]
    fn display() {
        use super::AbelianGroup;
        assert_eq!(AbelianGroup::trivial().to_string(), "0");
        assert_eq!(AbelianGroup::new(1, vec![]).to_string(), "Z");
        assert_eq!(AbelianGroup::new(2, vec![1, 3]).to_string(), "Z^2 + Z/p^1 + Z/p^3");
    }
}
