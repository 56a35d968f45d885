pub mod basis_propagator;
pub mod elementary_ops;
pub mod exact_matrix;
pub mod expression;
pub mod view;

pub type BasisIndexing = usize;
