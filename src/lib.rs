pub mod base_ring;
pub mod error;
pub mod groups;
pub mod linear_algebra;
