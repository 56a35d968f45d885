pub mod abelian_group;
pub mod group_sequence;
pub mod morphisms;
mod reduction;
