pub mod field_generals;
pub mod valuation;
