pub mod optimization_attempt;
pub mod product;
pub mod store;
