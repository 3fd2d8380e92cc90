pub mod batch;
pub mod executor;
pub mod expression;
pub mod types;
