//! Scalar types understood by the evaluation layer.
//!
//! This module provides:
//! - The closed set of data types and their storage traits
//! - The mapping from Rust primitives to column storage
//! - The bias codec for unsigned 64-bit values stored in signed cells
//! - Typed single values as raw bits plus a null flag

pub mod data_type;
pub mod native;
pub mod unsigned;
pub mod value;

pub use data_type::{DataType, DataTypeInfo};
pub use native::NativeType;
pub use value::TypedValue;
