//! Typed scalar expressions over columnar batches.
//!
//! This module provides:
//! - Resolved expression trees handed over by the planner
//! - Per-type kernels for `floor` and `equals`
//! - Null-propagating evaluators built from those kernels
//! - A function registry that validates kernel coverage and binds trees

pub mod dispatch;
pub mod error;
pub mod evaluator;
pub mod kernel;
pub mod resolved;

pub use dispatch::{
    dispatch, Binder, CrossTypeEquality, FloatEquality, FunctionRegistry, RegistryConfig,
    Signature,
};
pub use error::{CoverageError, EvalError, EvalResult};
pub use evaluator::{AttributeReader, Evaluator, NullPropagating};
pub use kernel::Kernel;
pub use resolved::{Function, ResolvedExpr};
