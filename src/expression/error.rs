//! Error types for binding and evaluating expressions.

use crate::batch::BatchError;
use crate::expression::Function;
use crate::types::DataType;
use thiserror::Error;

/// Errors that can occur while binding or evaluating an expression.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EvalError {
    /// No kernel exists for the operand types. Raised at bind time.
    #[error("[{function}] does not support argument types [{}]", join_types(.types))]
    UnsupportedTypes {
        function: Function,
        types: Vec<DataType>,
    },

    #[error("Function {function} expects {expected} arguments, got {actual}")]
    ArgumentCount {
        function: Function,
        expected: usize,
        actual: usize,
    },

    #[error("Function {0} is not registered")]
    UnknownFunction(Function),

    /// A batch column does not hold the type the evaluator was bound for.
    #[error("Channel {channel} holds {actual}, evaluator was bound for {expected}")]
    ChannelType {
        channel: usize,
        expected: DataType,
        actual: DataType,
    },

    /// Operands handed to a kernel wrapper do not match its input types.
    #[error("{kernel} expects operands [{}], got [{}]", join_types(.expected), join_types(.actual))]
    KernelOperands {
        kernel: &'static str,
        expected: Vec<DataType>,
        actual: Vec<DataType>,
    },

    #[error(transparent)]
    Batch(#[from] BatchError),
}

/// Errors raised when a function's declared signatures and its kernels
/// disagree. A registry that fails this check is never constructed.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CoverageError {
    #[error("[{function}] declares [{}] but has no kernel for it", join_types(.types))]
    MissingKernel {
        function: Function,
        types: Vec<DataType>,
    },

    #[error("[{function}] has a kernel for undeclared types [{}]", join_types(.types))]
    UndeclaredKernel {
        function: Function,
        types: Vec<DataType>,
    },

    #[error("[{function}] declares [{}] more than once", join_types(.types))]
    DuplicateSignature {
        function: Function,
        types: Vec<DataType>,
    },

    #[error("[{function}] declares {actual} arguments, expected {expected}")]
    SignatureArity {
        function: Function,
        expected: usize,
        actual: usize,
    },
}

/// Result type for expression operations
pub type EvalResult<T> = Result<T, EvalError>;

fn join_types(types: &[DataType]) -> String {
    types
        .iter()
        .map(|t| t.type_name())
        .collect::<Vec<_>>()
        .join(", ")
}
