//! Type dispatch and the function registry.
//!
//! [`dispatch`] is the single place that maps a function and its operand
//! types to a kernel. It is a closed `match` over [`DataType`], so adding a
//! data type fails to compile until every function decides what to do with
//! it. The registry then checks, once per function, that the signatures a
//! function declares and the kernels the dispatcher returns are the same
//! set.

use crate::batch::Channel;
use crate::expression::error::{CoverageError, EvalError, EvalResult};
use crate::expression::evaluator::{AttributeReader, Evaluator, NullPropagating};
use crate::expression::kernel::{
    CastIntToDouble, CastIntToLong, CastLongToDouble, CastUnsignedLongToDouble, EqualsBools,
    EqualsDoubles, EqualsDoublesTotalOrder, EqualsInts, EqualsLongs, EqualsUnsignedLongs,
    FloorDouble, FloorInt, FloorLong, FloorUnsignedLong, Kernel,
};
use crate::expression::resolved::{Function, ResolvedExpr};
use crate::types::DataType;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;

/// How `equals` treats two doubles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FloatEquality {
    /// NaN equals nothing, `-0.0 == 0.0`.
    #[default]
    Ieee,
    /// NaN equals NaN, `-0.0 == 0.0`.
    TotalOrder,
}

/// Whether `equals` accepts operands of different numeric types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CrossTypeEquality {
    #[default]
    Reject,
    /// Cast the narrower operand: integer to long, integers to double.
    Widen,
}

/// Choices fixed when a registry is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub float_equality: FloatEquality,
    pub cross_type: CrossTypeEquality,
}

/// Builds an evaluator from already bound operands.
pub type Binder = fn(Vec<Box<dyn Evaluator>>) -> EvalResult<Box<dyn Evaluator>>;

/// Wrap `K` around its operands. Identity kernels hand back the operand
/// itself.
fn bind_kernel<K: Kernel>(operands: Vec<Box<dyn Evaluator>>) -> EvalResult<Box<dyn Evaluator>> {
    if !K::IDENTITY {
        return Ok(Box::new(NullPropagating::<K>::new(operands)?));
    }

    let actual: Vec<DataType> = operands.iter().map(|op| op.data_type()).collect();
    match <[Box<dyn Evaluator>; 1]>::try_from(operands) {
        Ok([operand]) if actual == K::INPUTS => Ok(operand),
        _ => Err(EvalError::KernelOperands {
            kernel: K::NAME,
            expected: K::INPUTS.to_vec(),
            actual,
        }),
    }
}

fn kernel<K: Kernel>() -> Option<Binder> {
    Some(bind_kernel::<K>)
}

fn operand_pair<K: Kernel>(
    operands: Vec<Box<dyn Evaluator>>,
) -> EvalResult<[Box<dyn Evaluator>; 2]> {
    <[Box<dyn Evaluator>; 2]>::try_from(operands).map_err(|operands| EvalError::KernelOperands {
        kernel: K::NAME,
        expected: K::INPUTS.to_vec(),
        actual: operands.iter().map(|op| op.data_type()).collect(),
    })
}

/// Cast the left operand with `C`, then apply `K`.
fn bind_cast_lhs<C: Kernel, K: Kernel>(
    operands: Vec<Box<dyn Evaluator>>,
) -> EvalResult<Box<dyn Evaluator>> {
    let [lhs, rhs] = operand_pair::<K>(operands)?;
    bind_kernel::<K>(vec![bind_kernel::<C>(vec![lhs])?, rhs])
}

/// Cast the right operand with `C`, then apply `K`.
fn bind_cast_rhs<C: Kernel, K: Kernel>(
    operands: Vec<Box<dyn Evaluator>>,
) -> EvalResult<Box<dyn Evaluator>> {
    let [lhs, rhs] = operand_pair::<K>(operands)?;
    bind_kernel::<K>(vec![lhs, bind_kernel::<C>(vec![rhs])?])
}

#[derive(Clone, Copy)]
enum Side {
    Lhs,
    Rhs,
}

fn equals_doubles(float: FloatEquality) -> Binder {
    match float {
        FloatEquality::Ieee => bind_kernel::<EqualsDoubles>,
        FloatEquality::TotalOrder => bind_kernel::<EqualsDoublesTotalOrder>,
    }
}

fn widen(config: &RegistryConfig, binder: Binder) -> Option<Binder> {
    match config.cross_type {
        CrossTypeEquality::Reject => None,
        CrossTypeEquality::Widen => Some(binder),
    }
}

/// Equality after casting the integer side `C` to double.
fn widen_to_double<C: Kernel>(config: &RegistryConfig, side: Side) -> Option<Binder> {
    let binder: Binder = match (side, config.float_equality) {
        (Side::Lhs, FloatEquality::Ieee) => bind_cast_lhs::<C, EqualsDoubles>,
        (Side::Lhs, FloatEquality::TotalOrder) => bind_cast_lhs::<C, EqualsDoublesTotalOrder>,
        (Side::Rhs, FloatEquality::Ieee) => bind_cast_rhs::<C, EqualsDoubles>,
        (Side::Rhs, FloatEquality::TotalOrder) => bind_cast_rhs::<C, EqualsDoublesTotalOrder>,
    };
    widen(config, binder)
}

fn floor_kernel(val: DataType) -> Option<Binder> {
    match val {
        DataType::Int32 => kernel::<FloorInt>(),
        DataType::Int64 => kernel::<FloorLong>(),
        DataType::UnsignedLong => kernel::<FloorUnsignedLong>(),
        DataType::Double => kernel::<FloorDouble>(),
        DataType::Boolean => None,
    }
}

fn equals_kernel(lhs: DataType, rhs: DataType, config: &RegistryConfig) -> Option<Binder> {
    use DataType::*;

    match (lhs, rhs) {
        (Int32, Int32) => kernel::<EqualsInts>(),
        (Int64, Int64) => kernel::<EqualsLongs>(),
        (UnsignedLong, UnsignedLong) => kernel::<EqualsUnsignedLongs>(),
        (Double, Double) => Some(equals_doubles(config.float_equality)),
        (Boolean, Boolean) => kernel::<EqualsBools>(),

        (Int32, Int64) => widen(config, bind_cast_lhs::<CastIntToLong, EqualsLongs>),
        (Int64, Int32) => widen(config, bind_cast_rhs::<CastIntToLong, EqualsLongs>),
        (Int32, Double) => widen_to_double::<CastIntToDouble>(config, Side::Lhs),
        (Double, Int32) => widen_to_double::<CastIntToDouble>(config, Side::Rhs),
        (Int64, Double) => widen_to_double::<CastLongToDouble>(config, Side::Lhs),
        (Double, Int64) => widen_to_double::<CastLongToDouble>(config, Side::Rhs),
        (UnsignedLong, Double) => widen_to_double::<CastUnsignedLongToDouble>(config, Side::Lhs),
        (Double, UnsignedLong) => widen_to_double::<CastUnsignedLongToDouble>(config, Side::Rhs),

        // No common type holds both the full unsigned and signed ranges
        (UnsignedLong, Int32 | Int64) | (Int32 | Int64, UnsignedLong) => None,
        (Boolean, Int32 | Int64 | UnsignedLong | Double)
        | (Int32 | Int64 | UnsignedLong | Double, Boolean) => None,
    }
}

/// Find the kernel for `function` over `types`. `None` means unsupported,
/// including a wrong number of types.
pub fn dispatch(function: Function, types: &[DataType], config: &RegistryConfig) -> Option<Binder> {
    match (function, types) {
        (Function::Floor, [val]) => floor_kernel(*val),
        (Function::Equals, [lhs, rhs]) => equals_kernel(*lhs, *rhs, config),
        (Function::Floor | Function::Equals, _) => None,
    }
}

/// Signatures a builtin function claims to support under `config`.
///
/// Floor accepts every numeric type. Equals accepts each comparable type
/// against itself; with widening it also accepts mixed numeric pairs that
/// share signedness or involve a double.
pub fn declared_signatures(function: Function, config: &RegistryConfig) -> Vec<Vec<DataType>> {
    match function {
        Function::Floor => DataType::ALL
            .iter()
            .filter(|t| t.info().numeric)
            .map(|t| vec![*t])
            .collect(),
        Function::Equals => all_signatures(2)
            .into_iter()
            .filter(|types| equality_declared(types[0], types[1], config))
            .collect(),
    }
}

fn equality_declared(lhs: DataType, rhs: DataType, config: &RegistryConfig) -> bool {
    if lhs == rhs {
        return lhs.info().comparable;
    }
    let (l, r) = (lhs.info(), rhs.info());
    config.cross_type == CrossTypeEquality::Widen
        && l.numeric
        && r.numeric
        && (l.signed == r.signed || lhs == DataType::Double || rhs == DataType::Double)
}

/// Every combination of `arity` data types, in `DataType::ALL` order.
pub fn all_signatures(arity: usize) -> Vec<Vec<DataType>> {
    let mut signatures = vec![Vec::new()];
    for _ in 0..arity {
        signatures = signatures
            .into_iter()
            .flat_map(|prefix| {
                DataType::ALL.iter().map(move |t| {
                    let mut next = prefix.clone();
                    next.push(*t);
                    next
                })
            })
            .collect();
    }
    signatures
}

/// One supported signature and its result type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Signature {
    pub function: Function,
    pub args: Vec<DataType>,
    pub output: DataType,
}

impl fmt::Display for Signature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.function)?;
        for (i, arg) in self.args.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", arg)?;
        }
        write!(f, ") -> {}", self.output)
    }
}

/// Registered functions with validated coverage.
///
/// Built once; immutable while binding.
#[derive(Debug, Clone)]
pub struct FunctionRegistry {
    config: RegistryConfig,
    functions: BTreeMap<Function, Vec<Vec<DataType>>>,
}

impl FunctionRegistry {
    /// An empty registry. Nothing binds until functions are registered.
    pub fn new(config: RegistryConfig) -> Self {
        Self {
            config,
            functions: BTreeMap::new(),
        }
    }

    /// A registry holding floor and equals.
    pub fn with_builtins(config: RegistryConfig) -> Result<Self, CoverageError> {
        let mut registry = Self::new(config);
        for function in Function::ALL {
            registry.register(function, declared_signatures(function, &config))?;
        }
        info!(
            "Registered builtin functions (float equality: {:?}, cross type: {:?})",
            config.float_equality, config.cross_type
        );
        Ok(registry)
    }

    /// Register `function` with the signatures it claims to support.
    ///
    /// The claim is checked against the dispatcher over every combination of
    /// data types. On error the function stays unregistered.
    pub fn register(
        &mut self,
        function: Function,
        declared: Vec<Vec<DataType>>,
    ) -> Result<(), CoverageError> {
        let arity = function.arity();
        let mut seen = HashSet::new();
        for signature in &declared {
            if signature.len() != arity {
                return Err(CoverageError::SignatureArity {
                    function,
                    expected: arity,
                    actual: signature.len(),
                });
            }
            if !seen.insert(signature.as_slice()) {
                return Err(CoverageError::DuplicateSignature {
                    function,
                    types: signature.clone(),
                });
            }
        }

        for types in all_signatures(arity) {
            let has_kernel = dispatch(function, &types, &self.config).is_some();
            let is_declared = seen.contains(types.as_slice());
            match (is_declared, has_kernel) {
                (true, false) => return Err(CoverageError::MissingKernel { function, types }),
                (false, true) => return Err(CoverageError::UndeclaredKernel { function, types }),
                (true, true) | (false, false) => {}
            }
        }

        debug!(
            "Function {} passed coverage with {} signatures",
            function,
            declared.len()
        );
        self.functions.insert(function, declared);
        Ok(())
    }

    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    pub fn is_registered(&self, function: Function) -> bool {
        self.functions.contains_key(&function)
    }

    /// Turn a resolved expression into an evaluator. All type errors surface
    /// here, before any row is read.
    pub fn bind(&self, expr: &ResolvedExpr) -> EvalResult<Box<dyn Evaluator>> {
        match expr {
            ResolvedExpr::Attribute { channel, data_type } => {
                Ok(Box::new(AttributeReader::new(*channel, *data_type)))
            }
            ResolvedExpr::Call { function, args } => {
                let declared = self
                    .functions
                    .get(function)
                    .ok_or(EvalError::UnknownFunction(*function))?;
                if args.len() != function.arity() {
                    return Err(EvalError::ArgumentCount {
                        function: *function,
                        expected: function.arity(),
                        actual: args.len(),
                    });
                }

                let operands = args
                    .iter()
                    .map(|arg| self.bind(arg))
                    .collect::<EvalResult<Vec<_>>>()?;
                let types: Vec<DataType> = operands.iter().map(|op| op.data_type()).collect();
                let binder = declared
                    .contains(&types)
                    .then(|| dispatch(*function, &types, &self.config))
                    .flatten()
                    .ok_or_else(|| EvalError::UnsupportedTypes {
                        function: *function,
                        types,
                    })?;

                let evaluator = binder(operands)?;
                debug!("Bound {} to {}", function, evaluator);
                Ok(evaluator)
            }
        }
    }

    /// Declared signatures of every registered function with their result
    /// types, in function then `DataType::ALL` order.
    pub fn coverage(&self) -> EvalResult<Vec<Signature>> {
        let mut signatures = Vec::new();
        for (function, declared) in &self.functions {
            for types in all_signatures(function.arity()) {
                if !declared.contains(&types) {
                    continue;
                }
                let call = ResolvedExpr::call(
                    *function,
                    types
                        .iter()
                        .enumerate()
                        .map(|(channel, t)| ResolvedExpr::Attribute {
                            channel: Channel(channel),
                            data_type: *t,
                        })
                        .collect(),
                );
                let output = self.bind(&call)?.data_type();
                signatures.push(Signature {
                    function: *function,
                    args: types,
                    output,
                });
            }
        }
        Ok(signatures)
    }
}
