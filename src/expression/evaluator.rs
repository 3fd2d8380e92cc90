//! Bound, executable expression trees.
//!
//! An evaluator is built once per expression by the registry and then run
//! against any number of batches. Evaluators are immutable and can be shared
//! across threads.

use crate::batch::{Batch, BatchError, Channel, Column, NullMask};
use crate::expression::error::{EvalError, EvalResult};
use crate::expression::kernel::{Kernel, Operands};
use crate::types::{DataType, NativeType, TypedValue};
use std::borrow::Cow;
use std::fmt;
use std::marker::PhantomData;

/// Widest kernel argument list.
pub const MAX_ARITY: usize = 2;

/// Executable form of a resolved expression.
///
/// `Display` renders the canonical evaluator description, e.g.
/// `FloorDoubleEvaluator[val=Attribute[channel=0]]`.
pub trait Evaluator: fmt::Display + fmt::Debug + Send + Sync {
    /// Type of every value this evaluator produces.
    fn data_type(&self) -> DataType;

    /// Evaluate a single row.
    fn eval_row(&self, batch: &Batch, row: usize) -> EvalResult<TypedValue>;

    /// Evaluate every row of the batch. Leaves borrow their column.
    fn eval_batch<'a>(&self, batch: &'a Batch) -> EvalResult<Cow<'a, Column>>;
}

/// Leaf evaluator reading one channel of the input batch.
#[derive(Debug, Clone, PartialEq)]
pub struct AttributeReader {
    channel: Channel,
    data_type: DataType,
}

impl AttributeReader {
    pub fn new(channel: Channel, data_type: DataType) -> Self {
        Self { channel, data_type }
    }

    pub fn channel(&self) -> Channel {
        self.channel
    }

    fn column<'a>(&self, batch: &'a Batch) -> EvalResult<&'a Column> {
        let column = batch.column(self.channel)?;
        if column.data_type() != self.data_type {
            return Err(EvalError::ChannelType {
                channel: self.channel.0,
                expected: self.data_type,
                actual: column.data_type(),
            });
        }
        Ok(column)
    }
}

impl fmt::Display for AttributeReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Attribute[channel={}]", self.channel)
    }
}

impl Evaluator for AttributeReader {
    fn data_type(&self) -> DataType {
        self.data_type
    }

    fn eval_row(&self, batch: &Batch, row: usize) -> EvalResult<TypedValue> {
        Ok(self.column(batch)?.get(row)?)
    }

    fn eval_batch<'a>(&self, batch: &'a Batch) -> EvalResult<Cow<'a, Column>> {
        self.column(batch).map(Cow::Borrowed)
    }
}

/// Runs kernel `K` over its operands, producing null whenever any operand
/// is null. All operands are evaluated for every row.
pub struct NullPropagating<K: Kernel> {
    operands: Vec<Box<dyn Evaluator>>,
    kernel: PhantomData<fn() -> K>,
}

impl<K: Kernel> NullPropagating<K> {
    /// Wrap already bound operands. Their count and result types must match
    /// the kernel's inputs exactly.
    pub fn new(operands: Vec<Box<dyn Evaluator>>) -> EvalResult<Self> {
        let actual: Vec<DataType> = operands.iter().map(|op| op.data_type()).collect();
        if actual != K::INPUTS
            || operands.len() != <K::Args as Operands>::ARITY
            || operands.len() > MAX_ARITY
        {
            return Err(EvalError::KernelOperands {
                kernel: K::NAME,
                expected: K::INPUTS.to_vec(),
                actual,
            });
        }
        Ok(Self {
            operands,
            kernel: PhantomData,
        })
    }

    fn operand_error(&self) -> EvalError {
        EvalError::KernelOperands {
            kernel: K::NAME,
            expected: K::INPUTS.to_vec(),
            actual: self.operands.iter().map(|op| op.data_type()).collect(),
        }
    }
}

impl<K: Kernel> fmt::Debug for NullPropagating<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NullPropagating")
            .field("kernel", &K::NAME)
            .field("operands", &self.operands)
            .finish()
    }
}

impl<K: Kernel> fmt::Display for NullPropagating<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}Evaluator[", K::NAME)?;
        for (i, (param, operand)) in K::PARAMS.iter().zip(&self.operands).enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}={}", param, operand)?;
        }
        f.write_str("]")
    }
}

impl<K: Kernel> Evaluator for NullPropagating<K> {
    fn data_type(&self) -> DataType {
        K::OUTPUT
    }

    fn eval_row(&self, batch: &Batch, row: usize) -> EvalResult<TypedValue> {
        let mut values = [TypedValue::null(K::OUTPUT); MAX_ARITY];
        for (slot, operand) in values.iter_mut().zip(&self.operands) {
            *slot = operand.eval_row(batch, row)?;
        }

        match K::Args::from_values(&values[..self.operands.len()]) {
            Some(args) => Ok(TypedValue::from_bits(K::OUTPUT, K::apply(args).to_bits())),
            None => Ok(TypedValue::null(K::OUTPUT)),
        }
    }

    fn eval_batch<'a>(&self, batch: &'a Batch) -> EvalResult<Cow<'a, Column>> {
        let rows = batch.row_count();
        let evaluated = self
            .operands
            .iter()
            .map(|op| op.eval_batch(batch))
            .collect::<EvalResult<Vec<_>>>()?;
        let columns: Vec<&Column> = evaluated.iter().map(|c| c.as_ref()).collect();
        for (index, column) in columns.iter().enumerate() {
            if column.len() != rows {
                return Err(BatchError::LengthMismatch {
                    index,
                    expected: rows,
                    actual: column.len(),
                }
                .into());
            }
        }

        let views = K::Args::views(&columns).ok_or_else(|| self.operand_error())?;
        let mut values = Vec::with_capacity(rows);
        let mut nulls = NullMask::new(rows);
        for row in 0..rows {
            match K::Args::gather(&views, row) {
                Some(args) => values.push(K::apply(args)),
                None => {
                    values.push(K::Output::default());
                    nulls.set_null(row);
                }
            }
        }

        let data = K::Output::wrap(values, K::OUTPUT).ok_or(BatchError::StorageType {
            data_type: K::OUTPUT,
            native: std::any::type_name::<K::Output>(),
        })?;
        let nulls = if nulls.null_count() > 0 { Some(nulls) } else { None };
        Ok(Cow::Owned(Column::new(data, nulls)?))
    }
}
