//! Columnar row batches.
//!
//! A batch is a set of equal-length typed columns addressed by [`Channel`].
//! Columns keep their values pre-decoded in typed vectors so kernels read
//! them without conversion; nulls live in a separate [`NullMask`].

pub mod codec;
pub mod null_mask;
pub mod random;

pub use codec::{decode_batches, encode_batches, CodecError, CodecResult};
pub use null_mask::NullMask;
pub use random::RandomBatchGenerator;

use crate::types::{DataType, NativeType, TypedValue};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Positional reference to an input column of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Channel(pub usize);

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Errors raised when a batch does not have the expected shape.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BatchError {
    #[error("Channel {channel} out of bounds for batch with {columns} columns")]
    ChannelOutOfBounds { channel: usize, columns: usize },

    #[error("Row {row} out of bounds for batch with {rows} rows")]
    RowOutOfBounds { row: usize, rows: usize },

    #[error("Column {index} has {actual} rows, expected {expected}")]
    LengthMismatch {
        index: usize,
        expected: usize,
        actual: usize,
    },

    #[error("Null mask covers {mask} rows but column has {values}")]
    NullMaskLength { mask: usize, values: usize },

    #[error("Value of type {actual} cannot be stored in a {expected} column")]
    ValueType { expected: DataType, actual: DataType },

    #[error("Data type {data_type} is not stored as {native}")]
    StorageType {
        data_type: DataType,
        native: &'static str,
    },
}

/// Typed storage of a column. `UnsignedLong` cells hold encoded values.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int32(Vec<i32>),
    Int64(Vec<i64>),
    UnsignedLong(Vec<i64>),
    Double(Vec<f64>),
    Boolean(Vec<bool>),
}

impl ColumnData {
    pub fn data_type(&self) -> DataType {
        match self {
            ColumnData::Int32(_) => DataType::Int32,
            ColumnData::Int64(_) => DataType::Int64,
            ColumnData::UnsignedLong(_) => DataType::UnsignedLong,
            ColumnData::Double(_) => DataType::Double,
            ColumnData::Boolean(_) => DataType::Boolean,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int32(v) => v.len(),
            ColumnData::Int64(v) | ColumnData::UnsignedLong(v) => v.len(),
            ColumnData::Double(v) => v.len(),
            ColumnData::Boolean(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Raw bits of the cell at `row`. Panics if `row` is out of range.
    fn bits_at(&self, row: usize) -> u64 {
        match self {
            ColumnData::Int32(v) => v[row].to_bits(),
            ColumnData::Int64(v) | ColumnData::UnsignedLong(v) => v[row].to_bits(),
            ColumnData::Double(v) => NativeType::to_bits(v[row]),
            ColumnData::Boolean(v) => v[row].to_bits(),
        }
    }
}

/// A typed column with an optional null mask.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    data: ColumnData,
    nulls: Option<NullMask>,
}

impl Column {
    pub fn new(data: ColumnData, nulls: Option<NullMask>) -> Result<Self, BatchError> {
        if let Some(mask) = &nulls {
            if mask.len() != data.len() {
                return Err(BatchError::NullMaskLength {
                    mask: mask.len(),
                    values: data.len(),
                });
            }
        }
        Ok(Self { data, nulls })
    }

    /// A column without nulls.
    pub fn non_null(data: ColumnData) -> Self {
        Self { data, nulls: None }
    }

    /// Build a column of `data_type` from optional native values.
    pub fn from_options<T: NativeType>(
        data_type: DataType,
        values: impl IntoIterator<Item = Option<T>>,
    ) -> Result<Self, BatchError> {
        let mut mask = NullMask::new(0);
        let mut cells = Vec::new();
        for value in values {
            mask.push(value.is_none());
            cells.push(value.unwrap_or_default());
        }
        let data = T::wrap(cells, data_type).ok_or(BatchError::StorageType {
            data_type,
            native: std::any::type_name::<T>(),
        })?;
        let nulls = if mask.null_count() > 0 { Some(mask) } else { None };
        Ok(Self { data, nulls })
    }

    /// Build a column of `data_type` from typed values.
    pub fn from_values(data_type: DataType, values: &[TypedValue]) -> Result<Self, BatchError> {
        if let Some(bad) = values.iter().find(|v| v.data_type() != data_type) {
            return Err(BatchError::ValueType {
                expected: data_type,
                actual: bad.data_type(),
            });
        }
        match data_type {
            DataType::Int32 => Self::from_options(data_type, values.iter().map(|v| v.as_i32())),
            DataType::Int64 => Self::from_options(data_type, values.iter().map(|v| v.as_i64())),
            DataType::UnsignedLong => Self::from_options(
                data_type,
                values.iter().map(|v| v.as_unsigned_encoded()),
            ),
            DataType::Double => Self::from_options(data_type, values.iter().map(|v| v.as_f64())),
            DataType::Boolean => {
                Self::from_options(data_type, values.iter().map(|v| v.as_bool()))
            }
        }
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn nulls(&self) -> Option<&NullMask> {
        self.nulls.as_ref()
    }

    pub fn data_type(&self) -> DataType {
        self.data.data_type()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    #[inline]
    pub fn is_null(&self, row: usize) -> bool {
        self.nulls.as_ref().is_some_and(|mask| mask.is_null(row))
    }

    pub fn null_count(&self) -> usize {
        self.nulls.as_ref().map_or(0, NullMask::null_count)
    }

    /// Typed nullable accessor for one row.
    pub fn get(&self, row: usize) -> Result<TypedValue, BatchError> {
        if row >= self.len() {
            return Err(BatchError::RowOutOfBounds {
                row,
                rows: self.len(),
            });
        }
        if self.is_null(row) {
            return Ok(TypedValue::null(self.data_type()));
        }
        Ok(TypedValue::from_bits(self.data_type(), self.data.bits_at(row)))
    }

    /// All rows as typed values, in order.
    pub fn to_values(&self) -> Vec<TypedValue> {
        (0..self.len())
            .map(|row| {
                if self.is_null(row) {
                    TypedValue::null(self.data_type())
                } else {
                    TypedValue::from_bits(self.data_type(), self.data.bits_at(row))
                }
            })
            .collect()
    }
}

/// A set of equal-length columns.
#[derive(Debug, Clone, PartialEq)]
pub struct Batch {
    columns: Vec<Column>,
    row_count: usize,
}

impl Batch {
    pub fn try_new(columns: Vec<Column>) -> Result<Self, BatchError> {
        let row_count = columns.first().map_or(0, Column::len);
        for (index, column) in columns.iter().enumerate() {
            if column.len() != row_count {
                return Err(BatchError::LengthMismatch {
                    index,
                    expected: row_count,
                    actual: column.len(),
                });
            }
        }
        Ok(Self { columns, row_count })
    }

    /// A batch with no columns but a known row count.
    pub fn empty(row_count: usize) -> Self {
        Self {
            columns: Vec::new(),
            row_count,
        }
    }

    pub fn column(&self, channel: Channel) -> Result<&Column, BatchError> {
        self.columns
            .get(channel.0)
            .ok_or(BatchError::ChannelOutOfBounds {
                channel: channel.0,
                columns: self.columns.len(),
            })
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    pub fn row_count(&self) -> usize {
        self.row_count
    }

    pub fn schema(&self) -> Vec<DataType> {
        self.columns.iter().map(Column::data_type).collect()
    }
}
