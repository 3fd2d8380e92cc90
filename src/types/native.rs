//! Mapping between Rust primitives and column storage.

use crate::batch::ColumnData;
use crate::types::DataType;

/// A Rust primitive that backs one or more data types.
///
/// `i64` backs both `Int64` and the encoded `UnsignedLong`; the data type of
/// a result is therefore always supplied by the caller rather than inferred
/// from the primitive.
pub trait NativeType: Copy + Default + std::fmt::Debug + Send + Sync + 'static {
    fn from_bits(bits: u64) -> Self;

    fn to_bits(self) -> u64;

    /// Borrow the typed storage of a column, if it holds this primitive.
    fn values(data: &ColumnData) -> Option<&[Self]>;

    /// Wrap a vector as column storage of `data_type`. Returns `None` when the
    /// data type is not backed by this primitive.
    fn wrap(values: Vec<Self>, data_type: DataType) -> Option<ColumnData>;
}

impl NativeType for i32 {
    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits as u32 as i32
    }

    #[inline]
    fn to_bits(self) -> u64 {
        self as u32 as u64
    }

    fn values(data: &ColumnData) -> Option<&[Self]> {
        match data {
            ColumnData::Int32(values) => Some(values),
            ColumnData::Int64(_)
            | ColumnData::UnsignedLong(_)
            | ColumnData::Double(_)
            | ColumnData::Boolean(_) => None,
        }
    }

    fn wrap(values: Vec<Self>, data_type: DataType) -> Option<ColumnData> {
        match data_type {
            DataType::Int32 => Some(ColumnData::Int32(values)),
            DataType::Int64 | DataType::UnsignedLong | DataType::Double | DataType::Boolean => {
                None
            }
        }
    }
}

impl NativeType for i64 {
    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits as i64
    }

    #[inline]
    fn to_bits(self) -> u64 {
        self as u64
    }

    fn values(data: &ColumnData) -> Option<&[Self]> {
        match data {
            ColumnData::Int64(values) | ColumnData::UnsignedLong(values) => Some(values),
            ColumnData::Int32(_) | ColumnData::Double(_) | ColumnData::Boolean(_) => None,
        }
    }

    fn wrap(values: Vec<Self>, data_type: DataType) -> Option<ColumnData> {
        match data_type {
            DataType::Int64 => Some(ColumnData::Int64(values)),
            DataType::UnsignedLong => Some(ColumnData::UnsignedLong(values)),
            DataType::Int32 | DataType::Double | DataType::Boolean => None,
        }
    }
}

impl NativeType for f64 {
    #[inline]
    fn from_bits(bits: u64) -> Self {
        f64::from_bits(bits)
    }

    #[inline]
    fn to_bits(self) -> u64 {
        f64::to_bits(self)
    }

    fn values(data: &ColumnData) -> Option<&[Self]> {
        match data {
            ColumnData::Double(values) => Some(values),
            ColumnData::Int32(_)
            | ColumnData::Int64(_)
            | ColumnData::UnsignedLong(_)
            | ColumnData::Boolean(_) => None,
        }
    }

    fn wrap(values: Vec<Self>, data_type: DataType) -> Option<ColumnData> {
        match data_type {
            DataType::Double => Some(ColumnData::Double(values)),
            DataType::Int32 | DataType::Int64 | DataType::UnsignedLong | DataType::Boolean => {
                None
            }
        }
    }
}

impl NativeType for bool {
    #[inline]
    fn from_bits(bits: u64) -> Self {
        bits != 0
    }

    #[inline]
    fn to_bits(self) -> u64 {
        self as u64
    }

    fn values(data: &ColumnData) -> Option<&[Self]> {
        match data {
            ColumnData::Boolean(values) => Some(values),
            ColumnData::Int32(_)
            | ColumnData::Int64(_)
            | ColumnData::UnsignedLong(_)
            | ColumnData::Double(_) => None,
        }
    }

    fn wrap(values: Vec<Self>, data_type: DataType) -> Option<ColumnData> {
        match data_type {
            DataType::Boolean => Some(ColumnData::Boolean(values)),
            DataType::Int32 | DataType::Int64 | DataType::UnsignedLong | DataType::Double => {
                None
            }
        }
    }
}
