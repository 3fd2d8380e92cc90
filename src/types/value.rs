//! Single typed values.

use crate::types::{unsigned, DataType};
use std::fmt;

/// A value tagged with its data type.
///
/// The payload is kept as raw bits: `i32`/`i64` two's complement, `f64` IEEE
/// bits, booleans as `0`/`1`. Unsigned longs carry their *encoded* signed
/// representation. The payload of a null value is zero and never read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TypedValue {
    data_type: DataType,
    bits: u64,
    null: bool,
}

impl TypedValue {
    pub fn null(data_type: DataType) -> Self {
        Self {
            data_type,
            bits: 0,
            null: true,
        }
    }

    /// Build a non-null value from raw bits.
    pub fn from_bits(data_type: DataType, bits: u64) -> Self {
        Self {
            data_type,
            bits,
            null: false,
        }
    }

    pub fn int32(value: i32) -> Self {
        Self::from_bits(DataType::Int32, value as u32 as u64)
    }

    pub fn int64(value: i64) -> Self {
        Self::from_bits(DataType::Int64, value as u64)
    }

    /// Build an unsigned long from its mathematical value.
    pub fn unsigned_long(value: u64) -> Self {
        Self::unsigned_long_encoded(unsigned::encode(value))
    }

    /// Build an unsigned long from an already encoded cell.
    pub fn unsigned_long_encoded(encoded: i64) -> Self {
        Self::from_bits(DataType::UnsignedLong, encoded as u64)
    }

    pub fn double(value: f64) -> Self {
        Self::from_bits(DataType::Double, value.to_bits())
    }

    pub fn boolean(value: bool) -> Self {
        Self::from_bits(DataType::Boolean, value as u64)
    }

    pub fn data_type(&self) -> DataType {
        self.data_type
    }

    pub fn is_null(&self) -> bool {
        self.null
    }

    /// Raw payload bits, meaningless when the value is null.
    pub fn bits(&self) -> u64 {
        self.bits
    }

    pub fn as_i32(&self) -> Option<i32> {
        self.payload(DataType::Int32).map(|bits| bits as u32 as i32)
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.payload(DataType::Int64).map(|bits| bits as i64)
    }

    /// Decoded unsigned value.
    pub fn as_u64(&self) -> Option<u64> {
        self.as_unsigned_encoded().map(unsigned::decode)
    }

    pub fn as_unsigned_encoded(&self) -> Option<i64> {
        self.payload(DataType::UnsignedLong).map(|bits| bits as i64)
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.payload(DataType::Double).map(f64::from_bits)
    }

    pub fn as_bool(&self) -> Option<bool> {
        self.payload(DataType::Boolean).map(|bits| bits != 0)
    }

    fn payload(&self, expected: DataType) -> Option<u64> {
        if self.null || self.data_type != expected {
            None
        } else {
            Some(self.bits)
        }
    }
}

impl fmt::Display for TypedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.null {
            return f.write_str("null");
        }
        match self.data_type {
            DataType::Int32 => write!(f, "{}", self.bits as u32 as i32),
            DataType::Int64 => write!(f, "{}", self.bits as i64),
            DataType::UnsignedLong => write!(f, "{}", unsigned::decode(self.bits as i64)),
            DataType::Double => write!(f, "{}", f64::from_bits(self.bits)),
            DataType::Boolean => write!(f, "{}", self.bits != 0),
        }
    }
}
