//! The closed set of scalar data types.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Data types supported by the evaluation layer.
///
/// The set is closed: every function registered with the dispatcher must
/// provide a kernel (or an explicit rejection) for each variant, so adding a
/// variant here breaks every exhaustive match until kernels are supplied.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DataType {
    #[serde(rename = "integer")]
    Int32 = 1,
    #[serde(rename = "long")]
    Int64 = 2,
    /// Unsigned 64-bit integer stored bias-encoded in an `i64` cell.
    #[serde(rename = "unsigned_long")]
    UnsignedLong = 3,
    #[serde(rename = "double")]
    Double = 4,
    #[serde(rename = "boolean")]
    Boolean = 5,
}

/// Static storage traits of a data type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DataTypeInfo {
    /// Width of one stored cell in bytes
    pub width_bytes: usize,
    /// Whether the stored representation is a signed number
    pub signed: bool,
    /// Whether the type takes part in arithmetic functions
    pub numeric: bool,
    /// Whether values of the type can be compared for equality
    pub comparable: bool,
}

impl DataType {
    /// Every supported data type, in tag order.
    pub const ALL: [DataType; 5] = [
        DataType::Int32,
        DataType::Int64,
        DataType::UnsignedLong,
        DataType::Double,
        DataType::Boolean,
    ];

    /// Decode a storage tag written by [`DataType::tag`].
    pub fn from_u8(value: u8) -> Option<Self> {
        match value {
            1 => Some(DataType::Int32),
            2 => Some(DataType::Int64),
            3 => Some(DataType::UnsignedLong),
            4 => Some(DataType::Double),
            5 => Some(DataType::Boolean),
            _ => None,
        }
    }

    pub fn tag(self) -> u8 {
        self as u8
    }

    pub fn info(self) -> DataTypeInfo {
        match self {
            DataType::Int32 => DataTypeInfo {
                width_bytes: 4,
                signed: true,
                numeric: true,
                comparable: true,
            },
            DataType::Int64 => DataTypeInfo {
                width_bytes: 8,
                signed: true,
                numeric: true,
                comparable: true,
            },
            DataType::UnsignedLong => DataTypeInfo {
                width_bytes: 8,
                signed: false,
                numeric: true,
                comparable: true,
            },
            DataType::Double => DataTypeInfo {
                width_bytes: 8,
                signed: true,
                numeric: true,
                comparable: true,
            },
            DataType::Boolean => DataTypeInfo {
                width_bytes: 1,
                signed: false,
                numeric: false,
                comparable: true,
            },
        }
    }

    pub fn is_numeric(self) -> bool {
        self.info().numeric
    }

    /// Name used in error messages, plans and the CLI.
    pub fn type_name(self) -> &'static str {
        match self {
            DataType::Int32 => "integer",
            DataType::Int64 => "long",
            DataType::UnsignedLong => "unsigned_long",
            DataType::Double => "double",
            DataType::Boolean => "boolean",
        }
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.type_name())
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "integer" | "int" | "int32" => Ok(DataType::Int32),
            "long" | "int64" => Ok(DataType::Int64),
            "unsigned_long" | "uint64" => Ok(DataType::UnsignedLong),
            "double" | "float64" => Ok(DataType::Double),
            "boolean" | "bool" => Ok(DataType::Boolean),
            other => Err(format!("unknown data type: {}", other)),
        }
    }
}
