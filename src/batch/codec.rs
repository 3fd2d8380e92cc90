//! Binary frame format for batches.
//!
//! All integers are little endian.
//!
//! ```text
//! frame   := u32 batch_count, batch*
//! batch   := u32 byte_len, u16 column_count, u32 row_count, column*
//! column  := u8 type_tag, u8 has_nulls, [null bitmap], values
//! ```
//!
//! The null bitmap is present only when `has_nulls` is 1 and uses the
//! [`NullMask`] layout. Values are `row_count` fixed-width cells; null cells
//! are written as zero. Unsigned longs are written in their encoded form.

use crate::batch::{Batch, BatchError, Column, ColumnData, NullMask};
use crate::types::DataType;
use byteorder::{ByteOrder, LittleEndian};
use bytes::{BufMut, Bytes, BytesMut};
use thiserror::Error;

/// Errors that can occur while encoding or decoding a frame.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CodecError {
    #[error("Frame truncated: needed {needed} bytes at offset {offset}, {available} available")]
    Truncated {
        offset: usize,
        needed: usize,
        available: usize,
    },

    #[error("Unknown data type tag: {0}")]
    UnknownTypeTag(u8),

    #[error("Invalid null flag: {0}")]
    InvalidNullFlag(u8),

    #[error("Invalid boolean byte {value} at offset {offset}")]
    InvalidBoolean { offset: usize, value: u8 },

    #[error("Batch declares {declared} bytes but {actual} were decoded")]
    LengthMismatch { declared: usize, actual: usize },

    #[error("{0} trailing bytes after the last batch")]
    TrailingBytes(usize),

    #[error("Null bitmap at offset {offset} marks rows past the column end")]
    NullPadding { offset: usize },

    /// Raised while encoding: a count does not fit its header field.
    #[error("Batch {field} {value} exceeds the frame limit of {max}")]
    TooLarge {
        field: &'static str,
        value: usize,
        max: usize,
    },

    #[error("Invalid batch: {0}")]
    Batch(#[from] BatchError),
}

/// Result type for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Encode batches into a single frame.
pub fn encode_batches(batches: &[Batch]) -> CodecResult<Bytes> {
    let mut buf = BytesMut::new();
    buf.put_u32_le(fit_u32("count", batches.len())?);
    for batch in batches {
        encode_batch(batch, &mut buf)?;
    }
    Ok(buf.freeze())
}

fn fit_u16(field: &'static str, value: usize) -> CodecResult<u16> {
    u16::try_from(value).map_err(|_| CodecError::TooLarge {
        field,
        value,
        max: u16::MAX as usize,
    })
}

fn fit_u32(field: &'static str, value: usize) -> CodecResult<u32> {
    u32::try_from(value).map_err(|_| CodecError::TooLarge {
        field,
        value,
        max: u32::MAX as usize,
    })
}

/// Decode a frame produced by [`encode_batches`].
pub fn decode_batches(data: &[u8]) -> CodecResult<Vec<Batch>> {
    let mut reader = Reader::new(data);
    let count = LittleEndian::read_u32(reader.take(4)?) as usize;
    let mut batches = Vec::with_capacity(count.min(1024));
    for _ in 0..count {
        batches.push(decode_batch(&mut reader)?);
    }
    if reader.remaining() > 0 {
        return Err(CodecError::TrailingBytes(reader.remaining()));
    }
    Ok(batches)
}

fn encode_batch(batch: &Batch, buf: &mut BytesMut) -> CodecResult<()> {
    let start = buf.len();
    buf.put_u32_le(0); // placeholder for length
    buf.put_u16_le(fit_u16("column count", batch.column_count())?);
    buf.put_u32_le(fit_u32("row count", batch.row_count())?);
    for column in batch.columns() {
        encode_column(column, buf);
    }
    let len = fit_u32("byte length", buf.len() - start - 4)?;
    buf[start..start + 4].copy_from_slice(&len.to_le_bytes());
    Ok(())
}

fn encode_column(column: &Column, buf: &mut BytesMut) {
    buf.put_u8(column.data_type().tag());
    match column.nulls() {
        Some(mask) => {
            buf.put_u8(1);
            buf.put_slice(mask.as_bytes());
        }
        None => buf.put_u8(0),
    }

    let is_null = |row: usize| column.is_null(row);
    match column.data() {
        ColumnData::Int32(values) => {
            for (row, v) in values.iter().enumerate() {
                buf.put_i32_le(if is_null(row) { 0 } else { *v });
            }
        }
        ColumnData::Int64(values) | ColumnData::UnsignedLong(values) => {
            for (row, v) in values.iter().enumerate() {
                buf.put_i64_le(if is_null(row) { 0 } else { *v });
            }
        }
        ColumnData::Double(values) => {
            for (row, v) in values.iter().enumerate() {
                buf.put_f64_le(if is_null(row) { 0.0 } else { *v });
            }
        }
        ColumnData::Boolean(values) => {
            for (row, v) in values.iter().enumerate() {
                buf.put_u8(if !is_null(row) && *v { 1 } else { 0 });
            }
        }
    }
}

fn decode_batch(reader: &mut Reader<'_>) -> CodecResult<Batch> {
    let declared = LittleEndian::read_u32(reader.take(4)?) as usize;
    let start = reader.offset;

    let column_count = LittleEndian::read_u16(reader.take(2)?) as usize;
    let row_count = LittleEndian::read_u32(reader.take(4)?) as usize;

    let mut columns = Vec::with_capacity(column_count);
    for _ in 0..column_count {
        columns.push(decode_column(reader, row_count)?);
    }

    let actual = reader.offset - start;
    if actual != declared {
        return Err(CodecError::LengthMismatch { declared, actual });
    }

    if columns.is_empty() {
        return Ok(Batch::empty(row_count));
    }
    Ok(Batch::try_new(columns)?)
}

fn decode_column(reader: &mut Reader<'_>, rows: usize) -> CodecResult<Column> {
    let tag = reader.take(1)?[0];
    let data_type = DataType::from_u8(tag).ok_or(CodecError::UnknownTypeTag(tag))?;

    let nulls = match reader.take(1)?[0] {
        0 => None,
        1 => {
            let offset = reader.offset;
            let bytes = reader.take(rows.div_ceil(8))?.to_vec();
            Some(NullMask::from_bytes(bytes, rows).ok_or(CodecError::NullPadding { offset })?)
        }
        other => return Err(CodecError::InvalidNullFlag(other)),
    };

    let width = data_type.info().width_bytes;
    let offset = reader.offset;
    let src = reader.take(rows * width)?;
    let data = match data_type {
        DataType::Int32 => {
            let mut values = vec![0i32; rows];
            LittleEndian::read_i32_into(src, &mut values);
            ColumnData::Int32(values)
        }
        DataType::Int64 => {
            let mut values = vec![0i64; rows];
            LittleEndian::read_i64_into(src, &mut values);
            ColumnData::Int64(values)
        }
        DataType::UnsignedLong => {
            let mut values = vec![0i64; rows];
            LittleEndian::read_i64_into(src, &mut values);
            ColumnData::UnsignedLong(values)
        }
        DataType::Double => {
            let mut values = vec![0f64; rows];
            LittleEndian::read_f64_into(src, &mut values);
            ColumnData::Double(values)
        }
        DataType::Boolean => {
            let mut values = Vec::with_capacity(rows);
            for (i, byte) in src.iter().enumerate() {
                match byte {
                    0 => values.push(false),
                    1 => values.push(true),
                    value => {
                        return Err(CodecError::InvalidBoolean {
                            offset: offset + i,
                            value: *value,
                        })
                    }
                }
            }
            ColumnData::Boolean(values)
        }
    };

    Ok(Column::new(data, nulls)?)
}

struct Reader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> Reader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, n: usize) -> CodecResult<&'a [u8]> {
        if self.remaining() < n {
            return Err(CodecError::Truncated {
                offset: self.offset,
                needed: n,
                available: self.remaining(),
            });
        }
        let slice = &self.data[self.offset..self.offset + n];
        self.offset += n;
        Ok(slice)
    }
}
