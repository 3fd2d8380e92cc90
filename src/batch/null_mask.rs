//! Null bitmap for a column.

/// One bit per row, least significant bit first within each byte. A set bit
/// marks the row as null. The byte layout is the one written by the batch
/// codec.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NullMask {
    bytes: Vec<u8>,
    len: usize,
}

impl NullMask {
    /// A mask of `len` rows with no nulls.
    pub fn new(len: usize) -> Self {
        Self {
            bytes: vec![0u8; len.div_ceil(8)],
            len,
        }
    }

    /// Rebuild a mask from its byte layout. Returns `None` when the byte
    /// count does not match `len` or a padding bit past `len` is set.
    pub fn from_bytes(bytes: Vec<u8>, len: usize) -> Option<Self> {
        if bytes.len() != len.div_ceil(8) {
            return None;
        }
        let used = len % 8;
        if used != 0 && bytes.last().is_some_and(|last| last >> used != 0) {
            return None;
        }
        Some(Self { bytes, len })
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_null(&self, row: usize) -> bool {
        (self.bytes[row / 8] & (1 << (row % 8))) != 0
    }

    #[inline]
    pub fn set_null(&mut self, row: usize) {
        self.bytes[row / 8] |= 1 << (row % 8);
    }

    pub fn push(&mut self, is_null: bool) {
        if self.len % 8 == 0 {
            self.bytes.push(0);
        }
        self.len += 1;
        if is_null {
            self.set_null(self.len - 1);
        }
    }

    pub fn null_count(&self) -> usize {
        self.bytes.iter().map(|b| b.count_ones() as usize).sum()
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}
