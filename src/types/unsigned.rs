//! Bias encoding of unsigned 64-bit values into signed 64-bit cells.
//!
//! Flipping the sign bit maps `0` to `i64::MIN` and `u64::MAX` to `i64::MAX`,
//! so signed comparison of encoded cells orders them like the unsigned
//! values. Identity functions (floor) and equality run on the encoded cells
//! directly; only conversions out of the unsigned domain need `decode`.

const SIGN_BIT: u64 = 1 << 63;

/// Encoded form of `0`.
pub const MIN_ENCODED: i64 = i64::MIN;

/// Encoded form of `u64::MAX`.
pub const MAX_ENCODED: i64 = i64::MAX;

#[inline]
pub fn encode(value: u64) -> i64 {
    (value ^ SIGN_BIT) as i64
}

#[inline]
pub fn decode(encoded: i64) -> u64 {
    (encoded as u64) ^ SIGN_BIT
}

/// Convert an encoded cell to the nearest `f64`.
#[inline]
pub fn to_f64(encoded: i64) -> f64 {
    decode(encoded) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    const TWO_POW_63: u64 = 1 << 63;

    #[test]
    fn test_boundary_round_trip() {
        for value in [0, 1, TWO_POW_63 - 1, TWO_POW_63, u64::MAX] {
            assert_eq!(decode(encode(value)), value);
        }
    }

    #[test]
    fn test_boundary_mapping() {
        assert_eq!(encode(0), MIN_ENCODED);
        assert_eq!(encode(u64::MAX), MAX_ENCODED);
        assert_eq!(encode(TWO_POW_63), 0);
        assert_eq!(encode(TWO_POW_63 - 1), -1);
    }

    #[test]
    fn test_order_preserved_at_sign_boundary() {
        // Raw reinterpretation would put 2^63 below 2^63 - 1
        let below = encode(TWO_POW_63 - 1);
        let above = encode(TWO_POW_63);
        assert!(below < above);
        assert!(encode(0) < encode(1));
        assert!(encode(u64::MAX - 1) < encode(u64::MAX));
    }

    #[test]
    fn test_to_f64() {
        assert_eq!(to_f64(encode(0)), 0.0);
        assert_eq!(to_f64(encode(12345)), 12345.0);
        assert_eq!(to_f64(encode(u64::MAX)), 18446744073709551615.0);
    }
}
