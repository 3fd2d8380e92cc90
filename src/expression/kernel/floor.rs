//! Floor kernels.
//!
//! Integer floors are identities; the unsigned one works on the encoded cell
//! since no bit pattern changes.

use crate::expression::kernel::Kernel;
use crate::types::DataType;

pub struct FloorInt;

impl Kernel for FloorInt {
    type Args = (i32,);
    type Output = i32;

    const NAME: &'static str = "FloorInt";
    const PARAMS: &'static [&'static str] = &["val"];
    const INPUTS: &'static [DataType] = &[DataType::Int32];
    const OUTPUT: DataType = DataType::Int32;
    const IDENTITY: bool = true;

    #[inline]
    fn apply((val,): (i32,)) -> i32 {
        val
    }
}

pub struct FloorLong;

impl Kernel for FloorLong {
    type Args = (i64,);
    type Output = i64;

    const NAME: &'static str = "FloorLong";
    const PARAMS: &'static [&'static str] = &["val"];
    const INPUTS: &'static [DataType] = &[DataType::Int64];
    const OUTPUT: DataType = DataType::Int64;
    const IDENTITY: bool = true;

    #[inline]
    fn apply((val,): (i64,)) -> i64 {
        val
    }
}

pub struct FloorUnsignedLong;

impl Kernel for FloorUnsignedLong {
    type Args = (i64,);
    type Output = i64;

    const NAME: &'static str = "FloorUnsignedLong";
    const PARAMS: &'static [&'static str] = &["val"];
    const INPUTS: &'static [DataType] = &[DataType::UnsignedLong];
    const OUTPUT: DataType = DataType::UnsignedLong;
    const IDENTITY: bool = true;

    #[inline]
    fn apply((val,): (i64,)) -> i64 {
        val
    }
}

/// IEEE-754 round toward negative infinity. NaN, infinities and signed
/// zeros come back unchanged.
pub struct FloorDouble;

impl Kernel for FloorDouble {
    type Args = (f64,);
    type Output = f64;

    const NAME: &'static str = "FloorDouble";
    const PARAMS: &'static [&'static str] = &["val"];
    const INPUTS: &'static [DataType] = &[DataType::Double];
    const OUTPUT: DataType = DataType::Double;

    #[inline]
    fn apply((val,): (f64,)) -> f64 {
        val.floor()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::unsigned;

    #[test]
    fn test_integer_floor_is_identity_at_bounds() {
        for v in [i32::MIN, -1, 0, 1, i32::MAX] {
            assert_eq!(FloorInt::apply((v,)), v);
        }
        for v in [i64::MIN, -1, 0, 1, i64::MAX] {
            assert_eq!(FloorLong::apply((v,)), v);
        }
    }

    #[test]
    fn test_unsigned_floor_on_encoded_cells() {
        for u in [0, 1, (1 << 63) - 1, 1 << 63, u64::MAX] {
            let floored = FloorUnsignedLong::apply((unsigned::encode(u),));
            assert_eq!(unsigned::decode(floored), u);
        }
    }

    #[test]
    fn test_double_floor() {
        assert_eq!(FloorDouble::apply((2.7,)), 2.0);
        assert_eq!(FloorDouble::apply((-2.1,)), -3.0);
        assert_eq!(FloorDouble::apply((-0.5,)), -1.0);
        assert_eq!(FloorDouble::apply((f64::MAX,)), f64::MAX);
        assert_eq!(FloorDouble::apply((f64::INFINITY,)), f64::INFINITY);
        assert_eq!(FloorDouble::apply((f64::NEG_INFINITY,)), f64::NEG_INFINITY);
        assert!(FloorDouble::apply((f64::NAN,)).is_nan());

        let neg_zero = FloorDouble::apply((-0.0,));
        assert_eq!(neg_zero, 0.0);
        assert!(neg_zero.is_sign_negative());
    }
}
