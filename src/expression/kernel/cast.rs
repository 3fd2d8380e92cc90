//! Widening casts inserted when equality compares mixed numeric types.

use crate::expression::kernel::Kernel;
use crate::types::{unsigned, DataType};

pub struct CastIntToLong;

impl Kernel for CastIntToLong {
    type Args = (i32,);
    type Output = i64;

    const NAME: &'static str = "CastIntToLong";
    const PARAMS: &'static [&'static str] = &["v"];
    const INPUTS: &'static [DataType] = &[DataType::Int32];
    const OUTPUT: DataType = DataType::Int64;

    #[inline]
    fn apply((v,): (i32,)) -> i64 {
        i64::from(v)
    }
}

pub struct CastIntToDouble;

impl Kernel for CastIntToDouble {
    type Args = (i32,);
    type Output = f64;

    const NAME: &'static str = "CastIntToDouble";
    const PARAMS: &'static [&'static str] = &["v"];
    const INPUTS: &'static [DataType] = &[DataType::Int32];
    const OUTPUT: DataType = DataType::Double;

    #[inline]
    fn apply((v,): (i32,)) -> f64 {
        f64::from(v)
    }
}

/// Rounds to the nearest double above 2^53 in magnitude.
pub struct CastLongToDouble;

impl Kernel for CastLongToDouble {
    type Args = (i64,);
    type Output = f64;

    const NAME: &'static str = "CastLongToDouble";
    const PARAMS: &'static [&'static str] = &["v"];
    const INPUTS: &'static [DataType] = &[DataType::Int64];
    const OUTPUT: DataType = DataType::Double;

    #[inline]
    fn apply((v,): (i64,)) -> f64 {
        v as f64
    }
}

pub struct CastUnsignedLongToDouble;

impl Kernel for CastUnsignedLongToDouble {
    type Args = (i64,);
    type Output = f64;

    const NAME: &'static str = "CastUnsignedLongToDouble";
    const PARAMS: &'static [&'static str] = &["v"];
    const INPUTS: &'static [DataType] = &[DataType::UnsignedLong];
    const OUTPUT: DataType = DataType::Double;

    #[inline]
    fn apply((v,): (i64,)) -> f64 {
        unsigned::to_f64(v)
    }
}
