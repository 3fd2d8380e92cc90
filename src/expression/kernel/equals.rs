//! Equality kernels. All return booleans and take `lhs`/`rhs`.

use crate::expression::kernel::Kernel;
use crate::types::DataType;
use ordered_float::OrderedFloat;

const LHS_RHS: &[&str] = &["lhs", "rhs"];

pub struct EqualsInts;

impl Kernel for EqualsInts {
    type Args = (i32, i32);
    type Output = bool;

    const NAME: &'static str = "EqualsInts";
    const PARAMS: &'static [&'static str] = LHS_RHS;
    const INPUTS: &'static [DataType] = &[DataType::Int32, DataType::Int32];
    const OUTPUT: DataType = DataType::Boolean;

    #[inline]
    fn apply((lhs, rhs): (i32, i32)) -> bool {
        lhs == rhs
    }
}

pub struct EqualsLongs;

impl Kernel for EqualsLongs {
    type Args = (i64, i64);
    type Output = bool;

    const NAME: &'static str = "EqualsLongs";
    const PARAMS: &'static [&'static str] = LHS_RHS;
    const INPUTS: &'static [DataType] = &[DataType::Int64, DataType::Int64];
    const OUTPUT: DataType = DataType::Boolean;

    #[inline]
    fn apply((lhs, rhs): (i64, i64)) -> bool {
        lhs == rhs
    }
}

/// Compares encoded cells with the signed primitive. The encoding is a
/// bijection, so equal cells mean equal unsigned values.
pub struct EqualsUnsignedLongs;

impl Kernel for EqualsUnsignedLongs {
    type Args = (i64, i64);
    type Output = bool;

    const NAME: &'static str = EqualsLongs::NAME;
    const PARAMS: &'static [&'static str] = LHS_RHS;
    const INPUTS: &'static [DataType] = &[DataType::UnsignedLong, DataType::UnsignedLong];
    const OUTPUT: DataType = DataType::Boolean;

    #[inline]
    fn apply(args: (i64, i64)) -> bool {
        EqualsLongs::apply(args)
    }
}

/// Strict IEEE-754 equality: NaN equals nothing, `-0.0 == 0.0`.
pub struct EqualsDoubles;

impl Kernel for EqualsDoubles {
    type Args = (f64, f64);
    type Output = bool;

    const NAME: &'static str = "EqualsDoubles";
    const PARAMS: &'static [&'static str] = LHS_RHS;
    const INPUTS: &'static [DataType] = &[DataType::Double, DataType::Double];
    const OUTPUT: DataType = DataType::Boolean;

    #[inline]
    fn apply((lhs, rhs): (f64, f64)) -> bool {
        lhs == rhs
    }
}

/// Equality under a total order: every NaN equals every other NaN, `-0.0 ==
/// 0.0`, everything else as IEEE.
pub struct EqualsDoublesTotalOrder;

impl Kernel for EqualsDoublesTotalOrder {
    type Args = (f64, f64);
    type Output = bool;

    const NAME: &'static str = "EqualsDoublesTotalOrder";
    const PARAMS: &'static [&'static str] = LHS_RHS;
    const INPUTS: &'static [DataType] = &[DataType::Double, DataType::Double];
    const OUTPUT: DataType = DataType::Boolean;

    #[inline]
    fn apply((lhs, rhs): (f64, f64)) -> bool {
        OrderedFloat(lhs) == OrderedFloat(rhs)
    }
}

pub struct EqualsBools;

impl Kernel for EqualsBools {
    type Args = (bool, bool);
    type Output = bool;

    const NAME: &'static str = "EqualsBools";
    const PARAMS: &'static [&'static str] = LHS_RHS;
    const INPUTS: &'static [DataType] = &[DataType::Boolean, DataType::Boolean];
    const OUTPUT: DataType = DataType::Boolean;

    #[inline]
    fn apply((lhs, rhs): (bool, bool)) -> bool {
        lhs == rhs
    }
}
