//! Pure per-type computations and the operand plumbing they share.
//!
//! A kernel only sees non-null native operands. Reading operands out of
//! columns or row values, and deciding that a row is null, belongs to
//! [`Operands`] and the null-propagating wrapper in `evaluator`.

pub mod cast;
pub mod equals;
pub mod floor;

pub use cast::{CastIntToDouble, CastIntToLong, CastLongToDouble, CastUnsignedLongToDouble};
pub use equals::{
    EqualsBools, EqualsDoubles, EqualsDoublesTotalOrder, EqualsInts, EqualsLongs,
    EqualsUnsignedLongs,
};
pub use floor::{FloorDouble, FloorInt, FloorLong, FloorUnsignedLong};

use crate::batch::{Column, NullMask};
use crate::types::{DataType, NativeType, TypedValue};

/// One function specialized for one combination of operand types.
pub trait Kernel: Send + Sync + 'static {
    type Args: Operands;
    type Output: NativeType;

    /// Evaluator name prefix, e.g. `FloorDouble`.
    const NAME: &'static str;
    /// Parameter names in display order.
    const PARAMS: &'static [&'static str];
    const INPUTS: &'static [DataType];
    const OUTPUT: DataType;
    /// The kernel returns its single input unchanged, bit for bit. Binding
    /// such a kernel returns the operand evaluator itself, so `apply` is
    /// never called for it outside of unit tests.
    const IDENTITY: bool = false;

    fn apply(args: Self::Args) -> Self::Output;
}

/// Typed, null-aware view of one evaluated operand column.
pub struct ColumnView<'a, T> {
    values: &'a [T],
    nulls: Option<&'a NullMask>,
}

impl<'a, T: NativeType> ColumnView<'a, T> {
    pub fn new(column: &'a Column) -> Option<Self> {
        Some(Self {
            values: T::values(column.data())?,
            nulls: column.nulls(),
        })
    }

    #[inline]
    pub fn get(&self, row: usize) -> Option<T> {
        match self.nulls {
            Some(mask) if mask.is_null(row) => None,
            _ => Some(self.values[row]),
        }
    }
}

/// The argument tuple of a kernel.
///
/// Every method yields `None` as soon as one operand is null, which is the
/// whole of three-valued null propagation for scalar kernels.
pub trait Operands: Sized {
    const ARITY: usize;

    type Views<'a>;

    /// Borrow typed views of evaluated operand columns. `None` when a column
    /// is not stored as the expected primitive.
    fn views<'a>(columns: &[&'a Column]) -> Option<Self::Views<'a>>;

    fn gather(views: &Self::Views<'_>, row: usize) -> Option<Self>;

    fn from_values(values: &[TypedValue]) -> Option<Self>;
}

#[inline]
fn native<T: NativeType>(value: &TypedValue) -> Option<T> {
    if value.is_null() {
        None
    } else {
        Some(T::from_bits(value.bits()))
    }
}

impl<A: NativeType> Operands for (A,) {
    const ARITY: usize = 1;

    type Views<'a> = ColumnView<'a, A>;

    fn views<'a>(columns: &[&'a Column]) -> Option<Self::Views<'a>> {
        match columns {
            [a] => ColumnView::new(*a),
            _ => None,
        }
    }

    #[inline]
    fn gather(views: &Self::Views<'_>, row: usize) -> Option<Self> {
        Some((views.get(row)?,))
    }

    #[inline]
    fn from_values(values: &[TypedValue]) -> Option<Self> {
        match values {
            [a] => Some((native(a)?,)),
            _ => None,
        }
    }
}

impl<A: NativeType, B: NativeType> Operands for (A, B) {
    const ARITY: usize = 2;

    type Views<'a> = (ColumnView<'a, A>, ColumnView<'a, B>);

    fn views<'a>(columns: &[&'a Column]) -> Option<Self::Views<'a>> {
        match columns {
            [a, b] => Some((ColumnView::new(*a)?, ColumnView::new(*b)?)),
            _ => None,
        }
    }

    #[inline]
    fn gather(views: &Self::Views<'_>, row: usize) -> Option<Self> {
        let a = views.0.get(row);
        let b = views.1.get(row);
        Some((a?, b?))
    }

    #[inline]
    fn from_values(values: &[TypedValue]) -> Option<Self> {
        match values {
            [a, b] => {
                let a = native(a);
                let b = native(b);
                Some((a?, b?))
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::batch::ColumnData;

    #[test]
    fn test_unary_operands() {
        assert_eq!(
            <(i32,)>::from_values(&[TypedValue::int32(5)]),
            Some((5,))
        );
        assert_eq!(
            <(i32,)>::from_values(&[TypedValue::null(DataType::Int32)]),
            None
        );
        assert_eq!(<(i32,)>::from_values(&[]), None);
    }

    #[test]
    fn test_binary_operands_any_null_is_null() {
        let five = TypedValue::int64(5);
        let null = TypedValue::null(DataType::Int64);
        assert_eq!(<(i64, i64)>::from_values(&[five, five]), Some((5, 5)));
        assert_eq!(<(i64, i64)>::from_values(&[null, five]), None);
        assert_eq!(<(i64, i64)>::from_values(&[five, null]), None);
        assert_eq!(<(i64, i64)>::from_values(&[null, null]), None);
    }

    #[test]
    fn test_views_gather() {
        let doubles =
            Column::from_options(DataType::Double, vec![Some(1.5), None, Some(2.5)]).unwrap();
        let bools = Column::non_null(ColumnData::Boolean(vec![true, true, false]));
        let views = <(f64, bool)>::views(&[&doubles, &bools]).unwrap();
        assert_eq!(<(f64, bool)>::gather(&views, 0), Some((1.5, true)));
        assert_eq!(<(f64, bool)>::gather(&views, 1), None);
        assert_eq!(<(f64, bool)>::gather(&views, 2), Some((2.5, false)));
    }

    #[test]
    fn test_views_reject_wrong_storage() {
        let ints = Column::non_null(ColumnData::Int32(vec![1]));
        assert!(<(i64,)>::views(&[&ints]).is_none());
        assert!(<(i32, i32)>::views(&[&ints]).is_none());
    }
}
