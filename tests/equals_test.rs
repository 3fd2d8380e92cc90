mod common;

use colscalar::expression::{EvalError, Function};
use colscalar::types::{DataType, TypedValue};
use common::*;
use rand::rngs::StdRng;

/// All pairs of boundary values of one type, with `eq` deciding the result.
fn pair_cases(data_type: DataType, eq: impl Fn(&TypedValue, &TypedValue) -> bool) -> Vec<TestCase> {
    let values = boundary_values(data_type);
    let mut cases = Vec::new();
    for lhs in &values {
        for rhs in &values {
            cases.push(TestCase::new(
                format!("{} == {}", lhs, rhs),
                vec![*lhs, *rhs],
                TypedValue::boolean(eq(lhs, rhs)),
            ));
        }
    }
    cases
}

fn ieee(lhs: &TypedValue, rhs: &TypedValue) -> bool {
    lhs.as_f64().unwrap() == rhs.as_f64().unwrap()
}

#[test]
fn test_equals_ints() {
    let cases = pair_cases(DataType::Int32, |a, b| a.as_i32() == b.as_i32());
    assert_eq!(
        check_cases(&registry(), Function::Equals, &cases),
        "EqualsIntsEvaluator[lhs=Attribute[channel=0], rhs=Attribute[channel=1]]"
    );
}

#[test]
fn test_equals_longs() {
    let cases = pair_cases(DataType::Int64, |a, b| a.as_i64() == b.as_i64());
    assert_eq!(
        check_cases(&registry(), Function::Equals, &cases),
        "EqualsLongsEvaluator[lhs=Attribute[channel=0], rhs=Attribute[channel=1]]"
    );
}

#[test]
fn test_equals_unsigned_longs_share_the_long_kernel_name() {
    let cases = pair_cases(DataType::UnsignedLong, |a, b| a.as_u64() == b.as_u64());
    assert_eq!(
        check_cases(&registry(), Function::Equals, &cases),
        "EqualsLongsEvaluator[lhs=Attribute[channel=0], rhs=Attribute[channel=1]]"
    );
}

#[test]
fn test_equals_doubles_ieee() {
    let cases = pair_cases(DataType::Double, ieee);
    assert_eq!(
        check_cases(&registry(), Function::Equals, &cases),
        "EqualsDoublesEvaluator[lhs=Attribute[channel=0], rhs=Attribute[channel=1]]"
    );

    let nan = TypedValue::double(f64::NAN);
    let cases = vec![
        TestCase::new("nan", vec![nan, nan], TypedValue::boolean(false)),
        TestCase::new(
            "signed zeros",
            vec![TypedValue::double(-0.0), TypedValue::double(0.0)],
            TypedValue::boolean(true),
        ),
    ];
    check_cases(&registry(), Function::Equals, &cases);
}

#[test]
fn test_equals_doubles_total_order() {
    let registry = registry_with(total_order());
    let cases = pair_cases(DataType::Double, |a, b| {
        let (a, b) = (a.as_f64().unwrap(), b.as_f64().unwrap());
        (a.is_nan() && b.is_nan()) || a == b
    });
    assert_eq!(
        check_cases(&registry, Function::Equals, &cases),
        "EqualsDoublesTotalOrderEvaluator[lhs=Attribute[channel=0], rhs=Attribute[channel=1]]"
    );

    let cases = vec![
        TestCase::new(
            "nan",
            vec![TypedValue::double(f64::NAN), TypedValue::double(-f64::NAN)],
            TypedValue::boolean(true),
        ),
        TestCase::new(
            "signed zeros",
            vec![TypedValue::double(0.0), TypedValue::double(-0.0)],
            TypedValue::boolean(true),
        ),
    ];
    check_cases(&registry, Function::Equals, &cases);
}

#[test]
fn test_equals_bools() {
    let cases = pair_cases(DataType::Boolean, |a, b| a.as_bool() == b.as_bool());
    assert_eq!(
        check_cases(&registry(), Function::Equals, &cases),
        "EqualsBoolsEvaluator[lhs=Attribute[channel=0], rhs=Attribute[channel=1]]"
    );
}

/// Random pairs of one type plus each left value paired with itself.
fn random_pair_cases(
    rng: &mut StdRng,
    data_type: DataType,
    eq: impl Fn(&TypedValue, &TypedValue) -> bool,
) -> Vec<TestCase> {
    let lhs = random_values(rng, data_type, 100);
    let rhs = random_values(rng, data_type, 100);
    let mut cases = Vec::new();
    for (a, b) in lhs.iter().zip(&rhs) {
        cases.push(TestCase::new(
            format!("{} == {}", a, b),
            vec![*a, *b],
            TypedValue::boolean(eq(a, b)),
        ));
        cases.push(TestCase::new(
            format!("{} == itself", a),
            vec![*a, *a],
            TypedValue::boolean(true),
        ));
    }
    cases
}

#[test]
fn test_equals_random_pairs() {
    let mut rng = seeded_rng();
    let registry = registry();
    let tables = [
        random_pair_cases(&mut rng, DataType::Int32, |a, b| a.as_i32() == b.as_i32()),
        random_pair_cases(&mut rng, DataType::Int64, |a, b| a.as_i64() == b.as_i64()),
        random_pair_cases(&mut rng, DataType::UnsignedLong, |a, b| a.as_u64() == b.as_u64()),
        random_pair_cases(&mut rng, DataType::Double, ieee),
        random_pair_cases(&mut rng, DataType::Boolean, |a, b| a.as_bool() == b.as_bool()),
    ];
    for cases in &tables {
        check_cases(&registry, Function::Equals, cases);
        check_cases(&registry, Function::Equals, &any_null_is_null(cases));
    }

    let cases = random_pair_cases(&mut rng, DataType::Double, ieee);
    check_cases(&registry_with(total_order()), Function::Equals, &cases);
}

#[test]
fn test_equals_five() {
    let registry = registry();
    let tables = [
        (TypedValue::int32(5), TypedValue::int32(-5)),
        (TypedValue::int64(5), TypedValue::int64(-5)),
        (TypedValue::double(5.0), TypedValue::double(-5.0)),
    ];
    for (five, minus_five) in tables {
        let cases = vec![
            TestCase::new("5 == 5", vec![five, five], TypedValue::boolean(true)),
            TestCase::new("5 == -5", vec![five, minus_five], TypedValue::boolean(false)),
        ];
        check_cases(&registry, Function::Equals, &cases);
    }

    let cases = vec![
        TestCase::new(
            "5 == 5",
            vec![TypedValue::unsigned_long(5), TypedValue::unsigned_long(5)],
            TypedValue::boolean(true),
        ),
        TestCase::new(
            "5 == 2^64 - 5",
            vec![TypedValue::unsigned_long(5), TypedValue::unsigned_long(5u64.wrapping_neg())],
            TypedValue::boolean(false),
        ),
    ];
    check_cases(&registry, Function::Equals, &cases);
}

#[test]
fn test_equals_is_symmetric() {
    let mut rng = seeded_rng();
    for config in [Default::default(), total_order()] {
        let registry = registry_with(config);
        for data_type in [
            DataType::Int32,
            DataType::Int64,
            DataType::UnsignedLong,
            DataType::Double,
            DataType::Boolean,
        ] {
            let evaluator = registry
                .bind(&call_on_channels(Function::Equals, &[data_type, data_type]))
                .unwrap();
            let mut values = random_values(&mut rng, data_type, 20);
            values.extend(boundary_values(data_type));
            for a in &values {
                for b in &values {
                    let ab = evaluator.eval_row(&single_row_batch(&[*a, *b]), 0).unwrap();
                    let ba = evaluator.eval_row(&single_row_batch(&[*b, *a]), 0).unwrap();
                    assert_eq!(ab, ba, "{} == {}", a, b);
                }
            }
        }
    }
}

#[test]
fn test_equals_null_is_null() {
    let registry = registry();
    let tables = [
        pair_cases(DataType::Int32, |a, b| a == b),
        pair_cases(DataType::Int64, |a, b| a == b),
        pair_cases(DataType::UnsignedLong, |a, b| a == b),
        pair_cases(DataType::Double, ieee),
        pair_cases(DataType::Boolean, |a, b| a == b),
    ];
    for cases in &tables {
        let nulls = any_null_is_null(cases);
        assert_eq!(nulls.len(), cases.len() * 2);
        check_cases(&registry, Function::Equals, &nulls);
    }

    let both_null = vec![TestCase::new(
        "null == null",
        vec![TypedValue::null(DataType::Int32), TypedValue::null(DataType::Int32)],
        TypedValue::null(DataType::Boolean),
    )];
    check_cases(&registry, Function::Equals, &both_null);
}

#[test]
fn test_equals_unsupported_types() {
    let registry = registry();
    let unsupported = unsupported_signatures(&registry, Function::Equals);
    assert_eq!(unsupported.len(), 20);

    for types in &unsupported {
        assert_ne!(types[0], types[1]);
        let err = registry
            .bind(&call_on_channels(Function::Equals, types))
            .unwrap_err();
        assert_eq!(
            err,
            EvalError::UnsupportedTypes {
                function: Function::Equals,
                types: types.clone(),
            }
        );
    }

    let err = registry
        .bind(&call_on_channels(
            Function::Equals,
            &[DataType::Int32, DataType::Boolean],
        ))
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "[equals] does not support argument types [integer, boolean]"
    );
}

#[test]
fn test_widened_equality() {
    let registry = registry_with(widen());
    let unsupported = unsupported_signatures(&registry, Function::Equals);
    assert_eq!(unsupported.len(), 12);
    assert!(unsupported.contains(&vec![DataType::UnsignedLong, DataType::Int64]));
    assert!(unsupported.contains(&vec![DataType::Boolean, DataType::Double]));

    let cases = vec![
        TestCase::new(
            "max int",
            vec![TypedValue::int32(i32::MAX), TypedValue::int64(i32::MAX as i64)],
            TypedValue::boolean(true),
        ),
        TestCase::new(
            "min int",
            vec![TypedValue::int32(i32::MIN), TypedValue::int64(i32::MIN as i64 - 1)],
            TypedValue::boolean(false),
        ),
    ];
    assert_eq!(
        check_cases(&registry, Function::Equals, &cases),
        "EqualsLongsEvaluator[lhs=CastIntToLongEvaluator[v=Attribute[channel=0]], rhs=Attribute[channel=1]]"
    );

    let cases = vec![
        TestCase::new(
            "zero",
            vec![TypedValue::double(0.0), TypedValue::unsigned_long(0)],
            TypedValue::boolean(true),
        ),
        TestCase::new(
            "max",
            vec![TypedValue::double(18_446_744_073_709_551_615.0), TypedValue::unsigned_long(u64::MAX)],
            TypedValue::boolean(true),
        ),
        TestCase::new(
            "half",
            vec![TypedValue::double(-9_223_372_036_854_775_808.0), TypedValue::unsigned_long(1 << 63)],
            TypedValue::boolean(false),
        ),
    ];
    assert_eq!(
        check_cases(&registry, Function::Equals, &cases),
        "EqualsDoublesEvaluator[lhs=Attribute[channel=0], rhs=CastUnsignedLongToDoubleEvaluator[v=Attribute[channel=1]]]"
    );

    // Longs beyond 2^53 round when widened
    let cases = vec![TestCase::new(
        "2^53 + 1",
        vec![TypedValue::int64((1 << 53) + 1), TypedValue::double(9_007_199_254_740_992.0)],
        TypedValue::boolean(true),
    )];
    check_cases(&registry, Function::Equals, &cases);
}

#[test]
fn test_widened_nulls_propagate_through_casts() {
    let registry = registry_with(widen());
    let cases = vec![
        TestCase::new(
            "one",
            vec![TypedValue::int32(1), TypedValue::double(1.0)],
            TypedValue::boolean(true),
        ),
        TestCase::new(
            "nan",
            vec![TypedValue::int32(1), TypedValue::double(f64::NAN)],
            TypedValue::boolean(false),
        ),
    ];
    check_cases(&registry, Function::Equals, &cases);
    check_cases(&registry, Function::Equals, &any_null_is_null(&cases));
}

#[test]
fn test_widened_total_order() {
    let mut config = widen();
    config.float_equality = total_order().float_equality;
    let registry = registry_with(config);
    let cases = vec![TestCase::new(
        "long vs double",
        vec![TypedValue::double(-3.0), TypedValue::int64(-3)],
        TypedValue::boolean(true),
    )];
    assert_eq!(
        check_cases(&registry, Function::Equals, &cases),
        "EqualsDoublesTotalOrderEvaluator[lhs=Attribute[channel=0], rhs=CastLongToDoubleEvaluator[v=Attribute[channel=1]]]"
    );
}
