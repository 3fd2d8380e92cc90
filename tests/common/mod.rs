#![allow(dead_code)]

//! Fixture tables shared by the integration tests.

use colscalar::batch::{Batch, Column};
use colscalar::expression::dispatch::all_signatures;
use colscalar::expression::{
    CrossTypeEquality, FloatEquality, Function, FunctionRegistry, RegistryConfig, ResolvedExpr,
};
use colscalar::types::{unsigned, DataType, TypedValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// One row of inputs and the value the function must produce for it.
#[derive(Debug, Clone)]
pub struct TestCase {
    pub name: String,
    pub inputs: Vec<TypedValue>,
    pub expected: TypedValue,
}

impl TestCase {
    pub fn new(name: impl Into<String>, inputs: Vec<TypedValue>, expected: TypedValue) -> Self {
        Self {
            name: name.into(),
            inputs,
            expected,
        }
    }

    pub fn types(&self) -> Vec<DataType> {
        self.inputs.iter().map(|v| v.data_type()).collect()
    }
}

pub fn registry() -> FunctionRegistry {
    registry_with(RegistryConfig::default())
}

pub fn registry_with(config: RegistryConfig) -> FunctionRegistry {
    FunctionRegistry::with_builtins(config).expect("builtins pass coverage")
}

pub fn total_order() -> RegistryConfig {
    RegistryConfig {
        float_equality: FloatEquality::TotalOrder,
        ..RegistryConfig::default()
    }
}

pub fn widen() -> RegistryConfig {
    RegistryConfig {
        cross_type: CrossTypeEquality::Widen,
        ..RegistryConfig::default()
    }
}

/// `function` applied to attributes `0..n`, one per type.
pub fn call_on_channels(function: Function, types: &[DataType]) -> ResolvedExpr {
    ResolvedExpr::call(
        function,
        types
            .iter()
            .enumerate()
            .map(|(channel, t)| ResolvedExpr::attribute(channel, *t))
            .collect(),
    )
}

/// A batch holding each value in its own column.
pub fn single_row_batch(values: &[TypedValue]) -> Batch {
    let columns = values
        .iter()
        .map(|v| Column::from_values(v.data_type(), &[*v]).expect("column of one value"))
        .collect();
    Batch::try_new(columns).expect("equal length columns")
}

/// A batch with one row per case, columns in argument order.
pub fn batch_of_cases(cases: &[TestCase]) -> Batch {
    let types = cases[0].types();
    let columns = types
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let values: Vec<TypedValue> = cases.iter().map(|c| c.inputs[i]).collect();
            Column::from_values(*t, &values).expect("cases share a signature")
        })
        .collect();
    Batch::try_new(columns).expect("equal length columns")
}

/// Equality of results, treating any two NaNs as the same value.
pub fn same_value(actual: &TypedValue, expected: &TypedValue) -> bool {
    match (actual.as_f64(), expected.as_f64()) {
        (Some(a), Some(b)) if a.is_nan() && b.is_nan() => true,
        _ => actual == expected,
    }
}

/// Evaluate every case through both paths and check the results. Returns the
/// display string of the evaluator bound for the first case.
pub fn check_cases(registry: &FunctionRegistry, function: Function, cases: &[TestCase]) -> String {
    let types = cases[0].types();
    let evaluator = registry
        .bind(&call_on_channels(function, &types))
        .expect("supported signature");

    for case in cases {
        assert_eq!(case.types(), types, "{}: mixed signatures", case.name);
        let batch = single_row_batch(&case.inputs);
        let actual = evaluator.eval_row(&batch, 0).expect("row evaluation");
        assert!(
            same_value(&actual, &case.expected),
            "{}: expected {}, got {}",
            case.name,
            case.expected,
            actual
        );
    }

    let batch = batch_of_cases(cases);
    let column = evaluator.eval_batch(&batch).expect("batch evaluation");
    assert_eq!(column.len(), cases.len());
    for (case, actual) in cases.iter().zip(column.to_values()) {
        assert!(
            same_value(&actual, &case.expected),
            "{} (batch): expected {}, got {}",
            case.name,
            case.expected,
            actual
        );
    }

    evaluator.to_string()
}

/// For every case and argument position, the same case with that argument
/// replaced by null. The expected result is null of the output type.
pub fn any_null_is_null(cases: &[TestCase]) -> Vec<TestCase> {
    let mut out = Vec::new();
    for case in cases {
        let output = case.expected.data_type();
        for position in 0..case.inputs.len() {
            let mut inputs = case.inputs.clone();
            inputs[position] = TypedValue::null(inputs[position].data_type());
            out.push(TestCase::new(
                format!("{} with null arg {}", case.name, position),
                inputs,
                TypedValue::null(output),
            ));
        }
    }
    out
}

/// Edge values of every type.
pub fn boundary_values(data_type: DataType) -> Vec<TypedValue> {
    match data_type {
        DataType::Int32 => [i32::MIN, -1, 0, 1, i32::MAX]
            .into_iter()
            .map(TypedValue::int32)
            .collect(),
        DataType::Int64 => [i64::MIN, -1, 0, 1, i64::MAX]
            .into_iter()
            .map(TypedValue::int64)
            .collect(),
        DataType::UnsignedLong => [0, 1, (1u64 << 63) - 1, 1 << 63, u64::MAX]
            .into_iter()
            .map(TypedValue::unsigned_long)
            .collect(),
        DataType::Double => [
            f64::NEG_INFINITY,
            -f64::MAX,
            -1.5,
            -0.0,
            0.0,
            f64::MIN_POSITIVE,
            1.5,
            f64::MAX,
            f64::INFINITY,
            f64::NAN,
        ]
        .into_iter()
        .map(TypedValue::double)
        .collect(),
        DataType::Boolean => vec![TypedValue::boolean(false), TypedValue::boolean(true)],
    }
}

/// `count` random non-null values of `data_type`.
pub fn random_values(rng: &mut StdRng, data_type: DataType, count: usize) -> Vec<TypedValue> {
    (0..count)
        .map(|_| match data_type {
            DataType::Int32 => TypedValue::int32(rng.gen()),
            DataType::Int64 => TypedValue::int64(rng.gen()),
            DataType::UnsignedLong => {
                TypedValue::unsigned_long_encoded(unsigned::encode(rng.gen()))
            }
            DataType::Double => TypedValue::double(rng.gen_range(-1.0e12..1.0e12)),
            DataType::Boolean => TypedValue::boolean(rng.gen()),
        })
        .collect()
}

pub fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(0x5eed)
}

/// Every signature of `function` that the registry does not support.
pub fn unsupported_signatures(registry: &FunctionRegistry, function: Function) -> Vec<Vec<DataType>> {
    let supported: Vec<Vec<DataType>> = registry
        .coverage()
        .expect("coverage")
        .into_iter()
        .filter(|s| s.function == function)
        .map(|s| s.args)
        .collect();
    all_signatures(function.arity())
        .into_iter()
        .filter(|types| !supported.contains(types))
        .collect()
}
