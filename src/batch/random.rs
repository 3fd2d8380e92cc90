//! Random batch generation.
//!
//! Values are drawn uniformly, but a share of them is taken from each type's
//! edge cases (min/max, zero, infinities, NaN) because those are where kernels
//! go wrong.

use crate::batch::{Batch, BatchError, Column};
use crate::types::{unsigned, DataType, TypedValue};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Probability that a non-null value is picked from the edge cases.
const EDGE_CASE_RATE: f64 = 0.2;

pub struct RandomBatchGenerator {
    rng: StdRng,
    null_rate: f64,
}

impl RandomBatchGenerator {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            null_rate: 0.0,
        }
    }

    /// Share of generated values that are null, clamped to `[0, 1]`.
    pub fn with_null_rate(mut self, null_rate: f64) -> Self {
        self.null_rate = null_rate.clamp(0.0, 1.0);
        self
    }

    pub fn batch(&mut self, schema: &[DataType], rows: usize) -> Result<Batch, BatchError> {
        if schema.is_empty() {
            return Ok(Batch::empty(rows));
        }
        let columns = schema
            .iter()
            .map(|data_type| self.column(*data_type, rows))
            .collect::<Result<Vec<_>, _>>()?;
        Batch::try_new(columns)
    }

    pub fn column(&mut self, data_type: DataType, rows: usize) -> Result<Column, BatchError> {
        let values: Vec<TypedValue> = (0..rows).map(|_| self.value(data_type)).collect();
        Column::from_values(data_type, &values)
    }

    pub fn value(&mut self, data_type: DataType) -> TypedValue {
        if self.null_rate > 0.0 && self.rng.gen_bool(self.null_rate) {
            return TypedValue::null(data_type);
        }
        let edge = self.rng.gen_bool(EDGE_CASE_RATE);
        match data_type {
            DataType::Int32 => {
                let v = if edge {
                    self.pick(&[i32::MIN, -1, 0, 1, i32::MAX])
                } else {
                    self.rng.gen()
                };
                TypedValue::int32(v)
            }
            DataType::Int64 => {
                let v = if edge {
                    self.pick(&[i64::MIN, -1, 0, 1, i64::MAX])
                } else {
                    self.rng.gen()
                };
                TypedValue::int64(v)
            }
            DataType::UnsignedLong => {
                // Encoded cells of 0, 1, 2^63 - 1, 2^63 and u64::MAX
                let cell = if edge {
                    self.pick(&[
                        unsigned::MIN_ENCODED,
                        unsigned::MIN_ENCODED + 1,
                        -1,
                        0,
                        unsigned::MAX_ENCODED,
                    ])
                } else {
                    unsigned::encode(self.rng.gen())
                };
                TypedValue::unsigned_long_encoded(cell)
            }
            DataType::Double => {
                let v = if edge {
                    self.pick(&[
                        f64::NEG_INFINITY,
                        f64::INFINITY,
                        f64::NAN,
                        -0.0,
                        0.0,
                        f64::MIN,
                        f64::MAX,
                        f64::MIN_POSITIVE,
                    ])
                } else {
                    self.rng.gen_range(-1.0e6..1.0e6)
                };
                TypedValue::double(v)
            }
            DataType::Boolean => TypedValue::boolean(self.rng.gen()),
        }
    }

    fn pick<T: Copy>(&mut self, choices: &[T]) -> T {
        choices[self.rng.gen_range(0..choices.len())]
    }
}
