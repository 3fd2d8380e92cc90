//! Batch execution of bound evaluators.
//!
//! The executor runs one evaluator over a sequence of batches, optionally
//! spreading them over scoped worker threads. Output columns come back in
//! input order regardless of how batches were split.

use crate::batch::{Batch, Column};
use crate::expression::{EvalResult, Evaluator};
use crate::types::{NativeType, TypedValue};
use log::debug;
use std::borrow::Cow;
use std::thread;

/// Evaluates a bound expression over many batches.
pub struct BatchExecutor {
    evaluator: Box<dyn Evaluator>,
    workers: usize,
}

impl BatchExecutor {
    /// Create an executor using a single thread.
    pub fn new(evaluator: Box<dyn Evaluator>) -> Self {
        Self {
            evaluator,
            workers: 1,
        }
    }

    /// Use up to `workers` threads. Zero is treated as one.
    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn evaluator(&self) -> &dyn Evaluator {
        self.evaluator.as_ref()
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Evaluate every batch with the columnar path.
    pub fn run(&self, batches: &[Batch]) -> EvalResult<Vec<Column>> {
        self.run_with(batches, |batch| {
            self.evaluator.eval_batch(batch).map(Cow::into_owned)
        })
    }

    /// Evaluate every batch one row at a time. Produces the same columns as
    /// [`BatchExecutor::run`].
    pub fn run_rows(&self, batches: &[Batch]) -> EvalResult<Vec<Column>> {
        self.run_with(batches, |batch| {
            let values = evaluate_rows(self.evaluator(), batch)?;
            Ok(Column::from_values(self.evaluator.data_type(), &values)?)
        })
    }

    fn run_with<F>(&self, batches: &[Batch], eval: F) -> EvalResult<Vec<Column>>
    where
        F: Fn(&Batch) -> EvalResult<Column> + Sync,
    {
        let eval_one = |index: usize, batch: &Batch| -> EvalResult<Column> {
            let column = eval(batch)?;
            debug!(
                "Evaluated batch {} ({} rows, {} nulls) with {}",
                index,
                batch.row_count(),
                column.null_count(),
                self.evaluator
            );
            Ok(column)
        };

        if self.workers == 1 || batches.len() <= 1 {
            return batches
                .iter()
                .enumerate()
                .map(|(index, batch)| eval_one(index, batch))
                .collect();
        }

        // Contiguous chunks keep the output in input order
        let chunk_size = batches.len().div_ceil(self.workers);
        thread::scope(|scope| -> EvalResult<Vec<Column>> {
            let eval_one = &eval_one;
            let handles: Vec<_> = batches
                .chunks(chunk_size)
                .enumerate()
                .map(|(chunk, batches)| {
                    scope.spawn(move || {
                        batches
                            .iter()
                            .enumerate()
                            .map(|(offset, batch)| eval_one(chunk * chunk_size + offset, batch))
                            .collect::<EvalResult<Vec<_>>>()
                    })
                })
                .collect();

            let mut columns = Vec::with_capacity(batches.len());
            for handle in handles {
                match handle.join() {
                    Ok(result) => columns.extend(result?),
                    Err(panic) => std::panic::resume_unwind(panic),
                }
            }
            Ok(columns)
        })
    }
}

/// Evaluate all rows of `batch` through the row path.
pub fn evaluate_rows(evaluator: &dyn Evaluator, batch: &Batch) -> EvalResult<Vec<TypedValue>> {
    (0..batch.row_count())
        .map(|row| evaluator.eval_row(batch, row))
        .collect()
}

/// Rows where a boolean column is true. Null counts as false. Returns `None`
/// for a column of any other type.
pub fn selection_vector(column: &Column) -> Option<Vec<usize>> {
    let values = bool::values(column.data())?;
    Some(
        values
            .iter()
            .enumerate()
            .filter(|(row, selected)| **selected && !column.is_null(*row))
            .map(|(row, _)| row)
            .collect(),
    )
}
