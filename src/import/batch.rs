// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Sequential best-effort persistence of imported bikes.

use serde::Serialize;
use std::future::Future;

use crate::error::AppError;
use crate::models::Bike;

/// Destination for imported bikes.
pub trait BikeSink {
    /// Create one bike, returning it with its store-assigned ID.
    fn store_bike(&self, bike: Bike) -> impl Future<Output = Result<Bike, AppError>> + Send;
}

/// A normalized record waiting to be written.
#[derive(Debug, Clone)]
pub struct PendingBike {
    /// 1-based line in the source file
    pub line: usize,
    pub bike: Bike,
}

/// Progress after each write attempt.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ImportProgress {
    pub done: usize,
    pub total: usize,
    pub fraction: f64,
}

/// A record the store refused.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportFailure {
    pub line: usize,
    pub model_name: String,
    pub error: String,
}

#[derive(Debug, Default)]
pub struct BatchOutcome {
    pub imported: Vec<Bike>,
    pub failures: Vec<ImportFailure>,
}

/// Write records one at a time.
///
/// A failing record is logged and counted; it never stops the rest of the
/// batch and is not retried.
pub async fn import_records<S, F>(sink: &S, records: Vec<PendingBike>, mut on_progress: F) -> BatchOutcome
where
    S: BikeSink,
    F: FnMut(ImportProgress),
{
    let total = records.len();
    let mut outcome = BatchOutcome::default();

    for (idx, pending) in records.into_iter().enumerate() {
        let line = pending.line;
        let model_name = pending.bike.model_name.clone();

        match sink.store_bike(pending.bike).await {
            Ok(stored) => outcome.imported.push(stored),
            Err(e) => {
                tracing::warn!(line, model_name = %model_name, error = %e, "Failed to import bike");
                outcome.failures.push(ImportFailure {
                    line,
                    model_name,
                    error: e.to_string(),
                });
            }
        }

        let done = idx + 1;
        on_progress(ImportProgress {
            done,
            total,
            fraction: done as f64 / total as f64,
        });
    }

    outcome
}
