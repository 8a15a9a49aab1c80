// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV bulk import.
//!
//! The pipeline is linear: detect the delimiter, map header columns, parse
//! and normalize each row (collecting skip reasons), then write the surviving
//! records one by one. Row-level problems never abort an import.

pub mod batch;
pub mod columns;
pub mod delimiter;
pub mod normalize;
pub mod row;

pub use batch::{import_records, BikeSink, ImportFailure, ImportProgress, PendingBike};
pub use columns::{map_header, ColumnMap};
pub use delimiter::{detect_delimiter, Delimiter};
pub use normalize::BikeDraft;
pub use row::{parse_row, read_rows, CsvRow};

use serde::Serialize;
use std::collections::BTreeMap;

use crate::models::{Bike, BikeInput};

/// Why a CSV row was left out of an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, thiserror::Error)]
pub enum SkipReason {
    #[error("Empty line")]
    #[serde(rename = "Empty line")]
    EmptyLine,

    #[error("Column count mismatch")]
    #[serde(rename = "Column count mismatch")]
    ColumnCountMismatch,

    #[error("Missing model name")]
    #[serde(rename = "Missing model name")]
    MissingModelName,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkippedRow {
    pub line: usize,
    pub reason: SkipReason,
}

/// Import-level errors (the file as a whole is unusable).
#[derive(Debug, thiserror::Error)]
pub enum ImportError {
    #[error("CSV file is empty or has no header row")]
    MissingHeader,

    #[error("CSV could not be read: {0}")]
    Malformed(#[from] csv::Error),
}

impl From<ImportError> for crate::error::AppError {
    fn from(err: ImportError) -> Self {
        crate::error::AppError::BadRequest(err.to_string())
    }
}

/// A data row that survived parsing and normalization.
#[derive(Debug, Clone)]
pub struct ParsedRecord {
    pub line: usize,
    pub input: BikeInput,
}

/// Result of parsing a whole file.
#[derive(Debug, Clone)]
pub struct ParsedCsv {
    pub delimiter: Delimiter,
    pub unmapped_headers: Vec<String>,
    pub records: Vec<ParsedRecord>,
    pub skipped: Vec<SkippedRow>,
}

impl ParsedCsv {
    /// Number of data rows (everything after the header).
    pub fn data_rows(&self) -> usize {
        self.records.len() + self.skipped.len()
    }
}

/// Parse CSV text into normalized records and skip reasons.
pub fn parse_csv(text: &str, current_year: i32) -> Result<ParsedCsv, ImportError> {
    let delimiter = detect_delimiter(text);
    let mut rows = read_rows(text, delimiter)?.into_iter();
    let header = rows
        .next()
        .filter(|row| row.line == 1 && !row.is_blank())
        .ok_or(ImportError::MissingHeader)?;
    let columns = ColumnMap::from_headers(&header.fields);

    let mut records = Vec::new();
    let mut skipped = Vec::new();

    for row in rows {
        let line_no = row.line;
        let parsed = parse_row(row, columns.len())
            .and_then(|fields| BikeDraft::from_row(&columns, fields).normalize(current_year));

        match parsed {
            Ok(input) => records.push(ParsedRecord {
                line: line_no,
                input,
            }),
            Err(reason) => {
                tracing::debug!(line = line_no, reason = %reason, "Skipping CSV row");
                skipped.push(SkippedRow {
                    line: line_no,
                    reason,
                });
            }
        }
    }

    Ok(ParsedCsv {
        delimiter,
        unmapped_headers: columns.unmapped,
        records,
        skipped,
    })
}

/// Values stamped on every imported record.
#[derive(Debug, Clone)]
pub struct ImportOptions {
    pub brand: String,
    pub current_year: i32,
    /// Write timestamp (RFC 3339)
    pub now: String,
}

/// Aggregate result reported to the importing user.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    /// Data rows in the file
    pub total: usize,
    pub imported: usize,
    pub failed: usize,
    pub skipped: usize,
    pub delimiter: Delimiter,
    pub unmapped_headers: Vec<String>,
    pub skip_reasons: BTreeMap<String, usize>,
    pub skipped_rows: Vec<SkippedRow>,
    pub failures: Vec<ImportFailure>,
    pub message: String,
}

/// Parse `text` and write every importable row through `sink`.
pub async fn import_csv<S, F>(
    sink: &S,
    text: &str,
    options: &ImportOptions,
    on_progress: F,
) -> Result<ImportSummary, ImportError>
where
    S: BikeSink,
    F: FnMut(ImportProgress),
{
    let parsed = parse_csv(text, options.current_year)?;
    let total = parsed.data_rows();

    let pending = parsed
        .records
        .into_iter()
        .map(|record| PendingBike {
            line: record.line,
            bike: Bike::from_input(
                String::new(),
                record.input,
                &options.brand,
                options.current_year,
                &options.now,
            ),
        })
        .collect();

    let outcome = import_records(sink, pending, on_progress).await;

    let mut skip_reasons = BTreeMap::new();
    for row in &parsed.skipped {
        *skip_reasons.entry(row.reason.to_string()).or_insert(0) += 1;
    }

    let imported = outcome.imported.len();
    let failed = outcome.failures.len();
    let skipped = parsed.skipped.len();
    let message = format!(
        "Imported {imported} of {total} bikes; {failed} failed; {skipped} rows skipped"
    );

    tracing::info!(imported, failed, skipped, total, "CSV import finished");

    Ok(ImportSummary {
        total,
        imported,
        failed,
        skipped,
        delimiter: parsed.delimiter,
        unmapped_headers: parsed.unmapped_headers,
        skip_reasons,
        skipped_rows: parsed.skipped,
        failures: outcome.failures,
        message,
    })
}
