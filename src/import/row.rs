// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! CSV records tagged with the line they start on.

use csv::{ReaderBuilder, StringRecord, Trim};

use super::{Delimiter, SkipReason};

/// One record of the file. Lines the reader passes over as blank come back
/// as rows without fields so they can be reported.
#[derive(Debug, Clone, PartialEq)]
pub struct CsvRow {
    /// 1-based line the record starts on
    pub line: usize,
    pub fields: Vec<String>,
}

impl CsvRow {
    pub fn is_blank(&self) -> bool {
        match self.fields.as_slice() {
            [] => true,
            [only] => only.is_empty(),
            _ => false,
        }
    }
}

fn reader(text: &str, delimiter: Delimiter) -> csv::Reader<&[u8]> {
    ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter.as_byte())
        .escape(Some(b'\\'))
        .double_quote(true)
        .trim(Trim::All)
        .from_reader(text.as_bytes())
}

/// Read every record, keeping physical line numbers.
///
/// Quoted fields may span lines; the record is numbered by its first line.
pub fn read_rows(text: &str, delimiter: Delimiter) -> Result<Vec<CsvRow>, csv::Error> {
    let mut reader = reader(text, delimiter);
    let mut record = StringRecord::new();
    let mut rows = Vec::new();

    // Byte offset and line number where the previous record stopped.
    let mut consumed = 0;
    let mut consumed_line = 1;
    // First line not yet covered by a record.
    let mut next_line = 1;

    while reader.read_record(&mut record)? {
        let end = usize::try_from(reader.position().byte()).unwrap_or(text.len());
        let chunk = text.get(consumed..end).unwrap_or_default();

        // The reader silently skips empty lines before a record.
        let content = chunk.trim_start_matches(['\r', '\n']);
        let lead = &chunk[..chunk.len() - content.len()];
        let start_line = consumed_line + lead.matches('\n').count();
        let body = content.trim_end_matches(['\r', '\n']);
        let end_line = start_line + body.matches('\n').count();

        rows.extend((next_line..start_line).map(blank_row));
        rows.push(CsvRow {
            line: start_line,
            fields: record.iter().map(str::to_string).collect(),
        });

        next_line = end_line + 1;
        consumed_line += chunk.matches('\n').count();
        consumed = end;
    }

    rows.extend((next_line..=text.lines().count()).map(blank_row));
    Ok(rows)
}

fn blank_row(line: usize) -> CsvRow {
    CsvRow {
        line,
        fields: Vec::new(),
    }
}

/// Check a data row against the header width.
pub fn parse_row(row: CsvRow, header_count: usize) -> Result<Vec<String>, SkipReason> {
    if row.is_blank() {
        return Err(SkipReason::EmptyLine);
    }
    if row.fields.len() != header_count {
        return Err(SkipReason::ColumnCountMismatch);
    }
    Ok(row.fields)
}
