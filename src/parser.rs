use std::path::Path;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{
    record::{OperationCategory, Record, RecordTable, RunMetadata},
    table::{self, TableError},
};

// result lines start with one of the six category tags
static RESULT_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\[(?:OVERALL|SCAN|INSERT|UPDATE|DELETE|READ)\]")
        .expect("result line pattern is valid")
});

/// Errors raised while turning a benchmark log into a record table.
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    /// A tagged line did not carry `category, metric, value`.
    #[error("line {line_number}: expected 3 comma-separated fields: {line:?}")]
    MissingFields { line_number: usize, line: String },
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Table(#[from] TableError),
}

/// Whether `line` starts with one of the recognised category tags.
pub fn is_result_line(line: &str) -> bool {
    RESULT_LINE.is_match(line)
}

/// Parse a single log line. Untagged lines yield `Ok(None)`.
pub fn parse_line(
    line: &str,
    line_number: usize,
    meta: &RunMetadata,
) -> Result<Option<Record>, ParseError> {
    let line = line.trim_end();
    if !is_result_line(line) {
        return Ok(None);
    }
    let mut fields = line.split(',').map(str::trim);
    // `[READ]x` and the like share a tag prefix but are not result lines
    let Ok(operation) = fields.next().unwrap_or_default().parse::<OperationCategory>() else {
        tracing::debug!(line_number, "dropping line with unrecognised category");
        return Ok(None);
    };
    let (Some(metric), Some(value)) = (fields.next(), fields.next()) else {
        return Err(ParseError::MissingFields {
            line_number,
            line: line.to_string(),
        });
    };
    let extra = fields.count();
    if extra > 0 {
        tracing::warn!(line_number, extra, "ignoring trailing fields on result line");
    }
    Ok(Some(Record::new(meta, operation, metric, value)))
}

/// Extract every tagged result line of `log_text` into a table, in file order.
pub fn parse(log_text: &str, meta: &RunMetadata) -> Result<RecordTable, ParseError> {
    let mut records = Vec::new();
    for (idx, line) in log_text.lines().enumerate() {
        match parse_line(line, idx + 1, meta)? {
            Some(record) => records.push(record),
            None => tracing::trace!(line_number = idx + 1, "skipping untagged line"),
        }
    }
    tracing::debug!(rows = records.len(), run_id = %meta.run_id, "parsed benchmark log");
    Ok(RecordTable::new(records))
}

/// Read the log at `log_path`, parse it, and write the table to `csv_path`.
///
/// Nothing is written unless the whole log parses.
pub fn parse_log_file(
    log_path: impl AsRef<Path>,
    csv_path: impl AsRef<Path>,
    meta: &RunMetadata,
) -> Result<RecordTable, ParseError> {
    let log_path = log_path.as_ref();
    let text = std::fs::read_to_string(log_path)?;
    let table = parse(&text, meta)?;
    table::write_table(csv_path.as_ref(), &table)?;
    tracing::info!(
        log = %log_path.display(),
        csv = %csv_path.as_ref().display(),
        rows = table.len(),
        "wrote record table"
    );
    Ok(table)
}
