use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

/// Column names of a record table, in file order.
pub const HEADER: [&str; 8] = [
    "RUNID", "DB", "WORKLOAD", "THREADS", "RECORDS", "OP", "METRIC", "VALUE",
];

/// Operation category tag emitted by YCSB in front of every result line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum OperationCategory {
    Overall,
    Scan,
    Insert,
    Update,
    Delete,
    Read,
}

impl OperationCategory {
    pub const ALL: [OperationCategory; 6] = [
        OperationCategory::Overall,
        OperationCategory::Scan,
        OperationCategory::Insert,
        OperationCategory::Update,
        OperationCategory::Delete,
        OperationCategory::Read,
    ];

    /// The bracketed tag as it appears in the log, e.g. `[READ]`.
    pub fn tag(self) -> &'static str {
        match self {
            OperationCategory::Overall => "[OVERALL]",
            OperationCategory::Scan => "[SCAN]",
            OperationCategory::Insert => "[INSERT]",
            OperationCategory::Update => "[UPDATE]",
            OperationCategory::Delete => "[DELETE]",
            OperationCategory::Read => "[READ]",
        }
    }

    /// Substring test used by the chart filters.
    pub fn matches(self, filter: &str) -> bool {
        self.tag().contains(filter)
    }
}

impl fmt::Display for OperationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown operation category {0:?}")]
pub struct UnknownCategory(pub String);

impl FromStr for OperationCategory {
    type Err = UnknownCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OperationCategory::ALL
            .into_iter()
            .find(|c| c.tag() == s)
            .ok_or_else(|| UnknownCategory(s.to_string()))
    }
}

impl TryFrom<String> for OperationCategory {
    type Error = UnknownCategory;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

impl From<OperationCategory> for String {
    fn from(c: OperationCategory) -> Self {
        c.tag().to_string()
    }
}

/// Metadata describing one benchmark run. Every field is written through to
/// the table unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMetadata {
    pub run_id: String,
    pub db: String,
    pub workload: String,
    pub threads: String,
    pub records: String,
}

impl RunMetadata {
    pub fn new(
        run_id: impl Into<String>,
        db: impl Into<String>,
        workload: impl Into<String>,
        threads: impl Into<String>,
        records: impl Into<String>,
    ) -> Self {
        Self {
            run_id: run_id.into(),
            db: db.into(),
            workload: workload.into(),
            threads: threads.into(),
            records: records.into(),
        }
    }
}

/// A single observation parsed from a result line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub struct Record {
    #[serde(rename = "RUNID")]
    pub run_id: String,
    pub db: String,
    pub workload: String,
    pub threads: String,
    pub records: String,
    #[serde(rename = "OP")]
    pub operation: OperationCategory,
    pub metric: String,
    /// Kept as text; parsed as a float only when aggregated.
    pub value: String,
}

impl Record {
    pub fn new(
        meta: &RunMetadata,
        operation: OperationCategory,
        metric: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self {
            run_id: meta.run_id.clone(),
            db: meta.db.clone(),
            workload: meta.workload.clone(),
            threads: meta.threads.clone(),
            records: meta.records.clone(),
            operation,
            metric: metric.into(),
            value: value.into(),
        }
    }
}

/// Ordered rows of one run. The header is implied by [`HEADER`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RecordTable {
    pub records: Vec<Record>,
}

impl RecordTable {
    pub fn new(records: Vec<Record>) -> Self {
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Rows whose category contains `filter`, in table order.
    pub fn filter_operation<'a>(&'a self, filter: &'a str) -> impl Iterator<Item = &'a Record> {
        self.records.iter().filter(move |r| r.operation.matches(filter))
    }
}

impl FromIterator<Record> for RecordTable {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}
