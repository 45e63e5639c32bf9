use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::record::{HEADER, Record, RecordTable};

/// File extension of persisted record tables.
pub const TABLE_EXTENSION: &str = "csv";

#[derive(thiserror::Error, Debug)]
pub enum TableError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

/// Write `table` to `path`, replacing any existing file. The header row is
/// always written, even for an empty table.
pub fn write_table(path: &Path, table: &RecordTable) -> Result<(), TableError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;
    writer.write_record(HEADER)?;
    for record in table.iter() {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

/// Load a table previously written by [`write_table`].
pub fn read_table(path: &Path) -> Result<RecordTable, TableError> {
    let mut reader = csv::Reader::from_path(path)?;
    let records = reader
        .deserialize::<Record>()
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(path = %path.display(), rows = records.len(), "loaded record table");
    Ok(RecordTable::new(records))
}

/// A table file found in a directory, labelled by its file stem.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct TableFile {
    pub label: String,
    pub path: PathBuf,
}

/// List the record tables directly under `dir`, sorted by label so that
/// grouped charts come out the same on every platform.
pub fn scan_tables(dir: &Path) -> Result<Vec<TableFile>, TableError> {
    let mut out = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        if !entry.file_type()?.is_file() {
            continue;
        }
        if path.extension().and_then(|e| e.to_str()) != Some(TABLE_EXTENSION) {
            continue;
        }
        if let Some(label) = path.file_stem().and_then(|s| s.to_str()) {
            out.push(TableFile {
                label: label.to_string(),
                path,
            });
        }
    }
    out.sort();
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{OperationCategory, RunMetadata};
    use tempfile::tempdir;

    #[test]
    fn empty_table_still_has_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested/out.csv");
        write_table(&path, &RecordTable::default()).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert_eq!(text, "RUNID,DB,WORKLOAD,THREADS,RECORDS,OP,METRIC,VALUE\n");
        assert!(read_table(&path).unwrap().is_empty());
    }

    #[test]
    fn scan_tables_sorts_and_filters_by_extension() {
        let dir = tempdir().unwrap();
        for name in ["zeta.csv", "alpha.csv", "notes.txt", "mid.csv"] {
            fs::write(dir.path().join(name), "").unwrap();
        }
        fs::create_dir(dir.path().join("sub.csv")).unwrap();
        let labels: Vec<String> = scan_tables(dir.path())
            .unwrap()
            .into_iter()
            .map(|t| t.label)
            .collect();
        assert_eq!(labels, vec!["alpha", "mid", "zeta"]);
    }

    #[test]
    fn unknown_op_in_table_fails() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(
            &path,
            "RUNID,DB,WORKLOAD,THREADS,RECORDS,OP,METRIC,VALUE\nr,db,w,1,1,[CLEANUP],Operations,1\n",
        )
        .unwrap();
        assert!(matches!(read_table(&path), Err(TableError::Csv(_))));
    }

    #[test]
    fn rewrite_replaces_previous_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("t.csv");
        let meta = RunMetadata::new("r", "db", "w", "1", "10");
        let two = RecordTable::new(vec![
            Record::new(&meta, OperationCategory::Read, "Operations", "1"),
            Record::new(&meta, OperationCategory::Read, "Operations", "2"),
        ]);
        write_table(&path, &two).unwrap();
        let one = RecordTable::new(vec![Record::new(
            &meta,
            OperationCategory::Scan,
            "Operations",
            "3",
        )]);
        write_table(&path, &one).unwrap();
        assert_eq!(read_table(&path).unwrap(), one);
    }
}
