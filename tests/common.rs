#![allow(dead_code)]

use std::path::Path;
use std::process::{Command, Output};

use benchviz::{RecordTable, RunMetadata, parse, table};

/// Trimmed output of a YCSB `run` phase against a single store.
pub const SAMPLE_LOG: &str = "\
YCSB Client 0.17.0
Loading workload...
Starting test.
DBWrapper: report latency for each error is false and specific error codes to track for latency are: []
[OVERALL], RunTime(ms), 10110
[OVERALL], Throughput(ops/sec), 98.91196834817013
[TOTAL_GCS_PS_Scavenge], Count, 1
[TOTAL_GC_TIME_PS_Scavenge], Time(ms), 5
[READ], Operations, 512
[READ], AverageLatency(us), 500.5
[READ], MinLatency(us), 200
[READ], MaxLatency(us), 10111
[READ], 95thPercentileLatency(us), 900
[READ], 99thPercentileLatency(us), 1200
[READ], Return=OK, 512
[READ-FAILED], Operations, 3
[CLEANUP], Operations, 1
[CLEANUP], AverageLatency(us), 2075.0
[UPDATE], Operations, 488
[UPDATE], AverageLatency(us), 620.25
[UPDATE], MinLatency(us), 310
[UPDATE], MaxLatency(us), 9000
[UPDATE], 95thPercentileLatency(us), 1100
[UPDATE], 99thPercentileLatency(us), 1800
[UPDATE], Return=OK, 488
";

pub fn meta(run_id: &str) -> RunMetadata {
    RunMetadata::new(run_id, "redis", "workloada", "8", "1000000")
}

pub fn sample_table(run_id: &str) -> RecordTable {
    parse(SAMPLE_LOG, &meta(run_id)).expect("sample log parses")
}

/// Write a table for configuration `label` under `dir` from raw log text.
pub fn write_config(dir: &Path, label: &str, log: &str) -> RecordTable {
    let t = parse(log, &meta(label)).expect("log parses");
    table::write_table(&dir.join(format!("{label}.csv")), &t).expect("write table");
    t
}

pub fn run_bin<I, S>(args: I, cwd: &Path) -> Output
where
    I: IntoIterator<Item = S>,
    S: AsRef<std::ffi::OsStr>,
{
    Command::new(env!("CARGO_BIN_EXE_benchviz"))
        .args(args)
        .current_dir(cwd)
        .env("RUST_LOG", "warn")
        .output()
        .expect("failed to run benchviz")
}
