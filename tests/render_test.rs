mod common;

use std::fs;
use std::path::{Path, PathBuf};

use benchviz::{ChartContext, PlotOptions, chart::render_all};
use common::{SAMPLE_LOG, write_config};
use tempfile::tempdir;

const SLOWER_LOG: &str = "\
[READ], Operations, 400
[READ], AverageLatency(us), 800.0
[READ], 95thPercentileLatency(us), 1500
[READ], 99thPercentileLatency(us), 2100
";

fn options(root: &Path) -> PlotOptions {
    PlotOptions::default()
        .with_table_dir(root.join("csv"))
        .with_output_dirs(root.join("out/plots/latency"), root.join("out/plots/throughput"))
}

fn file_names(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(dir)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    names.sort();
    names
}

fn assert_non_empty(path: &Path) {
    let len = fs::metadata(path)
        .unwrap_or_else(|e| panic!("{} missing: {e}", path.display()))
        .len();
    assert!(len > 0, "{} is empty", path.display());
}

#[test]
fn render_all_writes_four_images() {
    let dir = tempdir().unwrap();
    let opts = options(dir.path());
    write_config(&opts.table_dir, "memcached-4", SLOWER_LOG);
    write_config(&opts.table_dir, "redis-8", SAMPLE_LOG);
    let csv = opts.table_dir.join("redis-8.csv");
    let ctx = ChartContext::new(3600.0, "workloada", "READ");

    let rendered = render_all(&csv, &ctx, "redis-8", &opts).unwrap();

    let latency = dir.path().join("out/plots/latency");
    let throughput = dir.path().join("out/plots/throughput");
    let expected: Vec<PathBuf> = vec![
        latency.join("redis-8-latency-plot.png"),
        throughput.join("redis-8-throughput-plot.png"),
        latency.join("grouped-latency-plot.png"),
        throughput.join("grouped-throughput-plot.png"),
    ];
    assert_eq!(rendered.paths(), expected.iter().map(PathBuf::as_path).collect::<Vec<_>>());
    for path in &expected {
        assert_non_empty(path);
    }
    assert_eq!(rendered.grouped[0].configurations(), vec!["memcached-4", "redis-8"]);
}

#[test]
fn rerun_overwrites_without_stale_files() {
    let dir = tempdir().unwrap();
    let opts = options(dir.path());
    write_config(&opts.table_dir, "redis-8", SAMPLE_LOG);
    let csv = opts.table_dir.join("redis-8.csv");
    let ctx = ChartContext::new(600.0, "workloada", "UPDATE");

    let first = render_all(&csv, &ctx, "redis-8", &opts).unwrap();
    let second = render_all(&csv, &ctx, "redis-8", &opts).unwrap();

    assert_eq!(first.paths(), second.paths());
    for path in second.paths() {
        assert_non_empty(path);
    }
    assert_eq!(
        file_names(&opts.latency_dir),
        vec!["grouped-latency-plot.png", "redis-8-latency-plot.png"]
    );
    assert_eq!(
        file_names(&opts.throughput_dir),
        vec!["grouped-throughput-plot.png", "redis-8-throughput-plot.png"]
    );
}

#[test]
fn operation_absent_from_log_still_renders() {
    let dir = tempdir().unwrap();
    let opts = options(dir.path());
    write_config(&opts.table_dir, "redis-8", SAMPLE_LOG);
    let csv = opts.table_dir.join("redis-8.csv");
    let ctx = ChartContext::new(60.0, "workloada", "DELETE");

    let rendered = render_all(&csv, &ctx, "redis-8", &opts).unwrap();

    assert!(rendered.single.iter().all(|c| c.bars.is_empty()));
    for path in rendered.paths() {
        assert_non_empty(path);
    }
}
