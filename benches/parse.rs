use benchviz::{
    RunMetadata,
    aggregate::{LATENCY_METRICS, MissingPolicy, aggregate},
    parse,
};
use criterion::{Criterion, criterion_group, criterion_main};

// a run log with per-interval status lines between the result block
fn synthetic_log(intervals: usize) -> String {
    let mut log = String::from("YCSB Client 0.17.0\nStarting test.\n");
    for i in 0..intervals {
        log.push_str(&format!(
            "2024-01-01 00:00:{:02} {i} sec: {i} operations; [READ: Count=10, Avg=512.3]\n",
            i % 60
        ));
    }
    for op in ["OVERALL", "READ", "UPDATE", "INSERT", "SCAN", "DELETE"] {
        log.push_str(&format!("[{op}], Operations, 1000\n"));
        for metric in LATENCY_METRICS {
            log.push_str(&format!("[{op}], {metric}, 123.45\n"));
        }
        for bucket in 0..100 {
            log.push_str(&format!("[{op}], {bucket}, {}\n", bucket * 3));
        }
    }
    log
}

fn bench_parse(c: &mut Criterion) {
    let log = synthetic_log(10_000);
    let meta = RunMetadata::new("run1", "redis", "workloada", "8", "1000000");
    c.bench_function("parse_log", |b| {
        b.iter(|| parse(&log, &meta).unwrap());
    });
    let table = parse(&log, &meta).unwrap();
    c.bench_function("aggregate_latency", |b| {
        b.iter(|| aggregate(&table, "READ", &LATENCY_METRICS, MissingPolicy::Omit).unwrap());
    });
}

criterion_group!(benches, bench_parse);
criterion_main!(benches);
