use statrs::statistics::Statistics;

use crate::record::RecordTable;

pub const AVERAGE_LATENCY: &str = "AverageLatency(us)";
pub const MIN_LATENCY: &str = "MinLatency(us)";
pub const MAX_LATENCY: &str = "MaxLatency(us)";
pub const P95_LATENCY: &str = "95thPercentileLatency(us)";
pub const P99_LATENCY: &str = "99thPercentileLatency(us)";
pub const OPERATIONS: &str = "Operations";

/// Metrics shown on a single-configuration latency chart.
pub const LATENCY_METRICS: [&str; 5] = [
    AVERAGE_LATENCY,
    MIN_LATENCY,
    MAX_LATENCY,
    P95_LATENCY,
    P99_LATENCY,
];

/// Metrics compared across configurations on the grouped latency chart.
pub const GROUPED_LATENCY_METRICS: [&str; 3] = [AVERAGE_LATENCY, P95_LATENCY, P99_LATENCY];

pub const THROUGHPUT_METRICS: [&str; 1] = [OPERATIONS];

const LATENCY_SUFFIX: &str = "Latency(us)";

/// What to do with a metric that has no rows for the filtered operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MissingPolicy {
    /// Leave the metric out of the result.
    Omit,
    /// Report the metric with a mean of zero.
    ZeroFill,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum AggregateError {
    #[error("{operation} {metric}: value {value:?} is not a number")]
    InvalidValue {
        operation: String,
        metric: String,
        value: String,
    },
}

/// Mean of one metric over the rows matching an operation filter.
#[derive(Debug, Clone, PartialEq)]
pub struct MetricMean {
    pub metric: String,
    pub mean: f64,
    /// Number of rows averaged; zero for a zero-filled metric.
    pub samples: usize,
}

impl MetricMean {
    pub fn short_label(&self) -> &str {
        short_label(&self.metric)
    }
}

/// Drop the `Latency(us)` suffix used by YCSB latency metrics.
pub fn short_label(metric: &str) -> &str {
    metric
        .strip_suffix(LATENCY_SUFFIX)
        .map(str::trim_end)
        .unwrap_or(metric)
}

/// Values of `metric` in rows whose category contains `operation_filter`.
pub fn metric_values(
    table: &RecordTable,
    operation_filter: &str,
    metric: &str,
) -> Result<Vec<f64>, AggregateError> {
    table
        .filter_operation(operation_filter)
        .filter(|r| r.metric == metric)
        .map(|r| {
            r.value
                .parse::<f64>()
                .map_err(|_| AggregateError::InvalidValue {
                    operation: r.operation.tag().to_string(),
                    metric: r.metric.clone(),
                    value: r.value.clone(),
                })
        })
        .collect()
}

/// Filter `table` by operation and average each of `metrics`, applying
/// `policy` to metrics without rows. Results follow the order of `metrics`.
pub fn aggregate(
    table: &RecordTable,
    operation_filter: &str,
    metrics: &[&str],
    policy: MissingPolicy,
) -> Result<Vec<MetricMean>, AggregateError> {
    let mut out = Vec::with_capacity(metrics.len());
    for metric in metrics {
        let values = metric_values(table, operation_filter, metric)?;
        if values.is_empty() {
            match policy {
                MissingPolicy::Omit => {
                    tracing::debug!(metric, operation_filter, "no rows, omitting metric");
                    continue;
                }
                MissingPolicy::ZeroFill => {
                    tracing::debug!(metric, operation_filter, "no rows, filling with zero");
                    out.push(MetricMean {
                        metric: metric.to_string(),
                        mean: 0.0,
                        samples: 0,
                    });
                    continue;
                }
            }
        }
        let samples = values.len();
        let mean = values.iter().mean();
        if mean.is_finite() {
            tracing::debug!(metric, operation_filter, samples, mean, "aggregated metric");
        } else {
            tracing::warn!(metric, operation_filter, samples, mean, "mean is not finite");
        }
        out.push(MetricMean {
            metric: metric.to_string(),
            mean,
            samples,
        });
    }
    Ok(out)
}
