use std::path::PathBuf;

/// Default directory scanned for per-configuration record tables.
pub const DEFAULT_TABLE_DIR: &str = "output/csv";
/// Default directory for latency charts.
pub const DEFAULT_LATENCY_DIR: &str = "plots/latency";
/// Default directory for throughput charts.
pub const DEFAULT_THROUGHPUT_DIR: &str = "plots/throughput";

/// Pixel dimensions of a rendered chart.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ImageSize {
    pub width: u32,
    pub height: u32,
}

/// Where charts are read from and written to.
#[derive(Clone, Debug, PartialEq)]
pub struct PlotOptions {
    /// Directory holding one record table per configuration, used by the
    /// grouped charts.
    pub table_dir: PathBuf,
    pub latency_dir: PathBuf,
    pub throughput_dir: PathBuf,
    pub single_size: ImageSize,
    pub grouped_size: ImageSize,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            table_dir: PathBuf::from(DEFAULT_TABLE_DIR),
            latency_dir: PathBuf::from(DEFAULT_LATENCY_DIR),
            throughput_dir: PathBuf::from(DEFAULT_THROUGHPUT_DIR),
            single_size: ImageSize {
                width: 1000,
                height: 600,
            },
            grouped_size: ImageSize {
                width: 1200,
                height: 800,
            },
        }
    }
}

impl PlotOptions {
    pub fn with_table_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.table_dir = dir.into();
        self
    }

    pub fn with_output_dirs(
        mut self,
        latency_dir: impl Into<PathBuf>,
        throughput_dir: impl Into<PathBuf>,
    ) -> Self {
        self.latency_dir = latency_dir.into();
        self.throughput_dir = throughput_dir.into();
        self
    }
}
