pub mod aggregate;
pub mod chart;
pub mod config;
pub mod parser;
pub mod record;
pub mod table;
pub mod telemetry;
pub mod util;

pub use chart::{ChartContext, ChartError, ChartKind};
pub use config::PlotOptions;
pub use parser::{ParseError, parse};
pub use record::{OperationCategory, Record, RecordTable, RunMetadata};
