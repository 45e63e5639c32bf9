use std::path::{Path, PathBuf};

use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};

use crate::{
    aggregate::{self, AggregateError, MissingPolicy},
    config::{ImageSize, PlotOptions},
    record::RecordTable,
    table::{self, TableError},
    util::{minutes_label, value_label},
};

/// Width of one bar on a grouped chart, as a fraction of a metric group.
pub const GROUPED_BAR_WIDTH: f64 = 0.15;
const GROUPED_OPACITY: f64 = 0.8;
const SKY_BLUE: RGBColor = RGBColor(135, 206, 235);

#[derive(thiserror::Error, Debug)]
pub enum ChartError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Table(#[from] TableError),
    #[error(transparent)]
    Aggregate(#[from] AggregateError),
    #[error("no record tables found in {}", .0.display())]
    NoTables(PathBuf),
    #[error("render: {0}")]
    Render(String),
}

/// Which family of metrics a chart shows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ChartKind {
    Latency,
    Throughput,
}

impl ChartKind {
    /// Lower-case name used in output file names.
    pub fn name(self) -> &'static str {
        match self {
            ChartKind::Latency => "latency",
            ChartKind::Throughput => "throughput",
        }
    }

    fn title_word(self) -> &'static str {
        match self {
            ChartKind::Latency => "Latency",
            ChartKind::Throughput => "Throughput",
        }
    }

    pub fn y_desc(self) -> &'static str {
        match self {
            ChartKind::Latency => "Latency (us)",
            ChartKind::Throughput => "Throughput (operations)",
        }
    }

    pub fn single_metrics(self) -> &'static [&'static str] {
        match self {
            ChartKind::Latency => &aggregate::LATENCY_METRICS,
            ChartKind::Throughput => &aggregate::THROUGHPUT_METRICS,
        }
    }

    pub fn grouped_metrics(self) -> &'static [&'static str] {
        match self {
            ChartKind::Latency => &aggregate::GROUPED_LATENCY_METRICS,
            ChartKind::Throughput => &aggregate::THROUGHPUT_METRICS,
        }
    }

    pub fn output_dir(self, opts: &PlotOptions) -> &Path {
        match self {
            ChartKind::Latency => &opts.latency_dir,
            ChartKind::Throughput => &opts.throughput_dir,
        }
    }

    /// `{config}-latency-plot.png` and friends.
    pub fn single_file_name(self, configuration: &str) -> String {
        format!("{configuration}-{}-plot.png", self.name())
    }

    pub fn grouped_file_name(self) -> String {
        format!("grouped-{}-plot.png", self.name())
    }
}

/// Parameters shared by every chart of one invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartContext {
    pub duration_seconds: f64,
    pub workload: String,
    /// Substring matched against the operation tag, e.g. `READ`.
    pub operation: String,
}

impl ChartContext {
    pub fn new(
        duration_seconds: f64,
        workload: impl Into<String>,
        operation: impl Into<String>,
    ) -> Self {
        Self {
            duration_seconds,
            workload: workload.into(),
            operation: operation.into(),
        }
    }

    pub fn title(&self, kind: ChartKind, grouped: bool) -> String {
        let by = if grouped { " by Configuration" } else { "" };
        format!(
            "{} {} Metrics{} ({}, {})",
            self.operation,
            kind.title_word(),
            by,
            self.workload,
            minutes_label(self.duration_seconds)
        )
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Bar {
    pub label: String,
    pub value: f64,
}

/// A single-configuration bar chart, fully computed before drawing.
#[derive(Clone, Debug, PartialEq)]
pub struct SingleChart {
    pub kind: ChartKind,
    pub title: String,
    pub bars: Vec<Bar>,
    pub path: PathBuf,
}

impl SingleChart {
    pub fn labels(&self) -> Vec<&str> {
        self.bars.iter().map(|b| b.label.as_str()).collect()
    }

    pub fn value(&self, label: &str) -> Option<f64> {
        self.bars.iter().find(|b| b.label == label).map(|b| b.value)
    }

    /// Write the chart to [`SingleChart::path`], creating its directory.
    pub fn draw(&self, size: ImageSize) -> Result<(), ChartError> {
        ensure_parent(&self.path)?;
        let root = BitMapBackend::new(&self.path, (size.width, size.height)).into_drawing_area();
        draw_single(&root, self).map_err(|e| ChartError::Render(e.to_string()))?;
        root.present().map_err(|e| ChartError::Render(e.to_string()))?;
        tracing::info!(path = %self.path.display(), bars = self.bars.len(), "wrote chart");
        Ok(())
    }
}

/// Bars of one configuration on a grouped chart, one value per metric.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedSeries {
    pub configuration: String,
    pub values: Vec<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct GroupedChart {
    pub kind: ChartKind,
    pub title: String,
    pub metrics: Vec<String>,
    /// Legend order.
    pub series: Vec<GroupedSeries>,
    pub path: PathBuf,
}

impl GroupedChart {
    pub fn configurations(&self) -> Vec<&str> {
        self.series.iter().map(|s| s.configuration.as_str()).collect()
    }

    pub fn value(&self, configuration: &str, metric: &str) -> Option<f64> {
        let idx = self.metrics.iter().position(|m| m == metric)?;
        self.series
            .iter()
            .find(|s| s.configuration == configuration)
            .and_then(|s| s.values.get(idx).copied())
    }

    pub fn draw(&self, size: ImageSize) -> Result<(), ChartError> {
        ensure_parent(&self.path)?;
        let root = BitMapBackend::new(&self.path, (size.width, size.height)).into_drawing_area();
        draw_grouped(&root, self).map_err(|e| ChartError::Render(e.to_string()))?;
        root.present().map_err(|e| ChartError::Render(e.to_string()))?;
        tracing::info!(
            path = %self.path.display(),
            configurations = self.series.len(),
            "wrote grouped chart"
        );
        Ok(())
    }
}

/// Compute a single-configuration chart. Metrics without rows are left out.
pub fn plan_single(
    table: &RecordTable,
    kind: ChartKind,
    ctx: &ChartContext,
    configuration: &str,
    output_dir: &Path,
) -> Result<SingleChart, AggregateError> {
    let means = aggregate::aggregate(
        table,
        &ctx.operation,
        kind.single_metrics(),
        MissingPolicy::Omit,
    )?;
    let bars = means
        .iter()
        .map(|m| Bar {
            label: m.short_label().to_string(),
            value: m.mean,
        })
        .collect();
    Ok(SingleChart {
        kind,
        title: ctx.title(kind, false),
        bars,
        path: output_dir.join(kind.single_file_name(configuration)),
    })
}

/// Compute a grouped chart over `(configuration, table)` pairs, kept in the
/// given order. Metrics without rows count as zero.
pub fn plan_grouped(
    tables: &[(String, RecordTable)],
    kind: ChartKind,
    ctx: &ChartContext,
    output_dir: &Path,
) -> Result<GroupedChart, AggregateError> {
    let metrics = kind.grouped_metrics();
    let mut series = Vec::with_capacity(tables.len());
    for (configuration, table) in tables {
        let means = aggregate::aggregate(table, &ctx.operation, metrics, MissingPolicy::ZeroFill)?;
        series.push(GroupedSeries {
            configuration: configuration.clone(),
            values: means.into_iter().map(|m| m.mean).collect(),
        });
    }
    Ok(GroupedChart {
        kind,
        title: ctx.title(kind, true),
        metrics: metrics.iter().map(|m| m.to_string()).collect(),
        series,
        path: output_dir.join(kind.grouped_file_name()),
    })
}

/// Load every table under `dir`, labelled by file stem, sorted by label.
pub fn load_tables(dir: &Path) -> Result<Vec<(String, RecordTable)>, ChartError> {
    let files = table::scan_tables(dir)?;
    if files.is_empty() {
        return Err(ChartError::NoTables(dir.to_path_buf()));
    }
    let mut out = Vec::with_capacity(files.len());
    for file in files {
        let table = table::read_table(&file.path)?;
        out.push((file.label, table));
    }
    Ok(out)
}

/// Render the single-configuration chart of `kind` for `table`.
pub fn render_single(
    table: &RecordTable,
    kind: ChartKind,
    ctx: &ChartContext,
    configuration: &str,
    opts: &PlotOptions,
) -> Result<SingleChart, ChartError> {
    let chart = plan_single(table, kind, ctx, configuration, kind.output_dir(opts))?;
    chart.draw(opts.single_size)?;
    Ok(chart)
}

/// Render the grouped chart of `kind` over every table in `opts.table_dir`.
pub fn render_grouped(
    kind: ChartKind,
    ctx: &ChartContext,
    opts: &PlotOptions,
) -> Result<GroupedChart, ChartError> {
    let tables = load_tables(&opts.table_dir)?;
    let chart = plan_grouped(&tables, kind, ctx, kind.output_dir(opts))?;
    chart.draw(opts.grouped_size)?;
    Ok(chart)
}

/// Charts produced by [`render_all`].
#[derive(Clone, Debug, PartialEq)]
pub struct RenderedCharts {
    pub single: Vec<SingleChart>,
    pub grouped: Vec<GroupedChart>,
}

impl RenderedCharts {
    pub fn paths(&self) -> Vec<&Path> {
        self.single
            .iter()
            .map(|c| c.path.as_path())
            .chain(self.grouped.iter().map(|c| c.path.as_path()))
            .collect()
    }
}

/// Single latency, single throughput, grouped latency, grouped throughput.
pub fn render_all(
    csv_path: &Path,
    ctx: &ChartContext,
    configuration: &str,
    opts: &PlotOptions,
) -> Result<RenderedCharts, ChartError> {
    let table = table::read_table(csv_path)?;
    let kinds = [ChartKind::Latency, ChartKind::Throughput];
    let mut single = Vec::with_capacity(kinds.len());
    for kind in kinds {
        single.push(render_single(&table, kind, ctx, configuration, opts)?);
    }
    let mut grouped = Vec::with_capacity(kinds.len());
    for kind in kinds {
        grouped.push(render_grouped(kind, ctx, opts)?);
    }
    Ok(RenderedCharts { single, grouped })
}

/// Horizontal extent of bar `index` out of `bars` in metric group `group`.
/// Bars sit side by side, one width apart, centred on the group's tick.
pub fn grouped_bar_span(group: usize, index: usize, bars: usize) -> (f64, f64) {
    let first = group as f64 - GROUPED_BAR_WIDTH * bars.saturating_sub(1) as f64 / 2.0;
    let center = first + index as f64 * GROUPED_BAR_WIDTH;
    (
        center - GROUPED_BAR_WIDTH / 2.0,
        center + GROUPED_BAR_WIDTH / 2.0,
    )
}

/// Metric group whose tick sits at `x`, if any. Ticks are the integers.
pub fn grouped_group_at(x: f64, groups: usize) -> Option<usize> {
    let g = x.round();
    if (x - g).abs() > 1e-6 || g < 0.0 || g >= groups as f64 {
        return None;
    }
    Some(g as usize)
}

fn ensure_parent(path: &Path) -> std::io::Result<()> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => std::fs::create_dir_all(dir),
        _ => Ok(()),
    }
}

// leave headroom above the tallest bar for its label
fn y_upper(values: impl Iterator<Item = f64>) -> f64 {
    let max = values.fold(0.0_f64, f64::max);
    if max > 0.0 { max * 1.15 } else { 1.0 }
}

fn draw_single<B: DrawingBackend>(
    root: &DrawingArea<B, Shift>,
    chart: &SingleChart,
) -> Result<(), Box<dyn std::error::Error>>
where
    B::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let slots = chart.bars.len().max(1) as u32;
    let labels = chart.labels();
    let mut cc = ChartBuilder::on(root)
        .margin(15)
        .caption(
            &chart.title,
            ("sans-serif", 20).into_font().style(FontStyle::Bold),
        )
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (0..slots).into_segmented(),
            0.0..y_upper(chart.bars.iter().map(|b| b.value)),
        )?;

    cc.configure_mesh()
        .x_desc("Metrics")
        .y_desc(chart.kind.y_desc())
        .x_labels(slots as usize)
        .x_label_formatter(&|v| match v {
            SegmentValue::CenterOf(i) => labels
                .get(*i as usize)
                .map(|s| s.to_string())
                .unwrap_or_default(),
            _ => String::new(),
        })
        .draw()?;

    cc.draw_series(
        Histogram::vertical(&cc)
            .style(SKY_BLUE.filled())
            .margin(20)
            .data(
                chart
                    .bars
                    .iter()
                    .enumerate()
                    .map(|(i, bar)| (i as u32, bar.value)),
            ),
    )?;

    let label_style = ("sans-serif", 14)
        .into_text_style(root)
        .pos(Pos::new(HPos::Center, VPos::Bottom));
    cc.draw_series(chart.bars.iter().enumerate().map(|(i, bar)| {
        Text::new(
            value_label(bar.value),
            (SegmentValue::CenterOf(i as u32), bar.value),
            label_style.clone(),
        )
    }))?;
    Ok(())
}

fn draw_grouped<B: DrawingBackend>(
    root: &DrawingArea<B, Shift>,
    chart: &GroupedChart,
) -> Result<(), Box<dyn std::error::Error>>
where
    B::ErrorType: 'static,
{
    root.fill(&WHITE)?;
    let groups = chart.metrics.len();
    let bars = chart.series.len();
    let (x_min, _) = grouped_bar_span(0, 0, bars);
    let (_, x_max) = grouped_bar_span(groups.saturating_sub(1), bars.saturating_sub(1), bars);
    let x_range = x_min.min(-0.5) - 0.1..x_max.max(groups as f64 - 0.5) + 0.1;
    // enough labels that the tick step is at most 0.5, so every integer
    // group position gets a tick
    let x_labels = 2 * (x_range.end - x_range.start).ceil() as usize + 1;
    let y_max = y_upper(chart.series.iter().flat_map(|s| s.values.iter().copied()));

    let mut cc = ChartBuilder::on(root)
        .margin(15)
        .caption(
            &chart.title,
            ("sans-serif", 20).into_font().style(FontStyle::Bold),
        )
        .x_label_area_size(45)
        .y_label_area_size(80)
        .build_cartesian_2d(x_range, 0.0..y_max)?;

    let metric_at = |x: &f64| {
        grouped_group_at(*x, groups)
            .and_then(|g| chart.metrics.get(g))
            .cloned()
            .unwrap_or_default()
    };
    cc.configure_mesh()
        .x_desc("Metric")
        .y_desc(chart.kind.y_desc())
        .x_labels(x_labels)
        .x_label_formatter(&metric_at)
        .disable_x_mesh()
        .draw()?;

    let annotation = ("sans-serif", 12)
        .into_text_style(root)
        .transform(FontTransform::Rotate270)
        .pos(Pos::new(HPos::Left, VPos::Center));
    for (i, series) in chart.series.iter().enumerate() {
        let color = Palette99::pick(i).mix(GROUPED_OPACITY);
        cc.draw_series(series.values.iter().enumerate().map(|(g, v)| {
            let (left, right) = grouped_bar_span(g, i, bars);
            Rectangle::new([(left, 0.0), (right, *v)], color.filled())
        }))?
        .label(series.configuration.clone())
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled()));

        cc.draw_series(series.values.iter().enumerate().map(|(g, v)| {
            let (left, right) = grouped_bar_span(g, i, bars);
            EmptyElement::at(((left + right) / 2.0, *v))
                + Text::new(value_label(*v), (0, -3), annotation.clone())
        }))?;
    }

    cc.configure_series_labels()
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()?;
    Ok(())
}
