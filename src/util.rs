use std::io::{self, Write};

use crate::aggregate::MetricMean;

/// `3600` seconds renders as `60.00 minutes`.
pub fn minutes_label(duration_seconds: f64) -> String {
    format!("{:.2} minutes", duration_seconds / 60.0)
}

/// Bar annotation text, rounded to two decimals.
pub fn value_label(value: f64) -> String {
    format!("{value:.2}")
}

/// Print aggregated metrics in a tabular format to the provided writer.
pub fn print_series<W: Write>(series: &[MetricMean], w: &mut W) -> io::Result<()> {
    if series.is_empty() {
        writeln!(w, "(0 rows)")?;
        return Ok(());
    }
    let cols = ["metric", "mean", "samples"];
    let cells: Vec<[String; 3]> = series
        .iter()
        .map(|m| [m.metric.clone(), value_label(m.mean), m.samples.to_string()])
        .collect();

    let index_width = series.len().to_string().len();
    let col_widths: Vec<usize> = cols
        .iter()
        .enumerate()
        .map(|(i, c)| {
            let max_val = cells.iter().map(|row| row[i].len()).max().unwrap_or(0);
            std::cmp::max(c.len(), max_val)
        })
        .collect();

    let mut header = format!("{:>width$}", "", width = index_width);
    for (c, w_width) in cols.iter().zip(col_widths.iter()) {
        header.push_str(&format!(" {:<width$}", c, width = w_width));
    }
    writeln!(w, "{}", header.trim_end())?;

    for (i, row) in cells.iter().enumerate() {
        let mut line = format!("{:>width$}", i, width = index_width);
        for (val, w_width) in row.iter().zip(col_widths.iter()) {
            line.push_str(&format!(" {:<width$}", val, width = w_width));
        }
        writeln!(w, "{}", line.trim_end())?;
    }
    writeln!(w, "({} rows)", series.len())?;
    Ok(())
}
