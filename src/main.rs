use std::path::PathBuf;

use benchviz::{
    ChartContext, ChartKind, PlotOptions, RunMetadata, aggregate,
    aggregate::MissingPolicy,
    chart, config, parser, table, telemetry,
    util::print_series,
};
use clap::{Args, Parser, Subcommand};
use tracing::info;

#[derive(Parser)]
#[command(name = "benchviz", version, about = "YCSB log to CSV converter and chart renderer")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert a benchmark log into a record table
    Parse(ParseArgs),
    /// Render single and grouped latency/throughput charts
    Plot(PlotArgs),
    /// Print the aggregated metrics of one record table
    Summary(SummaryArgs),
}

#[derive(Args)]
struct ParseArgs {
    log_path: PathBuf,
    csv_path: PathBuf,
    run_id: String,
    db: String,
    workload: String,
    threads: String,
    records: String,
}

#[derive(Args)]
struct PlotArgs {
    csv_path: PathBuf,
    duration_seconds: f64,
    workload: String,
    configuration: String,
    /// Substring matched against the operation tag, e.g. READ
    operation: String,
    /// Directory of per-configuration tables used for grouped charts
    #[arg(long, default_value = config::DEFAULT_TABLE_DIR)]
    table_dir: PathBuf,
    #[arg(long, default_value = config::DEFAULT_LATENCY_DIR)]
    latency_dir: PathBuf,
    #[arg(long, default_value = config::DEFAULT_THROUGHPUT_DIR)]
    throughput_dir: PathBuf,
}

#[derive(Args)]
struct SummaryArgs {
    csv_path: PathBuf,
    operation: String,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        // usage problems go to stdout with status 1; --help/--version as usual
        Err(err) if err.use_stderr() => {
            println!("{}", err.render());
            std::process::exit(1);
        }
        Err(err) => err.exit(),
    };
    telemetry::init_tracing()?;
    match cli.command {
        Command::Parse(args) => {
            let meta = RunMetadata::new(
                args.run_id,
                args.db,
                args.workload,
                args.threads,
                args.records,
            );
            parser::parse_log_file(&args.log_path, &args.csv_path, &meta)?;
        }
        Command::Plot(args) => {
            let opts = PlotOptions::default()
                .with_table_dir(args.table_dir)
                .with_output_dirs(args.latency_dir, args.throughput_dir);
            let ctx = ChartContext::new(args.duration_seconds, args.workload, args.operation);
            let rendered = chart::render_all(&args.csv_path, &ctx, &args.configuration, &opts)?;
            info!(charts = rendered.paths().len(), "rendering complete");
        }
        Command::Summary(args) => {
            let records = table::read_table(&args.csv_path)?;
            let mut out = std::io::stdout();
            for kind in [ChartKind::Latency, ChartKind::Throughput] {
                let series = aggregate::aggregate(
                    &records,
                    &args.operation,
                    kind.single_metrics(),
                    MissingPolicy::Omit,
                )?;
                println!("{} ({})", kind.name(), args.operation);
                print_series(&series, &mut out)?;
            }
        }
    }
    Ok(())
}
