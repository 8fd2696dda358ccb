//! CLI entry point for the vehicle licensing chart tool.
//!
//! Loads the licensing CSV from a file or URL, projects it for one of the
//! five charts, and emits the chart document as JSON.

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::ffi::OsStr;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};
use vehicle_charts::{
    aggregate::{Order, Predicate, filter_by, group_and_sum},
    charts::{
        self, ChartConfigSet, ChartDocument, ChartKind, DEFAULT_DOUGHNUT_PERIOD,
        DEFAULT_LINE_SINCE, DEFAULT_PIE_YEAR,
    },
    fetch::load_source,
    output::{print_json, print_pretty, write_json, write_points_csv},
    parser::load_records,
    record::{ParsedRecord, Period},
    taxation::TaxationClass,
};

#[derive(Parser)]
#[command(name = "vehicle_charts")]
#[command(about = "Aggregate vehicle licensing data for charting", long_about = None)]
struct Cli {
    /// Path or URL of the licensing CSV (defaults to $VEHICLE_CSV, then vehicles.csv)
    #[arg(short, long, global = true, value_name = "FILE_OR_URL")]
    source: Option<String>,

    /// JSON file with per-chart dimension overrides
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// New private cars vs new goods vehicles for one month
    Doughnut {
        /// Month in YYYYMmm form
        #[arg(short, long, default_value_t = DEFAULT_DOUGHNUT_PERIOD)]
        month: Period,

        /// Write JSON here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// New vs second-hand private cars in the first month of each year
    Bar {
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Also export the grouped points as CSV
        #[arg(long)]
        csv: Option<PathBuf>,
    },
    /// Monthly new vehicle registrations
    Line {
        /// First month to include, YYYYMmm
        #[arg(long, default_value_t = DEFAULT_LINE_SINCE)]
        since: Period,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// All vehicles by month for one year
    Pie {
        #[arg(short, long, default_value_t = DEFAULT_PIE_YEAR)]
        year: i32,

        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// New and second-hand tractor registrations per month
    Scatter {
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// List the years available to the pie chart
    Years,
    /// Sum every class per year and export as CSV
    Summary {
        /// CSV file to write
        #[arg(short, long, default_value = "summary.csv")]
        output: PathBuf,

        /// Only include months from this one onward, YYYYMmm
        #[arg(long)]
        since: Option<Period>,
    },
    /// Write all five chart documents into a directory
    All {
        #[arg(short = 'd', long, default_value = "charts")]
        output_dir: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/vehicle_charts.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("vehicle_charts.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let configs = match &cli.config {
        Some(path) => ChartConfigSet::load(path)?,
        None => ChartConfigSet::default(),
    };
    let source = cli
        .source
        .or_else(|| std::env::var("VEHICLE_CSV").ok())
        .unwrap_or_else(|| "vehicles.csv".to_string());

    let text = load_source(&source).await?;
    let records = load_records(&text)?;
    info!(records = records.len(), source = %source, "Records ready");

    match cli.command {
        Commands::Doughnut { month, output } => {
            let doc = charts::doughnut(&records, month, &configs.for_kind(ChartKind::Doughnut));
            emit(&doc, output.as_deref())?;
        }
        Commands::Bar { output, csv } => {
            let doc = charts::bar(&records, &configs.for_kind(ChartKind::Bar));
            if let (Some(path), charts::ChartData::Bar(points)) = (&csv, &doc.data) {
                write_points_csv(
                    path,
                    points,
                    &[TaxationClass::NewPrivateCars, TaxationClass::SecondhandPrivateCars],
                )?;
            }
            emit(&doc, output.as_deref())?;
        }
        Commands::Line { since, output } => {
            let doc = charts::line(&records, since, &configs.for_kind(ChartKind::Line));
            emit(&doc, output.as_deref())?;
        }
        Commands::Pie { year, output } => {
            let years = charts::pie_years(&records);
            if !years.contains(&year) {
                warn!(year, available = ?years, "Year not present in dataset");
            }
            let doc = charts::pie(&records, year, &configs.for_kind(ChartKind::Pie));
            emit(&doc, output.as_deref())?;
        }
        Commands::Scatter { output } => {
            let doc = charts::scatter(&records, &configs.for_kind(ChartKind::Scatter));
            emit(&doc, output.as_deref())?;
        }
        Commands::Years => {
            print_json(&charts::pie_years(&records))?;
        }
        Commands::Summary { output, since } => {
            write_summary(&records, since, &output)?;
        }
        Commands::All { output_dir } => {
            for kind in ChartKind::ALL {
                let config = configs.for_kind(kind);
                let doc = match kind {
                    ChartKind::Doughnut => {
                        charts::doughnut(&records, DEFAULT_DOUGHNUT_PERIOD, &config)
                    }
                    ChartKind::Bar => charts::bar(&records, &config),
                    ChartKind::Line => charts::line(&records, DEFAULT_LINE_SINCE, &config),
                    ChartKind::Pie => charts::pie(&records, DEFAULT_PIE_YEAR, &config),
                    ChartKind::Scatter => charts::scatter(&records, &config),
                };
                let path = output_dir.join(format!("{kind}.json"));
                emit(&doc, Some(path.as_path()))?;
            }
            info!(output_dir = %output_dir.display(), "All charts written");
        }
    }

    Ok(())
}

/// Writes a chart document to `output`, or stdout when no path is given.
fn emit(doc: &ChartDocument, output: Option<&Path>) -> Result<()> {
    print_pretty(doc);
    if doc.data.is_empty() {
        warn!(kind = %doc.kind, "Chart has no data");
    }
    match output {
        Some(path) => write_json(path, doc),
        None => print_json(doc),
    }
}

/// Yearly totals for every taxation class, chronological.
#[tracing::instrument(skip(records), fields(output = %output.display()))]
fn write_summary(records: &[ParsedRecord], since: Option<Period>, output: &Path) -> Result<()> {
    let selected = match since {
        Some(from) => filter_by(records, &Predicate::Since(from)),
        None => records.to_vec(),
    };
    let points = group_and_sum(
        &selected,
        |r| r.year(),
        &TaxationClass::ALL,
        Order::Chronological,
    );
    write_points_csv(output, &points, &TaxationClass::ALL)?;
    info!(years = points.len(), "Summary written");
    Ok(())
}
