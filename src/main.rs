use chrono::{Datelike, Local};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use station_qa_rates::config::Config;
use station_qa_rates::io::KNOWN_GROUPS;
use station_qa_rates::qa::SummaryPolicy;
use station_qa_rates::services::RateService;
use station_qa_rates::utils::list_of_strings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Mode {
    /// Twelve months, annual value = mean of the monthly rates
    FullYear,
    /// Months already over, annual value annualized over the elapsed days
    YearToDate,
}

#[derive(Parser)]
#[command(name = "compute-rates")]
#[command(about = "Compute monthly operational, disponibility and lost rates of station measurements", long_about = None)]
struct Cli {
    /// Year to process (default: current year)
    #[arg(long)]
    year: Option<i32>,

    /// Station groups, comma separated (default: all known groups)
    #[arg(long)]
    group: Option<String>,

    /// Restrict to these sites, comma separated, instead of the station list
    #[arg(long)]
    station: Option<String>,

    /// Root of the {year}/{group}/{site}.csv input tree
    #[arg(long, env = "QA_INPUT_DIR")]
    indir: Option<PathBuf>,

    /// Root of the rates/{year}/{group} output tree
    #[arg(long, env = "QA_OUTPUT_DIR")]
    outdir: Option<PathBuf>,

    /// Directory holding the stations_{GROUP}.csv lists
    #[arg(long, env = "QA_STATION_LIST_DIR")]
    station_list_dir: Option<PathBuf>,

    /// Summary policy (default: picked from the year)
    #[arg(long, value_enum)]
    mode: Option<Mode>,

    /// Z-score threshold of the outlier table
    #[arg(long)]
    outlier_threshold: Option<f64>,

    /// Lost-rate threshold of the flagged report
    #[arg(long)]
    breach_threshold: Option<f64>,

    /// Number of sites processed in parallel
    #[arg(long)]
    concurrency: Option<usize>,
}

fn select_policy(mode: Option<Mode>, year: i32) -> Result<SummaryPolicy, String> {
    let today = Local::now().date_naive();
    match mode {
        Some(Mode::FullYear) => SummaryPolicy::full_year(year, today)
            .ok_or_else(|| format!("Year {year} is not over, full-year mode needs a closed year")),
        Some(Mode::YearToDate) if year < today.year() => {
            SummaryPolicy::year_to_date_through(year, 12)
                .ok_or_else(|| format!("Invalid year {year}"))
        }
        _ => SummaryPolicy::for_year(year, today)
            .ok_or_else(|| format!("Year {year} has not started, nothing to compute")),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if it exists
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,station_qa_rates=debug")),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_line_number(true),
        )
        .init();

    let cli = Cli::parse();

    let mut config = Config::from_env()?;
    if let Some(indir) = cli.indir {
        config.input_dir = indir;
    }
    if let Some(outdir) = cli.outdir {
        config.output_dir = outdir;
    }
    if let Some(dir) = cli.station_list_dir {
        config.station_list_dir = dir;
    }
    if let Some(threshold) = cli.outlier_threshold {
        config.outlier_threshold = threshold;
    }
    if cli.breach_threshold.is_some() {
        config.breach_threshold = cli.breach_threshold;
    }
    if let Some(concurrency) = cli.concurrency {
        config.worker_concurrency = concurrency.max(1);
    }
    info!("Starting rate computation with config: {:?}", config);

    let year = cli.year.unwrap_or_else(|| Local::now().year());
    let policy = match select_policy(cli.mode, year) {
        Ok(policy) => policy,
        Err(msg) => {
            error!("{}", msg);
            return Err(msg.into());
        }
    };
    if policy.months().is_empty() {
        warn!("No month of {} is over yet, nothing to compute", year);
        return Ok(());
    }
    info!("Year {} with policy {:?}", year, policy);

    let groups = match cli.group {
        Some(groups) => list_of_strings(&groups),
        None => KNOWN_GROUPS.iter().map(|g| g.to_string()).collect(),
    };
    let stations = cli.station.map(|s| list_of_strings(&s));

    let service = RateService::new(config, year, policy).with_progress(true);
    let mut failed_groups = 0;

    for group in &groups {
        let result = match &stations {
            Some(sites) => service.run_sites(group, sites.clone()).await,
            None => service.run_group(group).await,
        };
        match result {
            Ok(summary) => info!(
                "{}: {} sites ({} failed), {} series ({} failed), {} breached, {} outliers -> {}",
                summary.group,
                summary.sites_processed,
                summary.sites_failed,
                summary.series_processed,
                summary.series_failed,
                summary.breached_series,
                summary.outliers,
                summary.output_dir.display()
            ),
            Err(e) => {
                error!(group = %group, "Group failed: {}", e);
                failed_groups += 1;
            }
        }
    }

    if failed_groups > 0 {
        return Err(format!("{failed_groups} of {} groups failed", groups.len()).into());
    }
    Ok(())
}
