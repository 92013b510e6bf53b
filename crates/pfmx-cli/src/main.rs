use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use pfmx_core::{Metric, NamedPeriod, PeriodStep, Source};
use pfmx_report::ReportClient;
use tracing_subscriber::EnvFilter;

mod format;
mod live;
mod report;
mod smoke;

#[derive(Debug, Parser)]
#[command(name = "pfmx")]
#[command(about = "Retail KPI reports and live occupancy from the pfmx API")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch a periodic report and print day-level rows
    Report {
        /// Entity level to report on (shops, locations, zones)
        #[arg(long, default_value = "shops")]
        source: Source,
        /// Relative period token (e.g. `last_month`); ignored with --from/--to
        #[arg(long, default_value = "last_week", conflicts_with_all = ["from", "to"])]
        period: NamedPeriod,
        /// First day of an explicit range (YYYY-MM-DD)
        #[arg(long, requires = "to")]
        from: Option<NaiveDate>,
        /// Last day of an explicit range, inclusive
        #[arg(long, requires = "from")]
        to: Option<NaiveDate>,
        /// Bucket size for an explicit range
        #[arg(long, default_value = "day")]
        step: PeriodStep,
        /// Entity id, repeatable
        #[arg(long = "id", required = true)]
        ids: Vec<i64>,
        /// KPI to request, repeatable (defaults to all)
        #[arg(long = "metric")]
        metrics: Vec<Metric>,
        /// Print rows (or the error descriptor) as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show how many people are inside right now
    Live {
        #[arg(long, default_value = "zones")]
        source: Source,
        /// Entity id, repeatable
        #[arg(long = "id", required = true)]
        ids: Vec<i64>,
        /// Capacity used to compute the occupancy rate
        #[arg(long)]
        capacity: Option<u32>,
        /// Poll again every N seconds until interrupted
        #[arg(long, value_name = "SECS")]
        watch: Option<u64>,
    },
    /// Check that the report and live endpoints answer
    Smoke {
        /// Entity id to check with
        #[arg(long)]
        id: i64,
        /// Source used for the live check
        #[arg(long, default_value = "locations")]
        live_source: Source,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = pfmx_core::load_app_config()?;

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::debug!(api_url = %config.api_url, "configuration loaded");
    let client = ReportClient::from_app_config(&config)?;

    match cli.command {
        Commands::Report {
            source,
            period,
            from,
            to,
            step,
            ids,
            metrics,
            json,
        } => {
            let request = report::build_request(source, period, from.zip(to), step, ids, metrics)?;
            report::run_report(&client, &request, json).await?;
        }
        Commands::Live {
            source,
            ids,
            capacity,
            watch,
        } => live::run_live(&client, source, &ids, capacity, watch).await?,
        Commands::Smoke { id, live_source } => smoke::run_smoke(&client, id, live_source).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests;
