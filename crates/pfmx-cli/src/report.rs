//! `report` subcommand: fetch, normalize, print.

use chrono::NaiveDate;
use pfmx_core::{Metric, NamedPeriod, NormalizedRow, Period, PeriodStep, ReportRequest, Source};
use pfmx_report::{normalize_payload, ReportClient};

use crate::format::{fmt_count, fmt_eur, fmt_opt, fmt_pct};

/// Builds the request from CLI arguments.
///
/// An explicit `range` takes precedence over the relative `period`. An empty
/// metric list means all KPIs.
///
/// # Errors
///
/// Returns an error if the range is reversed or `ids` is empty.
pub(crate) fn build_request(
    source: Source,
    period: NamedPeriod,
    range: Option<(NaiveDate, NaiveDate)>,
    step: PeriodStep,
    ids: Vec<i64>,
    metrics: Vec<Metric>,
) -> anyhow::Result<ReportRequest> {
    let period = match range {
        Some((from, to)) => Period::range(from, to, step)?,
        None => Period::Named(period),
    };
    let request = if metrics.is_empty() {
        ReportRequest::with_default_metrics(source, period, ids)?
    } else {
        ReportRequest::new(source, period, ids, metrics)?
    };
    Ok(request)
}

/// Fetches the report and prints one line per `(shop, day)`.
///
/// A failed fetch prints the error descriptor and still returns `Ok`.
///
/// # Errors
///
/// Returns an error only if JSON output cannot be serialized.
pub(crate) async fn run_report(
    client: &ReportClient,
    request: &ReportRequest,
    json: bool,
) -> anyhow::Result<()> {
    let payload = match client.fetch_report(request).await {
        Ok(payload) => payload,
        Err(descriptor) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&descriptor)?);
            } else {
                eprintln!("report failed: {descriptor}");
                for attempt in &descriptor.attempts {
                    eprintln!("  {attempt}");
                }
            }
            return Ok(());
        }
    };

    let rows = normalize_payload(&payload);
    tracing::info!(rows = rows.len(), "report normalized");

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
        return Ok(());
    }

    if rows.is_empty() {
        println!("no rows in report for {}", request.period);
        return Ok(());
    }
    print_rows(&rows);
    Ok(())
}

fn print_rows(rows: &[NormalizedRow]) {
    println!(
        "{:<12}{:<10}{:>12}{:>12}{:>14}{:>10}",
        "DATE", "SHOP", "VISITORS", "CONVERSION", "TURNOVER", "SPV"
    );
    for row in rows {
        println!(
            "{:<12}{:<10}{:>12}{:>12}{:>14}{:>10}",
            row.date.format("%Y-%m-%d").to_string(),
            row.shop_id,
            fmt_opt(row.count_in, fmt_count),
            fmt_opt(row.conversion_rate, |v| fmt_pct(v, 1)),
            fmt_opt(row.turnover, fmt_eur),
            fmt_opt(row.sales_per_visitor, |v| format!("€{v:.2}").replace('.', ",")),
        );
    }
}
