//! `smoke` subcommand: one report call and one live call, with the
//! endpoint variant that answered each.

use chrono::{Datelike, Duration, Local, NaiveDate};
use pfmx_core::{Metric, NormalizedRow, Period, PeriodStep, ReportRequest, Source};
use pfmx_report::{normalize_payload, EndpointCandidate, ReportClient};

/// Monday to Sunday of the ISO week before the one containing `today`.
pub(crate) fn last_week_range(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let this_monday = today - Duration::days(i64::from(today.weekday().num_days_from_monday()));
    let from = this_monday - Duration::days(7);
    (from, from + Duration::days(6))
}

/// Number of KPIs that carry a value in at least one row.
fn kpis_found(rows: &[NormalizedRow]) -> usize {
    Metric::ALL
        .iter()
        .filter(|m| rows.iter().any(|r| r.get(**m).is_some()))
        .count()
}

fn describe(candidate: &EndpointCandidate) -> String {
    format!(
        "{} {} [{:?}]",
        candidate.method.as_str(),
        candidate.url,
        candidate.encoding
    )
}

/// Runs both checks and prints the outcome of each.
///
/// # Errors
///
/// Returns an error if the report request cannot be built or the live
/// payload cannot be serialized for display.
pub(crate) async fn run_smoke(
    client: &ReportClient,
    id: i64,
    live_source: Source,
) -> anyhow::Result<()> {
    let (from, to) = last_week_range(Local::now().date_naive());
    let request = ReportRequest::with_default_metrics(
        Source::Shops,
        Period::range(from, to, PeriodStep::Day)?,
        [id],
    )?;

    println!("get-report ({})", request.period);
    match client.fetch_report_with_endpoint(&request).await {
        Ok((payload, answered)) => {
            let rows = normalize_payload(&payload);
            println!("  answered by: {}", describe(&answered));
            println!(
                "  {}/{} KPIs found across {} row(s)",
                kpis_found(&rows),
                Metric::ALL.len(),
                rows.len()
            );
        }
        Err(descriptor) => println!("  FAILED {descriptor}"),
    }

    println!("live-inside ({live_source})");
    match client
        .fetch_live_occupancy_with_endpoint(&[id], live_source)
        .await
    {
        Ok((payload, answered)) => {
            println!("  answered by: {}", describe(&answered));
            println!("  {}", serde_json::to_string(payload.as_value())?);
        }
        Err(descriptor) => println!("  FAILED {descriptor}"),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn last_week_from_midweek() {
        // 2024-06-12 is a Wednesday.
        assert_eq!(
            last_week_range(date(2024, 6, 12)),
            (date(2024, 6, 3), date(2024, 6, 9))
        );
    }

    #[test]
    fn last_week_from_monday_and_sunday() {
        assert_eq!(
            last_week_range(date(2024, 6, 10)),
            (date(2024, 6, 3), date(2024, 6, 9))
        );
        assert_eq!(
            last_week_range(date(2024, 6, 16)),
            (date(2024, 6, 3), date(2024, 6, 9))
        );
    }

    #[test]
    fn describes_method_url_and_encoding() {
        let candidate = EndpointCandidate {
            url: "https://host/get-report".to_owned(),
            method: pfmx_report::HttpMethod::Get,
            encoding: pfmx_report::ParamEncoding::Plain,
        };
        assert_eq!(describe(&candidate), "GET https://host/get-report [Plain]");
    }

    #[test]
    fn counts_kpis_present_in_any_row() {
        let mut a = NormalizedRow::empty(date(2024, 6, 3), 1);
        a.count_in = Some(10.0);
        let mut b = NormalizedRow::empty(date(2024, 6, 4), 1);
        b.turnover = Some(100.0);
        assert_eq!(kpis_found(&[a, b]), 2);
        assert_eq!(kpis_found(&[]), 0);
    }
}
