//! `live` subcommand: current occupancy, optionally polled.

use std::time::Duration;

use tokio::time::{Interval, MissedTickBehavior};

use pfmx_core::Source;
use pfmx_report::{LiveOccupancy, ReportClient};

use crate::format::{fmt_count, fmt_opt, fmt_pct};

/// Prints live occupancy for `ids`, once or every `watch` seconds.
///
/// Polling stops on Ctrl-C. Fetch failures are printed and polling goes on.
///
/// # Errors
///
/// Returns an error if the Ctrl-C handler cannot be installed.
pub(crate) async fn run_live(
    client: &ReportClient,
    source: Source,
    ids: &[i64],
    capacity: Option<u32>,
    watch: Option<u64>,
) -> anyhow::Result<()> {
    let Some(secs) = watch.filter(|s| *s > 0) else {
        print_live_once(client, source, ids, capacity).await;
        return Ok(());
    };

    let mut ticker = watch_ticker(secs);
    loop {
        tokio::select! {
            _ = ticker.tick() => print_live_once(client, source, ids, capacity).await,
            res = tokio::signal::ctrl_c() => {
                res?;
                tracing::info!("live polling stopped");
                return Ok(());
            }
        }
    }
}

/// Ticker for `--watch`; a sweep that overruns the period pushes the next
/// one back instead of firing the missed ticks back to back.
fn watch_ticker(secs: u64) -> Interval {
    let mut ticker = tokio::time::interval(Duration::from_secs(secs));
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn print_live_once(client: &ReportClient, source: Source, ids: &[i64], capacity: Option<u32>) {
    let payload = match client.fetch_live_occupancy(ids, source).await {
        Ok(payload) => payload,
        Err(descriptor) => {
            eprintln!("live request failed: {descriptor}");
            return;
        }
    };

    let now = chrono::Local::now().format("%H:%M:%S").to_string();
    for id in ids {
        match LiveOccupancy::from_payload(&payload, *id, capacity) {
            Some(live) => println!("{}", live_line(&now, &live)),
            None => println!("[{now}] {id}: no live data"),
        }
    }
}

fn live_line(at: &str, live: &LiveOccupancy) -> String {
    let busy = if live.is_busy() { "  BUSY" } else { "" };
    format!(
        "[{at}] {}: {} inside, occupancy {}{busy}",
        live.entity_id,
        fmt_count(live.inside),
        fmt_opt(live.occupancy_rate, |r| fmt_pct(r, 0)),
    )
}
