//! Day-level normalization of report payloads into [`NormalizedRow`]s.
//!
//! Structural decoding lives in [`crate::payload`]; this module decides how
//! each decoded shape becomes a row and fills in sales-per-visitor.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde_json::Value;

use pfmx_core::{Metric, NormalizedRow};

use crate::payload::{decode_days, EntityPayload, MetricValues, ReportPayload};

/// Flattens a report payload into rows sorted by `(shop_id, date)`.
///
/// Error descriptors, non-objects and bodies without `data` produce an empty
/// list: empty means "no data", not failure. Pure and idempotent.
#[must_use]
pub fn normalize(payload: &Value) -> Vec<NormalizedRow> {
    let mut rows: BTreeMap<(i64, NaiveDate), NormalizedRow> = BTreeMap::new();

    for day in decode_days(payload) {
        for (shop_id, entity) in &day.entities {
            let Some(mut row) = row_for_entity(day.date, *shop_id, entity) else {
                continue;
            };
            derive_sales_per_visitor(&mut row);
            rows.entry((*shop_id, day.date)).or_insert(row);
        }
    }

    rows.into_values().collect()
}

/// [`normalize`] over a fetched payload.
#[must_use]
pub fn normalize_payload(payload: &ReportPayload) -> Vec<NormalizedRow> {
    normalize(payload.as_value())
}

fn row_for_entity(date: NaiveDate, shop_id: i64, entity: &EntityPayload) -> Option<NormalizedRow> {
    let values = match entity {
        EntityPayload::Snapshot(values) => *values,
        EntityPayload::Intraday(snapshots) if snapshots.is_empty() => return None,
        EntityPayload::Intraday(snapshots) => aggregate_intraday(snapshots),
        EntityPayload::Unknown => {
            tracing::debug!(%date, shop_id, "skipping entity with unrecognised payload shape");
            return None;
        }
    };

    let mut row = NormalizedRow::empty(date, shop_id);
    for metric in Metric::ALL {
        row.set(metric, values.get(metric));
    }
    Some(row)
}

/// Sums additive metrics and averages rates across the timestamps that
/// report them; a metric no timestamp reports stays `None`.
fn aggregate_intraday(snapshots: &[MetricValues]) -> MetricValues {
    let mut out = MetricValues::default();
    for metric in Metric::ALL {
        let reported: Vec<f64> = snapshots.iter().filter_map(|s| s.get(metric)).collect();
        if reported.is_empty() {
            continue;
        }
        let sum: f64 = reported.iter().sum();
        let value = if metric.is_additive() {
            sum
        } else {
            #[allow(clippy::cast_precision_loss)]
            let n = reported.len() as f64;
            sum / n
        };
        out.set(metric, Some(value));
    }
    out
}

/// Fills `sales_per_visitor = turnover / count_in` when upstream left it out.
#[allow(clippy::float_cmp)]
fn derive_sales_per_visitor(row: &mut NormalizedRow) {
    if row.sales_per_visitor.is_some() {
        return;
    }
    if let (Some(turnover), Some(count_in)) = (row.turnover, row.count_in) {
        if count_in != 0.0 {
            row.sales_per_visitor = Some(turnover / count_in);
        }
    }
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
