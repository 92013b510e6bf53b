//! Typed view over the day-level report payload.
//!
//! ## Observed shape
//!
//! ```text
//! { "data": {
//!     "date_2024-06-03": {
//!       "100": { "data": { "count_in": 50, "turnover": 1000.0, ... } },
//!       "200": { "dates": {
//!                  "2024-06-03 09:00": { "data": { "count_in": 10, ... } },
//!                  "2024-06-03 10:00": { "data": { "count_in": 15, ... } } } } } } }
//! ```
//!
//! Entity ids are object keys, so they always arrive as strings. Metric values
//! are usually numbers but some deployments send numeric strings; both are
//! accepted. Anything else (null, bool, `"n/a"`) reads as "not reported".

use chrono::NaiveDate;
use serde_json::{Map, Value};

use pfmx_core::Metric;

/// JSON body of a successful upstream call.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportPayload(Value);

impl ReportPayload {
    #[must_use]
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The top-level `data` member, if present.
    #[must_use]
    pub fn data(&self) -> Option<&Value> {
        self.0.get("data")
    }

    #[must_use]
    pub fn as_value(&self) -> &Value {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> Value {
        self.0
    }
}

/// The four tracked metrics of one snapshot.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricValues {
    values: [Option<f64>; 4],
}

impl MetricValues {
    /// Reads the tracked metrics out of a snapshot's `data` object.
    #[must_use]
    pub fn from_object(map: &Map<String, Value>) -> Self {
        let mut out = Self::default();
        for metric in Metric::ALL {
            out.set(metric, map.get(metric.as_str()).and_then(metric_value));
        }
        out
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        self.values[index(metric)]
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        self.values[index(metric)] = value;
    }
}

fn index(metric: Metric) -> usize {
    match metric {
        Metric::CountIn => 0,
        Metric::ConversionRate => 1,
        Metric::Turnover => 2,
        Metric::SalesPerVisitor => 3,
    }
}

/// One entity's value under a date key, decoded by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum EntityPayload {
    /// `{ "data": { metric: value } }`: one daily snapshot. A `data` member
    /// that is not an object is ignored in favour of `dates`.
    Snapshot(MetricValues),
    /// `{ "dates": { timestamp: { "data": {...} } } }`: intraday snapshots,
    /// keeping only timestamps that carry a `data` object.
    Intraday(Vec<MetricValues>),
    /// Neither shape. Kept explicit so callers decide whether to skip.
    Unknown,
}

impl EntityPayload {
    #[must_use]
    pub fn decode(value: &Value) -> Self {
        let Some(obj) = value.as_object() else {
            return EntityPayload::Unknown;
        };
        if let Some(map) = obj.get("data").and_then(Value::as_object) {
            return EntityPayload::Snapshot(MetricValues::from_object(map));
        }
        if let Some(dates) = obj.get("dates").and_then(Value::as_object) {
            let snapshots = dates
                .values()
                .filter_map(|ts| ts.get("data").and_then(Value::as_object))
                .map(MetricValues::from_object)
                .collect();
            return EntityPayload::Intraday(snapshots);
        }
        EntityPayload::Unknown
    }
}

/// All entities reported for one calendar date.
#[derive(Debug, Clone, PartialEq)]
pub struct DayPayload {
    pub date: NaiveDate,
    pub entities: Vec<(i64, EntityPayload)>,
}

/// Whether `value` is an error descriptor rather than a report body.
#[must_use]
pub fn is_error_payload(value: &Value) -> bool {
    value.get("is_error").and_then(Value::as_bool) == Some(true)
}

/// Decodes the `data` member into per-date entity payloads.
///
/// Date keys that do not parse and entity keys that are not integers are
/// skipped with a debug log; an error descriptor, a non-object or a body
/// without a `data` object decodes to nothing.
#[must_use]
pub fn decode_days(value: &Value) -> Vec<DayPayload> {
    if is_error_payload(value) {
        return Vec::new();
    }
    let Some(days) = value.get("data").and_then(Value::as_object) else {
        return Vec::new();
    };

    let mut out = Vec::with_capacity(days.len());
    for (day_key, day_blob) in days {
        let Some(date) = parse_date_key(day_key) else {
            tracing::debug!(day_key, "skipping report entry with unparsable date key");
            continue;
        };
        let Some(entities) = day_blob.as_object() else {
            continue;
        };
        let entities = entities
            .iter()
            .filter_map(|(id, blob)| match id.trim().parse::<i64>() {
                Ok(id) => Some((id, EntityPayload::decode(blob))),
                Err(_) => {
                    tracing::debug!(day_key, entity = %id, "skipping non-numeric entity id");
                    None
                }
            })
            .collect();
        out.push(DayPayload { date, entities });
    }
    out
}

/// Parses `"date_YYYY-MM-DD"`; a missing `date_` prefix is tolerated.
#[must_use]
pub fn parse_date_key(key: &str) -> Option<NaiveDate> {
    let raw = key.strip_prefix("date_").unwrap_or(key);
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d").ok()
}

fn metric_value(value: &Value) -> Option<f64> {
    let n = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }?;
    n.is_finite().then_some(n)
}
