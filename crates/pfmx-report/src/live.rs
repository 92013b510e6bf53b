//! Reading "people inside now" out of a live-occupancy payload.
//!
//! The live feed has no stable schema across API versions: the count may sit
//! under `inside`, `count_inside` or `current`, keyed by entity id below an
//! optional `data` wrapper.

use serde::Serialize;
use serde_json::Value;

use crate::payload::ReportPayload;

/// Occupancy above this fraction of capacity counts as busy.
pub const BUSY_THRESHOLD: f64 = 0.8;

const INSIDE_KEYS: [&str; 3] = ["inside", "count_inside", "current"];

/// Current occupancy of one entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LiveOccupancy {
    pub entity_id: i64,
    pub inside: f64,
    pub capacity: Option<u32>,
    pub occupancy_rate: Option<f64>,
}

impl LiveOccupancy {
    /// Builds the occupancy for `entity_id`, or `None` when the payload
    /// carries no readable live data at all.
    #[must_use]
    pub fn from_payload(payload: &ReportPayload, entity_id: i64, capacity: Option<u32>) -> Option<Self> {
        let inside = live_inside(payload.as_value(), entity_id)?;
        Some(Self {
            entity_id,
            inside,
            capacity,
            occupancy_rate: capacity.and_then(|c| occupancy_rate(inside, c)),
        })
    }

    #[must_use]
    pub fn is_busy(&self) -> bool {
        self.occupancy_rate.is_some_and(|r| r > BUSY_THRESHOLD)
    }
}

/// Number of people inside `entity_id`.
///
/// Looks under `data` (or the root when there is no `data`). When the
/// entity's own node is an object, the first numeric count key wins and a
/// node without one reads as zero. Otherwise the `inside` values of all
/// child objects are summed. Returns `None` if there is no object to read.
#[must_use]
pub fn live_inside(payload: &Value, entity_id: i64) -> Option<f64> {
    let data = match payload.get("data") {
        Some(Value::Null) | None => payload,
        Some(data) => data,
    };
    let map = data.as_object()?;

    if let Some(node) = map.get(&entity_id.to_string()).and_then(Value::as_object) {
        let inside = INSIDE_KEYS
            .iter()
            .find_map(|k| node.get(*k).and_then(count_value))
            .unwrap_or(0.0);
        return Some(inside);
    }

    Some(
        map.values()
            .filter_map(|v| v.get("inside").and_then(count_value))
            .sum(),
    )
}

/// `inside / capacity`, or `None` for a zero capacity.
#[must_use]
pub fn occupancy_rate(inside: f64, capacity: u32) -> Option<f64> {
    (capacity > 0).then(|| inside / f64::from(capacity))
}

fn count_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn reads_entity_node_under_data() {
        let v = json!({"data": {"37953": {"inside": 42}}});
        assert_eq!(live_inside(&v, 37953), Some(42.0));
    }

    #[test]
    fn falls_back_through_count_keys() {
        let v = json!({"data": {"1": {"count_inside": 7}}});
        assert_eq!(live_inside(&v, 1), Some(7.0));
        let v = json!({"data": {"1": {"current": "9"}}});
        assert_eq!(live_inside(&v, 1), Some(9.0));
    }

    #[test]
    fn entity_node_without_count_reads_zero() {
        let v = json!({"data": {"1": {"label": "entrance"}}});
        assert_eq!(live_inside(&v, 1), Some(0.0));
    }

    #[test]
    fn sums_children_when_entity_missing() {
        let v = json!({"data": {"10": {"inside": 3}, "11": {"inside": 4}, "meta": "x"}});
        assert_eq!(live_inside(&v, 99), Some(7.0));
    }

    #[test]
    fn reads_root_without_data_wrapper() {
        let v = json!({"5": {"inside": 12}});
        assert_eq!(live_inside(&v, 5), Some(12.0));
    }

    #[test]
    fn non_object_payload_has_no_reading() {
        assert_eq!(live_inside(&json!([1, 2]), 1), None);
        assert_eq!(live_inside(&json!({"data": "offline"}), 1), None);
    }

    #[test]
    fn occupancy_rate_guards_zero_capacity() {
        assert_eq!(occupancy_rate(10.0, 0), None);
        assert_eq!(occupancy_rate(30.0, 120), Some(0.25));
    }

    #[test]
    fn busy_above_threshold() {
        let p = ReportPayload::new(json!({"data": {"1": {"inside": 90}}}));
        let occ = LiveOccupancy::from_payload(&p, 1, Some(100)).unwrap();
        assert!(occ.is_busy());
        let occ = LiveOccupancy::from_payload(&p, 1, None).unwrap();
        assert!(!occ.is_busy());
        assert_eq!(occ.occupancy_rate, None);
    }
}
