use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::request::Metric;

/// One flattened `(date, shop)` record of the day-level report.
///
/// `None` means the upstream did not report the metric that day. A missing
/// row means nothing was collected at all.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedRow {
    pub date: NaiveDate,
    pub shop_id: i64,
    pub count_in: Option<f64>,
    pub conversion_rate: Option<f64>,
    pub turnover: Option<f64>,
    pub sales_per_visitor: Option<f64>,
}

impl NormalizedRow {
    #[must_use]
    pub fn empty(date: NaiveDate, shop_id: i64) -> Self {
        Self {
            date,
            shop_id,
            count_in: None,
            conversion_rate: None,
            turnover: None,
            sales_per_visitor: None,
        }
    }

    #[must_use]
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::CountIn => self.count_in,
            Metric::ConversionRate => self.conversion_rate,
            Metric::Turnover => self.turnover,
            Metric::SalesPerVisitor => self.sales_per_visitor,
        }
    }

    pub fn set(&mut self, metric: Metric, value: Option<f64>) {
        match metric {
            Metric::CountIn => self.count_in = value,
            Metric::ConversionRate => self.conversion_rate = value,
            Metric::Turnover => self.turnover = value,
            Metric::SalesPerVisitor => self.sales_per_visitor = value,
        }
    }
}
