//! Report request types: which entities, which period, which metrics.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::CoreError;

/// Which entity level the upstream API should report on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Source {
    Shops,
    Locations,
    Zones,
}

impl Source {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Shops => "shops",
            Source::Locations => "locations",
            Source::Zones => "zones",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Source {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "shops" => Ok(Source::Shops),
            "locations" => Ok(Source::Locations),
            "zones" => Ok(Source::Zones),
            other => Err(CoreError::UnknownSource(other.to_string())),
        }
    }
}

/// Relative period tokens understood by the upstream `period` parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NamedPeriod {
    Today,
    Yesterday,
    ThisWeek,
    LastWeek,
    ThisMonth,
    LastMonth,
    ThisQuarter,
    LastQuarter,
    ThisYear,
    LastYear,
}

impl NamedPeriod {
    pub const ALL: [NamedPeriod; 10] = [
        NamedPeriod::Today,
        NamedPeriod::Yesterday,
        NamedPeriod::ThisWeek,
        NamedPeriod::LastWeek,
        NamedPeriod::ThisMonth,
        NamedPeriod::LastMonth,
        NamedPeriod::ThisQuarter,
        NamedPeriod::LastQuarter,
        NamedPeriod::ThisYear,
        NamedPeriod::LastYear,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            NamedPeriod::Today => "today",
            NamedPeriod::Yesterday => "yesterday",
            NamedPeriod::ThisWeek => "this_week",
            NamedPeriod::LastWeek => "last_week",
            NamedPeriod::ThisMonth => "this_month",
            NamedPeriod::LastMonth => "last_month",
            NamedPeriod::ThisQuarter => "this_quarter",
            NamedPeriod::LastQuarter => "last_quarter",
            NamedPeriod::ThisYear => "this_year",
            NamedPeriod::LastYear => "last_year",
        }
    }
}

impl fmt::Display for NamedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NamedPeriod {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        NamedPeriod::ALL
            .into_iter()
            .find(|p| p.as_str() == needle)
            .ok_or(CoreError::UnknownPeriod(needle))
    }
}

/// Granularity of an explicit date range (`period_step`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodStep {
    #[serde(rename = "15min")]
    FifteenMinutes,
    #[serde(rename = "hour")]
    Hour,
    #[serde(rename = "day")]
    Day,
    #[serde(rename = "week")]
    Week,
    #[serde(rename = "month")]
    Month,
}

impl PeriodStep {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PeriodStep::FifteenMinutes => "15min",
            PeriodStep::Hour => "hour",
            PeriodStep::Day => "day",
            PeriodStep::Week => "week",
            PeriodStep::Month => "month",
        }
    }
}

impl fmt::Display for PeriodStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PeriodStep {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "15min" => Ok(PeriodStep::FifteenMinutes),
            "hour" => Ok(PeriodStep::Hour),
            "day" => Ok(PeriodStep::Day),
            "week" => Ok(PeriodStep::Week),
            "month" => Ok(PeriodStep::Month),
            other => Err(CoreError::UnknownPeriodStep(other.to_string())),
        }
    }
}

/// Either a relative period token or an explicit inclusive date range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Named(NamedPeriod),
    Range {
        from: NaiveDate,
        to: NaiveDate,
        step: PeriodStep,
    },
}

impl Period {
    /// Builds an explicit range, rejecting `from > to`.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::ReversedRange`] when `from` is after `to`.
    pub fn range(from: NaiveDate, to: NaiveDate, step: PeriodStep) -> Result<Self, CoreError> {
        if from > to {
            return Err(CoreError::ReversedRange {
                from: from.to_string(),
                to: to.to_string(),
            });
        }
        Ok(Period::Range { from, to, step })
    }

    /// Query pairs for this period, in the order the API documents them.
    #[must_use]
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        match self {
            Period::Named(p) => vec![("period", p.as_str().to_string())],
            Period::Range { from, to, step } => vec![
                ("date_from", from.format("%Y-%m-%d").to_string()),
                ("date_to", to.format("%Y-%m-%d").to_string()),
                ("period_step", step.as_str().to_string()),
            ],
        }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Period::Named(p) => f.write_str(p.as_str()),
            Period::Range { from, to, step } => write!(f, "{from}..{to} per {}", step.as_str()),
        }
    }
}

impl From<NamedPeriod> for Period {
    fn from(p: NamedPeriod) -> Self {
        Period::Named(p)
    }
}

/// The KPIs tracked through normalization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    CountIn,
    ConversionRate,
    Turnover,
    SalesPerVisitor,
}

impl Metric {
    pub const ALL: [Metric; 4] = [
        Metric::CountIn,
        Metric::ConversionRate,
        Metric::Turnover,
        Metric::SalesPerVisitor,
    ];

    /// Wire name used both as `data_output` value and as payload key.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Metric::CountIn => "count_in",
            Metric::ConversionRate => "conversion_rate",
            Metric::Turnover => "turnover",
            Metric::SalesPerVisitor => "sales_per_visitor",
        }
    }

    /// Whether intraday values of this metric add up (`true`) or average out.
    #[must_use]
    pub fn is_additive(self) -> bool {
        matches!(self, Metric::CountIn | Metric::Turnover)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Metric {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim().to_ascii_lowercase();
        Metric::ALL
            .into_iter()
            .find(|m| m.as_str() == needle)
            .ok_or(CoreError::UnknownMetric(needle))
    }
}

/// A single periodic-report call.
///
/// Entity ids and metrics are ordered sets: duplicates are dropped on
/// construction, first occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportRequest {
    pub source: Source,
    pub period: Period,
    entity_ids: Vec<i64>,
    requested_metrics: Vec<Metric>,
}

impl ReportRequest {
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyEntityIds`] or [`CoreError::EmptyMetrics`]
    /// when either set is empty after de-duplication.
    pub fn new(
        source: Source,
        period: impl Into<Period>,
        entity_ids: impl IntoIterator<Item = i64>,
        requested_metrics: impl IntoIterator<Item = Metric>,
    ) -> Result<Self, CoreError> {
        let entity_ids = dedup_ordered(entity_ids);
        let requested_metrics = dedup_ordered(requested_metrics);
        if entity_ids.is_empty() {
            return Err(CoreError::EmptyEntityIds);
        }
        if requested_metrics.is_empty() {
            return Err(CoreError::EmptyMetrics);
        }
        Ok(Self {
            source,
            period: period.into(),
            entity_ids,
            requested_metrics,
        })
    }

    /// Request for the four tracked KPIs.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::EmptyEntityIds`] when `entity_ids` is empty.
    pub fn with_default_metrics(
        source: Source,
        period: impl Into<Period>,
        entity_ids: impl IntoIterator<Item = i64>,
    ) -> Result<Self, CoreError> {
        Self::new(source, period, entity_ids, Metric::ALL)
    }

    #[must_use]
    pub fn entity_ids(&self) -> &[i64] {
        &self.entity_ids
    }

    #[must_use]
    pub fn requested_metrics(&self) -> &[Metric] {
        &self.requested_metrics
    }
}

fn dedup_ordered<T: PartialEq>(items: impl IntoIterator<Item = T>) -> Vec<T> {
    let mut out: Vec<T> = Vec::new();
    for item in items {
        if !out.contains(&item) {
            out.push(item);
        }
    }
    out
}
