//! Report core for the retail KPI dashboards.
//!
//! Resolves which upstream endpoint variant answers, fetches the periodic
//! report and the live-occupancy feed, and flattens the nested day-level
//! payload into [`NormalizedRow`](pfmx_core::NormalizedRow)s. Every public
//! fetch returns an [`ErrorDescriptor`] instead of failing across the boundary.

pub mod client;
pub mod endpoint;
pub mod error;
pub mod live;
pub mod normalize;
pub mod payload;

pub use client::{ClientSettings, ReportClient, NO_REACHABLE_ENDPOINT};
pub use endpoint::{
    resolve_live_candidates, resolve_report_url, EndpointCandidate, EndpointPaths, HttpMethod,
    ParamEncoding,
};
pub use error::{AttemptTrace, ErrorDescriptor, ReportError};
pub use live::{live_inside, occupancy_rate, LiveOccupancy};
pub use normalize::{normalize, normalize_payload};
pub use payload::{EntityPayload, MetricValues, ReportPayload};
