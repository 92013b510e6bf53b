//! Periodic report endpoint (`get-report`).

use std::time::Duration;

use pfmx_core::ReportRequest;

use super::ReportClient;
use crate::endpoint::{
    report_candidates, resolve_report_url, EndpointCandidate, HttpMethod, ParamEncoding,
};
use crate::error::ErrorDescriptor;
use crate::payload::ReportPayload;

impl ReportClient {
    /// Fetches the periodic report for `request`.
    ///
    /// Tries bracketed array keys (`data[]=…`) first and, on any failure,
    /// plain keys (`data=…`) once against the same URL. A cached variant
    /// from an earlier call goes first when negotiation caching is on.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorDescriptor`] listing every attempt when no variant
    /// produced a JSON object with a `data` member, or when the base URL
    /// cannot be resolved.
    pub async fn fetch_report(
        &self,
        request: &ReportRequest,
    ) -> Result<ReportPayload, ErrorDescriptor> {
        self.fetch_report_with_endpoint(request)
            .await
            .map(|(payload, _)| payload)
    }

    /// [`fetch_report`](Self::fetch_report), also returning the candidate
    /// that answered whether or not negotiation caching is on.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_report`](Self::fetch_report).
    pub async fn fetch_report_with_endpoint(
        &self,
        request: &ReportRequest,
    ) -> Result<(ReportPayload, EndpointCandidate), ErrorDescriptor> {
        let method = HttpMethod::Get.as_str();
        let report_url = resolve_report_url(&self.settings.base_url, &self.settings.paths)
            .map_err(|e| ErrorDescriptor::before_request(&e, &self.settings.base_url, method))?;

        let candidates = self
            .report_endpoint
            .prioritise(report_candidates(&report_url));
        let timeout = Duration::from_secs(self.settings.report_timeout_secs);
        let mut attempts = Vec::with_capacity(candidates.len());

        for candidate in &candidates {
            let pairs = report_query(request, candidate.encoding);
            match self.attempt(candidate, &pairs, timeout, true).await {
                Ok(value) => {
                    self.report_endpoint.remember(candidate);
                    return Ok((ReportPayload::new(value), candidate.clone()));
                }
                Err(trace) => {
                    self.report_endpoint.forget(candidate);
                    attempts.push(trace);
                }
            }
        }

        Err(ErrorDescriptor::from_attempts(
            "report request",
            attempts,
            None,
        ))
    }
}

/// Query pairs for a report call in the given array-key encoding.
///
/// Order: `source`, the period pairs, one id entry per entity, one
/// `data_output` entry per metric.
pub(super) fn report_query(
    request: &ReportRequest,
    encoding: ParamEncoding,
) -> Vec<(String, String)> {
    let data_key = encoding.array_key("data");
    let output_key = encoding.array_key("data_output");

    let mut pairs = vec![("source".to_owned(), request.source.as_str().to_owned())];
    pairs.extend(
        request
            .period
            .query_pairs()
            .into_iter()
            .map(|(k, v)| (k.to_owned(), v)),
    );
    pairs.extend(
        request
            .entity_ids()
            .iter()
            .map(|id| (data_key.clone(), id.to_string())),
    );
    pairs.extend(
        request
            .requested_metrics()
            .iter()
            .map(|m| (output_key.clone(), m.as_str().to_owned())),
    );
    pairs
}
