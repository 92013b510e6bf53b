//! Live-occupancy endpoint (`live-inside`).

use std::time::Duration;

use pfmx_core::{CoreError, Source};

use super::ReportClient;
use crate::endpoint::{
    live_endpoint_candidates, resolve_live_candidates, EndpointCandidate, HttpMethod,
};
use crate::error::ErrorDescriptor;
use crate::payload::ReportPayload;

/// Status reported when no live candidate answered at all.
pub const NO_REACHABLE_ENDPOINT: u16 = 404;

impl ReportClient {
    /// Fetches live occupancy for `entity_ids`.
    ///
    /// Walks the resolved live URLs in priority order, trying POST then GET
    /// on each with `source` and repeated `data` query parameters. The first
    /// 2xx JSON response wins.
    ///
    /// # Errors
    ///
    /// Returns an [`ErrorDescriptor`] with status
    /// [`NO_REACHABLE_ENDPOINT`] and a message listing every
    /// `(method, url, status)` tried when no candidate answered, or a
    /// descriptor without status when `entity_ids` is empty or the URLs
    /// cannot be resolved.
    pub async fn fetch_live_occupancy(
        &self,
        entity_ids: &[i64],
        source: Source,
    ) -> Result<ReportPayload, ErrorDescriptor> {
        self.fetch_live_occupancy_with_endpoint(entity_ids, source)
            .await
            .map(|(payload, _)| payload)
    }

    /// [`fetch_live_occupancy`](Self::fetch_live_occupancy), also returning
    /// the candidate that answered whether or not negotiation caching is on.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_live_occupancy`](Self::fetch_live_occupancy).
    pub async fn fetch_live_occupancy_with_endpoint(
        &self,
        entity_ids: &[i64],
        source: Source,
    ) -> Result<(ReportPayload, EndpointCandidate), ErrorDescriptor> {
        let post = HttpMethod::Post.as_str();
        if entity_ids.is_empty() {
            return Err(ErrorDescriptor::before_request(
                &CoreError::EmptyEntityIds,
                &self.settings.base_url,
                post,
            ));
        }

        let urls = resolve_live_candidates(
            &self.settings.base_url,
            self.settings.live_url.as_deref(),
            &self.settings.paths,
        )
        .map_err(|e| ErrorDescriptor::before_request(&e, &self.settings.base_url, post))?;

        let candidates = self
            .live_endpoint
            .prioritise(live_endpoint_candidates(&urls));
        let timeout = Duration::from_secs(self.settings.live_timeout_secs);
        let mut attempts = Vec::with_capacity(candidates.len());

        let mut pairs = vec![("source".to_owned(), source.as_str().to_owned())];
        for candidate in &candidates {
            pairs.truncate(1);
            let data_key = candidate.encoding.array_key("data");
            pairs.extend(entity_ids.iter().map(|id| (data_key.clone(), id.to_string())));

            match self.attempt(candidate, &pairs, timeout, false).await {
                Ok(value) => {
                    self.live_endpoint.remember(candidate);
                    return Ok((ReportPayload::new(value), candidate.clone()));
                }
                Err(trace) => {
                    self.live_endpoint.forget(candidate);
                    attempts.push(trace);
                }
            }
        }

        Err(ErrorDescriptor::from_attempts(
            "live occupancy request",
            attempts,
            Some(NO_REACHABLE_ENDPOINT),
        ))
    }
}
