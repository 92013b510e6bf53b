//! HTTP client for the upstream report and live-occupancy endpoints.

mod live;
mod negotiation;
mod report;

use std::time::Duration;

use reqwest::{Client, Url};
use serde_json::Value;

use pfmx_core::AppConfig;

use crate::endpoint::{
    resolve_live_candidates, resolve_report_url, EndpointCandidate, EndpointPaths, HttpMethod,
};
use crate::error::{AttemptTrace, ReportError};
use negotiation::Negotiated;

pub use live::NO_REACHABLE_ENDPOINT;

/// Longest slice of an error body kept in an attempt trace.
const MAX_ERROR_BODY_CHARS: usize = 200;

/// Everything the client needs to know about the upstream deployment.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub live_url: Option<String>,
    pub report_timeout_secs: u64,
    pub live_timeout_secs: u64,
    pub user_agent: String,
    pub cache_negotiation: bool,
    pub paths: EndpointPaths,
}

impl ClientSettings {
    /// Settings with default timeouts, user agent and paths.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            live_url: None,
            report_timeout_secs: 30,
            live_timeout_secs: 15,
            user_agent: "pfmx/0.1 (retail-kpi)".to_owned(),
            cache_negotiation: true,
            paths: EndpointPaths::default(),
        }
    }

    #[must_use]
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            base_url: config.api_url.clone(),
            live_url: config.live_url.clone(),
            report_timeout_secs: config.report_timeout_secs,
            live_timeout_secs: config.live_timeout_secs,
            user_agent: config.user_agent.clone(),
            cache_negotiation: config.cache_negotiation,
            paths: EndpointPaths::default(),
        }
    }
}

/// Client for the periodic report and the live-occupancy feed.
///
/// Calls are made one at a time by the caller; the only state kept between
/// calls is the endpoint variant that last answered for each feed (see
/// [`ClientSettings::cache_negotiation`]).
pub struct ReportClient {
    client: Client,
    settings: ClientSettings,
    report_endpoint: Negotiated,
    live_endpoint: Negotiated,
}

impl ReportClient {
    /// Validates `settings` and builds the HTTP client.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Config`] if the base URL has no scheme or host.
    /// - [`ReportError::Http`] if the underlying `reqwest::Client` cannot be
    ///   constructed.
    pub fn new(settings: ClientSettings) -> Result<Self, ReportError> {
        resolve_report_url(&settings.base_url, &settings.paths)?;
        resolve_live_candidates(
            &settings.base_url,
            settings.live_url.as_deref(),
            &settings.paths,
        )?;

        let client = Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .user_agent(settings.user_agent.as_str())
            .build()?;

        Ok(Self {
            client,
            report_endpoint: Negotiated::new("report", settings.cache_negotiation),
            live_endpoint: Negotiated::new("live", settings.cache_negotiation),
            settings,
        })
    }

    /// # Errors
    ///
    /// See [`ReportClient::new`].
    pub fn from_app_config(config: &AppConfig) -> Result<Self, ReportError> {
        Self::new(ClientSettings::from_app_config(config))
    }

    #[must_use]
    pub fn settings(&self) -> &ClientSettings {
        &self.settings
    }

    /// The report endpoint variant that answered last, if cached.
    #[must_use]
    pub fn negotiated_report_endpoint(&self) -> Option<EndpointCandidate> {
        self.report_endpoint.current()
    }

    /// The live endpoint variant that answered last, if cached.
    #[must_use]
    pub fn negotiated_live_endpoint(&self) -> Option<EndpointCandidate> {
        self.live_endpoint.current()
    }

    /// Runs one candidate and folds any failure into an [`AttemptTrace`].
    async fn attempt(
        &self,
        candidate: &EndpointCandidate,
        pairs: &[(String, String)],
        timeout: Duration,
        require_data: bool,
    ) -> Result<Value, AttemptTrace> {
        let method = candidate.method.as_str();
        let url = candidate.request_url(pairs).map_err(|e| AttemptTrace {
            method: method.to_owned(),
            url: candidate.url.clone(),
            status: None,
            error: Some(e.to_string()),
        })?;

        tracing::debug!(method, url = %url, "calling upstream");
        self.execute(candidate.method, &url, timeout, require_data)
            .await
            .map_err(|err| {
                tracing::warn!(
                    method,
                    url = %url,
                    status = ?err.status(),
                    error = %err,
                    "upstream attempt failed"
                );
                let error = match &err {
                    ReportError::UnexpectedStatus { body, .. } if !body.is_empty() => {
                        format!("{err}: {body}")
                    }
                    _ => err.to_string(),
                };
                AttemptTrace {
                    method: method.to_owned(),
                    url: url.to_string(),
                    status: err.status(),
                    error: Some(error),
                }
            })
    }

    /// Sends the request and parses a 2xx JSON body.
    ///
    /// # Errors
    ///
    /// - [`ReportError::Http`] on network failure or timeout.
    /// - [`ReportError::UnexpectedStatus`] on any non-2xx status.
    /// - [`ReportError::Deserialize`] if the body is not JSON.
    /// - [`ReportError::MissingData`] if `require_data` is set and the body
    ///   is not an object with a `data` member.
    async fn execute(
        &self,
        method: HttpMethod,
        url: &Url,
        timeout: Duration,
        require_data: bool,
    ) -> Result<Value, ReportError> {
        let response = self
            .client
            .request(method.into(), url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .timeout(timeout)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ReportError::UnexpectedStatus {
                status: status.as_u16(),
                url: url.to_string(),
                body: body.chars().take(MAX_ERROR_BODY_CHARS).collect(),
            });
        }

        let body = response.text().await?;
        let value: Value =
            serde_json::from_str(&body).map_err(|e| ReportError::Deserialize {
                context: url.to_string(),
                source: e,
            })?;

        if require_data && !(value.is_object() && value.get("data").is_some()) {
            return Err(ReportError::MissingData {
                url: url.to_string(),
            });
        }
        Ok(value)
    }
}

#[cfg(test)]
#[path = "../client_test.rs"]
mod tests;
