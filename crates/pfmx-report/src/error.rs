use serde::{Deserialize, Serialize};
use thiserror::Error;

use pfmx_core::ConfigError;

/// Failure of a single upstream attempt. Internal to the client; the public
/// fetch methods fold these into an [`ErrorDescriptor`].
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Network, DNS, TLS or timeout failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status} from {url}")]
    UnexpectedStatus {
        status: u16,
        url: String,
        body: String,
    },

    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("response from {url} has no `data` object")]
    MissingData { url: String },
}

impl ReportError {
    /// HTTP status observed for this failure, if the server answered at all.
    #[must_use]
    pub fn status(&self) -> Option<u16> {
        match self {
            ReportError::UnexpectedStatus { status, .. } => Some(*status),
            ReportError::Http(e) => e.status().map(|s| s.as_u16()),
            ReportError::Config(_)
            | ReportError::Deserialize { .. }
            | ReportError::MissingData { .. } => None,
        }
    }
}

/// One `(method, url, status)` probe recorded while resolving an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttemptTrace {
    pub method: String,
    pub url: String,
    pub status: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl std::fmt::Display for AttemptTrace {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {} -> ", self.method, self.url)?;
        match (self.status, &self.error) {
            (Some(status), _) => write!(f, "{status}"),
            (None, Some(err)) => write!(f, "{err}"),
            (None, None) => write!(f, "no response"),
        }
    }
}

/// Failure value handed to callers in place of a payload.
///
/// Serializes with `is_error: true` so a UI layer holding raw JSON can tell
/// it apart from a report body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorDescriptor {
    pub is_error: bool,
    pub status_code: Option<u16>,
    pub message: String,
    pub attempted_url: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub attempts: Vec<AttemptTrace>,
}

impl ErrorDescriptor {
    /// Descriptor for a problem detected before any request was sent, such
    /// as an unusable base URL or an empty id list.
    #[must_use]
    pub fn before_request(err: &dyn std::fmt::Display, attempted_url: &str, method: &str) -> Self {
        Self {
            is_error: true,
            status_code: None,
            message: err.to_string(),
            attempted_url: attempted_url.to_owned(),
            method: method.to_owned(),
            attempts: Vec::new(),
        }
    }

    /// Descriptor summarising every failed attempt of one call.
    ///
    /// `status_code` is `sentinel` when given, otherwise the status of the
    /// last attempt. `attempted_url`/`method` describe the last attempt.
    #[must_use]
    pub fn from_attempts(what: &str, attempts: Vec<AttemptTrace>, sentinel: Option<u16>) -> Self {
        let last = attempts.last();
        let attempted_url = last.map(|a| a.url.clone()).unwrap_or_default();
        let method = last.map(|a| a.method.clone()).unwrap_or_default();
        let status_code = sentinel.or_else(|| last.and_then(|a| a.status));
        let listed = attempts
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        let message = if attempts.is_empty() {
            format!("{what} failed: no endpoint candidates to try")
        } else {
            format!(
                "{what} failed after {} attempt(s): {listed}",
                attempts.len()
            )
        };
        Self {
            is_error: true,
            status_code,
            message,
            attempted_url,
            method,
            attempts,
        }
    }
}

impl std::fmt::Display for ErrorDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status_code {
            Some(status) => write!(f, "[{status}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

impl std::error::Error for ErrorDescriptor {}
