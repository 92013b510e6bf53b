//! Endpoint resolution for the report and live-occupancy feeds.
//!
//! Deployments differ: some serve both feeds under one proxy prefix, some at
//! the bare host root, and older API versions name the live path
//! `/report/live-inside`. Everything here is pure string derivation over the
//! configured base URL; the candidates are probed in order by the client.

use reqwest::Url;

use pfmx_core::ConfigError;

/// Path suffixes used to build endpoint URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointPaths {
    /// Suffix of the periodic report endpoint.
    pub report: String,
    /// Live-occupancy suffixes in priority order. The first one is the
    /// current name; the rest are legacy aliases only tried at the host root.
    pub live: Vec<String>,
}

impl Default for EndpointPaths {
    fn default() -> Self {
        Self {
            report: "/get-report".to_owned(),
            live: vec!["/live-inside".to_owned(), "/report/live-inside".to_owned()],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(m: HttpMethod) -> Self {
        match m {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
        }
    }
}

/// How array-valued query keys are spelled on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamEncoding {
    /// `data=1&data=2`
    Plain,
    /// `data[]=1&data[]=2`
    Bracketed,
}

impl ParamEncoding {
    /// Spells an array key in this encoding.
    #[must_use]
    pub fn array_key(self, key: &str) -> String {
        match self {
            ParamEncoding::Plain => key.to_owned(),
            ParamEncoding::Bracketed => format!("{key}[]"),
        }
    }
}

/// One concrete way of calling an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EndpointCandidate {
    pub url: String,
    pub method: HttpMethod,
    pub encoding: ParamEncoding,
}

impl EndpointCandidate {
    /// Full request URL with `pairs` appended as the query string.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidUrl`] if the candidate URL does not parse.
    pub fn request_url(&self, pairs: &[(String, String)]) -> Result<Url, ConfigError> {
        Url::parse_with_params(&self.url, pairs).map_err(|e| ConfigError::InvalidUrl {
            url: self.url.clone(),
            reason: e.to_string(),
        })
    }
}

/// Extracts `scheme://host[:port]` from `base`.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] when `base` has no scheme or host.
pub fn origin_root(base: &str) -> Result<String, ConfigError> {
    let url = parse_base(base)?;
    let host = url
        .host_str()
        .filter(|h| !h.is_empty())
        .ok_or_else(|| ConfigError::InvalidUrl {
            url: base.to_owned(),
            reason: "missing host".to_owned(),
        })?;
    Ok(match url.port() {
        Some(port) => format!("{}://{host}:{port}", url.scheme()),
        None => format!("{}://{host}", url.scheme()),
    })
}

/// Resolves the periodic report URL.
///
/// A base that already ends in the report suffix is returned as configured
/// (minus any trailing slash); anything else gets the suffix appended to its
/// scheme+host root, so the suffix is never doubled.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] when `base` has no scheme or host.
pub fn resolve_report_url(base: &str, paths: &EndpointPaths) -> Result<String, ConfigError> {
    let root = origin_root(base)?;
    let trimmed = base.trim().trim_end_matches('/');
    let path = base_path(base)?;
    if path.ends_with(paths.report.trim_end_matches('/')) {
        return Ok(trimmed.to_owned());
    }
    Ok(format!("{root}{}", paths.report))
}

/// Ordered, de-duplicated live-occupancy URLs to probe.
///
/// Priority: absolute override, relative override joined to the root, the
/// base's own prefix with the report suffix swapped for the live suffix, the
/// root with the live suffix, then the root with each legacy live suffix.
///
/// # Errors
///
/// Returns [`ConfigError::InvalidUrl`] when `base` has no scheme or host.
pub fn resolve_live_candidates(
    base: &str,
    live_override: Option<&str>,
    paths: &EndpointPaths,
) -> Result<Vec<String>, ConfigError> {
    let root = origin_root(base)?;
    let path = base_path(base)?;
    let mut out: Vec<String> = Vec::new();
    let mut push = |url: String| {
        if !out.contains(&url) {
            out.push(url);
        }
    };

    if let Some(ov) = live_override.map(str::trim).filter(|s| !s.is_empty()) {
        if has_scheme(ov) {
            push(ov.to_owned());
        } else {
            push(format!("{root}/{}", ov.trim_start_matches('/')));
        }
    }

    let report_suffix = paths.report.trim_end_matches('/');
    let prefix = path.strip_suffix(report_suffix).unwrap_or(path.as_str());

    if let Some((primary, legacy)) = paths.live.split_first() {
        push(format!("{root}{prefix}{primary}"));
        push(format!("{root}{primary}"));
        for alt in legacy {
            push(format!("{root}{alt}"));
        }
    }

    Ok(out)
}

/// Report endpoint variants: bracketed keys first, then plain keys, same URL.
#[must_use]
pub fn report_candidates(report_url: &str) -> Vec<EndpointCandidate> {
    [ParamEncoding::Bracketed, ParamEncoding::Plain]
        .into_iter()
        .map(|encoding| EndpointCandidate {
            url: report_url.to_owned(),
            method: HttpMethod::Get,
            encoding,
        })
        .collect()
}

/// Live endpoint variants: every URL is tried with POST, then GET.
#[must_use]
pub fn live_endpoint_candidates(urls: &[String]) -> Vec<EndpointCandidate> {
    urls.iter()
        .flat_map(|url| {
            [HttpMethod::Post, HttpMethod::Get]
                .into_iter()
                .map(move |method| EndpointCandidate {
                    url: url.clone(),
                    method,
                    encoding: ParamEncoding::Plain,
                })
        })
        .collect()
}

fn has_scheme(s: &str) -> bool {
    s.contains("://") && Url::parse(s).is_ok()
}

fn parse_base(base: &str) -> Result<Url, ConfigError> {
    let trimmed = base.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::InvalidUrl {
            url: base.to_owned(),
            reason: "empty base URL".to_owned(),
        });
    }
    Url::parse(trimmed).map_err(|e| ConfigError::InvalidUrl {
        url: base.to_owned(),
        reason: e.to_string(),
    })
}

/// Path of `base` without a trailing slash (`""` for a bare host).
fn base_path(base: &str) -> Result<String, ConfigError> {
    let url = parse_base(base)?;
    Ok(url.path().trim_end_matches('/').to_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn paths() -> EndpointPaths {
        EndpointPaths::default()
    }

    #[test]
    fn origin_root_keeps_port() {
        assert_eq!(
            origin_root("http://127.0.0.1:8080/proxy/get-report").unwrap(),
            "http://127.0.0.1:8080"
        );
    }

    #[test]
    fn origin_root_rejects_missing_scheme() {
        assert!(matches!(
            origin_root("host/get-report"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn origin_root_rejects_missing_host() {
        assert!(matches!(
            origin_root("mailto:ops@example.com"),
            Err(ConfigError::InvalidUrl { .. })
        ));
    }

    #[test]
    fn origin_root_rejects_empty() {
        assert!(origin_root("  ").is_err());
    }

    #[test]
    fn report_url_is_unchanged_when_suffix_present() {
        assert_eq!(
            resolve_report_url("https://host/get-report", &paths()).unwrap(),
            "https://host/get-report"
        );
        assert_eq!(
            resolve_report_url("https://host/get-report/", &paths()).unwrap(),
            "https://host/get-report"
        );
    }

    #[test]
    fn report_url_keeps_proxy_prefix_when_suffix_present() {
        assert_eq!(
            resolve_report_url("https://host/vemcount/get-report", &paths()).unwrap(),
            "https://host/vemcount/get-report"
        );
    }

    #[test]
    fn report_url_appends_suffix_to_root() {
        assert_eq!(
            resolve_report_url("https://host", &paths()).unwrap(),
            "https://host/get-report"
        );
        assert_eq!(
            resolve_report_url("https://host/some/other/", &paths()).unwrap(),
            "https://host/get-report"
        );
    }

    #[test]
    fn report_url_fails_without_host() {
        assert!(resolve_report_url("not a url", &paths()).is_err());
    }

    #[test]
    fn live_candidates_for_report_base_start_at_host_root() {
        let c = resolve_live_candidates("https://host/get-report", None, &paths()).unwrap();
        assert_eq!(
            c,
            vec![
                "https://host/live-inside".to_owned(),
                "https://host/report/live-inside".to_owned(),
            ]
        );
        assert!(c.iter().all(|u| !u.contains("/get-report")));
    }

    #[test]
    fn live_candidates_keep_proxy_prefix_first() {
        let c = resolve_live_candidates("https://host/proxy/get-report", None, &paths()).unwrap();
        assert_eq!(
            c,
            vec![
                "https://host/proxy/live-inside".to_owned(),
                "https://host/live-inside".to_owned(),
                "https://host/report/live-inside".to_owned(),
            ]
        );
    }

    #[test]
    fn live_candidates_absolute_override_first() {
        let c = resolve_live_candidates(
            "https://host/get-report",
            Some("https://live.example.com/v2/inside"),
            &paths(),
        )
        .unwrap();
        assert_eq!(c[0], "https://live.example.com/v2/inside");
        assert_eq!(c.len(), 3);
    }

    #[test]
    fn live_candidates_relative_override_joined_to_root() {
        let c = resolve_live_candidates(
            "https://host/proxy/get-report",
            Some("report/live-inside"),
            &paths(),
        )
        .unwrap();
        assert_eq!(c[0], "https://host/report/live-inside");
        // the legacy candidate equals the override and is not repeated
        assert_eq!(
            c.iter()
                .filter(|u| *u == "https://host/report/live-inside")
                .count(),
            1
        );
    }

    #[test]
    fn live_candidates_ignore_blank_override() {
        let with_blank = resolve_live_candidates("https://host", Some("  "), &paths()).unwrap();
        let without = resolve_live_candidates("https://host", None, &paths()).unwrap();
        assert_eq!(with_blank, without);
    }

    #[test]
    fn live_candidates_have_no_duplicates() {
        let c = resolve_live_candidates(
            "https://host/",
            Some("https://host/live-inside"),
            &paths(),
        )
        .unwrap();
        let mut sorted = c.clone();
        sorted.sort();
        sorted.dedup();
        assert_eq!(sorted.len(), c.len());
    }

    #[test]
    fn live_candidates_fail_on_bad_base() {
        assert!(resolve_live_candidates("host-only", None, &paths()).is_err());
    }

    #[test]
    fn report_candidates_try_bracketed_first() {
        let c = report_candidates("https://host/get-report");
        assert_eq!(c.len(), 2);
        assert_eq!(c[0].encoding, ParamEncoding::Bracketed);
        assert_eq!(c[1].encoding, ParamEncoding::Plain);
        assert!(c.iter().all(|e| e.method == HttpMethod::Get));
    }

    #[test]
    fn live_endpoint_candidates_post_then_get() {
        let urls = vec!["https://a/live-inside".to_owned(), "https://b/live-inside".to_owned()];
        let c = live_endpoint_candidates(&urls);
        let order: Vec<_> = c.iter().map(|e| (e.url.as_str(), e.method)).collect();
        assert_eq!(
            order,
            vec![
                ("https://a/live-inside", HttpMethod::Post),
                ("https://a/live-inside", HttpMethod::Get),
                ("https://b/live-inside", HttpMethod::Post),
                ("https://b/live-inside", HttpMethod::Get),
            ]
        );
    }

    #[test]
    fn array_key_spelling() {
        assert_eq!(ParamEncoding::Plain.array_key("data"), "data");
        assert_eq!(ParamEncoding::Bracketed.array_key("data_output"), "data_output[]");
    }

    #[test]
    fn request_url_appends_query() {
        let candidate = EndpointCandidate {
            url: "https://host/get-report".to_owned(),
            method: HttpMethod::Get,
            encoding: ParamEncoding::Plain,
        };
        let url = candidate
            .request_url(&[
                ("source".to_owned(), "shops".to_owned()),
                ("data".to_owned(), "1".to_owned()),
                ("data".to_owned(), "2".to_owned()),
            ])
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://host/get-report?source=shops&data=1&data=2"
        );
    }
}
