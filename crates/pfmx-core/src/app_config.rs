/// Process configuration for the report core, read once at startup.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub log_level: String,
    /// Base URL of the reporting API. May or may not already end in `/get-report`.
    pub api_url: String,
    /// Optional override for the live-occupancy endpoint, absolute or relative.
    pub live_url: Option<String>,
    pub report_timeout_secs: u64,
    pub live_timeout_secs: u64,
    pub user_agent: String,
    /// Remember the first endpoint variant that answered and try it first next time.
    pub cache_negotiation: bool,
}
