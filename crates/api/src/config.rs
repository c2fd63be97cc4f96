use sharptrack_core::aggregation::DEFAULT_TREND_MONTHS;
use sharptrack_core::schedule::DEFAULT_SERVICE_INTERVAL_DAYS;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// Days between services when predicting due dates (default: `30`).
    pub service_interval_days: i64,
    /// Trailing calendar months in the dashboard trend (default: `6`).
    pub trend_months: u32,
    /// Bulk-read ceiling for sample-based aggregation (default: `1000`).
    pub sample_ceiling: usize,
    /// Freshness window of the dashboard aggregate cache (default: `300`).
    pub dashboard_cache_ttl_secs: u64,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                    | Default                 |
    /// |----------------------------|-------------------------|
    /// | `HOST`                     | `0.0.0.0`               |
    /// | `PORT`                     | `3000`                  |
    /// | `CORS_ORIGINS`             | `http://localhost:5173` |
    /// | `REQUEST_TIMEOUT_SECS`     | `30`                    |
    /// | `SERVICE_INTERVAL_DAYS`    | `30`                    |
    /// | `TREND_MONTHS`             | `6`                     |
    /// | `SAMPLE_CEILING`           | `1000`                  |
    /// | `DASHBOARD_CACHE_TTL_SECS` | `300`                   |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:5173".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let service_interval_days: i64 = std::env::var("SERVICE_INTERVAL_DAYS")
            .unwrap_or_else(|_| DEFAULT_SERVICE_INTERVAL_DAYS.to_string())
            .parse()
            .expect("SERVICE_INTERVAL_DAYS must be a valid i64");

        let trend_months: u32 = std::env::var("TREND_MONTHS")
            .unwrap_or_else(|_| DEFAULT_TREND_MONTHS.to_string())
            .parse()
            .expect("TREND_MONTHS must be a valid u32");

        let sample_ceiling: usize = std::env::var("SAMPLE_CEILING")
            .unwrap_or_else(|_| "1000".into())
            .parse()
            .expect("SAMPLE_CEILING must be a valid usize");

        let dashboard_cache_ttl_secs: u64 = std::env::var("DASHBOARD_CACHE_TTL_SECS")
            .unwrap_or_else(|_| "300".into())
            .parse()
            .expect("DASHBOARD_CACHE_TTL_SECS must be a valid u64");

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            service_interval_days,
            trend_months,
            sample_ceiling,
            dashboard_cache_ttl_secs,
        }
    }
}
