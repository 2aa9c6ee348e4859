//! Runtime configuration, read once from the environment at startup.

#[derive(Clone, Debug)]
pub struct Config {
    /// Base URL of the catalog API, e.g. "http://localhost:8080".
    pub api_base: String,
    /// Path of the full-snapshot resource under `api_base`.
    pub data_path: String,
    /// Seconds between periodic snapshot refreshes.
    pub refresh_secs: u64,
    /// Scheme for synthesized per-resource event URLs.
    pub event_scheme: String,
    /// Well-known messaging port for synthesized event URLs.
    pub event_port: u16,
    /// Initial page path when none is given on the command line.
    pub page_path: String,
    /// Keep re-rendering on every refresh instead of exiting after the first.
    pub watch: bool,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base: std::env::var("API_BASE")
                .unwrap_or_else(|_| "http://localhost:8080".to_string()),
            data_path: std::env::var("DATA_PATH").unwrap_or_else(|_| "/api/data".to_string()),
            refresh_secs: std::env::var("REFRESH_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(30),
            event_scheme: std::env::var("EVENT_SCHEME").unwrap_or_else(|_| "amqp".to_string()),
            event_port: std::env::var("EVENT_PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(5672),
            page_path: std::env::var("PAGE_PATH").unwrap_or_else(|_| "/".to_string()),
            watch: std::env::var("WATCH")
                .map(|v| matches!(v.to_lowercase().as_str(), "1" | "true" | "yes"))
                .unwrap_or(false),
        }
    }

    /// Full URL of the snapshot resource.
    pub fn data_url(&self) -> String {
        format!(
            "{}/{}",
            self.api_base.trim_end_matches('/'),
            self.data_path.trim_start_matches('/')
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_url_joins_without_double_slash() {
        let mut cfg = Config::from_env();
        cfg.api_base = "http://example.net:8080/".to_string();
        cfg.data_path = "/api/data".to_string();
        assert_eq!(cfg.data_url(), "http://example.net:8080/api/data");
    }
}
