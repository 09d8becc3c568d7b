use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub env: Environment,
    pub log_level: String,
    pub data_dir: PathBuf,
    pub gemini_api_key: Option<String>,
    pub gemini_base_url: String,
    pub gemini_model: String,
    pub gemini_timeout_secs: u64,
    pub gemini_max_retries: u32,
    pub gemini_retry_backoff_base_ms: u64,
    pub scan_max_results: u32,
    pub scan_min_zoom: u8,
    pub scan_debounce_ms: u64,
    pub lod_min_zoom: u8,
    pub dedup_radius_meters: f64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("log_level", &self.log_level)
            .field("data_dir", &self.data_dir)
            .field(
                "gemini_api_key",
                &self.gemini_api_key.as_ref().map(|_| "[redacted]"),
            )
            .field("gemini_base_url", &self.gemini_base_url)
            .field("gemini_model", &self.gemini_model)
            .field("gemini_timeout_secs", &self.gemini_timeout_secs)
            .field("gemini_max_retries", &self.gemini_max_retries)
            .field(
                "gemini_retry_backoff_base_ms",
                &self.gemini_retry_backoff_base_ms,
            )
            .field("scan_max_results", &self.scan_max_results)
            .field("scan_min_zoom", &self.scan_min_zoom)
            .field("scan_debounce_ms", &self.scan_debounce_ms)
            .field("lod_min_zoom", &self.lod_min_zoom)
            .field("dedup_radius_meters", &self.dedup_radius_meters)
            .finish()
    }
}
