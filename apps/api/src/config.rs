use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

const DEFAULT_SUMMARY_API_URL: &str =
    "https://5736955a-4256-49d5-8849-e7233097d0e9.us-east-1.cloud.genez.io/response";
const DEFAULT_SAVE_API_URL: &str =
    "https://exife5tk9h.execute-api.ap-south-1.amazonaws.com/prod/resume";

/// Application configuration loaded from environment variables.
/// Every variable has a default; malformed numbers fail startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub rust_log: String,
    pub summary_api_url: String,
    pub save_api_url: String,
    /// When `EXPORT_DIR` is set and non-empty, exports are also written there.
    pub export_dir: Option<PathBuf>,
    pub rasterizer_cmd: String,
    pub http_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let export_dir = var("EXPORT_DIR", "");
        let timeout_secs = var("HTTP_TIMEOUT_SECS", "30")
            .parse::<u64>()
            .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?;

        Ok(Config {
            port: var("PORT", "8080")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: var("RUST_LOG", "info"),
            summary_api_url: var("SUMMARY_API_URL", DEFAULT_SUMMARY_API_URL),
            save_api_url: var("SAVE_API_URL", DEFAULT_SAVE_API_URL),
            export_dir: (!export_dir.trim().is_empty()).then(|| PathBuf::from(export_dir)),
            rasterizer_cmd: var("RASTERIZER_CMD", "wkhtmltoimage"),
            http_timeout: Duration::from_secs(timeout_secs),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults_apply_when_unset() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.port, 8080);
        assert_eq!(config.rust_log, "info");
        assert_eq!(config.summary_api_url, DEFAULT_SUMMARY_API_URL);
        assert_eq!(config.save_api_url, DEFAULT_SAVE_API_URL);
        assert_eq!(config.export_dir, None);
        assert_eq!(config.rasterizer_cmd, "wkhtmltoimage");
        assert_eq!(config.http_timeout, Duration::from_secs(30));
    }

    #[test]
    fn test_overrides_apply() {
        let config = config_from(&[
            ("PORT", "9000"),
            ("EXPORT_DIR", "/var/lib/resumes"),
            ("RASTERIZER_CMD", "/opt/bin/wkhtmltoimage"),
            ("HTTP_TIMEOUT_SECS", "5"),
        ])
        .unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.export_dir, Some(PathBuf::from("/var/lib/resumes")));
        assert_eq!(config.rasterizer_cmd, "/opt/bin/wkhtmltoimage");
        assert_eq!(config.http_timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_blank_export_dir_disables_writing() {
        let config = config_from(&[("EXPORT_DIR", "   ")]).unwrap();
        assert_eq!(config.export_dir, None);
    }

    #[test]
    fn test_invalid_port_is_an_error() {
        let err = config_from(&[("PORT", "eighty")]).unwrap_err();
        assert!(err.to_string().contains("PORT"));
    }
}
