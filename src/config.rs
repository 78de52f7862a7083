use std::env;
use std::time::Duration;

use crate::catalog::DEFAULT_PAGE_SIZE;
use crate::logger::{LogFormat, LogLevel};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_IMAGE_MODEL: &str = "imagen-3.0-generate-002";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_STARTING_CREDITS: u32 = 25;
pub const DEFAULT_USER_EMAIL: &str = "user@example.com";

#[derive(Debug, Clone)]
pub struct GeminiConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for GeminiConfig {
    fn default() -> Self {
        GeminiConfig {
            api_key: None,
            model: DEFAULT_IMAGE_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        }
    }
}

impl GeminiConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let api_key = lookup("GEMINI_API_KEY")
            .or_else(|| lookup("API_KEY"))
            .filter(|key| !key.trim().is_empty());
        let model = lookup("GEMINI_IMAGE_MODEL").unwrap_or(defaults.model);
        let base_url = lookup("GEMINI_BASE_URL").unwrap_or(defaults.base_url);
        let timeout = lookup("GEMINI_TIMEOUT_SECS")
            .and_then(|s| s.parse().ok())
            .map(Duration::from_secs)
            .unwrap_or(defaults.timeout);

        GeminiConfig {
            api_key,
            model,
            base_url,
            timeout,
        }
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub starting_credits: u32,
    pub page_size: usize,
    pub user_email: String,
    pub log_level: LogLevel,
    pub log_format: LogFormat,
    pub log_file: Option<String>,
    pub log_colors: bool,
    pub gemini: GeminiConfig,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            starting_credits: DEFAULT_STARTING_CREDITS,
            page_size: DEFAULT_PAGE_SIZE,
            user_email: DEFAULT_USER_EMAIL.to_string(),
            log_level: LogLevel::Info,
            log_format: LogFormat::Pretty,
            log_file: None,
            log_colors: true,
            gemini: GeminiConfig::default(),
        }
    }
}

impl Config {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        let starting_credits = lookup("IMAGINA_STARTING_CREDITS")
            .and_then(|s| s.parse().ok())
            .unwrap_or(defaults.starting_credits);
        let page_size = lookup("IMAGINA_PAGE_SIZE")
            .and_then(|s| s.parse().ok())
            .filter(|size: &usize| *size > 0)
            .unwrap_or(defaults.page_size);
        let user_email = lookup("IMAGINA_USER_EMAIL").unwrap_or(defaults.user_email);
        let log_level = lookup("IMAGINA_LOG_LEVEL")
            .and_then(|s| LogLevel::parse(&s))
            .unwrap_or(defaults.log_level);
        let log_format = lookup("IMAGINA_LOG_FORMAT")
            .and_then(|s| LogFormat::parse(&s))
            .unwrap_or(defaults.log_format);
        let log_file = lookup("IMAGINA_LOG_FILE").filter(|path| !path.trim().is_empty());
        let log_colors = lookup("NO_COLOR").is_none()
            && lookup("IMAGINA_LOG_COLOR")
                .map(|s| !matches!(s.trim().to_ascii_lowercase().as_str(), "0" | "false" | "off"))
                .unwrap_or(defaults.log_colors);

        Config {
            starting_credits,
            page_size,
            user_email,
            log_level,
            log_format,
            log_file,
            log_colors,
            gemini: GeminiConfig::from_lookup(&lookup),
        }
    }

    pub fn with_starting_credits(mut self, credits: u32) -> Self {
        self.starting_credits = credits;
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn with_user_email(mut self, email: impl Into<String>) -> Self {
        self.user_email = email.into();
        self
    }

    pub fn with_gemini(mut self, config: GeminiConfig) -> Self {
        self.gemini = config;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&[]));
        assert_eq!(config.starting_credits, 25);
        assert_eq!(config.page_size, 12);
        assert_eq!(config.user_email, "user@example.com");
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.log_format, LogFormat::Pretty);
        assert!(config.log_file.is_none());
        assert!(config.log_colors);
        assert!(config.gemini.api_key.is_none());
        assert_eq!(config.gemini.model, DEFAULT_IMAGE_MODEL);
        assert_eq!(config.gemini.timeout, Duration::from_secs(60));
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("IMAGINA_STARTING_CREDITS", "100"),
            ("IMAGINA_PAGE_SIZE", "6"),
            ("IMAGINA_LOG_LEVEL", "debug"),
            ("API_KEY", "secret"),
            ("GEMINI_TIMEOUT_SECS", "5"),
            ("IMAGINA_LOG_FORMAT", "json"),
            ("IMAGINA_LOG_FILE", "imagina.log"),
            ("IMAGINA_LOG_COLOR", "off"),
        ]));
        assert_eq!(config.starting_credits, 100);
        assert_eq!(config.page_size, 6);
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.gemini.api_key.as_deref(), Some("secret"));
        assert_eq!(config.gemini.timeout, Duration::from_secs(5));
        assert_eq!(config.log_format, LogFormat::Json);
        assert_eq!(config.log_file.as_deref(), Some("imagina.log"));
        assert!(!config.log_colors);
    }

    #[test]
    fn test_no_color_disables_colors() {
        let config = Config::from_lookup(lookup_from(&[("NO_COLOR", "1")]));
        assert!(!config.log_colors);
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("IMAGINA_STARTING_CREDITS", "-3"),
            ("IMAGINA_PAGE_SIZE", "0"),
            ("GEMINI_API_KEY", "  "),
        ]));
        assert_eq!(config.starting_credits, 25);
        assert_eq!(config.page_size, 12);
        assert!(config.gemini.api_key.is_none());
    }

    #[test]
    fn test_builders() {
        let config = Config::new()
            .with_starting_credits(3)
            .with_page_size(0)
            .with_gemini(GeminiConfig::new().with_api_key("k").with_model("m"));
        assert_eq!(config.starting_credits, 3);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.gemini.model, "m");
    }
}
