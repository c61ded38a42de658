use std::{env, path::PathBuf, time::Duration};

const DEFAULT_PORT: u16 = 8080;
const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com";
const DEFAULT_ADVICE_TIMEOUT_SECS: u64 = 30;

/// Runtime settings, read from the environment once at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub data_dir: PathBuf,
    pub port: u16,
    pub advice: AdviceConfig,
}

#[derive(Debug, Clone)]
pub struct AdviceConfig {
    /// Without a key every advice call takes the fallback path.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for AdviceConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(DEFAULT_ADVICE_TIMEOUT_SECS),
        }
    }
}

impl Settings {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AdviceConfig::default();
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());

        Self {
            data_dir: non_empty("APP_DATA_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("data")),
            port: non_empty("PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_PORT),
            advice: AdviceConfig {
                api_key: non_empty("GEMINI_API_KEY"),
                model: non_empty("GEMINI_MODEL").unwrap_or(defaults.model),
                base_url: non_empty("GEMINI_BASE_URL").unwrap_or(defaults.base_url),
                timeout: non_empty("ADVICE_TIMEOUT_SECS")
                    .and_then(|value| value.parse::<u64>().ok())
                    .map(Duration::from_secs)
                    .unwrap_or(defaults.timeout),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Settings {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let settings = settings(&[]);
        assert_eq!(settings.data_dir, PathBuf::from("data"));
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.advice.api_key, None);
        assert_eq!(settings.advice.model, DEFAULT_MODEL);
    }

    #[test]
    fn environment_overrides_are_read() {
        let settings = settings(&[
            ("APP_DATA_DIR", "/tmp/vitali"),
            ("PORT", "9000"),
            ("GEMINI_API_KEY", "k"),
            ("ADVICE_TIMEOUT_SECS", "5"),
        ]);
        assert_eq!(settings.data_dir, PathBuf::from("/tmp/vitali"));
        assert_eq!(settings.port, 9000);
        assert_eq!(settings.advice.api_key.as_deref(), Some("k"));
        assert_eq!(settings.advice.timeout, Duration::from_secs(5));
    }

    #[test]
    fn blank_or_invalid_values_fall_back() {
        let settings = settings(&[("PORT", "not-a-port"), ("GEMINI_API_KEY", "  ")]);
        assert_eq!(settings.port, 8080);
        assert_eq!(settings.advice.api_key, None);
    }
}
