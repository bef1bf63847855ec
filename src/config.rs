use std::env;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("Invalid SUPABASE_URL format. Expected: https://PROJECT.supabase.co")]
    InvalidSupabaseUrl,
    #[error("PORT must be a number, got {0:?}")]
    InvalidPort(String),
}

/// Process configuration, read once at startup after `dotenv()`.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub redis_url: String,
    pub supabase_project_ref: String,
    pub supabase_anon_key: String,
    pub port: u16,
    pub media_root: String,
    /// SMS delivery is disabled when this is unset.
    pub brevo_api_key: Option<String>,
    pub sms_sender: String,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes `env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &'static str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or(ConfigError::Missing(key))
        };

        let supabase_url = required("SUPABASE_URL")?;
        let supabase_project_ref = project_ref(&supabase_url)?;

        let port = match lookup("PORT") {
            Some(raw) => raw.parse().map_err(|_| ConfigError::InvalidPort(raw))?,
            None => 8080,
        };

        Ok(Self {
            database_url: required("DATABASE_URL")?,
            redis_url: required("REDIS_URL")?,
            supabase_project_ref,
            supabase_anon_key: required("SUPABASE_ANON_KEY")?,
            port,
            media_root: lookup("MEDIA_ROOT").unwrap_or_else(|| "./media".to_string()),
            brevo_api_key: lookup("BREVO_API_KEY").filter(|v| !v.is_empty()),
            sms_sender: lookup("SMS_SENDER").unwrap_or_else(|| "OContest".to_string()),
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("0.0.0.0:{}", self.port)
    }
}

fn project_ref(supabase_url: &str) -> Result<String, ConfigError> {
    supabase_url
        .strip_prefix("https://")
        .and_then(|s| s.strip_suffix(".supabase.co"))
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(ConfigError::InvalidSupabaseUrl)
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
        move |key| map.get(key).cloned()
    }

    const BASE: &[(&str, &str)] = &[
        ("DATABASE_URL", "postgres://localhost/contests"),
        ("REDIS_URL", "redis://127.0.0.1/"),
        ("SUPABASE_URL", "https://abcd1234.supabase.co"),
        ("SUPABASE_ANON_KEY", "anon"),
    ];

    #[test]
    fn defaults_apply() {
        let cfg = AppConfig::from_lookup(lookup_from(BASE)).unwrap();
        assert_eq!(cfg.supabase_project_ref, "abcd1234");
        assert_eq!(cfg.port, 8080);
        assert_eq!(cfg.media_root, "./media");
        assert_eq!(cfg.sms_sender, "OContest");
        assert!(cfg.brevo_api_key.is_none());
        assert_eq!(cfg.bind_addr(), "0.0.0.0:8080");
    }

    #[test]
    fn missing_database_url_is_reported() {
        let pairs: Vec<_> = BASE
            .iter()
            .copied()
            .filter(|(k, _)| *k != "DATABASE_URL")
            .collect();
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::Missing("DATABASE_URL"));
    }

    #[test]
    fn rejects_non_supabase_url() {
        let mut pairs = BASE.to_vec();
        pairs[2] = ("SUPABASE_URL", "http://localhost:54321");
        let err = AppConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
        assert_eq!(err, ConfigError::InvalidSupabaseUrl);
    }

    #[test]
    fn parses_port_and_sms_settings() {
        let mut pairs = BASE.to_vec();
        pairs.push(("PORT", "9000"));
        pairs.push(("BREVO_API_KEY", "xkeysib-123"));
        let cfg = AppConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(cfg.port, 9000);
        assert_eq!(cfg.brevo_api_key.as_deref(), Some("xkeysib-123"));

        pairs.push(("PORT", "eighty"));
        let cfg = AppConfig::from_lookup(lookup_from(&pairs));
        assert!(cfg.is_err());
    }
}
