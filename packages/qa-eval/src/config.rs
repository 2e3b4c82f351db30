//! Dataset store configuration.

use dotenvy::dotenv;
use std::env;

use qa_agent::{ConfigError, SecretString};

pub const DEFAULT_LANGFUSE_HOST: &str = "https://cloud.langfuse.com";

/// Credentials for the Langfuse dataset API.
#[derive(Debug, Clone)]
pub struct LangfuseConfig {
    pub public_key: SecretString,
    pub secret_key: SecretString,
    pub host: String,
}

impl LangfuseConfig {
    /// Load from `LANGFUSE_PUBLIC_KEY`, `LANGFUSE_SECRET_KEY` and `LANGFUSE_HOST`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let _ = dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |name: &'static str| {
            lookup(name)
                .filter(|v| !v.is_empty())
                .map(SecretString::new)
                .ok_or(ConfigError::Missing(name))
        };

        Ok(Self {
            public_key: required("LANGFUSE_PUBLIC_KEY")?,
            secret_key: required("LANGFUSE_SECRET_KEY")?,
            host: lookup("LANGFUSE_HOST")
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| DEFAULT_LANGFUSE_HOST.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_host_defaults_to_cloud() {
        let config = LangfuseConfig::from_lookup(|name| match name {
            "LANGFUSE_PUBLIC_KEY" => Some("pk-lf-test".into()),
            "LANGFUSE_SECRET_KEY" => Some("sk-lf-test".into()),
            _ => None,
        })
        .unwrap();

        assert_eq!(config.host, "https://cloud.langfuse.com");
        assert_eq!(config.public_key.expose(), "pk-lf-test");
        assert!(!format!("{:?}", config).contains("sk-lf-test"));
    }

    #[test]
    fn test_missing_secret_key() {
        let err = LangfuseConfig::from_lookup(|name| {
            (name == "LANGFUSE_PUBLIC_KEY").then(|| "pk-lf-test".to_string())
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "LANGFUSE_SECRET_KEY must be set");
    }
}
