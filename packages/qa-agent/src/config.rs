//! Configuration loaded from environment variables.

use dotenvy::dotenv;
use std::env;

use crate::error::ConfigError;
use crate::security::SecretString;

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f32 = 0.3;

/// Credentials and model settings for the pipeline's two services.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    pub openai_api_key: SecretString,
    pub tavily_api_key: SecretString,
    pub model: String,
    pub temperature: f32,
}

impl AgentConfig {
    /// Load configuration from environment variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        let _ = dotenv();
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
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

        let temperature = match lookup("MODEL_TEMPERATURE") {
            Some(raw) => raw.trim().parse::<f32>().map_err(|e| ConfigError::Invalid {
                var: "MODEL_TEMPERATURE",
                reason: e.to_string(),
            })?,
            None => DEFAULT_TEMPERATURE,
        };

        Ok(Self {
            openai_api_key: required("OPENAI_API_KEY")?,
            tavily_api_key: required("TAVILY_API_KEY")?,
            model: lookup("OPENAI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            temperature,
        })
    }
}

/// Names from `vars` that are unset or empty in the environment.
pub fn missing_vars(vars: &[&str]) -> Vec<String> {
    let _ = dotenv();
    vars.iter()
        .filter(|name| env::var(name).map(|v| v.is_empty()).unwrap_or(true))
        .map(|name| name.to_string())
        .collect()
}
