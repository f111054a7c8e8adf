//! Configuration management for byoa.
//!
//! Configuration can be set via environment variables (a `.env` file in the
//! working directory is loaded first):
//! - `ANTHROPIC_API_KEY` - Required. Your Anthropic API key.
//! - `ANTHROPIC_MODEL` - Optional. Model identifier. Defaults to `claude-sonnet-4-5`.
//! - `ANTHROPIC_BASE_URL` - Optional. API endpoint. Defaults to `https://api.anthropic.com`.
//! - `BYOA_MAX_TOKENS` - Optional. Response token limit. Defaults to `1024`.
//! - `BYOA_MAX_ITERATIONS` - Optional. Model requests per user turn. Defaults to `25`.
//! - `BYOA_SYSTEM_PROMPT` - Optional. System prompt sent with every request.
//! - `BYOA_WORKDIR` - Optional. Directory tools operate in. Defaults to current directory.

use std::path::PathBuf;
use std::str::FromStr;

use thiserror::Error;

use crate::llm::agent::DEFAULT_MAX_ITERATIONS;
use crate::llm::claude::DEFAULT_BASE_URL;
use crate::llm::core::config::GenerationConfig;

pub const DEFAULT_MAX_TOKENS: u32 = 1024;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),

    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

/// Agent configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Anthropic API key
    pub api_key: String,

    /// Model identifier
    pub model: String,

    /// Scheme and host of the Messages API
    pub base_url: String,

    pub max_tokens: u32,

    /// Model requests allowed per user turn
    pub max_iterations: usize,

    pub system_prompt: Option<String>,

    /// Directory relative tool paths resolve against
    pub workdir: PathBuf,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingEnvVar` if `ANTHROPIC_API_KEY` is not set.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let api_key = get("ANTHROPIC_API_KEY")
            .ok_or_else(|| ConfigError::MissingEnvVar("ANTHROPIC_API_KEY".to_string()))?;

        let model = get("ANTHROPIC_MODEL").unwrap_or_else(|| GenerationConfig::DEFAULT_MODEL.to_string());

        let base_url = get("ANTHROPIC_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let max_tokens = parse_var("BYOA_MAX_TOKENS", get("BYOA_MAX_TOKENS"), DEFAULT_MAX_TOKENS)?;
        if max_tokens == 0 {
            return Err(ConfigError::InvalidValue(
                "BYOA_MAX_TOKENS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let max_iterations = parse_var(
            "BYOA_MAX_ITERATIONS",
            get("BYOA_MAX_ITERATIONS"),
            DEFAULT_MAX_ITERATIONS,
        )?;
        if max_iterations == 0 {
            return Err(ConfigError::InvalidValue(
                "BYOA_MAX_ITERATIONS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let workdir = get("BYOA_WORKDIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        Ok(Self {
            api_key,
            model,
            base_url,
            max_tokens,
            max_iterations,
            system_prompt: get("BYOA_SYSTEM_PROMPT"),
            workdir,
        })
    }
}

fn parse_var<T>(key: &str, value: Option<String>, default: T) -> Result<T, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match value {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| ConfigError::InvalidValue(key.to_string(), format!("{}", e))),
        None => Ok(default),
    }
}
