use crate::error::{Error, Result};
use crate::services::job_service::PollSettings;
use crate::services::replicate_service::{GenerationParams, ReplicateSettings};
use crate::utils::validation::ValidationMode;
use dotenvy::dotenv;
use std::env;
use std::sync::OnceLock;
use std::time::Duration;

pub const DEFAULT_API_BASE: &str = "https://api.replicate.com/v1";
pub const DEFAULT_MODEL: &str = "ibm-granite/granite-3.3-8b-instruct";

#[derive(Debug, Clone)]
pub struct Config {
    pub server_address: String,
    pub replicate_api_token: Option<String>,
    pub replicate_api_base: String,
    pub replicate_model: String,
    pub replicate_model_version: Option<String>,
    pub poll_interval_ms: u64,
    pub poll_timeout_ms: u64,
    pub max_tokens: u32,
    pub temperature: f64,
    pub top_p: f64,
    pub strict_case_validation: bool,
    pub cors_allowed_origins: Vec<String>,
}

pub static CONFIG: OnceLock<Config> = OnceLock::new();

impl Default for Config {
    fn default() -> Self {
        Self {
            server_address: "0.0.0.0:3001".to_string(),
            replicate_api_token: None,
            replicate_api_base: DEFAULT_API_BASE.to_string(),
            replicate_model: DEFAULT_MODEL.to_string(),
            replicate_model_version: None,
            poll_interval_ms: 900,
            poll_timeout_ms: 90_000,
            max_tokens: 650,
            temperature: 0.2,
            top_p: 0.9,
            strict_case_validation: false,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let defaults = Self::default();

        let config = Self {
            server_address: env_or("SERVER_ADDRESS", defaults.server_address),
            replicate_api_token: get_env_opt("REPLICATE_API_TOKEN"),
            replicate_api_base: env_or("REPLICATE_API_BASE", defaults.replicate_api_base),
            replicate_model: env_or("REPLICATE_MODEL", defaults.replicate_model),
            replicate_model_version: get_env_opt("REPLICATE_MODEL_VERSION"),
            poll_interval_ms: get_env_parse_or("POLL_INTERVAL_MS", defaults.poll_interval_ms)?,
            poll_timeout_ms: get_env_parse_or("POLL_TIMEOUT_MS", defaults.poll_timeout_ms)?,
            max_tokens: get_env_parse_or("GENERATION_MAX_TOKENS", defaults.max_tokens)?,
            temperature: get_env_parse_or("GENERATION_TEMPERATURE", defaults.temperature)?,
            top_p: get_env_parse_or("GENERATION_TOP_P", defaults.top_p)?,
            strict_case_validation: get_env_parse_or(
                "STRICT_CASE_VALIDATION",
                defaults.strict_case_validation,
            )?,
            cors_allowed_origins: get_env_opt("CORS_ALLOWED_ORIGINS")
                .map(|raw| {
                    raw.split(',')
                        .map(|o| o.trim().to_string())
                        .filter(|o| !o.is_empty())
                        .collect()
                })
                .unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.poll_interval_ms == 0 {
            return Err(Error::Config(
                "POLL_INTERVAL_MS must be greater than zero".to_string(),
            ));
        }
        if self.poll_interval_ms > self.poll_timeout_ms {
            return Err(Error::Config(format!(
                "POLL_INTERVAL_MS ({}) must not exceed POLL_TIMEOUT_MS ({})",
                self.poll_interval_ms, self.poll_timeout_ms
            )));
        }
        Ok(())
    }

    pub fn replicate_settings(&self) -> ReplicateSettings {
        ReplicateSettings {
            api_base: self.replicate_api_base.trim_end_matches('/').to_string(),
            model: self.replicate_model.clone(),
            model_version: self.replicate_model_version.clone(),
        }
    }

    pub fn generation_params(&self) -> GenerationParams {
        GenerationParams {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            top_p: self.top_p,
        }
    }

    pub fn poll_settings(&self) -> PollSettings {
        PollSettings {
            interval: Duration::from_millis(self.poll_interval_ms),
            timeout: Duration::from_millis(self.poll_timeout_ms),
        }
    }

    pub fn validation_mode(&self) -> ValidationMode {
        if self.strict_case_validation {
            ValidationMode::Strict
        } else {
            ValidationMode::Lenient
        }
    }
}

fn get_env_opt(name: &str) -> Option<String> {
    env::var(name).ok().filter(|v| !v.trim().is_empty())
}

fn env_or(name: &str, default: String) -> String {
    get_env_opt(name).unwrap_or(default)
}

fn get_env_parse_or<T>(name: &str, default: T) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match get_env_opt(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| Error::Config(format!("Invalid value for {}: {}", name, e))),
        None => Ok(default),
    }
}

pub fn init_config() -> Result<()> {
    let config = Config::from_env()?;
    CONFIG
        .set(config)
        .map_err(|_| Error::Config("Configuration has already been initialized".to_string()))?;
    Ok(())
}

pub fn get_config() -> &'static Config {
    CONFIG
        .get()
        .expect("Configuration has not been initialized")
}
