use std::env;
use std::net::SocketAddr;

use crate::tts::tone::{DEFAULT_SAMPLE_RATE, MAX_SAMPLE_RATE};

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("{name} must be a number, got '{value}'")]
    NotANumber { name: &'static str, value: String },

    #[error("KOKORO_SAMPLE_RATE must be between 1 and {max}, got {0}", max = MAX_SAMPLE_RATE)]
    InvalidSampleRate(u32),

    #[error("Invalid listen address: {0}")]
    InvalidAddress(String),
}

/// Mock server settings, read from the environment.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub api_key: Option<String>,
    pub sample_rate: u32,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Same as [`ServerConfig::from_env`] but with an injectable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_number(&lookup, "PORT", 8000)?;
        let sample_rate = parse_number(&lookup, "KOKORO_SAMPLE_RATE", DEFAULT_SAMPLE_RATE)?;
        if sample_rate == 0 || sample_rate > MAX_SAMPLE_RATE {
            return Err(ConfigError::InvalidSampleRate(sample_rate));
        }
        let api_key = lookup("KOKORO_API_KEY").filter(|key| !key.is_empty());

        Ok(Self {
            host,
            port,
            api_key,
            sample_rate,
        })
    }

    pub fn socket_addr(&self) -> Result<SocketAddr, ConfigError> {
        let addr = format!("{}:{}", self.host, self.port);
        addr.parse()
            .map_err(|_| ConfigError::InvalidAddress(addr))
    }
}

fn parse_number<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr,
{
    match lookup(name) {
        Some(value) => value
            .trim()
            .parse()
            .map_err(|_| ConfigError::NotANumber { name, value }),
        None => Ok(default),
    }
}
