//! Environment-driven configuration for the gateway and the chat client
//!
//! Both binaries call `dotenvy::dotenv()` first, so every variable can also
//! come from a `.env` file in the working directory.

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use thiserror::Error;

use crate::llm::core::config::{DEFAULT_BASE_URL, DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::llm::{GenerationConfig, UpstreamConfig};
use crate::routes::DEFAULT_MAX_BODY_BYTES;

pub const API_KEY_VAR: &str = "OPEN_API_KEY";

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{name} has an invalid value {value:?}: {reason}")]
    InvalidValue {
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// Settings for the relay gateway process
#[derive(Debug, Clone)]
pub struct GatewayConfig {
    pub bind_address: [u8; 4],
    pub port: u16,
    /// Largest POST body accepted, in bytes
    pub max_body_bytes: u64,
    pub upstream: UpstreamConfig,
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let generation = GenerationConfig::new(
            lookup("RELAY_MODEL").unwrap_or_else(|| DEFAULT_MODEL.to_string()),
        )
        .with_max_tokens(parse_or(&lookup, "RELAY_MAX_TOKENS", DEFAULT_MAX_TOKENS)?);

        let upstream = UpstreamConfig {
            api_key: lookup(API_KEY_VAR).filter(|key| !key.trim().is_empty()),
            base_url: lookup("OPENAI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            request_timeout: Duration::from_secs(parse_or(
                &lookup,
                "RELAY_UPSTREAM_TIMEOUT_SECS",
                30u64,
            )?),
            transport_retries: parse_or(&lookup, "RELAY_TRANSPORT_RETRIES", 1u32)?,
            generation,
        };

        Ok(Self {
            bind_address: parse_ipv4(&lookup, "RELAY_BIND_ADDRESS", [127, 0, 0, 1])?,
            port: parse_or(&lookup, "RELAY_PORT", 8787u16)?,
            max_body_bytes: parse_or(&lookup, "RELAY_MAX_BODY_BYTES", DEFAULT_MAX_BODY_BYTES)?,
            upstream,
        })
    }
}

/// Settings for the terminal chat client
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    pub gateway_url: String,
    pub state_dir: PathBuf,
    pub catalog_path: PathBuf,
}

impl ClientConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Self {
            gateway_url: lookup("ROUTINE_GATEWAY_URL")
                .unwrap_or_else(|| "http://127.0.0.1:8787/".to_string()),
            state_dir: lookup("ROUTINE_STATE_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(".routine_state")),
            catalog_path: lookup("ROUTINE_CATALOG")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("products.json")),
        }
    }
}

fn parse_or<F, T>(lookup: &F, name: &'static str, default: T) -> Result<T, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::fmt::Display,
{
    match lookup(name) {
        None => Ok(default),
        Some(raw) => raw.trim().parse().map_err(|e: T::Err| ConfigError::InvalidValue {
            name,
            value: raw.clone(),
            reason: e.to_string(),
        }),
    }
}

fn parse_ipv4<F>(lookup: &F, name: &'static str, default: [u8; 4]) -> Result<[u8; 4], ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let address: std::net::Ipv4Addr = parse_or(lookup, name, default.into())?;
    Ok(address.octets())
}
