pub mod llama;

pub use llama::{ LlamaClient, WireMessage };

use crate::cli::Args;
use crate::error::ConfigError;
use serde_json::{ Map, Value };
use std::time::Duration;

/// Immutable provider configuration, captured once at startup.
#[derive(Debug, Clone)]
pub struct LlamaConfig {
    pub api_url: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f64,
    pub max_tokens: u32,
    /// Open-ended provider parameters, flattened into every request body.
    pub extra_params: Map<String, Value>,
    pub timeout: Duration,
}

impl LlamaConfig {
    /// Resolves the credential (`LLAMA_API_KEY`, falling back to
    /// `META_API_KEY`) and parses the extra-params object. Both failures
    /// are fatal before the server starts.
    pub fn from_args(args: &Args) -> Result<Self, ConfigError> {
        let api_key = args.api_key
            .clone()
            .filter(|k| !k.is_empty())
            .or_else(|| args.meta_api_key.clone().filter(|k| !k.is_empty()))
            .ok_or(ConfigError::MissingApiKey)?;

        let extra_params = match serde_json::from_str::<Value>(&args.extra_params) {
            Ok(Value::Object(map)) => map,
            Ok(other) =>
                return Err(
                    ConfigError::InvalidExtraParams(format!("expected an object, got {}", other))
                ),
            Err(e) => return Err(ConfigError::InvalidExtraParams(e.to_string())),
        };

        Ok(Self {
            api_url: args.api_url.clone(),
            api_key,
            model: args.model.clone(),
            temperature: args.temperature,
            max_tokens: args.max_tokens,
            extra_params,
            timeout: Duration::from_secs(args.request_timeout_secs),
        })
    }
}
