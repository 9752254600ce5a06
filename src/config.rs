//! Runtime Configuration
//!
//! Settings assembled from environment variables with CLI overrides. The
//! provider, tool catalog, ledger, and artifact store are all constructed
//! from one validated `Settings` value at startup and injected; nothing in
//! the pipeline reads the environment afterwards.

use std::path::PathBuf;

use gene_agent_core::proxy::{ProxyConfig, ProxyProtocol};
use gene_agent_llm::ProviderConfig;

use crate::utils::error::{AppError, AppResult};

/// Environment variable holding the API key (required).
pub const ENV_API_KEY: &str = "OPENAI_API_KEY";
/// Environment variable overriding the chat-completions endpoint.
pub const ENV_BASE_URL: &str = "OPENAI_BASE_URL";
/// Environment variable selecting the model.
pub const ENV_MODEL: &str = "GENE_AGENT_MODEL";

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";
/// Iteration bound of the verification agent loop.
pub const DEFAULT_MAX_ITERATIONS: u32 = 20;
/// Delay before each verifier model call, in milliseconds.
pub const DEFAULT_PACING_MS: u64 = 1000;

/// CLI-sourced overrides layered over the environment.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub model: Option<String>,
    pub base_url: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub max_iterations: Option<u32>,
    pub pacing_ms: Option<u64>,
    pub proxy_url: Option<String>,
}

/// Validated runtime settings.
#[derive(Debug, Clone)]
pub struct Settings {
    pub api_key: String,
    pub base_url: Option<String>,
    pub model: String,
    pub output_dir: PathBuf,
    pub max_iterations: u32,
    pub pacing_ms: u64,
    pub proxy: Option<ProxyConfig>,
}

impl Settings {
    /// Assemble settings from the environment plus CLI overrides.
    ///
    /// Fails fast with `AppError::Config` on a missing API key, a zero
    /// iteration bound, or an unparseable proxy URL.
    pub fn from_env(overrides: Overrides) -> AppResult<Self> {
        let api_key = std::env::var(ENV_API_KEY)
            .ok()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| AppError::config(format!("{} is not set", ENV_API_KEY)))?;

        let base_url = overrides
            .base_url
            .or_else(|| std::env::var(ENV_BASE_URL).ok())
            .filter(|u| !u.trim().is_empty());

        let model = overrides
            .model
            .or_else(|| std::env::var(ENV_MODEL).ok())
            .filter(|m| !m.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_MODEL.to_string());

        let output_dir = overrides
            .output_dir
            .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_DIR));

        let max_iterations = overrides.max_iterations.unwrap_or(DEFAULT_MAX_ITERATIONS);
        if max_iterations == 0 {
            return Err(AppError::config("max iterations must be at least 1"));
        }

        let pacing_ms = overrides.pacing_ms.unwrap_or(DEFAULT_PACING_MS);

        let proxy = overrides
            .proxy_url
            .map(|url| parse_proxy_url(&url))
            .transpose()?;

        Ok(Self {
            api_key,
            base_url,
            model,
            output_dir,
            max_iterations,
            pacing_ms,
            proxy,
        })
    }

    /// Provider configuration for the model access layer. Temperature is
    /// always zero; downstream parsing depends on deterministic output.
    pub fn provider_config(&self) -> ProviderConfig {
        ProviderConfig {
            api_key: Some(self.api_key.clone()),
            model: self.model.clone(),
            base_url: self.base_url.clone(),
            temperature: 0.0,
            proxy: self.proxy.clone(),
            ..ProviderConfig::default()
        }
    }
}

/// Parse a `scheme://host:port` proxy URL into a `ProxyConfig`.
pub fn parse_proxy_url(url: &str) -> AppResult<ProxyConfig> {
    let (scheme, rest) = url
        .split_once("://")
        .ok_or_else(|| AppError::config(format!("Invalid proxy URL: {}", url)))?;
    let protocol = ProxyProtocol::from_scheme(scheme)
        .ok_or_else(|| AppError::config(format!("Unsupported proxy scheme: {}", scheme)))?;
    let (host, port) = rest
        .rsplit_once(':')
        .ok_or_else(|| AppError::config(format!("Proxy URL is missing a port: {}", url)))?;
    let port: u16 = port
        .parse()
        .map_err(|_| AppError::config(format!("Invalid proxy port in: {}", url)))?;
    if host.is_empty() {
        return Err(AppError::config(format!("Proxy URL is missing a host: {}", url)));
    }

    Ok(ProxyConfig {
        protocol,
        host: host.to_string(),
        port,
        username: None,
        password: None,
    })
}
