use secrecy::Secret;
use serde::Deserialize;
use service_core::config as core_config;
use service_core::error::AppError;
use std::env;

const DEFAULT_GITHUB_API_BASE: &str = "https://api.github.com";
const DEFAULT_GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-pro-latest";
const DEFAULT_PROVIDER_TIMEOUT_SECS: u64 = 120;
const DEFAULT_CHAT_HISTORY_WINDOW: usize = 20;

#[derive(Debug, Clone, Deserialize)]
pub struct PrismConfig {
    #[serde(flatten)]
    pub common: core_config::Config,
    pub github: GithubConfig,
    pub gemini: GeminiSettings,
    pub providers: ProviderSettings,
    pub chat: ChatConfig,
    pub otlp_endpoint: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubConfig {
    pub token: Secret<String>,
    pub api_base: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    pub api_key: Secret<String>,
    pub api_base: String,
    pub model: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderSettings {
    /// Serve canned data from in-process providers instead of calling upstreams.
    pub use_mock: bool,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatConfig {
    /// Most recent turns rendered into a chat prompt. The echoed history is never cut.
    pub history_window: usize,
}

impl PrismConfig {
    pub fn load() -> Result<Self, AppError> {
        let common_config = core_config::Config::load()?;
        let is_prod = env::var("ENVIRONMENT").unwrap_or_else(|_| "dev".to_string()) == "prod";

        let use_mock = parse_env("PRISM_MOCK_PROVIDERS", false)?;
        // Credentials are optional only when nothing will be sent upstream.
        let credential_default = if use_mock && !is_prod { Some("") } else { None };

        Ok(PrismConfig {
            common: common_config,
            github: GithubConfig {
                token: Secret::new(get_env("GITHUB_TOKEN", credential_default, is_prod)?),
                api_base: get_env("GITHUB_API_BASE", Some(DEFAULT_GITHUB_API_BASE), is_prod)?,
            },
            gemini: GeminiSettings {
                api_key: Secret::new(get_env("GEMINI_API_KEY", credential_default, is_prod)?),
                api_base: get_env("GEMINI_API_BASE", Some(DEFAULT_GEMINI_API_BASE), is_prod)?,
                model: get_env("GEMINI_MODEL", Some(DEFAULT_GEMINI_MODEL), is_prod)?,
            },
            providers: ProviderSettings {
                use_mock,
                timeout_secs: parse_env("PROVIDER_TIMEOUT_SECS", DEFAULT_PROVIDER_TIMEOUT_SECS)?,
            },
            chat: ChatConfig {
                history_window: parse_env("CHAT_HISTORY_WINDOW", DEFAULT_CHAT_HISTORY_WINDOW)?,
            },
            otlp_endpoint: env::var("OTLP_ENDPOINT").ok().filter(|s| !s.is_empty()),
        })
    }
}

fn get_env(key: &str, default: Option<&str>, is_prod: bool) -> Result<String, AppError> {
    match env::var(key) {
        Ok(val) => Ok(val),
        Err(_) => {
            if is_prod {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required in production but not set",
                    key
                )))
            } else if let Some(def) = default {
                Ok(def.to_string())
            } else {
                Err(AppError::ConfigError(anyhow::anyhow!(
                    "{} is required but not set",
                    key
                )))
            }
        }
    }
}

/// Optional typed variable; a present but unparsable value is an error, not a silent default.
fn parse_env<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(val) => val.trim().parse().map_err(|e| {
            AppError::ConfigError(anyhow::anyhow!("{} has invalid value '{}': {}", key, val, e))
        }),
        Err(_) => Ok(default),
    }
}
