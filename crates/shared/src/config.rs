use anyhow::{Context, Result};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use tracing::warn;

use crate::http::DEFAULT_TIMEOUT;
use crate::providers::{
    ModelCandidate, DEFAULT_API_VERSIONS, DEFAULT_MODELS, HUGGINGFACE_DEFAULT_MODEL,
    OPENAI_DEFAULT_MODEL,
};

const APP_DIR: &str = "link-bucket";

/// Which remote provider to try before the keyword fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProviderKind {
    OpenAi,
    Gemini,
    HuggingFace,
    #[default]
    Fallback,
}

impl ProviderKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::OpenAi => "openai",
            ProviderKind::Gemini => "gemini",
            ProviderKind::HuggingFace => "huggingface",
            ProviderKind::Fallback => "fallback",
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ProviderKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "openai" => Ok(ProviderKind::OpenAi),
            "gemini" => Ok(ProviderKind::Gemini),
            "huggingface" | "hf" => Ok(ProviderKind::HuggingFace),
            "fallback" | "none" | "" => Ok(ProviderKind::Fallback),
            other => anyhow::bail!(
                "Unknown AI provider: {}. Use 'openai', 'gemini', 'huggingface' or 'fallback'",
                other
            ),
        }
    }
}

/// Provider selection and credentials. Read once; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    pub provider: ProviderKind,
    pub openai_api_key: Option<String>,
    pub openai_model: String,
    pub gemini_api_key: Option<String>,
    pub gemini_candidates: Vec<ModelCandidate>,
    pub huggingface_api_token: Option<String>,
    pub huggingface_model: String,
    pub request_timeout: Duration,
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::Fallback,
            openai_api_key: None,
            openai_model: OPENAI_DEFAULT_MODEL.to_string(),
            gemini_api_key: None,
            gemini_candidates: ModelCandidate::defaults(),
            huggingface_api_token: None,
            huggingface_model: HUGGINGFACE_DEFAULT_MODEL.to_string(),
            request_timeout: DEFAULT_TIMEOUT,
        }
    }
}

impl ProviderConfig {
    /// Build from a variable lookup, e.g. `|k| std::env::var(k).ok()`.
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();

        let provider = match get("AI_PROVIDER") {
            None => ProviderKind::Fallback,
            Some(raw) => raw.parse::<ProviderKind>().unwrap_or_else(|e| {
                warn!(error = %e, "ignoring AI_PROVIDER, using keyword fallback");
                ProviderKind::Fallback
            }),
        };

        let gemini_candidates = match (get("GEMINI_API_VERSIONS"), get("GEMINI_MODELS")) {
            (None, None) => defaults.gemini_candidates,
            (versions, models) => {
                let versions = versions
                    .map(|v| split_list(&v))
                    .unwrap_or_else(|| DEFAULT_API_VERSIONS.map(String::from).to_vec());
                let models = models
                    .map(|m| split_list(&m))
                    .unwrap_or_else(|| DEFAULT_MODELS.map(String::from).to_vec());
                ModelCandidate::cross(&versions, &models)
            }
        };

        let request_timeout = get("HTTP_TIMEOUT_SECS")
            .and_then(|s| s.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
            .unwrap_or(defaults.request_timeout);

        Self {
            provider,
            openai_api_key: credential(get("OPENAI_API_KEY")),
            openai_model: non_blank(get("OPENAI_MODEL")).unwrap_or(defaults.openai_model),
            gemini_api_key: credential(get("GEMINI_API_KEY")),
            gemini_candidates,
            huggingface_api_token: credential(get("HUGGINGFACE_API_TOKEN")),
            huggingface_model: non_blank(get("HUGGINGFACE_MODEL"))
                .unwrap_or(defaults.huggingface_model),
            request_timeout,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub providers: ProviderConfig,
    pub database_path: PathBuf,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        // Try to load .env from multiple locations
        Self::try_load_dotenv();

        let providers = ProviderConfig::from_vars(|key| env::var(key).ok());

        let database_path = match non_blank(env::var("SAVES_DB").ok()) {
            Some(path) => PathBuf::from(path),
            None => default_database_path()?,
        };

        Ok(Self {
            providers,
            database_path,
        })
    }

    fn try_load_dotenv() {
        // 1. Current directory (for development)
        if dotenvy::dotenv().is_ok() {
            return;
        }

        // 2. ~/.config/link-bucket/.env (standard config location)
        if let Some(config_dir) = dirs::config_dir() {
            let config_path = config_dir.join(APP_DIR).join(".env");
            if config_path.exists() && dotenvy::from_path(&config_path).is_ok() {
                return;
            }
        }

        // 3. ~/.env (home directory)
        if let Some(home_dir) = dirs::home_dir() {
            let home_path = home_dir.join(".env");
            if home_path.exists() {
                let _ = dotenvy::from_path(&home_path);
            }
        }
    }
}

/// Directory holding the saves database and exports.
pub fn data_dir() -> Result<PathBuf> {
    let dir = dirs::data_local_dir()
        .context("Could not determine local data directory")?
        .join(APP_DIR);

    std::fs::create_dir_all(&dir).context("Failed to create data directory")?;

    Ok(dir)
}

fn default_database_path() -> Result<PathBuf> {
    Ok(data_dir()?.join("saves.db"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// A usable secret: not blank and not a template value like `your_openai_api_key_here`.
fn credential(value: Option<String>) -> Option<String> {
    non_blank(value).filter(|v| !(v.starts_with("your_") && v.ends_with("_here")))
}

fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(pairs: &[(&str, &str)]) -> ProviderConfig {
        let vars: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ProviderConfig::from_vars(|k| vars.get(k).cloned())
    }

    #[test]
    fn test_unset_provider_is_fallback() {
        let config = config_from(&[]);
        assert_eq!(config.provider, ProviderKind::Fallback);
        assert_eq!(config.gemini_candidates.len(), 6);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }

    #[test]
    fn test_unknown_provider_is_fallback() {
        let config = config_from(&[("AI_PROVIDER", "claude")]);
        assert_eq!(config.provider, ProviderKind::Fallback);
    }

    #[test]
    fn test_provider_names_parse() {
        assert_eq!("OpenAI".parse::<ProviderKind>().unwrap(), ProviderKind::OpenAi);
        assert_eq!("gemini".parse::<ProviderKind>().unwrap(), ProviderKind::Gemini);
        assert_eq!(
            "huggingface".parse::<ProviderKind>().unwrap(),
            ProviderKind::HuggingFace
        );
        assert!("bard".parse::<ProviderKind>().is_err());
    }

    #[test]
    fn test_placeholder_credentials_are_unset() {
        let config = config_from(&[
            ("AI_PROVIDER", "openai"),
            ("OPENAI_API_KEY", "your_openai_api_key_here"),
            ("GEMINI_API_KEY", "   "),
            ("HUGGINGFACE_API_TOKEN", "hf_real"),
        ]);
        assert_eq!(config.provider, ProviderKind::OpenAi);
        assert_eq!(config.openai_api_key, None);
        assert_eq!(config.gemini_api_key, None);
        assert_eq!(config.huggingface_api_token.as_deref(), Some("hf_real"));
    }

    #[test]
    fn test_gemini_candidate_overrides() {
        let config = config_from(&[("GEMINI_MODELS", "gemini-2.0-flash, gemini-pro")]);
        let endpoints: Vec<(String, String)> = config
            .gemini_candidates
            .into_iter()
            .map(|c| (c.api_version, c.model))
            .collect();
        assert_eq!(
            endpoints,
            vec![
                ("v1".to_string(), "gemini-2.0-flash".to_string()),
                ("v1".to_string(), "gemini-pro".to_string()),
                ("v1beta".to_string(), "gemini-2.0-flash".to_string()),
                ("v1beta".to_string(), "gemini-pro".to_string()),
            ]
        );
    }

    #[test]
    fn test_repeated_gemini_models_are_probed_once() {
        let config = config_from(&[
            ("GEMINI_API_VERSIONS", "v1, v1"),
            ("GEMINI_MODELS", "gemini-pro, gemini-pro"),
        ]);
        assert_eq!(
            config.gemini_candidates,
            vec![ModelCandidate::new("v1", "gemini-pro")]
        );
    }

    #[test]
    fn test_timeout_override() {
        let config = config_from(&[("HTTP_TIMEOUT_SECS", "3")]);
        assert_eq!(config.request_timeout, Duration::from_secs(3));

        let config = config_from(&[("HTTP_TIMEOUT_SECS", "zero")]);
        assert_eq!(config.request_timeout, Duration::from_secs(10));
    }
}
