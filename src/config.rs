use anyhow::{anyhow, bail, Context as _, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use crate::definitions::PromptCatalog;
use crate::providers::{
    AnthropicProvider, GeminiProvider, LLMProvider, MockLLMProvider, OllamaProvider,
    OpenAIProvider,
};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    #[default]
    Gemini,
    OpenAI,
    Anthropic,
    Ollama,
    Mock,
}

impl ProviderKind {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "gemini" | "google" => Some(ProviderKind::Gemini),
            "openai" => Some(ProviderKind::OpenAI),
            "anthropic" | "claude" => Some(ProviderKind::Anthropic),
            "ollama" => Some(ProviderKind::Ollama),
            "mock" => Some(ProviderKind::Mock),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub provider: ProviderKind,
    pub model: Option<String>,
    pub gemini_api_key: Option<String>,
    pub openai_api_key: Option<String>,
    pub openai_base_url: Option<String>,
    pub anthropic_api_key: Option<String>,
    pub ollama_url: Option<String>,
    pub timeout_secs: u64,
    pub prompts: Option<PathBuf>,
    pub port: u16,
    pub log_level: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            model: None,
            gemini_api_key: None,
            openai_api_key: None,
            openai_base_url: None,
            anthropic_api_key: None,
            ollama_url: None,
            timeout_secs: 60,
            prompts: None,
            port: 8080,
            log_level: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::default().apply_vars(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: Config = toml::from_str(&raw)
            .with_context(|| format!("invalid config file {}", path.display()))?;
        config.apply_vars(|key| std::env::var(key).ok())
    }

    pub fn apply_vars<F>(mut self, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(provider) = var("CAREERDESK_PROVIDER") {
            self.provider = ProviderKind::from_str(&provider)
                .ok_or_else(|| anyhow!("unknown CAREERDESK_PROVIDER '{}'", provider))?;
        }
        if let Some(model) = var("CAREERDESK_MODEL") {
            self.model = Some(model);
        }
        if let Some(key) = var("GEMINI_API_KEY") {
            self.gemini_api_key = Some(key);
        }
        if let Some(key) = var("OPENAI_API_KEY") {
            self.openai_api_key = Some(key);
        }
        if let Some(url) = var("OPENAI_BASE_URL") {
            self.openai_base_url = Some(url);
        }
        if let Some(key) = var("ANTHROPIC_API_KEY") {
            self.anthropic_api_key = Some(key);
        }
        if let Some(url) = var("OLLAMA_URL") {
            self.ollama_url = Some(url);
        }
        if let Some(secs) = var("CAREERDESK_TIMEOUT_SECS") {
            self.timeout_secs = secs
                .trim()
                .parse()
                .with_context(|| format!("invalid CAREERDESK_TIMEOUT_SECS '{}'", secs))?;
        }
        if let Some(path) = var("CAREERDESK_PROMPTS") {
            self.prompts = Some(PathBuf::from(path));
        }
        if let Some(port) = var("PORT") {
            self.port = port
                .trim()
                .parse()
                .with_context(|| format!("invalid PORT '{}'", port))?;
        }
        if let Some(level) = var("RUST_LOG") {
            self.log_level = Some(level);
        }

        Ok(self)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }

    pub fn build_provider(&self) -> Result<Arc<dyn LLMProvider>> {
        let provider: Arc<dyn LLMProvider> = match self.provider {
            ProviderKind::Gemini => {
                let key = self
                    .gemini_api_key
                    .clone()
                    .ok_or_else(|| anyhow!("GEMINI_API_KEY is not set"))?;
                let provider = GeminiProvider::new(key);
                match &self.model {
                    Some(model) => Arc::new(provider.with_model(model.clone())),
                    None => Arc::new(provider),
                }
            }
            ProviderKind::OpenAI => {
                let key = self
                    .openai_api_key
                    .clone()
                    .ok_or_else(|| anyhow!("OPENAI_API_KEY is not set"))?;
                let mut provider = OpenAIProvider::new(key);
                if let Some(url) = &self.openai_base_url {
                    provider = provider.with_base_url(url.clone());
                }
                match &self.model {
                    Some(model) => Arc::new(provider.with_model(model.clone())),
                    None => Arc::new(provider),
                }
            }
            ProviderKind::Anthropic => {
                let key = self
                    .anthropic_api_key
                    .clone()
                    .ok_or_else(|| anyhow!("ANTHROPIC_API_KEY is not set"))?;
                let provider = AnthropicProvider::new(key);
                match &self.model {
                    Some(model) => Arc::new(provider.with_model(model.clone())),
                    None => Arc::new(provider),
                }
            }
            ProviderKind::Ollama => Arc::new(OllamaProvider::new(
                self.ollama_url.clone(),
                self.model.clone(),
            )),
            ProviderKind::Mock => Arc::new(MockLLMProvider::new()),
        };
        Ok(provider)
    }

    pub fn build_catalog(&self) -> Result<PromptCatalog> {
        match &self.prompts {
            Some(path) => PromptCatalog::with_overrides_from(path),
            None => Ok(PromptCatalog::builtin()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            bail!("port must be non-zero");
        }
        if let Some(path) = &self.prompts {
            if !path.exists() {
                bail!("prompt override file {} does not exist", path.display());
            }
        }
        Ok(())
    }
}
