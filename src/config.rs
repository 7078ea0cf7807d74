#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::sync::{Arc, Mutex, OnceLock};

use anyhow::{Context, Result};
use reqwest::Client;

/// Default API base used when `OPENAI_ENDPOINT` is unset.
const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";

/// Default chat model used when `OPENAI_MODEL` is unset.
const DEFAULT_CHAT_MODEL: &str = "gpt-4";

/// Default embedding model used when `OPENAI_EMBEDDING_MODEL` is unset.
const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-3-small";

/// Default sampling temperature for grading completions.
const DEFAULT_TEMPERATURE: f32 = 0.3;

/// OpenAI credentials and tuning parameters sourced from the environment.
#[derive(Clone)]
pub struct OpenAiEnv {
    /// Base URL for the OpenAI-compatible API endpoint.
    api_base:        String,
    /// API key used to authenticate requests.
    api_key:         String,
    /// Model identifier for chat completions.
    chat_model:      String,
    /// Model identifier for embedding requests.
    embedding_model: String,
    /// Sampling temperature for grading completions.
    temperature:     f32,
}

impl OpenAiEnv {
    /// Construct an `OpenAiEnv` from environment variables; returns `None` if
    /// the API key is missing or empty.
    fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?.trim().to_owned();
        if api_key.is_empty() {
            return None;
        }

        let api_base = std::env::var("OPENAI_ENDPOINT")
            .map(|value| value.trim().trim_end_matches('/').to_owned())
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string());
        let chat_model = std::env::var("OPENAI_MODEL")
            .map(|value| value.trim().to_owned())
            .unwrap_or_else(|_| DEFAULT_CHAT_MODEL.to_string());
        let embedding_model = std::env::var("OPENAI_EMBEDDING_MODEL")
            .map(|value| value.trim().to_owned())
            .unwrap_or_else(|_| DEFAULT_EMBEDDING_MODEL.to_string());
        let temperature = std::env::var("OPENAI_TEMPERATURE")
            .ok()
            .and_then(|value| value.parse::<f32>().ok())
            .unwrap_or(DEFAULT_TEMPERATURE);

        Some(Self {
            api_base,
            api_key,
            chat_model,
            embedding_model,
            temperature,
        })
    }

    /// Returns the API base URL used for requests.
    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// Returns the API key used for requests.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Returns the chat model identifier.
    pub fn chat_model(&self) -> &str {
        &self.chat_model
    }

    /// Returns the embedding model identifier.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    /// Returns the sampling temperature for grading completions.
    pub fn temperature(&self) -> f32 {
        self.temperature
    }
}

/// Prompt assets embedded in the binary.
#[derive(Clone)]
pub struct GraderPrompts {
    /// System message sent alongside every grading prompt.
    system_message:   String,
    /// Grading prompt template with `{PLACEHOLDER}` substitution points.
    grading_template: String,
    /// Rubric applied when the caller supplies none.
    general_rubric:   String,
}

impl GraderPrompts {
    /// Load prompt templates embedded in the binary.
    pub fn load() -> Self {
        Self {
            system_message:   include_str!("prompts/system_message.md").trim_end().to_string(),
            grading_template: include_str!("prompts/grading_prompt.md").to_string(),
            general_rubric:   include_str!("prompts/general_rubric.md").to_string(),
        }
    }

    /// Returns the system message for grading completions.
    pub fn system_message(&self) -> &str {
        &self.system_message
    }

    /// Returns the grading prompt template.
    pub fn grading_template(&self) -> &str {
        &self.grading_template
    }

    /// Returns the general-purpose rubric.
    pub fn general_rubric(&self) -> &str {
        &self.general_rubric
    }
}

/// Runtime configuration shared across the crate.
pub struct ConfigState {
    /// Cached OpenAI configuration, if available.
    openai:      Option<OpenAiEnv>,
    /// Shared reqwest HTTP client reused across network helpers.
    http_client: Client,
    /// Prompt assets loaded from the binary.
    prompts:     GraderPrompts,
}

impl ConfigState {
    /// Construct a new configuration instance by reading environment and
    /// prompt assets.
    fn new() -> Result<Self> {
        let http_client = Client::builder()
            // Avoid macOS dynamic store lookups that fail in sandboxed environments.
            .no_proxy()
            .build()
            .context("Failed to construct shared HTTP client")?;

        Ok(Self {
            openai: OpenAiEnv::from_env(),
            http_client,
            prompts: GraderPrompts::load(),
        })
    }

    /// Returns the OpenAI configuration, if the required environment
    /// variables are present.
    pub fn openai(&self) -> Option<&OpenAiEnv> {
        self.openai.as_ref()
    }

    /// Returns a clone of the shared reqwest HTTP client.
    pub fn http_client(&self) -> Client {
        self.http_client.clone()
    }

    /// Returns the prompt assets.
    pub fn prompts(&self) -> &GraderPrompts {
        &self.prompts
    }
}

/// Borrowed view of the prompt assets that keeps the underlying configuration
/// alive.
pub struct PromptsRef(ConfigHandle);

impl std::ops::Deref for PromptsRef {
    type Target = GraderPrompts;

    fn deref(&self) -> &Self::Target {
        self.0.prompts()
    }
}

/// Borrowed view of the OpenAI configuration tied to the global config.
pub struct OpenAiRef(ConfigHandle);

impl std::ops::Deref for OpenAiRef {
    type Target = OpenAiEnv;

    fn deref(&self) -> &Self::Target {
        self.0.openai.as_ref().expect("OpenAI config missing")
    }
}

/// Shared configuration handle used throughout the crate.
#[derive(Clone)]
pub struct ConfigHandle(Arc<ConfigState>);

impl std::ops::Deref for ConfigHandle {
    type Target = ConfigState;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Global storage for the lazily constructed configuration state.
static CONFIG_SLOT: OnceLock<Mutex<Option<Arc<ConfigState>>>> = OnceLock::new();

/// Returns the mutex guarding the global configuration slot.
fn slot() -> &'static Mutex<Option<Arc<ConfigState>>> {
    CONFIG_SLOT.get_or_init(|| Mutex::new(None))
}

/// Ensure the global configuration has been initialized and return a handle.
pub fn ensure_initialized() -> Result<ConfigHandle> {
    let slot = slot();
    let mut guard = slot.lock().expect("config slot poisoned");
    if let Some(cfg) = guard.as_ref() {
        return Ok(ConfigHandle(Arc::clone(cfg)));
    }

    let cfg = ConfigState::new().map(Arc::new)?;
    *guard = Some(Arc::clone(&cfg));
    Ok(ConfigHandle(cfg))
}

/// Returns the active configuration, initializing it on demand.
pub fn get() -> ConfigHandle {
    ensure_initialized().expect("configuration initialization failed")
}

/// Returns a clone of the shared reqwest HTTP client.
pub fn http_client() -> Client {
    get().http_client()
}

/// Returns the embedded prompt assets.
pub fn prompts() -> PromptsRef {
    PromptsRef(get())
}

/// Returns the configured OpenAI environment, if set.
pub fn openai_config() -> Option<OpenAiRef> {
    let handle = get();
    if handle.openai.is_some() {
        Some(OpenAiRef(handle))
    } else {
        None
    }
}
