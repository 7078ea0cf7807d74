#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use async_openai::{
    Client as OpenAIClient,
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
};

use crate::config;

/// An error raised by the external evaluator call.
///
/// These are the only failures the grading pipeline surfaces to its caller;
/// everything the model returns, however malformed, is absorbed downstream.
#[derive(thiserror::Error, Debug)]
pub enum EvaluatorError {
    /// The OpenAI environment variables required for the call are missing.
    #[error("OPENAI_API_KEY must be set to grade answers with the LLM evaluator.")]
    MissingConfig,
    /// The chat completion request itself failed.
    #[error("Chat completion request failed: {0}")]
    Completion(#[from] OpenAIError),
    /// The completion succeeded but carried no message content.
    #[error("Chat completion response contained no content.")]
    EmptyResponse,
}

/// A single-shot text completion capability.
///
/// The contract is raw text that should parse as the documented JSON shape
/// after fence-stripping; substitutable in tests with a deterministic stub.
pub trait Evaluator {
    /// Sends one prompt and returns the model's raw text output.
    fn complete(
        &self,
        prompt: &str,
    ) -> impl Future<Output = Result<String, EvaluatorError>> + Send;
}

/// The production evaluator backed by an OpenAI-compatible chat endpoint.
pub struct OpenAiEvaluator {
    /// Configured chat client.
    client:         OpenAIClient<OpenAIConfig>,
    /// Model identifier for completions.
    model:          String,
    /// Sampling temperature; low for deterministic-ish scoring.
    temperature:    f32,
    /// System message sent alongside every grading prompt.
    system_message: String,
}

impl OpenAiEvaluator {
    /// Builds an evaluator from the environment-backed configuration.
    pub fn from_env() -> Result<Self, EvaluatorError> {
        let openai = config::openai_config().ok_or(EvaluatorError::MissingConfig)?;
        let client = OpenAIClient::with_config(
            OpenAIConfig::new()
                .with_api_base(openai.api_base().to_owned())
                .with_api_key(openai.api_key().to_owned()),
        );

        Ok(Self {
            client,
            model: openai.chat_model().to_owned(),
            temperature: openai.temperature(),
            system_message: config::prompts().system_message().to_owned(),
        })
    }
}

impl Evaluator for OpenAiEvaluator {
    async fn complete(&self, prompt: &str) -> Result<String, EvaluatorError> {
        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(self.system_message.clone())
                .build()?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(prompt.to_string())
                .build()?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .temperature(self.temperature)
            .build()?;

        let response = self.client.chat().create(request).await?;

        response
            .choices
            .first()
            .and_then(|choice| choice.message.content.clone())
            .ok_or(EvaluatorError::EmptyResponse)
    }
}
