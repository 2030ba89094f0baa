use std::env;
use std::time::Duration;

use async_trait::async_trait;
use quiz_core::Difficulty;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GenerationError;

const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";
const DEFAULT_QUESTION_COUNT: usize = 10;
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const SYSTEM_PROMPT: &str = "You are a quiz generator that outputs only valid JSON.";

/// Source of serialized quiz documents.
///
/// Implementations return the document text untouched; parsing and structural
/// checks belong to the session controller.
#[async_trait]
pub trait QuizGenerator: Send + Sync {
    /// # Errors
    ///
    /// Returns `GenerationError` on transport failures or an unusable response.
    async fn generate(&self, subject: &str, difficulty: Difficulty)
    -> Result<String, GenerationError>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub question_count: usize,
    /// Upper bound for one generation request, connect through body.
    pub timeout: Duration,
}

impl GeneratorConfig {
    #[must_use]
    pub fn from_env() -> Option<Self> {
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup. Returns `None` when no
    /// API key is set.
    #[must_use]
    pub fn from_vars(get: impl Fn(&str) -> Option<String>) -> Option<Self> {
        let api_key = get("GROQ_API_KEY")?.trim().to_string();
        if api_key.is_empty() {
            return None;
        }
        let base_url = get("QUIZ_AI_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let model = get("QUIZ_AI_MODEL").unwrap_or_else(|| DEFAULT_MODEL.into());
        let question_count = get("QUIZ_QUESTION_COUNT")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_QUESTION_COUNT);
        let timeout = get("QUIZ_AI_TIMEOUT_SECS")
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .filter(|secs| *secs > 0)
            .map_or(Duration::from_secs(DEFAULT_TIMEOUT_SECS), Duration::from_secs);
        Some(Self {
            base_url,
            api_key,
            model,
            question_count,
            timeout,
        })
    }
}

/// Generator backed by an OpenAI-compatible chat completions endpoint.
#[derive(Clone)]
pub struct ChatQuizGenerator {
    client: Client,
    config: Option<GeneratorConfig>,
}

impl ChatQuizGenerator {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(GeneratorConfig::from_env())
    }

    #[must_use]
    pub fn new(config: Option<GeneratorConfig>) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn enabled(&self) -> bool {
        self.config.is_some()
    }
}

#[async_trait]
impl QuizGenerator for ChatQuizGenerator {
    async fn generate(
        &self,
        subject: &str,
        difficulty: Difficulty,
    ) -> Result<String, GenerationError> {
        let config = self.config.as_ref().ok_or(GenerationError::Disabled)?;

        let url = format!(
            "{}/chat/completions",
            config.base_url.trim_end_matches('/')
        );
        let payload = ChatRequest {
            model: config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT.to_string(),
                },
                ChatMessage {
                    role: "user",
                    content: build_prompt(subject, difficulty, config.question_count),
                },
            ],
            response_format: ResponseFormat {
                kind: "json_object",
            },
        };

        debug!(%url, model = %config.model, "sending quiz generation request");
        let response = self
            .client
            .post(url)
            .bearer_auth(&config.api_key)
            .timeout(config.timeout)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::HttpStatus { status, body });
        }

        let body: ChatResponse = response.json().await?;
        extract_content(body)
    }
}

pub(crate) fn build_prompt(subject: &str, difficulty: Difficulty, question_count: usize) -> String {
    format!(
        "Generate a {difficulty} quiz about '{subject}' with exactly {question_count} questions. \
         Each question must have 3 choices, one correct and two wrong. \
         Return STRICT JSON in the following format: \
         {{ \"subject\": \"{subject}\", \"difficulty\": \"{difficulty}\", \"questions\": [ \
         {{ \"text\": \"Question text\", \"choices\": [ \
         {{ \"text\": \"Answer 1\", \"is_correct\": true }}, \
         {{ \"text\": \"Answer 2\", \"is_correct\": false }}, \
         {{ \"text\": \"Answer 3\", \"is_correct\": false }} ] }} ] }}"
    )
}

fn extract_content(body: ChatResponse) -> Result<String, GenerationError> {
    let content = body
        .choices
        .into_iter()
        .next()
        .and_then(|choice| choice.message.content)
        .filter(|content| !content.trim().is_empty())
        .ok_or(GenerationError::EmptyResponse)?;
    Ok(content)
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    response_format: ResponseFormat,
}

#[derive(Debug, Serialize)]
struct ChatMessage {
    role: &'static str,
    content: String,
}

#[derive(Debug, Serialize)]
struct ResponseFormat {
    #[serde(rename = "type")]
    kind: &'static str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessageResponse,
}

#[derive(Debug, Deserialize)]
struct ChatMessageResponse {
    content: Option<String>,
}
