//! OpenAI implementation of the completion model.
//!
//! Talks to the chat completions API with temperature 0, `json_schema`
//! response formats for structured stages, and function calling for the
//! tool-using stages.

use reqwest::Client;
use serde_json::{json, Value};

use crate::error::{PipelineError, Result};
use crate::security::{require_env, SecretString};
use crate::tools::ToolSet;
use crate::traits::CompletionModel;

const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o";

/// OpenAI-backed completion model.
#[derive(Clone)]
pub struct OpenAiModel {
    client: Client,
    api_key: SecretString,
    model: String,
    base_url: String,
    /// Upper bound on tool round trips within one completion. This is the
    /// collaborator-side iteration limit; the orchestrator imposes none.
    max_tool_rounds: usize,
}

impl OpenAiModel {
    /// Create a new client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: SecretString::new(api_key),
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tool_rounds: 16,
        }
    }

    /// Create from the `OPENAI_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let api_key = require_env("OPENAI_API_KEY")?;
        Ok(Self {
            client: Client::new(),
            api_key,
            model: DEFAULT_MODEL.to_string(),
            base_url: DEFAULT_BASE_URL.to_string(),
            max_tool_rounds: 16,
        })
    }

    /// Set the chat model (default: gpt-4o).
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set a custom base URL (for Azure, proxies, etc.).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Set the tool round-trip bound.
    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Get the current model name.
    pub fn model(&self) -> &str {
        &self.model
    }

    async fn post_chat(&self, body: &Value) -> Result<Value> {
        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key.expose()))
            .header("Content-Type", "application/json")
            .json(body)
            .send()
            .await
            .map_err(|e| PipelineError::model(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(PipelineError::model(format!(
                "OpenAI API error: {status} - {text}"
            )));
        }

        response
            .json()
            .await
            .map_err(|e| PipelineError::model(e.to_string()))
    }

    fn response_format(schema: &Value) -> Value {
        json!({
            "type": "json_schema",
            "json_schema": {
                "name": "stage_output",
                "strict": true,
                "schema": schema,
            }
        })
    }
}

/// Pull `choices[0].message` out of a completion response.
fn assistant_message(response: &Value) -> Result<Value> {
    response
        .get("choices")
        .and_then(|c| c.get(0))
        .and_then(|c| c.get("message"))
        .cloned()
        .ok_or_else(|| PipelineError::model("completion response had no message"))
}

/// Pull the text content out of an assistant message.
fn message_content(message: &Value) -> Result<String> {
    message
        .get("content")
        .and_then(|c| c.as_str())
        .map(str::to_string)
        .ok_or_else(|| PipelineError::model("completion message had no content"))
}

/// Parse a structured completion's content as JSON.
fn structured_payload(content: &str) -> Result<Value> {
    serde_json::from_str(content)
        .map_err(|e| PipelineError::model(format!("structured payload was not valid JSON: {e}")))
}

#[async_trait::async_trait]
impl CompletionModel for OpenAiModel {
    async fn complete(&self, instruction: &str) -> Result<String> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": instruction}],
            "temperature": 0.0,
        });
        let response = self.post_chat(&body).await?;
        message_content(&assistant_message(&response)?)
    }

    async fn complete_structured(&self, instruction: &str, schema: &Value) -> Result<Value> {
        let body = json!({
            "model": self.model,
            "messages": [{"role": "user", "content": instruction}],
            "temperature": 0.0,
            "response_format": Self::response_format(schema),
        });
        let response = self.post_chat(&body).await?;
        structured_payload(&message_content(&assistant_message(&response)?)?)
    }

    async fn complete_with_tools(
        &self,
        instruction: &str,
        tools: &ToolSet,
        schema: &Value,
    ) -> Result<Value> {
        let mut messages = vec![json!({"role": "user", "content": instruction})];

        for round in 0..self.max_tool_rounds {
            let body = json!({
                "model": self.model,
                "messages": messages,
                "temperature": 0.0,
                "tools": tools.definitions(),
                "tool_choice": "auto",
                "response_format": Self::response_format(schema),
            });
            let response = self.post_chat(&body).await?;
            let message = assistant_message(&response)?;

            let tool_calls = message
                .get("tool_calls")
                .and_then(|v| v.as_array())
                .filter(|calls| !calls.is_empty())
                .cloned();

            let Some(calls) = tool_calls else {
                return structured_payload(&message_content(&message)?);
            };

            tracing::debug!(round, calls = calls.len(), "resolving tool calls");
            messages.push(message);

            for call in calls {
                let id = call
                    .get("id")
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| PipelineError::model("tool call without id"))?;
                let name = call
                    .get("function")
                    .and_then(|f| f.get("name"))
                    .and_then(|v| v.as_str())
                    .ok_or_else(|| PipelineError::model("tool call without function name"))?;
                let arguments = call
                    .get("function")
                    .and_then(|f| f.get("arguments"))
                    .and_then(|v| v.as_str())
                    .unwrap_or("{}");
                let args: Value = serde_json::from_str(arguments).map_err(|e| {
                    PipelineError::model(format!("tool arguments were not valid JSON: {e}"))
                })?;

                let payload = tools.dispatch(name, args).await?;
                messages.push(json!({
                    "role": "tool",
                    "tool_call_id": id,
                    "content": payload.to_string(),
                }));
            }
        }

        Err(PipelineError::model(format!(
            "completion did not converge within {} tool rounds",
            self.max_tool_rounds
        )))
    }
}
