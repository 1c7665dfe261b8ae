//! Mock collaborators for testing.
//!
//! Deterministic, scriptable stand-ins for the model, search, and scrape
//! providers, with call tracking so tests can assert ordering and
//! fail-fast behavior without network access.

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, RwLock};

use async_trait::async_trait;
use serde_json::Value;

use crate::error::{PipelineError, Result};
use crate::tools::ToolSet;
use crate::traits::{CompletionModel, PageScraper, WebSearcher};

/// One scripted completion: optional tool calls, then a final response.
pub struct ScriptedTurn {
    tool_calls: Vec<(String, Value)>,
    response: std::result::Result<Value, String>,
}

impl ScriptedTurn {
    /// A turn that responds with the given payload.
    pub fn respond(payload: Value) -> Self {
        Self {
            tool_calls: Vec::new(),
            response: Ok(payload),
        }
    }

    /// A turn that fails with a model error.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            tool_calls: Vec::new(),
            response: Err(message.into()),
        }
    }

    /// Script a tool call made before the final response.
    ///
    /// Dispatched through the stage's tool set exactly as a real model's
    /// tool call would be, so tool errors propagate the same way.
    pub fn with_tool_call(mut self, name: impl Into<String>, args: Value) -> Self {
        self.tool_calls.push((name.into(), args));
        self
    }
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone)]
pub enum ModelCall {
    /// `complete` (free-form, report stage).
    Complete { instruction: String },
    /// `complete_structured` (no tools).
    Structured { instruction: String },
    /// `complete_with_tools`.
    WithTools { instruction: String },
}

impl ModelCall {
    /// The instruction text of this call.
    pub fn instruction(&self) -> &str {
        match self {
            Self::Complete { instruction }
            | Self::Structured { instruction }
            | Self::WithTools { instruction } => instruction,
        }
    }
}

/// Scripted completion model.
///
/// Turns are consumed in order, one per completion request.
#[derive(Default)]
pub struct MockModel {
    turns: Mutex<VecDeque<ScriptedTurn>>,
    calls: Arc<RwLock<Vec<ModelCall>>>,
}

impl MockModel {
    /// Create a mock with no scripted turns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a scripted turn.
    pub fn with_turn(self, turn: ScriptedTurn) -> Self {
        self.turns.lock().unwrap().push_back(turn);
        self
    }

    /// All calls made to this mock, in order.
    pub fn calls(&self) -> Vec<ModelCall> {
        self.calls.read().unwrap().clone()
    }

    fn next_turn(&self) -> Result<ScriptedTurn> {
        self.turns
            .lock()
            .unwrap()
            .pop_front()
            .ok_or_else(|| PipelineError::model("mock model script exhausted"))
    }

    fn record(&self, call: ModelCall) {
        self.calls.write().unwrap().push(call);
    }
}

#[async_trait]
impl CompletionModel for MockModel {
    async fn complete(&self, instruction: &str) -> Result<String> {
        self.record(ModelCall::Complete {
            instruction: instruction.to_string(),
        });
        let turn = self.next_turn()?;
        let payload = turn.response.map_err(PipelineError::model)?;
        Ok(match payload {
            Value::String(s) => s,
            other => other.to_string(),
        })
    }

    async fn complete_structured(&self, instruction: &str, _schema: &Value) -> Result<Value> {
        self.record(ModelCall::Structured {
            instruction: instruction.to_string(),
        });
        let turn = self.next_turn()?;
        turn.response.map_err(PipelineError::model)
    }

    async fn complete_with_tools(
        &self,
        instruction: &str,
        tools: &ToolSet,
        _schema: &Value,
    ) -> Result<Value> {
        self.record(ModelCall::WithTools {
            instruction: instruction.to_string(),
        });
        let turn = self.next_turn()?;
        for (name, args) in turn.tool_calls {
            // A tool error aborts the completion, like a real loop.
            tools.dispatch(&name, args).await?;
        }
        turn.response.map_err(PipelineError::model)
    }
}

/// Scripted web searcher.
#[derive(Default)]
pub struct MockSearcher {
    payloads: RwLock<HashMap<String, Value>>,
    failure: RwLock<Option<String>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockSearcher {
    /// Create a searcher that returns an empty result payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a payload for a query.
    pub fn with_payload(self, query: impl Into<String>, payload: Value) -> Self {
        self.payloads.write().unwrap().insert(query.into(), payload);
        self
    }

    /// Make every search call fail.
    pub fn failing(self, message: impl Into<String>) -> Self {
        *self.failure.write().unwrap() = Some(message.into());
        self
    }

    /// Queries searched so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl WebSearcher for MockSearcher {
    async fn search(&self, query: &str) -> Result<Value> {
        self.calls.write().unwrap().push(query.to_string());
        if let Some(message) = self.failure.read().unwrap().clone() {
            return Err(PipelineError::search(message));
        }
        Ok(self
            .payloads
            .read()
            .unwrap()
            .get(query)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({"results": []})))
    }
}

/// Scripted page scraper.
#[derive(Default)]
pub struct MockScraper {
    payloads: RwLock<HashMap<String, Value>>,
    failing_urls: RwLock<Vec<String>>,
    calls: Arc<RwLock<Vec<String>>>,
}

impl MockScraper {
    /// Create a scraper that returns an empty payload.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a payload for a URL.
    pub fn with_payload(self, url: impl Into<String>, payload: Value) -> Self {
        self.payloads.write().unwrap().insert(url.into(), payload);
        self
    }

    /// Make scrapes of the given URL fail.
    pub fn with_failure(self, url: impl Into<String>) -> Self {
        self.failing_urls.write().unwrap().push(url.into());
        self
    }

    /// URLs scraped so far, in order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.read().unwrap().clone()
    }
}

#[async_trait]
impl PageScraper for MockScraper {
    async fn scrape(&self, page_url: &str, _extraction_instruction: &str) -> Result<Value> {
        self.calls.write().unwrap().push(page_url.to_string());
        if self
            .failing_urls
            .read()
            .unwrap()
            .iter()
            .any(|u| u == page_url)
        {
            return Err(PipelineError::scrape(format!("failed to scrape {page_url}")));
        }
        Ok(self
            .payloads
            .read()
            .unwrap()
            .get(page_url)
            .cloned()
            .unwrap_or_else(|| serde_json::json!({})))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn mock_model_consumes_turns_in_order() {
        let model = MockModel::new()
            .with_turn(ScriptedTurn::respond(json!({"a": 1})))
            .with_turn(ScriptedTurn::respond(json!({"b": 2})));
        assert_eq!(
            model.complete_structured("first", &json!({})).await.unwrap(),
            json!({"a": 1})
        );
        assert_eq!(
            model.complete_structured("second", &json!({})).await.unwrap(),
            json!({"b": 2})
        );
        assert!(model.complete_structured("third", &json!({})).await.is_err());
        assert_eq!(model.calls().len(), 3);
    }

    #[tokio::test]
    async fn mock_searcher_records_calls() {
        let searcher = MockSearcher::new().with_payload("q1", json!({"results": [1]}));
        assert_eq!(searcher.search("q1").await.unwrap(), json!({"results": [1]}));
        assert_eq!(searcher.search("q2").await.unwrap(), json!({"results": []}));
        assert_eq!(searcher.calls(), vec!["q1", "q2"]);
    }

    #[tokio::test]
    async fn failing_searcher_errors_every_call() {
        let searcher = MockSearcher::new().failing("provider down");
        let err = searcher.search("anything").await.unwrap_err();
        assert!(matches!(err, PipelineError::Search(_)));
    }

    #[tokio::test]
    async fn mock_scraper_fails_only_scripted_urls() {
        let scraper = MockScraper::new()
            .with_payload("https://a.com", json!({"title": "A"}))
            .with_failure("https://dead.com");
        assert!(scraper.scrape("https://a.com", "i").await.is_ok());
        assert!(scraper.scrape("https://dead.com", "i").await.is_err());
    }
}
