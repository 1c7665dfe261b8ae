//! Tool invokers - callable bridges from a reasoning step to external I/O.
//!
//! A [`Tool`] is a named function the model may call mid-completion. The
//! orchestrator supplies each stage an allowlist ([`ToolSet`]); it never
//! scripts individual calls. Tools keep no local state between
//! invocations, within or across stages.

use futures::future::BoxFuture;

use crate::error::{PipelineError, Result};

mod scrape;
mod search;

pub use scrape::scrape_tool;
pub use search::search_tool;

/// Async handler behind a tool: raw JSON arguments in, raw payload out.
pub type ToolHandler =
    Box<dyn Fn(serde_json::Value) -> BoxFuture<'static, Result<serde_json::Value>> + Send + Sync>;

/// A named, callable wrapper around an external capability.
pub struct Tool {
    name: &'static str,
    description: &'static str,
    parameters: serde_json::Value,
    handler: ToolHandler,
}

impl Tool {
    /// Create a tool from its wire-visible signature and handler.
    pub fn new(
        name: &'static str,
        description: &'static str,
        parameters: serde_json::Value,
        handler: ToolHandler,
    ) -> Self {
        Self {
            name,
            description,
            parameters,
            handler,
        }
    }

    /// Tool name, as the model addresses it.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Function-calling definition in the provider wire format.
    pub fn definition(&self) -> serde_json::Value {
        serde_json::json!({
            "type": "function",
            "function": {
                "name": self.name,
                "description": self.description,
                "parameters": self.parameters,
            }
        })
    }
}

impl std::fmt::Debug for Tool {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Tool").field("name", &self.name).finish()
    }
}

/// The allowlist of tools a stage's capability may invoke.
#[derive(Debug, Default)]
pub struct ToolSet {
    tools: Vec<Tool>,
}

impl ToolSet {
    /// Create an empty tool set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a tool.
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// True when no tools are registered.
    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Function-calling definitions for every tool in the set.
    pub fn definitions(&self) -> Vec<serde_json::Value> {
        self.tools.iter().map(Tool::definition).collect()
    }

    /// Invoke a tool by name with raw JSON arguments.
    ///
    /// A request for a tool outside the allowlist is a model error: the
    /// capability asked for something the stage never offered.
    pub async fn dispatch(&self, name: &str, args: serde_json::Value) -> Result<serde_json::Value> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name == name)
            .ok_or_else(|| PipelineError::model(format!("model requested unknown tool '{name}'")))?;

        tracing::debug!(tool = name, "dispatching tool call");
        (tool.handler)(args).await
    }
}
