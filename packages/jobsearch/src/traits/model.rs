//! Completion model trait - the capability behind every stage.

use async_trait::async_trait;

use crate::error::Result;
use crate::tools::ToolSet;

/// The language-model backend a stage binds to.
///
/// Implementations wrap a specific provider and handle its wire format.
/// All three methods are blocking from the orchestrator's point of view:
/// a stage suspends until the completion (including any nested tool
/// round trips) fully resolves.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    /// Free-form completion. Used by the report stage.
    async fn complete(&self, instruction: &str) -> Result<String>;

    /// Structured completion conforming to the given JSON schema.
    async fn complete_structured(
        &self,
        instruction: &str,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value>;

    /// Structured completion with an allowlist of callable tools.
    ///
    /// The model may invoke tools from the set any number of times before
    /// returning its final answer; the number and order of calls is the
    /// model's own decision, bounded only by the implementation's internal
    /// iteration limit. Each tool invocation suspends the completion until
    /// the tool returns, then resumes with the payload in context.
    async fn complete_with_tools(
        &self,
        instruction: &str,
        tools: &ToolSet,
        schema: &serde_json::Value,
    ) -> Result<serde_json::Value>;
}
