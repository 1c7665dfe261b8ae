//! Typed errors for the job search pipeline.
//!
//! Uses `thiserror` for library errors (not `anyhow`) so callers can tell
//! a contract rejection apart from a collaborator outage or a disk failure.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can abort a pipeline run.
///
/// Every variant is fatal for the run: there is no retry transition and no
/// partial-success mode. Earlier stage artifacts stay on disk as a
/// diagnostic trail.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Missing or invalid input parameter, credential, or template binding.
    ///
    /// Raised before any stage executes.
    #[error("configuration error: {reason}")]
    Config { reason: String },

    /// A stage's raw output failed its schema contract.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The language model backend failed or returned something unusable.
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The search provider failed.
    #[error("search provider error: {0}")]
    Search(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// The scraping provider failed.
    #[error("scrape provider error: {0}")]
    Scrape(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// An artifact could not be written to its target location.
    #[error("failed to persist artifact {path}: {source}")]
    Persistence {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// JSON (de)serialization error outside contract validation.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl PipelineError {
    /// Configuration error from a reason string.
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }

    /// Model collaborator error.
    pub fn model(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Model(source.into())
    }

    /// Search collaborator error.
    pub fn search(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Search(source.into())
    }

    /// Scrape collaborator error.
    pub fn scrape(source: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        Self::Scrape(source.into())
    }
}

/// A schema contract rejection with per-field violations.
///
/// Carries the contract name and every violated constraint so the failure
/// surfaces as "which contract, which field" rather than a generic parse
/// error.
#[derive(Debug, Error)]
#[error("contract '{contract}' rejected: {}", .violations.iter().map(|v| v.to_string()).collect::<Vec<_>>().join("; "))]
pub struct ValidationError {
    /// Name of the violated contract.
    pub contract: String,

    /// The specific constraints that failed.
    pub violations: Vec<Violation>,
}

impl ValidationError {
    /// Create a new validation error.
    pub fn new(contract: impl Into<String>, violations: Vec<Violation>) -> Self {
        Self {
            contract: contract.into(),
            violations,
        }
    }
}

/// A single violated constraint within a contract.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Field (or path) the constraint applies to.
    pub field: String,

    /// Human-readable description of the violated constraint.
    pub constraint: String,
}

impl Violation {
    /// Create a new violation.
    pub fn new(field: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            constraint: constraint.into(),
        }
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.constraint)
    }
}

/// Result type alias for pipeline operations.
pub type Result<T> = std::result::Result<T, PipelineError>;
