//! Stage 3 artifact: structured job details extracted from posting pages.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// An arbitrary named attribute of a posting (seniority, remote policy, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct JobSpecEntry {
    /// Attribute name.
    pub name: String,

    /// Attribute value.
    pub value: String,
}

/// One job posting extracted from a scraped page.
///
/// `salary` is the only optional field; postings often omit it. Every
/// other field is required by the stage contract.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedJob {
    /// URL of the page the details were scraped from.
    pub source_url: String,

    /// Job title.
    pub title: String,

    /// Hiring company.
    pub company: String,

    /// Posting location.
    pub location: String,

    /// Direct link to the posting.
    pub posting_url: String,

    /// Date the job was posted, as shown on the page.
    pub posting_date: String,

    /// Salary if the posting discloses one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub salary: Option<String>,

    /// Up to a handful of notable attributes.
    pub specs: Vec<JobSpecEntry>,

    /// Recommendation rank, a small positive ordinal for report sorting.
    pub rank: i64,

    /// Recommendation notes for the candidate.
    pub notes: Vec<String>,
}

/// The validated stage 3 artifact.
///
/// Not necessarily 1:1 with stage 2 results; a scrape may fail or be
/// skipped, in which case the result is simply absent here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct ExtractedJobs {
    /// Extracted postings.
    pub jobs: Vec<ExtractedJob>,
}
