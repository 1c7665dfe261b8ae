//! Stage artifact types.
//!
//! One canonical type per stage output. The serde shape and the schemars
//! schema both derive from these definitions, so the validator and the
//! shape-description embedded in stage instructions can never drift apart.

pub mod job;
pub mod query;
pub mod search;

pub use job::{ExtractedJob, ExtractedJobs, JobSpecEntry};
pub use query::{SearchQuery, SuggestedQueries};
pub use search::{SearchHit, SearchHits, MIN_SEARCH_HITS};
