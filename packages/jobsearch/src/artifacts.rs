//! Stage artifact persistence.
//!
//! Four fixed, stage-indexed paths in one output directory. Every run
//! overwrites the prior run's files; there is no versioning and no
//! cleanup of earlier artifacts when a later stage fails, so a failed
//! run leaves a diagnostic trail on disk.

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PipelineError, Result};

/// Stage 1 artifact file name.
pub const STEP_1_FILE: &str = "step_1_suggested_queries.json";

/// Stage 2 artifact file name.
pub const STEP_2_FILE: &str = "step_2_search_hits.json";

/// Stage 3 artifact file name.
pub const STEP_3_FILE: &str = "step_3_extracted_jobs.json";

/// Stage 4 artifact file name.
pub const STEP_4_FILE: &str = "step_4_recruitment_report.html";

/// Writes validated stage artifacts to a fixed output directory.
///
/// Directory creation is the caller's setup concern; the store assumes
/// the directory exists and surfaces write failures as persistence
/// errors.
#[derive(Debug, Clone)]
pub struct ArtifactStore {
    dir: PathBuf,
}

impl ArtifactStore {
    /// Create a store over the given output directory.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The output directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Full path for a stage artifact file.
    pub fn path_for(&self, file: &str) -> PathBuf {
        self.dir.join(file)
    }

    /// Persist a validated artifact as pretty-printed JSON.
    pub fn write_json<T: Serialize>(&self, file: &str, artifact: &T) -> Result<PathBuf> {
        let contents = serde_json::to_string_pretty(artifact)?;
        self.write_text(file, &contents)
    }

    /// Persist a rendered document as-is.
    pub fn write_text(&self, file: &str, contents: &str) -> Result<PathBuf> {
        let path = self.path_for(file);
        std::fs::write(&path, contents).map_err(|source| PipelineError::Persistence {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}
