//! Result pages and job status.

use super::Block;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of an analysis job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Accepted but not yet reported by the service
    Submitted,
    /// Still running
    InProgress,
    /// Finished successfully
    Succeeded,
    /// Finished with an error
    Failed,
    /// Finished, but some pages could not be analysed
    PartialSuccess,
}

impl JobStatus {
    /// Parse a service status name such as `"IN_PROGRESS"`.
    pub fn from_name(name: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(name.to_string())).ok()
    }

    /// Service name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            JobStatus::Submitted => "SUBMITTED",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::PartialSuccess => "PARTIAL_SUCCESS",
        }
    }

    /// Check if the job will not change status anymore.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Submitted | JobStatus::InProgress)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One page of analysis output, as returned by a single result request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct AnalysisPage {
    /// Job status at the time of the request
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_status: Option<JobStatus>,

    /// Blocks carried by this page
    #[serde(default)]
    pub blocks: Vec<Block>,

    /// Continuation token for the next page
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,

    /// Human readable status detail
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status_message: Option<String>,
}

impl AnalysisPage {
    /// Create a page from blocks.
    pub fn new(blocks: Vec<Block>) -> Self {
        Self {
            blocks,
            ..Self::default()
        }
    }

    /// Create a page that only carries a status.
    pub fn status(status: JobStatus) -> Self {
        Self {
            job_status: Some(status),
            ..Self::default()
        }
    }

    /// Set job status and return self.
    pub fn with_status(mut self, status: JobStatus) -> Self {
        self.job_status = Some(status);
        self
    }

    /// Set continuation token and return self.
    pub fn with_next_token(mut self, token: impl Into<String>) -> Self {
        self.next_token = Some(token.into());
        self
    }
}

/// Parse result pages from JSON text.
///
/// Accepts either a single page object or an array of pages. Any block
/// without an `Id` or `BlockType` fails the whole input.
pub fn pages_from_json(text: &str) -> Result<Vec<AnalysisPage>> {
    let value: serde_json::Value = serde_json::from_str(text)
        .map_err(|e| Error::MalformedBlockGraph(format!("invalid JSON: {}", e)))?;

    match value {
        serde_json::Value::Array(items) => pages_from_values(items),
        other => pages_from_values(vec![other]),
    }
}

/// Parse result pages from already-decoded JSON values.
pub fn pages_from_values(values: Vec<serde_json::Value>) -> Result<Vec<AnalysisPage>> {
    values
        .into_iter()
        .enumerate()
        .map(|(i, value)| {
            serde_json::from_value::<AnalysisPage>(value)
                .map_err(|e| Error::MalformedBlockGraph(format!("result page {}: {}", i + 1, e)))
        })
        .collect()
}
