//! Run reports and extraction statistics.

use crate::model::JobStatus;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Statistics collected while extracting one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Number of PAGE blocks
    pub page_count: u32,

    /// Number of indexed blocks
    pub block_count: usize,

    /// Number of TABLE blocks reachable from pages
    pub table_count: usize,

    /// Number of tables written
    pub tables_written: usize,

    /// Number of figure blocks
    pub figure_count: usize,

    /// Number of captions written
    pub figures_written: usize,

    /// Number of figures skipped for having no child blocks
    pub figures_skipped: usize,
}

impl ExtractionStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total artifacts written.
    pub fn artifacts_written(&self) -> usize {
        self.tables_written + self.figures_written
    }
}

/// Outcome of one pipeline run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Source document name
    pub document: String,

    /// Analysis job identifier
    pub job_id: String,

    /// Terminal job status
    pub status: JobStatus,

    /// Number of result pages fetched
    pub result_pages: usize,

    /// Extraction statistics
    pub stats: ExtractionStats,

    /// Object keys uploaded
    pub uploaded: Vec<String>,

    /// Run start
    pub started_at: DateTime<Utc>,

    /// Run end
    pub finished_at: DateTime<Utc>,
}

impl RunReport {
    /// Wall-clock duration of the run.
    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_artifacts_written() {
        let stats = ExtractionStats {
            tables_written: 2,
            figures_written: 3,
            ..Default::default()
        };
        assert_eq!(stats.artifacts_written(), 5);
    }

    #[test]
    fn test_report_duration() {
        let started_at = Utc::now();
        let report = RunReport {
            document: "doc.pdf".to_string(),
            job_id: "j".to_string(),
            status: JobStatus::Succeeded,
            result_pages: 1,
            stats: ExtractionStats::new(),
            uploaded: Vec::new(),
            started_at,
            finished_at: started_at + chrono::Duration::seconds(3),
        };
        assert_eq!(report.duration().num_seconds(), 3);
    }
}
