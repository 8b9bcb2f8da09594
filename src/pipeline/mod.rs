//! End-to-end processing of one source document.
//!
//! A run submits the analysis job, polls it to a terminal status, fetches
//! every result page, extracts tables and figure captions, writes them under
//! the output root and finally publishes the document's output directories.
//!
//! # Example
//!
//! ```no_run
//! use untextract::pipeline::{Pipeline, PipelineOptions};
//! use untextract::service::aws::{AwsConfig, AwsSession};
//!
//! fn main() -> untextract::Result<()> {
//!     let session = AwsSession::connect(&AwsConfig::new().with_region("us-east-1"))?;
//!     let options = PipelineOptions::new()
//!         .with_source_bucket("scanned-reports")
//!         .with_destination_bucket("report-extracts");
//!
//!     let pipeline = Pipeline::new(session.textract(), session.s3(), options);
//!     let report = pipeline.run("annual-2023.pdf")?;
//!     println!("{} tables written", report.stats.tables_written);
//!     Ok(())
//! }
//! ```

mod options;
mod report;

pub use options::PipelineOptions;
pub use report::{ExtractionStats, RunReport};

use crate::error::{Error, Result};
use crate::extract::{extract_figures, reconstruct_tables};
use crate::model::{AnalysisPage, BlockIndex, DocumentView, JobStatus};
use crate::output::{ArtifactPaths, ArtifactWriter};
use crate::service::{
    list_documents, upload_folder, AnalysisService, CancelToken, DocumentLocation, JobPoller,
    ObjectStore, DEFAULT_DOCUMENT_SUFFIX,
};
use chrono::Utc;

/// Extract tables and figure captions from result pages and write them.
pub fn extract_pages(pages: &[AnalysisPage], paths: &ArtifactPaths) -> Result<ExtractionStats> {
    let index = BlockIndex::from_pages(pages);
    extract_index(&index, paths)
}

/// Extract tables and figure captions from an index and write them.
pub fn extract_index(index: &BlockIndex, paths: &ArtifactPaths) -> Result<ExtractionStats> {
    let writer = ArtifactWriter::new(paths.clone());
    writer.prepare()?;

    let view = DocumentView::new(index);
    let mut stats = ExtractionStats {
        page_count: view.page_count(),
        block_count: index.len(),
        table_count: view.table_count(),
        ..ExtractionStats::default()
    };

    log::debug!("Running table extraction");
    let tables = reconstruct_tables(index);
    stats.tables_written = writer.write_tables(&tables)?.len();

    log::debug!("Running image extraction");
    let figures = extract_figures(index);
    stats.figure_count = figures.len();
    stats.figures_written = writer.write_figures(&figures)?.len();
    stats.figures_skipped = stats.figure_count - stats.figures_written;

    log::info!(
        "{}: {} tables, {} figure captions written ({} figures without text)",
        paths.document(),
        stats.tables_written,
        stats.figures_written,
        stats.figures_skipped
    );
    Ok(stats)
}

/// Runs documents through analysis, extraction and upload.
pub struct Pipeline<S, O> {
    service: S,
    store: O,
    options: PipelineOptions,
    cancel: CancelToken,
}

impl<S: AnalysisService, O: ObjectStore> Pipeline<S, O> {
    /// Create a pipeline.
    pub fn new(service: S, store: O, options: PipelineOptions) -> Self {
        Self {
            service,
            store,
            options,
            cancel: CancelToken::new(),
        }
    }

    /// Use an externally owned cancellation token for job polling.
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Pipeline options.
    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// List source documents under a prefix.
    pub fn list_documents(&self, prefix: &str) -> Result<Vec<String>> {
        list_documents(
            &self.store,
            &self.options.source_bucket,
            prefix,
            DEFAULT_DOCUMENT_SUFFIX,
        )
    }

    /// Process one source document end to end.
    pub fn run(&self, document: &str) -> Result<RunReport> {
        self.options.validate()?;
        let started_at = Utc::now();
        log::info!("Running pipeline for {}", document);

        let poller = JobPoller::new(&self.service, self.options.poll.clone())
            .with_cancel_token(self.cancel.clone());
        let location = DocumentLocation::new(self.options.source_bucket.clone(), document);
        let results = poller.run(&location)?;

        let paths = ArtifactPaths::new(&self.options.output_root, document);
        if self.options.save_responses {
            ArtifactWriter::new(paths.clone()).save_responses(&results.pages)?;
        }

        match results.status {
            JobStatus::Failed if self.options.fail_on_job_failure => {
                return Err(Error::JobFailed {
                    job_id: results.job_id,
                    message: results
                        .status_message
                        .unwrap_or_else(|| "no status message".to_string()),
                });
            }
            JobStatus::Failed => log::warn!(
                "Job {} failed; extracting from {} result pages anyway",
                results.job_id,
                results.pages.len()
            ),
            JobStatus::PartialSuccess => log::warn!(
                "Job {} only partially succeeded: {}",
                results.job_id,
                results.status_message.as_deref().unwrap_or("no status message")
            ),
            _ => {}
        }

        let index = BlockIndex::from_pages(&results.pages);
        let stats = extract_index(&index, &paths)?;

        let uploaded = if self.options.upload {
            self.publish(&paths)?
        } else {
            Vec::new()
        };

        log::info!("Pipeline run complete for {}", document);
        Ok(RunReport {
            document: document.to_string(),
            job_id: results.job_id,
            status: results.status,
            result_pages: results.pages.len(),
            stats,
            uploaded,
            started_at,
            finished_at: Utc::now(),
        })
    }

    /// Upload the content and metadata directories of a document.
    pub fn publish(&self, paths: &ArtifactPaths) -> Result<Vec<String>> {
        let mut uploaded = Vec::new();
        for target in paths.upload_targets() {
            log::debug!(
                "Uploading {} to {}/{}",
                target.local_dir.display(),
                self.options.destination_bucket,
                target.key_prefix
            );
            uploaded.extend(upload_folder(
                &self.store,
                &self.options.destination_bucket,
                &target.local_dir,
                &target.key_prefix,
            )?);
        }
        Ok(uploaded)
    }
}
