//! Pipeline options and configuration.

use crate::error::{Error, Result};
use crate::output::DEFAULT_OUTPUT_ROOT;
use crate::service::PollOptions;
use std::path::PathBuf;

/// Options for an end-to-end pipeline run.
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Local directory that receives artifacts
    pub output_root: PathBuf,

    /// Bucket holding the source documents
    pub source_bucket: String,

    /// Bucket receiving the artifacts
    pub destination_bucket: String,

    /// Save raw result pages next to the artifacts
    pub save_responses: bool,

    /// Upload artifacts after extraction
    pub upload: bool,

    /// Abort when the job ends FAILED instead of extracting whatever was returned
    pub fail_on_job_failure: bool,

    /// Polling behaviour
    pub poll: PollOptions,
}

impl PipelineOptions {
    /// Create new pipeline options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the local output root.
    pub fn with_output_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.output_root = root.into();
        self
    }

    /// Set the source bucket.
    pub fn with_source_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.source_bucket = bucket.into();
        self
    }

    /// Set the destination bucket.
    pub fn with_destination_bucket(mut self, bucket: impl Into<String>) -> Self {
        self.destination_bucket = bucket.into();
        self
    }

    /// Enable or disable saving raw result pages.
    pub fn with_saved_responses(mut self, save: bool) -> Self {
        self.save_responses = save;
        self
    }

    /// Enable or disable uploading.
    pub fn with_upload(mut self, upload: bool) -> Self {
        self.upload = upload;
        self
    }

    /// Choose whether a FAILED job aborts the run.
    pub fn with_fail_on_job_failure(mut self, fail: bool) -> Self {
        self.fail_on_job_failure = fail;
        self
    }

    /// Set polling options.
    pub fn with_poll_options(mut self, poll: PollOptions) -> Self {
        self.poll = poll;
        self
    }

    /// Check that the options describe a runnable pipeline.
    pub fn validate(&self) -> Result<()> {
        if self.source_bucket.is_empty() {
            return Err(Error::Config("source bucket is not set".to_string()));
        }
        if self.upload && self.destination_bucket.is_empty() {
            return Err(Error::Config("destination bucket is not set".to_string()));
        }
        Ok(())
    }
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            output_root: PathBuf::from(DEFAULT_OUTPUT_ROOT),
            source_bucket: String::new(),
            destination_bucket: String::new(),
            save_responses: false,
            upload: true,
            fail_on_job_failure: true,
            poll: PollOptions::default(),
        }
    }
}
