//! External collaborators: the analysis service and the object store.
//!
//! Both are traits so the pipeline can run against the AWS backends
//! (feature `aws`) or against in-memory implementations in tests.

mod poller;
mod storage;

#[cfg(feature = "aws")]
pub mod aws;

pub use poller::{CancelToken, JobPoller, JobResults, PollOptions};
pub use storage::{list_documents, upload_folder, DEFAULT_DOCUMENT_SUFFIX};

use crate::error::Result;
use crate::model::AnalysisPage;
use std::path::Path;

/// Location of a source document in object storage.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentLocation {
    /// Bucket name
    pub bucket: String,

    /// Object key
    pub name: String,
}

impl DocumentLocation {
    /// Create a document location.
    pub fn new(bucket: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            name: name.into(),
        }
    }
}

/// Asynchronous document analysis service.
///
/// Analysis is requested for tables and layout.
pub trait AnalysisService {
    /// Start an analysis job and return its identifier.
    fn start_analysis(&self, location: &DocumentLocation) -> Result<String>;

    /// Fetch job status and one page of results.
    ///
    /// `next_token` selects a continuation page; `None` requests the first.
    fn get_analysis(&self, job_id: &str, next_token: Option<&str>) -> Result<AnalysisPage>;
}

/// Object storage.
pub trait ObjectStore {
    /// List object keys under a prefix, following pagination.
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>>;

    /// Upload a local file to a bucket/key.
    fn upload_file(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()>;
}

impl<T: AnalysisService + ?Sized> AnalysisService for &T {
    fn start_analysis(&self, location: &DocumentLocation) -> Result<String> {
        (**self).start_analysis(location)
    }

    fn get_analysis(&self, job_id: &str, next_token: Option<&str>) -> Result<AnalysisPage> {
        (**self).get_analysis(job_id, next_token)
    }
}

impl<T: ObjectStore + ?Sized> ObjectStore for &T {
    fn list_keys(&self, bucket: &str, prefix: &str) -> Result<Vec<String>> {
        (**self).list_keys(bucket, prefix)
    }

    fn upload_file(&self, local_path: &Path, bucket: &str, key: &str) -> Result<()> {
        (**self).upload_file(local_path, bucket, key)
    }
}
