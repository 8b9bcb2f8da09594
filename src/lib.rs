//! # untextract
//!
//! Table and figure-caption extraction from AWS Textract document analysis.
//!
//! Textract returns a document as a flat list of typed blocks linked by
//! identifier. This library indexes those blocks, rebuilds tables and figure
//! captions from them, writes the results as HTML/text artifacts with JSON
//! metadata, and drives the whole job from submission to upload.
//!
//! ## Quick Start
//!
//! ```no_run
//! use untextract::{extract_file, ArtifactPaths};
//!
//! fn main() -> untextract::Result<()> {
//!     // Extract from result pages saved earlier
//!     let paths = ArtifactPaths::with_default_root("annual-2023.pdf");
//!     let stats = extract_file("responses.json", &paths)?;
//!     println!("{} tables, {} captions", stats.tables_written, stats.figures_written);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Table reconstruction**: rows and cells from the block graph, empty
//!   columns dropped, rendered as bare HTML tables
//! - **Figure captions**: child text of every layout figure, in scan order
//! - **Deterministic output**: one path layout, metadata record per artifact
//! - **Job polling**: bounded and cancellable waits, full result pagination
//! - **AWS backends** (feature `aws`): Textract and S3 behind small traits

pub mod error;
pub mod extract;
pub mod model;
pub mod output;
pub mod pipeline;
pub mod render;
pub mod service;

// Re-export commonly used types
pub use error::{Error, Result};
pub use extract::{extract_figures, reconstruct_tables, ExtractedFigure, ExtractedTable};
pub use model::{
    pages_from_json, AnalysisPage, Block, BlockIndex, BlockType, DocumentView, JobStatus,
    TableGrid,
};
pub use output::{ArtifactMetadata, ArtifactPaths, ArtifactWriter};
pub use pipeline::{extract_index, extract_pages, ExtractionStats, Pipeline, PipelineOptions, RunReport};
pub use render::{table_to_html, JsonFormat};
pub use service::{AnalysisService, CancelToken, JobPoller, ObjectStore, PollOptions};

use std::fs;
use std::path::Path;

/// Read saved result pages from a JSON file.
///
/// The file holds either one `GetDocumentAnalysis` response or an array of
/// them in continuation order.
///
/// # Example
///
/// ```no_run
/// use untextract::parse_responses_file;
///
/// let pages = parse_responses_file("responses.json").unwrap();
/// println!("Result pages: {}", pages.len());
/// ```
pub fn parse_responses_file<P: AsRef<Path>>(path: P) -> Result<Vec<AnalysisPage>> {
    let text = fs::read_to_string(path)?;
    pages_from_json(&text)
}

/// Build a block index from one or more saved response files.
///
/// Files are merged in the order given; a block appearing twice resolves to
/// the later copy.
pub fn index_files<P: AsRef<Path>>(paths: &[P]) -> Result<BlockIndex> {
    let mut pages = Vec::new();
    for path in paths {
        pages.extend(parse_responses_file(path)?);
    }
    Ok(BlockIndex::from_owned_pages(pages))
}

/// Extract tables and figure captions from a saved response file.
///
/// # Arguments
///
/// * `path` - JSON file with one response or an array of responses
/// * `paths` - Output layout for the source document
///
/// # Example
///
/// ```no_run
/// use untextract::{extract_file, ArtifactPaths};
///
/// let paths = ArtifactPaths::new("/tmp/out", "scan.pdf");
/// let stats = extract_file("scan.json", &paths).unwrap();
/// assert_eq!(stats.figures_skipped + stats.figures_written, stats.figure_count);
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P, paths: &ArtifactPaths) -> Result<ExtractionStats> {
    let index = index_files(&[path])?;
    extract_index(&index, paths)
}

/// Reconstruct the tables of a JSON response without writing anything.
pub fn tables_from_json(text: &str) -> Result<Vec<ExtractedTable>> {
    let index = BlockIndex::from_json(text)?;
    Ok(reconstruct_tables(&index))
}

/// Extract figure captions of a JSON response without writing anything.
pub fn figures_from_json(text: &str) -> Result<Vec<ExtractedFigure>> {
    let index = BlockIndex::from_json(text)?;
    Ok(extract_figures(&index))
}
