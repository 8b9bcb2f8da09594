//! Writing artifacts and metadata to disk.

use super::{ArtifactKind, ArtifactLocation, ArtifactMetadata, ArtifactPaths};
use crate::error::Result;
use crate::extract::{ExtractedFigure, ExtractedTable};
use crate::model::AnalysisPage;
use crate::render::{table_to_html, to_json, JsonFormat};
use std::fs;
use std::path::{Path, PathBuf};

/// Writes the artifacts of one document.
///
/// Content and metadata are written as two separate files; a failure between
/// the two leaves the content file without metadata.
#[derive(Debug, Clone)]
pub struct ArtifactWriter {
    paths: ArtifactPaths,
}

impl ArtifactWriter {
    /// Create a writer for a path layout.
    pub fn new(paths: ArtifactPaths) -> Self {
        Self { paths }
    }

    /// Path layout used by this writer.
    pub fn paths(&self) -> &ArtifactPaths {
        &self.paths
    }

    /// Create the content and metadata directories of every artifact kind.
    pub fn prepare(&self) -> Result<()> {
        for kind in ArtifactKind::all() {
            fs::create_dir_all(self.paths.content_dir(kind))?;
            fs::create_dir_all(self.paths.metadata_dir(kind))?;
        }
        Ok(())
    }

    /// Write one artifact and its metadata record.
    pub fn write(&self, location: &ArtifactLocation, content: &str) -> Result<()> {
        write_file(&location.content_path, content)?;

        let metadata = ArtifactMetadata::new(
            location.filename.clone(),
            location.page_number,
            self.paths.document(),
        );
        write_file(&location.metadata_path, &metadata.to_json()?)?;

        log::debug!("Wrote {}", location.content_path.display());
        Ok(())
    }

    /// Write every table as HTML.
    pub fn write_tables(&self, tables: &[ExtractedTable]) -> Result<Vec<ArtifactLocation>> {
        let mut written = Vec::with_capacity(tables.len());
        for table in tables {
            let location = self.paths.table(table.page_number, table.index);
            self.write(&location, &table_to_html(&table.grid))?;
            written.push(location);
        }
        Ok(written)
    }

    /// Write the caption of every figure that has child blocks.
    ///
    /// Figures without children produce neither a caption nor metadata.
    pub fn write_figures(&self, figures: &[ExtractedFigure]) -> Result<Vec<ArtifactLocation>> {
        let mut written = Vec::new();
        for figure in figures {
            let Some(caption) = &figure.caption else {
                continue;
            };
            let location = self.paths.figure(figure.page_number, figure.scan_index);
            self.write(&location, caption)?;
            written.push(location);
        }
        Ok(written)
    }

    /// Save raw result pages as JSON, one file per page.
    pub fn save_responses(&self, pages: &[AnalysisPage]) -> Result<Vec<PathBuf>> {
        let mut saved = Vec::with_capacity(pages.len());
        for (i, page) in pages.iter().enumerate() {
            let path = self.paths.response_path(i + 1);
            write_file(&path, &to_json(page, JsonFormat::Compact)?)?;
            saved.push(path);
        }
        log::debug!(
            "Saved {} result pages under {}",
            saved.len(),
            self.paths.responses_dir().display()
        );
        Ok(saved)
    }
}

fn write_file(path: &Path, content: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, content)?;
    Ok(())
}
