//! Figure caption extraction.

use crate::model::BlockIndex;

/// One figure block found while scanning the result pages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedFigure {
    /// Position among all figure blocks of the document (0-indexed)
    pub scan_index: usize,

    /// Page number (figure page attribute + 1)
    pub page_number: u32,

    /// Identifier of the figure block
    pub block_id: String,

    /// CHILD identifiers in relationship order
    pub child_ids: Vec<String>,

    /// Space-joined child texts; `None` when the figure has no children
    pub caption: Option<String>,
}

impl ExtractedFigure {
    /// Check if the figure produces an artifact.
    pub fn has_caption(&self) -> bool {
        self.caption.is_some()
    }
}

/// Collect every figure of a document with its caption text.
///
/// Figures keep their encounter order across result pages; the scan index
/// counts all figures, including those without children.
pub fn extract_figures(index: &BlockIndex) -> Vec<ExtractedFigure> {
    index
        .figures()
        .enumerate()
        .map(|(scan_index, block)| {
            let caption = if block.has_children() {
                Some(index.joined_child_text(block))
            } else {
                log::debug!("Figure {} ({}) has no child blocks", scan_index, block.id);
                None
            };

            ExtractedFigure {
                scan_index,
                page_number: block.page.unwrap_or(0).saturating_add(1),
                block_id: block.id.clone(),
                child_ids: block.child_ids().map(str::to_string).collect(),
                caption,
            }
        })
        .collect()
}
