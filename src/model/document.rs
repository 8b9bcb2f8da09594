//! Page/table/figure view over a block index.

use super::{Block, BlockIndex, BlockType};

/// Document structure derived from a [`BlockIndex`].
///
/// Pages are the distinct PAGE blocks in order of first appearance, numbered
/// from 1. A PAGE repeated in a later result page is the same page. The view
/// borrows every block from the index.
#[derive(Debug, Clone)]
pub struct DocumentView<'a> {
    /// Pages in the document
    pub pages: Vec<PageView<'a>>,
}

impl<'a> DocumentView<'a> {
    /// Derive the page structure from an index.
    pub fn new(index: &'a BlockIndex) -> Self {
        let pages = index
            .of_type(BlockType::Page)
            .enumerate()
            .map(|(i, page)| PageView::new(index, page, i as u32 + 1))
            .collect();
        Self { pages }
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.pages.len() as u32
    }

    /// Get a page by number (1-indexed).
    pub fn get_page(&self, page_num: u32) -> Option<&PageView<'a>> {
        if page_num == 0 {
            return None;
        }
        self.pages.get((page_num - 1) as usize)
    }

    /// Total number of tables across pages.
    pub fn table_count(&self) -> usize {
        self.pages.iter().map(|p| p.tables.len()).sum()
    }

    /// Total number of figures across pages.
    pub fn figure_count(&self) -> usize {
        self.pages.iter().map(|p| p.figures.len()).sum()
    }

    /// Check if the document has any pages.
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }
}

/// One page of a [`DocumentView`].
#[derive(Debug, Clone)]
pub struct PageView<'a> {
    /// Page number (1-indexed)
    pub number: u32,

    /// The PAGE block
    pub block: &'a Block,

    /// TABLE children in relationship order
    pub tables: Vec<&'a Block>,

    /// Figure children in relationship order
    pub figures: Vec<&'a Block>,
}

impl<'a> PageView<'a> {
    fn new(index: &'a BlockIndex, block: &'a Block, number: u32) -> Self {
        let mut tables = Vec::new();
        let mut figures = Vec::new();
        for child in index.children(block) {
            match child.block_type {
                BlockType::Table => tables.push(child),
                t if t.is_figure() => figures.push(child),
                _ => {}
            }
        }
        Self {
            number,
            block,
            tables,
            figures,
        }
    }

    /// Check if the page has no tables and no figures.
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty() && self.figures.is_empty()
    }
}
