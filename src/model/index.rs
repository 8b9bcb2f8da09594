//! Identifier-addressed block index.

use super::{AnalysisPage, Block, BlockType};
use crate::error::Result;
use std::collections::{HashMap, HashSet};

/// All blocks of one document, addressable by identifier.
///
/// Blocks are kept in encounter order across every result page. When an
/// identifier occurs twice, lookups resolve to the later block. Every text
/// lookup goes through [`BlockIndex::text_of`], so a dangling reference
/// always reads as empty text.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex {
    blocks: Vec<Block>,
    by_id: HashMap<String, usize>,
}

impl BlockIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build an index by merging the blocks of every result page.
    pub fn from_pages(pages: &[AnalysisPage]) -> Self {
        let mut index = Self::new();
        for page in pages {
            index.extend(page.blocks.iter().cloned());
        }
        log::debug!(
            "Indexed {} blocks from {} result pages",
            index.len(),
            pages.len()
        );
        index
    }

    /// Build an index from owned result pages without cloning blocks.
    pub fn from_owned_pages(pages: Vec<AnalysisPage>) -> Self {
        let mut index = Self::new();
        for page in pages {
            index.extend(page.blocks);
        }
        index
    }

    /// Parse JSON result pages and build an index (fail-fast on malformed blocks).
    pub fn from_json(text: &str) -> Result<Self> {
        let pages = super::pages_from_json(text)?;
        Ok(Self::from_owned_pages(pages))
    }

    /// Add a block to the index.
    pub fn insert(&mut self, block: Block) {
        let position = self.blocks.len();
        self.by_id.insert(block.id.clone(), position);
        self.blocks.push(block);
    }

    /// Look up a block by identifier.
    pub fn get(&self, id: &str) -> Option<&Block> {
        self.by_id.get(id).map(|&i| &self.blocks[i])
    }

    /// Text of the referenced block; empty when the block is missing or has no text.
    pub fn text_of(&self, id: &str) -> &str {
        match self.get(id) {
            Some(block) => block.text_or_empty(),
            None => {
                log::debug!("Unresolved block reference {}", id);
                ""
            }
        }
    }

    /// Resolved CHILD blocks of a block, in relationship order.
    ///
    /// Unresolved identifiers are skipped.
    pub fn children<'a>(&'a self, block: &'a Block) -> impl Iterator<Item = &'a Block> + 'a {
        block.child_ids().filter_map(move |id| {
            let child = self.get(id);
            if child.is_none() {
                log::debug!("Block {} references missing child {}", block.id, id);
            }
            child
        })
    }

    /// Child texts of a block joined with single spaces, in relationship order.
    pub fn joined_child_text(&self, block: &Block) -> String {
        block
            .child_ids()
            .map(|id| self.text_of(id))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// All blocks in encounter order (duplicates included).
    pub fn iter(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter()
    }

    /// Blocks of one kind, one per identifier.
    ///
    /// Identifiers are ordered by first occurrence and resolve to their
    /// latest block, like [`BlockIndex::get`].
    pub fn of_type(&self, block_type: BlockType) -> impl Iterator<Item = &Block> {
        let mut seen = HashSet::new();
        self.blocks
            .iter()
            .filter(move |b| b.block_type == block_type && seen.insert(b.id.as_str()))
            .filter_map(move |b| self.get(&b.id))
            .filter(move |b| b.block_type == block_type)
    }

    /// Figure blocks in encounter order.
    pub fn figures(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.is_figure())
    }

    /// Number of indexed blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Check if the index holds no blocks.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

impl Extend<Block> for BlockIndex {
    fn extend<T: IntoIterator<Item = Block>>(&mut self, iter: T) {
        for block in iter {
            self.insert(block);
        }
    }
}

impl FromIterator<Block> for BlockIndex {
    fn from_iter<T: IntoIterator<Item = Block>>(iter: T) -> Self {
        let mut index = Self::new();
        index.extend(iter);
        index
    }
}
