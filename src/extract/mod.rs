//! Extraction passes over a block index.
//!
//! Both passes are read-only over the index and independent of each other:
//! [`reconstruct_tables`] walks pages, tables, rows and cells, while
//! [`extract_figures`] scans figure blocks and joins their child text.

mod figures;
mod tables;

pub use figures::{extract_figures, ExtractedFigure};
pub use tables::{cell_text, reconstruct_tables, table_rows, ExtractedTable};
