//! Block graph model for analysis service output.
//!
//! The service returns a flat list of typed blocks linked by identifier.
//! [`BlockIndex`] makes those blocks addressable, [`DocumentView`] derives the
//! page/table/figure structure from the index, and [`TableGrid`] holds the
//! rectangular cell texts of one reconstructed table.

mod block;
mod document;
mod index;
mod page;
mod table;

pub use block::{Block, BlockType, Relationship, RelationshipType, SelectionStatus};
pub use document::{DocumentView, PageView};
pub use index::BlockIndex;
pub use page::{pages_from_json, pages_from_values, AnalysisPage, JobStatus};
pub use table::{TableGrid, CELL_DELIMITER};
