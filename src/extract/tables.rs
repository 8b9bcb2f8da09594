//! Table reconstruction from CELL blocks.

use crate::model::{Block, BlockIndex, BlockType, DocumentView, TableGrid, CELL_DELIMITER};
use std::collections::BTreeMap;

/// One table rebuilt from the block graph.
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedTable {
    /// Page number (1-indexed)
    pub page_number: u32,

    /// Position of the table within its page (0-indexed, service order)
    pub index: usize,

    /// Identifier of the TABLE block
    pub block_id: String,

    /// Cleaned grid (fully-empty columns removed)
    pub grid: TableGrid,

    /// Number of columns removed during cleanup
    pub dropped_columns: usize,
}

/// Rebuild every table of a document, page by page.
///
/// Tables without rows are left out. A table whose cells are all empty keeps
/// its rows and loses every column.
pub fn reconstruct_tables(index: &BlockIndex) -> Vec<ExtractedTable> {
    let view = DocumentView::new(index);
    let mut tables = Vec::new();

    for page in &view.pages {
        for (table_index, table) in page.tables.iter().enumerate() {
            let rows = table_rows(index, table);
            if rows.is_empty() {
                log::debug!(
                    "Skipping table {} on page {}: no rows",
                    table_index,
                    page.number
                );
                continue;
            }

            let assembled = TableGrid::from_rows(rows);
            let provisional = assembled.to_delimited(CELL_DELIMITER);
            // a single blank cell serializes to empty text
            let mut grid = if provisional.is_empty() {
                assembled
            } else {
                TableGrid::from_delimited(&provisional, CELL_DELIMITER)
            };
            let dropped_columns = grid.drop_empty_columns();

            log::debug!(
                "Table {} on page {}: {}x{} ({} empty columns dropped)",
                table_index,
                page.number,
                grid.row_count(),
                grid.column_count(),
                dropped_columns
            );

            tables.push(ExtractedTable {
                page_number: page.number,
                index: table_index,
                block_id: table.id.clone(),
                grid,
                dropped_columns,
            });
        }
    }

    tables
}

/// Cell texts of a table, grouped by row and ordered by column.
///
/// Gaps in column indices become empty cells.
pub fn table_rows(index: &BlockIndex, table: &Block) -> Vec<Vec<String>> {
    let mut rows: BTreeMap<u32, BTreeMap<u32, String>> = BTreeMap::new();

    for cell in index.children(table) {
        if cell.block_type != BlockType::Cell {
            continue;
        }
        let (Some(row), Some(column)) = (cell.row_index, cell.column_index) else {
            log::debug!("Cell {} has no grid position", cell.id);
            continue;
        };
        rows.entry(row)
            .or_default()
            .insert(column, cell_text(index, cell));
    }

    let width = rows
        .values()
        .filter_map(|cells| cells.keys().next_back().copied())
        .max()
        .unwrap_or(0) as usize;

    rows.into_values()
        .map(|mut cells| {
            (1..=width as u32)
                .map(|column| cells.remove(&column).unwrap_or_default())
                .collect()
        })
        .collect()
}

/// Text of a cell: its words, with selection elements rendered as their status.
///
/// Whitespace is collapsed so the text never contains the cell delimiter.
pub fn cell_text(index: &BlockIndex, cell: &Block) -> String {
    let parts: Vec<&str> = index
        .children(cell)
        .filter_map(|child| match child.block_type {
            BlockType::Word => Some(child.text_or_empty()),
            BlockType::SelectionElement => child.selection_status.map(|s| s.as_str()),
            _ => None,
        })
        .collect();

    parts
        .iter()
        .flat_map(|part| part.split_whitespace())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::SelectionStatus;

    fn index_of(blocks: Vec<Block>) -> BlockIndex {
        blocks.into_iter().collect()
    }

    #[test]
    fn test_cell_text_words_and_selection() {
        let index = index_of(vec![
            Block::cell("c", 1, 1).with_children(["w1", "s1", "w2"]),
            Block::word("w1", "Paid"),
            Block::new("s1", BlockType::SelectionElement).with_selection(SelectionStatus::Selected),
            Block::word("w2", "in\tfull"),
        ]);
        let cell = index.get("c").unwrap();
        assert_eq!(cell_text(&index, cell), "Paid SELECTED in full");
    }

    #[test]
    fn test_table_rows_ordered_by_position() {
        let index = index_of(vec![
            Block::new("t", BlockType::Table).with_children(["c22", "c11", "c21", "c12"]),
            Block::cell("c11", 1, 1).with_children(["a"]),
            Block::cell("c12", 1, 2).with_children(["b"]),
            Block::cell("c21", 2, 1).with_children(["c"]),
            Block::cell("c22", 2, 2),
            Block::word("a", "A"),
            Block::word("b", "B"),
            Block::word("c", "C"),
        ]);
        let rows = table_rows(&index, index.get("t").unwrap());
        assert_eq!(rows, vec![vec!["A", "B"], vec!["C", ""]]);
    }

    #[test]
    fn test_table_rows_fill_column_gaps() {
        let index = index_of(vec![
            Block::new("t", BlockType::Table).with_children(["c11", "c13"]),
            Block::cell("c11", 1, 1).with_children(["a"]),
            Block::cell("c13", 1, 3).with_children(["b"]),
            Block::word("a", "A"),
            Block::word("b", "B"),
        ]);
        let rows = table_rows(&index, index.get("t").unwrap());
        assert_eq!(rows, vec![vec!["A", "", "B"]]);
    }

    #[test]
    fn test_reconstruct_drops_empty_column() {
        let index = index_of(vec![
            Block::new("p", BlockType::Page).with_children(["t"]),
            Block::new("t", BlockType::Table)
                .with_children(["c11", "c12", "c13", "c21", "c22", "c23"]),
            Block::cell("c11", 1, 1).with_children(["w1"]),
            Block::cell("c12", 1, 2),
            Block::cell("c13", 1, 3).with_children(["w2"]),
            Block::cell("c21", 2, 1).with_children(["w3"]),
            Block::cell("c22", 2, 2),
            Block::cell("c23", 2, 3).with_children(["w4"]),
            Block::word("w1", "Name"),
            Block::word("w2", "Qty"),
            Block::word("w3", "Bolt"),
            Block::word("w4", "12"),
        ]);

        let tables = reconstruct_tables(&index);
        assert_eq!(tables.len(), 1);

        let table = &tables[0];
        assert_eq!(table.page_number, 1);
        assert_eq!(table.index, 0);
        assert_eq!(table.dropped_columns, 1);
        assert_eq!(table.grid.column_count(), 2);
        assert_eq!(table.grid.row_count(), 2);
        assert_eq!(table.grid.cell(1, 1), Some("12"));
    }

    #[test]
    fn test_reconstruct_keeps_rows_of_blank_tables() {
        let index = index_of(vec![
            Block::new("p", BlockType::Page).with_children(["t1", "t2"]),
            Block::new("t1", BlockType::Table),
            Block::new("t2", BlockType::Table).with_children(["c11", "c12", "c21", "c22"]),
            Block::cell("c11", 1, 1),
            Block::cell("c12", 1, 2),
            Block::cell("c21", 2, 1),
            Block::cell("c22", 2, 2),
        ]);

        let tables = reconstruct_tables(&index);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].block_id, "t2");
        assert_eq!(tables[0].index, 1);
        assert_eq!(tables[0].grid.row_count(), 2);
        assert_eq!(tables[0].grid.column_count(), 0);
        assert_eq!(tables[0].dropped_columns, 2);
    }

    #[test]
    fn test_reconstruct_single_blank_cell() {
        let index = index_of(vec![
            Block::new("p", BlockType::Page).with_children(["t"]),
            Block::new("t", BlockType::Table).with_children(["c"]),
            Block::cell("c", 1, 1),
        ]);

        let tables = reconstruct_tables(&index);
        assert_eq!(tables.len(), 1);
        assert_eq!(tables[0].grid.row_count(), 1);
        assert_eq!(tables[0].grid.column_count(), 0);
    }

    #[test]
    fn test_table_index_is_per_page() {
        let index = index_of(vec![
            Block::new("p1", BlockType::Page).with_children(["t1"]),
            Block::new("p2", BlockType::Page).with_children(["t2", "t3"]),
            Block::new("t1", BlockType::Table).with_children(["c1"]),
            Block::new("t2", BlockType::Table).with_children(["c2"]),
            Block::new("t3", BlockType::Table).with_children(["c3"]),
            Block::cell("c1", 1, 1).with_children(["w"]),
            Block::cell("c2", 1, 1).with_children(["w"]),
            Block::cell("c3", 1, 1).with_children(["w"]),
            Block::word("w", "x"),
        ]);

        let keys: Vec<_> = reconstruct_tables(&index)
            .iter()
            .map(|t| (t.page_number, t.index))
            .collect();
        assert_eq!(keys, vec![(1, 0), (2, 0), (2, 1)]);
    }
}
