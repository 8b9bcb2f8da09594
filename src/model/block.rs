//! Analysis block types.

use serde::{Deserialize, Serialize};

/// Kind of an analysis block.
///
/// Unrecognised kinds deserialize to [`BlockType::Unknown`] so that new
/// service block types never break parsing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    /// A page of the source document
    Page,
    /// A line of text
    Line,
    /// A single word
    Word,
    /// A table
    Table,
    /// A table title
    TableTitle,
    /// A table footer
    TableFooter,
    /// A table cell
    Cell,
    /// A cell spanning several grid positions
    MergedCell,
    /// A checkbox or radio button
    SelectionElement,
    /// A key or value of a form field
    KeyValueSet,
    /// A query
    Query,
    /// A query answer
    QueryResult,
    /// A signature
    Signature,
    /// A figure region
    #[serde(alias = "FIGURE")]
    LayoutFigure,
    /// A paragraph region
    LayoutText,
    /// A title region
    LayoutTitle,
    /// A page header region
    LayoutHeader,
    /// A page footer region
    LayoutFooter,
    /// A section header region
    LayoutSectionHeader,
    /// A page number region
    LayoutPageNumber,
    /// A list region
    LayoutList,
    /// A table region
    LayoutTable,
    /// A key-value region
    LayoutKeyValue,
    /// Any block type not listed above
    #[serde(other)]
    Unknown,
}

impl BlockType {
    /// Parse a service block type name such as `"LAYOUT_FIGURE"`.
    pub fn from_name(name: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .unwrap_or(BlockType::Unknown)
    }

    /// Check if blocks of this type mark a figure region.
    pub fn is_figure(self) -> bool {
        matches!(self, BlockType::LayoutFigure)
    }
}

/// Kind of a relationship between blocks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    /// Ordered children of the block
    Child,
    /// Value of a key
    Value,
    /// Complex features
    ComplexFeatures,
    /// Merged cells of a table
    MergedCell,
    /// Title of a table
    Title,
    /// Answer to a query
    Answer,
    /// Table referenced by a layout region
    Table,
    /// Table title
    TableTitle,
    /// Table footer
    TableFooter,
    /// Any relationship type not listed above
    #[serde(other)]
    Other,
}

impl RelationshipType {
    /// Parse a service relationship type name such as `"CHILD"`.
    pub fn from_name(name: &str) -> Self {
        serde_json::from_value(serde_json::Value::String(name.to_string()))
            .unwrap_or(RelationshipType::Other)
    }
}

/// A typed, ordered edge list from one block to others.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    /// Relationship kind
    #[serde(rename = "Type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<RelationshipType>,

    /// Referenced block identifiers, in service order
    #[serde(default)]
    pub ids: Vec<String>,
}

impl Relationship {
    /// Create a CHILD relationship.
    pub fn child<S: Into<String>>(ids: impl IntoIterator<Item = S>) -> Self {
        Self {
            kind: Some(RelationshipType::Child),
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    /// Check if this is a CHILD relationship.
    pub fn is_child(&self) -> bool {
        self.kind == Some(RelationshipType::Child)
    }
}

/// State of a selection element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SelectionStatus {
    /// The element is checked
    Selected,
    /// The element is not checked
    NotSelected,
}

impl SelectionStatus {
    /// Service name of the status.
    pub fn as_str(self) -> &'static str {
        match self {
            SelectionStatus::Selected => "SELECTED",
            SelectionStatus::NotSelected => "NOT_SELECTED",
        }
    }
}

/// One node of the analysis graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    /// Unique block identifier
    pub id: String,

    /// Block kind
    pub block_type: BlockType,

    /// Page attribute as reported by the service
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,

    /// Recognised text (words and lines)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,

    /// Edges to other blocks
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub relationships: Vec<Relationship>,

    /// Row of a cell (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_index: Option<u32>,

    /// Column of a cell (1-based)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_index: Option<u32>,

    /// Rows spanned by a cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_span: Option<u32>,

    /// Columns spanned by a cell
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub column_span: Option<u32>,

    /// Status of a selection element
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selection_status: Option<SelectionStatus>,

    /// Confidence score (0-100)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f32>,
}

impl Block {
    /// Create a block with only an identifier and a kind.
    pub fn new(id: impl Into<String>, block_type: BlockType) -> Self {
        Self {
            id: id.into(),
            block_type,
            page: None,
            text: None,
            relationships: Vec::new(),
            row_index: None,
            column_index: None,
            row_span: None,
            column_span: None,
            selection_status: None,
            confidence: None,
        }
    }

    /// Create a WORD block.
    pub fn word(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(id, BlockType::Word).with_text(text)
    }

    /// Create a CELL block at a grid position.
    pub fn cell(id: impl Into<String>, row: u32, column: u32) -> Self {
        let mut block = Self::new(id, BlockType::Cell);
        block.row_index = Some(row);
        block.column_index = Some(column);
        block
    }

    /// Set text and return self.
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Set the page attribute and return self.
    pub fn with_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    /// Append a CHILD relationship and return self.
    pub fn with_children<S: Into<String>>(mut self, ids: impl IntoIterator<Item = S>) -> Self {
        self.relationships.push(Relationship::child(ids));
        self
    }

    /// Set selection status and return self.
    pub fn with_selection(mut self, status: SelectionStatus) -> Self {
        self.selection_status = Some(status);
        self
    }

    /// Identifiers of all CHILD relationships, in order.
    pub fn child_ids(&self) -> impl Iterator<Item = &str> {
        self.relationships
            .iter()
            .filter(|r| r.is_child())
            .flat_map(|r| r.ids.iter().map(String::as_str))
    }

    /// Check if the block has at least one CHILD reference.
    pub fn has_children(&self) -> bool {
        self.child_ids().next().is_some()
    }

    /// Check if the block marks a figure region.
    pub fn is_figure(&self) -> bool {
        self.block_type.is_figure()
    }

    /// Text payload, or empty string when absent.
    pub fn text_or_empty(&self) -> &str {
        self.text.as_deref().unwrap_or("")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_deserialize() {
        let json = r#"{
            "Id": "f1",
            "BlockType": "LAYOUT_FIGURE",
            "Page": 2,
            "Relationships": [
                {"Type": "CHILD", "Ids": ["w1", "w2"]},
                {"Type": "VALUE", "Ids": ["v1"]}
            ]
        }"#;
        let block: Block = serde_json::from_str(json).unwrap();

        assert_eq!(block.block_type, BlockType::LayoutFigure);
        assert_eq!(block.page, Some(2));
        assert_eq!(block.child_ids().collect::<Vec<_>>(), vec!["w1", "w2"]);
        assert!(block.is_figure());
    }

    #[test]
    fn test_block_missing_type_fails() {
        let json = r#"{"Id": "x", "Text": "hello"}"#;
        assert!(serde_json::from_str::<Block>(json).is_err());
    }

    #[test]
    fn test_unknown_block_type() {
        let json = r#"{"Id": "x", "BlockType": "SOMETHING_NEW"}"#;
        let block: Block = serde_json::from_str(json).unwrap();
        assert_eq!(block.block_type, BlockType::Unknown);
    }

    #[test]
    fn test_figure_alias() {
        assert_eq!(BlockType::from_name("FIGURE"), BlockType::LayoutFigure);
        assert_eq!(BlockType::from_name("LAYOUT_FIGURE"), BlockType::LayoutFigure);
        assert_eq!(BlockType::from_name("CELL"), BlockType::Cell);
        assert_eq!(BlockType::from_name("nonsense"), BlockType::Unknown);
    }

    #[test]
    fn test_relationship_type_from_name() {
        assert_eq!(RelationshipType::from_name("CHILD"), RelationshipType::Child);
        assert_eq!(
            RelationshipType::from_name("MERGED_CELL"),
            RelationshipType::MergedCell
        );
        assert_eq!(RelationshipType::from_name("WHATEVER"), RelationshipType::Other);
    }

    #[test]
    fn test_no_relationships() {
        let block = Block::new("f", BlockType::LayoutFigure);
        assert!(!block.has_children());
        assert_eq!(block.text_or_empty(), "");
    }
}
