//! Utility blocks: lists, tables, code, images, grids and collapsible content

use crate::rich_text::{RichText, RichTextSegment, TextAlignment};
use crate::section::SectionContentNode;
use serde::{Deserialize, Serialize};

// =============================================================================
// Lists
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListNode {
    pub items: Vec<ListItemNode>,
    pub style: ListStyle,
    #[serde(default)]
    pub start_index: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListItemNode {
    pub content: Vec<SectionContentNode>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListStyle {
    Unordered(UnorderedListStyle),
    Ordered(OrderedListStyle),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnorderedListStyle {
    Disc,
    Circle,
    Square,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderedListStyle {
    Decimal,
    AlphaLower,
    AlphaUpper,
    RomanLower,
    RomanUpper,
}

impl ListStyle {
    pub fn is_ordered(&self) -> bool {
        matches!(self, ListStyle::Ordered(_))
    }

    /// CSS `list-style-type` value
    pub fn css_value(&self) -> &'static str {
        match self {
            ListStyle::Unordered(UnorderedListStyle::Disc) => "disc",
            ListStyle::Unordered(UnorderedListStyle::Circle) => "circle",
            ListStyle::Unordered(UnorderedListStyle::Square) => "square",
            ListStyle::Unordered(UnorderedListStyle::None) => "none",
            ListStyle::Ordered(OrderedListStyle::Decimal) => "decimal",
            ListStyle::Ordered(OrderedListStyle::AlphaLower) => "lower-alpha",
            ListStyle::Ordered(OrderedListStyle::AlphaUpper) => "upper-alpha",
            ListStyle::Ordered(OrderedListStyle::RomanLower) => "lower-roman",
            ListStyle::Ordered(OrderedListStyle::RomanUpper) => "upper-roman",
        }
    }
}

// =============================================================================
// Tables
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableNode {
    #[serde(default)]
    pub caption: Option<RichText>,
    #[serde(default)]
    pub header_rows: Vec<TableRowNode>,
    #[serde(default)]
    pub body_rows: Vec<TableRowNode>,
    #[serde(default)]
    pub footer_rows: Vec<TableRowNode>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRowNode {
    pub cells: Vec<TableCellNode>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCellNode {
    pub content: Vec<SectionContentNode>,
    #[serde(default)]
    pub col_span: Option<usize>,
    #[serde(default)]
    pub row_span: Option<usize>,
    #[serde(default)]
    pub cell_type: TableCellType,
    #[serde(default)]
    pub alignment: Option<TextAlignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TableCellType {
    Header,
    #[default]
    Data,
}

// =============================================================================
// Code and images
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CodeBlockNode {
    pub code: String,
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default)]
    pub caption: Option<RichText>,
    #[serde(default)]
    pub show_line_numbers: Option<bool>,
    /// 1-based line numbers to emphasize
    #[serde(default)]
    pub highlight_lines: Vec<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImageNode {
    pub src: String,
    #[serde(default)]
    pub alt_text: Option<String>,
    #[serde(default)]
    pub caption: Option<RichText>,
    #[serde(default)]
    pub width: Option<String>,
    #[serde(default)]
    pub height: Option<String>,
    #[serde(default)]
    pub alignment: Option<HorizontalAlignment>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum HorizontalAlignment {
    Left,
    Center,
    Right,
}

// =============================================================================
// Grids, columns and collapsible blocks
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridNode {
    pub items: Vec<GridItemNode>,
    /// Column count or a `grid-template-columns` value
    pub column_template: String,
    #[serde(default)]
    pub row_gap: Option<String>,
    #[serde(default)]
    pub column_gap: Option<String>,
}

impl GridNode {
    /// The `grid-template-columns` value; a bare count becomes equal columns
    pub fn template_columns(&self) -> String {
        match self.column_template.trim().parse::<usize>() {
            Ok(count) if count > 0 => format!("repeat({}, 1fr)", count),
            _ => self.column_template.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridItemNode {
    pub content: SectionContentNode,
    #[serde(default)]
    pub col_start: Option<usize>,
    #[serde(default)]
    pub col_end: Option<usize>,
    #[serde(default)]
    pub row_start: Option<usize>,
    #[serde(default)]
    pub row_end: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ColumnsNode {
    /// Each inner list is one column
    pub columns_content: Vec<Vec<SectionContentNode>>,
    #[serde(default)]
    pub column_widths: Vec<String>,
    #[serde(default)]
    pub gap: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CollapsibleBlockNode {
    pub summary: Vec<RichTextSegment>,
    pub details: Vec<SectionContentNode>,
    #[serde(default)]
    pub initially_collapsed: Option<bool>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlertBoxStyle {
    Information,
    Success,
    Warning,
    Error,
    Note,
    Tip,
}

impl AlertBoxStyle {
    pub fn label(&self) -> &'static str {
        match self {
            AlertBoxStyle::Information => "Information",
            AlertBoxStyle::Success => "Success",
            AlertBoxStyle::Warning => "Warning",
            AlertBoxStyle::Error => "Error",
            AlertBoxStyle::Note => "Note",
            AlertBoxStyle::Tip => "Tip",
        }
    }
}
