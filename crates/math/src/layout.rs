//! Layout Primitives - The composable building blocks of a rendered expression
//!
//! The expression renderer produces a tree of `LayoutNode`s. Nodes that came
//! from an expression with an id carry that id (`data_id`) so the occurrence can
//! be found again for highlighting; the document renderer later assigns each
//! tagged node a numeric `handle`.

use serde::{Deserialize, Serialize};

// =============================================================================
// Layout Types
// =============================================================================

/// How a glyph is typeset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GlyphClass {
    /// Italic letter
    Identifier,
    /// Upright digit
    Numeral,
    /// Upright symbol with operator spacing
    Operator,
    /// Prose in the text font
    Text,
    /// Upright word (`lim`, `Prime`, `let`)
    Keyword,
    /// Large operator (`∑`, `∏`, `∫`)
    BigOperator,
    /// Bracket glyph
    Fence,
}

impl GlyphClass {
    /// Classify a single grapheme
    pub fn classify(grapheme: &str) -> Self {
        let mut chars = grapheme.chars();
        match chars.next() {
            Some(c) if c.is_alphabetic() => GlyphClass::Identifier,
            Some(c) if c.is_numeric() => GlyphClass::Numeral,
            _ => GlyphClass::Operator,
        }
    }

    /// CSS class suffix used by the markup writer
    pub fn css_name(&self) -> &'static str {
        match self {
            GlyphClass::Identifier => "mi",
            GlyphClass::Numeral => "mn",
            GlyphClass::Operator => "mo",
            GlyphClass::Text => "mtext",
            GlyphClass::Keyword => "mkw",
            GlyphClass::BigOperator => "mop-large",
            GlyphClass::Fence => "mfence",
        }
    }
}

/// Vertical alignment of a table relative to the surrounding baseline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VerticalAlign {
    Baseline,
    Middle,
}

/// Fixed horizontal spacers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceWidth {
    Thin,
    Medium,
    Thick,
    Quad,
}

impl SpaceWidth {
    /// Width in em
    pub fn em(&self) -> f32 {
        match self {
            SpaceWidth::Thin => 3.0 / 18.0,
            SpaceWidth::Medium => 4.0 / 18.0,
            SpaceWidth::Thick => 5.0 / 18.0,
            SpaceWidth::Quad => 1.0,
        }
    }
}

/// How a fence pair grows with its content
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum FenceStretch {
    /// Text-size glyphs
    Normal,
    /// Scaled to the measured inner height
    Auto,
    /// Fixed step, 1 through 4
    Scaled(u8),
}

/// The shape of a layout node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum LayoutKind {
    /// Renders nothing
    Empty,
    Glyph {
        text: String,
        class: GlyphClass,
    },
    /// Horizontal sequence
    Row(Vec<LayoutNode>),
    /// Sub/superscript pair attached after the base
    Scripts {
        base: Box<LayoutNode>,
        sub: Option<Box<LayoutNode>>,
        sup: Option<Box<LayoutNode>>,
    },
    /// Limits stacked directly under/over the base
    UnderOver {
        base: Box<LayoutNode>,
        under: Option<Box<LayoutNode>>,
        over: Option<Box<LayoutNode>>,
    },
    /// Numerator over a rule over the denominator
    Fraction {
        numerator: Box<LayoutNode>,
        denominator: Box<LayoutNode>,
    },
    Radical {
        degree: Option<Box<LayoutNode>>,
        radicand: Box<LayoutNode>,
    },
    /// Rectangular grid; every row has the same number of cells
    Table {
        rows: Vec<Vec<LayoutNode>>,
        align: VerticalAlign,
    },
    Space(SpaceWidth),
    Fence {
        open: String,
        close: String,
        inner: Box<LayoutNode>,
        stretch: FenceStretch,
    },
    /// Visible marker for a variant the renderer does not know
    Placeholder {
        tag: String,
    },
    /// Visible marker for a known variant with a bad payload
    Error {
        message: String,
    },
}

/// A node in the layout tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayoutNode {
    pub kind: LayoutKind,
    /// Expression id this node renders, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_id: Option<String>,
    /// Registry handle assigned by the document renderer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle: Option<u32>,
}

impl LayoutNode {
    pub fn new(kind: LayoutKind) -> Self {
        Self {
            kind,
            data_id: None,
            handle: None,
        }
    }

    pub fn empty() -> Self {
        Self::new(LayoutKind::Empty)
    }

    pub fn glyph(text: impl Into<String>, class: GlyphClass) -> Self {
        Self::new(LayoutKind::Glyph {
            text: text.into(),
            class,
        })
    }

    pub fn operator(text: impl Into<String>) -> Self {
        Self::glyph(text, GlyphClass::Operator)
    }

    pub fn keyword(text: impl Into<String>) -> Self {
        Self::glyph(text, GlyphClass::Keyword)
    }

    pub fn space(width: SpaceWidth) -> Self {
        Self::new(LayoutKind::Space(width))
    }

    /// A row; a single child is returned unwrapped
    pub fn row(mut children: Vec<LayoutNode>) -> Self {
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        Self::new(LayoutKind::Row(children))
    }

    pub fn scripts(base: LayoutNode, sub: Option<LayoutNode>, sup: Option<LayoutNode>) -> Self {
        Self::new(LayoutKind::Scripts {
            base: Box::new(base),
            sub: sub.map(Box::new),
            sup: sup.map(Box::new),
        })
    }

    pub fn under_over(
        base: LayoutNode,
        under: Option<LayoutNode>,
        over: Option<LayoutNode>,
    ) -> Self {
        Self::new(LayoutKind::UnderOver {
            base: Box::new(base),
            under: under.map(Box::new),
            over: over.map(Box::new),
        })
    }

    pub fn fraction(numerator: LayoutNode, denominator: LayoutNode) -> Self {
        Self::new(LayoutKind::Fraction {
            numerator: Box::new(numerator),
            denominator: Box::new(denominator),
        })
    }

    pub fn radical(degree: Option<LayoutNode>, radicand: LayoutNode) -> Self {
        Self::new(LayoutKind::Radical {
            degree: degree.map(Box::new),
            radicand: Box::new(radicand),
        })
    }

    pub fn table(rows: Vec<Vec<LayoutNode>>, align: VerticalAlign) -> Self {
        Self::new(LayoutKind::Table { rows, align })
    }

    pub fn fence(
        open: impl Into<String>,
        close: impl Into<String>,
        inner: LayoutNode,
        stretch: FenceStretch,
    ) -> Self {
        Self::new(LayoutKind::Fence {
            open: open.into(),
            close: close.into(),
            inner: Box::new(inner),
            stretch,
        })
    }

    pub fn placeholder(tag: impl Into<String>) -> Self {
        Self::new(LayoutKind::Placeholder { tag: tag.into() })
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(LayoutKind::Error {
            message: message.into(),
        })
    }

    /// Tag this node with an expression id; empty ids are ignored
    pub fn with_data_id(mut self, id: &str) -> Self {
        if !id.is_empty() {
            self.data_id = Some(id.to_string());
        }
        self
    }

    pub fn is_empty(&self) -> bool {
        matches!(self.kind, LayoutKind::Empty)
    }

    /// Direct children in visual order
    pub fn children(&self) -> Vec<&LayoutNode> {
        match &self.kind {
            LayoutKind::Empty
            | LayoutKind::Glyph { .. }
            | LayoutKind::Space(_)
            | LayoutKind::Placeholder { .. }
            | LayoutKind::Error { .. } => vec![],
            LayoutKind::Row(children) => children.iter().collect(),
            LayoutKind::Scripts { base, sub, sup } => {
                let mut v = vec![base.as_ref()];
                v.extend(sub.as_deref());
                v.extend(sup.as_deref());
                v
            }
            LayoutKind::UnderOver { base, under, over } => {
                let mut v: Vec<&LayoutNode> = over.as_deref().into_iter().collect();
                v.push(base.as_ref());
                v.extend(under.as_deref());
                v
            }
            LayoutKind::Fraction {
                numerator,
                denominator,
            } => vec![numerator.as_ref(), denominator.as_ref()],
            LayoutKind::Radical { degree, radicand } => {
                let mut v: Vec<&LayoutNode> = degree.as_deref().into_iter().collect();
                v.push(radicand.as_ref());
                v
            }
            LayoutKind::Table { rows, .. } => rows.iter().flatten().collect(),
            LayoutKind::Fence { inner, .. } => vec![inner.as_ref()],
        }
    }

    fn children_mut(&mut self) -> Vec<&mut LayoutNode> {
        match &mut self.kind {
            LayoutKind::Empty
            | LayoutKind::Glyph { .. }
            | LayoutKind::Space(_)
            | LayoutKind::Placeholder { .. }
            | LayoutKind::Error { .. } => vec![],
            LayoutKind::Row(children) => children.iter_mut().collect(),
            LayoutKind::Scripts { base, sub, sup } => {
                let mut v = vec![base.as_mut()];
                v.extend(sub.as_deref_mut());
                v.extend(sup.as_deref_mut());
                v
            }
            LayoutKind::UnderOver { base, under, over } => {
                let mut v: Vec<&mut LayoutNode> = over.as_deref_mut().into_iter().collect();
                v.push(base.as_mut());
                v.extend(under.as_deref_mut());
                v
            }
            LayoutKind::Fraction {
                numerator,
                denominator,
            } => vec![numerator.as_mut(), denominator.as_mut()],
            LayoutKind::Radical { degree, radicand } => {
                let mut v: Vec<&mut LayoutNode> = degree.as_deref_mut().into_iter().collect();
                v.push(radicand.as_mut());
                v
            }
            LayoutKind::Table { rows, .. } => rows.iter_mut().flatten().collect(),
            LayoutKind::Fence { inner, .. } => vec![inner.as_mut()],
        }
    }

    /// Pre-order traversal
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a LayoutNode)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Pre-order traversal with mutable access
    pub fn visit_mut(&mut self, f: &mut impl FnMut(&mut LayoutNode)) {
        f(self);
        for child in self.children_mut() {
            child.visit_mut(f);
        }
    }

    /// Ids of every tagged node, in pre-order
    pub fn tagged_ids(&self) -> Vec<&str> {
        let mut ids = Vec::new();
        self.visit(&mut |node| {
            if let Some(id) = node.data_id.as_deref() {
                ids.push(id);
            }
        });
        ids
    }

    /// Count nodes in this subtree
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |_| count += 1);
        count
    }

    /// Linear reading of the tree, used for logging and assertions.
    ///
    /// Scripts are written as `_{..}` / `^{..}`, stacked content as
    /// `over{..}` / `under{..}`, fractions as `{num}/{den}`.
    pub fn plain_text(&self) -> String {
        let mut out = String::new();
        self.write_plain(&mut out);
        out
    }

    fn write_plain(&self, out: &mut String) {
        match &self.kind {
            LayoutKind::Empty => {}
            LayoutKind::Glyph { text, .. } => out.push_str(text),
            LayoutKind::Row(children) => {
                for child in children {
                    child.write_plain(out);
                }
            }
            LayoutKind::Scripts { base, sub, sup } => {
                base.write_plain(out);
                if let Some(sub) = sub {
                    out.push_str("_{");
                    sub.write_plain(out);
                    out.push('}');
                }
                if let Some(sup) = sup {
                    out.push_str("^{");
                    sup.write_plain(out);
                    out.push('}');
                }
            }
            LayoutKind::UnderOver { base, under, over } => {
                base.write_plain(out);
                if let Some(under) = under {
                    out.push_str("under{");
                    under.write_plain(out);
                    out.push('}');
                }
                if let Some(over) = over {
                    out.push_str("over{");
                    over.write_plain(out);
                    out.push('}');
                }
            }
            LayoutKind::Fraction {
                numerator,
                denominator,
            } => {
                out.push('{');
                numerator.write_plain(out);
                out.push_str("}/{");
                denominator.write_plain(out);
                out.push('}');
            }
            LayoutKind::Radical { degree, radicand } => {
                if let Some(degree) = degree {
                    out.push_str("root{");
                    degree.write_plain(out);
                    out.push('}');
                }
                out.push_str("\u{221A}{");
                radicand.write_plain(out);
                out.push('}');
            }
            LayoutKind::Table { rows, .. } => {
                for (i, row) in rows.iter().enumerate() {
                    if i > 0 {
                        out.push_str("; ");
                    }
                    for (j, cell) in row.iter().enumerate() {
                        if j > 0 {
                            out.push_str(", ");
                        }
                        cell.write_plain(out);
                    }
                }
            }
            LayoutKind::Space(_) => out.push(' '),
            LayoutKind::Fence {
                open, close, inner, ..
            } => {
                out.push_str(open);
                inner.write_plain(out);
                out.push_str(close);
            }
            LayoutKind::Placeholder { tag } => {
                out.push_str("[?");
                out.push_str(tag);
                out.push(']');
            }
            LayoutKind::Error { message } => {
                out.push_str("[!");
                out.push_str(message);
                out.push(']');
            }
        }
    }
}

impl Default for LayoutNode {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_glyph_classification() {
        assert_eq!(GlyphClass::classify("x"), GlyphClass::Identifier);
        assert_eq!(GlyphClass::classify("\u{03B1}"), GlyphClass::Identifier);
        assert_eq!(GlyphClass::classify("7"), GlyphClass::Numeral);
        assert_eq!(GlyphClass::classify("+"), GlyphClass::Operator);
        assert_eq!(GlyphClass::classify(""), GlyphClass::Operator);
    }

    #[test]
    fn test_row_of_one_is_unwrapped() {
        let node = LayoutNode::row(vec![LayoutNode::operator("+")]);
        assert!(matches!(node.kind, LayoutKind::Glyph { .. }));
    }

    #[test]
    fn test_empty_data_id_is_ignored() {
        let node = LayoutNode::operator("+").with_data_id("");
        assert!(node.data_id.is_none());
        let node = LayoutNode::operator("+").with_data_id("e1");
        assert_eq!(node.data_id.as_deref(), Some("e1"));
    }

    #[test]
    fn test_plain_text_of_scripts_and_fence() {
        let node = LayoutNode::fence(
            "(",
            ")",
            LayoutNode::scripts(
                LayoutNode::glyph("x", GlyphClass::Identifier),
                Some(LayoutNode::glyph("i", GlyphClass::Identifier)),
                Some(LayoutNode::glyph("2", GlyphClass::Numeral)),
            ),
            FenceStretch::Normal,
        );
        assert_eq!(node.plain_text(), "(x_{i}^{2})");
    }

    #[test]
    fn test_visit_mut_assigns_handles() {
        let mut node = LayoutNode::row(vec![
            LayoutNode::operator("a").with_data_id("a"),
            LayoutNode::operator("b"),
            LayoutNode::operator("c").with_data_id("c"),
        ]);
        let mut next = 0;
        node.visit_mut(&mut |n| {
            if n.data_id.is_some() {
                n.handle = Some(next);
                next += 1;
            }
        });
        assert_eq!(next, 2);
        assert_eq!(node.tagged_ids(), vec!["a", "c"]);
    }

    #[test]
    fn test_space_widths_increase() {
        assert!(SpaceWidth::Thin.em() < SpaceWidth::Medium.em());
        assert!(SpaceWidth::Medium.em() < SpaceWidth::Thick.em());
        assert!(SpaceWidth::Thick.em() < SpaceWidth::Quad.em());
    }
}
