//! Presentation tree types
//!
//! The document renderer produces a tree of presentation nodes; the HTML
//! writer serializes it. Math is kept as a layout tree until serialization.

use math::LayoutNode;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PresentationNode {
    Element(Element),
    Text(String),
    Math {
        layout: LayoutNode,
        /// Display (block) math rather than inline
        display: bool,
    },
    /// Content the renderer does not know how to show
    Placeholder { kind: String, detail: String },
    /// Content that was recognized but could not be rendered
    ErrorMarker { message: String },
}

impl PresentationNode {
    pub fn text(text: impl Into<String>) -> Self {
        PresentationNode::Text(text.into())
    }

    pub fn placeholder(kind: impl Into<String>, detail: impl Into<String>) -> Self {
        PresentationNode::Placeholder {
            kind: kind.into(),
            detail: detail.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        PresentationNode::ErrorMarker {
            message: message.into(),
        }
    }

    pub fn as_element(&self) -> Option<&Element> {
        match self {
            PresentationNode::Element(element) => Some(element),
            _ => None,
        }
    }

    pub fn children(&self) -> &[PresentationNode] {
        match self {
            PresentationNode::Element(element) => &element.children,
            _ => &[],
        }
    }

    /// Depth-first pre-order traversal
    pub fn visit<'a>(&'a self, f: &mut impl FnMut(&'a PresentationNode)) {
        f(self);
        for child in self.children() {
            child.visit(f);
        }
    }

    /// Elements carrying `class`, in document order
    pub fn find_by_class(&self, class: &str) -> Vec<&Element> {
        let mut found = Vec::new();
        self.visit(&mut |node| {
            if let Some(element) = node.as_element() {
                if element.has_class(class) {
                    found.push(element);
                }
            }
        });
        found
    }

    /// Concatenated text content, math rendered as plain text
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        self.visit(&mut |node| match node {
            PresentationNode::Text(text) => out.push_str(text),
            PresentationNode::Math { layout, .. } => out.push_str(&layout.plain_text()),
            _ => {}
        });
        out
    }

    pub fn placeholder_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |node| {
            if matches!(node, PresentationNode::Placeholder { .. }) {
                count += 1;
            }
        });
        count
    }

    pub fn error_count(&self) -> usize {
        let mut count = 0;
        self.visit(&mut |node| {
            if matches!(node, PresentationNode::ErrorMarker { .. }) {
                count += 1;
            }
        });
        count
    }
}

impl From<Element> for PresentationNode {
    fn from(element: Element) -> Self {
        PresentationNode::Element(element)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Element {
    pub tag: String,
    pub classes: Vec<String>,
    /// Attributes in insertion order
    pub attributes: Vec<(String, String)>,
    pub children: Vec<PresentationNode>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    pub fn div(class: &str) -> Self {
        Self::new("div").class(class)
    }

    pub fn span(class: &str) -> Self {
        Self::new("span").class(class)
    }

    pub fn class(mut self, class: impl Into<String>) -> Self {
        let class = class.into();
        if !class.is_empty() {
            self.classes.push(class);
        }
        self
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, child: impl Into<PresentationNode>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children(mut self, children: impl IntoIterator<Item = PresentationNode>) -> Self {
        self.children.extend(children);
        self
    }

    pub fn text(self, text: impl Into<String>) -> Self {
        self.child(PresentationNode::Text(text.into()))
    }

    pub fn push(&mut self, child: impl Into<PresentationNode>) {
        self.children.push(child.into());
    }

    pub fn has_class(&self, class: &str) -> bool {
        self.classes.iter().any(|c| c == class)
    }

    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }
}
