//! HTML writer for presentation trees
//!
//! Serializes a presentation tree to an HTML string. Math layouts are written
//! by the math crate's markup writer, which marks highlighted handles.

use crate::config::HtmlConfig;
use crate::presentation::{Element, PresentationNode};
use math::{escape_html, MarkupWriter};

/// Elements written without a closing tag
const VOID_ELEMENTS: &[&str] = &["br", "hr", "img", "input", "meta"];

/// Elements that may only hold inline content
const PHRASING_ELEMENTS: &[&str] = &[
    "a", "code", "dt", "em", "figcaption", "h1", "h2", "h3", "h4", "h5", "h6", "label", "p",
    "span", "strong", "sub", "summary", "sup",
];

/// Writer for presentation trees
#[derive(Debug, Clone, Default)]
pub struct HtmlWriter {
    config: HtmlConfig,
    markup: MarkupWriter,
}

impl HtmlWriter {
    /// Create a new HTML writer
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            markup: MarkupWriter::new(),
        }
    }

    /// Mark these math handles as highlighted
    pub fn with_highlighted(mut self, handles: impl IntoIterator<Item = u32>) -> Self {
        self.markup = self.markup.with_highlighted(handles);
        self
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    /// Write a presentation tree, wrapped in a full document in standalone mode
    pub fn write(&self, node: &PresentationNode) -> String {
        let mut html = String::new();
        if self.config.standalone {
            self.write_document_head(&mut html);
        }
        self.write_node(&mut html, node, false);
        if self.config.standalone {
            html.push_str("\n</body>\n</html>\n");
        }
        html
    }

    fn write_document_head(&self, html: &mut String) {
        html.push_str("<!DOCTYPE html>\n<html>\n<head>\n");
        html.push_str(r#"<meta charset="utf-8">"#);
        html.push_str(&format!("\n<title>{}</title>\n", escape_html(&self.config.title)));
        html.push_str("</head>\n<body>\n");
    }

    /// `inline` is set below elements that only allow phrasing content
    fn write_node(&self, html: &mut String, node: &PresentationNode, inline: bool) {
        match node {
            PresentationNode::Element(element) => self.write_element(html, element, inline),
            PresentationNode::Text(text) => html.push_str(&escape_html(text)),
            PresentationNode::Math { layout, display } => {
                let (tag, mode) = if *display {
                    ("div", "math-display")
                } else {
                    ("span", "math-inline")
                };
                html.push_str(&format!(
                    r#"<{} class="{} {}">"#,
                    tag,
                    self.config.class_name("math"),
                    self.config.class_name(mode)
                ));
                html.push_str(&self.markup.write(layout));
                html.push_str(&format!("</{}>", tag));
            }
            PresentationNode::Placeholder { kind, detail } => {
                let tag = if inline { "span" } else { "div" };
                html.push_str(&format!(
                    r#"<{tag} class="{}" data-kind="{}">Unknown content: {}</{tag}>"#,
                    self.config.class_name("unknown-node"),
                    escape_html(kind),
                    escape_html(detail)
                ));
            }
            PresentationNode::ErrorMarker { message } => {
                html.push_str(&format!(
                    r#"<span class="{}">{}</span>"#,
                    self.config.class_name("render-error"),
                    escape_html(message)
                ));
            }
        }
    }

    fn write_element(&self, html: &mut String, element: &Element, inline: bool) {
        html.push('<');
        html.push_str(&element.tag);

        if !element.classes.is_empty() {
            let classes: Vec<String> = element
                .classes
                .iter()
                .map(|c| self.config.class_name(c))
                .collect();
            html.push_str(&format!(r#" class="{}""#, escape_html(&classes.join(" "))));
        }

        for (name, value) in &element.attributes {
            html.push_str(&format!(r#" {}="{}""#, name, escape_html(value)));
        }
        html.push('>');

        if VOID_ELEMENTS.contains(&element.tag.as_str()) {
            return;
        }

        let inline = inline || PHRASING_ELEMENTS.contains(&element.tag.as_str());
        for child in &element.children {
            self.write_node(html, child, inline);
        }

        html.push_str(&format!("</{}>", element.tag));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::{GlyphClass, LayoutNode};

    #[test]
    fn test_element_with_attributes_and_escaping() {
        let node: PresentationNode = Element::div("proof-step")
            .attr("data-node-id", "p\"1")
            .text("a < b")
            .into();
        let html = HtmlWriter::default().write(&node);
        assert_eq!(
            html,
            r#"<div class="proof-step" data-node-id="p&quot;1">a &lt; b</div>"#
        );
    }

    #[test]
    fn test_class_prefix() {
        let config = HtmlConfig {
            class_prefix: "md-".to_string(),
            ..HtmlConfig::default()
        };
        let node: PresentationNode = Element::span("claim").class("strong").into();
        let html = HtmlWriter::new(config).write(&node);
        assert_eq!(html, r#"<span class="md-claim md-strong"></span>"#);
    }

    #[test]
    fn test_void_element() {
        let node: PresentationNode = Element::new("img").attr("src", "a.png").into();
        assert_eq!(HtmlWriter::default().write(&node), r#"<img src="a.png">"#);
    }

    #[test]
    fn test_placeholder_and_error() {
        let writer = HtmlWriter::default();
        assert_eq!(
            writer.write(&PresentationNode::placeholder("section content", "Hologram")),
            r#"<div class="unknown-node" data-kind="section content">Unknown content: Hologram</div>"#
        );
        assert_eq!(
            writer.write(&PresentationNode::error("Fraction: missing field")),
            r#"<span class="render-error">Fraction: missing field</span>"#
        );
    }

    #[test]
    fn test_placeholder_inside_paragraph_is_span() {
        let node: PresentationNode = Element::new("p")
            .class("paragraph")
            .child(Element::new("a").child(PresentationNode::placeholder("rich text segment", "Emoji")))
            .child(PresentationNode::placeholder("rich text segment", "Hologram"))
            .into();
        let html = HtmlWriter::default().write(&node);
        assert!(!html.contains("<div"));
        assert_eq!(html.matches(r#"<span class="unknown-node""#).count(), 2);
        assert!(html.contains(r#"Unknown content: Hologram</span></p>"#));
    }

    #[test]
    fn test_math_highlight() {
        let mut layout = LayoutNode::glyph("x", GlyphClass::Identifier).with_data_id("x");
        layout.handle = Some(2);
        let node = PresentationNode::Math {
            layout,
            display: true,
        };
        let html = HtmlWriter::default().with_highlighted([2]).write(&node);
        assert!(html.starts_with(r#"<div class="math math-display">"#));
        assert!(html.contains("highlighted"));

        let html = HtmlWriter::default().write(&node);
        assert!(!html.contains("highlighted"));
    }

    #[test]
    fn test_standalone_document() {
        let config = HtmlConfig {
            standalone: true,
            title: "Groups & Rings".to_string(),
            ..HtmlConfig::default()
        };
        let html = HtmlWriter::new(config).write(&PresentationNode::text("body"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("<title>Groups &amp; Rings</title>"));
        assert!(html.trim_end().ends_with("</html>"));
    }
}
