//! Document tree renderer
//!
//! Walks sections recursively and builds a presentation tree. Embedded
//! expressions go through the math renderer; every tagged layout node is
//! registered with the highlight registry under the section and proof node it
//! was rendered in.
//!
//! Unknown or malformed variants never abort rendering. They become
//! placeholders or error markers in place and their siblings still render.

use crate::config::HtmlConfig;
use crate::presentation::{Element, PresentationNode};
use doc_model::{
    LinkTarget, RichText, RichTextSegment, Section, SectionContentNode, TextStyle,
};
use highlight::{HighlightRegistry, OccurrenceScope, ProofNodeRef};
use math::{ExpressionNode, RawVariant, RenderConfig, Renderer};
use serde_json::Value;
use tracing::{debug, warn};

/// Output of a document render
#[derive(Debug, Clone)]
pub struct RenderedDocument {
    pub root: PresentationNode,
    pub registry: HighlightRegistry,
}

pub struct DocumentRenderer {
    pub(crate) config: HtmlConfig,
    pub(crate) math: Renderer,
    pub(crate) registry: HighlightRegistry,
    /// Enclosing section ids, innermost last
    pub(crate) sections: Vec<String>,
    /// Sibling counters per section depth
    pub(crate) section_numbers: Vec<usize>,
    /// Enclosing proof nodes, innermost last
    pub(crate) proof_nodes: Vec<ProofNodeRef>,
    pub(crate) proof_count: usize,
}

impl Default for DocumentRenderer {
    fn default() -> Self {
        Self::new(HtmlConfig::default())
    }
}

impl DocumentRenderer {
    pub fn new(config: HtmlConfig) -> Self {
        Self {
            config,
            math: Renderer::new(),
            registry: HighlightRegistry::new(),
            sections: Vec::new(),
            section_numbers: Vec::new(),
            proof_nodes: Vec::new(),
            proof_count: 0,
        }
    }

    pub fn with_math_config(mut self, config: RenderConfig) -> Self {
        self.math = Renderer::with_config(config);
        self
    }

    pub fn config(&self) -> &HtmlConfig {
        &self.config
    }

    pub fn registry(&self) -> &HighlightRegistry {
        &self.registry
    }

    pub fn into_registry(self) -> HighlightRegistry {
        self.registry
    }

    /// Render a list of top-level sections as one document
    pub fn render_document(mut self, sections: &[Section]) -> RenderedDocument {
        debug!("Rendering document with {} top-level section(s)", sections.len());
        let root = Element::new("article")
            .class("document")
            .children(sections.iter().map(|s| self.render_section(s)))
            .into();
        RenderedDocument {
            root,
            registry: self.registry,
        }
    }

    /// Render a single expression as display math
    pub fn render_standalone_expression(mut self, node: &ExpressionNode) -> RenderedDocument {
        debug!("Rendering standalone expression {}", node.id);
        let root = Element::div("math-block")
            .child(self.render_math(node, true))
            .into();
        RenderedDocument {
            root,
            registry: self.registry,
        }
    }

    pub fn render_section(&mut self, section: &Section) -> PresentationNode {
        debug!("Rendering section {}", section.id);
        self.sections.push(section.id.clone());
        let depth = self.sections.len();
        self.section_numbers.truncate(depth);
        while self.section_numbers.len() < depth {
            self.section_numbers.push(0);
        }
        if let Some(last) = self.section_numbers.last_mut() {
            *last += 1;
        }

        let mut element = Element::new("section")
            .class("section")
            .attr("id", anchor(&section.id))
            .attr("data-section-id", section.id.as_str());
        if let Some(level) = section.metadata_value("abstraction_level") {
            element = element.attr("data-abstraction-level", level);
        }

        if let Some(title) = &section.title {
            let level = (depth + 1).min(6);
            let mut heading = Element::new(format!("h{}", level)).class("section-title");
            if section.shows_title_numbering() {
                let number = self
                    .section_numbers
                    .iter()
                    .map(|n| n.to_string())
                    .collect::<Vec<_>>()
                    .join(".");
                heading.push(Element::span("section-number").text(format!("{} ", number)));
            }
            heading = heading.children(self.render_rich_text(title));
            element.push(heading);
        }

        for node in &section.content {
            let rendered = self.render_content(node);
            element.push(rendered);
        }

        self.sections.pop();
        element.into()
    }

    pub(crate) fn render_contents(&mut self, nodes: &[SectionContentNode]) -> Vec<PresentationNode> {
        nodes.iter().map(|n| self.render_content(n)).collect()
    }

    pub fn render_content(&mut self, node: &SectionContentNode) -> PresentationNode {
        use SectionContentNode as N;
        match node {
            N::RichText(text) => self.render_paragraph(text),
            N::Math {
                math,
                label,
                caption,
            } => {
                let Some(math) = math else {
                    warn!("Math block without a math payload");
                    return PresentationNode::error("Math block is missing its math payload");
                };
                let mut block = Element::div("math-block").child(self.render_math(math, true));
                if let Some(label) = label {
                    block = block
                        .attr("data-label", label.as_str())
                        .child(Element::span("equation-label").text(format!("({})", label)));
                }
                if let Some(caption) = caption {
                    block = block.child(
                        Element::div("math-caption").children(self.render_rich_text(caption)),
                    );
                }
                block.into()
            }
            N::StructuredMath(structured) => self.render_structured(structured),
            N::List(list) => self.render_list(list),
            N::Table(table) => self.render_table(table),
            N::CodeBlock(code) => self.render_code_block(code),
            N::Image(image) => self.render_image(image),
            N::SubSection(section) => self.render_section(section),
            N::SideBySideLayout(layout) => self.render_side_by_side(layout),
            N::PanelLayout(layout) => self.render_panel_layout(layout),
            N::Grid(grid) => self.render_grid(grid),
            N::Columns(columns) => self.render_columns(columns),
            N::InteractiveDiagram(diagram) => self.render_diagram(diagram),
            N::InteractiveControls(controls) => self.render_controls(controls),
            N::AnnotationOverlay(overlay) => self.render_annotation_overlay(overlay),
            N::BranchingContainer(container) => self.render_branching(container),
            N::CollapsibleBlock(block) => self.render_collapsible(block, "collapsible"),
            N::QuoteBlock {
                content,
                attribution,
            } => {
                let mut quote = Element::new("blockquote").class("quote");
                for paragraph in content {
                    let rendered = self.render_paragraph(paragraph);
                    quote.push(rendered);
                }
                if let Some(attribution) = attribution {
                    quote.push(
                        Element::new("footer")
                            .class("attribution")
                            .children(self.render_rich_text(attribution)),
                    );
                }
                quote.into()
            }
            N::AlertBox { style, content } => Element::div("alert")
                .class(format!("alert-{}", style.label().to_lowercase()))
                .attr("role", "note")
                .child(Element::new("strong").class("alert-title").text(style.label()))
                .children(self.render_contents(content))
                .into(),
            N::ThematicBreak => Element::new("hr").class("thematic-break").into(),
            N::CustomComponent {
                name,
                props,
                fallback_content,
            } => {
                if fallback_content.is_empty() {
                    warn!("Custom component {} has no fallback content", name);
                    return PresentationNode::placeholder("component", name.as_str());
                }
                let mut element = Element::div("custom-component").attr("data-component", name.as_str());
                if let Some(props) = props {
                    element = element.attr("data-props", props.as_str());
                }
                element.children(self.render_contents(fallback_content)).into()
            }
            N::EmbeddedSectionRef(id) => Element::new("a")
                .class("embedded-section-ref")
                .attr("href", format!("#{}", anchor(id)))
                .text(format!("See section {}", id))
                .into(),
            N::EmbeddedDocument(document) => self.render_math_document_node(document),
            N::Unsupported(value) => {
                self.render_raw("section content", value, SectionContentNode::KNOWN_TAGS)
            }
        }
    }

    // =========================================================================
    // Rich text
    // =========================================================================

    pub(crate) fn render_paragraph(&mut self, text: &RichText) -> PresentationNode {
        let mut paragraph = Element::new("p").class("paragraph");
        if let Some(alignment) = text.alignment {
            paragraph = paragraph.attr("style", format!("text-align: {}", alignment.css_value()));
        }
        paragraph.children(self.render_rich_text(text)).into()
    }

    pub(crate) fn render_rich_text(&mut self, text: &RichText) -> Vec<PresentationNode> {
        self.render_segments(&text.segments)
    }

    pub(crate) fn render_segments(&mut self, segments: &[RichTextSegment]) -> Vec<PresentationNode> {
        segments.iter().map(|s| self.render_segment(s)).collect()
    }

    fn render_segment(&mut self, segment: &RichTextSegment) -> PresentationNode {
        match segment {
            RichTextSegment::Text(text) => PresentationNode::text(text.as_str()),
            RichTextSegment::StyledText { text, styles } => {
                let mut span = Element::span("styled-text");
                let mut css = Vec::new();
                for style in styles {
                    match style {
                        TextStyle::Bold => span = span.class("text-bold"),
                        TextStyle::Italic => span = span.class("text-italic"),
                        TextStyle::Underline => span = span.class("text-underline"),
                        TextStyle::Strikethrough => span = span.class("text-strikethrough"),
                        TextStyle::Superscript => span = span.class("text-superscript"),
                        TextStyle::Subscript => span = span.class("text-subscript"),
                        TextStyle::Color(color) => css.push(format!("color: {}", color)),
                        TextStyle::BackgroundColor(color) => {
                            css.push(format!("background-color: {}", color))
                        }
                        TextStyle::FontSize(size) => css.push(format!("font-size: {}", size)),
                        TextStyle::FontFamily(family) => {
                            css.push(format!("font-family: {}", family))
                        }
                    }
                }
                if !css.is_empty() {
                    span = span.attr("style", css.join("; "));
                }
                span.text(text.as_str()).into()
            }
            RichTextSegment::Math(node) => self.render_math(node, false),
            RichTextSegment::Link {
                content,
                target,
                tooltip,
            } => {
                let mut link = Element::new("a").class("link");
                match link_href(target) {
                    Some((kind, href)) => {
                        link = link.class(format!("link-{}", kind)).attr("href", href);
                    }
                    None => {
                        warn!("Link without a usable target");
                        link = link.class("link-unknown");
                    }
                }
                if let LinkTarget::DefinitionId {
                    theory_context: Some(theory),
                    ..
                } = target
                {
                    link = link.attr("data-theory", theory.as_str());
                }
                if let Some(tooltip) = tooltip {
                    link = link.attr("title", tooltip.as_str());
                }
                link.children(self.render_segments(content)).into()
            }
            RichTextSegment::FootnoteReference(id) => Element::new("sup")
                .class("footnote-ref")
                .child(
                    Element::new("a")
                        .attr("href", format!("#fn-{}", anchor(id)))
                        .text(id.as_str()),
                )
                .into(),
            RichTextSegment::CodeInline(code) => {
                Element::new("code").class("inline-code").text(code.as_str()).into()
            }
            RichTextSegment::InteractiveVariable {
                variable_id,
                display_name,
            } => Element::span("interactive-variable")
                .attr("data-variable-id", variable_id.as_str())
                .text(display_name.as_str())
                .into(),
            RichTextSegment::Unknown(value) => {
                self.render_raw("rich text segment", value, RichTextSegment::KNOWN_TAGS)
            }
        }
    }

    // =========================================================================
    // Math and scopes
    // =========================================================================

    /// Render an expression and register its tagged nodes in the current scope
    pub(crate) fn render_math(&mut self, node: &ExpressionNode, display: bool) -> PresentationNode {
        let mut layout = self.math.render(node);
        let scope = self.current_scope();
        let registry = &mut self.registry;
        layout.visit_mut(&mut |n| {
            if let Some(id) = n.data_id.as_deref() {
                n.handle = registry.register(id, scope.clone()).map(|h| h.value());
            }
        });
        PresentationNode::Math { layout, display }
    }

    pub(crate) fn current_scope(&self) -> OccurrenceScope {
        OccurrenceScope {
            section_id: self.sections.last().cloned(),
            proof_node: self.proof_nodes.last().cloned(),
        }
    }

    /// Register a proof node and make it the innermost scope.
    ///
    /// Returns the node's document order index; pair with `leave_proof_node`.
    pub(crate) fn enter_proof_node(&mut self, id: &str, parent: Option<&str>) -> usize {
        let parent = parent
            .map(str::to_string)
            .or_else(|| self.proof_nodes.last().map(|p| p.id.clone()));
        let section = self.sections.last().cloned();
        let index = self
            .registry
            .register_proof_node(id, section.as_deref(), parent.as_deref());
        self.proof_nodes.push(ProofNodeRef {
            id: id.to_string(),
            index,
        });
        index
    }

    pub(crate) fn leave_proof_node(&mut self) {
        self.proof_nodes.pop();
    }

    /// Placeholder or error marker for a value that did not decode
    pub(crate) fn render_raw(&self, kind: &str, value: &Value, known_tags: &[&str]) -> PresentationNode {
        match RawVariant::classify(value, known_tags) {
            RawVariant::UnknownTag(tag) => {
                warn!("Unknown {} variant {}", kind, tag);
                PresentationNode::placeholder(kind, tag)
            }
            RawVariant::Malformed { tag, detail } => {
                warn!("Malformed {} variant {}: {}", kind, tag, detail);
                PresentationNode::error(format!("{}: {}", tag, detail))
            }
        }
    }
}

/// Fragment identifier for an element id
pub fn anchor(id: &str) -> String {
    urlencoding::encode(id).into_owned()
}

/// Schemes allowed in `href` and `src`; scheme-less urls are relative
const SAFE_SCHEMES: &[&str] = &["http", "https", "mailto"];

/// The url, trimmed, if it is relative or uses a safe scheme.
///
/// Whitespace and control characters are ignored when reading the scheme,
/// as browsers do.
pub(crate) fn safe_url(url: &str) -> Option<&str> {
    let compact: String = url
        .chars()
        .filter(|c| !c.is_ascii_whitespace() && !c.is_ascii_control())
        .collect();
    match compact.find([':', '/', '?', '#']) {
        Some(end) if compact[end..].starts_with(':') => {
            let scheme = compact[..end].to_ascii_lowercase();
            if SAFE_SCHEMES.contains(&scheme.as_str()) {
                Some(url.trim())
            } else {
                warn!("Dropping url with scheme {}", scheme);
                None
            }
        }
        _ => Some(url.trim()),
    }
}

/// Link kind and href for a link target
fn link_href(target: &LinkTarget) -> Option<(&'static str, String)> {
    match target {
        LinkTarget::Url(url) => safe_url(url).map(|url| ("external", url.to_string())),
        LinkTarget::InternalPageId(id) => Some(("internal", format!("#{}", anchor(id)))),
        LinkTarget::DefinitionId { term_id, .. } => {
            Some(("definition", format!("#def-{}", anchor(term_id))))
        }
        LinkTarget::TheoremId(id) => Some(("theorem", format!("#{}", anchor(id)))),
        LinkTarget::GlossaryTerm(term) => Some(("glossary", format!("#glossary-{}", anchor(term)))),
        LinkTarget::BibliographyKey(key) => Some(("citation", format!("#bib-{}", anchor(key)))),
        LinkTarget::InteractiveElementId(id) => Some(("interactive", format!("#{}", anchor(id)))),
        LinkTarget::Unknown(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use math::ExpressionContent;

    fn render(section: &Section) -> RenderedDocument {
        DocumentRenderer::default().render_document(std::slice::from_ref(section))
    }

    #[test]
    fn test_section_attributes_and_title() {
        let section = Section::new("intro").with_title("Introduction");
        let doc = render(&section);
        let sections = doc.root.find_by_class("section");
        assert_eq!(sections.len(), 1);
        assert_eq!(sections[0].attribute("data-section-id"), Some("intro"));
        assert_eq!(doc.root.find_by_class("section-title")[0].tag, "h2");
        assert_eq!(doc.root.text_content(), "Introduction");
    }

    #[test]
    fn test_section_numbering() {
        let mut child = Section::new("a.1").with_title("Child");
        child.display_options = Some(doc_model::SectionDisplayOptions {
            show_title_numbering: Some(true),
        });
        let mut second = Section::new("b").with_title("Second");
        second.display_options = child.display_options.clone();
        let first = Section::new("a")
            .with_title("First")
            .with_content(vec![SectionContentNode::SubSection(Box::new(child))]);

        let doc = DocumentRenderer::default().render_document(&[first, second]);
        let numbers: Vec<String> = doc
            .root
            .find_by_class("section-number")
            .iter()
            .map(|e| PresentationNode::Element((*e).clone()).text_content())
            .collect();
        assert_eq!(numbers, vec!["1.1 ", "2 "]);
    }

    #[test]
    fn test_math_block_registers_handles() {
        let expr = ExpressionNode::new(
            "sum",
            ExpressionContent::Power {
                base: ExpressionNode::identifier("x"),
                exponent: ExpressionNode::number("2"),
            },
        );
        let section = Section::new("s").with_content(vec![SectionContentNode::math(expr)]);
        let doc = render(&section);
        assert_eq!(doc.registry.occurrences("sum").len(), 1);
        assert_eq!(doc.registry.occurrences("x").len(), 1);
        let occ = &doc.registry.occurrences("x")[0];
        assert_eq!(occ.scope.section_id.as_deref(), Some("s"));
        assert_eq!(occ.scope.proof_node, None);
    }

    #[test]
    fn test_missing_math_payload_is_error_marker() {
        let section = Section::new("s").with_content(vec![
            SectionContentNode::Math {
                math: None,
                label: None,
                caption: None,
            },
            SectionContentNode::paragraph("after"),
        ]);
        let doc = render(&section);
        assert_eq!(doc.root.error_count(), 1);
        assert!(doc.root.text_content().contains("after"));
    }

    #[test]
    fn test_unknown_and_malformed_content() {
        let json = r#"{"id": "s", "content": [
            {"Hologram": {"x": 1}},
            {"List": {"oops": true}},
            {"RichText": {"segments": [{"Text": "still here"}]}}
        ]}"#;
        let section = Section::from_json(json).unwrap();
        let doc = render(&section);
        assert_eq!(doc.root.placeholder_count(), 1);
        assert_eq!(doc.root.error_count(), 1);
        assert!(doc.root.text_content().contains("still here"));
    }

    #[test]
    fn test_link_targets() {
        let text = RichText::from_segments(vec![RichTextSegment::Link {
            content: vec![RichTextSegment::Text("group".to_string())],
            target: LinkTarget::DefinitionId {
                term_id: "abelian group".to_string(),
                theory_context: Some("algebra".to_string()),
            },
            tooltip: None,
        }]);
        let section = Section::new("s").with_content(vec![SectionContentNode::RichText(text)]);
        let doc = render(&section);
        let link = doc.root.find_by_class("link")[0];
        assert_eq!(link.attribute("href"), Some("#def-abelian%20group"));
        assert_eq!(link.attribute("data-theory"), Some("algebra"));
        assert!(link.has_class("link-definition"));
    }

    #[test]
    fn test_custom_component_without_fallback() {
        let section = Section::new("s").with_content(vec![SectionContentNode::CustomComponent {
            name: "Widget".to_string(),
            props: None,
            fallback_content: vec![],
        }]);
        assert_eq!(render(&section).root.placeholder_count(), 1);
    }

    #[test]
    fn test_url_schemes() {
        assert_eq!(safe_url("https://example.org/a"), Some("https://example.org/a"));
        assert_eq!(safe_url(" notes/ch1.html#x "), Some("notes/ch1.html#x"));
        assert_eq!(safe_url("mailto:a@b.org"), Some("mailto:a@b.org"));
        assert_eq!(safe_url("/path:with-colon"), Some("/path:with-colon"));
        assert_eq!(safe_url("javascript:alert(1)"), None);
        assert_eq!(safe_url("JavaScript:alert(1)"), None);
        assert_eq!(safe_url("java\tscript:alert(1)"), None);
        assert_eq!(safe_url("data:text/html,hi"), None);
    }

    #[test]
    fn test_unsafe_link_has_no_href() {
        let text = RichText::from_segments(vec![RichTextSegment::Link {
            content: vec![RichTextSegment::Text("click".to_string())],
            target: LinkTarget::Url("javascript:alert(1)".to_string()),
            tooltip: None,
        }]);
        let section = Section::new("s").with_content(vec![SectionContentNode::RichText(text)]);
        let doc = render(&section);
        let link = doc.root.find_by_class("link")[0];
        assert_eq!(link.attribute("href"), None);
        assert!(link.has_class("link-unknown"));
        assert_eq!(doc.root.text_content(), "click");
    }

    #[test]
    fn test_anchor_encoding() {
        assert_eq!(anchor("a b/c"), "a%20b%2Fc");
        assert_eq!(anchor("plain"), "plain");
    }
}
