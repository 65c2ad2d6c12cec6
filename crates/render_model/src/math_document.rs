//! Top-level document rendering
//!
//! A document renders as an `article.math-document` holding, in order, its
//! title, abstract, table of contents, body sections, footnotes, glossary
//! and bibliography. Footnotes, glossary entries and bibliography entries
//! carry the `fn-`, `glossary-` and `bib-` anchors that rich-text links
//! point at.

use crate::document::{anchor, DocumentRenderer, RenderedDocument};
use crate::presentation::{Element, PresentationNode};
use doc_model::{
    BibEntry, ComparisonDocument, DocumentStructure, EmbedDocument, MathDocument,
    MathDocumentType, RelationshipDocument, Section, SimplifiedContent, TocNode,
};
use math::symbols;
use tracing::debug;

impl DocumentRenderer {
    /// Render a whole document as the root of the output
    pub fn render_math_document(mut self, document: &MathDocument) -> RenderedDocument {
        let root = self.render_math_document_node(document);
        RenderedDocument {
            root,
            registry: self.registry,
        }
    }

    /// Render a document in place; embedded documents come through here too
    pub(crate) fn render_math_document_node(&mut self, document: &MathDocument) -> PresentationNode {
        use MathDocumentType as T;
        let tag = document.content_type.tag();
        debug!("Rendering {} document {}", tag, document.id);

        let mut article = Element::new("article")
            .class("math-document")
            .class(format!("math-document-{}", kebab(tag)))
            .attr("id", anchor(&document.id))
            .attr("data-document-id", document.id.as_str())
            .attr("data-document-type", tag);
        if let Some(title) = document.title() {
            article.push(self.document_header(title));
        }

        let content = match &document.content_type {
            T::WikiPage(c)
            | T::Textbook(c)
            | T::ScientificPaper(c)
            | T::PersonalNotes(c)
            | T::MathematicianNotes(c)
            | T::StudyNotes(c) => self.render_structure(&c.structure),
            T::TooltipSummary(c) | T::BlogPost(c) | T::AbstractSummary(c) | T::ConceptMap(c) => {
                vec![self.render_simplified(&c.content)]
            }
            T::AnimatedPresentation(c)
            | T::InteractivePlayground(c)
            | T::TypeMappingDisplay(c)
            | T::ResourcePanel(c) => vec![self.render_body(&c.base_content)],
            T::ComparisonPage(c) => vec![self.render_comparison(c)],
            T::TransformationMapping(c) | T::ConceptAlignment(c) => {
                relationship_summary(c).into_iter().collect()
            }
            T::StaticPreview(c) | T::LiveEmbed(c) | T::ConceptExtract(c) | T::IFrameEmbed(c) => {
                vec![self.render_embed(c)]
            }
            T::Unknown(value) => vec![self.render_raw("document", value, MathDocumentType::KNOWN_TAGS)],
        };
        article.children(content).into()
    }

    fn document_header(&self, title: &str) -> Element {
        let level = (self.sections.len() + 1).min(6);
        Element::new("header").class("document-header").child(
            Element::new(format!("h{}", level))
                .class("document-title")
                .text(title),
        )
    }

    fn render_body(&mut self, sections: &[Section]) -> PresentationNode {
        Element::div("document-body")
            .children(sections.iter().map(|s| self.render_section(s)))
            .into()
    }

    // =========================================================================
    // Long-form structure
    // =========================================================================

    fn render_structure(&mut self, structure: &DocumentStructure) -> Vec<PresentationNode> {
        let mut out = Vec::new();

        if let Some(abstract_content) = &structure.abstract_content {
            out.push(
                Element::div("document-abstract")
                    .child(Element::new("h2").class("abstract-title").text("Abstract"))
                    .child(self.render_section(abstract_content))
                    .into(),
            );
        }

        if let Some(toc) = &structure.table_of_contents {
            out.push(
                Element::new("nav")
                    .class("table-of-contents")
                    .child(toc_list(std::slice::from_ref(toc)))
                    .into(),
            );
        }

        out.push(self.render_body(&structure.body));

        if !structure.footnotes.is_empty() {
            let mut list = Element::new("ol").class("footnote-list");
            for note in &structure.footnotes {
                list.push(
                    Element::new("li")
                        .class("footnote")
                        .attr("id", format!("fn-{}", anchor(&note.id)))
                        .child(self.render_section(note)),
                );
            }
            out.push(Element::new("aside").class("footnotes").child(list).into());
        }

        if !structure.glossary.is_empty() {
            let mut glossary = Element::div("glossary");
            for entry in &structure.glossary {
                glossary.push(
                    Element::div("glossary-entry")
                        .attr("id", format!("glossary-{}", anchor(&entry.id)))
                        .child(self.render_section(entry)),
                );
            }
            out.push(glossary.into());
        }

        if !structure.bibliography.is_empty() {
            let mut list = Element::new("ol").class("bibliography");
            for (i, entry) in structure.bibliography.iter().enumerate() {
                list.push(bib_item(entry, i + 1));
            }
            out.push(list.into());
        }

        out
    }

    // =========================================================================
    // Summaries, comparisons and embeds
    // =========================================================================

    fn render_simplified(&mut self, content: &SimplifiedContent) -> PresentationNode {
        let mut element = Element::div("simplified-content");

        if !content.key_points.is_empty() {
            let mut list = Element::new("ul").class("key-points");
            for point in &content.key_points {
                let mut item = Element::new("li")
                    .class("key-point")
                    .attr("data-key-point-id", point.id.as_str());
                if let Some(level) = &point.importance_level {
                    item = item
                        .class(format!("importance-{}", level.to_lowercase()))
                        .attr("data-importance", level.as_str());
                }
                if let Some(source) = &point.source_section_id {
                    item = item.attr("data-source-section", source.as_str());
                }
                list.push(item.children(self.render_segments(&point.content)));
            }
            element.push(list);
        }

        if !content.essential_definitions.is_empty() {
            let mut list = Element::new("dl").class("essential-definitions");
            for definition in &content.essential_definitions {
                list.push(Element::new("dt").class("definition-term").text(definition.term.as_str()));
                let mut body = Element::new("dd")
                    .class("definition-body")
                    .children(self.render_segments(&definition.simplified_definition));
                if let Some(formal) = &definition.formal_definition {
                    body.push(self.render_math(formal, true));
                }
                if let Some(explanation) = &definition.intuitive_explanation {
                    body.push(
                        Element::new("p")
                            .class("intuitive-explanation")
                            .children(self.render_segments(explanation)),
                    );
                }
                list.push(body);
            }
            element.push(list);
        }

        for example in &content.core_examples {
            let mut block = Element::div("core-example").attr("data-example-id", example.example_id.as_str());
            if let Some(level) = &example.difficulty_level {
                block = block.attr("data-difficulty", level.as_str());
            }
            if !example.title.is_empty() {
                block.push(Element::div("core-example-title").text(example.title.as_str()));
            }
            element.push(block.children(self.render_contents(&example.content)));
        }

        element.into()
    }

    fn render_comparison(&mut self, comparison: &ComparisonDocument) -> PresentationNode {
        let structure = &comparison.comparison_structure;
        let mut element = Element::div("comparison")
            .attr("data-comparison-type", structure.comparison_type.as_str());
        for section in &structure.sections {
            let mut row = Element::div("comparison-section")
                .attr("data-section-id", section.section_id.as_str())
                .child(Element::div("comparison-left").children(self.render_contents(&section.left_content)))
                .child(Element::div("comparison-right").children(self.render_contents(&section.right_content)));
            if let Some(notes) = &section.comparison_notes {
                row.push(Element::div("comparison-notes").children(self.render_segments(notes)));
            }
            element.push(row);
        }
        element.into()
    }

    fn render_embed(&mut self, embed: &EmbedDocument) -> PresentationNode {
        let mut element = Element::div("embedded-preview")
            .attr("data-source-document-id", embed.source_document_id.as_str());
        match &embed.content_snapshot {
            Some(snapshot) if !snapshot.is_empty() => element.push(self.render_simplified(snapshot)),
            _ => element.push(
                Element::new("a")
                    .class("embed-source")
                    .attr("href", format!("#{}", anchor(&embed.source_document_id)))
                    .text(format!("Embedded document {}", embed.source_document_id)),
            ),
        }
        element.into()
    }
}

fn toc_list(entries: &[TocNode]) -> Element {
    let mut list = Element::new("ol").class("toc-list");
    for entry in entries {
        let mut item = Element::new("li").class("toc-entry").child(
            Element::new("a")
                .attr("href", format!("#{}", anchor(&entry.target_id)))
                .text(entry.title.as_str()),
        );
        if !entry.children.is_empty() {
            item.push(toc_list(&entry.children));
        }
        list.push(item);
    }
    list
}

/// Entries without a key are anchored by their 1-based position
fn bib_item(entry: &BibEntry, position: usize) -> Element {
    let key = entry
        .key()
        .map(str::to_string)
        .unwrap_or_else(|| position.to_string());
    Element::new("li")
        .class("bib-entry")
        .attr("id", format!("bib-{}", anchor(&key)))
        .attr("data-entry-type", entry.entry_type.as_str())
        .text(entry.citation())
}

fn relationship_summary(document: &RelationshipDocument) -> Option<PresentationNode> {
    let (Some(source), Some(target)) = (&document.source_theory, &document.target_theory) else {
        return None;
    };
    Some(
        Element::div("theory-mapping")
            .child(Element::span("source-theory").text(source.as_str()))
            .text(format!(" {} ", symbols::RIGHT_ARROW))
            .child(Element::span("target-theory").text(target.as_str()))
            .into(),
    )
}

/// `ScientificPaper` to `scientific-paper`
fn kebab(tag: &str) -> String {
    let mut out = String::with_capacity(tag.len() + 4);
    for (i, c) in tag.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 {
                out.push('-');
            }
            out.push(c.to_ascii_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::html::HtmlWriter;
    use doc_model::{RichText, RichTextSegment, SectionContentNode};

    const PAPER: &str = r#"{
        "id": "paper-1",
        "content_type": {"ScientificPaper": {
            "title": "On Groups",
            "peer_reviewed": true,
            "structure": {
                "abstract_content": {"id": "abs", "content": [{"RichText": {"segments": [{"Text": "We study groups."}]}}]},
                "table_of_contents": {"title": "Contents", "target_id": "intro", "children": [
                    {"title": "1. Intro", "target_id": "intro"}
                ]},
                "body": [{"id": "intro", "content": [{"RichText": {"segments": [
                    {"Text": "See"},
                    {"FootnoteReference": "n1"},
                    {"Link": {"content": [{"Text": "groups"}], "target": {"GlossaryTerm": "group"}}},
                    {"Link": {"content": [{"Text": "[1]"}], "target": {"BibliographyKey": "lang02"}}},
                    {"Math": {"id": "e7", "content": {"Identifier": {"body": "G"}}}}
                ]}}]}],
                "footnotes": [{"id": "n1", "content": [{"RichText": {"segments": [{"Text": "A footnote."}]}}]}],
                "glossary": [{"id": "group", "content": [{"RichText": {"segments": [{"Text": "A set with an operation."}]}}]}],
                "bibliography": [
                    {"entry_type": "book", "fields": [["key", "lang02"], ["author", "S. Lang"], ["title", "Algebra"], ["year", "2002"]]},
                    {"entry_type": "misc", "fields": [["note", "Lecture notes"]]}
                ]
            }
        }}
    }"#;

    fn render(json: &str) -> RenderedDocument {
        let document = MathDocument::from_json(json).unwrap();
        DocumentRenderer::default().render_math_document(&document)
    }

    #[test]
    fn test_paper_parts_in_order() {
        let rendered = render(PAPER);
        let root = &rendered.root;
        let article = root.as_element().unwrap();
        assert_eq!(article.attribute("data-document-type"), Some("ScientificPaper"));
        assert!(article.has_class("math-document-scientific-paper"));

        let order: Vec<&str> = root
            .children()
            .iter()
            .filter_map(|c| c.as_element())
            .filter_map(|e| e.classes.first().map(String::as_str))
            .collect();
        assert_eq!(
            order,
            vec![
                "document-header",
                "document-abstract",
                "table-of-contents",
                "document-body",
                "footnotes",
                "glossary",
                "bibliography"
            ]
        );
        assert_eq!(rendered.registry.occurrences("e7").len(), 1);
    }

    #[test]
    fn test_link_anchors_resolve() {
        let html = HtmlWriter::default().write(&render(PAPER).root);
        for (href, id) in [
            ("#fn-n1", "fn-n1"),
            ("#glossary-group", "glossary-group"),
            ("#bib-lang02", "bib-lang02"),
            ("#intro", "intro"),
        ] {
            assert!(html.contains(&format!(r#"href="{}""#, href)), "missing link {}", href);
            assert!(html.contains(&format!(r#"id="{}""#, id)), "missing anchor {}", id);
        }
        // Keyless entries fall back to their position
        assert!(html.contains(r#"id="bib-2""#));
        assert!(html.contains("S. Lang. Algebra. 2002."));
    }

    #[test]
    fn test_embedded_document_renders_in_section() {
        let tooltip = MathDocument::new(
            "tip",
            MathDocumentType::TooltipSummary(doc_model::SummaryDocument {
                title: Some("Groups in brief".to_string()),
                content: SimplifiedContent {
                    key_points: vec![doc_model::KeyPoint {
                        id: "k1".to_string(),
                        content: vec![RichTextSegment::Math(math::ExpressionNode::identifier("G"))],
                        importance_level: Some("Critical".to_string()),
                        source_section_id: None,
                    }],
                    ..SimplifiedContent::default()
                },
                details: Default::default(),
            }),
        );
        let section = Section::new("s").with_content(vec![
            SectionContentNode::EmbeddedDocument(Box::new(tooltip)),
            SectionContentNode::RichText(RichText::plain("after")),
        ]);
        let rendered = DocumentRenderer::default().render_document(&[section]);
        let root = &rendered.root;
        assert_eq!(root.placeholder_count(), 0);
        assert_eq!(root.find_by_class("math-document-tooltip-summary").len(), 1);
        assert_eq!(root.find_by_class("importance-critical").len(), 1);
        // Nested one section deep, so the title is an h2
        assert_eq!(root.find_by_class("document-title")[0].tag, "h2");
        let occ = &rendered.registry.occurrences("G")[0];
        assert_eq!(occ.scope.section_id.as_deref(), Some("s"));
        assert!(root.text_content().contains("after"));
    }

    #[test]
    fn test_unknown_kind_is_placeholder() {
        let rendered = render(r#"{"id": "d", "content_type": {"Hypertext": {"pages": 2}}}"#);
        assert_eq!(rendered.root.placeholder_count(), 1);

        let rendered = render(r#"{"id": "d", "content_type": {"Textbook": {"structure": 5}}}"#);
        assert_eq!(rendered.root.error_count(), 1);
    }

    #[test]
    fn test_comparison_and_embed() {
        let rendered = render(
            r#"{"id": "cmp", "content_type": {"ComparisonPage": {
                "title": "Groups vs rings",
                "comparison_structure": {"comparison_type": "Structural", "sections": [
                    {"section_id": "c1",
                     "left_content": [{"RichText": {"segments": [{"Text": "one operation"}]}}],
                     "right_content": [{"RichText": {"segments": [{"Text": "two operations"}]}}],
                     "comparison_notes": [{"Text": "rings extend groups"}]}
                ]}
            }}}"#,
        );
        let text = rendered.root.text_content();
        assert!(text.contains("one operation"));
        assert!(text.contains("rings extend groups"));

        let rendered = render(r#"{"id": "e", "content_type": {"LiveEmbed": {"source_document_id": "paper-1"}}}"#);
        let links = rendered.root.find_by_class("embed-source");
        assert_eq!(links[0].attribute("href"), Some("#paper-1"));
    }

    #[test]
    fn test_kebab_tags() {
        assert_eq!(kebab("WikiPage"), "wiki-page");
        assert_eq!(kebab("IFrameEmbed"), "i-frame-embed");
    }
}
