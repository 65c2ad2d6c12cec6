//! Rendering of structured math blocks

use crate::document::{anchor, safe_url, DocumentRenderer};
use crate::presentation::{Element, PresentationNode};
use doc_model::{LinkTarget, StructuredMathNode, TheoremStatement};

impl DocumentRenderer {
    pub(crate) fn render_structured(&mut self, node: &StructuredMathNode) -> PresentationNode {
        use StructuredMathNode as S;

        if let S::Unknown(value) = node {
            return self.render_raw("structured math", value, StructuredMathNode::KNOWN_TAGS);
        }

        let mut block = Element::div("structured-math").class(format!("structured-{}", node.css_name()));
        let mut title = Element::div("structured-title")
            .child(Element::span("structured-kind").text(node.title()));
        if let Some(label) = node.label() {
            block = block.attr("data-label", label);
            title = title.child(Element::span("structured-label").text(format!(" {}", label)));
        }

        match node {
            S::Definition {
                term_display,
                formal_term,
                body,
                abstraction_meta,
                ..
            } => {
                if !term_display.is_empty() {
                    title = title.child(
                        Element::span("defined-term").children(self.render_segments(term_display)),
                    );
                }
                if let Some(level) = abstraction_meta.as_ref().and_then(|m| m.level) {
                    block = block.attr("data-abstraction-level", level.to_string());
                }
                block.push(title);
                if let Some(term) = formal_term {
                    block.push(Element::div("formal-term").child(self.render_math(term, true)));
                }
                block = block.children(self.render_contents(body));
            }
            S::TheoremLike {
                statement,
                proof,
                abstraction_meta,
                ..
            } => {
                if let Some(level) = abstraction_meta.as_ref().and_then(|m| m.level) {
                    block = block.attr("data-abstraction-level", level.to_string());
                }
                block.push(title);
                let statement = match statement {
                    TheoremStatement::Content(content) => {
                        Element::div("theorem-statement").children(self.render_contents(content))
                    }
                    TheoremStatement::Mathematical(expr) => {
                        Element::div("theorem-statement").child(self.render_math(expr, true))
                    }
                };
                block.push(statement);
                if let Some(proof) = proof {
                    block.push(self.render_proof(proof, None));
                }
            }
            S::Example {
                introduction,
                body,
                explanation,
                ..
            } => {
                block.push(title);
                for (class, content) in [
                    ("example-introduction", introduction),
                    ("example-body", body),
                    ("example-explanation", explanation),
                ] {
                    if !content.is_empty() {
                        block.push(Element::div(class).children(self.render_contents(content)));
                    }
                }
            }
            S::Remark { body, .. } => {
                block.push(title);
                block = block.children(self.render_contents(body));
            }
            S::Axiom {
                statement,
                abstraction_meta,
                ..
            } => {
                if let Some(level) = abstraction_meta.as_ref().and_then(|m| m.level) {
                    block = block.attr("data-abstraction-level", level.to_string());
                }
                block.push(title);
                block = block.children(self.render_contents(statement));
            }
            S::Exercise {
                problem_statement,
                hints,
                solution,
                ..
            } => {
                block.push(title);
                block.push(
                    Element::div("exercise-problem").children(self.render_contents(problem_statement)),
                );
                for hint in hints {
                    let rendered = self.render_collapsible(hint, "hint");
                    block.push(rendered);
                }
                if let Some(solution) = solution {
                    let rendered = self.render_collapsible(solution, "solution");
                    block.push(rendered);
                }
            }
            S::ConstructorDefinition {
                title_display,
                body,
                formal_parameters,
                return_type_summary,
                return_type_link,
                ..
            } => {
                if !title_display.is_empty() {
                    title = title.child(
                        Element::span("constructor-name").children(self.render_segments(title_display)),
                    );
                }
                block.push(title);
                if !formal_parameters.is_empty() {
                    let mut params = Element::new("dl").class("constructor-parameters");
                    for (name, description) in formal_parameters {
                        params.push(Element::new("dt").text(name.as_str()));
                        params.push(Element::new("dd").children(self.render_segments(description)));
                    }
                    block.push(params);
                }
                if !return_type_summary.is_empty() {
                    let summary = self.render_segments(return_type_summary);
                    let returns: PresentationNode = match return_type_link.as_ref().and_then(internal_href) {
                        Some(href) => Element::new("a").attr("href", href).children(summary).into(),
                        None => Element::span("return-type").children(summary).into(),
                    };
                    block.push(
                        Element::div("constructor-returns")
                            .text("Returns: ")
                            .child(returns),
                    );
                }
                block = block.children(self.render_contents(body));
            }
            S::CollectionView {
                description,
                variants,
                variant_links,
                ..
            } => {
                block.push(title);
                if let Some(description) = description {
                    let paragraph = self.render_paragraph(description);
                    block.push(paragraph);
                }
                let mut list = Element::new("ul").class("collection-variants");
                for (i, (name, summary)) in variants.iter().enumerate() {
                    let name_node: PresentationNode =
                        match variant_links.get(i).and_then(internal_href) {
                            Some(href) => Element::new("a").attr("href", href).text(name.as_str()).into(),
                            None => Element::span("variant-name").text(name.as_str()).into(),
                        };
                    list.push(
                        Element::new("li")
                            .child(name_node)
                            .child(Element::span("variant-summary").text(format!(" – {}", summary))),
                    );
                }
                block.push(list);
            }
            S::Unknown(_) => {}
        }

        block.into()
    }
}

fn internal_href(target: &LinkTarget) -> Option<String> {
    match target {
        LinkTarget::Url(url) => safe_url(url).map(str::to_string),
        LinkTarget::InternalPageId(id)
        | LinkTarget::TheoremId(id)
        | LinkTarget::InteractiveElementId(id) => Some(format!("#{}", anchor(id))),
        LinkTarget::DefinitionId { term_id, .. } => Some(format!("#def-{}", anchor(term_id))),
        _ => None,
    }
}
