//! mathdoc: render a structured mathematical document to HTML
//!
//! Run with: mathdoc document.json --highlight e7 --proof-node proof-1.2

mod cli;
mod settings;

use anyhow::Context;
use cli::{Options, USAGE};
use doc_model::{MathDocument, Section};
use highlight::HighlightCoordinator;
use math::ExpressionNode;
use render_model::{DocumentRenderer, HtmlWriter, RenderedDocument};
use serde::Deserialize;
use settings::Settings;
use std::io::{Read, Write};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// A document file holds a whole document, one section or a list of sections
#[derive(Deserialize)]
#[serde(untagged)]
enum DocumentInput {
    Sections(Vec<Section>),
    /// Tried before `Single`: a section only needs an `id`
    Document(Box<MathDocument>),
    Single(Box<Section>),
}

impl DocumentInput {
    fn render(self, renderer: DocumentRenderer) -> RenderedDocument {
        match self {
            DocumentInput::Sections(sections) => renderer.render_document(&sections),
            DocumentInput::Document(document) => renderer.render_math_document(&document),
            DocumentInput::Single(section) => renderer.render_document(std::slice::from_ref(&*section)),
        }
    }
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let options = Options::parse(std::env::args().skip(1))?;
    if options.help {
        println!("{}", USAGE);
        return Ok(());
    }

    let mut settings = match &options.settings {
        Some(path) => Settings::load(path)
            .with_context(|| format!("failed to read settings {}", path.display()))?,
        None => Settings::default(),
    };
    if options.standalone {
        settings.html.standalone = true;
    }

    let input = read_input(&options)?;
    let renderer =
        DocumentRenderer::new(settings.html.clone()).with_math_config(settings.math.clone());
    let rendered = if options.expression {
        let node = ExpressionNode::from_json(&input).context("failed to decode expression")?;
        renderer.render_standalone_expression(&node)
    } else {
        let document: DocumentInput =
            serde_json::from_str(&input).context("failed to decode document")?;
        document.render(renderer)
    };
    tracing::info!(
        "Rendered {} proof node(s), {} expression handle(s)",
        rendered.registry.proof_node_count(),
        rendered.registry.handle_count()
    );

    let html = write_html(rendered, &options, &settings);
    std::io::stdout()
        .write_all(html.as_bytes())
        .context("failed to write output")?;
    Ok(())
}

fn read_input(options: &Options) -> anyhow::Result<String> {
    match &options.input {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            std::io::stdin()
                .read_to_string(&mut input)
                .context("failed to read standard input")?;
            Ok(input)
        }
    }
}

/// Apply the requested highlight and serialize
fn write_html(rendered: RenderedDocument, options: &Options, settings: &Settings) -> String {
    let RenderedDocument { root, registry } = rendered;
    let mut coordinator = HighlightCoordinator::new(registry).with_bindings(settings.keys.clone());
    if let Some(mode) = options.mode {
        coordinator.set_mode(mode);
    }
    coordinator.set_context(options.proof_node.clone(), options.section.clone());
    if let Some(id) = &options.highlight {
        let selected = coordinator.highlight_by_id(id);
        if selected.is_empty() {
            tracing::warn!("No occurrence of {} in scope", id);
        }
    }
    for key in &options.keys {
        match coordinator.handle_key(key) {
            Some(action) => tracing::debug!("Key {} -> {:?}", key, action),
            None => tracing::warn!("Key {} is not bound", key),
        }
    }

    HtmlWriter::new(settings.html.clone())
        .with_highlighted(coordinator.current().raw_handles())
        .write(&root)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"[{
        "id": "s1",
        "content": [{"StructuredMath": {"TheoremLike": {
            "kind": "Lemma",
            "statement": {"Content": []},
            "proof": {"steps": [
                {"id": "p1", "kind": {"Statement": {"claim": [{"Math": {"id": "e7", "content": {"Identifier": {"body": "x"}}}}]}}},
                {"id": "p2", "kind": {"Statement": {"claim": [{"Math": {"id": "e7", "content": {"Identifier": {"body": "x"}}}}]}}}
            ]}
        }}}]
    }]"#;

    fn render(options: &Options) -> String {
        let document: DocumentInput = serde_json::from_str(DOC).unwrap();
        write_html(document.render(DocumentRenderer::default()), options, &Settings::default())
    }

    #[test]
    fn test_single_section_input() {
        let document: DocumentInput = serde_json::from_str(r#"{"id": "only"}"#).unwrap();
        assert!(matches!(&document, DocumentInput::Single(section) if section.id == "only"));
    }

    #[test]
    fn test_whole_document_input() {
        let json = r#"{"id": "notes", "content_type": {"StudyNotes": {
            "title": "Week 1",
            "structure": {"body": [{"id": "s1", "content": [
                {"Math": {"math": {"id": "e7", "content": {"Identifier": {"body": "x"}}}}}
            ]}]}
        }}}"#;
        let document: DocumentInput = serde_json::from_str(json).unwrap();
        assert!(matches!(document, DocumentInput::Document(_)));

        let options = Options {
            highlight: Some("e7".to_string()),
            mode: Some(highlight::HighlightMode::EntireDocument),
            ..Options::default()
        };
        let html = write_html(document.render(DocumentRenderer::default()), &options, &Settings::default());
        assert!(html.contains(r#"data-document-type="StudyNotes""#));
        assert_eq!(html.matches("highlighted").count(), 1);
    }

    #[test]
    fn test_highlight_scoped_to_proof_node() {
        let options = Options {
            highlight: Some("e7".to_string()),
            proof_node: Some("p1".to_string()),
            ..Options::default()
        };
        assert_eq!(render(&options).matches("highlighted").count(), 1);
    }

    #[test]
    fn test_key_replay_switches_mode() {
        let options = Options {
            highlight: Some("e7".to_string()),
            proof_node: Some("p1".to_string()),
            keys: vec!["2".to_string()],
            ..Options::default()
        };
        assert_eq!(render(&options).matches("highlighted").count(), 2);

        let options = Options {
            keys: vec!["2".to_string(), "Escape".to_string()],
            ..options
        };
        assert_eq!(render(&options).matches("highlighted").count(), 0);
    }
}
