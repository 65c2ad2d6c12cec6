//! Render Model - Document tree to HTML
//!
//! This crate provides:
//! - A presentation tree built from documents, sections, proofs and embedded math
//! - Registration of every expression occurrence for highlighting
//! - An HTML writer for presentation trees

mod blocks;
mod config;
mod document;
mod error;
mod html;
mod math_document;
mod presentation;
mod proof;
mod structured;

pub use config::*;
pub use document::*;
pub use error::*;
pub use html::*;
pub use presentation::*;

use doc_model::{MathDocument, Section};

/// Render sections to HTML with nothing highlighted
pub fn render_sections_html(sections: &[Section], config: HtmlConfig) -> String {
    let rendered = DocumentRenderer::new(config.clone()).render_document(sections);
    HtmlWriter::new(config).write(&rendered.root)
}

/// Parse a section from JSON and render it to HTML
pub fn render_section_json(json: &str, config: HtmlConfig) -> Result<String> {
    let section = Section::from_json(json)?;
    Ok(render_sections_html(std::slice::from_ref(&section), config))
}

/// Parse a whole document from JSON and render it to HTML
pub fn render_math_document_json(json: &str, config: HtmlConfig) -> Result<String> {
    let document = MathDocument::from_json(json)?;
    let rendered = DocumentRenderer::new(config.clone()).render_math_document(&document);
    Ok(HtmlWriter::new(config).write(&rendered.root))
}
