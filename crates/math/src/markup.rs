//! Markup Writer - Serialize a layout tree to nested HTML spans
//!
//! Each layout node becomes a `<span>` with a `math-*` class. Nodes that carry
//! an expression id expose it as `data-id`, and nodes with a registry handle
//! expose `data-handle`; handles in the writer's highlight set also receive the
//! `highlighted` class.

use crate::layout::{FenceStretch, LayoutKind, LayoutNode, SpaceWidth, VerticalAlign};
use crate::measure::{LayoutEngine, MathFontMetrics};
use std::collections::BTreeSet;
use std::fmt::Write;

/// Writes layout trees as HTML
#[derive(Debug, Clone, Default)]
pub struct MarkupWriter {
    engine: LayoutEngine,
    highlighted: BTreeSet<u32>,
}

impl MarkupWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: MathFontMetrics) -> Self {
        Self {
            engine: LayoutEngine::with_metrics(metrics),
            highlighted: BTreeSet::new(),
        }
    }

    /// Mark these handles as highlighted
    pub fn with_highlighted(mut self, handles: impl IntoIterator<Item = u32>) -> Self {
        self.highlighted = handles.into_iter().collect();
        self
    }

    /// Serialize a layout tree
    pub fn write(&self, node: &LayoutNode) -> String {
        let mut out = String::new();
        self.write_node(node, &mut out);
        out
    }

    fn write_node(&self, node: &LayoutNode, out: &mut String) {
        match &node.kind {
            LayoutKind::Empty => {
                self.open(node, "math-empty", None, out);
            }
            LayoutKind::Glyph { text, class } => {
                self.open(node, &format!("math-{}", class.css_name()), None, out);
                out.push_str(&escape_html(text));
            }
            LayoutKind::Row(children) => {
                self.open(node, "math-row", None, out);
                for child in children {
                    self.write_node(child, out);
                }
            }
            LayoutKind::Scripts { base, sub, sup } => {
                self.open(node, "math-scripts", None, out);
                self.wrap("math-base", base, out);
                if let Some(sub) = sub {
                    self.wrap("math-sub", sub, out);
                }
                if let Some(sup) = sup {
                    self.wrap("math-sup", sup, out);
                }
            }
            LayoutKind::UnderOver { base, under, over } => {
                self.open(node, "math-underover", None, out);
                if let Some(over) = over {
                    self.wrap("math-over", over, out);
                }
                self.wrap("math-base", base, out);
                if let Some(under) = under {
                    self.wrap("math-under", under, out);
                }
            }
            LayoutKind::Fraction {
                numerator,
                denominator,
            } => {
                self.open(node, "math-frac", None, out);
                self.wrap("math-num", numerator, out);
                out.push_str(r#"<span class="math-frac-rule"></span>"#);
                self.wrap("math-den", denominator, out);
            }
            LayoutKind::Radical { degree, radicand } => {
                self.open(node, "math-sqrt", None, out);
                if let Some(degree) = degree {
                    self.wrap("math-root-degree", degree, out);
                }
                out.push_str(r#"<span class="math-sqrt-sign">&#x221A;</span>"#);
                self.wrap("math-radicand", radicand, out);
            }
            LayoutKind::Table { rows, align } => {
                let class = match align {
                    VerticalAlign::Baseline => "math-table math-align-baseline",
                    VerticalAlign::Middle => "math-table math-align-middle",
                };
                self.open(node, class, None, out);
                for row in rows {
                    out.push_str(r#"<span class="math-table-row">"#);
                    for cell in row {
                        self.wrap("math-cell", cell, out);
                    }
                    out.push_str("</span>");
                }
            }
            LayoutKind::Space(width) => {
                let class = match width {
                    SpaceWidth::Thin => "math-space math-space-thin",
                    SpaceWidth::Medium => "math-space math-space-medium",
                    SpaceWidth::Thick => "math-space math-space-thick",
                    SpaceWidth::Quad => "math-space math-space-quad",
                };
                self.open(node, class, None, out);
            }
            LayoutKind::Fence {
                open,
                close,
                inner,
                stretch,
            } => {
                let style = match stretch {
                    FenceStretch::Normal => None,
                    _ => {
                        let scale = self.engine.fence_scale(*stretch, &self.engine.measure(inner));
                        (scale > 1.0).then(|| format!("font-size: {:.0}%", scale * 100.0))
                    }
                };
                self.open(node, "math-fence", None, out);
                self.fence_glyph("math-fence-open", open, style.as_deref(), out);
                self.write_node(inner, out);
                self.fence_glyph("math-fence-close", close, style.as_deref(), out);
            }
            LayoutKind::Placeholder { tag } => {
                self.open(node, "math-unknown", Some(&format!("Unknown expression: {}", tag)), out);
                let _ = write!(out, "[{}]", escape_html(tag));
            }
            LayoutKind::Error { message } => {
                self.open(node, "math-error", Some(message), out);
                out.push_str("[!]");
            }
        }
        out.push_str("</span>");
    }

    /// Open a span for `node`, including id, handle and highlight markers
    fn open(&self, node: &LayoutNode, class: &str, title: Option<&str>, out: &mut String) {
        out.push_str("<span class=\"");
        out.push_str(class);
        if node.handle.is_some_and(|h| self.highlighted.contains(&h)) {
            out.push_str(" highlighted");
        }
        out.push('"');
        if let Some(id) = &node.data_id {
            let _ = write!(out, " data-id=\"{}\"", escape_html(id));
        }
        if let Some(handle) = node.handle {
            let _ = write!(out, " data-handle=\"{}\"", handle);
        }
        if let Some(title) = title {
            let _ = write!(out, " title=\"{}\"", escape_html(title));
        }
        out.push('>');
    }

    fn wrap(&self, class: &str, node: &LayoutNode, out: &mut String) {
        let _ = write!(out, "<span class=\"{}\">", class);
        self.write_node(node, out);
        out.push_str("</span>");
    }

    fn fence_glyph(&self, class: &str, glyph: &str, style: Option<&str>, out: &mut String) {
        if glyph.is_empty() {
            return;
        }
        let _ = write!(out, "<span class=\"{}\"", class);
        if let Some(style) = style {
            let _ = write!(out, " style=\"{}\"", style);
        }
        let _ = write!(out, ">{}</span>", escape_html(glyph));
    }
}

/// Escape text for HTML content and attribute values
pub fn escape_html(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
