//! Layout Measurement - Compute extents for a layout tree
//!
//! The measurement pass walks a `LayoutNode` tree and returns the box each
//! node occupies relative to its baseline. It drives stretchy fence sizing and
//! gives callers an approximate footprint for display blocks.

use crate::layout::{FenceStretch, GlyphClass, LayoutKind, LayoutNode, VerticalAlign};
use serde::{Deserialize, Serialize};
use unicode_segmentation::UnicodeSegmentation;

// =============================================================================
// Font metrics
// =============================================================================

/// Math font metrics used for layout calculations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MathFontMetrics {
    /// Base font size in points
    pub font_size: f32,
    /// x-height (height of lowercase x)
    pub x_height: f32,
    /// Ascent above baseline
    pub ascent: f32,
    /// Descent below baseline
    pub descent: f32,
    /// Width of a typical character
    pub char_width: f32,
    /// Fraction bar thickness
    pub fraction_rule_thickness: f32,
    /// Gap above fraction bar
    pub fraction_num_gap: f32,
    /// Gap below fraction bar
    pub fraction_den_gap: f32,
    /// Radical rule thickness
    pub radical_rule_thickness: f32,
    /// Vertical gap for radical
    pub radical_vertical_gap: f32,
    /// Subscript shift down
    pub subscript_shift_down: f32,
    /// Superscript shift up
    pub superscript_shift_up: f32,
    /// Scale factor for sub/superscript
    pub script_scale: f32,
    /// Vertical gap between table rows
    pub row_gap: f32,
    /// Horizontal gap between table columns
    pub column_gap: f32,
    /// Large operator scale
    pub big_op_scale: f32,
}

impl Default for MathFontMetrics {
    fn default() -> Self {
        Self::for_size(16.0)
    }
}

impl MathFontMetrics {
    /// Create metrics for a given font size
    pub fn for_size(font_size: f32) -> Self {
        let em = font_size;
        Self {
            font_size,
            x_height: em * 0.45,
            ascent: em * 0.8,
            descent: em * 0.2,
            char_width: em * 0.5,
            fraction_rule_thickness: em * 0.04,
            fraction_num_gap: em * 0.15,
            fraction_den_gap: em * 0.15,
            radical_rule_thickness: em * 0.04,
            radical_vertical_gap: em * 0.1,
            subscript_shift_down: em * 0.25,
            superscript_shift_up: em * 0.4,
            script_scale: 0.7,
            row_gap: em * 0.3,
            column_gap: em * 0.8,
            big_op_scale: 1.4,
        }
    }

    /// Scale metrics for script (sub/superscript) size
    pub fn script_metrics(&self) -> Self {
        Self::for_size(self.font_size * self.script_scale)
    }

    /// Axis height, where fraction rules and fence centers sit
    pub fn axis_height(&self) -> f32 {
        self.x_height / 2.0
    }
}

// =============================================================================
// Layout box
// =============================================================================

/// Extent of a measured node relative to its baseline
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct LayoutBox {
    pub width: f32,
    /// Distance above the baseline
    pub ascent: f32,
    /// Distance below the baseline
    pub descent: f32,
}

impl LayoutBox {
    pub fn new(width: f32, ascent: f32, descent: f32) -> Self {
        Self {
            width,
            ascent,
            descent,
        }
    }

    pub fn height(&self) -> f32 {
        self.ascent + self.descent
    }

    /// Place `other` after this box on the same baseline
    fn append(&mut self, other: LayoutBox) {
        self.width += other.width;
        self.ascent = self.ascent.max(other.ascent);
        self.descent = self.descent.max(other.descent);
    }
}

// =============================================================================
// Layout engine
// =============================================================================

/// Measures layout trees
#[derive(Debug, Clone, Default)]
pub struct LayoutEngine {
    metrics: MathFontMetrics,
}

impl LayoutEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metrics(metrics: MathFontMetrics) -> Self {
        Self { metrics }
    }

    pub fn metrics(&self) -> &MathFontMetrics {
        &self.metrics
    }

    /// Measure a layout tree at the base font size
    pub fn measure(&self, node: &LayoutNode) -> LayoutBox {
        self.measure_node(node, &self.metrics)
    }

    /// Scale factor for a fence around content of the given extent
    pub fn fence_scale(&self, stretch: FenceStretch, inner: &LayoutBox) -> f32 {
        fence_scale(stretch, inner, &self.metrics)
    }

    fn measure_node(&self, node: &LayoutNode, metrics: &MathFontMetrics) -> LayoutBox {
        match &node.kind {
            LayoutKind::Empty => LayoutBox::default(),
            LayoutKind::Glyph { text, class } => self.measure_glyph(text, *class, metrics),
            LayoutKind::Row(children) => {
                let mut total = LayoutBox::default();
                for child in children {
                    total.append(self.measure_node(child, metrics));
                }
                total
            }
            LayoutKind::Scripts { base, sub, sup } => {
                self.measure_scripts(base, sub.as_deref(), sup.as_deref(), metrics)
            }
            LayoutKind::UnderOver { base, under, over } => {
                self.measure_under_over(base, under.as_deref(), over.as_deref(), metrics)
            }
            LayoutKind::Fraction {
                numerator,
                denominator,
            } => self.measure_fraction(numerator, denominator, metrics),
            LayoutKind::Radical { degree, radicand } => {
                self.measure_radical(degree.as_deref(), radicand, metrics)
            }
            LayoutKind::Table { rows, align } => self.measure_table(rows, *align, metrics),
            LayoutKind::Space(width) => LayoutBox::new(width.em() * metrics.font_size, 0.0, 0.0),
            LayoutKind::Fence {
                open,
                close,
                inner,
                stretch,
            } => {
                let inner_box = self.measure_node(inner, metrics);
                let scale = fence_scale(*stretch, &inner_box, metrics);
                let fence_count = [open, close].iter().filter(|g| !g.is_empty()).count();
                let mut total = inner_box;
                total.width += fence_count as f32 * metrics.char_width * 0.6 * scale;
                total.ascent = total.ascent.max(metrics.ascent * scale);
                total.descent = total.descent.max(metrics.descent * scale);
                total
            }
            LayoutKind::Placeholder { tag } => {
                self.measure_glyph(&format!("[?{}]", tag), GlyphClass::Text, metrics)
            }
            LayoutKind::Error { message } => {
                self.measure_glyph(&format!("[!{}]", message), GlyphClass::Text, metrics)
            }
        }
    }

    fn measure_glyph(&self, text: &str, class: GlyphClass, metrics: &MathFontMetrics) -> LayoutBox {
        let graphemes = text.graphemes(true).count() as f32;
        match class {
            GlyphClass::BigOperator => LayoutBox::new(
                graphemes * metrics.char_width * metrics.big_op_scale,
                metrics.ascent * metrics.big_op_scale,
                metrics.descent * metrics.big_op_scale,
            ),
            GlyphClass::Operator => LayoutBox::new(
                graphemes * metrics.char_width + metrics.char_width * 0.2,
                metrics.ascent,
                metrics.descent,
            ),
            _ => LayoutBox::new(graphemes * metrics.char_width, metrics.ascent, metrics.descent),
        }
    }

    fn measure_scripts(
        &self,
        base: &LayoutNode,
        sub: Option<&LayoutNode>,
        sup: Option<&LayoutNode>,
        metrics: &MathFontMetrics,
    ) -> LayoutBox {
        let mut total = self.measure_node(base, metrics);
        let script_metrics = metrics.script_metrics();
        let mut script_width: f32 = 0.0;

        if let Some(sub) = sub {
            let sub_box = self.measure_node(sub, &script_metrics);
            script_width = script_width.max(sub_box.width);
            total.descent = total
                .descent
                .max(metrics.subscript_shift_down + sub_box.descent);
        }
        if let Some(sup) = sup {
            let sup_box = self.measure_node(sup, &script_metrics);
            script_width = script_width.max(sup_box.width);
            total.ascent = total
                .ascent
                .max(metrics.superscript_shift_up + sup_box.ascent);
        }

        total.width += script_width;
        total
    }

    fn measure_under_over(
        &self,
        base: &LayoutNode,
        under: Option<&LayoutNode>,
        over: Option<&LayoutNode>,
        metrics: &MathFontMetrics,
    ) -> LayoutBox {
        let mut total = self.measure_node(base, metrics);
        let script_metrics = metrics.script_metrics();
        let gap = metrics.fraction_num_gap;

        if let Some(under) = under {
            let under_box = self.measure_node(under, &script_metrics);
            total.width = total.width.max(under_box.width);
            total.descent += gap + under_box.height();
        }
        if let Some(over) = over {
            let over_box = self.measure_node(over, &script_metrics);
            total.width = total.width.max(over_box.width);
            total.ascent += gap + over_box.height();
        }
        total
    }

    fn measure_fraction(
        &self,
        numerator: &LayoutNode,
        denominator: &LayoutNode,
        metrics: &MathFontMetrics,
    ) -> LayoutBox {
        let num = self.measure_node(numerator, metrics);
        let den = self.measure_node(denominator, metrics);
        let axis = metrics.axis_height();
        let half_rule = metrics.fraction_rule_thickness / 2.0;

        LayoutBox::new(
            num.width.max(den.width) + metrics.char_width * 0.2,
            axis + half_rule + metrics.fraction_num_gap + num.height(),
            (half_rule + metrics.fraction_den_gap + den.height() - axis).max(0.0),
        )
    }

    fn measure_radical(
        &self,
        degree: Option<&LayoutNode>,
        radicand: &LayoutNode,
        metrics: &MathFontMetrics,
    ) -> LayoutBox {
        let inner = self.measure_node(radicand, metrics);
        let sign_width = metrics.char_width * 0.8;
        let degree_width = degree
            .map(|d| self.measure_node(d, &metrics.script_metrics()).width)
            .unwrap_or(0.0);

        LayoutBox::new(
            degree_width + sign_width + inner.width,
            inner.ascent + metrics.radical_vertical_gap + metrics.radical_rule_thickness,
            inner.descent,
        )
    }

    fn measure_table(
        &self,
        rows: &[Vec<LayoutNode>],
        align: VerticalAlign,
        metrics: &MathFontMetrics,
    ) -> LayoutBox {
        if rows.is_empty() {
            return LayoutBox::default();
        }

        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let mut column_widths = vec![0.0f32; columns];
        let mut row_heights = Vec::with_capacity(rows.len());
        let mut first_row_ascent = 0.0f32;

        for (i, row) in rows.iter().enumerate() {
            let mut row_box = LayoutBox::new(0.0, metrics.ascent, metrics.descent);
            for (j, cell) in row.iter().enumerate() {
                let cell_box = self.measure_node(cell, metrics);
                column_widths[j] = column_widths[j].max(cell_box.width);
                row_box.ascent = row_box.ascent.max(cell_box.ascent);
                row_box.descent = row_box.descent.max(cell_box.descent);
            }
            if i == 0 {
                first_row_ascent = row_box.ascent;
            }
            row_heights.push(row_box.height());
        }

        let width = column_widths.iter().sum::<f32>()
            + metrics.column_gap * columns.saturating_sub(1) as f32;
        let height =
            row_heights.iter().sum::<f32>() + metrics.row_gap * (rows.len() - 1) as f32;

        match align {
            VerticalAlign::Baseline => {
                LayoutBox::new(width, first_row_ascent, height - first_row_ascent)
            }
            VerticalAlign::Middle => {
                let above = height / 2.0 + metrics.axis_height();
                LayoutBox::new(width, above, height - above)
            }
        }
    }
}

/// Scale factor for a fence pair
fn fence_scale(stretch: FenceStretch, inner: &LayoutBox, metrics: &MathFontMetrics) -> f32 {
    match stretch {
        FenceStretch::Normal => 1.0,
        FenceStretch::Auto => {
            let normal = metrics.ascent + metrics.descent;
            (inner.height() / normal).max(1.0)
        }
        FenceStretch::Scaled(step) => match step {
            0 | 1 => 1.2,
            2 => 1.8,
            3 => 2.4,
            _ => 3.0,
        },
    }
}
