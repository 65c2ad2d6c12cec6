//! Expression Renderer - Map an expression tree onto layout primitives
//!
//! Rendering is a pure recursive walk. It never fails: variants this renderer
//! does not know become placeholders, and known variants with a payload that
//! did not decode become inline error markers. Every node with a non-empty id
//! tags the layout node it produced so that all occurrences of that id can be
//! found again.

use crate::layout::{FenceStretch, GlyphClass, LayoutKind, LayoutNode, SpaceWidth, VerticalAlign};
use crate::model::*;
use crate::symbols;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use unicode_segmentation::UnicodeSegmentation;

// =============================================================================
// Configuration
// =============================================================================

/// Configuration for the expression renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Base font size in points, used by the measurement pass
    pub font_size: f32,
    /// Glyph repeated once per prime; long runs are written as a count
    pub prime_mark: String,
    /// Symbol between a defined name and its definition
    pub definition_symbol: String,
    /// Brackets drawn around matrices
    pub matrix_brackets: BracketStyle,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            font_size: 16.0,
            prime_mark: symbols::PRIME.to_string(),
            definition_symbol: "=".to_string(),
            matrix_brackets: BracketStyle::Square,
        }
    }
}

// =============================================================================
// Renderer
// =============================================================================

/// Renders expression trees into layout trees
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    config: RenderConfig,
}

impl Renderer {
    /// Create a new renderer with default config
    pub fn new() -> Self {
        Self::default()
    }

    /// Create with custom config
    pub fn with_config(config: RenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Render an expression tree
    pub fn render(&self, node: &ExpressionNode) -> LayoutNode {
        tracing::trace!(id = %node.id, tag = node.content.tag(), "rendering expression");
        self.render_node(node)
    }

    fn render_node(&self, node: &ExpressionNode) -> LayoutNode {
        let layout = self.render_content(&node.content);
        tag_layout(layout, &node.id)
    }

    fn render_opt(&self, node: Option<&ExpressionNode>) -> Option<LayoutNode> {
        node.map(|n| self.render_node(n))
    }

    fn render_content(&self, content: &ExpressionContent) -> LayoutNode {
        use ExpressionContent as C;
        match content {
            C::Empty => LayoutNode::empty(),
            C::Text(text) => LayoutNode::glyph(text.clone(), GlyphClass::Text),
            C::String(text) => self.render_graphemes(text),
            C::Identifier(ident) => self.render_identifier(ident),
            C::Power { base, exponent } => LayoutNode::scripts(
                self.render_node(base),
                None,
                Some(self.render_node(exponent)),
            ),
            C::Fraction {
                numerator,
                denominator,
                style,
            }
            | C::Division {
                numerator,
                denominator,
                style,
            } => self.render_division(numerator, denominator, *style),
            C::Bracketed { inner, style, size } => {
                let (open, close) = symbols::bracket_glyphs(*style);
                LayoutNode::fence(open, close, self.render_node(inner), fence_stretch(*size))
            }
            C::Matrix { rows } => self.render_matrix(rows),
            C::Multiplications { terms } => self.render_multiplications(terms),
            C::Additions { terms } => self.render_additions(terms),
            C::SumNotation {
                summand,
                variable,
                lower_limit,
                upper_limit,
            } => self.render_big_operator(
                symbols::SUM,
                summand,
                variable.as_ref(),
                lower_limit.as_ref(),
                upper_limit.as_ref(),
            ),
            C::ProductNotation {
                multiplicand,
                variable,
                lower_limit,
                upper_limit,
            } => self.render_big_operator(
                symbols::PRODUCT,
                multiplicand,
                variable.as_ref(),
                lower_limit.as_ref(),
                upper_limit.as_ref(),
            ),
            C::UnaryPrefixOperation {
                operator,
                parameter,
            } => LayoutNode::row(vec![self.render_node(operator), self.render_node(parameter)]),
            C::UnaryPostfixOperation {
                parameter,
                operator,
            } => LayoutNode::row(vec![self.render_node(parameter), self.render_node(operator)]),
            C::Abs { parameter } => {
                LayoutNode::fence("|", "|", self.render_node(parameter), FenceStretch::Normal)
            }
            C::FunctionCall { name, parameters } => self.render_function_call(name, parameters),
            C::Quantity {
                number,
                scientific_notation,
                unit,
            } => self.render_quantity(number, scientific_notation.as_ref(), unit.as_ref()),
            C::ScientificNotation { magnitude, style } => {
                self.render_scientific(magnitude, *style)
            }
            C::Relationship { lhs, operator, rhs } => {
                let symbol = symbols::relation_symbol(operator);
                LayoutNode::row(vec![
                    self.render_node(lhs),
                    LayoutNode::space(SpaceWidth::Medium),
                    symbol_glyph(&symbol),
                    LayoutNode::space(SpaceWidth::Medium),
                    self.render_node(rhs),
                ])
            }
            C::UnaryRelationship { subject, predicate } => {
                let symbol = symbols::unary_relation_symbol(predicate);
                LayoutNode::row(vec![
                    symbol_glyph(&symbol),
                    LayoutNode::fence("(", ")", self.render_node(subject), FenceStretch::Normal),
                ])
            }
            C::VariableDefinition { name, definition } => {
                self.render_definition(name, definition.as_ref())
            }
            C::FunctionDefinition {
                custom_function,
                definition,
            } => self.render_definition(custom_function, definition.as_ref()),
            C::Limit {
                function,
                variable,
                approaching_value,
            } => self.render_limit(function, variable, approaching_value),
            C::Differential {
                target,
                order,
                diff_style,
            } => self.render_differential(target, order, *diff_style),
            C::Integration {
                integrand,
                differentials,
                domain,
            } => self.render_integration(integrand, differentials, domain.as_ref()),
            C::QuantifiedExpression {
                quantifier,
                variables,
                domain,
                predicate,
            } => self.render_quantified(*quantifier, variables, domain.as_ref(), predicate.as_ref()),
            C::And(nodes) => self.render_joined(nodes, symbols::AND),
            C::Or(nodes) => self.render_joined(nodes, symbols::OR),
            C::Not(node) => {
                LayoutNode::row(vec![LayoutNode::operator(symbols::NOT), self.render_node(node)])
            }
            C::True => LayoutNode::keyword("true"),
            C::False => LayoutNode::keyword("false"),
            C::Unknown(value) => render_unknown(value),
        }
    }

    // =========================================================================
    // Identifiers and strings
    // =========================================================================

    /// Glyph-by-glyph rendering of a raw string
    fn render_graphemes(&self, text: &str) -> LayoutNode {
        let glyphs: Vec<LayoutNode> = text
            .graphemes(true)
            .map(|g| LayoutNode::glyph(g, GlyphClass::classify(g)))
            .collect();
        if glyphs.is_empty() {
            return LayoutNode::empty();
        }
        LayoutNode::row(glyphs)
    }

    fn render_identifier(&self, ident: &Identifier) -> LayoutNode {
        let mut body = if ident.is_function {
            LayoutNode::keyword(ident.body.clone())
        } else {
            self.render_graphemes(&ident.body)
        };

        if let Some(mid) = &ident.mid_script {
            let over = stack_marks(mid.super_script.iter().copied());
            let under = stack_marks(mid.sub_script.iter().rev().copied());
            if over.is_some() || under.is_some() {
                body = LayoutNode::under_over(body, under, over);
            }
        }

        let mut parts = Vec::new();

        if let Some(pre) = ident.pre_script.as_ref().filter(|s| !s.is_empty()) {
            let sub = self.join_scripts(&pre.subscripts);
            let sup = self.join_scripts(&pre.superscripts);
            parts.push(LayoutNode::scripts(LayoutNode::empty(), sub, sup));
        }

        let mut subscripts = Vec::new();
        let mut superscripts = Vec::new();
        if let Some(post) = &ident.post_script {
            subscripts = post.subscripts.iter().map(|n| self.render_node(n)).collect();
            superscripts = post
                .superscripts
                .iter()
                .map(|n| self.render_node(n))
                .collect();
        }

        if ident.primes > 0 {
            let primes = LayoutNode::operator(symbols::repeated_mark(
                &self.config.prime_mark,
                ident.primes,
            ));
            match superscripts.first_mut() {
                Some(first) => {
                    let rest = std::mem::take(first);
                    *first = LayoutNode::new(LayoutKind::Row(vec![primes, rest]));
                }
                None => superscripts.push(primes),
            }
        }

        let sub = join_with_commas(subscripts);
        let sup = join_with_commas(superscripts);
        if sub.is_some() || sup.is_some() {
            parts.push(LayoutNode::scripts(body, sub, sup));
        } else {
            parts.push(body);
        }

        LayoutNode::row(parts)
    }

    fn join_scripts(&self, nodes: &[ExpressionNode]) -> Option<LayoutNode> {
        join_with_commas(nodes.iter().map(|n| self.render_node(n)).collect())
    }

    // =========================================================================
    // Fractions, matrices and operator lists
    // =========================================================================

    fn render_division(
        &self,
        numerator: &ExpressionNode,
        denominator: &ExpressionNode,
        style: DivisionStyle,
    ) -> LayoutNode {
        let num = self.render_node(numerator);
        let den = self.render_node(denominator);
        match style {
            DivisionStyle::Fraction => LayoutNode::fraction(num, den),
            DivisionStyle::Division => {
                LayoutNode::row(vec![num, LayoutNode::operator(symbols::DIVIDE), den])
            }
            DivisionStyle::Inline => LayoutNode::row(vec![num, LayoutNode::operator("/"), den]),
        }
    }

    fn render_matrix(&self, rows: &[Vec<Option<ExpressionNode>>]) -> LayoutNode {
        let columns = rows.iter().map(Vec::len).max().unwrap_or(0);
        let cells: Vec<Vec<LayoutNode>> = rows
            .iter()
            .map(|row| {
                let mut cells: Vec<LayoutNode> = row
                    .iter()
                    .map(|cell| self.render_opt(cell.as_ref()).unwrap_or_default())
                    .collect();
                cells.resize_with(columns, LayoutNode::empty);
                cells
            })
            .collect();

        let align = if cells.len() == 1 {
            VerticalAlign::Baseline
        } else {
            VerticalAlign::Middle
        };
        let (open, close) = symbols::bracket_glyphs(self.config.matrix_brackets);
        LayoutNode::fence(open, close, LayoutNode::table(cells, align), FenceStretch::Auto)
    }

    fn render_additions(&self, terms: &[(AddOperator, ExpressionNode)]) -> LayoutNode {
        let mut parts = Vec::with_capacity(terms.len() * 4);
        for (i, (op, term)) in terms.iter().enumerate() {
            if i == 0 {
                // A leading plus is implied; a leading minus is a sign
                if *op == AddOperator::Subtraction {
                    parts.push(LayoutNode::operator(symbols::MINUS));
                }
            } else if let Some(symbol) = symbols::add_symbol(*op) {
                parts.push(LayoutNode::space(SpaceWidth::Medium));
                parts.push(LayoutNode::operator(symbol));
                parts.push(LayoutNode::space(SpaceWidth::Medium));
            }
            parts.push(self.render_node(term));
        }
        LayoutNode::row(parts)
    }

    fn render_multiplications(&self, terms: &[(MulOperator, ExpressionNode)]) -> LayoutNode {
        let mut parts = Vec::with_capacity(terms.len() * 2);
        for (i, (op, term)) in terms.iter().enumerate() {
            if i > 0 {
                match (op, symbols::mul_symbol(*op)) {
                    (MulOperator::Multiplication(MulSymbol::LittleSpace), _) => {
                        parts.push(LayoutNode::space(SpaceWidth::Thin))
                    }
                    (_, Some(symbol)) => parts.push(LayoutNode::operator(symbol)),
                    (_, None) => {}
                }
            }
            parts.push(self.render_node(term));
        }
        LayoutNode::row(parts)
    }

    // =========================================================================
    // Big operators and calculus
    // =========================================================================

    fn render_big_operator(
        &self,
        glyph: &str,
        body: &ExpressionNode,
        variable: Option<&ExpressionNode>,
        lower: Option<&ExpressionNode>,
        upper: Option<&ExpressionNode>,
    ) -> LayoutNode {
        let operator = LayoutNode::under_over(
            LayoutNode::glyph(glyph, GlyphClass::BigOperator),
            self.render_opt(lower),
            self.render_opt(upper),
        );
        let body = self.render_node(body);
        let body = match self.render_opt(variable) {
            Some(var) => LayoutNode::scripts(body, Some(var), None),
            None => body,
        };
        LayoutNode::row(vec![operator, LayoutNode::space(SpaceWidth::Thin), body])
    }

    fn render_limit(
        &self,
        function: &ExpressionNode,
        variable: &str,
        approaching: &ExpressionNode,
    ) -> LayoutNode {
        let approach = LayoutNode::row(vec![
            self.render_graphemes(variable),
            LayoutNode::operator(symbols::RIGHT_ARROW),
            self.render_node(approaching),
        ]);
        LayoutNode::row(vec![
            LayoutNode::under_over(LayoutNode::keyword("lim"), Some(approach), None),
            LayoutNode::space(SpaceWidth::Thin),
            self.render_node(function),
        ])
    }

    fn render_differential(
        &self,
        target: &ExpressionNode,
        order: &ExpressionNode,
        style: DifferentialStyle,
    ) -> LayoutNode {
        let operator = differential_glyph(style);
        let operator = if is_first_order(order) {
            operator
        } else {
            LayoutNode::scripts(operator, None, Some(self.render_node(order)))
        };
        LayoutNode::row(vec![operator, self.render_node(target)])
    }

    /// Integral signs are laid out in reverse differential order while the
    /// `d var` suffixes keep the original order. The domain hangs under the
    /// first sign drawn.
    fn render_integration(
        &self,
        integrand: &ExpressionNode,
        differentials: &[IntegralDifferential],
        domain: Option<&ExpressionNode>,
    ) -> LayoutNode {
        let mut parts = Vec::new();
        let mut domain = self.render_opt(domain);

        if differentials.is_empty() {
            let sign = LayoutNode::glyph(symbols::INTEGRAL, GlyphClass::BigOperator);
            parts.push(match domain.take() {
                Some(under) => LayoutNode::under_over(sign, Some(under), None),
                None => sign,
            });
        }

        for (_, lower, upper) in differentials.iter().rev() {
            let sign = LayoutNode::glyph(symbols::INTEGRAL, GlyphClass::BigOperator);
            let lower = self.render_opt(lower.as_ref());
            let upper = self.render_opt(upper.as_ref());
            let sign = if lower.is_some() || upper.is_some() {
                LayoutNode::scripts(sign, lower, upper)
            } else {
                sign
            };
            parts.push(match domain.take() {
                Some(under) => LayoutNode::under_over(sign, Some(under), None),
                None => sign,
            });
        }

        parts.push(LayoutNode::space(SpaceWidth::Thin));
        parts.push(self.render_node(integrand));

        for (variable, _, _) in differentials {
            parts.push(LayoutNode::space(SpaceWidth::Thin));
            parts.push(LayoutNode::new(LayoutKind::Row(vec![
                differential_glyph(DifferentialStyle::Total),
                self.render_node(variable),
            ])));
        }

        LayoutNode::row(parts)
    }

    // =========================================================================
    // Calls, quantities and definitions
    // =========================================================================

    fn render_function_call(
        &self,
        name: &ExpressionNode,
        parameters: &[ExpressionNode],
    ) -> LayoutNode {
        match (plain_name(name), parameters) {
            (Some("sqrt" | symbols::RADICAL), [radicand]) => {
                return LayoutNode::radical(None, self.render_node(radicand));
            }
            (Some("root"), [degree, radicand]) => {
                return LayoutNode::radical(
                    Some(self.render_node(degree)),
                    self.render_node(radicand),
                );
            }
            _ => {}
        }

        let mut args = Vec::with_capacity(parameters.len() * 2);
        for (i, param) in parameters.iter().enumerate() {
            if i > 0 {
                args.push(LayoutNode::operator(","));
            }
            args.push(self.render_node(param));
        }
        let args = if args.is_empty() {
            LayoutNode::empty()
        } else {
            LayoutNode::row(args)
        };

        LayoutNode::new(LayoutKind::Row(vec![
            self.render_node(name),
            LayoutNode::fence("(", ")", args, FenceStretch::Normal),
        ]))
    }

    fn render_quantity(
        &self,
        number: &str,
        scientific: Option<&ExpressionNode>,
        unit: Option<&ExpressionNode>,
    ) -> LayoutNode {
        let mut parts = vec![LayoutNode::glyph(number, GlyphClass::Numeral)];
        if let Some(scientific) = scientific {
            parts.push(self.render_node(scientific));
        }
        if let Some(unit) = unit {
            parts.push(LayoutNode::space(SpaceWidth::Thin));
            parts.push(self.render_node(unit));
        }
        LayoutNode::row(parts)
    }

    fn render_scientific(
        &self,
        magnitude: &ExpressionNode,
        style: ScientificNotationStyle,
    ) -> LayoutNode {
        let magnitude = self.render_node(magnitude);
        match style {
            ScientificNotationStyle::TimesTenPower => LayoutNode::row(vec![
                LayoutNode::operator(symbols::TIMES),
                LayoutNode::scripts(
                    LayoutNode::glyph("10", GlyphClass::Numeral),
                    None,
                    Some(magnitude),
                ),
            ]),
            _ => LayoutNode::row(vec![
                LayoutNode::glyph(symbols::scientific_prefix(style), GlyphClass::Keyword),
                magnitude,
            ]),
        }
    }

    fn render_definition(
        &self,
        name: &ExpressionNode,
        definition: Option<&ExpressionNode>,
    ) -> LayoutNode {
        let name = self.render_node(name);
        match definition {
            Some(definition) => LayoutNode::row(vec![
                name,
                LayoutNode::space(SpaceWidth::Medium),
                LayoutNode::operator(self.config.definition_symbol.clone()),
                LayoutNode::space(SpaceWidth::Medium),
                self.render_node(definition),
            ]),
            None => LayoutNode::new(LayoutKind::Row(vec![name])),
        }
    }

    // =========================================================================
    // Logic
    // =========================================================================

    fn render_quantified(
        &self,
        quantifier: Quantifier,
        variables: &[ExpressionNode],
        domain: Option<&ExpressionNode>,
        predicate: Option<&ExpressionNode>,
    ) -> LayoutNode {
        let (symbol, keyword) = symbols::quantifier_symbol(quantifier);
        let mut parts = vec![
            if keyword {
                LayoutNode::keyword(symbol)
            } else {
                LayoutNode::operator(symbol)
            },
            LayoutNode::space(SpaceWidth::Thin),
        ];

        for (i, var) in variables.iter().enumerate() {
            if i > 0 {
                parts.push(LayoutNode::operator(","));
            }
            parts.push(self.render_node(var));
        }

        if let Some(domain) = domain {
            parts.push(LayoutNode::space(SpaceWidth::Medium));
            parts.push(LayoutNode::operator(symbols::ELEMENT_OF));
            parts.push(LayoutNode::space(SpaceWidth::Medium));
            parts.push(self.render_node(domain));
        }

        if let Some(predicate) = predicate {
            parts.push(LayoutNode::space(SpaceWidth::Medium));
            parts.push(LayoutNode::operator(":"));
            parts.push(LayoutNode::space(SpaceWidth::Medium));
            parts.push(self.render_node(predicate));
        }

        LayoutNode::row(parts)
    }

    fn render_joined(&self, nodes: &[ExpressionNode], connective: &str) -> LayoutNode {
        let mut parts = Vec::with_capacity(nodes.len() * 4);
        for (i, node) in nodes.iter().enumerate() {
            if i > 0 {
                parts.push(LayoutNode::space(SpaceWidth::Medium));
                parts.push(LayoutNode::operator(connective));
                parts.push(LayoutNode::space(SpaceWidth::Medium));
            }
            parts.push(self.render_node(node));
        }
        if parts.is_empty() {
            return LayoutNode::empty();
        }
        LayoutNode::row(parts)
    }
}

/// Render an expression with the default configuration
pub fn render_expression(node: &ExpressionNode) -> LayoutNode {
    Renderer::new().render(node)
}

// =============================================================================
// Helpers
// =============================================================================

/// Attach an expression id to a layout node.
///
/// A layout node carries at most one id, so when the child already belongs to
/// a nested expression it is wrapped in a fresh row.
fn tag_layout(layout: LayoutNode, id: &str) -> LayoutNode {
    if id.is_empty() {
        return layout;
    }
    let layout = if layout.data_id.is_some() {
        LayoutNode::new(LayoutKind::Row(vec![layout]))
    } else {
        layout
    };
    layout.with_data_id(id)
}

fn render_unknown(value: &Value) -> LayoutNode {
    match RawVariant::classify(value, ExpressionContent::KNOWN_TAGS) {
        RawVariant::UnknownTag(tag) => {
            tracing::warn!("Unknown expression variant, rendering placeholder: {}", tag);
            LayoutNode::placeholder(tag)
        }
        RawVariant::Malformed { tag, detail } => {
            tracing::warn!("Malformed {} expression: {}", tag, detail);
            LayoutNode::error(format!("{}: {}", tag, detail))
        }
    }
}

fn symbol_glyph(symbol: &str) -> LayoutNode {
    if symbols::is_keyword(symbol) {
        LayoutNode::keyword(symbol)
    } else {
        LayoutNode::operator(symbol)
    }
}

fn stack_marks(marks: impl Iterator<Item = MiddleScriptMark>) -> Option<LayoutNode> {
    let mut rows: Vec<Vec<LayoutNode>> = marks
        .map(|mark| vec![LayoutNode::operator(symbols::middle_script_mark(mark))])
        .collect();
    match rows.len() {
        0 => None,
        1 => rows.pop().and_then(|mut row| row.pop()),
        _ => Some(LayoutNode::table(rows, VerticalAlign::Baseline)),
    }
}

fn join_with_commas(nodes: Vec<LayoutNode>) -> Option<LayoutNode> {
    if nodes.is_empty() {
        return None;
    }
    let mut parts = Vec::with_capacity(nodes.len() * 2);
    for (i, node) in nodes.into_iter().enumerate() {
        if i > 0 {
            parts.push(LayoutNode::operator(","));
        }
        parts.push(node);
    }
    Some(LayoutNode::row(parts))
}

fn fence_stretch(size: BracketSize) -> FenceStretch {
    match size {
        BracketSize::Normal => FenceStretch::Normal,
        BracketSize::Auto => FenceStretch::Auto,
        BracketSize::Sized(step) => FenceStretch::Scaled(step.clamp(1, 4)),
    }
}

fn differential_glyph(style: DifferentialStyle) -> LayoutNode {
    match style {
        DifferentialStyle::Total => LayoutNode::keyword("d"),
        DifferentialStyle::Partial => LayoutNode::operator(symbols::PARTIAL),
    }
}

/// Whether a differential order is the literal `1` (or absent)
fn is_first_order(order: &ExpressionNode) -> bool {
    match order.content.as_ref() {
        ExpressionContent::Empty => true,
        ExpressionContent::Quantity {
            number,
            scientific_notation: None,
            unit: None,
        } => number == "1",
        ExpressionContent::String(s) | ExpressionContent::Text(s) => s == "1",
        ExpressionContent::Identifier(ident) => ident.body == "1",
        _ => false,
    }
}

/// The literal name of a called function, if it is a bare word
fn plain_name(node: &ExpressionNode) -> Option<&str> {
    match node.content.as_ref() {
        ExpressionContent::Identifier(ident)
            if ident.pre_script.is_none() && ident.post_script.is_none() =>
        {
            Some(ident.body.as_str())
        }
        ExpressionContent::String(s) | ExpressionContent::Text(s) => Some(s.as_str()),
        _ => None,
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn ident(body: &str) -> ExpressionNode {
        ExpressionNode::identifier(body)
    }

    fn render(content: ExpressionContent) -> LayoutNode {
        Renderer::new().render(&ExpressionNode::new("root", content))
    }

    /// Collect glyph texts of a given class in pre-order
    fn glyphs_of(layout: &LayoutNode, class: GlyphClass) -> Vec<String> {
        let mut out = Vec::new();
        layout.visit(&mut |n| {
            if let LayoutKind::Glyph { text, class: c } = &n.kind {
                if *c == class {
                    out.push(text.clone());
                }
            }
        });
        out
    }

    #[test]
    fn test_fraction_is_stacked() {
        let layout = render(ExpressionContent::Fraction {
            numerator: ident("x"),
            denominator: ident("y"),
            style: DivisionStyle::Fraction,
        });
        match &layout.kind {
            LayoutKind::Fraction {
                numerator,
                denominator,
            } => {
                assert_eq!(numerator.plain_text(), "x");
                assert_eq!(denominator.plain_text(), "y");
            }
            other => panic!("Expected fraction, got {:?}", other),
        }
        assert_eq!(layout.data_id.as_deref(), Some("root"));
    }

    #[test]
    fn test_division_styles_inline() {
        let divide = render(ExpressionContent::Division {
            numerator: ident("a"),
            denominator: ident("b"),
            style: DivisionStyle::Division,
        });
        assert_eq!(divide.plain_text(), "a\u{00F7}b");

        let inline = render(ExpressionContent::Fraction {
            numerator: ident("a"),
            denominator: ident("b"),
            style: DivisionStyle::Inline,
        });
        assert_eq!(inline.plain_text(), "a/b");
    }

    #[test]
    fn test_relationship_less_equal() {
        let layout = render(ExpressionContent::Relationship {
            lhs: ident("a"),
            operator: RelationOperator::LessEqual,
            rhs: ident("b"),
        });
        assert_eq!(layout.plain_text(), "a \u{2264} b");
    }

    #[test]
    fn test_every_relation_renders_its_symbol() {
        for op in RelationOperator::builtin() {
            let expected = symbols::relation_symbol(&op).into_owned();
            let layout = render(ExpressionContent::Relationship {
                lhs: ident("a"),
                operator: op.clone(),
                rhs: ident("b"),
            });
            assert_eq!(layout.plain_text(), format!("a {} b", expected), "{:?}", op);
        }
    }

    #[test]
    fn test_custom_relation_is_literal() {
        let layout = render(ExpressionContent::Relationship {
            lhs: ident("a"),
            operator: RelationOperator::Custom("X".to_string()),
            rhs: ident("b"),
        });
        assert_eq!(layout.plain_text(), "a X b");
    }

    #[test]
    fn test_unary_predicates_use_keywords_when_long() {
        let layout = render(ExpressionContent::UnaryRelationship {
            subject: ident("p"),
            predicate: UnaryRelationOperator::IsPrime,
        });
        assert_eq!(layout.plain_text(), "Prime(p)");
        assert_eq!(glyphs_of(&layout, GlyphClass::Keyword), vec!["Prime"]);

        let layout = render(ExpressionContent::UnaryRelationship {
            subject: ident("A"),
            predicate: UnaryRelationOperator::Complement,
        });
        assert_eq!(glyphs_of(&layout, GlyphClass::Keyword), Vec::<String>::new());
        assert_eq!(layout.plain_text(), "\u{2201}(A)");
    }

    #[test]
    fn test_bracket_table() {
        for style in BracketStyle::ALL {
            let (open, close) = symbols::bracket_glyphs(style);
            let layout = render(ExpressionContent::Bracketed {
                inner: ident("x"),
                style,
                size: BracketSize::Normal,
            });
            assert_eq!(layout.plain_text(), format!("{}x{}", open, close));
        }
    }

    #[test]
    fn test_matrix_rows_are_padded() {
        let layout = render(ExpressionContent::Matrix {
            rows: vec![
                vec![Some(ident("a")), Some(ident("b")), Some(ident("c"))],
                vec![Some(ident("d"))],
                vec![None, Some(ident("e"))],
            ],
        });
        let LayoutKind::Fence { open, inner, .. } = &layout.kind else {
            panic!("Expected fence, got {:?}", layout.kind);
        };
        assert_eq!(open, "[");
        match &inner.kind {
            LayoutKind::Table { rows, align } => {
                assert_eq!(*align, VerticalAlign::Middle);
                assert!(rows.iter().all(|r| r.len() == 3));
                assert!(rows[1][1].is_empty() && rows[1][2].is_empty());
                assert!(rows[2][0].is_empty());
            }
            other => panic!("Expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_single_row_matrix_uses_baseline() {
        let layout = render(ExpressionContent::Matrix {
            rows: vec![vec![Some(ident("a")), Some(ident("b"))]],
        });
        let LayoutKind::Fence { inner, .. } = &layout.kind else {
            panic!("Expected fence");
        };
        assert!(matches!(
            inner.kind,
            LayoutKind::Table {
                align: VerticalAlign::Baseline,
                ..
            }
        ));
    }

    #[test]
    fn test_integration_differential_order() {
        let layout = render(ExpressionContent::Integration {
            integrand: ident("f"),
            differentials: vec![
                (ident("x"), Some(ExpressionNode::number("0")), Some(ExpressionNode::number("1"))),
                (ident("y"), Some(ExpressionNode::number("2")), Some(ExpressionNode::number("3"))),
            ],
            domain: Some(ident("D")),
        });
        // Signs reversed: y's limits first, and only that sign carries the domain
        assert_eq!(
            layout.plain_text(),
            "\u{222B}_{2}^{3}under{D}\u{222B}_{0}^{1} f dx dy"
        );

        let mut domains = 0;
        layout.visit(&mut |n| {
            if let LayoutKind::UnderOver { under: Some(u), .. } = &n.kind {
                if u.plain_text() == "D" {
                    domains += 1;
                }
            }
        });
        assert_eq!(domains, 1);
    }

    #[test]
    fn test_integration_without_differentials() {
        let layout = render(ExpressionContent::Integration {
            integrand: ident("f"),
            differentials: vec![],
            domain: None,
        });
        assert_eq!(layout.plain_text(), "\u{222B} f");
    }

    #[test]
    fn test_identifier_primes_become_superscript() {
        let layout = render(ExpressionContent::Identifier(Identifier::new("f").with_primes(2)));
        assert_eq!(layout.plain_text(), "f^{\u{2032}\u{2032}}");
    }

    #[test]
    fn test_identifier_primes_prepend_to_first_superscript() {
        let ident = Identifier::new("f")
            .with_primes(1)
            .with_superscript(ExpressionNode::number("2"))
            .with_superscript(ExpressionNode::number("3"));
        let layout = render(ExpressionContent::Identifier(ident));
        assert_eq!(layout.plain_text(), "f^{\u{2032}2,3}");
    }

    #[test]
    fn test_identifier_mid_script_marks() {
        let mut ident = Identifier::new("x");
        ident.mid_script = Some(MiddleScript {
            super_script: vec![MiddleScriptMark::Dot(2)],
            sub_script: vec![MiddleScriptMark::Bar, MiddleScriptMark::Tilde],
        });
        let layout = render(ExpressionContent::Identifier(ident));
        match &layout.kind {
            LayoutKind::UnderOver { base, under, over } => {
                assert_eq!(base.plain_text(), "x");
                assert_eq!(over.as_ref().map(|o| o.plain_text()).as_deref(), Some("\u{02D9}\u{02D9}"));
                // Sub marks are stacked in reverse
                assert_eq!(
                    under.as_ref().map(|u| u.plain_text()).as_deref(),
                    Some("\u{02DC}; \u{00AF}")
                );
            }
            other => panic!("Expected under/over, got {:?}", other),
        }
    }

    #[test]
    fn test_identifier_pre_script() {
        let mut ident = Identifier::new("C");
        ident.pre_script = Some(ScriptNode {
            subscripts: vec![ExpressionNode::number("n")],
            superscripts: vec![],
        });
        let layout = render(ExpressionContent::Identifier(ident));
        assert_eq!(layout.plain_text(), "_{n}C");
    }

    #[test]
    fn test_string_is_split_into_glyphs() {
        let layout = render(ExpressionContent::String("x2+".to_string()));
        assert_eq!(glyphs_of(&layout, GlyphClass::Identifier), vec!["x"]);
        assert_eq!(glyphs_of(&layout, GlyphClass::Numeral), vec!["2"]);
        assert_eq!(glyphs_of(&layout, GlyphClass::Operator), vec!["+"]);
    }

    #[test]
    fn test_function_call_separators() {
        let layout = render(ExpressionContent::FunctionCall {
            name: ExpressionNode::anonymous(ExpressionContent::Identifier(Identifier {
                is_function: true,
                ..Identifier::new("g")
            })),
            parameters: vec![ident("x"), ident("y"), ident("z")],
        });
        assert_eq!(layout.plain_text(), "g(x,y,z)");
    }

    #[test]
    fn test_sqrt_call_becomes_radical() {
        let layout = render(ExpressionContent::FunctionCall {
            name: ident("sqrt"),
            parameters: vec![ident("x")],
        });
        assert!(matches!(layout.kind, LayoutKind::Radical { degree: None, .. }));
    }

    #[test]
    fn test_additions_and_multiplications() {
        let sum = render(ExpressionContent::Additions {
            terms: vec![
                (AddOperator::Subtraction, ident("a")),
                (AddOperator::Addition, ident("b")),
                (AddOperator::Subtraction, ident("c")),
            ],
        });
        assert_eq!(sum.plain_text(), "\u{2212}a + b \u{2212} c");

        let product = render(ExpressionContent::Multiplications {
            terms: vec![
                (MulOperator::Multiplication(MulSymbol::Times), ExpressionNode::number("2")),
                (MulOperator::Multiplication(MulSymbol::Dot), ident("x")),
                (MulOperator::None, ident("y")),
            ],
        });
        assert_eq!(product.plain_text(), "2\u{00B7}xy");
    }

    #[test]
    fn test_sum_notation() {
        let layout = render(ExpressionContent::SumNotation {
            summand: ident("a"),
            variable: Some(ident("i")),
            lower_limit: Some(ExpressionNode::number("1")),
            upper_limit: Some(ident("n")),
        });
        assert_eq!(layout.plain_text(), "\u{2211}under{1}over{n} a_{i}");
    }

    #[test]
    fn test_limit_and_differential() {
        let limit = render(ExpressionContent::Limit {
            function: ident("f"),
            variable: "x".to_string(),
            approaching_value: ExpressionNode::number("0"),
        });
        assert_eq!(limit.plain_text(), "limunder{x\u{2192}0} f");

        let first = render(ExpressionContent::Differential {
            target: ident("y"),
            order: ExpressionNode::number("1"),
            diff_style: DifferentialStyle::Total,
        });
        assert_eq!(first.plain_text(), "dy");

        let second = render(ExpressionContent::Differential {
            target: ident("y"),
            order: ExpressionNode::number("2"),
            diff_style: DifferentialStyle::Partial,
        });
        assert_eq!(second.plain_text(), "\u{2202}^{2}y");
    }

    #[test]
    fn test_quantity_with_unit() {
        let layout = render(ExpressionContent::Quantity {
            number: "6.02".to_string(),
            scientific_notation: Some(ExpressionNode::anonymous(
                ExpressionContent::ScientificNotation {
                    magnitude: ExpressionNode::number("23"),
                    style: ScientificNotationStyle::TimesTenPower,
                },
            )),
            unit: Some(ExpressionNode::text("mol")),
        });
        assert_eq!(layout.plain_text(), "6.02\u{00D7}10^{23} mol");
    }

    #[test]
    fn test_definitions() {
        let with = render(ExpressionContent::VariableDefinition {
            name: ident("k"),
            definition: Some(ExpressionNode::number("3")),
        });
        assert_eq!(with.plain_text(), "k = 3");

        let without = render(ExpressionContent::VariableDefinition {
            name: ident("k"),
            definition: None,
        });
        assert_eq!(without.plain_text(), "k");
    }

    #[test]
    fn test_quantified_expression() {
        let layout = render(ExpressionContent::QuantifiedExpression {
            quantifier: Quantifier::Universal,
            variables: vec![ident("x"), ident("y")],
            domain: Some(ident("S")),
            predicate: Some(ident("P")),
        });
        assert_eq!(layout.plain_text(), "\u{2200} x,y \u{2208} S : P");
    }

    #[test]
    fn test_unknown_variant_is_placeholder() {
        let node =
            ExpressionNode::from_json(r#"{"id": "u1", "content": {"Tensor": {"rank": 2}}}"#)
                .unwrap();
        let layout = Renderer::new().render(&node);
        assert_eq!(layout.kind, LayoutKind::Placeholder { tag: "Tensor".to_string() });
        assert_eq!(layout.data_id.as_deref(), Some("u1"));
    }

    #[test]
    fn test_malformed_variant_is_error_marker() {
        let node = ExpressionNode::from_json(r#"{"id": "p", "content": {"Power": {"base": 1}}}"#)
            .unwrap();
        let layout = Renderer::new().render(&node);
        assert!(matches!(layout.kind, LayoutKind::Error { ref message } if message.starts_with("Power")));
    }

    #[test]
    fn test_nested_ids_get_separate_nodes() {
        let inner = ExpressionNode::new(
            "inner",
            ExpressionContent::Bracketed {
                inner: ident("x"),
                style: BracketStyle::Round,
                size: BracketSize::Normal,
            },
        );
        let outer = ExpressionNode::new(
            "outer",
            ExpressionContent::Abs { parameter: inner },
        );
        let layout = Renderer::new().render(&outer);
        assert_eq!(layout.tagged_ids(), vec!["outer", "inner", "x"]);
    }

    #[test]
    fn test_identical_ids_are_all_tagged() {
        let layout = render(ExpressionContent::Additions {
            terms: vec![
                (AddOperator::None, ident("x")),
                (AddOperator::Addition, ident("x")),
            ],
        });
        let ids = layout.tagged_ids();
        assert_eq!(ids.iter().filter(|id| **id == "x").count(), 2);
    }

    #[test]
    fn test_huge_prime_count_from_json() {
        let node = ExpressionNode::from_json(
            r#"{"id": "f", "content": {"Identifier": {"body": "f", "primes": 18446744073709551615}}}"#,
        )
        .unwrap();
        let layout = Renderer::new().render(&node);
        assert_eq!(layout.plain_text(), format!("f^{{\u{2032}({})}}", usize::MAX));
    }

    #[test]
    fn test_huge_dot_count_from_json() {
        let node = ExpressionNode::from_json(
            r#"{"id": "x", "content": {"Identifier": {"body": "x",
                "mid_script": {"super_script": [{"Dot": 18446744073709551615}]}}}}"#,
        )
        .unwrap();
        let layout = Renderer::new().render(&node);
        assert!(layout.plain_text().contains(&format!("\u{02D9}({})", usize::MAX)));
    }

    // =========================================================================
    // Property tests
    // =========================================================================

    fn arb_mark() -> impl Strategy<Value = MiddleScriptMark> {
        prop_oneof![
            Just(MiddleScriptMark::Hat),
            any::<usize>().prop_map(MiddleScriptMark::Dot),
            Just(MiddleScriptMark::Tilde),
            Just(MiddleScriptMark::Bar),
        ]
    }

    fn arb_leaf() -> impl Strategy<Value = ExpressionNode> {
        prop_oneof![
            "[a-z]{1,3}".prop_map(|body| ExpressionNode::identifier(body)),
            "[0-9]{1,3}".prop_map(|digits| ExpressionNode::number(digits)),
            Just(ExpressionNode::empty()),
            (
                "[a-z]{1,2}",
                any::<usize>(),
                prop::collection::vec(arb_mark(), 0..3),
                prop::collection::vec(arb_mark(), 0..3),
            )
                .prop_map(|(body, primes, super_script, sub_script)| {
                    let mut ident = Identifier::new(body).with_primes(primes);
                    ident.mid_script = Some(MiddleScript { super_script, sub_script });
                    ExpressionNode::anonymous(ExpressionContent::Identifier(ident))
                }),
            "[A-Z][a-z]{2,6}".prop_map(|tag| {
                let mut raw = serde_json::Map::new();
                raw.insert(tag, serde_json::json!({}));
                ExpressionNode::anonymous(ExpressionContent::Unknown(Value::Object(raw)))
            }),
        ]
    }

    fn arb_expression() -> impl Strategy<Value = ExpressionNode> {
        arb_leaf().prop_recursive(4, 48, 4, |inner| {
            prop_oneof![
                (inner.clone(), inner.clone()).prop_map(|(base, exponent)| {
                    ExpressionNode::anonymous(ExpressionContent::Power { base, exponent })
                }),
                (inner.clone(), inner.clone()).prop_map(|(numerator, denominator)| {
                    ExpressionNode::anonymous(ExpressionContent::Fraction {
                        numerator,
                        denominator,
                        style: DivisionStyle::Fraction,
                    })
                }),
                prop::collection::vec(prop::collection::vec(prop::option::of(inner.clone()), 0..4), 0..4)
                    .prop_map(|rows| ExpressionNode::anonymous(ExpressionContent::Matrix { rows })),
                (inner.clone(), prop::collection::vec(
                    (inner.clone(), prop::option::of(inner.clone()), prop::option::of(inner.clone())),
                    0..3,
                ), prop::option::of(inner.clone()))
                    .prop_map(|(integrand, differentials, domain)| {
                        ExpressionNode::anonymous(ExpressionContent::Integration {
                            integrand,
                            differentials,
                            domain,
                        })
                    }),
                prop::collection::vec(inner.clone(), 0..4)
                    .prop_map(|nodes| ExpressionNode::anonymous(ExpressionContent::And(nodes))),
            ]
        })
    }

    proptest! {
        #[test]
        fn test_render_never_panics(node in arb_expression()) {
            let layout = Renderer::new().render(&node);
            prop_assert!(layout.node_count() >= 1);
        }

        #[test]
        fn test_matrix_column_count_is_max_row_length(
            lengths in prop::collection::vec(0usize..5, 1..5)
        ) {
            let rows: Vec<Vec<Option<ExpressionNode>>> = lengths
                .iter()
                .map(|n| (0..*n).map(|i| Some(ExpressionNode::number(i.to_string()))).collect())
                .collect();
            let max = lengths.iter().copied().max().unwrap_or(0);
            let layout = render(ExpressionContent::Matrix { rows });
            let LayoutKind::Fence { inner, .. } = &layout.kind else {
                panic!("Expected fence");
            };
            let LayoutKind::Table { rows, .. } = &inner.kind else {
                panic!("Expected table");
            };
            prop_assert!(rows.iter().all(|r| r.len() == max));
        }
    }
}
