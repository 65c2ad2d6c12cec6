//! Expression Tree Model
//!
//! This module defines the tagged-union tree that describes a mathematical
//! expression. The tree is produced by an external system and consumed
//! read-only by the renderer, so every union tolerates tags it does not know:
//! anything that fails to decode lands in an `Unknown` catch-all holding the
//! raw JSON value.

use crate::error::MathResult;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// =============================================================================
// Expression Node
// =============================================================================

/// A node in the expression tree.
///
/// `id` is a stable address used for highlighting only; two nodes with the
/// same id are two occurrences of the same logical sub-expression.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpressionNode {
    #[serde(default)]
    pub id: String,
    pub content: Box<ExpressionContent>,
}

impl ExpressionNode {
    /// Create a node with an explicit id
    pub fn new(id: impl Into<String>, content: ExpressionContent) -> Self {
        Self {
            id: id.into(),
            content: Box::new(content),
        }
    }

    /// Create a node without an id (never registered for highlighting)
    pub fn anonymous(content: ExpressionContent) -> Self {
        Self::new(String::new(), content)
    }

    /// The empty sentinel node
    pub fn empty() -> Self {
        Self::anonymous(ExpressionContent::Empty)
    }

    /// A plain identifier whose id is its body
    pub fn identifier(body: impl Into<String>) -> Self {
        let body = body.into();
        Self::new(body.clone(), ExpressionContent::Identifier(Identifier::new(body)))
    }

    /// A raw glyph sequence whose id is its text
    pub fn string(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), ExpressionContent::String(text))
    }

    /// Prose embedded in math
    pub fn text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(text.clone(), ExpressionContent::Text(text))
    }

    /// A bare number
    pub fn number(number: impl Into<String>) -> Self {
        Self::anonymous(ExpressionContent::Quantity {
            number: number.into(),
            scientific_notation: None,
            unit: None,
        })
    }

    /// Replace the id, keeping the content
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Parse a node from JSON
    pub fn from_json(json: &str) -> MathResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize the node to JSON
    pub fn to_json(&self) -> MathResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    pub fn is_empty(&self) -> bool {
        matches!(*self.content, ExpressionContent::Empty)
    }

    /// Get all direct children of this node, in rendering order
    pub fn children(&self) -> Vec<&ExpressionNode> {
        use ExpressionContent as C;
        match self.content.as_ref() {
            C::Empty | C::Text(_) | C::String(_) | C::True | C::False | C::Unknown(_) => vec![],
            C::Identifier(ident) => {
                let mut v = Vec::new();
                for script in [&ident.pre_script, &ident.post_script].into_iter().flatten() {
                    v.extend(script.subscripts.iter());
                    v.extend(script.superscripts.iter());
                }
                v
            }
            C::Power { base, exponent } => vec![base, exponent],
            C::Fraction {
                numerator,
                denominator,
                ..
            }
            | C::Division {
                numerator,
                denominator,
                ..
            } => vec![numerator, denominator],
            C::Bracketed { inner, .. } => vec![inner],
            C::Matrix { rows } => rows.iter().flatten().flatten().collect(),
            C::Multiplications { terms } => terms.iter().map(|(_, t)| t).collect(),
            C::Additions { terms } => terms.iter().map(|(_, t)| t).collect(),
            C::SumNotation {
                summand: body,
                variable,
                lower_limit,
                upper_limit,
            }
            | C::ProductNotation {
                multiplicand: body,
                variable,
                lower_limit,
                upper_limit,
            } => {
                let mut v = vec![body];
                v.extend(variable.iter());
                v.extend(lower_limit.iter());
                v.extend(upper_limit.iter());
                v
            }
            C::UnaryPrefixOperation {
                operator,
                parameter,
            }
            | C::UnaryPostfixOperation {
                operator,
                parameter,
            } => vec![operator, parameter],
            C::Abs { parameter } => vec![parameter],
            C::FunctionCall { name, parameters } => {
                let mut v = vec![name];
                v.extend(parameters.iter());
                v
            }
            C::Quantity {
                scientific_notation,
                unit,
                ..
            } => scientific_notation.iter().chain(unit.iter()).collect(),
            C::ScientificNotation { magnitude, .. } => vec![magnitude],
            C::Relationship { lhs, rhs, .. } => vec![lhs, rhs],
            C::UnaryRelationship { subject, .. } => vec![subject],
            C::VariableDefinition { name, definition } => {
                let mut v = vec![name];
                v.extend(definition.iter());
                v
            }
            C::FunctionDefinition {
                custom_function,
                definition,
            } => {
                let mut v = vec![custom_function];
                v.extend(definition.iter());
                v
            }
            C::Limit {
                function,
                approaching_value,
                ..
            } => vec![approaching_value, function],
            C::Differential { target, order, .. } => vec![order, target],
            C::Integration {
                integrand,
                differentials,
                domain,
            } => {
                let mut v = vec![integrand];
                for (variable, lower, upper) in differentials {
                    v.push(variable);
                    v.extend(lower.iter());
                    v.extend(upper.iter());
                }
                v.extend(domain.iter());
                v
            }
            C::QuantifiedExpression {
                variables,
                domain,
                predicate,
                ..
            } => {
                let mut v: Vec<&ExpressionNode> = variables.iter().collect();
                v.extend(domain.iter());
                v.extend(predicate.iter());
                v
            }
            C::And(nodes) | C::Or(nodes) => nodes.iter().collect(),
            C::Not(node) => vec![node],
        }
    }

    /// Count nodes in this subtree
    pub fn node_count(&self) -> usize {
        1 + self.children().iter().map(|c| c.node_count()).sum::<usize>()
    }
}

// =============================================================================
// Expression Content
// =============================================================================

/// An integral differential: `(variable, lower bound, upper bound)`
pub type IntegralDifferential = (ExpressionNode, Option<ExpressionNode>, Option<ExpressionNode>);

/// The closed set of expression variants
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ExpressionContent {
    /// Sentinel for "nothing here"
    Empty,
    /// Prose set in the text font
    Text(String),
    /// Raw glyph sequence set in the math font
    String(String),
    Identifier(Identifier),
    Power {
        base: ExpressionNode,
        exponent: ExpressionNode,
    },
    Fraction {
        numerator: ExpressionNode,
        denominator: ExpressionNode,
        #[serde(default = "DivisionStyle::fraction")]
        style: DivisionStyle,
    },
    Division {
        numerator: ExpressionNode,
        denominator: ExpressionNode,
        #[serde(default = "DivisionStyle::division")]
        style: DivisionStyle,
    },
    Bracketed {
        inner: ExpressionNode,
        style: BracketStyle,
        #[serde(default)]
        size: BracketSize,
    },
    /// Rows need not be rectangular; short rows are padded when rendered
    Matrix {
        rows: Vec<Vec<Option<ExpressionNode>>>,
    },
    Multiplications {
        terms: Vec<(MulOperator, ExpressionNode)>,
    },
    Additions {
        terms: Vec<(AddOperator, ExpressionNode)>,
    },
    SumNotation {
        summand: ExpressionNode,
        variable: Option<ExpressionNode>,
        lower_limit: Option<ExpressionNode>,
        upper_limit: Option<ExpressionNode>,
    },
    ProductNotation {
        multiplicand: ExpressionNode,
        variable: Option<ExpressionNode>,
        lower_limit: Option<ExpressionNode>,
        upper_limit: Option<ExpressionNode>,
    },
    UnaryPrefixOperation {
        operator: ExpressionNode,
        parameter: ExpressionNode,
    },
    UnaryPostfixOperation {
        parameter: ExpressionNode,
        operator: ExpressionNode,
    },
    /// Absolute value, rendered `|x|`
    Abs {
        parameter: ExpressionNode,
    },
    FunctionCall {
        name: ExpressionNode,
        parameters: Vec<ExpressionNode>,
    },
    Quantity {
        number: String,
        scientific_notation: Option<ExpressionNode>,
        unit: Option<ExpressionNode>,
    },
    ScientificNotation {
        magnitude: ExpressionNode,
        style: ScientificNotationStyle,
    },
    Relationship {
        lhs: ExpressionNode,
        operator: RelationOperator,
        rhs: ExpressionNode,
    },
    UnaryRelationship {
        subject: ExpressionNode,
        predicate: UnaryRelationOperator,
    },
    VariableDefinition {
        name: ExpressionNode,
        definition: Option<ExpressionNode>,
    },
    FunctionDefinition {
        custom_function: ExpressionNode,
        definition: Option<ExpressionNode>,
    },
    Limit {
        function: ExpressionNode,
        variable: String,
        approaching_value: ExpressionNode,
    },
    Differential {
        target: ExpressionNode,
        order: ExpressionNode,
        #[serde(default)]
        diff_style: DifferentialStyle,
    },
    Integration {
        integrand: ExpressionNode,
        differentials: Vec<IntegralDifferential>,
        domain: Option<ExpressionNode>,
    },
    QuantifiedExpression {
        quantifier: Quantifier,
        variables: Vec<ExpressionNode>,
        domain: Option<ExpressionNode>,
        predicate: Option<ExpressionNode>,
    },
    And(Vec<ExpressionNode>),
    Or(Vec<ExpressionNode>),
    Not(ExpressionNode),
    True,
    False,
    /// Anything the decoder did not recognize, kept verbatim
    #[serde(untagged)]
    Unknown(Value),
}

impl ExpressionContent {
    /// Every tag this model understands
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "Empty",
        "Text",
        "String",
        "Identifier",
        "Power",
        "Fraction",
        "Division",
        "Bracketed",
        "Matrix",
        "Multiplications",
        "Additions",
        "SumNotation",
        "ProductNotation",
        "UnaryPrefixOperation",
        "UnaryPostfixOperation",
        "Abs",
        "FunctionCall",
        "Quantity",
        "ScientificNotation",
        "Relationship",
        "UnaryRelationship",
        "VariableDefinition",
        "FunctionDefinition",
        "Limit",
        "Differential",
        "Integration",
        "QuantifiedExpression",
        "And",
        "Or",
        "Not",
        "True",
        "False",
    ];

    /// The tag name of this variant
    pub fn tag(&self) -> &'static str {
        use ExpressionContent as C;
        match self {
            C::Empty => "Empty",
            C::Text(_) => "Text",
            C::String(_) => "String",
            C::Identifier(_) => "Identifier",
            C::Power { .. } => "Power",
            C::Fraction { .. } => "Fraction",
            C::Division { .. } => "Division",
            C::Bracketed { .. } => "Bracketed",
            C::Matrix { .. } => "Matrix",
            C::Multiplications { .. } => "Multiplications",
            C::Additions { .. } => "Additions",
            C::SumNotation { .. } => "SumNotation",
            C::ProductNotation { .. } => "ProductNotation",
            C::UnaryPrefixOperation { .. } => "UnaryPrefixOperation",
            C::UnaryPostfixOperation { .. } => "UnaryPostfixOperation",
            C::Abs { .. } => "Abs",
            C::FunctionCall { .. } => "FunctionCall",
            C::Quantity { .. } => "Quantity",
            C::ScientificNotation { .. } => "ScientificNotation",
            C::Relationship { .. } => "Relationship",
            C::UnaryRelationship { .. } => "UnaryRelationship",
            C::VariableDefinition { .. } => "VariableDefinition",
            C::FunctionDefinition { .. } => "FunctionDefinition",
            C::Limit { .. } => "Limit",
            C::Differential { .. } => "Differential",
            C::Integration { .. } => "Integration",
            C::QuantifiedExpression { .. } => "QuantifiedExpression",
            C::And(_) => "And",
            C::Or(_) => "Or",
            C::Not(_) => "Not",
            C::True => "True",
            C::False => "False",
            C::Unknown(_) => "Unknown",
        }
    }
}

// =============================================================================
// Raw (undecoded) variants
// =============================================================================

/// Classification of a value that did not decode into a known variant
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawVariant {
    /// The tag is not part of the schema this renderer knows
    UnknownTag(String),
    /// The tag is known but its payload did not match
    Malformed { tag: String, detail: String },
}

impl RawVariant {
    /// Classify a raw value against a list of known tags.
    ///
    /// Externally tagged values are either a bare string (unit variant) or a
    /// single-key object; anything else has no recognizable tag at all.
    pub fn classify(value: &Value, known_tags: &[&str]) -> Self {
        match value {
            Value::String(tag) => {
                if known_tags.contains(&tag.as_str()) {
                    RawVariant::Malformed {
                        tag: tag.clone(),
                        detail: "variant requires a payload".to_string(),
                    }
                } else {
                    RawVariant::UnknownTag(tag.clone())
                }
            }
            Value::Object(map) if map.len() == 1 => {
                match map.iter().next() {
                    Some((tag, payload)) if known_tags.contains(&tag.as_str()) => {
                        RawVariant::Malformed {
                            tag: tag.clone(),
                            detail: describe_payload(payload),
                        }
                    }
                    Some((tag, _)) => RawVariant::UnknownTag(tag.clone()),
                    None => RawVariant::UnknownTag(String::new()),
                }
            }
            Value::Object(map) => RawVariant::UnknownTag(
                map.keys().cloned().collect::<Vec<_>>().join("+"),
            ),
            Value::Null => RawVariant::UnknownTag("null".to_string()),
            other => RawVariant::UnknownTag(json_kind(other).to_string()),
        }
    }

    pub fn tag(&self) -> &str {
        match self {
            RawVariant::UnknownTag(tag) => tag,
            RawVariant::Malformed { tag, .. } => tag,
        }
    }
}

fn describe_payload(payload: &Value) -> String {
    match payload {
        Value::Object(fields) => {
            let names: Vec<&str> = fields.keys().map(String::as_str).collect();
            if names.is_empty() {
                "payload has no fields".to_string()
            } else {
                format!("unexpected payload shape (fields: {})", names.join(", "))
            }
        }
        other => format!("unexpected {} payload", json_kind(other)),
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

// =============================================================================
// Identifiers and scripts
// =============================================================================

/// An identifier with optional scripts around its body
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Identifier {
    pub body: String,
    #[serde(default)]
    pub pre_script: Option<ScriptNode>,
    #[serde(default)]
    pub mid_script: Option<MiddleScript>,
    #[serde(default)]
    pub post_script: Option<ScriptNode>,
    #[serde(default)]
    pub primes: usize,
    #[serde(default)]
    pub is_function: bool,
}

impl Identifier {
    pub fn new(body: impl Into<String>) -> Self {
        Self {
            body: body.into(),
            pre_script: None,
            mid_script: None,
            post_script: None,
            primes: 0,
            is_function: false,
        }
    }

    /// Attach a post subscript
    pub fn with_subscript(mut self, subscript: ExpressionNode) -> Self {
        self.post_script
            .get_or_insert_with(ScriptNode::default)
            .subscripts
            .push(subscript);
        self
    }

    /// Attach a post superscript
    pub fn with_superscript(mut self, superscript: ExpressionNode) -> Self {
        self.post_script
            .get_or_insert_with(ScriptNode::default)
            .superscripts
            .push(superscript);
        self
    }

    pub fn with_primes(mut self, primes: usize) -> Self {
        self.primes = primes;
        self
    }
}

/// Sub- and superscripts attached on one side of an identifier
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScriptNode {
    #[serde(default)]
    pub subscripts: Vec<ExpressionNode>,
    #[serde(default)]
    pub superscripts: Vec<ExpressionNode>,
}

impl ScriptNode {
    pub fn is_empty(&self) -> bool {
        self.subscripts.is_empty() && self.superscripts.is_empty()
    }
}

/// Accent marks stacked directly over or under an identifier body
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MiddleScript {
    #[serde(default)]
    pub super_script: Vec<MiddleScriptMark>,
    #[serde(default)]
    pub sub_script: Vec<MiddleScriptMark>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MiddleScriptMark {
    Hat,
    /// One or more dots (time derivatives)
    Dot(usize),
    Tilde,
    Bar,
}

// =============================================================================
// Supporting enums
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivisionStyle {
    /// Stacked numerator over denominator
    Fraction,
    /// Inline `a ÷ b`
    Division,
    /// Inline `a / b`
    Inline,
}

impl DivisionStyle {
    fn fraction() -> Self {
        DivisionStyle::Fraction
    }

    fn division() -> Self {
        DivisionStyle::Division
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BracketStyle {
    Round,
    Square,
    Curly,
    Angle,
    Vertical,
    DoubleVertical,
    Ceiling,
    Floor,
    /// Invisible brackets
    None,
}

impl BracketStyle {
    pub const ALL: [BracketStyle; 9] = [
        BracketStyle::Round,
        BracketStyle::Square,
        BracketStyle::Curly,
        BracketStyle::Angle,
        BracketStyle::Vertical,
        BracketStyle::DoubleVertical,
        BracketStyle::Ceiling,
        BracketStyle::Floor,
        BracketStyle::None,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BracketSize {
    #[default]
    Normal,
    /// Grow with the content (`\left ... \right`)
    Auto,
    /// Fixed size step, 1 (`\big`) through 4 (`\Bigg`)
    Sized(u8),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MulSymbol {
    /// `×`, used between numbers
    Times,
    /// `·`, used between symbols
    Dot,
    /// Thin space, used before bracketed expressions
    LittleSpace,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DivSymbol {
    Slash,
    Divide,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MulOperator {
    Multiplication(MulSymbol),
    Division(DivSymbol),
    /// Plain juxtaposition
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AddOperator {
    Addition,
    Subtraction,
    None,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ScientificNotationStyle {
    LowerCaseE,
    UpperCaseE,
    TimesTenPower,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DifferentialStyle {
    Partial,
    #[default]
    Total,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Quantifier {
    Universal,
    Existential,
    UniqueExistential,
    /// Object defined in terms of others
    Defined,
    /// Arbitrary but fixed object
    Fixed,
}

/// Binary relation operators
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RelationOperator {
    // Equality and order
    IsEqual,
    Equal,
    NotEqual,
    Greater,
    Less,
    GreaterEqual,
    LessEqual,

    // Geometry
    Collinear,
    Perpendicular,
    Equivalent,
    Similar,
    Congruent,

    // Set theory
    ElementOf,
    NotElementOf,
    SubsetOf,
    ProperSubsetOf,
    SupersetOf,
    ProperSupersetOf,
    Disjoint,
    Union,
    Intersection,
    CartesianProduct,
    SameCardinality,

    // Number theory
    Divides,
    NotDivides,
    CongruentMod,
    NotCongruentMod,
    AreCoprime,

    // Group theory
    IsSubgroupOf,
    IsNormalSubgroupOf,
    IsIsomorphicTo,
    IsHomomorphicTo,
    IsQuotientOf,
    IsInCenterOf,
    AreConjugateIn,

    // Ring theory
    IsSubringOf,
    IsIdealOf,

    // Topology
    IsOpenIn,
    IsClosedIn,
    IsHomeomorphicTo,
    IsDense,

    // Category theory
    IsMorphismBetween,
    IsIsomorphismIn,
    IsMonomorphismIn,
    IsEpimorphismIn,
    IsNaturalTransformationBetween,
    IsAdjunctionBetween,
    ComposesTo,

    // Logic
    Implies,
    Iff,

    Custom(String),
}

impl RelationOperator {
    /// Every operator with a fixed table entry
    pub fn builtin() -> Vec<RelationOperator> {
        use RelationOperator::*;
        vec![
            IsEqual,
            Equal,
            NotEqual,
            Greater,
            Less,
            GreaterEqual,
            LessEqual,
            Collinear,
            Perpendicular,
            Equivalent,
            Similar,
            Congruent,
            ElementOf,
            NotElementOf,
            SubsetOf,
            ProperSubsetOf,
            SupersetOf,
            ProperSupersetOf,
            Disjoint,
            Union,
            Intersection,
            CartesianProduct,
            SameCardinality,
            Divides,
            NotDivides,
            CongruentMod,
            NotCongruentMod,
            AreCoprime,
            IsSubgroupOf,
            IsNormalSubgroupOf,
            IsIsomorphicTo,
            IsHomomorphicTo,
            IsQuotientOf,
            IsInCenterOf,
            AreConjugateIn,
            IsSubringOf,
            IsIdealOf,
            IsOpenIn,
            IsClosedIn,
            IsHomeomorphicTo,
            IsDense,
            IsMorphismBetween,
            IsIsomorphismIn,
            IsMonomorphismIn,
            IsEpimorphismIn,
            IsNaturalTransformationBetween,
            IsAdjunctionBetween,
            ComposesTo,
            Implies,
            Iff,
        ]
    }
}

/// Unary predicates, rendered as `predicate(subject)`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UnaryRelationOperator {
    // Number theory
    IsPrime,
    IsComposite,

    // Group theory
    HasOrderInGroup,
    HasUniqueInverse,

    // Ring theory
    IsPrimeIdeal,
    IsMaximalIdeal,
    IsPrincipalIdeal,
    IsUnit,
    IsIrreducible,
    IsPrimeElement,
    IsField,
    IsIntegralDomain,
    IsUFD,
    IsPID,

    // Topology
    IsCompact,
    IsConnected,
    IsContinuous,
    Converges,
    IsHausdorff,

    // Category theory
    IsObjectIn,
    IsEndomorphismIn,
    IsAutomorphismIn,

    // Set theory
    Complement,
    PowerSet,

    Custom(String),
}

impl UnaryRelationOperator {
    /// Every predicate with a fixed table entry
    pub fn builtin() -> Vec<UnaryRelationOperator> {
        use UnaryRelationOperator::*;
        vec![
            IsPrime,
            IsComposite,
            HasOrderInGroup,
            HasUniqueInverse,
            IsPrimeIdeal,
            IsMaximalIdeal,
            IsPrincipalIdeal,
            IsUnit,
            IsIrreducible,
            IsPrimeElement,
            IsField,
            IsIntegralDomain,
            IsUFD,
            IsPID,
            IsCompact,
            IsConnected,
            IsContinuous,
            Converges,
            IsHausdorff,
            IsObjectIn,
            IsEndomorphismIn,
            IsAutomorphismIn,
            Complement,
            PowerSet,
        ]
    }
}

// =============================================================================
// Tests
// =============================================================================
