//! Math Symbols - Fixed glyph tables used by the expression renderer
//!
//! Every table here is total over its enum: each key maps to exactly one
//! display string, and `Custom(s)` keys map to `s` verbatim.

use crate::model::{
    AddOperator, BracketStyle, DivSymbol, MiddleScriptMark, MulOperator, MulSymbol, Quantifier,
    RelationOperator, ScientificNotationStyle, UnaryRelationOperator,
};
use std::borrow::Cow;

// =============================================================================
// Glyph constants
// =============================================================================

pub const SUM: &str = "\u{2211}";
pub const PRODUCT: &str = "\u{220F}";
pub const INTEGRAL: &str = "\u{222B}";
pub const PARTIAL: &str = "\u{2202}";
pub const RIGHT_ARROW: &str = "\u{2192}";
pub const PRIME: &str = "\u{2032}";
pub const MINUS: &str = "\u{2212}";
pub const TIMES: &str = "\u{00D7}";
pub const CDOT: &str = "\u{00B7}";
pub const DIVIDE: &str = "\u{00F7}";
pub const ELEMENT_OF: &str = "\u{2208}";
pub const AND: &str = "\u{2227}";
pub const OR: &str = "\u{2228}";
pub const NOT: &str = "\u{00AC}";
pub const RADICAL: &str = "\u{221A}";

// =============================================================================
// Brackets
// =============================================================================

/// Opening and closing glyphs for a bracket style; `None` yields empty strings
pub fn bracket_glyphs(style: BracketStyle) -> (&'static str, &'static str) {
    match style {
        BracketStyle::Round => ("(", ")"),
        BracketStyle::Square => ("[", "]"),
        BracketStyle::Curly => ("{", "}"),
        BracketStyle::Angle => ("\u{27E8}", "\u{27E9}"),
        BracketStyle::Vertical => ("|", "|"),
        BracketStyle::DoubleVertical => ("\u{2016}", "\u{2016}"),
        BracketStyle::Ceiling => ("\u{2308}", "\u{2309}"),
        BracketStyle::Floor => ("\u{230A}", "\u{230B}"),
        BracketStyle::None => ("", ""),
    }
}

// =============================================================================
// Relations
// =============================================================================

/// Display string for a binary relation operator
pub fn relation_symbol(op: &RelationOperator) -> Cow<'static, str> {
    use RelationOperator::*;
    let symbol = match op {
        IsEqual | Equal => "=",
        NotEqual => "\u{2260}",
        Greater => ">",
        Less => "<",
        GreaterEqual => "\u{2265}",
        LessEqual => "\u{2264}",

        Collinear => "collinear",
        Perpendicular => "\u{22A5}",
        Equivalent => "\u{2261}",
        Similar => "\u{223C}",
        Congruent => "\u{2245}",

        ElementOf => ELEMENT_OF,
        NotElementOf => "\u{2209}",
        SubsetOf => "\u{2286}",
        ProperSubsetOf => "\u{2282}",
        SupersetOf => "\u{2287}",
        ProperSupersetOf => "\u{2283}",
        Disjoint => "disjoint",
        Union => "\u{222A}",
        Intersection => "\u{2229}",
        CartesianProduct => TIMES,
        SameCardinality => "\u{2248}",

        Divides => "\u{2223}",
        NotDivides => "\u{2224}",
        CongruentMod => "\u{2261}",
        NotCongruentMod => "\u{2262}",
        AreCoprime => "\u{22A5}",

        IsSubgroupOf => "\u{2264}",
        IsNormalSubgroupOf => "\u{22B4}",
        IsIsomorphicTo => "\u{2245}",
        IsHomomorphicTo => RIGHT_ARROW,
        IsQuotientOf => "/",
        IsInCenterOf => "\u{2208} Z",
        AreConjugateIn => "\u{223C}",

        IsSubringOf => "\u{2286}",
        IsIdealOf => "\u{22B2}",

        IsOpenIn => "open in",
        IsClosedIn => "closed in",
        IsHomeomorphicTo => "\u{2243}",
        IsDense => "dense in",

        IsMorphismBetween => ":",
        IsIsomorphismIn => "\u{2245}",
        IsMonomorphismIn => "\u{21AA}",
        IsEpimorphismIn => "\u{21A0}",
        IsNaturalTransformationBetween => "\u{21D2}",
        IsAdjunctionBetween => "\u{22A3}",
        ComposesTo => "\u{2218}",

        Implies => RIGHT_ARROW,
        Iff => "\u{2194}",

        Custom(s) => return Cow::Owned(s.clone()),
    };
    Cow::Borrowed(symbol)
}

/// Display string for a unary predicate
pub fn unary_relation_symbol(op: &UnaryRelationOperator) -> Cow<'static, str> {
    use UnaryRelationOperator::*;
    let symbol = match op {
        IsPrime => "Prime",
        IsComposite => "Composite",
        HasOrderInGroup => "Order",
        HasUniqueInverse => "UniqueInverse",
        IsPrimeIdeal => "PrimeIdeal",
        IsMaximalIdeal => "MaximalIdeal",
        IsPrincipalIdeal => "PrincipalIdeal",
        IsUnit => "Unit",
        IsIrreducible => "Irreducible",
        IsPrimeElement => "PrimeElement",
        IsField => "Field",
        IsIntegralDomain => "IntegralDomain",
        IsUFD => "UFD",
        IsPID => "PID",
        IsCompact => "Compact",
        IsConnected => "Connected",
        IsContinuous => "Continuous",
        Converges => "Converges",
        IsHausdorff => "Hausdorff",
        IsObjectIn => "Ob",
        IsEndomorphismIn => "End",
        IsAutomorphismIn => "Aut",
        Complement => "\u{2201}",
        PowerSet => "\u{1D4AB}",
        Custom(s) => return Cow::Owned(s.clone()),
    };
    Cow::Borrowed(symbol)
}

/// Whether a display string is long enough to be set as a keyword
pub fn is_keyword(symbol: &str) -> bool {
    symbol.chars().count() > 2
}

// =============================================================================
// Operators
// =============================================================================

/// Glyph for an addition-list operator; `None` has no glyph
pub fn add_symbol(op: AddOperator) -> Option<&'static str> {
    match op {
        AddOperator::Addition => Some("+"),
        AddOperator::Subtraction => Some(MINUS),
        AddOperator::None => None,
    }
}

/// Glyph for a multiplication-list operator.
///
/// `LittleSpace` and `None` have no glyph; the former becomes a thin space.
pub fn mul_symbol(op: MulOperator) -> Option<&'static str> {
    match op {
        MulOperator::Multiplication(MulSymbol::Times) => Some(TIMES),
        MulOperator::Multiplication(MulSymbol::Dot) => Some(CDOT),
        MulOperator::Multiplication(MulSymbol::LittleSpace) => None,
        MulOperator::Division(DivSymbol::Slash) => Some("/"),
        MulOperator::Division(DivSymbol::Divide) => Some(DIVIDE),
        MulOperator::None => None,
    }
}

/// Longest run of a repeated mark before it is written as a count
pub const MAX_REPEATED_MARKS: usize = 4;

/// `glyph` repeated `count` times, or `glyph(count)` past [`MAX_REPEATED_MARKS`]
pub fn repeated_mark(glyph: &str, count: usize) -> String {
    if count <= MAX_REPEATED_MARKS {
        glyph.repeat(count)
    } else {
        format!("{}({})", glyph, count)
    }
}

pub fn middle_script_mark(mark: MiddleScriptMark) -> String {
    match mark {
        MiddleScriptMark::Hat => "\u{02C6}".to_string(),
        MiddleScriptMark::Dot(n) => repeated_mark("\u{02D9}", n.max(1)),
        MiddleScriptMark::Tilde => "\u{02DC}".to_string(),
        MiddleScriptMark::Bar => "\u{00AF}".to_string(),
    }
}

/// Quantifier glyph and whether it is set as a keyword
pub fn quantifier_symbol(quantifier: Quantifier) -> (&'static str, bool) {
    match quantifier {
        Quantifier::Universal => ("\u{2200}", false),
        Quantifier::Existential => ("\u{2203}", false),
        Quantifier::UniqueExistential => ("\u{2203}!", false),
        Quantifier::Defined => ("let", true),
        Quantifier::Fixed => ("fix", true),
    }
}

/// Separator placed before the magnitude of a scientific notation suffix
pub fn scientific_prefix(style: ScientificNotationStyle) -> &'static str {
    match style {
        ScientificNotationStyle::LowerCaseE => "e",
        ScientificNotationStyle::UpperCaseE => "E",
        ScientificNotationStyle::TimesTenPower => "\u{00D7}10",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bracket_none_is_empty() {
        assert_eq!(bracket_glyphs(BracketStyle::None), ("", ""));
        for style in BracketStyle::ALL {
            let (open, close) = bracket_glyphs(style);
            assert_eq!(open.is_empty(), style == BracketStyle::None);
            assert_eq!(close.is_empty(), style == BracketStyle::None);
        }
    }

    #[test]
    fn test_relation_table_is_total() {
        for op in RelationOperator::builtin() {
            assert!(!relation_symbol(&op).is_empty(), "{:?} has no symbol", op);
        }
        assert_eq!(relation_symbol(&RelationOperator::LessEqual), "\u{2264}");
    }

    #[test]
    fn test_custom_symbols_pass_through() {
        assert_eq!(
            relation_symbol(&RelationOperator::Custom("\u{227A}".to_string())),
            "\u{227A}"
        );
        assert_eq!(
            unary_relation_symbol(&UnaryRelationOperator::Custom("Nilpotent".to_string())),
            "Nilpotent"
        );
    }

    #[test]
    fn test_keyword_threshold() {
        assert!(is_keyword("Prime"));
        assert!(!is_keyword("\u{2201}"));
        assert!(is_keyword("\u{2208} Z"));
        assert!(!is_keyword("Ob"));
    }

    #[test]
    fn test_dot_mark_repeats() {
        assert_eq!(middle_script_mark(MiddleScriptMark::Dot(2)), "\u{02D9}\u{02D9}");
        assert_eq!(middle_script_mark(MiddleScriptMark::Dot(0)), "\u{02D9}");
    }

    #[test]
    fn test_long_mark_runs_become_counts() {
        assert_eq!(repeated_mark(PRIME, 4), PRIME.repeat(4));
        assert_eq!(repeated_mark(PRIME, 5), "\u{2032}(5)");
        assert_eq!(
            middle_script_mark(MiddleScriptMark::Dot(usize::MAX)),
            format!("\u{02D9}({})", usize::MAX)
        );
    }

    #[test]
    fn test_mul_symbols() {
        assert_eq!(mul_symbol(MulOperator::Multiplication(MulSymbol::Times)), Some(TIMES));
        assert_eq!(mul_symbol(MulOperator::Multiplication(MulSymbol::LittleSpace)), None);
        assert_eq!(mul_symbol(MulOperator::Division(DivSymbol::Divide)), Some(DIVIDE));
    }
}
