//! Tactic display - Fixed templates for proof tactics

use crate::proof::ProofDisplay;
use crate::rich_text::RichText;
use math::{ExpressionNode, Quantifier};
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum TacticDisplay {
    IntroduceQuantifier {
        quantifier: Quantifier,
        variables: Vec<ExpressionNode>,
        #[serde(default)]
        domain: Option<ExpressionNode>,
    },
    IntroduceFreshVariable {
        variable: ExpressionNode,
        #[serde(default)]
        target: Option<ExpressionNode>,
        #[serde(default)]
        explanation: Option<RichText>,
    },
    ProvideWitness {
        variable: ExpressionNode,
        witness: ExpressionNode,
    },
    ReorderQuantifiers {
        before: ExpressionNode,
        after: ExpressionNode,
    },
    ApplyTheorem {
        theorem_name: String,
        /// Parameter name and the expression substituted for it
        #[serde(default)]
        instantiation: Vec<(String, ExpressionNode)>,
        #[serde(default)]
        target: Option<ExpressionNode>,
    },
    Rewrite {
        target: ExpressionNode,
        equation: ExpressionNode,
        #[serde(default)]
        direction: RewriteDirection,
        #[serde(default)]
        steps: Vec<TraceStep>,
    },
    SplitConjunction {
        target: ExpressionNode,
        conjuncts: Vec<ExpressionNode>,
        #[serde(default)]
        selected_index: Option<usize>,
    },
    SplitDisjunction {
        target: ExpressionNode,
        disjuncts: Vec<ExpressionNode>,
        #[serde(default)]
        chosen_index: Option<usize>,
    },
    Simplify {
        target: ExpressionNode,
        #[serde(default)]
        steps: Vec<TraceStep>,
        result: ExpressionNode,
    },
    Auto {
        tactic_type: String,
        #[serde(default)]
        attempted: Vec<String>,
        #[serde(default)]
        success_path: Option<String>,
    },
    Induction {
        variable: ExpressionNode,
        base_case: Box<ProofDisplay>,
        inductive_step: Box<ProofDisplay>,
        #[serde(default)]
        hypothesis_name: Option<String>,
    },
    Contradiction {
        assumption: ExpressionNode,
    },
    CaseSplit {
        target: ExpressionNode,
        cases: Vec<ExpressionNode>,
    },
    ExactWith {
        theorem_name: String,
    },
    #[serde(untagged)]
    Unknown(Value),
}

impl TacticDisplay {
    pub const KNOWN_TAGS: &'static [&'static str] = &[
        "IntroduceQuantifier",
        "IntroduceFreshVariable",
        "ProvideWitness",
        "ReorderQuantifiers",
        "ApplyTheorem",
        "Rewrite",
        "SplitConjunction",
        "SplitDisjunction",
        "Simplify",
        "Auto",
        "Induction",
        "Contradiction",
        "CaseSplit",
        "ExactWith",
    ];

    /// Human readable tactic name for the step header
    pub fn name(&self) -> &'static str {
        match self {
            TacticDisplay::IntroduceQuantifier { .. } => "Introduce",
            TacticDisplay::IntroduceFreshVariable { .. } => "Fix",
            TacticDisplay::ProvideWitness { .. } => "Witness",
            TacticDisplay::ReorderQuantifiers { .. } => "Reorder quantifiers",
            TacticDisplay::ApplyTheorem { .. } => "Apply",
            TacticDisplay::Rewrite { .. } => "Rewrite",
            TacticDisplay::SplitConjunction { .. } => "Split conjunction",
            TacticDisplay::SplitDisjunction { .. } => "Split disjunction",
            TacticDisplay::Simplify { .. } => "Simplify",
            TacticDisplay::Auto { .. } => "Auto",
            TacticDisplay::Induction { .. } => "Induction",
            TacticDisplay::Contradiction { .. } => "Contradiction",
            TacticDisplay::CaseSplit { .. } => "Case split",
            TacticDisplay::ExactWith { .. } => "Exact",
            TacticDisplay::Unknown(_) => "Unknown tactic",
        }
    }

    pub fn css_name(&self) -> &'static str {
        match self {
            TacticDisplay::IntroduceQuantifier { .. } => "introduce-quantifier",
            TacticDisplay::IntroduceFreshVariable { .. } => "fresh-variable",
            TacticDisplay::ProvideWitness { .. } => "witness",
            TacticDisplay::ReorderQuantifiers { .. } => "reorder",
            TacticDisplay::ApplyTheorem { .. } => "apply-theorem",
            TacticDisplay::Rewrite { .. } => "rewrite",
            TacticDisplay::SplitConjunction { .. } => "split-conjunction",
            TacticDisplay::SplitDisjunction { .. } => "split-disjunction",
            TacticDisplay::Simplify { .. } => "simplify",
            TacticDisplay::Auto { .. } => "auto",
            TacticDisplay::Induction { .. } => "induction",
            TacticDisplay::Contradiction { .. } => "contradiction",
            TacticDisplay::CaseSplit { .. } => "case-split",
            TacticDisplay::ExactWith { .. } => "exact",
            TacticDisplay::Unknown(_) => "unknown",
        }
    }

    pub(crate) fn nested_step_count(&self) -> usize {
        match self {
            TacticDisplay::Induction {
                base_case,
                inductive_step,
                ..
            } => base_case.total_steps() + inductive_step.total_steps(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum RewriteDirection {
    #[default]
    LeftToRight,
    RightToLeft,
}

impl RewriteDirection {
    pub fn arrow(&self) -> &'static str {
        match self {
            RewriteDirection::LeftToRight => "→",
            RewriteDirection::RightToLeft => "←",
        }
    }
}

/// One before/after pair of a rewrite or simplification trace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraceStep {
    #[serde(default)]
    pub rule: Option<String>,
    pub before: ExpressionNode,
    pub after: ExpressionNode,
}
